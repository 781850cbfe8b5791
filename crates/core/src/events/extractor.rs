use serde::Deserialize;
use thiserror::Error;

/// Discriminator value marking a connectivity-test probe; such events carry
/// no notifications and are skipped without error.
const TEST_EVENT: &str = "s3:TestEvent";

/// One stored object awaiting processing: source bucket plus object key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectNotification {
    pub bucket: String,
    pub key: String,
}

#[derive(Error, Debug)]
pub enum EventError {
    #[error("malformed event envelope: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("storage event is missing its notification records")]
    MissingRecords,
}

// Queue envelope: each record's body is itself a JSON-encoded storage event.

#[derive(Deserialize)]
struct QueueEvent {
    #[serde(rename = "Records")]
    records: Vec<QueueRecord>,
}

#[derive(Deserialize)]
struct QueueRecord {
    body: String,
}

#[derive(Deserialize)]
struct StorageEvent {
    #[serde(rename = "Event", default)]
    event: Option<String>,
    #[serde(rename = "Records", default)]
    records: Option<Vec<StorageRecord>>,
}

#[derive(Deserialize)]
struct StorageRecord {
    s3: StorageEntity,
}

#[derive(Deserialize)]
struct StorageEntity {
    bucket: BucketRef,
    object: ObjectRef,
}

#[derive(Deserialize)]
struct BucketRef {
    name: String,
}

#[derive(Deserialize)]
struct ObjectRef {
    key: String,
}

/// Flatten a raw queue event batch into object notifications, in arrival
/// order. Test-probe events are skipped; any malformed envelope or body
/// fails the whole batch.
pub fn extract_notifications(raw: &str) -> Result<Vec<ObjectNotification>, EventError> {
    let envelope: QueueEvent = serde_json::from_str(raw)?;

    let mut notifications = Vec::new();
    for record in &envelope.records {
        let storage_event: StorageEvent = serde_json::from_str(&record.body)?;
        if storage_event.event.as_deref() == Some(TEST_EVENT) {
            log::debug!("skipping connectivity-test event");
            continue;
        }
        let records = storage_event
            .records
            .ok_or(EventError::MissingRecords)?;
        for r in records {
            notifications.push(ObjectNotification {
                bucket: r.s3.bucket.name,
                key: r.s3.object.key,
            });
        }
    }
    Ok(notifications)
}
