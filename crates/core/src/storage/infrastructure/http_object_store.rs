use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::storage::domain::object_store::{ObjectStore, Visibility};

/// Header carrying the canned ACL on uploads.
const ACL_HEADER: &str = "x-amz-acl";

/// Object store client over per-bucket HTTP endpoints.
///
/// Objects are addressed as `https://{bucket}.{endpoint}/{key}`. All
/// requests carry an explicit timeout so a slow store cannot hang the
/// whole batch.
pub struct HttpObjectStore {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpObjectStore {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    fn object_url(&self, bucket: &str, key: &str) -> String {
        format!("https://{bucket}.{}/{key}", self.endpoint)
    }
}

impl ObjectStore for HttpObjectStore {
    fn get(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>> {
        let url = self.object_url(bucket, key);
        let response = self.client.get(&url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }

    fn put(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
        visibility: Visibility,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let url = self.object_url(bucket, key);
        self.client
            .put(&url)
            .header(CONTENT_TYPE, content_type)
            .header(ACL_HEADER, visibility.as_acl())
            .body(body.to_vec())
            .send()?
            .error_for_status()?;
        Ok(())
    }
}
