/// Access control applied to uploaded objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    PublicRead,
    Private,
}

impl Visibility {
    /// Canned-ACL header value understood by the store.
    pub fn as_acl(&self) -> &'static str {
        match self {
            Visibility::PublicRead => "public-read",
            Visibility::Private => "private",
        }
    }
}

/// Domain interface for the object store collaborator: fetch raw objects by
/// bucket and key, and upload processed objects with content-type and
/// visibility metadata.
pub trait ObjectStore: Send {
    fn get(
        &self,
        bucket: &str,
        key: &str,
    ) -> Result<Vec<u8>, Box<dyn std::error::Error + Send + Sync>>;

    fn put(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: &str,
        visibility: Visibility,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}
