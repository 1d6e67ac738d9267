use async_trait::async_trait;
use aws_sdk_s3::Client;

use crate::error::StorageError;
use crate::objects::{self, PutOptions};
use crate::store::{NewObject, ObjectStore, StoredObject, Visibility};

const DEFAULT_REGION: &str = "us-east-1";

/// Objects written straight into an S3 bucket.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3Store {
    /// `public_base_url` defaults to the bucket's virtual-hosted endpoint in
    /// the client's region.
    pub fn new(client: Client, bucket: impl Into<String>, public_base_url: Option<String>) -> Self {
        let bucket = bucket.into();
        let public_base_url = public_base_url.unwrap_or_else(|| {
            let region = client
                .config()
                .region()
                .map(|r| r.to_string())
                .unwrap_or_else(|| DEFAULT_REGION.to_string());
            default_public_base(&bucket, &region)
        });
        Self {
            client,
            bucket,
            public_base_url,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn public_base_url(&self) -> &str {
        &self.public_base_url
    }
}

pub fn default_public_base(bucket: &str, region: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com")
}

pub fn object_url(base: &str, name: &str) -> String {
    format!("{}/{name}", base.trim_end_matches('/'))
}

/// `inline` keeps browsers displaying the PDF while still suggesting a name.
pub fn content_disposition(display_name: &str) -> String {
    let escaped = display_name.replace('\\', "\\\\").replace('"', "\\\"");
    format!("inline; filename=\"{escaped}\"")
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn create(&self, object: NewObject) -> Result<StoredObject, StorageError> {
        let disposition = object.display_name.as_deref().map(content_disposition);
        let etag = objects::put_object(
            &self.client,
            &self.bucket,
            &object.name,
            object.body,
            PutOptions {
                content_type: Some(&object.content_type),
                content_disposition: disposition.as_deref(),
                public_read: object.visibility == Visibility::Public,
            },
        )
        .await?;
        tracing::debug!(bucket = %self.bucket, key = %object.name, etag = %etag, "object stored");

        Ok(StoredObject {
            url: object_url(&self.public_base_url, &object.name),
            name: object.name,
        })
    }
}
