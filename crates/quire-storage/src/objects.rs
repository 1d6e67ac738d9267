use aws_sdk_s3::Client;
use aws_sdk_s3::types::ObjectCannedAcl;
use aws_smithy_types::byte_stream::ByteStream;

use crate::error::StorageError;

/// Headers and access control for a new object.
#[derive(Debug, Clone, Default)]
pub struct PutOptions<'a> {
    pub content_type: Option<&'a str>,
    pub content_disposition: Option<&'a str>,
    /// Grant anonymous read access.
    pub public_read: bool,
}

/// Put an object to S3. Returns the new ETag.
pub async fn put_object(
    client: &Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    options: PutOptions<'_>,
) -> Result<String, StorageError> {
    let mut req = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body));

    if let Some(ct) = options.content_type {
        req = req.content_type(ct);
    }
    if let Some(cd) = options.content_disposition {
        req = req.content_disposition(cd);
    }
    if options.public_read {
        req = req.acl(ObjectCannedAcl::PublicRead);
    }

    let resp = req
        .send()
        .await
        .map_err(|e| StorageError::PutObject(e.into_service_error().to_string()))?;

    Ok(resp.e_tag().unwrap_or_default().to_string())
}
