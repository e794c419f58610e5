use aws_sdk_s3::Client;
use aws_smithy_types::byte_stream::ByteStream;

use crate::error::StorageError;

/// Get an object body from S3. A missing key is `Ok(None)`.
pub async fn get_object(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<Option<Vec<u8>>, StorageError> {
    let resp = match client.get_object().bucket(bucket).key(key).send().await {
        Ok(resp) => resp,
        Err(e) => {
            let err = e.into_service_error();
            if err.is_no_such_key() {
                return Ok(None);
            }
            return Err(StorageError::GetObject(err.to_string()));
        }
    };

    let body = resp
        .body
        .collect()
        .await
        .map_err(|e| StorageError::GetObject(e.to_string()))?
        .into_bytes()
        .to_vec();

    Ok(Some(body))
}

/// Put an object to S3, replacing whatever is there.
pub async fn put_object(
    client: &Client,
    bucket: &str,
    key: &str,
    body: Vec<u8>,
    content_type: Option<&str>,
) -> Result<(), StorageError> {
    let mut req = client
        .put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body));

    if let Some(ct) = content_type {
        req = req.content_type(ct);
    }

    req.send()
        .await
        .map_err(|e| StorageError::PutObject(e.into_service_error().to_string()))?;

    Ok(())
}
