//! Document store abstraction.
//!
//! Documents are JSON values addressed by slash-separated paths (see
//! `fitgenius_core::doc_paths`). The S3 store keeps each document at
//! `{path}.json`; the in-memory store backs local runs and tests.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use aws_sdk_s3::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::StorageError;
use crate::objects;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Write options. With `merge`, top-level fields of the incoming object
/// are laid over the stored one instead of replacing it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    pub merge: bool,
}

impl SetOptions {
    pub const REPLACE: SetOptions = SetOptions { merge: false };
    pub const MERGE: SetOptions = SetOptions { merge: true };
}

/// A per-path JSON document store.
///
/// Methods return boxed futures for dyn compatibility. Writes are
/// last-writer-wins; there is no version check.
pub trait DocumentStore: Send + Sync {
    /// Read a document. `Ok(None)` if nothing is stored at `path`.
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Option<Value>, StorageError>>;

    /// Write a document.
    fn set<'a>(
        &'a self,
        path: &'a str,
        data: Value,
        options: SetOptions,
    ) -> BoxFuture<'a, Result<(), StorageError>>;
}

/// Shallow merge: top-level keys of `patch` overwrite those of `base`.
/// Anything that is not a pair of objects is a plain replacement.
pub fn merge_documents(base: Value, patch: Value) -> Value {
    match (base, patch) {
        (Value::Object(mut base), Value::Object(patch)) => {
            for (key, value) in patch {
                base.insert(key, value);
            }
            Value::Object(base)
        }
        (_, patch) => patch,
    }
}

/// Read and decode a document.
pub async fn get_json<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    path: &str,
) -> Result<Option<T>, StorageError> {
    match store.get(path).await? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

/// Encode and write a document.
pub async fn set_json<T: Serialize>(
    store: &dyn DocumentStore,
    path: &str,
    value: &T,
    options: SetOptions,
) -> Result<(), StorageError> {
    let data = serde_json::to_value(value)?;
    store.set(path, data, options).await
}

// ── S3 ───────────────────────────────────────────────────────────────────────

/// Documents stored as JSON objects in one S3 bucket.
pub struct S3DocumentStore {
    client: Client,
    bucket: String,
}

impl S3DocumentStore {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    fn key(path: &str) -> String {
        format!("{path}.json")
    }

    async fn read(&self, path: &str) -> Result<Option<Value>, StorageError> {
        let key = Self::key(path);
        let Some(body) = objects::get_object(&self.client, &self.bucket, &key).await? else {
            return Ok(None);
        };
        let value = serde_json::from_slice(&body).map_err(|e| StorageError::InvalidDocument {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Some(value))
    }

    async fn write(&self, path: &str, data: Value, options: SetOptions) -> Result<(), StorageError> {
        let data = if options.merge {
            match self.read(path).await? {
                Some(existing) => merge_documents(existing, data),
                None => data,
            }
        } else {
            data
        };

        let body = serde_json::to_vec_pretty(&data)?;
        objects::put_object(
            &self.client,
            &self.bucket,
            &Self::key(path),
            body,
            Some("application/json"),
        )
        .await?;

        debug!(bucket = %self.bucket, path, merge = options.merge, "document written");
        Ok(())
    }
}

impl DocumentStore for S3DocumentStore {
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Option<Value>, StorageError>> {
        Box::pin(self.read(path))
    }

    fn set<'a>(
        &'a self,
        path: &'a str,
        data: Value,
        options: SetOptions,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(self.write(path, data, options))
    }
}

// ── In-memory ────────────────────────────────────────────────────────────────

/// Process-local document store.
#[derive(Default)]
pub struct MemoryDocumentStore {
    docs: RwLock<HashMap<String, Value>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop a document, as if it had never been written.
    pub async fn remove(&self, path: &str) -> Option<Value> {
        self.docs.write().await.remove(path)
    }

    pub async fn len(&self) -> usize {
        self.docs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.docs.read().await.is_empty()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<Option<Value>, StorageError>> {
        Box::pin(async move { Ok(self.docs.read().await.get(path).cloned()) })
    }

    fn set<'a>(
        &'a self,
        path: &'a str,
        data: Value,
        options: SetOptions,
    ) -> BoxFuture<'a, Result<(), StorageError>> {
        Box::pin(async move {
            let mut docs = self.docs.write().await;
            let data = match (options.merge, docs.remove(path)) {
                (true, Some(existing)) => merge_documents(existing, data),
                _ => data,
            };
            docs.insert(path.to_string(), data);
            Ok(())
        })
    }
}
