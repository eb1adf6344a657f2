//! In-memory media store adapter.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::ports::{MediaStore, MediaStoreError};

struct StoredObject {
    content_type: String,
    bytes: Vec<u8>,
}

/// Process-local object storage handing out stable public URLs.
pub struct MemoryMediaStore {
    public_base: String,
    objects: RwLock<HashMap<String, StoredObject>>,
}

impl MemoryMediaStore {
    /// Create a store whose URLs hang off `public_base`.
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            public_base: public_base.into().trim_end_matches('/').to_owned(),
            objects: RwLock::new(HashMap::new()),
        }
    }

    /// Number of stored objects.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size in bytes of the object at `path`, if present.
    pub fn size_of(&self, path: &str) -> Option<usize> {
        self.lock().get(path).map(|object| object.bytes.len())
    }

    fn lock(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, StoredObject>> {
        match self.objects.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn put(
        &self,
        path: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, MediaStoreError> {
        let mut objects = match self.objects.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        objects.insert(
            path.to_owned(),
            StoredObject {
                content_type: content_type.to_owned(),
                bytes,
            },
        );
        Ok(format!("{}/{path}", self.public_base))
    }

    async fn delete(&self, path: &str) -> Result<(), MediaStoreError> {
        let mut objects = match self.objects.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        objects
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| MediaStoreError::delete(format!("no object at {path}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn uploads_return_public_urls_under_the_base() {
        let store = MemoryMediaStore::new("https://media.example.test/");
        let url = store
            .put("vehicles/1_0_abc.jpg", "image/jpeg", vec![1, 2, 3])
            .await
            .expect("upload succeeds");
        assert_eq!(url, "https://media.example.test/vehicles/1_0_abc.jpg");
        assert_eq!(store.len(), 1);
        assert_eq!(store.size_of("vehicles/1_0_abc.jpg"), Some(3));
        assert_eq!(
            store.lock().get("vehicles/1_0_abc.jpg").map(|o| o.content_type.clone()),
            Some("image/jpeg".to_owned())
        );
    }

    #[tokio::test]
    async fn deleting_a_missing_object_fails() {
        let store = MemoryMediaStore::new("https://media.example.test");
        let error = store.delete("vehicles/missing.jpg").await.expect_err("missing");
        assert!(matches!(error, MediaStoreError::Delete { .. }));
    }
}
