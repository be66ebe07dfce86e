use std::path::PathBuf;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::accounts::model::User;
use crate::market::model::SellRequest;

/// Persistence boundary over the three records the app keeps: the user
/// collection, the sell-request collection and the session pointer.
///
/// `load_*` returning `None` means the collection has never been written —
/// distinct from an empty collection — which is what triggers the one-time
/// admin seed.
#[async_trait]
pub trait Store: Send + Sync {
    async fn load_users(&self) -> anyhow::Result<Option<Vec<User>>>;
    async fn save_users(&self, users: &[User]) -> anyhow::Result<()>;
    async fn load_requests(&self) -> anyhow::Result<Option<Vec<SellRequest>>>;
    async fn save_requests(&self, requests: &[SellRequest]) -> anyhow::Result<()>;
    async fn session_user_id(&self) -> anyhow::Result<Option<Uuid>>;
    async fn set_session_user_id(&self, id: Option<Uuid>) -> anyhow::Result<()>;
}

/// On-disk layout: one flat namespace with three well-known keys, so an
/// exported browser dump maps one-to-one.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct Document {
    #[serde(rename = "easyearn_users", default, skip_serializing_if = "Option::is_none")]
    users: Option<Vec<User>>,
    #[serde(rename = "easyearn_requests", default, skip_serializing_if = "Option::is_none")]
    requests: Option<Vec<SellRequest>>,
    #[serde(
        rename = "easyearn_current_user_id",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    current_user_id: Option<Uuid>,
}

/// Single JSON document on disk. Every operation rewrites the whole file;
/// the internal mutex keeps read-modify-write cycles from interleaving.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    async fn read(&self) -> anyhow::Result<Document> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).context("parse store file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Document::default()),
            Err(e) => Err(e).context("read store file"),
        }
    }

    async fn write(&self, doc: &Document) -> anyhow::Result<()> {
        let bytes = serde_json::to_vec_pretty(doc)?;
        tokio::fs::write(&self.path, bytes)
            .await
            .context("write store file")
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn load_users(&self) -> anyhow::Result<Option<Vec<User>>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.users)
    }

    async fn save_users(&self, users: &[User]) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read().await?;
        doc.users = Some(users.to_vec());
        self.write(&doc).await
    }

    async fn load_requests(&self) -> anyhow::Result<Option<Vec<SellRequest>>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.requests)
    }

    async fn save_requests(&self, requests: &[SellRequest]) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read().await?;
        doc.requests = Some(requests.to_vec());
        self.write(&doc).await
    }

    async fn session_user_id(&self) -> anyhow::Result<Option<Uuid>> {
        let _guard = self.lock.lock().await;
        Ok(self.read().await?.current_user_id)
    }

    async fn set_session_user_id(&self, id: Option<Uuid>) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut doc = self.read().await?;
        doc.current_user_id = id;
        self.write(&doc).await
    }
}

/// In-memory fake for tests, with the same absent-vs-empty semantics as the
/// file store.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Document>,
}

#[async_trait]
impl Store for MemoryStore {
    async fn load_users(&self) -> anyhow::Result<Option<Vec<User>>> {
        Ok(self.inner.lock().await.users.clone())
    }

    async fn save_users(&self, users: &[User]) -> anyhow::Result<()> {
        self.inner.lock().await.users = Some(users.to_vec());
        Ok(())
    }

    async fn load_requests(&self) -> anyhow::Result<Option<Vec<SellRequest>>> {
        Ok(self.inner.lock().await.requests.clone())
    }

    async fn save_requests(&self, requests: &[SellRequest]) -> anyhow::Result<()> {
        self.inner.lock().await.requests = Some(requests.to_vec());
        Ok(())
    }

    async fn session_user_id(&self) -> anyhow::Result<Option<Uuid>> {
        Ok(self.inner.lock().await.current_user_id)
    }

    async fn set_session_user_id(&self, id: Option<Uuid>) -> anyhow::Result<()> {
        self.inner.lock().await.current_user_id = id;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accounts::model::{UserRole, UserStatus};

    fn sample_user(email: &str) -> User {
        User {
            id: Uuid::new_v4(),
            full_name: "Test User".into(),
            email: email.into(),
            password_hash: "$argon2id$fake".into(),
            role: UserRole::User,
            status: UserStatus::PendingActivation,
            balance: 0,
            total_withdrawn: 0,
            activation_payment: None,
        }
    }

    #[tokio::test]
    async fn file_store_missing_file_reads_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("db.json"));
        assert!(store.load_users().await.unwrap().is_none());
        assert!(store.session_user_id().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn file_store_roundtrips_users_and_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.json");

        let user = sample_user("a@example.com");
        {
            let store = JsonFileStore::new(&path);
            store.save_users(&[user.clone()]).await.unwrap();
            store.set_session_user_id(Some(user.id)).await.unwrap();
        }

        // a fresh handle over the same file sees the state
        let store = JsonFileStore::new(&path);
        let users = store.load_users().await.unwrap().unwrap();
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].email, "a@example.com");
        assert_eq!(store.session_user_id().await.unwrap(), Some(user.id));
    }

    #[tokio::test]
    async fn empty_collection_is_not_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("db.json"));
        store.save_users(&[]).await.unwrap();
        let users = store.load_users().await.unwrap();
        assert!(matches!(users.as_deref(), Some([])));
    }

    #[tokio::test]
    async fn memory_store_clears_session() {
        let store = MemoryStore::default();
        let id = Uuid::new_v4();
        store.set_session_user_id(Some(id)).await.unwrap();
        assert_eq!(store.session_user_id().await.unwrap(), Some(id));
        store.set_session_user_id(None).await.unwrap();
        assert_eq!(store.session_user_id().await.unwrap(), None);
    }
}
