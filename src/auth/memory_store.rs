use async_trait::async_trait;
use axum_login::tower_sessions::{
    ExpiredDeletion, SessionStore,
    cookie::time::OffsetDateTime,
    session::{Id, Record},
    session_store::Error as SSError,
};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;

/// Sessions (and the screen state kept in them) live only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    sessions: Arc<RwLock<HashMap<Id, Record>>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

fn is_live(record: &Record) -> bool {
    record.expiry_date > OffsetDateTime::now_utc()
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, session_record: &mut Record) -> Result<(), SSError> {
        let mut sessions = self.sessions.write().await;
        while sessions.contains_key(&session_record.id) {
            session_record.id = Id::default();
        }
        sessions.insert(session_record.id, session_record.clone());
        Ok(())
    }

    async fn save(&self, session_record: &Record) -> Result<(), SSError> {
        self.sessions
            .write()
            .await
            .insert(session_record.id, session_record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &Id) -> Result<Option<Record>, SSError> {
        Ok(self
            .sessions
            .read()
            .await
            .get(session_id)
            .filter(|record| is_live(record))
            .cloned())
    }

    async fn delete(&self, session_id: &Id) -> Result<(), SSError> {
        self.sessions.write().await.remove(session_id);
        Ok(())
    }
}

#[async_trait]
impl ExpiredDeletion for MemorySessionStore {
    async fn delete_expired(&self) -> Result<(), SSError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, record| is_live(record));

        let removed = before - sessions.len();
        if removed > 0 {
            debug!(removed, "deleted expired sessions");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum_login::tower_sessions::cookie::time::Duration;
    use std::collections::HashMap;

    fn record(expires_in: Duration) -> Record {
        Record {
            id: Id::default(),
            data: HashMap::default(),
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn saved_sessions_load_back() {
        let store = MemorySessionStore::new();
        let mut rec = record(Duration::hours(1));
        rec.data
            .insert("alunos_screen".into(), serde_json::json!({"search": "ana"}));

        store.create(&mut rec).await.unwrap();
        let loaded = store.load(&rec.id).await.unwrap().expect("session should exist");
        assert_eq!(loaded.data, rec.data);

        store.delete(&rec.id).await.unwrap();
        assert!(store.load(&rec.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_never_overwrites() {
        let store = MemorySessionStore::new();
        let mut first = record(Duration::hours(1));
        store.create(&mut first).await.unwrap();

        let mut second = record(Duration::hours(1));
        second.id = first.id;
        store.create(&mut second).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn expired_sessions_are_hidden_and_swept() {
        let store = MemorySessionStore::new();
        let mut old = record(Duration::hours(-1));
        let mut fresh = record(Duration::hours(1));
        store.create(&mut old).await.unwrap();
        store.create(&mut fresh).await.unwrap();

        assert!(store.load(&old.id).await.unwrap().is_none());
        store.delete_expired().await.unwrap();
        assert_eq!(store.len().await, 1);
        assert!(store.load(&fresh.id).await.unwrap().is_some());
    }
}
