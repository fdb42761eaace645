//! In-process doubles shared by unit tests

use crate::audit::{AuditEvent, AuditSink};
use crate::auth::rbac::Role;
use crate::storage::AuthorizationStore;
use crate::storage::models::{ActorRecord, StoreRecord, UserRecord};
use crate::utils::error::{Result, StoreRateError};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Map-backed [`AuthorizationStore`] that can be switched into failure
#[derive(Default)]
pub struct InMemoryStore {
    actors: Mutex<HashMap<i64, ActorRecord>>,
    /// store id -> owner id
    stores: Mutex<HashMap<i64, Option<i64>>>,
    /// rating id -> author id
    ratings: Mutex<HashMap<i64, i64>>,
    failing: AtomicBool,
    lookups: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_actor(self, id: i64, role: &str) -> Self {
        self.actors.lock().unwrap().insert(
            id,
            ActorRecord {
                id,
                name: format!("Actor {}", id),
                email: format!("actor{}@example.com", id),
                role: role.to_string(),
            },
        );
        self
    }

    pub fn with_store(self, id: i64, owner_id: Option<i64>) -> Self {
        self.stores.lock().unwrap().insert(id, owner_id);
        self
    }

    pub fn with_rating(self, id: i64, user_id: i64) -> Self {
        self.ratings.lock().unwrap().insert(id, user_id);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of persistence calls served so far
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    fn enter(&self) -> Result<()> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreRateError::infra("database unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl AuthorizationStore for InMemoryStore {
    async fn find_actor(&self, id: i64) -> Result<Option<ActorRecord>> {
        self.enter()?;
        Ok(self.actors.lock().unwrap().get(&id).cloned())
    }

    async fn store_owned_by(&self, store_id: i64, actor_id: i64) -> Result<bool> {
        self.enter()?;
        Ok(self.stores.lock().unwrap().get(&store_id) == Some(&Some(actor_id)))
    }

    async fn rating_created_by(&self, rating_id: i64, actor_id: i64) -> Result<bool> {
        self.enter()?;
        Ok(self.ratings.lock().unwrap().get(&rating_id) == Some(&actor_id))
    }

    async fn find_user(&self, id: i64) -> Result<Option<UserRecord>> {
        self.enter()?;
        Ok(self.actors.lock().unwrap().get(&id).map(|a| UserRecord {
            id: a.id,
            name: a.name.clone(),
            email: a.email.clone(),
            address: None,
            role: a.role.clone(),
            password_hash: String::new(),
            created_at: Utc::now(),
        }))
    }

    async fn find_store(&self, id: i64) -> Result<Option<StoreRecord>> {
        self.enter()?;
        Ok(self
            .stores
            .lock()
            .unwrap()
            .get(&id)
            .map(|owner_id| StoreRecord {
                id,
                name: format!("Store {}", id),
                email: format!("store{}@example.com", id),
                address: None,
                owner_id: *owner_id,
                average_rating: None,
                rating_count: 0,
                created_at: Utc::now(),
            }))
    }

    async fn update_actor_role(&self, id: i64, role: Role) -> Result<bool> {
        self.enter()?;
        Ok(match self.actors.lock().unwrap().get_mut(&id) {
            Some(actor) => {
                actor.role = role.as_str().to_string();
                true
            }
            None => false,
        })
    }
}

/// Audit sink keeping every event in memory
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<AuditEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuditSink for RecordingSink {
    async fn write(&self, event: &AuditEvent) -> Result<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
