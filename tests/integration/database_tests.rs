//! Database integration tests
//!
//! Exercise the SeaORM store against a migrated in-memory SQLite database.

#[cfg(test)]
mod tests {
    use crate::common::fixtures::{StoreFactory, UserFactory};
    use crate::common::{TestDatabase, database::test_db_config};
    use crate::{assert_err, assert_ok};
    use serde_json::json;
    use storerate::StoreRateError;
    use storerate::audit::{AuditEvent, AuditEventType, AuditSink};
    use storerate::auth::rbac::Role;
    use storerate::auth::types::Actor;
    use storerate::storage::{AuthorizationStore, Database, DatabaseBackendType};

    #[tokio::test]
    async fn test_backend_detection() {
        let db = TestDatabase::new().await;
        assert!(matches!(db.db().backend_type(), DatabaseBackendType::SQLite));
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let db = TestDatabase::new().await;
        assert_ok!(db.db().migrate().await);
    }

    #[tokio::test]
    async fn test_unsupported_url_is_reported() {
        let mut config = test_db_config();
        config.url = "mysql://localhost/storerate".to_string();
        assert!(Database::new(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_insert_and_find_user() {
        let db = TestDatabase::new().await;
        let user = assert_ok!(db.db().insert_user(UserFactory::with_email("carol@example.com")).await);

        assert!(user.id > 0);
        assert_eq!(user.role, "normal_user");

        let found = db.db().find_user(user.id).await.unwrap().unwrap();
        assert_eq!(found.email, "carol@example.com");
        assert_eq!(found.password_hash, "hashed_password");
        assert!(db.db().find_user(user.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_rejected() {
        let db = TestDatabase::new().await;
        assert_ok!(db.db().insert_user(UserFactory::with_email("dup@example.com")).await);
        let err = assert_err!(db.db().insert_user(UserFactory::with_email("dup@example.com")).await);
        assert!(matches!(err, StoreRateError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_find_actor_keeps_stored_role() {
        let (db, seed) = TestDatabase::seeded().await;

        let record = db.db().find_actor(seed.owner.id).await.unwrap().unwrap();
        assert_eq!(record.role, "store_owner");
        assert_eq!(Actor::from_record(record).unwrap().role, Role::StoreOwner);

        db.set_raw_role(seed.owner.id, "superuser").await;
        let record = db.db().find_actor(seed.owner.id).await.unwrap().unwrap();
        assert_eq!(record.role, "superuser");
        assert!(Actor::from_record(record).is_none());

        assert!(db.db().find_actor(9999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ownership_lookups() {
        let (db, seed) = TestDatabase::seeded().await;
        let db = db.db();

        assert!(db.store_owned_by(seed.store.id, seed.owner.id).await.unwrap());
        assert!(!db.store_owned_by(seed.store.id, seed.alice.id).await.unwrap());
        assert!(!db.store_owned_by(9999, seed.owner.id).await.unwrap());

        assert!(db.rating_created_by(seed.bob_rating.id, seed.bob.id).await.unwrap());
        assert!(!db.rating_created_by(seed.bob_rating.id, seed.alice.id).await.unwrap());
        assert!(!db.rating_created_by(9999, seed.bob.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_unowned_store_is_owned_by_nobody() {
        let (db, seed) = TestDatabase::seeded().await;
        let store = db.db().insert_store(StoreFactory::owned_by(None)).await.unwrap();

        assert_eq!(store.owner_id, None);
        assert!(!db.db().store_owned_by(store.id, seed.owner.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_actor_role() {
        let (db, seed) = TestDatabase::seeded().await;

        assert!(db.db().update_actor_role(seed.alice.id, Role::StoreOwner).await.unwrap());
        let alice = db.db().find_user(seed.alice.id).await.unwrap().unwrap();
        assert_eq!(alice.role, "store_owner");

        assert!(!db.db().update_actor_role(9999, Role::StoreOwner).await.unwrap());
    }

    #[tokio::test]
    async fn test_store_aggregate() {
        let (db, seed) = TestDatabase::seeded().await;
        let db = db.db();

        db.insert_rating(seed.alice.id, seed.store.id, 1).await.unwrap();
        let store = db.find_store(seed.store.id).await.unwrap().unwrap();
        assert_eq!(store.rating_count, 2);
        assert_eq!(store.average_rating, Some(2.5));

        let empty = db.insert_store(StoreFactory::owned_by(None)).await.unwrap();
        let empty = db.find_store(empty.id).await.unwrap().unwrap();
        assert_eq!(empty.rating_count, 0);
        assert_eq!(empty.average_rating, None);
    }

    #[tokio::test]
    async fn test_rating_rules() {
        let (db, seed) = TestDatabase::seeded().await;
        let db = db.db();

        let err = assert_err!(db.insert_rating(seed.alice.id, seed.store.id, 0).await);
        assert!(matches!(err, StoreRateError::Validation(_)));

        // One rating per user and store
        let err = assert_err!(db.insert_rating(seed.bob.id, seed.store.id, 3).await);
        assert!(matches!(err, StoreRateError::Conflict(_)));
        assert!(!err.is_infrastructure());

        let updated = assert_ok!(db.update_rating(seed.bob_rating.id, 5).await);
        assert_eq!(updated.rating, 5);

        let err = assert_err!(db.update_rating(9999, 3).await);
        assert!(matches!(err, StoreRateError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_deleting_owner_keeps_store() {
        use sea_orm::ConnectionTrait;

        let (db, seed) = TestDatabase::seeded().await;
        let conn = db.db().connection();
        conn.execute_unprepared("PRAGMA foreign_keys = ON").await.unwrap();
        conn.execute_unprepared(&format!("DELETE FROM users WHERE id = {}", seed.owner.id))
            .await
            .unwrap();

        let store = db.db().find_store(seed.store.id).await.unwrap().unwrap();
        assert_eq!(store.owner_id, None);
    }

    #[tokio::test]
    async fn test_audit_events_round_trip() {
        let (db, seed) = TestDatabase::seeded().await;
        let db = db.db();

        let denied = AuditEvent::denied(AuditEventType::AccessDenied)
            .with_actor(seed.alice.id, "normal_user")
            .with_resource("rating", Some(seed.bob_rating.id.to_string()))
            .with_ip(Some("10.0.0.1".to_string()))
            .with_detail("rule", "ownership");
        db.insert_audit_event(&denied).await.unwrap();

        let granted = AuditEvent::granted(AuditEventType::RoleChanged)
            .with_actor(seed.admin.id, "system_admin")
            .with_detail("to", "store_owner");
        db.write(&granted).await.unwrap();

        let recent = db.recent_audit_events(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].event_type, AuditEventType::RoleChanged);
        assert!(recent[0].granted);
        assert_eq!(recent[1].ip.as_deref(), Some("10.0.0.1"));
        assert_eq!(recent[1].detail("rule"), Some(&json!("ownership")));

        let for_alice = db.audit_events_for_user(seed.alice.id, 10).await.unwrap();
        assert_eq!(for_alice.len(), 1);
        assert_eq!(for_alice[0].resource_type.as_deref(), Some("rating"));

        assert_eq!(db.recent_audit_events(1).await.unwrap().len(), 1);
        assert_eq!(db.stats().await.unwrap().audit_events, 2);
    }
}
