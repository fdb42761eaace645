//! End-to-end authorization flows over HTTP
//!
//! Every request goes through the real application: request id middleware,
//! the authorization pipelines on each resource, the SeaORM store and the
//! database audit sink.

#[cfg(test)]
mod tests {
    use crate::common::TestApp;
    use crate::common::app::test_config;
    use crate::common::fixtures::{StoreFactory, UserFactory};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use sea_orm::ConnectionTrait;
    use serde_json::{Value, json};
    use storerate::audit::AuditEventType;
    use storerate::auth::rbac::Role;
    use storerate::server::HttpServer;
    use storerate::storage::AuthorizationStore;

    #[actix_web::test]
    async fn test_editing_foreign_rating_is_denied_and_audited_once() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;
        let seed = &app.seed;

        let req = test::TestRequest::put()
            .uri(&format!("/api/ratings/{}", seed.bob_rating.id))
            .insert_header(app.bearer(&seed.alice))
            .set_json(json!({ "rating": 1 }))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "FORBIDDEN");
        assert_eq!(body["message"], "Access denied");
        assert!(body.get("details").is_none());

        let events = app.audit_events().await;
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.event_type, AuditEventType::AccessDenied);
        assert_eq!(event.user_id, Some(seed.alice.id));
        assert_eq!(event.actor_role.as_deref(), Some("normal_user"));
        assert_eq!(event.resource_type.as_deref(), Some("rating"));
        assert_eq!(event.resource_id, Some(seed.bob_rating.id.to_string()));
        assert!(!event.granted);
        assert_eq!(event.detail("rule"), Some(&json!("ownership")));

        let store = app.db.db().find_store(seed.store.id).await.unwrap().unwrap();
        assert_eq!(store.average_rating, Some(4.0));
    }

    #[actix_web::test]
    async fn test_author_can_edit_own_rating() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;
        let seed = &app.seed;

        let req = test::TestRequest::put()
            .uri(&format!("/api/ratings/{}", seed.bob_rating.id))
            .insert_header(app.bearer(&seed.bob))
            .set_json(json!({ "rating": 2 }))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["rating"], 2);
        assert!(app.audit_events().await.is_empty());
    }

    #[actix_web::test]
    async fn test_missing_rating_is_denied_like_foreign_rating() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;

        let req = test::TestRequest::put()
            .uri("/api/ratings/9999")
            .insert_header(app.bearer(&app.seed.alice))
            .set_json(json!({ "rating": 3 }))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Access denied");
    }

    #[actix_web::test]
    async fn test_missing_token_is_unauthenticated() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;

        let req = test::TestRequest::get()
            .uri(&format!("/api/stores/{}", app.seed.store.id))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "UNAUTHENTICATED");

        let events = app.audit_events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, AuditEventType::MissingToken);
        assert_eq!(events[0].user_id, None);
    }

    #[actix_web::test]
    async fn test_expired_token_is_unauthenticated() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;
        let jwt = app.state.auth.jwt();

        let mut claims = jwt.access_claims(app.seed.alice.id, Role::NormalUser).unwrap();
        claims.iat -= 7200;
        claims.exp = claims.iat + 60;
        let token = jwt.sign(&claims).unwrap();

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Token has expired");

        let events = app.audit_events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, AuditEventType::TokenExpired);
    }

    #[actix_web::test]
    async fn test_stale_role_claim_is_rejected() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;
        let seed = &app.seed;

        // Issued as normal_user, then promoted
        let header = app.bearer(&seed.alice);
        app.db.set_raw_role(seed.alice.id, "store_owner").await;

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(header)
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Invalid token");

        let events = app.audit_events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, AuditEventType::InvalidToken);
        assert_eq!(events[0].user_id, Some(seed.alice.id));
    }

    #[actix_web::test]
    async fn test_undefined_stored_role_fails_authentication() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;
        let seed = &app.seed;

        let header = app.bearer(&seed.alice);
        app.db.set_raw_role(seed.alice.id, "superuser").await;

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(header)
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_lookup_failure_is_a_server_error() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;
        let seed = &app.seed;

        app.db
            .db()
            .connection()
            .execute_unprepared("DROP TABLE ratings")
            .await
            .unwrap();

        let req = test::TestRequest::put()
            .uri(&format!("/api/ratings/{}", seed.bob_rating.id))
            .insert_header(app.bearer(&seed.bob))
            .set_json(json!({ "rating": 5 }))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "INFRA_ERROR");
        assert!(!body["message"].as_str().unwrap().contains("ratings"));

        let events = app.audit_events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, AuditEventType::AuthorizationError);
        assert_eq!(events[0].user_id, Some(seed.bob.id));
    }

    #[actix_web::test]
    async fn test_dev_mode_exposes_denial_reason() {
        let mut config = test_config();
        config.app.server.dev_mode = true;
        let app = TestApp::with_config(config).await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/ratings/{}", app.seed.bob_rating.id))
            .insert_header(app.bearer(&app.seed.alice))
            .set_json(json!({ "rating": 1 }))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["details"].as_str().unwrap().contains("does not own rating"));
    }

    #[actix_web::test]
    async fn test_me_lists_sorted_permissions() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(app.bearer(&app.seed.alice))
            .to_request();
        let body: Value = test::call_and_read_body_json(&svc, req).await;

        assert_eq!(body["data"]["user"]["id"], app.seed.alice.id);
        assert_eq!(body["data"]["user"]["role"], "normal_user");
        let permissions: Vec<String> = body["data"]["permissions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p.as_str().unwrap().to_string())
            .collect();
        assert!(permissions.contains(&"rating:create".to_string()));
        assert!(!permissions.contains(&"user:manage_roles".to_string()));
        let mut sorted = permissions.clone();
        sorted.sort();
        assert_eq!(permissions, sorted);
    }

    #[actix_web::test]
    async fn test_user_profile_visibility() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;
        let seed = &app.seed;

        // Own profile
        let req = test::TestRequest::get()
            .uri(&format!("/api/users/{}", seed.alice.id))
            .insert_header(app.bearer(&seed.alice))
            .to_request();
        let body: Value = test::call_and_read_body_json(&svc, req).await;
        assert_eq!(body["data"]["email"], seed.alice.email.as_str());
        assert_eq!(body["data"]["is_self"], true);
        assert!(body["data"].get("password_hash").is_none());

        // Someone else's profile
        let req = test::TestRequest::get()
            .uri(&format!("/api/users/{}", seed.bob.id))
            .insert_header(app.bearer(&seed.alice))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        // Top authority bypasses ownership
        let req = test::TestRequest::get()
            .uri(&format!("/api/users/{}", seed.bob.id))
            .insert_header(app.bearer(&seed.admin))
            .to_request();
        let body: Value = test::call_and_read_body_json(&svc, req).await;
        assert_eq!(body["data"]["email"], seed.bob.email.as_str());
        assert_eq!(body["data"]["can_change_role"], true);
    }

    #[actix_web::test]
    async fn test_store_view_depends_on_viewer() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;
        let seed = &app.seed;
        let uri = format!("/api/stores/{}", seed.store.id);

        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(app.bearer(&seed.alice))
            .to_request();
        let body: Value = test::call_and_read_body_json(&svc, req).await;
        assert_eq!(body["data"]["rating_count"], 1);
        assert!(body["data"].get("owner_id").is_none());
        assert_eq!(body["data"]["is_owner"], false);
        assert_eq!(body["data"]["can_rate"], true);

        let req = test::TestRequest::get()
            .uri(&uri)
            .insert_header(app.bearer(&seed.owner))
            .to_request();
        let body: Value = test::call_and_read_body_json(&svc, req).await;
        assert_eq!(body["data"]["owner_id"], seed.owner.id);
        assert_eq!(body["data"]["is_owner"], true);
        assert_eq!(body["data"]["can_rate"], false);

        let req = test::TestRequest::get()
            .uri("/api/stores/9999")
            .insert_header(app.bearer(&seed.alice))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_rating_a_store() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;
        let seed = &app.seed;
        let uri = format!("/api/stores/{}/ratings", seed.store.id);

        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(app.bearer(&seed.alice))
            .set_json(json!({ "rating": 5 }))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);

        let store = app.db.db().find_store(seed.store.id).await.unwrap().unwrap();
        assert_eq!(store.rating_count, 2);
        assert_eq!(store.average_rating, Some(4.5));

        // Second rating for the same store
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(app.bearer(&seed.bob))
            .set_json(json!({ "rating": 3 }))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "CONFLICT");

        let store = app.db.db().find_store(seed.store.id).await.unwrap().unwrap();
        assert_eq!(store.rating_count, 2);
        assert!(app.audit_events().await.is_empty());

        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(app.bearer(&seed.bob))
            .set_json(json!({ "rating": 9 }))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        // Store owners cannot rate stores at all
        let req = test::TestRequest::post()
            .uri(&uri)
            .insert_header(app.bearer(&seed.owner))
            .set_json(json!({ "rating": 5 }))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_owner_lists_own_stores() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;
        let seed = &app.seed;
        app.db
            .db()
            .insert_store(StoreFactory::owned_by(None))
            .await
            .unwrap();

        let req = test::TestRequest::get()
            .uri("/api/owner/stores")
            .insert_header(app.bearer(&seed.owner))
            .to_request();
        let body: Value = test::call_and_read_body_json(&svc, req).await;
        let stores = body["data"].as_array().unwrap();
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0]["id"], seed.store.id);
        assert_eq!(stores[0]["is_owner"], true);
        assert_eq!(stores[0]["average_rating"], 4.0);

        let req = test::TestRequest::get()
            .uri("/api/owner/stores")
            .insert_header(app.bearer(&seed.alice))
            .to_request();
        assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_admin_changes_role_and_old_token_stops_working() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;
        let seed = &app.seed;
        let alice_header = app.bearer(&seed.alice);

        let req = test::TestRequest::put()
            .uri(&format!("/api/users/{}/role", seed.alice.id))
            .insert_header(app.bearer(&seed.admin))
            .set_json(json!({ "role": "store_owner" }))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"]["role"], "store_owner");

        let events = app.audit_events().await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, AuditEventType::RoleChanged);
        assert!(events[0].granted);
        assert_eq!(events[0].user_id, Some(seed.admin.id));
        assert_eq!(events[0].detail("from"), Some(&json!("normal_user")));
        assert_eq!(events[0].detail("to"), Some(&json!("store_owner")));

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(alice_header)
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_role_change_restrictions() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;
        let seed = &app.seed;
        let peer = app.db.db().insert_user(UserFactory::admin()).await.unwrap();

        let change = |target: i64, role: &str| {
            test::TestRequest::put()
                .uri(&format!("/api/users/{}/role", target))
                .set_json(json!({ "role": role }))
        };

        // Own role
        let req = change(seed.admin.id, "normal_user")
            .insert_header(app.bearer(&seed.admin))
            .to_request();
        assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::FORBIDDEN);

        // Peer at the same rank
        let req = change(peer.id, "normal_user")
            .insert_header(app.bearer(&seed.admin))
            .to_request();
        assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::FORBIDDEN);

        // Missing permission
        let req = change(seed.alice.id, "store_owner")
            .insert_header(app.bearer(&seed.owner))
            .to_request();
        assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::FORBIDDEN);

        // Unknown role name
        let req = change(seed.alice.id, "superuser")
            .insert_header(app.bearer(&seed.admin))
            .to_request();
        assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::BAD_REQUEST);

        let events = app.audit_events().await;
        let denied: Vec<_> = events
            .iter()
            .filter(|e| e.event_type == AuditEventType::AccessDenied)
            .collect();
        assert_eq!(denied.len(), 3);
        assert!(denied.iter().all(|e| !e.granted));

        let unchanged = app.db.db().find_user(peer.id).await.unwrap().unwrap();
        assert_eq!(unchanged.role, "system_admin");
    }

    #[actix_web::test]
    async fn test_audit_endpoint_requires_admin() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;
        let seed = &app.seed;

        let req = test::TestRequest::get()
            .uri("/api/admin/audit-events")
            .insert_header(app.bearer(&seed.alice))
            .to_request();
        assert_eq!(test::call_service(&svc, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get()
            .uri(&format!("/api/admin/audit-events?user_id={}", seed.alice.id))
            .insert_header(app.bearer(&seed.admin))
            .to_request();
        let body: Value = test::call_and_read_body_json(&svc, req).await;

        let events = body["data"].as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["event_type"], "ACCESS_DENIED");
        assert_eq!(events[0]["details"]["rule"], "role");
        assert_eq!(body["meta"]["limit"], 50);
    }

    #[actix_web::test]
    async fn test_request_id_is_echoed() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;

        let req = test::TestRequest::get()
            .uri("/health")
            .insert_header(("x-request-id", "req-123"))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("x-request-id").unwrap(), "req-123");

        let req = test::TestRequest::get()
            .uri("/health")
            .insert_header(("x-request-id", "bad id with spaces"))
            .to_request();
        let resp = test::call_service(&svc, req).await;
        let generated = resp.headers().get("x-request-id").unwrap().to_str().unwrap();
        assert_ne!(generated, "bad id with spaces");
        assert_eq!(generated.len(), 36);
    }

    #[actix_web::test]
    async fn test_detailed_health_reports_stats() {
        let app = TestApp::new().await;
        let svc = test::init_service(HttpServer::create_app(app.state.clone())).await;

        let req = test::TestRequest::get().uri("/health/detailed").to_request();
        let resp = test::call_service(&svc, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
