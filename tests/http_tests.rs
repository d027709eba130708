//! End-to-end tests of the HTTP surface with axum-test
//!
//! Each test builds the full router over a fresh in-memory store holding one
//! user per role and the rows that valid payloads reference.

mod fixtures;

use axum::http::StatusCode;
use axum_test::TestServer;
use fixtures::{References, record, seed_references, valid_payload};
use payroll::core::credentials::hash_password;
use payroll::core::entity::EntityType;
use payroll::core::store::RecordStore;
use payroll::schemas::SchemaRegistry;
use payroll::server::seed::{DEFAULT_EMAIL, DEFAULT_PASSWORD, seed_default_user};
use payroll::server::{AppState, TokenIssuer, build_router};
use payroll::storage::InMemoryRecordStore;
use serde_json::{Value, json};
use std::sync::Arc;

const SECRET: &str = "test-secret";

struct TestApp {
    server: TestServer,
    store: InMemoryRecordStore,
    refs: References,
    level1: String,
    level2: String,
    level3: String,
}

async fn insert_user(store: &InMemoryRecordStore, email: &str, role: &str) -> String {
    store
        .insert(
            EntityType::User,
            record(json!({
                "name": role,
                "email": email,
                "password_hash": hash_password("password").unwrap(),
                "role": role,
            })),
        )
        .await
        .unwrap()
}

async fn create_test_app() -> TestApp {
    let store = InMemoryRecordStore::new();
    let refs = seed_references(&store).await;
    let tokens = TokenIssuer::new(SECRET, 30);

    let mut bearer = Vec::new();
    for role in ["level1", "level2", "level3"] {
        let id = insert_user(&store, &format!("{role}@example.com"), role).await;
        bearer.push(tokens.issue(&id).unwrap());
    }
    let [level1, level2, level3]: [String; 3] = bearer.try_into().unwrap();

    let state = AppState::new(Arc::new(store.clone()), SchemaRegistry::standard(), tokens);
    let server = TestServer::try_new(build_router(state)).expect("Failed to create test server");

    TestApp {
        server,
        store,
        refs,
        level1,
        level2,
        level3,
    }
}

fn envelope(entity: EntityType, payload: Value) -> Value {
    let mut body = serde_json::Map::new();
    body.insert(entity.singular().to_string(), payload);
    Value::Object(body)
}

fn collection(entity: EntityType) -> String {
    format!("/api/v1/{}", entity.table_name())
}

fn member(entity: EntityType, id: &str) -> String {
    format!("/api/v1/{}/{}", entity.table_name(), id)
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app().await;

    let response = app.server.get("/health").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["status"], "ok");
}

// =============================================================================
// Authentication
// =============================================================================

mod auth_tests {
    use super::*;

    #[tokio::test]
    async fn test_log_in_with_default_user() {
        let app = create_test_app().await;
        seed_default_user(&app.store).await.unwrap();

        let response = app
            .server
            .post("/api/v1/auth/log_in")
            .json(&json!({ "email": DEFAULT_EMAIL.to_uppercase(), "password": DEFAULT_PASSWORD }))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["email"], DEFAULT_EMAIL);
        assert_eq!(body["role"], "level1");
        assert!(body["token"].as_str().is_some());
        assert!(body.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn test_log_in_with_wrong_password() {
        let app = create_test_app().await;

        let response = app
            .server
            .post("/api/v1/auth/log_in")
            .json(&json!({ "email": "level1@example.com", "password": "letmein!" }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_log_in_with_unknown_email() {
        let app = create_test_app().await;

        let response = app
            .server
            .post("/api/v1/auth/log_in")
            .json(&json!({ "email": "nobody@example.com", "password": "password" }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_verify_requires_token() {
        let app = create_test_app().await;

        let response = app.server.get("/api/v1/auth/verify").await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_verify_rejects_garbage() {
        let app = create_test_app().await;

        let response = app.server.get("/api/v1/auth/verify?token=not.a.jwt").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_verify_rejects_other_secret() {
        let app = create_test_app().await;
        let forged = TokenIssuer::new("another-secret", 30).issue("someone").unwrap();

        let response = app
            .server
            .get(&format!("/api/v1/auth/verify?token={forged}"))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_verify_returns_fresh_token() {
        let app = create_test_app().await;

        let response = app
            .server
            .get(&format!("/api/v1/auth/verify?token={}", app.level2))
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["role"], "level2");
        assert!(body["token"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_token_of_deleted_user_is_rejected() {
        let app = create_test_app().await;
        let id = insert_user(&app.store, "gone@example.com", "level1").await;
        let token = TokenIssuer::new(SECRET, 30).issue(&id).unwrap();
        app.store.delete(EntityType::User, &id).await.unwrap();

        let response = app
            .server
            .get(&collection(EntityType::Project))
            .authorization_bearer(&token)
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }
}

// =============================================================================
// Role gating
// =============================================================================

mod access_tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_is_unauthorized() {
        let app = create_test_app().await;

        let response = app.server.get(&collection(EntityType::Position)).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_level3_cannot_read_positions() {
        let app = create_test_app().await;

        let response = app
            .server
            .get(&collection(EntityType::Position))
            .authorization_bearer(&app.level3)
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_level2_reads_but_cannot_write() {
        let app = create_test_app().await;

        let response = app
            .server
            .get(&collection(EntityType::Position))
            .authorization_bearer(&app.level2)
            .await;
        response.assert_status_ok();

        let response = app
            .server
            .post(&collection(EntityType::Position))
            .authorization_bearer(&app.level2)
            .json(&envelope(
                EntityType::Position,
                valid_payload(EntityType::Position, &app.refs),
            ))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_any_role_reads_payroll_histories() {
        let app = create_test_app().await;

        let response = app
            .server
            .get(&collection(EntityType::WeeklyPayrollHistory))
            .authorization_bearer(&app.level3)
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["weekly_payroll_histories"], json!([]));
    }

    #[tokio::test]
    async fn test_forbidden_write_does_not_validate() {
        let app = create_test_app().await;

        let response = app
            .server
            .post(&collection(EntityType::Project))
            .authorization_bearer(&app.level3)
            .json(&json!({}))
            .await;
        response.assert_status(StatusCode::FORBIDDEN);
    }
}

// =============================================================================
// CRUD
// =============================================================================

mod crud_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_then_list() {
        let app = create_test_app().await;

        let response = app
            .server
            .post(&collection(EntityType::InsuranceCompany))
            .authorization_bearer(&app.level1)
            .json(&envelope(
                EntityType::InsuranceCompany,
                json!({ "code": " IC-9 ", "name": "Cover All", "rating": "AAA" }),
            ))
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let response = app
            .server
            .get(&collection(EntityType::InsuranceCompany))
            .authorization_bearer(&app.level2)
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        let companies = body["insurance_companies"].as_array().unwrap();
        assert_eq!(companies.len(), 2);
        let created = &companies[1];
        assert_eq!(created["code"], "IC-9");
        assert!(created.get("rating").is_none());
        assert!(created["id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_create_with_string_envelope() {
        let app = create_test_app().await;
        let payload = valid_payload(EntityType::Subcontract, &app.refs).to_string();

        let response = app
            .server
            .post(&collection(EntityType::Subcontract))
            .authorization_bearer(&app.level1)
            .json(&json!({ "subcontract": payload }))
            .await;
        response.assert_status(StatusCode::NO_CONTENT);
        assert_eq!(app.store.count(EntityType::Subcontract).unwrap(), 2);
    }

    #[tokio::test]
    async fn test_string_envelope_with_bad_json() {
        let app = create_test_app().await;

        let response = app
            .server
            .post(&collection(EntityType::Subcontract))
            .authorization_bearer(&app.level1)
            .json(&json!({ "subcontract": "{not json" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_payload_is_unprocessable() {
        let app = create_test_app().await;

        let response = app
            .server
            .post(&collection(EntityType::Position))
            .authorization_bearer(&app.level1)
            .json(&envelope(
                EntityType::Position,
                json!({ "code": "X", "name": "Y", "minimum_pay": 50, "maximum_pay": 20 }),
            ))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json();
        assert_eq!(
            body,
            json!({
                "errors": [
                    { "attribute": "minimum_pay", "message": "must be lower than maximum pay" },
                    { "attribute": "maximum_pay", "message": "must be higher than minimum pay" }
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_missing_envelope_reports_blank_fields() {
        let app = create_test_app().await;

        let response = app
            .server
            .post(&collection(EntityType::InsuranceCompany))
            .authorization_bearer(&app.level1)
            .json(&json!({ "code": "IC-3", "name": "Wrong key" }))
            .await;
        response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

        let body: Value = response.json();
        assert_eq!(body["errors"][0]["message"], "can't be blank");
    }

    #[tokio::test]
    async fn test_get_one() {
        let app = create_test_app().await;

        let response = app
            .server
            .get(&member(EntityType::Project, &app.refs.project_id))
            .authorization_bearer(&app.level1)
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        assert_eq!(body["project"]["name"], "Harbour Bridge");
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let app = create_test_app().await;

        let response = app
            .server
            .get(&member(EntityType::Project, "00000000-0000-4000-8000-000000000000"))
            .authorization_bearer(&app.level1)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_update_existing() {
        let app = create_test_app().await;
        let mut payload = valid_payload(EntityType::Project, &app.refs);
        payload["name"] = json!("Harbour Tunnel");

        let response = app
            .server
            .put(&member(EntityType::Project, &app.refs.project_id))
            .authorization_bearer(&app.level1)
            .json(&envelope(EntityType::Project, payload))
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let stored = app
            .store
            .find_by_id(EntityType::Project, &app.refs.project_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored["name"], "Harbour Tunnel");
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let app = create_test_app().await;

        let response = app
            .server
            .put(&member(EntityType::Project, "00000000-0000-4000-8000-000000000000"))
            .authorization_bearer(&app.level1)
            .json(&envelope(
                EntityType::Project,
                valid_payload(EntityType::Project, &app.refs),
            ))
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let app = create_test_app().await;
        let path = member(EntityType::InsuranceCompany, &app.refs.insurance_company_id);

        let response = app
            .server
            .delete(&path)
            .authorization_bearer(&app.level1)
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let response = app
            .server
            .delete(&path)
            .authorization_bearer(&app.level1)
            .await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete_referenced_record_is_conflict() {
        let app = create_test_app().await;
        let subcontract = member(EntityType::Subcontract, &app.refs.subcontract_id);

        let response = app
            .server
            .delete(&subcontract)
            .authorization_bearer(&app.level1)
            .await;
        response.assert_status(StatusCode::CONFLICT);

        let body: Value = response.json();
        assert_eq!(body["code"], "CONFLICT");
        assert!(
            app.store
                .find_by_id(EntityType::Subcontract, &app.refs.subcontract_id)
                .await
                .unwrap()
                .is_some()
        );

        let response = app
            .server
            .delete(&member(EntityType::Employee, &app.refs.employee_id))
            .authorization_bearer(&app.level1)
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let response = app
            .server
            .delete(&subcontract)
            .authorization_bearer(&app.level1)
            .await;
        response.assert_status(StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_delete_employee_with_payroll_entries_is_conflict() {
        let app = create_test_app().await;

        let response = app
            .server
            .post(&collection(EntityType::WeeklyPayrollHistory))
            .authorization_bearer(&app.level1)
            .json(&envelope(
                EntityType::WeeklyPayrollHistory,
                valid_payload(EntityType::WeeklyPayrollHistory, &app.refs),
            ))
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let response = app
            .server
            .delete(&member(EntityType::Employee, &app.refs.employee_id))
            .authorization_bearer(&app.level1)
            .await;
        response.assert_status(StatusCode::CONFLICT);
    }
}

// =============================================================================
// Transforms
// =============================================================================

mod transform_tests {
    use super::*;

    #[tokio::test]
    async fn test_created_user_has_hash_and_no_plaintext() {
        let app = create_test_app().await;

        let response = app
            .server
            .post(&collection(EntityType::User))
            .authorization_bearer(&app.level1)
            .json(&envelope(
                EntityType::User,
                valid_payload(EntityType::User, &app.refs),
            ))
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let stored = app
            .store
            .find_first_where(EntityType::User, "email", &json!("pat@example.com"))
            .await
            .unwrap()
            .unwrap();
        assert!(stored["password_hash"].as_str().unwrap().starts_with("$argon2id$"));
        assert!(!stored.contains_key("password"));
        assert!(!stored.contains_key("password_confirmation"));

        let response = app
            .server
            .post("/api/v1/auth/log_in")
            .json(&json!({ "email": "pat@example.com", "password": "correct horse" }))
            .await;
        response.assert_status_ok();
    }

    #[tokio::test]
    async fn test_password_hash_is_never_returned() {
        let app = create_test_app().await;

        let response = app
            .server
            .get(&collection(EntityType::User))
            .authorization_bearer(&app.level1)
            .await;
        response.assert_status_ok();

        let body: Value = response.json();
        let users = body["users"].as_array().unwrap();
        assert_eq!(users.len(), 3);
        assert!(users.iter().all(|u| u.get("password_hash").is_none()));
    }

    #[tokio::test]
    async fn test_user_update_without_password_keeps_hash() {
        let app = create_test_app().await;
        let id = insert_user(&app.store, "kim@example.com", "level2").await;
        let before = app
            .store
            .find_by_id(EntityType::User, &id)
            .await
            .unwrap()
            .unwrap();

        let response = app
            .server
            .put(&member(EntityType::User, &id))
            .authorization_bearer(&app.level1)
            .json(&envelope(
                EntityType::User,
                json!({
                    "name": "Kim",
                    "email": "kim@example.com",
                    "password": "",
                    "password_confirmation": "",
                    "role": "level1",
                }),
            ))
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let after = app
            .store
            .find_by_id(EntityType::User, &id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(after["password_hash"], before["password_hash"]);
        assert_eq!(after["role"], "level1");
    }

    #[tokio::test]
    async fn test_payroll_entry_snapshots_employee() {
        let app = create_test_app().await;

        let response = app
            .server
            .post(&collection(EntityType::WeeklyPayrollHistory))
            .authorization_bearer(&app.level2)
            .json(&envelope(
                EntityType::WeeklyPayrollHistory,
                valid_payload(EntityType::WeeklyPayrollHistory, &app.refs),
            ))
            .await;
        response.assert_status(StatusCode::NO_CONTENT);

        let entries = app.store.list(EntityType::WeeklyPayrollHistory).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["employee_position"], "Carpenter");
        assert_eq!(entries[0]["employee_hourly_rate"], 20);
        assert_eq!(entries[0]["employee_overtime_rate"], 30);
    }
}
