//! Macro-generated conformance suite for `RecordStore` implementations.
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_insert_and_find`: insert then fetch, managed fields are set
//! - `test_find_nonexistent`: unknown id returns None
//! - `test_list_empty` / `test_list_in_insertion_order`
//! - `test_entity_types_are_isolated`: rows never leak across types
//! - `test_update_merges_changes`: unspecified attributes survive
//! - `test_update_keeps_identity`: `id` and `create_date` are not writable
//! - `test_update_nonexistent`: returns false
//! - `test_delete_existing` / `test_delete_nonexistent`
//!
//! ## Lookup
//! - `test_find_first_where_string` / `test_find_first_where_number`
//! - `test_find_first_where_no_match`
//!
//! ## Edge Cases
//! - `test_concurrent_inserts`: parallel inserts from spawned tasks

/// Generate the `RecordStore` conformance suite.
///
/// `$factory` must evaluate to a fresh, empty store. It is re-evaluated for
/// each test. The concurrent test also needs the store to be `Clone + 'static`.
#[macro_export]
macro_rules! record_store_tests {
    ($factory:expr) => {
        mod record_store_contract_tests {
            use super::*;
            use payroll::core::entity::EntityType;
            use payroll::core::store::{CREATED_FIELD, ID_FIELD, RecordStore, UPDATED_FIELD};
            use serde_json::{Value, json};

            // ==================================================================
            // CRUD
            // ==================================================================

            #[tokio::test]
            async fn test_insert_and_find() {
                let store = $factory;
                let id = store
                    .insert(EntityType::Project, project("Bridge", 5000))
                    .await
                    .unwrap();

                let found = store
                    .find_by_id(EntityType::Project, &id)
                    .await
                    .unwrap()
                    .expect("record should exist after insert");
                assert_eq!(found[ID_FIELD], Value::String(id.clone()));
                assert_eq!(found["name"], "Bridge");
                assert_eq!(found["budget"], 5000);
                assert_eq!(found["active"], true);
                assert!(found.contains_key(CREATED_FIELD));
                assert!(found.contains_key(UPDATED_FIELD));
            }

            #[tokio::test]
            async fn test_find_nonexistent() {
                let store = $factory;
                let found = store
                    .find_by_id(EntityType::Project, &uuid::Uuid::new_v4().to_string())
                    .await
                    .unwrap();
                assert!(found.is_none());
            }

            #[tokio::test]
            async fn test_list_empty() {
                let store = $factory;
                assert!(store.list(EntityType::Employee).await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_list_in_insertion_order() {
                let store = $factory;
                let mut expected = Vec::new();
                for row in sample_projects(5) {
                    expected.push(store.insert(EntityType::Project, row).await.unwrap());
                }

                let ids: Vec<String> = store
                    .list(EntityType::Project)
                    .await
                    .unwrap()
                    .iter()
                    .map(|r| r[ID_FIELD].as_str().unwrap().to_string())
                    .collect();
                assert_eq!(ids, expected);
            }

            #[tokio::test]
            async fn test_entity_types_are_isolated() {
                let store = $factory;
                let id = store
                    .insert(EntityType::Project, project("Bridge", 1))
                    .await
                    .unwrap();

                assert!(store.find_by_id(EntityType::Position, &id).await.unwrap().is_none());
                assert!(store.list(EntityType::Position).await.unwrap().is_empty());
                assert!(!store.delete(EntityType::Position, &id).await.unwrap());
            }

            #[tokio::test]
            async fn test_update_merges_changes() {
                let store = $factory;
                let id = store
                    .insert(EntityType::Project, project("Bridge", 5000))
                    .await
                    .unwrap();

                let updated = store
                    .update(EntityType::Project, &id, record(json!({ "budget": 7500 })))
                    .await
                    .unwrap();
                assert!(updated);

                let found = store.find_by_id(EntityType::Project, &id).await.unwrap().unwrap();
                assert_eq!(found["budget"], 7500);
                assert_eq!(found["name"], "Bridge");
            }

            #[tokio::test]
            async fn test_update_keeps_identity() {
                let store = $factory;
                let id = store
                    .insert(EntityType::Project, project("Bridge", 5000))
                    .await
                    .unwrap();
                let before = store.find_by_id(EntityType::Project, &id).await.unwrap().unwrap();

                store
                    .update(
                        EntityType::Project,
                        &id,
                        record(json!({ "id": "other", "create_date": "1999-01-01", "name": "Tunnel" })),
                    )
                    .await
                    .unwrap();

                let after = store.find_by_id(EntityType::Project, &id).await.unwrap().unwrap();
                assert_eq!(after[ID_FIELD], Value::String(id.clone()));
                assert_eq!(after[CREATED_FIELD], before[CREATED_FIELD]);
                assert_eq!(after["name"], "Tunnel");
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let store = $factory;
                let updated = store
                    .update(
                        EntityType::Project,
                        &uuid::Uuid::new_v4().to_string(),
                        record(json!({ "name": "Ghost" })),
                    )
                    .await
                    .unwrap();
                assert!(!updated);
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let store = $factory;
                let id = store
                    .insert(EntityType::Project, project("Bridge", 1))
                    .await
                    .unwrap();

                assert!(store.delete(EntityType::Project, &id).await.unwrap());
                assert!(store.find_by_id(EntityType::Project, &id).await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let store = $factory;
                let deleted = store
                    .delete(EntityType::Project, &uuid::Uuid::new_v4().to_string())
                    .await
                    .unwrap();
                assert!(!deleted);
            }

            // ==================================================================
            // Lookup
            // ==================================================================

            #[tokio::test]
            async fn test_find_first_where_string() {
                let store = $factory;
                for row in sample_projects(3) {
                    store.insert(EntityType::Project, row).await.unwrap();
                }

                let found = store
                    .find_first_where(EntityType::Project, "name", &json!("project-1"))
                    .await
                    .unwrap()
                    .expect("project-1 should match");
                assert_eq!(found["name"], "project-1");
            }

            #[tokio::test]
            async fn test_find_first_where_number() {
                let store = $factory;
                for row in sample_projects(3) {
                    store.insert(EntityType::Project, row).await.unwrap();
                }

                let found = store
                    .find_first_where(EntityType::Project, "budget", &json!(2000))
                    .await
                    .unwrap()
                    .expect("budget 2000 should match");
                assert_eq!(found["name"], "project-2");
            }

            #[tokio::test]
            async fn test_find_first_where_no_match() {
                let store = $factory;
                store
                    .insert(EntityType::Project, project("Bridge", 1))
                    .await
                    .unwrap();

                let found = store
                    .find_first_where(EntityType::Project, "name", &json!("Tunnel"))
                    .await
                    .unwrap();
                assert!(found.is_none());

                let unknown = store
                    .find_first_where(EntityType::Project, "colour", &json!("red"))
                    .await
                    .unwrap();
                assert!(unknown.is_none());
            }

            // ==================================================================
            // Edge Cases
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_inserts() {
                let store = $factory;
                let mut handles = Vec::new();
                for row in sample_projects(10) {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        store.insert(EntityType::Project, row).await.unwrap()
                    }));
                }
                for handle in handles {
                    handle.await.unwrap();
                }

                assert_eq!(store.list(EntityType::Project).await.unwrap().len(), 10);
            }
        }
    };
}
