//! Valid payloads for every entity type, plus the rows they reference
//!
//! ```rust,ignore
//! mod fixtures;
//! let refs = fixtures::seed_references(&store).await;
//! let payload = fixtures::valid_payload(EntityType::Employee, &refs);
//! ```

#![allow(dead_code)]

use payroll::core::entity::{EntityType, Record};
use payroll::core::store::RecordStore;
use serde_json::{Value, json};

/// Ids of the rows inserted by [`seed_references`]
#[derive(Debug, Clone)]
pub struct References {
    pub project_id: String,
    pub position_id: String,
    pub subcontract_id: String,
    pub insurance_company_id: String,
    pub employee_id: String,
}

pub fn record(value: Value) -> Record {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Insert one row of every referenced type
pub async fn seed_references(store: &dyn RecordStore) -> References {
    let project_id = store
        .insert(
            EntityType::Project,
            record(json!({
                "code": "P-001",
                "name": "Harbour Bridge",
                "acronym": "HB",
                "address": "1 Bridge Rd",
                "project_group": "Civil",
                "accumulation_amount": 0,
                "start_date": "2020-01-01",
                "end_date": "2022-12-31",
            })),
        )
        .await
        .unwrap();

    let position_id = store
        .insert(
            EntityType::Position,
            record(json!({
                "code": "CARP",
                "name": "Carpenter",
                "minimum_pay": 10,
                "maximum_pay": 100,
            })),
        )
        .await
        .unwrap();

    let subcontract_id = store
        .insert(
            EntityType::Subcontract,
            record(json!({ "code": "S-01", "name": "Acme Scaffolding" })),
        )
        .await
        .unwrap();

    let insurance_company_id = store
        .insert(
            EntityType::InsuranceCompany,
            record(json!({ "code": "IC-1", "name": "Safe Co" })),
        )
        .await
        .unwrap();

    let mut employee = record(valid_employee(&project_id, &position_id));
    employee.insert("subcontract_id".to_string(), Value::from(subcontract_id.clone()));
    let employee_id = store.insert(EntityType::Employee, employee).await.unwrap();

    References {
        project_id,
        position_id,
        subcontract_id,
        insurance_company_id,
        employee_id,
    }
}

fn valid_employee(project_id: &str, position_id: &str) -> Value {
    json!({
        "code": "E-001",
        "name": "Jane Doe",
        "address": "12 Main St",
        "phone": "+61 400 000 000",
        "date_of_birth": "1990-05-17",
        "sex": "f",
        "marital_status": "single",
        "referee": "John Smith",
        "emergency_name": "Jim Doe",
        "emergency_address": "14 Main St",
        "emergency_phone": "0400 111 222",
        "hired_date": "2019-03-01",
        "skill": "Formwork",
        "hourly_rate": 20,
        "overtime_rate": 30,
        "project_id": project_id,
        "position_id": position_id,
    })
}

/// A payload holding exactly the required attributes, all valid
pub fn valid_payload(entity: EntityType, refs: &References) -> Value {
    match entity {
        EntityType::Employee => valid_employee(&refs.project_id, &refs.position_id),
        EntityType::InsuranceCompany => json!({ "code": "IC-2", "name": "Cover All" }),
        EntityType::InsurancePolicy => json!({
            "code": "POL-1",
            "details": "Public liability",
            "project_id": refs.project_id,
            "insurance_company_id": refs.insurance_company_id,
            "start_date": "2021-01-01",
            "end_date": "2021-12-31",
        }),
        EntityType::Position => json!({
            "code": "LAB",
            "name": "Labourer",
            "minimum_pay": 15,
            "maximum_pay": 40,
        }),
        EntityType::Project => json!({
            "code": "P-002",
            "name": "Tunnel",
            "acronym": "TN",
            "address": "2 Tunnel Rd",
            "project_group": "Civil",
            "accumulation_amount": 1500.5,
            "start_date": "2021-01-01",
            "end_date": "2023-06-30",
        }),
        EntityType::Subcontract => json!({ "code": "S-02", "name": "Bolt Bros" }),
        EntityType::User => json!({
            "name": "Pat Payroll",
            "email": "pat@example.com",
            "password": "correct horse",
            "password_confirmation": "correct horse",
            "role": "level2",
        }),
        EntityType::WeeklyPayrollHistory => {
            let mut payload = json!({
                "week_start_date": "2021-03-01",
                "employee_id": refs.employee_id,
            });
            for field in payroll::schemas::weekly_payroll_history::AMOUNT_FIELDS {
                payload[field] = json!(8);
            }
            payload
        }
    }
}
