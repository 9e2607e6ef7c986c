use chrono::NaiveDate;
use jobtrack_test_helpers::record;

use jobtrack::tracker::applications::domain::{ApplicationDraft, ApplicationRecord, DraftError};
use jobtrack::tracker::funnel::FunnelStage;

fn valid_draft() -> ApplicationDraft {
    ApplicationDraft {
        id: None,
        company: "Acme".to_string(),
        position: "Software Engineer".to_string(),
        date_applied: NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date"),
        status: "Applied".to_string(),
        notes: Some("Referred by Sam".to_string()),
    }
}

#[test]
fn record_parses_api_json_with_null_notes() {
    let record: ApplicationRecord = serde_json::from_str(
        r#"{
            "id": "app-1",
            "company": "Acme",
            "position": "Software Engineer",
            "date_applied": "2025-03-14",
            "status": "Applied",
            "notes": null
        }"#,
    )
    .expect("record parses");

    assert_eq!(record.id, "app-1");
    assert_eq!(
        record.date_applied,
        NaiveDate::from_ymd_opt(2025, 3, 14).expect("valid date")
    );
    assert_eq!(record.notes, None);
}

#[test]
fn record_parses_api_json_without_notes_field() {
    let record: ApplicationRecord = serde_json::from_str(
        r#"{
            "id": "app-2",
            "company": "Globex",
            "position": "Data Analyst",
            "date_applied": "2025-04-01",
            "status": "Hired"
        }"#,
    )
    .expect("record parses");

    assert_eq!(record.notes, None);
}

#[test]
fn create_payload_omits_an_absent_id() {
    let payload = serde_json::to_string(&valid_draft()).expect("draft serializes");
    assert!(!payload.contains("\"id\""));
    assert!(payload.contains("\"date_applied\":\"2025-03-14\""));
}

#[test]
fn update_payload_keeps_the_id() {
    let mut draft = valid_draft();
    draft.id = Some("app-5".to_string());
    let payload = serde_json::to_string(&draft).expect("draft serializes");
    assert!(payload.contains("\"id\":\"app-5\""));
}

#[test]
fn to_draft_carries_every_field() {
    let mut stored = record("app-3", "Initech", "Offered");
    stored.notes = Some("Salary TBD".to_string());

    let draft = stored.to_draft();
    assert_eq!(draft.id.as_deref(), Some("app-3"));
    assert_eq!(draft.company, stored.company);
    assert_eq!(draft.position, stored.position);
    assert_eq!(draft.date_applied, stored.date_applied);
    assert_eq!(draft.status, stored.status);
    assert_eq!(draft.notes, stored.notes);
}

#[test]
fn stage_derives_from_the_stored_status() {
    assert_eq!(
        record("app-1", "Acme", "Phone Screening").stage(),
        FunnelStage::PhoneScreening
    );
    assert_eq!(
        record("app-2", "Globex", "waiting on referral").stage(),
        FunnelStage::Unclassified
    );
}

#[test]
fn blank_fields_are_rejected_before_submission() {
    let mut draft = valid_draft();
    draft.company = "   ".to_string();
    assert_eq!(draft.validate(), Err(DraftError::BlankCompany));

    let mut draft = valid_draft();
    draft.position = String::new();
    assert_eq!(draft.validate(), Err(DraftError::BlankPosition));

    let mut draft = valid_draft();
    draft.status = "\t".to_string();
    assert_eq!(draft.validate(), Err(DraftError::BlankStatus));

    assert_eq!(valid_draft().validate(), Ok(()));
}
