//! Wire deserialization tests for the voice response shape.
//!
//! The backend is free to evolve: null result lists, new intent tags, and
//! new results_type tags must all deserialize without error.

use acavox_common::protocol::{CommandResponse, Intent, ResultsType};

#[test]
fn test_full_response_deserializes() {
    let json = r#"{
        "raw_text": "list students",
        "parsed": {"intent": "list_students", "slots": {}},
        "info": "Found 1 student(s).",
        "results_type": "students",
        "results": [{"id": 1, "name": "A", "department": "CS", "gpa": 3.5}]
    }"#;

    let resp: CommandResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.parsed.intent_tag(), Intent::ListStudents);
    assert_eq!(resp.results_tag(), Some(ResultsType::Students));
    assert_eq!(resp.results.len(), 1);
    assert_eq!(resp.info.as_deref(), Some("Found 1 student(s)."));
}

#[test]
fn test_null_results_becomes_empty_list() {
    let json = r#"{
        "parsed": {"intent": "count_teachers", "slots": {}},
        "info": null,
        "results_type": null,
        "results": null
    }"#;

    let resp: CommandResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.parsed.intent_tag(), Intent::CountTeachers);
    assert!(resp.results.is_empty());
    assert_eq!(resp.results_tag(), None);
}

#[test]
fn test_absent_optional_fields() {
    // minimal response: only `parsed` is required
    let json = r#"{"parsed": {"intent": "unknown"}}"#;

    let resp: CommandResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.parsed.intent_tag(), Intent::Unknown);
    assert!(resp.parsed.slots.is_empty());
    assert!(resp.results.is_empty());
    assert!(resp.info.is_none());
}

#[test]
fn test_unrecognized_intent_tag_maps_to_unknown() {
    let json = r#"{
        "parsed": {"intent": "summon_dragon", "slots": {}},
        "results": []
    }"#;

    let resp: CommandResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.parsed.intent_tag(), Intent::Unknown);
    // the raw tag is preserved for logging
    assert_eq!(resp.parsed.intent, "summon_dragon");
}

#[test]
fn test_unrecognized_results_type_has_no_tag() {
    let json = r#"{
        "parsed": {"intent": "list_students", "slots": {}},
        "results_type": "holograms",
        "results": [{"id": 1}]
    }"#;

    let resp: CommandResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.results_tag(), None);
    assert_eq!(resp.results.len(), 1);
}

#[test]
fn test_intent_wire_roundtrip() {
    for tag in [
        "create_student",
        "list_students",
        "list_courses",
        "list_teachers",
        "list_enrollments_for_student",
        "assign_teacher_to_course",
        "unknown",
    ] {
        assert_eq!(Intent::from_wire(tag).as_str(), tag);
    }
}
