use staffdb_core::{Employee, EmployeeField, EmployeeValidationError};
use uuid::Uuid;

#[test]
fn new_employee_has_no_identity() {
    let employee = Employee::new("FirstName1", "LastName1", "department1");

    assert!(employee.is_new());
    assert_eq!(employee.id, None);
    assert_eq!(employee.validate(), Ok(()));
}

#[test]
fn validate_reports_first_empty_field() {
    let employee = Employee::new("FirstName1", "", "");
    assert_eq!(
        employee.validate(),
        Err(EmployeeValidationError::MissingField(EmployeeField::LastName))
    );
}

#[test]
fn validate_accepts_whitespace_only_text() {
    let employee = Employee::new(" ", "\t", "department1");
    assert_eq!(employee.validate(), Ok(()));
}

#[test]
fn with_id_rejects_nil_uuid() {
    let err = Employee::with_id(Uuid::nil(), "FirstName1", "LastName1", "department1").unwrap_err();
    assert_eq!(err, EmployeeValidationError::NilId);
}

#[test]
fn serialization_uses_snake_case_and_omits_unset_id() {
    let draft = Employee::new("FirstName1", "LastName1", "department1");
    let json = serde_json::to_value(&draft).unwrap();
    assert!(json.get("id").is_none());
    assert_eq!(json["first_name"], "FirstName1");
    assert_eq!(json["last_name"], "LastName1");
    assert_eq!(json["department"], "department1");

    let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
    let persisted = Employee::with_id(id, "FirstName1", "LastName1", "department1").unwrap();
    let json = serde_json::to_value(&persisted).unwrap();
    assert_eq!(json["id"], id.to_string());

    let decoded: Employee = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, persisted);
}

#[test]
fn deserialize_rejects_missing_required_field() {
    let value = serde_json::json!({
        "first_name": "FirstName1",
        "last_name": "LastName1"
    });

    let err = serde_json::from_value::<Employee>(value).unwrap_err();
    assert!(
        err.to_string().contains("employee field `department` is required"),
        "unexpected error: {err}"
    );
}
