// Request validation for student records.
//
// Two independent checks run in order: required-field presence, then
// primitive type conformance. Neither looks at value semantics (date format,
// phone shape).

use serde_json::{Map, Number, Value};

use crate::database::models::student::Student;

/// Fields a create request must carry
pub const CREATE_REQUIRED: &[&str] = &["student_id", "name", "date_of_birth", "guardian_name", "ph_no"];

/// Fields an update request must carry; the id comes from the path
pub const UPDATE_REQUIRED: &[&str] = &["name", "date_of_birth", "guardian_name", "ph_no"];

/// Loose truthiness used by the presence check.
///
/// `null`, `false`, `0` and `""` all count as missing, so a `ph_no` of zero is
/// rejected as absent.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// True when every field in `required` is present and truthy
pub fn has_required_fields(record: &Map<String, Value>, required: &[&str]) -> bool {
    required
        .iter()
        .all(|field| record.get(*field).map(is_truthy).unwrap_or(false))
}

/// Primitive type check over a candidate record
pub fn validate_types(record: &Map<String, Value>) -> bool {
    parse_student(record).is_some()
}

/// Convert a candidate record into a [`Student`], or `None` on any type
/// violation. Absent, `null` and empty optional fields become `None`.
pub fn parse_student(record: &Map<String, Value>) -> Option<Student> {
    Some(Student {
        student_id: string_field(record, "student_id")?,
        name: string_field(record, "name")?,
        date_of_birth: string_field(record, "date_of_birth")?,
        guardian_name: string_field(record, "guardian_name")?,
        ph_no: number_field(record, "ph_no")?,
        email: optional_string_field(record, "email")?,
        address: optional_string_field(record, "address")?,
    })
}

fn string_field(record: &Map<String, Value>, field: &str) -> Option<String> {
    match record.get(field) {
        Some(Value::String(s)) => Some(s.clone()),
        _ => None,
    }
}

fn number_field(record: &Map<String, Value>, field: &str) -> Option<Number> {
    match record.get(field) {
        Some(Value::Number(n)) => Some(n.clone()),
        _ => None,
    }
}

/// Outer `None` is a type violation, inner `None` means "no value"
fn optional_string_field(record: &Map<String, Value>, field: &str) -> Option<Option<String>> {
    match record.get(field) {
        None | Some(Value::Null) => Some(None),
        Some(Value::String(s)) if s.is_empty() => Some(None),
        Some(Value::String(s)) => Some(Some(s.clone())),
        Some(_) => None,
    }
}
