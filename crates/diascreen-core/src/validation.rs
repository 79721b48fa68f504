//! Input validation for raw screening requests
//!
//! Turns an untyped JSON object into a [`ScreeningRequest`]. Every field is
//! checked and all violations are reported together; nothing is clamped or
//! defaulted.

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{FieldError, ValidationErrors, Violation};
use crate::types::{
    Bounds, Gender, ScreeningRequest, SmokingHistory, YesNo, AGE_BOUNDS, HEIGHT_BOUNDS,
    WEIGHT_BOUNDS,
};

/// Validate a raw request body
pub fn validate(raw: &Value) -> Result<ScreeningRequest, ValidationErrors> {
    let Some(object) = raw.as_object() else {
        return Err(ValidationErrors::single(FieldError::new(
            "body",
            Violation::WrongType {
                expected: "object",
                found: json_type(raw),
            },
        )));
    };

    let mut errors = ValidationErrors::new();

    let age = number_field(object, "age", AGE_BOUNDS, &mut errors);
    let gender = enum_field(object, "gender", Gender::NAMES, Gender::parse, &mut errors);
    let height = number_field(object, "height", HEIGHT_BOUNDS, &mut errors);
    let weight = number_field(object, "weight", WEIGHT_BOUNDS, &mut errors);
    let smoking_history = enum_field(
        object,
        "smoking_history",
        SmokingHistory::NAMES,
        SmokingHistory::parse,
        &mut errors,
    );
    let hypertension = enum_field(object, "hypertension", YesNo::NAMES, YesNo::parse, &mut errors);
    let heart_disease = enum_field(object, "heart_disease", YesNo::NAMES, YesNo::parse, &mut errors);

    match (
        age,
        gender,
        height,
        weight,
        smoking_history,
        hypertension,
        heart_disease,
    ) {
        (
            Some(age),
            Some(gender),
            Some(height),
            Some(weight),
            Some(smoking_history),
            Some(hypertension),
            Some(heart_disease),
        ) if errors.is_empty() => Ok(ScreeningRequest {
            age,
            gender,
            height,
            weight,
            smoking_history,
            hypertension,
            heart_disease,
        }),
        _ => {
            debug!(violations = errors.len(), "Rejected screening request: {}", errors);
            Err(errors)
        }
    }
}

fn number_field(
    object: &Map<String, Value>,
    field: &'static str,
    bounds: Bounds,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    let Some(value) = object.get(field) else {
        errors.push(field, Violation::Missing);
        return None;
    };

    let Some(number) = value.as_f64() else {
        errors.push(
            field,
            Violation::WrongType {
                expected: "number",
                found: json_type(value),
            },
        );
        return None;
    };

    if !bounds.contains(number) {
        errors.push(field, bounds.violation());
        return None;
    }

    Some(number)
}

fn enum_field<T>(
    object: &Map<String, Value>,
    field: &'static str,
    allowed: &'static [&'static str],
    parse: fn(&str) -> Option<T>,
    errors: &mut ValidationErrors,
) -> Option<T> {
    let Some(value) = object.get(field) else {
        errors.push(field, Violation::Missing);
        return None;
    };

    let Some(text) = value.as_str() else {
        errors.push(
            field,
            Violation::WrongType {
                expected: "string",
                found: json_type(value),
            },
        );
        return None;
    };

    let parsed = parse(text);
    if parsed.is_none() {
        errors.push(field, Violation::NotAllowed { allowed });
    }
    parsed
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_body() -> Value {
        json!({
            "age": 45,
            "gender": "Male",
            "height": 1.72,
            "weight": 75,
            "smoking_history": "never",
            "hypertension": "No",
            "heart_disease": "No"
        })
    }

    fn with(field: &str, value: Value) -> Value {
        let mut body = valid_body();
        body[field] = value;
        body
    }

    fn without(field: &str) -> Value {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove(field);
        body
    }

    #[test]
    fn test_valid_request() {
        let request = validate(&valid_body()).unwrap();
        assert_eq!(request.age(), 45.0);
        assert_eq!(request.gender(), Gender::Male);
        assert_eq!(request.height(), 1.72);
        assert_eq!(request.weight(), 75.0);
        assert_eq!(request.smoking_history(), SmokingHistory::Never);
        assert_eq!(request.hypertension(), YesNo::No);
        assert_eq!(request.heart_disease(), YesNo::No);
    }

    #[test]
    fn test_extra_fields_ignored() {
        let request = validate(&with("bmi", json!(99.0))).unwrap();
        assert_eq!(request.weight(), 75.0);
    }

    #[test]
    fn test_zero_age_rejected() {
        let err = validate(&with("age", json!(0))).unwrap_err();
        assert_eq!(err.len(), 1);
        assert_eq!(err.errors()[0].field(), "age");
        assert_eq!(
            err.errors()[0].violation(),
            &Violation::OutOfRange {
                lower: 0.0,
                upper: 120.0
            }
        );
    }

    #[test]
    fn test_zero_height_rejected_before_bmi() {
        let err = validate(&with("height", json!(0))).unwrap_err();
        assert!(err.contains_field("height"));
    }

    #[test]
    fn test_tall_height_rejected() {
        let err = validate(&with("height", json!(3.0))).unwrap_err();
        assert_eq!(err.errors()[0].constraint(), "must satisfy 0.5 < height < 2.5");
    }

    #[test]
    fn test_weight_bounds_exclusive() {
        assert!(validate(&with("weight", json!(20))).is_err());
        assert!(validate(&with("weight", json!(300))).is_err());
        assert!(validate(&with("weight", json!(20.01))).is_ok());
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        let err = validate(&with("hypertension", json!("maybe"))).unwrap_err();
        assert_eq!(err.errors()[0].field(), "hypertension");
        assert_eq!(err.errors()[0].violation().kind(), "not_allowed");
    }

    #[test]
    fn test_enum_case_sensitive() {
        assert!(validate(&with("heart_disease", json!("yes"))).is_err());
        assert!(validate(&with("gender", json!("male"))).is_err());
        assert!(validate(&with("smoking_history", json!("Not Current"))).is_err());
    }

    #[test]
    fn test_wrong_types_rejected() {
        let err = validate(&with("age", json!("45"))).unwrap_err();
        assert_eq!(
            err.errors()[0].violation(),
            &Violation::WrongType {
                expected: "number",
                found: "string"
            }
        );

        assert!(validate(&with("weight", json!(true))).is_err());
        assert!(validate(&with("height", Value::Null)).is_err());
        assert!(validate(&with("age", json!([45]))).is_err());
        assert!(validate(&with("age", json!({ "value": 45 }))).is_err());

        let err = validate(&with("gender", json!(1))).unwrap_err();
        assert_eq!(err.errors()[0].violation().kind(), "wrong_type");
    }

    #[test]
    fn test_missing_field_rejected() {
        let err = validate(&without("smoking_history")).unwrap_err();
        assert_eq!(err.errors()[0].field(), "smoking_history");
        assert_eq!(err.errors()[0].violation(), &Violation::Missing);
    }

    #[test]
    fn test_all_violations_reported() {
        let body = json!({
            "age": 150,
            "gender": "Unknown",
            "height": 0,
            "smoking_history": "never",
            "hypertension": "maybe",
            "heart_disease": "No"
        });

        let err = validate(&body).unwrap_err();
        let fields: Vec<&str> = err.errors().iter().map(|e| e.field()).collect();
        assert_eq!(fields, vec!["age", "gender", "height", "weight", "hypertension"]);
    }

    #[test]
    fn test_non_object_body_rejected() {
        let err = validate(&json!([1, 2, 3])).unwrap_err();
        assert_eq!(err.errors()[0].field(), "body");
        assert_eq!(err.errors()[0].constraint(), "expected object, got array");
    }
}
