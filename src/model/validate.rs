//! Shape check for records coming from outside the store (imports and the
//! durable snapshot). Each field is probed on its own so a rejected record
//! reports everything wrong with it at once.

use serde_json::{Map, Value};
use thiserror::Error;

use super::storage::{Paid, Period, Program};

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum FieldProblem {
    #[error("record is not an object")]
    NotAnObject,
    #[error("missing")]
    Missing,
    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    #[error("unknown period '{0}'")]
    UnknownPeriod(String),
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("{field}: {problem}")]
pub struct FieldError {
    pub field: &'static str,
    pub problem: FieldProblem,
}

impl FieldError {
    fn new(field: &'static str, problem: FieldProblem) -> Self {
        FieldError { field, problem }
    }
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn required_string(
    obj: &Map<String, Value>,
    field: &'static str,
    errors: &mut Vec<FieldError>,
) -> String {
    match obj.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            errors.push(FieldError::new(
                field,
                FieldProblem::WrongType {
                    expected: "string",
                    found: type_name(other),
                },
            ));
            String::new()
        }
        None => {
            errors.push(FieldError::new(field, FieldProblem::Missing));
            String::new()
        }
    }
}

/// Checks one record and builds the typed value if it passes.
///
/// Required: string `programIsmi`, `programLink`, `email`, `sifre`,
/// `accountSekli`, `bitisTarihi`, and `ucretli` as boolean or string.
/// `kartNo` and `periyot` may be absent; when present they must be a string
/// and a stored period label (`Aylık` or `Yıllık`) respectively. Anything
/// accepted here serializes back to the same JSON. Extra fields are ignored.
pub fn validate_program(value: &Value) -> Result<Program, Vec<FieldError>> {
    let obj = match value {
        Value::Object(obj) => obj,
        _ => return Err(vec![FieldError::new("record", FieldProblem::NotAnObject)]),
    };
    let mut errors = Vec::new();

    let name = required_string(obj, "programIsmi", &mut errors);
    let link = required_string(obj, "programLink", &mut errors);
    let email = required_string(obj, "email", &mut errors);
    let secret = required_string(obj, "sifre", &mut errors);
    let account_kind = required_string(obj, "accountSekli", &mut errors);
    let expiry_date = required_string(obj, "bitisTarihi", &mut errors);

    let is_paid = match obj.get("ucretli") {
        Some(Value::Bool(b)) => Paid::Flag(*b),
        Some(Value::String(s)) => Paid::Text(s.clone()),
        Some(other) => {
            errors.push(FieldError::new(
                "ucretli",
                FieldProblem::WrongType {
                    expected: "boolean or string",
                    found: type_name(other),
                },
            ));
            Paid::default()
        }
        None => {
            errors.push(FieldError::new("ucretli", FieldProblem::Missing));
            Paid::default()
        }
    };

    let card_number = match obj.get("kartNo") {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            errors.push(FieldError::new(
                "kartNo",
                FieldProblem::WrongType {
                    expected: "string",
                    found: type_name(other),
                },
            ));
            None
        }
    };

    let period = match obj.get("periyot") {
        None => None,
        Some(Value::String(s)) => match Period::from_stored(s) {
            Some(p) => Some(p),
            None => {
                errors.push(FieldError::new(
                    "periyot",
                    FieldProblem::UnknownPeriod(s.clone()),
                ));
                None
            }
        },
        Some(other) => {
            errors.push(FieldError::new(
                "periyot",
                FieldProblem::WrongType {
                    expected: "string",
                    found: type_name(other),
                },
            ));
            None
        }
    };

    if !errors.is_empty() {
        return Err(errors);
    }
    Ok(Program {
        name,
        link,
        email,
        secret,
        account_kind,
        is_paid,
        expiry_date,
        card_number,
        period,
    })
}
