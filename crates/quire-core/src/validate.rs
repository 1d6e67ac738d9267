//! Schema validation for incoming render requests.
//!
//! Validation walks the raw JSON instead of deriving `Deserialize` so that
//! every problem is reported at once, in field order, rather than stopping
//! at the first mismatch.

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::models::issue::{Issue, IssueCode};
use crate::models::params::{DATE_TAG, ParamValue, Params};
use crate::models::request::{Parser, RenderRequest};

/// Decode a raw request body and validate it.
pub fn parse_body(body: &[u8]) -> Result<RenderRequest, ValidationError> {
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        ValidationError::single(Issue::new(
            IssueCode::InvalidJson,
            &[],
            format!("Invalid JSON body: {e}"),
        ))
    })?;
    validate_request(&value)
}

/// Validate an already-decoded request body.
pub fn validate_request(body: &Value) -> Result<RenderRequest, ValidationError> {
    let Some(obj) = body.as_object() else {
        return Err(ValidationError::single(Issue::invalid_type(
            &[],
            "object",
            type_name(Some(body)),
        )));
    };

    let mut issues = Vec::new();

    let name = match obj.get("name") {
        None => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => {
            issues.push(Issue::invalid_type(&["name"], "string", type_name(Some(other))));
            None
        }
    };

    let template = match obj.get("template") {
        Some(Value::String(s)) if s.is_empty() => {
            issues.push(Issue {
                expected: Some("string".to_string()),
                ..Issue::new(
                    IssueCode::TooSmall,
                    &["template"],
                    "String must contain at least 1 character(s)",
                )
            });
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        other => {
            issues.push(Issue::invalid_type(&["template"], "string", type_name(other)));
            None
        }
    };

    let parser = match obj.get("parser") {
        None => Some(Parser::default()),
        Some(Value::String(s)) => match Parser::from_name(s) {
            Some(parser) => Some(parser),
            None => {
                issues.push(parser_issue(s));
                None
            }
        },
        Some(other) => {
            issues.push(Issue::invalid_type(&["parser"], "string", type_name(Some(other))));
            None
        }
    };

    let params = match obj.get("params") {
        None => None,
        Some(Value::Object(map)) => Some(classify_params(map, &mut issues)),
        Some(other) => {
            issues.push(Issue::invalid_type(&["params"], "object", type_name(Some(other))));
            None
        }
    };

    match (template, parser) {
        (Some(template), Some(parser)) if issues.is_empty() => Ok(RenderRequest {
            name,
            template,
            parser,
            params,
        }),
        _ => Err(ValidationError { issues }),
    }
}

fn parser_issue(received: &str) -> Issue {
    let expected = Parser::ALL
        .iter()
        .map(|p| format!("'{p}'"))
        .collect::<Vec<_>>()
        .join(" | ");

    let message = if Parser::RESERVED.contains(&received) {
        format!("Parser '{received}' is reserved but not implemented yet. Expected {expected}")
    } else {
        format!("Invalid enum value. Expected {expected}, received '{received}'")
    };

    Issue {
        expected: Some(expected),
        received: Some(received.to_string()),
        ..Issue::new(IssueCode::InvalidEnumValue, &["parser"], message)
    }
}

fn classify_params(map: &Map<String, Value>, issues: &mut Vec<Issue>) -> Params {
    let mut params = Params::new();
    for (key, value) in map {
        match classify_value(value) {
            Ok(param) => {
                params.insert(key.clone(), param);
            }
            Err(message) => issues.push(Issue {
                received: Some(type_name(Some(value)).to_string()),
                ..Issue::new(IssueCode::InvalidDate, &["params", key.as_str()], message)
            }),
        }
    }
    params
}

/// Map a JSON value onto the closed parameter union.
pub fn classify_value(value: &Value) -> Result<ParamValue, String> {
    Ok(match value {
        Value::String(s) => ParamValue::String(s.clone()),
        Value::Number(n) => ParamValue::Number(n.clone()),
        Value::Bool(b) => ParamValue::Bool(*b),
        Value::Object(obj) if obj.len() == 1 && obj.contains_key(DATE_TAG) => {
            let raw = obj
                .get(DATE_TAG)
                .and_then(Value::as_str)
                .ok_or_else(|| format!("{DATE_TAG} must be an RFC 3339 timestamp string"))?;
            let ts = raw
                .parse::<jiff::Timestamp>()
                .map_err(|e| format!("Invalid date '{raw}': {e}"))?;
            ParamValue::Date(ts)
        }
        other => ParamValue::Structured(other.clone()),
    })
}

fn type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}
