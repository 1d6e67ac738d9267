use std::collections::BTreeMap;

use serde::Serialize;

/// Key of the single-entry object that marks a parameter as a date:
/// `{"$date": "2024-05-01T09:30:00Z"}`.
pub const DATE_TAG: &str = "$date";

/// A caller-supplied template parameter.
///
/// JSON has no date type, so dates travel as a tagged object (see
/// [`DATE_TAG`]). Anything that is not a plain scalar or a date is passed
/// to the template engine untouched as `Structured`.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    String(String),
    Number(serde_json::Number),
    Date(jiff::Timestamp),
    Bool(bool),
    Structured(serde_json::Value),
}

pub type Params = BTreeMap<String, ParamValue>;

impl ParamValue {
    pub fn kind(&self) -> &'static str {
        match self {
            ParamValue::String(_) => "string",
            ParamValue::Number(_) => "number",
            ParamValue::Date(_) => "date",
            ParamValue::Bool(_) => "boolean",
            ParamValue::Structured(_) => "structured",
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::String(s) => serializer.serialize_str(s),
            ParamValue::Number(n) => n.serialize(serializer),
            ParamValue::Date(ts) => {
                let mut tagged = BTreeMap::new();
                tagged.insert(DATE_TAG, ts.to_string());
                tagged.serialize(serializer)
            }
            ParamValue::Bool(b) => serializer.serialize_bool(*b),
            ParamValue::Structured(v) => v.serialize(serializer),
        }
    }
}
