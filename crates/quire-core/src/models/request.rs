use std::fmt;

use serde::Serialize;

use super::params::Params;

/// Template language used to expand `RenderRequest::template`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Parser {
    /// Embedded JavaScript templates (`<%= %>` tags).
    #[default]
    Ejs,
}

impl Parser {
    pub const ALL: &'static [Parser] = &[Parser::Ejs];

    /// Names accepted by the schema but not backed by an engine yet.
    pub const RESERVED: &'static [&'static str] = &["handlebars", "liquid"];

    pub fn as_str(self) -> &'static str {
        match self {
            Parser::Ejs => "ejs",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|p| p.as_str() == name)
    }
}

impl fmt::Display for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated request to turn a template into a published PDF.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRequest {
    /// Free-form label. Only used as the suggested download filename.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub template: String,
    pub parser: Parser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
}

impl RenderRequest {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            name: None,
            template: template.into(),
            parser: Parser::default(),
            params: None,
        }
    }
}
