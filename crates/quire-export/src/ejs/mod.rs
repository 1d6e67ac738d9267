//! EJS template engine.
//!
//! Templates are scanned into text and tags and compiled into the same kind
//! of async render function `ejs.compile` builds. The function runs on an
//! embedded V8 isolate, so scriptlets are plain JavaScript. Params are the
//! `locals` object and are also in scope by name.

mod compile;
mod runtime;
mod scan;

use quire_core::models::params::{ParamValue, Params};
use serde_json::{Map, Value};

use crate::error::ExportError;

pub use runtime::{DEFAULT_HEAP_LIMIT, DEFAULT_TIME_LIMIT, RenderLimits};

const DRIVER: &str = include_str!("driver.js");
const BODY_MARKER: &str = "__QUIRE_BODY__";

/// Renders run on a fresh thread so the isolate's event loop never nests
/// inside the caller's async runtime.
const WORKER_STACK_SIZE: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SyntaxError {
    pub line: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl From<SyntaxError> for ExportError {
    fn from(e: SyntaxError) -> Self {
        ExportError::TemplateParse {
            line: e.line,
            message: e.message,
        }
    }
}

/// A scanned template, ready to be rendered any number of times.
#[derive(Debug, Clone)]
pub struct Template {
    body: String,
}

impl Template {
    pub fn compile(source: &str) -> Result<Self, ExportError> {
        let segments = scan::scan(source)?;
        Ok(Self {
            body: compile::function_body(&segments),
        })
    }

    pub fn render(&self, params: &Params) -> Result<String, ExportError> {
        self.render_with_limits(params, RenderLimits::default())
    }

    pub fn render_with_limits(
        &self,
        params: &Params,
        limits: RenderLimits,
    ) -> Result<String, ExportError> {
        let script = self.driver_script(params)?;
        std::thread::scope(|scope| {
            let worker = std::thread::Builder::new()
                .name("ejs-render".to_string())
                .stack_size(WORKER_STACK_SIZE)
                .spawn_scoped(scope, move || runtime::execute(script, limits))
                .map_err(|e| ExportError::Engine(format!("could not start template worker: {e}")))?;
            worker.join().unwrap_or_else(|_| {
                Err(ExportError::Engine("template worker panicked".to_string()))
            })
        })
    }

    fn driver_script(&self, params: &Params) -> Result<String, ExportError> {
        let (head, tail) = DRIVER
            .split_once(BODY_MARKER)
            .ok_or_else(|| ExportError::Engine("template driver has no body marker".to_string()))?;
        let (values, dates) = locals(params);
        Ok(format!(
            "{head}{}{tail}({}, {});\n",
            self.body,
            compile::js_string(&values),
            compile::js_string(&dates),
        ))
    }
}

/// Params as JSON, with dates split out so the driver can turn them into
/// `Date` objects.
fn locals(params: &Params) -> (String, String) {
    let mut values = Map::new();
    let mut dates = Map::new();
    for (key, value) in params {
        match value {
            ParamValue::String(s) => {
                values.insert(key.clone(), Value::String(s.clone()));
            }
            ParamValue::Number(n) => {
                values.insert(key.clone(), Value::Number(n.clone()));
            }
            ParamValue::Bool(b) => {
                values.insert(key.clone(), Value::Bool(*b));
            }
            ParamValue::Structured(v) => {
                values.insert(key.clone(), v.clone());
            }
            ParamValue::Date(ts) => {
                dates.insert(key.clone(), Value::String(ts.to_string()));
            }
        }
    }
    (
        Value::Object(values).to_string(),
        Value::Object(dates).to_string(),
    )
}

/// Compile and render in one step.
pub fn render(source: &str, params: &Params) -> Result<String, ExportError> {
    Template::compile(source)?.render(params)
}

/// Compile and render with explicit resource limits.
pub fn render_with_limits(
    source: &str,
    params: &Params,
    limits: RenderLimits,
) -> Result<String, ExportError> {
    Template::compile(source)?.render_with_limits(params, limits)
}
