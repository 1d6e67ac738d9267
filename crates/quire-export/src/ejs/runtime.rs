//! Executes a compiled template on an embedded V8 isolate.
//!
//! Each render gets its own isolate with a capped heap and a wall-clock
//! watchdog. Either limit terminates execution instead of aborting the
//! process. The rendered output and any template failure come back through
//! two ops rather than through the script's completion value.

use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, OnceLock};
use std::thread::JoinHandle;
use std::time::Duration;

use deno_core::{JsRuntime, OpState, PollEventLoopOptions, RuntimeOptions, op2, v8};

use crate::error::{ExportError, TemplateLimit};

const SCRIPT_NAME: &str = "quire:template";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderLimits {
    /// Upper bound for the isolate's JavaScript heap.
    pub heap_bytes: usize,
    /// Wall-clock budget for compiling and running the template.
    pub time: Duration,
}

pub const DEFAULT_HEAP_LIMIT: usize = 128 * 1024 * 1024;
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(10);

impl Default for RenderLimits {
    fn default() -> Self {
        Self {
            heap_bytes: DEFAULT_HEAP_LIMIT,
            time: DEFAULT_TIME_LIMIT,
        }
    }
}

#[derive(Debug, Default)]
struct Outcome {
    html: Option<String>,
    failure: Option<(usize, String)>,
}

#[op2(fast)]
fn op_template_output(state: &mut OpState, #[string] html: String) {
    state.borrow_mut::<Outcome>().html = Some(html);
}

#[op2(fast)]
fn op_template_error(state: &mut OpState, line: u32, #[string] message: String) {
    state.borrow_mut::<Outcome>().failure = Some((line as usize, message));
}

deno_core::extension!(
    quire_template,
    ops = [op_template_output, op_template_error],
    state = |state| {
        state.put(Outcome::default());
    },
);

/// Terminates the isolate once the time budget is spent.
struct Watchdog {
    done: mpsc::Sender<()>,
    thread: JoinHandle<()>,
}

impl Watchdog {
    fn start(
        isolate: v8::IsolateHandle,
        limit: Duration,
        exceeded: Arc<OnceLock<TemplateLimit>>,
    ) -> Result<Self, ExportError> {
        let (done, finished) = mpsc::channel::<()>();
        let thread = std::thread::Builder::new()
            .name("ejs-watchdog".to_string())
            .spawn(move || {
                if let Err(RecvTimeoutError::Timeout) = finished.recv_timeout(limit) {
                    let _ = exceeded.set(TemplateLimit::Time);
                    isolate.terminate_execution();
                }
            })
            .map_err(|e| ExportError::Engine(format!("could not start watchdog: {e}")))?;
        Ok(Self { done, thread })
    }

    fn stop(self) {
        drop(self.done);
        if self.thread.join().is_err() {
            tracing::warn!("template watchdog panicked");
        }
    }
}

/// Run a complete driver script and collect what it reported.
pub fn execute(script: String, limits: RenderLimits) -> Result<String, ExportError> {
    let event_loop = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ExportError::Engine(format!("could not start event loop: {e}")))?;

    event_loop.block_on(async move {
        let mut runtime = JsRuntime::new(RuntimeOptions {
            extensions: vec![quire_template::init_ops()],
            create_params: Some(v8::CreateParams::default().heap_limits(0, limits.heap_bytes)),
            ..Default::default()
        });

        let exceeded: Arc<OnceLock<TemplateLimit>> = Arc::new(OnceLock::new());
        let isolate = runtime.v8_isolate().thread_safe_handle();
        {
            let isolate = isolate.clone();
            let exceeded = exceeded.clone();
            runtime.add_near_heap_limit_callback(move |current, _initial| {
                let _ = exceeded.set(TemplateLimit::Memory);
                isolate.terminate_execution();
                // Room for the isolate to unwind after termination.
                current * 2
            });
        }

        let watchdog = Watchdog::start(isolate, limits.time, exceeded.clone())?;
        let result = match runtime.execute_script(SCRIPT_NAME, script) {
            Ok(_) => runtime
                .run_event_loop(PollEventLoopOptions::default())
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        watchdog.stop();

        if let Some(limit) = exceeded.get() {
            return Err(ExportError::TemplateLimit(*limit));
        }
        if let Err(message) = result {
            let first = message.lines().next().unwrap_or_default().to_string();
            return Err(ExportError::TemplateCompile(first));
        }

        let outcome = runtime
            .op_state()
            .borrow_mut()
            .try_take::<Outcome>()
            .unwrap_or_default();
        match outcome {
            Outcome {
                failure: Some((line, message)),
                ..
            } => Err(ExportError::TemplateRender { line, message }),
            Outcome {
                html: Some(html), ..
            } => Ok(html),
            Outcome { .. } => Err(ExportError::TemplateRender {
                line: 0,
                message: "template never finished rendering".to_string(),
            }),
        }
    })
}
