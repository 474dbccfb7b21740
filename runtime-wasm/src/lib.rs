use serde::Serialize;
use wasm_bindgen::prelude::*;

use ippcode23_runtime::io::{StdErrSink, StringInput, StringSink};

/// Initialize panic hook when the module starts.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Serializable mirror of [`ippcode23_runtime::stats::StatsSnapshot`], the
/// statistics JS callers get back alongside captured stdout.
#[derive(Serialize, Default)]
pub struct Stats {
    pub insts: u64,
    pub hot: Option<i64>,
    pub vars: u64,
    pub frequent: Vec<String>,
}

/// Result of running one IPPcode23 program through the embedding.
#[derive(Serialize, Default)]
pub struct EvalResult {
    pub stdout: String,
    pub stats: Option<Stats>,
    pub error: Option<String>,
    pub exit_code: i32,
}

/// Run an IPPcode23 XML program against an optional input string, capturing
/// `WRITE` output into the returned string rather than touching any real
/// file descriptor — the same embeddable `run()` entry point the `ippc`
/// binary uses, here given in-memory I/O collaborators instead of real
/// files/stdio.
#[wasm_bindgen]
pub fn run_program(source_xml: &str, input_text: &str) -> Result<JsValue, JsValue> {
    let mut input = StringInput::new(input_text);
    let mut out = StringSink::default();
    let mut err_out = StdErrSink;

    let result = ippcode23_runtime::run(source_xml, &mut input, &mut out, &mut err_out);

    let eval_result = match result {
        Ok(snapshot) => EvalResult {
            stdout: out.buffer,
            stats: Some(Stats {
                insts: snapshot.insts,
                hot: snapshot.hot,
                vars: snapshot.vars,
                frequent: snapshot.frequent,
            }),
            error: None,
            exit_code: 0,
        },
        Err(e) => EvalResult {
            stdout: out.buffer,
            stats: None,
            error: Some(e.to_string()),
            exit_code: e.exit_code(),
        },
    };

    serde_wasm_bindgen::to_value(&eval_result).map_err(|e| e.into())
}

/// Version string of the runtime.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
