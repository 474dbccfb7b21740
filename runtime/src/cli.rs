//! # Command-Line Argument Handling
//!
//! Hand-parses `env::args()` rather than reaching for a CLI-argument crate.
//! Two details force this: the stats reporter must replay selector flags in
//! their exact command-line encounter order (spec §4.5/§4.6), and the
//! reference implementation's own `main()` does likewise by iterating
//! `sys.argv` directly rather than through a parsed namespace. The `ippc`
//! teacher binary's own `main.rs` scans `env::args()` by hand for the same
//! reason, so this keeps that idiom rather than introducing `clap`.

use crate::error::InterpError;
use crate::stats::StatsSnapshot;

/// Parsed startup configuration. `raw` retains the original argv (minus
/// argv[0]) so the stats reporter can replay selectors in order.
#[derive(Debug)]
pub struct Options {
    pub source: Option<String>,
    pub input: Option<String>,
    pub stats_path: Option<String>,
    pub raw: Vec<String>,
}

const SELECTOR_FLAGS: &[&str] = &["--insts", "--hot", "--vars", "--frequent", "--eol"];

fn flag_value<'a>(arg: &'a str, flag: &str) -> Option<&'a str> {
    arg.strip_prefix(flag)?.strip_prefix('=')
}

/// Parse `args` (excluding the program name) into [`Options`], applying the
/// exit-10 validation rules of spec §6: at least one of `--source`/`--input`
/// must be given, and any stat selector requires `--stats`.
pub fn parse_args(args: &[String]) -> Result<Options, InterpError> {
    let mut source = None;
    let mut input = None;
    let mut stats_path = None;
    let mut has_selector = false;

    for arg in args {
        if let Some(v) = flag_value(arg, "--source") {
            source = Some(v.to_string());
        } else if let Some(v) = flag_value(arg, "--input") {
            input = Some(v.to_string());
        } else if let Some(v) = flag_value(arg, "--stats") {
            stats_path = Some(v.to_string());
        } else if arg.starts_with("--print=") {
            has_selector = true;
        } else if SELECTOR_FLAGS.contains(&arg.as_str()) {
            has_selector = true;
        } else {
            return Err(InterpError::Usage(format!("unrecognized argument '{}'", arg)));
        }
    }

    if source.is_none() && input.is_none() {
        return Err(InterpError::Usage(
            "at least one of --source or --input must be given".to_string(),
        ));
    }
    if has_selector && stats_path.is_none() {
        return Err(InterpError::Usage(
            "stat selectors require --stats=FILE".to_string(),
        ));
    }

    Ok(Options {
        source,
        input,
        stats_path,
        raw: args.to_vec(),
    })
}

/// Render the stats report: one line per recognized selector, in the order
/// it appeared on the command line (spec §4.5/§4.6). `--print=STRING`
/// selectors emit their embedded string verbatim.
pub fn render_stats_report(raw: &[String], snapshot: &StatsSnapshot) -> String {
    let mut out = String::new();
    for arg in raw {
        if let Some(text) = arg.strip_prefix("--print=") {
            out.push_str(text);
            out.push('\n');
        } else {
            match arg.as_str() {
                "--insts" => out.push_str(&format!("{}\n", snapshot.insts)),
                "--hot" => {
                    let hot = match snapshot.hot {
                        Some(h) => h.to_string(),
                        None => "None".to_string(),
                    };
                    out.push_str(&format!("{}\n", hot))
                }
                "--vars" => out.push_str(&format!("{}\n", snapshot.vars)),
                "--frequent" => out.push_str(&format!("{}\n", snapshot.frequent.join(", "))),
                "--eol" => out.push('\n'),
                _ => {}
            }
        }
    }
    out
}
