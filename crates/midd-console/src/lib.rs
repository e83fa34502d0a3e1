//! Colorful console output for policy compilation.
//!
//! Provides a custom `tracing` layer that formats compile events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Compile start and end with diagram size
//! - **WARN**: Children and references skipped because they never apply
//! - **DEBUG**: Combination steps and rejected requests
//! - **TRACE**: Unmatched evaluation paths

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use midd_config::LoggingConfig;
use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static COMPILE_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Directive used when neither the config nor `RUST_LOG` names one.
pub const DEFAULT_FILTER: &str = "midd_policy=info";

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initializes console output with the filter from `RUST_LOG`.
///
/// Safe to call multiple times - only the first call has effect.
pub fn init() {
    INIT.get_or_init(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        install(filter);
    });
}

/// Initializes console output with the filter from `config`, falling back
/// to `RUST_LOG` and then to [`DEFAULT_FILTER`].
///
/// A directive that does not parse is reported on stderr and replaced by
/// [`DEFAULT_FILTER`].
///
/// Safe to call multiple times - only the first call has effect.
pub fn init_with(config: &LoggingConfig) {
    INIT.get_or_init(|| {
        let (filter, rejected) = configured_filter(config);
        if let Some(reason) = rejected {
            let mut stderr = io::stderr().lock();
            let _ = writeln!(
                stderr,
                "{} {}",
                "warning:".bright_yellow().bold(),
                reason
            );
        }
        install(filter);
    });
}

// Returns the filter to install and, when the configured directive was
// rejected, why.
fn configured_filter(config: &LoggingConfig) -> (EnvFilter, Option<String>) {
    match config.filter.as_deref() {
        Some(directive) => match EnvFilter::try_new(directive) {
            Ok(filter) => (filter, None),
            Err(e) => (
                EnvFilter::new(DEFAULT_FILTER),
                Some(format!(
                    "invalid logging.filter '{}' ({}), using '{}'",
                    directive, e, DEFAULT_FILTER
                )),
            ),
        },
        None => (
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
            None,
        ),
    }
}

fn install(filter: EnvFilter) {
    print_banner();
    EPOCH.get_or_init(Instant::now);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(PolicyConsoleLayer)
        .try_init();
}

fn print_banner() {
    let banner = r#"
 __  __ ___ ____  ____
|  \/  |_ _|  _ \|  _ \
| |\/| || || | | | | | |
| |  | || || |_| | |_| |
|_|  |_|___|____/|____/
"#;

    let version_line = format!("  v{} - Interval Decision Diagram Policy Engine\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

// Marks the start of a compilation for elapsed time tracking.
fn mark_compile_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    let nanos = epoch.elapsed().as_nanos() as u64;
    COMPILE_START_NANOS.store(nanos, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start_nanos = COMPILE_START_NANOS.load(Ordering::Relaxed);
    let now_nanos = epoch.elapsed().as_nanos() as u64;
    now_nanos.saturating_sub(start_nanos) as f64 / 1_000_000_000.0
}

/// A tracing layer that formats policy engine events with colors.
pub struct PolicyConsoleLayer;

impl<S: Subscriber> Layer<S> for PolicyConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let target = metadata.target();

        if !target.starts_with("midd_policy")
            && !target.starts_with("midd_engine")
            && !target.starts_with("midd::")
        {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Default)]
struct EventVisitor {
    event: Option<String>,
    root: Option<String>,
    container: Option<String>,
    child: Option<String>,
    rule: Option<String>,
    reference: Option<String>,
    reason: Option<String>,
    algorithm: Option<String>,
    node: Option<String>,
    nodes: Option<u64>,
    depth: Option<u64>,
    variables: Option<u64>,
    store_nodes: Option<u64>,
    children: Option<u64>,
    left_nodes: Option<u64>,
    right_nodes: Option<u64>,
    combined_nodes: Option<u64>,
    duration_ms: Option<u64>,
}

impl EventVisitor {
    fn set_text(&mut self, name: &str, value: String) {
        let slot = match name {
            "event" => &mut self.event,
            "root" => &mut self.root,
            "container" => &mut self.container,
            "child" => &mut self.child,
            "rule" => &mut self.rule,
            "reference" => &mut self.reference,
            "reason" => &mut self.reason,
            "algorithm" => &mut self.algorithm,
            "node" => &mut self.node,
            _ => return,
        };
        *slot = Some(value);
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.set_text(field.name(), s.trim_matches('"').to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "nodes" => self.nodes = Some(value),
            "depth" => self.depth = Some(value),
            "variables" => self.variables = Some(value),
            "store_nodes" => self.store_nodes = Some(value),
            "children" => self.children = Some(value),
            "left_nodes" => self.left_nodes = Some(value),
            "right_nodes" => self.right_nodes = Some(value),
            "combined_nodes" => self.combined_nodes = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value as u64);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.set_text(field.name(), value.to_string());
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    let event = v.event.as_deref().unwrap_or("");

    match event {
        "compile_start" => format_compile_start(v),
        "compile_end" => format_compile_end(v),
        "skip_child" | "skip_rule" | "skip_reference" => format_skip(v),
        "combine_children" => format_combine_children(v),
        "combine" => format_combine(v),
        "request_rejected" => format_rejected(v),
        "eval_unmatched" if level == Level::TRACE => format_unmatched(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn format_compile_start(v: &EventVisitor) -> String {
    mark_compile_start();
    let root = v.root.as_deref().unwrap_or("?");

    format!(
        "{} {} Compiling {}",
        format_elapsed(),
        "▶".bright_green().bold(),
        root.white().bold()
    )
}

fn format_compile_end(v: &EventVisitor) -> String {
    let root = v.root.as_deref().unwrap_or("?");
    let nodes = v.nodes.unwrap_or(0);
    let depth = v.depth.unwrap_or(0);
    let variables = v.variables.unwrap_or(0);
    let duration = v.duration_ms.unwrap_or(0);

    let mut output = format!(
        "{} {} Compiled {} │ {} │ {} nodes │ depth {} │ {} variables",
        format_elapsed(),
        "■".bright_cyan().bold(),
        root.white().bold(),
        format_duration_ms(duration).yellow(),
        nodes.to_formatted_string(&Locale::en).bright_yellow(),
        depth.to_formatted_string(&Locale::en).bright_yellow(),
        variables.to_formatted_string(&Locale::en).bright_yellow(),
    );

    if let Some(store_nodes) = v.store_nodes {
        output.push_str(&format!(
            " │ {} built",
            store_nodes
                .to_formatted_string(&Locale::en)
                .bright_magenta()
        ));
    }

    output
}

fn format_skip(v: &EventVisitor) -> String {
    let skipped = v
        .child
        .as_deref()
        .or(v.rule.as_deref())
        .or(v.reference.as_deref())
        .unwrap_or("?");
    let reason = v.reason.as_deref().unwrap_or("never applies");

    let mut output = format!("{} {} ", format_elapsed(), "⚠".bright_yellow().bold());
    if let Some(container) = v.container.as_deref() {
        output.push_str(&format!("{} ", format!("{}:", container).bright_cyan()));
    }
    output.push_str(&format!(
        "skipped {} ({})",
        skipped.white().bold(),
        reason.yellow()
    ));
    output
}

fn format_combine_children(v: &EventVisitor) -> String {
    let container = v.container.as_deref().unwrap_or("?");
    let children = v.children.unwrap_or(0);
    let algorithm = v.algorithm.as_deref().unwrap_or("?");

    format!(
        "{} {} {} │ {} children │ {}",
        format_elapsed(),
        "⊕".bright_blue(),
        container.white().bold(),
        children.to_formatted_string(&Locale::en).white(),
        algorithm.bright_magenta()
    )
}

fn format_combine(v: &EventVisitor) -> String {
    let left = v.left_nodes.unwrap_or(0);
    let right = v.right_nodes.unwrap_or(0);
    let combined = v.combined_nodes.unwrap_or(0);
    let algorithm = v.algorithm.as_deref().unwrap_or("?");

    format!(
        "{}     {} + {} → {} nodes ({})",
        format_elapsed(),
        left.to_formatted_string(&Locale::en).bright_black(),
        right.to_formatted_string(&Locale::en).bright_black(),
        combined.to_formatted_string(&Locale::en).white(),
        algorithm.bright_black()
    )
}

fn format_rejected(v: &EventVisitor) -> String {
    let reason = v.reason.as_deref().unwrap_or("?");
    format!(
        "{} {} Request rejected │ {}",
        format_elapsed(),
        "✗".bright_red(),
        reason.bright_red()
    )
}

fn format_unmatched(v: &EventVisitor) -> String {
    let node = v.node.as_deref().unwrap_or("?");
    format!(
        "{} {} No edge matched at {}",
        format_elapsed(),
        "·".bright_black(),
        node.bright_black()
    )
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        let mins = ms / 60_000;
        let secs = (ms % 60_000) / 1000;
        format!("{}m {}s", mins, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(1500), "1.50s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_configured_filter_reports_bad_directive() {
        let config = LoggingConfig {
            filter: Some("midd_policy=loud".to_string()),
        };
        let (_, rejected) = configured_filter(&config);
        assert!(rejected.unwrap().contains("midd_policy=loud"));

        let config = LoggingConfig {
            filter: Some("midd_engine=debug".to_string()),
        };
        assert!(configured_filter(&config).1.is_none());
    }

    #[test]
    fn test_unknown_event_is_silent() {
        let v = EventVisitor {
            event: Some("something_else".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_event(&v, Level::INFO).is_empty());
    }

    #[test]
    fn test_unmatched_only_at_trace() {
        let v = EventVisitor {
            event: Some("eval_unmatched".to_string()),
            node: Some("#4".to_string()),
            ..EventVisitor::default()
        };
        assert!(format_event(&v, Level::DEBUG).is_empty());
        assert!(format_event(&v, Level::TRACE).contains("#4"));
    }

    #[test]
    fn test_skip_names_container_and_child() {
        let v = EventVisitor {
            event: Some("skip_child".to_string()),
            container: Some("hospital".to_string()),
            child: Some("night-shift".to_string()),
            reason: Some("never applies".to_string()),
            ..EventVisitor::default()
        };
        let output = format_event(&v, Level::WARN);
        assert!(output.contains("hospital"));
        assert!(output.contains("night-shift"));
    }

    #[test]
    fn test_compile_end_counts() {
        let v = EventVisitor {
            event: Some("compile_end".to_string()),
            root: Some("adults".to_string()),
            nodes: Some(1234),
            depth: Some(3),
            variables: Some(2),
            ..EventVisitor::default()
        };
        let output = format_event(&v, Level::INFO);
        assert!(output.contains("adults"));
        assert!(output.contains("1,234"));
    }
}
