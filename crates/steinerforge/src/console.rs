//! Colorful console output for local search events.
//!
//! Provides a `tracing` layer that formats the structured events of
//! `steinerforge_local` with colors.

use std::io::{self, Write};
use std::sync::OnceLock;

use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();

const TARGET: &str = "steinerforge_local";

/// Initializes the console output.
///
/// Safe to call multiple times - only the first call has effect. Does
/// nothing if another global subscriber is already installed.
pub fn init() {
    INIT.get_or_init(|| {
        let mut filter = EnvFilter::from_default_env();
        if let Ok(directive) = "steinerforge_local=info".parse::<Directive>() {
            filter = filter.add_directive(directive);
        }

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(SteinerConsoleLayer)
            .try_init();
    });
}

/// A tracing layer that formats local search events with colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct SteinerConsoleLayer;

impl<S: Subscriber> Layer<S> for SteinerConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with(TARGET) {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(*metadata.level(), &visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    phase: Option<String>,
    kind: Option<String>,
    variant: Option<String>,
    error: Option<String>,
    objective: Option<f64>,
    gain: Option<f64>,
    pass: Option<u64>,
    moves: Option<u64>,
    nodes: Option<u64>,
    edges: Option<u64>,
    node: Option<u64>,
    steps: Option<u64>,
    inserted: Option<u64>,
    elapsed_ms: Option<u64>,
    improved: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value);
        self.record_str(field, s.trim_matches('"'));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        let slot = match field.name() {
            "event" => &mut self.event,
            "phase" => &mut self.phase,
            "kind" => &mut self.kind,
            "variant" => &mut self.variant,
            "error" => &mut self.error,
            _ => return,
        };
        *slot = Some(value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        match field.name() {
            "objective" => self.objective = Some(value),
            "gain" => self.gain = Some(value),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        let slot = match field.name() {
            "pass" | "passes" => &mut self.pass,
            "moves" => &mut self.moves,
            "nodes" => &mut self.nodes,
            "edges" => &mut self.edges,
            "node" => &mut self.node,
            "steps" => &mut self.steps,
            "inserted" => &mut self.inserted,
            "elapsed_ms" => &mut self.elapsed_ms,
            _ => return,
        };
        *slot = Some(value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "improved" {
            self.improved = Some(value);
        }
    }
}

fn format_event(level: Level, v: &EventVisitor) -> String {
    let body = match v.event.as_deref().unwrap_or("") {
        "local_search_start" => format_start(v),
        "local_search_end" => format_end(v),
        "phase_end" => format_phase_end(v),
        "pass_end" => format_pass_end(v),
        "pass_aborted" | "pass_rollback" => format_pass_discarded(v),
        "vertex_insertion_end" => format_counted(v, "[VertexInsertion]", "inserted", v.inserted),
        "greedy_extension_end" => format_counted(v, "[GreedyExtension]", "steps", v.steps),
        "move" => format_move(v),
        _ => return String::new(),
    };
    format!("{} {} {}", timestamp().bright_black(), format_level(level), body)
}

fn format_level(level: Level) -> String {
    if level == Level::ERROR {
        "ERROR".bright_red().to_string()
    } else if level == Level::WARN {
        " WARN".yellow().to_string()
    } else if level == Level::INFO {
        " INFO".bright_green().to_string()
    } else if level == Level::DEBUG {
        "DEBUG".bright_blue().to_string()
    } else {
        "TRACE".bright_black().to_string()
    }
}

fn format_start(v: &EventVisitor) -> String {
    format!(
        "{} Local search started: variant ({}), nodes ({}), edges ({}), objective ({})",
        "[LocalSearch]".bright_cyan(),
        v.variant.as_deref().unwrap_or("?").bright_magenta(),
        v.nodes.unwrap_or(0).bright_yellow(),
        v.edges.unwrap_or(0).bright_yellow(),
        format_objective(v.objective),
    )
}

fn format_end(v: &EventVisitor) -> String {
    let status = if v.improved.unwrap_or(false) {
        "improved".bright_green().bold().to_string()
    } else {
        "unchanged".white().to_string()
    };
    format!(
        "{} Local search ended ({}): objective ({}), gain ({}), passes ({}), moves ({}), time spent ({})",
        "[LocalSearch]".bright_cyan(),
        status,
        format_objective(v.objective),
        format_gain(v.gain),
        v.pass.unwrap_or(0).white(),
        v.moves.unwrap_or(0).white(),
        format_duration_ms(v.elapsed_ms.unwrap_or(0)).yellow(),
    )
}

fn format_phase_end(v: &EventVisitor) -> String {
    let phase = v.phase.as_deref().unwrap_or("Unknown");
    format!(
        "{} {} phase ended: objective ({}), time spent ({})",
        format!("[{}]", phase).bright_cyan(),
        phase.white().bold(),
        format_objective(v.objective),
        format_duration_ms(v.elapsed_ms.unwrap_or(0)).yellow(),
    )
}

fn format_pass_end(v: &EventVisitor) -> String {
    format!(
        "    {} Pass {:>3} | moves {:>5} | {}",
        "->".bright_blue(),
        v.pass.unwrap_or(0).white(),
        v.moves.unwrap_or(0).white(),
        format_objective(v.objective),
    )
}

fn format_pass_discarded(v: &EventVisitor) -> String {
    let reason = v.error.as_deref().unwrap_or("no strict improvement");
    format!(
        "    {} Pass {:>3} discarded: {}",
        "!!".yellow(),
        v.pass.unwrap_or(0).white(),
        reason.yellow(),
    )
}

fn format_counted(v: &EventVisitor, tag: &str, label: &str, count: Option<u64>) -> String {
    format!(
        "{} {} ({}), objective ({})",
        tag.bright_cyan(),
        label,
        count.unwrap_or(0).bright_yellow(),
        format_objective(v.objective),
    )
}

fn format_move(v: &EventVisitor) -> String {
    format!(
        "      {} {} at node {} | gain {}",
        "*".bright_black(),
        v.kind.as_deref().unwrap_or("move").white(),
        v.node.unwrap_or(0),
        format_gain(v.gain),
    )
}

fn format_objective(value: Option<f64>) -> String {
    match value {
        Some(x) => format!("{:.4}", x).bright_white().bold().to_string(),
        None => "N/A".white().to_string(),
    }
}

fn format_gain(value: Option<f64>) -> String {
    match value {
        Some(x) if x > 0.0 => format!("{:.4}", x).bright_green().to_string(),
        Some(x) => format!("{:.4}", x).white().to_string(),
        None => "N/A".white().to_string(),
    }
}

fn timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| format!("{:5}.{:03}", d.as_secs() % 100_000, d.subsec_millis()))
        .unwrap_or_else(|_| "    0.000".to_string())
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        format!("{}m {}s", ms / 60_000, (ms % 60_000) / 1000)
    }
}
