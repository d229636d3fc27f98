//! Colorful console output for generation runs.
//!
//! Provides a `tracing` layer that renders the generator's lifecycle
//! events with colors.
//!
//! ## Log Levels
//!
//! - **INFO**: Generation start/end and each finished restart
//! - **DEBUG**: Per-restart search and refinement summaries
//! - **TRACE**: Individual selections, backjumps and relocations

use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Instant;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<()> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Directive used when `RUST_LOG` is unset.
const DEFAULT_DIRECTIVE: &str = "timetabler_solver=info";

/// Initializes console output.
///
/// Safe to call multiple times; only the first call has effect. Prints the
/// banner and installs the console layer behind an `EnvFilter` that reads
/// `RUST_LOG`.
pub fn init() {
    INIT.get_or_init(|| {
        print_banner();
        EPOCH.get_or_init(Instant::now);

        let mut builder = EnvFilter::builder();
        if let Ok(directive) = DEFAULT_DIRECTIVE.parse::<Directive>() {
            builder = builder.with_default_directive(directive);
        }
        let filter = builder.from_env_lossy();

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(ConsoleLayer)
            .try_init();
    });
}

fn elapsed_secs() -> f64 {
    EPOCH.get().map_or(0.0, |epoch| epoch.elapsed().as_secs_f64())
}

fn print_banner() {
    let banner = r#"
 _____ _                 _        _     _
|_   _(_)_ __ ___   ___ | |_ __ _| |__ | | ___ _ __
  | | | | '_ ` _ \ / _ \| __/ _` | '_ \| |/ _ \ '__|
  | | | | | | | | |  __/| || (_| | |_) | |  __/ |
  |_| |_|_| |_| |_|\___| \__\__,_|_.__/|_|\___|_|
"#;

    let version_line = format!("          v{} - Institutional Timetable Engine\n", VERSION);

    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", banner.bright_cyan());
    let _ = writeln!(stdout, "{}", version_line.bright_white().bold());
    let _ = stdout.flush();
}

/// A tracing layer that formats generator events with colors.
pub struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if !event.metadata().target().starts_with("timetabler_solver") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor);
        if !output.is_empty() {
            let _ = writeln!(io::stdout(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    cost: Option<String>,
    status: Option<String>,
    sections: Option<u64>,
    weekly_hours: Option<u64>,
    infeasible: Option<u64>,
    restarts: Option<u64>,
    restart: Option<u64>,
    seed: Option<u64>,
    nodes: Option<u64>,
    backtracks: Option<u64>,
    backjumps: Option<u64>,
    refinement_moves: Option<u64>,
    best_restart: Option<u64>,
    placed: Option<u64>,
    unresolved: Option<u64>,
    duration_ms: Option<u64>,
    threshold: Option<f64>,
    budget_exceeded: Option<bool>,
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let s = format!("{:?}", value).trim_matches('"').to_string();
        match field.name() {
            "event" => self.event = Some(s),
            "cost" => self.cost = Some(s),
            "status" => self.status = Some(s),
            _ => {}
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "event" => self.event = Some(value.to_string()),
            "cost" => self.cost = Some(value.to_string()),
            "status" => self.status = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        let slot = match field.name() {
            "sections" => &mut self.sections,
            "weekly_hours" => &mut self.weekly_hours,
            "infeasible" => &mut self.infeasible,
            "restarts" => &mut self.restarts,
            "restart" => &mut self.restart,
            "seed" => &mut self.seed,
            "nodes" => &mut self.nodes,
            "backtracks" => &mut self.backtracks,
            "backjumps" => &mut self.backjumps,
            "refinement_moves" => &mut self.refinement_moves,
            "best_restart" => &mut self.best_restart,
            "placed" => &mut self.placed,
            "unresolved" => &mut self.unresolved,
            "duration_ms" => &mut self.duration_ms,
            _ => return,
        };
        *slot = Some(value);
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if field.name() == "threshold" {
            self.threshold = Some(value);
        }
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        if field.name() == "budget_exceeded" {
            self.budget_exceeded = Some(value);
        }
    }
}

fn format_event(v: &EventVisitor) -> String {
    match v.event.as_deref().unwrap_or("") {
        "generation_start" => format_generation_start(v),
        "restart_end" => format_restart_end(v),
        "threshold_met" => format_threshold_met(v),
        "generation_end" => format_generation_end(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs())
        .bright_black()
        .to_string()
}

fn count(n: Option<u64>) -> String {
    n.unwrap_or(0).to_formatted_string(&Locale::en)
}

fn format_generation_start(v: &EventVisitor) -> String {
    let mut output = format!(
        "{} {} Generating │ {} sections │ {} weekly hours │ {} restarts │ seed {}",
        format_elapsed(),
        "▶".bright_green().bold(),
        count(v.sections).bright_yellow(),
        count(v.weekly_hours).bright_yellow(),
        count(v.restarts).bright_yellow(),
        v.seed.unwrap_or(0).bright_magenta(),
    );
    if let Some(infeasible) = v.infeasible.filter(|&n| n > 0) {
        output.push_str(&format!(
            " │ {} infeasible",
            count(Some(infeasible)).bright_red()
        ));
    }
    output
}

fn format_restart_end(v: &EventVisitor) -> String {
    let status = v.status.as_deref().unwrap_or("unknown");
    let status = match status {
        "solved" => status.bright_green().to_string(),
        "exhausted" => status.yellow().to_string(),
        _ => status.bright_red().to_string(),
    };

    let mut output = format!(
        "{} {} Restart {:>3} │ {} │ {} │ {} nodes │ {} backtracks │ {} backjumps",
        format_elapsed(),
        "◀".bright_blue(),
        v.restart.unwrap_or(0).white().bold(),
        status,
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        count(v.nodes).bright_magenta().bold(),
        count(v.backtracks).white(),
        count(v.backjumps).white(),
    );
    if let Some(moves) = v.refinement_moves.filter(|&n| n > 0) {
        output.push_str(&format!(" │ {} moves", count(Some(moves)).white()));
    }
    output.push_str(&format!(
        " │ {}",
        format_cost(v.cost.as_deref().unwrap_or("N/A"))
    ));
    output
}

fn format_threshold_met(v: &EventVisitor) -> String {
    format!(
        "{} {} Restart {} met threshold {} │ {} │ cancelling the rest",
        format_elapsed(),
        "⚡".bright_cyan(),
        v.restart.unwrap_or(0).white().bold(),
        v.threshold.unwrap_or(0.0).bright_yellow(),
        format_cost(v.cost.as_deref().unwrap_or("N/A")),
    )
}

fn format_generation_end(v: &EventVisitor) -> String {
    let cost = v.cost.as_deref().unwrap_or("N/A");
    let feasible = cost.starts_with("0hard");
    let unresolved = v.unresolved.unwrap_or(0);

    let status = if feasible && unresolved == 0 {
        "COMPLETE".bright_green().bold().to_string()
    } else {
        "INCOMPLETE".bright_red().bold().to_string()
    };

    let mut output = format!(
        "{} {} Generation complete │ {} │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_cost(cost),
        status
    );
    if v.budget_exceeded == Some(true) {
        output.push_str(&format!(" │ {}", "budget exceeded".yellow()));
    }

    let rows = [
        ("Final Cost:", cost.to_string()),
        ("Best Restart:", count(v.best_restart)),
        ("Placements:", count(v.placed)),
        ("Unresolved Sections:", count(v.unresolved)),
        ("Duration:", format_duration_ms(v.duration_ms.unwrap_or(0))),
    ];

    output.push_str("\n\n");
    output.push_str(
        &"╔══════════════════════════════════════════════════════════╗"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');
    for (label, value) in rows {
        output.push_str(&format!(
            "{}  {:<22}{:>32}  {}",
            "║".bright_cyan(),
            label,
            value,
            "║".bright_cyan()
        ));
        output.push('\n');
    }
    output.push_str(
        &"╚══════════════════════════════════════════════════════════╝"
            .bright_cyan()
            .to_string(),
    );
    output.push('\n');

    output
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

/// Colors a `"{hard}hard/{soft}soft"` cost; anything else is printed as is.
fn format_cost(cost: &str) -> String {
    let Some((hard, soft)) = cost.split_once('/').filter(|(h, _)| h.ends_with("hard")) else {
        return cost.white().to_string();
    };
    let hard_num: u64 = hard.trim_end_matches("hard").parse().unwrap_or(0);
    let soft_num: f64 = soft.trim_end_matches("soft").parse().unwrap_or(0.0);

    let hard = if hard_num > 0 {
        hard.bright_red().to_string()
    } else {
        hard.bright_green().to_string()
    };
    let soft = if soft_num > 0.0 {
        soft.yellow().to_string()
    } else {
        soft.white().to_string()
    };
    format!("{}/{}", hard, soft)
}
