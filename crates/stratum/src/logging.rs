//! Console output for solver events.
//!
//! A `tracing` layer that renders the solver's lifecycle events as one
//! colored line each. Install it with [`init_logging`].
//!
//! ## Log Levels
//!
//! - **INFO**: solve and phase start/end, job lifecycle
//! - **DEBUG**: new best solutions, steps, problem changes
//! - **WARN**: skipped phases, ignored configuration and rejected problem changes

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;
use std::time::Instant;

use num_format::{Locale, ToFormattedString};
use owo_colors::OwoColorize;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

static INIT: OnceLock<bool> = OnceLock::new();
static EPOCH: OnceLock<Instant> = OnceLock::new();
static SOLVE_START_NANOS: AtomicU64 = AtomicU64::new(0);

/// Installs the console layer as the global `tracing` subscriber.
///
/// `RUST_LOG` overrides the default filter of `stratum_solver=info`. Only
/// the first call has an effect; it returns false if another subscriber
/// was already installed.
pub fn init_logging() -> bool {
    *INIT.get_or_init(|| {
        tracing_subscriber::registry()
            .with(default_filter())
            .with(SolverConsoleLayer)
            .try_init()
            .is_ok()
    })
}

fn default_filter() -> EnvFilter {
    let builder = EnvFilter::builder();
    match "stratum_solver=info".parse::<Directive>() {
        Ok(directive) => builder.with_default_directive(directive).from_env_lossy(),
        Err(_) => builder.from_env_lossy(),
    }
}

fn mark_solve_start() {
    let epoch = EPOCH.get_or_init(Instant::now);
    SOLVE_START_NANOS.store(epoch.elapsed().as_nanos() as u64, Ordering::Relaxed);
}

fn elapsed_secs() -> f64 {
    let Some(epoch) = EPOCH.get() else {
        return 0.0;
    };
    let start = SOLVE_START_NANOS.load(Ordering::Relaxed);
    let now = epoch.elapsed().as_nanos() as u64;
    now.saturating_sub(start) as f64 / 1_000_000_000.0
}

/// A tracing layer that formats solver events with colors.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolverConsoleLayer;

impl<S: Subscriber> Layer<S> for SolverConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("stratum") {
            return;
        }

        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let output = format_event(&visitor, *metadata.level());
        if !output.is_empty() {
            let _ = writeln!(io::stderr().lock(), "{}", output);
        }
    }
}

#[derive(Debug, Default)]
struct EventVisitor {
    event: Option<String>,
    phase: Option<String>,
    score: Option<String>,
    job: Option<String>,
    reason: Option<String>,
    error: Option<String>,
    phase_index: Option<u64>,
    phases: Option<u64>,
    steps: Option<u64>,
    step: Option<u64>,
    moves: Option<u64>,
    speed: Option<u64>,
    duration_ms: Option<u64>,
    count: Option<u64>,
    terminated_early: Option<bool>,
    failed: Option<bool>,
}

impl EventVisitor {
    fn record_text(&mut self, name: &str, value: String) {
        match name {
            "event" => self.event = Some(value),
            "phase" => self.phase = Some(value),
            "score" => self.score = Some(value),
            "job" => self.job = Some(value),
            "reason" => self.reason = Some(value),
            "error" => self.error = Some(value),
            _ => {}
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let text = format!("{:?}", value);
        self.record_text(field.name(), text.trim_matches('"').to_string());
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field.name(), value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        match field.name() {
            "phase_index" => self.phase_index = Some(value),
            "phases" => self.phases = Some(value),
            "steps" => self.steps = Some(value),
            "step" => self.step = Some(value),
            "moves" => self.moves = Some(value),
            "speed" => self.speed = Some(value),
            "duration_ms" => self.duration_ms = Some(value),
            "count" => self.count = Some(value),
            _ => {}
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_u64(field, value.max(0) as u64);
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        match field.name() {
            "terminated_early" => self.terminated_early = Some(value),
            "failed" => self.failed = Some(value),
            _ => {}
        }
    }
}

fn format_event(v: &EventVisitor, level: Level) -> String {
    match v.event.as_deref().unwrap_or("") {
        "solve_start" => format_solve_start(v),
        "solve_end" => format_solve_end(v),
        "phase_start" => format_phase_start(v),
        "phase_end" => format_phase_end(v),
        "new_best" if level >= Level::DEBUG => format_new_best(v),
        "problem_changes_applied" => format_problem_changes(v),
        "problem_change_rejected" => format_rejected_change(v),
        "job_submitted" | "job_finished" | "job_removed" => format_job(v),
        "job_failed" | "job_panicked" => format_job_failure(v),
        "phase_skipped" | "config_ignored" => format_warning(v),
        _ => String::new(),
    }
}

fn format_elapsed() -> String {
    format!("{:>7.3}s", elapsed_secs()).bright_black().to_string()
}

fn thousands(n: u64) -> String {
    n.to_formatted_string(&Locale::en)
}

fn format_score(score: &str) -> String {
    // Any negative level means the score is not optimal; a negative hard
    // level means infeasible.
    if score.starts_with('-') {
        score.bright_red().to_string()
    } else if score.contains('-') {
        score.bright_yellow().to_string()
    } else {
        score.bright_green().bold().to_string()
    }
}

fn format_duration_ms(ms: u64) -> String {
    if ms < 1_000 {
        format!("{}ms", ms)
    } else if ms < 60_000 {
        format!("{:.2}s", ms as f64 / 1_000.0)
    } else {
        format!("{}m {}s", ms / 60_000, (ms % 60_000) / 1_000)
    }
}

fn format_solve_start(v: &EventVisitor) -> String {
    mark_solve_start();
    format!(
        "{} {} Solving │ {} phases",
        format_elapsed(),
        "▶".bright_green().bold(),
        thousands(v.phases.unwrap_or(0)).bright_yellow(),
    )
}

fn format_solve_end(v: &EventVisitor) -> String {
    let score = v.score.as_deref().unwrap_or("none");
    let status = if v.failed == Some(true) {
        "FAILED".bright_red().bold().to_string()
    } else if v.terminated_early == Some(true) {
        "TERMINATED EARLY".bright_yellow().bold().to_string()
    } else {
        "DONE".bright_green().bold().to_string()
    };
    format!(
        "{} {} Solving ended │ {} │ {} steps │ {} moves │ {} moves/s │ {} │ {}",
        format_elapsed(),
        "■".bright_cyan().bold(),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        thousands(v.steps.unwrap_or(0)).white(),
        thousands(v.moves.unwrap_or(0)).white(),
        thousands(v.speed.unwrap_or(0)).bright_magenta().bold(),
        format_score(score),
        status,
    )
}

fn format_phase_start(v: &EventVisitor) -> String {
    format!(
        "{} {} {} #{} started",
        format_elapsed(),
        "▶".bright_blue(),
        v.phase.as_deref().unwrap_or("Unknown").white().bold(),
        v.phase_index.unwrap_or(0),
    )
}

fn format_phase_end(v: &EventVisitor) -> String {
    format!(
        "{} {} {} #{} ended │ {} │ {} steps │ {} moves/s │ {}",
        format_elapsed(),
        "◀".bright_blue(),
        v.phase.as_deref().unwrap_or("Unknown").white().bold(),
        v.phase_index.unwrap_or(0),
        format_duration_ms(v.duration_ms.unwrap_or(0)).yellow(),
        thousands(v.steps.unwrap_or(0)).white(),
        thousands(v.speed.unwrap_or(0)).bright_magenta().bold(),
        format_score(v.score.as_deref().unwrap_or("none")),
    )
}

fn format_new_best(v: &EventVisitor) -> String {
    format!(
        "{} {} step {:>8} │ new best {}",
        format_elapsed(),
        "★".bright_yellow(),
        thousands(v.step.unwrap_or(0)),
        format_score(v.score.as_deref().unwrap_or("none")),
    )
}

fn format_problem_changes(v: &EventVisitor) -> String {
    format!(
        "{} {} {} problem changes applied │ {}",
        format_elapsed(),
        "↻".bright_cyan(),
        thousands(v.count.unwrap_or(0)),
        format_score(v.score.as_deref().unwrap_or("none")),
    )
}

fn format_rejected_change(v: &EventVisitor) -> String {
    format!(
        "{} {} problem change rejected │ {}",
        format_elapsed(),
        "⚠".bright_yellow().bold(),
        v.error.as_deref().unwrap_or("unknown error").yellow(),
    )
}

fn format_job(v: &EventVisitor) -> String {
    let what = match v.event.as_deref() {
        Some("job_submitted") => "submitted",
        Some("job_finished") => "finished",
        _ => "removed",
    };
    format!(
        "{} {} {} {}",
        format_elapsed(),
        "●".bright_cyan(),
        v.job.as_deref().unwrap_or("job").white().bold(),
        what,
    )
}

fn format_job_failure(v: &EventVisitor) -> String {
    format!(
        "{} {} {} failed │ {}",
        format_elapsed(),
        "✖".bright_red().bold(),
        v.job.as_deref().unwrap_or("job").white().bold(),
        v.error.as_deref().unwrap_or("panicked").bright_red(),
    )
}

fn format_warning(v: &EventVisitor) -> String {
    let reason = v.reason.as_deref().unwrap_or("");
    match v.phase.as_deref() {
        Some(phase) => format!(
            "{} {} {} skipped │ {}",
            format_elapsed(),
            "⚠".bright_yellow().bold(),
            phase.white().bold(),
            reason.yellow(),
        ),
        None => format!("{} {} {}", format_elapsed(), "⚠".bright_yellow().bold(), reason.yellow()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visitor(event: &str) -> EventVisitor {
        EventVisitor {
            event: Some(event.to_string()),
            ..EventVisitor::default()
        }
    }

    #[test]
    fn test_phase_end_line() {
        let v = EventVisitor {
            phase: Some("LocalSearch".to_string()),
            phase_index: Some(1),
            steps: Some(12_345),
            speed: Some(2_500_000),
            duration_ms: Some(1_500),
            score: Some("0hard/-7soft".to_string()),
            ..visitor("phase_end")
        };
        let line = format_event(&v, Level::INFO);
        assert!(line.contains("LocalSearch"));
        assert!(line.contains("12,345"));
        assert!(line.contains("2,500,000"));
        assert!(line.contains("1.50s"));
        assert!(line.contains("0hard/-7soft"));
    }

    #[test]
    fn test_solve_end_status() {
        let v = EventVisitor {
            terminated_early: Some(true),
            failed: Some(false),
            ..visitor("solve_end")
        };
        assert!(format_event(&v, Level::INFO).contains("TERMINATED EARLY"));

        let v = EventVisitor {
            failed: Some(true),
            ..visitor("solve_end")
        };
        assert!(format_event(&v, Level::INFO).contains("FAILED"));
    }

    #[test]
    fn test_new_best_only_at_debug() {
        let v = EventVisitor {
            step: Some(3),
            score: Some("-2".to_string()),
            ..visitor("new_best")
        };
        assert!(format_event(&v, Level::INFO).is_empty());
        assert!(format_event(&v, Level::DEBUG).contains("new best"));
        assert!(format_event(&v, Level::WARN).is_empty());
    }

    #[test]
    fn test_rejected_problem_change_shows_error() {
        let v = EventVisitor {
            error: Some("entity index 7 is out of bounds (4 entities)".to_string()),
            ..visitor("problem_change_rejected")
        };
        let line = format_event(&v, Level::WARN);
        assert!(line.contains("rejected"));
        assert!(line.contains("out of bounds"));
    }

    #[test]
    fn test_unknown_events_are_silent() {
        assert!(format_event(&visitor("step"), Level::DEBUG).is_empty());
        assert!(format_event(&EventVisitor::default(), Level::INFO).is_empty());
    }

    #[test]
    fn test_skipped_phase_warning() {
        let v = EventVisitor {
            phase: Some("ExhaustiveSearch".to_string()),
            reason: Some("too many entities for exhaustive search".to_string()),
            ..visitor("phase_skipped")
        };
        let line = format_event(&v, Level::WARN);
        assert!(line.contains("ExhaustiveSearch"));
        assert!(line.contains("too many entities"));
    }

    #[test]
    fn test_duration_format() {
        assert_eq!(format_duration_ms(250), "250ms");
        assert_eq!(format_duration_ms(2_000), "2.00s");
        assert_eq!(format_duration_ms(125_000), "2m 5s");
    }

    #[test]
    fn test_init_logging_is_idempotent() {
        let first = init_logging();
        assert_eq!(init_logging(), first);
    }
}
