use std::io::Write;

use walkin_core::events::{ActorEvent, EventKind, EventSink};
use walkin_core::types::{ExperimentOutcome, SignalingMode};
use walkin_core::ComparisonReport;

// ─── Event Lines ────────────────────────────────────────────────────────────

pub fn describe(kind: EventKind) -> &'static str {
    match kind {
        EventKind::WantsToUse => "Wants to use the bathroom",
        EventKind::SignAbstained => "Door says occupied, so I don't try.",
        EventKind::KnockAnswered => "I knocked, but the bathroom was in use.",
        EventKind::EnteredLocked => "Acquired and locked the door.",
        EventKind::EnteredUnlocked => "Acquired but forgot to lock.",
        EventKind::Left => "And out!",
        EventKind::WalkedIn => "I went in, but someone was already inside!",
        EventKind::FoundLocked => "I tried the door, but it was locked",
        EventKind::Finished => "All done",
        EventKind::Interrupted => "Interrupted, giving up",
    }
}

pub fn format_event(event: &ActorEvent) -> String {
    // Hundredths of a second, truncated; `{:?}` keeps the trailing ".0".
    let seconds = (event.at.as_millis() / 10) as f64 / 100.0;
    format!("{}: {} ({:?})", event.actor, describe(event.kind), seconds)
}

/// Prints one line per actor event plus run boundaries to stdout.
pub struct ConsoleSink;

impl ConsoleSink {
    fn emit(&self, line: &str) {
        // A closed stdout must not take the actors down with it.
        let _ = writeln!(std::io::stdout().lock(), "{}", line);
    }
}

impl EventSink for ConsoleSink {
    fn record(&self, event: &ActorEvent) {
        self.emit(&format_event(event));
    }

    fn experiment_started(&self, _run_id: &str, _signaling: SignalingMode) {
        self.emit("Begin experiment");
    }

    fn experiment_finished(&self, _outcome: &ExperimentOutcome) {
        self.emit("End experiment");
    }
}

// ─── Summary ────────────────────────────────────────────────────────────────

pub fn summary_lines(report: &ComparisonReport) -> Vec<String> {
    let mut lines = Vec::new();

    if report.trials.is_empty() {
        lines.push("No trial completed.".to_string());
    } else if let [trial] = report.trials.as_slice() {
        lines.push("Number of times people walked into an occupied bathroom:".to_string());
        lines.push(format!(
            "In experiment 1: {} uses of the bathroom",
            trial.unsignaled.result
        ));
        lines.push(format!(
            "In experiment 2: {} uses of the bathroom",
            trial.signaled.result
        ));
    } else {
        lines.push(format!(
            "Walk-ins over {} paired trials (base seed {}):",
            report.trials.len(),
            report.base_seed
        ));
        for mode in [&report.unsignaled, &report.signaled] {
            lines.push(format!(
                "Signaling {}: {:.2} conflicts (sd {:.2}) / {:.2} uses per run, {:.3} conflicts per use",
                mode.signaling,
                mode.mean_conflicts,
                mode.stddev_conflicts,
                mode.mean_uses,
                mode.conflicts_per_use
            ));
        }
        lines.push(format!(
            "Mean paired difference (on - off): {:+.2}",
            report.mean_conflict_difference
        ));
    }

    if report.interrupted {
        lines.push("(interrupted: results are partial)".to_string());
    }

    lines
}
