//! Terminal output utilities
//!
//! Provides consistent formatting for benchmark output.

use owo_colors::{OwoColorize, Style};
use std::time::Duration;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print a step message (for multi-step operations)
    pub fn step(step: usize, total: usize, message: &str) {
        println!("{} {}", format!("[{}/{}]", step, total).dimmed(), message);
    }
}

/// A horizontal rule
pub fn rule(ch: char, width: usize) -> String {
    ch.to_string().repeat(width)
}

/// Format a duration rounded to the millisecond
///
/// Sub-second values print as whole milliseconds ("42ms"); longer ones as
/// seconds with trailing zeros trimmed ("1.25s", "2s", "1m3.5s").
pub fn format_duration(duration: Duration) -> String {
    let millis = (duration.as_secs_f64() * 1000.0).round() as u64;
    if millis < 1000 {
        return format!("{}ms", millis);
    }

    let mins = millis / 60_000;
    let secs = (millis / 1000) % 60;
    let frac = millis % 1000;

    let seconds = if frac == 0 {
        format!("{}s", secs)
    } else {
        let fractional = format!("{:03}", frac);
        format!("{}.{}s", secs, fractional.trim_end_matches('0'))
    };

    if mins > 0 {
        format!("{}m{}", mins, seconds)
    } else {
        seconds
    }
}

/// Format a byte count for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// How good a size reduction is, for coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReductionTier {
    /// 50% or more
    High,
    /// 30% up to 50%
    Medium,
    /// Below 30%, including negative reductions
    Low,
}

impl ReductionTier {
    /// Classify a reduction percentage
    pub fn of(percent: f64) -> Self {
        if percent >= 50.0 {
            Self::High
        } else if percent >= 30.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Terminal style for this tier
    pub fn style(self) -> Style {
        match self {
            Self::High => Style::new().green(),
            Self::Medium => Style::new().yellow(),
            Self::Low => Style::new().red(),
        }
    }
}

/// Format a reduction percentage colored by its tier
pub fn format_reduction(percent: f64) -> String {
    format!("{:6.1}%", percent)
        .style(ReductionTier::of(percent).style())
        .to_string()
}

/// Bar of one block per two percentage points; negative reductions draw nothing
pub fn reduction_bar(percent: f64) -> String {
    let blocks = if percent.is_finite() && percent > 0.0 {
        (percent / 2.0) as usize
    } else {
        0
    };
    "█".repeat(blocks)
}
