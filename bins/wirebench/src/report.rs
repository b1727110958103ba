//! Benchmark report rendering, as colored text or JSON

use chrono::{DateTime, Utc};
use owo_colors::{OwoColorize, Style};
use serde::Serialize;
use std::fmt::Write;
use uuid::Uuid;
use wirebench_cli::output::{format_duration, format_reduction, reduction_bar, rule};
use wirebench_core::config::{BenchConfig, Compressor};
use wirebench_core::metrics::{Analysis, BenchmarkReport, RunResult};

/// Reduction and final size measured for a 4.7 MB document, shown for comparison
const REFERENCE_RESULTS: [(Compressor, f64, f64); 3] = [
    (Compressor::Snappy, 25.0, 3.53),
    (Compressor::Zlib, 52.0, 2.26),
    (Compressor::Zstd, 53.0, 2.21),
];

const KEY_INSIGHTS: [&str; 4] = [
    "Zstd provides the best balance of compression and speed",
    "Zlib offers maximum compression but with higher CPU cost",
    "Snappy is fastest but provides less compression",
    "For 4.7MB documents, compression saves ~2.5MB per transfer!",
];

/// Everything the JSON output carries
#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub config: &'a BenchConfig,
    pub original_size: u64,
    pub original_size_mb: f64,
    pub results: &'a [RunResult],
    pub analysis: &'a Analysis,
}

impl<'a> JsonReport<'a> {
    pub fn new(run_id: Uuid, config: &'a BenchConfig, report: &'a BenchmarkReport, analysis: &'a Analysis) -> Self {
        Self {
            run_id,
            generated_at: Utc::now(),
            config,
            original_size: report.original_size,
            original_size_mb: report.original_size_mb(),
            results: &report.results,
            analysis,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Label color and emoji used for an algorithm's block
fn algorithm_style(compressor: Compressor) -> (Style, &'static str) {
    match compressor {
        Compressor::Snappy => (Style::new().yellow(), "🚀"),
        Compressor::Zlib => (Style::new().green(), "📦"),
        Compressor::Zstd => (Style::new().cyan(), "⚡"),
    }
}

fn bar_style(compressor: Compressor) -> Style {
    match compressor {
        Compressor::Snappy => Style::new().yellow(),
        Compressor::Zlib | Compressor::Zstd => Style::new().green(),
    }
}

/// Per-algorithm results, comparison chart and performance analysis
pub fn render_results(report: &BenchmarkReport, analysis: &Analysis) -> String {
    let mut out = String::new();

    let title = format!("🎯 COMPRESSION RESULTS FOR {:.2}MB DOCUMENT", report.original_size_mb());
    let _ = writeln!(out, "\n{}", title.style(Style::new().blue().bold()));
    let _ = writeln!(out, "{}", rule('═', 70));

    for result in &report.results {
        let (style, emoji) = algorithm_style(result.compressor);
        let label = format!("{} {}:", emoji, result.algorithm);
        let _ = writeln!(out, "{}", label.style(style.bold()));
        let _ = writeln!(out, "   📊 Original: {:6.2} MB", result.original_size_mb());
        let _ = writeln!(out, "   💾 Compressed: {:5.2} MB", result.compressed_size_mb());
        let _ = writeln!(out, "   📉 Reduction: {}", format_reduction(result.reduction_percent));
        let _ = writeln!(out, "   🎯 Ratio: {:.2}x", result.compression_ratio);
        let _ = writeln!(out, "   ⏱️  Insert Time: {}", format_duration(result.insert_time));
        let _ = writeln!(out);
    }

    out.push_str(&render_chart(report));
    out.push_str(&render_analysis(analysis));
    out
}

fn render_chart(report: &BenchmarkReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "📊 COMPRESSION PERFORMANCE COMPARISON:");
    let _ = writeln!(out, "{}", rule('─', 60));

    for result in &report.results {
        let bar = reduction_bar(result.reduction_percent);
        let _ = writeln!(
            out,
            "{:<8} {} {:5.1}%",
            result.algorithm,
            bar.style(bar_style(result.compressor)),
            result.reduction_percent
        );
    }

    let _ = writeln!(out, "{}", rule('─', 60));
    out
}

fn render_analysis(analysis: &Analysis) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\n{}", "💡 PERFORMANCE ANALYSIS:".style(Style::new().cyan().bold()));
    let _ = writeln!(out, "{}", rule('─', 50));

    let best = &analysis.best_compression;
    let fastest = &analysis.fastest_insert;
    let _ = writeln!(
        out,
        "🏆 Best Compression: {} ({:.1}% reduction)",
        best.algorithm, best.reduction_percent
    );
    let _ = writeln!(
        out,
        "⚡ Fastest Insert: {} ({})",
        fastest.algorithm,
        format_duration(fastest.insert_time)
    );

    let bandwidth = &analysis.bandwidth;
    let heading = format!(
        "🌐 NETWORK TRAFFIC SIMULATION ({} transfers):",
        group_thousands(bandwidth.transfers)
    );
    let _ = writeln!(out, "\n{}", heading.style(Style::new().magenta().bold()));
    for row in &bandwidth.rows {
        let _ = writeln!(
            out,
            "{:<8}: {:6.1} MB total (saves {:5.1} MB, {:4.1}%)",
            row.algorithm, row.total_mb, row.saved_mb, row.savings_percent
        );
    }

    let cost = &analysis.cost;
    let heading = format!("💸 CLOUD COST ANALYSIS (AWS Data Transfer ${:.2}/GB):", cost.cost_per_gb);
    let _ = writeln!(out, "\n{}", heading.style(Style::new().yellow().bold()));
    let _ = writeln!(out, "{}", rule('─', 55));
    let _ = writeln!(out, "No Compression: ${:.2}/month", cost.uncompressed_cost);
    for row in &cost.rows {
        let _ = writeln!(
            out,
            "{:<8}: ${:6.2}/month (saves ${:5.2}, {:.1}% cost reduction)",
            row.algorithm, row.monthly_cost, row.savings, row.savings_percent
        );
    }

    out
}

/// Reference figures from a 4.7 MB run and the takeaways drawn from them
pub fn render_reference() -> String {
    let mut out = String::new();

    let title = "🎯 EXPECTED RESULTS (Based on Your 4.7MB Document Test):";
    let _ = writeln!(out, "\n{}", title.style(Style::new().red().bold()));
    let _ = writeln!(out, "{}", rule('═', 65));

    for (compressor, reduction, size_mb) in REFERENCE_RESULTS {
        let style = if reduction >= 50.0 {
            Style::new().green()
        } else {
            Style::new().yellow()
        };
        let (_, emoji) = algorithm_style(compressor);
        let label = format!("{} {}:", emoji, compressor.display_name());
        let _ = writeln!(out, "{}", label.style(style.bold()));
        let _ = writeln!(out, "   • Reduction: {:.1}%", reduction);
        let _ = writeln!(out, "   • Final Size: {:.2}MB", size_mb);
        let _ = writeln!(out, "   • Bandwidth Saved: {:.1}%", reduction);
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "{}", "💡 KEY INSIGHTS:".style(Style::new().green().bold()));
    for insight in KEY_INSIGHTS {
        let _ = writeln!(out, "   • {}", insight);
    }
    let _ = writeln!(out, "{}", rule('═', 65));
    out
}

/// 1000000 -> "1,000,000"
fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
