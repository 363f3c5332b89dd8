//! Colored output helpers for CLI
//!
//! Provides consistent, colored terminal output for the marketlens CLI,
//! including report rendering and live per-region progress.

use crate::research::markets::Market;
use crate::research::{ProgressSink, WorkflowStage};
use crate::types::{RegionOutcomeStatus, WorkflowReport};
use owo_colors::OwoColorize;

/// Output style configuration
pub struct Output {
    /// Whether to use colored output
    pub colored: bool,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper with colors enabled
    pub fn new() -> Self {
        Self { colored: true }
    }

    /// Create a new output helper with colors disabled
    pub fn no_color() -> Self {
        Self { colored: false }
    }

    /// Print the marketlens banner
    pub fn banner(&self) {
        if self.colored {
            println!(
                "\n   {} {}\n   {}\n",
                "marketlens".bright_cyan().bold(),
                format!("v{}", env!("CARGO_PKG_VERSION")).dimmed(),
                "Multi-market company risk research".bright_white()
            );
        } else {
            println!(
                "\n   marketlens v{}\n   Multi-market company risk research\n",
                env!("CARGO_PKG_VERSION")
            );
        }
    }

    /// Print a success message with a checkmark
    pub fn success(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "✓".green().bold(), message.green());
        } else {
            println!("  [OK] {}", message);
        }
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        if self.colored {
            println!("  {} {}", "•".blue(), message);
        } else {
            println!("  [INFO] {}", message);
        }
    }

    /// Print a warning message
    pub fn warning(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "⚠".yellow().bold(), message.yellow());
        } else {
            eprintln!("  [WARN] {}", message);
        }
    }

    /// Print an error message
    pub fn error(&self, message: &str) {
        if self.colored {
            eprintln!("  {} {}", "✗".red().bold(), message.red());
        } else {
            eprintln!("  [ERROR] {}", message);
        }
    }

    /// Print a file creation message
    pub fn created(&self, file_type: &str, path: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "✓".green().bold(),
                file_type.dimmed(),
                path.bright_white()
            );
        } else {
            println!("  [CREATED] {} {}", file_type, path);
        }
    }

    /// Print a file skipped message
    pub fn skipped(&self, path: &str, reason: &str) {
        if self.colored {
            println!(
                "  {} {} {}",
                "○".yellow(),
                path.dimmed(),
                format!("({})", reason).yellow()
            );
        } else {
            println!("  [SKIPPED] {} ({})", path, reason);
        }
    }

    /// Print a header for a section
    pub fn header(&self, title: &str) {
        if self.colored {
            println!("\n  {}", title.bright_white().bold().underline());
        } else {
            println!("\n  === {} ===", title);
        }
    }

    /// Print a key-value pair
    pub fn kv(&self, key: &str, value: &str) {
        if self.colored {
            println!("    {}: {}", key.dimmed(), value.bright_white());
        } else {
            println!("    {}: {}", key, value);
        }
    }

    /// Print a hint/tip message
    pub fn hint(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "💡".dimmed(), message.dimmed().italic());
        } else {
            println!("\n  [TIP] {}", message);
        }
    }

    /// Print a command suggestion
    pub fn command(&self, cmd: &str) {
        if self.colored {
            println!("     {}", format!("$ {}", cmd).bright_cyan());
        } else {
            println!("     $ {}", cmd);
        }
    }

    /// Print completion message with next steps
    pub fn complete(&self, message: &str) {
        if self.colored {
            println!("\n  {} {}", "🚀".green(), message.bright_green().bold());
        } else {
            println!("\n  [DONE] {}", message);
        }
    }

    /// Print a table header row
    pub fn table_header(&self, columns: &[&str]) {
        let header = table_line(columns);
        if self.colored {
            println!("    {}", header.bright_white().bold());
            println!("    {}", "─".repeat(columns.len() * (COLUMN_WIDTH + 1)).dimmed());
        } else {
            println!("    {}", header);
            println!("    {}", "-".repeat(columns.len() * (COLUMN_WIDTH + 1)));
        }
    }

    /// Print a table row
    pub fn table_row(&self, values: &[&str]) {
        println!("    {}", table_line(values));
    }

    /// Print newline
    pub fn newline(&self) {
        println!();
    }

    /// Print the supported market catalog
    pub fn markets(&self, markets: &[Market]) {
        self.header("Supported Markets");
        self.table_header(&["Code", "Market"]);
        for market in markets {
            self.table_row(&[market.code, market.description]);
        }
    }

    /// Print a finished workflow report
    pub fn report(&self, report: &WorkflowReport) {
        self.header(&format!("Risk Analysis: {}", report.subject));
        self.kv("Run", &report.run_id.to_string());
        self.kv(
            "Generated",
            &report.generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        );
        self.kv("Wall clock", &format!("{}ms", report.wall_clock_millis));
        self.kv(
            "Search time (sum)",
            &format!("{}ms", report.total_elapsed_millis),
        );

        self.header("Markets");
        self.table_header(&["Market", "Status", "Sources", "Time"]);
        for summary in &report.per_region_summary {
            let status = status_label(summary.status, self.colored);
            let sources = summary.citation_count.to_string();
            let elapsed = format!("{}ms", summary.elapsed_millis);
            self.table_row(&[
                summary.region.as_str(),
                status.as_str(),
                sources.as_str(),
                elapsed.as_str(),
            ]);
            if let Some(ref message) = summary.error_message {
                if self.colored {
                    println!("      {}", message.dimmed());
                } else {
                    println!("      {}", message);
                }
            }
        }

        self.header("Analysis");
        println!();
        for line in report.narrative_text.lines() {
            println!("  {}", line);
        }

        if !report.citations.is_empty() {
            self.header(&format!("Sources ({})", report.citations.len()));
            for (i, citation) in report.citations.iter().enumerate() {
                if self.colored {
                    println!(
                        "    {} {}\n       {}",
                        format!("[{}]", i + 1).dimmed(),
                        citation.title.bright_white(),
                        citation.url.cyan()
                    );
                } else {
                    println!("    [{}] {}\n       {}", i + 1, citation.title, citation.url);
                }
            }
        }

        if !report.failed_regions.is_empty() {
            self.newline();
            self.warning(&format!(
                "No data for: {}",
                report.failed_regions.join(", ")
            ));
        }
    }
}

const COLUMN_WIDTH: usize = 15;

fn pad_cell(value: &str) -> String {
    format!("{:<width$}", value, width = COLUMN_WIDTH)
}

fn table_line(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| pad_cell(v))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Padded before coloring; escape codes would otherwise count toward the width
fn status_label(status: RegionOutcomeStatus, colored: bool) -> String {
    let label = pad_cell(&status.as_str().to_uppercase());
    if !colored {
        return label;
    }
    match status {
        RegionOutcomeStatus::Success => label.green().to_string(),
        RegionOutcomeStatus::Timeout => label.yellow().to_string(),
        RegionOutcomeStatus::Error => label.red().to_string(),
    }
}

/// Progress lines written to stderr while a workflow runs
pub struct ProgressPrinter {
    colored: bool,
}

impl ProgressPrinter {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }
}

impl ProgressSink for ProgressPrinter {
    fn region_completed(&self, region: &str, completed: usize, total: usize) {
        if self.colored {
            eprintln!(
                "  {} {} finished",
                format!("[{}/{}]", completed, total).dimmed(),
                region.bright_white()
            );
        } else {
            eprintln!("  [{}/{}] {} finished", completed, total, region);
        }
    }

    fn stage_changed(&self, stage: WorkflowStage) {
        if self.colored {
            eprintln!("  {} {}", "→".cyan(), stage.description());
        } else {
            eprintln!("  -> {}", stage.description());
        }
    }
}
