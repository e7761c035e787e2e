// ABOUTME: Output formatting for CLI feedback and status tables.
// ABOUTME: Supports normal, quiet (scripts), and JSON output modes.

use crate::bridge::BridgeStatusRow;
use crate::lifecycle::MachineStatusRow;
use serde::Serialize;
use std::time::Instant;

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputMode {
    /// Human-friendly output with progress messages and tables
    #[default]
    Normal,
    /// Minimal output: final results and tab-separated rows
    Quiet,
    /// JSON for scripting
    Json,
}

/// A record that can be shown as one table row.
pub trait TableRow: Serialize {
    fn cells(&self) -> Vec<String>;
}

impl TableRow for MachineStatusRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.status.clone(),
            self.provider.clone(),
        ]
    }
}

impl TableRow for BridgeStatusRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.status.clone(),
            self.l2_addr.clone(),
            self.sniffer_active.clone(),
            self.used_by.clone(),
        ]
    }
}

pub const MACHINE_HEADERS: &[&str] = &["Name", "Status", "Provider"];
pub const BRIDGE_HEADERS: &[&str] = &["Name", "Status", "L2_addr", "Sniffer active", "Used by"];

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => println!("{message}"),
            OutputMode::Json => self.event("success", message, false),
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Error: {message}"),
            OutputMode::Json => self.event("error", message, true),
        }
    }

    /// Print a follow-up hint after an error.
    pub fn hint(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("hint: {message}"),
            OutputMode::Json => self.event("hint", message, true),
        }
    }

    /// Print a table of records.
    pub fn table<R: TableRow>(&self, headers: &[&str], rows: &[R]) {
        match self.mode {
            OutputMode::Normal => print!("{}", render_table(headers, rows)),
            OutputMode::Quiet => {
                for row in rows {
                    println!("{}", row.cells().join("\t"));
                }
            }
            OutputMode::Json => match serde_json::to_string(rows) {
                Ok(json) => println!("{json}"),
                Err(e) => tracing::error!("Could not serialize table: {}", e),
            },
        }
    }

    fn event(&self, event: &str, message: &str, to_stderr: bool) {
        let event = JsonEvent {
            event,
            message,
            duration_secs: self.start_time.map(|_| self.elapsed_secs()),
        };
        if let Ok(json) = serde_json::to_string(&event) {
            if to_stderr {
                eprintln!("{json}");
            } else {
                println!("{json}");
            }
        }
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

/// Render a boxed, left-aligned text table.
pub fn render_table<R: TableRow>(headers: &[&str], rows: &[R]) -> String {
    let cells: Vec<Vec<String>> = rows.iter().map(|r| r.cells()).collect();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let separator = format!(
        "+{}+\n",
        widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+")
    );
    let line = |values: &[String]| {
        let padded: Vec<String> = widths
            .iter()
            .zip(values)
            .map(|(&w, v)| format!(" {v:<w$} "))
            .collect();
        format!("|{}|\n", padded.join("|"))
    };

    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    let mut out = separator.clone();
    out.push_str(&line(&header_cells));
    out.push_str(&separator);
    for row in &cells {
        out.push_str(&line(row));
    }
    out.push_str(&separator);
    out
}
