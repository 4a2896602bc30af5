//! Plain-text quote table.
//!
//! Columns are padded on the plain cell text first; color escapes are wrapped
//! around the padded text afterwards so alignment does not depend on them.
use std::io::{self, Write};

use rust_decimal::{Decimal, RoundingStrategy};
use stockterm_common::quote::QuoteSnapshot;

const HEADERS: [&str; 6] = [
    "Ticker",
    "Last Price",
    "Change",
    "Change %",
    "Prev. Close",
    "Currency",
];
const CHANGE_COLUMNS: [usize; 2] = [2, 3];
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";
/// Shown when the percent change is undefined.
pub const UNDEFINED: &str = "n/a";

/// Renders quote snapshots as a bordered table.
#[derive(Debug, Clone, Copy)]
pub struct TableRenderer {
    color: bool,
}

impl TableRenderer {
    /// Renderer; `color` enables green/red change cells.
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    /// Writes the table for `snapshots` to `out`.
    pub fn render<W: Write>(&self, out: &mut W, snapshots: &[QuoteSnapshot]) -> io::Result<()> {
        let rows: Vec<[String; 6]> = snapshots.iter().map(row).collect();
        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        let border = separator(&widths);
        writeln!(out, "{}", border)?;
        let header: Vec<String> = HEADERS
            .iter()
            .zip(widths)
            .map(|(h, w)| format!("{:<w$}", h))
            .collect();
        writeln!(out, "| {} |", header.join(" | "))?;
        writeln!(out, "{}", border)?;
        for row in &rows {
            let cells: Vec<String> = row
                .iter()
                .zip(widths)
                .enumerate()
                .map(|(column, (cell, w))| {
                    let padded = if column == 0 || column == 5 {
                        format!("{:<w$}", cell)
                    } else {
                        format!("{:>w$}", cell)
                    };
                    if CHANGE_COLUMNS.contains(&column) {
                        self.colorize(cell, padded)
                    } else {
                        padded
                    }
                })
                .collect();
            writeln!(out, "| {} |", cells.join(" | "))?;
        }
        writeln!(out, "{}", border)
    }

    fn colorize(&self, cell: &str, padded: String) -> String {
        if !self.color {
            return padded;
        }
        if cell.starts_with('-') {
            format!("{}{}{}", RED, padded, RESET)
        } else if cell.starts_with('+') {
            format!("{}{}{}", GREEN, padded, RESET)
        } else {
            padded
        }
    }
}

fn row(snapshot: &QuoteSnapshot) -> [String; 6] {
    [
        snapshot.ticker.to_string(),
        format!("{:.2}", two_places(snapshot.last_price)),
        signed(snapshot.change, ""),
        snapshot
            .change_percent
            .map(|p| signed(p, "%"))
            .unwrap_or_else(|| UNDEFINED.to_string()),
        format!("{:.2}", two_places(snapshot.previous_close)),
        snapshot.currency.clone(),
    ]
}

fn separator(widths: &[usize; 6]) -> String {
    let segments: Vec<String> = widths.iter().map(|w| "-".repeat(w + 2)).collect();
    format!("+{}+", segments.join("+"))
}

fn two_places(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Two decimals with an explicit sign, e.g. `+1.25` or `-0.40`.
pub fn signed(value: Decimal, suffix: &str) -> String {
    let rounded = two_places(value);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("{:.2}{}", rounded, suffix)
    } else {
        format!("+{:.2}{}", rounded.abs(), suffix)
    }
}
