//! Output formatters for score reports.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use comfy_table::{Attribute, Cell, Color, Table, presets::UTF8_FULL};
use slotwise::{RankSummary, ReportStatus, ScoreReport, ScoredRow, SeriesKey, Slot};

/// CSV column name for a series value.
pub const fn csv_column(key: SeriesKey) -> &'static str {
    match key {
        SeriesKey::Tariff => "tariff_p_per_kwh",
        SeriesKey::SystemPrice => "system_p_per_kwh",
        SeriesKey::WindSpeed => "wind_speed_ms",
        SeriesKey::CloudCover => "cloud_cover_pct",
        SeriesKey::SolarRadiation => "solar_radiation_wm2",
    }
}

const fn label(key: SeriesKey) -> &'static str {
    match key {
        SeriesKey::Tariff => "Tariff",
        SeriesKey::SystemPrice => "System",
        SeriesKey::WindSpeed => "Wind",
        SeriesKey::CloudCover => "Cloud",
        SeriesKey::SolarRadiation => "Solar",
    }
}

/// Series present in at least one row, in display order.
fn series_keys(rows: &[ScoredRow]) -> Vec<SeriesKey> {
    rows.iter()
        .flat_map(|r| r.values.keys().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn local(ts: DateTime<Utc>, tz: Tz) -> DateTime<Tz> {
    ts.with_timezone(&tz)
}

fn score_header(mode: &str) -> &'static str {
    if mode == "preference" {
        "Penalty\n(lower is better)"
    } else {
        "Cheapness\n(0-100)"
    }
}

/// User-facing explanation for a report without rows.
pub fn status_message(status: &ReportStatus) -> Option<String> {
    match status {
        ReportStatus::Ready => None,
        ReportStatus::EmptyInput { source } => Some(format!(
            "No {source} data was returned for this window; try again later."
        )),
        ReportStatus::AlignmentEmpty => Some(
            "The inputs have no half-hour slots in common for this window; try again later."
                .to_string(),
        ),
    }
}

/// Formatter for console tables
pub struct TableFormatter;

/// Formatter for CSV export
pub struct CsvFormatter;

impl TableFormatter {
    /// Render the scored rows, the ranking summary and any status message.
    pub fn format_report(report: &ScoreReport, tz: Tz) -> String {
        let mut output = String::new();
        if let Some(msg) = status_message(&report.status) {
            output.push_str(&msg);
            output.push('\n');
            return output;
        }

        let keys = series_keys(&report.rows);
        let selected: BTreeSet<Slot> = report
            .ranking
            .iter()
            .flat_map(|r| r.selected.iter().map(|row| row.slot))
            .collect();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        let mut header = vec![
            Cell::new("Start").add_attribute(Attribute::Bold),
            Cell::new("End").add_attribute(Attribute::Bold),
        ];
        header.extend(
            keys.iter()
                .map(|k| Cell::new(format!("{}\n({})", label(*k), k.unit())).add_attribute(Attribute::Bold)),
        );
        header.push(Cell::new(score_header(&report.mode)).add_attribute(Attribute::Bold));
        table.set_header(header);

        for row in &report.rows {
            let mut cells = vec![
                Cell::new(local(row.slot.start(), tz).format("%a %d %b %H:%M")),
                Cell::new(local(row.slot.end(), tz).format("%H:%M")),
            ];
            cells.extend(keys.iter().map(|k| {
                Cell::new(row.value(*k).map_or_else(|| "-".to_string(), |v| format!("{v:.2}")))
            }));
            let score = Cell::new(format!("{:.1}", row.score));
            cells.push(if selected.contains(&row.slot) {
                score.fg(Color::Green).add_attribute(Attribute::Bold)
            } else {
                score
            });
            table.add_row(cells);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        let _ = writeln!(
            output,
            "{} slots scored ({}) | times in {}",
            report.rows.len(),
            report.mode,
            tz.name()
        );
        if let Some(summary) = &report.ranking {
            output.push_str(&Self::format_summary(summary, tz));
        }
        output
    }

    /// One-paragraph summary of the selected slots.
    pub fn format_summary(summary: &RankSummary, tz: Tz) -> String {
        let mut output = String::new();
        let _ = writeln!(
            output,
            "\nBest {} slots: {} at night",
            summary.selected.len(),
            summary.night_slots
        );
        if let Some(price) = summary.mean_price {
            let _ = writeln!(output, "  mean tariff: {price:.2} p/kWh");
        }
        if let Some(score) = summary.mean_score {
            let _ = writeln!(output, "  mean score:  {score:.1}");
        }
        for row in &summary.selected {
            let _ = writeln!(
                output,
                "  {}  {:>6.1}",
                local(row.slot.start(), tz).format("%a %H:%M"),
                row.score
            );
        }
        output
    }
}

impl CsvFormatter {
    /// Write one CSV record per scored row: `start,end,<series...>,score`.
    ///
    /// Times are RFC 3339 in `tz`. Missing values are left empty.
    pub fn write_report<W: Write>(report: &ScoreReport, tz: Tz, out: W) -> Result<()> {
        let keys = series_keys(&report.rows);
        let mut wtr = csv::Writer::from_writer(out);

        let mut header = vec!["start", "end"];
        header.extend(keys.iter().map(|k| csv_column(*k)));
        header.push("score");
        wtr.write_record(&header)?;

        for row in &report.rows {
            let mut record = vec![
                local(row.slot.start(), tz).to_rfc3339(),
                local(row.slot.end(), tz).to_rfc3339(),
            ];
            record.extend(
                keys.iter()
                    .map(|k| row.value(*k).map(|v| format!("{v:.4}")).unwrap_or_default()),
            );
            record.push(format!("{:.4}", row.score));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
