//! Plain-text observation report.
//!
//! The field order and formats here are an external contract (consumers
//! paste or archive the text verbatim), so they are covered by golden
//! tests: header, per-mode durations, per-action counts and durations, then
//! the retained log stream. Durations render as `分/秒`, times as `HH:MM:SS`
//! in the caller-supplied offset.

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::Result;
use crate::session::Session;
use crate::taxonomy::Taxonomy;

/// Render a duration in seconds as `{m}分 {s}秒`.
pub fn format_duration(secs: u64) -> String {
    format!("{}分 {}秒", secs / 60, secs % 60)
}

/// Render the full report for a finished or in-progress session.
///
/// `offset` is the viewer's timezone; all timestamps in the report are local
/// to it, which keeps the output deterministic for a given session.
pub fn render(session: &Session, taxonomy: &Taxonomy, subject: &str, offset: FixedOffset) -> String {
    let mut out = String::new();

    out.push_str("【Chronos 數位觀課報告】\n");
    out.push_str(&format!("科目: {subject}\n"));
    out.push_str(&format!("日期: {}\n", date_line(session.started_at, offset)));
    out.push_str(&format!(
        "時間: {} - {}\n\n",
        time_or_dashes(session.started_at, offset),
        time_or_dashes(session.ended_at, offset),
    ));

    out.push_str("== [1] 教學模式累計時間 ==\n");
    for (id, mode) in taxonomy.modes() {
        out.push_str(&format!(
            "{}: {}\n",
            mode.label,
            format_duration(session.mode_duration(id))
        ));
    }

    out.push_str("\n== [2] 教學行為細節統計 (次數 與 持續時間) ==\n");
    for (id, action) in taxonomy.actions() {
        out.push_str(&format!(
            "{}: {} 次 | 累計時間: {}\n",
            action.label,
            session.action_count(id),
            format_duration(session.action_duration(id))
        ));
    }

    out.push_str("\n== [3] 詳細紀錄流 ==\n");
    for entry in &session.log {
        let time = entry.timestamp.with_timezone(&offset).format("%H:%M:%S");
        match &entry.value {
            Some(value) => out.push_str(&format!("[{time}] {}: {value}\n", entry.label)),
            None => out.push_str(&format!("[{time}] {}\n", entry.label)),
        }
    }

    out
}

/// Write a report to disk, prepending a UTF-8 byte-order mark so the target
/// viewer detects the encoding.
pub fn write_with_bom(path: &std::path::Path, report: &str) -> Result<()> {
    let mut bytes = Vec::with_capacity(report.len() + 3);
    bytes.extend_from_slice("\u{FEFF}".as_bytes());
    bytes.extend_from_slice(report.as_bytes());
    std::fs::write(path, bytes)?;
    Ok(())
}

fn date_line(started_at: Option<DateTime<Utc>>, offset: FixedOffset) -> String {
    match started_at {
        Some(at) => at.with_timezone(&offset).format("%Y/%-m/%-d").to_string(),
        None => "--".to_string(),
    }
}

fn time_or_dashes(at: Option<DateTime<Utc>>, offset: FixedOffset) -> String {
    match at {
        Some(at) => at.with_timezone(&offset).format("%H:%M:%S").to_string(),
        None => "--:--:--".to_string(),
    }
}
