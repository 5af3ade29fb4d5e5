//! Export list formatting

use chrono::{DateTime, Utc};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::archive::ExportInfo;

#[derive(Tabled)]
struct ExportRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "File")]
    filename: String,
    #[tabled(rename = "Written")]
    written: String,
    #[tabled(rename = "Age")]
    age: String,
    #[tabled(rename = "Size")]
    size: String,
}

/// Format export files as a table, newest first as given
pub fn format_export_list(exports: &[ExportInfo], now: DateTime<Utc>) -> String {
    if exports.is_empty() {
        return "No exports found.".to_string();
    }

    let rows: Vec<ExportRow> = exports
        .iter()
        .enumerate()
        .map(|(i, export)| ExportRow {
            index: i + 1,
            filename: export.filename.clone(),
            written: export.modified.format("%Y-%m-%d %H:%M UTC").to_string(),
            age: format_age(now.signed_duration_since(export.modified)),
            size: format_size(export.size_bytes),
        })
        .collect();

    format!(
        "{}\n\nTotal: {} export(s)",
        Table::new(rows).with(Style::psql()),
        exports.len()
    )
}

/// Format a duration in human-readable form
pub fn format_age(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use std::path::PathBuf;

    fn export(filename: &str, modified: DateTime<Utc>, size_bytes: u64) -> ExportInfo {
        ExportInfo {
            filename: filename.to_string(),
            path: PathBuf::from(filename),
            modified,
            size_bytes,
            export_date: None,
        }
    }

    #[test]
    fn test_format_export_list() {
        let now = Utc::now();
        let exports = vec![
            export("UserData.2024_03_07-1.json", now - Duration::hours(2), 2048),
            export("UserData.2024_03_07.json", now - Duration::days(3), 512),
        ];

        let output = format_export_list(&exports, now);
        assert!(output.contains("UserData.2024_03_07-1.json"));
        assert!(output.contains("2h"));
        assert!(output.contains("3d"));
        assert!(output.contains("2.0 KB"));
        assert!(output.contains("Total: 2 export(s)"));
    }

    #[test]
    fn test_empty_list() {
        assert_eq!(format_export_list(&[], Utc::now()), "No exports found.");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(12), "12 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_format_age_clamps_future() {
        assert_eq!(format_age(Duration::seconds(-5)), "0s");
        assert_eq!(format_age(Duration::days(65)), "2mo");
    }
}
