// src/export/mod.rs

pub mod csv;
mod fs_utils;
pub mod pdf;
pub mod poster;
pub mod qr;
pub mod share;

pub use fs_utils::ensure_export_dir;
pub use share::{ShareOutcome, Sharer};

use crate::ui::messages::success;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use std::path::Path;

/// Common completion message for every artifact.
pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

/// `attendance_1704103200000.csv`: prefix, unix millis, extension.
pub fn timestamped_name(prefix: &str, ext: &str, now: DateTime<Utc>) -> String {
    format!("{prefix}_{}.{ext}", now.timestamp_millis())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PosterFormat {
    Pdf,
    Html,
}

impl PosterFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            PosterFormat::Pdf => "pdf",
            PosterFormat::Html => "html",
        }
    }

    pub fn mime(&self) -> &'static str {
        match self {
            PosterFormat::Pdf => "application/pdf",
            PosterFormat::Html => "text/html",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn names_carry_unix_millis() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert_eq!(
            timestamped_name("attendance", "csv", now),
            "attendance_1704103200000.csv"
        );
    }
}
