//! Results export module
//!
//! Writes a finished exam's report as a JSON document and a one-row CSV
//! summary into the export directory.

use crate::config::Settings;
use crate::models::ExamReport;
use crate::{ExaniError, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const JSON_PREFIX: &str = "EXANI-II_Resultados_";
const CSV_PREFIX: &str = "EXANI-II_Resumen_";

/// Files produced by one export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFiles {
    pub json: PathBuf,
    pub csv: PathBuf,
}

/// Export writer bound to a directory
#[derive(Debug, Clone)]
pub struct ReportExporter {
    export_dir: PathBuf,
}

impl ReportExporter {
    /// Create an exporter writing into `export_dir`
    pub fn new<P: Into<PathBuf>>(export_dir: P) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    /// Create an exporter for the configured (or default) export directory
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(settings.resolved_export_dir()?))
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    /// Write the report using the current local time in the file names
    pub fn export(&self, report: &ExamReport) -> Result<ExportedFiles> {
        self.export_at(report, Local::now())
    }

    /// Write the report with file names stamped `YYYYmmdd_HHMMSS` from `at`
    pub fn export_at(&self, report: &ExamReport, at: DateTime<Local>) -> Result<ExportedFiles> {
        fs::create_dir_all(&self.export_dir).map_err(|e| {
            ExaniError::ExportError(format!(
                "Failed to create export directory {}: {}",
                self.export_dir.display(),
                e
            ))
        })?;

        let stamp = at.format("%Y%m%d_%H%M%S");
        let json_path = self.export_dir.join(format!("{}{}.json", JSON_PREFIX, stamp));
        let csv_path = self.export_dir.join(format!("{}{}.csv", CSV_PREFIX, stamp));

        write_file(&json_path, &report.to_json()?)?;
        write_file(&csv_path, &report.to_csv())?;

        info!(json = %json_path.display(), csv = %csv_path.display(), "results exported");

        Ok(ExportedFiles {
            json: json_path,
            csv: csv_path,
        })
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| {
        ExaniError::ExportError(format!("Failed to write {}: {}", path.display(), e))
    })
}
