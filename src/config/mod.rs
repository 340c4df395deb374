//! Configuration management module
//!
//! Handles loading, saving, and validation of the exam configuration
//! and application settings.

use crate::{ExaniError, Result, APP_NAME, CONFIG_FILE, EXPORT_DIR};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

pub mod export;

/// Dashboard editing bounds for the time limit (minutes)
pub const TIME_LIMIT_RANGE: (u32, u32) = (30, 300);
pub const TIME_LIMIT_STEP: u32 = 15;
/// Dashboard editing bounds for the question count
pub const QUESTION_COUNT_RANGE: (usize, usize) = (10, 138);
pub const QUESTION_COUNT_STEP: usize = 5;

/// Kind of exam being simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExamType {
    /// Cross-curricular areas: math, reading, writing
    Transversales,
    /// Discipline-specific modules
    Disciplinares,
    /// The full simulated exam
    Completo,
    /// Diagnostic English section
    Ingles,
}

impl ExamType {
    pub fn all() -> [Self; 4] {
        [
            Self::Transversales,
            Self::Disciplinares,
            Self::Completo,
            Self::Ingles,
        ]
    }

    /// Identifier used in exports and on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transversales => "transversales",
            Self::Disciplinares => "disciplinares",
            Self::Completo => "completo",
            Self::Ingles => "ingles",
        }
    }

    /// Get a human-readable description of the exam type
    pub fn description(&self) -> &'static str {
        match self {
            Self::Transversales => "Áreas Transversales",
            Self::Disciplinares => "Módulos Específicos",
            Self::Completo => "EXANI-II Completo",
            Self::Ingles => "Información Diagnóstica",
        }
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExamType {
    type Err = ExaniError;

    fn from_str(s: &str) -> Result<Self> {
        Self::all()
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ExaniError::ConfigError(format!("Unknown exam type: {}", s)))
    }
}

/// Exam configuration chosen on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamConfig {
    /// Kind of exam
    pub exam_type: ExamType,
    /// Selected module identifiers
    pub modules: BTreeSet<String>,
    /// Time limit for the whole exam, in minutes
    pub time_limit_minutes: u32,
    /// Number of questions to generate
    pub question_count: usize,
}

impl Default for ExamConfig {
    fn default() -> Self {
        Self {
            question_count: 30,
            ..Self::transversales()
        }
    }
}

fn module_set(ids: &[&str]) -> BTreeSet<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

impl ExamConfig {
    /// Create a new exam configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for the cross-curricular exam
    pub fn transversales() -> Self {
        Self {
            exam_type: ExamType::Transversales,
            modules: module_set(&[
                "pensamiento_matematico",
                "comprension_lectora",
                "redaccion_indirecta",
            ]),
            time_limit_minutes: 180,
            question_count: 90,
        }
    }

    /// Preset for the discipline-specific modules
    pub fn disciplinares() -> Self {
        Self {
            exam_type: ExamType::Disciplinares,
            modules: module_set(&["biologia", "fisica", "quimica"]),
            time_limit_minutes: 120,
            question_count: 48,
        }
    }

    /// Preset for the full simulated exam
    pub fn completo() -> Self {
        Self {
            exam_type: ExamType::Completo,
            modules: module_set(&[
                "pensamiento_matematico",
                "comprension_lectora",
                "redaccion_indirecta",
                "biologia",
                "fisica",
            ]),
            time_limit_minutes: 270,
            question_count: 138,
        }
    }

    /// Preset for the diagnostic English section
    pub fn ingles() -> Self {
        Self {
            exam_type: ExamType::Ingles,
            // no English pool in the bank yet; literature stands in
            modules: module_set(&["literatura"]),
            time_limit_minutes: 30,
            question_count: 30,
        }
    }

    /// Preset matching an exam type
    pub fn preset(exam_type: ExamType) -> Self {
        match exam_type {
            ExamType::Transversales => Self::transversales(),
            ExamType::Disciplinares => Self::disciplinares(),
            ExamType::Completo => Self::completo(),
            ExamType::Ingles => Self::ingles(),
        }
    }

    /// Validate the configuration parameters.
    ///
    /// An empty module selection is not rejected here; it is reported by
    /// `ExamController::start_exam` so a partially edited config can still
    /// be saved.
    pub fn validate(&self) -> Result<()> {
        if self.time_limit_minutes == 0 {
            return Err(ExaniError::ConfigError(
                "Time limit must be at least 1 minute".to_string(),
            ));
        }

        if self.question_count == 0 {
            return Err(ExaniError::ConfigError(
                "Question count must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Time limit in seconds
    pub fn time_limit_seconds(&self) -> u64 {
        u64::from(self.time_limit_minutes) * 60
    }

    /// Set the exam type
    pub fn with_exam_type(mut self, exam_type: ExamType) -> Self {
        self.exam_type = exam_type;
        self
    }

    /// Replace the module selection
    pub fn with_modules<I, S>(mut self, modules: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules = modules.into_iter().map(Into::into).collect();
        self
    }

    /// Set the time limit in minutes
    pub fn with_time_limit(mut self, minutes: u32) -> Self {
        self.time_limit_minutes = minutes;
        self
    }

    /// Set the number of questions
    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = count;
        self
    }

    /// Add or remove a module from the selection
    pub fn toggle_module(&mut self, module: &str) {
        if !self.modules.remove(module) {
            self.modules.insert(module.to_string());
        }
    }

    /// Step the time limit within the dashboard bounds
    pub fn step_time_limit(&mut self, up: bool) {
        let (min, max) = TIME_LIMIT_RANGE;
        self.time_limit_minutes = if up {
            self.time_limit_minutes.saturating_add(TIME_LIMIT_STEP).min(max)
        } else {
            self.time_limit_minutes.saturating_sub(TIME_LIMIT_STEP).max(min)
        };
    }

    /// Step the question count within the dashboard bounds
    pub fn step_question_count(&mut self, up: bool) {
        let (min, max) = QUESTION_COUNT_RANGE;
        self.question_count = if up {
            self.question_count.saturating_add(QUESTION_COUNT_STEP).min(max)
        } else {
            self.question_count.saturating_sub(QUESTION_COUNT_STEP).max(min)
        };
    }
}

/// Persistent application settings: the last exam configuration plus
/// where exports go and which question bank to load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Directory for exported results; defaults to the data directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    /// External question bank file; the built-in bank is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_path: Option<PathBuf>,
    /// Last exam configuration used on the dashboard
    pub exam: ExamConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            export_dir: None,
            bank_path: None,
            exam: ExamConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from the standard config file location.
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Load settings from a specific file
    pub fn load_from(config_path: &std::path::Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            ExaniError::ConfigError(format!(
                "Failed to read config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        let settings: Self = toml::from_str(&content).map_err(|e| {
            ExaniError::ConfigError(format!(
                "Failed to parse config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        settings.exam.validate()?;

        Ok(settings)
    }

    /// Save settings to the standard config file location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Save settings to a specific file
    pub fn save_to(&self, config_path: &std::path::Path) -> Result<()> {
        self.exam.validate()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ExaniError::ConfigError(format!(
                    "Failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = toml::to_string_pretty(self)?;

        fs::write(config_path, content).map_err(|e| {
            ExaniError::ConfigError(format!(
                "Failed to write config file {}: {}",
                config_path.display(),
                e
            ))
        })?;

        Ok(())
    }

    /// Get the standard configuration file path
    /// Uses $CONFIG_HOME/exani/exani.toml
    pub fn config_file_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ExaniError::ConfigError("Unable to determine config directory".to_string())
        })?;

        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Resolve the export directory, falling back to $DATA_HOME/exani/exports
    pub fn resolved_export_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.export_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir().ok_or_else(|| {
            ExaniError::ConfigError("Unable to determine data directory".to_string())
        })?;

        Ok(data_dir.join(APP_NAME).join(EXPORT_DIR))
    }
}
