//! Question and question bank models
//!
//! The bank is an externally supplied dataset: a mapping from module
//! identifier to an ordered pool of questions. The controller only reads it.

use crate::{ExaniError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Largest number of options a question may carry
pub const MAX_OPTIONS: usize = 3;

/// Built-in sample bank shipped with the binary
const BUILTIN_BANK: &str = include_str!("../../data/questions.json");

/// Known modules and their display names
pub const MODULE_CATALOG: &[(&str, &str)] = &[
    ("pensamiento_matematico", "Pensamiento Matemático"),
    ("comprension_lectora", "Comprensión Lectora"),
    ("redaccion_indirecta", "Redacción Indirecta"),
    ("biologia", "Biología"),
    ("fisica", "Física"),
    ("quimica", "Química"),
    ("historia", "Historia"),
    ("literatura", "Literatura"),
];

/// Display name for a module identifier; unknown ids are shown as-is
pub fn module_display_name(id: &str) -> &str {
    MODULE_CATALOG
        .iter()
        .find(|(module, _)| *module == id)
        .map(|(_, name)| *name)
        .unwrap_or(id)
}

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Subject area the question belongs to
    pub area: String,
    /// Question statement
    pub text: String,
    /// Answer options in display order
    pub options: Vec<String>,
    /// Index of the correct option
    #[serde(rename = "correct")]
    pub correct_index: usize,
}

impl Question {
    pub fn new<S: Into<String>>(area: S, text: S, options: Vec<String>, correct_index: usize) -> Self {
        Self {
            area: area.into(),
            text: text.into(),
            options,
            correct_index,
        }
    }

    /// Check the question is well formed
    pub fn validate(&self) -> Result<()> {
        if self.options.len() < 2 || self.options.len() > MAX_OPTIONS {
            return Err(ExaniError::BankError(format!(
                "Question '{}' has {} options (expected 2 to {})",
                self.text,
                self.options.len(),
                MAX_OPTIONS
            )));
        }

        if self.correct_index >= self.options.len() {
            return Err(ExaniError::BankError(format!(
                "Question '{}' marks option {} correct but has only {} options",
                self.text,
                self.correct_index,
                self.options.len()
            )));
        }

        Ok(())
    }

    /// Whether `option` is the correct answer
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index
    }
}

/// Read-only mapping from module identifier to its question pool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    pools: BTreeMap<String, Vec<Question>>,
}

impl QuestionBank {
    /// Build a bank from pools, validating every question
    pub fn new(pools: BTreeMap<String, Vec<Question>>) -> Result<Self> {
        for (module, questions) in &pools {
            for question in questions {
                question
                    .validate()
                    .map_err(|e| ExaniError::BankError(format!("module '{}': {}", module, e)))?;
            }
        }
        Ok(Self { pools })
    }

    /// The sample bank embedded in the binary
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_BANK)
    }

    /// Parse a bank from its JSON form
    pub fn from_json(json: &str) -> Result<Self> {
        let pools: BTreeMap<String, Vec<Question>> = serde_json::from_str(json)
            .map_err(|e| ExaniError::BankError(format!("Failed to parse question bank: {}", e)))?;
        Self::new(pools)
    }

    /// Load a bank from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ExaniError::BankError(format!(
                "Failed to read question bank {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    /// Pool for a module; unknown modules are an empty pool
    pub fn pool(&self, module: &str) -> &[Question] {
        self.pools.get(module).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Module identifiers present in the bank
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }

    /// Total number of questions across all pools
    pub fn len(&self) -> usize {
        self.pools.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
