//! Generator and emitter settings.
//!
//! Everything here is plain serde data so a settings file can carry it; the
//! CLI layers its flags on top of whatever the file provided.

use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::emit::{EmitOptions, Language};
use crate::error::{Error, Result};

// ------------------------------- Policy ---------------------------------- //

pub const DEFAULT_ROOT_NAME: &str = "Root";
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// What happens to a field that some examples of a class do not carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbsencePolicy {
    /// Any key missing from at least one example becomes nullable.
    #[default]
    Retroactive,
    /// Only keys first seen after the first example become nullable; a key
    /// that later goes missing keeps the type it had.
    ForwardOnly,
}

/// Which strings classify as `Date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatePolicy {
    pub enabled: bool,
    /// Accept RFC 3339 timestamps (`2024-01-15T10:30:00Z`).
    pub rfc3339: bool,
    /// Extra chrono `strftime` formats; tried as date-times first, then as
    /// plain dates.
    pub formats: Vec<String>,
}

impl Default for DatePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            rfc3339: true,
            formats: vec![
                "%Y-%m-%dT%H:%M:%S%.f".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%d".to_string(),
            ],
        }
    }
}

impl DatePolicy {
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }
}

/// When an object is read as a map (`Dictionary`) instead of a fixed class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryPolicy {
    pub enabled: bool,
    /// Fewest members an object needs before its keys are judged.
    pub min_keys: usize,
}

impl Default for DictionaryPolicy {
    fn default() -> Self {
        Self { enabled: true, min_keys: 1 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub root_name: String,
    /// Title-case member identifiers (`first_name` → `FirstName`).
    pub use_pascal_case: bool,
    pub absence: AbsencePolicy,
    pub dates: DatePolicy,
    pub dictionaries: DictionaryPolicy,
    /// Deepest class nesting the builder descends into.
    pub max_depth: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            root_name: DEFAULT_ROOT_NAME.to_string(),
            use_pascal_case: false,
            absence: AbsencePolicy::default(),
            dates: DatePolicy::default(),
            dictionaries: DictionaryPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl GeneratorConfig {
    #[must_use]
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = name.into();
        self
    }

    #[must_use]
    pub fn with_pascal_case(mut self, enabled: bool) -> Self {
        self.use_pascal_case = enabled;
        self
    }

    #[must_use]
    pub fn with_absence(mut self, policy: AbsencePolicy) -> Self {
        self.absence = policy;
        self
    }

    #[must_use]
    pub fn with_dates(mut self, policy: DatePolicy) -> Self {
        self.dates = policy;
        self
    }

    #[must_use]
    pub fn with_dictionaries(mut self, policy: DictionaryPolicy) -> Self {
        self.dictionaries = policy;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

// ------------------------------ Settings file ----------------------------- //

/// Contents of a `--config` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub generator: GeneratorConfig,
    pub emit: EmitOptions,
    pub language: Language,
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&src)
    }

    pub fn from_json(src: &str) -> Result<Self> {
        crate::path_de::from_str_with_path(src)
    }
}
