//! Parser configuration

use serde::{Deserialize, Serialize};

/// How the program assembler reacts to a syntax error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorMode {
    /// Stop at the first error
    #[default]
    FailFast,
    /// Skip to the next item and keep collecting errors
    Collect,
}

/// Options for [`crate::parser::parse_with_options`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    pub error_mode: ErrorMode,
    /// Upper bound on collected errors in [`ErrorMode::Collect`]
    pub max_errors: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::FailFast,
            max_errors: 20,
        }
    }
}

impl ParseOptions {
    pub fn collect_errors() -> Self {
        Self {
            error_mode: ErrorMode::Collect,
            ..Self::default()
        }
    }

    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors.max(1);
        self
    }

    /// Number of errors after which parsing stops
    pub fn error_limit(&self) -> usize {
        match self.error_mode {
            ErrorMode::FailFast => 1,
            ErrorMode::Collect => self.max_errors.max(1),
        }
    }
}
