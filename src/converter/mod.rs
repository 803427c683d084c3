pub mod nbconvert;

pub use nbconvert::NbConvert;

use serde::Serialize;
use std::path::Path;

/// Result of converting a single notebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Success,
    Failure { message: String },
}

impl ConversionOutcome {
    pub fn failure<S: Into<String>>(message: S) -> Self {
        ConversionOutcome::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Success)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ConversionOutcome::Success => None,
            ConversionOutcome::Failure { message } => Some(message),
        }
    }
}

/// Something that turns one notebook into a document inside `output_dir`.
///
/// Failures are values, not errors: a failed notebook never stops the batch.
pub trait Converter {
    fn convert(&self, input: &Path, output_dir: &Path) -> ConversionOutcome;

    /// Human-readable rendering of the invocation, used by dry runs.
    fn describe(&self, input: &Path, output_dir: &Path) -> String {
        format!("convert {} -> {}", input.display(), output_dir.display())
    }
}

impl<C: Converter + ?Sized> Converter for &C {
    fn convert(&self, input: &Path, output_dir: &Path) -> ConversionOutcome {
        (**self).convert(input, output_dir)
    }

    fn describe(&self, input: &Path, output_dir: &Path) -> String {
        (**self).describe(input, output_dir)
    }
}
