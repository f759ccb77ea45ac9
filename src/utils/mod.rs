//! Utility modules
//!
//! - Error types and result types
//! - Structural checks over generated LaTeX

pub mod diagnostics;
pub mod error;

// Re-export commonly used items
pub use diagnostics::{
    check_document, check_latex, format_diagnostics, CheckResult, Diagnostic, DiagnosticLevel,
};
pub use error::{ConversionError, ConversionResult};
