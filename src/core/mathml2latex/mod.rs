//! MathML to LaTeX converter
//!
//! A MathML element tree goes through three stages:
//!
//! ```text
//! Element tree -> tag-directed transducer -> identifier normalizer -> repair pass
//! ```
//!
//! The transducer never fails. Malformed structure (missing children, unknown
//! content operators, ragged determinant columns) is recorded as a
//! [`ConversionWarning`] and conversion continues with a best-effort fragment.

pub mod context;
pub mod element;
mod math;
pub mod parser;
pub mod postprocess;
mod table;
pub mod utils;

pub use context::{ConvertContext, M2LOptions, RaggedColumns};
pub use element::{Element, Tag};
pub use math::convert_element;
pub use parser::parse_mathml;
pub use postprocess::{normalize_identifiers, repair_latex};
pub use utils::normalize_digits;

use crate::utils::error::ConversionResult;

// =============================================================================
// Warning System
// =============================================================================

/// Kind of warning generated during MathML to LaTeX conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "snake_case"))]
pub enum WarningKind {
    /// A fixed-arity element lacked a child; the empty fragment was used
    MissingChild,
    /// Determinant column tables had different row counts
    RaggedDeterminant,
    /// `<apply>` used an operator element with no known LaTeX token
    UnknownOperator,
    /// Nesting exceeded `M2LOptions::max_depth`
    RecursionLimitExceeded,
    /// The document had an odd number of `$$` delimiters
    UnbalancedDelimiters,
}

impl std::fmt::Display for WarningKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WarningKind::MissingChild => write!(f, "missing child"),
            WarningKind::RaggedDeterminant => write!(f, "ragged determinant"),
            WarningKind::UnknownOperator => write!(f, "unknown operator"),
            WarningKind::RecursionLimitExceeded => write!(f, "recursion limit exceeded"),
            WarningKind::UnbalancedDelimiters => write!(f, "unbalanced delimiters"),
        }
    }
}

/// A warning generated during conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ConversionWarning {
    /// The kind of warning (for programmatic handling)
    pub kind: WarningKind,
    /// Human-readable warning message
    pub message: String,
    /// Name of the element the warning is about, if any
    pub tag: Option<String>,
}

impl ConversionWarning {
    /// Create a new warning with a kind and message.
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tag: None,
        }
    }

    /// Create a warning about a specific element.
    pub fn for_element(kind: WarningKind, tag: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            tag: Some(tag.to_string()),
        }
    }
}

impl std::fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "[{}] <{}>: {}", self.kind, tag, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

/// Result of converting one formula, with diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct MathResult {
    /// The LaTeX fragment, without `$$` delimiters
    pub latex: String,
    /// Warnings generated during conversion
    pub warnings: Vec<ConversionWarning>,
}

impl MathResult {
    pub fn ok(latex: String) -> Self {
        Self {
            latex,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(latex: String, warnings: Vec<ConversionWarning>) -> Self {
        Self { latex, warnings }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get warnings as formatted strings.
    pub fn format_warnings(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Run the full pipeline over an already built element tree.
pub fn convert_element_to_latex(element: &Element, options: &M2LOptions) -> MathResult {
    let mut ctx = ConvertContext::with_options(options.clone());
    let raw = math::convert_element(element, &mut ctx);
    let latex = post_process(raw, options);

    tracing::debug!(
        root = %element.name,
        warnings = ctx.warnings.len(),
        "converted formula"
    );

    MathResult::with_warnings(latex, ctx.warnings)
}

fn post_process(latex: String, options: &M2LOptions) -> String {
    let latex = if options.normalize_identifiers {
        normalize_identifiers(&latex)
    } else {
        latex
    };
    if options.repair {
        repair_latex(&latex)
    } else {
        latex
    }
}

/// Convert MathML source to LaTeX
pub fn mathml_to_latex(input: &str) -> ConversionResult<String> {
    mathml_to_latex_with_options(input, &M2LOptions::default())
}

/// Convert MathML source to LaTeX with options
pub fn mathml_to_latex_with_options(input: &str, options: &M2LOptions) -> ConversionResult<String> {
    Ok(mathml_to_latex_with_diagnostics(input, options)?.latex)
}

/// Convert MathML source to LaTeX, returning the warnings alongside.
///
/// Only parsing can fail; once the tree is built, conversion always yields a
/// fragment.
///
/// # Example
/// ```
/// use mathtex::core::mathml2latex::{mathml_to_latex_with_diagnostics, M2LOptions};
///
/// let result = mathml_to_latex_with_diagnostics(
///     "<msup><mi>x</mi></msup>",
///     &M2LOptions::default(),
/// ).unwrap();
/// assert_eq!(result.latex, "x^{}");
/// assert!(result.has_warnings());
/// ```
pub fn mathml_to_latex_with_diagnostics(
    input: &str,
    options: &M2LOptions,
) -> ConversionResult<MathResult> {
    let element = parse_mathml(input)?;
    Ok(convert_element_to_latex(&element, options))
}
