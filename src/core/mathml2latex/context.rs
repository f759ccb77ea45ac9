//! Conversion context and options for MathML to LaTeX conversion
//!
//! This module handles conversion options, recursion depth and warning
//! collection.

use super::element::Element;
use super::{ConversionWarning, WarningKind};

/// How the determinant layout treats column tables of unequal length
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum RaggedColumns {
    /// Pad short columns with empty cells
    #[default]
    Pad,
    /// Do not treat the row as a determinant; use the generic `mrow` rules
    Reject,
}

/// Options for MathML to LaTeX conversion
#[derive(Debug, Clone)]
pub struct M2LOptions {
    /// Run the identifier normalizer over the transducer output
    pub normalize_identifiers: bool,
    /// Run the LaTeX repair pass over the normalized output
    pub repair: bool,
    /// Policy for determinant column tables of unequal length
    pub ragged_columns: RaggedColumns,
    /// Maximum element nesting depth before descent stops
    pub max_depth: usize,
}

/// Default nesting limit; real formulas stay far below it
const DEFAULT_MAX_DEPTH: usize = 256;

impl Default for M2LOptions {
    fn default() -> Self {
        Self {
            normalize_identifiers: true,
            repair: true,
            ragged_columns: RaggedColumns::Pad,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl M2LOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transducer output only, no string-level post-processing
    pub fn raw() -> Self {
        Self {
            normalize_identifiers: false,
            repair: false,
            ..Default::default()
        }
    }

    /// Refuse to build determinants from ragged column tables
    pub fn strict_tables() -> Self {
        Self {
            ragged_columns: RaggedColumns::Reject,
            ..Default::default()
        }
    }
}

/// Conversion context threaded through the transducer
pub struct ConvertContext {
    /// Conversion options
    pub options: M2LOptions,
    /// Collected warnings during conversion
    pub warnings: Vec<ConversionWarning>,
    /// Current element nesting depth
    pub depth: usize,
}

impl ConvertContext {
    pub fn new() -> Self {
        Self::with_options(M2LOptions::default())
    }

    pub fn with_options(options: M2LOptions) -> Self {
        Self {
            options,
            warnings: Vec::new(),
            depth: 0,
        }
    }

    /// Record a warning tied to an element
    pub fn warn(&mut self, kind: WarningKind, element: &Element, message: impl Into<String>) {
        self.warnings
            .push(ConversionWarning::for_element(kind, &element.name, message));
    }

    /// Child fragment at `index`, or the empty fragment plus a warning when absent.
    pub fn required_child(
        &mut self,
        element: &Element,
        fragments: &[String],
        index: usize,
    ) -> String {
        match fragments.get(index) {
            Some(fragment) => fragment.clone(),
            None => {
                self.warn(
                    WarningKind::MissingChild,
                    element,
                    format!(
                        "<{}> expects a child at position {}, found {} children",
                        element.name,
                        index + 1,
                        fragments.len()
                    ),
                );
                String::new()
            }
        }
    }

    /// Whether descending one level further would exceed the depth limit
    pub fn at_depth_limit(&self) -> bool {
        self.depth >= self.options.max_depth
    }
}

impl Default for ConvertContext {
    fn default() -> Self {
        Self::new()
    }
}
