//! # mathtex
//!
//! MathML to LaTeX converter, and HTML-with-MathML to Markdown-style text.
//!
//! ## Features
//!
//! - **Tree transducer**: tag-directed conversion of presentation and content MathML
//! - **Layout detection**: `cases` systems, matrices, determinants written as column tables
//! - **Numerals**: Persian and Arabic-Indic digits normalized to ASCII
//! - **Repair passes**: function-name escaping and split-command repair on the output
//! - **Documents**: every `<math>` in an HTML page replaced by a `$$` block
//! - **WASM Support**: compiles to WebAssembly for browser usage
//!
//! ## Usage Examples
//!
//! ### Single formula
//!
//! ```rust
//! use mathtex::mathml_to_latex;
//!
//! let latex = mathml_to_latex("<mfrac><mi>x</mi><mn>2</mn></mfrac>").unwrap();
//! assert_eq!(latex, r"\frac{x}{2}");
//! ```
//!
//! ### Whole document
//!
//! ```rust
//! use mathtex::html_to_markdown;
//!
//! let text = html_to_markdown(
//!     r#"<p>Half: <span class="az-formula"><math><mfrac><mi>x</mi><mn>2</mn></mfrac></math></span></p>"#,
//! );
//! assert_eq!(text, "Half:\n$$\n\\frac{x}{2}\n$$");
//! ```

/// Core conversion modules
pub mod core;

/// Data layer - static mappings
pub mod data;

/// Utility modules
pub mod utils;

/// WASM bindings (feature-gated)
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export core conversion functions
pub use core::html2md;
pub use core::html2md::{
    html_to_markdown, html_to_markdown_with_diagnostics, html_to_markdown_with_options,
    DocumentResult, H2MOptions,
};
pub use core::mathml2latex;
pub use core::mathml2latex::{
    convert_element_to_latex, mathml_to_latex, mathml_to_latex_with_diagnostics,
    mathml_to_latex_with_options, parse_mathml, ConversionWarning, Element, M2LOptions,
    MathResult, RaggedColumns, WarningKind,
};

// Re-export data modules
pub use data::maps;

// Re-export utilities
pub use utils::diagnostics;
pub use utils::error::{ConversionError, ConversionResult};

/// Input kinds accepted by the converters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// A standalone MathML fragment
    MathMl,
    /// An HTML document or fragment
    Html,
}

impl InputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::MathMl => "mathml",
            InputFormat::Html => "html",
        }
    }
}

/// Detect whether input is a bare MathML fragment or HTML.
///
/// The input is MathML when its first element is a MathML tag (`<math>`,
/// `<mrow>`, `<m:math>`, ...); anything else, including plain text, is HTML.
pub fn detect_format(input: &str) -> InputFormat {
    let Some(name) = first_element_name(input) else {
        return InputFormat::Html;
    };
    if mathml2latex::Tag::from_name(name) != mathml2latex::Tag::Other {
        InputFormat::MathMl
    } else {
        InputFormat::Html
    }
}

/// Name of the first start tag, skipping declarations, comments and
/// processing instructions.
fn first_element_name(input: &str) -> Option<&str> {
    let mut rest = input;
    loop {
        let start = rest.find('<')?;
        rest = &rest[start + 1..];
        if rest.starts_with(['!', '?', '/']) {
            continue;
        }
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
            .unwrap_or(rest.len());
        return Some(&rest[..end]).filter(|name| !name.is_empty());
    }
}

/// Convert input of either kind, detecting which it is.
///
/// MathML fragments yield a bare LaTeX string; HTML yields document text with
/// `$$` blocks.
pub fn convert_auto(input: &str) -> ConversionResult<(String, InputFormat)> {
    match detect_format(input) {
        InputFormat::MathMl => Ok((mathml_to_latex(input)?, InputFormat::MathMl)),
        InputFormat::Html => Ok((html_to_markdown(input), InputFormat::Html)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect_format_mathml() {
        assert_eq!(detect_format("<math><mi>x</mi></math>"), InputFormat::MathMl);
        assert_eq!(detect_format("  <mrow><mi>x</mi></mrow>"), InputFormat::MathMl);
        assert_eq!(
            detect_format(r#"<?xml version="1.0"?><m:math xmlns:m="x"></m:math>"#),
            InputFormat::MathMl
        );
    }

    #[test]
    fn test_detect_format_html() {
        assert_eq!(detect_format("<!DOCTYPE html><html></html>"), InputFormat::Html);
        assert_eq!(detect_format("<p>text <math></math></p>"), InputFormat::Html);
        assert_eq!(detect_format("no markup at all"), InputFormat::Html);
        assert_eq!(detect_format("<!-- c --><div></div>"), InputFormat::Html);
    }

    #[test]
    fn test_convert_auto() {
        let (out, format) = convert_auto("<msqrt><mn>2</mn></msqrt>").unwrap();
        assert_eq!(format, InputFormat::MathMl);
        assert_eq!(out, "\\sqrt{2}");

        let (out, format) = convert_auto("<p>a <math><mi>b</mi></math></p>").unwrap();
        assert_eq!(format, InputFormat::Html);
        assert_eq!(out, "a\n$$\nb\n$$");
    }

    #[test]
    fn test_convert_auto_reports_mathml_parse_errors() {
        assert!(convert_auto("<mfrac><mi>x</mi>").is_err());
    }

    #[test]
    fn test_options_presets() {
        let opts = M2LOptions::strict_tables();
        assert_eq!(opts.ragged_columns, RaggedColumns::Reject);
        assert!(opts.repair);

        let opts = H2MOptions::with_formula_class("formula");
        assert_eq!(opts.formula_class, "formula");
        assert_eq!(opts.wrapper_tag, "span");
    }
}
