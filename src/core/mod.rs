//! Core conversion modules
//!
//! This module contains the conversion engines:
//! - `mathml2latex`: MathML element tree to LaTeX (tree transducer + string passes)
//! - `html2md`: HTML documents with embedded MathML to text with `$$` blocks

pub mod html2md;
pub mod mathml2latex;

// Re-export main types and functions from mathml2latex
pub use mathml2latex::{
    convert_element_to_latex, mathml_to_latex, mathml_to_latex_with_diagnostics,
    mathml_to_latex_with_options, parse_mathml, ConversionWarning, Element, M2LOptions,
    MathResult, RaggedColumns, Tag, WarningKind,
};

// Re-export main types and functions from html2md
pub use html2md::{
    formula_block, html_to_markdown, html_to_markdown_with_diagnostics,
    html_to_markdown_with_options, DocumentResult, H2MOptions,
};
