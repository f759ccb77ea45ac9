//! HTML with embedded MathML to Markdown-style text
//!
//! Every `<math>` element is converted to LaTeX and spliced into the document
//! text as a display block:
//!
//! ```text
//! <p>Solve <span class="az-formula"><math>..</math></span></p>
//!   -> Solve
//!      $$
//!      \frac{x}{2}
//!      $$
//! ```
//!
//! A formula replaces its nearest wrapper (`<span class="az-formula">` by
//! default) when one exists, otherwise just the `<math>` element itself.

mod dom;

use crate::core::mathml2latex::{ConversionWarning, M2LOptions, WarningKind};
use dom::{FormulaScan, TextCollector};
use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::RcDom;

/// Display-math delimiter
pub const BLOCK_DELIMITER: &str = "$$";

/// Options for HTML to Markdown conversion
#[derive(Debug, Clone)]
pub struct H2MOptions {
    /// Class that marks a formula wrapper element
    pub formula_class: String,
    /// Tag name of formula wrapper elements
    pub wrapper_tag: String,
    /// Options for each formula
    pub math: M2LOptions,
    /// Strip trailing `$` when the output has an odd number of `$$`
    pub fix_unbalanced_delimiters: bool,
}

impl Default for H2MOptions {
    fn default() -> Self {
        Self {
            formula_class: "az-formula".to_string(),
            wrapper_tag: "span".to_string(),
            math: M2LOptions::default(),
            fix_unbalanced_delimiters: true,
        }
    }
}

impl H2MOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formula_class(class: impl Into<String>) -> Self {
        Self {
            formula_class: class.into(),
            ..Default::default()
        }
    }
}

/// Result of converting a whole document.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct DocumentResult {
    /// Cleaned document text with `$$` blocks
    pub output: String,
    /// Number of formulas spliced into the output
    pub formulas: usize,
    /// Warnings from every formula plus document-level checks
    pub warnings: Vec<ConversionWarning>,
}

impl DocumentResult {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn format_warnings(&self) -> Vec<String> {
        self.warnings.iter().map(|w| w.to_string()).collect()
    }
}

/// Wrap a LaTeX fragment as a display block
pub fn formula_block(latex: &str) -> String {
    format!("\n\n{d}\n{}\n{d}\n\n", latex, d = BLOCK_DELIMITER)
}

/// Convert an HTML document to text with `$$` formula blocks
pub fn html_to_markdown(html: &str) -> String {
    html_to_markdown_with_options(html, &H2MOptions::default())
}

/// Convert an HTML document with options
pub fn html_to_markdown_with_options(html: &str, options: &H2MOptions) -> String {
    html_to_markdown_with_diagnostics(html, options).output
}

/// Convert an HTML document, returning the warnings alongside.
///
/// HTML parsing is error-tolerant, so this never fails; malformed formulas
/// and delimiter problems are reported as warnings.
pub fn html_to_markdown_with_diagnostics(html: &str, options: &H2MOptions) -> DocumentResult {
    let dom = parse_document(RcDom::default(), Default::default()).one(html);

    let mut scan = FormulaScan::new(options);
    scan.scan(&dom.document);

    let mut collector = TextCollector::new(options, &scan.regions);
    collector.collect(&dom.document);

    let mut warnings = collector.warnings;
    let formulas = collector.formulas;
    let text = collector.pieces.join(" ");

    if scan.found > formulas {
        tracing::debug!(
            dropped = scan.found - formulas,
            "formulas inside an already replaced region were removed"
        );
    }

    let text = balance_delimiters(text, options, &mut warnings);
    let output = clean_lines(&text);

    tracing::debug!(formulas, warnings = warnings.len(), "converted document");

    DocumentResult {
        output,
        formulas,
        warnings,
    }
}

/// Odd `$$` count: record it and, when enabled, drop trailing `$` characters.
fn balance_delimiters(
    text: String,
    options: &H2MOptions,
    warnings: &mut Vec<ConversionWarning>,
) -> String {
    let count = text.matches(BLOCK_DELIMITER).count();
    if count % 2 == 0 {
        return text;
    }

    tracing::warn!(count, "odd number of $$ delimiters in document");
    warnings.push(ConversionWarning::new(
        WarningKind::UnbalancedDelimiters,
        format!("document contains {} `$$` delimiters", count),
    ));

    if options.fix_unbalanced_delimiters {
        text.trim_end_matches('$').to_string()
    } else {
        text
    }
}

/// Trim every line and drop the empty ones.
pub fn clean_lines(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HALF: &str = "<math><mfrac><mi>x</mi><mn>2</mn></mfrac></math>";

    #[test]
    fn test_formula_block() {
        assert_eq!(formula_block("\\frac{x}{2}"), "\n\n$$\n\\frac{x}{2}\n$$\n\n");
    }

    #[test]
    fn test_wrapped_formula() {
        let html = format!(
            r#"<p>Solve <span class="az-formula">{}</span> now.</p>"#,
            HALF
        );
        assert_eq!(
            html_to_markdown(&html),
            "Solve\n$$\n\\frac{x}{2}\n$$\nnow."
        );
    }

    #[test]
    fn test_bare_formula() {
        let html = format!("<p>Half: {}</p>", HALF);
        assert_eq!(html_to_markdown(&html), "Half:\n$$\n\\frac{x}{2}\n$$");
    }

    #[test]
    fn test_wrapper_content_is_replaced() {
        let html = format!(
            r#"<div>before <span class="note az-formula big">label {} tail</span> after</div>"#,
            HALF
        );
        let out = html_to_markdown(&html);
        assert_eq!(out, "before\n$$\n\\frac{x}{2}\n$$\nafter");
        assert!(!out.contains("label"));
    }

    #[test]
    fn test_class_must_match_a_whole_token() {
        let html = format!(r#"<span class="az-formula-old">keep {}</span>"#, HALF);
        assert_eq!(html_to_markdown(&html), "keep\n$$\n\\frac{x}{2}\n$$");
    }

    #[test]
    fn test_second_formula_in_same_wrapper_dropped() {
        let html = r#"<span class="az-formula"><math><mi>a</mi></math><math><mi>b</mi></math></span>"#;
        let result = html_to_markdown_with_diagnostics(html, &H2MOptions::default());
        assert_eq!(result.output, "$$\na\n$$");
        assert_eq!(result.formulas, 1);
    }

    #[test]
    fn test_formulas_in_document_order() {
        let html = "<p><math><mi>a</mi></math> and <math><mi>b</mi></math></p>";
        assert_eq!(html_to_markdown(html), "$$\na\n$$\nand\n$$\nb\n$$");
    }

    #[test]
    fn test_custom_formula_class() {
        let html = format!(r#"<span class="eq">text {}</span>"#, HALF);
        let options = H2MOptions::with_formula_class("eq");
        assert_eq!(
            html_to_markdown_with_options(&html, &options),
            "$$\n\\frac{x}{2}\n$$"
        );
    }

    #[test]
    fn test_script_and_style_skipped() {
        let html = "<head><style>p { color: red }</style></head>\
                    <body><script>var x = 1;</script><p>Text</p></body>";
        assert_eq!(html_to_markdown(html), "Text");
    }

    #[test]
    fn test_entities_inside_math() {
        let html = "<math><mrow><mi>a</mi><mo>&times;</mo><mi>b</mi></mrow></math>";
        assert_eq!(html_to_markdown(html), "$$\na\\times{}b\n$$");
    }

    #[test]
    fn test_odd_delimiters_trimmed() {
        let result = html_to_markdown_with_diagnostics("<p>cost $$</p>", &H2MOptions::default());
        assert_eq!(result.output, "cost");
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.warnings[0].kind, WarningKind::UnbalancedDelimiters);
    }

    #[test]
    fn test_odd_delimiters_kept_when_fix_disabled() {
        let options = H2MOptions {
            fix_unbalanced_delimiters: false,
            ..Default::default()
        };
        let result = html_to_markdown_with_diagnostics("<p>cost $$</p>", &options);
        assert_eq!(result.output, "cost $$");
        assert!(result.has_warnings());
    }

    #[test]
    fn test_formula_warnings_propagate() {
        let html = "<p><math><msup><mi>x</mi></msup></math></p>";
        let result = html_to_markdown_with_diagnostics(html, &H2MOptions::default());
        assert_eq!(result.output, "$$\nx^{}\n$$");
        assert_eq!(result.warnings[0].kind, WarningKind::MissingChild);
    }

    #[test]
    fn test_clean_lines() {
        assert_eq!(clean_lines("  a \n\n   \n b\t\n"), "a\nb");
        assert_eq!(html_to_markdown(""), "");
    }
}
