//! WASM bindings for mathtex
//!
//! This module provides JavaScript-accessible functions for MathML to LaTeX
//! and HTML to Markdown conversion.

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "wasm")]
use crate::{H2MOptions, M2LOptions, RaggedColumns};

/// MathML to LaTeX conversion options (exposed to WASM)
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct M2LConvertOptions {
    /// Escape bare function names such as `sin` in the output
    #[serde(default = "default_true")]
    pub normalize_identifiers: bool,
    /// Run the LaTeX repair pass
    #[serde(default = "default_true")]
    pub repair: bool,
    /// Refuse to build determinants from ragged column tables
    #[serde(default)]
    pub reject_ragged: bool,
}

#[cfg(feature = "wasm")]
impl Default for M2LConvertOptions {
    fn default() -> Self {
        Self {
            normalize_identifiers: true,
            repair: true,
            reject_ragged: false,
        }
    }
}

#[cfg(feature = "wasm")]
impl From<&M2LConvertOptions> for M2LOptions {
    fn from(opts: &M2LConvertOptions) -> Self {
        M2LOptions {
            normalize_identifiers: opts.normalize_identifiers,
            repair: opts.repair,
            ragged_columns: if opts.reject_ragged {
                RaggedColumns::Reject
            } else {
                RaggedColumns::Pad
            },
            ..Default::default()
        }
    }
}

/// HTML to Markdown conversion options (exposed to WASM)
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct H2MConvertOptions {
    /// Class marking formula wrappers; `az-formula` when absent
    #[serde(default)]
    pub formula_class: Option<String>,
    /// Strip trailing `$` on an odd `$$` count
    #[serde(default = "default_true")]
    pub fix_unbalanced_delimiters: bool,
    /// Options applied to every formula
    #[serde(default, flatten)]
    pub math: M2LConvertOptions,
}

#[cfg(feature = "wasm")]
impl Default for H2MConvertOptions {
    fn default() -> Self {
        Self {
            formula_class: None,
            fix_unbalanced_delimiters: true,
            math: M2LConvertOptions::default(),
        }
    }
}

#[cfg(feature = "wasm")]
impl From<&H2MConvertOptions> for H2MOptions {
    fn from(opts: &H2MConvertOptions) -> Self {
        let mut options = match &opts.formula_class {
            Some(class) => H2MOptions::with_formula_class(class.as_str()),
            None => H2MOptions::default(),
        };
        options.math = M2LOptions::from(&opts.math);
        options.fix_unbalanced_delimiters = opts.fix_unbalanced_delimiters;
        options
    }
}

#[cfg(feature = "wasm")]
fn default_true() -> bool {
    true
}

/// Conversion result with additional metadata
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct ConvertResult {
    /// The converted output
    pub output: String,
    /// Whether the conversion was successful
    pub success: bool,
    /// Error message if conversion failed
    pub error: Option<String>,
    /// Warnings during conversion
    pub warnings: Vec<String>,
}

#[cfg(feature = "wasm")]
impl ConvertResult {
    fn failed(error: String) -> Self {
        Self {
            output: String::new(),
            success: false,
            error: Some(error),
            warnings: vec![],
        }
    }
}

#[cfg(feature = "wasm")]
fn to_js<T: Serialize>(value: &T) -> JsValue {
    serde_wasm_bindgen::to_value(value).unwrap_or(JsValue::NULL)
}

/// Initialize panic hook for better error messages in browser console
#[cfg(feature = "wasm")]
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Convert a MathML fragment to LaTeX
///
/// # Arguments
/// * `input` - MathML source (`<math>` or any single MathML element)
/// * `options` - Optional `M2LConvertOptions` object
///
/// # Returns
/// A `ConvertResult`; `success` is false when the MathML does not parse
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "convertMathml")]
pub fn convert_mathml_wasm(input: &str, options: JsValue) -> JsValue {
    let opts: M2LConvertOptions = serde_wasm_bindgen::from_value(options).unwrap_or_default();

    let result = match crate::mathml_to_latex_with_diagnostics(input, &M2LOptions::from(&opts)) {
        Ok(math) => ConvertResult {
            warnings: math.format_warnings(),
            output: math.latex,
            success: true,
            error: None,
        },
        Err(e) => ConvertResult::failed(format!("Conversion failed: {}", e)),
    };

    to_js(&result)
}

/// Convert an HTML document to text with `$$` formula blocks
///
/// HTML parsing is error-tolerant, so `success` is always true.
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "convertHtml")]
pub fn convert_html_wasm(input: &str, options: JsValue) -> JsValue {
    let opts: H2MConvertOptions = serde_wasm_bindgen::from_value(options).unwrap_or_default();
    let doc = crate::html_to_markdown_with_diagnostics(input, &H2MOptions::from(&opts));

    to_js(&ConvertResult {
        warnings: doc.format_warnings(),
        output: doc.output,
        success: true,
        error: None,
    })
}

/// Detect input format (mathml or html)
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "detectFormat")]
pub fn detect_format_wasm(input: &str) -> String {
    crate::detect_format(input).as_str().to_string()
}

/// Get version information
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "getVersion")]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Check converted LaTeX (a fragment or a document with `$$` blocks)
#[cfg(feature = "wasm")]
#[wasm_bindgen(js_name = "checkLatex")]
pub fn check_latex_wasm(input: &str) -> JsValue {
    use crate::diagnostics::DiagnosticLevel;

    let result = if input.contains(crate::html2md::BLOCK_DELIMITER) {
        crate::diagnostics::check_document(input)
    } else {
        crate::diagnostics::check_latex(input)
    };

    let mut summary = CheckSummary {
        errors: Vec::new(),
        warnings: Vec::new(),
        infos: Vec::new(),
        has_errors: result.has_errors(),
    };
    for d in &result.diagnostics {
        let bucket = match d.level {
            DiagnosticLevel::Error => &mut summary.errors,
            DiagnosticLevel::Warning => &mut summary.warnings,
            DiagnosticLevel::Info => &mut summary.infos,
        };
        bucket.push(d.message.clone());
    }

    to_js(&summary)
}

/// Summary of LaTeX check results
#[cfg(feature = "wasm")]
#[derive(Serialize, Deserialize)]
pub struct CheckSummary {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub infos: Vec<String>,
    pub has_errors: bool,
}
