//! Python bindings for mathtex

use pyo3::exceptions::PyException;
use pyo3::{create_exception, prelude::*};

use mathtex::{H2MOptions, M2LOptions, RaggedColumns};

create_exception!(_native, ConversionError, PyException);

fn math_options(normalize: bool, repair: bool, reject_ragged: bool) -> M2LOptions {
    M2LOptions {
        normalize_identifiers: normalize,
        repair,
        ragged_columns: if reject_ragged {
            RaggedColumns::Reject
        } else {
            RaggedColumns::Pad
        },
        ..Default::default()
    }
}

/// Convert a MathML fragment to LaTeX.
///
/// Raises `ConversionError` when the MathML is not well formed.
#[pyfunction]
#[pyo3(signature = (mathml, *, normalize=true, repair=true, reject_ragged=false))]
fn mathml_to_latex(
    mathml: &str,
    normalize: bool,
    repair: bool,
    reject_ragged: bool,
) -> PyResult<String> {
    let options = math_options(normalize, repair, reject_ragged);
    mathtex::mathml_to_latex_with_options(mathml, &options)
        .map_err(|e| ConversionError::new_err(e.to_string()))
}

/// Convert an HTML document to text with `$$` formula blocks.
#[pyfunction]
#[pyo3(signature = (html, *, formula_class="az-formula", normalize=true, repair=true))]
fn html_to_markdown(html: &str, formula_class: &str, normalize: bool, repair: bool) -> String {
    let mut options = H2MOptions::with_formula_class(formula_class);
    options.math = math_options(normalize, repair, false);
    mathtex::html_to_markdown_with_options(html, &options)
}

/// Check LaTeX output, returning `(level, message)` pairs.
#[pyfunction]
fn check_latex(latex: &str) -> Vec<(String, String)> {
    mathtex::diagnostics::check_latex(latex)
        .diagnostics
        .into_iter()
        .map(|d| (d.level.to_string(), d.message))
        .collect()
}

#[pymodule]
fn _native(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add("ConversionError", m.py().get_type::<ConversionError>())?;
    m.add_function(wrap_pyfunction!(mathml_to_latex, m)?)?;
    m.add_function(wrap_pyfunction!(html_to_markdown, m)?)?;
    m.add_function(wrap_pyfunction!(check_latex, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    Ok(())
}
