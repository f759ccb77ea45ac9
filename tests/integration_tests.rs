//! Integration tests for mathtex formula and document conversion

use mathtex::{
    convert_auto, detect_format, html_to_markdown, html_to_markdown_with_diagnostics,
    html_to_markdown_with_options, mathml_to_latex, mathml_to_latex_with_diagnostics,
    mathml_to_latex_with_options, ConversionError, H2MOptions, InputFormat, M2LOptions,
    WarningKind,
};

// ============================================================================
// Presentation MathML
// ============================================================================

mod presentation {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scripts() {
        let cases = [
            ("<msup><mi>x</mi><mn>2</mn></msup>", "x^{2}"),
            ("<msub><mi>a</mi><mi>n</mi></msub>", "a_{n}"),
            (
                "<msubsup><mi>x</mi><mn>1</mn><mn>2</mn></msubsup>",
                "x_{1}^{2}",
            ),
            (
                "<mmultiscripts><mi>F</mi><mi>i</mi><mi>j</mi></mmultiscripts>",
                "F_{i}^{j}",
            ),
        ];
        for (src, expected) in cases {
            assert_eq!(mathml_to_latex(src).unwrap(), expected, "input: {}", src);
        }
    }

    #[test]
    fn test_radicals_and_fractions() {
        assert_eq!(
            mathml_to_latex("<mroot><mi>x</mi><mn>3</mn></mroot>").unwrap(),
            "\\sqrt[3]{x}"
        );
        assert_eq!(
            mathml_to_latex("<msqrt><mi>b</mi><mo>-</mo><mn>4</mn></msqrt>").unwrap(),
            "\\sqrt{b-4}"
        );
        assert_eq!(
            mathml_to_latex(
                "<mfrac><mrow><mi>a</mi><mo>+</mo><mn>1</mn></mrow><msqrt><mn>2</mn></msqrt></mfrac>"
            )
            .unwrap(),
            "\\frac{a+1}{\\sqrt{2}}"
        );
    }

    #[test]
    fn test_sum_with_limits() {
        let src = "<munderover><mo>∑</mo>\
            <mrow><mi>i</mi><mo>=</mo><mn>1</mn></mrow>\
            <mi>n</mi></munderover>";
        assert_eq!(
            mathml_to_latex(src).unwrap(),
            "\\underset{i=1}{\\overset{n}{\\sum{}}}"
        );
    }

    #[test]
    fn test_hat_accent() {
        assert_eq!(
            mathml_to_latex("<mover><mi>v</mi><mo>^</mo></mover>").unwrap(),
            "\\hat{v}"
        );
    }

    #[test]
    fn test_reaction_arrow_annotation() {
        let src = "<mover><mo>→</mo><mtext>heat</mtext></mover>";
        assert_eq!(
            mathml_to_latex_with_options(src, &M2LOptions::raw()).unwrap(),
            "\\overset{heat}{\\rightarrow}"
        );
    }

    #[test]
    fn test_fenced_vector() {
        let src = "<mfenced><mn>1</mn><mn>2</mn><mn>3</mn></mfenced>";
        assert_eq!(
            mathml_to_latex(src).unwrap(),
            "\\begin{pmatrix}1 & 2 & 3\\end{pmatrix}"
        );
    }

    #[test]
    fn test_named_and_numeric_entities() {
        let src = "<mrow><mi>a</mi><mo>&times;</mo><mi>b</mi><mo>&#x2260;</mo><mn>0</mn></mrow>";
        assert_eq!(mathml_to_latex(src).unwrap(), "a\\times{}b\\neq{}0");
    }

    #[test]
    fn test_arabic_indic_digits() {
        let src = "<mrow><mn>٣</mn><mo>+</mo><mn>٤</mn></mrow>";
        assert_eq!(mathml_to_latex(src).unwrap(), "3+4");
    }

    #[test]
    fn test_semantics_keeps_presentation_only() {
        let src = r#"<math><semantics>
            <mrow><mi>x</mi><mo>+</mo><mn>1</mn></mrow>
            <annotation encoding="application/x-tex">x+1</annotation>
        </semantics></math>"#;
        assert_eq!(mathml_to_latex(src).unwrap(), "x+1");
    }
}

// ============================================================================
// Content MathML
// ============================================================================

mod content {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_infix_operators() {
        assert_eq!(
            mathml_to_latex("<apply><plus/><ci>a</ci><ci>b</ci></apply>").unwrap(),
            "a + b"
        );
        assert_eq!(
            mathml_to_latex("<apply><leq/><ci>x</ci><cn>5</cn></apply>").unwrap(),
            "x \\le 5"
        );
    }

    #[test]
    fn test_power_and_root() {
        assert_eq!(
            mathml_to_latex("<apply><power/><ci>x</ci><cn>2</cn></apply>").unwrap(),
            "x^{2}"
        );
        assert_eq!(
            mathml_to_latex("<apply><root/><degree><cn>3</cn></degree><ci>y</ci></apply>")
                .unwrap(),
            "\\sqrt[3]{y}"
        );
    }

    #[test]
    fn test_unknown_operator_warns() {
        let result = mathml_to_latex_with_diagnostics(
            "<apply><frobnicate/><ci>a</ci><ci>b</ci></apply>",
            &M2LOptions::default(),
        )
        .unwrap();
        assert!(result.has_warnings());
        assert_eq!(result.warnings[0].kind, WarningKind::UnknownOperator);
    }
}

// ============================================================================
// Tables
// ============================================================================

mod tables {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_system_of_equations() {
        let src = "<math><mrow><mo>{</mo><mtable>\
            <mtr><mtd><mrow><mi>x</mi><mo>+</mo><mi>y</mi><mo>=</mo><mn>3</mn></mrow></mtd></mtr>\
            <mtr><mtd><mrow><mi>x</mi><mo>-</mo><mi>y</mi><mo>=</mo><mn>1</mn></mrow></mtd></mtr>\
            </mtable></mrow></math>";
        assert_eq!(
            mathml_to_latex(src).unwrap(),
            "\\begin{cases}x+y=3 \\\\x-y=1\\end{cases}"
        );
    }

    #[test]
    fn test_determinant_from_column_tables() {
        let col = |a: &str, b: &str| {
            format!(
                "<mtable><mtr><mtd><mn>{}</mn></mtd></mtr><mtr><mtd><mn>{}</mn></mtd></mtr></mtable>",
                a, b
            )
        };
        let src = format!(
            "<mrow><mo>|</mo>{}{}<mo>|</mo></mrow>",
            col("1", "3"),
            col("2", "4")
        );
        assert_eq!(
            mathml_to_latex(&src).unwrap(),
            "\\left|\\begin{matrix}1 & 2 \\\\3 & 4\\end{matrix}\\right|"
        );
    }

    #[test]
    fn test_ragged_determinant_policy() {
        let src = "<mrow><mo>|</mo>\
            <mtable><mtr><mtd><mn>1</mn></mtd></mtr><mtr><mtd><mn>3</mn></mtd></mtr></mtable>\
            <mtable><mtr><mtd><mn>2</mn></mtd></mtr></mtable>\
            <mo>|</mo></mrow>";

        let padded = mathml_to_latex_with_diagnostics(src, &M2LOptions::default()).unwrap();
        assert!(padded.latex.starts_with("\\left|"));
        assert_eq!(padded.warnings[0].kind, WarningKind::RaggedDeterminant);

        let rejected = mathml_to_latex_with_diagnostics(src, &M2LOptions::strict_tables()).unwrap();
        assert!(!rejected.latex.contains("\\left|"));
        assert_eq!(rejected.warnings[0].kind, WarningKind::RaggedDeterminant);
    }

    #[test]
    fn test_rows_after_compact_break_keep_their_text() {
        let row = |lhs: &str| {
            format!(
                "<mtr><mtd><mrow><mtext>{}</mtext><mo>=</mo><mn>0</mn></mrow></mtd></mtr>",
                lhs
            )
        };
        let src = format!(
            "<mtable>{}{}{}{}</mtable>",
            row("x"),
            row("negative"),
            row("to"),
            row("sinx")
        );
        assert_eq!(
            mathml_to_latex(&src).unwrap(),
            "\\begin{cases}x=0 \\\\negative=0 \\\\to=0 \\\\\\sin x=0\\end{cases}"
        );
    }

    #[test]
    fn test_bracketed_matrix() {
        let src = r#"<mfenced open="[" close="]"><mtable>
            <mtr><mtd><mi>a</mi></mtd><mtd><mi>b</mi></mtd></mtr>
            <mtr><mtd><mi>c</mi></mtd><mtd><mi>d</mi></mtd></mtr>
        </mtable></mfenced>"#;
        assert_eq!(
            mathml_to_latex(src).unwrap(),
            "\\begin{bmatrix}a & b \\\\ c & d\\end{bmatrix}"
        );
    }
}

// ============================================================================
// Post-processing
// ============================================================================

mod post_processing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_function_names_in_text_runs() {
        assert_eq!(mathml_to_latex("<mtext>log(x)</mtext>").unwrap(), "\\log(x)");
        assert_eq!(mathml_to_latex("<mtext>tany</mtext>").unwrap(), "\\tan y");
    }

    #[test]
    fn test_nested_function_calls() {
        assert_eq!(
            mathml_to_latex("<mtext>log(log(n))</mtext>").unwrap(),
            "\\log(\\log(n))"
        );
    }

    #[test]
    fn test_function_identifier_escaped_once() {
        let out = mathml_to_latex("<mrow><mi>sin</mi><mi>θ</mi></mrow>").unwrap();
        assert_eq!(out, "\\sin{}θ");
    }

    #[test]
    fn test_implication_spacing() {
        let src = "<mrow><mi>a</mi><mo>⇔</mo><mi>b</mi></mrow>";
        assert_eq!(mathml_to_latex(src).unwrap(), "a \\Leftrightarrow{} b");
    }

    #[test]
    fn test_post_processing_can_be_disabled() {
        let src = "<mrow><mi>a</mi><mo>⇔</mo><mi>b</mi></mrow>";
        assert_eq!(
            mathml_to_latex_with_options(src, &M2LOptions::raw()).unwrap(),
            "a\\Leftrightarrow{}b"
        );
    }
}

// ============================================================================
// HTML documents
// ============================================================================

mod documents {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Lesson</title><style>.az-formula { color: blue }</style></head>
<body>
  <h1>Quadratics</h1>
  <p>The roots are
    <span class="az-formula"><math>
      <mfrac>
        <mrow><mo>-</mo><mi>b</mi><mo>±</mo><msqrt><mi>Δ</mi></msqrt></mrow>
        <mrow><mn>2</mn><mi>a</mi></mrow>
      </mfrac>
    </math></span>
  for every real discriminant.</p>
</body>
</html>"#;

    #[test]
    fn test_full_page() {
        let out = html_to_markdown(PAGE);
        assert_eq!(
            out,
            "Lesson\nQuadratics\nThe roots are\n$$\n\\frac{-b\\pm{}\\sqrt{Δ}}{2a}\n$$\nfor every real discriminant."
        );
    }

    #[test]
    fn test_formula_count_and_blocks_balanced() {
        let html = "<p><math><mi>a</mi></math></p><p><math><mi>b</mi></math></p>";
        let result = html_to_markdown_with_diagnostics(html, &H2MOptions::default());
        assert_eq!(result.formulas, 2);
        assert_eq!(result.output.matches("$$").count(), 4);
        assert!(!result.has_warnings());
    }

    #[test]
    fn test_plain_text_passthrough() {
        assert_eq!(html_to_markdown("just words"), "just words");
    }

    #[test]
    fn test_formula_options_apply_per_formula() {
        let html = "<p><math><mtext>sinx</mtext></math></p>";
        let mut options = H2MOptions::default();
        options.math = M2LOptions::raw();
        assert_eq!(html_to_markdown_with_options(html, &options), "$$\nsinx\n$$");
        assert_eq!(html_to_markdown(html), "$$\n\\sin x\n$$");
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

mod diagnostics {
    use super::*;
    use mathtex::diagnostics::{check_document, check_latex, format_diagnostics};

    #[test]
    fn test_converted_output_checks_clean() {
        let latex = mathml_to_latex(
            "<mfenced><mtable><mtr><mtd><mn>1</mn></mtd></mtr></mtable></mfenced>",
        )
        .unwrap();
        assert!(!check_latex(&latex).has_errors());
    }

    #[test]
    fn test_converted_document_checks_clean() {
        let doc = html_to_markdown(
            "<p>x <math><mrow><mo>{</mo><mi>a</mi><mo>}</mo></mrow></math></p>",
        );
        assert!(!check_document(&doc).has_errors());
    }

    #[test]
    fn test_broken_latex_reported() {
        let result = check_latex("\\frac{a}{b");
        assert!(result.has_errors());
        let report = format_diagnostics(&result, false);
        assert!(!report.is_empty());
    }

    #[test]
    fn test_parse_error_carries_position() {
        match mathml_to_latex("<mrow>\n<mi>x</mi>\n</mfrac>") {
            Err(ConversionError::ParseError { line, column, .. }) => {
                assert!(line.is_some_and(|l| l >= 2));
                assert!(column.is_some());
            }
            other => panic!("expected a parse error, got {:?}", other),
        }
    }
}

// ============================================================================
// Auto detection
// ============================================================================

mod auto_detection {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_detect() {
        assert_eq!(detect_format("<math><mi>x</mi></math>"), InputFormat::MathMl);
        assert_eq!(detect_format("<html><body></body></html>"), InputFormat::Html);
        assert_eq!(InputFormat::MathMl.as_str(), "mathml");
    }

    #[test]
    fn test_convert_auto_both_kinds() {
        let (latex, format) = convert_auto("<mfrac><mn>1</mn><mn>2</mn></mfrac>").unwrap();
        assert_eq!((latex.as_str(), format), ("\\frac{1}{2}", InputFormat::MathMl));

        let (doc, format) = convert_auto("<div>see <math><mn>1</mn></math></div>").unwrap();
        assert_eq!((doc.as_str(), format), ("see\n$$\n1\n$$", InputFormat::Html));
    }
}
