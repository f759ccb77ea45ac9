//! Tag-directed MathML to LaTeX transducer
//!
//! Converts one element into a LaTeX fragment. Children are converted first
//! and the element's rule then decides how their fragments compose. Layouts
//! that need to look at the raw row/cell structure (tables, determinants,
//! fenced tables) live in [`super::table`].

use super::context::ConvertContext;
use super::element::{Element, Tag};
use super::table;
use super::utils::{
    environment, guard_command, normalize_digits, strip_empty_group, subscript, superscript,
    CELL_SEPARATOR,
};
use super::WarningKind;
use crate::data::maps::{
    CONTENT_OPERATORS, FUNCTION_NAMES, HAT_MARKERS, OPERATOR_GLYPHS, RIGHT_ARROWS,
};

/// Convert an element (and its subtree) to a LaTeX fragment
pub fn convert_element(el: &Element, ctx: &mut ConvertContext) -> String {
    if ctx.at_depth_limit() {
        ctx.warn(
            WarningKind::RecursionLimitExceeded,
            el,
            format!(
                "nesting deeper than {} elements, subtree reduced to its text",
                ctx.options.max_depth
            ),
        );
        return normalize_digits(el.trimmed_text()).into_owned();
    }

    ctx.depth += 1;
    let latex = convert_tag(el, ctx);
    ctx.depth -= 1;
    latex
}

fn convert_tag(el: &Element, ctx: &mut ConvertContext) -> String {
    // Structural layouts read their own rows and cells
    match el.tag {
        Tag::Annotation | Tag::AnnotationXml => return String::new(),
        Tag::Mtable => return table::convert_mtable(el, ctx),
        Tag::Apply => return convert_apply(el, ctx),
        Tag::Mrow => {
            if let Some(det) = table::convert_determinant(el, ctx) {
                return det;
            }
        }
        Tag::Mfenced => {
            if let Some(matrix) = table::convert_fenced_table(el, ctx) {
                return matrix;
            }
        }
        _ => {}
    }

    let fragments: Vec<String> = el
        .children
        .iter()
        .map(|child| convert_element(child, ctx))
        .collect();
    let text = normalize_digits(el.trimmed_text()).into_owned();

    if text.is_empty() && fragments.iter().all(String::is_empty) {
        return String::new();
    }

    match el.tag {
        Tag::Math | Tag::Mstyle => fragments.concat(),
        Tag::Mrow => convert_mrow(el, fragments),
        Tag::Mi => convert_identifier(&text),
        Tag::Mn => text,
        Tag::Mo => convert_operator(&text),

        Tag::Msup => {
            let base = ctx.required_child(el, &fragments, 0);
            let sup = ctx.required_child(el, &fragments, 1);
            superscript(&base, &sup)
        }
        Tag::Msub => {
            let base = ctx.required_child(el, &fragments, 0);
            let sub = ctx.required_child(el, &fragments, 1);
            subscript(&base, &sub)
        }
        Tag::Msubsup => {
            let base = ctx.required_child(el, &fragments, 0);
            let sub = ctx.required_child(el, &fragments, 1);
            let sup = ctx.required_child(el, &fragments, 2);
            superscript(&subscript(&base, &sub), &sup)
        }
        Tag::Mmultiscripts => {
            let mut out = ctx.required_child(el, &fragments, 0);
            if let Some(sub) = fragments.get(1) {
                out = subscript(&out, sub);
            }
            if let Some(sup) = fragments.get(2) {
                out = superscript(&out, sup);
            }
            out
        }

        Tag::Mfrac => {
            let num = ctx.required_child(el, &fragments, 0);
            let den = ctx.required_child(el, &fragments, 1);
            format!("\\frac{{{}}}{{{}}}", num, den)
        }
        Tag::Msqrt => {
            // Several children form an inferred row
            if fragments.is_empty() {
                ctx.required_child(el, &fragments, 0);
            }
            format!("\\sqrt{{{}}}", fragments.concat())
        }
        Tag::Mroot => {
            let radicand = ctx.required_child(el, &fragments, 0);
            let index = ctx.required_child(el, &fragments, 1);
            format!("\\sqrt[{}]{{{}}}", index, radicand)
        }

        Tag::Mover => {
            let base = ctx.required_child(el, &fragments, 0);
            let over = ctx.required_child(el, &fragments, 1);
            convert_mover(&base, &over)
        }
        Tag::Munder => {
            let base = ctx.required_child(el, &fragments, 0);
            let under = ctx.required_child(el, &fragments, 1);
            format!("\\underset{{{}}}{{{}}}", under, base)
        }
        Tag::Munderover => {
            let base = ctx.required_child(el, &fragments, 0);
            let under = ctx.required_child(el, &fragments, 1);
            let over = ctx.required_child(el, &fragments, 2);
            convert_munderover(base, &under, &over)
        }

        Tag::Mfenced => convert_mfenced(el, &fragments),
        Tag::Mtext => convert_mtext(text, &fragments),

        Tag::Mtr
        | Tag::Mtd
        | Tag::Other
        | Tag::Mtable
        | Tag::Apply
        | Tag::Annotation
        | Tag::AnnotationXml => text + &fragments.concat(),
    }
}

// =============================================================================
// Rows
// =============================================================================

fn convert_mrow(el: &Element, fragments: Vec<String>) -> String {
    if let Some(group) = brace_group(el, &fragments) {
        return group;
    }

    match fragments.len() {
        1 => fragments.into_iter().next().unwrap_or_default(),
        2 if fragments[0] == "-" => format!("-{}", fragments[1]),
        n if n >= 3 => merge_superscripts(&fragments),
        _ => fragments.concat(),
    }
}

/// `{ ... }` written as operator children becomes a stretchy brace group.
fn brace_group(el: &Element, fragments: &[String]) -> Option<String> {
    let n = el.children.len();
    if n < 3 || !el.children[0].is_operator("{") || !el.children[n - 1].is_operator("}") {
        return None;
    }
    Some(format!(
        "\\left\\{{{}\\right\\}}",
        fragments[1..n - 1].concat()
    ))
}

/// Fold `base, ^, exponent` runs left to right.
fn merge_superscripts(fragments: &[String]) -> String {
    let mut out = String::new();
    let mut i = 0;
    while i < fragments.len() {
        if i + 2 < fragments.len() && fragments[i + 1] == "^" {
            out.push_str(&superscript(&fragments[i], &fragments[i + 2]));
            i += 3;
        } else {
            out.push_str(&fragments[i]);
            i += 1;
        }
    }
    out
}

// =============================================================================
// Tokens
// =============================================================================

fn convert_identifier(text: &str) -> String {
    if text == "~" {
        return guard_command("\\sim");
    }

    let lower = text.to_lowercase();
    if FUNCTION_NAMES.contains(lower.as_str()) {
        return guard_command(&format!("\\{}", lower));
    }

    if text.chars().count() > 1 {
        format!("\\mathrm{{{}}}", text)
    } else {
        text.to_string()
    }
}

fn convert_operator(text: &str) -> String {
    let token = OPERATOR_GLYPHS.get(text).copied().unwrap_or(text);
    guard_command(token)
}

fn convert_mtext(text: String, fragments: &[String]) -> String {
    let content = if text.is_empty() {
        normalize_digits(&fragments.concat()).into_owned()
    } else {
        text
    };

    if !content.is_empty() && content.chars().all(is_plain_text_char) {
        content
    } else {
        format!("\\text{{{}}}", content)
    }
}

/// Characters an `<mtext>` may contain and still be emitted raw
fn is_plain_text_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '+' | '-' | '/' | '*' | '=' | '^' | '_' | '(' | ')' | '[' | ']' | '{' | '}'
        )
}

// =============================================================================
// Scripts and accents
// =============================================================================

fn convert_mover(base: &str, over: &str) -> String {
    if HAT_MARKERS.contains(strip_empty_group(over)) {
        return format!("\\hat{{{}}}", base);
    }

    let arrow = strip_empty_group(base);
    if RIGHT_ARROWS.contains(arrow) {
        return format!("\\overset{{{}}}{{{}}}", over, arrow);
    }

    format!("\\overset{{{}}}{{{}}}", over, base)
}

fn convert_munderover(base: String, under: &str, over: &str) -> String {
    match (under.is_empty(), over.is_empty()) {
        (true, true) => base,
        (false, true) => format!("\\underset{{{}}}{{{}}}", under, base),
        (true, false) => format!("\\overset{{{}}}{{{}}}", over, base),
        (false, false) => format!(
            "\\underset{{{}}}{{\\overset{{{}}}{{{}}}}}",
            under, over, base
        ),
    }
}

// =============================================================================
// Fences
// =============================================================================

/// `open` and `close` attributes with their MathML defaults
pub(super) fn fence_delimiters(el: &Element) -> (&str, &str) {
    let open = el.attr("open").map(str::trim).unwrap_or("(");
    let close = el.attr("close").map(str::trim).unwrap_or(")");
    (open, close)
}

fn fence_separator(el: &Element) -> &str {
    el.attr("sep")
        .or_else(|| el.attr("separators"))
        .unwrap_or(", ")
}

/// Vector environments for a fenced list, keyed by delimiter pair
fn vector_environment(open: &str, close: &str) -> Option<&'static str> {
    match (open, close) {
        ("(", ")") => Some("pmatrix"),
        ("[", "]") => Some("bmatrix"),
        ("‖", "‖") => Some("Vmatrix"),
        _ => None,
    }
}

fn convert_mfenced(el: &Element, fragments: &[String]) -> String {
    let (open, close) = fence_delimiters(el);
    let separator = fence_separator(el);

    if format!("{}{}", open, close) == "||" {
        return environment("bmatrix", &fragments.concat());
    }

    if let Some(env) = vector_environment(open, close) {
        let joined = fragments.join(separator);
        let body = if separator.is_empty() {
            joined
        } else {
            joined.replace(separator, CELL_SEPARATOR)
        };
        return environment(env, &body);
    }

    format!("{}{}{}", open, fragments.concat(), close)
}

// =============================================================================
// Content markup
// =============================================================================

fn convert_apply(el: &Element, ctx: &mut ConvertContext) -> String {
    let Some((operator, operands)) = el.children.split_first() else {
        return normalize_digits(el.trimmed_text()).into_owned();
    };

    let args: Vec<String> = operands
        .iter()
        .map(|operand| convert_element(operand, ctx))
        .collect();

    if el.trimmed_text().is_empty() && args.iter().all(String::is_empty) {
        return String::new();
    }

    let token = match CONTENT_OPERATORS.get(operator.name.as_str()) {
        Some(token) => *token,
        None => {
            ctx.warn(
                WarningKind::UnknownOperator,
                el,
                format!("unrecognised content operator <{}>", operator.name),
            );
            ""
        }
    };

    match token {
        "^" => {
            let base = ctx.required_child(el, &args, 0);
            let exponent = ctx.required_child(el, &args, 1);
            superscript(&base, &exponent)
        }
        "sqrt" => convert_content_root(el, operands, &args, ctx),
        _ => args.join(&format!(" {} ", token)),
    }
}

fn convert_content_root(
    el: &Element,
    operands: &[Element],
    args: &[String],
    ctx: &mut ConvertContext,
) -> String {
    // An explicit <degree> operand carries the index wherever it appears
    if let Some(degree) = operands.iter().position(|o| o.name == "degree") {
        let radicand = args
            .iter()
            .enumerate()
            .find(|(i, _)| *i != degree)
            .map(|(_, arg)| arg.as_str())
            .unwrap_or_default();
        return format!("\\sqrt[{}]{{{}}}", args[degree], radicand);
    }

    match args {
        [radicand] => format!("\\sqrt{{{}}}", radicand),
        [radicand, index, ..] => format!("\\sqrt[{}]{{{}}}", index, radicand),
        [] => {
            let radicand = ctx.required_child(el, args, 0);
            format!("\\sqrt{{{}}}", radicand)
        }
    }
}
