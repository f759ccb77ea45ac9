//! Static lookup tables for MathML → LaTeX conversion
//!
//! All tables are compile-time `phf` maps, shared read-only by every
//! conversion.

use phf::{phf_map, phf_set};

/// Content-markup operator element → LaTeX infix token.
///
/// Two entries are sentinels rather than tokens: `^` (power) and `sqrt`
/// (root). The `apply` handler recognises them and switches to script/radical
/// layout instead of infix joining.
pub static CONTENT_OPERATORS: phf::Map<&'static str, &'static str> = phf_map! {
    "plus" => "+",
    "minus" => "-",
    "times" => "\\times",
    "divide" => "\\div",
    "power" => "^",
    "root" => "sqrt",
    "eq" => "=",
    "neq" => "\\neq",
    "gt" => ">",
    "lt" => "<",
    "geq" => "\\ge",
    "leq" => "\\le",
};

/// Operator glyph as it appears in `<mo>` text → LaTeX token.
pub static OPERATOR_GLYPHS: phf::Map<&'static str, &'static str> = phf_map! {
    // ASCII
    "+" => "+",
    "-" => "-",
    "*" => "\\cdot",
    "/" => "/",
    "^" => "^",
    "_" => "_",
    "(" => "(",
    ")" => ")",
    "[" => "[",
    "]" => "]",
    "{" => "",
    "}" => "",
    "~" => "\\sim",

    // Arithmetic and relations
    "×" => "\\times",
    "÷" => "\\div",
    "≠" => "\\neq",
    "≤" => "\\le",
    "≥" => "\\ge",
    "±" => "\\pm",
    "∓" => "\\mp",
    "·" => "\\cdot",
    "⋅" => "\\cdot",
    "∘" => "\\circ",
    "≈" => "\\approx",
    "∈" => "\\in",
    "∉" => "\\notin",
    "−" => "-",

    // Big operators and symbols
    "∞" => "\\infty",
    "∑" => "\\sum",
    "∏" => "\\prod",
    "∫" => "\\int",
    "∂" => "\\partial",

    // Accents
    "ˆ" => "\\hat",

    // Arrows
    "→" => "\\rightarrow",
    "←" => "\\leftarrow",
    "↔" => "\\leftrightarrow",
    "⇒" => "\\Rightarrow",
    "⇐" => "\\Leftarrow",
    "⇔" => "\\Leftrightarrow",
    "↦" => "\\mapsto",

    // Invisible operators (function application, times, separator, plus)
    "\u{2061}" => "",
    "\u{2062}" => "",
    "\u{2063}" => "",
    "\u{2064}" => "",
};

/// Function names that get a dedicated LaTeX command (`\sin`, `\log`, ...).
pub static FUNCTION_NAMES: phf::Set<&'static str> = phf_set! {
    "sin", "cos", "tan", "cot", "sec", "csc", "log", "ln",
};

/// Same names in a fixed order, for the string-level normalizer.
pub const FUNCTION_NAME_LIST: [&str; 8] = ["cos", "sin", "tan", "cot", "sec", "csc", "log", "ln"];

/// `<mover>` accents that turn into `\hat{..}`.
pub static HAT_MARKERS: phf::Set<&'static str> = phf_set! {
    "\\hat", "^", "ˆ",
};

/// Arrow commands that `<mover>` stacks its annotation over.
pub static RIGHT_ARROWS: phf::Set<&'static str> = phf_set! {
    "\\rightarrow", "\\to", "\\longrightarrow",
};

/// Named entities accepted in standalone MathML fragments.
///
/// Covers the XML predefined entities plus the HTML/MathML names that show up
/// in scraped markup. Numeric references are resolved separately.
pub static MATHML_ENTITIES: phf::Map<&'static str, &'static str> = phf_map! {
    "lt" => "<",
    "gt" => ">",
    "amp" => "&",
    "quot" => "\"",
    "apos" => "'",
    "nbsp" => "\u{a0}",
    "minus" => "−",
    "plus" => "+",
    "times" => "×",
    "divide" => "÷",
    "div" => "÷",
    "middot" => "·",
    "sdot" => "⋅",
    "plusmn" => "±",
    "PlusMinus" => "±",
    "ne" => "≠",
    "NotEqual" => "≠",
    "le" => "≤",
    "leq" => "≤",
    "ge" => "≥",
    "geq" => "≥",
    "infin" => "∞",
    "sum" => "∑",
    "Sum" => "∑",
    "prod" => "∏",
    "int" => "∫",
    "Integral" => "∫",
    "part" => "∂",
    "rarr" => "→",
    "RightArrow" => "→",
    "larr" => "←",
    "LeftArrow" => "←",
    "rArr" => "⇒",
    "Implies" => "⇒",
    "DoubleRightArrow" => "⇒",
    "lArr" => "⇐",
    "hArr" => "⇔",
    "iff" => "⇔",
    "sim" => "∼",
    "Tilde" => "∼",
    "circ" => "ˆ",
    "Hat" => "^",
    "InvisibleTimes" => "\u{2062}",
    "it" => "\u{2062}",
    "ApplyFunction" => "\u{2061}",
    "af" => "\u{2061}",
    "InvisibleComma" => "\u{2063}",
    "ic" => "\u{2063}",
    "VerticalBar" => "|",
    "verbar" => "|",
    "Verbar" => "‖",
    "lbrace" => "{",
    "rbrace" => "}",
    "lpar" => "(",
    "rpar" => ")",
    "lsqb" => "[",
    "rsqb" => "]",
};

/// Matrix environment for a fenced table, keyed by its delimiter pair.
pub fn matrix_environment(open: &str, close: &str) -> &'static str {
    match (open, close) {
        ("(", ")") => "pmatrix",
        ("[", "]") => "bmatrix",
        ("|", "|") => "vmatrix",
        ("||", "||") | ("‖", "‖") => "Vmatrix",
        // No angle/brace matrix in amsmath; brackets are the closest fit
        ("<", ">") | ("⟨", "⟩") | ("{", "}") => "bmatrix",
        _ => "matrix",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_operator_sentinels() {
        assert_eq!(CONTENT_OPERATORS.get("power"), Some(&"^"));
        assert_eq!(CONTENT_OPERATORS.get("root"), Some(&"sqrt"));
        assert_eq!(CONTENT_OPERATORS.get("and"), None);
    }

    #[test]
    fn test_braces_map_to_empty_tokens() {
        assert_eq!(OPERATOR_GLYPHS.get("{"), Some(&""));
        assert_eq!(OPERATOR_GLYPHS.get("}"), Some(&""));
    }

    #[test]
    fn test_function_names_agree() {
        for name in FUNCTION_NAME_LIST {
            assert!(FUNCTION_NAMES.contains(name), "{} missing from set", name);
        }
        assert_eq!(FUNCTION_NAMES.len(), FUNCTION_NAME_LIST.len());
    }

    #[test]
    fn test_matrix_environment_lookup() {
        assert_eq!(matrix_environment("(", ")"), "pmatrix");
        assert_eq!(matrix_environment("[", "]"), "bmatrix");
        assert_eq!(matrix_environment("|", "|"), "vmatrix");
        assert_eq!(matrix_environment("‖", "‖"), "Vmatrix");
        assert_eq!(matrix_environment("{", "}"), "bmatrix");
        assert_eq!(matrix_environment("(", "]"), "matrix");
    }
}
