//! Utility functions for MathML to LaTeX conversion

use std::borrow::Cow;

/// Cell separator inside matrix-like environments
pub const CELL_SEPARATOR: &str = " & ";

/// Row separator inside matrix-like environments
pub const ROW_SEPARATOR: &str = " \\\\ ";

/// Row separator for `mtable` and determinant layouts, no space after the break
pub const COMPACT_ROW_SEPARATOR: &str = " \\\\";

/// Empty group appended after a command so it never fuses with a following letter
pub const EMPTY_GROUP: &str = "{}";

/// Map Persian (U+06F0–U+06F9) and Arabic-Indic (U+0660–U+0669) digits to ASCII.
///
/// Borrows the input when there is nothing to translate.
pub fn normalize_digits(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| to_ascii_digit(c).is_some()) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.chars()
            .map(|c| to_ascii_digit(c).unwrap_or(c))
            .collect(),
    )
}

fn to_ascii_digit(c: char) -> Option<char> {
    let offset = match c {
        '\u{06F0}'..='\u{06F9}' => c as u32 - 0x06F0,
        '\u{0660}'..='\u{0669}' => c as u32 - 0x0660,
        _ => return None,
    };
    char::from_digit(offset, 10)
}

/// Whether a token is a LaTeX control sequence
pub fn is_command(token: &str) -> bool {
    token.starts_with('\\')
}

/// Append the empty-group guard to command tokens, pass others through.
pub fn guard_command(token: &str) -> String {
    if is_command(token) {
        format!("{}{}", token, EMPTY_GROUP)
    } else {
        token.to_string()
    }
}

/// Drop surrounding whitespace and a trailing empty-group guard.
pub fn strip_empty_group(fragment: &str) -> &str {
    let trimmed = fragment.trim();
    trimmed.strip_suffix(EMPTY_GROUP).unwrap_or(trimmed)
}

/// `base^{exponent}`
pub fn superscript(base: &str, exponent: &str) -> String {
    format!("{}^{{{}}}", base, exponent)
}

/// `base_{subscript}`
pub fn subscript(base: &str, sub: &str) -> String {
    format!("{}_{{{}}}", base, sub)
}

/// `\begin{env}body\end{env}`
pub fn environment(name: &str, body: &str) -> String {
    format!("\\begin{{{name}}}{body}\\end{{{name}}}")
}
