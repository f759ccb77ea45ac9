//! String-level passes over transducer output
//!
//! Both passes work on the finished LaTeX string rather than the tree:
//!
//! - [`normalize_identifiers`] escapes function names that reached the output
//!   as plain letters (`sinx`, `log(2)`), typically from `<mtext>` runs.
//! - [`repair_latex`] fixes command sequences that upstream editors split
//!   apart, and normalizes spacing around arrows.

use crate::data::maps::FUNCTION_NAME_LIST;
use lazy_static::lazy_static;
use regex::{Captures, Regex};

struct FunctionPattern {
    name: &'static str,
    /// `sinx` -> `\sin x`
    before_letter: Regex,
    /// `sin (` -> `\sin(`
    before_paren: Regex,
}

lazy_static! {
    static ref FUNCTION_PATTERNS: Vec<FunctionPattern> = FUNCTION_NAME_LIST
        .iter()
        .map(|&name| FunctionPattern {
            name,
            before_letter: Regex::new(&format!(r"\b{}([A-Za-z])\b", name)).unwrap(),
            before_paren: Regex::new(&format!(r"\b{}\s*\(", name)).unwrap(),
        })
        .collect();

    /// Whitespace-separated single-letter commands: `\f \r \a \c`
    static ref SPLIT_COMMAND: Regex = Regex::new(r"\\[A-Za-z](?:\s+\\[A-Za-z])+\b").unwrap();

    /// `\sim` / `\neg` glued to the following word
    static ref GLUED_OPERATOR: Regex = Regex::new(r"\\(sim|neg)([A-Za-z]+)").unwrap();

    static ref ARROW: Regex = Regex::new(
        r"\s*(\\(?:Longrightarrow|longrightarrow|Leftrightarrow|leftrightarrow|Rightarrow|rightarrow|Leftarrow|leftarrow|mapsto|to)\b(?:\{\})?)\s*"
    )
    .unwrap();

    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s{2,}").unwrap();
}

/// Real commands that start with `\sim` or `\neg`
const GLUED_EXCEPTIONS: [&str; 4] = ["simeq", "negthinspace", "negmedspace", "negthickspace"];

/// An odd run of backslashes before `pos` escapes the character there, so a
/// `\` at `pos` is the second half of a `\\` line break, not a command.
fn is_escaped(text: &str, pos: usize) -> bool {
    text[..pos].bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

/// A name at `pos` continues a word or a command name.
fn continues_token(text: &str, pos: usize) -> bool {
    is_escaped(text, pos)
        || text[..pos]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric() || c == '_')
}

fn match_start(caps: &Captures) -> usize {
    caps.get(0).map_or(0, |m| m.start())
}

/// Escape bare function names followed by a single letter or an opening
/// parenthesis.
///
/// Names already escaped (`\sin`) or embedded in a longer word (`cosine`,
/// `asinx`) are left alone. A `\\` line break does not count as an escape.
pub fn normalize_identifiers(latex: &str) -> String {
    let mut text = latex.to_string();
    for pattern in FUNCTION_PATTERNS.iter() {
        text = pattern
            .before_letter
            .replace_all(&text, |caps: &Captures| {
                if continues_token(&text, match_start(caps)) {
                    caps[0].to_string()
                } else {
                    format!("\\{} {}", pattern.name, &caps[1])
                }
            })
            .into_owned();
        text = pattern
            .before_paren
            .replace_all(&text, |caps: &Captures| {
                if continues_token(&text, match_start(caps)) {
                    caps[0].to_string()
                } else {
                    format!("\\{}(", pattern.name)
                }
            })
            .into_owned();
    }
    text
}

/// Repair malformed command sequences and normalize spacing.
///
/// Steps, in order:
/// 1. collapse split commands (`\f \r \a \c` -> `\frac`)
/// 2. separate `\sim` / `\neg` from a glued word (`\simx` -> `\sim x`)
/// 3. pad arrow commands with one space on each side
/// 4. collapse whitespace runs
/// 5. trim
///
/// Text right after a `\\` line break is never read as a command.
/// Applying the pass twice gives the same result as applying it once.
pub fn repair_latex(latex: &str) -> String {
    let text = SPLIT_COMMAND.replace_all(latex, |caps: &Captures| {
        if is_escaped(latex, match_start(caps)) {
            return caps[0].to_string();
        }
        let letters: String = caps[0]
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect();
        format!("\\{}", letters)
    });

    let text = GLUED_OPERATOR.replace_all(&text, |caps: &Captures| {
        let word = format!("{}{}", &caps[1], &caps[2]);
        if is_escaped(&text, match_start(caps)) || GLUED_EXCEPTIONS.contains(&word.as_str()) {
            caps[0].to_string()
        } else {
            format!("\\{} {}", &caps[1], &caps[2])
        }
    });

    let text = ARROW.replace_all(&text, |caps: &Captures| {
        let command = caps.get(1).map_or(0, |m| m.start());
        if is_escaped(&text, command) {
            caps[0].to_string()
        } else {
            format!(" {} ", &caps[1])
        }
    });

    let text = WHITESPACE_RUN.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_function_before_letter() {
        assert_eq!(normalize_identifiers("sinx"), "\\sin x");
        assert_eq!(normalize_identifiers("2cosy+1"), "2cosy+1");
        assert_eq!(normalize_identifiers("a+logb"), "a+\\log b");
        assert_eq!(normalize_identifiers("ln t"), "ln t");
    }

    #[test]
    fn test_normalize_function_before_paren() {
        assert_eq!(normalize_identifiers("cos(x)"), "\\cos(x)");
        assert_eq!(normalize_identifiers("ln (2)"), "\\ln(2)");
        assert_eq!(normalize_identifiers("=tan(a)"), "=\\tan(a)");
    }

    #[test]
    fn test_normalize_leaves_escaped_and_embedded_names() {
        assert_eq!(normalize_identifiers("\\cos{}x"), "\\cos{}x");
        assert_eq!(normalize_identifiers("\\sin x"), "\\sin x");
        assert_eq!(normalize_identifiers("cosine"), "cosine");
        assert_eq!(normalize_identifiers("arcsinx"), "arcsinx");
        assert_eq!(normalize_identifiers("\\log(n)"), "\\log(n)");
    }

    #[test]
    fn test_normalize_nested_calls() {
        assert_eq!(normalize_identifiers("log(log(n))"), "\\log(\\log(n))");
        assert_eq!(normalize_identifiers("sin(sin(x))"), "\\sin(\\sin(x))");
        assert_eq!(normalize_identifiers("cos(cosx)"), "\\cos(\\cos x)");
    }

    #[test]
    fn test_normalize_after_row_break() {
        assert_eq!(normalize_identifiers("x=1 \\\\sinx=0"), "x=1 \\\\\\sin x=0");
        assert_eq!(normalize_identifiers("a \\\\log(2)"), "a \\\\\\log(2)");
    }

    #[test]
    fn test_normalize_is_stable() {
        let once = normalize_identifiers("sinx+cos(y)+tanz");
        assert_eq!(once, "\\sin x+\\cos(y)+\\tan z");
        assert_eq!(normalize_identifiers(&once), once);
    }

    #[test]
    fn test_repair_collapses_split_commands() {
        assert_eq!(repair_latex("\\f \\r \\a \\c{1}{2}"), "\\frac{1}{2}");
        assert_eq!(repair_latex("x=\\p \\i"), "x=\\pi");
        assert_eq!(repair_latex("\\a+\\b"), "\\a+\\b");
    }

    #[test]
    fn test_repair_keeps_row_breaks() {
        let rows = "\\begin{cases}x=1 \\\\y=2 \\\\z\\end{cases}";
        assert_eq!(repair_latex(rows), rows);
    }

    #[test]
    fn test_repair_reads_row_breaks_as_breaks() {
        assert_eq!(repair_latex("a \\\\to b"), "a \\\\to b");
        assert_eq!(repair_latex("x=1 \\\\negative=0"), "x=1 \\\\negative=0");
        assert_eq!(repair_latex("1 \\\\simx"), "1 \\\\simx");
        assert_eq!(repair_latex("a \\\\p \\i"), "a \\\\p \\i");
        // Three backslashes: a break followed by a real command
        assert_eq!(repair_latex("a \\\\\\to b"), "a \\\\ \\to b");
    }

    #[test]
    fn test_repair_separates_glued_operators() {
        assert_eq!(repair_latex("\\simx"), "\\sim x");
        assert_eq!(repair_latex("\\negp"), "\\neg p");
        assert_eq!(repair_latex("a\\simeq b"), "a\\simeq b");
        assert_eq!(repair_latex("\\sim{}x"), "\\sim{}x");
    }

    #[test]
    fn test_repair_pads_arrows() {
        assert_eq!(repair_latex("a\\rightarrow{}b"), "a \\rightarrow{} b");
        assert_eq!(repair_latex("p\\Rightarrow q"), "p \\Rightarrow q");
        assert_eq!(repair_latex("f:A\\to B"), "f:A \\to B");
        assert_eq!(repair_latex("\\top"), "\\top");
    }

    #[test]
    fn test_repair_whitespace() {
        assert_eq!(repair_latex("  a   +\n b  "), "a + b");
    }

    #[test]
    fn test_repair_idempotent() {
        let inputs = [
            "\\f \\r \\a \\c{x}{2}",
            "\\n \\e \\g \\a",
            "x\\simy\\Rightarrow{}z",
            "  \\to x  ",
            "\\begin{matrix}a & b \\\\c & d\\end{matrix}",
            "\\left|\\begin{matrix}1 & 2 \\\\3 & \\end{matrix}\\right|",
            "\\s \\i \\m \\e \\q",
            "x=1 \\\\negative=0 \\\\to=0",
            "a \\\\\\to b",
        ];
        for input in inputs {
            let once = repair_latex(input);
            assert_eq!(repair_latex(&once), once, "input: {}", input);
        }
    }
}
