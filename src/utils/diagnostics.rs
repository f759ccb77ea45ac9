//! Structural checks over generated LaTeX
//!
//! The converter never refuses input, so malformed MathML can surface as
//! malformed LaTeX. These checks catch the shapes that break a renderer:
//!
//! - unbalanced braces (escaped `\{` / `\}` are ignored)
//! - unbalanced or mismatched `\begin{..}` / `\end{..}`
//! - unpaired `\left` / `\right`
//! - empty scripts (`x^{}`), usually a missing MathML child
//! - an odd number of `$$` delimiters in a converted document
//!
//! ## Example
//!
//! ```rust
//! use mathtex::diagnostics::check_latex;
//!
//! let result = check_latex(r"\begin{matrix}a");
//! assert!(result.has_errors());
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    static ref ENVIRONMENT: Regex = Regex::new(r"\\(begin|end)\{([^}]*)\}").unwrap();
    static ref STRETCHY: Regex = Regex::new(r"\\(left|right)\b").unwrap();
    static ref EMPTY_SCRIPT: Regex = Regex::new(r"[\^_]\{\}").unwrap();
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum DiagnosticLevel {
    /// Informational note
    Info,
    /// Output renders, but probably not as intended
    Warning,
    /// Output will not compile
    Error,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticLevel::Info => write!(f, "info"),
            DiagnosticLevel::Warning => write!(f, "warning"),
            DiagnosticLevel::Error => write!(f, "error"),
        }
    }
}

/// A single diagnostic message
#[derive(Debug, Clone)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub message: String,
    /// Line number (1-indexed)
    pub line: Option<usize>,
    /// Column number (1-indexed, in characters)
    pub column: Option<usize>,
    /// Offending source text
    pub source_text: Option<String>,
    /// Suggested fix
    pub suggestion: Option<String>,
}

impl Diagnostic {
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            line: None,
            column: None,
            source_text: None,
            suggestion: None,
        }
    }

    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    pub fn with_source(mut self, text: impl Into<String>) -> Self {
        self.source_text = Some(text.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // level: message
        //   --> line L:C
        //   | source
        //   = help: suggestion
        write!(f, "{}: {}", self.level, self.message)?;

        if let (Some(line), Some(col)) = (self.line, self.column) {
            write!(f, "\n  --> line {}:{}", line, col)?;
        }
        if let Some(ref source) = self.source_text {
            write!(f, "\n  |\n  | {}", source)?;
        }
        if let Some(ref suggestion) = self.suggestion {
            write!(f, "\n  = help: {}", suggestion)?;
        }
        Ok(())
    }
}

/// Check result with summary
#[derive(Debug, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct CheckResult {
    pub diagnostics: Vec<Diagnostic>,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl CheckResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, diag: Diagnostic) {
        match diag.level {
            DiagnosticLevel::Error => self.errors += 1,
            DiagnosticLevel::Warning => self.warnings += 1,
            DiagnosticLevel::Info => self.infos += 1,
        }
        self.diagnostics.push(diag);
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// `2 errors, 1 warning` style summary
    pub fn summary(&self) -> String {
        let counts = [
            (self.errors, "error"),
            (self.warnings, "warning"),
            (self.infos, "note"),
        ];
        let parts: Vec<String> = counts
            .iter()
            .filter(|(n, _)| *n > 0)
            .map(|(n, noun)| format!("{} {}{}", n, noun, if *n == 1 { "" } else { "s" }))
            .collect();
        if parts.is_empty() {
            "no issues found".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// Check a LaTeX fragment
pub fn check_latex(input: &str) -> CheckResult {
    let mut result = CheckResult::new();
    check_fragment(input, 0, &mut result);
    result
}

/// Check a converted document: `$$` parity, then every formula block.
pub fn check_document(text: &str) -> CheckResult {
    let mut result = CheckResult::new();
    let delimiters: Vec<usize> = text.match_indices("$$").map(|(i, _)| i).collect();

    if delimiters.len() % 2 != 0 {
        let last = delimiters.last().copied().unwrap_or(0);
        let (line, col) = offset_to_location(text, last);
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Error,
                format!("odd number of `$$` delimiters ({})", delimiters.len()),
            )
            .with_location(line, col)
            .with_suggestion("a formula block is missing its opening or closing `$$`"),
        );
    }

    for pair in delimiters.chunks_exact(2) {
        let start = pair[0] + 2;
        let body = &text[start..pair[1]];
        let line_shift = text[..start].matches('\n').count();
        check_fragment(body, line_shift, &mut result);
    }

    result
}

fn check_fragment(input: &str, line_shift: usize, result: &mut CheckResult) {
    let mut local = CheckResult::new();
    check_brace_balance(input, &mut local);
    check_environment_balance(input, &mut local);
    check_stretchy_pairs(input, &mut local);
    check_empty_scripts(input, &mut local);

    for mut diag in local.diagnostics {
        if let Some(line) = diag.line.as_mut() {
            *line += line_shift;
        }
        result.add(diag);
    }
}

/// Byte offset to 1-indexed (line, column)
fn offset_to_location(input: &str, offset: usize) -> (usize, usize) {
    let before = input.get(..offset).unwrap_or(input);
    let line = before.matches('\n').count() + 1;
    let column = before.rsplit('\n').next().map_or(0, |l| l.chars().count()) + 1;
    (line, column)
}

fn check_brace_balance(input: &str, result: &mut CheckResult) {
    let mut open: Vec<usize> = Vec::new();
    let mut escaped = false;

    for (offset, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '{' => open.push(offset),
            '}' => {
                if open.pop().is_none() {
                    let (line, col) = offset_to_location(input, offset);
                    result.add(
                        Diagnostic::new(DiagnosticLevel::Error, "unmatched closing brace '}'")
                            .with_location(line, col)
                            .with_suggestion("check for a missing opening brace"),
                    );
                }
            }
            _ => {}
        }
    }

    if let Some(&first) = open.first() {
        let (line, col) = offset_to_location(input, first);
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Error,
                format!(
                    "{} unclosed brace{}",
                    open.len(),
                    if open.len() == 1 { "" } else { "s" }
                ),
            )
            .with_location(line, col)
            .with_suggestion("check for a missing closing brace '}'"),
        );
    }
}

fn check_environment_balance(input: &str, result: &mut CheckResult) {
    let mut stack: Vec<(&str, usize)> = Vec::new();

    for caps in ENVIRONMENT.captures_iter(input) {
        let (Some(whole), Some(kind), Some(name)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let (line, col) = offset_to_location(input, whole.start());

        if kind.as_str() == "begin" {
            stack.push((name.as_str(), line));
            continue;
        }

        match stack.pop() {
            Some((open, _)) if open == name.as_str() => {}
            Some((open, open_line)) => result.add(
                Diagnostic::new(
                    DiagnosticLevel::Error,
                    format!(
                        "mismatched environment: opened '{}' at line {}, closed '{}'",
                        open,
                        open_line,
                        name.as_str()
                    ),
                )
                .with_location(line, col)
                .with_suggestion(format!("use \\end{{{}}}", open)),
            ),
            None => result.add(
                Diagnostic::new(
                    DiagnosticLevel::Error,
                    format!("unmatched \\end{{{}}}", name.as_str()),
                )
                .with_location(line, col)
                .with_source(whole.as_str()),
            ),
        }
    }

    for (name, line) in stack {
        result.add(
            Diagnostic::new(
                DiagnosticLevel::Error,
                format!("unclosed environment '{}' (opened at line {})", name, line),
            )
            .with_suggestion(format!("add \\end{{{}}}", name)),
        );
    }
}

fn check_stretchy_pairs(input: &str, result: &mut CheckResult) {
    let mut open: Vec<usize> = Vec::new();

    for m in STRETCHY.find_iter(input) {
        if m.as_str() == "\\left" {
            open.push(m.start());
        } else if open.pop().is_none() {
            let (line, col) = offset_to_location(input, m.start());
            result.add(
                Diagnostic::new(DiagnosticLevel::Error, "\\right without a matching \\left")
                    .with_location(line, col),
            );
        }
    }

    for offset in open {
        let (line, col) = offset_to_location(input, offset);
        result.add(
            Diagnostic::new(DiagnosticLevel::Error, "\\left without a matching \\right")
                .with_location(line, col),
        );
    }
}

fn check_empty_scripts(input: &str, result: &mut CheckResult) {
    for m in EMPTY_SCRIPT.find_iter(input) {
        let (line, col) = offset_to_location(input, m.start());
        result.add(
            Diagnostic::new(DiagnosticLevel::Info, "empty script")
                .with_location(line, col)
                .with_source(m.as_str())
                .with_suggestion("the source element was probably missing a child"),
        );
    }
}

/// Format check results for terminal output
pub fn format_diagnostics(result: &CheckResult, use_color: bool) -> String {
    let mut output = String::new();

    for diag in &result.diagnostics {
        if use_color {
            let color = match diag.level {
                DiagnosticLevel::Error => "\x1b[31m",
                DiagnosticLevel::Warning => "\x1b[33m",
                DiagnosticLevel::Info => "\x1b[34m",
            };
            output.push_str(&format!("{}{}\x1b[0m\n\n", color, diag));
        } else {
            output.push_str(&format!("{}\n\n", diag));
        }
    }

    let summary = format!("Summary: {}", result.summary());
    if use_color {
        let color = if result.has_errors() {
            "\x1b[31m"
        } else if result.warnings > 0 {
            "\x1b[33m"
        } else {
            "\x1b[32m"
        };
        output.push_str(&format!("{}{}\x1b[0m", color, summary));
    } else {
        output.push_str(&summary);
    }

    output
}
