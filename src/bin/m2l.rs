//! mathtex CLI - MathML to LaTeX, and HTML with MathML to Markdown-style text

#[cfg(feature = "cli")]
use clap::{Parser, Subcommand, ValueEnum};
#[cfg(feature = "cli")]
use mathtex::{
    detect_format,
    diagnostics::{check_document, check_latex, format_diagnostics},
    html_to_markdown_with_diagnostics, mathml_to_latex_with_diagnostics, ConversionWarning,
    H2MOptions, InputFormat, M2LOptions, RaggedColumns,
};
#[cfg(feature = "cli")]
use std::fs;
#[cfg(feature = "cli")]
use std::io::{self, Read, Write};
#[cfg(feature = "cli")]
use std::path::Path;

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "m2l")]
#[command(version)]
#[command(about = "mathtex - MathML to LaTeX converter", long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input file path (reads from stdin if not provided)
    input_file: Option<String>,

    /// Output file path (writes to stdout if not provided)
    #[arg(short, long)]
    output: Option<String>,

    #[command(flatten)]
    convert: ConvertArgs,

    /// Check mode - convert, then report structural problems in the LaTeX
    #[arg(long)]
    check: bool,

    /// Disable colored output for warnings and check reports
    #[arg(long)]
    no_color: bool,

    /// Strict mode: exit with error if any conversion warnings occur
    #[arg(long)]
    strict: bool,

    /// Quiet mode: suppress warning output to stderr
    #[arg(short, long)]
    quiet: bool,

    /// Print the output and its warnings as a JSON object
    #[arg(long)]
    json: bool,

    /// Log conversion details (same as MATHTEX_LOG=debug)
    #[arg(short, long)]
    verbose: bool,
}

/// Conversion flags shared by the top-level command and `convert`/`batch`
#[cfg(feature = "cli")]
#[derive(clap::Args, Clone)]
struct ConvertArgs {
    /// Input kind
    #[arg(short, long, value_enum, default_value_t = Mode::Auto)]
    mode: Mode,

    /// Class marking formula wrapper elements in HTML input
    #[arg(long, default_value = "az-formula")]
    formula_class: String,

    /// Skip the LaTeX repair pass
    #[arg(long)]
    no_repair: bool,

    /// Skip function-name normalization
    #[arg(long)]
    no_normalize: bool,

    /// Leave determinants with unequal column tables as plain rows
    #[arg(long)]
    reject_ragged: bool,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Convert a file (default action)
    Convert {
        /// Input file path
        input: Option<String>,

        /// Output file path
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        convert: ConvertArgs,
    },

    /// Convert every .html file in a directory into a .md file
    Batch {
        /// Input directory or single file
        input: String,

        /// Output directory
        #[arg(short, long)]
        output_dir: String,

        #[command(flatten)]
        convert: ConvertArgs,

        /// File extension for output files
        #[arg(short, long, default_value = "md")]
        extension: String,
    },

    /// Show version and feature info
    Info,
}

#[cfg(feature = "cli")]
#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Detect from file extension or content
    Auto,
    /// HTML document with embedded MathML
    Html,
    /// Standalone MathML fragment
    Mathml,
}

#[cfg(feature = "cli")]
impl ConvertArgs {
    fn math_options(&self) -> M2LOptions {
        M2LOptions {
            normalize_identifiers: !self.no_normalize,
            repair: !self.no_repair,
            ragged_columns: if self.reject_ragged {
                RaggedColumns::Reject
            } else {
                RaggedColumns::Pad
            },
            ..Default::default()
        }
    }

    fn document_options(&self) -> H2MOptions {
        H2MOptions {
            formula_class: self.formula_class.clone(),
            math: self.math_options(),
            ..Default::default()
        }
    }

    fn resolve_format(&self, filename: Option<&str>, content: &str) -> InputFormat {
        match self.mode {
            Mode::Html => InputFormat::Html,
            Mode::Mathml => InputFormat::MathMl,
            Mode::Auto => match filename.and_then(|n| Path::new(n).extension()?.to_str()) {
                Some("mml") => InputFormat::MathMl,
                Some("html") | Some("htm") => InputFormat::Html,
                _ => detect_format(content),
            },
        }
    }

    /// Convert content, returning the output text and the collected warnings
    fn run(
        &self,
        filename: Option<&str>,
        content: &str,
    ) -> mathtex::ConversionResult<(String, Vec<ConversionWarning>, InputFormat)> {
        let format = self.resolve_format(filename, content);
        match format {
            InputFormat::MathMl => {
                let result = mathml_to_latex_with_diagnostics(content, &self.math_options())?;
                Ok((result.latex, result.warnings, format))
            }
            InputFormat::Html => {
                let result = html_to_markdown_with_diagnostics(content, &self.document_options());
                Ok((result.output, result.warnings, format))
            }
        }
    }
}

#[cfg(feature = "cli")]
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("mathtex=debug")
    } else {
        EnvFilter::try_from_env("MATHTEX_LOG").unwrap_or_else(|_| EnvFilter::new("off"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

#[cfg(feature = "cli")]
fn read_input(path: Option<&str>) -> io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

#[cfg(feature = "cli")]
fn write_output(path: Option<&str>, result: &str, warnings: usize) -> io::Result<()> {
    match path {
        Some(path) => {
            let mut file = fs::File::create(path)?;
            writeln!(file, "{}", result)?;
            if warnings == 0 {
                eprintln!("✓ Output written to: {}", path);
            } else {
                eprintln!("⚠ Output written to: {} ({} warning(s))", path, warnings);
            }
        }
        None => println!("{}", result),
    }
    Ok(())
}

#[cfg(feature = "cli")]
fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let use_color = !cli.no_color;

    if let Some(cmd) = cli.command {
        return handle_subcommand(cmd, use_color);
    }

    let input = read_input(cli.input_file.as_deref())?;

    let (result, warnings, format) = match cli.convert.run(cli.input_file.as_deref(), &input) {
        Ok(converted) => converted,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if !cli.quiet && !warnings.is_empty() {
        print_warnings_to_stderr(&warnings, use_color);
    }

    if cli.check {
        let report = match format {
            InputFormat::MathMl => check_latex(&result),
            InputFormat::Html => check_document(&result),
        };
        eprintln!("{}", format_diagnostics(&report, use_color));
        if report.has_errors() {
            std::process::exit(1);
        }
    }

    if cli.strict && !warnings.is_empty() {
        eprintln!(
            "Error: {} conversion warning(s) in strict mode",
            warnings.len()
        );
        std::process::exit(1);
    }

    if cli.json {
        let report = serde_json::json!({
            "format": format.as_str(),
            "output": result,
            "warnings": warnings,
        });
        let text = serde_json::to_string_pretty(&report).map_err(io::Error::other)?;
        return write_output(cli.output.as_deref(), &text, warnings.len());
    }

    write_output(cli.output.as_deref(), &result, warnings.len())
}

#[cfg(feature = "cli")]
fn handle_subcommand(cmd: Commands, use_color: bool) -> io::Result<()> {
    match cmd {
        Commands::Convert {
            input,
            output,
            convert,
        } => {
            let content = read_input(input.as_deref())?;
            match convert.run(input.as_deref(), &content) {
                Ok((result, warnings, _)) => {
                    if !warnings.is_empty() {
                        print_warnings_to_stderr(&warnings, use_color);
                    }
                    write_output(output.as_deref(), &result, warnings.len())?;
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Batch {
            input,
            output_dir,
            convert,
            extension,
        } => {
            fs::create_dir_all(&output_dir)?;

            let input_path = Path::new(&input);
            let files: Vec<_> = if input_path.is_dir() {
                fs::read_dir(input_path)?
                    .filter_map(|e| e.ok())
                    .map(|e| e.path())
                    .filter(|path| {
                        matches!(
                            path.extension().and_then(|s| s.to_str()),
                            Some("html") | Some("htm")
                        )
                    })
                    .collect()
            } else {
                vec![input_path.to_path_buf()]
            };

            let mut success_count = 0;
            let mut error_count = 0;

            for file_path in files {
                let stem = file_path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("output");
                let output_path = Path::new(&output_dir).join(format!("{}.{}", stem, extension));

                let converted = fs::read_to_string(&file_path)
                    .map_err(mathtex::ConversionError::from)
                    .and_then(|content| convert.run(file_path.to_str(), &content));

                match converted {
                    Ok((result, warnings, _)) => match fs::write(&output_path, &result) {
                        Ok(_) => {
                            if warnings.is_empty() {
                                eprintln!("✓ {}", output_path.display());
                            } else {
                                eprintln!(
                                    "⚠ {} ({} warning(s))",
                                    output_path.display(),
                                    warnings.len()
                                );
                            }
                            success_count += 1;
                        }
                        Err(e) => {
                            eprintln!("✗ {} - write error: {}", output_path.display(), e);
                            error_count += 1;
                        }
                    },
                    Err(e) => {
                        eprintln!("✗ {} - {}", file_path.display(), e);
                        error_count += 1;
                    }
                }
            }

            eprintln!(
                "\nBatch conversion complete: {} succeeded, {} failed",
                success_count, error_count
            );

            if error_count > 0 {
                std::process::exit(1);
            }
        }

        Commands::Info => {
            println!("mathtex - MathML to LaTeX converter");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Features:");
            println!("  ✓ Presentation MathML (scripts, fractions, radicals, fences, tables)");
            println!("  ✓ Content MathML <apply> with arithmetic and relational operators");
            println!("  ✓ cases / matrix / determinant layout detection");
            println!("  ✓ Persian and Arabic-Indic digit normalization");
            println!("  ✓ HTML documents: <math> replaced by $$ blocks");
            println!("  ✓ Batch file processing");
            println!("  ✓ LaTeX structure checks");
            println!();
            println!("Logging: set MATHTEX_LOG (e.g. MATHTEX_LOG=debug) or pass -v");
            println!();
        }
    }

    Ok(())
}

/// Print warnings to stderr with optional color coding.
#[cfg(feature = "cli")]
fn print_warnings_to_stderr(warnings: &[ConversionWarning], use_color: bool) {
    let (yellow, reset) = if use_color {
        ("\x1b[33m", "\x1b[0m")
    } else {
        ("", "")
    };

    eprintln!();
    eprintln!("{}Conversion Warnings ({}):{}", yellow, warnings.len(), reset);
    eprintln!();
    for warning in warnings {
        match &warning.tag {
            Some(tag) => eprintln!(
                "  {}[{}]{} <{}>: {}",
                yellow, warning.kind, reset, tag, warning.message
            ),
            None => eprintln!("  {}[{}]{} {}", yellow, warning.kind, reset, warning.message),
        }
    }
    eprintln!();
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Build with --features cli");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  cargo install mathtex --features cli");
    eprintln!("  m2l [OPTIONS] [INPUT_FILE]");
}
