//! xlsxdocx command line tool
//!
//! Reads the ingredient sheet, asks for the field to retrieve, the field to
//! sort by, the display language and the output name, then writes
//! `<name>.docx` containing a single comma-delimited paragraph.

use clap::Parser;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use xlsxdocx::{
    write_document, Field, Language, Preset, Prompter, TranslatorBuilder, WorkbookParser,
    XlsxToDocxError, DEFAULT_SHEET_NAME,
};

/// Sort an ingredient spreadsheet and write one delimited paragraph to a .docx file.
///
/// Any option left out is asked for interactively.
#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Input workbook (.xlsx)
    #[arg(long, short = 'i', default_value = "sample_data.xlsx")]
    input: PathBuf,

    /// Sheet holding the ingredient table
    #[arg(long, short = 's', default_value = DEFAULT_SHEET_NAME)]
    sheet: String,

    /// Field to retrieve (1-5 or column name)
    #[arg(long, value_parser = parse_field)]
    target: Option<Field>,

    /// Field to sort by (1-5 or column name)
    #[arg(long, value_parser = parse_field)]
    sort: Option<Field>,

    /// Display language: en, fr or es
    #[arg(long, value_parser = parse_language)]
    lang: Option<Language>,

    /// Output file name without the .docx extension
    #[arg(long)]
    name: Option<String>,

    /// Give up after this many unrecognized answers to one question
    #[arg(long)]
    max_attempts: Option<u32>,
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        handle_error(e);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<(), XlsxToDocxError> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut prompter =
        Prompter::new(stdin.lock(), stdout.lock()).with_max_attempts(cli.max_attempts);
    prompter.banner()?;

    // Parsed once, before the first question
    let table = WorkbookParser::open(File::open(&cli.input)?)?.parse_table(&cli.sheet)?;

    let choices = prompter.collect(Preset {
        target_field: cli.target,
        sorting_field: cli.sort,
        language: cli.lang,
        document_name: cli.name,
    })?;

    let translator = TranslatorBuilder::new()
        .with_sheet_name(cli.sheet)
        .with_target_field(choices.target_field)
        .with_sorting_field(choices.sorting_field)
        .with_language(choices.language)
        .build()?;

    let text = translator.render(&table)?;
    let path = write_document(&text, &choices.document_name)?;

    let (_, mut out) = prompter.into_inner();
    writeln!(out, "\nSaved {}", path.display())?;
    Ok(())
}

fn parse_field(s: &str) -> Result<Field, String> {
    s.parse().map_err(|e: XlsxToDocxError| e.to_string())
}

fn parse_language(s: &str) -> Result<Language, String> {
    s.parse().map_err(|e: XlsxToDocxError| e.to_string())
}

fn handle_error(error: XlsxToDocxError) {
    match error {
        XlsxToDocxError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the input exists and the output location is writable.");
        }
        XlsxToDocxError::Parse(parse_err) => {
            eprintln!("Parse Error: {}", parse_err);
            eprintln!("The file may not be a valid Excel file or may be corrupted.");
        }
        XlsxToDocxError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
            eprintln!("Please check the --sheet option.");
        }
        XlsxToDocxError::MalformedSheet { sheet, message } => {
            eprintln!("Malformed Sheet '{}': {}", sheet, message);
            eprintln!("Row 1 must be a header and columns B to F must hold the ingredient data.");
        }
        XlsxToDocxError::HeterogeneousField {
            field,
            row,
            expected,
            found,
        } => {
            eprintln!(
                "Cannot sort by {}: row {} holds {} but earlier rows hold {}.",
                field, row, found, expected
            );
            eprintln!("Choose another sort field or make the column consistent.");
        }
        XlsxToDocxError::UnsupportedLanguage(tag) => {
            eprintln!("Unsupported Language: {}", tag);
            eprintln!("Use en, fr or es.");
        }
        XlsxToDocxError::InputClosed(prompt) => {
            eprintln!("Input closed while waiting for the {}.", prompt);
        }
        XlsxToDocxError::TooManyAttempts { prompt, limit } => {
            eprintln!("No valid {} after {} attempts.", prompt, limit);
        }
        XlsxToDocxError::Zip(msg) => {
            eprintln!("ZIP Archive Error: {}", msg);
            eprintln!("The document package could not be written.");
        }
        XlsxToDocxError::Xml(msg) => {
            eprintln!("XML Error: {}", msg);
        }
        XlsxToDocxError::SecurityViolation(msg) => {
            eprintln!("Security Violation: {}", msg);
            eprintln!("The file violates resource limits (e.g., file size limit).");
        }
    }
}
