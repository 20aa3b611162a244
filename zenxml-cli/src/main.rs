//! ZenXml command line tool
//!
//! Resolves dotted member paths such as `Root.Item2.Attribute1` against an
//! XML document and prints the result.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;
use zenxml::{Comparison, Options, ScalarKind, Unresolved, Value, XmlObject};

/// Member-style navigation over XML documents
#[derive(Parser)]
#[command(name = "zenxml")]
#[command(version)]
#[command(about = "Navigate XML documents by member name", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Compare member names case-sensitively
    #[arg(long, global = true)]
    case_sensitive: bool,

    /// Fail on names that match no attribute or element
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at a member path
    #[command(visible_alias = "g")]
    Get {
        /// Document file (`-` for stdin)
        file: String,
        /// Dotted member path, e.g. `Root.Item1`
        path: String,
    },

    /// List the child elements of the object at a member path
    #[command(visible_alias = "c")]
    Children {
        /// Document file (`-` for stdin)
        file: String,
        /// Dotted member path, e.g. `Root`
        path: String,
    },

    /// Convert the value at a member path to a scalar
    As {
        /// Document file (`-` for stdin)
        file: String,
        /// Dotted member path, e.g. `Root.Count`
        path: String,
        /// Target kind: int, float, bool, string, date or datetime
        #[arg(short, long)]
        kind: ScalarKind,
    },
}

/// Outcome of a command that ran without error.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    Found,
    Absent,
}

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let options = cli.options();
    let stdout = io::stdout();
    let result = run(cli.command, options, io::stdin().lock(), &mut stdout.lock());
    if let Err(e) = &result {
        eprintln!("Error: {}", e);
    }
    ExitCode::from(exit_status(&result))
}

impl Cli {
    fn options(&self) -> Options {
        Options::new()
            .with_comparison(if self.case_sensitive {
                Comparison::CaseSensitive
            } else {
                Comparison::CaseInsensitive
            })
            .with_unresolved(if self.strict {
                Unresolved::Strict
            } else {
                Unresolved::Lenient
            })
    }
}

/// Maps a command result to the process exit status: 0 found, 1 absent, 2 error.
fn exit_status(result: &CliResult<Outcome>) -> u8 {
    match result {
        Ok(Outcome::Found) => 0,
        Ok(Outcome::Absent) => 1,
        Err(_) => 2,
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Runs a command, reading `-` documents from `stdin` and printing to `out`.
fn run<R: Read, W: Write>(
    command: Commands,
    options: Options,
    stdin: R,
    out: &mut W,
) -> CliResult<Outcome> {
    match command {
        Commands::Get { file, path } => run_get(&load(&file, options, stdin)?, &path, out),
        Commands::Children { file, path } => {
            run_children(&load(&file, options, stdin)?, &path, out)
        }
        Commands::As { file, path, kind } => {
            run_as(&load(&file, options, stdin)?, &path, kind, out)
        }
    }
}

/// Loads the document from a file, or from `stdin` for `-`.
fn load<R: Read>(file: &str, options: Options, mut stdin: R) -> CliResult<XmlObject> {
    if file == "-" {
        let mut text = String::new();
        stdin.read_to_string(&mut text)?;
        debug!(bytes = text.len(), "read document from stdin");
        return Ok(XmlObject::from_xml_with(&text, options)?);
    }
    debug!(file, "loading document");
    Ok(XmlObject::from_file_with(file, options)?)
}

/// Resolves a dotted path starting at the document wrapper.
fn resolve(doc: &XmlObject, path: &str) -> zenxml::Result<Value> {
    path.split('.')
        .filter(|segment| !segment.is_empty())
        .try_fold(Value::Object(doc.clone()), |value, name| value.get(name))
}

/// Resolves `path` and requires an object at the end of it.
fn resolve_object(doc: &XmlObject, path: &str) -> CliResult<Option<XmlObject>> {
    match resolve(doc, path)? {
        Value::Object(object) => Ok(Some(object)),
        Value::Absent => Ok(None),
        other => Err(format!("`{}` is a {} value, not an element", path, other.type_name()).into()),
    }
}

fn run_get<W: Write>(doc: &XmlObject, path: &str, out: &mut W) -> CliResult<Outcome> {
    let value = resolve(doc, path)?;
    if value.is_absent() {
        return Ok(Outcome::Absent);
    }
    writeln!(out, "{}", value)?;
    Ok(Outcome::Found)
}

fn run_children<W: Write>(doc: &XmlObject, path: &str, out: &mut W) -> CliResult<Outcome> {
    let Some(object) = resolve_object(doc, path)? else {
        return Ok(Outcome::Absent);
    };
    for child in &object.as_enumerable()? {
        writeln!(out, "{}", child.name()?.unwrap_or_default())?;
    }
    Ok(Outcome::Found)
}

fn run_as<W: Write>(
    doc: &XmlObject,
    path: &str,
    kind: ScalarKind,
    out: &mut W,
) -> CliResult<Outcome> {
    let scalar = match resolve(doc, path)? {
        Value::Absent => return Ok(Outcome::Absent),
        Value::Object(object) => object.coerce(kind)?,
        Value::Text(text) => kind.coerce(&text)?,
        other => {
            return Err(format!("`{}` is a {} value, cannot convert", path, other.type_name()).into())
        }
    };
    writeln!(out, "{}", scalar)?;
    Ok(Outcome::Found)
}
