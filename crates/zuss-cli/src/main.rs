use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Once;

use zuss_ast::{Color, Sheet, Value};
use zuss_codegen::builtins::builtins;
use zuss_codegen::{MapResolver, Translator};

#[derive(Parser)]
#[command(name = "zuss")]
#[command(about = "ZUSS: translate parsed style sheets into CSS")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Translate a sheet tree (JSON) to CSS
    Build {
        /// Input sheet tree in JSON
        path: String,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        host: HostArgs,
    },

    /// Translate a sheet tree and discard the output
    Check {
        /// Input sheet tree in JSON
        path: String,

        #[command(flatten)]
        host: HostArgs,
    },
}

/// What the sheet can see beyond its own definitions.
#[derive(Args, Debug)]
struct HostArgs {
    /// Host variable, `name=value`
    #[arg(short = 'D', long = "define", value_parser = parse_define)]
    defines: Vec<(String, Value)>,

    /// Do not provide the builtin color functions
    #[arg(long)]
    no_builtins: bool,
}

static TRACING_INIT: Once = Once::new();

/// Enable with `RUST_LOG=zuss_codegen=debug` or `RUST_LOG=zuss_codegen=trace`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Build { path, output, host } => cmd_build(&path, output.as_deref(), host),
        Command::Check { path, host } => cmd_check(&path, host),
    }
}

/// Parse `name=value` into a host variable.
fn parse_define(arg: &str) -> Result<(String, Value), String> {
    let (name, raw) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected name=value, got `{arg}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing variable name in `{arg}`"));
    }
    Ok((name.to_string(), parse_value(raw.trim())))
}

/// Interpret a command-line literal: number, dimension, `#hex` color,
/// boolean, or a bare keyword.
fn parse_value(raw: &str) -> Value {
    if let Some(color) = Color::parse_hex(raw) {
        return Value::Color(color);
    }
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    let split = raw
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
        .map_or(raw.len(), |(i, _)| i);
    let (number, unit) = raw.split_at(split);
    match number.parse::<f64>() {
        Ok(n) if unit.is_empty() => Value::number(n),
        Ok(n) if unit == "%" || unit.chars().all(|c| c.is_ascii_alphabetic()) => {
            Value::dimension(n, unit)
        }
        _ => Value::ident(raw),
    }
}

fn build_resolver(host: HostArgs) -> MapResolver {
    let mut resolver = MapResolver::new();
    for (name, value) in host.defines {
        resolver.define_variable(name, value);
    }
    if host.no_builtins {
        resolver
    } else {
        resolver.with_fallback(builtins())
    }
}

fn load_sheet(path: &str) -> Sheet {
    let p = Path::new(path);
    if !p.exists() {
        eprintln!("Error: file not found: {path}");
        std::process::exit(1);
    }
    let source = match std::fs::read_to_string(p) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error reading {path}: {e}");
            std::process::exit(1);
        }
    };
    let sheet: Sheet = match serde_json::from_str(&source) {
        Ok(sheet) => sheet,
        Err(e) => {
            eprintln!("Error loading sheet tree from {path}: {e}");
            std::process::exit(1);
        }
    };
    tracing::debug!(path, nodes = sheet.children.len(), "loaded sheet");
    sheet
}

/// Translate into `out_path`. The file is removed again if translation fails.
fn translate_to_file(
    sheet: &Sheet,
    resolver: &MapResolver,
    out_path: &Path,
) -> zuss_codegen::Result<()> {
    let file = File::create(out_path)?;
    let result = Translator::new(sheet, BufWriter::new(file), Some(resolver)).translate();
    if result.is_err() {
        if let Err(e) = std::fs::remove_file(out_path) {
            tracing::warn!(
                path = %out_path.display(),
                error = %e,
                "failed to remove partial output"
            );
        }
    }
    result
}

fn cmd_build(path: &str, output: Option<&str>, host: HostArgs) {
    let sheet = load_sheet(path);
    let resolver = build_resolver(host);

    let result = match output {
        Some(out_path) => translate_to_file(&sheet, &resolver, Path::new(out_path)),
        None => Translator::new(&sheet, std::io::stdout().lock(), Some(&resolver)).translate(),
    };
    if let Err(e) = result {
        eprintln!("Translation error in {path}: {e}");
        std::process::exit(1);
    }

    if let Some(out_path) = output {
        eprintln!("Built: {out_path}");
    }
}

fn cmd_check(path: &str, host: HostArgs) {
    let sheet = load_sheet(path);
    let resolver = build_resolver(host);

    if let Err(e) = Translator::new(&sheet, std::io::sink(), Some(&resolver)).translate() {
        eprintln!("Translation error in {path}: {e}");
        std::process::exit(1);
    }

    eprintln!("OK: {path}");
}
