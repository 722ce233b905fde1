//! Currency Directive CLI
//!
//! Command-line interface for generating type definitions, linting annotated
//! schemas and running conversions.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use currency_directive::{
    currency_type_defs, execute, lint, load_schema, load_value, validate_codes, ConversionRequest,
    CurrencyCode, CurrencyDirective, Lookup, ScrapeConfig, ScrapeLookup, Severity,
    DEFAULT_DIRECTIVE_NAME,
};
use currency_directive::lookup::{DEFAULT_AMOUNT_MARKER, DEFAULT_BASE_URL};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "currency-directive")]
#[command(about = "Currency conversion directive for API schemas")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the directive declaration and CurrencyCode enum
    Typedefs {
        /// Directive name
        #[arg(long, default_value = DEFAULT_DIRECTIVE_NAME)]
        directive: String,
    },

    /// List recognized currency codes
    Codes {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check annotated fields for invalid codes and unsupported types
    Lint {
        /// Schema metadata file (JSON)
        schema: PathBuf,

        /// Directive name
        #[arg(long, default_value = DEFAULT_DIRECTIVE_NAME)]
        directive: String,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },

    /// Convert a single amount
    Convert {
        /// Amount to convert
        #[arg(value_parser = parse_amount)]
        amount: f64,

        /// Source currency code
        #[arg(long)]
        from: String,

        /// Target currency code
        #[arg(long)]
        to: String,

        #[command(flatten)]
        lookup: LookupArgs,
    },

    /// Transform a schema and resolve every field of a type
    Execute {
        /// Schema metadata file (JSON)
        schema: PathBuf,

        /// Object type to resolve
        #[arg(long = "type", default_value = "Query")]
        type_name: String,

        /// Root value file (JSON); empty object if not specified
        #[arg(long)]
        root: Option<PathBuf>,

        /// Directive name
        #[arg(long, default_value = DEFAULT_DIRECTIVE_NAME)]
        directive: String,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        #[command(flatten)]
        lookup: LookupArgs,
    },
}

#[derive(clap::Args)]
struct LookupArgs {
    /// Search endpoint used for conversions
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Class of the element holding the converted amount
    #[arg(long, default_value = DEFAULT_AMOUNT_MARKER)]
    marker: String,

    /// Request timeout in seconds (0 disables the timeout)
    #[arg(long, default_value_t = 10)]
    timeout: u64,
}

impl LookupArgs {
    fn build(&self) -> Result<ScrapeLookup, u8> {
        let timeout = (self.timeout > 0).then(|| std::time::Duration::from_secs(self.timeout));
        let config = ScrapeConfig::new()
            .base_url(&self.base_url)
            .marker(&self.marker)
            .timeout(timeout);
        ScrapeLookup::new(config).map_err(|e| {
            eprintln!("Error: {}", e);
            2u8
        })
    }
}

fn parse_amount(s: &str) -> Result<f64, String> {
    let amount: f64 = s.parse().map_err(|e| format!("{}", e))?;
    if amount.is_finite() {
        Ok(amount)
    } else {
        Err("amount must be a finite number".to_string())
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Typedefs { directive } => {
            print!("{}", currency_type_defs(&directive));
            Ok(())
        }
        Commands::Codes { json } => run_codes(json),
        Commands::Lint {
            schema,
            directive,
            format,
            strict,
        } => run_lint(&schema, &directive, &format, strict),
        Commands::Convert {
            amount,
            from,
            to,
            lookup,
        } => run_convert(amount, &from, &to, &lookup).await,
        Commands::Execute {
            schema,
            type_name,
            root,
            directive,
            pretty,
            lookup,
        } => run_execute(&schema, &type_name, root.as_deref(), &directive, pretty, &lookup).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn run_codes(json: bool) -> Result<(), u8> {
    if json {
        let codes: serde_json::Map<String, serde_json::Value> = CurrencyCode::all()
            .map(|c| (c.as_str().to_string(), c.label().into()))
            .collect();
        println!("{}", serde_json::Value::Object(codes));
    } else {
        for code in CurrencyCode::all() {
            println!("{}  {}", code, code.label());
        }
    }
    Ok(())
}

fn run_lint(path: &Path, directive: &str, format: &str, strict: bool) -> Result<(), u8> {
    let schema = load_schema(path).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    let result = lint(&schema, directive);

    if format == "json" {
        let output = serde_json::to_string_pretty(&result).map_err(|e| {
            eprintln!("Error serializing output: {}", e);
            2u8
        })?;
        println!("{}", output);
    } else {
        for diag in &result.diagnostics {
            let (color, label) = match diag.severity {
                Severity::Error => ("\x1b[31m", "error"),
                Severity::Warning => ("\x1b[33m", "warning"),
            };
            println!(
                "  {}{}[{}]\x1b[0m: {} - {}",
                color, label, diag.code, diag.path, diag.message
            );
        }
        println!(
            "{} annotated field(s) checked: {} error(s), {} warning(s)",
            result.fields_checked, result.errors, result.warnings
        );
    }

    if result.is_ok() && (!strict || result.warnings == 0) {
        Ok(())
    } else {
        Err(1)
    }
}

async fn run_convert(amount: f64, from: &str, to: &str, lookup: &LookupArgs) -> Result<(), u8> {
    let (from, to) = validate_codes(from, to).map_err(|e| {
        eprintln!("Error: {}", e);
        2u8
    })?;
    let lookup = lookup.build()?;

    let request = ConversionRequest::new(amount, from, to);
    let converted = lookup.convert(&request).await.map_err(|e| {
        eprintln!(
            "Error converting amount {} from {} to {}: {}",
            amount, from, to, e
        );
        3u8
    })?;

    println!("{}", converted);
    Ok(())
}

async fn run_execute(
    schema_path: &Path,
    type_name: &str,
    root: Option<&Path>,
    directive: &str,
    pretty: bool,
    lookup: &LookupArgs,
) -> Result<(), u8> {
    let schema = load_schema(schema_path).map_err(|e| {
        eprintln!("Error loading schema: {}", e);
        e.exit_code() as u8
    })?;
    let root = match root {
        Some(path) => load_value(path).map_err(|e| {
            eprintln!("Error loading root value: {}", e);
            e.exit_code() as u8
        })?,
        None => serde_json::json!({}),
    };

    let directive = CurrencyDirective::new(lookup.build()?).with_name(directive);
    let schema = directive.transform(schema);
    let result = execute(&schema, type_name, root).await;

    let output = if pretty {
        serde_json::to_string_pretty(&result)
    } else {
        serde_json::to_string(&result)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;
    println!("{}", output);

    if result.is_ok() {
        Ok(())
    } else {
        Err(1)
    }
}
