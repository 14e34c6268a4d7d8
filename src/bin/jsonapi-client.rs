//! JSON:API Client CLI
//!
//! Command-line interface for resolving and validating compound documents.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use jsonapi_client::{
    load_document_auto, validate_document, Mapper, Resource, ValidateError,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "jsonapi-client")]
#[command(about = "Resolve JSON:API compound documents into linked resources")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the primary collection of a compound document
    Resolve {
        /// Document source: file path or URL (http:// or https://)
        document: String,

        /// Primary collection to resolve (e.g., posts)
        #[arg(long, short)]
        collection: String,

        /// Output file (stdout if not specified)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,

        /// Validate the document structure before resolving
        #[arg(long)]
        validate: bool,
    },

    /// Check that a document is a well-formed compound document
    Validate {
        /// Document source: file path or URL (http:// or https://)
        document: String,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },

    /// Fetch a collection from an API and resolve it
    #[cfg(feature = "remote")]
    Fetch {
        /// Request path, relative to <PREFIX>_BASE_URL, or an absolute URL
        path: String,

        /// Environment prefix of the API configuration (e.g., blog_api)
        #[arg(long)]
        prefix: String,

        /// Primary collection to resolve (e.g., posts)
        #[arg(long, short)]
        collection: String,

        /// Query parameter as key=value (repeatable)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Resolve {
            document,
            collection,
            output,
            pretty,
            validate,
        } => run_resolve(&document, &collection, output, pretty, validate),

        Commands::Validate { document, json } => run_validate(&document, json),

        #[cfg(feature = "remote")]
        Commands::Fetch {
            path,
            prefix,
            collection,
            params,
            pretty,
        } => run_fetch(&path, &prefix, &collection, &params, pretty),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_resolve(
    source: &str,
    collection: &str,
    output: Option<PathBuf>,
    pretty: bool,
    validate: bool,
) -> Result<(), u8> {
    let document = load_document_auto(source).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    if validate {
        if let Err(e) = validate_document(&document) {
            report_validation_failure(&e);
            return Err(e.exit_code() as u8);
        }
    }

    let resources = Mapper::new(collection).call(&document).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    write_resources(&resources, output, pretty)
}

fn run_validate(source: &str, json_output: bool) -> Result<(), u8> {
    let document = load_document_auto(source).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    match validate_document(&document) {
        Ok(()) => {
            if json_output {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(ValidateError::Invalid { errors }) if json_output => {
            let output = serde_json::json!({
                "valid": false,
                "errors": errors
            });
            println!("{}", output);
            Err(1)
        }
        Err(e) => {
            if json_output {
                report_error(true, &e.to_string());
            } else {
                report_validation_failure(&e);
            }
            Err(e.exit_code() as u8)
        }
    }
}

#[cfg(feature = "remote")]
fn run_fetch(
    path: &str,
    prefix: &str,
    collection: &str,
    params: &[(String, String)],
    pretty: bool,
) -> Result<(), u8> {
    use jsonapi_client::ResourceDefinition;

    let definition = ResourceDefinition::new(collection).config_prefix(prefix);
    let params: Vec<(&str, &str)> = params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();

    let resources = definition.fetch(path, &params).map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    write_resources(&resources, None, pretty)
}

fn write_resources(resources: &[Resource], output: Option<PathBuf>, pretty: bool) -> Result<(), u8> {
    let json_output = if pretty {
        serde_json::to_string_pretty(resources)
    } else {
        serde_json::to_string(resources)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })?;

    match output {
        Some(path) => {
            std::fs::write(&path, &json_output).map_err(|e| {
                eprintln!("Error writing to {}: {}", path.display(), e);
                3u8
            })?;
        }
        None => {
            println!("{}", json_output);
        }
    }

    Ok(())
}

fn report_validation_failure(error: &ValidateError) {
    match error {
        ValidateError::Invalid { errors } => {
            eprintln!("Validation failed:");
            for error in errors {
                eprintln!("  {}", error);
            }
        }
        other => eprintln!("Error: {}", other),
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", serde_json::json!({ "valid": false, "error": msg }));
    } else {
        eprintln!("Error: {}", msg);
    }
}

#[cfg(feature = "remote")]
fn parse_param(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got \"{}\"", s))
}
