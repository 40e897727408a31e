//! OpenAPI Validator CLI
//!
//! Command-line interface for validating payloads against OpenAPI schemas.

mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use openapi_validator::{
    find_media_type_schema, load_document, load_document_auto, navigate_fragment, resolve_refs,
    Direction, OperationAddress, ResponseAddress, SchemaValidator, SpecFinder, ValidateError,
    ValidateOptions,
};
use serde_json::{json, Value};

use crate::logging::{init_logging, LogFormat, LogLevel};

#[derive(Parser)]
#[command(name = "openapi-validator")]
#[command(about = "Validate payloads against OpenAPI schemas")]
#[command(version)]
struct Cli {
    /// Log verbosity (logs are written to stderr)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,

    /// Log output format
    #[arg(long, value_enum, default_value = "text", global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a payload against a schema document
    Validate {
        /// Payload file to validate (JSON or YAML)
        payload: PathBuf,

        /// Schema source: file path or URL (http:// or https://)
        #[arg(long)]
        schema: String,

        /// JSON Pointer to the schema inside the document (e.g. #/components/schemas/Pet)
        #[arg(long)]
        pointer: Option<String>,

        /// Validate as request data
        #[arg(
            long,
            conflicts_with = "response",
            required_unless_present = "response"
        )]
        request: bool,

        /// Validate as response data
        #[arg(long, conflicts_with = "request", required_unless_present = "request")]
        response: bool,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,

        /// Treat `format` as an annotation only
        #[arg(long)]
        no_formats: bool,
    },

    /// Validate a request or response body against an operation in an OpenAPI document
    Body {
        /// Payload file to validate (JSON or YAML)
        payload: PathBuf,

        /// OpenAPI document: file path or URL
        #[arg(long)]
        spec: String,

        /// Path template as written in the document (e.g. /pets/{id})
        #[arg(long)]
        path: String,

        /// HTTP method
        #[arg(long, short)]
        method: String,

        /// Response status code; validates the response body when given
        #[arg(long)]
        status: Option<u16>,

        /// Media type of the body
        #[arg(long, default_value = "application/json")]
        media_type: String,

        /// Output results as JSON (for automation)
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let result = match cli.command {
        Commands::Validate {
            payload,
            schema,
            pointer,
            request,
            response: _,
            json,
            no_formats,
        } => run_validate(ValidateArgs {
            payload,
            schema,
            pointer,
            direction: Direction::from_request_flag(request),
            json_output: json,
            formats: !no_formats,
        }),

        Commands::Body {
            payload,
            spec,
            path,
            method,
            status,
            media_type,
            json,
        } => run_body(BodyArgs {
            payload,
            spec,
            path,
            method,
            status,
            media_type,
            json_output: json,
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

struct ValidateArgs {
    payload: PathBuf,
    schema: String,
    pointer: Option<String>,
    direction: Direction,
    json_output: bool,
    formats: bool,
}

fn run_validate(args: ValidateArgs) -> Result<(), u8> {
    let ValidateArgs {
        payload: payload_path,
        schema: schema_source,
        pointer,
        direction,
        json_output,
        formats,
    } = args;

    let payload = load_document(&payload_path).map_err(|e| {
        report_error(json_output, &format!("loading payload: {}", e));
        e.exit_code() as u8
    })?;

    let document = load_schema_document(&schema_source, json_output)?;
    let schema = match pointer.as_deref() {
        Some(fragment) => navigate_fragment(&document, fragment).map_err(|e| {
            report_error(json_output, &e.to_string());
            e.exit_code() as u8
        })?,
        None => &document,
    };

    let validator = SchemaValidator::new(ValidateOptions::new(direction).formats(formats))
        .with_document(&document);
    report_outcome(json_output, validator.validate(&payload, schema))
}

struct BodyArgs {
    payload: PathBuf,
    spec: String,
    path: String,
    method: String,
    status: Option<u16>,
    media_type: String,
    json_output: bool,
}

fn run_body(args: BodyArgs) -> Result<(), u8> {
    let BodyArgs {
        payload: payload_path,
        spec,
        path,
        method,
        status,
        media_type,
        json_output,
    } = args;

    let payload = load_document(&payload_path).map_err(|e| {
        report_error(json_output, &format!("loading payload: {}", e));
        e.exit_code() as u8
    })?;
    let document = load_schema_document(&spec, json_output)?;

    let finder = SpecFinder::new(&document);
    let operation = OperationAddress::new(path, &method);
    let (content, direction) = match status {
        Some(code) => (
            finder.find_response_body_spec(&ResponseAddress::new(operation, code)),
            Direction::Response,
        ),
        None => (finder.find_body_spec(&operation), Direction::Request),
    };
    let content = content.map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;
    let schema = find_media_type_schema(&content, &media_type).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })?;

    report_outcome(
        json_output,
        SchemaValidator::for_direction(direction)
            .with_document(&document)
            .validate(&payload, schema),
    )
}

/// Load a document and inline its internal references. Recursive references
/// stay in place and are followed during validation.
fn load_schema_document(source: &str, json_output: bool) -> Result<Value, u8> {
    let document = load_document_auto(source).map_err(|e| {
        report_error(json_output, &format!("loading schema: {}", e));
        e.exit_code() as u8
    })?;
    resolve_refs(&document).map_err(|e| {
        report_error(json_output, &e.to_string());
        e.exit_code() as u8
    })
}

fn report_outcome(json_output: bool, outcome: Result<(), ValidateError>) -> Result<(), u8> {
    match outcome {
        Ok(()) => {
            if json_output {
                println!(r#"{{"valid":true}}"#);
            } else {
                println!("Valid");
            }
            Ok(())
        }
        Err(ValidateError::Mismatch(mismatch)) => {
            if json_output {
                let output = json!({
                    "valid": false,
                    "error": {
                        "keyword": mismatch.keyword(),
                        "location": mismatch.breadcrumb(),
                        "data": mismatch.data(),
                        "message": mismatch.to_string(),
                    }
                });
                println!("{}", output);
            } else {
                eprintln!("Validation failed:");
                eprintln!("  {}", mismatch);
            }
            Err(1)
        }
        Err(err @ ValidateError::InvalidSchema(_)) => {
            report_error(json_output, &err.to_string());
            Err(err.exit_code() as u8)
        }
    }
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", json!({ "valid": false, "error": msg }));
    } else {
        eprintln!("Error: {}", msg);
    }
}
