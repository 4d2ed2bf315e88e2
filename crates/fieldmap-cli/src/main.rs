mod logging;
mod settings;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use fieldmap_core::{
    CanonicalType, OriginSystem, SampleValue, StringSubtype, canonicalize_detailed,
};
use fieldmap_mapping::{
    MappingEditor, MappingError, ValidationReport, load_document, mapping_document_json_schema,
};
use fieldmap_transform::{TransformCatalog, TransformCategory};
use logging::init_logging;
use serde::Serialize;
use settings::load_settings;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings error: {0}")]
    Settings(#[from] toml::de::Error),
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[derive(Parser, Debug)]
#[command(name = "fieldmap", version, about = "Field mapping type engine")]
struct Cli {
    /// Settings file (defaults to ./fieldmap.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize a raw type label into a canonical type.
    Canonicalize(CanonicalizeArgs),
    /// List the transform catalog.
    Transforms(TransformsArgs),
    /// Compose and simulate a transform chain on a value.
    Preview(PreviewArgs),
    /// Load a mapping document and report its validation.
    Validate(ValidateArgs),
    /// Print the mapping document JSON Schema.
    Schema,
}

#[derive(Args, Debug)]
struct CanonicalizeArgs {
    /// Raw type label (`varchar(255)`, `ObjectId`, `number`, ...).
    raw: String,
    /// Vocabulary the label comes from: json, sql or document.
    #[arg(long, default_value = "json")]
    origin: OriginSystem,
}

#[derive(Args, Debug)]
struct TransformsArgs {
    /// Only list one category.
    #[arg(long)]
    category: Option<TransformCategory>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    /// Sample value as JSON; bare words are taken as strings.
    #[arg(long)]
    value: String,
    /// Comma-separated transform names, applied left to right.
    #[arg(long, value_delimiter = ',')]
    chain: Vec<String>,
    /// Static source type; inferred from the value when omitted.
    #[arg(long)]
    source_type: Option<CanonicalType>,
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Mapping document (JSON).
    document: PathBuf,
    /// Emit a JSON report instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Also fail when any mapping is incompatible with its target.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(event = "run_failed", error = %err);
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, CliError> {
    let settings = load_settings(cli.config.as_deref())?;
    init_logging(&settings)?;

    let run_id = Uuid::new_v4().to_string();
    tracing::info!(event = "run_started", run_id = %run_id);

    let code = match cli.command {
        Command::Canonicalize(args) => run_canonicalize(args),
        Command::Transforms(args) => run_transforms(args),
        Command::Preview(args) => run_preview(args)?,
        Command::Validate(args) => run_validate(args, &settings, &run_id)?,
        Command::Schema => {
            let schema = mapping_document_json_schema();
            println!("{}", serde_json::to_string_pretty(&schema)?);
            ExitCode::SUCCESS
        }
    };

    tracing::info!(event = "run_finished", run_id = %run_id);
    Ok(code)
}

fn run_canonicalize(args: CanonicalizeArgs) -> ExitCode {
    let resolved = canonicalize_detailed(&args.raw, args.origin);
    println!("{} ({}) -> {}", args.raw, args.origin, resolved.canonical);
    if let Some(caveat) = resolved.caveat {
        println!("note: {caveat}");
    }
    ExitCode::SUCCESS
}

fn run_transforms(args: TransformsArgs) -> ExitCode {
    let catalog = TransformCatalog::builtin();
    for category in TransformCategory::ALL {
        if args.category.is_some_and(|wanted| wanted != category) {
            continue;
        }
        println!("[{}]", category.as_str());
        for transform in catalog.by_category(category) {
            println!(
                "  {:<22} -> {:<10} {}",
                transform.id(),
                transform.output().to_string(),
                transform.description()
            );
        }
    }
    ExitCode::SUCCESS
}

fn run_preview(args: PreviewArgs) -> Result<ExitCode, CliError> {
    let sample = parse_sample(&args.value);
    let source_type = args.source_type.unwrap_or_else(|| sample.canonical_type());
    let catalog = TransformCatalog::builtin();
    let preview = catalog.preview(source_type, args.chain.as_slice(), &sample);

    match catalog.compose_type(source_type, args.chain.as_slice()) {
        Ok(declared) => println!("type:   {source_type} -> {declared}"),
        Err(err) => println!("type:   {err}"),
    }
    println!("input:  {}", preview.input.to_json_string());
    match &preview.outcome {
        Ok(value) => {
            println!("output: {} ({})", value.to_json_string(), value.canonical_type());
            Ok(ExitCode::SUCCESS)
        }
        Err(_) => {
            println!("output: {}", preview.display());
            Ok(ExitCode::FAILURE)
        }
    }
}

/// JSON when it parses, otherwise the raw text as a string sample.
fn parse_sample(raw: &str) -> SampleValue {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(value) => SampleValue::from(value),
        Err(_) => SampleValue::from(raw),
    }
}

#[derive(Serialize)]
struct ValidateOutput<'a> {
    run_id: &'a str,
    generated_at: chrono::DateTime<chrono::Utc>,
    mappings: fieldmap_mapping::MappingSet,
    summary: fieldmap_mapping::MappingSummary,
    issues: Vec<fieldmap_mapping::SetIssue>,
}

fn run_validate(
    args: ValidateArgs,
    settings: &settings::CliSettings,
    run_id: &str,
) -> Result<ExitCode, CliError> {
    let raw = read_json(&args.document)?;
    let document = match load_document(&raw) {
        Ok(document) => document,
        Err(MappingError::InvalidDocument(report)) => {
            print_report(&report);
            return Ok(ExitCode::from(2));
        }
        Err(err) => return Err(err.into()),
    };

    let catalog = TransformCatalog::builtin();
    let editor = MappingEditor::from_document(catalog, document, settings.auto_map_options())?;
    let issues = editor.set_issues();
    let incompatible = editor.incompatible_mappings();
    tracing::info!(
        event = "document_validated",
        path = %args.document.display(),
        mappings = editor.mappings().len(),
        issues = issues.len(),
        incompatible = incompatible.len()
    );

    if args.json {
        let output = ValidateOutput {
            run_id,
            generated_at: chrono::Utc::now(),
            mappings: editor.mappings(),
            summary: editor.summary(),
            issues: issues.clone(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for mapping in &editor.mappings() {
            let validation = mapping.validation();
            let status = if !validation.compatible {
                "incompatible"
            } else if validation.conversion_needed {
                "conversion"
            } else {
                "ok"
            };
            println!(
                "{:<12} {} [{} -> {} => {}]",
                status,
                mapping.key(),
                mapping.source_type(),
                validation.transformed_type,
                mapping.target_type()
            );
            if let Some(warning) = &validation.warning {
                println!("{:<12} {warning}", "");
            }
        }

        let mapped = editor.mappings();
        let mapped_sources: BTreeSet<&str> =
            mapped.iter().map(|mapping| mapping.source_path()).collect();
        for source in editor.sources() {
            if mapped_sources.contains(source.path.as_str()) {
                continue;
            }
            match source.string_subtype() {
                Some(subtype) if subtype != StringSubtype::Plain => println!(
                    "{:<12} {} ({}, looks like {})",
                    "unmapped",
                    source.path,
                    source.canonical_type(),
                    subtype.as_str()
                ),
                _ => println!(
                    "{:<12} {} ({})",
                    "unmapped",
                    source.path,
                    source.canonical_type()
                ),
            }
        }

        let summary = editor.summary();
        println!(
            "\n{} mappings: {} ok, {} need conversion, {} incompatible; required {}/{}",
            summary.total,
            summary.compatible,
            summary.conversion_needed,
            summary.incompatible,
            summary.required_mapped,
            summary.required_total
        );
        for issue in &issues {
            println!("error [{}] {}", issue.code.as_str(), issue.message);
        }
    }

    if args.strict && !incompatible.is_empty() {
        if !args.json {
            for mapping in &incompatible {
                println!("error [incompatible_mapping] {}", mapping.key());
            }
        }
        return Ok(ExitCode::FAILURE);
    }
    if issues.is_empty() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn read_json(path: &Path) -> Result<serde_json::Value, CliError> {
    let contents = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn print_report(report: &ValidationReport) {
    for issue in report.errors.iter().chain(&report.warnings) {
        println!(
            "{} [{}] {}: {}",
            issue.severity.as_str(),
            issue.code,
            issue.path,
            issue.message
        );
        if let Some(hint) = &issue.hint {
            println!("  hint: {hint}");
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn preview_chain_splits_on_commas() {
        let cli = Cli::try_parse_from([
            "fieldmap",
            "preview",
            "--value",
            "\"19.99\"",
            "--chain",
            "trim,parse_float",
        ])
        .expect("parse");
        match cli.command {
            Command::Preview(args) => {
                assert_eq!(args.chain, ["trim", "parse_float"]);
                assert!(args.source_type.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn origin_aliases_are_accepted() {
        let cli =
            Cli::try_parse_from(["fieldmap", "canonicalize", "ObjectId", "--origin", "mongodb"])
                .expect("parse");
        match cli.command {
            Command::Canonicalize(args) => assert_eq!(args.origin, OriginSystem::Document),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn validate_is_lenient_unless_strict() {
        let cli = Cli::try_parse_from(["fieldmap", "validate", "doc.json"]).expect("parse");
        match cli.command {
            Command::Validate(args) => assert!(!args.strict && !args.json),
            other => panic!("unexpected command {other:?}"),
        }
        let cli = Cli::try_parse_from(["fieldmap", "validate", "doc.json", "--strict"])
            .expect("parse");
        match cli.command {
            Command::Validate(args) => assert!(args.strict),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn bare_words_are_string_samples() {
        assert_eq!(parse_sample("hello"), SampleValue::from("hello"));
        assert_eq!(parse_sample("42"), SampleValue::Integer(42));
        assert_eq!(parse_sample("{\"a\":null}").get("a"), Some(&SampleValue::Null));
    }
}
