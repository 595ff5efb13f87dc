use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use packer_template::{load_parameters, BuildParameters, TemplateDocument};
use serde_json::Value;
use std::{fs, path::Path, path::PathBuf, process::ExitCode};

const SCHEMA: &str = include_str!("../../schemas/packer_template.schema.json");

#[derive(Parser)]
#[command(name = "xtask", about = "packer-template workspace tasks")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Validate a written template against schemas/packer_template.schema.json
    ValidateTemplate {
        #[arg(default_value = "packer_template.json")]
        file: PathBuf,
    },
    /// Build a template in memory from a parameter file (or the built-in
    /// example parameters) and validate it without writing anything
    Check {
        #[arg(long)]
        params: Option<PathBuf>,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let (label, errors) = match cli.cmd {
        Cmd::ValidateTemplate { file } => (file.display().to_string(), template_file_errors(&file)?),
        Cmd::Check { params } => {
            let label = params.as_ref().map_or_else(|| "built-in parameters".to_string(), |p| p.display().to_string());
            (label, generated_errors(params.as_deref())?)
        }
    };
    if !errors.is_empty() {
        eprintln!("Invalid: {label}");
        for e in errors {
            eprintln!("- {e}");
        }
        return Ok(ExitCode::FAILURE);
    }
    println!("OK: {label}");
    Ok(ExitCode::SUCCESS)
}

/// Schema violations of `doc`, one message per error.
fn schema_errors(doc: &Value) -> Result<Vec<String>> {
    let schema: Value = serde_json::from_str(SCHEMA).context("parse bundled schema")?;
    let validator = jsonschema::validator_for(&schema).map_err(|e| anyhow::anyhow!("compile schema: {e}"))?;
    Ok(validator.iter_errors(doc).map(|e| e.to_string()).collect())
}

fn template_file_errors(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let doc: Value = serde_json::from_str(&text).with_context(|| format!("parse {}", path.display()))?;
    schema_errors(&doc)
}

fn generated_errors(params: Option<&Path>) -> Result<Vec<String>> {
    let params = match params {
        Some(p) => load_parameters(p)?,
        None => BuildParameters::reference(),
    };
    let doc = TemplateDocument::build(&params)?;
    // also catch anything lost between the typed document and its text form
    let reparsed: Value = serde_json::from_str(&doc.to_json_pretty()?)?;
    schema_errors(&reparsed)
}
