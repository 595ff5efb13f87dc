// packer-template/src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use std::{path::PathBuf, process::ExitCode};
use tracing::debug;

use packer_template::{load_parameters, BuildParameters, TemplateGenerator, DEFAULT_OUTPUT_FILE};

#[derive(Parser, Debug)]
#[command(name = "packer-template", version, about = "Generate a Packer amazon-ebs template")]
struct Args {
    /// Parameter file (.yaml, .yml, .json or .toml). Without it the built-in example parameters are used.
    #[arg(long)]
    params: Option<PathBuf>,
    /// Where to write the template (overwritten if present)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    output: PathBuf,

    #[arg(long)]
    ami_name: Option<String>,
    #[arg(long)]
    instance_type: Option<String>,
    #[arg(long)]
    region: Option<String>,
    #[arg(long)]
    app_version: Option<String>,
    /// Repeatable; only the first one is placed in the template
    #[arg(long = "subnet-id")]
    subnet_ids: Vec<String>,
    /// Repeatable
    #[arg(long = "security-group-id")]
    security_group_ids: Vec<String>,
}

impl Args {
    fn overrides(&self) -> BuildParameters {
        let list = |v: &Vec<String>| (!v.is_empty()).then(|| v.clone());
        BuildParameters {
            ami_name: self.ami_name.clone(),
            instance_type: self.instance_type.clone(),
            region: self.region.clone(),
            app_version: self.app_version.clone(),
            subnet_ids: list(&self.subnet_ids),
            security_group_ids: list(&self.security_group_ids),
        }
    }

    /// reference (only without --params) < file < flags
    fn parameters(&self) -> Result<BuildParameters> {
        let mut params = match &self.params {
            Some(path) => load_parameters(path).with_context(|| format!("load parameters from {}", path.display()))?,
            None => BuildParameters::reference(),
        };
        params.overlay(&self.overrides());
        Ok(params)
    }
}

fn run(args: &Args) -> Result<()> {
    let params = args.parameters()?;
    debug!(?params, "effective build parameters");
    TemplateGenerator::new(&args.output).run(&params)?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
