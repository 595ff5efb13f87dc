// packer-template/src/generator.rs

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    error::{GeneratorError, Result},
    params::BuildParameters,
    template::TemplateDocument,
};

pub const DEFAULT_OUTPUT_FILE: &str = "packer_template.json";

/// Validates parameters, builds one template, and writes it to `output_file`.
#[derive(Clone, Debug)]
pub struct TemplateGenerator {
    output_file: PathBuf,
}

impl Default for TemplateGenerator {
    fn default() -> Self { Self::new(DEFAULT_OUTPUT_FILE) }
}

impl TemplateGenerator {
    pub fn new(output_file: impl Into<PathBuf>) -> Self {
        Self { output_file: output_file.into() }
    }

    pub fn output_file(&self) -> &Path { &self.output_file }

    pub fn validate(&self, params: &BuildParameters) -> Result<()> {
        params.validate()
    }

    pub fn generate(&self, params: &BuildParameters) -> Result<TemplateDocument> {
        TemplateDocument::build(params)
    }

    /// Write `template` over `output_file`.
    ///
    /// The text goes to a temporary sibling first and is renamed into place, so
    /// the destination holds either the previous content or the full template.
    /// An existing file keeps its permissions; a symlink is written through.
    pub fn save(&self, template: &TemplateDocument) -> Result<()> {
        let text = template.to_json_pretty()?;
        let path = &self.output_file;
        let io_err = |e: std::io::Error| GeneratorError::io(path, e);

        let dest = resolve_destination(path);
        let dir = match dest.parent() {
            Some(d) if !d.as_os_str().is_empty() => d,
            _ => Path::new("."),
        };
        let existing = fs::metadata(&dest).ok().map(|m| m.permissions());

        let mut builder = tempfile::Builder::new();
        builder.prefix(".packer-template").suffix(".tmp");
        if let (None, Some(perms)) = (&existing, plain_create_permissions()) {
            builder.permissions(perms);
        }
        let mut tmp = builder.tempfile_in(dir).map_err(io_err)?;
        if let Some(perms) = existing {
            tmp.as_file().set_permissions(perms).map_err(io_err)?;
        }
        tmp.write_all(text.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&dest).map_err(|e| io_err(e.error))?;

        println!("Template successfully saved to {}", path.display());
        Ok(())
    }

    /// Build then save. Any error is returned untouched; nothing is written
    /// unless the template was built.
    pub fn run(&self, params: &BuildParameters) -> Result<TemplateDocument> {
        info!("Generating Packer template...");
        let template = self.generate(params)?;
        self.save(&template)?;
        info!(output = %self.output_file.display(), "Packer template generation completed.");
        Ok(template)
    }
}

/// Mode a plain `File::create` asks for; the umask still applies.
#[cfg(unix)]
fn plain_create_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o666))
}

#[cfg(not(unix))]
fn plain_create_permissions() -> Option<fs::Permissions> { None }

/// Follow a symlink at `path` to the file it points at, even a dangling one.
fn resolve_destination(path: &Path) -> PathBuf {
    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => fs::canonicalize(path).unwrap_or_else(|_| {
            match fs::read_link(path) {
                Ok(target) if target.is_relative() => path.parent().unwrap_or(Path::new("")).join(target),
                Ok(target) => target,
                Err(_) => path.to_path_buf(),
            }
        }),
        _ => path.to_path_buf(),
    }
}
