pub mod error;
pub mod params;
pub mod template;
pub mod generator;
pub mod config;

pub use error::{GeneratorError, Result};
pub use params::{BuildParameters, REQUIRED_KEYS};
pub use template::{TemplateDocument, Builder, Provisioner, SourceAmiFilter, Variables};
pub use generator::{TemplateGenerator, DEFAULT_OUTPUT_FILE};
pub use config::load_parameters;
