// packer-template/src/params.rs

use serde::{Deserialize, Serialize};

use crate::error::{GeneratorError, Result};

/// Keys that must be present before a template can be built, in check order.
pub const REQUIRED_KEYS: [&str; 6] = [
    "ami_name",
    "instance_type",
    "region",
    "app_version",
    "subnet_ids",
    "security_group_ids",
];

/// Caller-supplied description of the image to build.
///
/// Every key is optional at the type level so that an absent key can be
/// reported by name instead of surfacing as a deserialization failure.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct BuildParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ami_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    /// Only the first subnet ends up in the template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subnet_ids: Option<Vec<String>>,
    /// Required, never rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub security_group_ids: Option<Vec<String>>,
}

impl BuildParameters {
    /// The parameter set the generator falls back to when nothing else is given.
    pub fn reference() -> Self {
        Self {
            ami_name: Some("my-custom-ami".into()),
            instance_type: Some("t2.micro".into()),
            region: Some("us-west-2".into()),
            app_version: Some("1.0.0".into()),
            subnet_ids: Some(vec!["subnet-abc123".into(), "subnet-def456".into()]),
            security_group_ids: Some(vec!["sg-xyz789".into()]),
        }
    }

    pub fn is_present(&self, key: &str) -> bool {
        match key {
            "ami_name" => self.ami_name.is_some(),
            "instance_type" => self.instance_type.is_some(),
            "region" => self.region.is_some(),
            "app_version" => self.app_version.is_some(),
            "subnet_ids" => self.subnet_ids.is_some(),
            "security_group_ids" => self.security_group_ids.is_some(),
            _ => false,
        }
    }

    /// Fails on the first required key, in `REQUIRED_KEYS` order, that is absent.
    /// Values are not inspected.
    pub fn validate(&self) -> Result<()> {
        match REQUIRED_KEYS.into_iter().find(|k| !self.is_present(k)) {
            Some(key) => Err(GeneratorError::MissingParameter { key }),
            None => Ok(()),
        }
    }

    /// Replace every field that `other` sets.
    pub fn overlay(&mut self, other: &BuildParameters) {
        macro_rules! ov { ($f:ident) => { if other.$f.is_some() { self.$f = other.$f.clone(); } } }
        ov!(ami_name);
        ov!(instance_type);
        ov!(region);
        ov!(app_version);
        ov!(subnet_ids);
        ov!(security_group_ids);
    }
}
