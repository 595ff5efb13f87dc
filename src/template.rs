// packer-template/src/template.rs

//! The Packer template document. Field declaration order is output order.

use serde::{Deserialize, Serialize};

use crate::{
    error::{GeneratorError, Result},
    params::BuildParameters,
};

pub const BUILDER_TYPE: &str = "amazon-ebs";
pub const SOURCE_AMI_NAME: &str = "ubuntu/images/*ubuntu-jammy-22.04-amd64-server-*";
pub const ROOT_DEVICE_TYPE: &str = "ebs";
pub const VIRTUALIZATION_TYPE: &str = "hvm";
/// Canonical's AWS account.
pub const CANONICAL_OWNER_ID: &str = "099720109477";
pub const SSH_USERNAME: &str = "ubuntu";
pub const PROVISIONER_TYPE: &str = "shell";
pub const PACKAGE_NAME: &str = "my-app";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateDocument {
    pub variables: Variables,
    pub builders: Vec<Builder>,
    pub provisioners: Vec<Provisioner>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Variables {
    pub app_version: String,
    pub region: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Builder {
    #[serde(rename = "type")]
    pub kind: String,
    pub ami_name: String,
    pub instance_type: String,
    pub region: String,
    pub source_ami_filter: SourceAmiFilter,
    pub ssh_username: String,
    pub subnet_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceAmiFilter {
    pub filters: AmiFilters,
    pub most_recent: bool,
    pub owners: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AmiFilters {
    pub name: String,
    #[serde(rename = "root-device-type")]
    pub root_device_type: String,
    #[serde(rename = "virtualization-type")]
    pub virtualization_type: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Provisioner {
    #[serde(rename = "type")]
    pub kind: String,
    pub inline: Vec<String>,
}

impl Default for SourceAmiFilter {
    fn default() -> Self {
        Self {
            filters: AmiFilters {
                name: SOURCE_AMI_NAME.into(),
                root_device_type: ROOT_DEVICE_TYPE.into(),
                virtualization_type: VIRTUALIZATION_TYPE.into(),
            },
            most_recent: true,
            owners: vec![CANONICAL_OWNER_ID.into()],
        }
    }
}

impl Provisioner {
    /// Shell provisioner that installs `PACKAGE_NAME` pinned to `app_version`.
    pub fn install(app_version: &str) -> Self {
        Self {
            kind: PROVISIONER_TYPE.into(),
            inline: vec![
                "echo Installing application...".into(),
                format!("sudo apt-get install {PACKAGE_NAME}={app_version} -y"),
                "echo Application installation complete.".into(),
            ],
        }
    }
}

/// Pull a required field out of validated parameters.
fn required<'a, T>(value: &'a Option<T>, key: &'static str) -> Result<&'a T> {
    value.as_ref().ok_or(GeneratorError::MissingParameter { key })
}

impl TemplateDocument {
    /// Validate `params` and assemble the document. Nothing is produced on failure.
    pub fn build(params: &BuildParameters) -> Result<Self> {
        params.validate()?;

        let ami_name = required(&params.ami_name, "ami_name")?;
        let instance_type = required(&params.instance_type, "instance_type")?;
        let region = required(&params.region, "region")?;
        let app_version = required(&params.app_version, "app_version")?;
        let subnet_ids = required(&params.subnet_ids, "subnet_ids")?;

        let (subnet_id, dropped) = subnet_ids.split_first().ok_or_else(|| GeneratorError::InvalidParameter {
            key: "subnet_ids",
            reason: "at least one subnet id is required".into(),
        })?;
        if !dropped.is_empty() {
            tracing::debug!(subnet_id = %subnet_id, dropped = dropped.len(), "only the first subnet id is used");
        }

        Ok(Self {
            variables: Variables { app_version: app_version.clone(), region: region.clone() },
            builders: vec![Builder {
                kind: BUILDER_TYPE.into(),
                ami_name: ami_name.clone(),
                instance_type: instance_type.clone(),
                region: region.clone(),
                source_ami_filter: SourceAmiFilter::default(),
                ssh_username: SSH_USERNAME.into(),
                subnet_id: subnet_id.clone(),
            }],
            provisioners: vec![Provisioner::install(app_version)],
        })
    }

    /// JSON text with 4-space indentation and no trailing newline.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut buf = Vec::new();
        let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
        self.serialize(&mut ser)?;
        // serde_json only ever emits valid UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
