use std::{fs, process::Command};

use packer_template::{BuildParameters, GeneratorError, TemplateDocument, TemplateGenerator, REQUIRED_KEYS};
use serde_json::Value;
use tempfile::tempdir;

fn scenario() -> BuildParameters {
    BuildParameters {
        ami_name: Some("my-custom-ami".into()),
        instance_type: Some("t2.micro".into()),
        region: Some("us-west-2".into()),
        app_version: Some("1.0.0".into()),
        subnet_ids: Some(vec!["subnet-abc123".into(), "subnet-def456".into()]),
        security_group_ids: Some(vec!["sg-xyz789".into()]),
    }
}

#[test]
fn scenario_document_contents() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("packer_template.json");
    let doc = TemplateGenerator::new(&out).run(&scenario()).unwrap();

    let v: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(v["builders"][0]["subnet_id"], "subnet-abc123");
    assert_eq!(v["provisioners"][0]["inline"][1], "sudo apt-get install my-app=1.0.0 -y");
    assert_eq!(v["variables"]["region"], "us-west-2");
    assert_eq!(v["builders"][0]["source_ami_filter"]["most_recent"], true);
    assert_eq!(doc.builders[0].subnet_id, "subnet-abc123");
}

#[test]
fn persisted_file_round_trips() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("t.json");
    let doc = TemplateGenerator::new(&out).run(&scenario()).unwrap();

    let text = fs::read_to_string(&out).unwrap();
    let generic: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(generic, serde_json::to_value(&doc).unwrap());
    let typed: TemplateDocument = serde_json::from_str(&text).unwrap();
    assert_eq!(typed, doc);
}

#[test]
fn output_matches_shipped_schema() {
    let schema: Value = serde_json::from_str(include_str!("../schemas/packer_template.schema.json")).unwrap();
    let validator = jsonschema::validator_for(&schema).unwrap();
    let doc = TemplateDocument::build(&scenario()).unwrap();
    let v = serde_json::to_value(&doc).unwrap();
    assert!(validator.is_valid(&v));

    let mut broken = v.clone();
    broken["builders"][0]["type"] = Value::from("docker");
    assert!(!validator.is_valid(&broken));
}

#[test]
fn missing_region_creates_no_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("t.json");
    let mut p = scenario();
    p.region = None;
    let err = TemplateGenerator::new(&out).run(&p).unwrap_err();
    assert!(matches!(err, GeneratorError::MissingParameter { key: "region" }));
    assert_eq!(err.to_string(), "Missing required parameter: region");
    assert!(!out.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn every_required_key_is_enforced_from_a_file() {
    let dir = tempdir().unwrap();
    let full = serde_json::to_value(scenario()).unwrap();
    for key in REQUIRED_KEYS {
        let mut obj = full.clone();
        obj.as_object_mut().unwrap().remove(key);
        let file = dir.path().join(format!("{key}.json"));
        fs::write(&file, obj.to_string()).unwrap();
        let p = packer_template::load_parameters(&file).unwrap();
        match TemplateDocument::build(&p) {
            Err(GeneratorError::MissingParameter { key: k }) => assert_eq!(k, key),
            other => panic!("expected MissingParameter for {key}, got {other:?}"),
        }
    }
}

#[test]
fn binary_exit_status() {
    let dir = tempdir().unwrap();
    let bin = env!("CARGO_BIN_EXE_packer-template");

    let ok = Command::new(bin).current_dir(dir.path()).output().unwrap();
    assert!(ok.status.success());
    assert!(String::from_utf8_lossy(&ok.stdout).contains("Template successfully saved to packer_template.json"));
    assert!(dir.path().join("packer_template.json").exists());

    let params = dir.path().join("params.yaml");
    fs::write(&params, "ami_name: x\ninstance_type: t3.small\n").unwrap();
    let out = dir.path().join("second.json");
    let failed = Command::new(bin)
        .current_dir(dir.path())
        .arg("--params").arg(&params)
        .arg("--output").arg(&out)
        .output()
        .unwrap();
    assert!(!failed.status.success());
    assert!(String::from_utf8_lossy(&failed.stderr).contains("Missing required parameter: region"));
    assert!(!out.exists());
}
