//! The `vmtpl` binary end to end

use anyhow::Result;
use predicates::prelude::*;

use crate::common::TestProject;
use vmtpl_cli::test_utils::fixtures::{baked_vm_yaml, template_yaml, templated_vm_yaml};

fn project_with_templates() -> Result<TestProject> {
    let project = TestProject::new()?;
    project.write("templates/fedora.yaml", &template_yaml("openshift", "fedora-small"))?;
    project.write(
        "templates/more.yaml",
        &format!("{}---\n{}", template_yaml("openshift", "rhel8"), template_yaml("custom", "win10")),
    )?;
    Ok(project)
}

#[test]
fn test_resolve_found() -> Result<()> {
    let project = project_with_templates()?;
    project.write("vm.yaml", &templated_vm_yaml("fedora-vm", "openshift", "fedora-small"))?;

    let output = project.run_vmtpl(&["resolve", "--templates", "templates", "--vm", "vm.yaml"])?;
    output.assert_success().assert_stdout_contains("fedora-vm: openshift/fedora-small");
    Ok(())
}

#[test]
fn test_resolve_baked_vm() -> Result<()> {
    let project = project_with_templates()?;
    project.write("vm.yaml", &baked_vm_yaml("baked"))?;

    let output = project.run_vmtpl(&["resolve", "--templates", "templates", "--vm", "vm.yaml"])?;
    output.assert_success().assert_stdout_contains("baked: no parent template");
    Ok(())
}

#[test]
fn test_resolve_missing_template_fails() -> Result<()> {
    let project = project_with_templates()?;
    project.write("vm.yaml", &templated_vm_yaml("orphan", "openshift", "deleted"))?;

    let output = project.run_vmtpl(&["resolve", "--templates", "templates", "--vm", "vm.yaml"])?;
    output
        .assert_failure()
        .assert_stdout_contains("orphan: unable to find template object openshift/deleted for VM orphan")
        .assert_stderr_contains("openshift/deleted");
    assert_eq!(output.code, Some(1));
    Ok(())
}

#[test]
fn test_resolve_without_store() -> Result<()> {
    let project = TestProject::new()?;
    project.write("vm.yaml", &templated_vm_yaml("fedora-vm", "openshift", "fedora-small"))?;

    let output = project.run_vmtpl(&["resolve", "--no-store", "--vm", "vm.yaml"])?;
    output.assert_success().assert_stdout_contains("fedora-vm: no parent template");
    Ok(())
}

#[test]
fn test_resolve_store_disabled_by_config() -> Result<()> {
    let project = TestProject::new()?;
    project.write("vm.yaml", &templated_vm_yaml("fedora-vm", "openshift", "fedora-small"))?;
    project.write("vmtpl.toml", "[store]\nenabled = false\n")?;

    let output =
        project.run_vmtpl(&["--config", "vmtpl.toml", "resolve", "--vm", "vm.yaml"])?;
    output.assert_success().assert_stdout_contains("fedora-vm: no parent template");
    Ok(())
}

#[test]
fn test_config_from_env_var() -> Result<()> {
    let project = project_with_templates()?;
    project.write("vm.yaml", &templated_vm_yaml("fedora-vm", "openshift", "fedora-small"))?;
    project.write("vmtpl.toml", "[store]\nenabled = false\n")?;

    let output = project.run_vmtpl_with_env(
        &["resolve", "--templates", "templates", "--vm", "vm.yaml"],
        &[("VMTPL_CONFIG", "vmtpl.toml")],
    )?;
    output.assert_success().assert_stdout_contains("fedora-vm: no parent template");
    Ok(())
}

#[test]
fn test_resolve_json_output() -> Result<()> {
    let project = project_with_templates()?;
    project.write(
        "vms.yaml",
        &format!(
            "{}---\n{}",
            templated_vm_yaml("win-vm", "custom", "win10"),
            baked_vm_yaml("baked")
        ),
    )?;

    let output = project.run_vmtpl(&[
        "resolve",
        "--templates",
        "templates",
        "--vm",
        "vms.yaml",
        "--format",
        "json",
    ])?;
    output.assert_success();

    let report: serde_json::Value = serde_json::from_str(&output.stdout)?;
    let entries = report.as_array().expect("array of resolutions");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["vm"], "win-vm");
    assert_eq!(entries[0]["key"], "custom/win10");
    assert_eq!(entries[0]["template"]["metadata"]["name"], "win10");
    assert_eq!(entries[1]["vm"], "baked");
    assert!(entries[1].get("template").is_none());
    Ok(())
}

#[test]
fn test_resolve_no_vms_found() -> Result<()> {
    let project = project_with_templates()?;

    let output = project.run_vmtpl(&["resolve", "--templates", "templates", "--vm", "templates"])?;
    output.assert_failure().assert_stderr_contains("No VirtualMachine objects found");
    Ok(())
}

#[test]
fn test_resolve_rejects_unknown_kind() -> Result<()> {
    let project = TestProject::new()?;
    project.write("cm.yaml", "apiVersion: v1\nkind: ConfigMap\nmetadata:\n  name: x\n")?;

    let output = project.run_vmtpl(&["resolve", "--vm", "cm.yaml"])?;
    output.assert_failure().assert_stderr_contains("unsupported kind 'ConfigMap'");
    Ok(())
}

#[test]
fn test_key_command() -> Result<()> {
    let project = TestProject::new()?;
    project.write(
        "vms/all.yaml",
        &format!(
            "{}---\n{}---\n{}",
            templated_vm_yaml("vm1", "ns1", "tpl1"),
            baked_vm_yaml("vm2"),
            templated_vm_yaml("vm3", "ns1", "")
        ),
    )?;

    let output = project.run_vmtpl(&["key", "--vm", "vms"])?;
    output
        .assert_success()
        .assert_stdout_contains("vm1\tns1/tpl1")
        .assert_stdout_contains("vm2\t-")
        .assert_stdout_contains("vm3\t-");
    Ok(())
}

#[test]
fn test_key_command_custom_annotations() -> Result<()> {
    let project = TestProject::new()?;
    project.write(
        "vmtpl.toml",
        "[annotations]\ntemplate-name = \"example.com/tpl\"\ntemplate-namespace = \"example.com/tpl-ns\"\n",
    )?;
    project.write(
        "vm.yaml",
        "kind: VirtualMachine\nmetadata:\n  name: vm1\n  annotations:\n    example.com/tpl: t\n    example.com/tpl-ns: n\n",
    )?;

    let output = project.run_vmtpl(&["--config", "vmtpl.toml", "key", "--vm", "vm.yaml"])?;
    output.assert_success().assert_stdout_contains("vm1\tn/t");
    Ok(())
}

#[test]
fn test_invalid_config_reported() -> Result<()> {
    let project = TestProject::new()?;
    project.write("vm.yaml", &baked_vm_yaml("vm1"))?;
    project.write("vmtpl.toml", "[annotations]\ntemplate-name = \"\"\n")?;

    let output = project.run_vmtpl(&["--config", "vmtpl.toml", "key", "--vm", "vm.yaml"])?;
    output.assert_failure().assert_stderr_contains("must not be empty");
    Ok(())
}

#[test]
fn test_help_lists_commands() {
    assert_cmd::Command::cargo_bin("vmtpl")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolve").and(predicate::str::contains("key")));
}

#[test]
fn test_verbose_conflicts_with_quiet() {
    assert_cmd::Command::cargo_bin("vmtpl")
        .unwrap()
        .args(["--verbose", "--quiet", "key", "--vm", "vm.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
