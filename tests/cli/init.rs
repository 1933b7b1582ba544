use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, run, stderr, stdout};

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    assert_eq!(parsed["pluginsDir"], "./plugins");
    assert!(
        parsed.get("ignores").is_some(),
        "Config should have 'ignores' field"
    );
    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("Created .nlsdeployrc.json"));
    assert!(test.root().join(".nlsdeployrc.json").exists());

    let content = test.read_file(".nlsdeployrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(".nlsdeployrc.json", "{}")?;

    let output = run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("already exists"));
    assert_eq!(test.read_file(".nlsdeployrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_used_by_deploy() -> Result<()> {
    let test = CliTest::new()?;
    run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;
    test.write_file("plugins/myext/package.json", r#"{"name": "myext"}"#)?;

    let output = run(test.deploy_command())?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("myext: nothing to localize"));

    Ok(())
}
