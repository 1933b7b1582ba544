use anyhow::{Context, Result};
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use crate::{CliTest, run, stderr, stdout};

fn read_json(test: &CliTest, path: &str) -> Result<Value> {
    let content = test.read_file(path)?;
    serde_json::from_str(&content).with_context(|| format!("{} should be valid JSON", path))
}

fn setup_extension(test: &CliTest) -> Result<()> {
    test.write_file("plugins/myext/package.json", r#"{"name": "myext"}"#)?;
    test.write_file("plugins/myext/package.nls.json", r#"{"title": "Hello"}"#)
}

#[test]
fn test_deploy_translates_package_metadata() -> Result<()> {
    let test = CliTest::new()?;
    setup_extension(&test)?;
    test.write_file("i18n/de.json", r#"{"myext/package/title": "Hallo"}"#)?;

    let output = run({
        let mut cmd = test.deploy_command();
        cmd.args(["--languages-dir", "i18n"]);
        cmd
    })?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("myext: 1 file generated"));
    assert_snapshot!(test.read_file("plugins/myext/package.nls.de.json")?.trim_end(), @r#"
    {
      "title": "Hallo"
    }
    "#);
    Ok(())
}

#[test]
fn test_deploy_falls_back_to_default_message() -> Result<()> {
    let test = CliTest::new()?;
    setup_extension(&test)?;
    test.write_file("i18n/de.json", r#"{"otherext/package/title": "Hallo"}"#)?;

    let output = run({
        let mut cmd = test.deploy_command();
        cmd.args(["--languages-dir", "i18n"]);
        cmd
    })?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        read_json(&test, "plugins/myext/package.nls.de.json")?,
        json!({"title": "Hello"})
    );
    Ok(())
}

#[test]
fn test_deploy_uses_language_pack_from_other_extension() -> Result<()> {
    let test = CliTest::new()?;
    setup_extension(&test)?;
    test.write_file(
        "plugins/myext/nls.metadata.json",
        r#"{"src/a.ts": {"keys": ["k1"], "messages": ["Msg"]}}"#,
    )?;
    test.write_file(
        "plugins/pack-fr/package.json",
        r#"{
            "name": "pack-fr",
            "publisher": "acme",
            "contributes": {
                "localizations": [{
                    "languageId": "fr",
                    "languageName": "French",
                    "localizedLanguageName": "français",
                    "translations": [{"id": "myext", "path": "./translations/myext.i18n.json"}]
                }]
            }
        }"#,
    )?;
    test.write_file(
        "plugins/pack-fr/translations/myext.i18n.json",
        r#"{"contents": {"package": {"title": "Bonjour"}, "src/a.ts": {"k1": "Msg-fr"}}}"#,
    )?;

    let output = run(test.deploy_command())?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("myext: 2 files generated"));
    assert!(out.contains("acme.pack-fr: nothing to localize"));
    assert!(out.contains("(languages: fr)"));

    assert_eq!(
        read_json(&test, "plugins/myext/package.nls.fr.json")?,
        json!({"title": "Bonjour"})
    );
    assert_eq!(
        read_json(&test, "plugins/myext/nls.bundle.fr.json")?,
        json!({"src/a.ts": ["Msg-fr"]})
    );
    Ok(())
}

#[test]
fn test_deploy_translates_entry_files() -> Result<()> {
    let test = CliTest::new()?;
    setup_extension(&test)?;
    test.write_file(
        "plugins/myext/out/extension.nls.metadata.json",
        r#"{"filePath": "out/extension", "keys": ["greet", "bye"], "messages": ["Hi", "Bye"]}"#,
    )?;
    test.write_file("i18n/ja.json", r#"{"myext/out_extension/greet": "やあ"}"#)?;

    let output = run({
        let mut cmd = test.deploy_command();
        cmd.args(["--languages-dir", "i18n"]);
        cmd
    })?;

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        read_json(&test, "plugins/myext/out/extension.nls.ja.json")?,
        json!(["やあ", "Bye"])
    );
    Ok(())
}

#[test]
fn test_deploy_never_overwrites() -> Result<()> {
    let test = CliTest::new()?;
    setup_extension(&test)?;
    test.write_file("i18n/de.json", r#"{"myext/package/title": "Hallo"}"#)?;

    let first = run({
        let mut cmd = test.deploy_command();
        cmd.args(["--languages-dir", "i18n"]);
        cmd
    })?;
    assert_eq!(first.status.code(), Some(0));
    let generated = test.read_file("plugins/myext/package.nls.de.json")?;

    test.write_file("i18n/de.json", r#"{"myext/package/title": "Servus"}"#)?;
    let second = run({
        let mut cmd = test.deploy_command();
        cmd.args(["--languages-dir", "i18n"]);
        cmd
    })?;

    assert_eq!(second.status.code(), Some(0));
    assert!(stdout(&second).contains("myext: 0 files generated"));
    assert_eq!(test.read_file("plugins/myext/package.nls.de.json")?, generated);
    Ok(())
}

#[test]
fn test_deploy_failure_does_not_block_other_extensions() -> Result<()> {
    let test = CliTest::new()?;
    setup_extension(&test)?;
    test.write_file("plugins/broken/package.json", r#"{"name": "broken"}"#)?;
    test.write_file("plugins/broken/package.nls.json", "{ not json")?;
    test.write_file("plugins/nameless/package.json", r#"{"version": "1.0.0"}"#)?;
    test.write_file("i18n/de.json", "{}")?;

    let output = run({
        let mut cmd = test.deploy_command();
        cmd.args(["--languages-dir", "i18n"]);
        cmd
    })?;

    assert_eq!(output.status.code(), Some(1));
    let out = stdout(&output);
    assert!(out.contains("broken: Failed to parse JSON"));
    assert!(out.contains("nameless: Manifest has no 'name'"));
    assert!(out.contains("myext: 1 file generated"));
    assert!(out.contains("2 failed"));
    assert!(stderr(&output).contains("failed to localize extension"));
    assert!(test.exists("plugins/myext/package.nls.de.json"));
    Ok(())
}

#[test]
fn test_deploy_reads_config_file() -> Result<()> {
    let test = CliTest::new()?;
    test.write_file(
        ".nlsdeployrc.json",
        r#"{"pluginsDir": "./deployed", "languagesDir": "./i18n", "ignores": ["**/node_modules/**"]}"#,
    )?;
    test.write_file("deployed/myext/package.json", r#"{"name": "myext"}"#)?;
    test.write_file("deployed/myext/package.nls.json", r#"{"title": "Hello"}"#)?;
    test.write_file(
        "deployed/myext/node_modules/dep/nls.metadata.json",
        r#"{"x": {"keys": ["k"], "messages": ["M"]}}"#,
    )?;
    test.write_file("i18n/fr.json", "{}")?;

    let output = run(test.deploy_command())?;

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    assert!(test.exists("deployed/myext/package.nls.fr.json"));
    assert!(!test.exists("deployed/myext/node_modules/dep/nls.bundle.fr.json"));
    Ok(())
}

#[test]
fn test_deploy_warns_about_bad_translation_file() -> Result<()> {
    let test = CliTest::new()?;
    setup_extension(&test)?;
    test.write_file("i18n/de.json", "{}")?;
    test.write_file("i18n/fr.json", "[broken")?;

    let output = run({
        let mut cmd = test.deploy_command();
        cmd.args(["--languages-dir", "i18n"]);
        cmd
    })?;

    assert_eq!(output.status.code(), Some(0));
    assert!(stderr(&output).contains("skipped translation file"));
    assert!(test.exists("plugins/myext/package.nls.de.json"));
    assert!(!test.exists("plugins/myext/package.nls.fr.json"));
    Ok(())
}

#[test]
fn test_deploy_missing_plugins_dir() -> Result<()> {
    let test = CliTest::new()?;

    let output = run(test.deploy_command())?;

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("does not exist"));
    Ok(())
}

#[test]
fn test_deploy_without_languages_generates_nothing() -> Result<()> {
    let test = CliTest::new()?;
    setup_extension(&test)?;

    let output = run(test.deploy_command())?;

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("myext: nothing to localize"));
    assert!(out.contains("(languages: none)"));
    Ok(())
}
