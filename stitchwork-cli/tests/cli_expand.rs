use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn expand_with_vars() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("t.txt"), "{{name}} has {{n * 2}} items\n")?;

    #[allow(deprecated)]
    Command::cargo_bin("stitchwork")?
        .current_dir(dir.path())
        .args(["expand", "t.txt", "--var", "name=box", "--var", "n=21"])
        .assert()
        .success()
        .stdout("box has 42 items\n");

    Ok(())
}

#[test]
fn expand_with_custom_delimiters() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("t.txt"), "(*)1+1(**) and {{untouched}}")?;

    #[allow(deprecated)]
    Command::cargo_bin("stitchwork")?
        .current_dir(dir.path())
        .args(["expand", "t.txt", "--delim", "(*)", "(**)"])
        .assert()
        .success()
        .stdout("2 and {{untouched}}");

    Ok(())
}

#[test]
fn expand_uses_config_variables() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(
        dir.path().join("stitchwork.yml"),
        "delimiters: ['<%', '%>']\nvariables:\n  project: demo\n",
    )?;
    fs::write(dir.path().join("t.txt"), "project=<% project %>")?;

    #[allow(deprecated)]
    Command::cargo_bin("stitchwork")?
        .current_dir(dir.path())
        .args(["expand", "t.txt"])
        .assert()
        .success()
        .stdout("project=demo");

    Ok(())
}

#[test]
fn expand_reports_failing_expression() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("t.txt"), "ok {{ missing_var }}")?;

    #[allow(deprecated)]
    Command::cargo_bin("stitchwork")?
        .current_dir(dir.path())
        .args(["expand", "t.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing_var"));

    Ok(())
}

#[test]
fn expand_rejects_malformed_var() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    fs::write(dir.path().join("t.txt"), "x")?;

    #[allow(deprecated)]
    Command::cargo_bin("stitchwork")?
        .current_dir(dir.path())
        .args(["expand", "t.txt", "--var", "oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME=VALUE"));

    Ok(())
}
