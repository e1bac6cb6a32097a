//! Integration tests for the `scaflo` binary.
//!
//! Every invocation gets its own config and store file inside a temp dir so
//! nothing touches the real home directory, and `--no-color` keeps output
//! plain.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

struct Sandbox {
    temp: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("project")).unwrap();
        Self { temp }
    }

    fn project(&self) -> PathBuf {
        self.temp.path().join("project")
    }

    fn store(&self) -> PathBuf {
        self.temp.path().join("store.json")
    }

    fn config(&self) -> PathBuf {
        self.temp.path().join("config.toml")
    }

    fn write_doc(&self, name: &str, doc: serde_json::Value) {
        fs::write(self.project().join(name), doc.to_string()).unwrap();
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("scaflo");
        cmd.current_dir(self.temp.path())
            .env_remove("RUST_LOG")
            .env_remove("npm_config_user_agent")
            .arg("--no-color")
            .arg("--config")
            .arg(self.config());
        cmd
    }

    fn run(&self, doc: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.args(["run", doc, "--no-install", "--dir"])
            .arg(self.project())
            .arg("--store")
            .arg(self.store());
        cmd
    }
}

#[test]
fn help_lists_subcommands() {
    cargo_bin_cmd!("scaflo")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("config"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn version_flag() {
    cargo_bin_cmd!("scaflo")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn run_help_shows_flags() {
    cargo_bin_cmd!("scaflo")
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--extend-path"))
        .stdout(predicate::str::contains("--no-install"))
        .stdout(predicate::str::contains("--force"));
}

#[test]
fn run_writes_files_and_logs() {
    let sandbox = Sandbox::new();
    sandbox.write_doc(
        "doc.json",
        json!({ "jobs": [
            { "name": "hello/world.txt", "content": "hi" },
            { "type": "log", "message": "all set", "logLevel": "success" }
        ]}),
    );

    sandbox
        .run("doc.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("all set"))
        .stdout(predicate::str::contains("Files added successfully!"));

    assert_eq!(
        fs::read_to_string(sandbox.project().join("hello/world.txt")).unwrap(),
        "hi"
    );
    // nothing was answered, so no store
    assert!(!sandbox.store().exists());
}

#[test]
fn extend_path_prefixes_every_file() {
    let sandbox = Sandbox::new();
    sandbox.write_doc(
        "doc.json",
        json!({ "jobs": [{ "name": "index.ts", "content": "export {}" }] }),
    );

    sandbox
        .run("doc.json")
        .args(["--extend-path", "packages/web"])
        .assert()
        .success();

    assert!(sandbox.project().join("packages/web/index.ts").is_file());
}

#[test]
fn stored_answers_are_reused_without_prompting() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.store(), json!({ "author": "ada" }).to_string()).unwrap();
    sandbox.write_doc(
        "doc.json",
        json!({ "jobs": [
            { "type": "question", "id": "@author", "question": "Author?", "questionType": "ask" },
            { "name": "<@author>/README.md", "content": "by author" }
        ]}),
    );

    sandbox.run("doc.json").assert().success();

    assert!(sandbox.project().join("ada/README.md").is_file());
    let store: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(sandbox.store()).unwrap()).unwrap();
    assert_eq!(store["author"], "ada");
}

#[test]
fn force_overwrites_existing_files() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.project().join("README.md"), "old").unwrap();
    sandbox.write_doc(
        "doc.json",
        json!({ "jobs": [{ "name": "README.md", "content": "new" }] }),
    );

    sandbox.run("doc.json").arg("--force").assert().success();

    assert_eq!(
        fs::read_to_string(sandbox.project().join("README.md")).unwrap(),
        "new"
    );
}

#[test]
fn no_install_lists_collected_dependencies() {
    let sandbox = Sandbox::new();
    sandbox.write_doc(
        "doc.json",
        json!({
            "jobs": [{ "type": "log", "message": "deps only" }],
            "dependencies": ["zod", { "clsx": "2.1.0" }]
        }),
    );

    sandbox
        .run("doc.json")
        .assert()
        .success()
        .stdout(predicate::str::contains("zod"))
        .stdout(predicate::str::contains("clsx@2.1.0"))
        .stdout(predicate::str::contains("Skipping installation"));
}

#[test]
fn quiet_run_prints_nothing_on_stdout() {
    let sandbox = Sandbox::new();
    sandbox.write_doc(
        "doc.json",
        json!({ "jobs": [{ "type": "log", "message": "hidden" }] }),
    );

    sandbox
        .run("doc.json")
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn unknown_job_type_is_a_user_error() {
    let sandbox = Sandbox::new();
    sandbox.write_doc("doc.json", json!({ "jobs": [{ "type": "shell" }] }));

    sandbox
        .run("doc.json")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid job type 'shell'"))
        .stderr(predicate::str::contains("Suggestions:"));
}

#[test]
fn unknown_definition_is_not_found() {
    let sandbox = Sandbox::new();
    sandbox.write_doc(
        "doc.json",
        json!({ "jobs": [{ "type": "run", "target": "missing" }] }),
    );

    sandbox.run("doc.json").assert().code(3);
}

#[test]
fn missing_document_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .run("nope.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.json"));
}

#[test]
fn missing_working_dir_is_a_user_error() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["run", "doc.json", "--dir", "does-not-exist"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn config_set_get_and_path() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["config", "set", "package_manager", "pnpm"])
        .assert()
        .success();
    assert!(
        fs::read_to_string(sandbox.config())
            .unwrap()
            .contains("package_manager = \"pnpm\"")
    );

    sandbox
        .cmd()
        .args(["config", "get", "package_manager"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pnpm"));

    sandbox
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_rejects_unknown_keys_and_values() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["config", "get", "defaults.lang"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("store_path"));

    sandbox
        .cmd()
        .args(["config", "set", "package_manager", "maven"])
        .assert()
        .code(2);
}

#[test]
fn env_overrides_config_file() {
    let sandbox = Sandbox::new();
    fs::write(sandbox.config(), "package_manager = \"yarn\"\n").unwrap();

    sandbox
        .cmd()
        .env("SCAFLO_PACKAGE_MANAGER", "bun")
        .args(["config", "get", "package_manager"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bun"));
}

#[test]
fn init_creates_config_once() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration created"));
    assert!(sandbox.config().is_file());

    sandbox
        .cmd()
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn completions_for_bash() {
    cargo_bin_cmd!("scaflo")
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scaflo"));
}
