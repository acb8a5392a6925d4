#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::Duration;

use serde::Serialize;
use tempfile::tempdir;
use wait_timeout::ChildExt;

pub const ZONE: &str = "tempZone";
pub const HOME: &str = "/tempZone/home/rods";

#[derive(Serialize)]
pub struct ClientConfig {
    pub home: String,
    pub cwd: String,
    pub zones: BTreeMap<String, ZoneSection>,
}

#[derive(Serialize)]
pub struct ZoneSection {
    pub path: PathBuf,
    pub comment: Option<String>,
}

pub struct TestContext {
    pub _work: tempfile::TempDir,
    pub workspace: PathBuf,
    pub cli_bin: PathBuf,
    pub config_dir: PathBuf,
    /// Directory backing the `tempZone` zone.
    pub zone_dir: PathBuf,
    /// Process working directory for spawned commands.
    pub local_dir: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let work = tempdir().expect("tempdir");
        let workspace = work.path().to_path_buf();

        let zone_dir = workspace.join("grid");
        fs::create_dir_all(zone_dir.join("home/rods")).expect("zone home");
        let local_dir = workspace.join("local");
        fs::create_dir_all(&local_dir).expect("local dir");
        let config_dir = workspace.join("cli-config");
        fs::create_dir_all(&config_dir).expect("cli config");

        let mut zones = BTreeMap::new();
        zones.insert(
            ZONE.to_string(),
            ZoneSection {
                path: zone_dir.clone(),
                comment: Some("test zone".into()),
            },
        );
        let config = ClientConfig {
            home: HOME.into(),
            cwd: HOME.into(),
            zones,
        };
        let toml = toml::to_string(&config).expect("serialize config");
        fs::write(config_dir.join("gridpath.toml"), toml).expect("write config");

        Self {
            _work: work,
            workspace,
            cli_bin: PathBuf::from(env!("CARGO_BIN_EXE_gridpath")),
            config_dir,
            zone_dir,
            local_dir,
        }
    }

    /// Remote path inside the zone mapped onto its backing directory.
    pub fn zone_path(&self, remote: &str) -> PathBuf {
        let relative = remote
            .strip_prefix(&format!("/{ZONE}/"))
            .expect("path inside the test zone");
        self.zone_dir.join(relative)
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.cli_bin);
        cmd.current_dir(&self.local_dir)
            .env_remove("RUST_LOG")
            .arg("--config-dir")
            .arg(&self.config_dir);
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut cmd = self.command();
        cmd.args(args);
        run_with_timeout(cmd, Duration::from_secs(10))
    }
}

pub fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Output {
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let mut child = cmd.spawn().expect("spawn command");

    match child.wait_timeout(timeout).expect("wait for process") {
        Some(_status) => child
            .wait_with_output()
            .expect("collect command output after completion"),
        None => {
            let _ = child.kill();
            let output = child
                .wait_with_output()
                .expect("collect output after killing command");
            panic!(
                "command timed out after {:?}\nstdout:\n{}\nstderr:\n{}",
                timeout,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
    }
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
