#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const KEY_A: &str =
    "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIGk5/3VPXijMapdUQf+yB7dMAik1nJLSwvVB8AW0Th5i";
pub const KEY_B: &str =
    "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIG/M8H5Vyph9kKp4aod2g0q5Jdlf2rRlZ26BHKn3Hg91";
pub const KEY_C: &str =
    "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIPn3eo1DlefF1hN3i+6hAjLRyFMVDzDNGakDsKaJhrgu";
pub const KEY_D: &str =
    "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAICc8VcRXqCKG0sxohVbWG/oWGHplGS41IuNK+1mElVps";

/// An isolated tree: `home/<user>/.ssh/authorized_keys` targets, key lists
/// under `etc/` (empty to start), and a config file pointing at both with no uid floor.
pub struct TestEnv {
    _tmp: TempDir,
    pub root: PathBuf,
    pub config: PathBuf,
    pub permitted: PathBuf,
    pub forbidden: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().to_path_buf();
        let etc = root.join("etc");
        fs::create_dir_all(&etc).expect("create etc");
        fs::create_dir_all(root.join("home")).expect("create home");

        let permitted = etc.join("permitted_keys");
        let forbidden = etc.join("forbidden_keys");
        let config = etc.join("config.toml");
        fs::write(&permitted, "").expect("write permitted list");
        fs::write(&forbidden, "").expect("write forbidden list");
        fs::write(
            &config,
            format!(
                "target_globs = [{:?}]\npermitted_key_files = [{:?}]\nforbidden_key_files = [{:?}]\nlower_uid_bound = 0\n",
                root.join("home/*/.ssh/authorized_keys").display().to_string(),
                permitted.display().to_string(),
                forbidden.display().to_string(),
            ),
        )
        .expect("write config");

        Self {
            _tmp: tmp,
            root,
            config,
            permitted,
            forbidden,
        }
    }

    pub fn write_keys(&self, user: &str, body: &str) -> PathBuf {
        let ssh = self.root.join("home").join(user).join(".ssh");
        fs::create_dir_all(&ssh).expect("create .ssh");
        let path = ssh.join("authorized_keys");
        fs::write(&path, body).expect("write authorized_keys");
        path
    }

    pub fn write_list(&self, path: &Path, body: &str) {
        fs::write(path, body).expect("write key list");
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("keyscan");
        cmd.env_remove("RUST_LOG")
            .arg("--config")
            .arg(&self.config);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .arg("--json")
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }

    /// Name the system reports as owner of files this test creates.
    pub fn current_owner(&self) -> String {
        let sample = self.root.join("etc/owner-sample");
        fs::write(&sample, format!("{KEY_D}\n")).expect("write sample");
        let listing = self.run_json(&["keys", sample.to_str().expect("utf8 path")]);
        listing["data"]["keys"][0]["owner"]
            .as_str()
            .expect("owner string")
            .to_string()
    }
}
