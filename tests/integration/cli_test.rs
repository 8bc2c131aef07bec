#[path = "../fixtures/mod.rs"]
mod fixtures;

use assert_cmd::Command;
use assert_fs::prelude::*;
use fixtures::LEGACY_CONFIG;
use predicates::prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    /// Command with a scratch home and no inherited directory variables
    fn instill_config(home: &assert_fs::TempDir) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_instill-config"));
        cmd.env("HOME", home.path())
            .env_remove("INSTILL_CONFIG_DIR")
            .env_remove("XDG_CONFIG_HOME")
            .env_remove("XDG_STATE_HOME")
            .env_remove("XDG_DATA_HOME")
            .env_remove("RUST_LOG");
        cmd
    }

    #[test]
    fn test_cli_help() {
        let home = assert_fs::TempDir::new().unwrap();
        instill_config(&home)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("instill-config locates the Instill CLI"));
    }

    #[cfg(unix)]
    #[test]
    fn test_paths_json_uses_xdg_variables() {
        let home = assert_fs::TempDir::new().unwrap();
        let xdg = home.child("xdg");

        instill_config(&home)
            .env("XDG_DATA_HOME", xdg.child("data").path())
            .args(["paths", "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"data_dir\""))
            .stdout(predicate::str::contains(
                xdg.child("data").child("instill").path().to_string_lossy().into_owned(),
            ));
    }

    #[test]
    fn test_config_dir_flag_used_as_is() {
        let home = assert_fs::TempDir::new().unwrap();
        let custom = home.child("custom-config");

        instill_config(&home)
            .arg("--config-dir")
            .arg(custom.path())
            .arg("paths")
            .assert()
            .success()
            .stdout(predicate::str::contains(format!("config: {}", custom.path().display())));
    }

    #[cfg(unix)]
    #[test]
    fn test_set_then_get_round_trip() {
        let home = assert_fs::TempDir::new().unwrap();
        let config_dir = home.child("cfg");

        instill_config(&home)
            .env("INSTILL_CONFIG_DIR", config_dir.path())
            .args(["set", "user", "monalisa", "--host", "instill.tech"])
            .assert()
            .success();

        config_dir.child("hosts.yml").assert("instill.tech:\n  user: monalisa\n");
        config_dir.child("config.yml").assert(predicate::str::contains("instill.tech").not());

        instill_config(&home)
            .env("INSTILL_CONFIG_DIR", config_dir.path())
            .args(["get", "user", "--host", "instill.tech"])
            .assert()
            .success()
            .stdout("monalisa\n");
    }

    #[test]
    fn test_get_missing_key_fails() {
        let home = assert_fs::TempDir::new().unwrap();
        instill_config(&home)
            .arg("--config-dir")
            .arg(home.child("cfg").path())
            .args(["get", "editor"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("editor is not set"));
    }

    #[cfg(unix)]
    #[test]
    fn test_migrate_upgrades_legacy_config() {
        let home = assert_fs::TempDir::new().unwrap();
        let legacy = home.child(".config").child("instill");
        legacy.child("config.yml").write_str(LEGACY_CONFIG).unwrap();
        let xdg = home.child("xdg");

        instill_config(&home)
            .env("XDG_CONFIG_HOME", xdg.path())
            .arg("migrate")
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration ready"));

        legacy.assert(predicate::path::missing());
        let moved = xdg.child("instill");
        moved.child("config.yml.bak").assert(LEGACY_CONFIG);
        moved.child("config.yml").assert(predicate::str::starts_with("hosts:"));

        instill_config(&home)
            .env("XDG_CONFIG_HOME", xdg.path())
            .arg("hosts")
            .assert()
            .success()
            .stdout("instill.tech\n");
    }
}
