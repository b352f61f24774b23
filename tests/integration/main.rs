//! Integration tests for ponto-sw

mod lifecycle;
mod routing;
mod support;

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use tempfile::TempDir;

    /// Command isolated to a temp config file and state directory
    fn ponto_sw(dir: &TempDir) -> Command {
        let mut cmd = cargo_bin_cmd!("ponto-sw");
        cmd.env_remove("PONTO_SW_CONFIG")
            .env_remove("PONTO_SW_STATE_DIR")
            .env("PONTO_SW_PLAIN", "1")
            .arg("--config")
            .arg(dir.path().join("config.toml"))
            .arg("--state-dir")
            .arg(dir.path().join("state"));
        cmd
    }

    #[test]
    fn help_displays() {
        let dir = TempDir::new().unwrap();
        ponto_sw(&dir)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Offline worker"));
    }

    #[test]
    fn version_displays() {
        let dir = TempDir::new().unwrap();
        ponto_sw(&dir)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("ponto-sw"));
    }

    #[test]
    fn config_show_defaults() {
        let dir = TempDir::new().unwrap();
        ponto_sw(&dir)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[worker]"))
            .stdout(predicate::str::contains("version = \"v1\""));
    }

    #[test]
    fn config_init_then_path() {
        let dir = TempDir::new().unwrap();
        ponto_sw(&dir)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Configuration initialized"));
        assert!(dir.path().join("config.toml").exists());

        ponto_sw(&dir)
            .args(["config", "init"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--force"));

        ponto_sw(&dir)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn invalid_config_reports_hint() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[worker]\nversion = 3\n").unwrap();
        ponto_sw(&dir)
            .arg("status")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid configuration"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn status_before_install() {
        let dir = TempDir::new().unwrap();
        ponto_sw(&dir)
            .args(["status", "-f", "json"])
            .assert()
            .success()
            .stdout(predicate::str::contains("\"active\": null"));
    }

    #[test]
    fn activate_without_install_fails() {
        let dir = TempDir::new().unwrap();
        ponto_sw(&dir)
            .arg("activate")
            .assert()
            .failure()
            .stderr(predicate::str::contains("No waiting worker"))
            .stderr(predicate::str::contains("ponto-sw install"));
    }

    #[test]
    fn offline_install_activates_empty_store() {
        let dir = TempDir::new().unwrap();
        ponto_sw(&dir)
            .args(["install", "--offline"])
            .assert()
            .success()
            .stdout(predicate::str::contains("v1 is active"));

        ponto_sw(&dir)
            .args(["status", "-f", "plain"])
            .assert()
            .success()
            .stdout("v1\n");

        ponto_sw(&dir)
            .args(["cache", "list", "-f", "plain"])
            .assert()
            .success()
            .stdout("v1\n");

        ponto_sw(&dir)
            .args(["install", "--offline"])
            .assert()
            .success()
            .stdout(predicate::str::contains("already active"));
    }

    #[test]
    fn offline_api_fetch_prints_fallback() {
        let dir = TempDir::new().unwrap();
        ponto_sw(&dir)
            .args(["fetch", "/auth/logout", "--offline", "-f", "plain"])
            .assert()
            .success()
            .stdout(r#"{"error":"Offline - Conecte-se à internet"}"#);
    }

    #[test]
    fn offline_asset_miss_fails() {
        let dir = TempDir::new().unwrap();
        ponto_sw(&dir)
            .args(["fetch", "/static/js/app.js", "--offline"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Network request"))
            .stderr(predicate::str::contains("Hint:"));
    }

    #[test]
    fn unknown_message_is_ignored() {
        let dir = TempDir::new().unwrap();
        ponto_sw(&dir)
            .args(["message", "reload"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Message ignored"));
    }

    #[test]
    fn cache_commands_on_empty_state() {
        let dir = TempDir::new().unwrap();
        ponto_sw(&dir)
            .args(["cache", "list"])
            .assert()
            .success()
            .stdout(predicate::str::contains("No cache stores"));

        ponto_sw(&dir)
            .args(["cache", "keys", "v9"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Cache store not found"));
    }

    #[test]
    fn cache_clear_removes_stores() {
        let dir = TempDir::new().unwrap();
        ponto_sw(&dir)
            .args(["install", "--offline"])
            .assert()
            .success();

        ponto_sw(&dir)
            .args(["cache", "clear", "-y"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Cleared 1 store(s)"));

        ponto_sw(&dir)
            .args(["cache", "list", "-f", "json"])
            .assert()
            .success()
            .stdout("[]\n");
    }

    #[test]
    fn completions_generate() {
        let dir = TempDir::new().unwrap();
        ponto_sw(&dir)
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("ponto-sw"));
    }
}
