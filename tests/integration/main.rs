//! Integration tests for the `lingo` CLI.

#![allow(clippy::unwrap_used)] // Tests can use unwrap for cleaner assertions

mod common;

use assert_cmd::Command;
use common::Fixture;
use predicates::prelude::*;

/// Helper to create a command for the lingo binary.
fn lingo_cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("lingo"))
}

#[test]
fn test_help() {
    lingo_cmd().arg("--help").assert().success().stdout(predicate::str::contains("locale"));
}

#[test]
fn test_version() {
    lingo_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_unknown_command() {
    lingo_cmd().arg("unknown-command").assert().failure().code(2);
}

#[test]
fn test_completion() {
    lingo_cmd()
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("lingo"));
}

mod routing {
    use super::*;

    #[test]
    fn test_root_redirects_to_default() {
        Fixture::new()
            .lingo()
            .args(["route", "/"])
            .assert()
            .success()
            .stdout(predicate::str::contains("redirect / -> /en (en)"));
    }

    #[test]
    fn test_negotiated_redirect() {
        Fixture::new()
            .lingo()
            .args(["route", "/products", "-l", "bn-BD,en;q=0.5"])
            .assert()
            .success()
            .stdout(predicate::str::contains("-> /bn/products (bn)"));
    }

    #[test]
    fn test_path_without_leading_slash() {
        let fixture = Fixture::new();
        fixture
            .lingo()
            .args(["route", "products", "-l", "bn"])
            .assert()
            .success()
            .stdout(predicate::str::contains("redirect /products -> /bn/products (bn)"));
        fixture
            .lingo()
            .args(["route", "products/1", "-l", "bn"])
            .assert()
            .success()
            .stdout(predicate::str::contains("-> /bn/products/1 (bn)"));
    }

    #[test]
    fn test_redirect_keeps_query_string() {
        let output = Fixture::new()
            .lingo()
            .args(["-o", "json", "route", "/products?page=2"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json["action"], "redirect");
        assert_eq!(json["target"], "/en/products");
        assert_eq!(json["location"], "/en/products?page=2");
    }

    #[test]
    fn test_localized_and_bypassed_paths() {
        let fixture = Fixture::new();
        fixture
            .lingo()
            .args(["route", "/bn/about"])
            .assert()
            .success()
            .stdout(predicate::str::contains("localized /bn/about (bn)"));
        fixture
            .lingo()
            .args(["route", "/favicon.ico"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("bypass"));
        fixture
            .lingo()
            .args(["route", "/images/banner.webp"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("bypass"));
    }

    #[test]
    fn test_unsupported_segment_is_not_a_locale() {
        Fixture::new()
            .lingo()
            .args(["route", "/xx/x"])
            .assert()
            .success()
            .stdout(predicate::str::contains("-> /en/xx/x"));
    }

    #[test]
    fn test_negotiate() {
        let fixture = Fixture::new();
        fixture
            .lingo()
            .args(["negotiate", "fr, bn;q=0.8"])
            .assert()
            .success()
            .stdout("bn\n");
        fixture.lingo().args(["negotiate", ";;q=x,,"]).assert().success().stdout("en\n");
        fixture.lingo().arg("negotiate").assert().success().stdout("en\n");
    }

    #[test]
    fn test_negotiate_uses_environment_locale() {
        Fixture::new()
            .lingo()
            .env("LANG", "bn_BD.UTF-8")
            .arg("negotiate")
            .assert()
            .success()
            .stdout("bn\n");
    }

    #[test]
    fn test_switch() {
        let fixture = Fixture::new();
        fixture
            .lingo()
            .args(["switch", "/bn/products?page=2", "en"])
            .assert()
            .success()
            .stdout("/en/products?page=2\n");
        fixture.lingo().args(["switch", "/about", "bn"]).assert().success().stdout("/bn/about\n");
        fixture
            .lingo()
            .args(["switch", "/about", "fr"])
            .assert()
            .failure()
            .code(5)
            .stderr(predicate::str::contains("not supported"));
    }

    #[test]
    fn test_detect() {
        let fixture = Fixture::new();
        fixture
            .lingo()
            .args(["-q", "detect", "--country", "BD"])
            .assert()
            .success()
            .stdout("bn\n");
        fixture
            .lingo()
            .args(["-q", "detect", "--browser-lang", "ja-JP", "--country", "JP"])
            .assert()
            .success()
            .stdout("en\n");
    }
}

mod translations {
    use super::*;

    #[test]
    fn test_get_follows_route_locale() {
        Fixture::new()
            .lingo()
            .args(["get", "home", "--path", "/bn/products"])
            .assert()
            .success()
            .stdout("হোম\n");
    }

    #[test]
    fn test_get_nested_and_missing_keys() {
        let fixture = Fixture::new();
        fixture.lingo().args(["get", "nav.about"]).assert().success().stdout("About\n");
        fixture
            .lingo()
            .args(["get", "nav.missing", "--fallback", "Hi"])
            .assert()
            .success()
            .stdout("Hi\n");
        fixture
            .lingo()
            .args(["get", "footer.copyright"])
            .assert()
            .success()
            .stdout("copyright\n");
    }

    #[test]
    fn test_get_multiple_keys_as_json() {
        let output = Fixture::new()
            .lingo()
            .args(["-o", "json", "get", "home", "nav.contact", "--locale", "bn"])
            .output()
            .unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(json[0]["value"], "হোম");
        assert_eq!(json[0]["locale"], "bn");
        // Missing in bn: last key segment, not the English text.
        assert_eq!(json[1]["value"], "contact");
    }

    #[test]
    fn test_get_no_wait_answers_immediately() {
        Fixture::new()
            .lingo()
            .args(["get", "home", "--no-wait", "--fallback", "Welcome", "--locale", "bn"])
            .assert()
            .success()
            .stdout("Welcome\n");
    }

    #[test]
    fn test_get_no_wait_reads_seeded_mirror() {
        let fixture = Fixture::new();
        let seed = fixture.write("rendered.json", r#"{ "home": "বাড়ি" }"#);
        fixture
            .lingo()
            .args(["get", "home", "--no-wait", "--locale", "bn", "--seed"])
            .arg(&seed)
            .assert()
            .success()
            .stdout("বাড়ি\n");
    }

    #[test]
    fn test_dump_locale() {
        Fixture::new()
            .lingo()
            .args(["dump", "bn"])
            .assert()
            .success()
            .stdout(predicate::str::contains("nav.about"))
            .stdout(predicate::str::contains("হোম"));
    }

    #[test]
    fn test_dump_unknown_locale_falls_back() {
        Fixture::new()
            .lingo()
            .args(["dump", "xx"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Home"))
            .stderr(predicate::str::contains("showing 'en' instead"));
    }

    #[test]
    fn test_malformed_locale_falls_back() {
        let fixture = Fixture::new();
        fixture.write_locale("bn", "{ not json");
        fixture
            .lingo()
            .args(["get", "home", "--locale", "bn"])
            .assert()
            .success()
            .stdout("Home\n");
    }

    #[test]
    fn test_warm_reports_cache() {
        let fixture = Fixture::new();
        let output = fixture.lingo().args(["-o", "json", "warm"]).output().unwrap();
        assert!(output.status.success());

        let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r["cached"] == true));
    }

    #[test]
    fn test_warm_reports_missing_locale() {
        let fixture = Fixture::new();
        fixture
            .bare()
            .args(["--locales", "en,bn,ar", "warm"])
            .assert()
            .success()
            .stderr(predicate::str::contains("1 locale(s) could not be loaded"));
    }

    #[test]
    fn test_locales_list() {
        Fixture::new()
            .lingo()
            .arg("locales")
            .assert()
            .success()
            .stdout(predicate::str::contains("en*"))
            .stdout(predicate::str::contains("bn.json"));
    }
}

mod config {
    use super::*;

    #[test]
    fn test_project_config() {
        let fixture = Fixture::new();
        fixture.write(".lingo.yaml", "default_locale: bn\nlocales: [en, bn]\n");
        fixture.bare().args(["route", "/"]).assert().success().stdout(predicate::str::contains("/bn"));
        fixture
            .bare()
            .args(["config", "show", "default_locale"])
            .assert()
            .success()
            .stdout("bn\n");
    }

    #[test]
    fn test_flags_override_project_config() {
        let fixture = Fixture::new();
        fixture.write(".lingo.yaml", "default_locale: bn\nlocales: [en, bn]\n");
        fixture
            .bare()
            .args(["--default-locale", "en", "config", "show", "default_locale"])
            .assert()
            .success()
            .stdout("en\n");
    }

    #[test]
    fn test_environment_config() {
        Fixture::new()
            .bare()
            .env("LINGO_LOCALES", "en,bn")
            .env("LINGO_DEFAULT_LOCALE", "bn")
            .args(["config", "show", "locales"])
            .assert()
            .success()
            .stdout("en,bn\n");
    }

    #[test]
    fn test_invalid_default_locale() {
        Fixture::new()
            .bare()
            .args(["--locales", "en,bn", "--default-locale", "fr", "locales"])
            .assert()
            .failure()
            .code(2)
            .stderr(predicate::str::contains("not in the supported set"));
    }

    #[test]
    fn test_config_path() {
        let fixture = Fixture::new();
        fixture
            .bare()
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("lingo"))
            .stdout(predicate::str::ends_with("config.yaml\n"));
    }

    #[test]
    fn test_user_config_file() {
        let fixture = Fixture::new();
        let dir = fixture.config_home().join("lingo");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("config.yaml"), "fetch_timeout_ms: 1234\n").unwrap();

        fixture
            .bare()
            .args(["config", "show", "fetch_timeout_ms"])
            .assert()
            .success()
            .stdout("1234\n");
    }

    #[test]
    fn test_unknown_config_key() {
        Fixture::new().bare().args(["config", "show", "nope"]).assert().failure().code(2);
    }
}
