//! Common test utilities.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Environment variables that would leak the host's setup into a test.
const HOST_VARS: &[&str] = &[
    "LINGO_DEFAULT_LOCALE",
    "LINGO_LOCALES",
    "LINGO_SOURCE_DIR",
    "LINGO_SOURCE_URL",
    "LINGO_FETCH_TIMEOUT_MS",
    "LINGO_LOCALE",
    "LC_ALL",
    "LANG",
    "RUST_LOG",
];

/// A scratch working directory with locale files and an empty user config.
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    /// Fixture with `en` and `bn` locale files.
    pub fn new() -> Self {
        let fixture = Self { dir: TempDir::new().expect("Failed to create temp dir") };
        std::fs::create_dir_all(fixture.locales_dir()).expect("Failed to create locales dir");
        std::fs::create_dir_all(fixture.config_home()).expect("Failed to create config dir");

        fixture.write_locale(
            "en",
            r#"{ "home": "Home", "nav": { "about": "About", "contact": "Contact" } }"#,
        );
        fixture.write_locale("bn", r#"{ "home": "হোম", "nav": { "about": "আমাদের সম্পর্কে" } }"#);
        fixture
    }

    /// Root of the fixture; commands run here.
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Directory holding `{locale}.json` files.
    pub fn locales_dir(&self) -> PathBuf {
        self.root().join("locales")
    }

    /// Value for `XDG_CONFIG_HOME`.
    pub fn config_home(&self) -> PathBuf {
        self.root().join("config-home")
    }

    /// Write (or replace) a locale file.
    pub fn write_locale(&self, locale: &str, contents: &str) {
        std::fs::write(self.locales_dir().join(format!("{locale}.json")), contents)
            .expect("Failed to write locale file");
    }

    /// Write a file relative to the fixture root.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root().join(name);
        std::fs::write(&path, contents).expect("Failed to write file");
        path
    }

    /// `lingo` running in the fixture with a clean environment and the
    /// fixture's locales (`en` default, `bn`) configured through flags.
    pub fn lingo(&self) -> Command {
        let mut cmd = self.bare();
        cmd.args(["--locales", "en,bn", "--color", "never"]);
        cmd
    }

    /// `lingo` running in the fixture with a clean environment and no flags.
    pub fn bare(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lingo"));
        cmd.current_dir(self.root()).env("XDG_CONFIG_HOME", self.config_home());
        for var in HOST_VARS {
            cmd.env_remove(var);
        }
        cmd
    }
}
