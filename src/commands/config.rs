//! Configuration commands.

use crate::client::Context;
use crate::config::{Config, PROJECT_CONFIG_FILE};
use crate::error::{Error, Result};

/// Show the effective configuration, or one key of it.
pub async fn config_show(ctx: &Context, key: Option<&str>) -> Result<()> {
    let config = &ctx.config;
    let Some(k) = key else {
        let yaml = serde_yaml::to_string(config)?;
        print!("{yaml}");
        return Ok(());
    };

    match k {
        "default_locale" => println!("{}", config.default_locale),
        "locales" => println!("{}", config.locales.join(",")),
        "source" => println!("{}", config.source),
        "fetch_timeout_ms" => println!("{}", config.fetch_timeout_ms),
        "routing.paths" => println!("{}", config.routing.paths.join("\n")),
        "routing.extensions" => println!("{}", config.routing.extensions.join(",")),
        "routing.prefixes" => println!("{}", config.routing.prefixes.join("\n")),
        "output.format" => println!("{}", config.output.format),
        "output.color" => println!("{}", config.output.color),
        _ => {
            if let Some(locale) = k.strip_prefix("overrides.") {
                println!("{}", config.source_for(locale));
            } else {
                return Err(Error::invalid_arg(format!("Unknown key: {k}")));
            }
        }
    }
    Ok(())
}

/// Show configuration file path.
pub async fn config_path(_ctx: &Context, dir: bool) -> Result<()> {
    let path = if dir { Config::config_dir() } else { Config::user_config_path() };
    let path = path.ok_or_else(|| Error::config("Cannot determine config directory"))?;
    println!("{}", path.display());
    Ok(())
}

/// Explain configuration resolution.
pub async fn config_explain(ctx: &Context) -> Result<()> {
    let user_path = Config::user_config_path()
        .map_or_else(|| "(unavailable)".to_string(), |p| p.display().to_string());

    println!("Configuration Resolution (highest to lowest precedence):");
    println!();
    println!("  1. CLI flags           (e.g., --locales, --source-dir)");
    println!("  2. Environment vars    (LINGO_*)");
    println!("  3. Project config      ({PROJECT_CONFIG_FILE} in current directory)");
    println!("  4. User config         ({user_path})");
    println!("  5. Defaults");
    println!();
    println!("Current effective values:");
    println!();
    println!("  Default locale: {}", ctx.locales().default_locale());
    println!(
        "  Locales: {}",
        ctx.locales().locales().iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    );
    println!("  Source: {}", ctx.config.source);
    for (locale, source) in &ctx.config.overrides {
        println!("  Source ({locale}): {source}");
    }
    println!("  Fetch timeout: {}ms", ctx.config.fetch_timeout_ms);
    if let Some(env_locale) = crate::i18n::detect_env_locale() {
        println!("  Environment locale: {env_locale}");
    }
    Ok(())
}
