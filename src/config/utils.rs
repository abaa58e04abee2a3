/// Configuration loading and validation
///
/// The configuration is loaded once at startup and handed to services
/// explicitly; nothing here keeps global state.
use super::schemas::Config;
use crate::logger::{self, LogTag};
use std::collections::HashSet;
use std::path::Path;

/// Load configuration from a TOML file
///
/// A missing file yields the defaults (with a warning). A file that exists
/// but does not parse or validate is an error.
pub fn load_config_from_path(path: &str) -> Result<Config, String> {
    let config = if Path::new(path).exists() {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file '{}': {}", path, e))?;

        parse_config(&contents)
            .map_err(|e| format!("Failed to parse config file '{}': {}", path, e))?
    } else {
        logger::warning(
            LogTag::Config,
            &format!("Config file '{}' not found, using default values", path),
        );
        Config::default()
    };

    validate_config(&config)?;
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<Config, String> {
    toml::from_str::<Config>(contents).map_err(|e| e.to_string())
}

/// Rejects values the workflow cannot run with
pub fn validate_config(config: &Config) -> Result<(), String> {
    if config.rpc.url.trim().is_empty() {
        return Err("rpc.url must not be empty".to_string());
    }

    if !matches!(config.rpc.commitment.as_str(), "processed" | "confirmed" | "finalized") {
        return Err(format!(
            "rpc.commitment must be processed, confirmed or finalized (got '{}')",
            config.rpc.commitment
        ));
    }

    if config.swap.slippage_bps == 0 || config.swap.slippage_bps > 10_000 {
        return Err(format!(
            "swap.slippage_bps must be between 1 and 10000 (got {})",
            config.swap.slippage_bps
        ));
    }

    let mut names = HashSet::new();
    for wallet in &config.wallets {
        if wallet.keypair_path.is_none() && wallet.private_key.is_none() {
            return Err(format!(
                "wallet '{}' needs either keypair_path or private_key",
                wallet.name
            ));
        }
        if !names.insert(wallet.name.as_str()) {
            return Err(format!("duplicate wallet name '{}'", wallet.name));
        }
    }

    for signer in &config.remote_signers {
        url::Url::parse(&signer.endpoint).map_err(|e| {
            format!("remote signer '{}' has invalid endpoint: {}", signer.name, e)
        })?;
        if !names.insert(signer.name.as_str()) {
            return Err(format!("duplicate wallet name '{}'", signer.name));
        }
    }

    Ok(())
}
