//! CLI configuration -- thin wrapper around `medico_config` shared types.
//!
//! Adds the resolution step that respects `GlobalOpts` flag overrides
//! (--api-url, --token, --timeout, --insecure).

use secrecy::SecretString;

use medico_core::ApiConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use medico_config::{Config, Profile, config_path, load_config_or_default, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| config.active_profile_name().to_owned())
}

/// Translate a profile plus global flags into an `ApiConfig`.
///
/// Flags win over the profile; a `--token` flag skips the env/keyring chain.
pub fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    config: &Config,
    global: &GlobalOpts,
) -> Result<ApiConfig, CliError> {
    let mut effective = profile.clone();
    if let Some(url) = &global.api_url {
        effective.api_url.clone_from(url);
    }
    if global.insecure {
        effective.insecure = Some(true);
    }
    if global.timeout.is_some() {
        effective.timeout = global.timeout;
    }

    let token = match &global.token {
        Some(token) => Some(SecretString::from(token.clone())),
        None => medico_config::resolve_token(&effective, profile_name),
    };

    Ok(medico_config::build_api_config(
        &effective,
        &config.defaults,
        token,
    )?)
}

/// Build the `ApiConfig` for this invocation.
///
/// Uses the active profile when one exists; otherwise `--api-url` alone is
/// enough. A profile named with `--profile` must exist.
pub fn build_api_config(global: &GlobalOpts, cfg: &Config) -> Result<ApiConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        return resolve_profile(profile, &profile_name, cfg, global);
    }

    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(cfg),
        });
    }

    if global.api_url.is_none() {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    }

    resolve_profile(&Profile::default(), &profile_name, cfg, global)
}

/// Comma-separated profile names, or `(none)`.
pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}
