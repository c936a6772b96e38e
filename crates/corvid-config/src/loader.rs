// SPDX-FileCopyrightText: 2026 Corvid Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./corvid.toml` > `~/.config/corvid/corvid.toml` > `/etc/corvid/corvid.toml`
//! with environment variable overrides via `CORVID_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::CorvidConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/corvid/corvid.toml` (system-wide)
/// 3. `~/.config/corvid/corvid.toml` (user XDG config)
/// 4. `./corvid.toml` (local directory)
/// 5. `CORVID_*` environment variables
pub fn load_config() -> Result<CorvidConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CorvidConfig::default()))
        .merge(Toml::file("/etc/corvid/corvid.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("corvid/corvid.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("corvid.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup).
///
/// Used for testing and for supplying config content directly.
pub fn load_config_from_str(toml_content: &str) -> Result<CorvidConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CorvidConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CorvidConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CorvidConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names. For example, `CORVID_OPENAI_API_KEY` must
/// map to `openai.api_key`, not `openai.api.key`.
fn env_provider() -> Env {
    Env::prefixed("CORVID_").map(|key| {
        // `key` arrives with the prefix stripped but in original case.
        // Example: CORVID_OPENAI_API_KEY -> "OPENAI_API_KEY"
        let lowered = key.as_str().to_ascii_lowercase();
        // Split on the first underscore only when it follows a known section
        // name, so `agent_max_history` maps to `agent.max_history` and the
        // `x_` inside `max_history` is never mistaken for the `x` section.
        for section in ["agent", "storage", "openai", "x", "ingest"] {
            if let Some(rest) = lowered.strip_prefix(section) {
                if let Some(rest) = rest.strip_prefix('_') {
                    return format!("{section}.{rest}").into();
                }
            }
        }
        lowered.into()
    })
}
