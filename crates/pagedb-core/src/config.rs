//! Configuration loader and search tunables.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `PAGEDB_*`
//! env vars. The hybrid engine itself only consumes a validated
//! `SearchOptions`; file and env layering stay in the host's hands.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{Error, Result};

/// Tunables for one hybrid search call.
///
/// `alpha` blends the normalized dense and sparse scores
/// (`score = alpha * dense + (1 - alpha) * sparse`). `overfetch` is how
/// many candidates each side is asked for before merging; `None` resolves
/// to `top_k * 3`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchOptions {
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub overfetch: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            top_k: default_top_k(),
            overfetch: None,
        }
    }
}

impl SearchOptions {
    /// Effective overfetch count: the configured value, or `top_k * 3`.
    #[must_use]
    pub fn overfetch_limit(&self) -> usize {
        self.overfetch.unwrap_or(self.top_k * 3)
    }

    /// Reject values that would silently degrade result quality.
    ///
    /// Only the config-file load path calls this; the engine itself trusts
    /// the caller, and degenerate values degrade to empty results rather
    /// than erroring.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::InvalidConfig(format!(
                "alpha must be in [0, 1], got {}",
                self.alpha
            )));
        }
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be positive".to_string()));
        }
        if let Some(overfetch) = self.overfetch {
            if overfetch < self.top_k {
                return Err(Error::InvalidConfig(format!(
                    "overfetch ({overfetch}) must be >= top_k ({})",
                    self.top_k
                )));
            }
        }
        Ok(())
    }
}

const fn default_alpha() -> f32 {
    0.6
}

const fn default_top_k() -> usize {
    20
}

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("PAGEDB_"));

        Ok(Self { figment })
    }

    /// Extract the `[search]` table, falling back to defaults when absent,
    /// and validate it before handing it to the engine.
    pub fn search_options(&self) -> anyhow::Result<SearchOptions> {
        let opts = self
            .figment
            .extract_inner::<SearchOptions>("search")
            .unwrap_or_default();
        opts.validate()?;
        Ok(opts)
    }
}
