//! Runtime configuration: parsing, layering and validation.
//!
//! An [`AppConfig`] is assembled once at startup from, lowest precedence
//! first:
//!
//! 1. Built-in defaults.
//! 2. An optional TOML file ([`FileConfig`]).
//! 3. Environment variables (the binary loads `.env` into the environment
//!    beforehand).
//!
//! Command-line flags are applied on top by the binary. Anything malformed is
//! reported as a [`ConfigError`] and stops the process before the first scan.
//!
//! A config file looks like:
//!
//! ```toml
//! sparky_url = "http://10.1.1.86:3010"
//! catalog_mode = "create_or_get"
//! default_meal = "Snack"
//!
//! [meals]
//! Breakfast = "06:00-09:30"
//! Lunch = "12:00-13:30"
//! Dinner = "18:00-20:00"
//! ```

use std::{num::NonZeroU32, path::Path};

use chrono_tz::Tz;
use indexmap::IndexMap;
use nutrition_sources::providers::budget::DEFAULT_REQUESTS_PER_MINUTE;
use secrecy::SecretString;
use serde::Deserialize;
use shared_utils::{
    config::ConfigError,
    env::{get_optional_env_var, parse_flag, parse_value},
};
use thiserror::Error;

use crate::{
    catalog::CatalogMode,
    clock::parse_tz,
    enrich::EnrichmentMode,
    meal::{MealSchedule, MealType, MealWindow},
};

pub const DEFAULT_TRACKER_URL: &str = "http://localhost:3010";

/// Environment variable names.
pub mod vars {
    pub const SPARKY_URL: &str = "SPARKY_URL";
    pub const SPARKY_API_KEY: &str = "SPARKY_API_KEY";
    pub const USDA_PROVIDER_ID: &str = "USDA_PROVIDER_ID";
    pub const DEFAULT_MEAL_TYPE: &str = "DEFAULT_MEAL_TYPE";
    pub const SCANNER_DEVICE: &str = "SCANNER_DEVICE";
    pub const SCALE_URL: &str = "SCALE_URL";
    pub const TIMEZONE: &str = "TIMEZONE";
    pub const CATALOG_MODE: &str = "CATALOG_MODE";
    pub const ENRICHMENT: &str = "ENRICHMENT";
    pub const SECONDARY_REQUESTS_PER_MINUTE: &str = "SECONDARY_REQUESTS_PER_MINUTE";
}

/// Per-meal window variables, e.g. `LUNCH_WINDOW=11:30-13:00`.
fn window_var(meal: MealType) -> String {
    format!("{}_WINDOW", meal.as_str().to_ascii_uppercase())
}

/// Optional settings read from a TOML file. Secrets stay in the environment.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub sparky_url: Option<String>,
    pub default_meal: Option<String>,
    /// Meal name to `"HH:MM-HH:MM"`, evaluated in file order.
    #[serde(default)]
    pub meals: IndexMap<String, String>,
    pub scanner_device: Option<String>,
    pub scale_url: Option<String>,
    pub timezone: Option<String>,
    pub catalog_mode: Option<CatalogMode>,
    pub enrichment: Option<bool>,
    pub secondary_requests_per_minute: Option<u32>,
}

impl FileConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

/// Fully validated configuration, built once and passed by reference.
#[derive(Debug)]
pub struct AppConfig {
    pub tracker_url: String,
    pub api_key: SecretString,
    /// `None` disables the secondary nutrition source.
    pub usda_provider_id: Option<SecretString>,
    pub meals: MealSchedule,
    pub scanner_device: Option<String>,
    pub scale_url: Option<String>,
    /// `None` means the system local zone.
    pub timezone: Option<Tz>,
    pub catalog_mode: CatalogMode,
    pub enrichment: EnrichmentMode,
    pub secondary_requests_per_minute: NonZeroU32,
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },

    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

impl AppConfig {
    /// Reads `path` (if any) and layers the process environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        let file = match path {
            Some(path) => {
                let shown = path.display().to_string();
                let text = std::fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
                    path: shown.clone(),
                    source,
                })?;
                FileConfig::from_toml_str(&text)
                    .map_err(|source| ConfigLoadError::Parse { path: shown, source })?
            }
            None => FileConfig::default(),
        };
        Ok(Self::from_sources(file, get_optional_env_var)?)
    }

    /// Merges `file` with variables looked up through `env`.
    ///
    /// `env` must return `None` for unset or blank variables.
    pub fn from_sources<F>(file: FileConfig, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = env(vars::SPARKY_API_KEY)
            .ok_or_else(|| ConfigError::MissingEnvVar(vars::SPARKY_API_KEY.to_string()))?;

        let (url_source, raw_url) = match (env(vars::SPARKY_URL), file.sparky_url) {
            (Some(url), _) => (vars::SPARKY_URL, url),
            (None, Some(url)) => ("sparky_url", url),
            (None, None) => (vars::SPARKY_URL, DEFAULT_TRACKER_URL.to_string()),
        };
        let tracker_url = raw_url.trim_end_matches('/').to_string();
        if !(tracker_url.starts_with("http://") || tracker_url.starts_with("https://")) {
            return Err(ConfigError::invalid(
                url_source,
                &raw_url,
                "expected an http:// or https:// URL",
            ));
        }

        let meals = schedule(&file.meals, file.default_meal.as_deref(), &env)?;

        let timezone = env(vars::TIMEZONE)
            .or(file.timezone)
            .map(|name| parse_tz(&name).map_err(|e| ConfigError::invalid(vars::TIMEZONE, &name, e)))
            .transpose()?;

        let catalog_mode = match env(vars::CATALOG_MODE) {
            Some(raw) => parse_value(vars::CATALOG_MODE, &raw)?,
            None => file.catalog_mode.unwrap_or_default(),
        };

        let enrichment = match env(vars::ENRICHMENT) {
            Some(raw) => parse_flag(vars::ENRICHMENT, &raw)?,
            None => file.enrichment.unwrap_or(true),
        };

        let per_minute = match env(vars::SECONDARY_REQUESTS_PER_MINUTE) {
            Some(raw) => parse_value::<u32>(vars::SECONDARY_REQUESTS_PER_MINUTE, &raw)?,
            None => file
                .secondary_requests_per_minute
                .unwrap_or(DEFAULT_REQUESTS_PER_MINUTE.get()),
        };
        let secondary_requests_per_minute = NonZeroU32::new(per_minute).ok_or_else(|| {
            ConfigError::invalid(
                vars::SECONDARY_REQUESTS_PER_MINUTE,
                &per_minute.to_string(),
                "must be at least 1",
            )
        })?;

        Ok(Self {
            tracker_url,
            api_key: SecretString::from(api_key),
            usda_provider_id: env(vars::USDA_PROVIDER_ID).map(SecretString::from),
            meals,
            scanner_device: env(vars::SCANNER_DEVICE).or(file.scanner_device),
            scale_url: env(vars::SCALE_URL).or(file.scale_url),
            timezone,
            catalog_mode,
            enrichment: if enrichment {
                EnrichmentMode::WithSecondary
            } else {
                EnrichmentMode::PrimaryOnly
            },
            secondary_requests_per_minute,
        })
    }
}

/// File windows in file order, then built-in windows for meals the file does
/// not mention. Environment variables replace a meal's window in place.
fn schedule<F>(
    file_meals: &IndexMap<String, String>,
    file_default: Option<&str>,
    env: &F,
) -> Result<MealSchedule, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut ranges: IndexMap<MealType, (String, String)> = IndexMap::new();
    for (name, range) in file_meals {
        let meal = parse_value::<MealType>(&format!("meals.{name}"), name)?;
        ranges.insert(meal, (format!("meals.{name}"), range.clone()));
    }
    for (meal, range) in MealSchedule::DEFAULT_WINDOWS {
        ranges
            .entry(meal)
            .or_insert_with(|| (window_var(meal), range.to_string()));
    }
    for meal in MealType::ALL {
        let var = window_var(meal);
        if let Some(range) = env(&var) {
            ranges.insert(meal, (var, range));
        }
    }

    let windows = ranges
        .into_iter()
        .map(|(meal, (source, range))| {
            MealWindow::parse(meal, &range)
                .map_err(|e| ConfigError::invalid(&source, &range, e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let default = match env(vars::DEFAULT_MEAL_TYPE) {
        Some(raw) => parse_value(vars::DEFAULT_MEAL_TYPE, &raw)?,
        None => match file_default {
            Some(raw) => parse_value("default_meal", raw)?,
            None => MealType::Snack,
        },
    };

    Ok(MealSchedule::new(windows, default))
}
