//! Process configuration.
//!
//! Everything is assembled once at startup from environment variables (a
//! `.env` file is honored) plus a JSON user roster, and handed to components
//! by reference. Component logic never reads the environment itself.

use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{FixedOffset, NaiveDate, Utc, Weekday};
use serde::Deserialize;

/// Regional fuel price API access.
pub struct FuelApiConfig {
    pub base_url: String,
    pub subscriber_token: String,
    pub country_id: u32,
    pub geo_region_level: u32,
    pub geo_region_id: u32,
}

impl FuelApiConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: var_or(
                "FPDAPI_BASE_URL",
                "https://fppdirectapi-prod.safuelpricinginformation.com.au",
            ),
            subscriber_token: required("FPDAPI_SUBSCRIBER_TOKEN")?,
            country_id: parse_or("FUEL_COUNTRY_ID", 21)?,
            geo_region_level: parse_or("FUEL_GEO_REGION_LEVEL", 2)?,
            geo_region_id: parse_or("FUEL_GEO_REGION_ID", 189)?,
        })
    }
}

/// Record-store table name, `pricedata` unless overridden.
pub fn table_name_from_env() -> String {
    var_or("PRICE_TABLE_NAME", "pricedata")
}

/// Chat-completion API used to rewrite the advisory into a short tip.
pub struct TipsConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

/// Push-notification delivery endpoint.
pub struct PushoverConfig {
    pub api_url: String,
    pub app_token: String,
}

/// Public advisory page carrying the buying-tip paragraph.
pub struct AdvisoryConfig {
    pub url: String,
    /// Position of the `<ul>` element holding the tip.
    pub list_index: usize,
}

/// When the batch runs and what "today" means.
pub struct Schedule {
    pub notify_on: Vec<Weekday>,
    pub utc_offset: FixedOffset,
}

impl Schedule {
    /// The current calendar date in the configured region.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.utc_offset).date_naive()
    }

    pub fn runs_on(&self, weekday: Weekday) -> bool {
        self.notify_on.contains(&weekday)
    }

    fn parse_days(raw: &str) -> Result<Vec<Weekday>> {
        raw.split(',')
            .map(str::trim)
            .filter(|day| !day.is_empty())
            .map(|day| {
                Weekday::from_str(day)
                    .map_err(|_| anyhow::anyhow!("unrecognized weekday '{day}' in NOTIFY_ON"))
            })
            .collect()
    }
}

/// A subscribed user: display name, opaque delivery-address token, and the
/// provider id of their preferred fuel. The roster is static configuration;
/// users are not created or destroyed at runtime.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub name: String,
    pub user_key: String,
    pub preferred_fuel_id: u32,
}

pub struct AppConfig {
    pub fuel_api: FuelApiConfig,
    pub tips: TipsConfig,
    pub pushover: PushoverConfig,
    pub advisory: AdvisoryConfig,
    pub schedule: Schedule,
    pub table_name: String,
    pub users: Vec<User>,
}

impl AppConfig {
    /// Builds the full configuration from the environment and the user
    /// roster file named by `USERS_FILE` (default `users.json`).
    pub fn from_env() -> Result<Self> {
        let offset_minutes: i32 = parse_or("UTC_OFFSET_MINUTES", 570)?;
        let utc_offset = FixedOffset::east_opt(offset_minutes * 60)
            .context("UTC_OFFSET_MINUTES is out of range")?;

        let notify_on = Schedule::parse_days(&var_or(
            "NOTIFY_ON",
            "monday,tuesday,wednesday,thursday,friday,saturday,sunday",
        ))?;

        let users_file = var_or("USERS_FILE", "users.json");

        Ok(Self {
            fuel_api: FuelApiConfig::from_env()?,
            tips: TipsConfig {
                base_url: var_or("OPENAI_BASE_URL", "https://api.openai.com"),
                api_key: required("OPENAI_API_KEY")?,
                model: var_or("TIP_MODEL", "gpt-4"),
            },
            pushover: PushoverConfig {
                api_url: var_or("PUSHOVER_API_URL", "https://api.pushover.net/1/messages.json"),
                app_token: required("PUSHOVER_APP_TOKEN")?,
            },
            advisory: AdvisoryConfig {
                url: var_or(
                    "ADVISORY_URL",
                    "https://www.accc.gov.au/consumers/petrol-and-fuel/petrol-price-cycles-in-major-cities",
                ),
                list_index: parse_or("ADVISORY_LIST_INDEX", 23)?,
            },
            schedule: Schedule {
                notify_on,
                utc_offset,
            },
            table_name: table_name_from_env(),
            users: load_users(&users_file)?,
        })
    }
}

/// Loads the user roster from a JSON file at `path`.
pub fn load_users(path: &str) -> Result<Vec<User>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read user roster '{path}'"))?;
    let users: Vec<User> = serde_json::from_str(&content)
        .with_context(|| format!("user roster '{path}' is not valid JSON"))?;
    Ok(users)
}

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{key} must be set"))
}

fn var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw.parse().with_context(|| format!("{key} is not a valid value")),
        Err(_) => Ok(default),
    }
}
