use std::env;

use chrono::Duration;
use log::*;
use notion_tools::NotionConfig;
use razorpay_tools::RazorpayConfig;
use vp_common::helpers::parse_boolean_flag;

use crate::errors::ServerError;

const DEFAULT_VP_HOST: &str = "127.0.0.1";
const DEFAULT_VP_PORT: u16 = 5000;
const DEFAULT_ENVIRONMENT: &str = "development";
const DEFAULT_RECONCILE_INTERVAL: Duration = Duration::minutes(10);
const DEFAULT_RECONCILE_GRACE_PERIOD: Duration = Duration::minutes(30);
const DEFAULT_ABANDONED_BOOKING_TIMEOUT: Duration = Duration::hours(48);

/// Variables without which the server will not start.
pub const REQUIRED_ENV_VARS: [&str; 6] = [
    "VP_RAZORPAY_KEY_ID",
    "VP_RAZORPAY_KEY_SECRET",
    "VP_RAZORPAY_WEBHOOK_SECRET",
    "VP_NOTION_API_KEY",
    "VP_NOTION_DATABASE_ID",
    "VP_APP_URL",
];

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `production` hides debug information in error responses. Anything else is treated as a development setup.
    pub environment: String,
    /// The public URL of the booking website.
    pub app_url: String,
    pub razorpay: RazorpayConfig,
    pub notion: NotionConfig,
    /// If false, webhook signatures are not checked. **DANGER**
    pub webhook_hmac_checks: bool,
    pub reconciliation: ReconciliationConfig,
}

#[derive(Clone, Debug)]
pub struct ReconciliationConfig {
    pub enabled: bool,
    /// How often the sweep over pending bookings runs.
    pub interval: Duration,
    /// Pending bookings younger than this are left to the client and webhooks.
    pub grace_period: Duration,
    /// Pending bookings older than this, with no captured payment, are marked as failed.
    pub abandon_after: Duration,
}

impl Default for ReconciliationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval: DEFAULT_RECONCILE_INTERVAL,
            grace_period: DEFAULT_RECONCILE_GRACE_PERIOD,
            abandon_after: DEFAULT_ABANDONED_BOOKING_TIMEOUT,
        }
    }
}

impl ServerConfig {
    pub fn try_from_env() -> Result<Self, ServerError> {
        Self::try_from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from `lookup`, which maps variable names to values. Every missing required variable
    /// is named in the error.
    pub fn try_from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where F: Fn(&str) -> Option<String> {
        let get = |name: &str| lookup(name).map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let missing = REQUIRED_ENV_VARS.iter().filter(|&&name| get(name).is_none()).copied().collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(ServerError::ConfigurationError(format!(
                "Missing required environment variable(s): {}",
                missing.join(", ")
            )));
        }
        let required = |name: &str| get(name).unwrap_or_default();
        let host = get("VP_HOST").unwrap_or_else(|| DEFAULT_VP_HOST.into());
        let port = match get("VP_PORT") {
            Some(s) => s.parse::<u16>().map_err(|e| {
                ServerError::ConfigurationError(format!("{s} is not a valid port for VP_PORT. {e}"))
            })?,
            None => DEFAULT_VP_PORT,
        };
        let environment = get("VP_ENVIRONMENT").unwrap_or_else(|| DEFAULT_ENVIRONMENT.into()).to_lowercase();
        let mut razorpay = RazorpayConfig::new(
            &required("VP_RAZORPAY_KEY_ID"),
            &required("VP_RAZORPAY_KEY_SECRET"),
            &required("VP_RAZORPAY_WEBHOOK_SECRET"),
        )
        .with_environment(&environment);
        if let Some(url) = get("VP_RAZORPAY_API_URL") {
            razorpay = razorpay.with_api_url(&url);
        }
        let mut notion = NotionConfig::new(&required("VP_NOTION_API_KEY"), &required("VP_NOTION_DATABASE_ID"));
        if let Some(url) = get("VP_NOTION_API_URL") {
            notion = notion.with_api_url(&url);
        }
        if let Some(version) = get("VP_NOTION_API_VERSION") {
            notion = notion.with_api_version(&version);
        }
        let webhook_hmac_checks = parse_boolean_flag(get("VP_WEBHOOK_HMAC_CHECKS"), true);
        if !webhook_hmac_checks {
            warn!("🚨️ Webhook signature checks are disabled. Anyone can settle bookings through the webhook route.");
        }
        let reconciliation = ReconciliationConfig {
            enabled: !parse_boolean_flag(get("VP_DISABLE_RECONCILIATION"), false),
            interval: duration_var(&get, "VP_RECONCILE_INTERVAL", Duration::try_minutes, DEFAULT_RECONCILE_INTERVAL),
            grace_period: duration_var(
                &get,
                "VP_RECONCILE_GRACE_PERIOD",
                Duration::try_minutes,
                DEFAULT_RECONCILE_GRACE_PERIOD,
            ),
            abandon_after: duration_var(
                &get,
                "VP_ABANDONED_BOOKING_TIMEOUT",
                Duration::try_hours,
                DEFAULT_ABANDONED_BOOKING_TIMEOUT,
            ),
        };
        Ok(Self {
            host,
            port,
            environment,
            app_url: required("VP_APP_URL"),
            razorpay,
            notion,
            webhook_hmac_checks,
            reconciliation,
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Reads a whole number of units from `name`. Missing, invalid and non-positive values fall back to `default`.
fn duration_var<G>(get: &G, name: &str, unit: fn(i64) -> Option<Duration>, default: Duration) -> Duration
where G: Fn(&str) -> Option<String> {
    match get(name).map(|s| s.parse::<i64>()) {
        None => {
            info!("🪛️ {name} is not set. Using the default value of {} min.", default.num_minutes());
            default
        },
        Some(Ok(v)) if v > 0 => unit(v).unwrap_or_else(|| {
            warn!("🪛️ {name} is out of range ({v}). Using the default value of {} min.", default.num_minutes());
            default
        }),
        Some(Ok(v)) => {
            warn!("🪛️ {name} must be positive, not {v}. Using the default value of {} min.", default.num_minutes());
            default
        },
        Some(Err(e)) => {
            warn!("🪛️ Invalid configuration value for {name}. {e}. Using the default value.");
            default
        },
    }
}
