//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_STATIC_DIR` - Static asset directory (default: crates/storefront/static)
//! - `STOREFRONT_CURRENCY` - ISO 4217 code used for prices (default: INR)
//! - `NOTIFICATION_VISIBLE_MS` - How long a notification stays before fading (default: 3000)
//! - `NOTIFICATION_FADE_MS` - Fade-out time before a notification is removed (default: 400)
//! - `COUNTER_DURATION_MS` - Duration of the stats counter animation (default: 2000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::fmt::Display;
use std::net::{IpAddr, SocketAddr};
use std::ops::Range;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sunleaf_core::CurrencyCode;
use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Directory served under `/static`
    pub static_dir: PathBuf,
    /// Currency every cart price is expressed in
    pub currency: CurrencyCode,
    /// Timings, thresholds and caps for the page behavior
    pub effects: EffectsConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g. production)
    pub sentry_environment: Option<String>,
    /// Fraction of error events sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions sent to Sentry
    pub sentry_traces_sample_rate: f32,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            static_dir: PathBuf::from("crates/storefront/static"),
            currency: CurrencyCode::INR,
            effects: EffectsConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let host = get_parsed_or_default("STOREFRONT_HOST", defaults.host)?;
        let port = get_parsed_or_default("STOREFRONT_PORT", defaults.port)?;
        let static_dir = get_optional_env("STOREFRONT_STATIC_DIR")
            .map_or(defaults.static_dir, PathBuf::from);
        let currency = get_parsed_or_default("STOREFRONT_CURRENCY", defaults.currency)?;
        let effects = EffectsConfig::from_env()?;

        Ok(Self {
            host,
            port,
            static_dir,
            currency,
            effects,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_parsed_or_default(
                "SENTRY_SAMPLE_RATE",
                defaults.sentry_sample_rate,
            )?,
            sentry_traces_sample_rate: get_parsed_or_default(
                "SENTRY_TRACES_SAMPLE_RATE",
                defaults.sentry_traces_sample_rate,
            )?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Page Behavior
// =============================================================================

/// Every delay, threshold and cap the page uses.
#[derive(Debug, Clone)]
pub struct EffectsConfig {
    /// Viewports narrower than this are treated as mobile.
    pub mobile_breakpoint_px: u32,
    pub notifications: NotificationTiming,
    pub modal: ModalTiming,
    pub particles: ParticleConfig,
    pub counters: CounterConfig,
    pub scroll: ScrollConfig,
    pub reveal: RevealConfig,
    /// Hero video opacity applied on mobile viewports after load.
    pub mobile_video_opacity: f32,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint_px: 768,
            notifications: NotificationTiming::default(),
            modal: ModalTiming::default(),
            particles: ParticleConfig::default(),
            counters: CounterConfig::default(),
            scroll: ScrollConfig::default(),
            reveal: RevealConfig::default(),
            mobile_video_opacity: 0.3,
        }
    }
}

impl EffectsConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let mut effects = Self::default();
        effects.notifications.visible = get_millis_or_default(
            "NOTIFICATION_VISIBLE_MS",
            effects.notifications.visible,
        )?;
        effects.notifications.fade =
            get_millis_or_default("NOTIFICATION_FADE_MS", effects.notifications.fade)?;
        effects.counters.duration =
            get_millis_or_default("COUNTER_DURATION_MS", effects.counters.duration)?;
        Ok(effects)
    }

    /// Whether a viewport of `width` pixels gets the mobile variants.
    #[must_use]
    pub const fn is_mobile(&self, width: u32) -> bool {
        width < self.mobile_breakpoint_px
    }
}

/// Notification lifetime.
#[derive(Debug, Clone, Copy)]
pub struct NotificationTiming {
    /// Time on screen before the fade-out starts.
    pub visible: Duration,
    /// Time between the fade-out start and removal.
    pub fade: Duration,
}

impl Default for NotificationTiming {
    fn default() -> Self {
        Self {
            visible: Duration::from_millis(3000),
            fade: Duration::from_millis(400),
        }
    }
}

/// Cart modal transitions.
#[derive(Debug, Clone, Copy)]
pub struct ModalTiming {
    /// Delay between showing the modal and activating its transition.
    pub reveal_delay: Duration,
    /// Delay between deactivating the modal and hiding it.
    pub close_delay: Duration,
}

impl Default for ModalTiming {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(10),
            close_delay: Duration::from_millis(300),
        }
    }
}

/// Decorative particles rising behind the hero.
#[derive(Debug, Clone)]
pub struct ParticleConfig {
    pub mobile_cap: usize,
    pub desktop_cap: usize,
    pub mobile_interval: Duration,
    pub desktop_interval: Duration,
    /// Time after which a particle removes itself.
    pub lifetime: Duration,
    pub mobile_size_px: Range<f64>,
    pub desktop_size_px: Range<f64>,
    pub animation_secs: Range<f64>,
    pub delay_secs: Range<f64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            mobile_cap: 8,
            desktop_cap: 15,
            mobile_interval: Duration::from_millis(1200),
            desktop_interval: Duration::from_millis(800),
            lifetime: Duration::from_millis(8000),
            mobile_size_px: 5.0..30.0,
            desktop_size_px: 10.0..50.0,
            animation_secs: 4.0..8.0,
            delay_secs: 0.0..2.0,
        }
    }
}

/// One animated statistic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterTarget {
    pub element_id: String,
    pub target: u32,
    /// Caption shown under the number.
    pub label: String,
}

impl CounterTarget {
    fn new(element_id: &str, target: u32, label: &str) -> Self {
        Self {
            element_id: element_id.to_string(),
            target,
            label: label.to_string(),
        }
    }
}

/// Stats counters started by the stats section becoming visible.
#[derive(Debug, Clone)]
pub struct CounterConfig {
    pub duration: Duration,
    pub tick: Duration,
    /// Fraction of the section that must be visible.
    pub threshold: f64,
    /// Pixels trimmed off the bottom of the viewport before testing visibility.
    pub root_margin_bottom_px: u32,
    pub targets: Vec<CounterTarget>,
}

impl CounterConfig {
    /// The observer `rootMargin` that trims the bottom of the viewport.
    #[must_use]
    pub fn root_margin(&self) -> String {
        format!("0px 0px -{}px 0px", self.root_margin_bottom_px)
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(2000),
            tick: Duration::from_millis(16),
            threshold: 0.7,
            root_margin_bottom_px: 100,
            targets: vec![
                CounterTarget::new("years-counter", 11, "Years of Tradition"),
                CounterTarget::new("customers-counter", 850, "Happy Customers"),
                CounterTarget::new("products-counter", 15, "Natural Products"),
                CounterTarget::new("delivery-counter", 200, "Towns Delivered"),
            ],
        }
    }
}

/// Scroll-driven adjustments.
#[derive(Debug, Clone, Copy)]
pub struct ScrollConfig {
    /// Scroll position past which the navbar gets the `scrolled` class.
    pub navbar_threshold_px: u32,
    /// Space left above an anchor target on mobile.
    pub anchor_offset_mobile_px: u32,
    /// Space left above an anchor target on desktop.
    pub anchor_offset_desktop_px: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            navbar_threshold_px: 50,
            anchor_offset_mobile_px: 60,
            anchor_offset_desktop_px: 80,
        }
    }
}

/// Options handed to the reveal-on-scroll library.
#[derive(Debug, Clone)]
pub struct RevealConfig {
    pub duration_ms: u32,
    pub once: bool,
    pub offset_px: u32,
    pub easing: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            duration_ms: 800,
            once: true,
            offset_px: 50,
            easing: "ease-out-cubic".to_string(),
        }
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse an environment variable, falling back to `default` when unset.
fn get_parsed_or_default<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    get_optional_env(key).map_or(Ok(default), |value| parse_value(key, &value))
}

/// Parse a millisecond count, falling back to `default` when unset.
fn get_millis_or_default(key: &str, default: Duration) -> Result<Duration, ConfigError> {
    get_optional_env(key).map_or(Ok(default), |value| {
        parse_value::<u64>(key, &value).map(Duration::from_millis)
    })
}

fn parse_value<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}
