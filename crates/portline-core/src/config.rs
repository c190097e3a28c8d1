#![forbid(unsafe_code)]

//! Line layout configuration.
//!
//! [`LayoutConfig`] carries the parameters a line-layout pass needs: the
//! available width, tab stop spacing, justification and the frame/paint
//! directions. Values come from builder setters or from `PORTLINE_*`
//! environment variables. Unparseable variables are ignored so a typo never
//! changes layout silently into something unexpected; out-of-range values
//! are reported by [`LayoutConfig::validate`].

use std::fmt;

use crate::direction::{FrameDirection, PaintDirection};
use crate::geometry::Twips;

/// Environment variable for the available line width in twips.
const ENV_MAX_WIDTH: &str = "PORTLINE_MAX_WIDTH";
/// Environment variable for the tab stop interval in twips.
const ENV_TAB_STOP: &str = "PORTLINE_TAB_STOP";
/// Environment variable enabling justification (`1/0/true/false`).
const ENV_JUSTIFY: &str = "PORTLINE_JUSTIFY";
/// Environment variable for the frame direction (`auto`, `ltr`, `rtl`).
const ENV_FRAME_DIR: &str = "PORTLINE_FRAME_DIR";
/// Environment variable for the paint direction (`ltr`, `rtl`, `btt`, `ttb`).
const ENV_PAINT_DIR: &str = "PORTLINE_PAINT_DIR";
/// Environment variable toggling per-line chain verification (`1/0/true/false`).
const ENV_VERIFY_CHAINS: &str = "PORTLINE_VERIFY_CHAINS";

/// Default line width: 6.25 inches.
pub const DEFAULT_MAX_WIDTH: Twips = 9000;
/// Default tab interval: half an inch.
pub const DEFAULT_TAB_STOP: Twips = 720;

/// Configuration rejected by [`LayoutConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A value could not be parsed for the given key.
    InvalidValue { key: &'static str, value: String },
    /// The line width must be positive.
    NonPositiveWidth { width: Twips },
    /// The tab stop interval must be positive.
    NonPositiveTabStop { tab_stop: Twips },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidValue { key, value } => {
                write!(f, "invalid value {value:?} for {key}")
            }
            Self::NonPositiveWidth { width } => {
                write!(f, "line width must be > 0 (got {width})")
            }
            Self::NonPositiveTabStop { tab_stop } => {
                write!(f, "tab stop interval must be > 0 (got {tab_stop})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parameters for laying out lines of portions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutConfig {
    /// Available line width in twips.
    pub max_width: Twips,
    /// Distance between default tab stops.
    pub tab_stop: Twips,
    /// Distribute free space over blanks on all but a paragraph's last line.
    pub justify: bool,
    /// Base writing direction of the frame.
    pub frame_direction: FrameDirection,
    /// Direction in which lines are painted.
    pub paint_direction: PaintDirection,
    /// Verify chain acyclicity after each composed line.
    pub verify_chains: bool,
}

impl LayoutConfig {
    /// Create a configuration for the given line width.
    #[must_use]
    pub fn new(max_width: Twips) -> Self {
        Self {
            max_width,
            tab_stop: DEFAULT_TAB_STOP,
            justify: false,
            frame_direction: FrameDirection::Auto,
            paint_direction: PaintDirection::LeftToRight,
            verify_chains: cfg!(debug_assertions),
        }
    }

    /// Set the tab stop interval.
    #[must_use]
    pub fn tab_stop(mut self, tab_stop: Twips) -> Self {
        self.tab_stop = tab_stop;
        self
    }

    /// Enable or disable justification.
    #[must_use]
    pub fn justify(mut self, justify: bool) -> Self {
        self.justify = justify;
        self
    }

    /// Set the frame direction.
    #[must_use]
    pub fn frame_direction(mut self, direction: FrameDirection) -> Self {
        self.frame_direction = direction;
        self
    }

    /// Set the paint direction.
    #[must_use]
    pub fn paint_direction(mut self, direction: PaintDirection) -> Self {
        self.paint_direction = direction;
        self
    }

    /// Enable or disable chain verification.
    #[must_use]
    pub fn verify_chains(mut self, verify: bool) -> Self {
        self.verify_chains = verify;
        self
    }

    /// Read overrides from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Read overrides through a custom environment lookup (for tests).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(width) = env_override_twips(&get_env, ENV_MAX_WIDTH) {
            config.max_width = width;
        }
        if let Some(tab_stop) = env_override_twips(&get_env, ENV_TAB_STOP) {
            config.tab_stop = tab_stop;
        }
        if let Some(justify) = env_override_bool(&get_env, ENV_JUSTIFY) {
            config.justify = justify;
        }
        if let Some(dir) = get_env(ENV_FRAME_DIR).and_then(|v| FrameDirection::parse(&v)) {
            config.frame_direction = dir;
        }
        if let Some(dir) = get_env(ENV_PAINT_DIR).and_then(|v| PaintDirection::parse(&v)) {
            config.paint_direction = dir;
        }
        if let Some(verify) = env_override_bool(&get_env, ENV_VERIFY_CHAINS) {
            config.verify_chains = verify;
        }
        config
    }

    /// Strict variant of [`from_env_with`](Self::from_env_with): unparseable
    /// values are errors instead of being ignored.
    pub fn try_from_env_with<F>(get_env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let checks: [(&'static str, fn(&str) -> bool); 6] = [
            (ENV_MAX_WIDTH, |v| v.trim().parse::<Twips>().is_ok()),
            (ENV_TAB_STOP, |v| v.trim().parse::<Twips>().is_ok()),
            (ENV_JUSTIFY, |v| parse_bool(v).is_some()),
            (ENV_FRAME_DIR, |v| FrameDirection::parse(v).is_some()),
            (ENV_PAINT_DIR, |v| PaintDirection::parse(v).is_some()),
            (ENV_VERIFY_CHAINS, |v| parse_bool(v).is_some()),
        ];
        for (key, accepts) in checks {
            if let Some(value) = get_env(key)
                && !accepts(&value)
            {
                return Err(ConfigError::InvalidValue { key, value });
            }
        }
        let config = Self::from_env_with(get_env);
        config.validate()?;
        Ok(config)
    }

    /// Check that widths are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_width <= 0 {
            return Err(ConfigError::NonPositiveWidth {
                width: self.max_width,
            });
        }
        if self.tab_stop <= 0 {
            return Err(ConfigError::NonPositiveTabStop {
                tab_stop: self.tab_stop,
            });
        }
        Ok(())
    }

    /// Serialize the configuration to JSON (for diagnostics logs).
    #[must_use]
    pub fn to_json(&self) -> String {
        format!(
            r#"{{"max_width":{},"tab_stop":{},"justify":{},"frame_direction":"{}","paint_direction":"{}","verify_chains":{}}}"#,
            self.max_width,
            self.tab_stop,
            self.justify,
            self.frame_direction.as_str(),
            self.paint_direction.as_str(),
            self.verify_chains
        )
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_WIDTH)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_override_bool<F>(get_env: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    get_env(key).and_then(|value| parse_bool(&value))
}

fn env_override_twips<F>(get_env: &F, key: &str) -> Option<Twips>
where
    F: Fn(&str) -> Option<String>,
{
    get_env(key).and_then(|value| value.trim().parse().ok())
}
