//! Dropdown configuration.
//!
//! The options an embedding UI can set on a dropdown, deserializable from
//! JSON. Field names are snake_case; the camelCase attribute names used by
//! web templates are accepted as aliases.

use std::time::Duration;

use dropdown_position::constants::DEFAULT_THROTTLE_MS;
use dropdown_position::{
    builder_field, builder_option, HorizontalPosition, MatchTriggerWidth, PositionOptions,
    Strategy, VerticalPosition,
};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Log level setting for the native tools and the wasm console logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[cfg_attr(not(target_arch = "wasm32"), derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    #[default]
    Warn,
    /// Show errors, warnings, and info messages
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Options recognized by a dropdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownConfig {
    /// Render the panel next to the trigger instead of in a detached root
    #[serde(default, alias = "renderInPlace")]
    pub render_in_place: bool,

    #[serde(default, alias = "horizontalPosition")]
    pub horizontal_position: HorizontalPosition,

    #[serde(default, alias = "verticalPosition")]
    pub vertical_position: VerticalPosition,

    /// `true`, `false` or `"extend-leftward"`
    #[serde(default, alias = "matchTriggerWidth")]
    pub match_trigger_width: MatchTriggerWidth,

    /// Move a portaled panel with CSS transforms instead of top/left
    #[serde(default)]
    pub transform: bool,

    #[serde(default)]
    pub disabled: bool,

    /// Start in the open state
    #[serde(default, alias = "initiallyOpened")]
    pub initially_opened: bool,

    /// Minimum interval between watcher-driven repositions
    #[serde(default = "default_throttle_ms", alias = "throttleMs")]
    pub throttle_ms: u64,

    /// Explicit DOM id for the trigger
    #[serde(default, alias = "triggerId")]
    pub trigger_id: Option<String>,

    /// Explicit DOM id for the panel
    #[serde(default, alias = "panelId", alias = "dropdownId")]
    pub panel_id: Option<String>,
}

fn default_throttle_ms() -> u64 {
    DEFAULT_THROTTLE_MS
}

impl Default for DropdownConfig {
    fn default() -> Self {
        Self {
            render_in_place: false,
            horizontal_position: HorizontalPosition::default(),
            vertical_position: VerticalPosition::default(),
            match_trigger_width: MatchTriggerWidth::default(),
            transform: false,
            disabled: false,
            initially_opened: false,
            throttle_ms: default_throttle_ms(),
            trigger_id: None,
            panel_id: None,
        }
    }
}

impl DropdownConfig {
    builder_field!(render_in_place, bool);
    builder_field!(horizontal_position, HorizontalPosition);
    builder_field!(vertical_position, VerticalPosition);
    builder_field!(match_trigger_width, MatchTriggerWidth);
    builder_field!(transform, bool);
    builder_field!(disabled, bool);
    builder_field!(initially_opened, bool);
    builder_field!(throttle_ms, u64);
    builder_option!(trigger_id, String);
    builder_option!(panel_id, String);

    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: DropdownConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.throttle_ms == 0 {
            return Err(ConfigError::ZeroThrottle);
        }
        if self.trigger_id.as_deref() == Some("") {
            return Err(ConfigError::EmptyId { role: "trigger" });
        }
        if self.panel_id.as_deref() == Some("") {
            return Err(ConfigError::EmptyId { role: "panel" });
        }
        Ok(())
    }

    pub fn strategy(&self) -> Strategy {
        Strategy::select(self.render_in_place, self.transform)
    }

    /// Engine options derived from this configuration.
    pub fn position_options(&self) -> PositionOptions {
        PositionOptions::new(self.strategy())
            .horizontal(self.horizontal_position)
            .vertical(self.vertical_position)
            .match_trigger_width(self.match_trigger_width)
    }

    pub fn throttle_interval(&self) -> Duration {
        Duration::from_millis(self.throttle_ms)
    }
}
