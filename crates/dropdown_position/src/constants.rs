//! Centralized constants for dropdown_position

use std::time::Duration;

/// Minimum interval between two throttled repositions.
pub const DEFAULT_THROTTLE_INTERVAL: Duration = Duration::from_millis(60);

/// Same interval in milliseconds, for configuration defaults.
pub const DEFAULT_THROTTLE_MS: u64 = 60;

/// CSS keyword for an unset offset.
pub const CSS_AUTO: &str = "auto";
