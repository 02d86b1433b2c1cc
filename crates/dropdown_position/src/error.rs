//! Error types for parsing positioning options.

use thiserror::Error;

/// An option value that is not one of the recognized keywords.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionError {
    #[error("Unknown horizontal position '{0}' (expected auto, left, right or center)")]
    Horizontal(String),

    #[error("Unknown vertical position '{0}' (expected auto, above or below)")]
    Vertical(String),

    #[error("Unknown match-trigger-width mode '{0}' (expected true, false or extend-leftward)")]
    MatchTriggerWidth(String),
}
