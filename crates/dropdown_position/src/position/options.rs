use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::OptionError;

/// Requested horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalPosition {
    /// Pick a side from the available room.
    #[default]
    Auto,
    Left,
    Right,
    Center,
}

/// Requested vertical placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalPosition {
    /// Pick a side from the available room, with hysteresis.
    #[default]
    Auto,
    Above,
    Below,
}

/// Resolved horizontal alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalSide {
    Left,
    Right,
    Center,
}

/// Resolved vertical placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalSide {
    Above,
    Below,
}

impl HorizontalSide {
    pub fn name(&self) -> &'static str {
        match self {
            HorizontalSide::Left => "left",
            HorizontalSide::Right => "right",
            HorizontalSide::Center => "center",
        }
    }
}

impl VerticalSide {
    pub fn name(&self) -> &'static str {
        match self {
            VerticalSide::Above => "above",
            VerticalSide::Below => "below",
        }
    }
}

/// How the panel width relates to the trigger width.
///
/// Deserializes from `false`, `true` or `"extend-leftward"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "MatchTriggerWidthRepr", into = "MatchTriggerWidthRepr")]
pub enum MatchTriggerWidth {
    /// Panel keeps its natural width.
    #[default]
    Off,
    /// Panel width is forced to the trigger width.
    On,
    /// Panel is at least as wide as the trigger. A wider panel is anchored to
    /// the trigger's right edge when the horizontal side is automatic, so the
    /// extra width extends to the left.
    ExtendLeftward,
}

impl MatchTriggerWidth {
    /// Effective panel width for layout.
    pub fn panel_width(&self, trigger_width: f64, panel_width: f64) -> f64 {
        match self {
            MatchTriggerWidth::Off => panel_width,
            MatchTriggerWidth::On => trigger_width,
            MatchTriggerWidth::ExtendLeftward => panel_width.max(trigger_width),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum MatchTriggerWidthRepr {
    Flag(bool),
    Mode(String),
}

impl TryFrom<MatchTriggerWidthRepr> for MatchTriggerWidth {
    type Error = OptionError;

    fn try_from(repr: MatchTriggerWidthRepr) -> Result<Self, Self::Error> {
        match repr {
            MatchTriggerWidthRepr::Flag(true) => Ok(MatchTriggerWidth::On),
            MatchTriggerWidthRepr::Flag(false) => Ok(MatchTriggerWidth::Off),
            MatchTriggerWidthRepr::Mode(mode) => mode.parse(),
        }
    }
}

impl From<MatchTriggerWidth> for MatchTriggerWidthRepr {
    fn from(value: MatchTriggerWidth) -> Self {
        match value {
            MatchTriggerWidth::Off => MatchTriggerWidthRepr::Flag(false),
            MatchTriggerWidth::On => MatchTriggerWidthRepr::Flag(true),
            MatchTriggerWidth::ExtendLeftward => {
                MatchTriggerWidthRepr::Mode("extend-leftward".to_string())
            }
        }
    }
}

impl FromStr for MatchTriggerWidth {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "false" | "" => Ok(MatchTriggerWidth::Off),
            "true" => Ok(MatchTriggerWidth::On),
            "extend-leftward" => Ok(MatchTriggerWidth::ExtendLeftward),
            other => Err(OptionError::MatchTriggerWidth(other.to_string())),
        }
    }
}

impl FromStr for HorizontalPosition {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(HorizontalPosition::Auto),
            "left" => Ok(HorizontalPosition::Left),
            "right" => Ok(HorizontalPosition::Right),
            "center" => Ok(HorizontalPosition::Center),
            other => Err(OptionError::Horizontal(other.to_string())),
        }
    }
}

impl FromStr for VerticalPosition {
    type Err = OptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(VerticalPosition::Auto),
            "above" => Ok(VerticalPosition::Above),
            "below" => Ok(VerticalPosition::Below),
            other => Err(OptionError::Vertical(other.to_string())),
        }
    }
}

/// Which reposition algorithm runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Panel rendered beside the trigger; horizontal side only.
    InPlace,
    /// Panel in a detached root, placed with absolute coordinates.
    #[default]
    Portal,
    /// Panel in a detached root, moved with a composed translation.
    Transform,
}

impl Strategy {
    pub fn select(render_in_place: bool, transform: bool) -> Self {
        match (render_in_place, transform) {
            (true, _) => Strategy::InPlace,
            (false, true) => Strategy::Transform,
            (false, false) => Strategy::Portal,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::InPlace => "in-place",
            Strategy::Portal => "portal",
            Strategy::Transform => "transform",
        };
        f.write_str(name)
    }
}

/// Inputs to the engine that do not change between repositions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionOptions {
    pub strategy: Strategy,
    pub horizontal: HorizontalPosition,
    pub vertical: VerticalPosition,
    pub match_trigger_width: MatchTriggerWidth,
}

impl PositionOptions {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            ..Self::default()
        }
    }

    crate::builder_field!(horizontal, HorizontalPosition);
    crate::builder_field!(vertical, VerticalPosition);
    crate::builder_field!(match_trigger_width, MatchTriggerWidth);
}
