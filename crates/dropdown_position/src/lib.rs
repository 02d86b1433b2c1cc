//! dropdown_position - geometry and placement for floating dropdown panels
//!
//! This crate has no host access: callers measure the trigger, the panel and
//! the viewport, and apply the returned [`PositionDecision`] themselves.

mod macros;

pub mod constants;
mod error;
mod event;
mod geometry;
pub mod position;
mod throttle;

pub use error::OptionError;
pub use event::{Event, Key};
pub use geometry::{Point, Rect, Viewport};
pub use position::{
    HorizontalPosition, HorizontalSide, Hysteresis, MatchTriggerWidth, Measurements, Offset,
    PanelPatch, PositionDecision, PositionEngine, PositionOptions, Strategy, StylePatch,
    TransformPatch, VerticalPosition, VerticalSide,
};
pub use throttle::{Throttle, Throttled};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::event::{Event, Key};
    pub use crate::geometry::{Point, Rect, Viewport};
    pub use crate::position::{
        HorizontalPosition, MatchTriggerWidth, PositionDecision, PositionEngine,
        PositionOptions, Strategy, VerticalPosition,
    };
}
