//! basic_dropdown - a headless dropdown core
//!
//! A trigger, a floating panel and the state machine between them. The
//! controller decides when the panel is open, the positioning engine from
//! [`dropdown_position`] decides where it goes, and a watcher keeps that
//! position current while the page scrolls, resizes or the panel content
//! changes. Everything environment-specific goes through [`DropdownHost`].

mod config;
mod dropdown;
mod error;
mod hooks;
mod host;
mod ids;
pub mod replay;
mod watcher;

pub use config::{DropdownConfig, LogLevel};
pub use dropdown::{Dropdown, DropdownState};
pub use error::{ConfigError, HostError, ReplayError};
pub use hooks::{DropdownHooks, Hook, Propagation};
pub use host::{
    DropdownHost, MemoryHost, MemorySubscription, MemoryTimer, Schedule, WatchEvent, WatchSink,
};
pub use ids::{DropdownId, DropdownIds, IdGenerator};
pub use watcher::Watcher;

pub use dropdown_position::{
    Event, HorizontalPosition, HorizontalSide, Key, MatchTriggerWidth, PanelPatch,
    Point, PositionDecision, Rect, Strategy, VerticalPosition, VerticalSide, Viewport,
};

#[cfg(target_arch = "wasm32")]
pub use host::{WebHost, WebSubscription, WebTimer};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
