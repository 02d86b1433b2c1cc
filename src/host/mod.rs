//! The environment a dropdown runs in.
//!
//! A [`DropdownHost`] measures elements, writes the panel's position, moves
//! focus, installs event listeners and schedules deferred work. The controller
//! never touches a document directly, which keeps it testable against
//! [`MemoryHost`] and portable to the browser through `WebHost`.
//!
//! Listener registrations and timers are returned as guard values. Dropping a
//! guard removes the listeners or cancels the timer, so the controller only has
//! to drop what it owns to tear everything down.

mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

pub use memory::{MemoryHost, MemorySubscription, MemoryTimer};
#[cfg(target_arch = "wasm32")]
pub use web::{WebHost, WebSubscription, WebTimer};

use std::rc::Rc;
use std::time::Duration;

use dropdown_position::{Event, Point, PositionDecision, Rect, Viewport};
use web_time::Instant;

use crate::ids::DropdownIds;

/// Something the host reports back to the dropdown.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent {
    /// Window scrolled.
    Scroll,
    /// Window resized.
    Resize,
    /// Device orientation changed.
    OrientationChange,
    /// Nodes were added to or removed from the panel subtree.
    ContentMutation,
    /// Pointer pressed anywhere in the document (capture phase).
    PointerDown(Event),
    /// A throttle timer elapsed.
    ThrottleElapsed,
    /// Pending render work finished; layout is up to date.
    RenderSettled,
}

impl WatchEvent {
    /// Events that only ask for a fresh position.
    pub fn is_layout_change(&self) -> bool {
        matches!(
            self,
            WatchEvent::Scroll
                | WatchEvent::Resize
                | WatchEvent::OrientationChange
                | WatchEvent::ContentMutation
        )
    }
}

/// Callback through which a host delivers [`WatchEvent`]s.
pub type WatchSink = Rc<dyn Fn(WatchEvent)>;

/// When a scheduled event should fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// After the host's pending render work (next animation frame in a browser).
    AfterRender,
    /// After a delay.
    After(Duration),
}

/// Host environment services used by the controller.
pub trait DropdownHost {
    /// Listener registration. Dropping it unsubscribes everything.
    type Subscription;
    /// Scheduled callback. Dropping it cancels the callback.
    type Timer;

    /// Current time, used for throttling.
    fn now(&self) -> Instant;

    /// Bounding box of the element with `id`, or `None` if it is not rendered.
    fn measure(&self, id: &str) -> Option<Rect>;

    /// Current scroll offsets and window size.
    fn viewport(&self) -> Viewport;

    /// Translation currently applied to the element, for transform positioning.
    fn current_translate(&self, id: &str) -> Point {
        let _ = id;
        Point::zero()
    }

    /// Write a position decision to the panel.
    fn apply_position(&self, panel_id: &str, decision: &PositionDecision);

    /// Whether the element can receive keyboard focus (tab index > -1).
    fn is_focusable(&self, id: &str) -> bool;

    fn focus(&self, id: &str);

    /// Start delivering scroll, resize, orientation, panel mutation and
    /// document pointer-down events.
    fn subscribe(&self, ids: &DropdownIds) -> Self::Subscription;

    /// Deliver `event` later.
    fn schedule(&self, when: Schedule, event: WatchEvent) -> Self::Timer;
}
