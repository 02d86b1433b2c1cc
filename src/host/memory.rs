//! In-memory host with settable geometry and a manual event queue.
//!
//! Nothing happens on its own: geometry changes through setters, time moves
//! through [`MemoryHost::advance`], and queued events are handed out by
//! [`MemoryHost::take_due`]. Cloning the host shares the same state, so a test
//! can keep a handle while the dropdown owns another.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

use dropdown_position::{Point, PositionDecision, Rect, Viewport};
use web_time::Instant;

use super::{DropdownHost, Schedule, WatchEvent};
use crate::ids::DropdownIds;

#[derive(Debug)]
struct Queued {
    /// `None` fires on the next render pass.
    due: Option<Instant>,
    event: WatchEvent,
    cancelled: Rc<Cell<bool>>,
}

#[derive(Debug)]
struct MemoryState {
    now: Instant,
    viewport: Viewport,
    rects: HashMap<String, Rect>,
    translates: HashMap<String, Point>,
    unfocusable: HashSet<String>,
    focused: Option<String>,
    applied: Vec<PositionDecision>,
    active_subscriptions: usize,
    total_subscriptions: usize,
    queue: Vec<Queued>,
}

/// Headless [`DropdownHost`].
#[derive(Debug, Clone)]
pub struct MemoryHost {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryHost {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            state: Rc::new(RefCell::new(MemoryState {
                now: Instant::now(),
                viewport,
                rects: HashMap::new(),
                translates: HashMap::new(),
                unfocusable: HashSet::new(),
                focused: None,
                applied: Vec::new(),
                active_subscriptions: 0,
                total_subscriptions: 0,
                queue: Vec::new(),
            })),
        }
    }

    pub fn set_rect(&self, id: &str, rect: Rect) {
        self.state.borrow_mut().rects.insert(id.to_string(), rect);
    }

    /// Remove an element, as if it left the document.
    pub fn remove(&self, id: &str) {
        self.state.borrow_mut().rects.remove(id);
    }

    pub fn rect(&self, id: &str) -> Option<Rect> {
        self.state.borrow().rects.get(id).copied()
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.state.borrow_mut().viewport = viewport;
    }

    /// Elements are focusable unless marked otherwise.
    pub fn set_focusable(&self, id: &str, focusable: bool) {
        let mut state = self.state.borrow_mut();
        if focusable {
            state.unfocusable.remove(id);
        } else {
            state.unfocusable.insert(id.to_string());
        }
    }

    pub fn focused(&self) -> Option<String> {
        self.state.borrow().focused.clone()
    }

    pub fn blur(&self) {
        self.state.borrow_mut().focused = None;
    }

    pub fn advance(&self, by: Duration) {
        let mut state = self.state.borrow_mut();
        state.now += by;
    }

    /// Decisions applied so far, oldest first.
    pub fn applied(&self) -> Vec<PositionDecision> {
        self.state.borrow().applied.clone()
    }

    pub fn last_applied(&self) -> Option<PositionDecision> {
        self.state.borrow().applied.last().cloned()
    }

    pub fn active_subscriptions(&self) -> usize {
        self.state.borrow().active_subscriptions
    }

    /// Number of times `subscribe` was called.
    pub fn total_subscriptions(&self) -> usize {
        self.state.borrow().total_subscriptions
    }

    /// Queued events that have not been cancelled.
    pub fn pending(&self) -> usize {
        self.state
            .borrow()
            .queue
            .iter()
            .filter(|q| !q.cancelled.get())
            .count()
    }

    /// Raise a listener event. Dropped when nothing is subscribed, as a real
    /// event with no listeners would be.
    pub fn fire(&self, event: WatchEvent) -> bool {
        let mut state = self.state.borrow_mut();
        if state.active_subscriptions == 0 {
            return false;
        }
        let now = state.now;
        state.queue.push(Queued {
            due: Some(now),
            event,
            cancelled: Rc::new(Cell::new(false)),
        });
        true
    }

    /// Remove and return every event that is due, in queue order.
    pub fn take_due(&self) -> Vec<WatchEvent> {
        let mut state = self.state.borrow_mut();
        let now = state.now;
        let queue = std::mem::take(&mut state.queue);
        let mut due = Vec::new();
        for queued in queue {
            if queued.cancelled.get() {
                continue;
            }
            match queued.due {
                Some(at) if at > now => state.queue.push(queued),
                _ => due.push(queued.event),
            }
        }
        due
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new(Viewport::sized(1024.0, 768.0))
    }
}

impl DropdownHost for MemoryHost {
    type Subscription = MemorySubscription;
    type Timer = MemoryTimer;

    fn now(&self) -> Instant {
        self.state.borrow().now
    }

    fn measure(&self, id: &str) -> Option<Rect> {
        self.rect(id)
    }

    fn viewport(&self) -> Viewport {
        self.state.borrow().viewport
    }

    fn current_translate(&self, id: &str) -> Point {
        self.state
            .borrow()
            .translates
            .get(id)
            .copied()
            .unwrap_or_default()
    }

    fn apply_position(&self, panel_id: &str, decision: &PositionDecision) {
        let mut state = self.state.borrow_mut();
        // Move the panel where a browser would lay it out
        if let Some(placement) = decision.placement {
            let scroll_top = state.viewport.scroll_top;
            state.rects.insert(
                panel_id.to_string(),
                Rect::new(
                    placement.left,
                    placement.top - scroll_top,
                    placement.width,
                    placement.height,
                ),
            );
        }
        if let Some(translate) = decision.patch.translate() {
            state.translates.insert(panel_id.to_string(), translate);
        }
        state.applied.push(decision.clone());
    }

    fn is_focusable(&self, id: &str) -> bool {
        let state = self.state.borrow();
        state.rects.contains_key(id) && !state.unfocusable.contains(id)
    }

    fn focus(&self, id: &str) {
        self.state.borrow_mut().focused = Some(id.to_string());
    }

    fn subscribe(&self, ids: &DropdownIds) -> MemorySubscription {
        let mut state = self.state.borrow_mut();
        state.active_subscriptions += 1;
        state.total_subscriptions += 1;
        log::trace!("MemoryHost: subscribed for {}", ids.panel);
        MemorySubscription {
            state: Rc::clone(&self.state),
        }
    }

    fn schedule(&self, when: Schedule, event: WatchEvent) -> MemoryTimer {
        let mut state = self.state.borrow_mut();
        let due = match when {
            Schedule::AfterRender => None,
            Schedule::After(delay) => Some(state.now + delay),
        };
        let cancelled = Rc::new(Cell::new(false));
        state.queue.push(Queued {
            due,
            event,
            cancelled: Rc::clone(&cancelled),
        });
        MemoryTimer { cancelled }
    }
}

/// Listener guard for [`MemoryHost`].
#[derive(Debug)]
pub struct MemorySubscription {
    state: Rc<RefCell<MemoryState>>,
}

impl Drop for MemorySubscription {
    fn drop(&mut self) {
        let mut state = self.state.borrow_mut();
        state.active_subscriptions = state.active_subscriptions.saturating_sub(1);
    }
}

/// Timer guard for [`MemoryHost`].
#[derive(Debug)]
pub struct MemoryTimer {
    cancelled: Rc<Cell<bool>>,
}

impl Drop for MemoryTimer {
    fn drop(&mut self) {
        self.cancelled.set(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fire_without_subscription_is_dropped() {
        let host = MemoryHost::default();
        assert!(!host.fire(WatchEvent::Scroll));
        assert!(host.take_due().is_empty());
    }

    #[test]
    fn test_subscription_guard_unsubscribes() {
        let host = MemoryHost::default();
        let ids = DropdownIds {
            trigger: "t".into(),
            panel: "p".into(),
        };

        let guard = host.subscribe(&ids);
        assert_eq!(host.active_subscriptions(), 1);
        assert!(host.fire(WatchEvent::Resize));

        drop(guard);
        assert_eq!(host.active_subscriptions(), 0);
        assert_eq!(host.total_subscriptions(), 1);
    }

    #[test]
    fn test_delayed_timer_waits_for_clock() {
        let host = MemoryHost::default();
        let _timer = host.schedule(
            Schedule::After(Duration::from_millis(60)),
            WatchEvent::ThrottleElapsed,
        );

        assert!(host.take_due().is_empty());
        host.advance(Duration::from_millis(60));
        assert_eq!(host.take_due(), vec![WatchEvent::ThrottleElapsed]);
    }

    #[test]
    fn test_dropped_timer_is_cancelled() {
        let host = MemoryHost::default();
        let timer = host.schedule(Schedule::AfterRender, WatchEvent::RenderSettled);
        assert_eq!(host.pending(), 1);

        drop(timer);
        assert_eq!(host.pending(), 0);
        assert!(host.take_due().is_empty());
    }
}
