//! Layout watcher for an open dropdown.
//!
//! While a dropdown is open its panel has to follow the trigger through
//! scrolling, window resizes, orientation changes and content mutations. The
//! watcher owns the host subscription and throttles the resulting reposition
//! requests. It never repositions on its own: it schedules a
//! [`WatchEvent::RenderSettled`] and the controller repositions when that
//! arrives, after pending layout work has finished.
//!
//! Dropping the watcher drops the subscription and every armed timer, which is
//! the whole teardown.

use std::time::Duration;

use dropdown_position::{Throttle, Throttled};

use crate::host::{DropdownHost, Schedule, WatchEvent};
use crate::ids::DropdownIds;

pub struct Watcher<H: DropdownHost> {
    _subscription: H::Subscription,
    throttle: Throttle,
    /// Armed when requests were suppressed inside the throttle window.
    trailing: Option<H::Timer>,
    /// Armed while a reposition waits for the next render pass.
    deferred: Option<H::Timer>,
}

impl<H: DropdownHost> Watcher<H> {
    /// Subscribe to layout and pointer events for `ids`.
    pub fn start(host: &H, ids: &DropdownIds, interval: Duration) -> Self {
        log::debug!("Watcher: started for {}", ids.panel);
        Self {
            _subscription: host.subscribe(ids),
            throttle: Throttle::new(interval),
            trailing: None,
            deferred: None,
        }
    }

    /// A layout change was observed.
    pub fn track(&mut self, host: &H) {
        let verdict = self.throttle.request(host.now());
        self.apply(host, verdict);
    }

    /// The trailing timer elapsed.
    pub fn flush(&mut self, host: &H) {
        self.trailing = None;
        let verdict = self.throttle.flush(host.now());
        self.apply(host, verdict);
    }

    /// The deferred reposition ran.
    pub fn settled(&mut self) {
        self.deferred = None;
    }

    pub fn has_pending(&self) -> bool {
        self.trailing.is_some() || self.deferred.is_some()
    }

    fn apply(&mut self, host: &H, verdict: Throttled) {
        match verdict {
            Throttled::Fire => self.defer_reposition(host),
            Throttled::Later(remaining) => {
                self.trailing = Some(host.schedule(
                    Schedule::After(remaining),
                    WatchEvent::ThrottleElapsed,
                ));
            }
            Throttled::Skip => {}
        }
    }

    fn defer_reposition(&mut self, host: &H) {
        if self.deferred.is_none() {
            self.deferred = Some(host.schedule(Schedule::AfterRender, WatchEvent::RenderSettled));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MemoryHost;

    fn ids() -> DropdownIds {
        DropdownIds {
            trigger: "trigger".into(),
            panel: "panel".into(),
        }
    }

    #[test]
    fn test_burst_yields_leading_and_trailing_reposition() {
        let host = MemoryHost::default();
        let mut watcher = Watcher::start(&host, &ids(), Duration::from_millis(60));

        for _ in 0..5 {
            watcher.track(&host);
        }
        // One deferred reposition plus one trailing timer
        assert_eq!(host.pending(), 2);
        assert_eq!(host.take_due(), vec![WatchEvent::RenderSettled]);
        watcher.settled();

        host.advance(Duration::from_millis(60));
        assert_eq!(host.take_due(), vec![WatchEvent::ThrottleElapsed]);
        watcher.flush(&host);
        assert_eq!(host.take_due(), vec![WatchEvent::RenderSettled]);
    }

    #[test]
    fn test_drop_cancels_everything() {
        let host = MemoryHost::default();
        let mut watcher = Watcher::start(&host, &ids(), Duration::from_millis(60));
        watcher.track(&host);
        watcher.track(&host);
        assert!(watcher.has_pending());

        drop(watcher);
        assert_eq!(host.active_subscriptions(), 0);
        assert_eq!(host.pending(), 0);
    }
}
