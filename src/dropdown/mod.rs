//! Dropdown state controller.
//!
//! [`Dropdown`] owns the open/disabled state of one dropdown, runs the
//! consumer hooks, and drives the positioning engine through its host. All
//! deferred work (the setup after opening, the watcher and its timers) is held
//! as host guards, so closing or dropping the controller cancels it.

#[cfg(test)]
mod tests;

use dropdown_position::{
    Event, Hysteresis, Key, Measurements, PositionDecision, PositionEngine,
};
use serde::Serialize;

use crate::config::DropdownConfig;
use crate::error::ConfigError;
use crate::hooks::{DropdownHooks, Propagation};
use crate::host::{DropdownHost, MemoryHost, Schedule, WatchEvent};
use crate::ids::{DropdownId, DropdownIds, IdGenerator};
use crate::watcher::Watcher;

/// Snapshot of a dropdown's public state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DropdownState {
    pub id: DropdownId,
    pub is_open: bool,
    pub disabled: bool,
}

impl DropdownState {
    /// Closed state.
    pub fn new(id: DropdownId, disabled: bool) -> Self {
        Self {
            id,
            is_open: false,
            disabled,
        }
    }
}

type StateListener = Box<dyn Fn(&DropdownState)>;

pub struct Dropdown<H: DropdownHost> {
    host: H,
    state: DropdownState,
    ids: DropdownIds,
    config: DropdownConfig,
    engine: PositionEngine,
    hooks: DropdownHooks,
    listeners: Vec<StateListener>,
    /// Present exactly while open and set up.
    watcher: Option<Watcher<H>>,
    /// Deferred setup scheduled by `open`, waiting for the next render.
    pending_setup: Option<H::Timer>,
    decision: Option<PositionDecision>,
}

impl<H: DropdownHost> Dropdown<H> {
    /// Create a dropdown, taking its id from `ids`.
    pub fn new(host: H, config: DropdownConfig, ids: &IdGenerator) -> Result<Self, ConfigError> {
        config.validate()?;

        let id = ids.next_id();
        let element_ids = DropdownIds::for_id(id)
            .with_overrides(config.trigger_id.as_deref(), config.panel_id.as_deref());
        let mut dropdown = Self {
            state: DropdownState::new(id, config.disabled),
            ids: element_ids,
            engine: PositionEngine::new(config.position_options()),
            hooks: DropdownHooks::default(),
            listeners: Vec::new(),
            watcher: None,
            pending_setup: None,
            decision: None,
            config,
            host,
        };

        if dropdown.config.initially_opened && !dropdown.state.disabled {
            dropdown.state.is_open = true;
            dropdown.schedule_setup();
        }

        log::debug!(
            "Dropdown {}: created ({}, open: {})",
            id,
            dropdown.engine.options().strategy,
            dropdown.state.is_open
        );
        Ok(dropdown)
    }

    pub fn with_hooks(mut self, hooks: DropdownHooks) -> Self {
        self.set_hooks(hooks);
        self
    }

    /// Replace all hooks.
    pub fn set_hooks(&mut self, hooks: DropdownHooks) {
        self.hooks = hooks;
    }

    /// Register an observer that receives every new state snapshot.
    pub fn on_state_change<F>(&mut self, listener: F)
    where
        F: Fn(&DropdownState) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn state(&self) -> DropdownState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    pub fn ids(&self) -> &DropdownIds {
        &self.ids
    }

    pub fn config(&self) -> &DropdownConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// The decision applied by the last reposition while open.
    pub fn decision(&self) -> Option<&PositionDecision> {
        self.decision.as_ref()
    }

    pub fn hysteresis(&self) -> Hysteresis {
        self.engine.hysteresis()
    }

    /// Whether the watcher is subscribed.
    pub fn is_watching(&self) -> bool {
        self.watcher.is_some()
    }

    /// Open the panel. Returns whether the state changed.
    pub fn open(&mut self, event: &Event) -> bool {
        if self.state.disabled || self.state.is_open {
            return false;
        }
        if !self.hooks.on_open.allows(&self.state, event) {
            log::debug!("Dropdown {}: open vetoed", self.state.id);
            return false;
        }

        self.state.is_open = true;
        self.engine.reset();
        self.decision = None;
        self.schedule_setup();
        log::debug!("Dropdown {}: opened", self.state.id);
        self.notify();
        true
    }

    /// Close the panel. Focus returns to the trigger unless `skip_focus` is
    /// set. Returns whether the state changed.
    pub fn close(&mut self, event: &Event, skip_focus: bool) -> bool {
        if self.state.disabled || !self.state.is_open {
            return false;
        }
        if !self.hooks.on_close.allows(&self.state, event) {
            log::debug!("Dropdown {}: close vetoed", self.state.id);
            return false;
        }

        self.finish_close(skip_focus);
        true
    }

    pub fn toggle(&mut self, event: &Event) -> bool {
        if self.state.is_open {
            self.close(event, false)
        } else {
            self.open(event)
        }
    }

    /// Close if open, then refuse all transitions until enabled again.
    ///
    /// The close cannot be vetoed; `on_close` still runs so consumers see it.
    pub fn disable(&mut self) {
        if self.state.disabled {
            return;
        }
        if self.state.is_open {
            let _ = self.hooks.on_close.call(&self.state, &Event::Programmatic);
            self.finish_close(false);
        }
        self.state.disabled = true;
        log::debug!("Dropdown {}: disabled", self.state.id);
        self.notify();
    }

    /// Allow transitions again. The open state is left as it is.
    pub fn enable(&mut self) {
        if !self.state.disabled {
            return;
        }
        self.state.disabled = false;
        log::debug!("Dropdown {}: enabled", self.state.id);
        self.notify();
    }

    /// Follow an external `disabled` attribute.
    pub fn set_disabled(&mut self, disabled: bool) {
        if disabled {
            self.disable();
        } else {
            self.enable();
        }
    }

    /// Measure, compute and apply a new position right away.
    ///
    /// Does nothing while closed or when either element cannot be measured.
    pub fn reposition(&mut self) -> Option<&PositionDecision> {
        if !self.state.is_open {
            return None;
        }
        let Some(trigger) = self.host.measure(&self.ids.trigger) else {
            log::trace!("Dropdown {}: trigger not rendered", self.state.id);
            return None;
        };
        let Some(panel) = self.host.measure(&self.ids.panel) else {
            log::trace!("Dropdown {}: panel not rendered", self.state.id);
            return None;
        };

        let measurements = Measurements::new(trigger, panel, self.host.viewport())
            .with_translate(self.host.current_translate(&self.ids.panel));
        let decision = self.engine.reposition(&measurements);
        self.host.apply_position(&self.ids.panel, &decision);
        self.decision = Some(decision);
        self.decision.as_ref()
    }

    /// Keyboard handling on the trigger: Enter toggles, Escape closes.
    pub fn handle_keydown(&mut self, event: &Event) {
        if self.hooks.on_keydown.call(&self.state, event) == Some(Propagation::Stop) {
            return;
        }
        match event {
            Event::KeyDown {
                key: Key::Enter, ..
            } => {
                self.toggle(event);
            }
            Event::KeyDown {
                key: Key::Escape, ..
            } => {
                self.close(event, false);
            }
            _ => {}
        }
    }

    pub fn handle_focus(&mut self, event: &Event) {
        let _ = self.hooks.on_focus.call(&self.state, event);
    }

    /// Entry point for everything a host delivers.
    pub fn handle_watch_event(&mut self, event: WatchEvent) {
        match event {
            WatchEvent::RenderSettled => self.settle(),
            WatchEvent::ThrottleElapsed => {
                if let Some(watcher) = self.watcher.as_mut() {
                    watcher.flush(&self.host);
                }
            }
            WatchEvent::PointerDown(pointer) => self.handle_pointer_down(&pointer),
            event if event.is_layout_change() => {
                if let Some(watcher) = self.watcher.as_mut() {
                    log::trace!("Dropdown {}: {:?}", self.state.id, event);
                    watcher.track(&self.host);
                }
            }
            _ => {}
        }
    }

    fn schedule_setup(&mut self) {
        self.pending_setup = Some(
            self.host
                .schedule(Schedule::AfterRender, WatchEvent::RenderSettled),
        );
    }

    /// Render finished: start watching on the first pass, then reposition.
    fn settle(&mut self) {
        if !self.state.is_open {
            return;
        }
        self.pending_setup = None;
        match self.watcher.as_mut() {
            Some(watcher) => watcher.settled(),
            None => {
                self.watcher = Some(Watcher::start(
                    &self.host,
                    &self.ids,
                    self.config.throttle_interval(),
                ));
            }
        }
        self.reposition();
    }

    fn handle_pointer_down(&mut self, event: &Event) {
        if !self.state.is_open || self.is_inside(event) {
            return;
        }
        log::debug!("Dropdown {}: outside pointer-down", self.state.id);
        self.close(event, true);
    }

    /// Whether a pointer event landed on the trigger or the panel.
    fn is_inside(&self, event: &Event) -> bool {
        let Event::PointerDown { position, path } = event else {
            return true;
        };
        if !path.is_empty() {
            return path
                .iter()
                .any(|id| *id == self.ids.trigger || *id == self.ids.panel);
        }
        [&self.ids.trigger, &self.ids.panel]
            .into_iter()
            .filter_map(|id| self.host.measure(id))
            .any(|rect| rect.contains(*position))
    }

    fn finish_close(&mut self, skip_focus: bool) {
        self.state.is_open = false;
        self.watcher = None;
        self.pending_setup = None;
        self.engine.reset();
        self.decision = None;
        log::debug!("Dropdown {}: closed", self.state.id);
        self.notify();

        if !skip_focus && self.host.is_focusable(&self.ids.trigger) {
            self.host.focus(&self.ids.trigger);
        }
    }

    fn notify(&self) {
        for listener in &self.listeners {
            listener(&self.state);
        }
    }
}

impl Dropdown<MemoryHost> {
    /// Deliver queued host events until nothing is due. Returns how many
    /// events were handled.
    pub fn run_pending(&mut self) -> usize {
        let mut handled = 0;
        loop {
            let due = self.host.take_due();
            if due.is_empty() {
                return handled;
            }
            for event in due {
                self.handle_watch_event(event);
                handled += 1;
            }
        }
    }
}
