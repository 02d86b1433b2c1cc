//! Scenario replay over [`MemoryHost`].
//!
//! A scenario is a JSON document with a configuration, the starting geometry
//! and a list of steps. Each step is applied to a real [`Dropdown`], queued
//! host events are delivered, and a [`StepReport`] captures the resulting
//! state and decision.
//!
//! ```json
//! {
//!   "config": { "horizontalPosition": "auto" },
//!   "viewport": { "inner_width": 760, "inner_height": 600 },
//!   "trigger": { "left": 700, "top": 100, "width": 50, "height": 20 },
//!   "panel": { "left": 0, "top": 0, "width": 200, "height": 100 },
//!   "steps": [{ "action": "open" }, { "action": "scroll", "top": 40 }]
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use dropdown_position::{Event, Key, Point, PositionDecision, Rect, Viewport};
use serde::{Deserialize, Serialize};

use crate::config::{DropdownConfig, LogLevel};
use crate::dropdown::{Dropdown, DropdownState};
use crate::error::ReplayError;
use crate::host::{DropdownHost, MemoryHost, WatchEvent};
use crate::ids::IdGenerator;

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub config: DropdownConfig,
    #[serde(default)]
    pub log_level: LogLevel,
    pub viewport: Viewport,
    pub trigger: Rect,
    pub panel: Rect,
    pub steps: Vec<Step>,
}

/// One scripted action.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Open,
    Close {
        #[serde(default)]
        skip_focus: bool,
    },
    Toggle,
    Reposition,
    Disable,
    Enable,
    /// Key pressed on the trigger, as a DOM key name
    Key { key: String },
    /// Pointer pressed in the document
    Pointer {
        x: f64,
        y: f64,
        #[serde(default)]
        path: Vec<String>,
    },
    /// Scroll the window to an absolute offset. The trigger scrolls with the page.
    Scroll {
        #[serde(default)]
        left: f64,
        #[serde(default)]
        top: f64,
    },
    Resize { width: f64, height: f64 },
    /// Move the trigger without notifying anything
    MoveTrigger { rect: Rect },
    /// Change the panel size, as a content mutation would
    ResizePanel { width: f64, height: f64 },
    /// Advance the clock
    Wait { ms: u64 },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::Open => "open",
            Step::Close { .. } => "close",
            Step::Toggle => "toggle",
            Step::Reposition => "reposition",
            Step::Disable => "disable",
            Step::Enable => "enable",
            Step::Key { .. } => "key",
            Step::Pointer { .. } => "pointer",
            Step::Scroll { .. } => "scroll",
            Step::Resize { .. } => "resize",
            Step::MoveTrigger { .. } => "move_trigger",
            Step::ResizePanel { .. } => "resize_panel",
            Step::Wait { .. } => "wait",
        }
    }
}

/// Outcome of one step.
#[derive(Debug, Clone, Serialize)]
pub struct StepReport {
    pub step: usize,
    pub action: &'static str,
    pub state: DropdownState,
    pub decision: Option<PositionDecision>,
    /// Host events delivered while settling this step
    pub events: usize,
}

/// Read a scenario file.
pub fn load(path: &Path) -> Result<Scenario, ReplayError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Run every step and report after each.
pub fn run(scenario: &Scenario) -> Result<Vec<StepReport>, ReplayError> {
    if scenario.steps.is_empty() {
        return Err(ReplayError::NoSteps);
    }

    let host = MemoryHost::new(scenario.viewport);
    let mut dropdown = Dropdown::new(host.clone(), scenario.config.clone(), &IdGenerator::new())?;
    let ids = dropdown.ids().clone();
    host.set_rect(&ids.trigger, scenario.trigger);
    host.set_rect(&ids.panel, scenario.panel);
    log::info!(
        "Replaying {} steps ({})",
        scenario.steps.len(),
        dropdown.config().strategy()
    );

    let mut reports = Vec::with_capacity(scenario.steps.len());
    for (index, step) in scenario.steps.iter().enumerate() {
        log::debug!("Step {}: {:?}", index, step);
        apply(&mut dropdown, &host, step);
        let events = dropdown.run_pending();
        reports.push(StepReport {
            step: index,
            action: step.name(),
            state: dropdown.state(),
            decision: dropdown.decision().cloned(),
            events,
        });
    }
    Ok(reports)
}

fn apply(dropdown: &mut Dropdown<MemoryHost>, host: &MemoryHost, step: &Step) {
    let trigger_id = dropdown.ids().trigger.clone();
    let panel_id = dropdown.ids().panel.clone();

    match step {
        Step::Open => {
            dropdown.open(&Event::Programmatic);
        }
        Step::Close { skip_focus } => {
            dropdown.close(&Event::Programmatic, *skip_focus);
        }
        Step::Toggle => {
            dropdown.toggle(&Event::Programmatic);
        }
        Step::Reposition => {
            dropdown.reposition();
        }
        Step::Disable => dropdown.disable(),
        Step::Enable => dropdown.enable(),
        Step::Key { key } => dropdown.handle_keydown(&Event::key(Key::from_dom(key))),
        Step::Pointer { x, y, path } => {
            host.fire(WatchEvent::PointerDown(Event::PointerDown {
                position: Point::new(*x, *y),
                path: path.clone(),
            }));
        }
        Step::Scroll { left, top } => {
            let mut viewport = host.viewport();
            let (dx, dy) = (left - viewport.scroll_left, top - viewport.scroll_top);
            viewport.scroll_left = *left;
            viewport.scroll_top = *top;
            host.set_viewport(viewport);
            if let Some(trigger) = host.rect(&trigger_id) {
                host.set_rect(&trigger_id, trigger.translate(-dx, -dy));
            }
            host.fire(WatchEvent::Scroll);
        }
        Step::Resize { width, height } => {
            let mut viewport = host.viewport();
            viewport.inner_width = *width;
            viewport.inner_height = *height;
            host.set_viewport(viewport);
            host.fire(WatchEvent::Resize);
        }
        Step::MoveTrigger { rect } => host.set_rect(&trigger_id, *rect),
        Step::ResizePanel { width, height } => {
            let panel = host.rect(&panel_id).unwrap_or_default();
            host.set_rect(
                &panel_id,
                Rect::new(panel.left, panel.top, *width, *height),
            );
            host.fire(WatchEvent::ContentMutation);
        }
        Step::Wait { ms } => host.advance(Duration::from_millis(*ms)),
    }
}
