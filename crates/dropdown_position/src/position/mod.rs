//! Positioning engine for the floating panel.
//!
//! Given the trigger and panel rectangles, the viewport and the sides chosen
//! last time, [`PositionEngine::reposition`] decides where the panel goes and
//! produces the patch a host applies to the panel element.
//!
//! Three strategies exist:
//! - [`Strategy::InPlace`]: the panel is rendered next to the trigger and flows
//!   below it naturally. Only the horizontal side is decided.
//! - [`Strategy::Portal`]: the panel lives in a detached root and is placed
//!   with absolute `top`/`left`/`right` coordinates.
//! - [`Strategy::Transform`]: like `Portal`, but the panel is moved with a
//!   translation composed on top of whatever translation it already has.
//!
//! The previous decision is kept as [`Hysteresis`] so marginal geometry does
//! not make the panel flip back and forth.

mod options;
mod patch;
mod resolve;


pub use options::{
    HorizontalPosition, HorizontalSide, MatchTriggerWidth, PositionOptions, Strategy,
    VerticalPosition, VerticalSide,
};
pub use patch::{Offset, PanelPatch, StylePatch, TransformPatch};

use serde::Serialize;

use crate::{Point, Rect, Viewport};

/// Geometry sampled from the host for a single reposition.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Measurements {
    /// Trigger bounding box.
    pub trigger: Rect,
    /// Panel bounding box, including any translation already applied.
    pub panel: Rect,
    /// Window scroll and size.
    pub viewport: Viewport,
    /// Translation currently applied to the panel. Only read by
    /// [`Strategy::Transform`].
    pub current_translate: Point,
}

impl Measurements {
    pub fn new(trigger: Rect, panel: Rect, viewport: Viewport) -> Self {
        Self {
            trigger,
            panel,
            viewport,
            current_translate: Point::zero(),
        }
    }

    pub fn with_translate(mut self, translate: Point) -> Self {
        self.current_translate = translate;
        self
    }
}

/// Sides chosen by the previous reposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Hysteresis {
    pub horizontal: Option<HorizontalSide>,
    pub vertical: Option<VerticalSide>,
}

impl Hysteresis {
    pub fn is_empty(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn remember(&mut self, decision: &PositionDecision) {
        self.horizontal = Some(decision.horizontal);
        self.vertical = decision.vertical;
    }
}

/// Result of a reposition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionDecision {
    pub horizontal: HorizontalSide,
    /// `None` for in-place rendering, where the panel flows below the trigger.
    pub vertical: Option<VerticalSide>,
    /// Resolved panel box in document space. `None` for in-place rendering.
    pub placement: Option<Rect>,
    /// What to write to the panel element.
    pub patch: PanelPatch,
}

/// Stateful wrapper that carries hysteresis between repositions.
#[derive(Debug, Clone, Default)]
pub struct PositionEngine {
    options: PositionOptions,
    hysteresis: Hysteresis,
}

impl PositionEngine {
    pub fn new(options: PositionOptions) -> Self {
        Self {
            options,
            hysteresis: Hysteresis::default(),
        }
    }

    pub fn options(&self) -> &PositionOptions {
        &self.options
    }

    pub fn hysteresis(&self) -> Hysteresis {
        self.hysteresis
    }

    /// Forget the previous sides. Called whenever the panel opens or closes.
    pub fn reset(&mut self) {
        self.hysteresis.clear();
    }

    /// Compute a new decision and remember its sides.
    pub fn reposition(&mut self, measurements: &Measurements) -> PositionDecision {
        let decision = compute(&self.options, measurements, &self.hysteresis);
        self.hysteresis.remember(&decision);
        log::trace!(
            "Reposition: {:?}/{:?} at {:?}",
            decision.horizontal,
            decision.vertical,
            decision.placement
        );
        decision
    }
}

/// Stateless core of the engine.
pub fn compute(
    options: &PositionOptions,
    m: &Measurements,
    previous: &Hysteresis,
) -> PositionDecision {
    match options.strategy {
        Strategy::InPlace => in_place(options, m),
        Strategy::Portal | Strategy::Transform => portal(options, m, previous),
    }
}

fn in_place(options: &PositionOptions, m: &Measurements) -> PositionDecision {
    let horizontal = resolve::in_place_horizontal(options.horizontal, m);
    PositionDecision {
        horizontal,
        vertical: None,
        placement: None,
        patch: PanelPatch::None,
    }
}

fn portal(options: &PositionOptions, m: &Measurements, previous: &Hysteresis) -> PositionDecision {
    let trigger = m.trigger;
    let viewport = m.viewport;
    let panel_width = options.match_trigger_width.panel_width(trigger.width, m.panel.width);

    let horizontal = resolve::portal_horizontal(options, m, panel_width, previous.horizontal);
    let vertical = resolve::vertical(options.vertical, m, previous.vertical);

    let left = resolve::panel_left(horizontal, &trigger, panel_width);
    let trigger_top_with_scroll = trigger.top + viewport.scroll_top;
    let top = match vertical {
        VerticalSide::Below => trigger_top_with_scroll + trigger.height,
        VerticalSide::Above => trigger_top_with_scroll - m.panel.height,
    };
    let placement = Rect::new(left, top, panel_width, m.panel.height);

    let patch = match options.strategy {
        Strategy::Transform => PanelPatch::Transform(TransformPatch::toward(
            &placement,
            m,
            options.match_trigger_width,
        )),
        _ => PanelPatch::Style(StylePatch::for_placement(
            horizontal,
            &placement,
            &trigger,
            &viewport,
            options.match_trigger_width,
        )),
    };

    PositionDecision {
        horizontal,
        vertical: Some(vertical),
        placement: Some(placement),
        patch,
    }
}
