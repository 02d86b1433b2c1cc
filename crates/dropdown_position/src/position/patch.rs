//! Presentation patches produced by the engine.

use serde::Serialize;

use super::{HorizontalSide, Measurements, MatchTriggerWidth};
use crate::constants::CSS_AUTO;
use crate::{Point, Rect, Viewport};

fn px(value: f64) -> String {
    format!("{}px", value)
}

/// A CSS offset that is either a pixel value or `auto`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(into = "String")]
pub enum Offset {
    Px(f64),
    Auto,
}

impl Offset {
    pub fn css(&self) -> String {
        match self {
            Offset::Px(value) => px(*value),
            Offset::Auto => CSS_AUTO.to_string(),
        }
    }
}

impl From<Offset> for String {
    fn from(offset: Offset) -> Self {
        offset.css()
    }
}

/// Absolute coordinates for a portaled panel.
///
/// Exactly one of `left`/`right` carries a value; the other is `auto`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StylePatch {
    pub top: f64,
    pub left: Offset,
    pub right: Offset,
    pub width: Option<f64>,
    pub min_width: Option<f64>,
}

impl StylePatch {
    pub(super) fn for_placement(
        side: HorizontalSide,
        placement: &Rect,
        trigger: &Rect,
        viewport: &Viewport,
        match_trigger_width: MatchTriggerWidth,
    ) -> Self {
        let (left, right) = match side {
            HorizontalSide::Right => (
                Offset::Auto,
                Offset::Px(viewport.right() - (trigger.width + trigger.left)),
            ),
            HorizontalSide::Left | HorizontalSide::Center => {
                (Offset::Px(placement.left), Offset::Auto)
            }
        };
        Self {
            top: placement.top,
            left,
            right,
            width: (match_trigger_width == MatchTriggerWidth::On).then_some(placement.width),
            min_width: (match_trigger_width == MatchTriggerWidth::ExtendLeftward)
                .then_some(trigger.width),
        }
    }

    pub fn properties(&self) -> Vec<(&'static str, String)> {
        let mut props = vec![
            ("top", px(self.top)),
            ("left", self.left.css()),
            ("right", self.right.css()),
        ];
        if let Some(width) = self.width {
            props.push(("width", px(width)));
        }
        if let Some(min_width) = self.min_width {
            props.push(("min-width", px(min_width)));
        }
        props
    }
}

/// Translation for a panel that is moved with CSS transforms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TransformPatch {
    /// Total translation to apply, already composed with the current one.
    pub translate: Point,
    pub width: Option<f64>,
    pub min_width: Option<f64>,
}

impl TransformPatch {
    /// Translation that moves the panel onto `target`.
    ///
    /// The measured panel rect already includes the current translation, so
    /// that translation is removed first to find the untransformed origin.
    pub(super) fn toward(
        target: &Rect,
        m: &Measurements,
        match_trigger_width: MatchTriggerWidth,
    ) -> Self {
        let origin_left = m.panel.left - m.current_translate.x;
        let origin_top = m.panel.top + m.viewport.scroll_top - m.current_translate.y;
        Self {
            translate: Point::new(target.left - origin_left, target.top - origin_top),
            width: (match_trigger_width == MatchTriggerWidth::On).then_some(target.width),
            min_width: (match_trigger_width == MatchTriggerWidth::ExtendLeftward)
                .then_some(m.trigger.width),
        }
    }

    pub fn css_transform(&self) -> String {
        format!("translate({}px, {}px)", self.translate.x, self.translate.y)
    }

    /// Read back a translation written by [`css_transform`](Self::css_transform).
    ///
    /// Anything that is not a plain `translate(Xpx, Ypx)` yields `None`.
    pub fn parse_translate(css: &str) -> Option<Point> {
        let inner = css.trim().strip_prefix("translate(")?.strip_suffix(')')?;
        let (x, y) = inner.split_once(',')?;
        let axis = |value: &str| value.trim().strip_suffix("px")?.trim().parse::<f64>().ok();
        Some(Point::new(axis(x)?, axis(y)?))
    }

    pub fn properties(&self) -> Vec<(&'static str, String)> {
        let mut props = vec![("transform", self.css_transform())];
        if let Some(width) = self.width {
            props.push(("width", px(width)));
        }
        if let Some(min_width) = self.min_width {
            props.push(("min-width", px(min_width)));
        }
        props
    }
}

/// What a host writes to the panel element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PanelPatch {
    /// In-place rendering: only side classes change.
    None,
    Style(StylePatch),
    Transform(TransformPatch),
}

impl PanelPatch {
    /// CSS property/value pairs to set on the panel.
    pub fn properties(&self) -> Vec<(&'static str, String)> {
        match self {
            PanelPatch::None => Vec::new(),
            PanelPatch::Style(style) => style.properties(),
            PanelPatch::Transform(transform) => transform.properties(),
        }
    }

    pub fn translate(&self) -> Option<Point> {
        match self {
            PanelPatch::Transform(transform) => Some(transform.translate),
            _ => None,
        }
    }
}
