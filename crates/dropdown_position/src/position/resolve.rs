//! Side resolution for each axis.

use super::{
    HorizontalPosition, HorizontalSide, Measurements, MatchTriggerWidth, PositionOptions,
    VerticalPosition, VerticalSide,
};
use crate::Rect;

/// In-place rendering only has to avoid the right edge of the viewport.
pub(super) fn in_place_horizontal(requested: HorizontalPosition, m: &Measurements) -> HorizontalSide {
    match requested {
        HorizontalPosition::Auto => {
            if m.trigger.left + m.panel.width > m.viewport.right() {
                HorizontalSide::Right
            } else {
                HorizontalSide::Left
            }
        }
        HorizontalPosition::Left => HorizontalSide::Left,
        HorizontalPosition::Right => HorizontalSide::Right,
        HorizontalPosition::Center => HorizontalSide::Center,
    }
}

/// Portal rendering: prefer the side with room, otherwise stick to the last one.
pub(super) fn portal_horizontal(
    options: &PositionOptions,
    m: &Measurements,
    panel_width: f64,
    previous: Option<HorizontalSide>,
) -> HorizontalSide {
    match options.horizontal {
        HorizontalPosition::Left => HorizontalSide::Left,
        HorizontalPosition::Right => HorizontalSide::Right,
        HorizontalPosition::Center => HorizontalSide::Center,
        HorizontalPosition::Auto => {
            if options.match_trigger_width == MatchTriggerWidth::ExtendLeftward {
                return HorizontalSide::Right;
            }
            let trigger_left = m.trigger.left;
            let room_for_right = m.viewport.right() - trigger_left;

            if room_for_right < panel_width {
                HorizontalSide::Right
            } else if trigger_left < panel_width {
                HorizontalSide::Left
            } else {
                previous.unwrap_or(HorizontalSide::Left)
            }
        }
    }
}

/// Left edge of the panel for a resolved side.
pub(super) fn panel_left(side: HorizontalSide, trigger: &Rect, panel_width: f64) -> f64 {
    match side {
        HorizontalSide::Left => trigger.left,
        HorizontalSide::Right => trigger.left + trigger.width - panel_width,
        HorizontalSide::Center => trigger.left + (trigger.width - panel_width) / 2.0,
    }
}

/// Vertical side with hysteresis.
///
/// The panel only changes side when the current side has no room and the
/// other side does. With no previous side it prefers below.
pub(super) fn vertical(
    requested: VerticalPosition,
    m: &Measurements,
    previous: Option<VerticalSide>,
) -> VerticalSide {
    match requested {
        VerticalPosition::Above => VerticalSide::Above,
        VerticalPosition::Below => VerticalSide::Below,
        VerticalPosition::Auto => {
            let trigger_top_with_scroll = m.trigger.top + m.viewport.scroll_top;
            let enough_room_below = trigger_top_with_scroll + m.trigger.height + m.panel.height
                < m.viewport.bottom();
            let enough_room_above = m.trigger.top > m.panel.height;

            match previous {
                Some(VerticalSide::Below) if !enough_room_below && enough_room_above => {
                    VerticalSide::Above
                }
                Some(VerticalSide::Above) if !enough_room_above && enough_room_below => {
                    VerticalSide::Below
                }
                Some(side) => side,
                None if enough_room_below => VerticalSide::Below,
                None => VerticalSide::Above,
            }
        }
    }
}
