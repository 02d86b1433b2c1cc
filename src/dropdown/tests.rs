use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use dropdown_position::{
    HorizontalSide, Offset, PanelPatch, Point, Rect, VerticalSide, Viewport,
};

use super::*;
use crate::hooks::DropdownHooks;

const TRIGGER: &str = "dropdown-trigger-1";
const PANEL: &str = "dropdown-content-1";

fn setup(config: DropdownConfig) -> (MemoryHost, Dropdown<MemoryHost>) {
    let host = MemoryHost::new(Viewport::sized(760.0, 600.0));
    host.set_rect(TRIGGER, Rect::new(700.0, 100.0, 50.0, 20.0));
    host.set_rect(PANEL, Rect::new(0.0, 0.0, 200.0, 100.0));
    let dropdown = Dropdown::new(host.clone(), config, &IdGenerator::new()).unwrap();
    (host, dropdown)
}

/// Open and let the deferred setup run.
fn opened(config: DropdownConfig) -> (MemoryHost, Dropdown<MemoryHost>) {
    let (host, mut dropdown) = setup(config);
    assert!(dropdown.open(&Event::Programmatic));
    dropdown.run_pending();
    (host, dropdown)
}

fn key(key: Key) -> Event {
    Event::key(key)
}

#[test]
fn test_open_defers_setup_until_render() {
    let (host, mut dropdown) = setup(DropdownConfig::default());

    assert!(dropdown.open(&Event::Programmatic));
    assert!(dropdown.is_open());
    assert_eq!(host.active_subscriptions(), 0);
    assert!(dropdown.decision().is_none());

    dropdown.run_pending();
    assert_eq!(host.active_subscriptions(), 1);
    assert!(dropdown.is_watching());

    let decision = dropdown.decision().unwrap();
    assert_eq!(decision.horizontal, HorizontalSide::Right);
    assert_eq!(decision.vertical, Some(VerticalSide::Below));
    assert_eq!(decision.placement.unwrap().left, 550.0);
    match decision.patch {
        PanelPatch::Style(style) => {
            assert_eq!(style.top, 120.0);
            assert_eq!(style.left, Offset::Auto);
            assert_eq!(style.right, Offset::Px(10.0));
        }
        other => panic!("expected style patch, got {:?}", other),
    }
    assert_eq!(host.last_applied().as_ref(), dropdown.decision());
}

#[test]
fn test_reposition_is_idempotent() {
    let (_host, mut dropdown) = opened(DropdownConfig::default());

    let first = dropdown.reposition().cloned();
    let second = dropdown.reposition().cloned();
    assert!(first.is_some());
    assert_eq!(first, second);
}

#[test]
fn test_open_veto_keeps_closed() {
    let (host, dropdown) = setup(DropdownConfig::default());
    let mut dropdown = dropdown.with_hooks(DropdownHooks::default().on_open(|_, _| false));

    assert!(!dropdown.open(&Event::Programmatic));
    assert!(!dropdown.is_open());
    dropdown.run_pending();
    assert_eq!(host.total_subscriptions(), 0);
    assert_eq!(host.pending(), 0);
}

#[test]
fn test_hook_without_opinion_allows() {
    let (_host, dropdown) = setup(DropdownConfig::default());
    let mut dropdown =
        dropdown.with_hooks(DropdownHooks::default().on_open(|state, _| !state.is_open));

    assert!(dropdown.open(&Event::Programmatic));
}

#[test]
fn test_close_veto_keeps_open() {
    let (host, dropdown) = opened(DropdownConfig::default());
    let mut dropdown = dropdown.with_hooks(DropdownHooks::default().on_close(|_, _| false));

    assert!(!dropdown.close(&Event::Programmatic, false));
    assert!(dropdown.is_open());
    assert_eq!(host.active_subscriptions(), 1);
}

#[test]
fn test_close_returns_focus_to_trigger() {
    let (host, mut dropdown) = opened(DropdownConfig::default());

    assert!(dropdown.close(&Event::Programmatic, false));
    assert!(!dropdown.is_open());
    assert_eq!(host.focused().as_deref(), Some(TRIGGER));
    assert_eq!(host.active_subscriptions(), 0);
    assert!(dropdown.decision().is_none());
    assert!(dropdown.hysteresis().is_empty());
}

#[test]
fn test_close_skips_unfocusable_trigger() {
    let (host, mut dropdown) = opened(DropdownConfig::default());
    host.set_focusable(TRIGGER, false);

    dropdown.close(&Event::Programmatic, false);
    assert_eq!(host.focused(), None);
}

#[test]
fn test_toggle() {
    let (_host, mut dropdown) = setup(DropdownConfig::default());

    assert!(dropdown.toggle(&Event::Programmatic));
    assert!(dropdown.is_open());
    assert!(dropdown.toggle(&Event::Programmatic));
    assert!(!dropdown.is_open());
}

#[test]
fn test_outside_pointer_closes_without_focus() {
    let (host, mut dropdown) = opened(DropdownConfig::default());

    assert!(host.fire(WatchEvent::PointerDown(Event::pointer_at(10.0, 500.0))));
    dropdown.run_pending();

    assert!(!dropdown.is_open());
    assert_eq!(host.focused(), None);
    assert_eq!(host.active_subscriptions(), 0);
}

#[test]
fn test_pointer_inside_panel_path_keeps_open() {
    let (host, mut dropdown) = opened(DropdownConfig::default());

    host.fire(WatchEvent::PointerDown(Event::PointerDown {
        position: Point::new(10.0, 500.0),
        path: vec!["option-3".into(), PANEL.into(), "body".into()],
    }));
    dropdown.run_pending();
    assert!(dropdown.is_open());
}

#[test]
fn test_pointer_on_trigger_rect_keeps_open() {
    let (host, mut dropdown) = opened(DropdownConfig::default());

    host.fire(WatchEvent::PointerDown(Event::pointer_at(710.0, 105.0)));
    dropdown.run_pending();
    assert!(dropdown.is_open());
}

#[test]
fn test_disable_while_open_forces_close() {
    let closes = Rc::new(Cell::new(0));
    let seen = Rc::clone(&closes);
    let (host, dropdown) = opened(DropdownConfig::default());
    let mut dropdown = dropdown.with_hooks(DropdownHooks::default().on_close(move |_, _| {
        seen.set(seen.get() + 1);
        false
    }));

    dropdown.disable();
    assert!(!dropdown.is_open());
    assert!(dropdown.state().disabled);
    assert_eq!(closes.get(), 1);
    assert_eq!(host.focused().as_deref(), Some(TRIGGER));
    assert_eq!(host.active_subscriptions(), 0);
}

#[test]
fn test_disabled_ignores_transitions_until_enabled() {
    let (_host, mut dropdown) = setup(DropdownConfig::default().disabled(true));

    assert!(!dropdown.toggle(&Event::Programmatic));
    assert!(!dropdown.open(&Event::Programmatic));
    assert!(!dropdown.is_open());

    dropdown.set_disabled(false);
    assert!(!dropdown.state().disabled);
    assert!(!dropdown.is_open());
    assert!(dropdown.toggle(&Event::Programmatic));
    assert!(dropdown.is_open());
}

#[test]
fn test_enter_toggles_and_escape_closes() {
    let (_host, mut dropdown) = setup(DropdownConfig::default());

    dropdown.handle_keydown(&key(Key::Enter));
    assert!(dropdown.is_open());
    dropdown.handle_keydown(&key(Key::Char('a')));
    assert!(dropdown.is_open());
    dropdown.handle_keydown(&key(Key::Escape));
    assert!(!dropdown.is_open());
    dropdown.handle_keydown(&key(Key::Enter));
    dropdown.handle_keydown(&key(Key::Enter));
    assert!(!dropdown.is_open());
}

#[test]
fn test_keydown_hook_can_stop_builtin_handling() {
    let (_host, dropdown) = setup(DropdownConfig::default());
    let mut dropdown = dropdown.with_hooks(
        DropdownHooks::default().on_keydown(|_, event| match event {
            Event::KeyDown {
                key: Key::Enter, ..
            } => Propagation::Stop,
            _ => Propagation::Continue,
        }),
    );

    dropdown.handle_keydown(&key(Key::Enter));
    assert!(!dropdown.is_open());
}

#[test]
fn test_focus_hook_runs() {
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    let (_host, dropdown) = setup(DropdownConfig::default());
    let mut dropdown =
        dropdown.with_hooks(DropdownHooks::default().on_focus(move |_, _| seen.set(seen.get() + 1)));

    dropdown.handle_focus(&Event::Focus);
    assert_eq!(calls.get(), 1);
    assert!(!dropdown.is_open());
}

#[test]
fn test_scroll_burst_is_throttled() {
    let (host, mut dropdown) = opened(DropdownConfig::default());
    assert_eq!(host.applied().len(), 1);

    for _ in 0..5 {
        host.fire(WatchEvent::Scroll);
    }
    dropdown.run_pending();
    // Leading edge only
    assert_eq!(host.applied().len(), 2);

    host.advance(Duration::from_millis(60));
    dropdown.run_pending();
    // One trailing flush for the rest of the burst
    assert_eq!(host.applied().len(), 3);

    dropdown.run_pending();
    assert_eq!(host.applied().len(), 3);
}

#[test]
fn test_resize_flips_panel_above() {
    let (host, mut dropdown) = opened(DropdownConfig::default());
    assert_eq!(dropdown.hysteresis().vertical, Some(VerticalSide::Below));

    host.set_rect(TRIGGER, Rect::new(700.0, 550.0, 50.0, 20.0));
    host.fire(WatchEvent::Resize);
    dropdown.run_pending();

    let decision = dropdown.decision().unwrap();
    assert_eq!(decision.vertical, Some(VerticalSide::Above));
    assert_eq!(decision.placement.unwrap().top, 450.0);
}

#[test]
fn test_content_growth_flips_panel_above() {
    let (host, mut dropdown) = setup(DropdownConfig::default());
    host.set_rect(TRIGGER, Rect::new(700.0, 300.0, 50.0, 20.0));
    assert!(dropdown.open(&Event::Programmatic));
    dropdown.run_pending();
    assert_eq!(dropdown.decision().unwrap().placement.unwrap().top, 320.0);

    // 280px left below the trigger, 300px above it
    let panel = host.rect(PANEL).unwrap();
    host.set_rect(PANEL, Rect::new(panel.left, panel.top, 200.0, 290.0));
    host.fire(WatchEvent::ContentMutation);
    dropdown.run_pending();

    let decision = dropdown.decision().unwrap();
    assert_eq!(decision.vertical, Some(VerticalSide::Above));
    assert_eq!(decision.placement.unwrap().top, 10.0);
}

#[test]
fn test_orientation_change_repositions() {
    let (host, mut dropdown) = opened(DropdownConfig::default());
    assert_eq!(host.applied().len(), 1);

    host.set_viewport(Viewport::sized(400.0, 900.0));
    host.set_rect(TRIGGER, Rect::new(300.0, 100.0, 50.0, 20.0));
    host.fire(WatchEvent::OrientationChange);
    dropdown.run_pending();

    assert_eq!(host.applied().len(), 2);
    let decision = dropdown.decision().unwrap();
    assert_eq!(decision.horizontal, HorizontalSide::Right);
    assert_eq!(decision.placement.unwrap().left, 150.0);
}

#[test]
fn test_close_cancels_pending_setup() {
    let (host, mut dropdown) = setup(DropdownConfig::default());

    dropdown.open(&Event::Programmatic);
    assert_eq!(host.pending(), 1);
    dropdown.close(&Event::Programmatic, true);
    assert_eq!(host.pending(), 0);

    dropdown.run_pending();
    assert_eq!(host.total_subscriptions(), 0);
    assert!(host.applied().is_empty());
}

#[test]
fn test_close_cancels_throttle_timer() {
    let (host, mut dropdown) = opened(DropdownConfig::default());

    host.fire(WatchEvent::Scroll);
    host.fire(WatchEvent::Scroll);
    dropdown.run_pending();
    // Trailing flush still armed
    assert_eq!(host.pending(), 1);

    dropdown.close(&Event::Programmatic, false);
    assert_eq!(host.pending(), 0);
    assert_eq!(host.active_subscriptions(), 0);
}

#[test]
fn test_events_after_close_are_ignored() {
    let (host, mut dropdown) = opened(DropdownConfig::default());
    dropdown.close(&Event::Programmatic, false);
    let applied = host.applied().len();

    dropdown.handle_watch_event(WatchEvent::Scroll);
    dropdown.handle_watch_event(WatchEvent::RenderSettled);
    dropdown.run_pending();
    assert_eq!(host.applied().len(), applied);
    assert!(!dropdown.is_watching());
}

#[test]
fn test_missing_panel_is_a_noop() {
    let (host, mut dropdown) = setup(DropdownConfig::default());
    host.remove(PANEL);

    dropdown.open(&Event::Programmatic);
    dropdown.run_pending();
    assert!(dropdown.is_open());
    assert!(dropdown.reposition().is_none());
    assert!(host.applied().is_empty());
}

#[test]
fn test_reposition_while_closed_is_a_noop() {
    let (host, mut dropdown) = setup(DropdownConfig::default());
    assert!(dropdown.reposition().is_none());
    assert!(host.applied().is_empty());
}

#[test]
fn test_initially_opened() {
    let (host, mut dropdown) = setup(DropdownConfig::default().initially_opened(true));

    assert!(dropdown.is_open());
    assert_eq!(host.pending(), 1);
    dropdown.run_pending();
    assert!(dropdown.decision().is_some());
    assert_eq!(host.active_subscriptions(), 1);
}

#[test]
fn test_disabled_wins_over_initially_opened() {
    let (host, dropdown) =
        setup(DropdownConfig::default().initially_opened(true).disabled(true));

    assert!(!dropdown.is_open());
    assert_eq!(host.pending(), 0);
}

#[test]
fn test_state_listeners_see_each_transition() {
    let (_host, mut dropdown) = setup(DropdownConfig::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    dropdown.on_state_change(move |state| sink.borrow_mut().push(*state));

    dropdown.open(&Event::Programmatic);
    dropdown.close(&Event::Programmatic, false);
    dropdown.disable();
    dropdown.enable();

    let open_flags: Vec<_> = seen.borrow().iter().map(|s| (s.is_open, s.disabled)).collect();
    assert_eq!(
        open_flags,
        vec![(true, false), (false, false), (false, true), (false, false)]
    );
}

#[test]
fn test_transform_strategy_composes_with_current_translate() {
    let (host, mut dropdown) = opened(DropdownConfig::default().transform(true));

    let decision = dropdown.decision().cloned().unwrap();
    assert_eq!(decision.patch.translate(), Some(Point::new(550.0, 120.0)));
    assert_eq!(host.current_translate(PANEL), Point::new(550.0, 120.0));

    // The panel now sits at its target, so the translation must not grow
    let again = dropdown.reposition().cloned().unwrap();
    assert_eq!(again.patch.translate(), Some(Point::new(550.0, 120.0)));
}

#[test]
fn test_in_place_only_decides_horizontal() {
    let (_host, dropdown) = opened(DropdownConfig::default().render_in_place(true));

    let decision = dropdown.decision().unwrap();
    assert_eq!(decision.horizontal, HorizontalSide::Right);
    assert_eq!(decision.vertical, None);
    assert_eq!(decision.patch, PanelPatch::None);
}

#[test]
fn test_configured_ids() {
    let (_host, dropdown) = setup(DropdownConfig::default().panel_id("menu".to_string()));
    assert_eq!(dropdown.ids().trigger, TRIGGER);
    assert_eq!(dropdown.ids().panel, "menu");
}

#[test]
fn test_invalid_config_is_rejected() {
    let host = MemoryHost::default();
    let result = Dropdown::new(host, DropdownConfig::default().throttle_ms(0), &IdGenerator::new());
    assert!(matches!(result, Err(ConfigError::ZeroThrottle)));
}
