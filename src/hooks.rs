//! Consumer hooks invoked by the dropdown controller.
//!
//! Each hook receives the current [`DropdownState`] snapshot and the event that
//! caused the call. Hooks run while the controller is mid-transition, so they
//! must not call back into the same dropdown.
//!
//! # Examples
//!
//! ```
//! use basic_dropdown::{DropdownHooks, Propagation};
//!
//! let hooks = DropdownHooks::default()
//!     .on_open(|state, _event| !state.disabled)
//!     .on_keydown(|_state, _event| Propagation::Continue);
//! assert!(hooks.has_on_open());
//! ```

use std::fmt;

use dropdown_position::Event;

use crate::dropdown::DropdownState;

/// Whether built-in keyboard handling should still run after `on_keydown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Propagation {
    #[default]
    Continue,
    /// The hook handled the key; skip Enter/Escape handling.
    Stop,
}

/// An optional hook returning `R`.
///
/// Calling an empty hook yields `None`, which the controller treats the same
/// as "no opinion".
pub struct Hook<R> {
    f: Option<Box<dyn Fn(&DropdownState, &Event) -> R>>,
}

impl<R> Hook<R> {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&DropdownState, &Event) -> R + 'static,
    {
        Self {
            f: Some(Box::new(f)),
        }
    }

    /// Create an empty hook (no handler).
    pub fn none() -> Self {
        Self { f: None }
    }

    /// Call the hook, if it exists.
    pub fn call(&self, state: &DropdownState, event: &Event) -> Option<R> {
        self.f.as_ref().map(|f| f(state, event))
    }

    pub fn is_some(&self) -> bool {
        self.f.is_some()
    }
}

impl Hook<bool> {
    /// Only an explicit `false` vetoes; an unset hook allows the transition.
    pub fn allows(&self, state: &DropdownState, event: &Event) -> bool {
        self.call(state, event) != Some(false)
    }
}

impl<R> Default for Hook<R> {
    fn default() -> Self {
        Self::none()
    }
}

impl<R> fmt::Debug for Hook<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook").field("set", &self.is_some()).finish()
    }
}

/// The full set of hooks a dropdown consults.
#[derive(Debug, Default)]
pub struct DropdownHooks {
    /// Vetoable: returning `false` keeps the dropdown closed.
    pub(crate) on_open: Hook<bool>,
    /// Vetoable: returning `false` keeps the dropdown open.
    pub(crate) on_close: Hook<bool>,
    /// Runs before Enter/Escape handling.
    pub(crate) on_keydown: Hook<Propagation>,
    /// Runs when the trigger gains focus.
    pub(crate) on_focus: Hook<()>,
}

impl DropdownHooks {
    pub fn on_open<F>(mut self, f: F) -> Self
    where
        F: Fn(&DropdownState, &Event) -> bool + 'static,
    {
        self.on_open = Hook::new(f);
        self
    }

    pub fn on_close<F>(mut self, f: F) -> Self
    where
        F: Fn(&DropdownState, &Event) -> bool + 'static,
    {
        self.on_close = Hook::new(f);
        self
    }

    pub fn on_keydown<F>(mut self, f: F) -> Self
    where
        F: Fn(&DropdownState, &Event) -> Propagation + 'static,
    {
        self.on_keydown = Hook::new(f);
        self
    }

    pub fn on_focus<F>(mut self, f: F) -> Self
    where
        F: Fn(&DropdownState, &Event) + 'static,
    {
        self.on_focus = Hook::new(f);
        self
    }

    pub fn has_on_open(&self) -> bool {
        self.on_open.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::IdGenerator;

    fn state() -> DropdownState {
        DropdownState::new(IdGenerator::new().next_id(), false)
    }

    #[test]
    fn test_unset_hook_allows() {
        let hook: Hook<bool> = Hook::none();
        assert!(hook.allows(&state(), &Event::Programmatic));
    }

    #[test]
    fn test_only_false_vetoes() {
        let allow = Hook::new(|_: &DropdownState, _: &Event| true);
        let veto = Hook::new(|_: &DropdownState, _: &Event| false);

        assert!(allow.allows(&state(), &Event::Programmatic));
        assert!(!veto.allows(&state(), &Event::Programmatic));
    }

    #[test]
    fn test_hook_receives_state() {
        let hook = Hook::new(|state: &DropdownState, _: &Event| state.is_open);
        assert_eq!(hook.call(&state(), &Event::Focus), Some(false));
    }
}
