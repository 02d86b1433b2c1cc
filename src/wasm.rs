//! JavaScript bindings for the browser build.
//!
//! A [`DropdownFactory`] hands out [`JsDropdown`] handles, each owning one
//! [`Dropdown`] over its own [`WebHost`]. Hooks are plain JS functions called
//! as `hook(state, eventKind)`; returning `false` vetoes `onOpen`/`onClose`
//! and stops built-in handling in `onKeydown`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use dropdown_position::{Event, Key};
use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::{
    Dropdown, DropdownConfig, DropdownHooks, DropdownState, IdGenerator, LogLevel, Propagation,
    WatchEvent, WatchSink, WebHost,
};

type Shared = Rc<RefCell<Dropdown<WebHost>>>;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Warn).is_err() {
        web_sys::console::warn_1(&"basic_dropdown: logger already initialised".into());
    }
}

/// Change the console log level (`error`, `warn`, `info`, `debug`, `trace`).
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsError> {
    let level: LogLevel = serde_json::from_value(serde_json::Value::String(level.to_string()))?;
    log::set_max_level(level.to_level_filter());
    Ok(())
}

/// Creates dropdowns that share one id sequence.
#[wasm_bindgen]
pub struct DropdownFactory {
    ids: IdGenerator,
}

#[wasm_bindgen]
impl DropdownFactory {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            ids: IdGenerator::new(),
        }
    }

    /// Create a dropdown from a JSON configuration.
    pub fn create(&self, config_json: &str) -> Result<JsDropdown, JsError> {
        let config = DropdownConfig::from_json(config_json)?;
        let dropdown = Dropdown::new(WebHost::new()?, config, &self.ids)?;
        let inner = Rc::new(RefCell::new(dropdown));
        inner.borrow().host().connect(sink_for(Rc::downgrade(&inner)));
        Ok(JsDropdown { inner })
    }
}

impl Default for DropdownFactory {
    fn default() -> Self {
        Self::new()
    }
}

/// Host events go back into the dropdown unless it is already mid-call.
fn sink_for(weak: Weak<RefCell<Dropdown<WebHost>>>) -> WatchSink {
    Rc::new(move |event: WatchEvent| {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        match inner.try_borrow_mut() {
            Ok(mut dropdown) => dropdown.handle_watch_event(event),
            Err(_) => log::trace!("Dropdown busy, dropping {:?}", event),
        };
    })
}

fn state_to_js(state: &DropdownState) -> JsValue {
    serde_json::to_string(state)
        .ok()
        .and_then(|json| js_sys::JSON::parse(&json).ok())
        .unwrap_or(JsValue::NULL)
}

fn call_hook(hook: &Function, state: &DropdownState, event: &Event) -> JsValue {
    hook.call2(&JsValue::NULL, &state_to_js(state), &JsValue::from_str(event.kind()))
        .unwrap_or_else(|err| {
            log::warn!("Dropdown hook threw: {:?}", err);
            JsValue::UNDEFINED
        })
}

fn hooks_from_js(object: &js_sys::Object) -> DropdownHooks {
    let get = |name: &str| {
        js_sys::Reflect::get(object, &JsValue::from_str(name))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
    };

    let mut hooks = DropdownHooks::default();
    if let Some(hook) = get("onOpen") {
        hooks = hooks.on_open(move |state, event| {
            call_hook(&hook, state, event).as_bool() != Some(false)
        });
    }
    if let Some(hook) = get("onClose") {
        hooks = hooks.on_close(move |state, event| {
            call_hook(&hook, state, event).as_bool() != Some(false)
        });
    }
    if let Some(hook) = get("onKeydown") {
        hooks = hooks.on_keydown(move |state, event| {
            match call_hook(&hook, state, event).as_bool() {
                Some(false) => Propagation::Stop,
                _ => Propagation::Continue,
            }
        });
    }
    if let Some(hook) = get("onFocus") {
        hooks = hooks.on_focus(move |state, event| {
            call_hook(&hook, state, event);
        });
    }
    hooks
}

/// A dropdown driven from JavaScript.
#[wasm_bindgen]
pub struct JsDropdown {
    inner: Shared,
}

impl JsDropdown {
    fn with<R>(&self, f: impl FnOnce(&mut Dropdown<WebHost>) -> R) -> Option<R> {
        match self.inner.try_borrow_mut() {
            Ok(mut dropdown) => Some(f(&mut dropdown)),
            Err(_) => {
                log::warn!("Dropdown is busy; hooks must not call back into their dropdown");
                None
            }
        }
    }

    fn read<R>(&self, f: impl FnOnce(&Dropdown<WebHost>) -> R) -> Option<R> {
        self.inner.try_borrow().ok().map(|dropdown| f(&dropdown))
    }
}

#[wasm_bindgen]
impl JsDropdown {
    pub fn open(&self) -> bool {
        self.with(|d| d.open(&Event::Programmatic)).unwrap_or(false)
    }

    pub fn close(&self, skip_focus: bool) -> bool {
        self.with(|d| d.close(&Event::Programmatic, skip_focus))
            .unwrap_or(false)
    }

    pub fn toggle(&self) -> bool {
        self.with(|d| d.toggle(&Event::Programmatic)).unwrap_or(false)
    }

    /// Reposition now. Returns the decision as JSON, if one was made.
    pub fn reposition(&self) -> Option<String> {
        self.with(|d| {
            d.reposition()
                .and_then(|decision| serde_json::to_string(decision).ok())
        })
        .flatten()
    }

    pub fn disable(&self) {
        self.with(|d| d.disable());
    }

    pub fn enable(&self) {
        self.with(|d| d.enable());
    }

    #[wasm_bindgen(js_name = setDisabled)]
    pub fn set_disabled(&self, disabled: bool) {
        self.with(|d| d.set_disabled(disabled));
    }

    /// Forward a trigger `keydown`, given its `KeyboardEvent.key`.
    pub fn keydown(&self, key: &str) {
        let event = Event::key(Key::from_dom(key));
        self.with(|d| d.handle_keydown(&event));
    }

    /// Forward a trigger `focus`.
    pub fn focus(&self) {
        self.with(|d| d.handle_focus(&Event::Focus));
    }

    #[wasm_bindgen(getter, js_name = isOpen)]
    pub fn is_open(&self) -> bool {
        self.read(|d| d.is_open()).unwrap_or(false)
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> JsValue {
        self.read(|d| state_to_js(&d.state()))
            .unwrap_or(JsValue::NULL)
    }

    #[wasm_bindgen(getter, js_name = triggerId)]
    pub fn trigger_id(&self) -> String {
        self.read(|d| d.ids().trigger.clone()).unwrap_or_default()
    }

    #[wasm_bindgen(getter, js_name = panelId)]
    pub fn panel_id(&self) -> String {
        self.read(|d| d.ids().panel.clone()).unwrap_or_default()
    }

    /// Install `{ onOpen, onClose, onKeydown, onFocus }`. Missing entries are
    /// left unset.
    #[wasm_bindgen(js_name = setHooks)]
    pub fn set_hooks(&self, hooks: &js_sys::Object) {
        let hooks = hooks_from_js(hooks);
        self.with(|d| d.set_hooks(hooks));
    }

    /// Call `listener(state)` after every state change.
    #[wasm_bindgen(js_name = onStateChange)]
    pub fn on_state_change(&self, listener: Function) {
        self.with(|d| {
            d.on_state_change(move |state| {
                if let Err(err) = listener.call1(&JsValue::NULL, &state_to_js(state)) {
                    log::warn!("State listener threw: {:?}", err);
                }
            })
        });
    }
}
