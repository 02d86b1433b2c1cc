//! Browser host built on `web-sys`.
//!
//! Geometry comes from `getBoundingClientRect`, positions are written as inline
//! styles, and listeners are real DOM listeners plus a `MutationObserver` on
//! the panel. Events are delivered through a [`WatchSink`] connected after
//! construction; callbacks look the sink up when they fire, so anything
//! scheduled before [`WebHost::connect`] is still delivered.

use std::cell::RefCell;
use std::rc::Rc;

use dropdown_position::{
    Event, Point, PositionDecision, Rect, TransformPatch, Viewport,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, EventTarget, HtmlElement, MouseEvent, MutationObserver,
    MutationObserverInit, TouchEvent, Window,
};
use web_time::Instant;

use super::{DropdownHost, Schedule, WatchEvent, WatchSink};
use crate::error::HostError;
use crate::ids::DropdownIds;

type SinkSlot = Rc<RefCell<Option<WatchSink>>>;
type DomListener = Closure<dyn FnMut(web_sys::Event)>;

fn js_error(err: JsValue) -> HostError {
    HostError::Js(format!("{:?}", err))
}

fn deliver(slot: &SinkSlot, event: WatchEvent) {
    // Release the borrow before the sink runs
    let sink = slot.borrow().clone();
    match sink {
        Some(sink) => sink(event),
        None => log::warn!("WebHost: no sink connected, dropping {:?}", event),
    }
}

/// [`DropdownHost`] for a browser window.
pub struct WebHost {
    window: Window,
    document: Document,
    sink: SinkSlot,
}

impl WebHost {
    pub fn new() -> Result<Self, HostError> {
        let window = web_sys::window().ok_or(HostError::NoWindow)?;
        let document = window.document().ok_or(HostError::NoDocument)?;
        Ok(Self {
            window,
            document,
            sink: Rc::new(RefCell::new(None)),
        })
    }

    /// Route every listener and timer event to `sink`.
    pub fn connect(&self, sink: WatchSink) {
        *self.sink.borrow_mut() = Some(sink);
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn html_element(&self, id: &str) -> Option<HtmlElement> {
        self.element(id)?.dyn_into::<HtmlElement>().ok()
    }

    fn listen(
        &self,
        target: &EventTarget,
        kind: &'static str,
        capture: bool,
        event: impl Fn(&web_sys::Event) -> WatchEvent + 'static,
    ) -> Result<Listener, HostError> {
        let slot = Rc::clone(&self.sink);
        let callback = DomListener::new(move |dom_event: web_sys::Event| {
            deliver(&slot, event(&dom_event));
        });
        target
            .add_event_listener_with_callback_and_bool(
                kind,
                callback.as_ref().unchecked_ref(),
                capture,
            )
            .map_err(js_error)?;
        Ok(Listener {
            target: target.clone(),
            kind,
            capture,
            callback,
        })
    }

    fn observe_panel(&self, panel_id: &str) -> Result<Option<PanelObserver>, HostError> {
        let Some(panel) = self.element(panel_id) else {
            log::trace!("WebHost: panel {} not rendered, no mutation observer", panel_id);
            return Ok(None);
        };
        let slot = Rc::clone(&self.sink);
        let callback = Closure::<dyn FnMut(js_sys::Array, MutationObserver)>::new(
            move |_records: js_sys::Array, _observer: MutationObserver| {
                deliver(&slot, WatchEvent::ContentMutation);
            },
        );
        let observer =
            MutationObserver::new(callback.as_ref().unchecked_ref()).map_err(js_error)?;
        let init = MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        observer
            .observe_with_options(&panel, &init)
            .map_err(js_error)?;
        Ok(Some(PanelObserver {
            observer,
            _callback: callback,
        }))
    }

    fn try_subscribe(&self, ids: &DropdownIds) -> Result<WebSubscription, HostError> {
        let window: &EventTarget = self.window.as_ref();
        let document: &EventTarget = self.document.as_ref();
        // Registrations remove themselves on drop; an early `?` unwinds the rest.
        let listeners = vec![
            self.listen(window, "scroll", false, |_| WatchEvent::Scroll)?,
            self.listen(window, "resize", false, |_| WatchEvent::Resize)?,
            self.listen(window, "orientationchange", false, |_| {
                WatchEvent::OrientationChange
            })?,
            self.listen(document, "mousedown", true, |e| {
                WatchEvent::PointerDown(pointer_event(e))
            })?,
            self.listen(document, "touchstart", true, |e| {
                WatchEvent::PointerDown(pointer_event(e))
            })?,
        ];
        let observer = self.observe_panel(&ids.panel)?;
        Ok(WebSubscription {
            _listeners: listeners,
            _observer: observer,
        })
    }
}

/// Convert a DOM mouse or touch event.
fn pointer_event(event: &web_sys::Event) -> Event {
    let position = if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()))
    } else if let Some(touch) = event
        .dyn_ref::<TouchEvent>()
        .and_then(|touch| touch.touches().get(0))
    {
        Point::new(f64::from(touch.client_x()), f64::from(touch.client_y()))
    } else {
        Point::zero()
    };

    // Ids from the target up to the root
    let mut path = Vec::new();
    let mut node = event
        .target()
        .and_then(|target| target.dyn_into::<Element>().ok());
    while let Some(element) = node {
        let id = element.id();
        if !id.is_empty() {
            path.push(id);
        }
        node = element.parent_element();
    }

    Event::PointerDown { position, path }
}

impl DropdownHost for WebHost {
    type Subscription = WebSubscription;
    type Timer = WebTimer;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn measure(&self, id: &str) -> Option<Rect> {
        let rect = self.element(id)?.get_bounding_client_rect();
        Some(Rect::new(rect.left(), rect.top(), rect.width(), rect.height()))
    }

    fn viewport(&self) -> Viewport {
        let dimension = |value: Result<JsValue, JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or_default()
        };
        Viewport::new(
            self.window.scroll_x().unwrap_or_default(),
            self.window.scroll_y().unwrap_or_default(),
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }

    fn current_translate(&self, id: &str) -> Point {
        self.html_element(id)
            .and_then(|element| element.style().get_property_value("transform").ok())
            .and_then(|css| TransformPatch::parse_translate(&css))
            .unwrap_or_default()
    }

    fn apply_position(&self, panel_id: &str, decision: &PositionDecision) {
        let Some(panel) = self.html_element(panel_id) else {
            log::trace!("WebHost: panel {} vanished before apply", panel_id);
            return;
        };

        let style = panel.style();
        for (property, value) in decision.patch.properties() {
            if let Err(err) = style.set_property(property, &value) {
                log::warn!("WebHost: failed to set {}: {}", property, js_error(err));
            }
        }

        let attributes = [
            ("data-horizontal", Some(decision.horizontal.name())),
            ("data-vertical", decision.vertical.map(|side| side.name())),
        ];
        for (name, value) in attributes {
            let result = match value {
                Some(value) => panel.set_attribute(name, value),
                None => panel.remove_attribute(name),
            };
            if let Err(err) = result {
                log::warn!("WebHost: failed to update {}: {}", name, js_error(err));
            }
        }
    }

    fn is_focusable(&self, id: &str) -> bool {
        self.html_element(id)
            .is_some_and(|element| element.tab_index() > -1)
    }

    fn focus(&self, id: &str) {
        if let Some(element) = self.html_element(id) {
            if let Err(err) = element.focus() {
                log::warn!("WebHost: focus failed: {}", js_error(err));
            }
        }
    }

    fn subscribe(&self, ids: &DropdownIds) -> WebSubscription {
        self.try_subscribe(ids).unwrap_or_else(|err| {
            log::warn!("WebHost: subscribing for {} failed: {}", ids.panel, err);
            WebSubscription {
                _listeners: Vec::new(),
                _observer: None,
            }
        })
    }

    fn schedule(&self, when: Schedule, event: WatchEvent) -> WebTimer {
        let slot = Rc::clone(&self.sink);
        let callback = Closure::<dyn FnMut()>::once(move || deliver(&slot, event));
        let function = callback.as_ref().unchecked_ref();
        let handle = match when {
            Schedule::AfterRender => self
                .window
                .request_animation_frame(function)
                .map(TimerHandle::Frame),
            Schedule::After(delay) => {
                let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
                self.window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(function, millis)
                    .map(TimerHandle::Timeout)
            }
        }
        .unwrap_or_else(|err| {
            log::warn!("WebHost: scheduling failed: {}", js_error(err));
            TimerHandle::Failed
        });

        WebTimer {
            window: self.window.clone(),
            handle,
            _callback: callback,
        }
    }
}

/// One DOM listener, removed from its target on drop.
struct Listener {
    target: EventTarget,
    kind: &'static str,
    capture: bool,
    callback: DomListener,
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(err) = self.target.remove_event_listener_with_callback_and_bool(
            self.kind,
            self.callback.as_ref().unchecked_ref(),
            self.capture,
        ) {
            log::warn!(
                "WebHost: removing {} listener failed: {}",
                self.kind,
                js_error(err)
            );
        }
    }
}

/// Mutation observer on the panel, disconnected on drop.
struct PanelObserver {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(js_sys::Array, MutationObserver)>,
}

impl Drop for PanelObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Listener registration for one open dropdown.
///
/// Often dropped from inside one of its own callbacks (outside click).
/// `wasm-bindgen` keeps a running closure alive until it returns.
pub struct WebSubscription {
    _listeners: Vec<Listener>,
    _observer: Option<PanelObserver>,
}

enum TimerHandle {
    Frame(i32),
    Timeout(i32),
    Failed,
}

/// A pending animation frame or timeout. Dropping it cancels the callback.
pub struct WebTimer {
    window: Window,
    handle: TimerHandle,
    _callback: Closure<dyn FnMut()>,
}

impl Drop for WebTimer {
    fn drop(&mut self) {
        match self.handle {
            TimerHandle::Frame(id) => {
                let _ = self.window.cancel_animation_frame(id);
            }
            TimerHandle::Timeout(id) => self.window.clear_timeout_with_handle(id),
            TimerHandle::Failed => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

    use super::*;
    use crate::ids::IdGenerator;

    wasm_bindgen_test_configure!(run_in_browser);

    fn counting_host() -> (WebHost, Rc<Cell<usize>>) {
        let host = WebHost::new().unwrap();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        host.connect(Rc::new(move |event: WatchEvent| {
            if matches!(event, WatchEvent::Scroll | WatchEvent::Resize) {
                seen.set(seen.get() + 1);
            }
        }));
        (host, count)
    }

    fn dispatch(host: &WebHost, kind: &str) {
        let event = web_sys::Event::new(kind).unwrap();
        host.window.dispatch_event(&event).unwrap();
    }

    #[wasm_bindgen_test]
    fn test_dropped_listener_is_removed() {
        let (host, count) = counting_host();
        let window: &EventTarget = host.window.as_ref();
        let listener = host
            .listen(window, "resize", false, |_| WatchEvent::Resize)
            .unwrap();

        dispatch(&host, "resize");
        assert_eq!(count.get(), 1);

        drop(listener);
        dispatch(&host, "resize");
        assert_eq!(count.get(), 1);
    }

    #[wasm_bindgen_test]
    fn test_failed_registration_removes_earlier_listeners() {
        let (host, count) = counting_host();
        let window: &EventTarget = host.window.as_ref();
        let register = || -> Result<Vec<Listener>, HostError> {
            Ok(vec![
                host.listen(window, "scroll", false, |_| WatchEvent::Scroll)?,
                host.listen(window, "resize", false, |_| WatchEvent::Resize)?,
                Err::<Listener, _>(HostError::Js("refused".to_string()))?,
            ])
        };

        assert!(register().is_err());
        dispatch(&host, "scroll");
        dispatch(&host, "resize");
        assert_eq!(count.get(), 0);
    }

    #[wasm_bindgen_test]
    fn test_subscription_dropped_from_its_own_callback() {
        let host = WebHost::new().unwrap();
        let subscription: Rc<RefCell<Option<WebSubscription>>> = Rc::default();
        let count = Rc::new(Cell::new(0));
        {
            let subscription = Rc::clone(&subscription);
            let count = Rc::clone(&count);
            host.connect(Rc::new(move |event: WatchEvent| {
                if matches!(event, WatchEvent::Scroll) {
                    count.set(count.get() + 1);
                    subscription.borrow_mut().take();
                }
            }));
        }
        let ids = DropdownIds::for_id(IdGenerator::new().next_id());
        *subscription.borrow_mut() = Some(host.subscribe(&ids));

        dispatch(&host, "scroll");
        dispatch(&host, "scroll");
        assert_eq!(count.get(), 1);
        assert!(subscription.borrow().is_none());
    }
}
