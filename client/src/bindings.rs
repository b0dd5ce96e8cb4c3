//! DOM subscriptions owned by a map instance. Dropping a binding removes
//! its listener, so holding one in the component's storage ties the
//! subscription to the component's lifetime.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;

/// Window-level Escape listener.
pub(crate) struct EscapeBinding {
    window: web_sys::Window,
    handler: Closure<dyn Fn(web_sys::KeyboardEvent)>,
}

impl EscapeBinding {
    pub(crate) fn new(on_escape: impl Fn() + 'static) -> Option<Self> {
        let window = web_sys::window()?;
        let handler = Closure::<dyn Fn(web_sys::KeyboardEvent)>::new(move |e: web_sys::KeyboardEvent| {
            if e.key() == "Escape" {
                on_escape();
            }
        });
        window
            .add_event_listener_with_callback("keydown", handler.as_ref().unchecked_ref())
            .ok()?;
        Some(Self { window, handler })
    }
}

impl Drop for EscapeBinding {
    fn drop(&mut self) {
        let _ = self
            .window
            .remove_event_listener_with_callback("keydown", self.handler.as_ref().unchecked_ref());
    }
}

/// Observes an element's size and reports it after `delay_ms` of quiet.
/// The first measurement is reported immediately.
pub(crate) struct ResizeBinding {
    observer: web_sys::ResizeObserver,
    pending: Rc<RefCell<Option<Timeout>>>,
    _callback: Closure<dyn FnMut()>,
}

impl ResizeBinding {
    pub(crate) fn observe(
        element: &web_sys::Element,
        delay_ms: u32,
        on_resize: impl Fn(f64, f64) + 'static,
    ) -> Option<Self> {
        let on_resize = Rc::new(on_resize);
        let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));

        let rect = element.get_bounding_client_rect();
        on_resize(rect.width(), rect.height());

        let callback = {
            let element = element.clone();
            let pending = pending.clone();
            Closure::<dyn FnMut()>::new(move || {
                let element = element.clone();
                let on_resize = on_resize.clone();
                // Replacing the timeout drops, and so cancels, the previous one.
                *pending.borrow_mut() = Some(Timeout::new(delay_ms, move || {
                    let rect = element.get_bounding_client_rect();
                    on_resize(rect.width(), rect.height());
                }));
            })
        };

        let observer = web_sys::ResizeObserver::new(callback.as_ref().unchecked_ref()).ok()?;
        observer.observe(element);
        Some(Self {
            observer,
            pending,
            _callback: callback,
        })
    }
}

impl Drop for ResizeBinding {
    fn drop(&mut self) {
        self.observer.disconnect();
        self.pending.borrow_mut().take();
    }
}
