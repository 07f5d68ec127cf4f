// DOM event listeners owned by one mounted component.
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::{Closure, WasmClosure};
use web_sys::{AddEventListenerOptions, EventTarget};

/// Every listener added here is removed exactly once, by [`Bindings::release`]
/// or on drop, whichever comes first.
#[derive(Default)]
pub struct Bindings {
    releases: Vec<Box<dyn FnOnce()>>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen<E>(&mut self, target: &EventTarget, event: &'static str, handler: impl FnMut(E) + 'static)
    where
        E: 'static,
        dyn FnMut(E): WasmClosure,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
        if target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .is_err()
        {
            log::warn!("could not bind `{event}` listener");
            return;
        }
        self.keep(target.clone(), event, closure);
    }

    /// Like [`Bindings::listen`] but non-passive, so the handler may call
    /// `prevent_default` on wheel and touch events.
    pub fn listen_active<E>(&mut self, target: &EventTarget, event: &'static str, handler: impl FnMut(E) + 'static)
    where
        E: 'static,
        dyn FnMut(E): WasmClosure,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        if target
            .add_event_listener_with_callback_and_add_event_listener_options(
                event,
                closure.as_ref().unchecked_ref(),
                &options,
            )
            .is_err()
        {
            log::warn!("could not bind `{event}` listener");
            return;
        }
        self.keep(target.clone(), event, closure);
    }

    fn keep<E>(&mut self, target: EventTarget, event: &'static str, closure: Closure<dyn FnMut(E)>)
    where
        E: 'static,
        dyn FnMut(E): WasmClosure,
    {
        self.releases.push(Box::new(move || {
            let _ = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            drop(closure);
        }));
    }

    /// Removes all listeners. Safe to call repeatedly.
    pub fn release(&mut self) {
        let count = self.releases.len();
        for release in self.releases.drain(..) {
            release();
        }
        if count > 0 {
            log::debug!("released {count} listeners");
        }
    }
}

impl Drop for Bindings {
    fn drop(&mut self) {
        self.release();
    }
}
