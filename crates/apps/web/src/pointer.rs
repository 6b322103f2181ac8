//! Pointer wiring: the `<svg>` root receives pointer events and forwards
//! them to the widget.

use std::rc::Rc;

use globe::{GlobeWidget, starts_drag};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, PointerEvent};

use crate::svg::DomSurface;
use crate::{Instance, request_frame};

const IDLE_STYLE: &str = "touch-action: none; cursor: grab;";
const DRAG_STYLE: &str = "touch-action: none; cursor: grabbing;";

pub(crate) struct Listener {
    target: Element,
    kind: &'static str,
    closure: Closure<dyn FnMut(PointerEvent)>,
}

impl Listener {
    fn new(target: &Element, kind: &'static str, handler: impl FnMut(PointerEvent) + 'static) -> Self {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(PointerEvent)>);
        let _ = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
        Self {
            target: target.clone(),
            kind,
            closure,
        }
    }

    pub(crate) fn detach(&self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

pub(crate) fn attach(root: &Element, instance: &Rc<Instance>) -> Vec<Listener> {
    let down = {
        let weak = Rc::downgrade(instance);
        let root = root.clone();
        move |ev: PointerEvent| {
            let Some(instance) = weak.upgrade() else {
                return;
            };
            if !starts_drag(ev.button(), ev.ctrl_key()) {
                return;
            }
            if instance
                .widget
                .borrow_mut()
                .pointer_down(ev.client_x() as f64, ev.client_y() as f64)
            {
                // Keep receiving moves when the pointer leaves the globe.
                let _ = root.set_pointer_capture(ev.pointer_id());
                let _ = root.set_attribute("style", DRAG_STYLE);
                ev.prevent_default();
            }
        }
    };

    let moved = {
        let weak = Rc::downgrade(instance);
        move |ev: PointerEvent| {
            let Some(instance) = weak.upgrade() else {
                return;
            };
            let result = instance
                .widget
                .borrow_mut()
                .pointer_move(ev.client_x() as f64, ev.client_y() as f64);
            match result {
                Ok(true) => request_frame(&instance),
                Ok(false) => {}
                Err(e) => instance.report(&e),
            }
        }
    };

    let release = |root: &Element, end: fn(&mut GlobeWidget<DomSurface>) -> bool| {
        let weak = Rc::downgrade(instance);
        let root = root.clone();
        move |ev: PointerEvent| {
            let Some(instance) = weak.upgrade() else {
                return;
            };
            let ended = end(&mut instance.widget.borrow_mut());
            if ended {
                let _ = root.release_pointer_capture(ev.pointer_id());
                let _ = root.set_attribute("style", IDLE_STYLE);
            }
        }
    };

    vec![
        Listener::new(root, "pointerdown", down),
        Listener::new(root, "pointermove", moved),
        Listener::new(root, "pointerup", release(root, GlobeWidget::pointer_up)),
        Listener::new(root, "pointercancel", release(root, GlobeWidget::pointer_cancel)),
    ]
}
