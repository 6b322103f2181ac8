//! Browser binding: the `QuickGlobe` class.
//!
//! Each instance owns its widget, its SVG and its listeners; nothing is
//! shared between instances on a page.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use console_error_panic_hook::set_once;
use globe::{GlobeWidget, LoadTicket, WidgetConfig, WidgetError, decode_geometry};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::Element;

mod fetch;
mod pointer;
mod svg;

use fetch::fetch_text;
use pointer::Listener;
use svg::DomSurface;

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

pub(crate) struct Instance {
    widget: RefCell<GlobeWidget<DomSurface>>,
    geometry_url: String,
    on_error: RefCell<Option<js_sys::Function>>,
    frame_requested: Cell<bool>,
    listeners: RefCell<Vec<Listener>>,
}

impl Instance {
    /// Log to the console and notify the host callback, if any.
    pub(crate) fn report(&self, e: &WidgetError) {
        let msg = e.to_string();
        web_sys::console::error_1(&JsValue::from_str(&format!("quickglobe: {msg}")));
        let callback = self.on_error.borrow().clone();
        if let Some(cb) = callback {
            let _ = cb.call1(&JsValue::NULL, &JsValue::from_str(&msg));
        }
    }
}

/// Schedule one animation frame for deferred drag redraws.
pub(crate) fn request_frame(instance: &Rc<Instance>) {
    if instance.frame_requested.replace(true) {
        return;
    }
    let weak = Rc::downgrade(instance);
    let tick = Closure::once_into_js(move || {
        let Some(instance) = weak.upgrade() else {
            return;
        };
        instance.frame_requested.set(false);
        let result = instance.widget.borrow_mut().animation_frame();
        if let Err(e) = result {
            instance.report(&e);
        }
    });
    let scheduled = web_sys::window()
        .map(|w| w.request_animation_frame(tick.unchecked_ref()).is_ok())
        .unwrap_or(false);
    if !scheduled {
        instance.frame_requested.set(false);
    }
}

fn start_load(instance: &Rc<Instance>, ticket: LoadTicket) {
    let weak = Rc::downgrade(instance);
    let url = instance.geometry_url.clone();
    spawn_local(async move {
        let fetched = fetch_text(&url).await;
        let Some(instance) = weak.upgrade() else {
            return;
        };
        let object_name = instance.widget.borrow().config().object_name.clone();
        let result = fetched.and_then(|text| decode_geometry(&text, object_name.as_deref()));
        let outcome = instance.widget.borrow_mut().complete_load(ticket, result);
        if let Err(e) = outcome {
            instance.report(&e);
        }
    });
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

#[wasm_bindgen]
pub struct QuickGlobe {
    instance: Rc<Instance>,
}

#[wasm_bindgen]
impl QuickGlobe {
    /// Mount a globe inside `element`; geometry is fetched from `geometry_url`
    /// on every `renderValue`.
    #[wasm_bindgen(constructor)]
    pub fn new(
        element: Element,
        width: f64,
        height: f64,
        geometry_url: String,
    ) -> Result<QuickGlobe, JsValue> {
        set_once();
        let surface = DomSurface::mount(&element, width, height).map_err(to_js)?;
        let root = surface.root().clone();
        let widget = GlobeWidget::new(width, height, surface, WidgetConfig::default());
        let instance = Rc::new(Instance {
            widget: RefCell::new(widget),
            geometry_url,
            on_error: RefCell::new(None),
            frame_requested: Cell::new(false),
            listeners: RefCell::new(Vec::new()),
        });
        let listeners = pointer::attach(&root, &instance);
        *instance.listeners.borrow_mut() = listeners;
        Ok(QuickGlobe { instance })
    }

    /// Draw `{ data, settings: { colorRamp1, colorRamp2, naColor? } }`.
    /// Replaces whatever an earlier call drew.
    #[wasm_bindgen(js_name = renderValue)]
    pub fn render_value(&self, options: JsValue) -> Result<(), JsValue> {
        let options: serde_json::Value = serde_wasm_bindgen::from_value(options).map_err(to_js)?;
        let ticket = self.instance.widget.borrow_mut().render_value_json(&options);
        match ticket {
            Ok(ticket) => {
                start_load(&self.instance, ticket);
                Ok(())
            }
            Err(e) => {
                self.instance.report(&e);
                Err(to_js(e))
            }
        }
    }

    pub fn resize(&self, width: f64, height: f64) -> Result<(), JsValue> {
        let result = self.instance.widget.borrow_mut().resize(width, height);
        result.map_err(|e| {
            self.instance.report(&e);
            to_js(e)
        })
    }

    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&self, key: &str, value: JsValue) -> Result<(), JsValue> {
        let value: serde_json::Value = serde_wasm_bindgen::from_value(value).map_err(to_js)?;
        self.instance
            .widget
            .borrow_mut()
            .set_config(key, &value)
            .map_err(to_js)
    }

    pub fn config(&self) -> Result<JsValue, JsValue> {
        let widget = self.instance.widget.borrow();
        serde_wasm_bindgen::to_value(widget.config()).map_err(to_js)
    }

    /// `[longitude, latitude, roll]` in degrees.
    pub fn rotation(&self) -> Vec<f64> {
        self.instance.widget.borrow().rotation().to_array().to_vec()
    }

    /// Called with the message whenever loading or rendering fails.
    #[wasm_bindgen(js_name = onError)]
    pub fn on_error(&self, callback: Option<js_sys::Function>) {
        *self.instance.on_error.borrow_mut() = callback;
    }

    #[wasm_bindgen(js_name = errorMessage)]
    pub fn error_message(&self) -> Option<String> {
        self.instance
            .widget
            .borrow()
            .error()
            .map(|e| e.to_string())
    }

    pub fn dispose(&self) {
        for listener in self.instance.listeners.borrow_mut().drain(..) {
            listener.detach();
        }
        let mut widget = self.instance.widget.borrow_mut();
        widget.dispose();
        widget.surface().unmount();
        *self.instance.on_error.borrow_mut() = None;
    }
}
