//! SVG DOM implementation of the path surface.

use layers::{BOUNDARY_CLASS, LAND_CLASS, PathSurface, SVG_NS, SurfaceError};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

fn dom_err(e: JsValue) -> SurfaceError {
    SurfaceError::Unavailable(format!("{e:?}"))
}

pub struct DomSurface {
    document: Document,
    root: Element,
    paths: Element,
    message: Element,
}

impl DomSurface {
    /// Create the `<svg>` inside `container`.
    pub fn mount(container: &Element, width: f64, height: f64) -> Result<Self, SurfaceError> {
        let document = container
            .owner_document()
            .ok_or_else(|| SurfaceError::Unavailable("container has no document".to_string()))?;

        let root = document.create_element_ns(Some(SVG_NS), "svg").map_err(dom_err)?;
        let _ = root.set_attribute("class", "quickglobe");
        let _ = root.set_attribute("style", "touch-action: none; cursor: grab;");

        let paths = document.create_element_ns(Some(SVG_NS), "g").map_err(dom_err)?;
        let _ = paths.set_attribute("class", BOUNDARY_CLASS);
        let _ = paths.set_attribute("stroke", "#ffffff");
        let _ = paths.set_attribute("stroke-width", "0.5");
        root.append_child(&paths).map_err(dom_err)?;

        let message = document.create_element_ns(Some(SVG_NS), "text").map_err(dom_err)?;
        let _ = message.set_attribute("text-anchor", "middle");
        let _ = message.set_attribute("fill", "#b91c1c");
        let _ = message.set_attribute("visibility", "hidden");
        root.append_child(&message).map_err(dom_err)?;

        container.append_child(&root).map_err(dom_err)?;

        let mut surface = Self {
            document,
            root,
            paths,
            message,
        };
        surface.set_size(width, height);
        Ok(surface)
    }

    /// The `<svg>` element; pointer listeners attach here.
    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn unmount(&self) {
        self.root.remove();
    }
}

impl PathSurface for DomSurface {
    type Handle = Element;

    fn create_path(&mut self, key: &str, d: &str, fill: &str) -> Result<Element, SurfaceError> {
        let el = self
            .document
            .create_element_ns(Some(SVG_NS), "path")
            .map_err(dom_err)?;
        let _ = el.set_attribute("class", LAND_CLASS);
        let _ = el.set_attribute("data-key", key);
        let _ = el.set_attribute("d", d);
        let _ = el.set_attribute("fill", fill);
        self.paths.append_child(&el).map_err(dom_err)?;
        Ok(el)
    }

    fn update_path(&mut self, handle: &Element, d: &str) -> Result<(), SurfaceError> {
        handle.set_attribute("d", d).map_err(dom_err)
    }

    fn remove_path(&mut self, handle: Element) -> Result<(), SurfaceError> {
        handle.remove();
        Ok(())
    }

    fn set_size(&mut self, width: f64, height: f64) {
        let _ = self.root.set_attribute("width", &width.to_string());
        let _ = self.root.set_attribute("height", &height.to_string());
        let _ = self.message.set_attribute("x", &(width / 2.0).to_string());
        let _ = self.message.set_attribute("y", &(height / 2.0).to_string());
    }

    fn clear(&mut self) {
        self.paths.set_inner_html("");
        self.clear_error();
    }

    fn show_error(&mut self, message: &str) {
        self.message.set_text_content(Some(message));
        let _ = self.message.set_attribute("visibility", "visible");
    }

    fn clear_error(&mut self) {
        self.message.set_text_content(None);
        let _ = self.message.set_attribute("visibility", "hidden");
    }
}
