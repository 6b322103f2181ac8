use std::collections::BTreeMap;
use std::fmt::Write;

use crate::choropleth::{PathSurface, SurfaceError};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Class of the group holding the country paths. Host stylesheets key on it.
pub const BOUNDARY_CLASS: &str = "boundary";
/// Class of every country path.
pub const LAND_CLASS: &str = "land";

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SvgHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgPath {
    pub key: String,
    pub d: String,
    pub fill: String,
}

/// In-memory SVG document implementing [`PathSurface`].
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    width: f64,
    height: f64,
    next: u64,
    paths: BTreeMap<SvgHandle, SvgPath>,
    error: Option<String>,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            next: 0,
            paths: BTreeMap::new(),
            error: None,
        }
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Paths in creation order.
    pub fn paths(&self) -> impl Iterator<Item = &SvgPath> {
        self.paths.values()
    }

    pub fn element(&self, key: &str) -> Option<&SvgPath> {
        self.paths.values().find(|p| p.key == key)
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            r#"<svg xmlns="{SVG_NS}" width="{}" height="{}"><g class="{BOUNDARY_CLASS}">"#,
            self.width, self.height
        );
        for p in self.paths.values() {
            let _ = write!(
                out,
                r#"<path class="{LAND_CLASS}" data-key="{}" d="{}" fill="{}"/>"#,
                escape_attr(&p.key),
                escape_attr(&p.d),
                escape_attr(&p.fill)
            );
        }
        out.push_str("</g>");
        if let Some(msg) = &self.error {
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" text-anchor="middle">{}</text>"#,
                self.width / 2.0,
                self.height / 2.0,
                escape_attr(msg)
            );
        }
        out.push_str("</svg>");
        out
    }
}

fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

impl PathSurface for SvgDocument {
    type Handle = SvgHandle;

    fn create_path(&mut self, key: &str, d: &str, fill: &str) -> Result<SvgHandle, SurfaceError> {
        let handle = SvgHandle(self.next);
        self.next += 1;
        self.paths.insert(
            handle,
            SvgPath {
                key: key.to_string(),
                d: d.to_string(),
                fill: fill.to_string(),
            },
        );
        Ok(handle)
    }

    fn update_path(&mut self, handle: &SvgHandle, d: &str) -> Result<(), SurfaceError> {
        let path = self
            .paths
            .get_mut(handle)
            .ok_or_else(|| SurfaceError::UnknownHandle(format!("svg#{}", handle.0)))?;
        path.d.clear();
        path.d.push_str(d);
        Ok(())
    }

    fn remove_path(&mut self, handle: SvgHandle) -> Result<(), SurfaceError> {
        self.paths
            .remove(&handle)
            .map(|_| ())
            .ok_or_else(|| SurfaceError::UnknownHandle(format!("svg#{}", handle.0)))
    }

    fn set_size(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn clear(&mut self) {
        self.paths.clear();
        self.error = None;
    }

    fn show_error(&mut self, message: &str) {
        self.error = Some(message.to_string());
    }

    fn clear_error(&mut self) {
        self.error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::SvgDocument;
    use crate::choropleth::{PathSurface, SurfaceError};

    #[test]
    fn serializes_paths_and_error() {
        let mut doc = SvgDocument::new(10.0, 20.0);
        let h = doc.create_path("A&B", "M0,0L1,1Z", "#000000").expect("create");
        doc.update_path(&h, "M1,1L2,2Z").expect("update");
        doc.show_error("load \"failed\"");
        assert_eq!(
            doc.to_svg_string(),
            concat!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="20">"#,
                r#"<g class="boundary">"#,
                r##"<path class="land" data-key="A&amp;B" d="M1,1L2,2Z" fill="#000000"/>"##,
                "</g>",
                r#"<text x="5" y="10" text-anchor="middle">load &quot;failed&quot;</text>"#,
                "</svg>"
            )
        );
    }

    #[test]
    fn removed_handles_are_unknown() {
        let mut doc = SvgDocument::new(1.0, 1.0);
        let h = doc.create_path("k", "", "#fff").expect("create");
        doc.remove_path(h).expect("remove");
        assert!(doc.is_empty());
        assert!(matches!(
            doc.update_path(&h, "M0,0Z"),
            Err(SurfaceError::UnknownHandle(_))
        ));
    }
}
