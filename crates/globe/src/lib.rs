//! Interactive orthographic choropleth globe.
//!
//! [`GlobeWidget`] owns everything one widget instance needs: the loaded
//! features, the color scale, the projection fit, the rotation and the drag
//! session. It renders through any [`layers::PathSurface`].

pub mod config;
pub mod drag;
pub mod error;
pub mod fitter;
pub mod rotation;
pub mod widget;

pub use config::*;
pub use drag::*;
pub use error::*;
pub use fitter::*;
pub use rotation::*;
pub use widget::*;
