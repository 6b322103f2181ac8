pub mod event_bus;
pub mod redraw;

pub use event_bus::*;
pub use redraw::*;
