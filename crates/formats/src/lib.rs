pub mod dataset;
pub mod document;
pub mod geometry;
pub mod options;
pub mod topology;

pub use dataset::*;
pub use document::*;
pub use geometry::*;
pub use options::*;
pub use topology::*;
