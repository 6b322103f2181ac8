pub mod choropleth;
pub mod clip;
pub mod path;
pub mod svg;
pub mod symbology;

pub use choropleth::*;
pub use path::*;
pub use svg::*;
pub use symbology::*;
