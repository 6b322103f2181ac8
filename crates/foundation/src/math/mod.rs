pub mod geodesy;
pub mod orthographic;
pub mod rotation;
pub mod vec;

pub use geodesy::*;
pub use orthographic::*;
pub use rotation::*;
pub use vec::*;
