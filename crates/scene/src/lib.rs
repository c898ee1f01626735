pub mod layout;
pub mod orientation;
pub mod picking;
pub mod projection;
pub mod tiles;

pub use layout::*;
pub use orientation::*;
pub use picking::*;
pub use projection::*;
pub use tiles::*;
