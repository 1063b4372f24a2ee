pub mod surface;
pub mod viewport;

pub use surface::{LookupPopup, TerminalSurface};
pub use viewport::{Bounds, Viewport};
