pub mod canvas;
pub mod css;
pub mod error;
pub mod export;
pub mod frame;
pub mod layout;
pub mod options;
pub mod pack;

pub use canvas::{canvas_width, estimate, CanvasEstimate, CanvasStats, PackPreference};
pub use error::PackError;
pub use frame::{CombineMode, Frame, FrameKind, Placement};
pub use layout::lay_frames;
pub use pack::{pack, pack_with_width, SpriteSheet};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
