//! Safe bounding box types and functions.

mod common;

pub use transform::*;
mod transform;

pub use rect::*;
pub mod rect;

pub use xywh::*;
pub mod xywh;

pub use hw::*;
pub mod hw;

pub mod prelude {
    pub use crate::rect::{Rect, RectNum};
}
