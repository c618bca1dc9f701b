mod color;
mod point;

pub use color::{hsl_to_rgb, rgb_to_u8};
pub use point::{segment_points, smooth_toward, ScreenPoint};
