pub mod display;
pub mod image_payload;

pub use display::{DisplayLease, DisplayReference, DisplayRegistry};
pub use image_payload::ImagePayload;
