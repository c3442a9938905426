pub mod apply_mask;
pub mod background;
pub mod upscale;
