//! # ludus_gfx
//!
//! Software rendering backend for the ludus engine. The surface exposed
//! to components is deliberately narrow:
//!
//! - [`Graphics::load_image`] — asynchronously load (and cache) a PNG.
//! - [`Graphics::draw_centered`] — queue a draw, centred at a point.
//! - [`Graphics::render_frame`] — flush the queue onto the framebuffer.
//!
//! Rendering is headless: frames are composited into an RGBA buffer that
//! a host can present however it likes (window blit, screenshot, test
//! assertion).

pub mod error;
pub mod graphics;

pub use error::GfxError;
pub use graphics::{GfxConfig, Graphics};

// Re-export the pixel buffer type used throughout the engine.
pub use image::RgbaImage;
