//! The graphics service: image cache, draw queue, frame compositor.

use std::path::PathBuf;
use std::sync::Arc;

use dashmap::DashMap;
use image::{Rgba, RgbaImage, imageops};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::GfxError;

/// Configuration for the graphics backend.
#[derive(Debug, Clone)]
pub struct GfxConfig {
    /// Framebuffer width in pixels.
    pub width: u32,
    /// Framebuffer height in pixels.
    pub height: u32,
    /// Directory image names are resolved against (`<root>/<name>.png`).
    pub asset_root: PathBuf,
}

impl Default for GfxConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            asset_root: PathBuf::from("assets/img"),
        }
    }
}

/// One queued draw operation.
struct DrawCommand {
    image: Arc<RgbaImage>,
    x: f32,
    y: f32,
}

/// The rendering service shared by display components.
///
/// Draw calls only queue work; nothing touches the framebuffer until
/// [`Graphics::render_frame`] flushes the queue at the end of the
/// display walk.
pub struct Graphics {
    config: GfxConfig,
    cache: DashMap<String, Arc<RgbaImage>>,
    queue: Mutex<Vec<DrawCommand>>,
    surface: Mutex<RgbaImage>,
}

impl Graphics {
    /// Create a backend with an empty cache and a black framebuffer.
    #[must_use]
    pub fn new(config: GfxConfig) -> Self {
        let surface = RgbaImage::from_pixel(config.width, config.height, Rgba([0, 0, 0, 255]));
        Self {
            config,
            cache: DashMap::new(),
            queue: Mutex::new(Vec::new()),
            surface: Mutex::new(surface),
        }
    }

    /// Load the image called `name`, reading `<asset_root>/<name>.png`.
    ///
    /// Loaded images are cached by name; repeat loads are free and share
    /// one decoded copy.
    ///
    /// # Errors
    ///
    /// [`GfxError::Io`] if the file cannot be read, [`GfxError::Decode`]
    /// if it is not a decodable image.
    pub async fn load_image(&self, name: &str) -> Result<Arc<RgbaImage>, GfxError> {
        if let Some(hit) = self.cache.get(name) {
            return Ok(hit.clone());
        }

        let path = self.config.asset_root.join(format!("{name}.png"));
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| GfxError::Io {
                path: path.clone(),
                source,
            })?;
        let decoded = image::load_from_memory(&bytes)?.to_rgba8();
        debug!(
            name,
            width = decoded.width(),
            height = decoded.height(),
            "image loaded"
        );

        let decoded = Arc::new(decoded);
        self.cache.insert(name.to_string(), decoded.clone());
        Ok(decoded)
    }

    /// Queue `image` to be drawn centred at `(x, y)` on the next
    /// [`Graphics::render_frame`].
    pub fn draw_centered(&self, image: Arc<RgbaImage>, x: f32, y: f32) {
        self.queue.lock().push(DrawCommand { image, x, y });
    }

    /// Number of draw operations currently queued.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.queue.lock().len()
    }

    /// Flush the queue: clear the framebuffer and composite every queued
    /// command in queue order. Returns the number of commands flushed.
    pub fn render_frame(&self) -> usize {
        let commands = std::mem::take(&mut *self.queue.lock());
        let mut surface = self.surface.lock();

        for pixel in surface.pixels_mut() {
            *pixel = Rgba([0, 0, 0, 255]);
        }
        for command in &commands {
            let left = (command.x - command.image.width() as f32 / 2.0).round() as i64;
            let top = (command.y - command.image.height() as f32 / 2.0).round() as i64;
            imageops::overlay(&mut *surface, &*command.image, left, top);
        }

        trace!(commands = commands.len(), "frame rendered");
        commands.len()
    }

    /// Snapshot of the current framebuffer contents.
    #[must_use]
    pub fn frame(&self) -> RgbaImage {
        self.surface.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_graphics(asset_root: PathBuf) -> Graphics {
        Graphics::new(GfxConfig {
            width: 16,
            height: 16,
            asset_root,
        })
    }

    fn write_png(dir: &std::path::Path, name: &str, color: Rgba<u8>) {
        let img = RgbaImage::from_pixel(2, 2, color);
        img.save(dir.join(format!("{name}.png"))).unwrap();
    }

    #[tokio::test]
    async fn test_load_image_reads_and_caches() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "ball", Rgba([255, 0, 0, 255]));
        let gfx = test_graphics(dir.path().to_path_buf());

        let first = gfx.load_image("ball").await.unwrap();
        assert_eq!(first.dimensions(), (2, 2));

        // Remove the file: the second load must come from the cache.
        std::fs::remove_file(dir.path().join("ball.png")).unwrap();
        let second = gfx.load_image("ball").await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_load_missing_image_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let gfx = test_graphics(dir.path().to_path_buf());

        let err = gfx.load_image("nope").await.unwrap_err();
        match err {
            GfxError::Io { path, .. } => {
                assert!(path.ends_with("nope.png"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[tokio::test]
    async fn test_load_undecodable_image_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("junk.png"), b"not a png").unwrap();
        let gfx = test_graphics(dir.path().to_path_buf());

        let err = gfx.load_image("junk").await.unwrap_err();
        assert!(matches!(err, GfxError::Decode(_)));
    }

    #[test]
    fn test_draw_queues_without_touching_the_surface() {
        let gfx = test_graphics(PathBuf::new());
        let white = Arc::new(RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255])));

        gfx.draw_centered(white, 8.0, 8.0);
        assert_eq!(gfx.queued(), 1);
        assert_eq!(gfx.frame().get_pixel(8, 8), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_render_frame_composites_and_clears_the_queue() {
        let gfx = test_graphics(PathBuf::new());
        let white = Arc::new(RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255])));

        gfx.draw_centered(white, 8.0, 8.0);
        let flushed = gfx.render_frame();
        assert_eq!(flushed, 1);
        assert_eq!(gfx.queued(), 0);

        let frame = gfx.frame();
        assert_eq!(frame.get_pixel(8, 8), &Rgba([255, 255, 255, 255]));
        assert_eq!(frame.get_pixel(0, 0), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_render_frame_clears_previous_contents() {
        let gfx = test_graphics(PathBuf::new());
        let white = Arc::new(RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255])));

        gfx.draw_centered(white, 8.0, 8.0);
        gfx.render_frame();
        // Nothing queued: the next flush leaves an empty frame.
        gfx.render_frame();
        assert_eq!(gfx.frame().get_pixel(8, 8), &Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_offscreen_draws_are_clipped() {
        let gfx = test_graphics(PathBuf::new());
        let white = Arc::new(RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255])));

        gfx.draw_centered(white, -100.0, -100.0);
        let flushed = gfx.render_frame();
        assert_eq!(flushed, 1);
    }
}
