//! The 2D drawing surface the renderer paints into.
//!
//! The trait mirrors the subset of the HTML canvas 2D context the editor
//! needs, so the browser implementation is a thin forwarder
//! (`web::CanvasSurface` on wasm32) and tests can record calls.
//! Calls that can fail on the platform return `Result`; infallible ones
//! don't.

#[cfg(test)]
#[path = "surface_test.rs"]
pub(crate) mod surface_test;

/// A surface call that failed (invalid transform, detached image, ...).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("surface call failed: {0}")]
pub struct SurfaceError(pub String);

pub trait Surface: Sized {
    /// Decoded, drawable asset handle.
    type Image;

    /// Live display size of the surface in physical pixels.
    fn display_size(&self) -> (f64, f64);

    /// Current backing-buffer size.
    fn size(&self) -> (f64, f64);

    /// Resize the backing buffer. Implementations may clear it.
    fn resize(&mut self, width: f64, height: f64);

    /// Create a detached buffer compatible with this surface.
    ///
    /// # Errors
    ///
    /// Fails when the platform can't provide another buffer or context.
    fn create_offscreen(&self) -> Result<Self, SurfaceError>;

    // --- Rects ---

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    // --- Paths ---

    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    /// Clockwise arc around `(x, y)` from `start` to `end` radians.
    ///
    /// # Errors
    ///
    /// Fails for a negative radius.
    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), SurfaceError>;
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);

    // --- Style ---

    fn set_fill_color(&mut self, color: &str);
    fn set_stroke_color(&mut self, color: &str);
    fn set_line_width(&mut self, width: f64);
    /// # Errors
    ///
    /// Fails when the platform rejects the dash list.
    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), SurfaceError>;

    // --- Transform stack ---

    fn save(&mut self);
    fn restore(&mut self);
    /// # Errors
    ///
    /// Fails for non-finite arguments on some platforms.
    fn translate(&mut self, x: f64, y: f64) -> Result<(), SurfaceError>;
    /// # Errors
    ///
    /// See [`Surface::translate`].
    fn rotate(&mut self, angle: f64) -> Result<(), SurfaceError>;
    /// # Errors
    ///
    /// See [`Surface::translate`].
    fn scale(&mut self, sx: f64, sy: f64) -> Result<(), SurfaceError>;
    /// Reset to the identity transform.
    ///
    /// # Errors
    ///
    /// See [`Surface::translate`].
    fn reset_transform(&mut self) -> Result<(), SurfaceError>;

    // --- Blits ---

    /// Draw `image` into the destination rect under the current transform.
    ///
    /// # Errors
    ///
    /// Fails when the image is not drawable (e.g. broken or detached).
    fn draw_image(&mut self, image: &Self::Image, dx: f64, dy: f64, dw: f64, dh: f64) -> Result<(), SurfaceError>;

    /// Copy all of `source` onto this surface at the origin.
    ///
    /// # Errors
    ///
    /// See [`Surface::draw_image`].
    fn blit(&mut self, source: &Self) -> Result<(), SurfaceError>;
}
