//! Logical vs. physical viewport and the derived scale factor.
//!
//! Elements are authored in a fixed logical space; the visible surface has
//! whatever physical size the host gives it. The scale maps one to the other
//! and is floored to hundredths so fractional pixels don't open seams
//! between adjacent elements.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use crate::config::validate_resolution;
use crate::error::EditorError;
use crate::geom::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    logical_width: f64,
    logical_height: f64,
    physical_width: f64,
    physical_height: f64,
    scale: f64,
}

impl Viewport {
    /// A viewport for the given logical size with no physical area yet.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidResolution`] for a non-positive or
    /// non-finite logical size.
    pub fn new(logical_width: f64, logical_height: f64) -> Result<Self, EditorError> {
        validate_resolution(logical_width, logical_height)?;
        Ok(Self { logical_width, logical_height, physical_width: 0.0, physical_height: 0.0, scale: 0.0 })
    }

    /// Track a new physical size. Returns `true` if the scale changed.
    pub fn resize(&mut self, physical_width: f64, physical_height: f64) -> bool {
        self.physical_width = physical_width.max(0.0);
        self.physical_height = physical_height.max(0.0);
        self.recompute()
    }

    /// Change the logical space. Returns `true` if the scale changed.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidResolution`] and leaves the viewport
    /// untouched for a non-positive or non-finite size.
    pub fn set_logical(&mut self, width: f64, height: f64) -> Result<bool, EditorError> {
        validate_resolution(width, height)?;
        self.logical_width = width;
        self.logical_height = height;
        Ok(self.recompute())
    }

    fn recompute(&mut self) -> bool {
        let next = compute_scale(self.logical_width, self.logical_height, self.physical_width, self.physical_height);
        let changed = (next - self.scale).abs() > f64::EPSILON;
        self.scale = next;
        changed
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    #[must_use]
    pub fn logical_size(&self) -> (f64, f64) {
        (self.logical_width, self.logical_height)
    }

    #[must_use]
    pub fn physical_size(&self) -> (f64, f64) {
        (self.physical_width, self.physical_height)
    }

    /// Whether a viewport-local point lies within the physical bounds.
    #[must_use]
    pub fn contains_screen(&self, screen: Point) -> bool {
        screen.x >= 0.0 && screen.y >= 0.0 && screen.x <= self.physical_width && screen.y <= self.physical_height
    }

    /// Convert a viewport-local point to logical coordinates.
    ///
    /// `None` at zero scale: nothing is displayed, so no point maps back.
    #[must_use]
    pub fn screen_to_logical(&self, screen: Point) -> Option<Point> {
        if self.scale <= 0.0 {
            return None;
        }
        Some(screen.scaled(1.0 / self.scale))
    }

    /// Convert a logical point to viewport-local coordinates.
    #[must_use]
    pub fn logical_to_screen(&self, logical: Point) -> Point {
        logical.scaled(self.scale)
    }

    /// Convert a viewport-local distance to a logical one.
    #[must_use]
    pub fn screen_dist_to_logical(&self, dist: f64) -> f64 {
        if self.scale <= 0.0 { 0.0 } else { dist / self.scale }
    }
}

/// `floor(min(pw / lw, ph / lh) * 100) / 100`.
#[must_use]
pub fn compute_scale(logical_width: f64, logical_height: f64, physical_width: f64, physical_height: f64) -> f64 {
    if logical_width <= 0.0 || logical_height <= 0.0 {
        return 0.0;
    }
    let fit = (physical_width / logical_width).min(physical_height / logical_height);
    (fit * 100.0).floor() / 100.0
}
