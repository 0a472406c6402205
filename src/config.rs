//! Editor configuration.
//!
//! Every field has a default, so hosts only pass what they want to change.
//! The browser host hands over a JSON object (camelCase keys); native callers
//! build the struct directly.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    BORDER_PADDING, DEFAULT_LOGICAL_HEIGHT, DEFAULT_LOGICAL_WIDTH, HANDLE_RADIUS, RESIZE_THROTTLE_MS,
    ROTATE_GLYPH_RADIUS, ROTATE_HANDLE_OFFSET,
};
use crate::error::EditorError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Logical scene width.
    pub logical_width: f64,
    /// Logical scene height.
    pub logical_height: f64,
    /// Minimum interval between resize recomputations.
    pub resize_throttle_ms: f64,
    /// Hit slop around corner and rotate handles, in logical units.
    pub handle_radius: f64,
    /// Distance from the top edge to the rotate handle, in logical units.
    pub rotate_handle_offset: f64,
    /// Outward padding of the selection outline, in logical units.
    pub border_padding: f64,
    /// Inner ring radius of the rotate glyph, in physical pixels.
    pub rotate_glyph_radius: f64,
    /// Selection outline color.
    pub outline_color: String,
    /// Dash pattern of the selection outline, in physical pixels.
    pub outline_dash: Vec<f64>,
    /// Fill color of corner handles.
    pub handle_fill: String,
    /// Fill color of asset-less rectangles and triangles.
    pub shape_fill: String,
    /// Stroke color of asset-less outlines.
    pub shape_stroke: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            logical_width: DEFAULT_LOGICAL_WIDTH,
            logical_height: DEFAULT_LOGICAL_HEIGHT,
            resize_throttle_ms: RESIZE_THROTTLE_MS,
            handle_radius: HANDLE_RADIUS,
            rotate_handle_offset: ROTATE_HANDLE_OFFSET,
            border_padding: BORDER_PADDING,
            rotate_glyph_radius: ROTATE_GLYPH_RADIUS,
            outline_color: "#a00".into(),
            outline_dash: vec![5.0, 10.0],
            handle_fill: "#fff".into(),
            shape_fill: "#D94B4B".into(),
            shape_stroke: "#1F1A17".into(),
        }
    }
}

impl EditorConfig {
    /// Default config for a `width` x `height` logical scene.
    #[must_use]
    pub fn with_resolution(width: f64, height: f64) -> Self {
        Self { logical_width: width, logical_height: height, ..Self::default() }
    }

    /// Parse and validate a JSON config object.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidConfig`] for malformed JSON or
    /// out-of-range values, and [`EditorError::InvalidResolution`] for a bad
    /// logical size.
    pub fn from_json(raw: &str) -> Result<Self, EditorError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| EditorError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every numeric field is usable.
    ///
    /// # Errors
    ///
    /// See [`EditorConfig::from_json`].
    pub fn validate(&self) -> Result<(), EditorError> {
        validate_resolution(self.logical_width, self.logical_height)?;
        let non_negative = [
            ("resizeThrottleMs", self.resize_throttle_ms),
            ("handleRadius", self.handle_radius),
            ("rotateHandleOffset", self.rotate_handle_offset),
            ("borderPadding", self.border_padding),
            ("rotateGlyphRadius", self.rotate_glyph_radius),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(EditorError::InvalidConfig(format!("{name} must be a non-negative number, got {value}")));
            }
        }
        if self.outline_dash.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(EditorError::InvalidConfig("outlineDash entries must be non-negative".into()));
        }
        Ok(())
    }
}

/// Logical dimensions must be positive and finite.
///
/// # Errors
///
/// Returns [`EditorError::InvalidResolution`] otherwise.
pub fn validate_resolution(width: f64, height: f64) -> Result<(), EditorError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(EditorError::InvalidResolution { width, height })
    }
}
