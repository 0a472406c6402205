//! Errors surfaced to callers of the editor API.
//!
//! Asset and surface failures have their own types next to the traits that
//! produce them ([`crate::assets::AssetError`], [`crate::surface::SurfaceError`]);
//! those never escape the frame they happen in.

/// Caller-supplied input the editor cannot accept.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditorError {
    #[error("invalid resolution {width}x{height}: dimensions must be positive and finite")]
    InvalidResolution { width: f64, height: f64 },
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("invalid element spec: {0}")]
    InvalidSpec(String),
}
