//! Interactive 2D scene editor.
//!
//! Elements (bitmaps and simple vector shapes) are placed in a fixed logical
//! coordinate space and rendered, scaled to fit, into a resizable surface. A
//! pointer selects an element and drags it, spins it by its rotate handle, or
//! resizes it by a corner handle. Rendering is double-buffered: each frame is
//! composed offscreen and presented in a single blit.
//!
//! The crate compiles natively (the [`surface::Surface`] and
//! [`assets::AssetSource`] traits are the only platform seams) and to
//! WebAssembly, where [`web`] binds it to an HTML canvas.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Host-facing [`engine::Editor`] and testable [`engine::EngineCore`] |
//! | [`doc`] | Elements, poses, and the z-ordered element store |
//! | [`geom`] | Points, rotation, centroids, outline offset, containment tests |
//! | [`hit`] | Picking elements and their gesture handles |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`render`] | Double-buffered scene rendering and the asset cache |
//! | [`surface`] | The 2D drawing surface trait |
//! | [`assets`] | Asynchronous asset loading and caching |
//! | [`viewport`] | Logical vs. physical size and the derived scale |
//! | [`throttle`] | Fixed-interval throttle used for resize |
//! | [`config`] | Editor configuration |
//! | [`error`] | Caller-facing error type |
//! | [`consts`] | Shared numeric constants (handle sizes, padding, etc.) |
//! | `web` | Browser host (`wasm32` only) |

pub mod assets;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod geom;
pub mod hit;
pub mod input;
pub mod render;
pub mod surface;
pub mod throttle;
pub mod viewport;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::EditorConfig;
pub use doc::{ElementId, ElementSpec, ShapeKind};
pub use engine::{Action, Editor, EngineCore};
pub use error::EditorError;
