//! Rendering: composites the scene into an offscreen buffer, then blits it.
//!
//! This module is the only place that drives a [`Surface`]. It receives
//! read-only views of the element store and viewport and produces pixels;
//! the one piece of state it owns is the asset cache, since resolving assets
//! is part of drawing them.
//!
//! Each pass draws every element completely, in z-order, before the next one
//! starts. An element whose asset is still loading is skipped for the pass;
//! its completion schedules another redraw.
//!
//! All fallible surface calls propagate [`SurfaceError`]. The top-level
//! caller ([`crate::engine::Editor::redraw`]) logs the error and drops the
//! frame.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use std::f64::consts::{PI, TAU};

use crate::assets::{AssetCache, AssetEvent, AssetSource, AssetState, DecodedAsset};
use crate::config::EditorConfig;
use crate::consts::CORNER_HANDLE_HALF_PX;
use crate::doc::{Element, ElementId, ElementStore, ShapeKind};
use crate::geom::{self, Point};
use crate::surface::{Surface, SurfaceError};
use crate::viewport::Viewport;

/// Stroke width of asset-less outlines, in natural units.
const SHAPE_STROKE_WIDTH: f64 = 2.0;

/// Radius of the two dots on the rotate glyph, in physical pixels.
const GLYPH_DOT_RADIUS: f64 = 1.0;

struct Buffers<S> {
    visible: S,
    offscreen: S,
}

/// Double-buffered renderer plus the asset cache.
pub struct Renderer<S: Surface> {
    buffers: Option<Buffers<S>>,
    cache: AssetCache<S::Image>,
}

/// What a pass needs to know about the scene.
pub struct Scene<'a> {
    pub doc: &'a ElementStore,
    pub viewport: &'a Viewport,
    pub selected: Option<ElementId>,
    pub config: &'a EditorConfig,
}

impl<S: Surface> Renderer<S> {
    /// Wrap the visible surface and create its offscreen twin.
    ///
    /// A missing surface, or one that can't provide an offscreen buffer, is
    /// reported here once; every later draw is a no-op.
    pub fn new(surface: Option<S>) -> Self {
        let buffers = match surface {
            None => {
                tracing::warn!("no 2D rendering surface available; drawing is disabled");
                None
            }
            Some(visible) => match visible.create_offscreen() {
                Ok(offscreen) => Some(Buffers { visible, offscreen }),
                Err(err) => {
                    tracing::warn!(error = %err, "offscreen buffer unavailable; drawing is disabled");
                    None
                }
            },
        };
        Self { buffers, cache: AssetCache::new() }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.buffers.is_some()
    }

    /// Live display size of the visible surface.
    #[must_use]
    pub fn display_size(&self) -> Option<(f64, f64)> {
        self.buffers.as_ref().map(|b| b.visible.display_size())
    }

    /// Resize both buffers.
    pub fn resize(&mut self, width: f64, height: f64) {
        if let Some(b) = self.buffers.as_mut() {
            b.visible.resize(width, height);
            b.offscreen.resize(width, height);
        }
    }

    /// Record a finished asset load. Returns its intrinsic size on success.
    pub fn complete_asset(&mut self, event: AssetEvent<S::Image>) -> Option<(f64, f64)> {
        self.cache.complete(event)
    }

    /// Intrinsic size of an already-decoded source.
    #[must_use]
    pub fn cached_size(&self, src: &str) -> Option<(f64, f64)> {
        match self.cache.state(src) {
            Some(AssetState::Ready(asset)) => Some((asset.width, asset.height)),
            _ => None,
        }
    }

    #[must_use]
    pub fn visible(&self) -> Option<&S> {
        self.buffers.as_ref().map(|b| &b.visible)
    }

    pub fn visible_mut(&mut self) -> Option<&mut S> {
        self.buffers.as_mut().map(|b| &mut b.visible)
    }

    #[must_use]
    pub fn offscreen(&self) -> Option<&S> {
        self.buffers.as_ref().map(|b| &b.offscreen)
    }

    /// Draw the full scene offscreen, then present it in one blit.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any surface call fails; the visible surface keeps the
    /// previous frame in that case.
    pub fn render<A>(&mut self, scene: &Scene<'_>, assets: &mut A) -> Result<(), SurfaceError>
    where
        A: AssetSource<Image = S::Image>,
    {
        let Some(Buffers { visible, offscreen }) = self.buffers.as_mut() else {
            return Ok(());
        };
        let cache = &mut self.cache;
        let vs = scene.viewport.scale();

        // Layer 1: clear.
        let (w, h) = offscreen.size();
        offscreen.reset_transform()?;
        offscreen.clear_rect(0.0, 0.0, w, h);

        // Layer 2: elements in z-order (bottom first).
        for element in scene.doc.sorted() {
            let image = match element.src.as_deref() {
                Some(src) => match cache.resolve(src, assets) {
                    Some(asset) => Some(asset),
                    None => continue,
                },
                None => None,
            };
            if !element.has_size() {
                continue;
            }
            let selected = scene.selected == Some(element.id);
            draw_element(offscreen, element, image, vs, selected, scene.config)?;
        }

        // Layer 3: present.
        let (vw, vh) = visible.size();
        visible.reset_transform()?;
        visible.clear_rect(0.0, 0.0, vw, vh);
        visible.blit(offscreen)?;
        Ok(())
    }
}

// =============================================================
// Elements
// =============================================================

fn draw_element<S: Surface>(
    s: &mut S,
    element: &Element,
    image: Option<&DecodedAsset<S::Image>>,
    vs: f64,
    selected: bool,
    config: &EditorConfig,
) -> Result<(), SurfaceError> {
    let c = element.center();

    s.save();
    s.translate(c.x * vs, c.y * vs)?;
    s.rotate(element.pose.angle)?;

    s.save();
    s.scale(element.pose.scale_x * vs, element.pose.scale_y * vs)?;
    draw_body(s, element, image, config)?;
    s.restore();

    if selected {
        draw_selection(s, element, vs, config)?;
    }

    s.restore();
    s.reset_transform()?;
    Ok(())
}

/// Body in natural units, centered on the origin.
fn draw_body<S: Surface>(
    s: &mut S,
    element: &Element,
    image: Option<&DecodedAsset<S::Image>>,
    config: &EditorConfig,
) -> Result<(), SurfaceError> {
    let w = element.pose.width;
    let h = element.pose.height;

    if let Some(asset) = image {
        return s.draw_image(&asset.image, -w * 0.5, -h * 0.5, w, h);
    }

    let outline = element.kind.local_polygon(w, h);
    match element.kind {
        ShapeKind::Rectangle | ShapeKind::Triangle => {
            trace_polygon(s, &outline);
            s.set_fill_color(&config.shape_fill);
            s.fill();
        }
        ShapeKind::Outline => {
            trace_polygon(s, &outline);
            s.set_stroke_color(&config.shape_stroke);
            s.set_line_width(SHAPE_STROKE_WIDTH);
            s.stroke();
        }
        // Nothing to show until the asset arrives.
        ShapeKind::Image => {}
    }
    Ok(())
}

// =============================================================
// Selection UI
// =============================================================

/// Outline, rotate handle, and corner handles, drawn in the element's rotated
/// (but unscaled) frame with coordinates in physical pixels.
fn draw_selection<S: Surface>(
    s: &mut S,
    element: &Element,
    vs: f64,
    config: &EditorConfig,
) -> Result<(), SurfaceError> {
    let (w, h) = element.extent();

    // Mitered, dashed outline.
    let outline: Vec<Point> = geom::outer_offset(&element.local_polygon(), config.border_padding)
        .into_iter()
        .map(|p| p.scaled(vs))
        .collect();
    s.set_stroke_color(&config.outline_color);
    s.set_line_width(1.0);
    s.set_line_dash(&config.outline_dash)?;
    trace_polygon(s, &outline);
    s.stroke();
    s.set_line_dash(&[])?;

    // Stalk from the top-edge midpoint to the rotate handle.
    let top_mid = Point::new(0.0, -h * 0.5 * vs);
    let handle = geom::rotate_handle_anchor(Point::default(), h * 0.5, 0.0, config.rotate_handle_offset).scaled(vs);
    s.begin_path();
    s.move_to(top_mid.x, top_mid.y);
    s.line_to(handle.x, handle.y);
    s.stroke();

    draw_rotate_glyph(s, handle, config)?;

    // Corner handles.
    let half = CORNER_HANDLE_HALF_PX;
    for corner in geom::rect_corners(w, h) {
        let p = corner.scaled(vs);
        s.set_fill_color(&config.handle_fill);
        s.fill_rect(p.x - half, p.y - half, half * 2.0, half * 2.0);
        trace_polygon(
            s,
            &[p.offset(-half, -half), p.offset(half, -half), p.offset(half, half), p.offset(-half, half)],
        );
        s.stroke();
    }
    Ok(())
}

/// Circular-arrows glyph: a small ring inside two open arcs with end dots.
fn draw_rotate_glyph<S: Surface>(s: &mut S, at: Point, config: &EditorConfig) -> Result<(), SurfaceError> {
    let r = config.rotate_glyph_radius;
    let outer = r * 2.0;

    s.set_stroke_color(&config.outline_color);
    s.set_fill_color(&config.outline_color);

    s.begin_path();
    s.arc(at.x, at.y, r, 0.0, TAU)?;
    s.stroke();

    s.begin_path();
    s.arc(at.x, at.y, outer, -PI / 6.0, 4.0 * PI / 6.0)?;
    s.stroke();

    for angle in [4.0 * PI / 6.0, 10.0 * PI / 6.0] {
        s.begin_path();
        s.arc(at.x + outer * angle.cos(), at.y + outer * angle.sin(), GLYPH_DOT_RADIUS, 0.0, TAU)?;
        s.fill();
        s.stroke();
    }

    s.begin_path();
    s.arc(at.x, at.y, outer, 5.0 * PI / 6.0, 10.0 * PI / 6.0)?;
    s.stroke();
    Ok(())
}

// =============================================================
// Helpers
// =============================================================

fn trace_polygon<S: Surface>(s: &mut S, points: &[Point]) {
    s.begin_path();
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    s.move_to(first.x, first.y);
    for p in rest {
        s.line_to(p.x, p.y);
    }
    s.close_path();
}
