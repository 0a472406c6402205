//! Document model: scene elements, their pose, and the in-memory store.
//!
//! This module defines what is placed in the scene (`Element`, `ShapeKind`,
//! `Pose`), the caller-facing creation payload (`ElementSpec`), and the store
//! that owns all live elements and their stacking order (`ElementStore`).
//!
//! Poses live in logical space. `width`/`height` are the element's natural
//! size (the decoded asset's dimensions, or the size given at creation for
//! vector shapes); the displayed extent is natural size times scale.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::EditorError;
use crate::geom::{self, Point};

/// Unique identifier for a scene element.
pub type ElementId = Uuid;

/// The kind of a scene element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShapeKind {
    /// Bitmap sized by its decoded asset.
    #[default]
    Image,
    /// Rectangle; drawn from its asset when it has one, filled otherwise.
    Rectangle,
    /// Isosceles triangle with its apex on the top-edge midpoint.
    Triangle,
    /// Stroked rectangle outline.
    Outline,
}

impl ShapeKind {
    /// Outline of a `w` x `h` shape of this kind, centered on the origin.
    ///
    /// Rectangular kinds list corners TL, TR, BR, BL.
    #[must_use]
    pub fn local_polygon(self, w: f64, h: f64) -> Vec<Point> {
        match self {
            Self::Image | Self::Rectangle | Self::Outline => geom::rect_corners(w, h).to_vec(),
            Self::Triangle => {
                let hw = w * 0.5;
                let hh = h * 0.5;
                vec![Point::new(0.0, -hh), Point::new(hw, hh), Point::new(-hw, hh)]
            }
        }
    }
}

/// Position, natural size, rotation, and scale of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Left edge of the unrotated displayed box, in logical units.
    pub x: f64,
    /// Top edge of the unrotated displayed box, in logical units.
    pub y: f64,
    /// Natural width; zero until the backing asset has loaded.
    pub width: f64,
    /// Natural height; zero until the backing asset has loaded.
    pub height: f64,
    /// Clockwise rotation in radians around the displayed box center.
    pub angle: f64,
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
}

impl Default for Pose {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, width: 0.0, height: 0.0, angle: 0.0, scale_x: 1.0, scale_y: 1.0 }
    }
}

/// A placed element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Unique identifier, stable for the element's lifetime.
    pub id: ElementId,
    /// Shape kind.
    pub kind: ShapeKind,
    /// Asset source identifier, if the element is drawn from an asset.
    pub src: Option<String>,
    pub pose: Pose,
    /// Non-movable elements are skipped by picking.
    pub movable: bool,
    /// Stacking order; unique among live elements, higher draws on top.
    pub z_index: i64,
}

impl Element {
    /// Displayed width and height (natural size times scale).
    #[must_use]
    pub fn extent(&self) -> (f64, f64) {
        (self.pose.width * self.pose.scale_x, self.pose.height * self.pose.scale_y)
    }

    /// Whether the element has a known, non-zero size and can be hit.
    #[must_use]
    pub fn has_size(&self) -> bool {
        self.pose.width > 0.0 && self.pose.height > 0.0
    }

    /// Corners of the unrotated displayed box in logical space: TL, TR, BR, BL.
    #[must_use]
    pub fn bounding_box(&self) -> [Point; 4] {
        let (w, h) = self.extent();
        let Pose { x, y, .. } = self.pose;
        [Point::new(x, y), Point::new(x + w, y), Point::new(x + w, y + h), Point::new(x, y + h)]
    }

    /// Rotation pivot: the centroid of the displayed box.
    #[must_use]
    pub fn center(&self) -> Point {
        geom::centroid(&self.bounding_box())
    }

    /// Outline relative to the pivot, before rotation.
    #[must_use]
    pub fn local_polygon(&self) -> Vec<Point> {
        let (w, h) = self.extent();
        self.kind.local_polygon(w, h)
    }

    /// Outline in logical space, rotated about the pivot.
    #[must_use]
    pub fn world_polygon(&self) -> Vec<Point> {
        let c = self.center();
        self.local_polygon()
            .into_iter()
            .map(|p| geom::rotate_about(p.offset(c.x, c.y), c, self.pose.angle))
            .collect()
    }

    /// Map a logical-space point into the element's unrotated, pivot-relative frame.
    #[must_use]
    pub fn to_local(&self, p: Point) -> Point {
        let c = self.center();
        geom::rotate_about(p, c, -self.pose.angle).relative_to(c)
    }
}

/// Creation payload accepted by `add`.
///
/// Deserializes from the host's JSON shape, e.g.
/// `{"type": "IMAGE", "src": "a.png", "pos": [0, 0]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementSpec {
    #[serde(rename = "type")]
    pub kind: ShapeKind,
    /// Asset source; when present the element's size comes from the asset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Top-left position in logical units. Defaults to the origin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<[f64; 2]>,
    /// Natural size for asset-less shapes. Ignored when `src` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<[f64; 2]>,
    /// Initial rotation in radians.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    /// Initial scale factors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f64; 2]>,
    /// Defaults to `true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub movable: Option<bool>,
    /// Explicit stacking order; ignored when already taken by a live element.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
}

impl ElementSpec {
    /// Spec for an asset-backed element of `kind` at `(x, y)`.
    #[must_use]
    pub fn asset(kind: ShapeKind, src: impl Into<String>, x: f64, y: f64) -> Self {
        Self { kind, src: Some(src.into()), pos: Some([x, y]), ..Self::default() }
    }

    /// Spec for an asset-less vector shape with an explicit size.
    #[must_use]
    pub fn shape(kind: ShapeKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { kind, pos: Some([x, y]), size: Some([width, height]), ..Self::default() }
    }

    /// Parse a spec from the host's JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidSpec`] when the JSON does not describe a spec.
    pub fn from_json(raw: &str) -> Result<Self, EditorError> {
        serde_json::from_str(raw).map_err(|e| EditorError::InvalidSpec(e.to_string()))
    }
}

/// In-memory store of scene elements.
pub struct ElementStore {
    elements: HashMap<ElementId, Element>,
    z_max: i64,
}

impl ElementStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self { elements: HashMap::new(), z_max: 0 }
    }

    /// Build an element from `spec`, insert it on top (or at its free explicit
    /// z-index), and return its id.
    pub fn add(&mut self, spec: ElementSpec) -> ElementId {
        let id = Uuid::new_v4();
        let z_index = match spec.z_index {
            Some(z) if !self.z_taken(z) => z,
            _ => self.next_z(),
        };
        self.z_max = self.z_max.max(z_index);

        let src = spec.src.filter(|s| !s.is_empty());
        let [x, y] = spec.pos.unwrap_or([0.0, 0.0]);
        let [width, height] = match (&src, spec.size) {
            (None, Some(size)) => size,
            _ => [0.0, 0.0],
        };
        let [scale_x, scale_y] = spec.scale.unwrap_or([1.0, 1.0]);
        let pose = Pose {
            x,
            y,
            width,
            height,
            angle: geom::normalize_angle(spec.angle.unwrap_or(0.0)),
            scale_x,
            scale_y,
        };

        let element = Element {
            id,
            kind: spec.kind,
            src,
            pose,
            movable: spec.movable.unwrap_or(true),
            z_index,
        };
        self.elements.insert(id, element);
        id
    }

    /// Remove an element by id, returning it if it was present.
    pub fn remove(&mut self, id: &ElementId) -> Option<Element> {
        let removed = self.elements.remove(id)?;
        if removed.z_index == self.z_max {
            self.z_max = self.elements.values().map(|e| e.z_index).max().unwrap_or(0);
        }
        Some(removed)
    }

    #[must_use]
    pub fn get(&self, id: &ElementId) -> Option<&Element> {
        self.elements.get(id)
    }

    pub fn get_mut(&mut self, id: &ElementId) -> Option<&mut Element> {
        self.elements.get_mut(id)
    }

    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// Current maximum z-index (zero when empty).
    #[must_use]
    pub fn max_z(&self) -> i64 {
        self.z_max
    }

    /// Move an element on top of all others. Returns `true` if its z-index changed.
    pub fn raise_to_front(&mut self, id: &ElementId) -> bool {
        match self.elements.get(id) {
            Some(element) if element.z_index != self.z_max => {}
            _ => return false,
        }
        let next = self.next_z();
        let Some(element) = self.elements.get_mut(id) else {
            return false;
        };
        element.z_index = next;
        self.z_max = next;
        true
    }

    /// Fix the natural size of every live, still-unsized element drawn from `src`.
    ///
    /// Returns how many elements were sized. Elements removed while their
    /// asset was loading are simply no longer here.
    pub fn apply_asset_size(&mut self, src: &str, width: f64, height: f64) -> usize {
        let mut sized = 0;
        for element in self.elements.values_mut() {
            if element.src.as_deref() != Some(src) || element.has_size() {
                continue;
            }
            element.pose.width = width;
            element.pose.height = height;
            sized += 1;
        }
        sized
    }

    /// All elements sorted by `(z_index, id)` for draw order.
    #[must_use]
    pub fn sorted(&self) -> Vec<&Element> {
        let mut elements: Vec<&Element> = self.elements.values().collect();
        elements.sort_by(|a, b| a.z_index.cmp(&b.z_index).then_with(|| a.id.cmp(&b.id)));
        elements
    }

    /// All elements from the topmost down, for picking.
    #[must_use]
    pub fn topmost_first(&self) -> Vec<&Element> {
        let mut elements = self.sorted();
        elements.reverse();
        elements
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The z-index one above the current top. When the top already sits at
    /// `i64::MAX` the stack is renumbered `1..=len` first, keeping its order.
    fn next_z(&mut self) -> i64 {
        if self.z_max == i64::MAX {
            self.repack_z();
        }
        self.z_max + 1
    }

    fn repack_z(&mut self) {
        let order: Vec<ElementId> = self.sorted().iter().map(|e| e.id).collect();
        let mut z = 0;
        for id in order {
            z += 1;
            if let Some(element) = self.elements.get_mut(&id) {
                element.z_index = z;
            }
        }
        self.z_max = z;
        tracing::debug!(count = z, "z-indices repacked");
    }

    fn z_taken(&self, z: i64) -> bool {
        self.elements.values().any(|e| e.z_index == z)
    }
}

impl Default for ElementStore {
    fn default() -> Self {
        Self::new()
    }
}
