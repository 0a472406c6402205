//! Picking: which element and which gesture handle lie under a point.
//!
//! All tests happen in logical space. Elements are scanned from the topmost
//! down; for each one the rotate handle is tried first, then the scale
//! corners, then the body, so handles stay grabbable where they overlap the
//! element. The first match ends the scan.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::config::EditorConfig;
use crate::doc::{Element, ElementId, ElementStore};
use crate::geom::{self, Point};

/// Which corner of the displayed box a scale gesture drags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomRight,
    BottomLeft,
}

impl Corner {
    const ALL: [Self; 4] = [Self::TopLeft, Self::TopRight, Self::BottomRight, Self::BottomLeft];

    /// Corner for an index into a TL, TR, BR, BL list.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// The diagonally opposite corner, which stays put while this one is dragged.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::TopLeft => Self::BottomRight,
            Self::TopRight => Self::BottomLeft,
            Self::BottomRight => Self::TopLeft,
            Self::BottomLeft => Self::TopRight,
        }
    }

    /// Whether dragging this corner moves the left edge.
    #[must_use]
    pub fn moves_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    /// Whether dragging this corner moves the top edge.
    #[must_use]
    pub fn moves_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }
}

/// How pointer deltas are applied once a drag starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    Move,
    Rotate,
    Scale(Corner),
}

/// Result of a pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub id: ElementId,
    pub gesture: Gesture,
}

/// Tolerances used by [`pick`], in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitParams {
    pub handle_radius: f64,
    pub rotate_handle_offset: f64,
    pub border_padding: f64,
}

impl From<&EditorConfig> for HitParams {
    fn from(config: &EditorConfig) -> Self {
        Self {
            handle_radius: config.handle_radius,
            rotate_handle_offset: config.rotate_handle_offset,
            border_padding: config.border_padding,
        }
    }
}

/// Logical position of an element's rotate handle.
#[must_use]
pub fn rotate_handle_position(element: &Element, offset: f64) -> Point {
    let (_, h) = element.extent();
    geom::rotate_handle_anchor(element.center(), h * 0.5, element.pose.angle, offset)
}

/// Logical positions of an element's four corners (TL, TR, BR, BL), rotated.
#[must_use]
pub fn corner_positions(element: &Element) -> [Point; 4] {
    let c = element.center();
    let (w, h) = element.extent();
    geom::rect_corners(w, h).map(|p| geom::rotate_about(p.offset(c.x, c.y), c, element.pose.angle))
}

/// Test a single element. `None` when the point misses it entirely.
#[must_use]
pub fn hit_element(pt: Point, element: &Element, params: &HitParams) -> Option<Gesture> {
    if !element.movable || !element.has_size() {
        return None;
    }

    let handle = rotate_handle_position(element, params.rotate_handle_offset);
    if geom::point_in_circle(pt, handle, params.handle_radius) {
        return Some(Gesture::Rotate);
    }

    let local = element.to_local(pt);
    let (w, h) = element.extent();
    if let Some(corner) = geom::corner_hit(local, &geom::rect_corners(w, h), params.handle_radius).and_then(Corner::from_index) {
        return Some(Gesture::Scale(corner));
    }

    let outline = geom::outer_offset(&element.local_polygon(), params.border_padding);
    if geom::point_in_polygon(local, &outline) {
        return Some(Gesture::Move);
    }
    None
}

/// Find the topmost element under `pt` and the gesture it starts.
#[must_use]
pub fn pick(pt: Point, doc: &ElementStore, params: &HitParams) -> Option<Hit> {
    doc.topmost_first()
        .into_iter()
        .find_map(|element| hit_element(pt, element, params).map(|gesture| Hit { id: element.id, gesture }))
}
