//! Editor engine: the interaction state machine and the host-facing editor.
//!
//! `EngineCore` owns the element store, viewport, gesture state, and
//! selection, and has no rendering dependencies so it can be driven directly
//! from tests. `Editor` wraps it together with a [`Renderer`], an
//! [`AssetSource`], and the resize throttle, and is what hosts construct.
//!
//! Input handlers only set a dirty flag; `Editor::tick` drains it with at
//! most one redraw, so a burst of pointer-moves between two animation frames
//! costs a single composite.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use crate::assets::AssetSource;
use crate::config::EditorConfig;
use crate::consts::MIN_SCALE;
use crate::doc::{Element, ElementId, ElementSpec, ElementStore};
use crate::error::EditorError;
use crate::geom::{self, Point};
use crate::hit::{self, Corner, Gesture, Hit, HitParams};
use crate::input::{Button, InputState, Key};
use crate::render::{Renderer, Scene};
use crate::surface::Surface;
use crate::throttle::Throttle;
use crate::viewport::Viewport;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Something visible changed; schedule a frame.
    RenderNeeded,
    /// The selected element changed (or was cleared).
    SelectionChanged(Option<ElementId>),
    ElementRemoved { id: ElementId },
}

/// Core engine state: all logic that doesn't touch a surface.
pub struct EngineCore {
    pub doc: ElementStore,
    pub viewport: Viewport,
    pub input: InputState,
    pub config: EditorConfig,
    selected: Option<ElementId>,
    dirty: bool,
}

impl EngineCore {
    /// # Errors
    ///
    /// Returns an [`EditorError`] if `config` doesn't validate.
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        config.validate()?;
        let viewport = Viewport::new(config.logical_width, config.logical_height)?;
        Ok(Self {
            doc: ElementStore::new(),
            viewport,
            input: InputState::default(),
            config,
            selected: None,
            dirty: true,
        })
    }

    // --- Data inputs ---

    /// Insert a new element on top of the stack.
    pub fn add(&mut self, spec: ElementSpec) -> ElementId {
        let id = self.doc.add(spec);
        tracing::debug!(%id, "element added");
        self.dirty = true;
        id
    }

    /// Remove an element. Unknown ids are ignored.
    pub fn remove(&mut self, id: &ElementId) -> Vec<Action> {
        let Some(removed) = self.doc.remove(id) else {
            tracing::debug!(%id, "remove ignored: no such element");
            return Vec::new();
        };
        let mut actions = vec![Action::ElementRemoved { id: removed.id }];
        if self.selected == Some(removed.id) {
            self.selected = None;
            actions.push(Action::SelectionChanged(None));
        }
        if matches!(self.input, InputState::Dragging { id, .. } if id == removed.id) {
            self.input = InputState::Idle;
        }
        tracing::debug!(id = %removed.id, "element removed");
        self.dirty = true;
        actions.push(Action::RenderNeeded);
        actions
    }

    /// Record an asset's intrinsic size on the elements still waiting for it.
    pub fn apply_asset_size(&mut self, src: &str, width: f64, height: f64) -> usize {
        let sized = self.doc.apply_asset_size(src, width, height);
        if sized > 0 {
            self.dirty = true;
        }
        sized
    }

    // --- Picking ---

    /// Pick at a logical point, raising the hit element to the front.
    pub fn pick(&mut self, logical: Point) -> Option<Hit> {
        let hit = hit::pick(logical, &self.doc, &HitParams::from(&self.config))?;
        if self.doc.raise_to_front(&hit.id) {
            tracing::debug!(id = %hit.id, z = self.doc.max_z(), "raised to front");
            self.dirty = true;
        }
        Some(hit)
    }

    // --- Input events ---

    /// Pointer pressed at a viewport-local point.
    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        if button != Button::Primary {
            return Vec::new();
        }
        let previous = self.selected;
        let top_before = self.doc.max_z();

        let hit = self.viewport.screen_to_logical(screen).and_then(|logical| self.pick(logical));
        match hit {
            Some(Hit { id, gesture }) => {
                tracing::debug!(%id, ?gesture, "drag started");
                self.selected = Some(id);
                self.input = InputState::Dragging { id, gesture, last_screen: screen };
            }
            None => {
                self.selected = None;
                self.input = InputState::Idle;
            }
        }

        let mut actions = Vec::new();
        if self.selected != previous {
            self.dirty = true;
            actions.push(Action::SelectionChanged(self.selected));
        }
        if self.selected != previous || self.doc.max_z() != top_before {
            actions.push(Action::RenderNeeded);
        }
        actions
    }

    /// Pointer moved to a viewport-local point.
    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        let InputState::Dragging { id, gesture, last_screen } = self.input else {
            return Vec::new();
        };
        if !self.viewport.contains_screen(screen) {
            self.end_drag();
            return Vec::new();
        }
        let (Some(from), Some(to)) =
            (self.viewport.screen_to_logical(last_screen), self.viewport.screen_to_logical(screen))
        else {
            self.end_drag();
            return Vec::new();
        };
        let Some(element) = self.doc.get_mut(&id) else {
            self.input = InputState::Idle;
            return Vec::new();
        };

        let vp = &self.viewport;
        match gesture {
            Gesture::Move => {
                element.pose.x += vp.screen_dist_to_logical(screen.x - last_screen.x);
                element.pose.y += vp.screen_dist_to_logical(screen.y - last_screen.y);
            }
            Gesture::Rotate => {
                let swept = geom::angle_between(element.center(), from, to);
                element.pose.angle = geom::normalize_angle(element.pose.angle + swept);
            }
            Gesture::Scale(corner) => drag_corner(element, corner, to),
        }

        self.input = InputState::Dragging { id, gesture, last_screen: screen };
        self.dirty = true;
        vec![Action::RenderNeeded]
    }

    /// Pointer released. The selection persists.
    pub fn on_pointer_up(&mut self, _screen: Point, button: Button) -> Vec<Action> {
        if button == Button::Primary {
            self.end_drag();
        }
        Vec::new()
    }

    /// Pointer left the viewport.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.end_drag();
        Vec::new()
    }

    /// Key pressed. Delete/Backspace removes the selected element.
    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if !key.is_delete() {
            return Vec::new();
        }
        let Some(id) = self.selected else {
            return Vec::new();
        };
        self.input = InputState::Idle;
        self.remove(&id)
    }

    fn end_drag(&mut self) {
        if let InputState::Dragging { id, .. } = self.input {
            tracing::debug!(%id, "drag ended");
        }
        self.input = InputState::Idle;
    }

    // --- Redraw bookkeeping ---

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag, returning whether it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    // --- Queries ---

    /// The currently selected element, if any.
    #[must_use]
    pub fn selection(&self) -> Option<ElementId> {
        self.selected
    }

    #[must_use]
    pub fn is_selected(&self, id: &ElementId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Look up an element by id.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.doc.get(id)
    }
}

/// Resize by dragging `corner` to `pointer` (logical) while the opposite
/// corner stays fixed in world space.
fn drag_corner(element: &mut Element, corner: Corner, pointer: Point) {
    let natural_w = element.pose.width;
    let natural_h = element.pose.height;
    if natural_w <= 0.0 || natural_h <= 0.0 {
        return;
    }

    let center = element.center();
    let angle = element.pose.angle;
    let (w, h) = element.extent();
    let anchor = geom::rect_corners(w, h)[corner.opposite().index()];
    let local = element.to_local(pointer);

    let new_w = if corner.moves_left() { anchor.x - local.x } else { local.x - anchor.x };
    let new_h = if corner.moves_top() { anchor.y - local.y } else { local.y - anchor.y };
    let scale_x = geom::round2(new_w / natural_w).max(MIN_SCALE);
    let scale_y = geom::round2(new_h / natural_h).max(MIN_SCALE);
    let final_w = natural_w * scale_x;
    let final_h = natural_h * scale_y;

    // The new center sits half the new extent away from the fixed corner,
    // along the element's own axes.
    let anchor_world = geom::rotate_about(anchor.offset(center.x, center.y), center, angle);
    let half_x = if corner.moves_left() { -final_w * 0.5 } else { final_w * 0.5 };
    let half_y = if corner.moves_top() { -final_h * 0.5 } else { final_h * 0.5 };
    let new_center = geom::rotate_about(anchor_world.offset(half_x, half_y), anchor_world, angle);

    element.pose.scale_x = scale_x;
    element.pose.scale_y = scale_y;
    element.pose.x = new_center.x - final_w * 0.5;
    element.pose.y = new_center.y - final_h * 0.5;
}

// =============================================================
// Editor
// =============================================================

/// A scene editor bound to a surface and an asset source.
pub struct Editor<S: Surface, A> {
    core: EngineCore,
    renderer: Renderer<S>,
    assets: A,
    resize: Throttle,
    attached: bool,
}

impl<S, A> Editor<S, A>
where
    S: Surface,
    A: AssetSource<Image = S::Image>,
{
    /// Create an editor with default settings for a logical scene size.
    ///
    /// Pass `None` for `surface` when no 2D surface is available; the editor
    /// then tracks state without drawing.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidResolution`] for a bad logical size.
    pub fn new(surface: Option<S>, assets: A, logical_width: f64, logical_height: f64) -> Result<Self, EditorError> {
        Self::with_config(surface, assets, EditorConfig::with_resolution(logical_width, logical_height))
    }

    /// # Errors
    ///
    /// Returns an [`EditorError`] if `config` doesn't validate.
    pub fn with_config(surface: Option<S>, assets: A, config: EditorConfig) -> Result<Self, EditorError> {
        let core = EngineCore::new(config)?;
        let resize = Throttle::new(core.config.resize_throttle_ms);
        let mut editor = Self { core, renderer: Renderer::new(surface), assets, resize, attached: true };
        editor.recompute_viewport();
        editor.redraw();
        tracing::info!(
            logical_width = editor.core.config.logical_width,
            logical_height = editor.core.config.logical_height,
            scale = editor.core.viewport.scale(),
            drawing = editor.renderer.is_supported(),
            "editor created"
        );
        Ok(editor)
    }

    // --- Public API ---

    /// Add an element and redraw.
    pub fn add(&mut self, spec: ElementSpec) -> ElementId {
        let id = self.core.add(spec);
        let cached = self
            .core
            .element(&id)
            .and_then(|e| e.src.as_deref())
            .and_then(|src| self.renderer.cached_size(src).map(|size| (src.to_owned(), size)));
        if let Some((src, (w, h))) = cached {
            self.core.apply_asset_size(&src, w, h);
        }
        self.recompute_viewport();
        self.redraw();
        id
    }

    /// Remove an element and redraw. Unknown ids are ignored.
    pub fn remove(&mut self, id: &ElementId) -> Vec<Action> {
        let actions = self.core.remove(id);
        if !actions.is_empty() {
            self.redraw();
        }
        actions
    }

    /// Change the logical scene size and redraw.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidResolution`] and changes nothing for a
    /// non-positive or non-finite size.
    pub fn change_resolution(&mut self, width: f64, height: f64) -> Result<(), EditorError> {
        self.core.viewport.set_logical(width, height)?;
        self.core.config.logical_width = width;
        self.core.config.logical_height = height;
        tracing::info!(width, height, "logical resolution changed");
        self.recompute_viewport();
        self.redraw();
        Ok(())
    }

    /// Resize notification. Throttled; a trailing call fires from [`Self::tick`].
    pub fn on_resize(&mut self, now_ms: f64) {
        if !self.attached {
            return;
        }
        if self.resize.call(now_ms) {
            self.recompute_viewport();
            self.redraw();
        }
    }

    /// One scheduler tick: apply finished asset loads, fire a due trailing
    /// resize, and redraw once if anything changed. Returns whether it drew.
    pub fn tick(&mut self, now_ms: f64) -> bool {
        if !self.attached {
            return false;
        }
        for event in self.assets.drain_completed() {
            let src = event.src.clone();
            if let Some((w, h)) = self.renderer.complete_asset(event) {
                let sized = self.core.apply_asset_size(&src, w, h);
                tracing::debug!(%src, sized, "asset sizes applied");
            }
            // Elements skipped while the asset was pending can draw now.
            self.core.mark_dirty();
        }
        if self.resize.poll(now_ms) {
            self.recompute_viewport();
        }
        if self.core.take_dirty() {
            self.draw();
            return true;
        }
        false
    }

    /// Detach from input: handlers and ticks become no-ops.
    pub fn clear(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        self.resize.cancel();
        self.core.input = InputState::Idle;
        tracing::info!("editor detached");
    }

    /// Redraw now, regardless of the dirty flag.
    pub fn redraw(&mut self) {
        self.core.take_dirty();
        self.draw();
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen: Point, button: Button) -> Vec<Action> {
        if !self.attached {
            return Vec::new();
        }
        self.core.on_pointer_down(screen, button)
    }

    pub fn on_pointer_move(&mut self, screen: Point) -> Vec<Action> {
        if !self.attached {
            return Vec::new();
        }
        self.core.on_pointer_move(screen)
    }

    pub fn on_pointer_up(&mut self, screen: Point, button: Button) -> Vec<Action> {
        if !self.attached {
            return Vec::new();
        }
        self.core.on_pointer_up(screen, button)
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        if !self.attached {
            return Vec::new();
        }
        self.core.on_pointer_leave()
    }

    pub fn on_key_down(&mut self, key: &Key) -> Vec<Action> {
        if !self.attached {
            return Vec::new();
        }
        self.core.on_key_down(key)
    }

    // --- Queries ---

    #[must_use]
    pub fn core(&self) -> &EngineCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut EngineCore {
        &mut self.core
    }

    #[must_use]
    pub fn renderer(&self) -> &Renderer<S> {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut Renderer<S> {
        &mut self.renderer
    }

    pub fn assets_mut(&mut self) -> &mut A {
        &mut self.assets
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    // --- Internals ---

    /// Read the live display size, resize both buffers, and recompute the scale.
    fn recompute_viewport(&mut self) {
        let Some((width, height)) = self.renderer.display_size() else {
            return;
        };
        self.renderer.resize(width, height);
        if self.core.viewport.resize(width, height) {
            tracing::debug!(width, height, scale = self.core.viewport.scale(), "viewport rescaled");
        }
        self.core.mark_dirty();
    }

    fn draw(&mut self) {
        let scene = Scene {
            doc: &self.core.doc,
            viewport: &self.core.viewport,
            selected: self.core.selection(),
            config: &self.core.config,
        };
        if let Err(err) = self.renderer.render(&scene, &mut self.assets) {
            tracing::warn!(error = %err, "frame dropped");
        }
    }
}
