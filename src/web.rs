//! Browser host: canvas surface, image loader, and the JS-facing editor.
//!
//! Only compiled for `wasm32`. Everything here is glue: DOM events are
//! translated into [`Editor`] calls and a `requestAnimationFrame` loop drives
//! [`Editor::tick`]. No editor logic lives in this module.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use js_sys::Date;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{CanvasRenderingContext2d, Event, EventTarget, HtmlCanvasElement, HtmlImageElement, KeyboardEvent, MouseEvent};

use crate::assets::{AssetError, AssetEvent, AssetSource, DecodedAsset};
use crate::doc::{ElementId, ElementSpec};
use crate::engine::Editor;
use crate::error::EditorError;
use crate::geom::Point;
use crate::input::{Button, Key};
use crate::surface::{Surface, SurfaceError};

fn surface_err(err: JsValue) -> SurfaceError {
    SurfaceError(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn js_err(err: EditorError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

// =============================================================
// Surface
// =============================================================

/// An `HtmlCanvasElement` and its 2D context.
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// `None` when the canvas has no 2D context.
    #[must_use]
    pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
        match canvas.get_context("2d") {
            Ok(Some(obj)) => match obj.dyn_into::<CanvasRenderingContext2d>() {
                Ok(ctx) => Some(Self { canvas, ctx }),
                Err(_) => None,
            },
            Ok(None) | Err(_) => None,
        }
    }
}

impl Surface for CanvasSurface {
    type Image = HtmlImageElement;

    fn display_size(&self) -> (f64, f64) {
        (f64::from(self.canvas.client_width()), f64::from(self.canvas.client_height()))
    }

    fn size(&self) -> (f64, f64) {
        (f64::from(self.canvas.width()), f64::from(self.canvas.height()))
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width.max(0.0).round() as u32);
        self.canvas.set_height(height.max(0.0).round() as u32);
    }

    fn create_offscreen(&self) -> Result<Self, SurfaceError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| SurfaceError("no document".into()))?;
        let canvas = document
            .create_element("canvas")
            .map_err(surface_err)?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SurfaceError("created element is not a canvas".into()))?;
        canvas.set_width(self.canvas.width());
        canvas.set_height(self.canvas.height());
        Self::new(canvas).ok_or_else(|| SurfaceError("offscreen canvas has no 2d context".into()))
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.fill_rect(x, y, width, height);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), SurfaceError> {
        self.ctx.arc(x, y, radius, start, end).map_err(surface_err)
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn set_fill_color(&mut self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn set_stroke_color(&mut self, color: &str) {
        self.ctx.set_stroke_style_str(color);
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), SurfaceError> {
        let array: js_sys::Array = segments.iter().map(|s| JsValue::from_f64(*s)).collect();
        self.ctx.set_line_dash(&array).map_err(surface_err)
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn translate(&mut self, x: f64, y: f64) -> Result<(), SurfaceError> {
        self.ctx.translate(x, y).map_err(surface_err)
    }

    fn rotate(&mut self, angle: f64) -> Result<(), SurfaceError> {
        self.ctx.rotate(angle).map_err(surface_err)
    }

    fn scale(&mut self, sx: f64, sy: f64) -> Result<(), SurfaceError> {
        self.ctx.scale(sx, sy).map_err(surface_err)
    }

    fn reset_transform(&mut self) -> Result<(), SurfaceError> {
        self.ctx.reset_transform().map_err(surface_err)
    }

    fn draw_image(&mut self, image: &HtmlImageElement, dx: f64, dy: f64, dw: f64, dh: f64) -> Result<(), SurfaceError> {
        self.ctx
            .draw_image_with_html_image_element_and_dw_and_dh(image, dx, dy, dw, dh)
            .map_err(surface_err)
    }

    fn blit(&mut self, source: &Self) -> Result<(), SurfaceError> {
        self.ctx
            .draw_image_with_html_canvas_element(&source.canvas, 0.0, 0.0)
            .map_err(surface_err)
    }
}

// =============================================================
// Assets
// =============================================================

type Completed = Rc<RefCell<Vec<AssetEvent<HtmlImageElement>>>>;

/// Loads images through `HtmlImageElement`; completions queue until drained.
#[derive(Default)]
pub struct ImageLoader {
    completed: Completed,
}

impl AssetSource for ImageLoader {
    type Image = HtmlImageElement;

    fn request(&mut self, src: &str) {
        let img = match HtmlImageElement::new() {
            Ok(img) => img,
            Err(err) => {
                self.completed.borrow_mut().push(AssetEvent {
                    src: src.to_owned(),
                    result: Err(AssetError { src: src.to_owned(), reason: format!("{err:?}") }),
                });
                return;
            }
        };

        let queue = Rc::clone(&self.completed);
        let loaded = img.clone();
        let key = src.to_owned();
        let onload = Closure::once(move || {
            let asset = DecodedAsset {
                width: f64::from(loaded.natural_width()),
                height: f64::from(loaded.natural_height()),
                image: loaded,
            };
            queue.borrow_mut().push(AssetEvent { src: key, result: Ok(asset) });
        });

        let queue = Rc::clone(&self.completed);
        let key = src.to_owned();
        let onerror = Closure::once(move || {
            let error = AssetError { src: key.clone(), reason: "image failed to load or decode".into() };
            queue.borrow_mut().push(AssetEvent { src: key, result: Err(error) });
        });

        img.set_onload(Some(onload.as_ref().unchecked_ref()));
        img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        img.set_src(src);
        onload.forget();
        onerror.forget();
    }

    fn drain_completed(&mut self) -> Vec<AssetEvent<HtmlImageElement>> {
        std::mem::take(&mut *self.completed.borrow_mut())
    }
}

// =============================================================
// JS API
// =============================================================

type SharedEditor = Rc<RefCell<Editor<CanvasSurface, ImageLoader>>>;
type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

fn listen<F>(target: &EventTarget, event: &'static str, handler: F) -> Result<Listener, JsValue>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    Ok(Listener { target: target.clone(), event, callback })
}

fn mouse_point(event: &Event) -> Option<(Point, Button)> {
    let mouse = event.dyn_ref::<MouseEvent>()?;
    let pt = Point::new(f64::from(mouse.offset_x()), f64::from(mouse.offset_y()));
    Some((pt, Button::from_dom(mouse.button())))
}

/// Scene editor bound to a `<canvas>`.
#[wasm_bindgen]
pub struct WebEditor {
    editor: SharedEditor,
    listeners: Vec<Listener>,
    running: Rc<Cell<bool>>,
}

#[wasm_bindgen]
impl WebEditor {
    /// Attach an editor to `canvas` with a logical scene of `width` x `height`.
    ///
    /// # Errors
    ///
    /// Rejects a non-positive logical size, or a page without a window.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement, width: f64, height: f64) -> Result<WebEditor, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let surface = CanvasSurface::new(canvas.clone());
        let editor: SharedEditor =
            Rc::new(RefCell::new(Editor::new(surface, ImageLoader::default(), width, height).map_err(js_err)?));

        let canvas_target: &EventTarget = canvas.as_ref();
        let window_target: &EventTarget = window.as_ref();
        let mut listeners = Vec::new();

        let ed = Rc::clone(&editor);
        listeners.push(listen(canvas_target, "mousedown", move |event| {
            if let Some((pt, button)) = mouse_point(&event) {
                ed.borrow_mut().on_pointer_down(pt, button);
            }
        })?);

        let ed = Rc::clone(&editor);
        listeners.push(listen(canvas_target, "mousemove", move |event| {
            if let Some((pt, _)) = mouse_point(&event) {
                ed.borrow_mut().on_pointer_move(pt);
            }
        })?);

        let ed = Rc::clone(&editor);
        listeners.push(listen(canvas_target, "mouseup", move |event| {
            if let Some((pt, button)) = mouse_point(&event) {
                ed.borrow_mut().on_pointer_up(pt, button);
            }
        })?);

        let ed = Rc::clone(&editor);
        listeners.push(listen(canvas_target, "mouseleave", move |_| {
            ed.borrow_mut().on_pointer_leave();
        })?);

        let ed = Rc::clone(&editor);
        listeners.push(listen(window_target, "keydown", move |event| {
            if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                ed.borrow_mut().on_key_down(&Key(key.key()));
            }
        })?);

        let ed = Rc::clone(&editor);
        listeners.push(listen(window_target, "resize", move |_| {
            ed.borrow_mut().on_resize(Date::now());
        })?);

        let running = Rc::new(Cell::new(true));
        start_frames(&window, Rc::clone(&editor), Rc::clone(&running))?;

        Ok(Self { editor, listeners, running })
    }

    /// Add an element from a JSON spec; returns its id.
    ///
    /// # Errors
    ///
    /// Rejects JSON that does not describe an element.
    pub fn add(&self, spec: &str) -> Result<String, JsValue> {
        let spec = ElementSpec::from_json(spec).map_err(js_err)?;
        Ok(self.editor.borrow_mut().add(spec).to_string())
    }

    /// Remove an element by id. Unknown or malformed ids are ignored.
    pub fn remove(&self, id: &str) {
        match id.parse::<ElementId>() {
            Ok(id) => {
                self.editor.borrow_mut().remove(&id);
            }
            Err(err) => tracing::debug!(%id, error = %err, "remove ignored: malformed id"),
        }
    }

    /// # Errors
    ///
    /// Rejects a non-positive or non-finite size.
    #[wasm_bindgen(js_name = changeResolution)]
    pub fn change_resolution(&self, width: f64, height: f64) -> Result<(), JsValue> {
        self.editor.borrow_mut().change_resolution(width, height).map_err(js_err)
    }

    /// Detach every DOM listener and stop the frame loop.
    pub fn clear(&mut self) {
        self.detach();
    }
}

impl Drop for WebEditor {
    fn drop(&mut self) {
        self.detach();
    }
}

impl WebEditor {
    /// Unregister listeners before their closures are freed. Idempotent.
    fn detach(&mut self) {
        self.running.set(false);
        for listener in self.listeners.drain(..) {
            if let Err(err) = listener
                .target
                .remove_event_listener_with_callback(listener.event, listener.callback.as_ref().unchecked_ref())
            {
                tracing::warn!(event = listener.event, error = ?err, "failed to remove listener");
            }
        }
        match self.editor.try_borrow_mut() {
            Ok(mut editor) => editor.clear(),
            Err(err) => tracing::warn!(error = %err, "editor busy; left attached"),
        }
    }
}

/// Self-rescheduling `requestAnimationFrame` loop that ticks the editor until
/// `running` goes false.
fn start_frames(window: &web_sys::Window, editor: SharedEditor, running: Rc<Cell<bool>>) -> Result<(), JsValue> {
    let slot: FrameSlot = Rc::new(RefCell::new(None));
    let slot_for_cb = Rc::clone(&slot);
    let window_for_cb = window.clone();

    let cb = Closure::wrap(Box::new(move |_ts: f64| {
        if !running.get() {
            slot_for_cb.borrow_mut().take();
            return;
        }
        editor.borrow_mut().tick(Date::now());
        if let Some(next) = slot_for_cb.borrow().as_ref() {
            if let Err(err) = window_for_cb.request_animation_frame(next.as_ref().unchecked_ref()) {
                tracing::warn!(error = ?err, "frame loop stopped");
            }
        }
    }) as Box<dyn FnMut(f64)>);

    window.request_animation_frame(cb.as_ref().unchecked_ref())?;
    *slot.borrow_mut() = Some(cb);
    Ok(())
}
