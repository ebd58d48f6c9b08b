use std::cell::{Cell, RefCell};
use std::rc::Rc;

use constellation::{FieldConfig, FieldRunner, InputEvent, ParticleField};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, EventTarget, HtmlCanvasElement, MouseEvent, Window};

use crate::canvas::CanvasSurface;
use crate::css_theme::CssThemeSource;

/// Attribute set on a canvas while a field runs on it.
pub const INIT_MARKER: &str = "data-constellation";

/// Everything the frame loop and the callbacks mutate.
struct State {
    runner: FieldRunner,
    surface: CanvasSurface,
    theme: CssThemeSource,
}

/// A registered DOM listener, kept so it can be removed again.
struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

fn listen(target: &EventTarget, event: &'static str, callback: Closure<dyn FnMut(Event)>) -> Result<Listener, JsValue> {
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    Ok(Listener { target: target.clone(), event, callback })
}

/// Holds the animation-frame closure so it can re-request itself.
type FrameSlot = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A running field plus every host resource it registered.
struct Instance {
    window: Window,
    canvas: HtmlCanvasElement,
    state: Rc<RefCell<State>>,
    running: Rc<Cell<bool>>,
    frame: FrameSlot,
    frame_id: Rc<Cell<Option<i32>>>,
    spawn_id: i32,
    _spawn: Closure<dyn FnMut()>,
    resize_timeout: Rc<Cell<Option<i32>>>,
    _settle: Rc<Closure<dyn FnMut()>>,
    listeners: Vec<Listener>,
}

impl Instance {
    /// Cancel the pending frame, clear both timers, remove every listener
    /// and release the canvas. Closures are dropped last.
    fn teardown(self) {
        self.running.set(false);
        if let Some(id) = self.frame_id.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // The frame closure holds a handle to its own slot; emptying the slot breaks the cycle.
        let frame = self.frame.borrow_mut().take();
        drop(frame);

        self.window.clear_interval_with_handle(self.spawn_id);
        if let Some(id) = self.resize_timeout.take() {
            self.window.clear_timeout_with_handle(id);
        }
        for l in &self.listeners {
            let _ = l
                .target
                .remove_event_listener_with_callback(l.event, l.callback.as_ref().unchecked_ref());
        }
        let _ = self.canvas.remove_attribute(INIT_MARKER);
        log::info!("constellation: stopped");
    }
}

/// Handle to a running constellation background.
///
/// Call `stop()` to tear it down. Dropping the handle without stopping
/// leaves the animation running for the lifetime of the page.
#[wasm_bindgen]
pub struct ConstellationHandle {
    instance: Option<Instance>,
}

#[wasm_bindgen]
impl ConstellationHandle {
    /// Stop the loop and release every listener and timer. Idempotent.
    pub fn stop(&mut self) {
        if let Some(instance) = self.instance.take() {
            instance.teardown();
        }
    }

    #[wasm_bindgen(getter)]
    pub fn running(&self) -> bool {
        self.instance.is_some()
    }

    #[wasm_bindgen(js_name = particleCount)]
    pub fn particle_count(&self) -> u32 {
        self.instance
            .as_ref()
            .and_then(|i| i.state.try_borrow().ok().map(|s| s.runner.field().particles().len() as u32))
            .unwrap_or(0)
    }
}

impl Drop for ConstellationHandle {
    fn drop(&mut self) {
        // The JS side still references the closures; keep them alive with the page.
        if let Some(instance) = self.instance.take() {
            std::mem::forget(instance);
        }
    }
}

fn seed() -> u64 {
    let noise = (js_sys::Math::random() * u32::MAX as f64) as u64;
    (noise << 32) ^ js_sys::Date::now() as u64
}

/// Start a field on `canvas`. Returns `None` when the canvas already runs one
/// or has no 2D context.
pub fn start(canvas: HtmlCanvasElement, config: FieldConfig) -> Result<Option<ConstellationHandle>, JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    let document = window.document().ok_or("no document")?;

    if canvas.has_attribute(INIT_MARKER) {
        log::debug!("constellation: canvas already initialized");
        return Ok(None);
    }
    let Some(surface) = CanvasSurface::from_canvas(&canvas)? else {
        log::debug!("constellation: canvas has no 2d context");
        return Ok(None);
    };
    let root = document.document_element().ok_or("no document element")?;

    let (width, height) = surface.fit(&window, &canvas)?;
    let field = ParticleField::new(config.clone(), width, height, seed());
    let state = Rc::new(RefCell::new(State {
        runner: FieldRunner::new(field),
        surface,
        theme: CssThemeSource::new(window.clone(), root.clone()),
    }));
    let running = Rc::new(Cell::new(true));

    // ---- Frame loop ----

    let frame: FrameSlot = Rc::new(RefCell::new(None));
    let frame_id = Rc::new(Cell::new(None));
    {
        let slot = frame.clone();
        let frame_id = frame_id.clone();
        let running = running.clone();
        let state = state.clone();
        let window = window.clone();
        let document = document.clone();
        *frame.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if !running.get() {
                return;
            }
            // Request the next frame before drawing so a failed frame cannot end the loop.
            if let Some(callback) = slot.borrow().as_ref() {
                frame_id.set(window.request_animation_frame(callback.as_ref().unchecked_ref()).ok());
            }
            let hidden = document.hidden();
            let Ok(mut state) = state.try_borrow_mut() else {
                return;
            };
            let State { runner, surface, theme } = &mut *state;
            runner.tick(hidden, surface, theme);
        }) as Box<dyn FnMut()>));
    }

    // ---- Shooting-star timer ----

    let spawn = {
        let state = state.clone();
        let document = document.clone();
        Closure::wrap(Box::new(move || {
            if let Ok(mut state) = state.try_borrow_mut() {
                state.runner.spawn_tick(document.hidden());
            }
        }) as Box<dyn FnMut()>)
    };

    // ---- Debounced resize ----

    let resize_timeout: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let settle = {
        let state = state.clone();
        let window = window.clone();
        let canvas = canvas.clone();
        let resize_timeout = resize_timeout.clone();
        Rc::new(Closure::wrap(Box::new(move || {
            resize_timeout.set(None);
            let Ok(mut state) = state.try_borrow_mut() else {
                return;
            };
            match state.surface.fit(&window, &canvas) {
                Ok((width, height)) => state.runner.push_input(InputEvent::Resize { width, height }),
                Err(e) => log::warn!("constellation: resize failed: {:?}", e),
            }
        }) as Box<dyn FnMut()>))
    };

    let mut listeners = Vec::with_capacity(3);
    {
        let window_k = window.clone();
        let settle = settle.clone();
        let resize_timeout = resize_timeout.clone();
        let debounce_ms = config.resize_debounce_ms as i32;
        let on_resize = Closure::wrap(Box::new(move |_: Event| {
            if let Some(id) = resize_timeout.take() {
                window_k.clear_timeout_with_handle(id);
            }
            match window_k.set_timeout_with_callback_and_timeout_and_arguments_0(
                (*settle).as_ref().unchecked_ref(),
                debounce_ms,
            ) {
                Ok(id) => resize_timeout.set(Some(id)),
                Err(e) => log::warn!("constellation: could not schedule resize: {:?}", e),
            }
        }) as Box<dyn FnMut(Event)>);
        listeners.push(listen(&window, "resize", on_resize)?);
    }

    // ---- Pointer ----

    {
        let state = state.clone();
        let canvas = canvas.clone();
        let on_move = Closure::wrap(Box::new(move |event: Event| {
            let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
                return;
            };
            let rect = canvas.get_bounding_client_rect();
            let x = (mouse.client_x() as f64 - rect.left()) as f32;
            let y = (mouse.client_y() as f64 - rect.top()) as f32;
            if let Ok(mut state) = state.try_borrow_mut() {
                state.runner.push_input(InputEvent::PointerMove { x, y });
            }
        }) as Box<dyn FnMut(Event)>);
        listeners.push(listen(&window, "mousemove", on_move)?);
    }
    {
        let state = state.clone();
        let on_leave = Closure::wrap(Box::new(move |_: Event| {
            if let Ok(mut state) = state.try_borrow_mut() {
                state.runner.push_input(InputEvent::PointerLeave);
            }
        }) as Box<dyn FnMut(Event)>);
        listeners.push(listen(&root, "mouseleave", on_leave)?);
    }

    // Timers start only after every listener is registered.
    let spawn_id = window.set_interval_with_callback_and_timeout_and_arguments_0(
        spawn.as_ref().unchecked_ref(),
        config.star_interval_ms as i32,
    )?;
    if let Some(callback) = frame.borrow().as_ref() {
        frame_id.set(Some(window.request_animation_frame(callback.as_ref().unchecked_ref())?));
    }
    canvas.set_attribute(INIT_MARKER, "on")?;
    log::info!("constellation: started on {}x{}", width, height);

    Ok(Some(ConstellationHandle {
        instance: Some(Instance {
            window,
            canvas,
            state,
            running,
            frame,
            frame_id,
            spawn_id,
            _spawn: spawn,
            resize_timeout,
            _settle: settle,
            listeners,
        }),
    }))
}
