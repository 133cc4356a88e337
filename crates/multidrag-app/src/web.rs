//! WebAssembly entry point and DOM wiring.

use crate::{App, AppConfig, AppError};
use kurbo::Point;
use multidrag_core::gesture::{Modifiers, MouseButton, PointerEvent};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, EventTarget, KeyboardEvent, MouseEvent};

thread_local! {
    static MOUNTED: RefCell<Option<MountedApp>> = const { RefCell::new(None) };
}

/// A registered DOM listener; removed from its target on drop.
struct Listener {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Listener {
    fn new(
        target: &EventTarget,
        event: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, AppError> {
        let closure = Closure::<dyn FnMut(Event)>::new(handler);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| AppError::Mount(format!("{event} listener: {e:?}")))?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        if let Err(e) = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref())
        {
            log::warn!("Failed to remove {} listener: {e:?}", self.event);
        }
    }
}

/// The canvas mounted into a DOM element. Dropping it unregisters every
/// listener and empties the container.
pub struct MountedApp {
    container: Element,
    listeners: Vec<Listener>,
}

impl Drop for MountedApp {
    fn drop(&mut self) {
        self.listeners.clear();
        self.container.set_inner_html("");
        log::info!("MultiDrag unmounted");
    }
}

fn redraw(app: &mut App, container: &Element) -> Result<(), AppError> {
    let svg = app.render()?;
    container.set_inner_html(&svg);
    Ok(())
}

/// Run `f` against the app and redraw if it asks for it.
fn dispatch(
    app: &Rc<RefCell<App>>,
    container: &Element,
    f: impl FnOnce(&mut App) -> Result<bool, AppError>,
) {
    let Ok(mut app) = app.try_borrow_mut() else {
        log::warn!("Event dropped: app busy");
        return;
    };
    match f(&mut app).and_then(|redraw_needed| {
        if redraw_needed {
            redraw(&mut app, container)
        } else {
            Ok(())
        }
    }) {
        Ok(()) => {}
        Err(e) => log::warn!("{e}"),
    }
}

/// Map client coordinates onto the canvas viewBox.
fn canvas_point(container: &Element, event: &MouseEvent, width: f64, height: f64) -> Point {
    let surface = container.first_element_child().unwrap_or_else(|| container.clone());
    let rect = surface.get_bounding_client_rect();
    let scale_x = if rect.width() > 0.0 { width / rect.width() } else { 1.0 };
    let scale_y = if rect.height() > 0.0 { height / rect.height() } else { 1.0 };
    Point::new(
        (f64::from(event.client_x()) - rect.left()) * scale_x,
        (f64::from(event.client_y()) - rect.top()) * scale_y,
    )
}

fn mouse_button(button: i16) -> Option<MouseButton> {
    match button {
        0 => Some(MouseButton::Left),
        1 => Some(MouseButton::Middle),
        2 => Some(MouseButton::Right),
        _ => None,
    }
}

fn modifiers(event: &MouseEvent) -> Modifiers {
    Modifiers {
        shift: event.shift_key(),
        ctrl: event.ctrl_key(),
        alt: event.alt_key(),
        meta: event.meta_key(),
    }
}

/// Translate a DOM pointer event into a canvas pointer event.
/// `pointercancel` is not translated; it goes through [`App::cancel_pointer`].
fn translate(kind: &str, event: &web_sys::PointerEvent, position: Point) -> Option<PointerEvent> {
    match kind {
        "pointerdown" => Some(PointerEvent::Down {
            position,
            button: mouse_button(event.button())?,
            modifiers: modifiers(event),
        }),
        "pointermove" => Some(PointerEvent::Move { position }),
        "pointerup" => Some(PointerEvent::Up {
            position,
            button: mouse_button(event.button())?,
        }),
        _ => None,
    }
}

fn pointer_listener(
    kind: &'static str,
    app: &Rc<RefCell<App>>,
    container: &Element,
) -> Result<Listener, AppError> {
    let (width, height) = {
        let app = app.borrow();
        (app.config().canvas.width, app.config().canvas.height)
    };
    let app = Rc::clone(app);
    let surface = container.clone();
    Listener::new(container, kind, move |event: Event| {
        let Some(event) = event.dyn_ref::<web_sys::PointerEvent>() else {
            return;
        };
        if kind == "pointercancel" {
            // Carries button -1; the release will never come
            dispatch(&app, &surface, App::cancel_pointer);
            return;
        }
        if kind == "pointerdown" {
            event.prevent_default();
            if let Err(e) = surface.set_pointer_capture(event.pointer_id()) {
                log::debug!("Pointer capture unavailable: {e:?}");
            }
        }
        let position = canvas_point(&surface, event, width, height);
        if let Some(pointer_event) = translate(kind, event, position) {
            dispatch(&app, &surface, |app| app.handle_pointer(pointer_event));
        }
    })
}

/// Mount the canvas into the element named by `config.mount_selector`.
pub fn mount(config: AppConfig) -> Result<MountedApp, AppError> {
    let window = web_sys::window().ok_or_else(|| AppError::Mount("no window".to_string()))?;
    let document = window
        .document()
        .ok_or_else(|| AppError::Mount("no document".to_string()))?;
    let container = document
        .query_selector(&config.mount_selector)
        .map_err(|e| AppError::Mount(format!("{e:?}")))?
        .ok_or_else(|| AppError::Mount(format!("{} not found", config.mount_selector)))?;

    let app = Rc::new(RefCell::new(App::with_config(config)?));
    redraw(&mut app.borrow_mut(), &container)?;

    let mut listeners = Vec::new();
    for kind in ["pointerdown", "pointermove", "pointerup", "pointercancel"] {
        listeners.push(pointer_listener(kind, &app, &container)?);
    }

    let key_app = Rc::clone(&app);
    let key_container = container.clone();
    listeners.push(Listener::new(&window, "keydown", move |event: Event| {
        if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
            let key = event.key();
            dispatch(&key_app, &key_container, |app| app.handle_key(&key));
        }
    })?);

    log::info!("MultiDrag mounted with {} listeners", listeners.len());
    Ok(MountedApp {
        container,
        listeners,
    })
}

fn replace_mounted(mounted: Option<MountedApp>) {
    // Drop the previous instance before storing the new one.
    let previous = MOUNTED.with(|slot| slot.borrow_mut().take());
    drop(previous);
    MOUNTED.with(|slot| *slot.borrow_mut() = mounted);
}

/// Mount with a JSON configuration, replacing any mounted canvas.
#[wasm_bindgen]
pub fn mount_with_config(config_json: &str) -> Result<(), JsValue> {
    let config = AppConfig::from_json(config_json)
        .map_err(|e| JsValue::from(js_sys::Error::new(&e.to_string())))?;
    replace_mounted(None);
    let mounted = mount(config).map_err(|e| JsValue::from(js_sys::Error::new(&e.to_string())))?;
    replace_mounted(Some(mounted));
    Ok(())
}

/// Tear the canvas down and unregister its listeners.
#[wasm_bindgen]
pub fn unmount() {
    replace_mounted(None);
}

/// Initialize and run the WASM application.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }

    log::info!("Starting MultiDrag (WASM)");

    match mount(AppConfig::default()) {
        Ok(mounted) => replace_mounted(Some(mounted)),
        Err(e) => log::error!("Failed to mount: {e}"),
    }
}
