use crate::constants::{EVENT_POINTER_ENTER, EVENT_POINTER_LEAVE, EVENT_POINTER_MOVE, EVENT_SCROLL};
use crate::mounted::{with_mounted, Mounted, Wiring};
use glam::Vec2;
use kinesis_core::InputEvent;
use std::cell::RefCell;
use std::rc::Weak;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

/// An event listener that removes itself when dropped.
pub struct Listener {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl Listener {
    pub fn add(
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> anyhow::Result<Self> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(|e| anyhow::anyhow!("add {event} listener: {:?}", e))?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Viewport position of a mouse event.
#[inline]
fn client_position(event: &web::Event) -> Option<Vec2> {
    event
        .dyn_ref::<web::MouseEvent>()
        .map(|m| Vec2::new(m.client_x() as f32, m.client_y() as f32))
}

fn forward(
    mounted: &Weak<RefCell<Mounted>>,
    map: fn(&web::Event) -> Option<InputEvent>,
) -> impl FnMut(web::Event) + 'static {
    let mounted = mounted.clone();
    move |event: web::Event| {
        if let Some(input) = map(&event) {
            with_mounted(&mounted, |m| m.on_input(input));
        }
    }
}

/// Attach the listeners `wiring` calls for.
pub fn bind_input(
    mounted: &Weak<RefCell<Mounted>>,
    wiring: Wiring,
    container: &web::Element,
    window: &web::Window,
    document: &web::Document,
) -> anyhow::Result<Vec<Listener>> {
    let mut listeners = Vec::new();
    match wiring {
        Wiring::Pointer => {
            listeners.push(Listener::add(
                container,
                EVENT_POINTER_ENTER,
                forward(mounted, |_| Some(InputEvent::PointerEnter)),
            )?);
            listeners.push(Listener::add(
                container,
                EVENT_POINTER_MOVE,
                forward(mounted, |e| client_position(e).map(InputEvent::PointerMove)),
            )?);
            listeners.push(Listener::add(
                container,
                EVENT_POINTER_LEAVE,
                forward(mounted, |_| Some(InputEvent::PointerLeave)),
            )?);
        }
        Wiring::Scroll => {
            listeners.push(Listener::add(
                window,
                EVENT_SCROLL,
                forward(mounted, |_| Some(InputEvent::Scroll)),
            )?);
        }
        Wiring::DocumentPointer => {
            listeners.push(Listener::add(
                document,
                EVENT_POINTER_MOVE,
                forward(mounted, |e| client_position(e).map(InputEvent::PointerMove)),
            )?);
        }
        Wiring::None => {}
    }
    Ok(listeners)
}
