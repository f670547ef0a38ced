use crate::constants::INITIALIZED_ATTR;
use crate::dom::{DomAttributes, DomSurface};
use crate::events::Listener;
use crate::observers::Observer;
use crate::scheduler::WebScheduler;
use kinesis_core::adapters::AudioAdapter;
use kinesis_core::config::{attrs, markers, parse_enum, AttributeSource, InteractionMode};
use kinesis_core::{Controller, InputEvent, Lifecycle, TaskHandle};
use std::cell::RefCell;
use std::rc::Weak;
use web_sys as web;

/// Which marker a container was mounted from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Kind {
    Transformer,
    Audio,
    ScrollItem,
    Distance,
    Path,
    Depth,
}

/// How DOM input reaches a controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wiring {
    None,
    /// enter/move/leave on the container
    Pointer,
    /// window scroll
    Scroll,
    /// pointer moves anywhere on the page
    DocumentPointer,
}

impl Kind {
    pub const ALL: [Kind; 6] = [
        Kind::Transformer,
        Kind::Depth,
        Kind::Audio,
        Kind::ScrollItem,
        Kind::Path,
        Kind::Distance,
    ];

    pub fn marker(self) -> &'static str {
        match self {
            Kind::Transformer => markers::TRANSFORMER,
            Kind::Audio => markers::AUDIO,
            Kind::ScrollItem => markers::SCROLL_ITEM,
            Kind::Distance => markers::DISTANCE_ITEM,
            Kind::Path => markers::PATH,
            Kind::Depth => markers::DEPTH,
        }
    }

    /// `None` for standalone items, which are their own only child.
    pub fn child_marker(self) -> Option<&'static str> {
        match self {
            Kind::Transformer => Some(markers::TRANSFORMER_ELEMENT),
            Kind::Audio => Some(markers::AUDIO_ELEMENT),
            Kind::Path => Some(markers::PATH_ELEMENT),
            Kind::Depth => Some(markers::DEPTH_ELEMENT),
            Kind::ScrollItem | Kind::Distance => None,
        }
    }

    pub fn detect(el: &web::Element) -> Option<Kind> {
        Kind::ALL.into_iter().find(|k| el.has_attribute(k.marker()))
    }

    /// The interaction mode that decides the adapter and its wiring.
    pub fn interaction(self, src: &dyn AttributeSource) -> InteractionMode {
        match self {
            Kind::Transformer | Kind::Path => parse_enum(
                src,
                attrs::INTERACTION,
                InteractionMode::parse,
                InteractionMode::Pointer,
            ),
            Kind::ScrollItem => InteractionMode::Scroll,
            Kind::Audio | Kind::Distance | Kind::Depth => InteractionMode::Pointer,
        }
    }

    pub fn wiring(self, mode: InteractionMode) -> Wiring {
        match (self, mode) {
            (Kind::Audio, _) => Wiring::None,
            (Kind::Distance, _) => Wiring::DocumentPointer,
            (Kind::ScrollItem, _) | (_, InteractionMode::Scroll) => Wiring::Scroll,
            (_, InteractionMode::Pointer) => Wiring::Pointer,
        }
    }
}

pub enum Driver {
    /// Kept concrete for playback control.
    Audio(Controller<AudioAdapter, WebScheduler>),
    Generic(Box<dyn Lifecycle>),
}

impl Driver {
    fn lifecycle(&mut self) -> &mut dyn Lifecycle {
        match self {
            Driver::Audio(c) => c as &mut dyn Lifecycle,
            Driver::Generic(c) => &mut **c,
        }
    }
}

/// One mounted container: its controller, DOM surface and live bindings.
pub struct Mounted {
    pub kind: Kind,
    pub mode: InteractionMode,
    pub driver: Driver,
    pub surface: DomSurface,
    pub listeners: Vec<Listener>,
    pub observers: Vec<Observer>,
}

impl Mounted {
    fn parts(&mut self) -> (&mut dyn Lifecycle, &mut DomSurface) {
        (self.driver.lifecycle(), &mut self.surface)
    }

    pub fn on_input(&mut self, event: InputEvent) {
        let (lifecycle, surface) = self.parts();
        lifecycle.on_input(event, surface);
    }

    pub fn on_visibility(&mut self, intersecting: bool) {
        let (lifecycle, surface) = self.parts();
        lifecycle.on_visibility(intersecting, surface);
    }

    pub fn on_task(&mut self, handle: TaskHandle) {
        let (lifecycle, surface) = self.parts();
        lifecycle.on_task(handle, surface);
    }

    /// Re-read attributes. Returns `false` when the interaction mode changed,
    /// which needs a fresh mount instead.
    pub fn reload(&mut self) -> bool {
        let container = self.surface.container().clone();
        let children = self.surface.children().to_vec();
        let container_attrs = DomAttributes(&container);
        if self.kind.interaction(&container_attrs) != self.mode {
            return false;
        }
        let child_attrs: Vec<DomAttributes> = children.iter().map(|c| DomAttributes(c)).collect();
        let child_refs: Vec<&dyn AttributeSource> = child_attrs
            .iter()
            .map(|a| a as &dyn AttributeSource)
            .collect();
        let (lifecycle, surface) = self.parts();
        lifecycle.reload(&container_attrs, &child_refs, surface);
        true
    }

    pub fn play(&mut self) -> bool {
        match &mut self.driver {
            Driver::Audio(c) => {
                c.play();
                true
            }
            Driver::Generic(_) => false,
        }
    }

    pub fn stop(&mut self) -> bool {
        match &mut self.driver {
            Driver::Audio(c) => {
                c.stop(&mut self.surface);
                true
            }
            Driver::Generic(_) => false,
        }
    }

    /// Remove listeners, disconnect observers, cancel scheduled work and
    /// reset every child.
    pub fn teardown(&mut self) {
        self.listeners.clear();
        self.observers.clear();
        let (lifecycle, surface) = self.parts();
        lifecycle.destroy(surface);
        let _ = self.surface.container().remove_attribute(INITIALIZED_ATTR);
    }
}

pub fn with_mounted(weak: &Weak<RefCell<Mounted>>, f: impl FnOnce(&mut Mounted)) {
    let Some(shared) = weak.upgrade() else {
        return;
    };
    let Ok(mut mounted) = shared.try_borrow_mut() else {
        log::warn!("[bootstrap] re-entrant callback dropped");
        return;
    };
    f(&mut mounted);
}
