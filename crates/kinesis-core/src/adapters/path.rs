//! Path modality: children travel along an SVG path (`offset-path`) as the
//! pointer sweeps across the container or the container scrolls by.

use super::{Adapter, Cx, InputEvent, Mount, Reconfigure};
use crate::config::{
    markers, AttributeSource, ContainerConfig, InteractionMode, PathConfig, PathElementConfig,
};
use crate::error::{ConstructionError, Result};
use crate::host::{Node, StyleSink, Surface};
use crate::scheduler::{TaskHandle, TaskSlot};
use crate::signal::{path_offset, pointer_progress, pointer_signal, scroll_progress};
use crate::transform::Num;

/// Host geometry for path descriptors.
pub trait PathGeometry {
    /// Total length in user units, `None` when the descriptor cannot be
    /// measured.
    fn total_length(&self, descriptor: &str) -> Option<f32>;
}

struct PathElement {
    config: PathElementConfig,
    descriptor: String,
    length: f32,
    position: f32,
}

impl PathElement {
    fn place<K: StyleSink + ?Sized>(&mut self, node: Node, percent: f32, sink: &mut K) {
        self.position = percent;
        sink.set_property(node, "offset-distance", &format!("{}%", Num(percent)));
    }
}

pub struct PathAdapter {
    config: PathConfig,
    elements: Vec<PathElement>,
    geometry: Box<dyn PathGeometry>,
    pending_reset: TaskSlot,
}

fn resolve_descriptor(own: Option<&String>, container: Option<&String>) -> Result<String> {
    own.or(container)
        .cloned()
        .ok_or(ConstructionError::MissingPathDescriptor)
}

impl PathAdapter {
    pub fn new(
        container: Mount<'_>,
        children: Vec<Mount<'_>>,
        geometry: Box<dyn PathGeometry>,
    ) -> Result<Self> {
        container.require(markers::PATH)?;
        let config = PathConfig::from_attributes(container.attrs);
        if config.descriptor.is_none() && children.is_empty() {
            return Err(ConstructionError::MissingPathDescriptor);
        }
        let elements = children
            .iter()
            .map(|m| {
                m.require(markers::PATH_ELEMENT)?;
                let cfg = PathElementConfig::from_attributes(m.attrs);
                let descriptor =
                    resolve_descriptor(cfg.descriptor.as_ref(), config.descriptor.as_ref())?;
                let length = geometry.total_length(&descriptor).unwrap_or(0.0);
                Ok(PathElement {
                    position: cfg.offset,
                    config: cfg,
                    descriptor,
                    length,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            config,
            elements,
            geometry,
            pending_reset: TaskSlot::default(),
        })
    }

    /// Current position of a child in percent of its path.
    pub fn position(&self, index: usize) -> Option<f32> {
        self.elements.get(index).map(|e| e.position)
    }

    /// Current position of a child in path units.
    pub fn distance_along(&self, index: usize) -> Option<f32> {
        self.elements
            .get(index)
            .map(|e| e.position / 100.0 * e.length)
    }

    pub fn is_reset_pending(&self) -> bool {
        self.pending_reset.is_pending()
    }

    fn update<K: StyleSink + ?Sized>(&mut self, progress: f32, sink: &mut K) {
        for (i, el) in self.elements.iter_mut().enumerate() {
            let percent = path_offset(el.config.offset, progress, el.config.strength);
            el.place(Node::Child(i), percent, sink);
        }
    }

    fn reset_elements<K: StyleSink + ?Sized>(&mut self, sink: &mut K) {
        for (i, el) in self.elements.iter_mut().enumerate() {
            let offset = el.config.offset;
            el.place(Node::Child(i), offset, sink);
        }
    }

    fn scroll_update(&mut self, cx: &mut Cx<'_>) {
        let rect = cx.surface.rect(Node::Container);
        let progress = scroll_progress(cx.surface.viewport_height(), &rect);
        self.update(progress, &mut *cx.surface);
    }
}

impl Adapter for PathAdapter {
    type Config = Reconfigure<PathConfig, PathElementConfig>;

    fn name(&self) -> &'static str {
        "path"
    }

    fn container(&self) -> &ContainerConfig {
        &self.config.container
    }

    fn mount(&mut self, surface: &mut dyn Surface) {
        surface.set_property(Node::Container, "position", "relative");
        let transition = self.config.container.transition("offset-distance");
        for (i, el) in self.elements.iter().enumerate() {
            let node = Node::Child(i);
            surface.set_property(node, "offset-path", &format!("path('{}')", el.descriptor));
            surface.set_property(node, "offset-distance", &format!("{}%", Num(el.position)));
            surface.set_property(node, "transition", &transition);
        }
    }

    fn activate(&mut self, cx: &mut Cx<'_>) {
        if self.config.container.interaction == InteractionMode::Scroll {
            self.scroll_update(cx);
        }
    }

    fn input(&mut self, event: InputEvent, cx: &mut Cx<'_>) {
        match (self.config.container.interaction, event) {
            (InteractionMode::Pointer, InputEvent::PointerMove(pos)) => {
                self.pending_reset.cancel(&mut *cx.scheduler);
                let signal = pointer_signal(pos, &cx.surface.rect(Node::Container));
                self.update(pointer_progress(signal.x), &mut *cx.surface);
            }
            (InteractionMode::Pointer, InputEvent::PointerLeave) => {
                let handle = cx
                    .scheduler
                    .request_timeout(self.config.container.reset_delay);
                self.pending_reset.replace(handle, &mut *cx.scheduler);
            }
            (InteractionMode::Scroll, InputEvent::Scroll) => self.scroll_update(cx),
            _ => {}
        }
    }

    fn task(&mut self, handle: TaskHandle, cx: &mut Cx<'_>) -> bool {
        if !self.pending_reset.take_if(handle) {
            return false;
        }
        self.reset_elements(&mut *cx.surface);
        true
    }

    fn deactivate(&mut self, cx: &mut Cx<'_>) {
        self.pending_reset.cancel(&mut *cx.scheduler);
        self.reset_elements(&mut *cx.surface);
    }

    fn reconfigure(&mut self, config: Self::Config, surface: &mut dyn Surface) {
        self.config = config.container;
        let mut configs = config.elements.into_iter();
        for el in self.elements.iter_mut() {
            if let Some(cfg) = configs.next() {
                el.config = cfg;
            }
            match resolve_descriptor(el.config.descriptor.as_ref(), self.config.descriptor.as_ref())
            {
                Ok(d) if d != el.descriptor => {
                    el.length = self.geometry.total_length(&d).unwrap_or(0.0);
                    el.descriptor = d;
                }
                Ok(_) => {}
                Err(_) => log::warn!("[path] reconfigure without path data; keeping previous path"),
            }
            el.position = el.config.offset;
        }
        self.mount(surface);
    }

    fn read_config(
        container: &dyn AttributeSource,
        children: &[&dyn AttributeSource],
    ) -> Result<Self::Config> {
        Ok(Reconfigure {
            container: PathConfig::from_attributes(container),
            elements: children
                .iter()
                .map(|c| PathElementConfig::from_attributes(*c))
                .collect(),
        })
    }
}
