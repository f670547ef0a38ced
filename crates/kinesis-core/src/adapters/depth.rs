//! Depth modality: the container tilts toward the pointer while its children
//! lift off the surface by their own depth.

use super::{Adapter, Cx, InputEvent, Mount, Reconfigure, TransformState};
use crate::config::{markers, AttributeSource, ContainerConfig, DepthConfig, DepthElementConfig};
use crate::error::Result;
use crate::host::{Node, StyleSink, Surface};
use crate::signal::{depth_rotation, pointer_signal};
use crate::transform::{Ops, TransformDescriptor, TransformOp};

struct DepthElement {
    config: DepthElementConfig,
    state: TransformState,
}

impl DepthElement {
    fn lift<K: StyleSink + ?Sized>(&mut self, node: Node, raised: bool, sink: &mut K) {
        let z = if raised { self.config.depth } else { 0.0 };
        let mut ops = Ops::new();
        ops.push(TransformOp::TranslateZ(z));
        let desc = TransformDescriptor::new(self.state.baseline(), ops);
        self.state.apply(node, desc, sink);
    }
}

pub struct DepthAdapter {
    config: DepthConfig,
    container: TransformState,
    elements: Vec<DepthElement>,
    hovered: bool,
}

impl DepthAdapter {
    pub fn new(container: Mount<'_>, children: Vec<Mount<'_>>) -> Result<Self> {
        container.require(markers::DEPTH)?;
        let elements = children
            .iter()
            .map(|m| {
                m.require(markers::DEPTH_ELEMENT)?;
                Ok(DepthElement {
                    config: DepthElementConfig::from_attributes(m.attrs),
                    state: TransformState::new(m.baseline.clone()),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            config: DepthConfig::from_attributes(container.attrs),
            container: TransformState::new(container.baseline.clone()),
            elements,
            hovered: false,
        })
    }

    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    pub fn container_transform(&self) -> Option<&TransformDescriptor> {
        self.container.last_applied()
    }

    fn hover<K: StyleSink + ?Sized>(&mut self, sink: &mut K) {
        self.hovered = true;
        for (i, el) in self.elements.iter_mut().enumerate() {
            el.lift(Node::Child(i), true, sink);
        }
    }

    fn rest<K: StyleSink + ?Sized>(&mut self, sink: &mut K) {
        self.hovered = false;
        self.container.reset(Node::Container, sink);
        for (i, el) in self.elements.iter_mut().enumerate() {
            el.lift(Node::Child(i), false, sink);
        }
    }
}

impl Adapter for DepthAdapter {
    type Config = Reconfigure<DepthConfig, DepthElementConfig>;

    fn name(&self) -> &'static str {
        "depth"
    }

    fn container(&self) -> &ContainerConfig {
        &self.config.container
    }

    fn mount(&mut self, surface: &mut dyn Surface) {
        let container = &self.config.container;
        surface.set_property(
            Node::Container,
            "perspective",
            &format!("{}px", container.perspective_px),
        );
        surface.set_property(Node::Container, "transform-style", "preserve-3d");
        surface.set_property(Node::Container, "position", "relative");
        let transition = container.transition("transform");
        surface.set_property(Node::Container, "transition", &transition);
        for (i, el) in self.elements.iter_mut().enumerate() {
            let node = Node::Child(i);
            surface.set_property(node, "transition", &transition);
            el.lift(node, false, surface);
        }
    }

    fn input(&mut self, event: InputEvent, cx: &mut Cx<'_>) {
        match event {
            InputEvent::PointerEnter => self.hover(&mut *cx.surface),
            InputEvent::PointerMove(pos) => {
                if !self.hovered {
                    // Missed the enter while unbound.
                    self.hover(&mut *cx.surface);
                }
                let signal = pointer_signal(pos, &cx.surface.rect(Node::Container));
                let rotation = depth_rotation(signal, self.config.sensitivity, self.config.inverted);
                let mut ops = Ops::new();
                ops.push(TransformOp::RotateX(rotation.x));
                ops.push(TransformOp::RotateY(rotation.y));
                let desc = TransformDescriptor::new(self.container.baseline(), ops);
                self.container.previous_signal = signal.x;
                self.container.apply(Node::Container, desc, &mut *cx.surface);
            }
            InputEvent::PointerLeave => self.rest(&mut *cx.surface),
            InputEvent::Scroll => {}
        }
    }

    fn deactivate(&mut self, cx: &mut Cx<'_>) {
        self.rest(&mut *cx.surface);
    }

    fn reconfigure(&mut self, config: Self::Config, surface: &mut dyn Surface) {
        self.config = config.container;
        for (el, cfg) in self.elements.iter_mut().zip(config.elements) {
            el.config = cfg;
        }
        self.mount(surface);
        if self.hovered {
            for (i, el) in self.elements.iter_mut().enumerate() {
                el.lift(Node::Child(i), true, surface);
            }
        }
    }

    fn read_config(
        container: &dyn AttributeSource,
        children: &[&dyn AttributeSource],
    ) -> Result<Self::Config> {
        Ok(Reconfigure {
            container: DepthConfig::from_attributes(container),
            elements: children
                .iter()
                .map(|c| DepthElementConfig::from_attributes(*c))
                .collect(),
        })
    }
}
