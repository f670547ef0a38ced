//! Pointer modality: the container's children follow the pointer.

use super::{
    build_elements, mount_transform_elements, read_transform_config, reconfigure_elements,
    reset_all, Adapter, Cx, InputEvent, Mount, Reconfigure, TransformElement,
};
use crate::config::{markers, AttributeSource, ContainerConfig, ElementConfig};
use crate::constants::DEFAULT_STRENGTH;
use crate::error::Result;
use crate::host::{Node, Surface};
use crate::signal::pointer_signal;
use crate::transform::ScaleProfile;

pub struct PointerAdapter {
    config: ContainerConfig,
    elements: Vec<TransformElement>,
    inside: bool,
}

impl PointerAdapter {
    pub fn new(container: Mount<'_>, children: Vec<Mount<'_>>) -> Result<Self> {
        container.require(markers::TRANSFORMER)?;
        Ok(Self {
            config: ContainerConfig::from_attributes(container.attrs),
            elements: build_elements(children, markers::TRANSFORMER_ELEMENT, DEFAULT_STRENGTH)?,
            inside: false,
        })
    }

    pub fn elements(&self) -> &[TransformElement] {
        &self.elements
    }

    pub fn is_pointer_inside(&self) -> bool {
        self.inside
    }
}

impl Adapter for PointerAdapter {
    type Config = Reconfigure<ContainerConfig, ElementConfig>;

    fn name(&self) -> &'static str {
        "pointer"
    }

    fn container(&self) -> &ContainerConfig {
        &self.config
    }

    fn mount(&mut self, surface: &mut dyn Surface) {
        mount_transform_elements(&self.config, &self.elements, surface);
    }

    fn input(&mut self, event: InputEvent, cx: &mut Cx<'_>) {
        match event {
            InputEvent::PointerEnter => self.inside = true,
            InputEvent::PointerMove(pos) => {
                // Moves come from the container's own listeners, so one arriving
                // means the pointer is over it even if the enter was missed.
                self.inside = true;
                let signal = pointer_signal(pos, &cx.surface.rect(Node::Container));
                for (i, el) in self.elements.iter_mut().enumerate() {
                    el.apply(
                        Node::Child(i),
                        signal.x,
                        signal.y,
                        ScaleProfile::Fine,
                        &mut *cx.surface,
                    );
                }
            }
            InputEvent::PointerLeave => {
                self.inside = false;
                reset_all(&mut self.elements, &mut *cx.surface);
            }
            InputEvent::Scroll => {}
        }
    }

    fn deactivate(&mut self, cx: &mut Cx<'_>) {
        self.inside = false;
        reset_all(&mut self.elements, &mut *cx.surface);
    }

    fn reconfigure(&mut self, config: Self::Config, surface: &mut dyn Surface) {
        self.config = config.container;
        reconfigure_elements(&mut self.elements, config.elements);
        self.mount(surface);
    }

    fn read_config(
        container: &dyn AttributeSource,
        children: &[&dyn AttributeSource],
    ) -> Result<Self::Config> {
        Ok(read_transform_config(container, children))
    }
}
