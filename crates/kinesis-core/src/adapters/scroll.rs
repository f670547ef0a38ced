//! Scroll modality: children follow the container's passage through the
//! viewport. Progress drives both components.

use super::{
    build_elements, mount_transform_elements, read_transform_config, reconfigure_elements,
    reset_all, Adapter, Cx, InputEvent, Mount, Reconfigure, TransformElement, TransformState,
};
use crate::config::{markers, AttributeSource, ContainerConfig, ElementConfig};
use crate::constants::DEFAULT_STRENGTH;
use crate::error::Result;
use crate::host::{Node, Surface};
use crate::signal::scroll_progress;
use crate::transform::ScaleProfile;

pub struct ScrollAdapter {
    config: ContainerConfig,
    elements: Vec<TransformElement>,
    progress: f32,
}

impl ScrollAdapter {
    pub fn new(container: Mount<'_>, children: Vec<Mount<'_>>) -> Result<Self> {
        container.require(markers::TRANSFORMER)?;
        Ok(Self {
            config: ContainerConfig::from_attributes(container.attrs),
            elements: build_elements(children, markers::TRANSFORMER_ELEMENT, DEFAULT_STRENGTH)?,
            progress: 0.0,
        })
    }

    /// An element that is its own container and moves itself.
    pub fn standalone(item: Mount<'_>) -> Result<Self> {
        item.require(markers::SCROLL_ITEM)?;
        Ok(Self {
            config: ContainerConfig::from_attributes(item.attrs),
            elements: vec![TransformElement {
                config: ElementConfig::from_attributes(item.attrs, DEFAULT_STRENGTH),
                state: TransformState::new(item.baseline.clone()),
            }],
            progress: 0.0,
        })
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn elements(&self) -> &[TransformElement] {
        &self.elements
    }

    fn update(&mut self, cx: &mut Cx<'_>) {
        let rect = cx.surface.rect(Node::Container);
        self.progress = scroll_progress(cx.surface.viewport_height(), &rect);
        let p = self.progress;
        for (i, el) in self.elements.iter_mut().enumerate() {
            el.apply(Node::Child(i), p, p, ScaleProfile::Fine, &mut *cx.surface);
        }
    }
}

impl Adapter for ScrollAdapter {
    type Config = Reconfigure<ContainerConfig, ElementConfig>;

    fn name(&self) -> &'static str {
        "scroll"
    }

    fn container(&self) -> &ContainerConfig {
        &self.config
    }

    fn mount(&mut self, surface: &mut dyn Surface) {
        mount_transform_elements(&self.config, &self.elements, surface);
    }

    fn activate(&mut self, cx: &mut Cx<'_>) {
        self.update(cx);
    }

    fn input(&mut self, event: InputEvent, cx: &mut Cx<'_>) {
        if event == InputEvent::Scroll {
            self.update(cx);
        }
    }

    fn deactivate(&mut self, cx: &mut Cx<'_>) {
        self.progress = 0.0;
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
