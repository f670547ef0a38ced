//! Signal adapters: one per input modality.
//!
//! An adapter owns its container's child elements, turns raw input into a
//! normalized signal and writes the composed result through the host's
//! [`StyleSink`]. Scheduling, throttling and visibility gating live in
//! [`crate::lifecycle::Controller`]; adapters only react.

pub mod audio;
pub mod depth;
pub mod path;
pub mod pointer;
pub mod proximity;
pub mod scroll;

use crate::config::{AttributeSource, ContainerConfig, ElementConfig};
use crate::constants::DEFAULT_STRENGTH;
use crate::error::{ConstructionError, Result};
use crate::host::{Node, StyleSink, Surface};
use crate::scheduler::{Scheduler, TaskHandle};
use crate::transform::{reset, ScaleProfile, TransformDescriptor};
use glam::Vec2;

pub use audio::{AudioAdapter, SpectrumSource};
pub use depth::DepthAdapter;
pub use path::{PathAdapter, PathGeometry};
pub use pointer::PointerAdapter;
pub use proximity::ProximityAdapter;
pub use scroll::ScrollAdapter;

/// Raw input delivered by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerEnter,
    /// Pointer position in viewport coordinates.
    PointerMove(Vec2),
    PointerLeave,
    Scroll,
}

impl InputEvent {
    /// Moves and scrolls arrive in bursts and go through the throttle.
    pub fn is_throttled(&self) -> bool {
        matches!(self, InputEvent::PointerMove(_) | InputEvent::Scroll)
    }
}

/// What an adapter may touch while handling a callback.
pub struct Cx<'a> {
    pub surface: &'a mut dyn Surface,
    pub scheduler: &'a mut dyn Scheduler,
}

/// An element (or container) as handed over by the host at construction.
pub struct Mount<'a> {
    pub attrs: &'a dyn AttributeSource,
    /// Transform present before any effect, `""` when none.
    pub baseline: String,
}

impl<'a> Mount<'a> {
    pub fn new(attrs: &'a dyn AttributeSource, baseline: impl Into<String>) -> Self {
        Self {
            attrs,
            baseline: baseline.into(),
        }
    }

    pub fn require(&self, marker: &'static str) -> Result<()> {
        if self.attrs.has(marker) {
            Ok(())
        } else {
            Err(ConstructionError::MissingMarker(marker))
        }
    }
}

/// Replacement configuration for a live adapter. Element entries are matched
/// by position; extra entries are ignored and missing ones keep their config.
#[derive(Clone, Debug, PartialEq)]
pub struct Reconfigure<C, E> {
    pub container: C,
    pub elements: Vec<E>,
}

pub trait Adapter {
    type Config;

    fn name(&self) -> &'static str;
    fn container(&self) -> &ContainerConfig;

    /// One-off style setup (transitions, origins, perspective).
    fn mount(&mut self, surface: &mut dyn Surface);

    /// Whether a per-frame loop should run while bound.
    fn wants_frames(&self) -> bool {
        false
    }

    /// The container became active and visible.
    fn activate(&mut self, _cx: &mut Cx<'_>) {}

    fn input(&mut self, event: InputEvent, cx: &mut Cx<'_>);

    fn frame(&mut self, _cx: &mut Cx<'_>) {}

    /// A task the adapter scheduled itself has fired. Returns whether the
    /// handle belonged to this adapter.
    fn task(&mut self, _handle: TaskHandle, _cx: &mut Cx<'_>) -> bool {
        false
    }

    /// Cancel adapter-owned tasks and return every element to its baseline.
    fn deactivate(&mut self, cx: &mut Cx<'_>);

    /// Final teardown. Defaults to [`Adapter::deactivate`].
    fn destroy(&mut self, cx: &mut Cx<'_>) {
        self.deactivate(cx);
    }

    fn reconfigure(&mut self, config: Self::Config, surface: &mut dyn Surface);

    /// Re-read configuration from the live attributes of the container and
    /// its children, in mount order.
    fn read_config(
        container: &dyn AttributeSource,
        children: &[&dyn AttributeSource],
    ) -> Result<Self::Config>
    where
        Self: Sized;
}

/// Per-element record of what was captured and what was last written.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformState {
    baseline: String,
    pub previous_signal: f32,
    last_applied: Option<TransformDescriptor>,
}

impl TransformState {
    pub fn new(baseline: impl Into<String>) -> Self {
        Self {
            baseline: baseline.into(),
            previous_signal: 0.0,
            last_applied: None,
        }
    }

    pub fn baseline(&self) -> &str {
        &self.baseline
    }

    pub fn last_applied(&self) -> Option<&TransformDescriptor> {
        self.last_applied.as_ref()
    }

    /// Write `desc` unless it is what the element already shows.
    pub fn apply<K: StyleSink + ?Sized>(&mut self, node: Node, desc: TransformDescriptor, sink: &mut K) {
        if self.last_applied.as_ref() == Some(&desc) {
            return;
        }
        sink.set_transform(node, &desc.to_css());
        self.last_applied = Some(desc);
    }

    pub fn reset<K: StyleSink + ?Sized>(&mut self, node: Node, sink: &mut K) {
        let desc = reset(&self.baseline);
        sink.set_transform(node, &desc.to_css());
        self.previous_signal = 0.0;
        self.last_applied = Some(desc);
    }
}

/// A child driven by the shared axis/strength model.
#[derive(Clone, Debug)]
pub struct TransformElement {
    pub config: ElementConfig,
    pub state: TransformState,
}

impl TransformElement {
    pub fn from_mount(mount: &Mount<'_>, marker: &'static str, default_strength: f32) -> Result<Self> {
        mount.require(marker)?;
        Ok(Self {
            config: ElementConfig::from_attributes(mount.attrs, default_strength),
            state: TransformState::new(mount.baseline.clone()),
        })
    }

    pub fn apply<K: StyleSink + ?Sized>(
        &mut self,
        node: Node,
        x: f32,
        y: f32,
        scale: ScaleProfile,
        sink: &mut K,
    ) {
        let desc = self.config.compose(self.state.baseline(), x, y, scale);
        self.state.previous_signal = x;
        self.state.apply(node, desc, sink);
    }
}

pub(crate) fn build_elements(
    children: Vec<Mount<'_>>,
    marker: &'static str,
    default_strength: f32,
) -> Result<Vec<TransformElement>> {
    children
        .iter()
        .map(|m| TransformElement::from_mount(m, marker, default_strength))
        .collect()
}

/// Perspective and 3D context on the container, transition and origin on
/// every child.
pub(crate) fn mount_transform_elements(
    container: &ContainerConfig,
    elements: &[TransformElement],
    surface: &mut dyn Surface,
) {
    surface.set_property(
        Node::Container,
        "perspective",
        &format!("{}px", container.perspective_px),
    );
    surface.set_property(Node::Container, "transform-style", "preserve-3d");
    let transition = container.transition("transform");
    for (i, el) in elements.iter().enumerate() {
        surface.set_property(Node::Child(i), "transition", &transition);
        surface.set_property(Node::Child(i), "transform-origin", &el.config.transform_origin);
    }
}

pub(crate) fn reset_all<K: StyleSink + ?Sized>(elements: &mut [TransformElement], sink: &mut K) {
    for (i, el) in elements.iter_mut().enumerate() {
        el.state.reset(Node::Child(i), sink);
    }
}

pub(crate) fn read_transform_config(
    container: &dyn AttributeSource,
    children: &[&dyn AttributeSource],
) -> Reconfigure<ContainerConfig, ElementConfig> {
    Reconfigure {
        container: ContainerConfig::from_attributes(container),
        elements: children
            .iter()
            .map(|c| ElementConfig::from_attributes(*c, DEFAULT_STRENGTH))
            .collect(),
    }
}

pub(crate) fn reconfigure_elements(elements: &mut [TransformElement], configs: Vec<ElementConfig>) {
    for (el, cfg) in elements.iter_mut().zip(configs) {
        el.config = cfg;
    }
}
