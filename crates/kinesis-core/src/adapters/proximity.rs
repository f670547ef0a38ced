//! Proximity modality: items react to how close the pointer is to their
//! own center. The pointer can be anywhere on the page, so the distance is
//! re-measured every frame rather than per event.

use super::{Adapter, Cx, InputEvent, Mount, Reconfigure, TransformState};
use crate::config::{markers, AttributeSource, ContainerConfig, ProximityConfig, ProximityStyle};
use crate::constants::STICKING_THRESHOLD_PX;
use crate::error::Result;
use crate::host::{Node, Surface};
use crate::signal::{proximity_factor, Proximity};
use crate::transform::{reset, Ops, ScaleProfile, TransformDescriptor, TransformKind, TransformOp};
use glam::Vec2;

struct ProximityItem {
    config: ProximityConfig,
    state: TransformState,
}

pub struct ProximityAdapter {
    config: ContainerConfig,
    items: Vec<ProximityItem>,
    pointer: Option<Vec2>,
}

/// Angle of a `rotate(<n>deg)` already present in a baseline, else 0.
fn baseline_rotation(baseline: &str) -> f32 {
    baseline
        .find("rotate(")
        .map(|start| &baseline[start + "rotate(".len()..])
        .and_then(|rest| rest.find("deg)").map(|end| &rest[..end]))
        .and_then(|n| n.trim().parse::<f32>().ok())
        .unwrap_or(0.0)
}

/// Descriptor for one item given the pointer offset from its center.
pub fn proximity_transform(
    config: &ProximityConfig,
    baseline: &str,
    signal: &Proximity,
) -> TransformDescriptor {
    let motion = &config.motion;
    let style = config.style;
    if motion.kind == TransformKind::Translate
        && style == ProximityStyle::Attraction
        && signal.distance <= STICKING_THRESHOLD_PX
    {
        let mut ops = Ops::new();
        ops.push(TransformOp::Translate(signal.delta));
        return TransformDescriptor::new(baseline, ops);
    }
    if signal.distance >= config.start_distance {
        return reset(baseline);
    }

    let factor = proximity_factor(signal.distance, config.start_distance);
    let direction = signal.direction();
    let mut ops = Ops::new();
    match motion.kind {
        TransformKind::Translate => {
            let sign = if style == ProximityStyle::Repulsion { -1.0 } else { 1.0 };
            ops.push(TransformOp::Translate(direction * motion.strength * factor * sign));
        }
        TransformKind::Rotate => {
            let mut target = signal.delta.y.atan2(signal.delta.x).to_degrees();
            if style == ProximityStyle::Repulsion {
                target += 180.0;
            }
            let target = target.rem_euclid(360.0);
            let current = baseline_rotation(baseline);
            let delta = (target - current + 180.0).rem_euclid(360.0) - 180.0;
            ops.push(TransformOp::Rotate(current + delta * factor));
        }
        TransformKind::Scale => {
            let amount = motion.strength / 100.0 * factor;
            let scale = if style == ProximityStyle::Repulsion {
                1.0 - amount
            } else {
                1.0 + amount
            };
            ops.push(TransformOp::Scale(scale));
        }
        TransformKind::Tilt | TransformKind::TiltInverse => {
            let lean = direction * factor;
            return motion.compose(baseline, lean.x, lean.y, ScaleProfile::Fine);
        }
    }
    TransformDescriptor::new(baseline, ops)
}

impl ProximityAdapter {
    /// Items are standalone elements; `container` carries the shared
    /// lifecycle options (usually the item itself).
    pub fn new(container: ContainerConfig, items: Vec<Mount<'_>>) -> Result<Self> {
        let items = items
            .iter()
            .map(|m| {
                m.require(markers::DISTANCE_ITEM)?;
                Ok(ProximityItem {
                    config: ProximityConfig::from_attributes(m.attrs),
                    state: TransformState::new(m.baseline.clone()),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            config: container,
            items,
            pointer: None,
        })
    }

    pub fn pointer(&self) -> Option<Vec2> {
        self.pointer
    }
}

impl Adapter for ProximityAdapter {
    type Config = Reconfigure<ContainerConfig, ProximityConfig>;

    fn name(&self) -> &'static str {
        "proximity"
    }

    fn container(&self) -> &ContainerConfig {
        &self.config
    }

    fn mount(&mut self, surface: &mut dyn Surface) {
        for (i, item) in self.items.iter().enumerate() {
            let node = Node::Child(i);
            surface.set_property(node, "transform-origin", &item.config.motion.transform_origin);
            surface.set_property(
                node,
                "transition",
                &item.config.container.transition("transform"),
            );
        }
    }

    fn wants_frames(&self) -> bool {
        true
    }

    fn input(&mut self, event: InputEvent, _cx: &mut Cx<'_>) {
        if let InputEvent::PointerMove(pos) = event {
            self.pointer = Some(pos);
        }
    }

    fn frame(&mut self, cx: &mut Cx<'_>) {
        let Some(pointer) = self.pointer else {
            return;
        };
        for (i, item) in self.items.iter_mut().enumerate() {
            let node = Node::Child(i);
            let signal = Proximity::measure(pointer, &cx.surface.rect(node));
            let desc = proximity_transform(&item.config, item.state.baseline(), &signal);
            item.state.previous_signal = signal.distance;
            item.state.apply(node, desc, &mut *cx.surface);
        }
    }

    fn deactivate(&mut self, cx: &mut Cx<'_>) {
        for (i, item) in self.items.iter_mut().enumerate() {
            item.state.reset(Node::Child(i), &mut *cx.surface);
        }
    }

    fn reconfigure(&mut self, config: Self::Config, surface: &mut dyn Surface) {
        self.config = config.container;
        for (item, cfg) in self.items.iter_mut().zip(config.elements) {
            item.config = cfg;
        }
        self.mount(surface);
    }

    fn read_config(
        container: &dyn AttributeSource,
        children: &[&dyn AttributeSource],
    ) -> Result<Self::Config> {
        Ok(Reconfigure {
            container: ProximityConfig::from_attributes(container).container,
            elements: children
                .iter()
                .map(|c| ProximityConfig::from_attributes(*c))
                .collect(),
        })
    }
}
