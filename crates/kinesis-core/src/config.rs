//! Attribute-driven configuration.
//!
//! Values come from string attributes (`data-ks-*`). Anything missing or
//! malformed silently falls back to the documented default; booleans are
//! only `false` for the exact token `"false"`.

use crate::axis::{resolve_axes, AxisSet, InteractionAxis};
use crate::constants::*;
use crate::transform::{compose, ScaleProfile, TransformDescriptor, TransformKind};
use std::collections::HashMap;
use std::time::Duration;

pub mod markers {
    pub const TRANSFORMER: &str = "data-kinesistransformer";
    pub const TRANSFORMER_ELEMENT: &str = "data-kinesistransformer-element";
    pub const AUDIO: &str = "data-kinesisaudio";
    pub const AUDIO_ELEMENT: &str = "data-kinesisaudio-element";
    pub const DISTANCE_ITEM: &str = "data-kinesisdistance-item";
    pub const SCROLL_ITEM: &str = "data-kinesisscroll-item";
    pub const PATH: &str = "data-kinesispath";
    pub const PATH_ELEMENT: &str = "data-kinesispath-element";
    pub const DEPTH: &str = "data-kinesisdepth";
    pub const DEPTH_ELEMENT: &str = "data-kinesisdepth-element";
}

pub mod attrs {
    pub const ACTIVE: &str = "data-ks-active";
    pub const DURATION: &str = "data-ks-duration";
    pub const EASING: &str = "data-ks-easing";
    pub const INTERACTION: &str = "data-ks-interaction";
    pub const PERSPECTIVE: &str = "data-ks-perspective";
    pub const SENSITIVITY: &str = "data-ks-sensitivity";
    pub const INVERTED: &str = "data-ks-inverted";
    pub const STRENGTH: &str = "data-ks-strength";
    pub const TRANSFORM: &str = "data-ks-transform";
    pub const AXIS: &str = "data-ks-axis";
    pub const INTERACTION_AXIS: &str = "data-ks-interactionaxis";
    pub const TRANSFORM_ORIGIN: &str = "data-ks-transformorigin";
    pub const START_DISTANCE: &str = "data-ks-startdistance";
    pub const AUDIO: &str = "data-ks-audio";
    pub const PLAY_AUDIO: &str = "data-ks-playaudio";
    pub const AUDIO_INDEX: &str = "data-ks-audioindex";
    pub const PATH: &str = "data-ks-path";
    pub const OFFSET: &str = "data-ks-offset";
    pub const DEPTH: &str = "data-ks-depth";
    pub const THROTTLE: &str = "data-ks-throttle";

    /// Older spellings, read only when the current name is absent.
    pub const TYPE: &str = "data-ks-type";
    pub const TRANSFORM_AXIS: &str = "data-ks-transformaxis";
    pub const LEGACY_DEPTH: &str = "data-depth";
    pub const ALIASES: &[(&str, &str)] = &[
        (TRANSFORM, TYPE),
        (AXIS, TRANSFORM_AXIS),
        (DEPTH, LEGACY_DEPTH),
    ];

    /// Container attributes whose change triggers a live reconfiguration.
    pub const CONTAINER_WATCHED: &[&str] = &[
        ACTIVE,
        DURATION,
        EASING,
        INTERACTION,
        PERSPECTIVE,
        SENSITIVITY,
        INVERTED,
        THROTTLE,
    ];

    /// Element-level attributes that also trigger a reconfiguration.
    pub const ELEMENT_WATCHED: &[&str] = &[
        STRENGTH,
        TRANSFORM,
        AXIS,
        INTERACTION_AXIS,
        TRANSFORM_ORIGIN,
        START_DISTANCE,
        AUDIO,
        PLAY_AUDIO,
        AUDIO_INDEX,
        PATH,
        OFFSET,
        DEPTH,
        TYPE,
        TRANSFORM_AXIS,
        LEGACY_DEPTH,
    ];
}

/// Read-only access to an element's attributes.
pub trait AttributeSource {
    fn attr(&self, name: &str) -> Option<String>;

    fn has(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }
}

impl AttributeSource for HashMap<String, String> {
    fn attr(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl AttributeSource for HashMap<&str, &str> {
    fn attr(&self, name: &str) -> Option<String> {
        self.get(name).map(|v| v.to_string())
    }
}

/// `name`, or its older spelling when only that one is present.
pub fn lookup(src: &dyn AttributeSource, name: &str) -> Option<String> {
    src.attr(name).or_else(|| {
        attrs::ALIASES
            .iter()
            .find(|(current, _)| *current == name)
            .and_then(|(_, alias)| src.attr(alias))
    })
}

/// Longest numeric prefix, the way lenient attribute parsers read `"12px"`.
fn leading_number(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let end = s
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
        .map(|(i, c)| i + c.len_utf8())
        .last()?;
    (1..=end)
        .rev()
        .filter(|i| s.is_char_boundary(*i))
        .find_map(|i| s[..i].parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

pub fn parse_bool(src: &dyn AttributeSource, name: &str, default: bool) -> bool {
    match lookup(src, name) {
        Some(v) => v != "false",
        None => default,
    }
}

pub fn parse_f32(src: &dyn AttributeSource, name: &str, default: f32) -> f32 {
    match lookup(src, name) {
        Some(raw) => match leading_number(&raw) {
            Some(v) => v as f32,
            None => {
                log::debug!("[config] {name}={raw:?} is not a number; using {default}");
                default
            }
        },
        None => default,
    }
}

/// Integers truncate toward zero; negative values fall back to `default`.
pub fn parse_u32(src: &dyn AttributeSource, name: &str, default: u32) -> u32 {
    match lookup(src, name) {
        Some(raw) => match leading_number(&raw) {
            Some(v) if v >= 0.0 && v <= u32::MAX as f64 => v.trunc() as u32,
            _ => {
                log::debug!("[config] {name}={raw:?} is not a non-negative integer; using {default}");
                default
            }
        },
        None => default,
    }
}

pub fn parse_string(src: &dyn AttributeSource, name: &str, default: &str) -> String {
    lookup(src, name)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

pub fn parse_enum<T>(
    src: &dyn AttributeSource,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
    default: T,
) -> T {
    match lookup(src, name) {
        Some(raw) => parse(&raw).unwrap_or_else(|| {
            log::debug!("[config] {name}={raw:?} is not recognized; using default");
            default
        }),
        None => default,
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    Pointer,
    Scroll,
}

impl InteractionMode {
    pub fn parse(token: &str) -> Option<InteractionMode> {
        match token.trim() {
            "mouse" | "pointer" => Some(InteractionMode::Pointer),
            "scroll" => Some(InteractionMode::Scroll),
            _ => None,
        }
    }
}

/// How pointer-move and scroll deliveries are rate limited.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThrottleMode {
    AnimationFrame,
    Interval(Duration),
}

/// Shared container options.
#[derive(Clone, Debug, PartialEq)]
pub struct ContainerConfig {
    pub active: bool,
    pub duration_ms: u32,
    pub easing: String,
    pub interaction: InteractionMode,
    pub perspective_px: u32,
    pub throttle: ThrottleMode,
    /// Delay before a deferred reset (path modality).
    pub reset_delay: Duration,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            active: true,
            duration_ms: DEFAULT_DURATION_MS,
            easing: DEFAULT_EASING.to_string(),
            interaction: InteractionMode::Pointer,
            perspective_px: DEFAULT_PERSPECTIVE_PX,
            throttle: ThrottleMode::AnimationFrame,
            reset_delay: Duration::from_millis(DEFAULT_THROTTLE_MS as u64),
        }
    }
}

impl ContainerConfig {
    pub fn from_attributes(src: &dyn AttributeSource) -> Self {
        Self::from_attributes_with_easing(src, DEFAULT_EASING)
    }

    pub fn from_attributes_with_easing(src: &dyn AttributeSource, default_easing: &str) -> Self {
        let throttle_ms = src
            .attr(attrs::THROTTLE)
            .and_then(|raw| leading_number(&raw))
            .filter(|v| *v >= 0.0)
            .map(|v| v.trunc() as u64);
        Self {
            active: parse_bool(src, attrs::ACTIVE, true),
            duration_ms: parse_u32(src, attrs::DURATION, DEFAULT_DURATION_MS),
            easing: parse_string(src, attrs::EASING, default_easing),
            interaction: parse_enum(
                src,
                attrs::INTERACTION,
                InteractionMode::parse,
                InteractionMode::Pointer,
            ),
            perspective_px: parse_u32(src, attrs::PERSPECTIVE, DEFAULT_PERSPECTIVE_PX),
            throttle: match throttle_ms {
                Some(ms) => ThrottleMode::Interval(Duration::from_millis(ms)),
                None => ThrottleMode::AnimationFrame,
            },
            reset_delay: Duration::from_millis(throttle_ms.unwrap_or(DEFAULT_THROTTLE_MS as u64)),
        }
    }

    /// `transition` value for `property`, e.g. `transform 1000ms ease`.
    pub fn transition(&self, property: &str) -> String {
        format!("{} {}ms {}", property, self.duration_ms, self.easing)
    }
}

/// Per-element motion options shared by every transform-driven modality.
#[derive(Clone, Debug, PartialEq)]
pub struct ElementConfig {
    pub kind: TransformKind,
    pub axes: AxisSet,
    pub strength: f32,
    pub transform_origin: String,
    pub interaction_axis: InteractionAxis,
}

impl Default for ElementConfig {
    fn default() -> Self {
        Self {
            kind: TransformKind::Translate,
            axes: AxisSet::default_for(TransformKind::Translate),
            strength: DEFAULT_STRENGTH,
            transform_origin: DEFAULT_TRANSFORM_ORIGIN.to_string(),
            interaction_axis: InteractionAxis::Free,
        }
    }
}

impl ElementConfig {
    pub fn from_attributes(src: &dyn AttributeSource, default_strength: f32) -> Self {
        let kind = parse_enum(
            src,
            attrs::TRANSFORM,
            TransformKind::parse,
            TransformKind::Translate,
        );
        Self {
            kind,
            axes: resolve_axes(lookup(src, attrs::AXIS).as_deref(), kind),
            strength: parse_f32(src, attrs::STRENGTH, default_strength),
            transform_origin: parse_string(src, attrs::TRANSFORM_ORIGIN, DEFAULT_TRANSFORM_ORIGIN),
            interaction_axis: parse_enum(
                src,
                attrs::INTERACTION_AXIS,
                InteractionAxis::parse,
                InteractionAxis::Free,
            ),
        }
    }

    /// Constrain `(x, y)` and compose on top of `baseline`.
    pub fn compose(&self, baseline: &str, x: f32, y: f32, scale: ScaleProfile) -> TransformDescriptor {
        let input = crate::axis::apply_interaction_constraint(x, y, self.interaction_axis);
        compose(baseline, self.kind, &self.axes, self.strength, input, scale)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AudioConfig {
    pub container: ContainerConfig,
    pub source: String,
    pub autoplay: bool,
    pub smoothing: f32,
}

impl AudioConfig {
    pub fn from_attributes(src: &dyn AttributeSource) -> crate::error::Result<Self> {
        let source = src
            .attr(attrs::AUDIO)
            .filter(|s| !s.trim().is_empty())
            .ok_or(crate::error::ConstructionError::MissingAudioSource)?;
        Ok(Self {
            container: ContainerConfig::from_attributes(src),
            source,
            autoplay: parse_bool(src, attrs::PLAY_AUDIO, false),
            smoothing: DEFAULT_SMOOTHING_FACTOR,
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct AudioElementConfig {
    pub motion: ElementConfig,
    pub bin: usize,
}

impl AudioElementConfig {
    pub fn from_attributes(src: &dyn AttributeSource) -> Self {
        Self {
            motion: ElementConfig::from_attributes(src, DEFAULT_STRENGTH),
            bin: parse_u32(src, attrs::AUDIO_INDEX, DEFAULT_AUDIO_BIN as u32) as usize,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ProximityStyle {
    #[default]
    Linear,
    Attraction,
    Repulsion,
}

impl ProximityStyle {
    pub fn parse(token: &str) -> Option<ProximityStyle> {
        match token.trim() {
            "linear" => Some(ProximityStyle::Linear),
            "attraction" => Some(ProximityStyle::Attraction),
            "repulsion" => Some(ProximityStyle::Repulsion),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProximityConfig {
    pub container: ContainerConfig,
    pub motion: ElementConfig,
    pub start_distance: f32,
    pub style: ProximityStyle,
}

impl ProximityConfig {
    pub fn from_attributes(src: &dyn AttributeSource) -> Self {
        let mut container = ContainerConfig::from_attributes(src);
        // `data-ks-interaction` names the falloff style on proximity items.
        container.interaction = InteractionMode::Pointer;
        Self {
            container,
            motion: ElementConfig::from_attributes(src, DEFAULT_PROXIMITY_STRENGTH),
            start_distance: parse_f32(src, attrs::START_DISTANCE, DEFAULT_START_DISTANCE_PX),
            style: parse_enum(
                src,
                attrs::INTERACTION,
                ProximityStyle::parse,
                ProximityStyle::Linear,
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PathConfig {
    pub container: ContainerConfig,
    pub descriptor: Option<String>,
}

impl PathConfig {
    pub fn from_attributes(src: &dyn AttributeSource) -> Self {
        Self {
            container: ContainerConfig::from_attributes_with_easing(src, DEFAULT_PATH_EASING),
            descriptor: src.attr(attrs::PATH).filter(|d| !d.trim().is_empty()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PathElementConfig {
    pub strength: f32,
    pub offset: f32,
    pub descriptor: Option<String>,
}

impl PathElementConfig {
    pub fn from_attributes(src: &dyn AttributeSource) -> Self {
        Self {
            strength: parse_f32(src, attrs::STRENGTH, DEFAULT_PATH_STRENGTH),
            offset: parse_f32(src, attrs::OFFSET, 0.0),
            descriptor: src.attr(attrs::PATH).filter(|d| !d.trim().is_empty()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DepthConfig {
    pub container: ContainerConfig,
    pub sensitivity: f32,
    pub inverted: bool,
}

impl DepthConfig {
    pub fn from_attributes(src: &dyn AttributeSource) -> Self {
        Self {
            container: ContainerConfig::from_attributes(src),
            sensitivity: parse_f32(src, attrs::SENSITIVITY, DEFAULT_SENSITIVITY),
            inverted: parse_bool(src, attrs::INVERTED, false),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DepthElementConfig {
    pub depth: f32,
}

impl DepthElementConfig {
    pub fn from_attributes(src: &dyn AttributeSource) -> Self {
        Self {
            depth: parse_f32(src, attrs::DEPTH, DEFAULT_DEPTH_PX),
        }
    }
}
