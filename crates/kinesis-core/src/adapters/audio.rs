//! Audio modality: each child reacts to one frequency bin of a playing
//! source. Runs a per-frame loop while playing.

use super::{Adapter, Cx, InputEvent, Mount, Reconfigure, TransformState};
use crate::config::{markers, AttributeSource, AudioConfig, AudioElementConfig, ContainerConfig};
use crate::constants::SPECTRUM_MAX;
use crate::error::Result;
use crate::host::{Node, StyleSink, Surface};
use crate::smoother::{AttackDecay, Ema, TransitionTier};
use crate::transform::ScaleProfile;

const DURATION_PROPERTY: &str = "--transform-duration";

/// Host audio analysis: playback control plus periodic byte magnitudes.
pub trait SpectrumSource {
    fn bin_count(&self) -> usize;
    /// Fill `out` (length [`Self::bin_count`]) with magnitudes in `0..=255`.
    fn read(&mut self, out: &mut [u8]);
    fn play(&mut self) {}
    fn pause(&mut self) {}
    fn rewind(&mut self) {}
    fn set_source(&mut self, _uri: &str) {}
}

struct AudioElement {
    config: AudioElementConfig,
    state: TransformState,
    timing: AttackDecay,
}

impl AudioElement {
    fn reset<K: StyleSink + ?Sized>(&mut self, node: Node, sink: &mut K) {
        let tier = self.timing.reset();
        sink.set_property(node, DURATION_PROPERTY, &tier.css());
        self.state.reset(node, sink);
    }

    /// Back to the baseline with the slow transition, keeping the last value
    /// so the next frame still picks attack or decay against it.
    fn park<K: StyleSink + ?Sized>(&mut self, node: Node, sink: &mut K) {
        sink.set_property(node, DURATION_PROPERTY, &TransitionTier::Reset.css());
        let previous = self.state.previous_signal;
        self.state.reset(node, sink);
        self.state.previous_signal = previous;
    }
}

pub struct AudioAdapter {
    config: AudioConfig,
    elements: Vec<AudioElement>,
    spectrum: Box<dyn SpectrumSource>,
    ema: Ema,
    bytes: Vec<u8>,
    raw: Vec<f32>,
    playing: bool,
}

impl AudioAdapter {
    pub fn new(
        container: Mount<'_>,
        children: Vec<Mount<'_>>,
        spectrum: Box<dyn SpectrumSource>,
    ) -> Result<Self> {
        container.require(markers::AUDIO)?;
        let config = AudioConfig::from_attributes(container.attrs)?;
        let elements = children
            .iter()
            .map(|m| {
                m.require(markers::AUDIO_ELEMENT)?;
                Ok(AudioElement {
                    config: AudioElementConfig::from_attributes(m.attrs),
                    state: TransformState::new(m.baseline.clone()),
                    timing: AttackDecay::default(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let mut adapter = Self {
            ema: Ema::new(config.smoothing),
            config,
            elements,
            spectrum,
            bytes: Vec::new(),
            raw: Vec::new(),
            playing: false,
        };
        if adapter.config.autoplay {
            adapter.play();
        }
        Ok(adapter)
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn source(&self) -> &str {
        &self.config.source
    }

    pub fn smoothed(&self) -> &[f32] {
        self.ema.values()
    }

    /// Start playback; the controller starts the frame loop once bound.
    pub fn play(&mut self) {
        if self.playing {
            return;
        }
        self.playing = true;
        self.spectrum.play();
        log::info!("[audio] play {}", self.config.source);
    }

    /// Pause and rewind the source, forget the smoothing history and return
    /// every element to its baseline with the slow reset transition.
    pub fn stop<K: StyleSink + ?Sized>(&mut self, sink: &mut K) {
        self.playing = false;
        self.spectrum.pause();
        self.spectrum.rewind();
        self.ema.clear();
        self.reset_elements(sink);
        log::info!("[audio] stop {}", self.config.source);
    }

    fn reset_elements<K: StyleSink + ?Sized>(&mut self, sink: &mut K) {
        for (i, el) in self.elements.iter_mut().enumerate() {
            el.reset(Node::Child(i), sink);
        }
    }
}

impl Adapter for AudioAdapter {
    type Config = Reconfigure<AudioConfig, AudioElementConfig>;

    fn name(&self) -> &'static str {
        "audio"
    }

    fn container(&self) -> &ContainerConfig {
        &self.config.container
    }

    fn mount(&mut self, surface: &mut dyn Surface) {
        surface.set_property(
            Node::Container,
            "perspective",
            &format!("{}px", self.config.container.perspective_px),
        );
        surface.set_property(Node::Container, "transform-style", "preserve-3d");
        surface.set_property(Node::Container, "position", "relative");
        for (i, el) in self.elements.iter().enumerate() {
            let node = Node::Child(i);
            surface.set_property(node, "transform-origin", &el.config.motion.transform_origin);
            surface.set_property(node, DURATION_PROPERTY, "0.1s");
            surface.set_property(
                node,
                "transition",
                &format!("transform var({DURATION_PROPERTY}) ease-out"),
            );
        }
    }

    fn wants_frames(&self) -> bool {
        self.playing
    }

    fn input(&mut self, _event: InputEvent, _cx: &mut Cx<'_>) {}

    fn frame(&mut self, cx: &mut Cx<'_>) {
        if !self.playing {
            return;
        }
        let bins = self.spectrum.bin_count();
        self.bytes.resize(bins, 0);
        self.spectrum.read(&mut self.bytes);
        self.raw.clear();
        self.raw.extend(self.bytes.iter().map(|b| *b as f32));
        let smoothed = self.ema.update(&self.raw);

        for (i, el) in self.elements.iter_mut().enumerate() {
            let node = Node::Child(i);
            let value = smoothed.get(el.config.bin).copied().unwrap_or(0.0) / SPECTRUM_MAX;
            let tier = el.timing.observe(value);
            cx.surface.set_property(node, DURATION_PROPERTY, &tier.css());
            let desc = el
                .config
                .motion
                .compose(el.state.baseline(), value, value, ScaleProfile::Coarse);
            el.state.previous_signal = value;
            el.state.apply(node, desc, &mut *cx.surface);
        }
    }

    /// Leaving the viewport pauses the visuals only; smoothing and timing
    /// history stay until an explicit stop.
    fn deactivate(&mut self, cx: &mut Cx<'_>) {
        for (i, el) in self.elements.iter_mut().enumerate() {
            el.park(Node::Child(i), &mut *cx.surface);
        }
    }

    fn destroy(&mut self, cx: &mut Cx<'_>) {
        self.stop(&mut *cx.surface);
    }

    fn reconfigure(&mut self, config: Self::Config, surface: &mut dyn Surface) {
        if config.container.source != self.config.source {
            self.spectrum.set_source(&config.container.source);
            self.ema.clear();
        }
        self.ema.set_factor(config.container.smoothing);
        let autoplay = config.container.autoplay;
        self.config = config.container;
        for (el, cfg) in self.elements.iter_mut().zip(config.elements) {
            el.config = cfg;
        }
        if autoplay {
            self.play();
        }
        self.mount(surface);
    }

    fn read_config(
        container: &dyn AttributeSource,
        children: &[&dyn AttributeSource],
    ) -> Result<Self::Config> {
        Ok(Reconfigure {
            container: AudioConfig::from_attributes(container)?,
            elements: children
                .iter()
                .map(|c| AudioElementConfig::from_attributes(*c))
                .collect(),
        })
    }
}
