// Host-side fakes shared by the integration tests.

#![allow(dead_code)]

use kinesis_core::adapters::{PathGeometry, SpectrumSource};
use kinesis_core::{Layout, Node, Rect, StyleSink};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

pub type Attrs = HashMap<&'static str, &'static str>;

pub fn attributes(pairs: &[(&'static str, &'static str)]) -> Attrs {
    pairs.iter().copied().collect()
}

/// Records every style write and answers layout queries from fixed rects.
#[derive(Debug, Default)]
pub struct FakeSurface {
    pub rects: HashMap<Node, Rect>,
    pub viewport: f32,
    pub transforms: HashMap<Node, String>,
    pub properties: HashMap<(Node, String), String>,
    pub transform_writes: usize,
}

impl FakeSurface {
    pub fn new(container: Rect) -> Self {
        let mut surface = Self {
            viewport: 800.0,
            ..Self::default()
        };
        surface.rects.insert(Node::Container, container);
        surface
    }

    pub fn with_child(mut self, index: usize, rect: Rect) -> Self {
        self.rects.insert(Node::Child(index), rect);
        self
    }

    pub fn transform(&self, node: Node) -> Option<&str> {
        self.transforms.get(&node).map(String::as_str)
    }

    pub fn property(&self, node: Node, name: &str) -> Option<&str> {
        self.properties
            .get(&(node, name.to_string()))
            .map(String::as_str)
    }
}

impl Layout for FakeSurface {
    fn rect(&self, node: Node) -> Rect {
        self.rects.get(&node).copied().unwrap_or_default()
    }

    fn viewport_height(&self) -> f32 {
        self.viewport
    }
}

impl StyleSink for FakeSurface {
    fn set_transform(&mut self, node: Node, css: &str) {
        self.transform_writes += 1;
        self.transforms.insert(node, css.to_string());
    }

    fn set_property(&mut self, node: Node, name: &str, value: &str) {
        self.properties
            .insert((node, name.to_string()), value.to_string());
    }
}

#[derive(Debug, Default)]
pub struct SpectrumState {
    pub bins: Vec<u8>,
    pub playing: bool,
    pub rewinds: usize,
    pub source: Option<String>,
}

/// Spectrum whose bins and playback state the test can see and change.
#[derive(Clone, Default)]
pub struct FakeSpectrum(pub Rc<RefCell<SpectrumState>>);

impl FakeSpectrum {
    pub fn with_bins(bins: usize) -> Self {
        let spectrum = Self::default();
        spectrum.0.borrow_mut().bins = vec![0; bins];
        spectrum
    }

    pub fn set_bin(&self, index: usize, value: u8) {
        self.0.borrow_mut().bins[index] = value;
    }

    pub fn fill(&self, value: u8) {
        self.0.borrow_mut().bins.iter_mut().for_each(|b| *b = value);
    }

    pub fn is_playing(&self) -> bool {
        self.0.borrow().playing
    }
}

impl SpectrumSource for FakeSpectrum {
    fn bin_count(&self) -> usize {
        self.0.borrow().bins.len()
    }

    fn read(&mut self, out: &mut [u8]) {
        let state = self.0.borrow();
        for (o, b) in out.iter_mut().zip(&state.bins) {
            *o = *b;
        }
    }

    fn play(&mut self) {
        self.0.borrow_mut().playing = true;
    }

    fn pause(&mut self) {
        self.0.borrow_mut().playing = false;
    }

    fn rewind(&mut self) {
        self.0.borrow_mut().rewinds += 1;
    }

    fn set_source(&mut self, uri: &str) {
        self.0.borrow_mut().source = Some(uri.to_string());
    }
}

/// Every descriptor measures the same length.
pub struct FixedLength(pub f32);

impl PathGeometry for FixedLength {
    fn total_length(&self, _descriptor: &str) -> Option<f32> {
        Some(self.0)
    }
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}
