//! Seams to the host environment: layout measurement and style writes.
//!
//! These traits avoid referencing platform-specific APIs; the web binding
//! implements them over DOM elements, tests implement them over plain maps.

use glam::Vec2;

/// Target of a measurement or a style write.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    Container,
    Child(usize),
}

/// Viewport-space rectangle (CSS pixels).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    #[inline]
    pub fn half_extent(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

pub trait Layout {
    fn rect(&self, node: Node) -> Rect;
    fn viewport_height(&self) -> f32;
}

/// Applies computed values to an element's visual state.
pub trait StyleSink {
    fn set_transform(&mut self, node: Node, css: &str);
    /// Any other inline style property (`transition`, `perspective`,
    /// `offset-distance`, custom properties, ...).
    fn set_property(&mut self, node: Node, name: &str, value: &str);
}

/// Everything an adapter needs from its host.
pub trait Surface: Layout + StyleSink {}

impl<T: Layout + StyleSink + ?Sized> Surface for T {}
