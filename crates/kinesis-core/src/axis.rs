//! Axis resolution and interaction-axis constraints.
//!
//! An element moves along a subset of `{X, Y, Z}`. The subset comes from a
//! comma-separated attribute such as `"X, Z"`; unknown tokens are dropped
//! rather than reported, matching the fallback policy of the config layer.

use crate::constants::CONSTRAINT_COMPENSATION;
use crate::transform::TransformKind;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn parse(token: &str) -> Option<Axis> {
        match token.trim().to_ascii_uppercase().as_str() {
            "X" => Some(Axis::X),
            "Y" => Some(Axis::Y),
            "Z" => Some(Axis::Z),
            _ => None,
        }
    }
}

/// Ordered, duplicate-free set of axes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AxisSet(SmallVec<[Axis; 3]>);

impl AxisSet {
    pub fn empty() -> Self {
        Self(SmallVec::new())
    }

    /// Default set for a transform kind: rotation spins about Z, everything
    /// else moves in the XY plane.
    pub fn default_for(kind: TransformKind) -> Self {
        match kind {
            TransformKind::Rotate => Self::from_slice(&[Axis::Z]),
            _ => Self::from_slice(&[Axis::X, Axis::Y]),
        }
    }

    pub fn from_slice(axes: &[Axis]) -> Self {
        let mut set = Self::empty();
        for a in axes {
            set.insert(*a);
        }
        set
    }

    pub fn insert(&mut self, axis: Axis) {
        if !self.0.contains(&axis) {
            self.0.push(axis);
        }
    }

    #[inline]
    pub fn contains(&self, axis: Axis) -> bool {
        self.0.contains(&axis)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = Axis> + '_ {
        self.0.iter().copied()
    }
}

/// Resolve a raw axis attribute. A missing or blank value yields the default
/// set for `kind`; a non-blank value keeps only the recognized tokens.
pub fn resolve_axes(raw: Option<&str>, kind: TransformKind) -> AxisSet {
    let raw = match raw.map(str::trim) {
        Some(r) if !r.is_empty() => r,
        _ => return AxisSet::default_for(kind),
    };
    let mut set = AxisSet::empty();
    for axis in raw.split(',').filter_map(Axis::parse) {
        set.insert(axis);
    }
    set
}

/// Optional restriction of pointer input to a single component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionAxis {
    #[default]
    Free,
    X,
    Y,
}

impl InteractionAxis {
    pub fn parse(token: &str) -> Option<InteractionAxis> {
        match token.trim().to_ascii_uppercase().as_str() {
            "X" => Some(InteractionAxis::X),
            "Y" => Some(InteractionAxis::Y),
            _ => None,
        }
    }
}

/// Input components after the constraint, plus the multiplier for paths that
/// sum both components.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Constrained {
    pub x: f32,
    pub y: f32,
    pub compensation: f32,
}

pub fn apply_interaction_constraint(x: f32, y: f32, axis: InteractionAxis) -> Constrained {
    match axis {
        InteractionAxis::Free => Constrained {
            x,
            y,
            compensation: 1.0,
        },
        InteractionAxis::X => Constrained {
            x,
            y: 0.0,
            compensation: CONSTRAINT_COMPENSATION,
        },
        InteractionAxis::Y => Constrained {
            x: 0.0,
            y,
            compensation: CONSTRAINT_COMPENSATION,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_and_space_insensitive() {
        assert_eq!(Axis::parse(" z "), Some(Axis::Z));
        assert_eq!(Axis::parse("w"), None);
        assert_eq!(InteractionAxis::parse("y"), Some(InteractionAxis::Y));
        assert_eq!(InteractionAxis::parse("z"), None);
    }
}
