//! Transform composition.
//!
//! Every application is recomputed from the element's captured baseline and
//! the current signal, so nothing accumulates between frames. The descriptor
//! serializes to the literal CSS `transform` value.

use crate::axis::{Axis, AxisSet, Constrained};
use crate::constants::{SCALE_FACTOR_COARSE, SCALE_FACTOR_FINE};
use glam::{Vec2, Vec3};
use smallvec::SmallVec;
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransformKind {
    #[default]
    Translate,
    Rotate,
    Scale,
    Tilt,
    TiltInverse,
}

impl TransformKind {
    pub fn parse(token: &str) -> Option<TransformKind> {
        match token.trim() {
            "translate" => Some(TransformKind::Translate),
            "rotate" => Some(TransformKind::Rotate),
            "scale" => Some(TransformKind::Scale),
            "tilt" => Some(TransformKind::Tilt),
            "tilt_inv" | "tilt-inv" => Some(TransformKind::TiltInverse),
            _ => None,
        }
    }
}

/// Multiplier applied to `component * strength` for scale transforms.
///
/// Two magnitudes exist in the wild: container-driven elements use the fine
/// profile, audio elements the coarse one. Callers pick explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleProfile {
    Coarse,
    Fine,
}

impl ScaleProfile {
    #[inline]
    pub fn factor(self) -> f32 {
        match self {
            ScaleProfile::Coarse => SCALE_FACTOR_COARSE,
            ScaleProfile::Fine => SCALE_FACTOR_FINE,
        }
    }
}

/// A single CSS transform function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TransformOp {
    Translate3d(Vec3),
    /// Axis is a 0/1 pattern; see [`compose`] for the angle selection.
    Rotate3d { axis: Vec3, angle_deg: f32 },
    Scale3d(Vec3),
    RotateX(f32),
    RotateY(f32),
    Translate(Vec2),
    Rotate(f32),
    Scale(f32),
    TranslateZ(f32),
}

/// Prints a float the way CSS authors write it: shortest form, no `-0`.
pub(crate) struct Num(pub f32);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl fmt::Display for TransformOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            TransformOp::Translate3d(v) => write!(
                f,
                "translate3d({}px, {}px, {}px)",
                Num(v.x),
                Num(v.y),
                Num(v.z)
            ),
            TransformOp::Rotate3d { axis, angle_deg } => write!(
                f,
                "rotate3d({}, {}, {}, {}deg)",
                Num(axis.x),
                Num(axis.y),
                Num(axis.z),
                Num(angle_deg)
            ),
            TransformOp::Scale3d(v) => {
                write!(f, "scale3d({}, {}, {})", Num(v.x), Num(v.y), Num(v.z))
            }
            TransformOp::RotateX(a) => write!(f, "rotateX({}deg)", Num(a)),
            TransformOp::RotateY(a) => write!(f, "rotateY({}deg)", Num(a)),
            TransformOp::Translate(v) => write!(f, "translate({}px, {}px)", Num(v.x), Num(v.y)),
            TransformOp::Rotate(a) => write!(f, "rotate({}deg)", Num(a)),
            TransformOp::Scale(s) => write!(f, "scale({})", Num(s)),
            TransformOp::TranslateZ(z) => write!(f, "translateZ({}px)", Num(z)),
        }
    }
}

pub type Ops = SmallVec<[TransformOp; 3]>;

/// Baseline transform followed by the operations composed for this signal.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransformDescriptor {
    pub baseline: String,
    pub ops: Ops,
}

impl TransformDescriptor {
    pub fn new(baseline: &str, ops: Ops) -> Self {
        Self {
            baseline: baseline.to_string(),
            ops,
        }
    }

    pub fn is_baseline(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TransformDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let baseline = self.baseline.trim();
        f.write_str(baseline)?;
        let mut first = baseline.is_empty();
        for op in &self.ops {
            if !first {
                f.write_str(" ")?;
            }
            write!(f, "{op}")?;
            first = false;
        }
        Ok(())
    }
}

/// The descriptor that undoes every effect: exactly the captured baseline.
pub fn reset(baseline: &str) -> TransformDescriptor {
    TransformDescriptor::new(baseline, Ops::new())
}

#[inline]
fn on(axes: &AxisSet, axis: Axis, value: f32) -> f32 {
    if axes.contains(axis) {
        value
    } else {
        0.0
    }
}

/// Compose the operations for one element.
///
/// Rotation is cross-wired (pitch from `y`, yaw from `x`) and emitted as one
/// `rotate3d` whose angle is the first non-zero of X, Y, Z. Two simultaneous
/// non-zero rotations therefore share one angle; that approximation is the
/// established visual contract and is kept as is.
pub fn compose_ops(
    kind: TransformKind,
    axes: &AxisSet,
    strength: f32,
    input: Constrained,
    scale: ScaleProfile,
) -> Ops {
    let Constrained { x, y, compensation } = input;
    let sum = (x + y) * compensation;
    let mut ops = Ops::new();
    match kind {
        TransformKind::Translate => {
            ops.push(TransformOp::Translate3d(Vec3::new(
                on(axes, Axis::X, x * strength),
                on(axes, Axis::Y, y * strength),
                on(axes, Axis::Z, sum * strength),
            )));
        }
        TransformKind::Rotate => {
            let rx = on(axes, Axis::X, y * strength);
            let ry = on(axes, Axis::Y, x * strength);
            let rz = on(axes, Axis::Z, sum * strength);
            let flag = |v: f32| if v != 0.0 { 1.0 } else { 0.0 };
            let angle_deg = [rx, ry, rz]
                .into_iter()
                .find(|v| *v != 0.0)
                .unwrap_or(0.0);
            ops.push(TransformOp::Rotate3d {
                axis: Vec3::new(flag(rx), flag(ry), flag(rz)),
                angle_deg,
            });
        }
        TransformKind::Scale => {
            let k = strength * scale.factor();
            ops.push(TransformOp::Scale3d(Vec3::new(
                1.0 + on(axes, Axis::X, x * k),
                1.0 + on(axes, Axis::Y, y * k),
                1.0 + on(axes, Axis::Z, sum * k),
            )));
        }
        TransformKind::Tilt | TransformKind::TiltInverse => {
            let pitch = on(axes, Axis::X, y);
            let yaw = on(axes, Axis::Y, x);
            let sign = if kind == TransformKind::Tilt { 1.0 } else { -1.0 };
            ops.push(TransformOp::RotateX(-pitch * sign));
            ops.push(TransformOp::RotateY(yaw * sign));
            ops.push(TransformOp::Translate3d(Vec3::new(0.0, 0.0, strength * 2.0)));
        }
    }
    ops
}

/// Pure composition: identical inputs always produce identical descriptors.
pub fn compose(
    baseline: &str,
    kind: TransformKind,
    axes: &AxisSet,
    strength: f32,
    input: Constrained,
    scale: ScaleProfile,
) -> TransformDescriptor {
    TransformDescriptor::new(baseline, compose_ops(kind, axes, strength, input, scale))
}
