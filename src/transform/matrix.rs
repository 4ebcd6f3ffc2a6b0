//! Matrix fallback engine
//!
//! When two transform lists cannot be paired operation-by-operation, each
//! list is collapsed to a single 4x4 affine matrix, decomposed into
//! translation / scale / skew / perspective / rotation-quaternion parts, and
//! interpolated over those parts (slerp for the rotation). The interpolated
//! decomposition recomposes to a matrix serialized as `matrix3d(...)`.
//!
//! Decomposition follows the CSS Transforms Module algorithm. A degenerate
//! matrix (non-invertible, zero w component, or a list containing
//! percentage lengths that have no pixel resolution) yields `None` so the
//! caller can fall back to a discrete midpoint switch.

use glam::{DMat3, DMat4, DQuat, DVec3, DVec4};

use crate::dimension::{Arg, Unit};

use super::types::{Kind, Operation, TransformList};

/// Determinants smaller than this are treated as non-invertible.
const DEGENERATE_EPSILON: f64 = 1e-8;

/// A matrix factored into its animatable parts. Internal to the fallback
/// engine; interpolation happens component-wise except for the quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Decomposed {
    pub translate: DVec3,
    pub scale: DVec3,
    /// Shear factors: xy, xz, yz
    pub skew: [f64; 3],
    pub perspective: DVec4,
    pub quaternion: DQuat,
}

impl TransformList {
    /// Collapse the whole list to a single 4x4 matrix by composing every
    /// operation in order.
    ///
    /// `None` when the list cannot be resolved to a matrix: percentage
    /// lengths have no pixel value without a reference box, and
    /// `perspective(0)` has no finite matrix.
    pub fn to_matrix(&self) -> Option<DMat4> {
        let mut m = DMat4::IDENTITY;
        for op in self.ops() {
            m *= op_matrix(op)?;
        }
        Some(m)
    }
}

/// Collapse and decompose a list in one step.
pub(crate) fn decompose_list(list: &TransformList) -> Option<Decomposed> {
    decompose(list.to_matrix()?)
}

fn number(arg: &Arg) -> f64 {
    match arg {
        Arg::Number(n) => *n,
        Arg::Dim(d) => d.value,
    }
}

/// Pixel magnitude of a length argument. Percentages are unresolvable here.
fn pixels(arg: &Arg) -> Option<f64> {
    match arg {
        Arg::Number(n) => Some(*n),
        Arg::Dim(d) if d.unit != Unit::Percent => Some(d.value),
        Arg::Dim(_) => None,
    }
}

fn radians(arg: &Arg) -> f64 {
    number(arg).to_radians()
}

fn op_matrix(op: &Operation) -> Option<DMat4> {
    let args = &op.args;
    let m = match op.kind {
        Kind::Translate => {
            DMat4::from_translation(DVec3::new(pixels(&args[0])?, pixels(&args[1])?, 0.0))
        }
        Kind::TranslateX => DMat4::from_translation(DVec3::new(pixels(&args[0])?, 0.0, 0.0)),
        Kind::TranslateY => DMat4::from_translation(DVec3::new(0.0, pixels(&args[0])?, 0.0)),
        Kind::TranslateZ => DMat4::from_translation(DVec3::new(0.0, 0.0, pixels(&args[0])?)),
        Kind::Translate3d => DMat4::from_translation(DVec3::new(
            pixels(&args[0])?,
            pixels(&args[1])?,
            pixels(&args[2])?,
        )),
        Kind::Rotate | Kind::RotateZ => DMat4::from_rotation_z(radians(&args[0])),
        Kind::RotateX => DMat4::from_rotation_x(radians(&args[0])),
        Kind::RotateY => DMat4::from_rotation_y(radians(&args[0])),
        Kind::Rotate3d => {
            let axis = DVec3::new(number(&args[0]), number(&args[1]), number(&args[2]));
            if axis.length_squared() == 0.0 {
                // zero axis rotates nothing
                DMat4::IDENTITY
            } else {
                DMat4::from_axis_angle(axis.normalize(), radians(&args[3]))
            }
        }
        Kind::Scale => DMat4::from_scale(DVec3::new(number(&args[0]), number(&args[1]), 1.0)),
        Kind::ScaleX => DMat4::from_scale(DVec3::new(number(&args[0]), 1.0, 1.0)),
        Kind::ScaleY => DMat4::from_scale(DVec3::new(1.0, number(&args[0]), 1.0)),
        Kind::ScaleZ => DMat4::from_scale(DVec3::new(1.0, 1.0, number(&args[0]))),
        Kind::Scale3d => {
            DMat4::from_scale(DVec3::new(number(&args[0]), number(&args[1]), number(&args[2])))
        }
        Kind::Skew => {
            let mut m = DMat4::IDENTITY;
            m.y_axis.x = radians(&args[0]).tan();
            m.x_axis.y = radians(&args[1]).tan();
            m
        }
        Kind::SkewX => {
            let mut m = DMat4::IDENTITY;
            m.y_axis.x = radians(&args[0]).tan();
            m
        }
        Kind::SkewY => {
            let mut m = DMat4::IDENTITY;
            m.x_axis.y = radians(&args[0]).tan();
            m
        }
        Kind::Matrix => {
            let (a, b, c, d, e, f) = (
                number(&args[0]),
                number(&args[1]),
                number(&args[2]),
                number(&args[3]),
                number(&args[4]),
                number(&args[5]),
            );
            DMat4::from_cols_array(&[
                a, b, 0.0, 0.0, c, d, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, e, f, 0.0, 1.0,
            ])
        }
        Kind::Matrix3d => {
            let mut components = [0.0; 16];
            for (slot, arg) in components.iter_mut().zip(args.iter()) {
                *slot = number(arg);
            }
            DMat4::from_cols_array(&components)
        }
        Kind::Perspective => {
            let d = pixels(&args[0])?;
            if d == 0.0 {
                return None;
            }
            let mut m = DMat4::IDENTITY;
            m.z_axis.w = -1.0 / d;
            m
        }
    };
    Some(m)
}

/// Decompose a matrix into translation, scale, skew, perspective and a unit
/// rotation quaternion. `None` for degenerate matrices.
pub(crate) fn decompose(m: DMat4) -> Option<Decomposed> {
    if m.w_axis.w == 0.0 {
        return None;
    }

    // Work on columns, normalized so that m[3][3] is 1
    let mut cols = m.to_cols_array_2d();
    let w = cols[3][3];
    for col in cols.iter_mut() {
        for v in col.iter_mut() {
            *v /= w;
        }
    }

    // Isolate the perspective row; the remaining matrix must be invertible
    let mut pm = cols;
    for col in pm.iter_mut().take(3) {
        col[3] = 0.0;
    }
    pm[3][3] = 1.0;
    let pm = DMat4::from_cols_array_2d(&pm);
    if pm.determinant().abs() < DEGENERATE_EPSILON {
        return None;
    }

    let perspective = if cols[0][3] != 0.0 || cols[1][3] != 0.0 || cols[2][3] != 0.0 {
        let rhs = DVec4::new(cols[0][3], cols[1][3], cols[2][3], cols[3][3]);
        pm.inverse().transpose() * rhs
    } else {
        DVec4::new(0.0, 0.0, 0.0, 1.0)
    };

    let translate = DVec3::new(cols[3][0], cols[3][1], cols[3][2]);

    let mut basis = [
        DVec3::new(cols[0][0], cols[0][1], cols[0][2]),
        DVec3::new(cols[1][0], cols[1][1], cols[1][2]),
        DVec3::new(cols[2][0], cols[2][1], cols[2][2]),
    ];
    if DMat3::from_cols(basis[0], basis[1], basis[2]).determinant().abs() < DEGENERATE_EPSILON {
        return None;
    }

    // Gram-Schmidt: peel scale and shear off the basis, leaving a rotation
    let mut scale = DVec3::ZERO;
    let mut skew = [0.0; 3];

    scale.x = basis[0].length();
    basis[0] /= scale.x;

    skew[0] = basis[0].dot(basis[1]);
    basis[1] -= basis[0] * skew[0];
    scale.y = basis[1].length();
    basis[1] /= scale.y;
    skew[0] /= scale.y;

    skew[1] = basis[0].dot(basis[2]);
    basis[2] -= basis[0] * skew[1];
    skew[2] = basis[1].dot(basis[2]);
    basis[2] -= basis[1] * skew[2];
    scale.z = basis[2].length();
    basis[2] /= scale.z;
    skew[1] /= scale.z;
    skew[2] /= scale.z;

    // A negative determinant means the basis is left-handed: flip it
    let pdum3 = basis[1].cross(basis[2]);
    if basis[0].dot(pdum3) < 0.0 {
        scale = -scale;
        for b in basis.iter_mut() {
            *b = -*b;
        }
    }

    let quaternion =
        DQuat::from_mat3(&DMat3::from_cols(basis[0], basis[1], basis[2])).normalize();

    Some(Decomposed { translate, scale, skew, perspective, quaternion })
}

/// Rebuild a single matrix from decomposed parts: perspective, translation,
/// rotation, skew (yz, xz, xy), then scale.
pub(crate) fn recompose(d: &Decomposed) -> DMat4 {
    let mut m = DMat4::IDENTITY;
    m.x_axis.w = d.perspective.x;
    m.y_axis.w = d.perspective.y;
    m.z_axis.w = d.perspective.z;
    m.w_axis.w = d.perspective.w;

    m *= DMat4::from_translation(d.translate);
    m *= DMat4::from_quat(d.quaternion);

    if d.skew[2] != 0.0 {
        let mut t = DMat4::IDENTITY;
        t.z_axis.y = d.skew[2];
        m *= t;
    }
    if d.skew[1] != 0.0 {
        let mut t = DMat4::IDENTITY;
        t.z_axis.x = d.skew[1];
        m *= t;
    }
    if d.skew[0] != 0.0 {
        let mut t = DMat4::IDENTITY;
        t.y_axis.x = d.skew[0];
        m *= t;
    }

    m * DMat4::from_scale(d.scale)
}

/// Interpolate decomposed parts at `t`: component-wise lerp everywhere except
/// the rotation, which takes the spherical path between the quaternions.
pub(crate) fn interpolate(from: &Decomposed, to: &Decomposed, t: f64) -> Decomposed {
    Decomposed {
        translate: from.translate.lerp(to.translate, t),
        scale: from.scale.lerp(to.scale, t),
        skew: [
            from.skew[0] + (to.skew[0] - from.skew[0]) * t,
            from.skew[1] + (to.skew[1] - from.skew[1]) * t,
            from.skew[2] + (to.skew[2] - from.skew[2]) * t,
        ],
        perspective: from.perspective.lerp(to.perspective, t),
        quaternion: from.quaternion.slerp(to.quaternion, t),
    }
}

/// Format a matrix as `matrix3d(...)` with 16 comma-separated components in
/// column-major order.
pub(crate) fn format_matrix3d(m: &DMat4) -> String {
    let components: Vec<String> = m.to_cols_array().iter().map(|&x| long_number(x)).collect();
    format!("matrix3d({})", components.join(","))
}

/// Fixed six-decimal formatting; a zero-only fractional part collapses to the
/// integer. `1.0` formats as `"1"`, `1.5` as `"1.500000"`.
fn long_number(x: f64) -> String {
    let x = if x == 0.0 { 0.0 } else { x };
    let s = format!("{:.6}", x);
    match s.strip_suffix(".000000") {
        Some(int) => int.to_string(),
        None => s,
    }
}
