//! Keyframe pairing and merge plans
//!
//! Given the "from" and "to" transform lists of an animation, builds a
//! [`MergePlan`]: the precomputed pairing plus interpolation data that can be
//! sampled repeatedly at arbitrary progress values. Pairing is attempted
//! operation-by-operation (with optional 2D/3D coercion and identity
//! padding); structurally or unit-incompatible lists escalate once, as a
//! whole, to the matrix fallback engine.

use crate::dimension::{merge_dims, merge_numbers, Arg, Dim, DimTween, NumberTween};

use super::matrix::{decompose_list, format_matrix3d, interpolate, recompose, Decomposed};
use super::types::{Kind, Operation, TransformList};

/// One merged argument position.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ArgTween {
    Number(NumberTween),
    Dim(DimTween),
}

impl ArgTween {
    fn format(&self, t: f64) -> String {
        match self {
            ArgTween::Number(tw) => tw.format(t),
            ArgTween::Dim(tw) => tw.format(t),
        }
    }
}

/// One position of a merge plan.
#[derive(Debug, Clone)]
enum PlanOp {
    /// Paired operation interpolated argument-by-argument
    Tween { kind: Kind, args: Vec<ArgTween> },
    /// Matrix fallback: slerp/lerp over decomposed parts, emitted as matrix3d
    Matrix { from: Decomposed, to: Decomposed },
    /// No valid decomposition: switch endpoints at the midpoint
    Discrete { from: String, to: String },
}

impl PlanOp {
    fn format(&self, t: f64) -> String {
        match self {
            PlanOp::Tween { kind, args } => {
                let formatted: Vec<String> = args.iter().map(|a| a.format(t)).collect();
                format!("{}({})", kind, formatted.join(","))
            }
            PlanOp::Matrix { from, to } => format_matrix3d(&recompose(&interpolate(from, to, t))),
            PlanOp::Discrete { from, to } => {
                if t < 0.5 {
                    from.clone()
                } else {
                    to.clone()
                }
            }
        }
    }
}

/// A precomputed interpolation path between two transform lists.
///
/// Immutable after construction; sampling is a pure function of progress, so
/// a plan can be evaluated repeatedly and concurrently in any order.
#[derive(Debug, Clone)]
pub struct MergePlan {
    ops: Vec<PlanOp>,
}

impl MergePlan {
    /// Serialize the transform list for the given progress.
    ///
    /// Progress is not clamped: values outside `[0, 1]` extrapolate the
    /// linear components. The output is a valid transform list string
    /// (`"none"` when both keyframes were empty).
    pub fn sample(&self, progress: f64) -> String {
        if self.ops.is_empty() {
            return "none".to_string();
        }
        let parts: Vec<String> = self.ops.iter().map(|op| op.format(progress)).collect();
        parts.join(" ")
    }
}

/// Build a merge plan for two keyframe lists.
///
/// This never fails: incompatibilities degrade to the matrix fallback and,
/// past that, to a discrete midpoint switch.
pub fn merge_transform_lists(from: &TransformList, to: &TransformList) -> MergePlan {
    // An empty keyframe stands for the identity counterpart of the other
    // side, shaped like it argument-for-argument.
    let (from, to) = if from.is_empty() && !to.is_empty() {
        (neutral_counterpart(to), to.clone())
    } else if to.is_empty() && !from.is_empty() {
        let neutral = neutral_counterpart(from);
        (from.clone(), neutral)
    } else {
        (from.clone(), to.clone())
    };

    if from.len() != to.len() {
        return MergePlan { ops: vec![matrix_pair(&from, &to)] };
    }

    let mut ops = Vec::with_capacity(from.len());
    for (l, r) in from.ops().iter().zip(to.ops()) {
        let matrix_family = (l.kind.is_matrix() && r.kind.is_matrix())
            || (l.kind == Kind::Perspective && r.kind == Kind::Perspective);
        if matrix_family {
            // matrix-like pairs always resolve through the fallback, even
            // when ranks differ within the family
            ops.push(matrix_pair(
                &TransformList::new(vec![l.clone()]),
                &TransformList::new(vec![r.clone()]),
            ));
            continue;
        }

        match pair_operations(l, r) {
            Some(op) => ops.push(op),
            // Escalation is list-scoped: one incompatible position resolves
            // the whole pair of lists as matrices, never a hybrid.
            None => return MergePlan { ops: vec![matrix_pair(&from, &to)] },
        }
    }

    MergePlan { ops }
}

/// Pair two operations at the same list position. `None` means the pair (and
/// therefore the whole list) is incompatible.
fn pair_operations(l: &Operation, r: &Operation) -> Option<PlanOp> {
    let (kind, left_args, right_args) = align_kinds(l, r)?;

    let mut args = Vec::with_capacity(left_args.len());
    for (a, b) in left_args.iter().zip(right_args.iter()) {
        let tween = match (a, b) {
            (Arg::Number(x), Arg::Number(y)) => ArgTween::Number(merge_numbers(*x, *y)),
            (Arg::Dim(x), Arg::Dim(y)) => ArgTween::Dim(merge_dims(*x, *y)?),
            // a number paired against a dimension has no common scale
            _ => return None,
        };
        args.push(tween);
    }
    Some(PlanOp::Tween { kind, args })
}

/// Resolve a common kind for two operations: identical kinds pair directly,
/// otherwise try the shared 2D reduction, then the shared 3D extension.
fn align_kinds(l: &Operation, r: &Operation) -> Option<(Kind, Vec<Arg>, Vec<Arg>)> {
    if l.kind == r.kind {
        return Some((l.kind, l.args.clone(), r.args.clone()));
    }
    if let (Some((lk, la)), Some((rk, ra))) = (l.kind.to_2d(&l.args), r.kind.to_2d(&r.args)) {
        if lk == rk {
            return Some((lk, la, ra));
        }
    }
    if let (Some((lk, la)), Some((rk, ra))) = (l.kind.to_3d(&l.args), r.kind.to_3d(&r.args)) {
        if lk == rk {
            return Some((lk, la, ra));
        }
    }
    None
}

/// Resolve two lists through the matrix fallback engine. When either side
/// has no valid decomposition the result is a discrete midpoint switch
/// between the serialized endpoints.
fn matrix_pair(from: &TransformList, to: &TransformList) -> PlanOp {
    match (decompose_list(from), decompose_list(to)) {
        (Some(f), Some(t)) => PlanOp::Matrix { from: f, to: t },
        _ => PlanOp::Discrete { from: from.to_string(), to: to.to_string() },
    }
}

/// Build the identity counterpart of a list: same kinds, same argument
/// shapes, neutral values (scale factors 1, everything else 0).
fn neutral_counterpart(list: &TransformList) -> TransformList {
    let ops = list
        .ops()
        .iter()
        .map(|op| {
            let neutral = op.kind.neutral_value();
            let args = op
                .args
                .iter()
                .map(|arg| match arg {
                    Arg::Number(_) => Arg::Number(neutral),
                    Arg::Dim(d) => Arg::Dim(Dim::new(neutral, d.unit)),
                })
                .collect();
            Operation::new(op.kind, args)
        })
        .collect();
    TransformList::new(ops)
}
