//! Core transform types and error definitions
//!
//! Contains the closed `Kind` enum covering every supported transform
//! function together with its argument signature and 2D/3D coercions, the
//! `Operation`/`TransformList` data model produced by the parser, and
//! `ParseError` for parse failures.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dimension::{Arg, Dim};

/// Errors that can occur while parsing a transform list.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Unknown transform function name
    #[error("unknown transform function: {0}")]
    UnknownFunction(String),

    /// More arguments supplied than the function accepts
    #[error("too many arguments for {func}(): expected at most {max}, got {got}")]
    TooManyArguments { func: String, max: usize, got: usize },

    /// A required argument was omitted
    #[error("missing required argument {index} for {func}()")]
    MissingArgument { func: String, index: usize },

    /// An argument failed to parse for its expected type
    #[error("invalid argument for {func}(): '{arg}'")]
    InvalidArgument { func: String, arg: String },

    /// Malformed source: gaps, trailing garbage, unmatched parentheses
    #[error("transform syntax error: {0}")]
    Syntax(String),
}

/// Argument type code of a transform function parameter.
///
/// Signatures are spelled as per-character codes; a lowercase code marks the
/// parameter as optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    /// Angle (degrees)
    Angle,
    /// Bare number
    Number,
    /// Length or percentage
    LengthOrPercent,
    /// Length only
    Length,
}

impl ArgType {
    /// Decode a signature character into its type, ignoring case.
    pub fn from_code(c: char) -> Option<ArgType> {
        match c.to_ascii_uppercase() {
            'A' => Some(ArgType::Angle),
            'N' => Some(ArgType::Number),
            'T' => Some(ArgType::LengthOrPercent),
            'L' => Some(ArgType::Length),
            _ => None,
        }
    }
}

/// Every transform function the grammar accepts, as a closed enum.
///
/// Replaces a string-keyed dispatch table: the argument signature and the
/// 2D/3D coercions are selected by pattern match on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Matrix,
    Matrix3d,
    Rotate,
    RotateX,
    RotateY,
    RotateZ,
    Rotate3d,
    Perspective,
    Scale,
    ScaleX,
    ScaleY,
    ScaleZ,
    Scale3d,
    Skew,
    SkewX,
    SkewY,
    Translate,
    TranslateX,
    TranslateY,
    TranslateZ,
    Translate3d,
}

impl Kind {
    /// Look up a (lowercased) function name.
    pub fn from_name(name: &str) -> Option<Kind> {
        match name {
            "matrix" => Some(Kind::Matrix),
            "matrix3d" => Some(Kind::Matrix3d),
            "rotate" => Some(Kind::Rotate),
            "rotatex" => Some(Kind::RotateX),
            "rotatey" => Some(Kind::RotateY),
            "rotatez" => Some(Kind::RotateZ),
            "rotate3d" => Some(Kind::Rotate3d),
            "perspective" => Some(Kind::Perspective),
            "scale" => Some(Kind::Scale),
            "scalex" => Some(Kind::ScaleX),
            "scaley" => Some(Kind::ScaleY),
            "scalez" => Some(Kind::ScaleZ),
            "scale3d" => Some(Kind::Scale3d),
            "skew" => Some(Kind::Skew),
            "skewx" => Some(Kind::SkewX),
            "skewy" => Some(Kind::SkewY),
            "translate" => Some(Kind::Translate),
            "translatex" => Some(Kind::TranslateX),
            "translatey" => Some(Kind::TranslateY),
            "translatez" => Some(Kind::TranslateZ),
            "translate3d" => Some(Kind::Translate3d),
            _ => None,
        }
    }

    /// Serialized function name (always lowercase).
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Matrix => "matrix",
            Kind::Matrix3d => "matrix3d",
            Kind::Rotate => "rotate",
            Kind::RotateX => "rotatex",
            Kind::RotateY => "rotatey",
            Kind::RotateZ => "rotatez",
            Kind::Rotate3d => "rotate3d",
            Kind::Perspective => "perspective",
            Kind::Scale => "scale",
            Kind::ScaleX => "scalex",
            Kind::ScaleY => "scaley",
            Kind::ScaleZ => "scalez",
            Kind::Scale3d => "scale3d",
            Kind::Skew => "skew",
            Kind::SkewX => "skewx",
            Kind::SkewY => "skewy",
            Kind::Translate => "translate",
            Kind::TranslateX => "translatex",
            Kind::TranslateY => "translatey",
            Kind::TranslateZ => "translatez",
            Kind::Translate3d => "translate3d",
        }
    }

    /// Argument signature: one type code per parameter, lowercase = optional.
    pub fn signature(&self) -> &'static str {
        match self {
            Kind::Matrix => "NNNNNN",
            Kind::Matrix3d => "NNNNNNNNNNNNNNNN",
            Kind::Rotate | Kind::RotateX | Kind::RotateY | Kind::RotateZ => "A",
            Kind::Rotate3d => "NNNA",
            Kind::Perspective => "L",
            Kind::Scale => "Nn",
            Kind::ScaleX | Kind::ScaleY | Kind::ScaleZ => "N",
            Kind::Scale3d => "NNN",
            Kind::Skew => "Aa",
            Kind::SkewX | Kind::SkewY => "A",
            Kind::Translate => "Tt",
            Kind::TranslateX | Kind::TranslateY => "T",
            Kind::TranslateZ => "L",
            Kind::Translate3d => "TTL",
        }
    }

    /// Coerce this operation's arguments to the shared 2D form, if one exists.
    ///
    /// Returns the 2D kind and the reshaped arguments. `None` for functions
    /// with no 2D reduction (the rotate family, 3D-only functions,
    /// perspective).
    pub fn to_2d(&self, args: &[Arg]) -> Option<(Kind, Vec<Arg>)> {
        let n = |x: f64| Arg::Number(x);
        let zero_deg = Arg::Dim(Dim::zero_deg());
        let zero_px = Arg::Dim(Dim::zero_px());
        match self {
            Kind::Matrix => Some((Kind::Matrix, args.to_vec())),
            Kind::Scale => Some((Kind::Scale, args.to_vec())),
            Kind::ScaleX => Some((Kind::Scale, vec![args[0], n(1.0)])),
            Kind::ScaleY => Some((Kind::Scale, vec![n(1.0), args[0]])),
            Kind::Skew => Some((Kind::Skew, args.to_vec())),
            Kind::SkewX => Some((Kind::Skew, vec![args[0], zero_deg])),
            Kind::SkewY => Some((Kind::Skew, vec![zero_deg, args[0]])),
            Kind::Translate => Some((Kind::Translate, args.to_vec())),
            Kind::TranslateX => Some((Kind::Translate, vec![args[0], zero_px])),
            Kind::TranslateY => Some((Kind::Translate, vec![zero_px, args[0]])),
            _ => None,
        }
    }

    /// Coerce this operation's arguments to the shared 3D form, if one exists.
    ///
    /// `None` for functions with no 3D extension (the rotate and skew
    /// families, perspective).
    pub fn to_3d(&self, args: &[Arg]) -> Option<(Kind, Vec<Arg>)> {
        let n = |x: f64| Arg::Number(x);
        let zero_px = Arg::Dim(Dim::zero_px());
        match self {
            Kind::Matrix => {
                // 2D affine [a b c d e f] lifted to the full 16-component form
                let (a, b, c, d, e, f) = (args[0], args[1], args[2], args[3], args[4], args[5]);
                Some((
                    Kind::Matrix3d,
                    vec![
                        a,
                        b,
                        n(0.0),
                        n(0.0),
                        c,
                        d,
                        n(0.0),
                        n(0.0),
                        n(0.0),
                        n(0.0),
                        n(1.0),
                        n(0.0),
                        e,
                        f,
                        n(0.0),
                        n(1.0),
                    ],
                ))
            }
            Kind::Matrix3d => Some((Kind::Matrix3d, args.to_vec())),
            Kind::Scale => Some((Kind::Scale3d, vec![args[0], args[1], n(1.0)])),
            Kind::ScaleX => Some((Kind::Scale3d, vec![args[0], n(1.0), n(1.0)])),
            Kind::ScaleY => Some((Kind::Scale3d, vec![n(1.0), args[0], n(1.0)])),
            Kind::ScaleZ => Some((Kind::Scale3d, vec![n(1.0), n(1.0), args[0]])),
            Kind::Scale3d => Some((Kind::Scale3d, args.to_vec())),
            Kind::Translate => Some((Kind::Translate3d, vec![args[0], args[1], zero_px])),
            Kind::TranslateX => Some((Kind::Translate3d, vec![args[0], zero_px, zero_px])),
            Kind::TranslateY => Some((Kind::Translate3d, vec![zero_px, args[0], zero_px])),
            Kind::TranslateZ => Some((Kind::Translate3d, vec![zero_px, zero_px, args[0]])),
            Kind::Translate3d => Some((Kind::Translate3d, args.to_vec())),
            _ => None,
        }
    }

    /// Matrix-family functions always pair through the matrix fallback, even
    /// across 2D/3D rank.
    pub fn is_matrix(&self) -> bool {
        matches!(self, Kind::Matrix | Kind::Matrix3d)
    }

    /// Neutral argument value when synthesizing the identity counterpart of
    /// an operation: scale factors default to 1, everything else to 0.
    pub fn neutral_value(&self) -> f64 {
        match self {
            Kind::Scale | Kind::ScaleX | Kind::ScaleY | Kind::ScaleZ | Kind::Scale3d => 1.0,
            _ => 0.0,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single parsed transform operation. Immutable once created.
///
/// Holds exactly one argument per position of the kind's signature; the
/// parser fills omitted optional arguments before an operation is built, so
/// downstream code can index arguments by position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOperation")]
pub struct Operation {
    pub(crate) kind: Kind,
    pub(crate) args: Vec<Arg>,
}

impl Operation {
    /// Build an operation, checking the argument count against the kind's
    /// signature. Fails rather than producing a list that panics downstream.
    pub fn checked(kind: Kind, args: Vec<Arg>) -> Result<Self, ParseError> {
        let want = kind.signature().len();
        if args.len() > want {
            return Err(ParseError::TooManyArguments {
                func: kind.name().to_string(),
                max: want,
                got: args.len(),
            });
        }
        if args.len() < want {
            return Err(ParseError::MissingArgument {
                func: kind.name().to_string(),
                index: args.len(),
            });
        }
        Ok(Self { kind, args })
    }

    pub(crate) fn new(kind: Kind, args: Vec<Arg>) -> Self {
        debug_assert_eq!(args.len(), kind.signature().len());
        Self { kind, args }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }
}

#[derive(Deserialize)]
struct RawOperation {
    kind: Kind,
    args: Vec<Arg>,
}

impl TryFrom<RawOperation> for Operation {
    type Error = ParseError;

    fn try_from(raw: RawOperation) -> Result<Self, ParseError> {
        Operation::checked(raw.kind, raw.args)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let args: Vec<String> = self.args.iter().map(|a| a.to_string()).collect();
        write!(f, "{}({})", self.kind, args.join(","))
    }
}

/// An ordered sequence of transform operations.
///
/// Order is significant (transform composition is order-dependent) and is
/// never changed after parsing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformList(pub(crate) Vec<Operation>);

impl TransformList {
    pub fn new(ops: Vec<Operation>) -> Self {
        Self(ops)
    }

    pub fn ops(&self) -> &[Operation] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TransformList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("none");
        }
        let ops: Vec<String> = self.0.iter().map(|op| op.to_string()).collect();
        f.write_str(&ops.join(" "))
    }
}

impl FromStr for TransformList {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        super::parsing::parse_transform_list(s)
    }
}
