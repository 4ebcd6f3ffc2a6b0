//! Transform list parsing
//!
//! Converts a transform declaration such as
//! `translate(10px, 5px) rotate(90deg) scale(2)` into an ordered
//! [`TransformList`], or fails the whole parse. There are no partial results:
//! a single bad function name, extra argument or stray character rejects the
//! entire string.

use crate::dimension::{parse_angle, parse_length, parse_length_or_percent, parse_number, Arg, Dim};

use super::types::{ArgType, Kind, Operation, ParseError, TransformList};

/// Parse a transform list string.
///
/// The source is trimmed and lowercased first. The literal `"none"` parses to
/// an empty (valid) list. Each `name(args)` match must begin exactly where
/// the previous one ended, allowing only whitespace between functions; any
/// gap or trailing garbage is a syntax error, and end-of-input must coincide
/// with the final `)`.
pub fn parse_transform_list(source: &str) -> Result<TransformList, ParseError> {
    let source = source.trim().to_lowercase();
    if source == "none" {
        return Ok(TransformList::default());
    }
    if source.is_empty() {
        return Err(ParseError::Syntax("empty transform".to_string()));
    }

    let chars: Vec<char> = source.chars().collect();
    let mut pos = 0;
    let mut ops = Vec::new();

    while pos < chars.len() {
        // Whitespace is permitted between functions
        while pos < chars.len() && chars[pos].is_whitespace() {
            pos += 1;
        }
        if pos >= chars.len() {
            break;
        }

        // Function name, immediately followed by '('
        let name_start = pos;
        while pos < chars.len() && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_') {
            pos += 1;
        }
        if pos == name_start {
            return Err(ParseError::Syntax(format!(
                "unexpected character '{}' at offset {}",
                chars[pos], pos
            )));
        }
        let name: String = chars[name_start..pos].iter().collect();
        if pos >= chars.len() || chars[pos] != '(' {
            return Err(ParseError::Syntax(format!("expected '(' after '{}'", name)));
        }
        pos += 1;

        // Argument text runs to the next ')'; the grammar has no nesting
        let args_start = pos;
        while pos < chars.len() && chars[pos] != ')' {
            pos += 1;
        }
        if pos >= chars.len() {
            return Err(ParseError::Syntax(format!("unmatched '(' in '{}'", name)));
        }
        let args_src: String = chars[args_start..pos].iter().collect();
        pos += 1;

        ops.push(parse_operation(&name, &args_src)?);
    }

    Ok(TransformList::new(ops))
}

/// Parse one `name(args)` occurrence into a typed operation.
fn parse_operation(name: &str, args_src: &str) -> Result<Operation, ParseError> {
    let kind =
        Kind::from_name(name).ok_or_else(|| ParseError::UnknownFunction(name.to_string()))?;
    let signature = kind.signature();

    // split keeps empty pieces: "2," yields ["2", ""] and the empty piece
    // takes the default for its parameter
    let supplied: Vec<&str> = args_src.split(',').collect();
    if supplied.len() > signature.len() {
        return Err(ParseError::TooManyArguments {
            func: name.to_string(),
            max: signature.len(),
            got: supplied.len(),
        });
    }

    let mut args: Vec<Arg> = Vec::with_capacity(signature.len());
    for (index, code) in signature.chars().enumerate() {
        let raw = supplied.get(index).map(|s| s.trim()).filter(|s| !s.is_empty());
        let arg = match raw {
            Some(raw) => {
                let ty = ArgType::from_code(code).ok_or_else(|| {
                    ParseError::Syntax(format!("bad signature code '{}' for {}", code, name))
                })?;
                parse_arg(raw, ty).ok_or_else(|| ParseError::InvalidArgument {
                    func: name.to_string(),
                    arg: raw.to_string(),
                })?
            }
            // Omitted arguments default per type, but only optional
            // (lowercase) parameters may be omitted. A missing numeric
            // argument broadcasts the first parsed argument of the same
            // operation: scale(2,) means scale(2,2).
            None => match code {
                'a' => Arg::Dim(Dim::zero_deg()),
                't' => Arg::Dim(Dim::zero_px()),
                'n' => *args.first().ok_or_else(|| ParseError::MissingArgument {
                    func: name.to_string(),
                    index,
                })?,
                _ => {
                    return Err(ParseError::MissingArgument { func: name.to_string(), index });
                }
            },
        };
        args.push(arg);
    }

    Ok(Operation::new(kind, args))
}

fn parse_arg(raw: &str, ty: ArgType) -> Option<Arg> {
    match ty {
        ArgType::Angle => parse_angle(raw).map(Arg::Dim),
        ArgType::Number => parse_number(raw).map(Arg::Number),
        ArgType::LengthOrPercent => parse_length_or_percent(raw).map(Arg::Dim),
        ArgType::Length => parse_length(raw).map(Arg::Dim),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::Unit;

    fn parse(s: &str) -> TransformList {
        parse_transform_list(s).unwrap()
    }

    #[test]
    fn test_parse_none() {
        assert!(parse("none").is_empty());
        assert!(parse("  NONE  ").is_empty());
    }

    #[test]
    fn test_parse_empty_is_error() {
        assert!(matches!(parse_transform_list(""), Err(ParseError::Syntax(_))));
        assert!(matches!(parse_transform_list("   "), Err(ParseError::Syntax(_))));
    }

    #[test]
    fn test_parse_single_function() {
        let list = parse("rotate(45deg)");
        assert_eq!(list.len(), 1);
        assert_eq!(list.ops()[0].kind, Kind::Rotate);
        assert_eq!(list.ops()[0].args, vec![Arg::Dim(Dim::new(45.0, Unit::Deg))]);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        let list = parse("TranslateX(10PX) ROTATE(90deg)");
        assert_eq!(list.ops()[0].kind, Kind::TranslateX);
        assert_eq!(list.ops()[1].kind, Kind::Rotate);
    }

    #[test]
    fn test_parse_multiple_functions() {
        let list = parse("translate(10px, 5px) rotate(90deg) scale(2)");
        assert_eq!(list.len(), 3);
        assert_eq!(list.ops()[0].kind, Kind::Translate);
        assert_eq!(list.ops()[1].kind, Kind::Rotate);
        assert_eq!(list.ops()[2].kind, Kind::Scale);
    }

    #[test]
    fn test_scale_broadcasts_single_value() {
        // scale(2) repeats the first argument for the omitted second
        let list = parse("scale(2)");
        assert_eq!(list.ops()[0].args, vec![Arg::Number(2.0), Arg::Number(2.0)]);
    }

    #[test]
    fn test_scale_dangling_comma_broadcasts() {
        // scale(2,) also defaults the empty second argument to the first
        let list = parse("scale(2,)");
        assert_eq!(list.ops()[0].args, vec![Arg::Number(2.0), Arg::Number(2.0)]);
    }

    #[test]
    fn test_scale_two_values() {
        let list = parse("scale(2, 0.5)");
        assert_eq!(list.ops()[0].args, vec![Arg::Number(2.0), Arg::Number(0.5)]);
    }

    #[test]
    fn test_translate_defaults_second_axis_to_zero() {
        let list = parse("translate(10px)");
        assert_eq!(
            list.ops()[0].args,
            vec![Arg::Dim(Dim::new(10.0, Unit::Px)), Arg::Dim(Dim::zero_px())]
        );
    }

    #[test]
    fn test_skew_defaults_second_angle_to_zero() {
        let list = parse("skew(30deg)");
        assert_eq!(
            list.ops()[0].args,
            vec![Arg::Dim(Dim::new(30.0, Unit::Deg)), Arg::Dim(Dim::zero_deg())]
        );
    }

    #[test]
    fn test_angle_zero_literal() {
        let list = parse("rotate(0)");
        assert_eq!(list.ops()[0].args, vec![Arg::Dim(Dim::zero_deg())]);
    }

    #[test]
    fn test_translate_percent() {
        let list = parse("translate(50%, 10px)");
        assert_eq!(
            list.ops()[0].args,
            vec![Arg::Dim(Dim::new(50.0, Unit::Percent)), Arg::Dim(Dim::new(10.0, Unit::Px))]
        );
    }

    #[test]
    fn test_translatez_rejects_percent() {
        // translatez takes a plain length, not a percentage
        assert!(matches!(
            parse_transform_list("translatez(50%)"),
            Err(ParseError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_matrix3d_sixteen_components() {
        let list = parse("matrix3d(1,0,0,0,0,1,0,0,0,0,1,0,10,20,0,1)");
        assert_eq!(list.ops()[0].args.len(), 16);
    }

    #[test]
    fn test_rotate3d() {
        let list = parse("rotate3d(0, 1, 0, 90deg)");
        assert_eq!(
            list.ops()[0].args,
            vec![
                Arg::Number(0.0),
                Arg::Number(1.0),
                Arg::Number(0.0),
                Arg::Dim(Dim::new(90.0, Unit::Deg)),
            ]
        );
    }

    #[test]
    fn test_unknown_function() {
        assert!(matches!(
            parse_transform_list("spin(45deg)"),
            Err(ParseError::UnknownFunction(name)) if name == "spin"
        ));
    }

    #[test]
    fn test_too_many_arguments() {
        assert!(matches!(
            parse_transform_list("scale(1, 2, 3)"),
            Err(ParseError::TooManyArguments { max: 2, got: 3, .. })
        ));
    }

    #[test]
    fn test_missing_required_argument() {
        assert!(matches!(
            parse_transform_list("rotate()"),
            Err(ParseError::MissingArgument { index: 0, .. })
        ));
        assert!(matches!(parse_transform_list("scale()"), Err(ParseError::MissingArgument { .. })));
    }

    #[test]
    fn test_unparsable_argument_fails_whole_list() {
        assert!(parse_transform_list("rotate(45deg) scale(huge)").is_err());
    }

    #[test]
    fn test_gap_between_functions() {
        // a comma between functions is a gap the grammar does not allow
        assert!(parse_transform_list("rotate(45deg), scale(2)").is_err());
    }

    #[test]
    fn test_trailing_garbage() {
        assert!(parse_transform_list("rotate(45deg) junk").is_err());
        assert!(parse_transform_list("rotate(45deg))").is_err());
    }

    #[test]
    fn test_unmatched_paren() {
        assert!(matches!(parse_transform_list("rotate(45deg"), Err(ParseError::Syntax(_))));
    }

    #[test]
    fn test_space_before_paren_is_error() {
        assert!(parse_transform_list("rotate (45deg)").is_err());
    }

    #[test]
    fn test_display_round_trips() {
        for s in [
            "translate(10px,5px) rotate(90deg) scale(2,2)",
            "matrix(1,0,0,1,10,20)",
            "skew(30deg,0deg) perspective(500px)",
            "translate3d(1px,2px,3px) rotate3d(0,1,0,45deg)",
            "scalex(2) scaley(0.5) scalez(3)",
        ] {
            let parsed = parse(s);
            let reparsed = parse(&parsed.to_string());
            assert_eq!(parsed, reparsed, "round trip failed for {s}");
        }
    }
}
