//! Operator semantics.
//!
//! Operands arrive in push order. `None` operands are absent values:
//! arithmetic over them stays absent, concatenation skips them, and logic
//! treats them as false.

use zuss_ast::{Color, Operator, Value};

use crate::{Result, TranslateError};

/// Apply `op` to `args` (exactly `op.arity()` operands).
pub fn apply(op: Operator, args: Vec<Option<Value>>, line: usize) -> Result<Option<Value>> {
    let invalid = || TranslateError::InvalidOperands { op, line };
    let mut args = args.into_iter();
    let first = args.next().ok_or_else(invalid)?;

    if op.arity() == 1 {
        return match op {
            Operator::Not => Ok(Some(Value::Bool(!truthy(&first)))),
            Operator::Neg => match first {
                None => Ok(None),
                Some(Value::Number(n)) => Ok(Some(Value::Number(-n))),
                Some(Value::Dimension { value, unit }) => {
                    Ok(Some(Value::Dimension { value: -value, unit }))
                }
                Some(_) => Err(invalid()),
            },
            _ => Err(invalid()),
        };
    }

    let second = args.next().ok_or_else(invalid)?;
    match op {
        Operator::Concat => Ok(Some(Value::Str(format!(
            "{}{}",
            plain(&first),
            plain(&second)
        )))),
        Operator::Eq => Ok(Some(Value::Bool(first == second))),
        Operator::Ne => Ok(Some(Value::Bool(first != second))),
        Operator::And => Ok(Some(Value::Bool(truthy(&first) && truthy(&second)))),
        Operator::Or => Ok(Some(Value::Bool(truthy(&first) || truthy(&second)))),
        Operator::Lt | Operator::Gt | Operator::Le | Operator::Ge => {
            compare(op, first.as_ref(), second.as_ref()).ok_or_else(invalid)
        }
        Operator::Add | Operator::Sub | Operator::Mul | Operator::Div | Operator::Mod => {
            match (first, second) {
                (None, _) | (_, None) => Ok(None),
                (Some(a), Some(b)) => arithmetic(op, a, b).map(Some).ok_or_else(invalid),
            }
        }
        Operator::Neg | Operator::Not => Err(invalid()),
    }
}

fn truthy(value: &Option<Value>) -> bool {
    value.as_ref().is_some_and(Value::is_truthy)
}

fn plain(value: &Option<Value>) -> String {
    value.as_ref().map(Value::to_plain_string).unwrap_or_default()
}

fn compare(op: Operator, a: Option<&Value>, b: Option<&Value>) -> Option<Option<Value>> {
    let (x, unit_a) = a?.as_numeric()?;
    let (y, unit_b) = b?.as_numeric()?;
    if !unit_a.is_empty() && !unit_b.is_empty() && unit_a != unit_b {
        return None;
    }
    let result = match op {
        Operator::Lt => x < y,
        Operator::Gt => x > y,
        Operator::Le => x <= y,
        Operator::Ge => x >= y,
        _ => return None,
    };
    Some(Some(Value::Bool(result)))
}

fn arithmetic(op: Operator, a: Value, b: Value) -> Option<Value> {
    if op == Operator::Add && (matches!(a, Value::Str(_)) || matches!(b, Value::Str(_))) {
        return Some(Value::Str(a.to_plain_string() + &b.to_plain_string()));
    }

    match (&a, &b) {
        (Value::Color(x), Value::Color(y)) => color_op(op, x.channels(), y.channels()),
        (Value::Color(x), other) => {
            let (n, _) = other.as_numeric()?;
            color_op(op, x.channels(), [n; 3])
        }
        _ => {
            let (x, unit_a) = a.as_numeric()?;
            let (y, unit_b) = b.as_numeric()?;
            let unit = if unit_a.is_empty() { unit_b } else { unit_a };
            let n = number_op(op, x, y)?;
            Some(if unit.is_empty() {
                Value::Number(n)
            } else {
                Value::dimension(n, unit)
            })
        }
    }
}

fn number_op(op: Operator, x: f64, y: f64) -> Option<f64> {
    match op {
        Operator::Add => Some(x + y),
        Operator::Sub => Some(x - y),
        Operator::Mul => Some(x * y),
        Operator::Div if y != 0.0 => Some(x / y),
        Operator::Mod if y != 0.0 => Some(x % y),
        _ => None,
    }
}

fn color_op(op: Operator, x: [f64; 3], y: [f64; 3]) -> Option<Value> {
    let r = number_op(op, x[0], y[0])?;
    let g = number_op(op, x[1], y[1])?;
    let b = number_op(op, x[2], y[2])?;
    Some(Value::Color(Color::from_channels(r, g, b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(op: Operator, args: Vec<Option<Value>>) -> Option<Value> {
        apply(op, args, 1).unwrap()
    }

    fn px(n: f64) -> Option<Value> {
        Some(Value::dimension(n, "px"))
    }

    #[test]
    fn test_add_dimensions() {
        assert_eq!(run(Operator::Add, vec![px(10.0), px(5.0)]), px(15.0));
    }

    #[test]
    fn test_unit_taken_from_either_side() {
        assert_eq!(
            run(Operator::Mul, vec![Some(Value::number(2.0)), px(4.0)]),
            px(8.0)
        );
        assert_eq!(
            run(Operator::Div, vec![px(9.0), Some(Value::number(3.0))]),
            px(3.0)
        );
    }

    #[test]
    fn test_sub_is_ordered() {
        assert_eq!(run(Operator::Sub, vec![px(10.0), px(3.0)]), px(7.0));
    }

    #[test]
    fn test_neg() {
        assert_eq!(run(Operator::Neg, vec![px(2.0)]), px(-2.0));
        assert_eq!(run(Operator::Neg, vec![None]), None);
    }

    #[test]
    fn test_arithmetic_with_absent_operand() {
        assert_eq!(run(Operator::Add, vec![None, px(1.0)]), None);
    }

    #[test]
    fn test_string_add_concatenates() {
        assert_eq!(
            run(
                Operator::Add,
                vec![Some(Value::str("a")), Some(Value::number(1.0))]
            ),
            Some(Value::str("a1"))
        );
    }

    #[test]
    fn test_concat_skips_absent() {
        assert_eq!(
            run(Operator::Concat, vec![Some(Value::ident("url")), None]),
            Some(Value::str("url"))
        );
    }

    #[test]
    fn test_color_arithmetic_clamps() {
        let c = Some(Value::Color(Color::new(200, 10, 0)));
        assert_eq!(
            run(Operator::Add, vec![c, Some(Value::number(100.0))]),
            Some(Value::Color(Color::new(255, 110, 100)))
        );
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(
            run(Operator::Lt, vec![px(1.0), px(2.0)]),
            Some(Value::Bool(true))
        );
        assert_eq!(
            run(Operator::Ge, vec![px(1.0), px(2.0)]),
            Some(Value::Bool(false))
        );
        assert_eq!(run(Operator::Eq, vec![None, None]), Some(Value::Bool(true)));
        assert_eq!(
            run(Operator::Ne, vec![px(1.0), Some(Value::number(1.0))]),
            Some(Value::Bool(true))
        );
    }

    #[test]
    fn test_logic_treats_absent_as_false() {
        assert_eq!(
            run(Operator::Or, vec![None, Some(Value::Bool(true))]),
            Some(Value::Bool(true))
        );
        assert_eq!(run(Operator::Not, vec![None]), Some(Value::Bool(true)));
    }

    #[test]
    fn test_division_by_zero_is_invalid() {
        let err = apply(Operator::Div, vec![px(1.0), Some(Value::number(0.0))], 7).unwrap_err();
        assert!(matches!(
            err,
            TranslateError::InvalidOperands {
                op: Operator::Div,
                line: 7
            }
        ));
    }

    #[test]
    fn test_mismatched_units_do_not_compare() {
        let args = vec![px(1.0), Some(Value::dimension(1.0, "em"))];
        assert!(apply(Operator::Lt, args, 3).is_err());
    }

    #[test]
    fn test_ident_arithmetic_is_invalid() {
        let args = vec![Some(Value::ident("auto")), px(1.0)];
        assert!(apply(Operator::Sub, args, 3).is_err());
    }
}
