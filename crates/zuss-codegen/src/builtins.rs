//! Standard host functions: color helpers and unit conversion.

use zuss_ast::{Color, Value};

use crate::resolver::{HostError, MapResolver, NativeFunction};

/// A resolver preloaded with `rgb`, `lighten`, `darken`, `mix` and `percentage`.
pub fn builtins() -> MapResolver {
    MapResolver::new()
        .with_function(NativeFunction::new("rgb", 3, rgb))
        .with_function(NativeFunction::new("lighten", 2, lighten))
        .with_function(NativeFunction::new("darken", 2, darken))
        .with_function(NativeFunction::new("mix", 2, mix))
        .with_function(NativeFunction::new("percentage", 1, percentage))
}

fn rgb(args: &[Option<Value>]) -> Result<Option<Value>, HostError> {
    let r = number(arg(args, 0), "red")?;
    let g = number(arg(args, 1), "green")?;
    let b = number(arg(args, 2), "blue")?;
    Ok(Some(Value::Color(Color::from_channels(r, g, b))))
}

fn lighten(args: &[Option<Value>]) -> Result<Option<Value>, HostError> {
    let color = color(arg(args, 0))?;
    let amount = fraction(arg(args, 1))?;
    let [r, g, b] = color.channels().map(|c| c + (255.0 - c) * amount);
    Ok(Some(Value::Color(Color::from_channels(r, g, b))))
}

fn darken(args: &[Option<Value>]) -> Result<Option<Value>, HostError> {
    let color = color(arg(args, 0))?;
    let amount = fraction(arg(args, 1))?;
    let [r, g, b] = color.channels().map(|c| c * (1.0 - amount));
    Ok(Some(Value::Color(Color::from_channels(r, g, b))))
}

fn mix(args: &[Option<Value>]) -> Result<Option<Value>, HostError> {
    let a = color(arg(args, 0))?.channels();
    let b = color(arg(args, 1))?.channels();
    Ok(Some(Value::Color(Color::from_channels(
        (a[0] + b[0]) / 2.0,
        (a[1] + b[1]) / 2.0,
        (a[2] + b[2]) / 2.0,
    ))))
}

fn percentage(args: &[Option<Value>]) -> Result<Option<Value>, HostError> {
    let n = number(arg(args, 0), "value")?;
    Ok(Some(Value::dimension(n * 100.0, "%")))
}

fn arg(args: &[Option<Value>], i: usize) -> Option<&Value> {
    args.get(i).and_then(Option::as_ref)
}

fn number(arg: Option<&Value>, what: &str) -> Result<f64, HostError> {
    match arg {
        Some(Value::Number(n)) => Ok(*n),
        Some(other) => Err(format!("expected a number for {what}, got {other}").into()),
        None => Err(format!("missing {what}").into()),
    }
}

fn color(arg: Option<&Value>) -> Result<Color, HostError> {
    match arg {
        Some(Value::Color(c)) => Ok(*c),
        Some(Value::Ident(s)) => {
            Color::parse_hex(s).ok_or_else(|| format!("expected a color, got {s}").into())
        }
        Some(other) => Err(format!("expected a color, got {other}").into()),
        None => Err("missing color".into()),
    }
}

/// `10%` and `0.1` both mean one tenth.
fn fraction(arg: Option<&Value>) -> Result<f64, HostError> {
    let amount = match arg {
        Some(Value::Dimension { value, unit }) if unit == "%" => *value / 100.0,
        Some(Value::Number(n)) => *n,
        Some(other) => return Err(format!("expected an amount, got {other}").into()),
        None => return Err("missing amount".into()),
    };
    Ok(amount.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{HostFunction, Resolver};
    use pretty_assertions::assert_eq;

    fn call(name: &str, args: &[Option<Value>]) -> Result<Option<Value>, HostError> {
        let resolver = builtins();
        let func = resolver.function(name).unwrap();
        let mut args = args.to_vec();
        args.resize(func.arity().max(args.len()), None);
        func.call(&args)
    }

    fn color_value(r: u8, g: u8, b: u8) -> Option<Value> {
        Some(Value::Color(Color::new(r, g, b)))
    }

    #[test]
    fn test_rgb() {
        let args = [
            Some(Value::number(255.0)),
            Some(Value::number(128.0)),
            Some(Value::number(0.0)),
        ];
        assert_eq!(call("rgb", &args).unwrap(), color_value(255, 128, 0));
    }

    #[test]
    fn test_lighten_by_percent() {
        let args = [color_value(0, 100, 200), Some(Value::dimension(50.0, "%"))];
        assert_eq!(call("lighten", &args).unwrap(), color_value(128, 178, 228));
    }

    #[test]
    fn test_darken_by_fraction() {
        let args = [color_value(200, 100, 50), Some(Value::number(0.5))];
        assert_eq!(call("darken", &args).unwrap(), color_value(100, 50, 25));
    }

    #[test]
    fn test_darken_accepts_hex_ident() {
        let args = [Some(Value::ident("#ffffff")), Some(Value::number(1.0))];
        assert_eq!(call("darken", &args).unwrap(), color_value(0, 0, 0));
    }

    #[test]
    fn test_mix() {
        let args = [color_value(0, 0, 0), color_value(255, 255, 255)];
        assert_eq!(call("mix", &args).unwrap(), color_value(128, 128, 128));
    }

    #[test]
    fn test_percentage() {
        let args = [Some(Value::number(0.25))];
        assert_eq!(
            call("percentage", &args).unwrap(),
            Some(Value::dimension(25.0, "%"))
        );
    }

    #[test]
    fn test_missing_argument_is_an_error() {
        let err = call("lighten", &[color_value(0, 0, 0)]).unwrap_err();
        assert_eq!(err.to_string(), "missing amount");
    }

    #[test]
    fn test_wrong_kind_is_an_error() {
        let err = call("rgb", &[Some(Value::ident("red"))]).unwrap_err();
        assert_eq!(err.to_string(), "expected a number for red, got red");
    }
}
