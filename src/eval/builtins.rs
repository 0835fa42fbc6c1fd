//! Default functions installed by [Registry::default](super::Registry).

use super::Value;
use crate::common::Float;
use crate::error::Result;
use std::f64::consts::E;

fn float(x: Value, f: impl Fn(Float) -> Float) -> Result<Value> {
    Ok(Value::Float(f(x.as_float())))
}

pub(crate) fn sin(x: Value) -> Result<Value> {
    float(x, Float::sin)
}

pub(crate) fn cos(x: Value) -> Result<Value> {
    float(x, Float::cos)
}

pub(crate) fn tan(x: Value) -> Result<Value> {
    float(x, Float::tan)
}

pub(crate) fn exp(x: Value) -> Result<Value> {
    float(x, Float::exp)
}

pub(crate) fn hypot(x: Value, y: Value) -> Result<Value> {
    Ok(Value::Float(x.as_float().hypot(y.as_float())))
}

pub(crate) fn abs(x: Value) -> Result<Value> {
    Ok(x.abs())
}

pub(crate) fn trunc(x: Value) -> Result<Value> {
    x.trunc()
}

pub(crate) fn round(x: Value) -> Result<Value> {
    x.round()
}

/// A step function: -1 below `-E`, 1 above `E`, 0 in between.
pub(crate) fn sgn(x: Value) -> Result<Value> {
    let x = x.as_float();
    Ok(Value::Int(if x < -E {
        -1
    } else if x > E {
        1
    } else {
        0
    }))
}

pub(crate) fn multiply(x: Value, y: Value) -> Result<Value> {
    Ok(x.mul(y))
}

pub(crate) fn sum(args: &[Value]) -> Result<Value> {
    Ok(args.iter().fold(Value::ZERO, |acc, &x| acc.add(x)))
}

pub(crate) fn all(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(args.iter().all(|x| x.truthy())))
}

pub(crate) fn any(args: &[Value]) -> Result<Value> {
    Ok(Value::Bool(args.iter().any(|x| x.truthy())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_trig() {
        assert_eq!(sin(Value::Int(0)), Ok(Value::Float(0.0)));
        assert_eq!(cos(Value::Int(0)), Ok(Value::Float(1.0)));
        assert_eq!(exp(Value::Int(0)), Ok(Value::Float(1.0)));
        assert_eq!(hypot(Value::Int(3), Value::Int(4)), Ok(Value::Float(5.0)));
    }

    #[test]
    fn test_integer_results() {
        assert_eq!(abs(Value::Int(-3)), Ok(Value::Int(3)));
        assert_eq!(abs(Value::Float(-3.5)), Ok(Value::Float(3.5)));
        assert_eq!(trunc(Value::Float(-3.7)), Ok(Value::Int(-3)));
        assert_eq!(round(Value::Float(1.523)), Ok(Value::Int(2)));
        assert_eq!(round(Value::Float(-0.5)), Ok(Value::Int(0)));
        assert_eq!(round(Value::Float(-1.5)), Ok(Value::Int(-2)));
        assert!(matches!(trunc(Value::Float(Float::NAN)), Err(Error::Domain(_))));
    }

    #[test]
    fn test_sgn() {
        assert_eq!(sgn(Value::Int(-3)), Ok(Value::Int(-1)));
        assert_eq!(sgn(Value::Int(-2)), Ok(Value::Int(0)));
        assert_eq!(sgn(Value::Float(2.7)), Ok(Value::Int(0)));
        assert_eq!(sgn(Value::Int(3)), Ok(Value::Int(1)));
    }

    #[test]
    fn test_variadic() {
        assert_eq!(sum(&[Value::Int(1), Value::Int(2)]), Ok(Value::Int(3)));
        assert_eq!(sum(&[Value::Int(1), Value::Float(0.5)]), Ok(Value::Float(1.5)));
        assert_eq!(any(&[Value::Int(0), Value::Int(0), Value::Int(1)]), Ok(Value::Bool(true)));
        assert_eq!(all(&[Value::Int(1), Value::Float(0.0)]), Ok(Value::Bool(false)));
        assert_eq!(multiply(Value::Int(6), Value::Int(7)), Ok(Value::Int(42)));
    }
}
