use crate::common::*;
use crate::error::Error;
use std::cmp::Ordering;
use std::fmt;

/// The result of evaluating an expression.
///
/// Equality is structural, so `Value::Int(1) != Value::Float(1.0)`. Use the comparison
/// operators of the language for numeric equality.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Value {
    Int(Int),
    Float(Float),
    Bool(bool),
}

impl Value {
    pub(crate) const ZERO: Self = Self::Int(0);

    /// Converts literal text: integer unless it carries a decimal point or exponent.
    pub fn from_literal(text: &str) -> Option<Self> {
        if !text.contains(|c: char| c == '.' || c == 'e' || c == 'E') {
            if let Ok(x) = text.parse() {
                return Some(Self::Int(x));
            }
        }
        text.parse().ok().map(Self::Float)
    }

    pub fn as_float(self) -> Float {
        match self {
            Self::Int(x) => x as Float,
            Self::Float(x) => x,
            Self::Bool(b) => b as Int as Float,
        }
    }

    pub fn truthy(self) -> bool {
        match self {
            Self::Int(x) => x != 0,
            Self::Float(x) => x != 0.0,
            Self::Bool(b) => b,
        }
    }

    pub fn is_int(&self) -> bool {
        matches!(self, Self::Int(_))
    }

    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float(_))
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool(_))
    }

    // Booleans take part in arithmetic as 0 and 1.
    fn promote(self) -> Self {
        match self {
            Self::Bool(b) => Self::Int(b as Int),
            x => x,
        }
    }

    fn is_zero(self) -> bool {
        !self.promote().truthy()
    }

    pub(crate) fn compare(self, rhs: Self) -> Option<Ordering> {
        match (self.promote(), rhs.promote()) {
            (Self::Int(x), Self::Int(y)) => Some(x.cmp(&y)),
            (x, y) => x.as_float().partial_cmp(&y.as_float()),
        }
    }

    pub(crate) fn neg(self) -> Self {
        match self.promote() {
            Self::Int(x) => x.checked_neg().map_or(Self::Float(-(x as Float)), Self::Int),
            x => Self::Float(-x.as_float()),
        }
    }

    pub(crate) fn div(self, rhs: Self) -> Result<Self, Error> {
        if rhs.is_zero() {
            return Err(Error::ZeroDivision);
        }
        Ok(Self::Float(self.as_float() / rhs.as_float()))
    }

    pub(crate) fn pow(self, rhs: Self) -> Result<Self, Error> {
        let (base, exp) = (self.promote(), rhs.promote());
        if base.is_zero() && exp.compare(Self::ZERO) == Some(Ordering::Less) {
            return Err(Error::ZeroDivision);
        }

        if let (Self::Int(x), Self::Int(y)) = (base, exp) {
            if let Some(z) = u32::try_from(y).ok().and_then(|y| x.checked_pow(y)) {
                return Ok(Self::Int(z));
            }
        }

        let (x, y) = (base.as_float(), exp.as_float());
        if x < 0.0 && y.is_finite() && y.fract() != 0.0 {
            return Err(Error::Domain(format!(
                "{} raised to the fractional power {} is not a real number",
                base, exp
            )));
        }
        Ok(Self::Float(x.powf(y)))
    }

    /// Truncates toward zero, keeping integers as they are.
    pub(crate) fn trunc(self) -> Result<Self, Error> {
        match self.promote() {
            Self::Float(x) => float_to_int(x.trunc()),
            x => Ok(x),
        }
    }

    /// Rounds to the nearest integer, sending ties to the even neighbour.
    pub(crate) fn round(self) -> Result<Self, Error> {
        match self.promote() {
            Self::Float(x) => float_to_int(round_half_even(x)),
            x => Ok(x),
        }
    }

    pub(crate) fn abs(self) -> Self {
        match self.promote() {
            Self::Int(x) => x.checked_abs().map_or(Self::Float((x as Float).abs()), Self::Int),
            x => Self::Float(x.as_float().abs()),
        }
    }
}

fn round_half_even(x: Float) -> Float {
    let rounded = x.round();
    if (rounded - x).abs() == 0.5 {
        2.0 * (x / 2.0).round()
    } else {
        rounded
    }
}

fn float_to_int(x: Float) -> Result<Value, Error> {
    // `Int::MAX as Float` rounds up to 2^63, which is already out of range.
    if x.is_finite() && x >= Int::MIN as Float && x < Int::MAX as Float {
        Ok(Value::Int(x as Int))
    } else {
        Err(Error::Domain(format!("cannot convert {:?} to an integer", x)))
    }
}

macro_rules! val_impl_checked_op {
    ($fn_name:ident, $checked:ident, $op:tt) => {
        impl Value {
            pub(crate) fn $fn_name(self, rhs: Self) -> Self {
                match (self.promote(), rhs.promote()) {
                    (Self::Int(x), Self::Int(y)) => x
                        .$checked(y)
                        .map_or(Self::Float(x as Float $op y as Float), Self::Int),
                    (x, y) => Self::Float(x.as_float() $op y.as_float()),
                }
            }
        }
    };
}

val_impl_checked_op!(add, checked_add, +);
val_impl_checked_op!(sub, checked_sub, -);
val_impl_checked_op!(mul, checked_mul, *);

impl BinaryOperator {
    pub fn apply(self, lhs: Value, rhs: Value) -> Result<Value, Error> {
        use BinaryOperator::*;

        let cmp = || lhs.compare(rhs);
        Ok(match self {
            Add => lhs.add(rhs),
            Sub => lhs.sub(rhs),
            Mul => lhs.mul(rhs),
            Div => return lhs.div(rhs),
            Pow => return lhs.pow(rhs),
            Lt => Value::Bool(cmp() == Some(Ordering::Less)),
            Gt => Value::Bool(cmp() == Some(Ordering::Greater)),
            Le => Value::Bool(matches!(cmp(), Some(Ordering::Less | Ordering::Equal))),
            Ge => Value::Bool(matches!(cmp(), Some(Ordering::Greater | Ordering::Equal))),
            Eq => Value::Bool(cmp() == Some(Ordering::Equal)),
            Ne => Value::Bool(cmp() != Some(Ordering::Equal)),
            Or => Value::Bool(lhs.truthy() || rhs.truthy()),
            And => Value::Bool(lhs.truthy() && rhs.truthy()),
        })
    }
}

impl From<Int> for Value {
    fn from(x: Int) -> Self {
        Self::Int(x)
    }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self {
        Self::Int(x.into())
    }
}

impl From<Float> for Value {
    fn from(x: Float) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(x) => fmt::Display::fmt(x, f),
            Self::Float(x) => fmt::Debug::fmt(x, f),
            Self::Bool(b) => fmt::Display::fmt(b, f),
        }
    }
}
