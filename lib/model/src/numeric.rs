use crate::{ThinError, ThinResult};
use oxrdf::vocab::xsd;
use oxrdf::{Literal, NamedNodeRef};
use oxsdatatypes::Decimal;
use std::cmp::Ordering;
use std::str::FromStr;

/// A numeric value of one of the four XSD numeric primitive types.
///
/// All types derived from `xsd:integer` are represented as [Numeric::Integer].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Numeric {
    Integer(i64),
    Decimal(Decimal),
    Float(f32),
    Double(f64),
}

/// The two operands of a binary numeric operation, promoted to a common type.
enum NumericPair {
    Integer(i64, i64),
    Decimal(Decimal, Decimal),
    Float(f32, f32),
    Double(f64, f64),
}

impl Numeric {
    /// Parses the value of a numeric literal.
    ///
    /// Returns an error if the literal is not numeric or its lexical form is invalid.
    pub fn from_literal(literal: &Literal) -> ThinResult<Self> {
        let value = literal.value();
        let datatype = literal.datatype();
        if is_integer_datatype(datatype) {
            Ok(Self::Integer(i64::from_str(value)?))
        } else if datatype == xsd::DECIMAL {
            Ok(Self::Decimal(Decimal::from_str(value)?))
        } else if datatype == xsd::FLOAT {
            Ok(Self::Float(f32::from_str(value)?))
        } else if datatype == xsd::DOUBLE {
            Ok(Self::Double(f64::from_str(value)?))
        } else {
            ThinError::expected()
        }
    }

    /// Converts the value into a typed literal of its datatype.
    pub fn into_literal(self) -> Literal {
        match self {
            Self::Integer(value) => Literal::from(value),
            Self::Decimal(value) => Literal::new_typed_literal(value.to_string(), xsd::DECIMAL),
            Self::Float(value) => Literal::from(value),
            Self::Double(value) => Literal::from(value),
        }
    }

    /// Returns the [effective boolean value](https://www.w3.org/TR/sparql11-query/#ebv).
    pub fn effective_boolean_value(self) -> bool {
        match self {
            Self::Integer(value) => value != 0,
            Self::Decimal(value) => value != Decimal::from(0),
            Self::Float(value) => value != 0.0 && !value.is_nan(),
            Self::Double(value) => value != 0.0 && !value.is_nan(),
        }
    }

    /// [op:numeric-add](https://www.w3.org/TR/xpath-functions-31/#func-numeric-add)
    pub fn checked_add(self, rhs: Self) -> ThinResult<Self> {
        match promote(self, rhs)? {
            NumericPair::Integer(lhs, rhs) => lhs.checked_add(rhs).map(Self::Integer),
            NumericPair::Decimal(lhs, rhs) => lhs.checked_add(rhs).map(Self::Decimal),
            NumericPair::Float(lhs, rhs) => Some(Self::Float(lhs + rhs)),
            NumericPair::Double(lhs, rhs) => Some(Self::Double(lhs + rhs)),
        }
        .ok_or(ThinError::default())
    }

    /// [op:numeric-subtract](https://www.w3.org/TR/xpath-functions-31/#func-numeric-subtract)
    pub fn checked_sub(self, rhs: Self) -> ThinResult<Self> {
        match promote(self, rhs)? {
            NumericPair::Integer(lhs, rhs) => lhs.checked_sub(rhs).map(Self::Integer),
            NumericPair::Decimal(lhs, rhs) => lhs.checked_sub(rhs).map(Self::Decimal),
            NumericPair::Float(lhs, rhs) => Some(Self::Float(lhs - rhs)),
            NumericPair::Double(lhs, rhs) => Some(Self::Double(lhs - rhs)),
        }
        .ok_or(ThinError::default())
    }

    /// [op:numeric-multiply](https://www.w3.org/TR/xpath-functions-31/#func-numeric-multiply)
    pub fn checked_mul(self, rhs: Self) -> ThinResult<Self> {
        match promote(self, rhs)? {
            NumericPair::Integer(lhs, rhs) => lhs.checked_mul(rhs).map(Self::Integer),
            NumericPair::Decimal(lhs, rhs) => lhs.checked_mul(rhs).map(Self::Decimal),
            NumericPair::Float(lhs, rhs) => Some(Self::Float(lhs * rhs)),
            NumericPair::Double(lhs, rhs) => Some(Self::Double(lhs * rhs)),
        }
        .ok_or(ThinError::default())
    }

    /// [op:numeric-divide](https://www.w3.org/TR/xpath-functions-31/#func-numeric-divide)
    ///
    /// Dividing two integers yields a decimal. Returns `Err` in case of a decimal division by zero.
    pub fn checked_div(self, rhs: Self) -> ThinResult<Self> {
        match promote(self, rhs)? {
            NumericPair::Integer(lhs, rhs) => Decimal::from(lhs)
                .checked_div(Decimal::from(rhs))
                .map(Self::Decimal),
            NumericPair::Decimal(lhs, rhs) => lhs.checked_div(rhs).map(Self::Decimal),
            NumericPair::Float(lhs, rhs) => Some(Self::Float(lhs / rhs)),
            NumericPair::Double(lhs, rhs) => Some(Self::Double(lhs / rhs)),
        }
        .ok_or(ThinError::default())
    }

    /// [op:numeric-unary-minus](https://www.w3.org/TR/xpath-functions-31/#func-numeric-unary-minus)
    pub fn checked_neg(self) -> ThinResult<Self> {
        match self {
            Self::Integer(value) => value.checked_neg().map(Self::Integer),
            Self::Decimal(value) => value.checked_neg().map(Self::Decimal),
            Self::Float(value) => Some(Self::Float(-value)),
            Self::Double(value) => Some(Self::Double(-value)),
        }
        .ok_or(ThinError::default())
    }

    /// Compares two numerics after promoting them to a common type.
    ///
    /// Returns `None` if one of the values is `NaN` or the promotion fails.
    pub fn compare(self, rhs: Self) -> Option<Ordering> {
        match promote(self, rhs).ok()? {
            NumericPair::Integer(lhs, rhs) => Some(lhs.cmp(&rhs)),
            NumericPair::Decimal(lhs, rhs) => Some(lhs.cmp(&rhs)),
            NumericPair::Float(lhs, rhs) => lhs.partial_cmp(&rhs),
            NumericPair::Double(lhs, rhs) => lhs.partial_cmp(&rhs),
        }
    }

    #[allow(clippy::cast_precision_loss, reason = "XSD numeric type promotion")]
    fn to_f32(self) -> ThinResult<f32> {
        match self {
            Self::Integer(value) => Ok(value as f32),
            Self::Decimal(value) => Ok(f32::from_str(&value.to_string())?),
            Self::Float(value) => Ok(value),
            Self::Double(_) => ThinError::expected(),
        }
    }

    #[allow(clippy::cast_precision_loss, reason = "XSD numeric type promotion")]
    fn to_f64(self) -> ThinResult<f64> {
        match self {
            Self::Integer(value) => Ok(value as f64),
            Self::Decimal(value) => Ok(f64::from_str(&value.to_string())?),
            Self::Float(value) => Ok(f64::from(value)),
            Self::Double(value) => Ok(value),
        }
    }
}

fn promote(lhs: Numeric, rhs: Numeric) -> ThinResult<NumericPair> {
    Ok(match (lhs, rhs) {
        (Numeric::Integer(lhs), Numeric::Integer(rhs)) => NumericPair::Integer(lhs, rhs),
        (Numeric::Integer(lhs), Numeric::Decimal(rhs)) => {
            NumericPair::Decimal(Decimal::from(lhs), rhs)
        }
        (Numeric::Decimal(lhs), Numeric::Integer(rhs)) => {
            NumericPair::Decimal(lhs, Decimal::from(rhs))
        }
        (Numeric::Decimal(lhs), Numeric::Decimal(rhs)) => NumericPair::Decimal(lhs, rhs),
        (Numeric::Double(_), _) | (_, Numeric::Double(_)) => {
            NumericPair::Double(lhs.to_f64()?, rhs.to_f64()?)
        }
        (Numeric::Float(_), _) | (_, Numeric::Float(_)) => {
            NumericPair::Float(lhs.to_f32()?, rhs.to_f32()?)
        }
    })
}

/// Checks whether `datatype` is `xsd:integer` or one of the types derived from it.
pub fn is_integer_datatype(datatype: NamedNodeRef<'_>) -> bool {
    static INTEGER_DATATYPES: &[NamedNodeRef<'_>; 13] = &[
        xsd::INTEGER,
        xsd::BYTE,
        xsd::SHORT,
        xsd::INT,
        xsd::LONG,
        xsd::UNSIGNED_BYTE,
        xsd::UNSIGNED_SHORT,
        xsd::UNSIGNED_INT,
        xsd::UNSIGNED_LONG,
        xsd::POSITIVE_INTEGER,
        xsd::NEGATIVE_INTEGER,
        xsd::NON_POSITIVE_INTEGER,
        xsd::NON_NEGATIVE_INTEGER,
    ];
    INTEGER_DATATYPES.contains(&datatype)
}

/// Checks if the datatype is a numeric datatype.
pub fn is_numeric_datatype(datatype: NamedNodeRef<'_>) -> bool {
    is_integer_datatype(datatype)
        || datatype == xsd::DECIMAL
        || datatype == xsd::FLOAT
        || datatype == xsd::DOUBLE
}
