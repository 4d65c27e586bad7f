//! Input coercions behind the typed builder writers.
//!
//! Each writer accepts anything implementing its conversion trait:
//! - [`IntoInt`] for `add_int`
//! - [`IntoDouble`] for `add_double`
//! - [`Truthy`] for `add_bool`
//!
//! `add_string` and `add_bytes` need no trait of their own, they take
//! `Display` and `AsRef<[u8]>` inputs.

use cmf_error::{BuildError, CmfResult};

use crate::value::Value;

fn coercion_error(
    target: &'static str,
    input: impl ToString,
) -> cmf_error::StackError {
    BuildError::Coercion {
        target,
        input: input.to_string(),
    }
    .into()
}

////////////////////////////////////////////////////////////////////////////////
// Integers
////////////////////////////////////////////////////////////////////////////////

/// Conversion to a signed integer.
///
/// Floats are truncated toward zero; text is parsed as an integer, or as a
/// float and then truncated.
pub trait IntoInt {
    fn into_int(self) -> CmfResult<i128>;
}

macro_rules! impl_into_int_exact {
    ($($t:ty),*) => {
        $(
            impl IntoInt for $t {
                fn into_int(self) -> CmfResult<i128> {
                    Ok(self as i128)
                }
            }
        )*
    };
}

impl_into_int_exact!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

/// Truncates toward zero. Non-finite values and values beyond i128 fail.
fn truncate_float(d: f64) -> CmfResult<i128> {
    // i128::MAX as f64 rounds up to 2^127, which is already out of range.
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    let t = d.trunc();
    if !t.is_finite() || t >= LIMIT || t < -LIMIT {
        return Err(coercion_error("integer", d));
    }
    Ok(t as i128)
}

impl IntoInt for f64 {
    fn into_int(self) -> CmfResult<i128> {
        truncate_float(self)
    }
}

impl IntoInt for f32 {
    fn into_int(self) -> CmfResult<i128> {
        truncate_float(self as f64)
    }
}

impl IntoInt for &str {
    fn into_int(self) -> CmfResult<i128> {
        let text = self.trim();
        if let Ok(n) = text.parse::<i128>() {
            return Ok(n);
        }
        match text.parse::<f64>() {
            Ok(d) if d.is_finite() => truncate_float(d),
            _ => Err(coercion_error("integer", self)),
        }
    }
}

impl IntoInt for String {
    fn into_int(self) -> CmfResult<i128> {
        self.as_str().into_int()
    }
}

impl IntoInt for &String {
    fn into_int(self) -> CmfResult<i128> {
        self.as_str().into_int()
    }
}

impl IntoInt for &Value {
    fn into_int(self) -> CmfResult<i128> {
        match self {
            Value::Int(n) => Ok(*n),
            Value::Double(d) => truncate_float(*d),
            Value::Text(s) => s.as_str().into_int(),
            Value::Bytes(_) | Value::Bool(_) => Err(coercion_error("integer", self)),
        }
    }
}

impl IntoInt for Value {
    fn into_int(self) -> CmfResult<i128> {
        (&self).into_int()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Doubles
////////////////////////////////////////////////////////////////////////////////

/// Conversion to a double. Integers are widened; text is parsed.
pub trait IntoDouble {
    fn into_double(self) -> CmfResult<f64>;
}

macro_rules! impl_into_double_widen {
    ($($t:ty),*) => {
        $(
            impl IntoDouble for $t {
                fn into_double(self) -> CmfResult<f64> {
                    Ok(self as f64)
                }
            }
        )*
    };
}

impl_into_double_widen!(f32, f64, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, usize);

impl IntoDouble for &str {
    fn into_double(self) -> CmfResult<f64> {
        self.trim()
            .parse::<f64>()
            .map_err(|_| coercion_error("double", self))
    }
}

impl IntoDouble for String {
    fn into_double(self) -> CmfResult<f64> {
        self.as_str().into_double()
    }
}

impl IntoDouble for &String {
    fn into_double(self) -> CmfResult<f64> {
        self.as_str().into_double()
    }
}

impl IntoDouble for &Value {
    fn into_double(self) -> CmfResult<f64> {
        match self {
            Value::Double(d) => Ok(*d),
            Value::Int(n) => Ok(*n as f64),
            Value::Text(s) => s.as_str().into_double(),
            Value::Bytes(_) | Value::Bool(_) => Err(coercion_error("double", self)),
        }
    }
}

impl IntoDouble for Value {
    fn into_double(self) -> CmfResult<f64> {
        (&self).into_double()
    }
}

////////////////////////////////////////////////////////////////////////////////
// Truthiness
////////////////////////////////////////////////////////////////////////////////

/// Truthiness used by `add_bool`.
///
/// Only `false` and absent values are false.
pub trait Truthy {
    fn is_truthy(&self) -> bool;
}

impl Truthy for bool {
    fn is_truthy(&self) -> bool {
        *self
    }
}

impl<T> Truthy for Option<T> {
    fn is_truthy(&self) -> bool {
        self.is_some()
    }
}

impl Truthy for Value {
    fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }
}

impl<T: Truthy + ?Sized> Truthy for &T {
    fn is_truthy(&self) -> bool {
        (**self).is_truthy()
    }
}
