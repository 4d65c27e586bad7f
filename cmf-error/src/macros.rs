/// Returns an error right away (like `anyhow::bail!`).
///
/// Returns `Err(StackError)` from the current function. Three forms:
/// - `bail!(err)` takes a ready error, anything convertible into
///   `StackError`;
/// - `bail!(code, "msg")` builds a `GenericError` from a code and message;
/// - `bail!(code, "fmt {}", arg)` formats the message.
///
/// ```ignore
/// use cmf_error::{bail, StatusCode};
///
/// fn check_code(code: u8) -> cmf_error::CmfResult<()> {
///     if code > 6 {
///         bail!(StatusCode::InvalidType, "Invalid type code {}", code);
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($err:expr) => {
        return Err($crate::StackError::from($err))
    };
    ($code:expr, $msg:expr) => {
        return Err($crate::StackError::new(
            $crate::types::GenericError::new($code, $msg)
        ))
    };
    ($code:expr, $fmt:expr, $($arg:tt)*) => {
        return Err($crate::StackError::new(
            $crate::types::GenericError::new($code, format!($fmt, $($arg)*))
        ))
    };
}

/// Checks a condition and calls `bail!` when it is false.
///
/// Same forms as `bail!`:
/// - `ensure!(cond, err)`
/// - `ensure!(cond, code, "msg")`
/// - `ensure!(cond, code, "fmt {}", arg)`
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $err:expr) => {
        if !($cond) {
            $crate::bail!($err);
        }
    };
    ($cond:expr, $code:expr, $msg:expr) => {
        if !($cond) {
            $crate::bail!($code, $msg);
        }
    };
    ($cond:expr, $code:expr, $fmt:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($code, $fmt, $($arg)*);
        }
    };
}

/// Extension trait for `Result` adding context helpers.
///
/// `.context(...)` and `.with_context(...)` turn the error into a
/// [`StackError`](crate::StackError) and attach the context to it.
pub trait ResultExt<T> {
    /// Attaches a context to the error, if any.
    fn context<C>(
        self,
        ctx: C,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>;

    /// Attaches a lazily built context (only evaluated on error).
    fn with_context<C, F>(
        self,
        f: F,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<crate::StackError>,
{
    #[track_caller]
    fn context<C>(
        self,
        ctx: C,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
    {
        self.map_err(|e| e.into().context(ctx))
    }

    #[track_caller]
    fn with_context<C, F>(
        self,
        f: F,
    ) -> Result<T, crate::StackError>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.into().context(f()))
    }
}

////////////////////////////////////////////////////////////////////////////////
// Tests
////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BuildError, CmfResult, GenericError, StatusCode};

    #[test]
    fn test_bail_simple() {
        fn example() -> CmfResult<()> {
            bail!(BuildError::InvalidType { code: 7 });
        }

        let err = example().unwrap_err();
        assert_eq!(err.status_code(), StatusCode::InvalidType);
    }

    #[test]
    fn test_bail_with_format() {
        fn example(value: i32) -> CmfResult<()> {
            bail!(StatusCode::InvalidArgs, "Invalid value: {}", value);
        }

        let err = example(42).unwrap_err();
        assert!(err.to_string().contains("Invalid value: 42"));
        assert_eq!(err.status_code(), StatusCode::InvalidArgs);
    }

    #[test]
    fn test_ensure() {
        fn validate(x: i32) -> CmfResult<()> {
            ensure!(x >= 0, StatusCode::InvalidArgs, "Value must be non-negative");
            ensure!(x < 100, StatusCode::InvalidArgs, "Value too large: {}", x);
            Ok(())
        }

        assert!(validate(50).is_ok());
        assert!(validate(-1).is_err());
        assert!(validate(150).is_err());
    }

    #[test]
    fn test_result_ext() {
        fn inner() -> Result<(), GenericError> {
            Err(GenericError::new(StatusCode::Internal, "inner error"))
        }

        fn outer() -> CmfResult<()> {
            inner().context("outer context")?;
            Ok(())
        }

        let err = outer().unwrap_err();
        assert_eq!(err.contexts().len(), 1);
        assert_eq!(err.contexts()[0].message, "outer context");
    }

    #[test]
    fn test_with_context_lazy() {
        fn example(success: bool) -> CmfResult<()> {
            let result: Result<(), GenericError> = if success {
                Ok(())
            } else {
                Err(GenericError::new(StatusCode::Internal, "error"))
            };

            result.with_context(|| "expensive context".to_string())?;
            Ok(())
        }

        assert!(example(true).is_ok());
        assert!(example(false).is_err());
    }
}
