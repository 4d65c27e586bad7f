use std::{any::Any, error::Error};

use crate::StatusCode;

/// Extension trait for library errors (object-safe).
///
/// Helpers shared by every error type of the codec:
/// - the status code,
/// - a message safe to show to a caller,
/// - a detailed message for logs.
pub trait ErrorExt: Error + Send + Sync + 'static {
    /// Status code of the error.
    ///
    /// Defaults to [`StatusCode::Internal`].
    fn status_code(&self) -> StatusCode {
        StatusCode::Internal
    }

    /// Returns the error as [`Any`](std::any::Any) so it can be downcast to
    /// its concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Message for the caller.
    ///
    /// Internal errors are reported as `"Internal error"`; everything else
    /// uses `Display`.
    fn client_message(&self) -> String {
        match self.status_code() {
            StatusCode::Unknown | StatusCode::Internal => "Internal error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Detailed message for logs.
    fn log_message(&self) -> String {
        format!("{self:?}")
    }

    /// Short type name of the error.
    fn type_name(&self) -> String {
        std::any::type_name::<Self>()
            .split("::")
            .last()
            .unwrap_or("Unknown")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::{any::Any, error::Error, fmt};

    use super::*;

    // Error type relying on the default status code (Internal).
    #[derive(Debug)]
    struct DefaultError(pub &'static str);

    impl fmt::Display for DefaultError {
        fn fmt(
            &self,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            write!(f, "DefaultError: {}", self.0)
        }
    }

    impl Error for DefaultError {}

    impl ErrorExt for DefaultError {
        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[derive(Debug)]
    struct BadTagError(pub &'static str);

    impl fmt::Display for BadTagError {
        fn fmt(
            &self,
            f: &mut fmt::Formatter<'_>,
        ) -> fmt::Result {
            write!(f, "BadTag: {}", self.0)
        }
    }

    impl Error for BadTagError {}

    impl ErrorExt for BadTagError {
        fn status_code(&self) -> StatusCode {
            StatusCode::InvalidTag
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    #[test]
    fn test_default_status_code_is_internal() {
        let e = DefaultError("oops");
        assert_eq!(e.status_code(), StatusCode::Internal);
    }

    #[test]
    fn test_client_message_internal() {
        let e = DefaultError("details");
        assert_eq!(e.client_message(), "Internal error".to_string());
    }

    #[test]
    fn test_client_message_non_internal() {
        let e = BadTagError("nope");
        assert_eq!(e.client_message(), e.to_string());
    }

    #[test]
    fn test_as_any_downcast() {
        let e = BadTagError("x");
        let down = e.as_any().downcast_ref::<BadTagError>();
        assert!(down.is_some());
        assert_eq!(down.unwrap().0, "x");
    }

    #[test]
    fn test_log_message_matches_debug() {
        let e = BadTagError("dbg");
        assert_eq!(e.log_message(), format!("{:?}", e));
    }

    #[test]
    fn test_type_name_returns_short_struct_name() {
        let e = BadTagError("n");
        let tn = e.type_name();
        assert!(
            tn.ends_with("BadTagError"),
            "type_name must end with 'BadTagError', got: {tn}"
        );
    }
}
