//! Result type alias for the importer

use super::errors::ImportError;

/// Result type alias for import operations
///
/// # Examples
///
/// ```
/// use ersd_import::domain::result::Result;
/// use ersd_import::domain::errors::ImportError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ImportError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::ImportError;

    #[test]
    fn test_result_err() {
        let result: Result<i32> = Err(ImportError::Validation("test error".to_string()));
        assert!(result.is_err());
    }

    #[test]
    fn test_result_with_question_mark() -> Result<()> {
        fn inner() -> Result<i32> {
            Ok(42)
        }

        let value = inner()?;
        assert_eq!(value, 42);
        Ok(())
    }
}
