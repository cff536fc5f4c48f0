pub mod classifier;
pub mod dependency;
pub mod package;
pub mod release;
pub mod release_file;

pub use classifier::*;
pub use dependency::*;
pub use package::*;
pub use release::*;
pub use release_file::*;

use crate::error::{IndexError, Result};

/// Reject values longer than the column they are stored in.
pub(crate) fn check_max_len(field: &'static str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(IndexError::validation(
            field,
            format!("{} characters exceeds the maximum of {}", len, max),
        ));
    }
    Ok(())
}

pub(crate) fn check_not_blank(field: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(IndexError::validation(field, "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_max_len_counts_chars() {
        assert!(check_max_len("name", "héllo", 5).is_ok());
        assert!(check_max_len("name", "héllo!", 5).is_err());
    }

    #[test]
    fn test_check_not_blank() {
        assert!(check_not_blank("summary", "x").is_ok());
        assert!(check_not_blank("summary", "   ").is_err());
    }
}
