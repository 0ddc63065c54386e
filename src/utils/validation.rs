use crate::utils::error::{DreamError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// `#rrggbb`, case-insensitive
pub fn is_hex_color(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 7 && bytes[0] == b'#' && bytes[1..].iter().all(|b| b.is_ascii_hexdigit())
}

pub fn validate_hex_color(field_name: &str, value: &str) -> Result<()> {
    if !is_hex_color(value) {
        return Err(DreamError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Color must match #rrggbb".to_string(),
        });
    }
    Ok(())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(DreamError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(DreamError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DreamError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(DreamError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_hex_color() {
        assert!(is_hex_color("#112233"));
        assert!(is_hex_color("#AbCdEf"));
        assert!(!is_hex_color("112233"));
        assert!(!is_hex_color("#12345"));
        assert!(!is_hex_color("#1234567"));
        assert!(!is_hex_color("#12345g"));
        assert!(!is_hex_color(""));
    }

    #[test]
    fn test_validate_hex_color() {
        assert!(validate_hex_color("colors.fallback", "#7f8c8d").is_ok());
        assert!(validate_hex_color("colors.fallback", "grey").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output_dir", "./out").is_ok());
        assert!(validate_path("output_dir", "").is_err());
        assert!(validate_path("output_dir", "out\0put").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("model.timeout_seconds", 60, 1, 600).is_ok());
        assert!(validate_range("model.timeout_seconds", 0, 1, 600).is_err());
        assert!(validate_range("model.timeout_seconds", 601, 1, 600).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("model.name", "qwen3:1.7b").is_ok());
        assert!(validate_non_empty_string("model.name", "   ").is_err());
    }
}
