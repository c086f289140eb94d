use crate::utils::error::{AdvisorError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AdvisorError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a positive number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    let valid = value
        .split_once('@')
        .map(|(user, domain)| !user.is_empty() && domain.contains('.'))
        .unwrap_or(false);

    if !valid {
        return Err(AdvisorError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Expected an e-mail address like name@example.com".to_string(),
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
        return Err(AdvisorError::InvalidConfigValueError {
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
    fn test_validate_url() {
        assert!(validate_url("advisor.endpoint", "https://api.openai.com/v1").is_ok());
        assert!(validate_url("advisor.endpoint", "http://localhost:8080").is_ok());
        assert!(validate_url("advisor.endpoint", "").is_err());
        assert!(validate_url("advisor.endpoint", "invalid-url").is_err());
        assert!(validate_url("advisor.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("packaging.volumetric_divisor", 6000.0).is_ok());
        assert!(validate_positive("packaging.volumetric_divisor", 0.0).is_err());
        assert!(validate_positive("packaging.volumetric_divisor", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("shipping.contact_email", "loja@example.com").is_ok());
        assert!(validate_email("shipping.contact_email", "loja").is_err());
        assert!(validate_email("shipping.contact_email", "@example.com").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("advisor.temperature", 0.2, 0.0, 2.0).is_ok());
        assert!(validate_range("advisor.timeout_secs", 0u64, 1, 120).is_err());
    }
}
