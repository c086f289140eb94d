use crate::domain::model::PostalCode;

pub const POSTAL_CODE_LEN: usize = 8;

/// Keeps only the digits; accepts the result when exactly eight remain.
pub fn sanitize_postal_code(input: &str) -> Option<PostalCode> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == POSTAL_CODE_LEN {
        Some(PostalCode(digits))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_separators() {
        assert_eq!(sanitize_postal_code("01001-000").unwrap().as_str(), "01001000");
        assert_eq!(sanitize_postal_code(" 01.001 000 ").unwrap().as_str(), "01001000");
    }

    #[test]
    fn test_rejects_wrong_length() {
        assert!(sanitize_postal_code("123").is_none());
        assert!(sanitize_postal_code("").is_none());
        assert!(sanitize_postal_code("010010001").is_none());
        assert!(sanitize_postal_code("abcdefgh").is_none());
    }

    #[test]
    fn test_keeps_leading_zeros() {
        assert_eq!(sanitize_postal_code("00000-001").unwrap().as_str(), "00000001");
    }
}
