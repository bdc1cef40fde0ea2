use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{CampusError, Result};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}$").expect("Invalid email regex")
});

pub fn validate_email(email: &str) -> std::result::Result<(), &'static str> {
    // 邮箱格式校验：必须包含 @ 和 .
    if !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// 校验课程日期（YYYY-MM-DD），返回规范化后的字符串
pub fn validate_session_date(date: &str) -> Result<String> {
    let parsed = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| CampusError::date_parse(format!("Invalid date '{date}': {e}")))?;
    Ok(parsed.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(validate_email("student1@uni.edu").is_ok());
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_session_date_normalized() {
        assert_eq!(validate_session_date(" 2025-03-01 ").unwrap(), "2025-03-01");
    }

    #[test]
    fn test_session_date_rejects_garbage() {
        let err = validate_session_date("03/01/2025").unwrap_err();
        assert_eq!(err.code(), "E012");
        assert!(validate_session_date("2025-02-30").is_err());
    }
}
