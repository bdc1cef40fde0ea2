//! 从远程评语中解析总分

use once_cell::sync::Lazy;
use regex::Regex;

/// 远程评语中解析不到有效分数时使用的分数
pub const REMOTE_DEFAULT_SCORE: u8 = 75;

// 按优先级排列：`N/100`，`(overall) score: N`，`N%`
static SCORE_PATTERNS: Lazy<[Regex; 3]> = Lazy::new(|| {
    [
        Regex::new(r"(?i)\b(\d{1,3})\s*/\s*100").expect("valid regex"),
        Regex::new(r"(?i)\b(?:overall\s*)?score[:\s]*(\d{1,3})").expect("valid regex"),
        Regex::new(r"\b(\d{1,3})\s*%").expect("valid regex"),
    ]
});

/// 解析评语中的分数
///
/// 取第一个能匹配的模式的第一处匹配；值超出 0..=100 返回 `None`，
/// 不再尝试后面的模式。
pub fn parse_score(text: &str) -> Option<u8> {
    let captured = SCORE_PATTERNS
        .iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))?;

    captured
        .as_str()
        .parse::<u8>()
        .ok()
        .filter(|score| *score <= 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slash_hundred_wins() {
        let text = "Relevance 80/100, grammar 70/100. Overall score: 85";
        assert_eq!(parse_score(text), Some(80));
    }

    #[test]
    fn test_overall_score_label() {
        assert_eq!(parse_score("Overall Score: 88"), Some(88));
        assert_eq!(parse_score("score 64 because of weak structure"), Some(64));
    }

    #[test]
    fn test_percentage_is_last_resort() {
        assert_eq!(parse_score("I would give this 91% overall."), Some(91));
        assert_eq!(parse_score("91% relevance, score: 60"), Some(60));
    }

    #[test]
    fn test_out_of_range_or_missing() {
        assert_eq!(parse_score("A solid 150/100 effort"), None);
        assert_eq!(parse_score("Nice work, keep going."), None);
        assert_eq!(parse_score(""), None);
    }
}
