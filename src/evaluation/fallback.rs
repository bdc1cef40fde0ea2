//! 本地规则评分：没有远程服务（或远程失败）时使用

use once_cell::sync::Lazy;
use regex::Regex;

const BASE_SCORE: u8 = 70;
const MIN_SHORT_SCORE: u8 = 40;
const SHORT_PENALTY: u8 = 20;

const TIP_SHORT: &str = "Add more content; the submission is quite short.";
const TIP_LENGTH: &str = "Good length and development.";
const TIP_SOURCES: &str = "Consider citing sources to support originality.";
const TIP_SENTENCES: &str = "Break long paragraphs into clearer sentences.";

static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// 返回 (评语, 分数)
pub fn evaluate(text: &str) -> (String, u8) {
    let mut score = BASE_SCORE;
    let mut tips: Vec<&str> = Vec::new();

    let word_count = text.split_whitespace().count();
    if word_count < 50 {
        score = MIN_SHORT_SCORE.max(score - SHORT_PENALTY);
        tips.push(TIP_SHORT);
    } else if word_count > 200 {
        tips.push(TIP_LENGTH);
    }

    if text.contains("http") || text.contains("www.") {
        tips.push(TIP_SOURCES);
    }

    let sentences = SENTENCE_END.find_iter(text).count();
    if sentences < 3 && word_count > 30 {
        tips.push(TIP_SENTENCES);
    }

    let suggestions = if tips.is_empty() {
        "- Structure looks reasonable.".to_string()
    } else {
        format!("- Suggestions: {}", tips.join(" "))
    };
    let overall = if score >= BASE_SCORE {
        "Acceptable. "
    } else {
        "Needs improvement. "
    };

    let feedback = [
        "**Evaluation (automated):**".to_string(),
        format!("- Content length: {word_count} words."),
        suggestions,
        format!("- Overall: {overall}Review the suggestions above."),
        format!("**Score: {score}/100**"),
    ]
    .join("\n");

    (feedback, score)
}
