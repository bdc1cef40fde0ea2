use serde::Serialize;

use crate::evaluation::EvaluationSource;

/// 提交结果
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionResult {
    pub submission_id: i64,
    pub feedback: String,
    pub score: u8,
    pub source: EvaluationSource,
}
