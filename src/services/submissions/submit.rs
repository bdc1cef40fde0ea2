use tracing::{debug, info};

use super::SubmissionService;
use crate::errors::{CampusError, Result};
use crate::evaluation::extract_text;
use crate::models::submissions::{
    requests::{CreateSubmissionRequest, NewSubmission},
    responses::SubmissionResult,
};
use crate::models::users::entities::{User, UserRole};

pub async fn submit_assignment(
    service: &SubmissionService,
    actor: &User,
    req: CreateSubmissionRequest,
) -> Result<SubmissionResult> {
    if actor.role != UserRole::Student {
        return Err(CampusError::authorization("Student access required"));
    }

    let storage = service.get_storage();

    let assignment = storage
        .get_assignment_by_id(req.assignment_id)
        .await?
        .ok_or_else(|| CampusError::not_found("Assignment not found"))?;

    if !storage.is_enrolled(actor.id, assignment.course_id).await? {
        return Err(CampusError::authorization("Not enrolled in this course"));
    }

    let file_path = req.upload.as_ref().map(|u| u.file_path.as_path());
    let file_name = req.upload.as_ref().map(|u| u.file_name.as_str());

    // 提取和评分都不会失败，最坏情况是空文本 + 规则评分
    let text = extract_text(file_path, file_name, req.text_content.as_deref()).await;
    debug!("Extracted {} chars for assignment {}", text.len(), assignment.id);

    let evaluation = service.evaluator().evaluate(&text).await;

    let submission = storage
        .create_submission(NewSubmission {
            assignment_id: assignment.id,
            student_id: actor.id,
            file_path: file_path.map(|p| p.to_string_lossy().into_owned()),
            file_name: file_name.map(str::to_string),
            feedback_text: evaluation.feedback.clone(),
            score: i32::from(evaluation.score),
        })
        .await?;

    info!(
        "Submission {} by user {} for assignment {} scored {} ({})",
        submission.id, actor.id, assignment.id, evaluation.score, evaluation.source
    );

    Ok(SubmissionResult {
        submission_id: submission.id,
        feedback: evaluation.feedback,
        score: evaluation.score,
        source: evaluation.source,
    })
}
