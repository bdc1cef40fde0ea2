use super::SubmissionService;
use crate::errors::Result;
use crate::models::submissions::entities::SubmissionListItem;
use crate::models::users::entities::User;

pub async fn list_submissions(
    service: &SubmissionService,
    actor: &User,
) -> Result<Vec<SubmissionListItem>> {
    let storage = service.get_storage();

    if actor.role.is_staff() {
        storage.list_all_submissions().await
    } else {
        storage.list_student_submissions(actor.id).await
    }
}
