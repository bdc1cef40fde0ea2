//! 业务逻辑层
//!
//! 每个服务持有共享的 `Arc<dyn Storage>`，调用方传入当前用户，
//! 拒绝原因以 `CampusError` 返回。

pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod courses;
pub mod events;
pub mod submissions;
pub mod uploads;

pub use assignments::AssignmentService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use courses::CourseService;
pub use events::EventService;
pub use submissions::SubmissionService;
