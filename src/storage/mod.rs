use crate::models::{
    assignments::{entities::Assignment, requests::CreateAssignmentRequest},
    attendance::{
        entities::{AttendanceRecord, AttendanceStatus},
        requests::AttendanceRecordQuery,
    },
    courses::entities::{Course, RosterStudent},
    events::entities::Event,
    submissions::{
        entities::{Submission, SubmissionListItem},
        requests::NewSubmission,
    },
    users::{entities::User, requests::CreateUserRequest},
};

use crate::errors::Result;

pub mod sqlite_store;

pub use sqlite_store::{Store, StoreOptions, StoreTransaction};

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 用户总数
    async fn count_users(&self) -> Result<i64>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过邮箱和密码获取用户信息
    async fn get_user_by_credentials(&self, email: &str, password: &str) -> Result<Option<User>>;

    /// 课程管理方法
    // 创建课程
    async fn create_course(&self, name: &str, code: &str) -> Result<Course>;
    // 列出课程
    async fn list_courses(&self) -> Result<Vec<Course>>;
    // 是否已选课
    async fn is_enrolled(&self, user_id: i64, course_id: i64) -> Result<bool>;
    // 课程学生名单
    async fn list_course_students(&self, course_id: i64) -> Result<Vec<RosterStudent>>;

    /// 考勤管理方法
    // 批量记录考勤，返回写入条数
    async fn mark_attendance(
        &self,
        course_id: i64,
        session_date: &str,
        marked_by: i64,
        marks: Vec<(i64, AttendanceStatus)>,
    ) -> Result<usize>;
    // 查询考勤记录
    async fn list_attendance_records(
        &self,
        query: AttendanceRecordQuery,
    ) -> Result<Vec<AttendanceRecord>>;

    /// 作业管理方法
    async fn create_assignment(&self, req: CreateAssignmentRequest) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments(&self, course_id: Option<i64>) -> Result<Vec<Assignment>>;

    /// 提交管理方法
    async fn create_submission(&self, submission: NewSubmission) -> Result<Submission>;
    // 某学生的提交，最新在前
    async fn list_student_submissions(&self, student_id: i64) -> Result<Vec<SubmissionListItem>>;
    // 全部提交，最新在前
    async fn list_all_submissions(&self) -> Result<Vec<SubmissionListItem>>;

    /// 校园活动
    async fn list_upcoming_events(&self, limit: u64) -> Result<Vec<Event>>;
}
