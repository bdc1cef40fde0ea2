use std::path::PathBuf;

/// 已暂存到上传目录的文件
#[derive(Debug, Clone, PartialEq)]
pub struct StagedUpload {
    pub file_path: PathBuf,
    pub file_name: String, // 原始文件名，用于判断格式
}

/// 提交作业请求
#[derive(Debug, Clone)]
pub struct CreateSubmissionRequest {
    pub assignment_id: i64,
    pub upload: Option<StagedUpload>,
    pub text_content: Option<String>,
}

/// 存储层写入参数
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub assignment_id: i64,
    pub student_id: i64,
    pub file_path: Option<String>,
    pub file_name: Option<String>,
    pub feedback_text: String,
    pub score: i32,
}
