//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_campus_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone)]
        pub enum CampusError {
            $($variant(String),)*
        }

        impl CampusError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(CampusError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(CampusError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(CampusError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl CampusError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        CampusError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_campus_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Transaction("E004", "Transaction Failure"),
    Persistence("E005", "Persistence Failure"),
    FileOperation("E006", "File Operation Error"),
    Validation("E007", "Validation Error"),
    NotFound("E008", "Resource Not Found"),
    Authentication("E009", "Authentication Error"),
    Authorization("E010", "Authorization Error"),
    Serialization("E011", "Serialization Error"),
    DateParse("E012", "Date Parse Error"),
}

impl CampusError {
    /// 是否属于调用方可见的请求拒绝（而非服务端故障）
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CampusError::Validation(_)
                | CampusError::NotFound(_)
                | CampusError::Authentication(_)
                | CampusError::Authorization(_)
                | CampusError::DateParse(_)
        )
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for CampusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CampusError {}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for CampusError {
    fn from(err: sea_orm::DbErr) -> Self {
        CampusError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for CampusError {
    fn from(err: std::io::Error) -> Self {
        CampusError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for CampusError {
    fn from(err: serde_json::Error) -> Self {
        CampusError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for CampusError {
    fn from(err: chrono::ParseError) -> Self {
        CampusError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CampusError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CampusError::database_config("test").code(), "E001");
        assert_eq!(CampusError::transaction("test").code(), "E004");
        assert_eq!(CampusError::persistence("test").code(), "E005");
        assert_eq!(CampusError::validation("test").code(), "E007");
        assert_eq!(CampusError::authorization("test").code(), "E010");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            CampusError::persistence("disk full").error_type(),
            "Persistence Failure"
        );
        assert_eq!(
            CampusError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = CampusError::not_found("Assignment not found");
        assert_eq!(err.message(), "Assignment not found");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(CampusError::authorization("x").is_client_error());
        assert!(CampusError::validation("x").is_client_error());
        assert!(!CampusError::persistence("x").is_client_error());
        assert!(!CampusError::transaction("x").is_client_error());
    }

    #[test]
    fn test_format_simple() {
        let err = CampusError::validation("courseId required");
        let formatted = err.format_simple();
        assert!(formatted.contains("Validation Error"));
        assert!(formatted.contains("courseId required"));
    }
}
