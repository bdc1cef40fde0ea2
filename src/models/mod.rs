//! 业务数据模型
//!
//! 与 entity 模块中的数据库实体分离，供服务层与调用方使用。

pub mod assignments;
pub mod attendance;
pub mod courses;
pub mod events;
pub mod submissions;
pub mod users;
