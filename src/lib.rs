//! campus-core - 校园管理后端核心
//!
//! 进程内 SQLite 存储（每次写入后快照落盘）与作业提交评分流水线。
//!
//! # 架构
//! - `config`: 配置管理
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `evaluation`: 文本提取与评分
//! - `models`: 数据模型定义
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（内存 SQLite + 快照）
//! - `utils`: 工具函数

pub mod config;
pub mod entity;
pub mod errors;
pub mod evaluation;
pub mod models;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
