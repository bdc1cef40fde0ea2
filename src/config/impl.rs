use config::{Config, ConfigError, Environment, File};
use std::sync::OnceLock;

use super::AppConfig;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 内置默认值，保证没有配置文件时也能启动
            .set_default("app.system_name", "Campus Portal")?
            .set_default("app.environment", "development")?
            .set_default("app.log_level", "info")?
            .set_default("database.snapshot_path", "data/university.db")?
            .set_default("database.acquire_timeout", 10)?
            .set_default("upload.dir", "uploads")?
            .set_default("upload.max_size", 10 * 1024 * 1024)?
            .set_default(
                "upload.allowed_types",
                vec![".pdf", ".doc", ".docx", ".txt", ".png", ".jpg", ".jpeg"],
            )?
            .set_default("evaluation.base_url", "https://api.openai.com")?
            .set_default("evaluation.model", "gpt-3.5-turbo")?
            .set_default("evaluation.max_tokens", 500)?
            .set_default("evaluation.timeout", 30)?
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 最后加载环境变量覆盖
            .add_source(
                Environment::with_prefix("CAMPUS")
                    .separator("__")
                    .try_parsing(true),
            );

        // 支持从常用环境变量加载
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("database.snapshot_path", std::env::var("DATABASE_PATH").ok())?
            .set_override_option("upload.dir", std::env::var("UPLOAD_DIR").ok())?
            .set_override_option("evaluation.api_key", std::env::var("OPENAI_API_KEY").ok())?
            .set_override_option("evaluation.base_url", std::env::var("OPENAI_BASE_URL").ok())?
            .set_override_option("evaluation.model", std::env::var("OPENAI_MODEL").ok())?;

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// 获取全局配置实例
    pub fn get() -> &'static AppConfig {
        APP_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                eprintln!("Failed to load configuration: {e}");
                std::process::exit(1);
            })
        })
    }

    /// 初始化配置 (在应用启动时调用)
    pub fn init() -> Result<(), ConfigError> {
        let config = Self::load()?;
        APP_CONFIG
            .set(config)
            .map_err(|_| ConfigError::Message("Configuration already initialized".to_string()))?;
        Ok(())
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }
}

#[cfg(test)]
mod tests {
    use crate::config::EvaluationConfig;

    #[test]
    fn test_blank_credential_is_absent() {
        let mut config = EvaluationConfig::default();
        assert!(config.credential().is_none());

        config.api_key = Some("   ".to_string());
        assert!(config.credential().is_none());

        config.api_key = Some("sk-test".to_string());
        assert_eq!(config.credential(), Some("sk-test"));
    }
}
