//! 上传文件暂存

use std::fs;
use std::path::Path;

use tracing::{debug, error};
use uuid::Uuid;

use crate::config::UploadConfig;
use crate::errors::{CampusError, Result};
use crate::models::submissions::requests::StagedUpload;
use crate::utils::validate_magic_bytes;

/// 校验并写入上传目录，文件以生成的唯一名称保存
pub fn stage_upload(config: &UploadConfig, original_name: &str, bytes: &[u8]) -> Result<StagedUpload> {
    // 提取扩展名并校验
    let extension = Path::new(original_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();

    if extension.is_empty()
        || !config
            .allowed_types
            .iter()
            .any(|t| t.to_lowercase() == extension)
    {
        return Err(CampusError::validation("File type not allowed"));
    }

    if bytes.len() > config.max_size {
        return Err(CampusError::validation("File size exceeds the limit"));
    }

    if !validate_magic_bytes(bytes, &extension) {
        return Err(CampusError::validation(
            "File content does not match its extension",
        ));
    }

    // 确保上传目录存在
    let upload_dir = Path::new(&config.dir);
    fs::create_dir_all(upload_dir).map_err(|e| {
        error!("Failed to create upload dir {}: {}", upload_dir.display(), e);
        CampusError::file_operation(format!("创建上传目录失败: {e}"))
    })?;

    let stored_name = format!("{}-{}.bin", chrono::Utc::now().timestamp(), Uuid::new_v4());
    let file_path = upload_dir.join(stored_name);
    fs::write(&file_path, bytes).map_err(|e| {
        error!("Failed to write upload {}: {}", file_path.display(), e);
        CampusError::file_operation(format!("文件写入失败: {e}"))
    })?;

    debug!(
        "Staged upload {} ({} bytes) at {}",
        original_name,
        bytes.len(),
        file_path.display()
    );

    Ok(StagedUpload {
        file_path,
        file_name: original_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> UploadConfig {
        UploadConfig {
            dir: dir.path().join("uploads").to_string_lossy().into_owned(),
            max_size: 64,
            allowed_types: [".pdf", ".doc", ".docx", ".txt", ".png", ".jpg", ".jpeg"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    #[test]
    fn test_stage_text_upload() {
        let dir = TempDir::new().unwrap();
        let staged = stage_upload(&config_in(&dir), "Essay.TXT", b"hello").unwrap();

        assert_eq!(staged.file_name, "Essay.TXT");
        assert!(staged.file_path.starts_with(dir.path().join("uploads")));
        assert_eq!(staged.file_path.extension().unwrap(), "bin");
        assert_eq!(fs::read(&staged.file_path).unwrap(), b"hello");
    }

    #[test]
    fn test_rejects_disallowed_and_oversized() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let err = stage_upload(&config, "script.exe", b"MZ").unwrap_err();
        assert_eq!(err.code(), "E007");

        let err = stage_upload(&config, "noext", b"data").unwrap_err();
        assert_eq!(err.code(), "E007");

        let err = stage_upload(&config, "big.txt", &[b'a'; 65]).unwrap_err();
        assert!(err.message().contains("size"));
    }

    #[test]
    fn test_rejects_mismatched_magic() {
        let dir = TempDir::new().unwrap();
        let err = stage_upload(&config_in(&dir), "photo.png", b"not a png").unwrap_err();
        assert!(err.message().contains("does not match"));
        assert!(!dir.path().join("uploads").exists());
    }
}
