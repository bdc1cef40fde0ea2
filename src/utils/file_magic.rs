/// 验证上传文件内容的魔术字节是否与扩展名匹配
///
/// # Arguments
/// * `data` - 文件内容的前几个字节
/// * `extension` - 文件扩展名（包含点号，如 ".png"）
///
/// # Returns
/// * `true` - 魔术字节匹配或该类型不需要验证
/// * `false` - 魔术字节不匹配
pub fn validate_magic_bytes(data: &[u8], extension: &str) -> bool {
    if data.is_empty() {
        return false;
    }

    match extension.to_lowercase().as_str() {
        // 图片格式
        ".png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]),
        ".jpg" | ".jpeg" => data.starts_with(&[0xFF, 0xD8, 0xFF]),

        // 文档格式
        ".pdf" => data.starts_with(b"%PDF"),
        ".doc" => {
            // 旧版 Word 可能是 OLE 复合文档，也可能是改名的 docx
            data.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
                || data.starts_with(&[0x50, 0x4B, 0x03, 0x04])
        }
        ".docx" => data.starts_with(&[0x50, 0x4B, 0x03, 0x04]),

        // 文本格式 - 不检查魔术字节
        ".txt" | ".html" => true,

        // 未知格式 - 默认拒绝
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_magic() {
        let png_header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert!(validate_magic_bytes(&png_header, ".png"));
        assert!(validate_magic_bytes(&png_header, ".PNG"));
        assert!(!validate_magic_bytes(&png_header, ".jpg"));
    }

    #[test]
    fn test_pdf_magic() {
        let pdf_header = b"%PDF-1.4";
        assert!(validate_magic_bytes(pdf_header, ".pdf"));
        assert!(!validate_magic_bytes(pdf_header, ".docx"));
    }

    #[test]
    fn test_word_magic() {
        let zip_header = [0x50, 0x4B, 0x03, 0x04, 0x14, 0x00];
        assert!(validate_magic_bytes(&zip_header, ".docx"));
        assert!(validate_magic_bytes(&zip_header, ".doc"));
    }

    #[test]
    fn test_text_files() {
        assert!(validate_magic_bytes(b"Hello, World!", ".txt"));
        assert!(validate_magic_bytes(b"<html></html>", ".html"));
    }

    #[test]
    fn test_empty_data() {
        assert!(!validate_magic_bytes(&[], ".png"));
        assert!(!validate_magic_bytes(&[], ".txt"));
    }

    #[test]
    fn test_unknown_extension() {
        assert!(!validate_magic_bytes(&[0x00, 0x01, 0x02, 0x03], ".exe"));
    }
}
