//! 提交文件的文本提取
//!
//! 提取失败从不向上传播：记录日志后按空文本处理，交给评分器降级。

use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use quick_xml::Reader;
use quick_xml::events::Event;
use thiserror::Error;
use tracing::{debug, warn};

/// 纯文本类文件最多读取的字节数
pub const TEXT_BYTE_BUDGET: u64 = 50_000;

const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Error)]
enum ExtractError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not an OOXML package: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[cfg(feature = "pdf")]
    #[error("PDF parse failed: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentKind {
    Pdf,
    WordProcessing,
    PlainText,
    Unsupported,
}

impl DocumentKind {
    fn from_name(file_name: &str) -> Self {
        let ext = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());

        match ext.as_deref() {
            Some("pdf") => DocumentKind::Pdf,
            Some("doc") | Some("docx") => DocumentKind::WordProcessing,
            Some("txt") | Some("html") => DocumentKind::PlainText,
            _ => DocumentKind::Unsupported,
        }
    }

    fn read(self, path: &Path) -> Result<String, ExtractError> {
        match self {
            DocumentKind::Pdf => read_pdf(path),
            DocumentKind::WordProcessing => read_docx(File::open(path)?),
            DocumentKind::PlainText => read_plain_text(path),
            DocumentKind::Unsupported => Ok(String::new()),
        }
    }
}

/// 提取提交内容的纯文本
///
/// 非空的内联文本优先（去掉首尾空白）；否则按 `file_name` 的扩展名解析
/// `file_path` 指向的文件。
pub async fn extract_text(
    file_path: Option<&Path>,
    file_name: Option<&str>,
    inline_text: Option<&str>,
) -> String {
    if let Some(text) = inline_text.map(str::trim).filter(|text| !text.is_empty()) {
        return text.to_string();
    }

    let Some(path) = file_path.filter(|path| path.exists()) else {
        return String::new();
    };

    let kind = DocumentKind::from_name(file_name.unwrap_or_default());
    if kind == DocumentKind::Unsupported {
        debug!("No text extractor for {:?}", file_name);
        return String::new();
    }

    let path: PathBuf = path.to_path_buf();
    let shown = path.display().to_string();
    run_extractor(shown, move || kind.read(&path)).await
}

/// 在阻塞线程池上运行解析器；解析器出错或 panic 都按空文本处理
async fn run_extractor<F>(shown: String, job: F) -> String
where
    F: FnOnce() -> Result<String, ExtractError> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!("Text extraction failed for {}: {}", shown, e);
            String::new()
        }
        Err(e) => {
            warn!("Text extraction task for {} aborted: {}", shown, e);
            String::new()
        }
    }
}

fn read_plain_text(path: &Path) -> Result<String, ExtractError> {
    let mut bytes = Vec::new();
    File::open(path)?
        .take(TEXT_BYTE_BUDGET)
        .read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// 读取 docx 正文：段落之间换行，其余排版信息全部丢弃
fn read_docx<R: Read + Seek>(source: R) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(source)?;
    let mut xml = String::new();
    archive.by_name(DOCX_BODY)?.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => text.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text.trim_end().to_string())
}

#[cfg(feature = "pdf")]
fn read_pdf(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    pdf_extract::extract_text_from_mem(&bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

#[cfg(not(feature = "pdf"))]
fn read_pdf(path: &Path) -> Result<String, ExtractError> {
    debug!("PDF support disabled, skipping {}", path.display());
    Ok(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn docx_bytes(paragraphs: &[&str]) -> Vec<u8> {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<w:p><w:r><w:t>{p}</w:t></w:r></w:p>"))
            .collect();
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(DOCX_BODY, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[tokio::test]
    async fn test_inline_text_wins() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("essay.txt");
        std::fs::write(&path, "file body").unwrap();

        let text = extract_text(Some(&path), Some("essay.txt"), Some("  typed answer \n")).await;
        assert_eq!(text, "typed answer");
    }

    #[tokio::test]
    async fn test_blank_inline_falls_through_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("upload.bin");
        std::fs::write(&path, "file body").unwrap();

        let text = extract_text(Some(&path), Some("Essay.TXT"), Some("   ")).await;
        assert_eq!(text, "file body");
    }

    #[tokio::test]
    async fn test_missing_file_and_unknown_extension() {
        let dir = TempDir::new().unwrap();
        assert_eq!(extract_text(None, Some("a.txt"), None).await, "");
        assert_eq!(
            extract_text(Some(&dir.path().join("gone.txt")), Some("gone.txt"), None).await,
            ""
        );

        let path = dir.path().join("photo.bin");
        std::fs::write(&path, b"\x89PNG\r\n\x1a\n").unwrap();
        assert_eq!(extract_text(Some(&path), Some("photo.png"), None).await, "");
    }

    #[tokio::test]
    async fn test_plain_text_budget() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("long.bin");
        std::fs::write(&path, "a".repeat(60_000)).unwrap();

        let text = extract_text(Some(&path), Some("long.html"), None).await;
        assert_eq!(text.len(), TEXT_BYTE_BUDGET as usize);
    }

    #[tokio::test]
    async fn test_docx_paragraphs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.bin");
        std::fs::write(&path, docx_bytes(&["First paragraph.", "Tom &amp; Jerry."])).unwrap();

        let text = extract_text(Some(&path), Some("report.docx"), None).await;
        assert_eq!(text, "First paragraph.\nTom & Jerry.");
    }

    #[tokio::test]
    async fn test_legacy_doc_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.bin");
        std::fs::write(&path, b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1 legacy binary").unwrap();

        assert_eq!(extract_text(Some(&path), Some("legacy.doc"), None).await, "");
    }

    #[tokio::test]
    async fn test_extractor_panic_becomes_empty_text() {
        let text = run_extractor("broken.pdf".to_string(), || -> Result<String, ExtractError> {
            panic!("parser bug")
        })
        .await;
        assert_eq!(text, "");
    }

    #[cfg(feature = "pdf")]
    #[tokio::test]
    async fn test_malformed_pdf_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.bin");
        std::fs::write(&path, b"%PDF-1.4\n1 0 obj << /Type /Catalog /Pages 9 0 R >>\ntrailer").unwrap();

        assert_eq!(extract_text(Some(&path), Some("broken.pdf"), None).await, "");
    }

    #[test]
    fn test_document_kind() {
        assert_eq!(DocumentKind::from_name("a.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_name("a.doc"), DocumentKind::WordProcessing);
        assert_eq!(DocumentKind::from_name("notes"), DocumentKind::Unsupported);
    }
}
