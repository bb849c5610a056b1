//! Upload safety checks for plan PDFs.
//!
//! Layers, in order:
//! 1. Size limit
//! 2. `.pdf` extension
//! 3. Executable magic bytes
//! 4. Content sniffing (must detect as `application/pdf`)

use crate::defaults::{MAX_FILENAME_BYTES, PDF_EXTENSION};
use crate::error::{Error, Result};

const PDF_MIME: &str = "application/pdf";

/// Magic byte signatures for executable files
pub const MAGIC_SIGNATURES: &[(&str, &[u8])] = &[
    ("Windows PE/MZ", &[0x4D, 0x5A]),
    ("ELF", &[0x7F, 0x45, 0x4C, 0x46]),
    ("Mach-O 32", &[0xFE, 0xED, 0xFA, 0xCE]),
    ("Mach-O 64", &[0xFE, 0xED, 0xFA, 0xCF]),
    ("Java class or Mach-O Fat", &[0xCA, 0xFE, 0xBA, 0xBE]),
    ("WebAssembly", &[0x00, 0x61, 0x73, 0x6D]),
];

/// Result of upload validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub allowed: bool,
    pub block_reason: Option<String>,
    pub detected_type: Option<String>,
}

impl ValidationResult {
    pub fn allowed(detected: impl Into<String>) -> Self {
        Self {
            allowed: true,
            block_reason: None,
            detected_type: Some(detected.into()),
        }
    }

    pub fn blocked(reason: impl Into<String>, detected: impl Into<String>) -> Self {
        Self {
            allowed: false,
            block_reason: Some(reason.into()),
            detected_type: Some(detected.into()),
        }
    }

    /// Convert a blocked result into `Error::InvalidInput`.
    pub fn into_result(self) -> Result<()> {
        if self.allowed {
            Ok(())
        } else {
            Err(Error::InvalidInput(
                self.block_reason
                    .unwrap_or_else(|| "File rejected".to_string()),
            ))
        }
    }
}

fn has_pdf_extension(filename: &str) -> bool {
    let ext_len = PDF_EXTENSION.len();
    filename.len() >= ext_len
        && filename
            .get(filename.len() - ext_len..)
            .is_some_and(|ext| ext.eq_ignore_ascii_case(PDF_EXTENSION))
}

/// Validate an uploaded plan file.
pub fn validate_plan_pdf(filename: &str, data: &[u8], max_size_bytes: u64) -> ValidationResult {
    if data.is_empty() {
        return ValidationResult::blocked("File is empty", "empty");
    }

    if data.len() as u64 > max_size_bytes {
        return ValidationResult::blocked(
            format!("File exceeds maximum size of {} bytes", max_size_bytes),
            "oversized",
        );
    }

    if !has_pdf_extension(filename) {
        let ext = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext)
            .unwrap_or_default();
        return ValidationResult::blocked(
            format!("Only PDF files are accepted, got '{}'", filename),
            format!("extension:{}", ext.to_lowercase()),
        );
    }

    for (name, magic) in MAGIC_SIGNATURES {
        if data.starts_with(magic) {
            return ValidationResult::blocked(
                format!("Executable file detected: {}", name),
                format!("executable:{}", name.to_lowercase().replace(' ', "_")),
            );
        }
    }

    match infer::get(data) {
        Some(kind) if kind.mime_type() == PDF_MIME => ValidationResult::allowed(PDF_MIME),
        Some(kind) => ValidationResult::blocked(
            format!("File content is {}, not a PDF", kind.mime_type()),
            kind.mime_type(),
        ),
        None => ValidationResult::blocked(
            "File content is not a PDF",
            "application/octet-stream",
        ),
    }
}

/// Longest prefix of `s` that fits in `max_bytes` without splitting a character.
fn truncate_on_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let end = s
        .char_indices()
        .map(|(i, _)| i)
        .take_while(|&i| i <= max_bytes)
        .last()
        .unwrap_or(0);
    &s[..end]
}

/// Sanitize a client-supplied filename for display and storage.
///
/// Path components are removed, reserved characters replaced with `_`, and
/// names longer than 255 bytes truncated with the extension preserved.
pub fn sanitize_filename(filename: &str) -> String {
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '|' | '?' | '*' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        return "unnamed_file".to_string();
    }

    if sanitized.len() > MAX_FILENAME_BYTES {
        if let Some(dot_pos) = sanitized.rfind('.') {
            let ext = &sanitized[dot_pos..];
            if ext.len() < MAX_FILENAME_BYTES {
                let stem =
                    truncate_on_char_boundary(&sanitized[..dot_pos], MAX_FILENAME_BYTES - ext.len());
                return format!("{}{}", stem, ext);
            }
        }
        return truncate_on_char_boundary(sanitized, MAX_FILENAME_BYTES).to_string();
    }

    sanitized.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: u64 = 100_000_000;

    #[test]
    fn test_allows_pdf() {
        let result = validate_plan_pdf("32坪_3LDK_平屋_南_50坪.pdf", b"%PDF-1.7\n%...", LIMIT);
        assert!(result.allowed);
        assert_eq!(result.detected_type.as_deref(), Some("application/pdf"));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert!(validate_plan_pdf("PLAN.PDF", b"%PDF-1.4", LIMIT).allowed);
        assert!(validate_plan_pdf("plan.Pdf", b"%PDF-1.4", LIMIT).allowed);
    }

    #[test]
    fn test_blocks_empty() {
        let result = validate_plan_pdf("plan.pdf", b"", LIMIT);
        assert!(!result.allowed);
        assert_eq!(result.detected_type.as_deref(), Some("empty"));
    }

    #[test]
    fn test_blocks_non_pdf_extension() {
        let result = validate_plan_pdf("plan.png", b"%PDF-1.4", LIMIT);
        assert!(!result.allowed);
        assert_eq!(result.detected_type.as_deref(), Some("extension:png"));
    }

    #[test]
    fn test_blocks_executable_disguised_as_pdf() {
        let result = validate_plan_pdf("plan.pdf", b"MZ\x90\x00", LIMIT);
        assert!(!result.allowed);
        assert!(result.block_reason.unwrap().contains("Windows PE"));

        let result = validate_plan_pdf("plan.pdf", b"\x7FELF\x02\x01\x01", LIMIT);
        assert!(result.block_reason.unwrap().contains("ELF"));
    }

    #[test]
    fn test_blocks_other_content_type() {
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        let result = validate_plan_pdf("plan.pdf", &png, LIMIT);
        assert!(!result.allowed);
        assert_eq!(result.detected_type.as_deref(), Some("image/png"));
    }

    #[test]
    fn test_blocks_unrecognized_content() {
        let result = validate_plan_pdf("plan.pdf", b"not a pdf", LIMIT);
        assert!(!result.allowed);
        assert!(result.block_reason.unwrap().contains("not a PDF"));
    }

    #[test]
    fn test_size_boundary() {
        let mut data = b"%PDF-1.4".to_vec();
        data.resize(100, b' ');
        assert!(validate_plan_pdf("plan.pdf", &data, 100).allowed);

        data.push(b' ');
        let result = validate_plan_pdf("plan.pdf", &data, 100);
        assert!(!result.allowed);
        assert!(result.block_reason.unwrap().contains("exceeds maximum size"));
    }

    #[test]
    fn test_into_result() {
        assert!(validate_plan_pdf("plan.pdf", b"%PDF-1.4", LIMIT)
            .into_result()
            .is_ok());
        let err = validate_plan_pdf("plan.txt", b"hello", LIMIT)
            .into_result()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_sanitize_removes_path() {
        assert_eq!(sanitize_filename("/tmp/uploads/plan.pdf"), "plan.pdf");
        assert_eq!(sanitize_filename("C:\\plans\\32坪_3LDK.pdf"), "32坪_3LDK.pdf");
    }

    #[test]
    fn test_sanitize_keeps_grammar_characters() {
        let name = "32.5坪_3LDK_2階建て_南_50坪_吹き抜け-WIC.pdf";
        assert_eq!(sanitize_filename(name), name);
    }

    #[test]
    fn test_sanitize_removes_dangerous_chars() {
        assert_eq!(sanitize_filename("plan<>:v2.pdf"), "plan___v2.pdf");
        assert_eq!(sanitize_filename("plan|final?.pdf"), "plan_final_.pdf");
    }

    #[test]
    fn test_sanitize_truncates_multibyte_names() {
        let long_name = format!("{}.pdf", "坪".repeat(200));
        let sanitized = sanitize_filename(&long_name);
        assert!(sanitized.len() <= MAX_FILENAME_BYTES);
        assert!(sanitized.ends_with(".pdf"));
        assert!(sanitized.trim_end_matches(".pdf").chars().all(|c| c == '坪'));
    }

    #[test]
    fn test_sanitize_truncates_without_extension() {
        let sanitized = sanitize_filename(&"間".repeat(100));
        assert!(sanitized.len() <= MAX_FILENAME_BYTES);
        assert_eq!(sanitized.chars().count(), MAX_FILENAME_BYTES / 3);
    }

    #[test]
    fn test_sanitize_handles_empty() {
        assert_eq!(sanitize_filename(""), "unnamed_file");
        assert_eq!(sanitize_filename("   "), "unnamed_file");
    }
}
