//! Security Module
//!
//! 入力ファイルとZIPアーカイブに対するリソース制限を提供するモジュール。
//! 入力サイズの上限、ZIP bomb対策、パストラバーサル対策を扱います。

use std::io::{Read, Seek};

use zip::ZipArchive;

use crate::error::XlsxToDocxError;

/// セキュリティ設定
///
/// ファイル処理時のリソース制限を定義します。
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 展開後の最大サイズ（バイト）
    /// デフォルト: 1GB
    pub max_decompressed_size: u64,
    /// ZIPアーカイブ内の最大ファイル数
    /// デフォルト: 10000
    pub max_file_count: usize,
    /// 単一ファイルの最大サイズ（バイト）
    /// デフォルト: 100MB
    pub max_file_size: u64,
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 2GB
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_decompressed_size: 1_073_741_824, // 1GB
            max_file_count: 10_000,
            max_file_size: 104_857_600,         // 100MB
            max_input_file_size: 2_147_483_648, // 2GB
        }
    }
}

impl SecurityConfig {
    /// 入力全体をメモリに読み込む
    ///
    /// 上限を1バイトでも超えた時点で読み込みを打ち切り、
    /// `SecurityViolation`を返します。
    pub fn read_limited<R: Read>(&self, reader: R) -> Result<Vec<u8>, XlsxToDocxError> {
        let mut buffer = Vec::new();
        let bytes_read = reader
            .take(self.max_input_file_size.saturating_add(1))
            .read_to_end(&mut buffer)?;

        if bytes_read as u64 > self.max_input_file_size {
            return Err(XlsxToDocxError::SecurityViolation(format!(
                "Input file size exceeds maximum: more than {} bytes",
                self.max_input_file_size
            )));
        }

        Ok(buffer)
    }

    /// ZIPアーカイブのエントリ数・パス・展開サイズを検証する
    pub fn check_archive<R: Read + Seek>(
        &self,
        archive: &mut ZipArchive<R>,
    ) -> Result<(), XlsxToDocxError> {
        if archive.len() > self.max_file_count {
            return Err(XlsxToDocxError::SecurityViolation(format!(
                "ZIP archive contains too many files: {} (max: {})",
                archive.len(),
                self.max_file_count
            )));
        }

        let mut total_decompressed_size = 0u64;
        for i in 0..archive.len() {
            let file = archive
                .by_index(i)
                .map_err(|e| XlsxToDocxError::Zip(e.to_string()))?;

            validate_zip_path(file.name()).map_err(|e| {
                XlsxToDocxError::SecurityViolation(format!("Invalid ZIP path: {}", e))
            })?;

            if file.size() > self.max_file_size {
                return Err(XlsxToDocxError::SecurityViolation(format!(
                    "File '{}' exceeds maximum size: {} bytes (max: {} bytes)",
                    file.name(),
                    file.size(),
                    self.max_file_size
                )));
            }

            total_decompressed_size = total_decompressed_size
                .checked_add(file.size())
                .ok_or_else(|| {
                    XlsxToDocxError::SecurityViolation(
                        "Total decompressed size calculation overflow".to_string(),
                    )
                })?;

            if total_decompressed_size > self.max_decompressed_size {
                return Err(XlsxToDocxError::SecurityViolation(format!(
                    "Total decompressed size exceeds maximum: {} bytes (max: {} bytes)",
                    total_decompressed_size, self.max_decompressed_size
                )));
            }
        }

        Ok(())
    }
}

/// ZIP内のファイルパスの検証
///
/// `..`、絶対パス、バックスラッシュを含むパスを拒否します。
pub(crate) fn validate_zip_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("Empty path is not allowed".to_string());
    }

    if path.starts_with('/') || path.starts_with("C:\\") || path.starts_with("c:\\") {
        return Err(format!("Absolute path is not allowed: {}", path));
    }

    if path.contains("..") {
        return Err(format!("Path traversal detected: {}", path));
    }

    if path.contains('\\') {
        return Err(format!("Backslash in path is not allowed: {}", path));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::{FileOptions, ZipWriter};

    fn archive_with(names: &[&str]) -> ZipArchive<Cursor<Vec<u8>>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        for name in names {
            zip.start_file(*name, FileOptions::default()).unwrap();
            zip.write_all(b"<x/>").unwrap();
        }
        let cursor = zip.finish().unwrap();
        ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap()
    }

    #[test]
    fn test_validate_zip_path_valid() {
        assert!(validate_zip_path("word/document.xml").is_ok());
        assert!(validate_zip_path("[Content_Types].xml").is_ok());
        assert!(validate_zip_path("_rels/.rels").is_ok());
    }

    #[test]
    fn test_validate_zip_path_rejects_unsafe() {
        assert!(validate_zip_path("").is_err());
        assert!(validate_zip_path("/etc/passwd").is_err());
        assert!(validate_zip_path("c:\\word\\document.xml").is_err());
        assert!(validate_zip_path("word/../../etc/passwd").is_err());
        assert!(validate_zip_path("word\\document.xml").is_err());
    }

    #[test]
    fn test_read_limited_within_limit() {
        let config = SecurityConfig {
            max_input_file_size: 4,
            ..SecurityConfig::default()
        };
        let data = config.read_limited(Cursor::new(b"abcd".to_vec())).unwrap();
        assert_eq!(data, b"abcd");
    }

    #[test]
    fn test_read_limited_over_limit() {
        let config = SecurityConfig {
            max_input_file_size: 4,
            ..SecurityConfig::default()
        };
        let result = config.read_limited(Cursor::new(b"abcde".to_vec()));
        assert!(matches!(result, Err(XlsxToDocxError::SecurityViolation(_))));
    }

    #[test]
    fn test_check_archive_file_count() {
        let config = SecurityConfig {
            max_file_count: 1,
            ..SecurityConfig::default()
        };
        let mut archive = archive_with(&["a.xml", "b.xml"]);
        match config.check_archive(&mut archive) {
            Err(XlsxToDocxError::SecurityViolation(msg)) => assert!(msg.contains("too many files")),
            other => panic!("Expected SecurityViolation, got {:?}", other),
        }
    }

    #[test]
    fn test_check_archive_total_size() {
        let config = SecurityConfig {
            max_decompressed_size: 6,
            ..SecurityConfig::default()
        };
        let mut archive = archive_with(&["a.xml", "b.xml"]);
        assert!(matches!(
            config.check_archive(&mut archive),
            Err(XlsxToDocxError::SecurityViolation(_))
        ));
    }

    #[test]
    fn test_check_archive_ok() {
        let mut archive = archive_with(&["word/document.xml"]);
        assert!(SecurityConfig::default().check_archive(&mut archive).is_ok());
    }
}
