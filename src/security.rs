//! Security Module
//!
//! 入力ワークブックに対するセキュリティ検査を実装するモジュール。
//! XLSXはZIPアーカイブであるため、calamineに渡す前にZIP bomb・
//! パストラバーサル・サイズ超過を検出します。

use std::io::Cursor;

use crate::error::StockMergeError;

/// 入力ファイル処理のセキュリティ制限
#[derive(Debug, Clone)]
pub(crate) struct SecurityConfig {
    /// 展開後の合計サイズの上限（バイト）。デフォルト: 1GB
    pub max_decompressed_size: u64,

    /// アーカイブ内エントリ数の上限。デフォルト: 10000
    pub max_file_count: usize,

    /// 単一エントリの展開後サイズの上限（バイト）。デフォルト: 100MB
    pub max_file_size: u64,

    /// 入力ファイル自体のサイズの上限（バイト）。デフォルト: 2GB
    pub max_input_file_size: u64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_decompressed_size: 1_073_741_824,
            max_file_count: 10_000,
            max_file_size: 104_857_600,
            max_input_file_size: 2_147_483_648,
        }
    }
}

/// アーカイブ内エントリ名の検証
///
/// パストラバーサル攻撃を防ぐため、エントリ名が相対パスかつ
/// `..`成分を含まないことを確認します。正規のXLSXのエントリ名は
/// `xl/worksheets/sheet1.xml`のような`/`区切りの相対パスです。
pub(crate) fn validate_zip_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Err("Empty entry name is not allowed".to_string());
    }

    if path.contains('\\') {
        return Err(format!("Backslash in entry name is not allowed: {}", path));
    }

    // ドライブレター形式（`C:`）もWindows絶対パスとして拒否
    let bytes = path.as_bytes();
    let absolute =
        path.starts_with('/') || (bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':');
    if absolute {
        return Err(format!("Absolute entry name is not allowed: {}", path));
    }

    if path.split('/').any(|component| component == "..") {
        return Err(format!("Path traversal detected: {}", path));
    }

    Ok(())
}

/// XLSXアーカイブの事前検査
///
/// メモリ上のバッファをZIPアーカイブとして開き、エントリ数・
/// エントリ名・展開後サイズ（個別および合計）を検証します。
/// サイズはセントラルディレクトリの宣言値で判定するため、
/// 実際の展開は行いません。
///
/// # 戻り値
///
/// * `Ok(())` - アーカイブが制限内の場合
/// * `Err(StockMergeError::Zip)` - ZIPアーカイブとして開けない場合
/// * `Err(StockMergeError::SecurityViolation)` - 制限に違反した場合
pub(crate) fn preflight_archive(
    buffer: &[u8],
    config: &SecurityConfig,
) -> Result<(), StockMergeError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(buffer))
        .map_err(|e| StockMergeError::Zip(format!("Failed to open archive: {}", e)))?;

    if archive.len() > config.max_file_count {
        return Err(StockMergeError::SecurityViolation(format!(
            "Archive entry count exceeds maximum: {} entries (max: {})",
            archive.len(),
            config.max_file_count
        )));
    }

    let mut total_size: u64 = 0;
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| StockMergeError::Zip(format!("Failed to read entry {}: {}", index, e)))?;

        validate_zip_path(entry.name()).map_err(StockMergeError::SecurityViolation)?;

        if entry.size() > config.max_file_size {
            return Err(StockMergeError::SecurityViolation(format!(
                "Archive entry '{}' exceeds maximum size: {} bytes (max: {} bytes)",
                entry.name(),
                entry.size(),
                config.max_file_size
            )));
        }

        total_size = total_size.saturating_add(entry.size());
        if total_size > config.max_decompressed_size {
            return Err(StockMergeError::SecurityViolation(format!(
                "Total decompressed size exceeds maximum: {} bytes (max: {} bytes)",
                total_size, config.max_decompressed_size
            )));
        }
    }

    Ok(())
}
