//! Output Format Module
//!
//! Strategy Patternによる出力フォーマットの抽象化を提供するモジュール。

mod formatters;

use crate::api::ConsolidatedRow;
use crate::error::StockMergeError;
use std::io::Write;

pub(crate) use formatters::*;

/// 出力フォーマッター（Strategy Pattern）
///
/// 各出力フォーマット（XLSX, CSV, JSON）をenumとして表現します。
#[derive(Debug, Clone, Copy)]
pub(crate) enum OutputFormatter {
    Xlsx,
    Csv,
    Json,
}

impl OutputFormatter {
    /// 出力フォーマットからフォーマッターを生成
    pub fn from_format(format: crate::api::OutputFormat) -> Self {
        match format {
            crate::api::OutputFormat::Xlsx => OutputFormatter::Xlsx,
            crate::api::OutputFormat::Csv => OutputFormatter::Csv,
            crate::api::OutputFormat::Json => OutputFormatter::Json,
        }
    }

    /// 統合結果を指定されたフォーマットで出力する
    ///
    /// # 引数
    ///
    /// * `rows` - 統合済み在庫テーブルの行
    /// * `writer` - 出力先のライター
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 出力に成功した場合
    /// * `Err(StockMergeError)` - エラーが発生した場合
    pub fn render<W: Write>(
        &self,
        rows: &[ConsolidatedRow],
        writer: &mut W,
    ) -> Result<(), StockMergeError> {
        match self {
            OutputFormatter::Xlsx => XlsxFormatter.render(rows, writer),
            OutputFormatter::Csv => CsvFormatter.render(rows, writer),
            OutputFormatter::Json => JsonFormatter.render(rows, writer),
        }
    }
}
