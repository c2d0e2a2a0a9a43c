//! Output Formatters
//!
//! 統合結果の各出力フォーマット（XLSX, CSV, JSON）の実装。

use std::io::Write;

use chrono::Utc;
use rust_xlsxwriter::Workbook;

use crate::api::ConsolidatedRow;
use crate::error::StockMergeError;

/// 出力テーブルのヘッダー（列順は固定）
pub(crate) const OUTPUT_HEADERS: [&str; 6] = [
    "Store",
    "Item Code",
    "BarCode",
    "Item Name",
    "Retail Price",
    "STOCK",
];

/// 出力ワークシート名
pub(crate) const OUTPUT_SHEET_NAME: &str = "Consolidated";

/// XLSXフォーマッター
///
/// `Consolidated`という名前の単一ワークシートに、ヘッダー行と
/// データ行を書き込みます。ワークブック全体をメモリ上で構築した後、
/// ライターへ書き出します。
pub(crate) struct XlsxFormatter;

impl XlsxFormatter {
    pub fn render<W: Write>(
        &self,
        rows: &[ConsolidatedRow],
        writer: &mut W,
    ) -> Result<(), StockMergeError> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(OUTPUT_SHEET_NAME)?;

        // ヘッダー行
        for (col, header) in OUTPUT_HEADERS.iter().enumerate() {
            worksheet.write_string(0, col as u16, *header)?;
        }

        // データ行
        for (idx, row) in rows.iter().enumerate() {
            let excel_row = (idx + 1) as u32;

            worksheet.write_string(excel_row, 0, &row.store)?;
            worksheet.write_string(excel_row, 1, &row.item_code)?;

            if let Some(ref barcode) = row.barcode {
                worksheet.write_string(excel_row, 2, barcode)?;
            }
            if let Some(ref item_name) = row.item_name {
                worksheet.write_string(excel_row, 3, item_name)?;
            }
            if let Some(retail_price) = row.retail_price {
                worksheet.write_number(excel_row, 4, retail_price)?;
            }

            worksheet.write_number(excel_row, 5, row.stock as f64)?;
        }

        let buffer = workbook.save_to_buffer()?;
        writer.write_all(&buffer)?;
        writer.flush()?;
        Ok(())
    }
}

/// CSVフォーマッター
///
/// ヘッダー行に続いてデータ行を出力します。カタログに存在しない
/// 商品の欠損フィールドは空文字列として出力されます。
pub(crate) struct CsvFormatter;

impl CsvFormatter {
    pub fn render<W: Write>(
        &self,
        rows: &[ConsolidatedRow],
        writer: &mut W,
    ) -> Result<(), StockMergeError> {
        writeln!(writer, "{}", OUTPUT_HEADERS.join(","))?;

        for row in rows {
            let price = row
                .retail_price
                .map(|p| p.to_string())
                .unwrap_or_default();

            let fields = [
                escape_csv(&row.store),
                escape_csv(&row.item_code),
                escape_csv(row.barcode.as_deref().unwrap_or("")),
                escape_csv(row.item_name.as_deref().unwrap_or("")),
                escape_csv(&price),
                row.stock.to_string(),
            ];
            writeln!(writer, "{}", fields.join(","))?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// JSONフォーマッター
///
/// 生成時刻と行数を含むエンベロープオブジェクトとして出力します。
pub(crate) struct JsonFormatter;

impl JsonFormatter {
    pub fn render<W: Write>(
        &self,
        rows: &[ConsolidatedRow],
        writer: &mut W,
    ) -> Result<(), StockMergeError> {
        let envelope = serde_json::json!({
            "generated_at": Utc::now().to_rfc3339(),
            "row_count": rows.len(),
            "rows": rows,
        });

        serde_json::to_writer_pretty(&mut *writer, &envelope)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

/// CSV文字列をエスケープ
///
/// ダブルクォート、改行、カンマを含む場合はダブルクォートで囲み、
/// 内部のダブルクォートは2つにエスケープします。
fn escape_csv(s: &str) -> String {
    if s.contains('"') || s.contains(',') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
