//! Workbook Parser
//!
//! calamineのラッパーとして、ワークブックレベルの操作を提供します。
//! シートのセルデータは行インデックスが絶対位置になるように
//! 正規化されたグリッドとして返されます。

use calamine::{open_workbook_auto_from_rs, Data, Reader, Sheets, Xlsx};
use std::io::Cursor;

use crate::error::StockMergeError;
use crate::types::CellValue;

/// ワークブックパーサー
///
/// 入力ワークブック全体をメモリ上のバッファとして保持し、
/// calamineでシート単位にセルデータを抽出します。
pub(crate) struct WorkbookParser {
    /// calamineのワークブック（XLSX形式のみサポート）
    workbook: Xlsx<Cursor<Vec<u8>>>,
}

impl WorkbookParser {
    /// メモリ上のバッファからワークブックを開く
    ///
    /// # 引数
    ///
    /// * `buffer` - 入力ファイル全体のバイト列
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - ワークブックの読み込みに成功した場合（XLSX形式のみ）
    /// * `Err(StockMergeError::Parse)` - ワークブックの読み込みに失敗した場合
    /// * `Err(StockMergeError::Config)` - XLSX形式でない場合
    pub fn from_buffer(buffer: Vec<u8>) -> Result<Self, StockMergeError> {
        let sheets =
            open_workbook_auto_from_rs(Cursor::new(buffer)).map_err(StockMergeError::Parse)?;
        let workbook = match sheets {
            Sheets::Xlsx(workbook) => workbook,
            _ => {
                return Err(StockMergeError::Config(
                    "Only XLSX format is supported".to_string(),
                ))
            }
        };

        Ok(WorkbookParser { workbook })
    }

    /// 指定されたシートが存在することを確認
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - シートが存在する場合
    /// * `Err(StockMergeError::MissingSheet)` - シートが存在しない場合
    pub fn require_sheet(&self, name: &str) -> Result<(), StockMergeError> {
        if self.workbook.sheet_names().iter().any(|s| s == name) {
            Ok(())
        } else {
            Err(StockMergeError::MissingSheet {
                name: name.to_string(),
            })
        }
    }

    /// シートのセルデータを絶対位置のグリッドとして取得
    ///
    /// calamineの`Range`はデータの存在する矩形領域のみを返すため、
    /// 領域がA1から始まらないシートでは行・列インデックスがずれます。
    /// バナー行のスキップや固定列インデックスによる抽出を正しく行うため、
    /// 先頭に空行・空セルを補ってインデックスを絶対位置に揃えます。
    ///
    /// # 引数
    ///
    /// * `sheet_name` - 取得するシート名
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<Vec<CellValue>>)` - 行ごとのセル値（行0がシートの先頭行）
    /// * `Err(StockMergeError)` - パースエラーが発生した場合
    pub fn sheet_rows(&mut self, sheet_name: &str) -> Result<Vec<Vec<CellValue>>, StockMergeError> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|e| StockMergeError::Parse(e.into()))?;

        let (row_offset, col_offset) = match range.start() {
            Some((row, col)) => (row as usize, col as usize),
            None => (0, 0), // 空シート
        };

        let mut rows: Vec<Vec<CellValue>> = Vec::with_capacity(row_offset + range.height());

        // 領域より上の行は空行として補う
        for _ in 0..row_offset {
            rows.push(Vec::new());
        }

        for row in range.rows() {
            let mut cells: Vec<CellValue> = Vec::with_capacity(col_offset + row.len());

            // 領域より左の列は空セルとして補う
            for _ in 0..col_offset {
                cells.push(CellValue::Empty);
            }

            for cell in row {
                cells.push(convert_cell(cell));
            }

            rows.push(cells);
        }

        Ok(rows)
    }
}

/// calamineのセルデータを`CellValue`に変換
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::String(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        // 日付セルはシリアル値として扱う（本帳票では日付列は使用しない）
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::String(s.clone()),
        Data::DurationIso(s) => CellValue::String(s.clone()),
        Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        Data::Empty => CellValue::Empty,
    }
}

// ワークブック読み込みのテストは統合テスト（tests/）で実装します。
// 実際のXLSXファイルが必要なため、単体テストではなく統合テストとして実装します。
