//! Sheet Extraction
//!
//! 正規化済みセルグリッドから各シート種別のレコードを抽出するモジュール。
//! ワークブックI/Oから分離されているため、レイアウト解決のロジックは
//! 実ファイルなしで単体テストできます。

use tracing::warn;

use crate::error::StockMergeError;
use crate::layout::{CatalogLayout, ForceInstockLayout, StockSheetLayout};
use crate::types::{CatalogEntry, CatalogIndex, CellValue, ForceRow, StockRecord};

/// ヘッダー行から指定されたヘッダー文字列の列インデックスを解決
///
/// 比較は前後の空白を除去した完全一致で行います（大文字小文字は区別）。
fn find_header_col(header_row: &[CellValue], header: &str) -> Option<usize> {
    header_row.iter().position(|cell| match cell {
        CellValue::String(s) => s.trim() == header.trim(),
        _ => false,
    })
}

/// ヘッダー行を取得し、商品コード列を解決
///
/// バナー行の直後の行をヘッダー行として扱います。シートが短すぎて
/// ヘッダー行が存在しない場合も`MissingColumn`を返します。
fn resolve_code_col(
    sheet_name: &str,
    rows: &[Vec<CellValue>],
    banner_rows: usize,
    header: &str,
) -> Result<usize, StockMergeError> {
    rows.get(banner_rows)
        .and_then(|header_row| find_header_col(header_row, header))
        .ok_or_else(|| StockMergeError::MissingColumn {
            sheet: sheet_name.to_string(),
            header: header.to_string(),
        })
}

/// 店舗在庫シートからレコードを抽出
///
/// バナー行をスキップし、ヘッダー文字列で商品コード列を特定した後、
/// データ行から`(商品コード, 在庫数量)`のペアを読み取ります。
///
/// # 行の扱い
///
/// * 商品コードまたは数量セルが空の行は黙って除外します（dropnaに相当）
/// * 数量セルに値があるが数値として解釈できない行は、警告を出して除外します
///
/// # 引数
///
/// * `sheet_name` - シート名（エラー報告・ログ用）
/// * `rows` - 絶対位置に正規化されたセルグリッド
/// * `layout` - 店舗在庫シートのレイアウト
/// * `store_label` - レコードに付与する店舗ラベル
pub(crate) fn extract_stock_records(
    sheet_name: &str,
    rows: &[Vec<CellValue>],
    layout: &StockSheetLayout,
    store_label: &str,
) -> Result<Vec<StockRecord>, StockMergeError> {
    let code_col = resolve_code_col(sheet_name, rows, layout.banner_rows, &layout.item_code_header)?;

    let mut records = Vec::new();
    for (row_idx, row) in rows.iter().enumerate().skip(layout.banner_rows + 1) {
        let item_code = match row.get(code_col).and_then(CellValue::as_item_code) {
            Some(code) => code,
            None => continue,
        };

        let qty_cell = row.get(layout.qty_col).unwrap_or(&CellValue::Empty);
        if qty_cell.is_empty() {
            continue;
        }

        let balance_qty = match qty_cell.as_number() {
            Some(qty) => qty,
            None => {
                warn!(
                    sheet = sheet_name,
                    row = row_idx + 1,
                    item_code = %item_code,
                    "non-numeric quantity; row skipped"
                );
                continue;
            }
        };

        records.push(StockRecord {
            store_label: store_label.to_string(),
            item_code,
            balance_qty,
            forced: false,
        });
    }

    Ok(records)
}

/// マスターカタログシートから商品索引を抽出
///
/// バナー行をスキップし、ヘッダー文字列で商品コード列を特定した後、
/// バーコード・商品名・小売価格を固定列インデックスから読み取ります。
/// 商品コードのない行は除外され、重複する商品コードは最初の出現が
/// 優先されます。
pub(crate) fn extract_catalog(
    sheet_name: &str,
    rows: &[Vec<CellValue>],
    layout: &CatalogLayout,
) -> Result<CatalogIndex, StockMergeError> {
    let code_col = resolve_code_col(sheet_name, rows, layout.banner_rows, &layout.item_code_header)?;

    let mut index = CatalogIndex::new();
    for row in rows.iter().skip(layout.banner_rows + 1) {
        let item_code = match row.get(code_col).and_then(CellValue::as_item_code) {
            Some(code) => code,
            None => continue,
        };

        let barcode = row.get(layout.barcode_col).and_then(CellValue::as_text);
        let item_name = row.get(layout.name_col).and_then(CellValue::as_text);
        let retail_price = row.get(layout.price_col).and_then(CellValue::as_number);

        index.insert_first_wins(CatalogEntry {
            item_code,
            barcode,
            item_name,
            retail_price,
        });
    }

    Ok(index)
}

/// 強制在庫シートから強制行を抽出
///
/// 先頭行をヘッダー行として扱い、商品コード列と店舗列をヘッダー文字列で
/// 特定します。どちらかの値が欠けている行は警告を出して除外します。
pub(crate) fn extract_force_rows(
    sheet_name: &str,
    rows: &[Vec<CellValue>],
    layout: &ForceInstockLayout,
) -> Result<Vec<ForceRow>, StockMergeError> {
    let header_row = rows.first().ok_or_else(|| StockMergeError::MissingColumn {
        sheet: sheet_name.to_string(),
        header: layout.item_header.clone(),
    })?;

    let item_col = find_header_col(header_row, &layout.item_header).ok_or_else(|| {
        StockMergeError::MissingColumn {
            sheet: sheet_name.to_string(),
            header: layout.item_header.clone(),
        }
    })?;
    let store_col = find_header_col(header_row, &layout.store_header).ok_or_else(|| {
        StockMergeError::MissingColumn {
            sheet: sheet_name.to_string(),
            header: layout.store_header.clone(),
        }
    })?;

    let mut force_rows = Vec::new();
    for (row_idx, row) in rows.iter().enumerate().skip(1) {
        let item_code = row.get(item_col).and_then(CellValue::as_item_code);
        let store_label = row.get(store_col).and_then(CellValue::as_text);

        match (item_code, store_label) {
            (Some(item_code), Some(store_label)) => {
                force_rows.push(ForceRow {
                    item_code,
                    store_label,
                });
            }
            (None, None) => continue, // 完全な空行
            _ => {
                warn!(
                    sheet = sheet_name,
                    row = row_idx + 1,
                    "incomplete force-instock row; row skipped"
                );
            }
        }
    }

    Ok(force_rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> CellValue {
        CellValue::String(value.to_string())
    }

    fn n(value: f64) -> CellValue {
        CellValue::Number(value)
    }

    /// バナー2行 + ヘッダー行 + データ行の在庫シートを構築
    fn stock_rows(data: Vec<Vec<CellValue>>) -> Vec<Vec<CellValue>> {
        let mut rows = vec![
            vec![s("The Grocer - Stock Report")],
            vec![],
            stock_header_row(),
        ];
        rows.extend(data);
        rows
    }

    fn stock_header_row() -> Vec<CellValue> {
        let mut header = vec![s("Micro Category:")];
        header.resize(13, CellValue::Empty);
        header.push(CellValue::Empty); // 数量列（第13列）のヘッダーセルは空
        header
    }

    fn stock_data_row(code: CellValue, qty: CellValue) -> Vec<CellValue> {
        let mut row = vec![code];
        row.resize(13, CellValue::Empty);
        row.push(qty);
        row
    }

    #[test]
    fn test_extract_stock_records_basic() {
        let rows = stock_rows(vec![
            stock_data_row(n(1001.0), n(4.0)),
            stock_data_row(n(1002.0), n(0.0)),
        ]);

        let layout = StockSheetLayout::default();
        let records = extract_stock_records("زمالك", &rows, &layout, "زمالك").unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].item_code, "1001");
        assert_eq!(records[0].balance_qty, 4.0);
        assert_eq!(records[0].store_label, "زمالك");
        assert!(!records[0].forced);
        assert_eq!(records[1].item_code, "1002");
        assert_eq!(records[1].balance_qty, 0.0);
    }

    #[test]
    fn test_extract_stock_records_drops_incomplete_rows() {
        let rows = stock_rows(vec![
            stock_data_row(CellValue::Empty, n(3.0)), // コードなし
            stock_data_row(n(1003.0), CellValue::Empty), // 数量なし
            stock_data_row(n(1004.0), n(2.0)),
        ]);

        let layout = StockSheetLayout::default();
        let records = extract_stock_records("معادي", &rows, &layout, "معادي").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item_code, "1004");
    }

    #[test]
    fn test_extract_stock_records_skips_non_numeric_quantity() {
        let rows = stock_rows(vec![
            stock_data_row(n(1005.0), s("n/a")),
            stock_data_row(n(1006.0), s(" 7 ")), // 数値文字列はパース可能
        ]);

        let layout = StockSheetLayout::default();
        let records = extract_stock_records("جاردن", &rows, &layout, "جاردن").unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].item_code, "1006");
        assert_eq!(records[0].balance_qty, 7.0);
    }

    #[test]
    fn test_extract_stock_records_missing_header() {
        let rows = vec![vec![s("banner")], vec![], vec![s("Wrong Header")]];

        let layout = StockSheetLayout::default();
        let result = extract_stock_records("زمالك", &rows, &layout, "زمالك");

        match result {
            Err(StockMergeError::MissingColumn { sheet, header }) => {
                assert_eq!(sheet, "زمالك");
                assert_eq!(header, "Micro Category:");
            }
            _ => panic!("Expected MissingColumn error"),
        }
    }

    #[test]
    fn test_extract_stock_records_empty_sheet() {
        let rows: Vec<Vec<CellValue>> = Vec::new();

        let layout = StockSheetLayout::default();
        let result = extract_stock_records("زمالك", &rows, &layout, "زمالك");
        assert!(matches!(
            result,
            Err(StockMergeError::MissingColumn { .. })
        ));
    }

    /// バナー3行 + ヘッダー行 + データ行のカタログシートを構築
    fn catalog_rows(data: Vec<Vec<CellValue>>) -> Vec<Vec<CellValue>> {
        let mut header = vec![s("Micro Category :")];
        header.resize(10, CellValue::Empty);

        let mut rows = vec![
            vec![s("The Grocer - Item Guide")],
            vec![],
            vec![],
            header,
        ];
        rows.extend(data);
        rows
    }

    fn catalog_data_row(
        code: CellValue,
        barcode: CellValue,
        name: CellValue,
        price: CellValue,
    ) -> Vec<CellValue> {
        let mut row = vec![code, CellValue::Empty, barcode];
        row.resize(5, CellValue::Empty);
        row.push(name);
        row.resize(9, CellValue::Empty);
        row.push(price);
        row
    }

    #[test]
    fn test_extract_catalog_basic() {
        let rows = catalog_rows(vec![catalog_data_row(
            n(1001.0),
            n(6221001.0),
            s("Olive Oil 1L"),
            n(250.5),
        )]);

        let layout = CatalogLayout::default();
        let catalog = extract_catalog("دليل الاصناف EN", &rows, &layout).unwrap();

        assert_eq!(catalog.len(), 1);
        let entry = catalog.get("1001").unwrap();
        assert_eq!(entry.barcode.as_deref(), Some("6221001"));
        assert_eq!(entry.item_name.as_deref(), Some("Olive Oil 1L"));
        assert_eq!(entry.retail_price, Some(250.5));
    }

    #[test]
    fn test_extract_catalog_partial_entry() {
        // バーコード・価格が欠けていてもエントリは保持される
        let rows = catalog_rows(vec![catalog_data_row(
            s("AB-12"),
            CellValue::Empty,
            s("Soap Bar"),
            CellValue::Empty,
        )]);

        let layout = CatalogLayout::default();
        let catalog = extract_catalog("دليل الاصناف EN", &rows, &layout).unwrap();

        let entry = catalog.get("AB-12").unwrap();
        assert_eq!(entry.barcode, None);
        assert_eq!(entry.item_name.as_deref(), Some("Soap Bar"));
        assert_eq!(entry.retail_price, None);
    }

    #[test]
    fn test_extract_catalog_duplicate_codes_first_wins() {
        let rows = catalog_rows(vec![
            catalog_data_row(n(1001.0), n(111.0), s("First"), n(10.0)),
            catalog_data_row(n(1001.0), n(222.0), s("Second"), n(20.0)),
        ]);

        let layout = CatalogLayout::default();
        let catalog = extract_catalog("دليل الاصناف EN", &rows, &layout).unwrap();

        assert_eq!(catalog.len(), 1);
        assert_eq!(
            catalog.get("1001").unwrap().item_name.as_deref(),
            Some("First")
        );
    }

    #[test]
    fn test_extract_force_rows_basic() {
        let rows = vec![
            vec![s("Item No"), s("Store")],
            vec![n(1001.0), s("زمالك")],
            vec![s(" 1002 "), s("GRD")],
        ];

        let layout = ForceInstockLayout::default();
        let force_rows = extract_force_rows("force instock", &rows, &layout).unwrap();

        assert_eq!(force_rows.len(), 2);
        assert_eq!(force_rows[0].item_code, "1001");
        assert_eq!(force_rows[0].store_label, "زمالك");
        assert_eq!(force_rows[1].item_code, "1002");
        assert_eq!(force_rows[1].store_label, "GRD");
    }

    #[test]
    fn test_extract_force_rows_skips_incomplete() {
        let rows = vec![
            vec![s("Item No"), s("Store")],
            vec![n(1001.0), CellValue::Empty], // 店舗なし
            vec![CellValue::Empty, CellValue::Empty], // 空行
            vec![n(1002.0), s("MDI")],
        ];

        let layout = ForceInstockLayout::default();
        let force_rows = extract_force_rows("force instock", &rows, &layout).unwrap();

        assert_eq!(force_rows.len(), 1);
        assert_eq!(force_rows[0].item_code, "1002");
    }

    #[test]
    fn test_extract_force_rows_header_order_independent() {
        // 列順が入れ替わっていてもヘッダー文字列で解決できる
        let rows = vec![
            vec![s("Store"), s("Item No")],
            vec![s("ZMK"), n(1003.0)],
        ];

        let layout = ForceInstockLayout::default();
        let force_rows = extract_force_rows("force instock", &rows, &layout).unwrap();

        assert_eq!(force_rows.len(), 1);
        assert_eq!(force_rows[0].item_code, "1003");
        assert_eq!(force_rows[0].store_label, "ZMK");
    }

    #[test]
    fn test_extract_force_rows_missing_column() {
        let rows = vec![vec![s("Item No"), s("Branch")]];

        let layout = ForceInstockLayout::default();
        let result = extract_force_rows("force instock", &rows, &layout);

        match result {
            Err(StockMergeError::MissingColumn { sheet, header }) => {
                assert_eq!(sheet, "force instock");
                assert_eq!(header, "Store");
            }
            _ => panic!("Expected MissingColumn error"),
        }
    }
}
