//! Parser Module
//!
//! calamineを使用したExcelファイル解析の基礎実装。
//! ワークブックの読み込みと、各シートからのレコード抽出を提供します。

mod sheets;
mod workbook;

pub(crate) use sheets::{extract_catalog, extract_force_rows, extract_stock_records};
pub(crate) use workbook::WorkbookParser;
