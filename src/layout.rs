//! Sheet Layout Module
//!
//! 入力ワークブックの各シートの物理レイアウト（バナー行数、ヘッダー文字列、
//! 固定列インデックス）を定義するモジュール。
//!
//! 元帳票はヘッダー行の上に数行のバナー（タイトル・日付など）を持ち、
//! 一部の列はヘッダーセルが空のまま固定位置に置かれています。そのため
//! 商品コード列はヘッダー文字列の一致で特定し、数量などの無名列は
//! 列インデックスで特定します。

/// 店舗在庫シートのレイアウト
///
/// デフォルト値は元帳票のレイアウトを再現します:
/// バナー2行、商品コード列ヘッダー `Micro Category:`、
/// 数量は第13列（0始まり、ヘッダーセルは空）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockSheetLayout {
    /// ヘッダー行より上のバナー行数
    pub banner_rows: usize,

    /// 商品コード列を特定するヘッダー文字列（前後空白は無視して比較）
    pub item_code_header: String,

    /// 在庫数量の列インデックス（0始まり）
    pub qty_col: usize,
}

impl Default for StockSheetLayout {
    fn default() -> Self {
        Self {
            banner_rows: 2,
            item_code_header: "Micro Category:".to_string(),
            qty_col: 13,
        }
    }
}

/// マスターカタログシートのレイアウト
///
/// デフォルト値は元帳票のレイアウトを再現します:
/// バナー3行、商品コード列ヘッダー `Micro Category :`（在庫シートとは
/// 異なりコロンの前に空白あり）、バーコード・商品名・小売価格は
/// それぞれ第2・5・9列（0始まり、ヘッダーセルは空）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogLayout {
    /// ヘッダー行より上のバナー行数
    pub banner_rows: usize,

    /// 商品コード列を特定するヘッダー文字列（前後空白は無視して比較）
    pub item_code_header: String,

    /// バーコードの列インデックス（0始まり）
    pub barcode_col: usize,

    /// 商品名の列インデックス（0始まり）
    pub name_col: usize,

    /// 小売価格の列インデックス（0始まり）
    pub price_col: usize,
}

impl Default for CatalogLayout {
    fn default() -> Self {
        Self {
            banner_rows: 3,
            item_code_header: "Micro Category :".to_string(),
            barcode_col: 2,
            name_col: 5,
            price_col: 9,
        }
    }
}

/// 強制在庫シートのレイアウト
///
/// 強制在庫シートはバナーを持たず、先頭行がヘッダー行です。
/// 商品コード列と店舗列はいずれもヘッダー文字列で特定します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceInstockLayout {
    /// 商品コード列のヘッダー文字列
    pub item_header: String,

    /// 店舗列のヘッダー文字列
    pub store_header: String,
}

impl Default for ForceInstockLayout {
    fn default() -> Self {
        Self {
            item_header: "Item No".to_string(),
            store_header: "Store".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_layout_defaults() {
        let layout = StockSheetLayout::default();
        assert_eq!(layout.banner_rows, 2);
        assert_eq!(layout.item_code_header, "Micro Category:");
        assert_eq!(layout.qty_col, 13);
    }

    #[test]
    fn test_catalog_layout_defaults() {
        let layout = CatalogLayout::default();
        assert_eq!(layout.banner_rows, 3);
        // カタログのヘッダーはコロンの前に空白がある（元帳票の表記揺れ）
        assert_eq!(layout.item_code_header, "Micro Category :");
        assert_eq!(layout.barcode_col, 2);
        assert_eq!(layout.name_col, 5);
        assert_eq!(layout.price_col, 9);
    }

    #[test]
    fn test_force_layout_defaults() {
        let layout = ForceInstockLayout::default();
        assert_eq!(layout.item_header, "Item No");
        assert_eq!(layout.store_header, "Store");
    }
}
