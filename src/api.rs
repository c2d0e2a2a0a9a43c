//! Public API Types
//!
//! 公開APIで使用する型を定義するモジュール。

use serde::Serialize;

/// 統合結果の出力フォーマット
///
/// 統合済み在庫テーブルの出力形式を指定します。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OutputFormat {
    /// XLSXワークブックとして出力（デフォルト）
    ///
    /// `Consolidated`という名前の単一ワークシートに、ヘッダー行と
    /// データ行を書き込みます。小売価格と在庫フラグは数値セルとして
    /// 出力されます。
    Xlsx,

    /// CSV形式で出力
    ///
    /// RFC 4180準拠のエスケープ処理を行います。ダブルクォート、改行、
    /// カンマを含むフィールドはダブルクォートで囲まれます。
    Csv,

    /// JSON形式で出力
    ///
    /// 生成時刻と行数を含むエンベロープオブジェクトとして出力します。
    ///
    /// # 出力例
    ///
    /// ```json
    /// {
    ///   "generated_at": "2025-11-20T09:00:00+00:00",
    ///   "row_count": 2,
    ///   "rows": [ ... ]
    /// }
    /// ```
    Json,
}

/// 店舗在庫シートの指定
///
/// 入力ワークブック内の店舗在庫シートを、シート名と店舗ラベルの
/// ペアで指定します。ラベルは統合結果の`Store`列の値となり、
/// エイリアス表（`ProcessorBuilder::with_store_alias`）によって
/// 正規化された店舗名に変換されます。
///
/// # 使用例
///
/// ```rust
/// use stockmerge::StoreSheet;
///
/// // ラベル省略時はシート名がそのままラベルになる
/// let sheet = StoreSheet::new("زمالك");
/// assert_eq!(sheet.label, "زمالك");
///
/// // シート名と異なるラベルを指定する場合
/// let sheet = StoreSheet::new("Sheet1").with_label("ZMK");
/// assert_eq!(sheet.label, "ZMK");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSheet {
    /// ワークブック内のシート名
    pub name: String,

    /// 店舗ラベル（統合結果の`Store`列の生値）
    pub label: String,
}

impl StoreSheet {
    /// 新しい店舗シート指定を生成（ラベル = シート名）
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let label = name.clone();
        Self { name, label }
    }

    /// 店舗ラベルを上書きする
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

/// 統合済み在庫テーブルの1行
///
/// パイプラインの最終出力となるフラットなレコードです。
/// 列順は出力ヘッダー `Store, Item Code, BarCode, Item Name,
/// Retail Price, STOCK` に対応します。
///
/// カタログに存在しない商品コードの行では、`barcode`・`item_name`・
/// `retail_price`が`None`となります（左外部結合のセマンティクス）。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsolidatedRow {
    /// 正規化済みの店舗名（例: "Zamalek"）
    #[serde(rename = "Store")]
    pub store: String,

    /// 正規化済みの商品コード
    #[serde(rename = "Item Code")]
    pub item_code: String,

    /// バーコード（カタログに存在しない場合はNone）
    #[serde(rename = "BarCode")]
    pub barcode: Option<String>,

    /// 商品名（カタログに存在しない場合はNone）
    #[serde(rename = "Item Name")]
    pub item_name: Option<String>,

    /// 小売価格（カタログに存在しない場合はNone）
    #[serde(rename = "Retail Price")]
    pub retail_price: Option<f64>,

    /// 在庫フラグ（1: 在庫あり、0: 在庫なし）
    #[serde(rename = "STOCK")]
    pub stock: u8,
}
