//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use std::collections::HashMap;

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum CellValue {
    /// 数値（f64）
    Number(f64),

    /// 文字列
    String(String),

    /// 論理値
    Bool(bool),

    /// エラー値（例: #DIV/0!）
    Error(String),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 値を正規化済み商品コードとして取得
    ///
    /// Excelは商品コードを浮動小数点数として格納することが多いため、
    /// 整数値の数値セルは小数部なしで文字列化します（`12345.0 → "12345"`）。
    /// 文字列セルは前後の空白を除去します。空文字列・論理値・エラー値・
    /// 空セルは`None`を返します。
    ///
    /// 在庫シート・カタログシート・強制在庫シートのすべてで同じ正規化を
    /// 適用することで、結合キーの一貫性を保証します。
    pub fn as_item_code(&self) -> Option<String> {
        match self {
            CellValue::Number(n) => Some(format_number(*n)),
            CellValue::String(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            _ => None,
        }
    }

    /// 値をテキストとして取得（バーコード・商品名用）
    ///
    /// 正規化規則は`as_item_code`と同一です。バーコードも数値セルとして
    /// 格納されるため、整数値は小数部なしで文字列化します。
    pub fn as_text(&self) -> Option<String> {
        self.as_item_code()
    }

    /// 値を数値として取得
    ///
    /// 数値セルはそのまま、数値として解釈可能な文字列セルはパースして
    /// 返します。それ以外は`None`を返します。
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }
}

/// 数値を文字列化（整数値は小数部なし）
///
/// `i64`で安全に表現できる範囲を超える値は、f64の自然な表示形式に
/// フォールバックします。
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// 店舗在庫シートから抽出された1レコード
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct StockRecord {
    /// 店舗ラベル（エイリアス変換前の生値）
    pub store_label: String,

    /// 正規化済み商品コード
    pub item_code: String,

    /// 在庫数量
    pub balance_qty: f64,

    /// 強制在庫レコードかどうか
    ///
    /// 強制在庫レコードは在庫しきい値に関係なく在庫ありとして扱われます。
    pub forced: bool,
}

/// マスターカタログの1エントリ
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CatalogEntry {
    /// 正規化済み商品コード
    pub item_code: String,

    /// バーコード
    pub barcode: Option<String>,

    /// 商品名
    pub item_name: Option<String>,

    /// 小売価格
    pub retail_price: Option<f64>,
}

/// 商品コードからカタログエントリへの索引
///
/// 左外部結合のセマンティクスに合わせて、重複する商品コードは
/// 最初の出現が優先されます（first-wins）。
#[derive(Debug, Clone, Default)]
pub(crate) struct CatalogIndex {
    entries: HashMap<String, CatalogEntry>,
}

impl CatalogIndex {
    /// 空の索引を生成
    pub fn new() -> Self {
        Self::default()
    }

    /// エントリを登録（既存の商品コードは上書きしない）
    pub fn insert_first_wins(&mut self, entry: CatalogEntry) {
        self.entries
            .entry(entry.item_code.clone())
            .or_insert(entry);
    }

    /// 商品コードでエントリを検索
    pub fn get(&self, item_code: &str) -> Option<&CatalogEntry> {
        self.entries.get(item_code)
    }

    /// 商品コードが登録されているかを判定
    pub fn contains(&self, item_code: &str) -> bool {
        self.entries.contains_key(item_code)
    }

    /// 登録エントリ数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 索引が空かどうかを判定
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 強制在庫シートの1行
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ForceRow {
    /// 正規化済み商品コード
    pub item_code: String,

    /// 店舗ラベル（エイリアス変換前の生値）
    pub store_label: String,
}
