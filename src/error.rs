//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// stockmergeクレート全体で使用するエラー型
///
/// このエラー型は、在庫ワークブックの読み込み、解析、統合、出力処理中に
/// 発生するすべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ファイル読み込み失敗など）
/// - `Parse`: Excelファイルの解析中に発生したエラー（calamine由来）
/// - `Write`: 統合結果のXLSX出力中に発生したエラー（rust_xlsxwriter由来）
/// - `Json`: JSON出力のシリアライズに失敗したエラー（serde_json由来）
/// - `Zip`: XLSXファイル（ZIPアーカイブ）の事前検査中に発生したエラー
/// - `Config`: 設定の検証に失敗したエラー（店舗シート未指定など）
/// - `MissingSheet`: 必須シートがワークブックに存在しないエラー
/// - `MissingColumn`: ヘッダー行から必須列を特定できなかったエラー
/// - `SecurityViolation`: セキュリティ制限に違反したエラー
///
/// # 使用例
///
/// ```rust,no_run
/// use stockmerge::StockMergeError;
/// use std::fs::File;
///
/// fn read_workbook(path: &str) -> Result<(), StockMergeError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     // ... 処理 ...
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum StockMergeError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Excelファイルの解析中に発生したエラー
    ///
    /// calamineクレートがワークブックを解析する際に発生したエラーです。
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    #[error("Failed to parse Excel file: {0}")]
    Parse(#[from] calamine::Error),

    /// 統合結果のXLSX出力中に発生したエラー
    ///
    /// `#[from]`属性により、`rust_xlsxwriter::XlsxError`から自動的に変換されます。
    #[error("Failed to write output workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    /// JSON出力のシリアライズエラー
    #[error("Failed to serialize JSON output: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIPアーカイブの事前検査エラー
    ///
    /// XLSXファイル（ZIPアーカイブ）の事前検査中に発生したエラーです。
    #[error("ZIP archive error: {0}")]
    Zip(String),

    /// 設定の検証に失敗したエラー
    ///
    /// `ProcessorBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。例えば、店舗シートが1つも指定されていない場合や、
    /// 在庫しきい値が負値・非有限値の場合などです。
    #[error("Configuration error: {0}")]
    Config(String),

    /// 必須シートがワークブックに存在しないエラー
    ///
    /// 店舗シート、カタログシート、強制在庫シートのいずれかが
    /// 入力ワークブックに見つからない場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use stockmerge::StockMergeError;
    ///
    /// let error = StockMergeError::MissingSheet {
    ///     name: "force instock".to_string(),
    /// };
    ///
    /// println!("{}", error);
    /// // 出力: "Sheet 'force instock' not found in workbook"
    /// ```
    #[error("Sheet '{name}' not found in workbook")]
    MissingSheet {
        /// 見つからなかったシート名
        name: String,
    },

    /// ヘッダー行から必須列を特定できなかったエラー
    ///
    /// バナー行をスキップした後のヘッダー行に、レイアウトで指定された
    /// ヘッダー文字列が存在しない場合に発生します。
    #[error("Column '{header}' not found on sheet '{sheet}'")]
    MissingColumn {
        /// エラーが発生したシート名
        sheet: String,
        /// 見つからなかったヘッダー文字列
        header: String,
    },

    /// セキュリティ制限に違反したエラー
    ///
    /// ZIP bomb攻撃、パストラバーサル攻撃、ファイルサイズ制限などの
    /// セキュリティ制限に違反した場合に発生します。
    #[error("Security violation: {0}")]
    SecurityViolation(String),
}
