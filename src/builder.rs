//! Builder Module
//!
//! Fluent Builder APIを提供し、`Processor`インスタンスを段階的に構築する。

use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::io::{BufWriter, Read, Seek, Write};
use tracing::info;

use crate::api::{OutputFormat, StoreSheet};
use crate::consolidate::consolidate;
use crate::error::StockMergeError;
use crate::layout::{CatalogLayout, ForceInstockLayout, StockSheetLayout};
use crate::output::OutputFormatter;
use crate::parser::{extract_catalog, extract_force_rows, extract_stock_records, WorkbookParser};
use crate::security::{self, SecurityConfig};
use crate::types::StockRecord;

/// 統合処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ProcessorConfig {
    /// 店舗在庫シートのリスト（統合結果の出力順を決める）
    pub store_sheets: Vec<StoreSheet>,

    /// マスターカタログのシート名
    pub catalog_sheet: String,

    /// 強制在庫シートのシート名（Noneの場合は強制在庫を適用しない）
    pub force_instock_sheet: Option<String>,

    /// 在庫ありと判定する最小数量
    pub stock_threshold: f64,

    /// 店舗ラベルから正規化店舗名への対応表
    pub store_aliases: Vec<(String, String)>,

    /// 店舗在庫シートのレイアウト
    pub stock_layout: StockSheetLayout,

    /// カタログシートのレイアウト
    pub catalog_layout: CatalogLayout,

    /// 強制在庫シートのレイアウト
    pub force_layout: ForceInstockLayout,

    /// 出力フォーマット
    pub output_format: OutputFormat,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            store_sheets: vec![
                StoreSheet::new("زمالك"),
                StoreSheet::new("معادي"),
                StoreSheet::new("جاردن"),
            ],
            catalog_sheet: "دليل الاصناف EN".to_string(),
            force_instock_sheet: Some("force instock".to_string()),
            stock_threshold: 1.0,
            store_aliases: vec![
                ("معادي".to_string(), "Maadi".to_string()),
                ("MDI".to_string(), "Maadi".to_string()),
                ("زمالك".to_string(), "Zamalek".to_string()),
                ("ZMK".to_string(), "Zamalek".to_string()),
                ("جاردن".to_string(), "Garden 8".to_string()),
                ("GRD".to_string(), "Garden 8".to_string()),
            ],
            stock_layout: StockSheetLayout::default(),
            catalog_layout: CatalogLayout::default(),
            force_layout: ForceInstockLayout::default(),
            output_format: OutputFormat::Xlsx,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Processor`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、デフォルトのまま
/// `build()`すると元帳票のレイアウト（3店舗シート・カタログ・強制在庫）を
/// 処理する構成になります。
///
/// # 使用例
///
/// ```rust,no_run
/// use stockmerge::{OutputFormat, ProcessorBuilder};
///
/// # fn main() -> Result<(), stockmerge::StockMergeError> {
/// let processor = ProcessorBuilder::new()
///     .with_stock_threshold(2.0)
///     .with_output_format(OutputFormat::Csv)
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ProcessorBuilder {
    /// 内部設定（構築中）
    config: ProcessorConfig,
}

impl Default for ProcessorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessorBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - 店舗シート: `زمالك`, `معادي`, `جاردن`（ラベル = シート名）
    /// - カタログシート: `دليل الاصناف EN`
    /// - 強制在庫シート: `force instock`
    /// - 在庫しきい値: 1.0（数量1以上で在庫あり）
    /// - 店舗エイリアス: Maadi / Zamalek / Garden 8 への6対応
    /// - 出力フォーマット: XLSX
    pub fn new() -> Self {
        Self {
            config: ProcessorConfig::default(),
        }
    }

    /// 店舗在庫シートを追加する
    ///
    /// デフォルトの3シートに加えて処理対象を追加します。デフォルトを
    /// 置き換える場合は`with_store_sheets`を使用してください。
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use stockmerge::{ProcessorBuilder, StoreSheet};
    ///
    /// let builder = ProcessorBuilder::new()
    ///     .with_store_sheet(StoreSheet::new("October").with_label("OCT"));
    /// ```
    pub fn with_store_sheet(mut self, sheet: StoreSheet) -> Self {
        self.config.store_sheets.push(sheet);
        self
    }

    /// 店舗在庫シートのリストを置き換える
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use stockmerge::{ProcessorBuilder, StoreSheet};
    ///
    /// let builder = ProcessorBuilder::new()
    ///     .with_store_sheets(vec![
    ///         StoreSheet::new("Store A"),
    ///         StoreSheet::new("Store B"),
    ///     ]);
    /// ```
    pub fn with_store_sheets(mut self, sheets: Vec<StoreSheet>) -> Self {
        self.config.store_sheets = sheets;
        self
    }

    /// マスターカタログのシート名を指定する
    pub fn with_catalog_sheet(mut self, name: impl Into<String>) -> Self {
        self.config.catalog_sheet = name.into();
        self
    }

    /// 強制在庫シートのシート名を指定する
    pub fn with_force_instock_sheet(mut self, name: impl Into<String>) -> Self {
        self.config.force_instock_sheet = Some(name.into());
        self
    }

    /// 強制在庫シートを処理しない
    ///
    /// 強制在庫シートを持たないワークブックを処理する場合に使用します。
    pub fn without_force_instock(mut self) -> Self {
        self.config.force_instock_sheet = None;
        self
    }

    /// 在庫ありと判定する最小数量を指定する
    ///
    /// # 引数
    ///
    /// * `threshold: f64`: 最小数量（デフォルト: 1.0）
    ///
    /// # 制約
    ///
    /// * 有限かつ非負でなければならない
    /// * 制約違反の場合、`build()`時に`StockMergeError::Config`を返す
    pub fn with_stock_threshold(mut self, threshold: f64) -> Self {
        self.config.stock_threshold = threshold;
        self
    }

    /// 店舗エイリアスを追加する
    ///
    /// # 引数
    ///
    /// * `raw`: シート名・強制在庫シートに現れる生の店舗ラベル
    /// * `canonical`: 統合結果に出力する正規化店舗名
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use stockmerge::ProcessorBuilder;
    ///
    /// let builder = ProcessorBuilder::new()
    ///     .with_store_alias("DT", "Downtown");
    /// ```
    pub fn with_store_alias(
        mut self,
        raw: impl Into<String>,
        canonical: impl Into<String>,
    ) -> Self {
        self.config
            .store_aliases
            .push((raw.into(), canonical.into()));
        self
    }

    /// 店舗在庫シートのレイアウトを指定する
    pub fn with_stock_layout(mut self, layout: StockSheetLayout) -> Self {
        self.config.stock_layout = layout;
        self
    }

    /// カタログシートのレイアウトを指定する
    pub fn with_catalog_layout(mut self, layout: CatalogLayout) -> Self {
        self.config.catalog_layout = layout;
        self
    }

    /// 強制在庫シートのレイアウトを指定する
    pub fn with_force_layout(mut self, layout: ForceInstockLayout) -> Self {
        self.config.force_layout = layout;
        self
    }

    /// 出力フォーマットを指定する
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use stockmerge::{OutputFormat, ProcessorBuilder};
    ///
    /// let builder = ProcessorBuilder::new()
    ///     .with_output_format(OutputFormat::Json);
    /// ```
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    /// 設定を検証し、`Processor`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Processor)`: 設定が有効な場合、Processorインスタンス
    /// * `Err(StockMergeError::Config)`: 設定が無効な場合
    ///
    /// # 発生し得るエラー
    ///
    /// * 店舗シートが1つも指定されていない
    /// * シート名が空文字列
    /// * 店舗シート名が重複している
    /// * 在庫しきい値が負値または非有限値
    pub fn build(self) -> Result<Processor, StockMergeError> {
        // 1. 店舗シートの検証
        if self.config.store_sheets.is_empty() {
            return Err(StockMergeError::Config(
                "no store sheets configured".to_string(),
            ));
        }

        let mut seen_names: HashSet<&str> = HashSet::new();
        for sheet in &self.config.store_sheets {
            if sheet.name.trim().is_empty() {
                return Err(StockMergeError::Config(
                    "store sheet name must not be blank".to_string(),
                ));
            }
            if !seen_names.insert(sheet.name.as_str()) {
                return Err(StockMergeError::Config(format!(
                    "duplicate store sheet: '{}'",
                    sheet.name
                )));
            }
        }

        // 2. カタログ・強制在庫シート名の検証
        if self.config.catalog_sheet.trim().is_empty() {
            return Err(StockMergeError::Config(
                "catalog sheet name must not be blank".to_string(),
            ));
        }
        if let Some(ref name) = self.config.force_instock_sheet {
            if name.trim().is_empty() {
                return Err(StockMergeError::Config(
                    "force-instock sheet name must not be blank".to_string(),
                ));
            }
        }

        // 3. 在庫しきい値の検証
        if !self.config.stock_threshold.is_finite() || self.config.stock_threshold < 0.0 {
            return Err(StockMergeError::Config(format!(
                "invalid stock threshold: {}",
                self.config.stock_threshold
            )));
        }

        // 4. Processorインスタンス生成
        Ok(Processor::new(self.config))
    }
}

/// 統合処理のファサード
///
/// 在庫ワークブックを統合テーブルに変換するためのメインエントリーポイントです。
/// `ProcessorBuilder`を使用して構築された設定に基づいて処理を実行します。
///
/// # 使用例
///
/// ```rust,no_run
/// use stockmerge::ProcessorBuilder;
/// use std::fs::File;
///
/// # fn main() -> Result<(), stockmerge::StockMergeError> {
/// let processor = ProcessorBuilder::new().build()?;
/// let input = File::open("stock_report.xlsx")?;
/// let output = File::create("final_stock_data.xlsx")?;
/// processor.process(input, output)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Processor {
    /// 統合処理の設定
    config: ProcessorConfig,
}

impl Processor {
    pub(crate) fn new(config: ProcessorConfig) -> Self {
        Self { config }
    }

    /// 在庫ワークブックを統合テーブルに変換
    ///
    /// # 引数
    ///
    /// * `input` - 在庫ワークブックを読み込むためのリーダー（Read + Seekトレイトを実装）
    /// * `output` - 統合結果の出力先のライター（Writeトレイトを実装）
    ///
    /// # 処理フロー
    ///
    /// 1. 入力データをメモリに読み込み、セキュリティ制限を検証
    /// 2. 必須シートの存在確認
    /// 3. 各店舗シートを並列にパースし、在庫レコードを抽出
    /// 4. カタログシートと強制在庫シートをパース
    /// 5. 統合（強制在庫の適用、重複排除、左外部結合、店舗名の正規化）
    /// 6. 設定されたフォーマットで出力
    ///
    /// # 戻り値
    ///
    /// * `Ok(())` - 変換に成功した場合
    /// * `Err(StockMergeError)` - エラーが発生した場合
    pub fn process<R: Read + Seek, W: Write>(
        &self,
        mut input: R,
        mut output: W,
    ) -> Result<(), StockMergeError> {
        // 1. 入力データをメモリに読み込む（並列処理のため）
        let security_config = SecurityConfig::default();
        let mut buffer = Vec::new();
        let bytes_read = input.read_to_end(&mut buffer)?;

        if bytes_read as u64 > security_config.max_input_file_size {
            return Err(StockMergeError::SecurityViolation(format!(
                "Input file size exceeds maximum: {} bytes (max: {} bytes)",
                bytes_read, security_config.max_input_file_size
            )));
        }

        security::preflight_archive(&buffer, &security_config)?;

        // 2. 必須シートの存在確認
        let mut parser = WorkbookParser::from_buffer(buffer.clone())?;
        for sheet in &self.config.store_sheets {
            parser.require_sheet(&sheet.name)?;
        }
        parser.require_sheet(&self.config.catalog_sheet)?;
        if let Some(ref name) = self.config.force_instock_sheet {
            parser.require_sheet(name)?;
        }

        // 3. 各店舗シートのパースを並列化
        // 各シート処理でワークブックを再オープン（メモリ内のデータを使用）
        let per_sheet: Result<Vec<(usize, Vec<StockRecord>)>, StockMergeError> = self
            .config
            .store_sheets
            .par_iter()
            .enumerate()
            .map(|(sheet_idx, sheet)| {
                let mut parser = WorkbookParser::from_buffer(buffer.clone())?;
                let rows = parser.sheet_rows(&sheet.name)?;
                let records = extract_stock_records(
                    &sheet.name,
                    &rows,
                    &self.config.stock_layout,
                    &sheet.label,
                )?;
                Ok((sheet_idx, records))
            })
            .collect();

        // 結果を設定順にソート（並列処理の順序を保証）
        let mut per_sheet = per_sheet?;
        per_sheet.sort_by_key(|(idx, _)| *idx);
        let stock_records: Vec<StockRecord> = per_sheet
            .into_iter()
            .flat_map(|(_, records)| records)
            .collect();
        info!(
            sheets = self.config.store_sheets.len(),
            records = stock_records.len(),
            "extracted stock records"
        );

        // 4. カタログと強制在庫のパース
        let catalog_rows = parser.sheet_rows(&self.config.catalog_sheet)?;
        let catalog = extract_catalog(
            &self.config.catalog_sheet,
            &catalog_rows,
            &self.config.catalog_layout,
        )?;

        let force_rows = match self.config.force_instock_sheet {
            Some(ref name) => {
                let rows = parser.sheet_rows(name)?;
                extract_force_rows(name, &rows, &self.config.force_layout)?
            }
            None => Vec::new(),
        };

        // 5. 統合
        let aliases: HashMap<String, String> =
            self.config.store_aliases.iter().cloned().collect();
        let consolidated = consolidate(
            stock_records,
            &catalog,
            &force_rows,
            self.config.stock_threshold,
            &aliases,
        );
        info!(
            catalog_items = catalog.len(),
            force_rows = force_rows.len(),
            output_rows = consolidated.len(),
            "consolidation complete"
        );

        // 6. 出力
        let formatter = OutputFormatter::from_format(self.config.output_format);
        let mut writer = BufWriter::new(&mut output);
        formatter.render(&consolidated, &mut writer)?;
        writer.flush()?;

        Ok(())
    }

    /// 在庫ワークブックを統合し、結果をバイト列として返す
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use std::fs::File;
    /// use stockmerge::ProcessorBuilder;
    ///
    /// # fn main() -> Result<(), stockmerge::StockMergeError> {
    /// let processor = ProcessorBuilder::new().build()?;
    /// let input = File::open("stock_report.xlsx")?;
    /// let bytes = processor.process_to_buffer(input)?;
    /// std::fs::write("final_stock_data.xlsx", bytes)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn process_to_buffer<R: Read + Seek>(
        &self,
        input: R,
    ) -> Result<Vec<u8>, StockMergeError> {
        let mut buffer = Vec::new();
        self.process(input, &mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_processor_builder_defaults() {
        let builder = ProcessorBuilder::new();
        assert_eq!(builder.config.store_sheets.len(), 3);
        assert_eq!(builder.config.store_sheets[0].name, "زمالك");
        assert_eq!(builder.config.catalog_sheet, "دليل الاصناف EN");
        assert_eq!(
            builder.config.force_instock_sheet.as_deref(),
            Some("force instock")
        );
        assert_eq!(builder.config.stock_threshold, 1.0);
        assert_eq!(builder.config.store_aliases.len(), 6);
        assert_eq!(builder.config.output_format, OutputFormat::Xlsx);
    }

    #[test]
    fn test_with_store_sheet_appends() {
        let builder = ProcessorBuilder::new().with_store_sheet(StoreSheet::new("October"));
        assert_eq!(builder.config.store_sheets.len(), 4);
        assert_eq!(builder.config.store_sheets[3].name, "October");
    }

    #[test]
    fn test_with_store_sheets_replaces() {
        let builder =
            ProcessorBuilder::new().with_store_sheets(vec![StoreSheet::new("Only Store")]);
        assert_eq!(builder.config.store_sheets.len(), 1);
    }

    #[test]
    fn test_without_force_instock() {
        let builder = ProcessorBuilder::new().without_force_instock();
        assert!(builder.config.force_instock_sheet.is_none());
    }

    #[test]
    fn test_with_store_alias_appends() {
        let builder = ProcessorBuilder::new().with_store_alias("DT", "Downtown");
        assert_eq!(builder.config.store_aliases.len(), 7);
        assert_eq!(
            builder.config.store_aliases[6],
            ("DT".to_string(), "Downtown".to_string())
        );
    }

    #[test]
    fn test_build_success() {
        let result = ProcessorBuilder::new().build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_build_no_store_sheets() {
        let result = ProcessorBuilder::new().with_store_sheets(Vec::new()).build();
        match result {
            Err(StockMergeError::Config(msg)) => {
                assert!(msg.contains("no store sheets"));
            }
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_build_blank_store_sheet_name() {
        let result = ProcessorBuilder::new()
            .with_store_sheets(vec![StoreSheet::new("  ")])
            .build();
        assert!(matches!(result, Err(StockMergeError::Config(_))));
    }

    #[test]
    fn test_build_duplicate_store_sheet() {
        let result = ProcessorBuilder::new()
            .with_store_sheet(StoreSheet::new("زمالك"))
            .build();
        match result {
            Err(StockMergeError::Config(msg)) => {
                assert!(msg.contains("duplicate store sheet"));
            }
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_build_invalid_threshold() {
        let result = ProcessorBuilder::new().with_stock_threshold(-1.0).build();
        assert!(matches!(result, Err(StockMergeError::Config(_))));

        let result = ProcessorBuilder::new()
            .with_stock_threshold(f64::NAN)
            .build();
        assert!(matches!(result, Err(StockMergeError::Config(_))));
    }

    #[test]
    fn test_build_blank_catalog_sheet() {
        let result = ProcessorBuilder::new().with_catalog_sheet("").build();
        assert!(matches!(result, Err(StockMergeError::Config(_))));
    }
}
