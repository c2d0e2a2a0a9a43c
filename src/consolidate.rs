//! Consolidation Module
//!
//! 抽出済みレコードを単一の統合テーブルへ変換するモジュール。
//! 強制在庫の適用、重複排除、カタログとの左外部結合、店舗名の正規化を
//! この順に行います。

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::api::ConsolidatedRow;
use crate::types::{CatalogIndex, ForceRow, StockRecord};

/// 在庫レコードを統合テーブルに変換
///
/// # 処理順序
///
/// 1. 強制在庫行を通常レコードの後ろに追加（カタログに存在するコードのみ）
/// 2. `(店舗, 商品コード)`の重複を排除し、最後の出現を残す
///    （強制在庫行が通常レコードを上書きする）
/// 3. 正規化済み商品コードでカタログと左外部結合
/// 4. 店舗ラベルをエイリアス表で正規化
///
/// # 引数
///
/// * `records` - 店舗在庫シートから抽出されたレコード（設定順）
/// * `catalog` - 商品索引
/// * `force_rows` - 強制在庫行
/// * `threshold` - 在庫ありと判定する最小数量
/// * `aliases` - 店舗ラベルから正規化店舗名への対応表
pub(crate) fn consolidate(
    mut records: Vec<StockRecord>,
    catalog: &CatalogIndex,
    force_rows: &[ForceRow],
    threshold: f64,
    aliases: &HashMap<String, String>,
) -> Vec<ConsolidatedRow> {
    // 1. 強制在庫の適用
    for force in force_rows {
        if !catalog.contains(&force.item_code) {
            warn!(
                item_code = %force.item_code,
                store = %force.store_label,
                "force-instock item not found in catalog; row ignored"
            );
            continue;
        }

        records.push(StockRecord {
            store_label: force.store_label.clone(),
            item_code: force.item_code.clone(),
            balance_qty: 1.0,
            forced: true,
        });
    }

    // 2. 重複排除（最後の出現を残す）
    let records = dedup_keep_last(records);

    // 3. 結合と正規化
    records
        .into_iter()
        .map(|record| {
            let stock = if record.forced || record.balance_qty >= threshold {
                1
            } else {
                0
            };

            let entry = catalog.get(&record.item_code);

            let store = match aliases.get(&record.store_label) {
                Some(canonical) => canonical.clone(),
                None => {
                    debug!(label = %record.store_label, "store label has no alias; passed through");
                    record.store_label.clone()
                }
            };

            ConsolidatedRow {
                store,
                item_code: record.item_code,
                barcode: entry.and_then(|e| e.barcode.clone()),
                item_name: entry.and_then(|e| e.item_name.clone()),
                retail_price: entry.and_then(|e| e.retail_price),
                stock,
            }
        })
        .collect()
}

/// `(店舗, 商品コード)`の重複を排除し、最後の出現を残す
///
/// 出力順は、生き残った（最後の）出現の元の順序を保持します。
fn dedup_keep_last(records: Vec<StockRecord>) -> Vec<StockRecord> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut kept: Vec<StockRecord> = Vec::with_capacity(records.len());

    for record in records.into_iter().rev() {
        let key = (record.store_label.clone(), record.item_code.clone());
        if seen.insert(key) {
            kept.push(record);
        }
    }

    kept.reverse();
    kept
}
