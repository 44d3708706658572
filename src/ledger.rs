//! Wallet ledger aggregation
//!
//! Two jobs: merge the wallet's transaction and accounting-entry streams into
//! one paginated history, and sum the independent balance categories into a
//! single summary. Both are read-only computations over a caller-supplied
//! snapshot of the stores.

use crate::stores::BalanceSource;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Monetary amount in base units (1 FROST = 100_000_000 units).
pub type Amount = i64;

/// Base units per coin.
pub const COIN: Amount = 100_000_000;

/// Render an amount as a decimal coin string with the full 8 fractional
/// digits, e.g. `750000000` -> `"7.50000000"`.
pub fn format_money(amount: Amount) -> String {
    let sign = if amount < 0 { "-" } else { "" };
    let abs = amount.unsigned_abs();
    format!("{}{}.{:08}", sign, abs / COIN as u64, abs % COIN as u64)
}

/// How a wallet transaction relates to the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxCategory {
    Send,
    Receive,
    Generate,
    Immature,
    Orphan,
}

impl TxCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TxCategory::Send => "send",
            TxCategory::Receive => "receive",
            TxCategory::Generate => "generate",
            TxCategory::Immature => "immature",
            TxCategory::Orphan => "orphan",
        }
    }
}

/// One wallet transaction as the ledger store reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub txid: String,
    pub address: String,
    pub category: TxCategory,
    pub amount: Amount,
    pub vout: u32,
    pub confirmations: i64,
    pub generated: bool,
    pub block_hash: String,
    pub block_index: u64,
    pub block_time: i64,
    pub time: i64,
    pub time_received: i64,
    /// Store-assigned insertion sequence; ties on `time` order by this.
    pub sequence: u64,
}

/// A non-transaction ledger adjustment (internal transfer bookkeeping),
/// interleaved with transactions in history views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountingEntry {
    pub account: String,
    pub other_account: String,
    pub comment: String,
    pub amount: Amount,
    pub time: i64,
    pub sequence: u64,
}

/// One row of merged wallet history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum LedgerRecord {
    Transaction(TransactionRecord),
    Entry(AccountingEntry),
}

impl LedgerRecord {
    fn order_key(&self) -> (i64, u64) {
        match self {
            LedgerRecord::Transaction(tx) => (tx.time, tx.sequence),
            LedgerRecord::Entry(entry) => (entry.time, entry.sequence),
        }
    }

    pub fn time(&self) -> i64 {
        self.order_key().0
    }
}

/// Merge two newest-first streams into one history window, oldest first.
///
/// Walks both streams from the newest end, interleaving on the store's
/// (time, sequence) order and stopping as soon as `offset + limit` rows are
/// accumulated, so deep histories are never fully traversed for shallow
/// windows. The window is clamped to the merged size; an offset past the end
/// yields an empty list, never an error.
pub fn merge_and_paginate(
    transactions: &[TransactionRecord],
    entries: &[AccountingEntry],
    offset: usize,
    limit: usize,
) -> Vec<LedgerRecord> {
    let wanted = offset.saturating_add(limit);
    let mut merged: Vec<LedgerRecord> = Vec::with_capacity(wanted.min(transactions.len() + entries.len()));

    let mut tx_iter = transactions.iter().peekable();
    let mut entry_iter = entries.iter().peekable();
    while merged.len() < wanted {
        // On a tie the transaction wins, matching the store's native order.
        let take_tx = match (tx_iter.peek(), entry_iter.peek()) {
            (Some(tx), Some(entry)) => (tx.time, tx.sequence) >= (entry.time, entry.sequence),
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => break,
        };
        if take_tx {
            merged.push(LedgerRecord::Transaction(tx_iter.next().cloned().unwrap()));
        } else {
            merged.push(LedgerRecord::Entry(entry_iter.next().cloned().unwrap()));
        }
    }

    // Clamp the window to what was actually merged.
    let from = offset.min(merged.len());
    let to = wanted.min(merged.len());
    debug!(
        merged = merged.len(),
        from, to, "ledger window after merge"
    );

    let mut window: Vec<LedgerRecord> = merged.drain(from..to).collect();
    window.reverse(); // return oldest to newest
    window
}

/// The five independently queried balance categories. `total` deliberately
/// excludes unconfirmed and immature funds; they are reported separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    pub transparent: Amount,
    pub shielded: Amount,
    pub locked: Amount,
    pub unconfirmed: Amount,
    pub immature: Amount,
}

impl BalanceSummary {
    pub fn total(&self) -> Amount {
        self.transparent + self.shielded + self.locked
    }
}

/// The balance sources a summary draws from, one per category.
pub struct BalanceSources<'a> {
    pub transparent: &'a dyn BalanceSource,
    pub shielded: &'a dyn BalanceSource,
    pub locked: &'a dyn BalanceSource,
    pub unconfirmed: &'a dyn BalanceSource,
    pub immature: &'a dyn BalanceSource,
}

/// Query each category for the given address filter (empty = whole wallet) at
/// the given confirmation depth. Sources are trusted as returned; no
/// cross-validation.
pub fn balance_summary(sources: &BalanceSources<'_>, filter: &str, min_conf: u32) -> BalanceSummary {
    BalanceSummary {
        transparent: sources.transparent.balance(filter, min_conf),
        shielded: sources.shielded.balance(filter, min_conf),
        locked: sources.locked.balance(filter, min_conf),
        unconfirmed: sources.unconfirmed.balance(filter, min_conf),
        immature: sources.immature.balance(filter, min_conf),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(time: i64, sequence: u64) -> TransactionRecord {
        TransactionRecord {
            txid: format!("{:064x}", sequence),
            address: "addr".to_string(),
            category: TxCategory::Receive,
            amount: COIN,
            vout: 0,
            confirmations: 10,
            generated: false,
            block_hash: "00".repeat(32),
            block_index: 0,
            block_time: time,
            time,
            time_received: time,
            sequence,
        }
    }

    fn entry(time: i64, sequence: u64) -> AccountingEntry {
        AccountingEntry {
            account: "".to_string(),
            other_account: "savings".to_string(),
            comment: "move".to_string(),
            amount: -COIN,
            time,
            sequence,
        }
    }

    fn txs_desc(times: &[(i64, u64)]) -> Vec<TransactionRecord> {
        let mut v: Vec<_> = times.iter().map(|&(t, s)| tx(t, s)).collect();
        v.sort_by(|a, b| (b.time, b.sequence).cmp(&(a.time, a.sequence)));
        v
    }

    #[test]
    fn test_merge_interleaves_by_time() {
        let transactions = txs_desc(&[(100, 1), (300, 3)]);
        let entries = vec![entry(200, 2)];

        let merged = merge_and_paginate(&transactions, &entries, 0, 10);
        let times: Vec<i64> = merged.iter().map(|r| r.time()).collect();
        assert_eq!(times, vec![100, 200, 300]);
    }

    #[test]
    fn test_merge_tie_prefers_transaction() {
        let transactions = vec![tx(100, 5)];
        let entries = vec![entry(100, 5)];
        let merged = merge_and_paginate(&transactions, &entries, 0, 10);
        // Oldest-first output: the entry (losing the tie at the newest end)
        // comes first after reversal.
        assert!(matches!(merged[0], LedgerRecord::Entry(_)));
        assert!(matches!(merged[1], LedgerRecord::Transaction(_)));
    }

    #[test]
    fn test_window_is_oldest_first() {
        let transactions = txs_desc(&[(10, 1), (20, 2), (30, 3), (40, 4)]);
        let merged = merge_and_paginate(&transactions, &[], 0, 2);
        // The two newest records, in chronological order.
        let times: Vec<i64> = merged.iter().map(|r| r.time()).collect();
        assert_eq!(times, vec![30, 40]);
    }

    #[test]
    fn test_rewindowing_is_consistent() {
        let transactions = txs_desc(&[(10, 1), (20, 2), (30, 3), (50, 5)]);
        let entries = vec![entry(40, 4), entry(5, 0)];

        let full = merge_and_paginate(&transactions, &entries, 0, 6);
        for k in 0..=6 {
            // The k oldest records sit at the deepest offsets.
            let oldest = merge_and_paginate(&transactions, &entries, 6 - k, k);
            let newest = merge_and_paginate(&transactions, &entries, 0, 6 - k);
            let mut combined = oldest;
            combined.extend(newest);
            assert_eq!(combined, full, "split at {}", k);
        }
    }

    #[test]
    fn test_offset_beyond_total_is_empty() {
        let transactions = txs_desc(&[(10, 1), (20, 2)]);
        assert!(merge_and_paginate(&transactions, &[], 5, 10).is_empty());
    }

    #[test]
    fn test_no_records_yields_empty() {
        assert!(merge_and_paginate(&[], &[], 0, 200).is_empty());
    }

    #[test]
    fn test_limit_zero_is_empty() {
        let transactions = txs_desc(&[(10, 1)]);
        assert!(merge_and_paginate(&transactions, &[], 0, 0).is_empty());
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(0), "0.00000000");
        assert_eq!(format_money(COIN), "1.00000000");
        assert_eq!(format_money(7 * COIN + COIN / 2), "7.50000000");
        assert_eq!(format_money(-3 * COIN / 2), "-1.50000000");
        assert_eq!(format_money(1), "0.00000001");
    }

    #[test]
    fn test_balance_summary_total_excludes_pending() {
        use crate::stores::FixedBalance;
        let transparent = FixedBalance::new(5 * COIN);
        let shielded = FixedBalance::new(5 * COIN / 2);
        let locked = FixedBalance::new(0);
        let unconfirmed = FixedBalance::new(9 * COIN);
        let immature = FixedBalance::new(COIN);

        let summary = balance_summary(
            &BalanceSources {
                transparent: &transparent,
                shielded: &shielded,
                locked: &locked,
                unconfirmed: &unconfirmed,
                immature: &immature,
            },
            "",
            1,
        );
        assert_eq!(summary.total(), 15 * COIN / 2);
        assert_eq!(summary.unconfirmed, 9 * COIN);
        assert_eq!(summary.immature, COIN);
    }
}
