//! Collaborator interfaces consumed by the RPC core
//!
//! The core never touches wallet or chain state directly; every query goes
//! through one of these narrow traits, passed in explicitly per call. The
//! caller is responsible for holding a consistent snapshot (in the node, a
//! read lock over wallet and chain state) for the duration of a call, since
//! several operations issue multiple sequential queries.
//!
//! The `Memory*` implementations back the test suite and embedded uses; they
//! follow the locking pattern of a wallet-side address book.

use crate::crypto::KeyIdentity;
use crate::ledger::{AccountingEntry, Amount, TransactionRecord};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Read access to the wallet's public keys.
pub trait KeyStore {
    /// The stored serialized public key whose identity is `id`, if any.
    fn public_key_for(&self, id: &KeyIdentity) -> Option<Vec<u8>>;

    /// Whether the wallet holds the spending key for an (opaque) shielded
    /// payment address.
    fn has_spending_key(&self, address: &str) -> bool;

    /// Transparent addresses the wallet tracks, for per-address listings.
    fn addresses(&self) -> Vec<String> {
        Vec::new()
    }

    /// Shielded payment addresses the wallet tracks.
    fn shielded_addresses(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Read access to the wallet's known redeem scripts.
pub trait ScriptStore {
    fn redeem_script_for(&self, hash: &KeyIdentity) -> Option<Vec<u8>>;
}

/// A single balance category. The wallet exposes one of these per category;
/// categories are non-overlapping and each is trusted as returned.
pub trait BalanceSource {
    /// Balance for the given address, or the whole wallet when `filter` is
    /// empty, counting only outputs with at least `min_conf` confirmations.
    fn balance(&self, filter: &str, min_conf: u32) -> Amount;
}

/// Read access to the wallet's ordered ledger. Both sequences are newest
/// first by (time, sequence); the store assigns sequence numbers.
pub trait LedgerStore {
    fn ordered_transactions(&self) -> Vec<TransactionRecord>;
    fn ordered_accounting_entries(&self) -> Vec<AccountingEntry>;
}

/// The chain-tip accessor: the only piece of chain state the core reports.
pub trait ChainView {
    fn best_block_hash(&self) -> String;
    fn best_block_time(&self) -> i64;
}

/// In-memory key store keyed by key identity.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyStore {
    inner: Arc<RwLock<MemoryKeyStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryKeyStoreInner {
    keys: HashMap<KeyIdentity, Vec<u8>>,
    addresses: Vec<String>,
    spending_addresses: Vec<String>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a serialized public key under its identity.
    pub fn insert_key(&self, id: KeyIdentity, pubkey: Vec<u8>) {
        self.inner.write().keys.insert(id, pubkey);
    }

    /// Track a transparent address for per-address listings.
    pub fn insert_address(&self, address: String) {
        self.inner.write().addresses.push(address);
    }

    /// Track a shielded address the wallet can spend from.
    pub fn insert_spending_address(&self, address: String) {
        self.inner.write().spending_addresses.push(address);
    }
}

impl KeyStore for MemoryKeyStore {
    fn public_key_for(&self, id: &KeyIdentity) -> Option<Vec<u8>> {
        self.inner.read().keys.get(id).cloned()
    }

    fn has_spending_key(&self, address: &str) -> bool {
        self.inner
            .read()
            .spending_addresses
            .iter()
            .any(|a| a == address)
    }

    fn addresses(&self) -> Vec<String> {
        self.inner.read().addresses.clone()
    }

    fn shielded_addresses(&self) -> Vec<String> {
        self.inner.read().spending_addresses.clone()
    }
}

/// In-memory redeem-script store keyed by script hash.
#[derive(Debug, Clone, Default)]
pub struct MemoryScriptStore {
    inner: Arc<RwLock<HashMap<KeyIdentity, Vec<u8>>>>,
}

impl MemoryScriptStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_script(&self, hash: KeyIdentity, script: Vec<u8>) {
        self.inner.write().insert(hash, script);
    }
}

impl ScriptStore for MemoryScriptStore {
    fn redeem_script_for(&self, hash: &KeyIdentity) -> Option<Vec<u8>> {
        self.inner.read().get(hash).cloned()
    }
}

/// Balance source with a wallet-wide total and fixed per-address amounts.
#[derive(Debug, Clone, Default)]
pub struct FixedBalance {
    total: Amount,
    by_address: HashMap<String, Amount>,
}

impl FixedBalance {
    pub fn new(total: Amount) -> Self {
        FixedBalance {
            total,
            by_address: HashMap::new(),
        }
    }

    pub fn with_address(mut self, address: &str, amount: Amount) -> Self {
        self.by_address.insert(address.to_string(), amount);
        self
    }
}

impl BalanceSource for FixedBalance {
    fn balance(&self, filter: &str, _min_conf: u32) -> Amount {
        if filter.is_empty() {
            self.total
        } else {
            self.by_address.get(filter).copied().unwrap_or(0)
        }
    }
}

/// In-memory ledger store. Records are sorted newest-first on read so tests
/// can insert in any order.
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    inner: Arc<RwLock<MemoryLedgerInner>>,
}

#[derive(Debug, Default)]
struct MemoryLedgerInner {
    transactions: Vec<TransactionRecord>,
    entries: Vec<AccountingEntry>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_transaction(&self, record: TransactionRecord) {
        self.inner.write().transactions.push(record);
    }

    pub fn push_entry(&self, entry: AccountingEntry) {
        self.inner.write().entries.push(entry);
    }
}

impl LedgerStore for MemoryLedger {
    fn ordered_transactions(&self) -> Vec<TransactionRecord> {
        let mut records = self.inner.read().transactions.clone();
        records.sort_by(|a, b| (b.time, b.sequence).cmp(&(a.time, a.sequence)));
        records
    }

    fn ordered_accounting_entries(&self) -> Vec<AccountingEntry> {
        let mut entries = self.inner.read().entries.clone();
        entries.sort_by(|a, b| (b.time, b.sequence).cmp(&(a.time, a.sequence)));
        entries
    }
}

/// Static chain tip for tests and offline callers.
#[derive(Debug, Clone)]
pub struct StaticChainView {
    pub best_hash: String,
    pub best_time: i64,
}

impl ChainView for StaticChainView {
    fn best_block_hash(&self) -> String {
        self.best_hash.clone()
    }

    fn best_block_time(&self) -> i64 {
        self.best_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TxCategory;

    fn record(time: i64, sequence: u64) -> TransactionRecord {
        TransactionRecord {
            txid: format!("{:064x}", sequence),
            address: String::new(),
            category: TxCategory::Receive,
            amount: 0,
            vout: 0,
            confirmations: 1,
            generated: false,
            block_hash: String::new(),
            block_index: 0,
            block_time: time,
            time,
            time_received: time,
            sequence,
        }
    }

    #[test]
    fn test_memory_key_store_lookup() {
        let store = MemoryKeyStore::new();
        let id = [3u8; 20];
        assert!(store.public_key_for(&id).is_none());
        store.insert_key(id, vec![0x02, 0xaa]);
        assert_eq!(store.public_key_for(&id).unwrap(), vec![0x02, 0xaa]);
    }

    #[test]
    fn test_memory_ledger_orders_newest_first() {
        let ledger = MemoryLedger::new();
        ledger.push_transaction(record(100, 1));
        ledger.push_transaction(record(300, 3));
        ledger.push_transaction(record(300, 2));

        let ordered = ledger.ordered_transactions();
        assert_eq!(ordered[0].sequence, 3);
        assert_eq!(ordered[1].sequence, 2);
        assert_eq!(ordered[2].sequence, 1);
    }

    #[test]
    fn test_fixed_balance_filtering() {
        let source = FixedBalance::new(500).with_address("addr1", 200);
        assert_eq!(source.balance("", 1), 500);
        assert_eq!(source.balance("addr1", 1), 200);
        assert_eq!(source.balance("unknown", 1), 0);
    }
}
