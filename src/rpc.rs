//! RPC response shaping
//!
//! Thin layer over the core components that produces the exact JSON shapes
//! the FrostChain RPC commands have always returned. Field names and typing
//! quirks are wire compatibility; change them only with a protocol bump.

use crate::address::{AddressCodec, Destination};
use crate::describe;
use crate::error::Result;
use crate::keys::KeySpecifier;
use crate::ledger::{
    balance_summary, format_money, merge_and_paginate, Amount, BalanceSources, LedgerRecord, COIN,
};
use crate::message;
use crate::multisig::build_multisig;
use crate::params::NetworkParams;
use crate::script;
use crate::stores::{ChainView, KeyStore, LedgerStore, ScriptStore};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Snapshot of every collaborator a request may consult. The caller holds
/// whatever lock keeps these mutually consistent for the duration of a call.
pub struct RpcContext<'a> {
    pub params: &'a NetworkParams,
    pub codec: &'a AddressCodec,
    pub key_store: &'a dyn KeyStore,
    pub script_store: &'a dyn ScriptStore,
    pub balances: BalanceSources<'a>,
    pub ledger: &'a dyn LedgerStore,
    pub chain: &'a dyn ChainView,
}

/// JSON rendering of an amount: coins as a number with 8 decimals of
/// precision, matching the node's ValueFromAmount.
fn value_from_amount(amount: Amount) -> Value {
    json!(amount as f64 / COIN as f64)
}

/// `validateaddress`: report validity and whatever the wallet knows about an
/// address. An invalid address yields only `{"isvalid": false}`.
pub fn validate_address(ctx: &RpcContext<'_>, address: &str) -> Value {
    let dest = match ctx.codec.decode(address) {
        Ok(dest) => dest,
        Err(_) => return json!({ "isvalid": false }),
    };

    let mut obj = Map::new();
    obj.insert("isvalid".to_string(), json!(true));
    obj.insert("address".to_string(), json!(address));
    if let Some(script_pubkey) = script::script_for_destination(&dest) {
        obj.insert("scriptPubKey".to_string(), json!(hex::encode(script_pubkey)));
    }

    let is_mine = match &dest {
        Destination::None => false,
        Destination::KeyHash(id) => ctx.key_store.public_key_for(id).is_some(),
        Destination::ScriptHash(id) => ctx.script_store.redeem_script_for(id).is_some(),
    };
    obj.insert("ismine".to_string(), json!(is_mine));

    let detail = describe::describe(&dest, ctx.key_store, ctx.script_store, ctx.codec);
    if let Value::Object(fields) = serde_json::to_value(detail).unwrap_or_default() {
        obj.extend(fields);
    }
    Value::Object(obj)
}

/// `createmultisig`: build the redemption script and return its P2SH address.
pub fn create_multisig(ctx: &RpcContext<'_>, required: usize, keys: &[String]) -> Result<Value> {
    let specs: Vec<KeySpecifier> = keys.iter().map(|k| KeySpecifier::from_str(k)).collect();
    let result = build_multisig(required, &specs, ctx.codec, ctx.key_store)?;
    Ok(json!({
        "address": result.address,
        "redeemScript": hex::encode(result.script),
    }))
}

/// `verifymessage`: verify a detached message signature.
pub fn verify_message(
    ctx: &RpcContext<'_>,
    address: &str,
    signature_b64: &str,
    msg: &str,
) -> Result<Value> {
    let ok = message::verify_message(address, signature_b64, msg, ctx.params, ctx.codec)?;
    Ok(Value::Bool(ok))
}

/// Which sections of `getalldata` the caller asked for.
#[derive(Debug, Clone, Copy)]
pub struct DataSections {
    pub balances: bool,
    pub transactions: bool,
}

impl DataSections {
    pub fn all() -> Self {
        DataSections {
            balances: true,
            transactions: true,
        }
    }
}

/// `getalldata`: the merged wallet overview for lightweight clients, covering
/// the chain tip, balance breakdown, per-address balances, and history.
pub fn get_all_data(
    ctx: &RpcContext<'_>,
    connection_count: usize,
    sections: DataSections,
    from: usize,
    count: usize,
) -> Value {
    let min_depth = 1;
    let summary = balance_summary(&ctx.balances, "", min_depth);
    debug!(
        total = summary.total(),
        from, count, "assembling getalldata response"
    );

    let mut obj = Map::new();
    obj.insert("connectionCount".to_string(), json!(connection_count));
    obj.insert("besttime".to_string(), json!(ctx.chain.best_block_time()));
    obj.insert(
        "bestblockhash".to_string(),
        json!(ctx.chain.best_block_hash()),
    );
    obj.insert(
        "transparentbalance".to_string(),
        json!(format_money(summary.transparent)),
    );
    obj.insert(
        "privatebalance".to_string(),
        json!(format_money(summary.shielded)),
    );
    obj.insert(
        "lockedbalance".to_string(),
        json!(format_money(summary.locked)),
    );
    obj.insert(
        "totalbalance".to_string(),
        json!(format_money(summary.total())),
    );
    obj.insert(
        "unconfirmedbalance".to_string(),
        json!(format_money(summary.unconfirmed)),
    );
    obj.insert(
        "immaturebalance".to_string(),
        json!(format_money(summary.immature)),
    );

    obj.insert(
        "addressbalance".to_string(),
        json!([address_balances(ctx, sections, min_depth)]),
    );

    let transactions = if sections.transactions {
        let txs = ctx.ledger.ordered_transactions();
        let entries = ctx.ledger.ordered_accounting_entries();
        let merged = merge_and_paginate(&txs, &entries, from, count);
        Value::Array(merged.iter().map(ledger_record_json).collect())
    } else {
        // Historical wire shape: balance-only queries still carry one
        // all-zero transaction row with string-typed fields.
        json!([placeholder_transaction()])
    };
    obj.insert("listtransactions".to_string(), transactions);

    Value::Object(obj)
}

fn address_balances(ctx: &RpcContext<'_>, sections: DataSections, min_depth: u32) -> Value {
    let mut list = Map::new();
    if sections.balances {
        for address in ctx.key_store.addresses() {
            let balance = ctx.balances.transparent.balance(&address, min_depth);
            list.insert(address, value_from_amount(balance));
        }
        for address in ctx.key_store.shielded_addresses() {
            if ctx.key_store.has_spending_key(&address) {
                let balance = ctx.balances.shielded.balance(&address, min_depth);
                list.insert(address, value_from_amount(balance));
            }
        }
    } else {
        list.insert(String::new(), value_from_amount(0));
    }
    Value::Object(list)
}

fn ledger_record_json(record: &LedgerRecord) -> Value {
    match record {
        LedgerRecord::Transaction(tx) => json!({
            "account": "",
            "address": tx.address,
            "category": tx.category.as_str(),
            "amount": value_from_amount(tx.amount),
            "vout": tx.vout,
            "confirmations": tx.confirmations,
            "generated": tx.generated,
            "blockhash": tx.block_hash,
            "blockindex": tx.block_index,
            "blocktime": tx.block_time,
            "txid": tx.txid,
            "time": tx.time,
            "timereceived": tx.time_received,
        }),
        LedgerRecord::Entry(entry) => json!({
            "account": entry.account,
            "category": "move",
            "time": entry.time,
            "amount": value_from_amount(entry.amount),
            "otheraccount": entry.other_account,
            "comment": entry.comment,
        }),
    }
}

fn placeholder_transaction() -> Value {
    let zero_hash = "0".repeat(64);
    json!({
        "account": "",
        "address": "",
        "category": "",
        "amount": "0",
        "vout": "1",
        "confirmations": "0",
        "generated": "true",
        "blockhash": zero_hash,
        "blockindex": "0",
        "blocktime": "0",
        "txid": zero_hash,
        "time": "0",
        "timereceived": "0",
    })
}
