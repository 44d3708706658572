//! Address description for validateaddress-style queries
//!
//! Inspects a decoded destination and reports whatever the wallet stores
//! happen to know about it. Missing external data is never an error here;
//! the affected fields are simply omitted from the record.

use crate::address::{AddressCodec, Destination};
use crate::script::{self, ScriptClass};
use crate::stores::{KeyStore, ScriptStore};
use serde::Serialize;

/// What the wallet knows about one destination. Every field is optional so
/// the record serializes straight into the RPC response shape, omitting what
/// the stores could not provide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AddressDescription {
    #[serde(rename = "isscript", skip_serializing_if = "Option::is_none")]
    pub is_script: Option<bool>,

    #[serde(rename = "pubkey", skip_serializing_if = "Option::is_none")]
    pub pubkey: Option<String>,

    #[serde(rename = "iscompressed", skip_serializing_if = "Option::is_none")]
    pub is_compressed: Option<bool>,

    #[serde(rename = "script", skip_serializing_if = "Option::is_none")]
    pub script_type: Option<String>,

    #[serde(rename = "hex", skip_serializing_if = "Option::is_none")]
    pub redeem_script_hex: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<String>>,

    #[serde(rename = "sigsrequired", skip_serializing_if = "Option::is_none")]
    pub sigs_required: Option<usize>,
}

/// Describe a destination from the wallet's point of view.
pub fn describe<K, S>(
    dest: &Destination,
    key_store: &K,
    script_store: &S,
    codec: &AddressCodec,
) -> AddressDescription
where
    K: KeyStore + ?Sized,
    S: ScriptStore + ?Sized,
{
    match dest {
        Destination::None => AddressDescription::default(),

        Destination::KeyHash(id) => {
            let mut record = AddressDescription {
                is_script: Some(false),
                ..Default::default()
            };
            if let Some(pubkey) = key_store.public_key_for(id) {
                record.is_compressed = Some(pubkey.len() == 33);
                record.pubkey = Some(hex::encode(pubkey));
            }
            record
        }

        Destination::ScriptHash(id) => {
            let mut record = AddressDescription {
                is_script: Some(true),
                ..Default::default()
            };
            if let Some(redeem_script) = script_store.redeem_script_for(id) {
                let (class, destinations, required) =
                    script::extract_destinations(&redeem_script);
                record.script_type = Some(class.type_name().to_string());
                record.redeem_script_hex = Some(hex::encode(&redeem_script));
                record.addresses = Some(
                    destinations
                        .iter()
                        .filter_map(|d| codec.encode(d))
                        .collect(),
                );
                if matches!(class, ScriptClass::Multisig { .. }) {
                    record.sigs_required = Some(required);
                }
            }
            record
        }
    }
}
