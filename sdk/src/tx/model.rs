//! The dual transaction model (spec.md §4.6): a legacy, gas-coefficient-priced transaction
//! and an EIP-1559-style dynamic-fee transaction, sharing clause/signature/reserved-field
//! structure but carried as two distinct variants rather than one struct with optional
//! fee fields (spec.md §9's closed-sum-type redesign flag applies here too).

use crate::address::Address;
use crate::clause::Clause;
use crate::error::{Error, Result};
use crate::hash::blake2b256;
use crate::rlp::{decode_u64, encode_u64, Field, Item, Kind, Schema, Value};

/// VIP-191 feature bit: set when the transaction carries a two-party gas-payer signature.
pub const VIP191_DELEGATED_BIT: u8 = 1;

/// Envelope byte prefixing a [`DynamicFeeTx`]'s RLP encoding (spec.md §9 OQ2).
pub const DYNAMIC_FEE_TX_TYPE: u8 = 0x51;

/// The `reserved` field: a forward-compatibility feature bitmap plus any trailing unused
/// blobs the node may define in the future. Encodes to an empty list when both are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reserved {
    pub features: u8,
    pub unused: Vec<Vec<u8>>,
}

impl Reserved {
    pub fn delegated() -> Self {
        Reserved {
            features: VIP191_DELEGATED_BIT,
            unused: Vec::new(),
        }
    }

    pub fn is_delegated(&self) -> bool {
        self.features & VIP191_DELEGATED_BIT != 0
    }

    fn to_items(&self) -> Vec<Vec<u8>> {
        if self.features == 0 && self.unused.is_empty() {
            return Vec::new();
        }
        let mut items = vec![encode_u64(self.features as u64)];
        items.extend(self.unused.iter().cloned());
        items
    }

    fn from_items(items: Vec<Vec<u8>>) -> Result<Self> {
        if items.is_empty() {
            return Ok(Reserved::default());
        }
        let features = decode_u64(&items[0])?;
        if features > u8::MAX as u64 {
            return Err(Error::Encoding {
                path: "reserved.[0]".into(),
                detail: "feature bitmap exceeds one byte".into(),
            });
        }
        Ok(Reserved {
            features: features as u8,
            unused: items[1..].to_vec(),
        })
    }
}

/// A gas-coefficient-priced transaction (VeChain's original fee model).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyTx {
    pub chain_tag: u8,
    pub block_ref: [u8; 8],
    pub expiration: u32,
    pub clauses: Vec<Clause>,
    pub gas_price_coef: u8,
    pub gas: u64,
    pub depends_on: Option<[u8; 32]>,
    pub nonce: u64,
    pub reserved: Reserved,
    pub signature: Option<Vec<u8>>,
}

/// An EIP-1559-style dynamic-fee transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamicFeeTx {
    pub chain_tag: u8,
    pub block_ref: [u8; 8],
    pub expiration: u32,
    pub clauses: Vec<Clause>,
    pub max_priority_fee_per_gas: u128,
    pub max_fee_per_gas: u128,
    pub gas: u64,
    pub depends_on: Option<[u8; 32]>,
    pub nonce: u64,
    pub reserved: Reserved,
    pub signature: Option<Vec<u8>>,
}

/// Either transaction variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transaction {
    Legacy(LegacyTx),
    DynamicFee(DynamicFeeTx),
}

impl Transaction {
    pub fn clauses(&self) -> &[Clause] {
        match self {
            Transaction::Legacy(tx) => &tx.clauses,
            Transaction::DynamicFee(tx) => &tx.clauses,
        }
    }

    pub fn chain_tag(&self) -> u8 {
        match self {
            Transaction::Legacy(tx) => tx.chain_tag,
            Transaction::DynamicFee(tx) => tx.chain_tag,
        }
    }

    pub fn reserved(&self) -> &Reserved {
        match self {
            Transaction::Legacy(tx) => &tx.reserved,
            Transaction::DynamicFee(tx) => &tx.reserved,
        }
    }

    pub fn is_delegated(&self) -> bool {
        self.reserved().is_delegated()
    }

    pub fn signature(&self) -> Option<&[u8]> {
        match self {
            Transaction::Legacy(tx) => tx.signature.as_deref(),
            Transaction::DynamicFee(tx) => tx.signature.as_deref(),
        }
    }

    pub fn set_signature(&mut self, signature: Vec<u8>) {
        match self {
            Transaction::Legacy(tx) => tx.signature = Some(signature),
            Transaction::DynamicFee(tx) => tx.signature = Some(signature),
        }
    }

    /// `blake2b256(rlp(unsigned_body))` — the value the origin (and, for delegated
    /// transactions, implicitly the gas payer) signs over (spec.md §4.6).
    pub fn signing_hash(&self) -> [u8; 32] {
        blake2b256(&self.encode_unsigned())
    }

    /// `blake2b256(signing_hash ‖ origin)` (spec.md §9 OQ4) — both the transaction id and,
    /// for a delegated transaction, the message the gas payer signs.
    pub fn id(&self, origin: Address) -> [u8; 32] {
        let mut preimage = Vec::with_capacity(52);
        preimage.extend_from_slice(&self.signing_hash());
        preimage.extend_from_slice(&origin.0);
        blake2b256(&preimage)
    }

    /// `get_transaction_id` (spec.md §4.6): recovers the origin from the transaction's own
    /// signature (the first 65 bytes, even for a delegated transaction carrying a combined
    /// 130-byte signature) and returns `id(origin)`. `None` if the transaction is unsigned.
    pub fn get_transaction_id(&self) -> Option<[u8; 32]> {
        let sig = self.signature()?;
        if sig.len() < 65 {
            return None;
        }
        let mut sig65 = [0u8; 65];
        sig65.copy_from_slice(&sig[0..65]);
        let pubkey = crate::secp256k1::recover(&self.signing_hash(), &sig65).ok()?;
        let origin = Address::from_pubkey(&pubkey);
        Some(self.id(origin))
    }

    /// RLP-encode the transaction without its `signature` field.
    pub fn encode_unsigned(&self) -> Vec<u8> {
        match self {
            Transaction::Legacy(tx) => legacy_unsigned_item(tx).encode(),
            Transaction::DynamicFee(tx) => {
                let mut out = vec![DYNAMIC_FEE_TX_TYPE];
                out.extend(dynamic_fee_unsigned_item(tx).encode());
                out
            }
        }
    }

    /// RLP-encode the fully signed transaction. Fails if no signature has been set.
    pub fn encode_signed(&self) -> Result<Vec<u8>> {
        match self {
            Transaction::Legacy(tx) => {
                let sig = tx.signature.as_ref().ok_or(Error::MissingField { name: "signature" })?;
                Ok(legacy_signed_item(tx, sig).encode())
            }
            Transaction::DynamicFee(tx) => {
                let sig = tx.signature.as_ref().ok_or(Error::MissingField { name: "signature" })?;
                let mut out = vec![DYNAMIC_FEE_TX_TYPE];
                out.extend(dynamic_fee_signed_item(tx, sig).encode());
                Ok(out)
            }
        }
    }

    /// Decode a raw transaction, dispatching on the leading envelope byte (spec.md §9 OQ2).
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        if bytes.first() == Some(&DYNAMIC_FEE_TX_TYPE) {
            decode_dynamic_fee(&bytes[1..])
        } else {
            decode_legacy(bytes)
        }
    }
}

fn clause_schema() -> Schema {
    Schema::strct(vec![
        Field::new("to", Schema::leaf(Kind::optional_fixed(20))),
        Field::new("value", Schema::leaf(Kind::numeric(None))),
        Field::new("data", Schema::leaf(Kind::HexBlob)),
    ])
}

fn clause_value(clause: &Clause) -> Value {
    Value::list(vec![
        Value::leaf(clause.to.map(|a| a.0.to_vec()).unwrap_or_default()),
        Value::leaf(clause.value.to_vec()),
        Value::leaf(clause.data.clone()),
    ])
}

fn clause_from_value(value: &Value, path: &str) -> Result<Clause> {
    let fields = value.as_list(path)?;
    let to_bytes = fields[0].as_leaf(&format!("{path}.to"))?;
    let to = if to_bytes.is_empty() {
        None
    } else {
        Some(Address::from_slice(to_bytes)?)
    };
    let value_bytes = fields[1].as_leaf(&format!("{path}.value"))?;
    let mut clause_value = [0u8; 32];
    if value_bytes.len() > 32 {
        return Err(Error::Encoding {
            path: format!("{path}.value"),
            detail: "clause value exceeds 256 bits".into(),
        });
    }
    clause_value[32 - value_bytes.len()..].copy_from_slice(value_bytes);
    let data = fields[2].as_leaf(&format!("{path}.data"))?.to_vec();
    Ok(Clause::new(to, clause_value, data))
}

fn reserved_value(reserved: &Reserved) -> Value {
    Value::list(reserved.to_items().into_iter().map(Value::leaf).collect::<Vec<_>>())
}

fn reserved_from_value(value: &Value, path: &str) -> Result<Reserved> {
    let items = value
        .as_list(path)?
        .iter()
        .map(|v| v.as_leaf(path).map(|b| b.to_vec()))
        .collect::<Result<Vec<_>>>()?;
    Reserved::from_items(items)
}

fn u128_trimmed(n: u128) -> Vec<u8> {
    let full = n.to_be_bytes();
    let first_nonzero = full.iter().position(|&b| b != 0);
    match first_nonzero {
        Some(i) => full[i..].to_vec(),
        None => Vec::new(),
    }
}

fn u128_from_trimmed(bytes: &[u8], path: &str) -> Result<u128> {
    if bytes.len() > 16 {
        return Err(Error::Encoding {
            path: path.to_string(),
            detail: "value exceeds 128 bits".into(),
        });
    }
    let mut buf = [0u8; 16];
    buf[16 - bytes.len()..].copy_from_slice(bytes);
    Ok(u128::from_be_bytes(buf))
}

// -- Legacy -----------------------------------------------------------------------------

fn legacy_unsigned_schema() -> Schema {
    Schema::strct(vec![
        Field::new("chain_tag", Schema::leaf(Kind::numeric(Some(1)))),
        Field::new("block_ref", Schema::leaf(Kind::compact_fixed(8))),
        Field::new("expiration", Schema::leaf(Kind::numeric(Some(4)))),
        Field::new("clauses", Schema::array(clause_schema())),
        Field::new("gas_price_coef", Schema::leaf(Kind::numeric(Some(1)))),
        Field::new("gas", Schema::leaf(Kind::numeric(Some(8)))),
        Field::new("depends_on", Schema::leaf(Kind::optional_fixed(32))),
        Field::new("nonce", Schema::leaf(Kind::numeric(Some(8)))),
        Field::new("reserved", Schema::array(Schema::leaf(Kind::HexBlob))),
    ])
}

fn legacy_signed_schema() -> Schema {
    let mut schema = match legacy_unsigned_schema() {
        Schema::Struct { fields } => fields,
        _ => unreachable!(),
    };
    schema.push(Field::new("signature", Schema::leaf(Kind::HexBlob)));
    Schema::strct(schema)
}

fn legacy_unsigned_value(tx: &LegacyTx) -> Value {
    Value::list(vec![
        Value::leaf(encode_u64(tx.chain_tag as u64)),
        Value::leaf(tx.block_ref.to_vec()),
        Value::leaf(encode_u64(tx.expiration as u64)),
        Value::list(tx.clauses.iter().map(clause_value).collect::<Vec<_>>()),
        Value::leaf(encode_u64(tx.gas_price_coef as u64)),
        Value::leaf(encode_u64(tx.gas)),
        Value::leaf(tx.depends_on.map(|d| d.to_vec()).unwrap_or_default()),
        Value::leaf(encode_u64(tx.nonce)),
        reserved_value(&tx.reserved),
    ])
}

fn legacy_unsigned_item(tx: &LegacyTx) -> Item {
    crate::rlp::pack(&legacy_unsigned_schema(), &legacy_unsigned_value(tx), "")
        .expect("a tx built from typed fields always satisfies its own schema")
}

fn legacy_signed_item(tx: &LegacyTx, signature: &[u8]) -> Item {
    let mut fields = match legacy_unsigned_value(tx) {
        Value::List(fields) => fields,
        Value::Leaf(_) => unreachable!(),
    };
    fields.push(Value::leaf(signature.to_vec()));
    crate::rlp::pack(&legacy_signed_schema(), &Value::list(fields), "")
        .expect("a tx built from typed fields always satisfies its own schema")
}

fn decode_legacy(data: &[u8]) -> Result<Transaction> {
    let item = Item::decode(data)?;
    let len = item.as_list().map_err(|e| Error::Rlp(e.to_string()))?.len();
    let (schema, signed) = match len {
        9 => (legacy_unsigned_schema(), false),
        10 => (legacy_signed_schema(), true),
        _ => return Err(Error::Rlp(format!("legacy transaction has {len} fields"))),
    };
    let value = crate::rlp::unpack(&schema, &item, "")?;
    let fields = value.as_list("")?;

    let chain_tag = decode_u64(fields[0].as_leaf("chain_tag")?)? as u8;
    let block_ref_bytes = fields[1].as_leaf("block_ref")?;
    let mut block_ref = [0u8; 8];
    block_ref.copy_from_slice(block_ref_bytes);
    let expiration = decode_u64(fields[2].as_leaf("expiration")?)? as u32;
    let clauses = fields[3]
        .as_list("clauses")?
        .iter()
        .enumerate()
        .map(|(i, v)| clause_from_value(v, &format!("clauses.[{i}]")))
        .collect::<Result<Vec<_>>>()?;
    let gas_price_coef = decode_u64(fields[4].as_leaf("gas_price_coef")?)? as u8;
    let gas = decode_u64(fields[5].as_leaf("gas")?)?;
    let depends_on_bytes = fields[6].as_leaf("depends_on")?;
    let depends_on = if depends_on_bytes.is_empty() {
        None
    } else {
        let mut d = [0u8; 32];
        d.copy_from_slice(depends_on_bytes);
        Some(d)
    };
    let nonce = decode_u64(fields[7].as_leaf("nonce")?)?;
    let reserved = reserved_from_value(&fields[8], "reserved")?;
    let signature = if signed {
        Some(fields[9].as_leaf("signature")?.to_vec())
    } else {
        None
    };

    Ok(Transaction::Legacy(LegacyTx {
        chain_tag,
        block_ref,
        expiration,
        clauses,
        gas_price_coef,
        gas,
        depends_on,
        nonce,
        reserved,
        signature,
    }))
}

// -- Dynamic fee --------------------------------------------------------------------------

fn dynamic_fee_unsigned_schema() -> Schema {
    Schema::strct(vec![
        Field::new("chain_tag", Schema::leaf(Kind::numeric(Some(1)))),
        Field::new("block_ref", Schema::leaf(Kind::compact_fixed(8))),
        Field::new("expiration", Schema::leaf(Kind::numeric(Some(4)))),
        Field::new("clauses", Schema::array(clause_schema())),
        Field::new("max_priority_fee_per_gas", Schema::leaf(Kind::numeric(Some(16)))),
        Field::new("max_fee_per_gas", Schema::leaf(Kind::numeric(Some(16)))),
        Field::new("gas", Schema::leaf(Kind::numeric(Some(8)))),
        Field::new("depends_on", Schema::leaf(Kind::optional_fixed(32))),
        Field::new("nonce", Schema::leaf(Kind::numeric(Some(8)))),
        Field::new("reserved", Schema::array(Schema::leaf(Kind::HexBlob))),
    ])
}

fn dynamic_fee_signed_schema() -> Schema {
    let mut fields = match dynamic_fee_unsigned_schema() {
        Schema::Struct { fields } => fields,
        _ => unreachable!(),
    };
    fields.push(Field::new("signature", Schema::leaf(Kind::HexBlob)));
    Schema::strct(fields)
}

fn dynamic_fee_unsigned_value(tx: &DynamicFeeTx) -> Value {
    Value::list(vec![
        Value::leaf(encode_u64(tx.chain_tag as u64)),
        Value::leaf(tx.block_ref.to_vec()),
        Value::leaf(encode_u64(tx.expiration as u64)),
        Value::list(tx.clauses.iter().map(clause_value).collect::<Vec<_>>()),
        Value::leaf(u128_trimmed(tx.max_priority_fee_per_gas)),
        Value::leaf(u128_trimmed(tx.max_fee_per_gas)),
        Value::leaf(encode_u64(tx.gas)),
        Value::leaf(tx.depends_on.map(|d| d.to_vec()).unwrap_or_default()),
        Value::leaf(encode_u64(tx.nonce)),
        reserved_value(&tx.reserved),
    ])
}

fn dynamic_fee_unsigned_item(tx: &DynamicFeeTx) -> Item {
    crate::rlp::pack(&dynamic_fee_unsigned_schema(), &dynamic_fee_unsigned_value(tx), "")
        .expect("a tx built from typed fields always satisfies its own schema")
}

fn dynamic_fee_signed_item(tx: &DynamicFeeTx, signature: &[u8]) -> Item {
    let mut fields = match dynamic_fee_unsigned_value(tx) {
        Value::List(fields) => fields,
        Value::Leaf(_) => unreachable!(),
    };
    fields.push(Value::leaf(signature.to_vec()));
    crate::rlp::pack(&dynamic_fee_signed_schema(), &Value::list(fields), "")
        .expect("a tx built from typed fields always satisfies its own schema")
}

fn decode_dynamic_fee(data: &[u8]) -> Result<Transaction> {
    let item = Item::decode(data)?;
    let len = item.as_list().map_err(|e| Error::Rlp(e.to_string()))?.len();
    let (schema, signed) = match len {
        10 => (dynamic_fee_unsigned_schema(), false),
        11 => (dynamic_fee_signed_schema(), true),
        _ => return Err(Error::Rlp(format!("dynamic-fee transaction has {len} fields"))),
    };
    let value = crate::rlp::unpack(&schema, &item, "")?;
    let fields = value.as_list("")?;

    let chain_tag = decode_u64(fields[0].as_leaf("chain_tag")?)? as u8;
    let block_ref_bytes = fields[1].as_leaf("block_ref")?;
    let mut block_ref = [0u8; 8];
    block_ref.copy_from_slice(block_ref_bytes);
    let expiration = decode_u64(fields[2].as_leaf("expiration")?)? as u32;
    let clauses = fields[3]
        .as_list("clauses")?
        .iter()
        .enumerate()
        .map(|(i, v)| clause_from_value(v, &format!("clauses.[{i}]")))
        .collect::<Result<Vec<_>>>()?;
    let max_priority_fee_per_gas = u128_from_trimmed(fields[4].as_leaf("max_priority_fee_per_gas")?, "max_priority_fee_per_gas")?;
    let max_fee_per_gas = u128_from_trimmed(fields[5].as_leaf("max_fee_per_gas")?, "max_fee_per_gas")?;
    let gas = decode_u64(fields[6].as_leaf("gas")?)?;
    let depends_on_bytes = fields[7].as_leaf("depends_on")?;
    let depends_on = if depends_on_bytes.is_empty() {
        None
    } else {
        let mut d = [0u8; 32];
        d.copy_from_slice(depends_on_bytes);
        Some(d)
    };
    let nonce = decode_u64(fields[8].as_leaf("nonce")?)?;
    let reserved = reserved_from_value(&fields[9], "reserved")?;
    let signature = if signed {
        Some(fields[10].as_leaf("signature")?.to_vec())
    } else {
        None
    };

    Ok(Transaction::DynamicFee(DynamicFeeTx {
        chain_tag,
        block_ref,
        expiration,
        clauses,
        max_priority_fee_per_gas,
        max_fee_per_gas,
        gas,
        depends_on,
        nonce,
        reserved,
        signature,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::vet_transfer;

    fn sample_legacy() -> LegacyTx {
        LegacyTx {
            chain_tag: 0x27,
            block_ref: [0, 0, 0, 0, 1, 2, 3, 4],
            expiration: 32,
            clauses: vec![vet_transfer(Address([0x11; 20]), 1_000)],
            gas_price_coef: 0,
            gas: 21_000,
            depends_on: None,
            nonce: 0x1234_5678_9abc_def0,
            reserved: Reserved::default(),
            signature: None,
        }
    }

    #[test]
    fn legacy_unsigned_round_trips() {
        let tx = Transaction::Legacy(sample_legacy());
        let encoded = tx.encode_unsigned();
        let decoded = Transaction::decode(&encoded).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn legacy_signed_round_trips() {
        let mut tx = sample_legacy();
        tx.signature = Some(vec![0xab; 65]);
        let tx = Transaction::Legacy(tx);
        let encoded = tx.encode_signed().unwrap();
        let decoded = Transaction::decode(&encoded).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.signature().unwrap().len(), 65);
    }

    #[test]
    fn dynamic_fee_round_trips_with_envelope_byte() {
        let tx = DynamicFeeTx {
            chain_tag: 0x4a,
            block_ref: [0; 8],
            expiration: 100,
            clauses: vec![vet_transfer(Address([0x22; 20]), 1)],
            max_priority_fee_per_gas: 1_000,
            max_fee_per_gas: 10_000,
            gas: 21_000,
            depends_on: Some([0x33; 32]),
            nonce: 7,
            reserved: Reserved::default(),
            signature: None,
        };
        let tx = Transaction::DynamicFee(tx);
        let encoded = tx.encode_unsigned();
        assert_eq!(encoded[0], DYNAMIC_FEE_TX_TYPE);
        let decoded = Transaction::decode(&encoded).unwrap();
        assert_eq!(decoded, tx);
    }

    #[test]
    fn delegated_reserved_round_trips() {
        let mut tx = sample_legacy();
        tx.reserved = Reserved::delegated();
        let tx = Transaction::Legacy(tx);
        let decoded = Transaction::decode(&tx.encode_unsigned()).unwrap();
        assert!(decoded.is_delegated());
    }

    #[test]
    fn get_transaction_id_recovers_origin_from_signature_alone() {
        use crate::secp256k1::{sign, to_pubkey, PrivateKey};

        let key = PrivateKey::generate();
        let mut tx = Transaction::Legacy(sample_legacy());
        let signing_hash = tx.signing_hash();
        let signature = sign(&signing_hash, &key).unwrap();
        tx.set_signature(signature.to_vec());

        let origin = Address::from_pubkey(&to_pubkey(&key).unwrap());
        assert_eq!(tx.get_transaction_id(), Some(tx.id(origin)));
    }

    #[test]
    fn get_transaction_id_is_none_when_unsigned() {
        let tx = Transaction::Legacy(sample_legacy());
        assert_eq!(tx.get_transaction_id(), None);
    }

    #[test]
    fn empty_reserved_encodes_to_empty_list() {
        let tx = sample_legacy();
        let item = legacy_unsigned_item(&tx);
        let fields = item.as_list().unwrap();
        assert_eq!(fields[8], Item::list(Vec::new()));
    }
}
