//! Wire types for the Thor REST API (spec.md §4.8). These mirror the node's JSON shapes
//! closely rather than the SDK's internal types, since they cross a serialization boundary.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    pub id: String,
    pub number: u64,
    #[serde(rename = "parentID")]
    pub parent_id: String,
    pub timestamp: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RawTransaction {
    pub raw: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitTransactionResponse {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionMeta {
    #[serde(rename = "blockID")]
    pub block_id: String,
    #[serde(rename = "blockNumber")]
    pub block_number: u64,
    #[serde(rename = "blockTimestamp")]
    pub block_timestamp: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TransactionInfo {
    pub id: String,
    pub origin: String,
    pub gas: u64,
    pub meta: Option<TransactionMeta>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogTopics {
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub data: String,
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Receipt {
    #[serde(rename = "gasUsed")]
    pub gas_used: u64,
    pub reverted: bool,
    pub outputs: Vec<ReceiptOutput>,
    pub meta: TransactionMeta,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReceiptOutput {
    #[serde(default)]
    pub events: Vec<LogTopics>,
    #[serde(rename = "vmError", default)]
    pub vm_error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectRequest {
    pub clauses: Vec<InspectClause>,
    pub caller: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectClause {
    pub to: Option<String>,
    pub value: String,
    pub data: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InspectResult {
    pub data: String,
    pub reverted: bool,
    #[serde(rename = "gasUsed")]
    pub gas_used: u64,
    #[serde(rename = "vmError")]
    pub vm_error: String,
}
