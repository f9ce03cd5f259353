//! A thin REST client for a Thor node (spec.md §4.8): five endpoints, each returning a
//! typed response or a closed error.

use crate::address::Address;
use crate::error::{Error, Result};
use crate::hex;

use super::types::{
    Block, InspectClause, InspectRequest, InspectResult, Receipt, RawTransaction,
    SubmitTransactionResponse, TransactionInfo,
};

/// A Thor node REST endpoint.
pub struct ThorClient {
    base_url: String,
    http: reqwest::Client,
}

impl ThorClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        ThorClient {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// `GET /blocks/{revision}`. `revision` accepts `best`, `finalized`, a block number, or
    /// a block id.
    pub async fn get_block(&self, revision: &str) -> Result<Option<Block>> {
        let url = format!("{}/blocks/{revision}", self.base_url);
        let response = self.http.get(&url).send().await?;
        self.decode_optional(response).await
    }

    /// `POST /transactions` with the raw signed transaction hex. Returns the transaction id.
    pub async fn submit_transaction(&self, raw: &[u8]) -> Result<[u8; 32]> {
        let url = format!("{}/transactions", self.base_url);
        let body = RawTransaction {
            raw: hex::to_hex(raw),
        };
        let response = self.http.post(&url).json(&body).send().await?;
        let parsed: SubmitTransactionResponse = self.decode_required(response).await?;
        let bytes = hex::from_hex(&parsed.id)?;
        let mut id = [0u8; 32];
        if bytes.len() != 32 {
            return Err(Error::Network(format!(
                "node returned a transaction id of {} bytes, expected 32",
                bytes.len()
            )));
        }
        id.copy_from_slice(&bytes);
        Ok(id)
    }

    /// `GET /transactions/{id}`.
    pub async fn get_transaction(&self, id: [u8; 32]) -> Result<Option<TransactionInfo>> {
        let url = format!("{}/transactions/{}", self.base_url, hex::to_hex(&id));
        let response = self.http.get(&url).send().await?;
        self.decode_optional(response).await
    }

    /// `GET /transactions/{id}/receipt`.
    pub async fn get_receipt(&self, id: [u8; 32]) -> Result<Option<Receipt>> {
        let url = format!("{}/transactions/{}/receipt", self.base_url, hex::to_hex(&id));
        let response = self.http.get(&url).send().await?;
        self.decode_optional(response).await
    }

    /// `POST /accounts/{address}` — dry-run/inspect a clause set without broadcasting.
    pub async fn inspect_clauses(
        &self,
        clauses: &[(Option<Address>, [u8; 32], Vec<u8>)],
        caller: Option<Address>,
    ) -> Result<Vec<InspectResult>> {
        let target = caller.map(|a| a.to_checksum()).unwrap_or_else(|| Address::ZERO.to_checksum());
        let url = format!("{}/accounts/{target}", self.base_url);
        let body = InspectRequest {
            clauses: clauses
                .iter()
                .map(|(to, value, data)| InspectClause {
                    to: to.map(|a| a.to_checksum()),
                    value: hex::to_hex(value),
                    data: hex::to_hex(data),
                })
                .collect(),
            caller: caller.map(|a| a.to_checksum()),
        };
        let response = self.http.post(&url).json(&body).send().await?;
        self.decode_required(response).await
    }

    async fn decode_optional<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<Option<T>> {
        match response.status().as_u16() {
            200 => Ok(Some(response.json().await?)),
            404 => Ok(None),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::HttpError { status, body })
            }
        }
    }

    async fn decode_required<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status().as_u16();
        if status == 200 {
            Ok(response.json().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(Error::HttpError { status, body })
        }
    }
}
