use crate::chain::mock_adaptor::MockAdaptor;
use crate::chain::solana_adaptor::{SolanaAdaptor, SolanaInitConfig};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// Ledger operations needed to land a transaction.
#[async_trait]
pub trait ChainAdaptor: Send + Sync {
    async fn get_latest_blockhash(&self) -> Result<[u8; 32]>;

    /// Submits a serialized, signed transaction and returns its signature.
    async fn send_transaction(&self, raw_tx: &[u8], skip_preflight: bool) -> Result<String>;

    /// `None` when the ledger has not seen the signature yet.
    async fn get_signature_status(&self, signature: &str) -> Result<Option<SignatureStatus>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationStatus {
    Processed,
    Confirmed,
    Finalized,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub slot: u64,
    #[serde(default)]
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub confirmation_status: Option<ConfirmationStatus>,
}

impl SignatureStatus {
    pub fn is_confirmed(&self) -> bool {
        self.confirmation_status.is_some_and(|status| status >= ConfirmationStatus::Confirmed)
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Copy, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SolanaNetwork {
    Mainnet,
    Devnet,
    /// Locally hosted validator.
    Localnet,
    /// In-memory ledger, nothing leaves the process.
    Mock,
}

impl SolanaNetwork {
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            SolanaNetwork::Mainnet => "https://api.mainnet-beta.solana.com",
            SolanaNetwork::Devnet => "https://api.devnet.solana.com",
            SolanaNetwork::Localnet | SolanaNetwork::Mock => "http://127.0.0.1:8899",
        }
    }
}

pub fn get_chain_adaptor(
    network: SolanaNetwork,
    config: Option<SolanaInitConfig>,
) -> Box<dyn ChainAdaptor> {
    match network {
        SolanaNetwork::Mock => Box::new(MockAdaptor::new()),
        _ => Box::new(SolanaAdaptor::new(
            config.unwrap_or_else(|| SolanaInitConfig::for_network(network)),
        )),
    }
}
