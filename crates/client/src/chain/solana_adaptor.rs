use crate::chain::chain_adaptor::{ChainAdaptor, SignatureStatus, SolanaNetwork};
use crate::convert::decode;
use crate::error::Result;
use crate::jsonrpc::{JsonRpcTransport, RpcResponse};
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;

pub const DEFAULT_COMMITMENT: &str = "confirmed";

#[derive(Debug, Clone)]
pub struct SolanaInitConfig {
    pub rpc_url: String,
    pub commitment: String,
}

impl SolanaInitConfig {
    pub fn for_network(network: SolanaNetwork) -> Self {
        Self { rpc_url: network.default_rpc_url().to_string(), commitment: DEFAULT_COMMITMENT.to_string() }
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct LatestBlockhash {
    blockhash: String,
    #[allow(dead_code)]
    last_valid_block_height: u64,
}

/// Ledger adaptor speaking the node JSON-RPC API over HTTP.
#[derive(Debug)]
pub struct SolanaAdaptor {
    transport: JsonRpcTransport,
    commitment: String,
}

impl SolanaAdaptor {
    pub fn new(config: SolanaInitConfig) -> Self {
        Self { transport: JsonRpcTransport::new(&config.rpc_url), commitment: config.commitment }
    }
}

#[async_trait]
impl ChainAdaptor for SolanaAdaptor {
    async fn get_latest_blockhash(&self) -> Result<[u8; 32]> {
        let response: RpcResponse<LatestBlockhash> = self
            .transport
            .call("getLatestBlockhash", json!([{ "commitment": self.commitment }]))
            .await?;
        tracing::debug!(
            "latest blockhash {} at slot {}",
            response.value.blockhash,
            response.context.slot
        );
        decode("blockhash", &response.value.blockhash)
    }

    async fn send_transaction(&self, raw_tx: &[u8], skip_preflight: bool) -> Result<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(raw_tx);
        let signature: String = self
            .transport
            .call(
                "sendTransaction",
                json!([encoded, {
                    "encoding": "base64",
                    "skipPreflight": skip_preflight,
                    "preflightCommitment": self.commitment,
                }]),
            )
            .await?;
        tracing::info!("sent transaction {}", signature);
        Ok(signature)
    }

    async fn get_signature_status(&self, signature: &str) -> Result<Option<SignatureStatus>> {
        let response: RpcResponse<Vec<Option<SignatureStatus>>> = self
            .transport
            .call(
                "getSignatureStatuses",
                json!([[signature], { "searchTransactionHistory": true }]),
            )
            .await?;
        Ok(response.value.into_iter().next().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::chain_adaptor::ConfirmationStatus;
    use crate::error::ClientError;
    use crate::test_utils::spawn_rpc_server;
    use serde_json::Value;

    async fn adaptor(handler: impl Fn(Value) -> Value + Send + Sync + 'static) -> SolanaAdaptor {
        let url = spawn_rpc_server(handler).await;
        SolanaAdaptor::new(SolanaInitConfig { rpc_url: url, commitment: "finalized".to_string() })
    }

    #[tokio::test]
    async fn test_get_latest_blockhash() {
        let hash = bs58::encode([3u8; 32]).into_string();
        let adaptor = adaptor(move |body| {
            assert_eq!(body["method"], "getLatestBlockhash");
            assert_eq!(body["params"][0]["commitment"], "finalized");
            json!({"jsonrpc": "2.0", "id": body["id"], "result": {
                "context": {"slot": 2792},
                "value": {"blockhash": hash.clone(), "lastValidBlockHeight": 3090}
            }})
        })
        .await;
        assert_eq!(adaptor.get_latest_blockhash().await.unwrap(), [3u8; 32]);
    }

    #[tokio::test]
    async fn test_send_transaction_encodes_base64() {
        let adaptor = adaptor(|body| {
            assert_eq!(body["method"], "sendTransaction");
            assert_eq!(body["params"][0], "AQID");
            assert_eq!(body["params"][1]["encoding"], "base64");
            assert_eq!(body["params"][1]["skipPreflight"], true);
            json!({"jsonrpc": "2.0", "id": body["id"], "result": "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW"})
        })
        .await;
        let sig = adaptor.send_transaction(&[1, 2, 3], true).await.unwrap();
        assert!(sig.starts_with("5VERv8"));
    }

    #[tokio::test]
    async fn test_send_transaction_surfaces_preflight_failure() {
        let adaptor = adaptor(|body| {
            json!({"jsonrpc": "2.0", "id": body["id"], "error": {
                "code": -32002,
                "message": "Transaction simulation failed: Error processing Instruction 0"
            }})
        })
        .await;
        let err = adaptor.send_transaction(&[0], false).await.unwrap_err();
        assert!(matches!(err, ClientError::Rpc { code: -32002, .. }));
    }

    #[tokio::test]
    async fn test_get_signature_status() {
        let adaptor = adaptor(|body| {
            assert_eq!(body["method"], "getSignatureStatuses");
            let status = if body["params"][0][0] == "known" {
                json!({"slot": 10, "confirmations": null, "err": null, "confirmationStatus": "finalized"})
            } else {
                Value::Null
            };
            json!({"jsonrpc": "2.0", "id": body["id"], "result": {
                "context": {"slot": 11}, "value": [status]
            }})
        })
        .await;
        let status = adaptor.get_signature_status("known").await.unwrap().unwrap();
        assert_eq!(status.confirmation_status, Some(ConfirmationStatus::Finalized));
        assert!(status.is_confirmed());
        assert_eq!(adaptor.get_signature_status("unknown").await.unwrap(), None);
    }
}
