use crate::error::{ClientError, Result};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub const JSONRPC_VERSION: &str = "2.0";
pub const DEFAULT_REQUEST_ID: &str = "rpd-op-123";

#[derive(Serialize, Debug)]
pub struct JsonRpcRequest<'a, P> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub id: &'a str,
    pub params: P,
}

#[derive(Deserialize, Debug)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub struct JsonRpcResponse<R> {
    pub result: Option<R>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// Ledger responses wrap most values in `{context, value}`.
#[derive(Deserialize, Debug, Clone)]
pub struct RpcResponse<T> {
    pub context: RpcContext,
    pub value: T,
}

#[derive(Deserialize, Debug, Clone, Copy)]
pub struct RpcContext {
    pub slot: u64,
}

/// A JSON-RPC 2.0 endpoint reached over HTTP POST.
#[derive(Clone, Debug)]
pub struct JsonRpcTransport {
    client: Client,
    endpoint: String,
    request_id: String,
}

impl JsonRpcTransport {
    pub fn new(endpoint: &str) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: &str) -> Self {
        Self { client, endpoint: endpoint.to_string(), request_id: DEFAULT_REQUEST_ID.to_string() }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts `{jsonrpc, method, id, params}` and decodes the `result` field.
    /// HTTP failures, an `error` member and a null or missing result are all
    /// errors.
    pub async fn call<P, R>(&self, method: &str, params: P) -> Result<R>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let request =
            JsonRpcRequest { jsonrpc: JSONRPC_VERSION, method, id: &self.request_id, params };
        tracing::debug!("calling {} at {}", method, self.endpoint);
        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ClientError::Status {
                method: method.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let response: JsonRpcResponse<R> = serde_json::from_str(&body)?;
        if let Some(error) = response.error {
            return Err(ClientError::Rpc {
                method: method.to_string(),
                code: error.code,
                message: error.message,
            });
        }
        response.result.ok_or_else(|| ClientError::MissingResult(method.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::spawn_rpc_server;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_call_sends_envelope_and_decodes_result() {
        let url = spawn_rpc_server(|body| {
            assert_eq!(body["jsonrpc"], "2.0");
            assert_eq!(body["id"], DEFAULT_REQUEST_ID);
            json!({"jsonrpc": "2.0", "id": body["id"], "result": {
                "method": body["method"], "params": body["params"]
            }})
        })
        .await;
        let transport = JsonRpcTransport::new(&url);
        let echoed: Value = transport.call("echo", json!({"id": "abc"})).await.unwrap();
        assert_eq!(echoed["method"], "echo");
        assert_eq!(echoed["params"]["id"], "abc");
    }

    #[tokio::test]
    async fn test_call_surfaces_rpc_error() {
        let url = spawn_rpc_server(|_| {
            json!({"jsonrpc": "2.0", "id": DEFAULT_REQUEST_ID,
                   "error": {"code": -32000, "message": "Asset not found"}})
        })
        .await;
        let err = JsonRpcTransport::new(&url).call::<_, Value>("getAsset", json!({})).await;
        match err {
            Err(ClientError::Rpc { method, code, message }) => {
                assert_eq!(method, "getAsset");
                assert_eq!(code, -32000);
                assert_eq!(message, "Asset not found");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_call_rejects_null_result() {
        let url = spawn_rpc_server(|_| json!({"jsonrpc": "2.0", "id": "1", "result": null})).await;
        let err = JsonRpcTransport::new(&url).call::<_, Value>("getAssetProof", json!({})).await;
        assert!(matches!(err, Err(ClientError::MissingResult(m)) if m == "getAssetProof"));
    }

    #[tokio::test]
    async fn test_call_reports_transport_error() {
        let transport = JsonRpcTransport::new("http://127.0.0.1:1/");
        let err = transport.call::<_, Value>("getAsset", json!({})).await;
        assert!(matches!(err, Err(ClientError::Http(_))));
    }
}
