pub mod chain;
pub mod client;
pub mod convert;
pub mod error;
pub mod jsonrpc;
pub mod read_api;

pub use client::CutilsClient;
pub use error::{ClientError, Result};

#[cfg(test)]
pub(crate) mod test_utils {
    use axum::{Json, Router, routing::post};
    use serde_json::Value;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    /// Serves `handler` as a JSON-RPC endpoint on an ephemeral local port and
    /// returns its URL.
    pub(crate) async fn spawn_rpc_server<F>(handler: F) -> String
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        let handler = Arc::new(handler);
        let app = Router::new().route(
            "/",
            post(move |Json(body): Json<Value>| {
                let handler = handler.clone();
                async move { Json(handler(body)) }
            }),
        );
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/")
    }
}
