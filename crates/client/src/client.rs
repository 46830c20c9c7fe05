use crate::chain::{ChainAdaptor, SolanaNetwork, get_chain_adaptor};
use crate::chain::solana_adaptor::SolanaInitConfig;
use crate::error::{ClientError, Result};
use crate::read_api::{Asset, AssetProof, ReadApiClient};
use cutils_lib::Instruction;
use cutils_lib::keys::Keypair;
use cutils_lib::transaction::Transaction;
use std::fmt;
use std::time::Duration;
use tokio::time;

#[derive(Debug, Clone, Copy)]
pub struct ConfirmConfig {
    pub attempts: usize,
    pub interval: Duration,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self { attempts: 30, interval: Duration::from_millis(1000) }
    }
}

pub struct CutilsClient {
    pub read_api: ReadApiClient,
    pub chain_service: Box<dyn ChainAdaptor>,
    pub confirm: ConfirmConfig,
}

impl fmt::Debug for CutilsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CutilsClient")
            .field("read_api", &self.read_api)
            .field("confirm", &self.confirm)
            .finish_non_exhaustive()
    }
}

impl CutilsClient {
    pub fn new(read_api_url: &str, network: SolanaNetwork, rpc_url: Option<&str>) -> Self {
        let config = rpc_url.map(|url| SolanaInitConfig {
            rpc_url: url.to_string(),
            ..SolanaInitConfig::for_network(network)
        });
        Self::with_adaptor(ReadApiClient::new(read_api_url), get_chain_adaptor(network, config))
    }

    pub fn with_adaptor(read_api: ReadApiClient, chain_service: Box<dyn ChainAdaptor>) -> Self {
        Self { read_api, chain_service, confirm: ConfirmConfig::default() }
    }

    pub fn with_confirm_config(mut self, confirm: ConfirmConfig) -> Self {
        self.confirm = confirm;
        self
    }

    /// Fetches the asset record and its proof, in that order.
    pub async fn fetch_asset_with_proof(&self, asset_id: &str) -> Result<(Asset, AssetProof)> {
        let asset = self.read_api.get_asset(asset_id).await?;
        let proof = self.read_api.get_asset_proof(asset_id).await?;
        Ok((asset, proof))
    }

    /// Signs `instructions` with the payer (plus `signers`) against a fresh
    /// blockhash, submits the transaction and waits until it is confirmed.
    pub async fn send_and_confirm(
        &self,
        instructions: &[Instruction],
        payer: &Keypair,
        signers: &[&Keypair],
        skip_preflight: bool,
    ) -> Result<String> {
        let blockhash = self.chain_service.get_latest_blockhash().await?;
        let tx = Transaction::new_signed(instructions, payer, signers, blockhash)?;
        let raw_tx = tx.serialize()?;
        tracing::debug!("transaction is {} bytes", raw_tx.len());
        let signature = self.chain_service.send_transaction(&raw_tx, skip_preflight).await?;
        self.confirm_transaction(&signature).await?;
        Ok(signature)
    }

    pub async fn confirm_transaction(&self, signature: &str) -> Result<()> {
        for i in 0..self.confirm.attempts {
            match self.chain_service.get_signature_status(signature).await {
                Ok(Some(status)) => {
                    if let Some(err) = status.err {
                        return Err(ClientError::TransactionFailed {
                            signature: signature.to_string(),
                            err,
                        });
                    }
                    if status.is_confirmed() {
                        tracing::info!("transaction {} confirmed at slot {}", signature, status.slot);
                        return Ok(());
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        "get status of transaction {} failed at {} times: {}",
                        signature,
                        i,
                        e
                    );
                }
            }
            time::sleep(self.confirm.interval).await;
        }
        Err(ClientError::Unconfirmed {
            signature: signature.to_string(),
            attempts: self.confirm.attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::chain_adaptor::SignatureStatus;
    use crate::chain::mock_adaptor::MockAdaptor;
    use async_trait::async_trait;
    use cutils_lib::{AccountMeta, Pubkey};
    use serde_json::json;

    fn quick() -> ConfirmConfig {
        ConfirmConfig { attempts: 3, interval: Duration::from_millis(1) }
    }

    fn memo_instruction(signer: Pubkey) -> Instruction {
        Instruction {
            program_id: Pubkey::new_from_array([5u8; 32]),
            accounts: vec![AccountMeta::new_readonly(signer, true)],
            data: b"hello".to_vec(),
        }
    }

    #[tokio::test]
    async fn test_send_and_confirm_with_mock_ledger() {
        let client = CutilsClient::with_adaptor(
            ReadApiClient::new("http://127.0.0.1:1/"),
            Box::new(MockAdaptor::new()),
        )
        .with_confirm_config(quick());
        let payer = Keypair::new();
        let sig = client
            .send_and_confirm(&[memo_instruction(payer.pubkey())], &payer, &[], true)
            .await
            .unwrap();
        assert_eq!(bs58::decode(&sig).into_vec().unwrap().len(), 64);
    }

    #[tokio::test]
    async fn test_send_and_confirm_fails_without_owner_signature() {
        let client = CutilsClient::with_adaptor(
            ReadApiClient::new("http://127.0.0.1:1/"),
            Box::new(MockAdaptor::new()),
        );
        let payer = Keypair::new();
        let owner = Keypair::new();
        let err = client
            .send_and_confirm(&[memo_instruction(owner.pubkey())], &payer, &[], true)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Cutils(cutils_lib::CutilsError::MissingSigner(_))));
    }

    struct FailingLedger;

    #[async_trait]
    impl ChainAdaptor for FailingLedger {
        async fn get_latest_blockhash(&self) -> Result<[u8; 32]> {
            Ok([0u8; 32])
        }
        async fn send_transaction(&self, _raw_tx: &[u8], _skip: bool) -> Result<String> {
            Ok("sig".to_string())
        }
        async fn get_signature_status(&self, _sig: &str) -> Result<Option<SignatureStatus>> {
            Ok(Some(SignatureStatus {
                slot: 1,
                confirmations: Some(0),
                err: Some(json!({"InstructionError": [0, {"Custom": 6000}]})),
                confirmation_status: None,
            }))
        }
    }

    #[tokio::test]
    async fn test_confirm_reports_transaction_error() {
        let client = CutilsClient::with_adaptor(
            ReadApiClient::new("http://127.0.0.1:1/"),
            Box::new(FailingLedger),
        )
        .with_confirm_config(quick());
        let err = client.confirm_transaction("sig").await.unwrap_err();
        assert!(matches!(err, ClientError::TransactionFailed { .. }));
    }

    #[tokio::test]
    async fn test_confirm_gives_up_after_attempts() {
        let client = CutilsClient::with_adaptor(
            ReadApiClient::new("http://127.0.0.1:1/"),
            Box::new(MockAdaptor::new()),
        )
        .with_confirm_config(quick());
        let err = client.confirm_transaction("never-sent").await.unwrap_err();
        assert!(matches!(err, ClientError::Unconfirmed { attempts: 3, .. }));
    }
}
