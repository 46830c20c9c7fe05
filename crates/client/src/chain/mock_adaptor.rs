use crate::chain::chain_adaptor::{ChainAdaptor, ConfirmationStatus, SignatureStatus};
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

const SIGNATURE_LEN: usize = 64;

/// In-memory ledger: hands out a fixed blockhash, records every submitted
/// transaction and reports it as finalized.
#[derive(Debug, Default)]
pub struct MockAdaptor {
    blockhash: [u8; 32],
    sent: Mutex<Vec<Vec<u8>>>,
}

impl MockAdaptor {
    pub fn new() -> Self {
        Self::with_blockhash([0x11; 32])
    }

    pub fn with_blockhash(blockhash: [u8; 32]) -> Self {
        Self { blockhash, sent: Mutex::new(vec![]) }
    }

    fn sent(&self) -> MutexGuard<'_, Vec<Vec<u8>>> {
        self.sent.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn sent_transactions(&self) -> Vec<Vec<u8>> {
        self.sent().clone()
    }

    fn signature_of(raw_tx: &[u8]) -> Option<String> {
        // compact-u16 signature count followed by the fee payer's signature
        match raw_tx.first() {
            Some(count) if *count > 0 && raw_tx.len() > SIGNATURE_LEN => {
                Some(bs58::encode(&raw_tx[1..1 + SIGNATURE_LEN]).into_string())
            }
            _ => None,
        }
    }
}

#[async_trait]
impl ChainAdaptor for MockAdaptor {
    async fn get_latest_blockhash(&self) -> Result<[u8; 32]> {
        Ok(self.blockhash)
    }

    async fn send_transaction(&self, raw_tx: &[u8], _skip_preflight: bool) -> Result<String> {
        let signature = Self::signature_of(raw_tx).ok_or_else(|| ClientError::InvalidField {
            field: "transaction",
            reason: "unsigned transaction".to_string(),
        })?;
        self.sent().push(raw_tx.to_vec());
        Ok(signature)
    }

    async fn get_signature_status(&self, signature: &str) -> Result<Option<SignatureStatus>> {
        let sent = self.sent();
        let slot = sent
            .iter()
            .position(|tx| Self::signature_of(tx).as_deref() == Some(signature))
            .map(|index| index as u64 + 1);
        Ok(slot.map(|slot| SignatureStatus {
            slot,
            confirmations: None,
            err: None,
            confirmation_status: Some(ConfirmationStatus::Finalized),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_and_confirms() {
        let adaptor = MockAdaptor::new();
        let mut raw = vec![1u8];
        raw.extend_from_slice(&[7u8; 64]);
        raw.extend_from_slice(&[0u8; 10]);

        let sig = adaptor.send_transaction(&raw, true).await.unwrap();
        assert_eq!(sig, bs58::encode([7u8; 64]).into_string());
        assert_eq!(adaptor.sent_transactions(), vec![raw]);

        let status = adaptor.get_signature_status(&sig).await.unwrap().unwrap();
        assert!(status.is_confirmed());
        assert_eq!(adaptor.get_signature_status("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_mock_rejects_unsigned() {
        let adaptor = MockAdaptor::new();
        assert!(adaptor.send_transaction(&[0u8; 100], true).await.is_err());
        assert!(adaptor.sent_transactions().is_empty());
    }
}
