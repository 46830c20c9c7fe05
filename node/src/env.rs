use client::chain::SolanaNetwork;
use cutils_lib::Pubkey;
use cutils_lib::verify::CUTILS_PROGRAM_ID;
use std::path::PathBuf;
use std::str::FromStr;

pub const ENV_SOLANA_NETWORK: &str = "SOLANA_NETWORK";
pub const ENV_SOLANA_RPC_URL: &str = "SOLANA_RPC_URL";
pub const ENV_READ_API_URL: &str = "READ_API_URL";
pub const ENV_PAYER_KEYPAIR: &str = "PAYER_KEYPAIR";
pub const ENV_PUBLIC_KEYS_FILE: &str = "PUBLIC_KEYS_FILE";
pub const ENV_CUTILS_PROGRAM_ID: &str = "CUTILS_PROGRAM_ID";

pub const DEFAULT_PAYER_KEYPAIR: &str = ".keys/payer.json";
pub const DEFAULT_PUBLIC_KEYS_FILE: &str = ".keys/public_keys.json";

const SOLANA_NETWORK: SolanaNetwork = SolanaNetwork::Devnet;

pub const CONFIRM_ATTEMPTS: usize = 30;
pub const CONFIRM_INTERVAL_MILLIS: u64 = 1000;

pub fn get_network() -> anyhow::Result<SolanaNetwork> {
    match std::env::var(ENV_SOLANA_NETWORK) {
        Ok(network) => SolanaNetwork::from_str(&network)
            .map_err(|_| anyhow::format_err!("unknown {ENV_SOLANA_NETWORK} {network}")),
        Err(_) => Ok(SOLANA_NETWORK),
    }
}

/// Ledger RPC endpoint; `None` means the network's public default.
pub fn get_rpc_url() -> Option<String> {
    std::env::var(ENV_SOLANA_RPC_URL).ok()
}

/// Read-API endpoint. Most providers serve the read API on the same URL as
/// the ledger RPC, so that is the fallback.
pub fn get_read_api_url(network: SolanaNetwork) -> String {
    std::env::var(ENV_READ_API_URL)
        .ok()
        .or_else(get_rpc_url)
        .unwrap_or_else(|| network.default_rpc_url().to_string())
}

pub fn get_payer_keypair_path() -> PathBuf {
    std::env::var(ENV_PAYER_KEYPAIR).unwrap_or_else(|_| DEFAULT_PAYER_KEYPAIR.to_string()).into()
}

pub fn get_public_keys_path() -> PathBuf {
    std::env::var(ENV_PUBLIC_KEYS_FILE)
        .unwrap_or_else(|_| DEFAULT_PUBLIC_KEYS_FILE.to_string())
        .into()
}

pub fn get_program_id() -> anyhow::Result<Pubkey> {
    match std::env::var(ENV_CUTILS_PROGRAM_ID) {
        Ok(program_id) => Ok(Pubkey::from_str(&program_id)?),
        Err(_) => Ok(CUTILS_PROGRAM_ID),
    }
}
