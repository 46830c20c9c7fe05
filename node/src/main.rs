use anyhow::Result;
use clap::{Parser, Subcommand};
use client::CutilsClient;
use client::chain::SolanaNetwork;
use client::client::ConfirmConfig;
use cutils_lib::Pubkey;
use cutils_lib::keys::{
    Keypair, TreePublicKeys, load_or_generate_keypair, load_public_keys_from_file,
    read_keypair_file, save_public_keys_to_file, write_keypair_file,
};
use cutils_node::action::{VerifyOptions, verify_asset};
use cutils_node::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Opts {
    /// Ledger network, overrides SOLANA_NETWORK
    #[arg(long)]
    network: Option<SolanaNetwork>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug, Clone)]
enum Commands {
    /// Verify a compressed NFT through the cutils program
    Verify(VerifyArg),
    /// Generate a keypair file
    Keygen {
        #[arg(long)]
        out: Option<PathBuf>,
        /// Replace an existing file
        #[arg(long, default_value = "false")]
        force: bool,
    },
    /// Print the payer and the persisted tree/collection addresses
    ShowKeys,
    /// Persist the tree/collection addresses used by `verify`
    SetKeys {
        #[arg(long)]
        collection_mint: Pubkey,
        #[arg(long)]
        tree_address: Pubkey,
    },
}

#[derive(Parser, Debug, Clone)]
struct VerifyArg {
    /// Asset id of the compressed NFT
    #[arg(long)]
    asset_id: String,

    /// Proof nodes cached on-chain by the tree canopy
    #[arg(long, default_value = "0")]
    canopy_depth: usize,

    /// Submit without recomputing the leaf hashes locally
    #[arg(long, default_value = "false")]
    skip_precheck: bool,

    /// Run the node's transaction simulation before submitting
    #[arg(long, default_value = "false")]
    preflight: bool,

    /// Keypair of the leaf owner when it is not the payer
    #[arg(long)]
    owner_keypair: Option<PathBuf>,

    /// Verify against the asset's reported tree, ignoring the public keys file
    #[arg(long, default_value = "false")]
    any_tree: bool,
}

fn load_tree_keys(any_tree: bool) -> Result<Option<TreePublicKeys>> {
    if any_tree {
        return Ok(None);
    }
    let path = env::get_public_keys_path();
    if !path.exists() {
        tracing::warn!("{} not found, using the tree reported by the read API", path.display());
        return Ok(None);
    }
    Ok(Some(load_public_keys_from_file(&path)?))
}

async fn run_verify(network: SolanaNetwork, arg: VerifyArg) -> Result<()> {
    let payer = load_or_generate_keypair(env::get_payer_keypair_path())?;
    tracing::info!("payer {}", payer.pubkey());
    let owner = arg.owner_keypair.as_ref().map(read_keypair_file).transpose()?;
    let tree_keys = load_tree_keys(arg.any_tree)?;
    let program_id = env::get_program_id()?;

    let read_api_url = env::get_read_api_url(network);
    let rpc_url = env::get_rpc_url();
    tracing::info!("network {}, read API {}", network, read_api_url);
    let client = CutilsClient::new(&read_api_url, network, rpc_url.as_deref()).with_confirm_config(
        ConfirmConfig {
            attempts: env::CONFIRM_ATTEMPTS,
            interval: Duration::from_millis(env::CONFIRM_INTERVAL_MILLIS),
        },
    );

    let options = VerifyOptions {
        asset_id: arg.asset_id,
        canopy_depth: arg.canopy_depth,
        skip_precheck: arg.skip_precheck,
        skip_preflight: !arg.preflight,
    };
    let signature =
        verify_asset(&client, &payer, owner.as_ref(), tree_keys.as_ref(), program_id, &options)
            .await?;
    println!("{signature}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let _ = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
    let opt = Opts::parse();
    let network = match opt.network {
        Some(network) => network,
        None => env::get_network()?,
    };

    match opt.cmd {
        Commands::Verify(arg) => run_verify(network, arg).await?,
        Commands::Keygen { out, force } => {
            let path = out.unwrap_or_else(env::get_payer_keypair_path);
            if path.exists() && !force {
                anyhow::bail!("{} already exists, pass --force to replace it", path.display());
            }
            let keypair = Keypair::new();
            write_keypair_file(&keypair, &path)?;
            println!("Wrote {} to {}", keypair.pubkey(), path.display());
        }
        Commands::ShowKeys => {
            let payer_path = env::get_payer_keypair_path();
            match read_keypair_file(&payer_path) {
                Ok(payer) => println!("payer: {}", payer.pubkey()),
                Err(e) => println!("payer: unavailable ({}: {e})", payer_path.display()),
            }
            let keys = load_public_keys_from_file(env::get_public_keys_path())?;
            println!("collectionMint: {}", keys.collection_mint);
            println!("treeAddress: {}", keys.tree_address);
        }
        Commands::SetKeys { collection_mint, tree_address } => {
            let path = env::get_public_keys_path();
            save_public_keys_to_file(&TreePublicKeys { collection_mint, tree_address }, &path)?;
            println!("Saved public keys to {}", path.display());
        }
    }
    Ok(())
}
