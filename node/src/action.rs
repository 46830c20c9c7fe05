use anyhow::{Context, bail};
use client::CutilsClient;
use client::convert::VerifyRequest;
use client::read_api::{Asset, AssetProof};
use cutils_lib::keys::{Keypair, TreePublicKeys};
use cutils_lib::{Instruction, Pubkey};

#[derive(Debug, Clone)]
pub struct VerifyOptions {
    pub asset_id: String,
    /// Number of proof nodes cached in the tree canopy.
    pub canopy_depth: usize,
    pub skip_precheck: bool,
    pub skip_preflight: bool,
}

/// Maps a fetched asset and proof into the `verify` instruction.
///
/// When `tree_keys` is given the asset must live in that tree. Unless
/// `skip_precheck` is set the leaf hashes are recomputed and compared first.
pub fn build_verify_instruction(
    asset: &Asset,
    proof: &AssetProof,
    tree_keys: Option<&TreePublicKeys>,
    program_id: Pubkey,
    options: &VerifyOptions,
) -> anyhow::Result<Instruction> {
    if asset.burnt {
        bail!("asset {} is burnt", asset.id);
    }
    if !asset.compression.compressed {
        tracing::warn!("asset {} is not reported as compressed", asset.id);
    }
    let request = VerifyRequest::from_read_api(
        asset,
        proof,
        tree_keys.map(|keys| keys.tree_address),
        options.canopy_depth,
    )?;
    if let Some(keys) = tree_keys {
        if request.metadata.collection.key != keys.collection_mint {
            tracing::warn!(
                "asset collection {} differs from collectionMint {}",
                request.metadata.collection.key,
                keys.collection_mint
            );
        }
    }
    if options.skip_precheck {
        tracing::info!("skipping leaf hash precheck");
    } else {
        request.check_leaf_hashes().context("leaf hash precheck failed")?;
    }
    tracing::debug!(
        "verify leaf {} of tree {} with {} proof accounts",
        request.params.index,
        request.accounts.merkle_tree,
        request.proof_path.len()
    );
    Ok(request.instruction(program_id)?)
}

/// Fetches the asset and its proof, builds the verify instruction and lands
/// it. Returns the transaction signature.
///
/// The leaf owner must sign; pass `owner` when it is not the payer.
pub async fn verify_asset(
    client: &CutilsClient,
    payer: &Keypair,
    owner: Option<&Keypair>,
    tree_keys: Option<&TreePublicKeys>,
    program_id: Pubkey,
    options: &VerifyOptions,
) -> anyhow::Result<String> {
    if let Some(keys) = tree_keys {
        tracing::info!("collectionMint {}", keys.collection_mint);
        tracing::info!("treeAddress {}", keys.tree_address);
    }
    let (asset, proof) = client
        .fetch_asset_with_proof(&options.asset_id)
        .await
        .with_context(|| format!("fetch asset {}", options.asset_id))?;
    let ix = build_verify_instruction(&asset, &proof, tree_keys, program_id, options)?;

    let signers: Vec<&Keypair> = owner.into_iter().collect();
    let signature = client
        .send_and_confirm(&[ix], payer, &signers, options.skip_preflight)
        .await
        .context("submit verify transaction")?;
    tracing::info!("Tx Signature: {}", signature);
    Ok(signature)
}
