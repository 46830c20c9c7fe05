//! Mapping from read-API records into the verify instruction's arguments and
//! accounts.

use crate::error::{ClientError, Result};
use crate::read_api::{Asset, AssetProof};
use cutils_lib::verify::{
    Collection, Creator, Metadata, VerifyAccounts, VerifyParams, verify_instruction,
};
use cutils_lib::{AccountMeta, Instruction, Pubkey};
use std::str::FromStr;

pub const COLLECTION_GROUP_KEY: &str = "collection";

fn pubkey(field: &'static str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value)
        .map_err(|e| ClientError::InvalidField { field, reason: e.to_string() })
}

/// Decodes a base58 hash or address into its 32 bytes.
pub fn decode(field: &'static str, value: &str) -> Result<[u8; 32]> {
    Ok(pubkey(field, value)?.to_bytes())
}

/// Turns the proof path into read-only accounts, dropping the top
/// `canopy_depth` nodes which the tree keeps on-chain.
pub fn map_proof(proof: &AssetProof, canopy_depth: usize) -> Result<Vec<AccountMeta>> {
    if canopy_depth > proof.proof.len() {
        return Err(ClientError::InvalidField {
            field: "proof",
            reason: format!(
                "canopy depth {canopy_depth} exceeds proof length {}",
                proof.proof.len()
            ),
        });
    }
    let keep = proof.proof.len() - canopy_depth;
    proof.proof[..keep]
        .iter()
        .map(|node| Ok(AccountMeta::new_readonly(pubkey("proof", node)?, false)))
        .collect()
}

pub fn verify_params(asset: &Asset, proof: &AssetProof) -> Result<VerifyParams> {
    let leaf_id = asset.compression.leaf_id;
    let index = u32::try_from(leaf_id).map_err(|_| ClientError::InvalidField {
        field: "compression.leaf_id",
        reason: format!("{leaf_id} does not fit a u32 leaf index"),
    })?;
    Ok(VerifyParams {
        root: decode("root", &proof.root)?,
        data_hash: decode("compression.data_hash", &asset.compression.data_hash)?,
        creator_hash: decode("compression.creator_hash", &asset.compression.creator_hash)?,
        nonce: leaf_id,
        index,
    })
}

/// Key of the asset's `collection` group.
pub fn collection_key(asset: &Asset) -> Result<Pubkey> {
    let group_value = asset
        .grouping
        .iter()
        .find(|group| group.group_key == COLLECTION_GROUP_KEY)
        .and_then(|group| group.group_value.as_deref())
        .ok_or_else(|| ClientError::InvalidField {
            field: "grouping",
            reason: format!("asset {} has no collection group", asset.id),
        })?;
    pubkey("grouping.group_value", group_value)
}

pub fn metadata(asset: &Asset) -> Result<Metadata> {
    let content_metadata = asset.content.metadata.clone().unwrap_or_default();
    let basis_points = asset.royalty.basis_points;
    let seller_fee_basis_points =
        u16::try_from(basis_points).map_err(|_| ClientError::InvalidField {
            field: "royalty.basis_points",
            reason: format!("{basis_points} does not fit a u16"),
        })?;
    let creators = asset
        .creators
        .iter()
        .map(|creator| {
            Ok(Creator {
                address: pubkey("creators.address", &creator.address)?,
                verified: creator.verified,
                share: creator.share,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Metadata {
        name: content_metadata.name.unwrap_or_default(),
        symbol: content_metadata.symbol.unwrap_or_default(),
        uri: asset.content.json_uri.clone(),
        collection: Collection { verified: true, key: collection_key(asset)? },
        seller_fee_basis_points,
        primary_sale_happened: asset.royalty.primary_sale_happened,
        is_mutable: asset.mutable,
        edition_nonce: asset.supply.as_ref().and_then(|supply| supply.edition_nonce),
        creators,
    })
}

/// Leaf owner and delegate; the delegate falls back to the owner when the
/// asset is not delegated.
pub fn leaf_accounts(asset: &Asset, merkle_tree: Pubkey) -> Result<VerifyAccounts> {
    let owner = pubkey("ownership.owner", &asset.ownership.owner)?;
    let delegate = match asset.ownership.delegate.as_deref() {
        Some(delegate) => pubkey("ownership.delegate", delegate)?,
        None => owner,
    };
    Ok(VerifyAccounts::new(owner, delegate, merkle_tree))
}

/// Everything the verify instruction needs, mapped from one asset and its
/// proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyRequest {
    pub params: VerifyParams,
    pub metadata: Metadata,
    pub accounts: VerifyAccounts,
    pub proof_path: Vec<AccountMeta>,
}

impl VerifyRequest {
    /// `merkle_tree` is the tree the caller expects the asset to live in; it
    /// must match the tree reported by the read API. When `None` the reported
    /// tree is used.
    pub fn from_read_api(
        asset: &Asset,
        proof: &AssetProof,
        merkle_tree: Option<Pubkey>,
        canopy_depth: usize,
    ) -> Result<Self> {
        let asset_tree = pubkey("compression.tree", &asset.compression.tree)?;
        let merkle_tree = match merkle_tree {
            Some(expected) if expected != asset_tree => {
                return Err(ClientError::InvalidField {
                    field: "compression.tree",
                    reason: format!("asset {} lives in tree {asset_tree}, expected {expected}", asset.id),
                });
            }
            Some(expected) => expected,
            None => asset_tree,
        };
        Ok(Self {
            params: verify_params(asset, proof)?,
            metadata: metadata(asset)?,
            accounts: leaf_accounts(asset, merkle_tree)?,
            proof_path: map_proof(proof, canopy_depth)?,
        })
    }

    pub fn check_leaf_hashes(&self) -> Result<()> {
        Ok(cutils_lib::hash::check_leaf_hashes(&self.params, &self.metadata)?)
    }

    pub fn instruction(&self, program_id: Pubkey) -> Result<Instruction> {
        Ok(verify_instruction(
            program_id,
            &self.accounts,
            &self.params,
            &self.metadata,
            &self.proof_path,
        )?)
    }
}
