//! Leaf hash recomputation.
//!
//! The tree leaf commits to `data_hash` and `creator_hash`. The verify
//! program rejects metadata whose hash differs from the reported
//! `data_hash`, so checking locally saves a failed transaction.

use crate::error::{CutilsError, Result};
use crate::types::Pubkey;
use crate::verify::{Collection, Creator, Metadata, VerifyParams};
use borsh::BorshSerialize;
use sha3::{Digest, Keccak256};

#[derive(BorshSerialize)]
#[allow(dead_code)]
enum TokenStandard {
    NonFungible,
    FungibleAsset,
    Fungible,
    NonFungibleEdition,
}

#[derive(BorshSerialize)]
#[allow(dead_code)]
enum TokenProgramVersion {
    Original,
    Token2022,
}

/// Metadata layout as stored by the minting program. Field order is
/// significant.
#[derive(BorshSerialize)]
struct MetadataArgs<'a> {
    name: &'a str,
    symbol: &'a str,
    uri: &'a str,
    seller_fee_basis_points: u16,
    primary_sale_happened: bool,
    is_mutable: bool,
    edition_nonce: Option<u8>,
    token_standard: Option<TokenStandard>,
    collection: Option<Collection>,
    // `uses` is never set for these leaves; only its tag byte is hashed
    uses: Option<()>,
    token_program_version: TokenProgramVersion,
    creators: &'a [Creator],
}

pub fn hash_metadata(metadata: &Metadata) -> Result<[u8; 32]> {
    let args = MetadataArgs {
        name: &metadata.name,
        symbol: &metadata.symbol,
        uri: &metadata.uri,
        seller_fee_basis_points: metadata.seller_fee_basis_points,
        primary_sale_happened: metadata.primary_sale_happened,
        is_mutable: metadata.is_mutable,
        edition_nonce: metadata.edition_nonce,
        token_standard: Some(TokenStandard::NonFungible),
        collection: Some(metadata.collection),
        uses: None,
        token_program_version: TokenProgramVersion::Original,
        creators: &metadata.creators,
    };
    let args_hash = Keccak256::digest(borsh::to_vec(&args)?);
    let data_hash = Keccak256::new()
        .chain_update(args_hash)
        .chain_update(metadata.seller_fee_basis_points.to_le_bytes())
        .finalize();
    Ok(data_hash.into())
}

pub fn hash_creators(creators: &[Creator]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for creator in creators {
        hasher.update(creator.address.as_ref());
        hasher.update([creator.verified as u8, creator.share]);
    }
    hasher.finalize().into()
}

/// Compares the locally computed hashes with the ones in `params`.
pub fn check_leaf_hashes(params: &VerifyParams, metadata: &Metadata) -> Result<()> {
    let data_hash = hash_metadata(metadata)?;
    if data_hash != params.data_hash {
        return Err(CutilsError::HashMismatch {
            field: "data_hash",
            computed: Pubkey::new_from_array(data_hash),
            reported: Pubkey::new_from_array(params.data_hash),
        });
    }
    let creator_hash = hash_creators(&metadata.creators);
    if creator_hash != params.creator_hash {
        return Err(CutilsError::HashMismatch {
            field: "creator_hash",
            computed: Pubkey::new_from_array(creator_hash),
            reported: Pubkey::new_from_array(params.creator_hash),
        });
    }
    Ok(())
}
