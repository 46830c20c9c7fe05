//! Client side of the `cutils` program's `verify` instruction.
//!
//! The program rebuilds the leaf from the supplied metadata and asks the
//! account-compression program to check it against the tree root, so the
//! argument layout here must match the program's borsh structs field for
//! field.

use crate::error::Result;
use crate::types::{AccountMeta, Instruction, Pubkey};
use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};

pub const CUTILS_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("14cpGE5kYBuZY9Pf6q9auoN5qj35H4WkYsQ4Cv4PAAV2");
pub const SPL_ACCOUNT_COMPRESSION_PROGRAM_ID: Pubkey =
    Pubkey::from_str_const("cmtDvXumGCrqC1Age74AVPhSRVXJMd8PJS91L8KbNCK");

pub const DISCRIMINATOR_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct VerifyParams {
    pub root: [u8; 32],
    pub data_hash: [u8; 32],
    pub creator_hash: [u8; 32],
    pub nonce: u64,
    pub index: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Metadata {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub collection: Collection,
    pub seller_fee_basis_points: u16,
    pub primary_sale_happened: bool,
    pub is_mutable: bool,
    pub edition_nonce: Option<u8>,
    pub creators: Vec<Creator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Collection {
    pub verified: bool,
    pub key: Pubkey,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Creator {
    pub address: Pubkey,
    pub verified: bool,
    pub share: u8,
}

/// Named accounts of the instruction, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyAccounts {
    pub leaf_owner: Pubkey,
    pub leaf_delegate: Pubkey,
    pub merkle_tree: Pubkey,
    pub compression_program: Pubkey,
}

impl VerifyAccounts {
    pub fn new(leaf_owner: Pubkey, leaf_delegate: Pubkey, merkle_tree: Pubkey) -> Self {
        Self {
            leaf_owner,
            leaf_delegate,
            merkle_tree,
            compression_program: SPL_ACCOUNT_COMPRESSION_PROGRAM_ID,
        }
    }

    pub fn to_account_metas(&self) -> Vec<AccountMeta> {
        vec![
            AccountMeta::new_readonly(self.leaf_owner, true),
            AccountMeta::new_readonly(self.leaf_delegate, false),
            AccountMeta::new_readonly(self.merkle_tree, false),
            AccountMeta::new_readonly(self.compression_program, false),
        ]
    }
}

/// First 8 bytes of `sha256("global:<name>")`, the method selector the
/// program dispatches on.
pub fn instruction_discriminator(name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let digest = Sha256::digest(format!("global:{name}").as_bytes());
    let mut out = [0u8; DISCRIMINATOR_LEN];
    out.copy_from_slice(&digest[..DISCRIMINATOR_LEN]);
    out
}

pub fn verify_instruction_data(params: &VerifyParams, metadata: &Metadata) -> Result<Vec<u8>> {
    let mut data = instruction_discriminator("verify").to_vec();
    params.serialize(&mut data)?;
    metadata.serialize(&mut data)?;
    Ok(data)
}

/// Builds the `verify` instruction. `proof_path` is appended after the named
/// accounts as the sibling nodes of the leaf, lowest level first.
pub fn verify_instruction(
    program_id: Pubkey,
    accounts: &VerifyAccounts,
    params: &VerifyParams,
    metadata: &Metadata,
    proof_path: &[AccountMeta],
) -> Result<Instruction> {
    let mut metas = accounts.to_account_metas();
    metas.extend_from_slice(proof_path);
    Ok(Instruction { program_id, accounts: metas, data: verify_instruction_data(params, metadata)? })
}
