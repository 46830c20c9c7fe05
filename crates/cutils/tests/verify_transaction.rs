use cutils_lib::hash::{hash_creators, hash_metadata};
use cutils_lib::keys::Keypair;
use cutils_lib::transaction::{Message, Transaction};
use cutils_lib::verify::{
    CUTILS_PROGRAM_ID, Collection, Creator, Metadata, SPL_ACCOUNT_COMPRESSION_PROGRAM_ID,
    VerifyAccounts, VerifyParams, verify_instruction,
};
use cutils_lib::{AccountMeta, Pubkey};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};

fn proof_path(depth: u8) -> Vec<AccountMeta> {
    (0..depth)
        .map(|i| AccountMeta::new_readonly(Pubkey::new_from_array([100 + i; 32]), false))
        .collect()
}

#[test]
fn verify_transaction_signed_by_leaf_owner() {
    let payer = Keypair::new();
    let tree = Pubkey::new_from_array([42u8; 32]);
    let metadata = Metadata {
        name: "Compressed #7".to_string(),
        symbol: "CMP".to_string(),
        uri: "https://arweave.net/nVRvZDaOk5YAdr4ZBEeMjOVhynuv8P3vywvuN5sYSPo".to_string(),
        collection: Collection { verified: true, key: Pubkey::new_from_array([77u8; 32]) },
        seller_fee_basis_points: 0,
        primary_sale_happened: false,
        is_mutable: false,
        edition_nonce: Some(0),
        creators: vec![Creator { address: payer.pubkey(), verified: false, share: 100 }],
    };
    let params = VerifyParams {
        root: [5u8; 32],
        data_hash: hash_metadata(&metadata).unwrap(),
        creator_hash: hash_creators(&metadata.creators),
        nonce: 7,
        index: 7,
    };
    let accounts = VerifyAccounts::new(payer.pubkey(), payer.pubkey(), tree);
    let proof = proof_path(14);
    let ix = verify_instruction(CUTILS_PROGRAM_ID, &accounts, &params, &metadata, &proof).unwrap();

    let blockhash = [9u8; 32];
    let tx = Transaction::new_signed(std::slice::from_ref(&ix), &payer, &[], blockhash).unwrap();

    // owner == payer == delegate collapse into the single writable signer
    assert_eq!(tx.signatures.len(), 1);
    let message = &tx.message;
    assert_eq!(message.header.num_required_signatures, 1);
    assert_eq!(message.account_keys[0], payer.pubkey());
    // tree, compression program, 14 proof nodes, cutils program
    assert_eq!(message.account_keys.len(), 1 + 1 + 1 + 14 + 1);
    assert_eq!(message.header.num_readonly_unsigned_accounts, 17);
    assert!(message.account_keys.contains(&SPL_ACCOUNT_COMPRESSION_PROGRAM_ID));

    let compiled = &message.instructions[0];
    assert_eq!(message.account_keys[compiled.program_id_index as usize], CUTILS_PROGRAM_ID);
    assert_eq!(compiled.accounts.len(), 4 + 14);
    assert_eq!(compiled.accounts[0], 0);
    assert_eq!(compiled.accounts[1], 0);
    assert_eq!(message.account_keys[compiled.accounts[2] as usize], tree);
    assert_eq!(compiled.data, ix.data);

    let payload = message.serialize().unwrap();
    let vk = VerifyingKey::from_bytes(payer.pubkey().as_bytes()).unwrap();
    vk.verify(&payload, &Signature::from_bytes(&tx.signatures[0])).unwrap();

    let wire = tx.serialize().unwrap();
    assert_eq!(wire[0], 1);
    assert_eq!(&wire[1..65], &tx.signatures[0]);
    assert_eq!(&wire[65..], payload.as_slice());
}

#[test]
fn verify_transaction_for_foreign_owner_needs_owner_signature() {
    let payer = Keypair::new();
    let owner = Keypair::new();
    let metadata = Metadata {
        name: String::new(),
        symbol: String::new(),
        uri: String::new(),
        collection: Collection { verified: true, key: Pubkey::default() },
        seller_fee_basis_points: 0,
        primary_sale_happened: false,
        is_mutable: true,
        edition_nonce: None,
        creators: vec![],
    };
    let params = VerifyParams {
        root: [0u8; 32],
        data_hash: [0u8; 32],
        creator_hash: [0u8; 32],
        nonce: 0,
        index: 0,
    };
    let accounts = VerifyAccounts::new(owner.pubkey(), owner.pubkey(), Pubkey::default());
    let ix = verify_instruction(CUTILS_PROGRAM_ID, &accounts, &params, &metadata, &[]).unwrap();

    let message = Message::compile(std::slice::from_ref(&ix), &payer.pubkey(), [0u8; 32]).unwrap();
    assert_eq!(message.signer_keys(), &[payer.pubkey(), owner.pubkey()]);
    assert!(Transaction::sign(message.clone(), &[&payer]).is_err());

    let tx = Transaction::sign(message, &[&owner, &payer]).unwrap();
    assert_eq!(tx.signatures.len(), 2);
    assert_eq!(tx.signature().unwrap(), bs58::encode(tx.signatures[0]).into_string());
}
