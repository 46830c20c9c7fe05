//! Legacy ledger transaction format.
//!
//! Wire layout:
//! `signatures ++ header ++ account_keys ++ recent_blockhash ++ instructions`,
//! every array prefixed by a compact-u16 length.

use crate::error::{CutilsError, Result};
use crate::keys::{Keypair, SIGNATURE_BYTES};
use crate::types::{Instruction, Pubkey};

/// Maximum serialized transaction size accepted by the network.
pub const PACKET_DATA_SIZE: usize = 1280 - 40 - 8;

const MAX_ACCOUNT_KEYS: usize = u8::MAX as usize + 1;

/// Appends `len` as a compact-u16: 7 bits per byte, high bit set while more
/// bytes follow.
pub fn encode_length(buf: &mut Vec<u8>, len: usize) -> Result<()> {
    let mut rem = u16::try_from(len).map_err(|_| CutilsError::LengthOverflow(len))?;
    loop {
        let mut elem = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            buf.push(elem);
            return Ok(());
        }
        elem |= 0x80;
        buf.push(elem);
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: [u8; 32],
    pub instructions: Vec<CompiledInstruction>,
}

#[derive(Debug, Clone, Copy)]
struct KeyEntry {
    pubkey: Pubkey,
    is_signer: bool,
    is_writable: bool,
}

fn keys_where(entries: &[KeyEntry], is_signer: bool, is_writable: bool) -> Vec<Pubkey> {
    entries
        .iter()
        .filter(|e| e.is_signer == is_signer && e.is_writable == is_writable)
        .map(|e| e.pubkey)
        .collect()
}

impl Message {
    /// Compiles `instructions` with `payer` as the fee payer.
    ///
    /// Accounts are deduplicated with their signer/writable flags merged and
    /// ordered: payer, writable signers, read-only signers, writable
    /// non-signers, read-only non-signers. Within a group the order of first
    /// appearance is kept.
    pub fn compile(
        instructions: &[Instruction],
        payer: &Pubkey,
        recent_blockhash: [u8; 32],
    ) -> Result<Self> {
        let mut entries =
            vec![KeyEntry { pubkey: *payer, is_signer: true, is_writable: true }];
        let mut upsert = |pubkey: Pubkey, is_signer: bool, is_writable: bool| {
            match entries.iter_mut().find(|entry| entry.pubkey == pubkey) {
                Some(entry) => {
                    entry.is_signer |= is_signer;
                    entry.is_writable |= is_writable;
                }
                None => entries.push(KeyEntry { pubkey, is_signer, is_writable }),
            }
        };
        for ix in instructions {
            for meta in &ix.accounts {
                upsert(meta.pubkey, meta.is_signer, meta.is_writable);
            }
            upsert(ix.program_id, false, false);
        }

        if entries.len() > MAX_ACCOUNT_KEYS {
            return Err(CutilsError::TooManyAccounts(entries.len()));
        }

        let writable_signers = keys_where(&entries, true, true);
        let readonly_signers = keys_where(&entries, true, false);
        let writable_unsigned = keys_where(&entries, false, true);
        let readonly_unsigned = keys_where(&entries, false, false);

        let count = |n: usize| {
            u8::try_from(n).map_err(|_| CutilsError::TooManyAccounts(entries.len()))
        };
        let header = MessageHeader {
            num_required_signatures: count(writable_signers.len() + readonly_signers.len())?,
            num_readonly_signed_accounts: count(readonly_signers.len())?,
            num_readonly_unsigned_accounts: count(readonly_unsigned.len())?,
        };
        let account_keys: Vec<Pubkey> = writable_signers
            .into_iter()
            .chain(readonly_signers)
            .chain(writable_unsigned)
            .chain(readonly_unsigned)
            .collect();

        let position = |key: &Pubkey| -> u8 {
            // every key was inserted above and the count fits in a u8 index
            account_keys.iter().position(|k| k == key).unwrap_or_default() as u8
        };
        let instructions = instructions
            .iter()
            .map(|ix| CompiledInstruction {
                program_id_index: position(&ix.program_id),
                accounts: ix.accounts.iter().map(|meta| position(&meta.pubkey)).collect(),
                data: ix.data.clone(),
            })
            .collect();

        Ok(Self { header, account_keys, recent_blockhash, instructions })
    }

    pub fn signer_keys(&self) -> &[Pubkey] {
        &self.account_keys[..self.header.num_required_signatures as usize]
    }

    pub fn is_writable(&self, index: usize) -> bool {
        let num_signed = self.header.num_required_signatures as usize;
        if index < num_signed {
            index < num_signed - self.header.num_readonly_signed_accounts as usize
        } else {
            index < self.account_keys.len() - self.header.num_readonly_unsigned_accounts as usize
        }
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut buf = vec![
            self.header.num_required_signatures,
            self.header.num_readonly_signed_accounts,
            self.header.num_readonly_unsigned_accounts,
        ];
        encode_length(&mut buf, self.account_keys.len())?;
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_ref());
        }
        buf.extend_from_slice(&self.recent_blockhash);
        encode_length(&mut buf, self.instructions.len())?;
        for ix in &self.instructions {
            buf.push(ix.program_id_index);
            encode_length(&mut buf, ix.accounts.len())?;
            buf.extend_from_slice(&ix.accounts);
            encode_length(&mut buf, ix.data.len())?;
            buf.extend_from_slice(&ix.data);
        }
        Ok(buf)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<[u8; SIGNATURE_BYTES]>,
    pub message: Message,
}

impl Transaction {
    /// Signs `message` with `signers`. Every required signer of the message
    /// must be present; extra keypairs are ignored.
    pub fn sign(message: Message, signers: &[&Keypair]) -> Result<Self> {
        let payload = message.serialize()?;
        let signatures = message
            .signer_keys()
            .iter()
            .map(|key| {
                signers
                    .iter()
                    .find(|kp| kp.pubkey() == *key)
                    .map(|kp| kp.sign_message(&payload))
                    .ok_or(CutilsError::MissingSigner(*key))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { signatures, message })
    }

    pub fn new_signed(
        instructions: &[Instruction],
        payer: &Keypair,
        signers: &[&Keypair],
        recent_blockhash: [u8; 32],
    ) -> Result<Self> {
        let message = Message::compile(instructions, &payer.pubkey(), recent_blockhash)?;
        let mut all = Vec::with_capacity(signers.len() + 1);
        all.push(payer);
        all.extend_from_slice(signers);
        Self::sign(message, &all)
    }

    /// Base58 form of the fee payer's signature, which is the transaction id.
    pub fn signature(&self) -> Option<String> {
        self.signatures.first().map(|sig| bs58::encode(sig).into_string())
    }

    pub fn serialize(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        encode_length(&mut buf, self.signatures.len())?;
        for sig in &self.signatures {
            buf.extend_from_slice(sig);
        }
        buf.extend_from_slice(&self.message.serialize()?);
        if buf.len() > PACKET_DATA_SIZE {
            return Err(CutilsError::TransactionTooLarge(buf.len()));
        }
        Ok(buf)
    }
}
