use crate::error::{CutilsError, Result};
use crate::types::Pubkey;
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::Path;

pub const KEYPAIR_BYTES: usize = 64;
pub const SIGNATURE_BYTES: usize = 64;

/// An ed25519 keypair in the 64-byte `secret ++ public` layout used by
/// ledger key files.
pub struct Keypair(SigningKey);

impl Keypair {
    pub fn new() -> Self {
        Keypair(SigningKey::generate(&mut OsRng))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; KEYPAIR_BYTES] = bytes.try_into().map_err(|_| {
            CutilsError::InvalidLength { expected: KEYPAIR_BYTES, actual: bytes.len() }
        })?;
        Ok(Keypair(SigningKey::from_keypair_bytes(&bytes)?))
    }

    pub fn to_bytes(&self) -> [u8; KEYPAIR_BYTES] {
        self.0.to_keypair_bytes()
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new_from_array(self.0.verifying_key().to_bytes())
    }

    pub fn sign_message(&self, message: &[u8]) -> [u8; SIGNATURE_BYTES] {
        self.0.sign(message).to_bytes()
    }
}

impl Default for Keypair {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Keypair").field(&self.pubkey()).finish()
    }
}

/// Reads a key file holding a JSON array of 64 numbers.
pub fn read_keypair_file(path: impl AsRef<Path>) -> Result<Keypair> {
    let content = fs::read_to_string(path)?;
    let bytes: Vec<u8> = serde_json::from_str(&content)?;
    Keypair::from_bytes(&bytes)
}

pub fn write_keypair_file(keypair: &Keypair, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
        options.mode(0o600);
        // mode only applies on creation
        if path.exists() {
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
        }
    }
    let mut file = options.open(path)?;
    file.write_all(serde_json::to_string(&keypair.to_bytes().to_vec())?.as_bytes())?;
    Ok(())
}

/// Loads the keypair at `path`, creating and persisting a fresh one when the
/// file does not exist yet.
pub fn load_or_generate_keypair(path: impl AsRef<Path>) -> Result<Keypair> {
    let path = path.as_ref();
    if path.exists() {
        return read_keypair_file(path);
    }
    let keypair = Keypair::new();
    write_keypair_file(&keypair, path)?;
    tracing::info!("generated keypair {} at {}", keypair.pubkey(), path.display());
    Ok(keypair)
}

/// Addresses persisted by the tree/collection setup step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreePublicKeys {
    pub collection_mint: Pubkey,
    pub tree_address: Pubkey,
}

pub fn load_public_keys_from_file(path: impl AsRef<Path>) -> Result<TreePublicKeys> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_public_keys_to_file(keys: &TreePublicKeys, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, serde_json::to_string_pretty(keys)?)?;
    Ok(())
}
