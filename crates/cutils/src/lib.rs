pub mod error;
pub mod hash;
pub mod keys;
pub mod transaction;
pub mod types;
pub mod verify;

pub use error::{CutilsError, Result};
pub use types::{AccountMeta, Instruction, Pubkey};
