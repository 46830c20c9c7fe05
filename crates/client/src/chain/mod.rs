pub mod chain_adaptor;
pub mod mock_adaptor;
pub mod solana_adaptor;

pub use chain_adaptor::{
    ChainAdaptor, ConfirmationStatus, SignatureStatus, SolanaNetwork, get_chain_adaptor,
};
