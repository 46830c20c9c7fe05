use crate::error::Result;
use crate::jsonrpc::JsonRpcTransport;
use serde::{Deserialize, Serialize};
use serde_json::json;

pub const GET_ASSET: &str = "getAsset";
pub const GET_ASSET_PROOF: &str = "getAssetProof";

/// Asset record as returned by `getAsset`. Only the fields the verify flow
/// reads are modelled; everything else is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub content: AssetContent,
    pub compression: AssetCompression,
    #[serde(default)]
    pub grouping: Vec<AssetGrouping>,
    pub royalty: AssetRoyalty,
    #[serde(default)]
    pub creators: Vec<AssetCreator>,
    pub ownership: AssetOwnership,
    #[serde(default)]
    pub supply: Option<AssetSupply>,
    pub mutable: bool,
    #[serde(default)]
    pub burnt: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetContent {
    #[serde(default)]
    pub json_uri: String,
    #[serde(default)]
    pub metadata: Option<AssetMetadata>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetCompression {
    pub data_hash: String,
    pub creator_hash: String,
    #[serde(default)]
    pub asset_hash: String,
    pub tree: String,
    #[serde(default)]
    pub seq: u64,
    pub leaf_id: u64,
    #[serde(default)]
    pub compressed: bool,
    #[serde(default)]
    pub eligible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetGrouping {
    pub group_key: String,
    #[serde(default)]
    pub group_value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRoyalty {
    #[serde(default)]
    pub royalty_model: String,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub percent: f64,
    pub basis_points: u64,
    pub primary_sale_happened: bool,
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetCreator {
    pub address: String,
    pub share: u8,
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetOwnership {
    #[serde(default)]
    pub frozen: bool,
    #[serde(default)]
    pub delegated: bool,
    #[serde(default)]
    pub delegate: Option<String>,
    #[serde(default)]
    pub ownership_model: String,
    pub owner: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetSupply {
    #[serde(default)]
    pub print_max_supply: Option<u64>,
    #[serde(default)]
    pub print_current_supply: Option<u64>,
    #[serde(default)]
    pub edition_nonce: Option<u8>,
}

/// Result of `getAssetProof`: sibling hashes from the leaf up, plus the root
/// they hash to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetProof {
    pub root: String,
    pub proof: Vec<String>,
    pub node_index: u64,
    pub leaf: String,
    pub tree_id: String,
}

/// Client for the off-chain indexer's asset and proof lookups.
#[derive(Clone, Debug)]
pub struct ReadApiClient {
    transport: JsonRpcTransport,
}

impl ReadApiClient {
    pub fn new(endpoint: &str) -> Self {
        Self { transport: JsonRpcTransport::new(endpoint) }
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    pub async fn get_asset(&self, asset_id: &str) -> Result<Asset> {
        self.transport.call(GET_ASSET, json!({ "id": asset_id })).await
    }

    pub async fn get_asset_proof(&self, asset_id: &str) -> Result<AssetProof> {
        self.transport.call(GET_ASSET_PROOF, json!({ "id": asset_id })).await
    }
}
