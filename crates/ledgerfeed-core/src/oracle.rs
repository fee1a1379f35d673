//! Collaborator seams: feed-lock oracle and asset registry.
//!
//! Both are historical protocol state owned by the host. They are passed in
//! explicitly so decoding can be tested against fakes.

use std::collections::HashMap;

use crate::transaction::Address;

/// Answers whether a feed is currently locked.
///
/// Implementations must be side-effect free. Concurrent decoding is only
/// safe if the implementation is also safe for concurrent reads.
pub trait LockOracle {
    /// True if `source` has locked its feed
    fn is_locked(&self, source: &Address) -> bool;
}

impl<F> LockOracle for F
where
    F: Fn(&Address) -> bool,
{
    fn is_locked(&self, source: &Address) -> bool {
        self(source)
    }
}

/// Asset metadata needed to display a quoted price.
pub trait AssetRegistry {
    /// True if amounts in this asset are scaled by the protocol unit
    fn is_divisible(&self, asset_id: u64) -> bool;

    /// Display name of the asset
    fn asset_name(&self, asset_id: u64) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AssetInfo {
    name: String,
    divisible: bool,
}

/// Fixed asset table, for tools and tests.
///
/// Unknown assets are indivisible and named `ASSET#<id>`.
#[derive(Debug, Clone, Default)]
pub struct StaticAssetRegistry {
    assets: HashMap<u64, AssetInfo>,
}

impl StaticAssetRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an asset, replacing any previous entry for `asset_id`
    #[must_use]
    pub fn with_asset(mut self, asset_id: u64, name: impl Into<String>, divisible: bool) -> Self {
        self.assets.insert(asset_id, AssetInfo { name: name.into(), divisible });
        self
    }
}

impl AssetRegistry for StaticAssetRegistry {
    fn is_divisible(&self, asset_id: u64) -> bool {
        self.assets.get(&asset_id).is_some_and(|info| info.divisible)
    }

    fn asset_name(&self, asset_id: u64) -> String {
        self.assets
            .get(&asset_id)
            .map_or_else(|| format!("ASSET#{asset_id}"), |info| info.name.clone())
    }
}
