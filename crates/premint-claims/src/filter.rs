//! Selection of items that still need a claim.

use premint_core::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Which source items are signed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Sign every source item.
    #[default]
    All,
    /// Skip items that already exist on the target registry.
    OnlyUnclaimed,
}

/// Removes already-redeemed items from a batch.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClaimSetFilter {
    mode: FilterMode,
}

impl ClaimSetFilter {
    /// Create a filter.
    pub fn new(mode: FilterMode) -> Self {
        Self { mode }
    }

    /// Filter from the `only_unclaimed` configuration flag.
    pub fn from_flag(only_unclaimed: bool) -> Self {
        Self::new(if only_unclaimed {
            FilterMode::OnlyUnclaimed
        } else {
            FilterMode::All
        })
    }

    /// Active mode.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Keep the items still to be signed, in their original order.
    pub fn filter<T>(&self, items: Vec<T>, id_of: impl Fn(&T) -> ItemId, redeemed: &[ItemId]) -> Vec<T> {
        match self.mode {
            FilterMode::All => items,
            FilterMode::OnlyUnclaimed => {
                let redeemed: BTreeSet<ItemId> = redeemed.iter().copied().collect();
                items
                    .into_iter()
                    .filter(|item| !redeemed.contains(&id_of(item)))
                    .collect()
            }
        }
    }
}
