//! Derived lookup structures rebuilt from store snapshots.

pub mod period_index;
