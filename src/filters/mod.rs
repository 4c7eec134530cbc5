//! Container item filtering.
//!
//! An item matches when it is a file and every configured pattern matches.
//! An absent pattern imposes no constraint.

use tracing::trace;

use crate::config::FilterConfig;
use crate::types::ContainerItem;

mod filter_properties;
pub mod filename_regex;
pub mod path_regex;

/// Evaluate one container item against the configured patterns.
pub fn is_match(item: &ContainerItem, config: &FilterConfig) -> bool {
    if !item.is_file() {
        trace!(path = %item.path, "folder skipped.");
        return false;
    }

    path_regex::is_match(item, config) && filename_regex::is_match(item, config)
}

/// Keep the matching items, preserving their order.
pub fn filter_items(items: Vec<ContainerItem>, config: &FilterConfig) -> Vec<ContainerItem> {
    items
        .into_iter()
        .filter(|item| is_match(item, config))
        .collect()
}
