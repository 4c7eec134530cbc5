//! Pattern tested against the full item path.

use tracing::{trace, warn};

use crate::config::FilterConfig;
use crate::types::ContainerItem;

const FILTER_NAME: &str = "PathRegexFilter";

pub(crate) fn is_match(item: &ContainerItem, config: &FilterConfig) -> bool {
    let Some(path_regex) = config.path_regex.as_ref() else {
        return true;
    };

    let match_result = match path_regex.is_match(&item.path) {
        Ok(result) => result,
        Err(e) => {
            warn!(
                name = FILTER_NAME,
                path = %item.path,
                path_regex = path_regex.as_str(),
                "regex evaluation failed: {e}"
            );
            false
        }
    };

    if !match_result {
        trace!(
            name = FILTER_NAME,
            path = %item.path,
            path_regex = path_regex.as_str(),
            "item filtered."
        );
    }

    match_result
}
