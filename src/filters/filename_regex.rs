//! Pattern tested against the last segment of the item path.

use tracing::{trace, warn};

use crate::config::FilterConfig;
use crate::types::ContainerItem;

const FILTER_NAME: &str = "FilenameRegexFilter";

pub(crate) fn is_match(item: &ContainerItem, config: &FilterConfig) -> bool {
    let Some(filename_regex) = config.filename_regex.as_ref() else {
        return true;
    };

    let file_name = item.file_name();
    let match_result = match filename_regex.is_match(file_name) {
        Ok(result) => result,
        Err(e) => {
            warn!(
                name = FILTER_NAME,
                path = %item.path,
                filename_regex = filename_regex.as_str(),
                "regex evaluation failed: {e}"
            );
            false
        }
    };

    trace!(
        name = FILTER_NAME,
        path = %item.path,
        file_name = file_name,
        file_length = item.file_length,
        regex_match = match_result,
        "filename tested."
    );

    match_result
}
