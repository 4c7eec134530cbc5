// Property-based tests across the scan and deletion halves of the library.
//
// A scan never exports folders, and the CSV it writes reads back into
// deletion records equal to the exported rows.

#[cfg(test)]
mod tests {
    use crate::config::{AgeWindow, FilterConfig, ScanConfig};
    use crate::deleter::validate_records;
    use crate::export::{read_rows, write_rows};
    use crate::pipeline::ArtifactScanPipeline;
    use crate::test_utils::{MockAzureDevOps, make_artifact, make_build};
    use crate::types::{ContainerItem, ContainerItemType, DeletionRecord, ScanResultRow};
    use chrono::{DateTime, Utc};
    use fancy_regex::Regex;
    use proptest::prelude::*;

    // --- Generators ---

    // Folder names are upper case and file names lower case, so a folder
    // never shares its path with a file.
    fn arbitrary_item() -> impl Strategy<Value = ContainerItem> {
        (
            proptest::collection::vec("[a-z0-9._-]{1,6}", 0..3),
            any::<bool>(),
            0u64..10_000,
        )
            .prop_flat_map(|(parents, is_file, file_length)| {
                let leaf = if is_file { "[a-z0-9._-]{1,6}" } else { "[A-Z]{1,6}" };
                (Just(parents), leaf, Just(is_file), Just(file_length))
            })
            .prop_map(|(parents, leaf, is_file, file_length)| {
                let mut segments = parents;
                segments.push(leaf);
                ContainerItem {
                    path: format!("drop/{}", segments.join("/")),
                    item_type: if is_file {
                        ContainerItemType::File
                    } else {
                        ContainerItemType::Folder
                    },
                    file_length,
                }
            })
    }

    fn arbitrary_pattern() -> impl Strategy<Value = Option<Regex>> {
        proptest::option::of(
            prop_oneof![Just(".*"), Just("^drop/"), Just("[0-9]"), Just(r"\."), Just("^[a-f]")]
                .prop_map(|pattern| Regex::new(pattern).unwrap()),
        )
    }

    fn arbitrary_row() -> impl Strategy<Value = ScanResultRow> {
        (
            0i64..4_102_444_800_000,
            "[ -~]{1,20}",
            1u64..u64::MAX,
            proptest::collection::vec("[ -~]{0,10}", 2..5),
            any::<u64>(),
        )
            .prop_map(
                |(millis, build_number, container_id, segments, item_length)| ScanResultRow {
                    date: DateTime::<Utc>::from_timestamp_millis(millis).unwrap(),
                    owning_resource: format!("Build {build_number}"),
                    container_id,
                    item_path: segments.join("/"),
                    item_length,
                    item_type: "file".to_string(),
                },
            )
    }

    fn run_scan(items: Vec<ContainerItem>, filter_config: FilterConfig) -> Vec<ScanResultRow> {
        let mock = MockAzureDevOps::default()
            .with_builds(vec![make_build(1, "20240501.1")])
            .with_artifacts(1, vec![make_artifact(1, Some("Container"), "#/42/drop")])
            .with_container(42, items);
        let config = ScanConfig {
            project: "app".to_string(),
            definition_id: 1,
            filter_config,
            age_window: AgeWindow::default(),
            out_csv: "out.csv".into(),
        };
        let pipeline =
            ArtifactScanPipeline::new(config, Box::new(mock.clone()), Box::new(mock));

        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(pipeline.run())
            .unwrap()
    }

    proptest! {
        #[test]
        fn scan_output_never_contains_folders(
            items in proptest::collection::vec(arbitrary_item(), 0..16),
            path_regex in arbitrary_pattern(),
            filename_regex in arbitrary_pattern(),
        ) {
            let folders: Vec<String> = items
                .iter()
                .filter(|item| !item.is_file())
                .map(|item| item.path.clone())
                .collect();

            let rows = run_scan(items, FilterConfig { path_regex, filename_regex });

            for row in &rows {
                prop_assert_eq!(row.item_type.as_str(), "file");
                prop_assert!(!folders.contains(&row.item_path));
            }
        }

        #[test]
        fn exported_rows_import_as_equal_records(
            rows in proptest::collection::vec(arbitrary_row(), 0..8),
        ) {
            let mut buffer = Vec::new();
            write_rows(&mut buffer, &rows).unwrap();

            let records = validate_records(read_rows(buffer.as_slice()).unwrap()).unwrap();
            let expected: Vec<DeletionRecord> =
                rows.into_iter().map(DeletionRecord::from).collect();

            prop_assert_eq!(records, expected);
        }
    }
}
