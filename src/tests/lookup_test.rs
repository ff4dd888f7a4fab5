#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::errors::TagError;
    use crate::lookup::LookupTable;

    fn table_from(csv: &str) -> LookupTable {
        LookupTable::from_reader(Cursor::new(csv.to_string())).expect("valid lookup CSV")
    }

    #[test]
    fn test_basic_load() {
        let table = table_from("dstport,protocol,tag\n443,tcp,web\n22,tcp,ssh\n");
        assert_eq!(table.len(), 2);
        assert_eq!(table.tags(443, "tcp"), Some(&["web".to_string()][..]));
        assert_eq!(table.tags(22, "tcp"), Some(&["ssh".to_string()][..]));
        assert_eq!(table.tags(22, "udp"), None);
    }

    #[test]
    fn test_header_is_discarded_without_validation() {
        // A header with the wrong field count must not fail the load.
        let table = table_from("not a real header\n443,tcp,web\n");
        assert_eq!(table.len(), 1);
        assert!(table.tags(443, "tcp").is_some());
    }

    #[test]
    fn test_len_counts_distinct_port_protocol_pairs() {
        let table = table_from(
            "dstport,protocol,tag\n53,tcp,dns\n53,udp,dns\n53,udp,infra\n443,tcp,web\n",
        );
        assert_eq!(table.len(), 3);
        assert_eq!(table.tags(53, "tcp"), Some(&["dns".to_string()][..]));
        assert_eq!(
            table.tags(53, "udp"),
            Some(&["dns".to_string(), "infra".to_string()][..])
        );
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let table = table_from("dstport,protocol,tag\n443,tcp,web\n\n22,tcp,ssh\n\n");
        assert_eq!(table.len(), 2);
        assert_eq!(table.tags(443, "tcp"), Some(&["web".to_string()][..]));
        assert_eq!(table.tags(22, "tcp"), Some(&["ssh".to_string()][..]));
    }

    #[test]
    fn test_same_key_appends_tags() {
        let table = table_from("dstport,protocol,tag\n80,tcp,web\n80,tcp,prod\n");
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.tags(80, "tcp"),
            Some(&["web".to_string(), "prod".to_string()][..])
        );
    }

    #[test]
    fn test_duplicate_rows_are_not_deduplicated() {
        let table = table_from("dstport,protocol,tag\n80,tcp,web\n80,tcp,web\n");
        assert_eq!(
            table.tags(80, "tcp"),
            Some(&["web".to_string(), "web".to_string()][..])
        );
    }

    #[test]
    fn test_protocol_key_is_lowercased_and_tag_case_preserved() {
        let table = table_from("dstport,protocol,tag\n25,TCP,Email\n");
        assert_eq!(table.tags(25, "tcp"), Some(&["Email".to_string()][..]));
    }

    #[test]
    fn test_wrong_field_count_is_fatal() {
        let result = LookupTable::from_reader(Cursor::new("dstport,protocol,tag\n80,tcp\n"));
        match result {
            Err(TagError::Format { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected Format error, got {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn test_non_integer_port_is_fatal() {
        let result =
            LookupTable::from_reader(Cursor::new("dstport,protocol,tag\n443,tcp,web\nhttp,tcp,web\n"));
        match result {
            Err(TagError::Format { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected Format error, got {:?}", other.map(|t| t.len())),
        }
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let result = LookupTable::from_file("does_not_exist.csv");
        assert!(matches!(result, Err(TagError::NotFound { .. })));
    }

    #[test]
    fn test_empty_table() {
        let table = table_from("dstport,protocol,tag\n");
        assert!(table.is_empty());
        assert_eq!(table.tags(443, "tcp"), None);
    }
}
