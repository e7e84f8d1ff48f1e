#[cfg(test)]
mod tests {
    use crate::config::{new_test_config, ServiceEntry};
    use crate::directory::{Directory, Operation, ServiceDescriptor};
    use std::collections::HashMap;

    #[test]
    fn test_builtin_directory_order_and_capabilities() {
        let directory = Directory::builtin();
        assert_eq!(directory.names(), vec!["hdfswatcher", "textproc", "embedproc"]);

        let embed = directory.get("embedproc").unwrap();
        assert!(embed.supports(Operation::Start));
        assert!(embed.supports(Operation::Toggle));
        assert!(!embed.supports(Operation::Reset));
        assert!(!embed.supports(Operation::Files));
        assert!(!embed.supports(Operation::FilesProcessed));
    }

    #[test]
    fn test_processed_files_path_differs_per_service() {
        let directory = Directory::builtin();
        assert_eq!(
            directory.get("hdfswatcher").unwrap().path(Operation::FilesProcessed),
            Some("/files/processed")
        );
        assert_eq!(
            directory.get("textproc").unwrap().path(Operation::FilesProcessed),
            Some("/api/files/processed")
        );
        assert_eq!(directory.get("textproc").unwrap().path(Operation::Toggle), None);
    }

    #[test]
    fn test_operation_parsing() {
        assert_eq!("filesProcessed".parse::<Operation>().unwrap(), Operation::FilesProcessed);
        assert_eq!("files_processed".parse::<Operation>().unwrap(), Operation::FilesProcessed);
        assert_eq!("reset".parse::<Operation>().unwrap(), Operation::Reset);
        assert!("launch".parse::<Operation>().is_err());
    }

    #[test]
    fn test_state_is_not_advertised() {
        let directory = Directory::builtin();
        let embed = directory.get("embedproc").unwrap();
        assert!(embed.supports(Operation::State));
        assert_eq!(
            embed.advertised_operations(),
            vec![Operation::Start, Operation::Stop, Operation::Toggle]
        );
    }

    #[test]
    fn test_descriptor_dedups_operations() {
        let descriptor = ServiceDescriptor::new(
            "svc",
            "Svc",
            "test",
            &[Operation::Start, Operation::Stop, Operation::Start],
        );
        assert_eq!(descriptor.operations(), &[Operation::Start, Operation::Stop]);
    }

    #[test]
    fn test_directory_from_config_overrides_builtin() {
        let mut cfg = new_test_config();
        let mut endpoints = HashMap::new();
        endpoints.insert("state".to_string(), "/status".to_string());
        cfg.manager.services = Some(vec![ServiceEntry {
            name: "ocr".to_string(),
            display_name: Some("OCR".to_string()),
            description: None,
            operations: vec!["start".to_string(), "stop".to_string(), "state".to_string()],
            endpoints,
        }]);

        let directory = Directory::from_config(&cfg).unwrap();
        assert_eq!(directory.len(), 1);
        let ocr = directory.get("ocr").unwrap();
        assert_eq!(ocr.display_name(), "OCR");
        assert_eq!(ocr.description(), "RAG Pipeline Service");
        assert_eq!(ocr.path(Operation::State), Some("/status"));
        assert!(!directory.contains("textproc"));
    }

    #[test]
    fn test_directory_rejects_unknown_operation_and_duplicates() {
        let mut cfg = new_test_config();
        cfg.manager.services = Some(vec![ServiceEntry {
            name: "ocr".to_string(),
            display_name: None,
            description: None,
            operations: vec!["explode".to_string()],
            endpoints: HashMap::new(),
        }]);
        assert!(Directory::from_config(&cfg).is_err());

        let dup = vec![
            ServiceDescriptor::new("a", "A", "", &[Operation::Start]),
            ServiceDescriptor::new("a", "A", "", &[Operation::Stop]),
        ];
        assert!(Directory::new(dup).is_err());
    }
}
