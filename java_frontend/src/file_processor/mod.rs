//! Source file loading for the front end

mod processor;

pub use processor::{FileMetadata, FileProcessingResult, FileProcessor, FileProcessorError};

use std::path::Path;

/// Load a file with default settings
pub fn process_file(file_path: &Path) -> Result<FileProcessingResult, FileProcessorError> {
    FileProcessor::new().process_file(file_path)
}

pub fn get_max_file_size() -> u64 {
    FileProcessor::max_file_size()
}

/// Check that every file processing error code is registered (used at startup)
pub fn validate_file_processing_codes() -> Result<(), String> {
    use crate::logging::codes::{self, file_processing};

    let file_codes = [
        file_processing::FILE_NOT_FOUND,
        file_processing::INVALID_EXTENSION,
        file_processing::FILE_TOO_LARGE,
        file_processing::PERMISSION_DENIED,
        file_processing::INVALID_ENCODING,
        file_processing::IO_ERROR,
    ];

    for code in &file_codes {
        if codes::get_error_metadata(code.as_str()).is_none() {
            return Err(format!(
                "File processor error code {} not found in metadata registry",
                code.as_str()
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_module_api() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("Main.java");
        fs::write(&file_path, "class Main {}\n").unwrap();

        let result = process_file(&file_path).unwrap();
        assert_eq!(result.metadata.size, 14);
    }

    #[test]
    fn test_file_processing_codes_registered() {
        assert!(validate_file_processing_codes().is_ok());
        assert!(get_max_file_size() > 0);
    }
}
