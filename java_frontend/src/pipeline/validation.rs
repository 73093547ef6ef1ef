/// Check that every stage's error codes are registered before any input is parsed
pub fn validate_pipeline() -> Result<(), String> {
    crate::log_debug!("Validating pipeline configuration");

    crate::file_processor::validate_file_processing_codes()?;
    crate::lexical::validate_lexical_codes()?;
    crate::syntax::validate_syntax_codes()?;

    crate::log_success!(
        crate::logging::codes::success::SYSTEM_INITIALIZATION_COMPLETED,
        "Pipeline validation succeeded",
        "stages_validated" => 3,
        "file_processing" => true,
        "lexical_analysis" => true,
        "syntax_analysis" => true
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_validates() {
        assert!(validate_pipeline().is_ok());
    }
}
