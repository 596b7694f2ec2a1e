use validator::ValidationError;

/// Required text fields reject empty and whitespace-only values.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_is_blank() {
        assert!(not_blank("   ").is_err());
        assert!(not_blank("Acme").is_ok());
    }
}
