use validator::ValidationError;

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn validate_password_length(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        let mut error = ValidationError::new("password_length");
        error.message = Some(
            format!("Password must be at least {} characters long", MIN_PASSWORD_LENGTH).into()
        );
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_characters_is_enough() {
        assert!(validate_password_length("abcdef").is_ok());
        assert!(validate_password_length("abcde").is_err());
    }
}
