//! Sign-up form validation
//!
//! Rules run in a fixed order and the first failure wins; every rule is
//! local and produces its own user-facing message.

use crate::error::ValidationError;

/// The raw sign-up form fields as entered
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub confirm_password: String,
    pub mobile_number: String,
}

impl SignUpForm {
    /// Evaluate the rules in order: email shape, full name length,
    /// password length, password match, mobile digit count.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.email.contains('@') {
            return Err(ValidationError::InvalidEmail);
        }
        if self.full_name.trim().chars().count() < 2 {
            return Err(ValidationError::ShortFullName);
        }
        if self.password.chars().count() < 6 {
            return Err(ValidationError::WeakPassword);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if digit_count(&self.mobile_number) < 10 {
            return Err(ValidationError::InvalidMobileNumber);
        }
        Ok(())
    }
}

fn digit_count(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> SignUpForm {
        SignUpForm {
            email: "artist@example.com".to_string(),
            full_name: "Test Artist".to_string(),
            password: "secret123".to_string(),
            confirm_password: "secret123".to_string(),
            mobile_number: "+91 98765 43210".to_string(),
        }
    }

    #[test]
    fn valid_form_passes() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn email_must_contain_at_sign() {
        let mut form = valid_form();
        form.email = "artist.example.com".to_string();
        assert_eq!(form.validate(), Err(ValidationError::InvalidEmail));
    }

    #[test]
    fn full_name_needs_two_chars_after_trimming() {
        let mut form = valid_form();
        form.full_name = "  a  ".to_string();
        assert_eq!(form.validate(), Err(ValidationError::ShortFullName));
    }

    #[test]
    fn password_needs_six_chars() {
        let mut form = valid_form();
        form.password = "12345".to_string();
        form.confirm_password = "12345".to_string();
        assert_eq!(form.validate(), Err(ValidationError::WeakPassword));
    }

    #[test]
    fn passwords_must_match() {
        let mut form = valid_form();
        form.confirm_password = "secret124".to_string();
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));
    }

    #[test]
    fn mobile_needs_ten_digits_ignoring_formatting() {
        let mut form = valid_form();
        form.mobile_number = "98765-4321".to_string(); // 9 digits
        assert_eq!(form.validate(), Err(ValidationError::InvalidMobileNumber));

        form.mobile_number = "(987) 654-32100".to_string(); // 11 digits
        assert!(form.validate().is_ok());
    }

    #[test]
    fn first_failure_wins() {
        // Bad email and bad password: the email rule fires first.
        let mut form = valid_form();
        form.email = "nope".to_string();
        form.password = "x".to_string();
        assert_eq!(form.validate(), Err(ValidationError::InvalidEmail));
    }
}
