use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Composition rules (must contain a lowercase, an uppercase, ...) are
    // checked separately: the regex crate has no lookaheads.
    static ref USER_NAME_CHARS: Regex = Regex::new(r"^[a-zA-Z0-9_]{2,20}$").unwrap();
    static ref PASSWORD_CHARS: Regex = Regex::new(r"^[A-Za-z\d@$!%*?&]{8,}$").unwrap();
    static ref EMAIL: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap();
    static ref VERIFICATION_CODE: Regex = Regex::new(r"^\d{6}$").unwrap();
}

const PASSWORD_SPECIALS: &str = "@$!%*?&";

pub fn validate_user_name(user_name: &str) -> Result<(), String> {
    if user_name.chars().count() < 2 {
        return Err("username must be at least 2 characters long".to_string());
    }
    if user_name.chars().count() > 20 {
        return Err("username must be at most 20 characters long".to_string());
    }
    let composed = USER_NAME_CHARS.is_match(user_name)
        && user_name.chars().any(|c| c.is_ascii_lowercase())
        && user_name.chars().any(|c| c.is_ascii_uppercase())
        && user_name.chars().any(|c| c.is_ascii_digit())
        && user_name.contains('_');
    if !composed {
        return Err("username must contain one small and upper case letter with one digit and underscore(_) but not contain special character except _".to_string());
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < 8 {
        return Err("password must be at least 8 characters long".to_string());
    }
    let composed = PASSWORD_CHARS.is_match(password)
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SPECIALS.contains(c));
    if !composed {
        return Err("Password must contain at least one uppercase letter, one lowercase letter, one number, and one special character.".to_string());
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if EMAIL.is_match(email) {
        Ok(())
    } else {
        Err("email is not valid".to_string())
    }
}

pub fn validate_message_content(content: &str) -> Result<(), String> {
    if content.is_empty() {
        return Err("message is required".to_string());
    }
    if content.chars().count() > 500 {
        return Err("message should be less than 500 characters".to_string());
    }
    Ok(())
}

pub fn validate_verification_code(code: &str) -> Result<(), String> {
    if VERIFICATION_CODE.is_match(code) {
        Ok(())
    } else {
        Err("Verification code must be 6 digit only".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_rules() {
        assert!(validate_user_name("Ab1_").is_ok());
        assert!(validate_user_name("Some_User9").is_ok());
        // too short / too long
        assert!(validate_user_name("A").is_err());
        assert!(validate_user_name(&"Ab1_".repeat(6)).is_err());
        // missing a required class
        assert!(validate_user_name("ab1_").is_err()); // no uppercase
        assert!(validate_user_name("AB1_").is_err()); // no lowercase
        assert!(validate_user_name("Abc_").is_err()); // no digit
        assert!(validate_user_name("Abc1").is_err()); // no underscore
        // forbidden character
        assert!(validate_user_name("Ab1_!").is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(validate_password("Abcdef1@").is_ok());
        assert!(validate_password("Abcdef1!").is_ok());
        assert!(validate_password("Abc1@").is_err()); // too short
        assert!(validate_password("abcdefg1@").is_err()); // no uppercase
        assert!(validate_password("ABCDEFG1@").is_err()); // no lowercase
        assert!(validate_password("Abcdefgh@").is_err()); // no digit
        assert!(validate_password("Abcdefgh1").is_err()); // no special
        assert!(validate_password("Abcdef1@#").is_err()); // '#' outside the allowed set
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("master@gmail.com").is_ok());
        assert!(validate_email("a.b+c@sub.domain.org").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("user@host").is_err());
    }

    #[test]
    fn test_message_content_bounds() {
        assert!(validate_message_content("").is_err());
        assert!(validate_message_content("x").is_ok());
        assert!(validate_message_content(&"x".repeat(500)).is_ok());
        assert!(validate_message_content(&"x".repeat(501)).is_err());
    }

    #[test]
    fn test_verification_code_shape() {
        assert!(validate_verification_code("123456").is_ok());
        assert!(validate_verification_code("12345").is_err());
        assert!(validate_verification_code("1234567").is_err());
        assert!(validate_verification_code("12345a").is_err());
    }
}
