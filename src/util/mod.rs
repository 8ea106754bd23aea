use once_cell::sync::Lazy;
use regex::Regex;

pub const TITLE_MAX_LEN: usize = 200;
pub const DESCRIPTION_MAX_LEN: usize = 1000;
pub const NAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Strip control characters from a bearer token before it goes into a header.
/// Prevents header injection through a tampered persisted session.
pub fn sanitize_token(token: &str) -> String {
    token.chars().filter(|c| !c.is_control()).collect()
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err("Email is required".to_string());
    }

    static EMAIL_REGEX: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("Failed to compile email regex"));

    if !EMAIL_REGEX.is_match(email) {
        return Err("Email is invalid".to_string());
    }

    Ok(())
}

/// Login only checks presence and length; complexity is enforced at signup.
pub fn validate_login_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.len() < PASSWORD_MIN_LEN {
        return Err("Password must be at least 8 characters".to_string());
    }

    Ok(())
}

pub fn validate_signup_password(password: &str) -> Result<(), String> {
    validate_login_password(password)?;

    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if !has_lower || !has_upper || !has_digit {
        return Err(
            "Password must contain at least one uppercase letter, one lowercase letter, and one number"
                .to_string(),
        );
    }

    Ok(())
}

pub fn validate_name(name: &str) -> Result<(), String> {
    if name.len() > NAME_MAX_LEN {
        return Err("Name must be less than 50 characters".to_string());
    }

    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("Title is required".to_string());
    }

    if title.len() > TITLE_MAX_LEN {
        return Err("Title must be less than 200 characters".to_string());
    }

    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), String> {
    if description.len() > DESCRIPTION_MAX_LEN {
        return Err("Description must be less than 1000 characters".to_string());
    }

    Ok(())
}
