//! Input validation utilities

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{LoginRequest, NewService};

/// Validate email
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.len() > 254 {
        return Err("Email must be at most 254 characters long".to_string());
    }

    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("Failed to compile email regex")
    });

    if !regex.is_match(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".to_string());
    }

    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }

    Ok(())
}

/// Validate login credentials before they leave the process
pub fn validate_login(request: &LoginRequest) -> Result<(), String> {
    validate_email(&request.user_name)?;
    validate_password(&request.password)
}

/// Validate a service payload
pub fn validate_new_service(service: &NewService) -> Result<(), String> {
    if service.name.trim().is_empty() {
        return Err("The name is required".to_string());
    }

    if service.description.trim().is_empty() {
        return Err("The description is required".to_string());
    }

    if service.description.chars().count() < 10 {
        return Err("The description must be at least 10 characters long".to_string());
    }

    if !service.price.is_finite() || service.price <= 0.0 {
        return Err("The price must be a positive number".to_string());
    }

    Ok(())
}

/// Validate an upstream resource segment taken from a route parameter
pub fn validate_resource(resource: &str) -> Result<(), String> {
    static RESOURCE_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = RESOURCE_REGEX
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]{1,64}$").expect("Failed to compile resource regex"));

    if !regex.is_match(resource) {
        return Err(format!("Invalid resource: {}", resource));
    }

    Ok(())
}
