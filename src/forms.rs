// Form payloads posted by the HTML pages, and their validation

use serde::Deserialize;

use crate::db::operations::messages::MAX_MESSAGE_LENGTH;
use crate::models::UserEdit;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Field-level validation failures, in field order
pub type FormErrors = Vec<String>;

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn require(errors: &mut FormErrors, value: &Option<String>, field: &str) {
    if present(value).is_none() {
        errors.push(format!("{} is required.", field));
    }
}

fn check_email(errors: &mut FormErrors, value: &Option<String>) {
    match present(value) {
        None => errors.push("E-mail is required.".to_string()),
        Some(email) if !email_address::EmailAddress::is_valid(email) => {
            errors.push("Invalid email address.".to_string())
        }
        Some(_) => {}
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub image_url: Option<String>,
}

impl SignupForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        require(&mut errors, &self.username, "Username");
        check_email(&mut errors, &self.email);
        match self.password.as_deref() {
            Some(p) if p.chars().count() >= MIN_PASSWORD_LENGTH => {}
            _ => errors.push(format!(
                "Password must be at least {} characters.",
                MIN_PASSWORD_LENGTH
            )),
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        require(&mut errors, &self.username, "Username");
        if self.password.as_deref().map_or(true, str::is_empty) {
            errors.push("Password is required.".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MessageForm {
    pub text: Option<String>,
}

impl MessageForm {
    pub fn validate(&self) -> Result<&str, FormErrors> {
        match present(&self.text) {
            None => Err(vec!["Text is required.".to_string()]),
            Some(text) if text.chars().count() > MAX_MESSAGE_LENGTH => Err(vec![format!(
                "Text must be at most {} characters.",
                MAX_MESSAGE_LENGTH
            )]),
            Some(text) => Ok(text),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserEditForm {
    pub username: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub header_image_url: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub password: Option<String>,
}

impl UserEditForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::new();
        require(&mut errors, &self.username, "Username");
        check_email(&mut errors, &self.email);
        if self.password.as_deref().map_or(true, str::is_empty) {
            errors.push("Password is required.".to_string());
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Turn the submitted fields into an edit; blank image fields keep the current image
    pub fn to_edit(&self) -> UserEdit {
        UserEdit {
            username: present(&self.username).map(str::to_string),
            email: present(&self.email).map(str::to_string),
            image_url: present(&self.image_url).map(str::to_string),
            header_image_url: present(&self.header_image_url).map(str::to_string),
            bio: self.bio.as_deref().map(|b| b.trim().to_string()),
            location: self.location.as_deref().map(|l| l.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchQuery {
    pub q: Option<String>,
}
