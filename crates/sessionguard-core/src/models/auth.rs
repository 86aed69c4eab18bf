use serde::{Deserialize, Serialize};

use super::User;

/// Minimum and maximum length for a person's name
const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 100;

/// Minimum password length accepted by the backend
const PASSWORD_MIN_CHARS: usize = 6;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub senha: String,
}

/// Body returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct TokenResponse {
    pub token: String,
    /// Token scheme, always "Bearer" in practice
    #[serde(default)]
    pub tipo: Option<String>,
    pub usuario: User,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RegistrationRequest {
    pub nome: String,
    pub email: String,
    pub senha: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imagem: Option<String>,
}

impl RegistrationRequest {
    /// Returns every rule the request breaks; empty when valid.
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.nome.trim().is_empty() {
            errors.push("Name is required".to_string());
        } else if let Some(e) = check_name(&self.nome) {
            errors.push(e);
        }
        if self.email.trim().is_empty() {
            errors.push("Email is required".to_string());
        } else if !is_valid_email(&self.email) {
            errors.push("Email must be valid".to_string());
        }
        if self.senha.trim().is_empty() {
            errors.push("Password is required".to_string());
        } else if let Some(e) = check_password(&self.senha) {
            errors.push(e);
        }
        errors
    }
}

/// Partial account update; absent fields are left unchanged server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub senha: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imagem: Option<String>,
}

impl ProfileUpdate {
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if let Some(e) = self.nome.as_deref().and_then(check_name) {
            errors.push(e);
        }
        if let Some(email) = self.email.as_deref() {
            if !is_valid_email(email) {
                errors.push("Email must be valid".to_string());
            }
        }
        if let Some(e) = self.senha.as_deref().and_then(check_password) {
            errors.push(e);
        }
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.nome.is_none()
            && self.email.is_none()
            && self.senha.is_none()
            && self.telefone.is_none()
            && self.imagem.is_none()
    }
}

/// Error body the backend sends with 4xx/5xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub details: Vec<String>,
}

impl ErrorResponse {
    /// Best human-readable summary: message, then error title
    pub fn summary(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.error.as_deref())
            .filter(|s| !s.is_empty())
    }
}

fn check_name(nome: &str) -> Option<String> {
    let len = nome.chars().count();
    if (NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&len) {
        None
    } else {
        Some(format!(
            "Name must be between {} and {} characters",
            NAME_MIN_CHARS, NAME_MAX_CHARS
        ))
    }
}

fn check_password(senha: &str) -> Option<String> {
    if senha.chars().count() >= PASSWORD_MIN_CHARS {
        None
    } else {
        Some(format!(
            "Password must be at least {} characters",
            PASSWORD_MIN_CHARS
        ))
    }
}

/// Loose email shape check: one '@', non-empty local part, dotted domain.
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}
