//! Customer accounts.

use crate::error::CommerceError;
use crate::ids::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum length of a display name.
pub const MAX_USER_NAME_LENGTH: usize = 50;

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Access level of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    #[default]
    #[serde(rename = "user")]
    Customer,
    #[serde(rename = "admin")]
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "user",
            Role::Admin => "admin",
        }
    }
}

/// A stored account, including the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Lowercased.
    pub email: String,
    pub phone: String,
    /// PHC-format password hash.
    pub password_hash: String,
    /// Initials shown in place of a profile picture.
    pub avatar: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Build a customer account from already validated signup fields.
    pub fn new(
        name: &str,
        email: &str,
        phone: &str,
        password_hash: impl Into<String>,
    ) -> Result<Self, CommerceError> {
        let name = name.trim();
        validate_name(name)?;
        let email = normalize_email(email);
        validate_email(&email)?;
        validate_phone(phone)?;

        Ok(Self {
            id: UserId::generate(),
            name: name.to_string(),
            email,
            phone: phone.to_string(),
            password_hash: password_hash.into(),
            avatar: initials(name),
            role: Role::Customer,
            is_active: true,
            created_at: Utc::now(),
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Apply a normalized profile update. A new name also renews the avatar.
    pub fn apply_profile(&mut self, update: &ProfileUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
            self.avatar = initials(name);
        }
        if let Some(email) = &update.email {
            self.email = email.clone();
        }
        if let Some(phone) = &update.phone {
            self.phone = phone.clone();
        }
    }

    /// Public view without credentials.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            avatar: self.avatar.clone(),
            role: self.role,
        }
    }
}

/// Fields a customer may change on their own account. Absent fields are
/// left as they are.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl ProfileUpdate {
    /// Trim, lowercase the email and validate every present field.
    pub fn normalized(self) -> Result<Self, CommerceError> {
        let name = self.name.map(|n| n.trim().to_string());
        if let Some(name) = &name {
            validate_name(name)?;
        }
        let email = self.email.map(|e| normalize_email(&e));
        if let Some(email) = &email {
            validate_email(email)?;
        }
        let phone = self.phone.map(|p| p.trim().to_string());
        if let Some(phone) = &phone {
            validate_phone(phone)?;
        }
        Ok(Self { name, email, phone })
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none()
    }
}

/// What clients get to see of an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub avatar: String,
    pub role: Role,
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_name(name: &str) -> Result<(), CommerceError> {
    if name.trim().is_empty() {
        return Err(CommerceError::Validation("Please add a name".to_string()));
    }
    if name.chars().count() > MAX_USER_NAME_LENGTH {
        return Err(CommerceError::Validation(format!(
            "Name cannot be more than {} characters",
            MAX_USER_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Loose structural check: `local@domain.tld` with a 2-3 letter TLD.
pub fn validate_email(email: &str) -> Result<(), CommerceError> {
    let invalid = || CommerceError::Validation("Please add a valid email".to_string());
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err(invalid());
    }
    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty()
        || host.starts_with('.')
        || !(2..=3).contains(&tld.len())
        || !tld.chars().all(|c| c.is_ascii_alphabetic())
    {
        return Err(invalid());
    }
    Ok(())
}

/// Ten digits, starting with 6-9.
pub fn validate_phone(phone: &str) -> Result<(), CommerceError> {
    let valid = phone.len() == 10
        && phone.chars().all(|c| c.is_ascii_digit())
        && matches!(phone.as_bytes()[0], b'6'..=b'9');
    if !valid {
        return Err(CommerceError::Validation(
            "Please add a valid 10-digit phone number".to_string(),
        ));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), CommerceError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(CommerceError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .collect::<String>()
        .to_uppercase()
}
