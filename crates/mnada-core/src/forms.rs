//! Input validation for the login, registration and item submission forms.
//!
//! Form state is plain strings as typed; validation turns it into the request
//! bodies the services accept, or a `ValidationError` whose text is shown inline.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

use crate::auth::Role;
use crate::models::{Category, ItemSubmission, RegistrationRequest};

/// Maximum length for username input.
pub const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Free-text fields (names, descriptions, emails).
pub const MAX_TEXT_LENGTH: usize = 500;

pub const MIN_IMAGES: usize = 1;
pub const MAX_IMAGES: usize = 10;

/// Date-time entry format for auction start/end.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Username and password are required.")]
    MissingCredentials,
    #[error("All fields are required.")]
    MissingFields,
    #[error("Please enter a valid email address.")]
    InvalidEmail,
    #[error("Please choose an account role.")]
    MissingRole,
    #[error("Please upload between 1 and 10 images.")]
    ImageCount,
    #[error("Starting bid must be a positive number.")]
    InvalidStartingBid,
    #[error("Please select a category.")]
    MissingCategory,
    #[error("Dates must look like YYYY-MM-DD HH:MM.")]
    InvalidDate,
    #[error("Auction must end after it starts.")]
    EndBeforeStart,
}

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Check if a free-text character should be accepted
pub fn can_add_text_char(current_len: usize, c: char) -> bool {
    current_len < MAX_TEXT_LENGTH && is_valid_input_char(c)
}

/// Login credentials must both be present before a request is sent.
pub fn validate_login(username: &str, password: &str) -> Result<(), ValidationError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(ValidationError::MissingCredentials);
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self {
            role: Role::Client,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<RegistrationRequest, ValidationError> {
        let username = self.username.trim();
        let email = self.email.trim();
        if username.is_empty() || email.is_empty() || self.password.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        if !looks_like_email(email) {
            return Err(ValidationError::InvalidEmail);
        }
        if !self.role.is_authenticated() {
            return Err(ValidationError::MissingRole);
        }
        Ok(RegistrationRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: self.password.clone(),
            role: self.role,
        })
    }
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(' ')
        }
        None => false,
    }
}

/// Item submission as typed into the auctioneer dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemDraft {
    pub name: String,
    pub description: String,
    /// Comma-separated image references.
    pub images: String,
    pub starting_bid: String,
    pub category: Option<Category>,
    pub start_date: String,
    pub end_date: String,
}

impl ItemDraft {
    pub fn image_list(&self) -> Vec<String> {
        self.images
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn validate(&self) -> Result<ItemSubmission, ValidationError> {
        self.validate_in(&Local)
    }

    /// Validate, reading date-times as wall-clock time in `tz`.
    pub fn validate_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<ItemSubmission, ValidationError> {
        let name = self.name.trim();
        let description = self.description.trim();
        if name.is_empty()
            || description.is_empty()
            || self.starting_bid.trim().is_empty()
            || self.start_date.trim().is_empty()
            || self.end_date.trim().is_empty()
        {
            return Err(ValidationError::MissingFields);
        }

        let images = self.image_list();
        if !(MIN_IMAGES..=MAX_IMAGES).contains(&images.len()) {
            return Err(ValidationError::ImageCount);
        }

        let starting_bid: f64 = self
            .starting_bid
            .trim()
            .trim_start_matches('$')
            .parse()
            .map_err(|_| ValidationError::InvalidStartingBid)?;
        if !starting_bid.is_finite() || starting_bid <= 0.0 {
            return Err(ValidationError::InvalidStartingBid);
        }

        let category = self.category.ok_or(ValidationError::MissingCategory)?;

        let start_date = parse_datetime(&self.start_date, tz)?;
        let end_date = parse_datetime(&self.end_date, tz)?;
        if end_date <= start_date {
            return Err(ValidationError::EndBeforeStart);
        }

        Ok(ItemSubmission {
            name: name.to_string(),
            description: description.to_string(),
            images,
            starting_bid,
            category,
            start_date,
            end_date,
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Parse `YYYY-MM-DD HH:MM` as wall-clock time in `tz`.
pub fn parse_datetime<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<DateTime<Utc>, ValidationError> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), DATETIME_FORMAT)
        .map_err(|_| ValidationError::InvalidDate)?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or(ValidationError::InvalidDate)
}
