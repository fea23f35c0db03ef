//! User model
//!
//! Mirrors: app/models/user.rb
//! Table: users

use chrono::{DateTime, Utc};
use op_core::traits::{Id, Identifiable};
use op_core::types::{NameColumn, UserFormat, UserStatus};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use validator::Validate;

/// User entity
///
/// Represents a user account in OpenProject.
/// Inherits from Principal (STI pattern in Ruby).
///
/// # Ruby equivalent
/// ```ruby
/// class User < Principal
///   has_many :members
///   has_many :assigned_work_packages
///   has_many :responsible_work_packages
///   # ... etc
/// end
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct User {
    pub id: Option<Id>,

    /// Login name (unique)
    #[validate(length(min = 1, max = 255))]
    pub login: String,

    /// First name
    #[validate(length(max = 255))]
    pub firstname: String,

    /// Last name
    #[validate(length(max = 255))]
    pub lastname: String,

    /// Email address
    #[validate(email)]
    pub mail: String,

    /// Whether user is admin
    pub admin: bool,

    /// User status (active, locked, registered, invited)
    pub status: UserStatus,

    /// Language preference
    pub language: Option<String>,

    /// User type (for STI - User, Group, PlaceholderUser)
    #[serde(rename = "type")]
    pub principal_type: String,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: None,
            login: String::new(),
            firstname: String::new(),
            lastname: String::new(),
            mail: String::new(),
            admin: false,
            status: UserStatus::Active,
            language: None,
            principal_type: "User".to_string(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl Identifiable for User {
    fn id(&self) -> Option<Id> {
        self.id
    }
}

impl User {
    /// Create a persisted user
    pub fn new(
        id: Id,
        login: impl Into<String>,
        firstname: impl Into<String>,
        lastname: impl Into<String>,
    ) -> Self {
        let login = login.into();
        Self {
            id: Some(id),
            mail: format!("{}@example.net", login),
            login,
            firstname: firstname.into(),
            lastname: lastname.into(),
            ..Default::default()
        }
    }

    /// Builder: override email address
    pub fn with_mail(mut self, mail: impl Into<String>) -> Self {
        self.mail = mail.into();
        self
    }

    /// Get full name (firstname + lastname)
    pub fn name(&self) -> String {
        self.name_in(UserFormat::FirstnameLastname)
    }

    /// Display name according to a configured user format
    pub fn name_in(&self, format: UserFormat) -> String {
        format.format_name(&self.firstname, &self.lastname, &self.login)
    }

    /// Order two users the way `User.order_by_name` does for a format
    pub fn cmp_by_name(&self, other: &User, format: UserFormat) -> Ordering {
        format
            .order_columns()
            .iter()
            .map(|column| {
                let (a, b) = match column {
                    NameColumn::Firstname => (&self.firstname, &other.firstname),
                    NameColumn::Lastname => (&self.lastname, &other.lastname),
                    NameColumn::Login => (&self.login, &other.login),
                };
                a.to_lowercase().cmp(&b.to_lowercase())
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or_else(|| self.id.cmp(&other.id))
    }

    /// Check if user is active and can log in
    pub fn active(&self) -> bool {
        self.status.is_active()
    }

    /// Check if user is locked
    pub fn locked(&self) -> bool {
        matches!(self.status, UserStatus::Locked)
    }

    /// Builtin system users
    pub fn anonymous_id() -> Id {
        1 // Convention: anonymous user has ID 1
    }

    pub fn is_anonymous(&self) -> bool {
        self.id == Some(Self::anonymous_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_formats() {
        let user = User::new(5, "jdoe", "Jane", "Doe");
        assert_eq!(user.name(), "Jane Doe");
        assert_eq!(user.name_in(UserFormat::LastnameComaFirstname), "Doe, Jane");
        assert_eq!(user.name_in(UserFormat::Username), "jdoe");
    }

    #[test]
    fn test_cmp_by_name() {
        let anna = User::new(2, "anna", "Anna", "Zeta");
        let bob = User::new(3, "bob", "Bob", "Alpha");

        assert_eq!(
            anna.cmp_by_name(&bob, UserFormat::FirstnameLastname),
            Ordering::Less
        );
        assert_eq!(
            anna.cmp_by_name(&bob, UserFormat::LastnameFirstname),
            Ordering::Greater
        );
    }

    #[test]
    fn test_user_validation() {
        let user = User::new(5, "jdoe", "Jane", "Doe");
        assert!(user.validate().is_ok());
        assert!(user.clone().with_mail("not-an-email").validate().is_err());
    }

    #[test]
    fn test_anonymous() {
        let anonymous = User::new(User::anonymous_id(), "", "Anonymous", "");
        assert!(anonymous.is_anonymous());
        assert!(!User::new(7, "x", "X", "Y").is_anonymous());
    }
}
