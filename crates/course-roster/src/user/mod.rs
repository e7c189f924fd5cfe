//! User identity and the enrollment capability contract.
//!
//! [`UserProfile`] holds the five identity fields every user carries. The
//! fields are validated eagerly: constructors and setters reject bad input
//! and leave the profile untouched. The identifier has no setter.
//!
//! [`Enrollee`] is the capability set a course roster talks to. Students
//! implement it with real enrollment rights; other kinds of user can
//! implement it and refuse every course.

use std::fmt;

use thiserror::Error;

use crate::course::{Course, CourseRef};

/// Validation errors returned by [`UserProfile`] constructors and setters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserValidationError {
    /// The first name was empty.
    #[error("first name must not be empty")]
    EmptyFirstName,
    /// The last name was empty.
    #[error("last name must not be empty")]
    EmptyLastName,
    /// The user id was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The email address was empty.
    #[error("email must not be empty")]
    EmptyEmail,
    /// The email address lacks an `@` followed later by a `.`.
    #[error("email '{value}' must contain '@' followed later by '.'")]
    InvalidEmail {
        /// The rejected address.
        value: String,
    },
    /// The password hash was empty.
    #[error("password must not be empty")]
    EmptyPassword,
}

/// Stable user identifier. Set once when the profile is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyId`] for an empty string.
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.into())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        Ok(Self(id))
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Contact address for a user.
///
/// ## Invariants
/// - Non-empty.
/// - The first `@` comes before the last `.`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    ///
    /// Only the shape is checked: an `@` with a `.` somewhere after it.
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyEmail`] or
    /// [`UserValidationError::InvalidEmail`].
    ///
    /// # Examples
    /// ```
    /// use course_roster::EmailAddress;
    ///
    /// assert!(EmailAddress::new("ada@example.com").is_ok());
    /// assert!(EmailAddress::new("ada.example@com").is_err());
    /// ```
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(email.into())
    }

    fn from_owned(email: String) -> Result<Self, UserValidationError> {
        if email.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        match (email.find('@'), email.rfind('.')) {
            (Some(at), Some(dot)) if dot > at => Ok(Self(email)),
            _ => Err(UserValidationError::InvalidEmail { value: email }),
        }
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Pre-hashed password, stored and written back verbatim.
///
/// Hashing is the caller's job; this type only refuses empty input. `Debug`
/// output is redacted so the hash does not leak into logs.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Validate and construct a [`PasswordHash`].
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyPassword`] for an empty string.
    pub fn new(hash: impl Into<String>) -> Result<Self, UserValidationError> {
        let hash = hash.into();
        if hash.is_empty() {
            return Err(UserValidationError::EmptyPassword);
        }
        Ok(Self(hash))
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Identity and contact details shared by every kind of user.
///
/// Two profiles are equal when all five fields match.
///
/// # Examples
/// ```
/// use course_roster::UserProfile;
///
/// let profile = UserProfile::try_from_strings(
///     "Ada", "Lovelace", "alovela", "ada@example.com", "5f4dcc3b",
/// )
/// .expect("valid profile");
/// assert_eq!(profile.to_string(), "Ada,Lovelace,alovela,ada@example.com,5f4dcc3b");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserProfile {
    first_name: String,
    last_name: String,
    id: UserId,
    email: EmailAddress,
    password: PasswordHash,
}

impl UserProfile {
    /// Build a profile from already validated components.
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyFirstName`] or
    /// [`UserValidationError::EmptyLastName`].
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        id: UserId,
        email: EmailAddress,
        password: PasswordHash,
    ) -> Result<Self, UserValidationError> {
        Ok(Self {
            first_name: validate_first_name(first_name.into())?,
            last_name: validate_last_name(last_name.into())?,
            id,
            email,
            password,
        })
    }

    /// Fallible constructor from raw strings.
    ///
    /// Fields are checked in declaration order and the first failure wins.
    ///
    /// # Errors
    ///
    /// Returns the [`UserValidationError`] for the first invalid field.
    pub fn try_from_strings(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        id: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, UserValidationError> {
        let first_name = validate_first_name(first_name.into())?;
        let last_name = validate_last_name(last_name.into())?;
        let id = UserId::new(id)?;
        let email = EmailAddress::new(email)?;
        let password = PasswordHash::new(password)?;
        Ok(Self {
            first_name,
            last_name,
            id,
            email,
            password,
        })
    }

    /// First name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.first_name.as_str()
    }

    /// Last name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        self.last_name.as_str()
    }

    /// Immutable identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Contact address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Stored password hash.
    #[must_use]
    pub fn password(&self) -> &PasswordHash {
        &self.password
    }

    /// Replace the first name.
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyFirstName`] and keeps the old name.
    pub fn set_first_name(
        &mut self,
        first_name: impl Into<String>,
    ) -> Result<(), UserValidationError> {
        self.first_name = validate_first_name(first_name.into())?;
        Ok(())
    }

    /// Replace the last name.
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyLastName`] and keeps the old name.
    pub fn set_last_name(
        &mut self,
        last_name: impl Into<String>,
    ) -> Result<(), UserValidationError> {
        self.last_name = validate_last_name(last_name.into())?;
        Ok(())
    }

    /// Replace the email address.
    ///
    /// # Errors
    ///
    /// Returns the [`EmailAddress::new`] error and keeps the old address.
    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), UserValidationError> {
        self.email = EmailAddress::new(email)?;
        Ok(())
    }

    /// Replace the stored password hash.
    ///
    /// # Errors
    ///
    /// Returns [`UserValidationError::EmptyPassword`] and keeps the old hash.
    pub fn set_password(
        &mut self,
        password: impl Into<String>,
    ) -> Result<(), UserValidationError> {
        self.password = PasswordHash::new(password)?;
        Ok(())
    }
}

/// Renders `first,last,id,email,password`.
impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{},{}",
            self.first_name,
            self.last_name,
            self.id,
            self.email,
            self.password.as_ref()
        )
    }
}

fn validate_first_name(first_name: String) -> Result<String, UserValidationError> {
    if first_name.is_empty() {
        return Err(UserValidationError::EmptyFirstName);
    }
    Ok(first_name)
}

fn validate_last_name(last_name: String) -> Result<String, UserValidationError> {
    if last_name.is_empty() {
        return Err(UserValidationError::EmptyLastName);
    }
    Ok(last_name)
}

/// Capability set a course roster relies on.
///
/// A user's course list and a course's roster are separate collections and
/// neither method here touches the other side. Callers pair
/// [`Enrollee::add_course`] with [`Course::enroll`], and
/// [`Enrollee::remove_course`] with [`Course::drop_user`], as one logical
/// transaction; [`crate::enrollment`] does exactly that.
pub trait Enrollee {
    /// Identity recorded on course rosters.
    fn profile(&self) -> &UserProfile;

    /// Whether this kind of user may sit on a course roster at all.
    fn takes_courses(&self) -> bool;

    /// Whether `course` may be added to this user's course list.
    fn can_add_course(&self, course: &Course) -> bool;

    /// Append `course` when [`Enrollee::can_add_course`] allows it.
    ///
    /// Returns whether the course was added.
    fn add_course(&mut self, course: &Course) -> bool;

    /// Remove `course` from this user's list. Returns whether it was present.
    fn remove_course(&mut self, course: &Course) -> bool;

    /// Courses in the order they were added.
    fn courses(&self) -> &[CourseRef];
}
