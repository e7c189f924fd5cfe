//! Courses and their capacity-bounded rosters.
//!
//! A [`Course`] is identified by its name alone: equality and hashing ignore
//! credits, capacity and roster. The roster records enrolled users by their
//! [`UserProfile`]; it is only one half of an enrollment and never updates
//! the user's own course list.
//!
//! Students' course lists hold the name and credits of each course, so both
//! are frozen while anyone is enrolled.

use std::fmt;
use std::hash::{Hash, Hasher};

use thiserror::Error;

use crate::user::{Enrollee, UserId, UserProfile};

/// Validation errors returned by [`Course`] constructors and setters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CourseValidationError {
    /// The course name was empty.
    #[error("course name must not be empty")]
    EmptyName,
    /// Credit hours fell outside the allowed range.
    #[error("course credits must be between {min} and {max} (got {value})")]
    CreditsOutOfRange {
        /// Rejected credit hours.
        value: u32,
        /// Lowest accepted value.
        min: u32,
        /// Highest accepted value.
        max: u32,
    },
    /// Capacity was zero.
    #[error("course capacity must be at least 1")]
    ZeroCapacity,
    /// Capacity was lowered below the current roster size.
    #[error("course capacity {value} is below the {enrolled} users already enrolled")]
    CapacityBelowEnrollment {
        /// Rejected capacity.
        value: usize,
        /// Users currently on the roster.
        enrolled: usize,
    },
    /// Name or credits were changed while users are enrolled.
    #[error("course {field} cannot change while {enrolled} users are enrolled")]
    RosterNotEmpty {
        /// The field that was being changed.
        field: &'static str,
        /// Users currently on the roster.
        enrolled: usize,
    },
}

/// Unique course name, the key used by record files and the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CourseName(String);

impl CourseName {
    /// Validate and construct a [`CourseName`].
    ///
    /// # Errors
    ///
    /// Returns [`CourseValidationError::EmptyName`] for an empty string.
    pub fn new(name: impl Into<String>) -> Result<Self, CourseValidationError> {
        Self::from_owned(name.into())
    }

    fn from_owned(name: String) -> Result<Self, CourseValidationError> {
        if name.is_empty() {
            return Err(CourseValidationError::EmptyName);
        }
        Ok(Self(name))
    }

    /// Borrow the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for CourseName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CourseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<CourseName> for String {
    fn from(value: CourseName) -> Self {
        value.0
    }
}

impl TryFrom<String> for CourseName {
    type Error = CourseValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// A course with a credit-hour weight and a capacity-bounded roster.
///
/// ## Invariants
/// - `name` is non-empty.
/// - `credits` lies in [`Course::MIN_CREDITS`]..=[`Course::MAX_CREDITS`].
/// - `capacity >= 1` and `capacity >= enrolled_count()`.
/// - The roster holds no two equal profiles.
/// - Name and credits only change while the roster is empty.
///
/// # Examples
/// ```
/// use course_roster::{Course, Enrollee, Student};
///
/// let mut course = Course::new("CSC216", 3, 10).expect("valid course");
/// let mut student = Student::try_from_strings(
///     "Ada", "Lovelace", "alovela", "ada@example.com", "hash",
/// )
/// .expect("valid student");
///
/// // Both halves of an enrollment are separate calls.
/// assert!(student.can_add_course(&course) && course.can_enroll(&student));
/// assert!(student.add_course(&course));
/// assert!(course.enroll(&student));
/// assert_eq!(course.enrolled_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Course {
    name: CourseName,
    credits: u32,
    capacity: usize,
    roster: Vec<UserProfile>,
}

impl Course {
    /// Fewest credit hours a course may carry.
    pub const MIN_CREDITS: u32 = 1;
    /// Most credit hours a course may carry.
    pub const MAX_CREDITS: u32 = 4;

    /// Build a course with an empty roster.
    ///
    /// # Errors
    ///
    /// Returns the [`CourseValidationError`] for the first invalid field,
    /// checked in the order name, credits, capacity.
    pub fn new(
        name: impl Into<String>,
        credits: u32,
        capacity: usize,
    ) -> Result<Self, CourseValidationError> {
        let name = CourseName::new(name)?;
        validate_credits(credits)?;
        validate_capacity(capacity, 0)?;
        Ok(Self {
            name,
            credits,
            capacity,
            roster: Vec::new(),
        })
    }

    /// Course name.
    #[must_use]
    pub fn name(&self) -> &CourseName {
        &self.name
    }

    /// Credit hours.
    #[must_use]
    pub const fn credits(&self) -> u32 {
        self.credits
    }

    /// Maximum roster size.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Users on the roster, in enrollment order.
    #[must_use]
    pub fn enrolled(&self) -> &[UserProfile] {
        &self.roster
    }

    /// Number of users on the roster.
    #[must_use]
    pub fn enrolled_count(&self) -> usize {
        self.roster.len()
    }

    /// Seats still available.
    #[must_use]
    pub fn open_seats(&self) -> usize {
        self.capacity.saturating_sub(self.roster.len())
    }

    /// Whether `profile` is already on the roster.
    #[must_use]
    pub fn is_enrolled(&self, profile: &UserProfile) -> bool {
        self.roster.iter().any(|entry| entry == profile)
    }

    /// Whether a roster entry carries `id`, whatever its other fields.
    #[must_use]
    pub fn holds(&self, id: &UserId) -> bool {
        self.roster.iter().any(|entry| entry.id() == id)
    }

    /// Rename the course.
    ///
    /// # Errors
    ///
    /// Returns [`CourseValidationError::EmptyName`], or
    /// [`CourseValidationError::RosterNotEmpty`] for a new name while users
    /// are enrolled, and keeps the old name.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), CourseValidationError> {
        let renamed = CourseName::new(name)?;
        if renamed != self.name {
            self.ensure_roster_empty("name")?;
        }
        self.name = renamed;
        Ok(())
    }

    /// Change the credit hours.
    ///
    /// # Errors
    ///
    /// Returns [`CourseValidationError::CreditsOutOfRange`], or
    /// [`CourseValidationError::RosterNotEmpty`] for a new value while users
    /// are enrolled, and keeps the old value.
    pub fn set_credits(&mut self, credits: u32) -> Result<(), CourseValidationError> {
        validate_credits(credits)?;
        if credits != self.credits {
            self.ensure_roster_empty("credits")?;
        }
        self.credits = credits;
        Ok(())
    }

    /// Change the capacity.
    ///
    /// # Errors
    ///
    /// Returns [`CourseValidationError::ZeroCapacity`] or
    /// [`CourseValidationError::CapacityBelowEnrollment`] and keeps the old
    /// value.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), CourseValidationError> {
        validate_capacity(capacity, self.roster.len())?;
        self.capacity = capacity;
        Ok(())
    }

    /// Whether `user` may be added to the roster.
    ///
    /// True when a seat is open, the user takes courses at all, and an equal
    /// profile is not already enrolled. The user's own credit ceiling is not
    /// consulted; see [`Enrollee::can_add_course`].
    #[must_use]
    pub fn can_enroll<U: Enrollee + ?Sized>(&self, user: &U) -> bool {
        self.open_seats() > 0 && user.takes_courses() && !self.is_enrolled(user.profile())
    }

    /// Append `user` to the roster when [`Course::can_enroll`] allows it.
    ///
    /// Returns whether the user was added. The user's course list is left
    /// alone.
    pub fn enroll<U: Enrollee + ?Sized>(&mut self, user: &U) -> bool {
        if !self.can_enroll(user) {
            return false;
        }
        self.roster.push(user.profile().clone());
        true
    }

    /// Remove `user` from the roster. Returns whether they were enrolled.
    ///
    /// An equal profile is removed first; otherwise the entry with the same
    /// id, so a user whose profile changed after enrolling still frees the
    /// seat.
    pub fn drop_user<U: Enrollee + ?Sized>(&mut self, user: &U) -> bool {
        let profile = user.profile();
        let index = self
            .roster
            .iter()
            .position(|entry| entry == profile)
            .or_else(|| self.roster.iter().position(|entry| entry.id() == profile.id()));
        let Some(index) = index else {
            return false;
        };
        self.roster.remove(index);
        true
    }

    /// Key a user's course list stores for this course.
    #[must_use]
    pub fn course_ref(&self) -> CourseRef {
        CourseRef {
            name: self.name.clone(),
            credits: self.credits,
        }
    }

    fn ensure_roster_empty(&self, field: &'static str) -> Result<(), CourseValidationError> {
        if self.roster.is_empty() {
            return Ok(());
        }
        Err(CourseValidationError::RosterNotEmpty {
            field,
            enrolled: self.roster.len(),
        })
    }
}

impl PartialEq for Course {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Course {}

impl Hash for Course {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Renders the course record `name,credits,capacity`. The roster is not
/// part of it.
impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.name, self.credits, self.capacity)
    }
}

/// A course as seen from a user's course list: its name and the credit
/// hours it carried when added. [`Course`] keeps both fixed while its roster
/// is non-empty.
///
/// Equal when the names match, like [`Course`].
#[derive(Debug, Clone)]
pub struct CourseRef {
    name: CourseName,
    credits: u32,
}

impl CourseRef {
    /// Course name.
    #[must_use]
    pub fn name(&self) -> &CourseName {
        &self.name
    }

    /// Credit hours counted towards the user's total.
    #[must_use]
    pub const fn credits(&self) -> u32 {
        self.credits
    }

    /// Whether this entry refers to `course`.
    #[must_use]
    pub fn refers_to(&self, course: &Course) -> bool {
        self.name == course.name
    }
}

impl PartialEq for CourseRef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for CourseRef {}

impl Hash for CourseRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl From<&Course> for CourseRef {
    fn from(value: &Course) -> Self {
        value.course_ref()
    }
}

fn validate_credits(credits: u32) -> Result<(), CourseValidationError> {
    if !(Course::MIN_CREDITS..=Course::MAX_CREDITS).contains(&credits) {
        return Err(CourseValidationError::CreditsOutOfRange {
            value: credits,
            min: Course::MIN_CREDITS,
            max: Course::MAX_CREDITS,
        });
    }
    Ok(())
}

fn validate_capacity(capacity: usize, enrolled: usize) -> Result<(), CourseValidationError> {
    if capacity == 0 {
        return Err(CourseValidationError::ZeroCapacity);
    }
    if capacity < enrolled {
        return Err(CourseValidationError::CapacityBelowEnrollment {
            value: capacity,
            enrolled,
        });
    }
    Ok(())
}
