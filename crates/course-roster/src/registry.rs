//! Course-name resolution.
//!
//! The registry owns the loaded [`Course`] values and resolves the textual
//! course names found in student records. It is an explicit value passed to
//! the loaders; reloading course data replaces its contents wholesale.

use thiserror::Error;
use tracing::warn;

use crate::course::{Course, CourseValidationError};

/// Errors returned by registry lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// No course with the given name is registered.
    #[error("course '{name}' not found in registry")]
    CourseNotFound {
        /// The course name that was not found.
        name: String,
    },

    /// Another registered course already uses the name.
    #[error("course '{name}' is already registered")]
    DuplicateCourse {
        /// The name already in use.
        name: String,
    },

    /// The course refused the change.
    #[error(transparent)]
    InvalidCourse(#[from] CourseValidationError),
}

/// Courses keyed by name, in load order.
///
/// Names are unique: inserting a course whose name is already registered is
/// refused and the first course wins. Registered courses are changed only
/// through the registry, which keeps names unique.
///
/// # Example
///
/// ```
/// use course_roster::{Course, CourseRegistry};
///
/// let registry = CourseRegistry::from_courses([
///     Course::new("CSC216", 3, 10).expect("valid course"),
///     Course::new("CSC226", 3, 10).expect("valid course"),
/// ]);
///
/// assert_eq!(registry.len(), 2);
/// assert!(registry.find_course("CSC226").is_ok());
/// assert!(registry.find_course("CSC999").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseRegistry {
    courses: Vec<Course>,
}

impl CourseRegistry {
    /// Empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            courses: Vec::new(),
        }
    }

    /// Build a registry from `courses`, dropping later duplicates.
    #[must_use]
    pub fn from_courses(courses: impl IntoIterator<Item = Course>) -> Self {
        let mut registry = Self::new();
        registry.rebuild(courses);
        registry
    }

    /// Replace every registered course with `courses`.
    ///
    /// Returns how many courses were registered.
    pub fn rebuild(&mut self, courses: impl IntoIterator<Item = Course>) -> usize {
        self.courses.clear();
        let mut registered = 0;
        for course in courses {
            if self.insert(course) {
                registered += 1;
            }
        }
        registered
    }

    /// Register `course` unless its name is taken.
    ///
    /// Returns whether the course was added.
    pub fn insert(&mut self, course: Course) -> bool {
        if self.courses.contains(&course) {
            warn!(course = %course.name(), "ignoring duplicate course name");
            return false;
        }
        self.courses.push(course);
        true
    }

    /// Finds a course by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CourseNotFound`] if no course with the given
    /// name exists.
    pub fn find_course(&self, name: &str) -> Result<&Course, RegistryError> {
        self.courses
            .iter()
            .find(|c| c.name().as_str() == name)
            .ok_or_else(|| not_found(name))
    }

    /// Finds a course by name for mutation.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CourseNotFound`] if no course with the given
    /// name exists.
    pub(crate) fn find_course_mut(&mut self, name: &str) -> Result<&mut Course, RegistryError> {
        self.courses
            .iter_mut()
            .find(|c| c.name().as_str() == name)
            .ok_or_else(|| not_found(name))
    }

    /// Rename the course registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CourseNotFound`], [`RegistryError::DuplicateCourse`]
    /// when `new_name` belongs to another course, or
    /// [`RegistryError::InvalidCourse`] when the course refuses the name.
    pub fn rename_course(&mut self, name: &str, new_name: &str) -> Result<(), RegistryError> {
        if new_name != name && self.contains(new_name) {
            return Err(RegistryError::DuplicateCourse {
                name: new_name.to_owned(),
            });
        }
        self.find_course_mut(name)?.set_name(new_name)?;
        Ok(())
    }

    /// Change the credit hours of the course registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CourseNotFound`] or
    /// [`RegistryError::InvalidCourse`].
    pub fn set_course_credits(&mut self, name: &str, credits: u32) -> Result<(), RegistryError> {
        self.find_course_mut(name)?.set_credits(credits)?;
        Ok(())
    }

    /// Change the capacity of the course registered as `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CourseNotFound`] or
    /// [`RegistryError::InvalidCourse`].
    pub fn set_course_capacity(
        &mut self,
        name: &str,
        capacity: usize,
    ) -> Result<(), RegistryError> {
        self.find_course_mut(name)?.set_capacity(capacity)?;
        Ok(())
    }

    /// Whether a course with `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.find_course(name).is_ok()
    }

    /// Registered courses in load order.
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Number of registered courses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.courses.len()
    }

    /// Whether no courses are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }
}

fn not_found(name: &str) -> RegistryError {
    RegistryError::CourseNotFound {
        name: name.to_owned(),
    }
}
