//! Students: users with a credit-bounded course list.

use std::fmt;

use thiserror::Error;

use crate::course::{Course, CourseRef};
use crate::user::{Enrollee, UserProfile, UserValidationError};

/// Validation errors returned by [`Student`] constructors and setters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StudentValidationError {
    /// One of the identity fields was invalid.
    #[error(transparent)]
    User(#[from] UserValidationError),
    /// The credit ceiling exceeded [`Student::MAX_CREDITS`].
    #[error("max credits {value} exceeds the ceiling of {ceiling}")]
    MaxCreditsAboveCeiling {
        /// Rejected ceiling.
        value: u32,
        /// Highest accepted value.
        ceiling: u32,
    },
    /// The credit ceiling fell below the credits already taken.
    #[error("max credits {value} is below the {current} credits already taken")]
    MaxCreditsBelowCurrent {
        /// Rejected ceiling.
        value: u32,
        /// Credits currently scheduled.
        current: u32,
    },
}

/// A user who takes courses, up to a personal credit ceiling.
///
/// ## Invariants
/// - `max_credits <= Student::MAX_CREDITS`.
/// - The sum of credits over `courses` never exceeds `max_credits`.
/// - `courses` holds no two entries with the same course name.
///
/// Equality and hashing cover the profile, the ceiling and the course list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Student {
    profile: UserProfile,
    courses: Vec<CourseRef>,
    max_credits: u32,
}

impl Student {
    /// Highest credit ceiling a student may hold, and the default.
    pub const MAX_CREDITS: u32 = 18;

    /// Build a student with the default ceiling and no courses.
    #[must_use]
    pub const fn new(profile: UserProfile) -> Self {
        Self {
            profile,
            courses: Vec::new(),
            max_credits: Self::MAX_CREDITS,
        }
    }

    /// Build a student with an explicit credit ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`StudentValidationError::MaxCreditsAboveCeiling`] when
    /// `max_credits` exceeds [`Student::MAX_CREDITS`].
    pub fn with_max_credits(
        profile: UserProfile,
        max_credits: u32,
    ) -> Result<Self, StudentValidationError> {
        let mut student = Self::new(profile);
        student.set_max_credits(max_credits)?;
        Ok(student)
    }

    /// Fallible constructor from raw identity strings, using the default
    /// ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`StudentValidationError::User`] for the first invalid field.
    pub fn try_from_strings(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        id: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, StudentValidationError> {
        let profile = UserProfile::try_from_strings(first_name, last_name, id, email, password)?;
        Ok(Self::new(profile))
    }

    /// Identity fields.
    #[must_use]
    pub const fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Mutable identity fields. The id stays fixed.
    pub const fn profile_mut(&mut self) -> &mut UserProfile {
        &mut self.profile
    }

    /// Credit ceiling.
    #[must_use]
    pub const fn max_credits(&self) -> u32 {
        self.max_credits
    }

    /// Credits across the current course list.
    #[must_use]
    pub fn current_credits(&self) -> u32 {
        self.courses
            .iter()
            .fold(0_u32, |total, course| total.saturating_add(course.credits()))
    }

    /// Change the credit ceiling.
    ///
    /// # Errors
    ///
    /// Returns [`StudentValidationError::MaxCreditsAboveCeiling`] or
    /// [`StudentValidationError::MaxCreditsBelowCurrent`] and keeps the old
    /// ceiling.
    pub fn set_max_credits(&mut self, max_credits: u32) -> Result<(), StudentValidationError> {
        if max_credits > Self::MAX_CREDITS {
            return Err(StudentValidationError::MaxCreditsAboveCeiling {
                value: max_credits,
                ceiling: Self::MAX_CREDITS,
            });
        }
        let current = self.current_credits();
        if max_credits < current {
            return Err(StudentValidationError::MaxCreditsBelowCurrent {
                value: max_credits,
                current,
            });
        }
        self.max_credits = max_credits;
        Ok(())
    }

    /// Whether `course` is on this student's list.
    #[must_use]
    pub fn is_taking(&self, course: &Course) -> bool {
        self.courses.iter().any(|entry| entry.refers_to(course))
    }
}

impl Enrollee for Student {
    fn profile(&self) -> &UserProfile {
        &self.profile
    }

    fn takes_courses(&self) -> bool {
        true
    }

    fn can_add_course(&self, course: &Course) -> bool {
        let projected = self.current_credits().saturating_add(course.credits());
        projected <= self.max_credits && !self.is_taking(course)
    }

    fn add_course(&mut self, course: &Course) -> bool {
        if !self.can_add_course(course) {
            return false;
        }
        self.courses.push(course.course_ref());
        true
    }

    fn remove_course(&mut self, course: &Course) -> bool {
        let Some(index) = self.courses.iter().position(|entry| entry.refers_to(course)) else {
            return false;
        };
        self.courses.remove(index);
        true
    }

    fn courses(&self) -> &[CourseRef] {
        &self.courses
    }
}

/// Renders the student record `first,last,id,email,password,max` followed by
/// `,name` for every course in list order.
impl fmt::Display for Student {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.profile, self.max_credits)?;
        for course in &self.courses {
            write!(f, ",{}", course.name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Covers credit ceilings, course list rules and record rendering.

    use rstest::{fixture, rstest};

    use super::*;

    fn course(name: &str, credits: u32) -> Course {
        Course::new(name, credits, 10).expect("valid course")
    }

    #[fixture]
    fn student() -> Student {
        Student::try_from_strings("Ada", "Lovelace", "alovela", "ada@example.com", "hash")
            .expect("valid student")
    }

    #[rstest]
    fn new_student_uses_default_ceiling(student: Student) {
        assert_eq!(student.max_credits(), Student::MAX_CREDITS);
        assert_eq!(student.current_credits(), 0);
        assert!(student.courses().is_empty());
        assert!(student.takes_courses());
    }

    #[rstest]
    fn try_from_strings_surfaces_profile_errors() {
        let result =
            Student::try_from_strings("Ada", "Lovelace", "alovela", "ada.example@com", "h");
        assert!(matches!(
            result,
            Err(StudentValidationError::User(
                UserValidationError::InvalidEmail { .. }
            ))
        ));
    }

    #[rstest]
    fn ceiling_above_limit_is_rejected(student: Student) {
        let profile = student.profile().clone();
        assert_eq!(
            Student::with_max_credits(profile, 19).map(|_| ()),
            Err(StudentValidationError::MaxCreditsAboveCeiling {
                value: 19,
                ceiling: 18
            })
        );
    }

    #[rstest]
    fn small_ceiling_limits_course_list(student: Student) {
        let mut limited =
            Student::with_max_credits(student.profile().clone(), 4).expect("valid ceiling");
        let (a, b, c) = (course("A", 3), course("B", 1), course("C", 1));

        assert!(limited.add_course(&a));
        assert!(limited.add_course(&b));
        assert_eq!(limited.current_credits(), 4);
        assert!(!limited.can_add_course(&c));
        assert!(!limited.add_course(&c));
        assert_eq!(limited.courses().len(), 2);
    }

    #[rstest]
    fn same_course_cannot_be_added_twice(mut student: Student) {
        let a = course("CSC216", 3);
        assert!(student.add_course(&a));
        assert!(!student.add_course(&a));
        assert_eq!(student.current_credits(), 3);
    }

    #[rstest]
    fn ceiling_cannot_drop_below_current_credits(mut student: Student) {
        assert!(student.add_course(&course("A", 4)));
        assert!(student.add_course(&course("B", 4)));

        assert_eq!(
            student.set_max_credits(7),
            Err(StudentValidationError::MaxCreditsBelowCurrent {
                value: 7,
                current: 8
            })
        );
        assert_eq!(student.max_credits(), 18);
        assert!(student.set_max_credits(8).is_ok());
    }

    #[rstest]
    fn remove_course_frees_credits(mut student: Student) {
        let a = course("A", 4);
        assert!(student.add_course(&a));
        assert!(student.remove_course(&a));
        assert!(!student.remove_course(&a));
        assert_eq!(student.current_credits(), 0);
        assert!(!student.is_taking(&a));
    }

    #[rstest]
    fn add_course_does_not_touch_the_roster(mut student: Student) {
        let a = course("A", 3);
        assert!(student.add_course(&a));
        assert_eq!(a.enrolled_count(), 0);
    }

    #[rstest]
    fn display_renders_student_record(mut student: Student) {
        assert_eq!(
            student.to_string(),
            "Ada,Lovelace,alovela,ada@example.com,hash,18"
        );
        assert!(student.add_course(&course("CSC216", 3)));
        assert!(student.add_course(&course("CSC226", 3)));
        assert_eq!(
            student.to_string(),
            "Ada,Lovelace,alovela,ada@example.com,hash,18,CSC216,CSC226"
        );
    }
}
