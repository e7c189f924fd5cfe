//! Two-sided enrollment transactions.
//!
//! A student's course list and a course's roster are independent
//! collections. [`enroll`] and [`withdraw`] update both as one logical step:
//! every check runs before either side is touched, so a refusal leaves the
//! student and the course exactly as they were.

use thiserror::Error;
use tracing::{debug, warn};

use crate::course::Course;
use crate::registry::CourseRegistry;
use crate::student::Student;
use crate::user::Enrollee;

/// Reasons an enrollment transaction was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EnrollmentError {
    /// The course name did not resolve through the registry.
    #[error("course '{name}' not found in registry")]
    CourseNotFound {
        /// The course name that was not found.
        name: String,
    },

    /// The student already holds the course, or is already on its roster.
    #[error("student '{student}' is already enrolled in '{course}'")]
    AlreadyEnrolled {
        /// Student id.
        student: String,
        /// Course name.
        course: String,
    },

    /// Adding the course would exceed the student's credit ceiling.
    #[error(
        "adding '{course}' ({requested} credits) to {current} credits exceeds the limit of {max}"
    )]
    CreditLimitExceeded {
        /// Course name.
        course: String,
        /// Credits the student already carries.
        current: u32,
        /// Credits the course would add.
        requested: u32,
        /// The student's credit ceiling.
        max: u32,
    },

    /// The course roster has no open seats.
    #[error("course '{course}' is full ({capacity} seats)")]
    CourseFull {
        /// Course name.
        course: String,
        /// Roster capacity.
        capacity: usize,
    },

    /// The course refused the student for a reason not covered above.
    #[error("course '{course}' refused student '{student}'")]
    NotEnrollable {
        /// Student id.
        student: String,
        /// Course name.
        course: String,
    },

    /// Only one of the student's list and the course roster held the
    /// pairing. The held side has been removed.
    #[error("student '{student}' and course '{course}' held only one side of the enrollment")]
    HalfEnrolled {
        /// Student id.
        student: String,
        /// Course name.
        course: String,
    },

    /// Neither the student nor the course roster held the pairing.
    #[error("student '{student}' is not enrolled in '{course}'")]
    NotEnrolled {
        /// Student id.
        student: String,
        /// Course name.
        course: String,
    },
}

/// Enroll `student` in the course registered as `course_name`.
///
/// Both `student.can_add_course` and `course.can_enroll` must hold before
/// the student's list and the course roster are updated.
///
/// # Errors
///
/// Returns the [`EnrollmentError`] naming the first failed check. Nothing is
/// modified in that case.
///
/// # Example
///
/// ```
/// use course_roster::{enrollment, Course, CourseRegistry, Enrollee, Student};
///
/// let mut registry = CourseRegistry::from_courses([
///     Course::new("CSC216", 3, 10).expect("valid course"),
/// ]);
/// let mut student = Student::try_from_strings(
///     "Ada", "Lovelace", "alovela", "ada@example.com", "hash",
/// )
/// .expect("valid student");
///
/// enrollment::enroll(&mut registry, &mut student, "CSC216").expect("enrolled");
///
/// assert_eq!(student.courses().len(), 1);
/// assert_eq!(
///     registry.find_course("CSC216").map(Course::enrolled_count),
///     Ok(1)
/// );
/// ```
pub fn enroll(
    registry: &mut CourseRegistry,
    student: &mut Student,
    course_name: &str,
) -> Result<(), EnrollmentError> {
    let course = course_mut(registry, course_name)?;
    check_enrollment(course, student)?;

    if !student.add_course(course) {
        return Err(not_enrollable(course, student));
    }
    if !course.enroll(&*student) {
        student.remove_course(course);
        return Err(not_enrollable(course, student));
    }
    debug!(student = %student.profile().id(), course = %course.name(), "enrolled");
    Ok(())
}

/// Remove the pairing between `student` and the course named `course_name`
/// from both sides.
///
/// Roster entries are matched by user id when the profile has changed since
/// enrolling.
///
/// # Errors
///
/// Returns [`EnrollmentError::CourseNotFound`] for an unknown course,
/// [`EnrollmentError::NotEnrolled`] when neither side held the pairing, or
/// [`EnrollmentError::HalfEnrolled`] after removing a pairing only one side
/// held.
pub fn withdraw(
    registry: &mut CourseRegistry,
    student: &mut Student,
    course_name: &str,
) -> Result<(), EnrollmentError> {
    let course = course_mut(registry, course_name)?;
    let removed_from_list = student.remove_course(course);
    let removed_from_roster = course.drop_user(&*student);
    let student_id = student.profile().id().to_string();
    match (removed_from_list, removed_from_roster) {
        (true, true) => {}
        (false, false) => {
            return Err(EnrollmentError::NotEnrolled {
                student: student_id,
                course: course.name().to_string(),
            });
        }
        (on_list, _) => {
            warn!(
                student = %student_id,
                course = %course.name(),
                on_list,
                "removed a one-sided enrollment"
            );
            return Err(EnrollmentError::HalfEnrolled {
                student: student_id,
                course: course.name().to_string(),
            });
        }
    }
    debug!(student = %student.profile().id(), course = %course.name(), "withdrew");
    Ok(())
}

fn course_mut<'a>(
    registry: &'a mut CourseRegistry,
    name: &str,
) -> Result<&'a mut Course, EnrollmentError> {
    registry
        .find_course_mut(name)
        .map_err(|_| EnrollmentError::CourseNotFound {
            name: name.to_owned(),
        })
}

fn check_enrollment(course: &Course, student: &Student) -> Result<(), EnrollmentError> {
    if student.is_taking(course) || course.holds(student.profile().id()) {
        return Err(EnrollmentError::AlreadyEnrolled {
            student: student.profile().id().to_string(),
            course: course.name().to_string(),
        });
    }
    if !student.can_add_course(course) {
        return Err(EnrollmentError::CreditLimitExceeded {
            course: course.name().to_string(),
            current: student.current_credits(),
            requested: course.credits(),
            max: student.max_credits(),
        });
    }
    if course.open_seats() == 0 {
        return Err(EnrollmentError::CourseFull {
            course: course.name().to_string(),
            capacity: course.capacity(),
        });
    }
    if !course.can_enroll(student) {
        return Err(not_enrollable(course, student));
    }
    Ok(())
}

fn not_enrollable(course: &Course, student: &Student) -> EnrollmentError {
    EnrollmentError::NotEnrollable {
        student: student.profile().id().to_string(),
        course: course.name().to_string(),
    }
}
