//! The roster manager: one registry of courses plus the students enrolled in
//! them.
//!
//! A [`CourseCatalog`] is an ordinary value. Reloading course data rebuilds
//! its registry; nothing is shared process-wide.

use std::mem;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, warn};

use crate::config::RosterSettings;
use crate::course::Course;
use crate::enrollment::{self, EnrollmentError};
use crate::error::RecordIoError;
use crate::records::{
    load_student_text, read_course_records, read_record_file, write_course_records,
    write_student_records,
};
use crate::registry::{CourseRegistry, RegistryError};
use crate::student::Student;
use crate::user::Enrollee;

/// Errors returned by [`CourseCatalog`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No loaded student has the given id.
    #[error("student '{id}' not found in catalog")]
    StudentNotFound {
        /// The id that was not found.
        id: String,
    },

    /// A student with the same id is already loaded.
    #[error("student '{id}' is already in the catalog")]
    DuplicateStudent {
        /// The id already in use.
        id: String,
    },

    /// The enrollment transaction was refused.
    #[error(transparent)]
    Enrollment(#[from] EnrollmentError),

    /// A record file could not be read or written.
    #[error(transparent)]
    Records(#[from] RecordIoError),
}

/// Course and student counts from [`CourseCatalog::load_from_settings`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadedCounts {
    /// Courses registered.
    pub courses: usize,
    /// Students loaded and enrolled.
    pub students: usize,
}

/// Owns the course registry and the loaded students.
///
/// Every student in the catalog is paired with the rosters of the courses on
/// its list; [`CourseCatalog::enroll`] and [`CourseCatalog::withdraw`] keep
/// the two sides in step.
///
/// # Example
///
/// ```
/// use course_roster::{Course, CourseCatalog, Student};
///
/// let mut catalog = CourseCatalog::from_courses([
///     Course::new("CSC216", 3, 10).expect("valid course"),
/// ]);
/// let student = Student::try_from_strings(
///     "Ada", "Lovelace", "alovela", "ada@example.com", "hash",
/// )
/// .expect("valid student");
///
/// catalog.add_student(student).expect("new id");
/// catalog.enroll("alovela", "CSC216").expect("seat available");
///
/// let course = catalog.find_course("CSC216").expect("registered");
/// assert_eq!(course.enrolled_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CourseCatalog {
    registry: CourseRegistry,
    students: Vec<Student>,
}

impl CourseCatalog {
    /// Empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            registry: CourseRegistry::new(),
            students: Vec::new(),
        }
    }

    /// Catalog holding `courses` and no students.
    #[must_use]
    pub fn from_courses(courses: impl IntoIterator<Item = Course>) -> Self {
        Self {
            registry: CourseRegistry::from_courses(courses),
            students: Vec::new(),
        }
    }

    /// Replace the registry with the courses in the file at `path`.
    ///
    /// Loaded students are discarded: their enrollments referred to the
    /// previous courses. Returns the number of courses registered.
    ///
    /// # Errors
    ///
    /// Returns [`RecordIoError`] when the file is missing or unreadable. The
    /// catalog is unchanged in that case.
    pub fn load_courses(&mut self, path: &Path) -> Result<usize, RecordIoError> {
        let courses = read_course_records(path)?;
        if !self.students.is_empty() {
            warn!(
                discarded = self.students.len(),
                "reloading courses discards loaded students"
            );
            self.students.clear();
        }
        Ok(self.registry.rebuild(courses))
    }

    /// Replace the loaded students with those in the file at `path`.
    ///
    /// Previously loaded students are withdrawn from every course first.
    /// Returns the number of students loaded.
    ///
    /// # Errors
    ///
    /// Returns [`RecordIoError`] when the file is missing or unreadable. The
    /// catalog is unchanged in that case.
    pub fn load_students(&mut self, path: &Path) -> Result<usize, RecordIoError> {
        let text = read_record_file(path)?;
        self.withdraw_all_students();
        self.students = load_student_text(path, &text, &mut self.registry);
        Ok(self.students.len())
    }

    /// Load the course file, then the student file, named by `settings`.
    ///
    /// # Errors
    ///
    /// Returns the first [`RecordIoError`] from either file.
    pub fn load_from_settings(
        &mut self,
        settings: &RosterSettings,
    ) -> Result<LoadedCounts, RecordIoError> {
        let courses = self.load_courses(&settings.course_file())?;
        let students = self.load_students(&settings.student_file())?;
        Ok(LoadedCounts { courses, students })
    }

    /// Write every registered course to the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordIoError::Write`] when the destination cannot be written.
    pub fn save_courses(&self, path: &Path) -> Result<(), RecordIoError> {
        write_course_records(path, self.registry.courses())
    }

    /// Write every loaded student to the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`RecordIoError::Write`] when the destination cannot be written.
    pub fn save_students(&self, path: &Path) -> Result<(), RecordIoError> {
        write_student_records(path, &self.students)
    }

    /// Write the course file, then the student file, named by `settings`.
    ///
    /// # Errors
    ///
    /// Returns the first [`RecordIoError`] from either file.
    pub fn save_to_settings(&self, settings: &RosterSettings) -> Result<(), RecordIoError> {
        self.save_courses(&settings.course_file())?;
        self.save_students(&settings.student_file())
    }

    /// Registered courses in load order.
    #[must_use]
    pub fn courses(&self) -> &[Course] {
        self.registry.courses()
    }

    /// Loaded students in load order.
    #[must_use]
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// The course registry.
    #[must_use]
    pub const fn registry(&self) -> &CourseRegistry {
        &self.registry
    }

    /// Finds a course by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::CourseNotFound`] if no course with the given
    /// name exists.
    pub fn find_course(&self, name: &str) -> Result<&Course, RegistryError> {
        self.registry.find_course(name)
    }

    /// Finds a loaded student by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::StudentNotFound`] if no student has that id.
    pub fn find_student(&self, id: &str) -> Result<&Student, CatalogError> {
        self.students
            .iter()
            .find(|student| student.profile().id().as_str() == id)
            .ok_or_else(|| student_not_found(id))
    }

    /// Add `student` to the catalog.
    ///
    /// The student joins with whatever course list it carries; use
    /// [`CourseCatalog::enroll`] afterwards so the rosters follow.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateStudent`] if a loaded student already
    /// has the same id.
    pub fn add_student(&mut self, student: Student) -> Result<(), CatalogError> {
        let id = student.profile().id();
        if self.students.iter().any(|loaded| loaded.profile().id() == id) {
            return Err(CatalogError::DuplicateStudent { id: id.to_string() });
        }
        debug!(student = %id, "added student");
        self.students.push(student);
        Ok(())
    }

    /// Enroll the loaded student `student_id` in `course_name`, updating both
    /// the student's list and the course roster.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::StudentNotFound`] for an unknown id, or
    /// [`CatalogError::Enrollment`] with the refusal reason.
    pub fn enroll(&mut self, student_id: &str, course_name: &str) -> Result<(), CatalogError> {
        let student = find_student_mut(&mut self.students, student_id)?;
        enrollment::enroll(&mut self.registry, student, course_name)?;
        Ok(())
    }

    /// Withdraw the loaded student `student_id` from `course_name` on both
    /// sides.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::StudentNotFound`] for an unknown id, or
    /// [`CatalogError::Enrollment`] when the course is unknown or the
    /// student was not enrolled.
    pub fn withdraw(&mut self, student_id: &str, course_name: &str) -> Result<(), CatalogError> {
        let student = find_student_mut(&mut self.students, student_id)?;
        enrollment::withdraw(&mut self.registry, student, course_name)?;
        Ok(())
    }

    fn withdraw_all_students(&mut self) {
        for mut student in mem::take(&mut self.students) {
            let names: Vec<String> = student
                .courses()
                .iter()
                .map(|course| course.name().to_string())
                .collect();
            for name in names {
                if let Err(err) = enrollment::withdraw(&mut self.registry, &mut student, &name) {
                    debug!(course = %name, reason = %err, "withdrawal during reload failed");
                }
            }
        }
    }
}

fn find_student_mut<'a>(
    students: &'a mut [Student],
    id: &str,
) -> Result<&'a mut Student, CatalogError> {
    students
        .iter_mut()
        .find(|student| student.profile().id().as_str() == id)
        .ok_or_else(|| student_not_found(id))
}

fn student_not_found(id: &str) -> CatalogError {
    CatalogError::StudentNotFound { id: id.to_owned() }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};

    use super::*;

    fn student(id: &str) -> Student {
        Student::try_from_strings("First", "Last", id, format!("{id}@example.com"), "hash")
            .expect("valid student")
    }

    #[fixture]
    fn catalog() -> CourseCatalog {
        let mut catalog = CourseCatalog::from_courses([
            Course::new("CSC216", 3, 2).expect("valid course"),
            Course::new("MA141", 4, 10).expect("valid course"),
        ]);
        catalog.add_student(student("a")).expect("new id");
        catalog.add_student(student("b")).expect("new id");
        catalog
    }

    #[rstest]
    fn add_student_rejects_duplicate_ids(mut catalog: CourseCatalog) {
        assert_eq!(
            catalog.add_student(student("a")),
            Err(CatalogError::DuplicateStudent { id: "a".to_owned() })
        );
        assert_eq!(catalog.students().len(), 2);
    }

    #[rstest]
    fn enroll_and_withdraw_update_both_sides(mut catalog: CourseCatalog) {
        catalog.enroll("a", "CSC216").expect("enrolled");
        let a = catalog.find_student("a").expect("student loaded");
        assert_eq!(a.current_credits(), 3);
        assert_eq!(
            catalog.find_course("CSC216").map(Course::enrolled_count),
            Ok(1)
        );

        catalog.withdraw("a", "CSC216").expect("withdrew");
        let withdrawn = catalog.find_student("a").expect("student loaded");
        assert!(withdrawn.courses().is_empty());
        assert_eq!(
            catalog.find_course("CSC216").map(Course::enrolled_count),
            Ok(0)
        );
    }

    #[rstest]
    fn unknown_student_is_reported(mut catalog: CourseCatalog) {
        assert_eq!(
            catalog.enroll("zz", "CSC216"),
            Err(CatalogError::StudentNotFound { id: "zz".to_owned() })
        );
        assert!(matches!(
            catalog.find_student("zz"),
            Err(CatalogError::StudentNotFound { .. })
        ));
    }

    #[rstest]
    fn enrollment_refusals_pass_through(mut catalog: CourseCatalog) {
        catalog.enroll("a", "CSC216").expect("enrolled");
        assert!(matches!(
            catalog.enroll("a", "CSC216"),
            Err(CatalogError::Enrollment(
                EnrollmentError::AlreadyEnrolled { .. }
            ))
        ));
        assert!(matches!(
            catalog.withdraw("b", "CSC216"),
            Err(CatalogError::Enrollment(EnrollmentError::NotEnrolled { .. }))
        ));
    }

    #[rstest]
    fn withdraw_all_students_empties_rosters(mut catalog: CourseCatalog) {
        catalog.enroll("a", "CSC216").expect("enrolled");
        catalog.enroll("b", "MA141").expect("enrolled");

        catalog.withdraw_all_students();

        assert!(catalog.students().is_empty());
        assert!(
            catalog
                .courses()
                .iter()
                .all(|course| course.enrolled_count() == 0)
        );
    }

    #[test]
    fn catalog_error_formats_correctly() {
        let err = CatalogError::DuplicateStudent {
            id: "alovela".to_owned(),
        };
        assert_eq!(err.to_string(), "student 'alovela' is already in the catalog");
    }
}
