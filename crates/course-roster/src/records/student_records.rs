//! Student record lines: `first,last,id,email,password,max_credits[,course]*`.
//!
//! Course names are resolved through a [`CourseRegistry`] and each one is
//! enrolled with the same paired transaction a live caller would use. If any
//! course on a line cannot be enrolled, the pairings already made for that
//! line are withdrawn and the whole line is rejected.

use std::path::Path;

use tracing::{debug, info};

use super::{
    RecordParseError, format_lines, parse_lines, parse_number, read_record_file, split_fields,
    write_record_file,
};
use crate::enrollment;
use crate::error::RecordIoError;
use crate::registry::CourseRegistry;
use crate::student::Student;

const STUDENT_FIELDS: usize = 6;

/// Parse student records from `text`, enrolling each student in the
/// courses their line lists.
///
/// Rejected lines leave `registry` unchanged.
///
/// # Examples
/// ```
/// use course_roster::{parse_student_records, Course, CourseRegistry};
///
/// let mut registry = CourseRegistry::from_courses([
///     Course::new("CSC216", 3, 10).expect("valid course"),
/// ]);
/// let text = "Ada,Lovelace,alovela,ada@example.com,hash,18,CSC216\n\
///             Alan,Turing,aturing,alan@example.com,hash,18,CSC999\n";
///
/// let students = parse_student_records(text, &mut registry);
/// assert_eq!(students.len(), 1);
/// ```
pub fn parse_student_records(text: &str, registry: &mut CourseRegistry) -> Vec<Student> {
    parse_lines(text, |line| parse_student_line(line, registry)).0
}

/// Render `students` as student record lines in slice order.
#[must_use]
pub fn format_student_records(students: &[Student]) -> String {
    format_lines(students)
}

/// Read every acceptable student record from the file at `path`, enrolling
/// them in courses held by `registry`.
///
/// # Errors
///
/// Returns [`RecordIoError::NotFound`] when the file does not exist and
/// [`RecordIoError::Read`] when it cannot be read as UTF-8 text.
pub fn read_student_records(
    path: &Path,
    registry: &mut CourseRegistry,
) -> Result<Vec<Student>, RecordIoError> {
    let text = read_record_file(path)?;
    Ok(load_student_text(path, &text, registry))
}

/// Parse the already-read contents of the student file at `path`.
pub(crate) fn load_student_text(
    path: &Path,
    text: &str,
    registry: &mut CourseRegistry,
) -> Vec<Student> {
    let (students, skipped) = parse_lines(text, |line| parse_student_line(line, registry));
    info!(
        path = %path.display(),
        loaded = students.len(),
        skipped,
        "loaded student records"
    );
    students
}

/// Replace the file at `path` with one line per student.
///
/// # Errors
///
/// Returns [`RecordIoError::Write`] when the destination cannot be written.
/// A previous file at `path` is left intact in that case.
pub fn write_student_records(path: &Path, students: &[Student]) -> Result<(), RecordIoError> {
    write_record_file(path, &format_student_records(students), students.len())
}

fn parse_student_line(
    line: &str,
    registry: &mut CourseRegistry,
) -> Result<Student, RecordParseError> {
    let fields = split_fields(line);
    let [first, last, id, email, password, max_field, course_names @ ..] = fields.as_slice()
    else {
        return Err(RecordParseError::TooFewFields {
            minimum: STUDENT_FIELDS,
            found: fields.len(),
        });
    };
    let mut student = Student::try_from_strings(*first, *last, *id, *email, *password)?;
    student.set_max_credits(parse_number("max credits", max_field)?)?;

    let mut enrolled: Vec<&str> = Vec::with_capacity(course_names.len());
    for &name in course_names {
        if let Err(err) = enrollment::enroll(registry, &mut student, name) {
            roll_back(registry, &mut student, &enrolled);
            return Err(err.into());
        }
        enrolled.push(name);
    }
    Ok(student)
}

fn roll_back(registry: &mut CourseRegistry, student: &mut Student, enrolled: &[&str]) {
    for name in enrolled.iter().rev() {
        if let Err(err) = enrollment::withdraw(registry, student, name) {
            debug!(course = *name, reason = %err, "rollback withdrawal failed");
        }
    }
}
