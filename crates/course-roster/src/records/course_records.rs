//! Course record lines: `name,credits,capacity`.

use std::path::Path;

use tracing::info;

use super::{
    RecordParseError, format_lines, parse_lines, parse_number, read_record_file, split_fields,
    write_record_file,
};
use crate::course::Course;
use crate::error::RecordIoError;

const COURSE_FIELDS: usize = 3;

/// Parse course records from `text`, skipping lines that do not describe a
/// valid course.
///
/// # Examples
/// ```
/// use course_roster::parse_course_records;
///
/// let courses = parse_course_records("CSC216,3,10\nnot a course\nMA141,4,30\n");
/// assert_eq!(courses.len(), 2);
/// ```
#[must_use]
pub fn parse_course_records(text: &str) -> Vec<Course> {
    parse_lines(text, parse_course_line).0
}

/// Render `courses` as course record lines in slice order.
#[must_use]
pub fn format_course_records(courses: &[Course]) -> String {
    format_lines(courses)
}

/// Read every valid course record from the file at `path`.
///
/// # Errors
///
/// Returns [`RecordIoError::NotFound`] when the file does not exist and
/// [`RecordIoError::Read`] when it cannot be read as UTF-8 text.
pub fn read_course_records(path: &Path) -> Result<Vec<Course>, RecordIoError> {
    let text = read_record_file(path)?;
    let (courses, skipped) = parse_lines(&text, parse_course_line);
    info!(
        path = %path.display(),
        loaded = courses.len(),
        skipped,
        "loaded course records"
    );
    Ok(courses)
}

/// Replace the file at `path` with one line per course.
///
/// # Errors
///
/// Returns [`RecordIoError::Write`] when the destination cannot be written.
/// A previous file at `path` is left intact in that case.
pub fn write_course_records(path: &Path, courses: &[Course]) -> Result<(), RecordIoError> {
    write_record_file(path, &format_course_records(courses), courses.len())
}

fn parse_course_line(line: &str) -> Result<Course, RecordParseError> {
    let fields = split_fields(line);
    let [name, credits_field, capacity_field] = fields.as_slice() else {
        return Err(RecordParseError::FieldCount {
            expected: COURSE_FIELDS,
            found: fields.len(),
        });
    };
    let credits = parse_number("credits", credits_field)?;
    let capacity = parse_number("capacity", capacity_field)?;
    Ok(Course::new(*name, credits, capacity)?)
}
