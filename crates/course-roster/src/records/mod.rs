//! Line-oriented record files.
//!
//! One record per line, fields separated by `,` with no escaping. Course
//! lines read `name,credits,capacity`; student lines read
//! `first,last,id,email,password,max_credits` followed by one field per
//! enrolled course name.
//!
//! Malformed lines never fail a load. A bad course line is skipped; a bad
//! student line is rejected whole. Both are logged at debug level with the
//! 1-based line number and the reason. Only a missing or unreadable file, or
//! an unwritable destination, is returned as a [`RecordIoError`].

mod course_records;
mod student_records;

use std::io;
use std::path::Path;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs::Dir};
use thiserror::Error;
use tracing::{debug, info};

use crate::atomic_io::write_atomic;
use crate::course::CourseValidationError;
use crate::enrollment::EnrollmentError;
use crate::error::RecordIoError;
use crate::student::StudentValidationError;

pub use course_records::{
    format_course_records, parse_course_records, read_course_records, write_course_records,
};
pub use student_records::{
    format_student_records, parse_student_records, read_student_records, write_student_records,
};
pub(crate) use student_records::load_student_text;

/// Why a single record line was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum RecordParseError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("expected at least {minimum} fields, found {found}")]
    TooFewFields { minimum: usize, found: usize },
    #[error("{field} '{value}' is not a non-negative integer")]
    NotAnInteger { field: &'static str, value: String },
    #[error(transparent)]
    Course(#[from] CourseValidationError),
    #[error(transparent)]
    Student(#[from] StudentValidationError),
    #[error(transparent)]
    Enrollment(#[from] EnrollmentError),
}

/// Split a record line into fields, ignoring a single trailing separator.
fn split_fields(line: &str) -> Vec<&str> {
    let mut fields: Vec<&str> = line.split(',').collect();
    if fields.len() > 1 && fields.last().is_some_and(|last| last.is_empty()) {
        fields.pop();
    }
    fields
}

fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<T, RecordParseError> {
    value.parse().map_err(|_| RecordParseError::NotAnInteger {
        field,
        value: value.to_owned(),
    })
}

/// Run `parse` over every line of `text`, keeping the records that parse.
///
/// Returns the kept records and the number of dropped lines.
fn parse_lines<T>(
    text: &str,
    mut parse: impl FnMut(&str) -> Result<T, RecordParseError>,
) -> (Vec<T>, usize) {
    let mut records = Vec::new();
    let mut skipped = 0_usize;
    for (index, line) in text.lines().enumerate() {
        match parse(line) {
            Ok(record) => records.push(record),
            Err(err) => {
                skipped += 1;
                debug!(line = index + 1, reason = %err, "skipping record line");
            }
        }
    }
    (records, skipped)
}

/// Render one line per record, each newline-terminated.
fn format_lines<T: std::fmt::Display>(records: &[T]) -> String {
    records.iter().map(|record| format!("{record}\n")).collect()
}

pub(crate) fn read_record_file(path: &Path) -> Result<String, RecordIoError> {
    let read_error = |err: io::Error| RecordIoError::Read {
        path: path.to_path_buf(),
        message: err.to_string(),
    };
    let file_name = path.file_name().ok_or_else(|| {
        read_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "record path must name a file",
        ))
    })?;
    let dir = Dir::open_ambient_dir(parent_of(path), ambient_authority())
        .map_err(|err| not_found_or(path, err, read_error))?;
    let payload = dir
        .read(Path::new(file_name))
        .map_err(|err| not_found_or(path, err, read_error))?;
    String::from_utf8(payload).map_err(|err| RecordIoError::Read {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn write_record_file(path: &Path, contents: &str, records: usize) -> Result<(), RecordIoError> {
    let write_error = |err: io::Error| RecordIoError::Write {
        path: path.to_path_buf(),
        message: err.to_string(),
    };
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            write_error(io::Error::new(
                io::ErrorKind::InvalidInput,
                "record path must name a UTF-8 file",
            ))
        })?;
    let dir = Dir::open_ambient_dir(parent_of(path), ambient_authority()).map_err(write_error)?;
    write_atomic(&dir, Utf8Path::new(file_name), contents).map_err(write_error)?;
    info!(path = %path.display(), records, "wrote record file");
    Ok(())
}

fn parent_of(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn not_found_or(
    path: &Path,
    err: io::Error,
    other: impl FnOnce(io::Error) -> RecordIoError,
) -> RecordIoError {
    if err.kind() == io::ErrorKind::NotFound {
        RecordIoError::NotFound {
            path: path.to_path_buf(),
        }
    } else {
        other(err)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("CSC216,3,10", &["CSC216", "3", "10"])]
    #[case("CSC216,3,10,", &["CSC216", "3", "10"])]
    #[case("CSC216,,10", &["CSC216", "", "10"])]
    #[case("", &[""])]
    #[case(",", &[""])]
    fn split_fields_drops_one_trailing_separator(#[case] line: &str, #[case] expected: &[&str]) {
        assert_eq!(split_fields(line), expected);
    }

    #[rstest]
    #[case("3")]
    #[case("18")]
    fn parse_number_accepts_digits(#[case] value: &str) {
        assert!(parse_number::<u32>("credits", value).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("three")]
    #[case("-1")]
    #[case(" 3")]
    fn parse_number_rejects_other_text(#[case] value: &str) {
        assert_eq!(
            parse_number::<u32>("credits", value),
            Err(RecordParseError::NotAnInteger {
                field: "credits",
                value: value.to_owned()
            })
        );
    }

    #[test]
    fn parse_lines_counts_dropped_lines() {
        let (kept, skipped) = parse_lines("1\nx\n2\n\n", |line| parse_number::<u32>("n", line));
        assert_eq!(kept, [1, 2]);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn format_lines_terminates_every_record() {
        assert_eq!(format_lines(&[1, 2, 3]), "1\n2\n3\n");
        assert_eq!(format_lines::<u32>(&[]), "");
    }

    #[rstest]
    #[case("courses.txt", ".")]
    #[case("data/courses.txt", "data")]
    #[case("/tmp/courses.txt", "/tmp")]
    fn parent_of_defaults_to_current_dir(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(parent_of(Path::new(path)), Path::new(expected));
    }
}
