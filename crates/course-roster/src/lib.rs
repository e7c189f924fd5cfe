//! Course and student rosters with enforced enrollment rules.
//!
//! This crate keeps a small in-memory roster of courses and the students
//! enrolled in them, and persists both to line-oriented text files.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Validated user profiles, courses and students
//! - Capacity, duplicate-enrollment and credit-ceiling checks
//! - Paired enrollment that keeps a student's course list and each course
//!   roster in step
//! - Reading and atomically rewriting course and student record files
//! - Record file locations configured through OrthoConfig
//!
//! A student's course list and a course's roster are separate collections.
//! [`Enrollee::add_course`] and [`Course::enroll`] each update one side
//! only; [`enrollment::enroll`] and [`CourseCatalog`] perform both halves as
//! one transaction.
//!
//! # Example
//!
//! ```
//! use course_roster::{CourseRegistry, Enrollee, parse_course_records, parse_student_records};
//!
//! let mut registry = CourseRegistry::from_courses(parse_course_records(
//!     "CSC216,3,2\nMA141,4,30\n",
//! ));
//! let students = parse_student_records(
//!     "Ada,Lovelace,alovela,ada@example.com,hash,18,CSC216,MA141\n\
//!      Alan,Turing,aturing,alan@example.com,hash,18,CSC999\n",
//!     &mut registry,
//! );
//!
//! // The second line names an unknown course and is dropped whole.
//! assert_eq!(students.len(), 1);
//! assert_eq!(students[0].current_credits(), 7);
//! assert_eq!(students[0].courses().len(), 2);
//!
//! let csc216 = registry.find_course("CSC216").expect("course registered");
//! assert_eq!(csc216.enrolled_count(), 1);
//! ```

mod atomic_io;
mod catalog;
mod config;
mod course;
pub mod enrollment;
mod error;
mod records;
mod registry;
mod student;
mod user;

pub use catalog::{CatalogError, CourseCatalog, LoadedCounts};
pub use config::RosterSettings;
pub use course::{Course, CourseName, CourseRef, CourseValidationError};
pub use enrollment::EnrollmentError;
pub use error::RecordIoError;
pub use records::{
    format_course_records, format_student_records, parse_course_records, parse_student_records,
    read_course_records, read_student_records, write_course_records, write_student_records,
};
pub use registry::{CourseRegistry, RegistryError};
pub use student::{Student, StudentValidationError};
pub use user::{
    EmailAddress, Enrollee, PasswordHash, UserId, UserProfile, UserValidationError,
};
