//! Record file locations loaded via OrthoConfig.
//!
//! Values come from `--course-file`/`--student-file`, the
//! `COURSE_ROSTER_COURSE_FILE`/`COURSE_ROSTER_STUDENT_FILE` environment
//! variables, or a `.course_roster.toml` file, in OrthoConfig's usual
//! precedence.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_COURSE_FILE: &str = "courses.txt";
const DEFAULT_STUDENT_FILE: &str = "students.txt";

/// Where the catalog reads and writes its record files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COURSE_ROSTER")]
pub struct RosterSettings {
    /// Optional course record file override.
    pub course_file: Option<PathBuf>,
    /// Optional student record file override.
    pub student_file: Option<PathBuf>,
}

impl RosterSettings {
    /// Return the configured course file, falling back to `courses.txt`.
    #[must_use]
    pub fn course_file(&self) -> PathBuf {
        self.course_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_COURSE_FILE))
    }

    /// Return the configured student file, falling back to `students.txt`.
    #[must_use]
    pub fn student_file(&self) -> PathBuf {
        self.student_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STUDENT_FILE))
    }
}
