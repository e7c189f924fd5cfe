//! Behavioural tests for course enrollment.
//!
//! These tests run Gherkin scenarios covering capacity and duplicate checks,
//! credit ceilings, edits made after enrolling, and student record loading
//! against a course registry.

// `expect` is idiomatic in test code for failing fast on precondition violations.
#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use course_roster::{
    Course, CourseRegistry, EnrollmentError, Enrollee, RegistryError, Student, enrollment,
    parse_student_records,
};
use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::{ScenarioState, given, scenario, then, when};

/// Test world holding the registry, the students and the last outcome.
#[derive(Default, ScenarioState)]
struct World {
    registry: Slot<CourseRegistry>,
    students: Slot<Vec<Student>>,
    outcome: Slot<Result<(), EnrollmentError>>,
    course_change: Slot<Result<(), RegistryError>>,
    loaded: Slot<Vec<Student>>,
}

impl World {
    /// Runs `action` with the registry and the named student borrowed mutably.
    fn with_student<R>(
        &self,
        id: &str,
        action: impl FnOnce(&mut CourseRegistry, &mut Student) -> R,
    ) -> R {
        self.registry
            .with_mut(|registry| {
                self.students.with_mut(|students| {
                    let student = students
                        .iter_mut()
                        .find(|student| student.profile().id().as_str() == id)
                        .expect("student should exist");
                    action(registry, student)
                })
            })
            .flatten()
            .expect("registry and students should be set")
    }

    /// Extracts the last enrollment outcome from the world state.
    fn outcome(&self) -> Result<(), EnrollmentError> {
        self.outcome.get().expect("an enrollment should have run")
    }

    /// Looks up a course and reads a value from it.
    fn course<R>(&self, name: &str, read: impl FnOnce(&Course) -> R) -> R {
        self.registry
            .with_ref(|registry| read(registry.find_course(name).expect("course registered")))
            .expect("registry should be set")
    }
}

fn student(id: &str) -> Student {
    Student::try_from_strings(id, "Student", id, format!("{id}@example.edu"), "hash")
        .expect("valid student")
}

#[fixture]
fn world() -> World {
    World::default()
}

// ============================================================================
// Given steps
// ============================================================================

#[given("a course {name} with {credits:u32} credits and {capacity:usize} seats")]
fn a_course(world: &World, name: String, credits: u32, capacity: usize) {
    let course = Course::new(name, credits, capacity).expect("valid course");
    let inserted = world
        .registry
        .get_or_insert_with(CourseRegistry::new)
        .insert(course);
    assert!(inserted, "course names in a scenario should be unique");
}

#[given("students {first}, {second} and {third}")]
fn students(world: &World, first: String, second: String, third: String) {
    world
        .students
        .set(vec![student(&first), student(&second), student(&third)]);
}

#[given("{id} may carry at most {max:u32} credits")]
fn may_carry_at_most(world: &World, id: String, max: u32) {
    world.with_student(&id, |_, student| {
        student.set_max_credits(max).expect("valid credit ceiling");
    });
}

// ============================================================================
// When steps
// ============================================================================

#[when("{id} enrolls in {course}")]
fn enrolls_in(world: &World, id: String, course: String) {
    let outcome = world.with_student(&id, |registry, student| {
        enrollment::enroll(registry, student, &course)
    });
    world.outcome.set(outcome);
}

#[when("{id} withdraws from {course}")]
fn withdraws_from(world: &World, id: String, course: String) {
    let outcome = world.with_student(&id, |registry, student| {
        enrollment::withdraw(registry, student, &course)
    });
    world.outcome.set(outcome);
}

#[when("{id} changes their email to {email}")]
fn changes_email(world: &World, id: String, email: String) {
    world.with_student(&id, |_, student| {
        student
            .profile_mut()
            .set_email(email)
            .expect("valid email");
    });
}

#[when("{course} is changed to {credits:u32} credits")]
fn course_credits_change(world: &World, course: String, credits: u32) {
    let outcome = world
        .registry
        .with_mut(|registry| registry.set_course_credits(&course, credits))
        .expect("registry should be set");
    world.course_change.set(outcome);
}

#[when("{course} is renamed to {name}")]
fn course_is_renamed(world: &World, course: String, name: String) {
    let outcome = world
        .registry
        .with_mut(|registry| registry.rename_course(&course, &name))
        .expect("registry should be set");
    world.course_change.set(outcome);
}

#[when("the student records are loaded:")]
fn the_student_records_are_loaded(world: &World, docstring: String) {
    let loaded = world
        .registry
        .with_mut(|registry| parse_student_records(&docstring, registry))
        .expect("registry should be set");
    world.loaded.set(loaded);
}

// ============================================================================
// Then steps
// ============================================================================

#[then("the enrollment succeeds")]
fn the_enrollment_succeeds(world: &World) {
    let outcome = world.outcome();
    assert!(outcome.is_ok(), "Expected success, got: {outcome:?}");
}

#[then("the enrollment is refused as already enrolled")]
fn refused_as_already_enrolled(world: &World) {
    match world.outcome() {
        Err(EnrollmentError::AlreadyEnrolled { .. }) => {}
        other => panic!("Expected AlreadyEnrolled, got: {other:?}"),
    }
}

#[then("the enrollment is refused as full")]
fn refused_as_full(world: &World) {
    match world.outcome() {
        Err(EnrollmentError::CourseFull { .. }) => {}
        other => panic!("Expected CourseFull, got: {other:?}"),
    }
}

#[then("the enrollment is refused by the credit limit")]
fn refused_by_credit_limit(world: &World) {
    match world.outcome() {
        Err(EnrollmentError::CreditLimitExceeded { .. }) => {}
        other => panic!("Expected CreditLimitExceeded, got: {other:?}"),
    }
}

#[then("the course change succeeds")]
fn the_course_change_succeeds(world: &World) {
    let outcome = world.course_change.get().expect("a course change should have run");
    assert!(outcome.is_ok(), "Expected success, got: {outcome:?}");
}

#[then("the course change is refused")]
fn the_course_change_is_refused(world: &World) {
    let outcome = world.course_change.get().expect("a course change should have run");
    assert!(outcome.is_err(), "Expected a refusal, got: {outcome:?}");
}

#[then("{course} has {count:usize} enrolled")]
fn course_has_enrolled(world: &World, course: String, count: usize) {
    assert_eq!(world.course(&course, Course::enrolled_count), count);
}

#[then("{id} cannot add {course}")]
fn cannot_add(world: &World, id: String, course: String) {
    let allowed = world.with_student(&id, |registry, student| {
        student.can_add_course(registry.find_course(&course).expect("course registered"))
    });
    assert!(!allowed, "{id} should not be able to add {course}");
}

#[then("{id} can add {course}")]
fn can_add(world: &World, id: String, course: String) {
    let allowed = world.with_student(&id, |registry, student| {
        student.can_add_course(registry.find_course(&course).expect("course registered"))
    });
    assert!(allowed, "{id} should be able to add {course}");
}

#[then("{id} carries {credits:u32} credits")]
fn carries_credits(world: &World, id: String, credits: u32) {
    let current = world.with_student(&id, |_, student| student.current_credits());
    assert_eq!(current, credits);
}

#[then("{count:usize} students are loaded")]
fn students_are_loaded(world: &World, count: usize) {
    let loaded = world.loaded.get().expect("student records should be loaded");
    assert_eq!(loaded.len(), count);
}

// ============================================================================
// Scenario bindings
// ============================================================================

#[scenario(
    path = "tests/features/enrollment.feature",
    name = "Capacity and duplicate checks on a small course"
)]
fn capacity_and_duplicate_checks(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/enrollment.feature",
    name = "A small credit ceiling limits further courses"
)]
fn small_credit_ceiling(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/enrollment.feature",
    name = "A student line naming an unknown course is dropped"
)]
fn unknown_course_line_is_dropped(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/enrollment.feature",
    name = "A rejected student line leaves no roster entries behind"
)]
fn rejected_line_leaves_no_roster_entries(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/enrollment.feature",
    name = "Editing a student's profile keeps withdrawal two-sided"
)]
fn profile_edit_keeps_withdrawal_two_sided(world: World) {
    drop(world);
}

#[scenario(
    path = "tests/features/enrollment.feature",
    name = "An enrolled course keeps its credits and name"
)]
fn enrolled_course_keeps_credits_and_name(world: World) {
    drop(world);
}
