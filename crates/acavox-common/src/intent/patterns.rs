//! Ordered rule table for the command interpreter.
//!
//! All matching runs on lowercased, normalized text (the matcher's
//! `normalize` step). The first pattern that matches wins, so more specific
//! phrasings must come before catch-all ones.

use crate::protocol::Intent;
use regex::{Captures, Regex};
use serde_json::{Map, Value};

/// Extracted slot values, keyed by slot name. Numeric slots are JSON numbers,
/// absent-but-declared slots are JSON null.
pub type Slots = Map<String, Value>;

pub struct IntentPattern {
    pub intent: Intent,
    pub regex: Regex,
    pub extract: fn(&Captures) -> Slots,
}

fn pattern(intent: Intent, re: &str, extract: fn(&Captures) -> Slots) -> IntentPattern {
    IntentPattern {
        intent,
        // patterns are hand-written literals; a failure here is a bug in this table
        regex: Regex::new(re).expect("intent pattern compiles"),
        extract,
    }
}

fn no_slots(_caps: &Captures) -> Slots {
    Slots::new()
}

fn text_slot(caps: &Captures, name: &str) -> Option<Value> {
    caps.name(name)
        .map(|m| Value::String(m.as_str().trim().to_string()))
}

fn number_slot(caps: &Captures, name: &str) -> Option<Value> {
    caps.name(name)
        .and_then(|m| m.as_str().parse::<i64>().ok())
        .map(Value::from)
}

/// Build the rule table. Order is significant.
pub fn pattern_table() -> Vec<IntentPattern> {
    vec![
        // ---------- student CRUD & queries ----------
        pattern(
            Intent::CreateStudent,
            r"^(?:add|create|register)\s+student\s+(?P<name>[a-z][a-z\s]+?)(?:\s+roll\s*(?P<roll>\d+))?$",
            |caps| {
                let mut slots = Slots::new();
                if let Some(name) = text_slot(caps, "name") {
                    slots.insert("name".into(), name);
                }
                slots.insert("roll".into(), number_slot(caps, "roll").unwrap_or(Value::Null));
                slots
            },
        ),
        pattern(
            Intent::DeleteStudent,
            r"^(?:delete|remove)\s+student\s+(?P<student_id>\d+)$",
            |caps| {
                let mut slots = Slots::new();
                if let Some(id) = number_slot(caps, "student_id") {
                    slots.insert("student_id".into(), id);
                }
                slots
            },
        ),
        pattern(
            Intent::UpdateStudentName,
            r"^update\s+student\s+(?P<student_id>\d+)\s+name\s+to\s+(?P<name>[a-z][a-z\s]+)$",
            |caps| {
                let mut slots = Slots::new();
                if let Some(id) = number_slot(caps, "student_id") {
                    slots.insert("student_id".into(), id);
                }
                if let Some(name) = text_slot(caps, "name") {
                    slots.insert("name".into(), name);
                }
                slots
            },
        ),
        // "list students in course cs101" / "display all students"
        pattern(
            Intent::ListStudents,
            r"^(?:list|show|display)\s+(?:all\s+)?students(?:\s+in\s+course\s+(?P<course>[a-z0-9\-]+))?$",
            |caps| {
                let mut slots = Slots::new();
                if let Some(course) = text_slot(caps, "course") {
                    slots.insert("course".into(), course);
                }
                slots
            },
        ),
        // ---------- student results ----------
        // "show result of student 125" / "get marks of roll 77"
        pattern(
            Intent::ShowStudentResult,
            r"^(?:show|get|display).*(?:result|marks).*(?:student|roll)\s*(?P<student_id>\d+)$",
            |caps| {
                let mut slots = Slots::new();
                if let Some(id) = number_slot(caps, "student_id") {
                    slots.insert("student_id".into(), id);
                }
                slots
            },
        ),
        // ---------- course CRUD & queries ----------
        pattern(
            Intent::CreateCourse,
            r"^(?:add|create)\s+course\s+(?P<title>[a-z][a-z0-9\s\-]+)$",
            |caps| {
                let mut slots = Slots::new();
                if let Some(title) = text_slot(caps, "title") {
                    slots.insert("title".into(), title);
                }
                slots
            },
        ),
        pattern(
            Intent::DeleteCourse,
            r"^(?:delete|remove)\s+course\s+(?P<course_code>[a-z0-9\-]+)$",
            |caps| {
                let mut slots = Slots::new();
                if let Some(code) = text_slot(caps, "course_code") {
                    slots.insert("course_code".into(), code);
                }
                slots
            },
        ),
        // ---------- teachers & assignments ----------
        pattern(
            Intent::CountTeachers,
            r"^(?:how\s+many|count)\s+teachers$",
            no_slots,
        ),
        pattern(
            Intent::AssignTeacherToCourse,
            r"^(?:assign|set)\s+teacher\s+(?P<teacher>[a-z][a-z\s]+)\s+to\s+course\s+(?P<course>[a-z0-9\-\s]+)$",
            |caps| {
                let mut slots = Slots::new();
                if let Some(teacher) = text_slot(caps, "teacher") {
                    slots.insert("teacher".into(), teacher);
                }
                if let Some(course) = text_slot(caps, "course") {
                    slots.insert("course".into(), course);
                }
                slots
            },
        ),
        // ---------- list intents ----------
        // "list students" / "get students list"
        pattern(
            Intent::ListStudents,
            r"^(?:list|show|get)\s+(?:all\s+)?students(?:\s+list)?$",
            no_slots,
        ),
        pattern(
            Intent::ListCourses,
            r"^(?:list|show|get)\s+(?:all\s+)?courses(?:\s+list)?$",
            no_slots,
        ),
        // "list courses in department cs" -- department normalized to upper case
        pattern(
            Intent::ListCourses,
            r"^(?:list|show|get)\s+courses\s+in\s+(?:department\s+)?(?P<department>[a-z0-9\-]+)$",
            |caps| {
                let mut slots = Slots::new();
                if let Some(m) = caps.name("department") {
                    slots.insert(
                        "department".into(),
                        Value::String(m.as_str().to_uppercase()),
                    );
                }
                slots
            },
        ),
        pattern(
            Intent::ListCourses,
            r"^(?:list|show|get)\s+courses\s+(?:for|by)\s+teacher\s+(?P<teacher_id>\d+)$",
            |caps| {
                let mut slots = Slots::new();
                if let Some(id) = number_slot(caps, "teacher_id") {
                    slots.insert("teacher_id".into(), id);
                }
                slots
            },
        ),
        pattern(
            Intent::ListTeachers,
            r"^(?:list|show|get)\s+(?:all\s+)?teachers(?:\s+list)?$",
            no_slots,
        ),
        // "show enrollments for student 3" / "list courses of student 3"
        pattern(
            Intent::ListEnrollmentsForStudent,
            r"^(?:list|show|get)\s+(?:enrol?lments?|courses)\s+(?:for|of)\s+student\s+(?P<student_id>\d+)$",
            |caps| {
                let mut slots = Slots::new();
                if let Some(id) = number_slot(caps, "student_id") {
                    slots.insert("student_id".into(), id);
                }
                slots
            },
        ),
    ]
}
