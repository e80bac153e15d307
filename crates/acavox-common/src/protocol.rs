use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Custom deserializer for the `results` field, which the backend emits as
/// `null` for intents that carry no rows.
fn deserialize_nullable_list<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let list: Option<Vec<Value>> = Option::deserialize(deserializer)?;
    Ok(list.unwrap_or_default())
}

/// Body POSTed to the voice endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CommandRequest {
    pub text: String,
}

/// The interpreter's classification of a command, as it appears on the wire
/// inside `parsed.intent`.
///
/// Unrecognized tags map to `Unknown` so that new intents on the backend
/// never break deserialization or rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    CreateStudent,
    DeleteStudent,
    UpdateStudentName,
    ListStudents,
    ShowStudentResult,
    CreateCourse,
    DeleteCourse,
    CountTeachers,
    AssignTeacherToCourse,
    ListCourses,
    ListTeachers,
    ListEnrollmentsForStudent,
    Unknown,
}

impl Intent {
    pub fn from_wire(tag: &str) -> Intent {
        match tag {
            "create_student" => Intent::CreateStudent,
            "delete_student" => Intent::DeleteStudent,
            "update_student_name" => Intent::UpdateStudentName,
            "list_students" => Intent::ListStudents,
            "show_student_result" => Intent::ShowStudentResult,
            "create_course" => Intent::CreateCourse,
            "delete_course" => Intent::DeleteCourse,
            "count_teachers" => Intent::CountTeachers,
            "assign_teacher_to_course" => Intent::AssignTeacherToCourse,
            "list_courses" => Intent::ListCourses,
            "list_teachers" => Intent::ListTeachers,
            "list_enrollments_for_student" => Intent::ListEnrollmentsForStudent,
            _ => Intent::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::CreateStudent => "create_student",
            Intent::DeleteStudent => "delete_student",
            Intent::UpdateStudentName => "update_student_name",
            Intent::ListStudents => "list_students",
            Intent::ShowStudentResult => "show_student_result",
            Intent::CreateCourse => "create_course",
            Intent::DeleteCourse => "delete_course",
            Intent::CountTeachers => "count_teachers",
            Intent::AssignTeacherToCourse => "assign_teacher_to_course",
            Intent::ListCourses => "list_courses",
            Intent::ListTeachers => "list_teachers",
            Intent::ListEnrollmentsForStudent => "list_enrollments_for_student",
            Intent::Unknown => "unknown",
        }
    }
}

/// Tag identifying which entity kind populates `results`. Used purely for
/// rendering dispatch; anything unrecognized falls back to the raw dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsType {
    Students,
    Courses,
    Teachers,
    Enrollments,
}

impl ResultsType {
    pub fn parse(tag: &str) -> Option<ResultsType> {
        match tag {
            "students" => Some(ResultsType::Students),
            "courses" => Some(ResultsType::Courses),
            "teachers" => Some(ResultsType::Teachers),
            "enrollments" => Some(ResultsType::Enrollments),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResultsType::Students => "students",
            ResultsType::Courses => "courses",
            ResultsType::Teachers => "teachers",
            ResultsType::Enrollments => "enrollments",
        }
    }
}

/// The `parsed` object inside a voice response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedCommand {
    pub intent: String,
    #[serde(default)]
    pub slots: serde_json::Map<String, Value>,
}

impl ParsedCommand {
    pub fn intent_tag(&self) -> Intent {
        Intent::from_wire(&self.intent)
    }
}

/// Full response from `POST /voice/command`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandResponse {
    #[serde(default)]
    pub raw_text: Option<String>,
    pub parsed: ParsedCommand,
    #[serde(default)]
    pub info: Option<String>,
    #[serde(default)]
    pub results_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_nullable_list")]
    pub results: Vec<Value>,
}

impl CommandResponse {
    /// The renderable results tag, if the wire value is one we know.
    pub fn results_tag(&self) -> Option<ResultsType> {
        self.results_type.as_deref().and_then(ResultsType::parse)
    }
}
