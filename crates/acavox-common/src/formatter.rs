//! Result-shape renderer: pure mapping from a voice response to display text.

use crate::intent::matcher::EXAMPLE_COMMANDS;
use crate::protocol::{CommandResponse, Intent, ResultsType};
use serde_json::Value;

struct Column {
    header: &'static str,
    field: &'static str,
}

const STUDENT_COLUMNS: &[Column] = &[
    Column { header: "ID", field: "id" },
    Column { header: "Name", field: "name" },
    Column { header: "Department", field: "department" },
    Column { header: "GPA", field: "gpa" },
];

const COURSE_COLUMNS: &[Column] = &[
    Column { header: "ID", field: "id" },
    Column { header: "Code", field: "code" },
    Column { header: "Title", field: "title" },
    Column { header: "Credits", field: "credit_hours" },
    Column { header: "Department", field: "department" },
    Column { header: "Teacher", field: "teacher_id" },
];

const TEACHER_COLUMNS: &[Column] = &[
    Column { header: "ID", field: "id" },
    Column { header: "Name", field: "name" },
    Column { header: "Department", field: "department" },
    Column { header: "Email", field: "email" },
    Column { header: "Expertise", field: "expertise" },
];

const ENROLLMENT_COLUMNS: &[Column] = &[
    Column { header: "ID", field: "id" },
    Column { header: "Student", field: "student_name" },
    Column { header: "Course", field: "course_code" },
    Column { header: "Title", field: "course_title" },
    Column { header: "Semester", field: "semester" },
    Column { header: "Status", field: "status" },
    Column { header: "Grade", field: "grade" },
];

fn columns_for(tag: ResultsType) -> &'static [Column] {
    match tag {
        ResultsType::Students => STUDENT_COLUMNS,
        ResultsType::Courses => COURSE_COLUMNS,
        ResultsType::Teachers => TEACHER_COLUMNS,
        ResultsType::Enrollments => ENROLLMENT_COLUMNS,
    }
}

/// Defensive field access: anything missing or null renders as "-".
fn cell_text(row: &Value, field: &str) -> String {
    match row.get(field) {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    }
}

pub fn format_response(resp: &CommandResponse) -> String {
    if resp.parsed.intent_tag() == Intent::Unknown {
        return format_guidance(resp.info.as_deref());
    }

    if resp.results.is_empty() {
        let mut output = String::new();
        if let Some(info) = &resp.info {
            output.push_str(info);
            output.push('\n');
        }
        output.push_str("No records found.");
        return output;
    }

    match resp.results_tag() {
        Some(tag) => format_table(columns_for(tag), &resp.results, resp.info.as_deref()),
        // unrecognized or absent tag: structured dump, never a crash
        None => format_raw(&resp.results, resp.info.as_deref()),
    }
}

fn format_guidance(info: Option<&str>) -> String {
    let mut output = String::new();
    output.push_str(info.unwrap_or("I couldn't understand this command."));
    output.push_str("\n\nTry one of:");
    for example in EXAMPLE_COMMANDS {
        output.push_str(&format!("\n  {example}"));
    }
    output
}

fn format_table(columns: &[Column], rows: &[Value], info: Option<&str>) -> String {
    let mut widths: Vec<usize> = columns.iter().map(|c| c.header.len()).collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|c| cell_text(row, c.field)).collect())
        .collect();
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut output = String::new();
    if let Some(info) = info {
        output.push_str(info);
        output.push_str("\n\n");
    }
    let last = columns.len().saturating_sub(1);
    for (i, column) in columns.iter().enumerate() {
        if i > 0 {
            output.push_str("  ");
        }
        if i < last {
            output.push_str(&format!("{:<width$}", column.header, width = widths[i]));
        } else {
            output.push_str(column.header);
        }
    }
    output.push('\n');
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                output.push_str("  ");
            }
            if i < last {
                output.push_str(&format!("{:<width$}", cell, width = widths[i]));
            } else {
                output.push_str(cell);
            }
        }
        output.push('\n');
    }
    let noun = if rows.len() == 1 { "row" } else { "rows" };
    output.push_str(&format!("({} {})", rows.len(), noun));
    output
}

fn format_raw(rows: &[Value], info: Option<&str>) -> String {
    let mut output = String::new();
    if let Some(info) = info {
        output.push_str(info);
        output.push('\n');
    }
    for row in rows {
        let dump = serde_json::to_string_pretty(row).unwrap_or_else(|_| row.to_string());
        output.push_str(&dump);
        output.push('\n');
    }
    output.trim_end().to_string()
}
