use crate::model::task::{Task, TaskKind};
use crate::parse::when::to_storage_form;

/// Serialize tasks to the data file text, one record per line.
pub fn serialize_records(tasks: &[Task]) -> String {
    let mut out = String::new();
    for task in tasks {
        out.push_str(&encode_record(task));
        out.push('\n');
    }
    out
}

/// Encode one task in the current schema
pub fn encode_record(task: &Task) -> String {
    let done = if task.done { "1" } else { "0" };
    let mut fields = vec![
        task.kind.tag().to_string(),
        done.to_string(),
        task.description.clone(),
    ];
    match task.kind {
        TaskKind::Todo => {}
        TaskKind::Deadline { due } => fields.push(to_storage_form(&due)),
        TaskKind::Event { start, end } => {
            fields.push(to_storage_form(&start));
            fields.push(to_storage_form(&end));
        }
    }
    fields.join(" | ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_encode_each_kind() {
        let day = NaiveDate::from_ymd_opt(2025, 9, 2).unwrap();
        let mut todo = Task::todo("read book").unwrap();
        todo.done = true;
        let deadline = Task::deadline("report", day.and_hms_opt(18, 0, 0).unwrap()).unwrap();
        let event = Task::event(
            "meeting",
            day.and_hms_opt(14, 0, 0).unwrap(),
            day.and_hms_opt(16, 30, 0).unwrap(),
        )
        .unwrap();

        assert_eq!(encode_record(&todo), "T | 1 | read book");
        assert_eq!(encode_record(&deadline), "D | 0 | report | 2025-09-02 18:00");
        assert_eq!(
            encode_record(&event),
            "E | 0 | meeting | 2025-09-02 14:00 | 2025-09-02 16:30"
        );
    }

    #[test]
    fn test_serialize_records_is_line_terminated() {
        let tasks = vec![Task::todo("a").unwrap(), Task::todo("b").unwrap()];
        assert_eq!(serialize_records(&tasks), "T | 0 | a\nT | 0 | b\n");
        assert_eq!(serialize_records(&[]), "");
    }
}
