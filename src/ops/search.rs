use chrono::NaiveDate;
use regex::RegexBuilder;

use crate::model::task::Task;
use crate::model::task_list::TaskList;

/// Tasks whose description contains `keyword`, ignoring case, paired with
/// their 1-based numbers in list order.
pub fn find_tasks<'a>(tasks: &'a TaskList, keyword: &str) -> Vec<(usize, &'a Task)> {
    let keyword = keyword.trim();
    if keyword.is_empty() {
        return Vec::new();
    }
    let Ok(re) = RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
    else {
        return Vec::new();
    };
    tasks
        .numbered()
        .filter(|(_, task)| re.is_match(&task.description))
        .collect()
}

/// Deadlines due on `date` and events spanning it, with their 1-based numbers.
pub fn tasks_on(tasks: &TaskList, date: NaiveDate) -> Vec<(usize, &Task)> {
    tasks
        .numbered()
        .filter(|(_, task)| task.occurs_on(date))
        .collect()
}
