use super::task::Task;

/// The ordered task collection. Order is insertion order and is what the
/// user sees as 1-based task numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        TaskList { tasks: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Task at a 1-based position
    pub fn get(&self, number: usize) -> Option<&Task> {
        number.checked_sub(1).and_then(|i| self.tasks.get(i))
    }

    pub fn get_mut(&mut self, number: usize) -> Option<&mut Task> {
        number.checked_sub(1).and_then(|i| self.tasks.get_mut(i))
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Remove the task at a 1-based position, shifting later tasks down
    pub fn remove(&mut self, number: usize) -> Option<Task> {
        if number == 0 || number > self.tasks.len() {
            return None;
        }
        Some(self.tasks.remove(number - 1))
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Tasks paired with their 1-based numbers
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &Task)> {
        self.tasks.iter().enumerate().map(|(i, t)| (i + 1, t))
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        TaskList { tasks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TaskList {
        TaskList::from(vec![
            Task::todo("one").unwrap(),
            Task::todo("two").unwrap(),
            Task::todo("three").unwrap(),
        ])
    }

    #[test]
    fn test_one_based_addressing() {
        let list = sample();
        assert!(list.get(0).is_none());
        assert_eq!(list.get(1).unwrap().description, "one");
        assert_eq!(list.get(3).unwrap().description, "three");
        assert!(list.get(4).is_none());
    }

    #[test]
    fn test_remove_shifts_later_tasks() {
        let mut list = sample();
        let removed = list.remove(2).unwrap();
        assert_eq!(removed.description, "two");
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(2).unwrap().description, "three");
        assert!(list.remove(0).is_none());
        assert!(list.remove(3).is_none());
    }

    #[test]
    fn test_numbered_pairs() {
        let list = sample();
        let numbers: Vec<usize> = list.numbered().map(|(n, _)| n).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }
}
