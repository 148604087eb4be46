use crate::model::task::TaskError;
use crate::parse::when::WhenError;

/// Everything that can reject a single command line. None of these end the
/// session: the line is dropped, the message is reported, and the next line
/// is read.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("The description of a {0} cannot be empty.")]
    EmptyDescription(&'static str),
    #[error("Invalid format. Use: {0}")]
    InvalidFormat(&'static str),
    #[error("Task number {index} is invalid. You have {len} tasks in the list.")]
    InvalidIndex { index: usize, len: usize },
    #[error("I'm sorry, but I don't know what \"{0}\" means.")]
    UnknownCommand(String),
    #[error(transparent)]
    Temporal(#[from] WhenError),
    #[error(transparent)]
    Task(#[from] TaskError),
}

/// Why one line of a session did not fully succeed
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Command(#[from] CommandError),
    /// The command ran but its result could not be saved
    #[error(transparent)]
    Persistence(#[from] crate::io::storage::StorageError),
}
