use thiserror::Error;

/// Calendar export errors
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Nothing to export: the schedule is empty")]
    EmptySchedule,
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;
