//! Common error types.

use std::fmt;
use std::path::Path;

pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error that occurs within the crate.
#[derive(Debug, Clone)]
pub enum Error {
    SourceOpen(String, String),
    RecordRead(String),
    ConfigOpen(String, String),
    ConfigDeser(String, String),
    EmptyQuote(usize),
    UnknownStyle(String),
    Cairo(String),
    ImageOpen(String, String),
    OutputWrite(String, String),
    WriteBack(usize, String),
    PredicateSyntax(String),
    NoEnvVariable(&'static str),
    SendError(usize, String),
    MutexLock(&'static str, String),
    ThreadJoin(usize),
}

impl Error {
    pub fn source_open(path: &Path, e: impl fmt::Display) -> Self {
        Self::SourceOpen(path.display().to_string(), e.to_string())
    }

    pub fn record_read(e: impl fmt::Display) -> Self {
        Self::RecordRead(e.to_string())
    }

    pub fn config_open(path: &Path, e: impl fmt::Display) -> Self {
        Self::ConfigOpen(path.display().to_string(), e.to_string())
    }

    pub fn config_deser(path: &Path, e: impl fmt::Display) -> Self {
        Self::ConfigDeser(path.display().to_string(), e.to_string())
    }

    pub fn empty_quote(row: usize) -> Self {
        Self::EmptyQuote(row)
    }

    pub fn unknown_style(name: impl Into<String>) -> Self {
        Self::UnknownStyle(name.into())
    }

    pub fn cairo(e: impl fmt::Display) -> Self {
        Self::Cairo(e.to_string())
    }

    pub fn image_open(path: &Path, e: impl fmt::Display) -> Self {
        Self::ImageOpen(path.display().to_string(), e.to_string())
    }

    pub fn output_write(path: &Path, e: impl fmt::Display) -> Self {
        Self::OutputWrite(path.display().to_string(), e.to_string())
    }

    pub fn write_back(row: usize, e: impl fmt::Display) -> Self {
        Self::WriteBack(row, e.to_string())
    }

    pub fn predicate_syntax(e: impl fmt::Display) -> Self {
        Self::PredicateSyntax(e.to_string())
    }

    pub fn no_env_variable(var: &'static str) -> Self {
        Self::NoEnvVariable(var)
    }

    pub fn send(id: usize, e: impl fmt::Display) -> Self {
        Self::SendError(id, e.to_string())
    }

    pub fn mutex_lock(target: &'static str, e: impl fmt::Display) -> Self {
        Self::MutexLock(target, e.to_string())
    }

    pub fn thread_join(id: usize) -> Self {
        Self::ThreadJoin(id)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SourceOpen(path, e) => write!(f, "failed to open data source `{path}`: {e}"),
            Error::RecordRead(e) => write!(f, "failed to read record: {e}"),
            Error::ConfigOpen(path, e) => write!(f, "failed to open template `{path}`: {e}"),
            Error::ConfigDeser(path, e) => write!(f, "failed to parse template `{path}`: {e}"),
            Error::EmptyQuote(row) => write!(f, "row {row}: quote text is empty"),
            Error::UnknownStyle(name) => write!(f, "unknown style `{name}`"),
            Error::Cairo(e) => write!(f, "rendering error: {e}"),
            Error::ImageOpen(path, e) => write!(f, "failed to open image `{path}`: {e}"),
            Error::OutputWrite(path, e) => write!(f, "failed to write `{path}`: {e}"),
            Error::WriteBack(row, e) => write!(f, "failed to write back status for row {row}: {e}"),
            Error::PredicateSyntax(e) => write!(f, "invalid filter: {e}"),
            Error::NoEnvVariable(var) => write!(f, "missing environment variable: {var}"),
            Error::SendError(id, e) => write!(f, "worker {id}: failed to send log event: {e}"),
            Error::MutexLock(target, e) => write!(f, "failed to lock {target}: {e}"),
            Error::ThreadJoin(id) => write!(f, "failed to join worker thread {id}"),
        }
    }
}

impl std::error::Error for Error {}
