use std::io;
use std::sync::Arc;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("yed: writer is closed")]
    Closed,

    #[error("yed: write failed: {0}")]
    Sink(#[source] Arc<io::Error>),

    #[error("syntax error in flowchart: {0}")]
    Syntax(String),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Sink(Arc::new(err))
    }
}

impl Error {
    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Closed)
    }
}
