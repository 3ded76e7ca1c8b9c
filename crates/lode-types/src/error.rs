use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectorError {
    #[error("neither an object id nor an object path was provided")]
    Unspecified,
}
