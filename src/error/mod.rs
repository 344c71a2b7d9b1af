mod config;
mod enumeration;
mod introspection;
mod io;
mod parser;

pub use config::ConfigError;
pub use enumeration::EnumerationError;
pub use introspection::IntrospectionError;
pub use io::IoError;
pub use parser::ParserError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] IoError),

    #[error(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Enumeration(#[from] EnumerationError),

    #[error(transparent)]
    Introspection(#[from] IntrospectionError),
}

pub type Result<T> = std::result::Result<T, Error>;
