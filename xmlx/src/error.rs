//! Error types for xmlx.

use thiserror::Error;

/// Result type alias for xmlx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading, building or coercing XML values.
#[derive(Error, Debug)]
pub enum Error {
    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// A value could not be converted to the requested type.
    #[error("cannot coerce {value:?} to {target}")]
    Coercion {
        /// Textual form of the offending value.
        value: String,
        /// Name of the requested type.
        target: &'static str,
    },

    /// Element creation with a name that is not a legal XML name.
    #[error("invalid element name: {0:?}")]
    InvalidName(String),

    /// A node cannot be inserted at the requested position.
    #[error("hierarchy request error: {0}")]
    HierarchyRequest(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML error from quick-xml.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}
