use thiserror::Error;

/// Boxed error a tool handler may surface from any collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Tool name must not be empty")]
    EmptyName,

    #[error("Tool '{tool}' declares parameter '{param}' more than once")]
    DuplicateParameter { tool: String, param: String },
}

/// Failure raised while binding arguments for, or running, a tool handler.
/// The dispatcher reports every variant as a `-32603` execution error.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("arguments must be a JSON object")]
    ArgumentsNotObject,

    #[error("missing required argument '{0}'")]
    MissingArgument(String),

    #[error("argument '{name}' must be {expected}")]
    InvalidArgument { name: String, expected: &'static str },

    #[error("{0}")]
    Validation(String),

    #[error("handler panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Other(#[from] BoxError),
}

impl ToolError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

#[derive(Debug, Error)]
#[error("unsupported parameter type '{type_name}'")]
pub struct SchemaError {
    pub type_name: String,
}
