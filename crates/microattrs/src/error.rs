use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("undefined attribute `{0}`")]
    UndefinedAttribute(String),

    #[error("wrong number of arguments (given 0, expected 1 or more)")]
    WrongNumberOfArguments,

    #[error("missing attribute(s): {}", .0.join(", "))]
    MissingAttributes(Vec<String>),

    #[error("attributes of `{0}` are frozen")]
    Frozen(String),

    #[error("expected a mapping, found {found}")]
    NotAMapping { found: &'static str },

    #[error("options for attribute `{name}` must be a mapping")]
    InvalidOptions { name: String },

    #[error("unknown feature `{0}`")]
    UnknownFeature(String),

    #[error("schema `{0}` has no initialization feature")]
    NoInitializer(String),

    #[error("cannot compare `{left}` with `{right}`")]
    SchemaMismatch { left: String, right: String },

    #[error("Config error: {0}")]
    Config(#[from] confique::Error),

    #[error("Config error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Describes a JSON value's kind for error messages.
pub(crate) fn kind_of(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
