use crate::specification::Placement;
use thiserror::Error;

/// Result type for documentation operations
pub type SwagResult<T> = Result<T, SwagError>;

/// Errors raised while declaring routes or assembling the document.
///
/// Declaration errors are returned from the registration call that caused them.
/// Assembly errors are produced once, cached, and served by both documentation
/// endpoints.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwagError {
    /// A non-body parameter whose type cannot be expressed in its placement
    #[error("invalid {0} param")]
    InvalidParam(Placement),

    /// A body parameter whose type cannot be described as a schema
    #[error("invalid body parameter")]
    InvalidBody,

    /// A second body parameter on the same route
    #[error("multiple body parameters are not allowed")]
    MultipleBody,

    /// A response schema whose type cannot be described as a schema
    #[error("invalid response schema")]
    InvalidResponseSchema,

    /// A response header type that is not a flat struct
    #[error("invalid response header")]
    InvalidResponseHeader,

    /// A group registered without a name
    #[error("invalid name of ApiGroup")]
    InvalidGroupName,

    /// A transfer protocol other than http, https, ws or wss
    #[error("invalid protocol scheme: {0}")]
    InvalidScheme(String),

    /// An HTTP method that has no slot in a Swagger path item
    #[error("unsupported method: {0}")]
    UnsupportedMethod(String),

    /// A route or group references a security scheme that was never registered
    #[error("not found SecurityDefinition with name: {0}")]
    UnknownSecurity(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization error
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Generic error with context
    #[error("swagdoc error: {0}")]
    Generic(String),
}

impl SwagError {
    /// Create an invalid parameter error for a placement
    pub fn invalid_param(placement: Placement) -> Self {
        Self::InvalidParam(placement)
    }

    /// Create an unknown security scheme error
    pub fn unknown_security<T: ToString>(name: T) -> Self {
        Self::UnknownSecurity(name.to_string())
    }

    /// Create an invalid scheme error
    pub fn invalid_scheme<T: ToString>(scheme: T) -> Self {
        Self::InvalidScheme(scheme.to_string())
    }

    /// Create a generic error
    pub fn generic<T: ToString>(msg: T) -> Self {
        Self::Generic(msg.to_string())
    }
}

impl From<serde_json::Error> for SwagError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for SwagError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}
