use thiserror::Error;

/// Result type alias using SentinelError
pub type Result<T> = std::result::Result<T, SentinelError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by the core, the store or the CLI is classified
/// into one of these kinds. Each kind maps to a stable error code that is
/// safe to match on in tests and in downstream tooling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input validation
    UnknownDepartment,
    MalformedInput,
    InvalidDepartmentCode,

    // Ledger policy
    TimestampCollision,
    OutOfOrder,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    StorageWriteFailure,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::UnknownDepartment => "ERR_UNKNOWN_DEPARTMENT",
            ExErrorKind::MalformedInput => "ERR_MALFORMED_INPUT",
            ExErrorKind::InvalidDepartmentCode => "ERR_INVALID_DEPARTMENT_CODE",
            ExErrorKind::TimestampCollision => "ERR_TIMESTAMP_COLLISION",
            ExErrorKind::OutOfOrder => "ERR_OUT_OF_ORDER",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::StorageWriteFailure => "ERR_STORAGE_WRITE_FAILURE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a kind for programmatic handling plus optional context
/// (operation name, entity id) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context (department code, department name, table name)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {:?}", self.code(), self.kind)?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain errors raised while turning raw input into a canonical snapshot
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SentinelError {
    /// Department name is not one of the 18 known departments
    #[error("Unknown department: {name}")]
    UnknownDepartment { name: String },

    /// A present field could not be read as a non-negative integer
    #[error("Malformed input for field '{field}': {value}")]
    MalformedInput { field: String, value: String },

    /// Department code cannot be turned into a safe partition identifier
    #[error("Invalid department code: {code:?}")]
    InvalidDepartmentCode { code: String },

    /// Canonical serialization failed
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl SentinelError {
    pub fn malformed(field: impl Into<String>, value: impl std::fmt::Display) -> Self {
        SentinelError::MalformedInput {
            field: field.into(),
            value: value.to_string(),
        }
    }
}

/// Conversion from SentinelError to the canonical ExError
impl From<SentinelError> for ExError {
    fn from(err: SentinelError) -> Self {
        match err {
            SentinelError::UnknownDepartment { name } => {
                ExError::new(ExErrorKind::UnknownDepartment)
                    .with_entity_id(name)
                    .with_op("normalize")
                    .with_message("Department name is not in the department table")
            }
            SentinelError::MalformedInput { field, value } => {
                ExError::new(ExErrorKind::MalformedInput)
                    .with_entity_id(field.clone())
                    .with_op("normalize")
                    .with_message(format!(
                        "Field '{}' is not a non-negative integer: {}",
                        field, value
                    ))
            }
            SentinelError::InvalidDepartmentCode { code } => {
                ExError::new(ExErrorKind::InvalidDepartmentCode)
                    .with_entity_id(code)
                    .with_message("Department code has no alphanumeric characters")
            }
            SentinelError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to SentinelError
impl From<serde_json::Error> for SentinelError {
    fn from(err: serde_json::Error) -> Self {
        SentinelError::Serialization {
            message: err.to_string(),
        }
    }
}
