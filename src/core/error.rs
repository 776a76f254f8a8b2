use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RdsOperation {
    DescribeDbClusters,
    DescribeDbInstances,
}

impl fmt::Display for RdsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdsOperation::DescribeDbClusters => f.write_str("DescribeDBClusters"),
            RdsOperation::DescribeDbInstances => f.write_str("DescribeDBInstances"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to deserialize configuration from {path}: {source}")]
    Deserialize {
        path: PathBuf,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("Invalid configuration value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

#[derive(Error, Debug)]
pub(crate) enum AuthorizationError {
    #[error("Failed to assume role '{role_arn}'")]
    AssumeRole {
        role_arn: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("No credentials in AssumeRole output for role '{role_arn}'")]
    MissingCredentials { role_arn: String },
}

impl AuthorizationError {
    pub(crate) fn role_arn(&self) -> &str {
        match self {
            AuthorizationError::AssumeRole { role_arn, .. } => role_arn,
            AuthorizationError::MissingCredentials { role_arn } => role_arn,
        }
    }
}

#[derive(Error, Debug)]
pub(crate) enum InventoryError {
    #[error("AWS API call {operation} failed")]
    ApiCall {
        operation: RdsOperation,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    #[error("{operation} returned '{resource_id}' without required field '{field}'")]
    MissingField {
        operation: RdsOperation,
        resource_id: String,
        field: &'static str,
    },
}

impl InventoryError {
    pub(crate) fn operation(&self) -> RdsOperation {
        match self {
            InventoryError::ApiCall { operation, .. } => *operation,
            InventoryError::MissingField { operation, .. } => *operation,
        }
    }
}

/// Renders an error with its whole source chain, e.g.
/// `Failed to assume role 'x': dispatch failure: connection refused`.
pub(crate) fn error_report(err: &(dyn std::error::Error + 'static)) -> String {
    anyhow::Chain::new(err)
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join(": ")
}

#[derive(Error, Debug)]
pub(crate) enum DiscoveryError {
    #[error(transparent)]
    Authorization(#[from] AuthorizationError),
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}
