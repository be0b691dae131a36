//! Error types for the AWS clients

use aws_smithy_runtime_api::client::orchestrator::HttpResponse;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;
use awsops_core::domain::metric::MetricError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when talking to AWS
#[derive(Debug, Error)]
pub enum ClientError {
    /// The client could not be built (no region, no usable credentials)
    #[error("Failed to construct AWS client: {0}")]
    Construction(String),

    /// The service rejected the request or could not be reached
    #[error("AWS API error{}: {message}", status_suffix(.status))]
    Api {
        /// HTTP status code, when a response was received
        status: Option<u16>,
        /// Service error code (e.g. "ClusterNotFoundException")
        code: Option<String>,
        /// Error message with its full source chain
        message: String,
    },

    /// The response was missing data we rely on
    #[error("Unexpected response: {0}")]
    InvalidResponse(String),

    /// The metric payload was rejected before sending
    #[error("Invalid metric: {0}")]
    InvalidMetric(#[from] MetricError),

    /// The metric namespace is empty or reserved
    #[error("Invalid metric namespace: {0}")]
    InvalidNamespace(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status: Some(status),
            code: None,
            message: message.into(),
        }
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Api { status: Some(status), .. } if (400..500).contains(status))
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::Api { status: Some(status), .. } if *status >= 500)
    }

    /// Service error code, if the service returned one
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|status| format!(" (status {})", status))
        .unwrap_or_default()
}

impl<E> From<SdkError<E, HttpResponse>> for ClientError
where
    E: std::error::Error + ProvideErrorMetadata + Send + Sync + 'static,
{
    fn from(err: SdkError<E, HttpResponse>) -> Self {
        let status = err.raw_response().map(|response| response.status().as_u16());
        let code = err.code().map(str::to_string);
        Self::Api {
            status,
            code,
            message: DisplayErrorContext(&err).to_string(),
        }
    }
}
