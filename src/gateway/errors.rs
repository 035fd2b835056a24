/// Errors from the instance gateway layer.
use thiserror::Error;

/// A provider failure reduced to the parts classification needs.
///
/// Produced from raw SDK errors by the EC2 gateway (and directly by the
/// in-memory gateway in tests), then mapped onto [`InstanceError`] by
/// [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSignal {
    /// The SDK gave up waiting for a response.
    TimedOut(String),
    /// The endpoint could not be reached (DNS, connect, TLS, socket).
    Unreachable(String),
    /// The provider answered with a structured service error.
    Service {
        /// Provider error code, e.g. `InvalidInstanceID.NotFound`.
        code: Option<String>,
        /// Provider error message.
        message: String,
    },
    /// Anything the SDK could not attribute to the service or the network.
    Other(String),
}

#[cfg(test)]
impl ProviderSignal {
    /// Shorthand for a service error with a code.
    #[must_use]
    pub fn service(code: &str, message: &str) -> Self {
        Self::Service {
            code: Some(code.to_owned()),
            message: message.to_owned(),
        }
    }
}

/// Typed errors surfaced by every gateway operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InstanceError {
    /// The referenced instance id is unknown to the provider (or malformed).
    #[error("Instance '{instance_id}' was not found: {message}")]
    InstanceNotFound {
        /// The id that was requested.
        instance_id: String,
        /// Provider message.
        message: String,
    },

    /// The action is not valid for the instance's current state.
    #[error("Invalid state transition for '{instance_id}': {message}")]
    InvalidStateTransition {
        /// The id that was requested.
        instance_id: String,
        /// Provider message.
        message: String,
    },

    /// Request parameters were malformed or could not be resolved.
    #[error("Provider rejected the request ({code}): {message}")]
    ProviderRequest {
        /// Provider error code.
        code: String,
        /// Provider message.
        message: String,
    },

    /// The provider did not confirm the request within its allotted wait.
    #[error("Provider request timed out: {0}")]
    ProviderTimeout(String),

    /// The provider endpoint could not be reached.
    #[error("Could not reach the provider: {0}")]
    ProviderConnectivity(String),

    /// Any other provider-reported failure.
    #[error("Provider error: {0}")]
    UnclassifiedProvider(String),
}

impl InstanceError {
    /// Machine-readable error code (`snake_case`).
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InstanceNotFound { .. } => "instance_not_found",
            Self::InvalidStateTransition { .. } => "invalid_state_transition",
            Self::ProviderRequest { .. } => "provider_request",
            Self::ProviderTimeout(_) => "provider_timeout",
            Self::ProviderConnectivity(_) => "provider_connectivity",
            Self::UnclassifiedProvider(_) => "unclassified_provider",
        }
    }

    /// Return the CLI exit code for this error.
    ///
    /// Every classified failure exits 1; clap keeps 2 for usage errors.
    #[must_use]
    #[allow(clippy::unused_self)]
    pub fn exit_code(&self) -> i32 {
        1
    }
}

const NOT_FOUND_CODES: &[&str] = &["InvalidInstanceID.NotFound", "InvalidInstanceID.Malformed"];

const STATE_CODES: &[&str] = &["IncorrectInstanceState", "IncorrectState"];

const REQUEST_CODE_PREFIXES: &[&str] = &[
    "InvalidAMIID.",
    "InvalidKeyPair.",
    "InvalidGroup",
    "InvalidSubnet",
    "InvalidParameter",
    "MissingParameter",
    "InvalidInstanceType",
];

const TIMEOUT_CODE_PREFIXES: &[&str] = &["RequestTimeout"];

/// Map a provider signal onto the error taxonomy, most specific class first.
///
/// `instance_id` is the instance the call targeted, if any; it is carried into
/// the instance-scoped variants so the diagnostic names it.
#[must_use]
pub fn classify(signal: ProviderSignal, instance_id: Option<&str>) -> InstanceError {
    let (code, message) = match signal {
        ProviderSignal::TimedOut(message) => return InstanceError::ProviderTimeout(message),
        ProviderSignal::Unreachable(message) => {
            return InstanceError::ProviderConnectivity(message);
        }
        ProviderSignal::Other(message) => return InstanceError::UnclassifiedProvider(message),
        ProviderSignal::Service { code, message } => (code, message),
    };

    let Some(code) = code else {
        return InstanceError::UnclassifiedProvider(message);
    };
    let target = instance_id.unwrap_or_default().to_owned();

    if NOT_FOUND_CODES.contains(&code.as_str()) {
        return InstanceError::InstanceNotFound {
            instance_id: target,
            message,
        };
    }
    if STATE_CODES.contains(&code.as_str()) {
        return InstanceError::InvalidStateTransition {
            instance_id: target,
            message,
        };
    }
    if REQUEST_CODE_PREFIXES.iter().any(|p| code.starts_with(p)) {
        return InstanceError::ProviderRequest { code, message };
    }
    if TIMEOUT_CODE_PREFIXES.iter().any(|p| code.starts_with(p)) {
        return InstanceError::ProviderTimeout(message);
    }

    InstanceError::UnclassifiedProvider(format!("{code}: {message}"))
}
