//! Provider-level error types shared across service clients, resources, and data sources.

// self
use crate::_prelude::*;

/// Provider-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical provider error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Service answered with a non-success status.
	#[error("Service responded with HTTP {status}: {message}.")]
	Api {
		/// HTTP status code returned by the service.
		status: u16,
		/// Bounded preview of the response body.
		message: String,
	},
	/// The addressed remote object does not exist.
	#[error("The {resource} `{id}` does not exist.")]
	NotFound {
		/// Remote object kind (e.g. `app client`).
		resource: &'static str,
		/// Identifier used to address the object.
		id: String,
	},
	/// Service returned a body that does not match the expected shape.
	#[error("Service returned malformed JSON.")]
	Decode {
		/// Structured parsing failure naming the offending path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code of the decoded response.
		status: Option<u16>,
	},
}
impl Error {
	/// Returns true when the remote object is gone.
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound { .. })
	}
}

/// Configuration and validation failures raised while wiring the provider.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A service base URL could not be parsed.
	#[error("Base URL `{url}` is invalid.")]
	InvalidBaseUrl {
		/// The rejected URL.
		url: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A service base URL cannot carry path segments.
	#[error("Base URL `{url}` cannot be used as a base for request paths.")]
	CannotBeABase {
		/// The rejected URL.
		url: String,
	},
	/// A request path segment was empty and would address the parent collection.
	#[error("Request path `{path}` contains an empty segment.")]
	EmptyPathSegment {
		/// The joined path segments.
		path: String,
	},
	/// Request payload could not be serialized.
	#[error("Request body could not be serialized.")]
	RequestBody(#[source] serde_json::Error),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling {url}.")]
	Network {
		/// Request URL that failed.
		url: String,
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the service.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error for the given request URL.
	pub fn network(url: &Url, src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { url: url.to_string(), source: Box::new(src) }
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn not_found_is_detected_and_rendered() {
		let err = Error::NotFound { resource: "app client", id: "frontend".into() };

		assert!(err.is_not_found());
		assert_eq!(err.to_string(), "The app client `frontend` does not exist.");
	}

	#[test]
	fn api_errors_carry_status_and_message() {
		let err = Error::Api { status: 409, message: "already exists".into() };

		assert!(!err.is_not_found());
		assert_eq!(err.to_string(), "Service responded with HTTP 409: already exists.");
	}

	#[test]
	fn config_error_exposes_parse_source() {
		let source = Url::parse("not a url").expect_err("Fixture should fail to parse.");
		let err: Error =
			ConfigError::InvalidBaseUrl { url: "not a url".into(), source: source.clone() }.into();
		let inner =
			StdError::source(&err).expect("Transparent config error should expose its source.");

		assert_eq!(inner.to_string(), source.to_string());
	}
}
