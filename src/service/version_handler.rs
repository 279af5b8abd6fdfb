//! Client for the artifact version handler.

// self
use crate::{
	_prelude::*,
	http::ReqwestHttpClient,
	service::{ServiceClient, Subject},
};

/// Latest uploaded artifact for an application.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactVersion {
	/// Bucket or registry holding the artifact.
	pub store: String,
	/// Object path within the store.
	pub path: String,
	/// Version label (usually a commit SHA).
	pub version: String,
	/// Upload time of the artifact.
	#[serde(with = "time::serde::rfc3339")]
	pub last_updated: OffsetDateTime,
}
impl ArtifactVersion {
	/// Location of the artifact as an `s3://` URI.
	pub fn uri(&self) -> String {
		format!("s3://{}/{}", self.store, self.path.trim_start_matches('/'))
	}
}

/// Typed client for the version handler.
#[derive(Clone, Debug)]
pub struct Client {
	inner: ServiceClient,
}
impl Client {
	/// Creates a client rooted at `base_url` with a fresh transport.
	pub fn new(base_url: Url) -> Self {
		Self::with_http_client(base_url, ReqwestHttpClient::default())
	}

	/// Creates a client rooted at `base_url` that reuses `http`.
	pub fn with_http_client(base_url: Url, http: ReqwestHttpClient) -> Self {
		Self { inner: ServiceClient::new(base_url, http) }
	}

	/// Root URL of the service.
	pub fn base_url(&self) -> &Url {
		&self.inner.base_url
	}

	/// Reads the latest artifact version for `application`.
	pub async fn read_version(&self, application: &str) -> Result<ArtifactVersion> {
		self.inner
			.get_json(&["versions", application], Some(Subject::new("artifact", application)))
			.await
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn uri_joins_store_and_path() {
		let version = ArtifactVersion {
			store: "artifacts-bucket".into(),
			path: "/trafficinfo/lambda.zip".into(),
			version: "abc123".into(),
			last_updated: datetime!(2024-05-01 12:00 UTC),
		};

		assert_eq!(version.uri(), "s3://artifacts-bucket/trafficinfo/lambda.zip");
	}

	#[test]
	fn last_updated_parses_rfc3339() {
		let version: ArtifactVersion = serde_json::from_value(json!({
			"store": "bucket",
			"path": "app.zip",
			"version": "v1",
			"last_updated": "2024-05-01T12:00:00Z",
		}))
		.expect("Version payload should deserialize.");

		assert_eq!(version.last_updated, datetime!(2024-05-01 12:00 UTC));
	}
}
