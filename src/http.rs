//! Transport primitives shared by every service client.
//!
//! [`ReqwestHttpClient`] wraps a single [`ReqwestClient`] so connection pools are shared across
//! the three services the provider talks to. [`ReqwestHttpClient::execute`] performs one
//! request, buffers the body, and hands back a [`RawResponse`]; status classification and JSON
//! decoding happen one layer up in [`crate::service`].

// std
use std::ops::Deref;
// crates.io
use reqwest::{
	Method,
	header::{ACCEPT, CONTENT_TYPE, HeaderValue},
};
// self
use crate::{
	_prelude::*,
	error::{ConfigError, TransportError},
};

const BODY_PREVIEW_LIMIT: usize = 256;
const JSON: &str = "application/json";

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
#[derive(Clone, Default)]
pub struct ReqwestHttpClient(pub ReqwestClient);
impl ReqwestHttpClient {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	/// Builds a client that identifies itself as `terraform-provider-vy/<version>`.
	pub fn with_user_agent(version: &str) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder()
			.user_agent(format!("terraform-provider-vy/{version}"))
			.build()
			.map_err(ConfigError::http_client_build)?;

		Ok(Self(client))
	}

	/// Sends a single request and buffers the response body.
	///
	/// Non-success statuses are returned as-is; only transport failures become errors.
	pub async fn execute(
		&self,
		method: Method,
		url: Url,
		body: Option<Vec<u8>>,
	) -> Result<RawResponse, TransportError> {
		#[cfg(feature = "tracing")]
		tracing::debug!(%method, url = %url, "Calling service.");

		let mut request =
			self.0.request(method, url.clone()).header(ACCEPT, HeaderValue::from_static(JSON));

		if let Some(body) = body {
			request = request.header(CONTENT_TYPE, HeaderValue::from_static(JSON)).body(body);
		}

		let response =
			request.send().await.map_err(|err| TransportError::network(&url, err))?;
		let status = response.status();
		let body = response.bytes().await.map_err(|err| TransportError::network(&url, err))?;

		#[cfg(feature = "tracing")]
		tracing::debug!(status = status.as_u16(), url = %url, "Service responded.");

		Ok(RawResponse { status, body: body.to_vec() })
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl Debug for ReqwestHttpClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestHttpClient(..)")
	}
}

/// Buffered service response.
#[derive(Clone, Debug)]
pub struct RawResponse {
	/// HTTP status returned by the service.
	pub status: StatusCode,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl RawResponse {
	/// Returns a lossy, length-bounded rendering of the body for error messages.
	pub fn body_preview(&self) -> String {
		let text = String::from_utf8_lossy(&self.body);
		let text = text.trim();

		if text.is_empty() {
			return self.status.canonical_reason().unwrap_or("no response body").to_owned();
		}

		match text.char_indices().nth(BODY_PREVIEW_LIMIT) {
			Some((cut, _)) => format!("{}...", &text[..cut]),
			None => text.to_owned(),
		}
	}
}
