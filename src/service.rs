//! REST clients for the internal services backing the provider.
//!
//! Each service module wraps a [`ServiceClient`] and exposes typed calls. The shared client owns
//! path construction, JSON encoding, and the mapping from HTTP statuses to [`Error`] values so
//! resources only ever see domain types or a single wrapped error.

pub mod central_cognito;
pub mod enroll_account;
pub mod version_handler;

// crates.io
use reqwest::Method;
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	error::ConfigError,
	http::{RawResponse, ReqwestHttpClient},
};

/// Names the remote object a request addresses so a 404 can be reported as
/// [`Error::NotFound`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subject<'a> {
	/// Remote object kind (e.g. `app client`).
	pub kind: &'static str,
	/// Identifier used in the request path.
	pub id: &'a str,
}
impl<'a> Subject<'a> {
	/// Creates a subject for the given kind + identifier.
	pub const fn new(kind: &'static str, id: &'a str) -> Self {
		Self { kind, id }
	}
}

/// Base URL + shared transport used by every service client.
#[derive(Clone, Debug)]
pub struct ServiceClient {
	/// Root URL all request paths are appended to.
	pub base_url: Url,
	/// Shared HTTP transport.
	pub http: ReqwestHttpClient,
}
impl ServiceClient {
	/// Creates a client rooted at `base_url`.
	pub fn new(base_url: Url, http: ReqwestHttpClient) -> Self {
		Self { base_url, http }
	}

	/// Appends percent-encoded path segments to the base URL.
	///
	/// Empty segments are rejected so a missing identifier never addresses a collection.
	pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
		if segments.iter().any(|segment| segment.is_empty()) {
			return Err(ConfigError::EmptyPathSegment { path: segments.join("/") }.into());
		}

		let mut url = self.base_url.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::CannotBeABase { url: self.base_url.to_string() })?
			.pop_if_empty()
			.extend(segments);

		Ok(url)
	}

	/// `GET`s a JSON document.
	pub async fn get_json<T>(&self, segments: &[&str], subject: Option<Subject<'_>>) -> Result<T>
	where
		T: DeserializeOwned,
	{
		let response = self.send(Method::GET, segments, None, subject).await?;

		decode(&response)
	}

	/// `POST`s a JSON body and decodes the JSON response.
	pub async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> Result<T>
	where
		B: ?Sized + Serialize,
		T: DeserializeOwned,
	{
		let response = self.send(Method::POST, segments, Some(encode(body)?), None).await?;

		decode(&response)
	}

	/// `POST`s a JSON body, ignoring the response payload.
	pub async fn post<B>(&self, segments: &[&str], body: &B) -> Result<()>
	where
		B: ?Sized + Serialize,
	{
		self.send(Method::POST, segments, Some(encode(body)?), None).await.map(|_| ())
	}

	/// `PUT`s a JSON body, ignoring the response payload.
	pub async fn put<B>(
		&self,
		segments: &[&str],
		body: &B,
		subject: Option<Subject<'_>>,
	) -> Result<()>
	where
		B: ?Sized + Serialize,
	{
		self.send(Method::PUT, segments, Some(encode(body)?), subject).await.map(|_| ())
	}

	/// `DELETE`s the addressed object.
	pub async fn delete(&self, segments: &[&str], subject: Option<Subject<'_>>) -> Result<()> {
		self.send(Method::DELETE, segments, None, subject).await.map(|_| ())
	}

	async fn send(
		&self,
		method: Method,
		segments: &[&str],
		body: Option<Vec<u8>>,
		subject: Option<Subject<'_>>,
	) -> Result<RawResponse> {
		let url = self.endpoint(segments)?;
		let response = self.http.execute(method, url, body).await?;

		check_status(response, subject)
	}
}

fn encode<B>(body: &B) -> Result<Vec<u8>>
where
	B: ?Sized + Serialize,
{
	serde_json::to_vec(body).map_err(|err| ConfigError::RequestBody(err).into())
}

fn decode<T>(response: &RawResponse) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut de = serde_json::Deserializer::from_slice(&response.body);

	serde_path_to_error::deserialize(&mut de)
		.map_err(|source| Error::Decode { source, status: Some(response.status.as_u16()) })
}

fn check_status(response: RawResponse, subject: Option<Subject<'_>>) -> Result<RawResponse> {
	if response.status.is_success() {
		return Ok(response);
	}
	if let (StatusCode::NOT_FOUND, Some(subject)) = (response.status, subject) {
		return Err(Error::NotFound { resource: subject.kind, id: subject.id.to_owned() });
	}

	Err(Error::Api { status: response.status.as_u16(), message: response.body_preview() })
}
