//! Handler contracts implemented by every resource and data source.
//!
//! The host drives the lifecycle; a handler only maps one request onto REST calls and back.
//! Every operation receives the configured [`ProviderConfiguration`] explicitly, so handlers
//! stay stateless and can be registered once for the lifetime of the provider.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	diag::{Diagnostic, Diagnostics},
	provider::ProviderConfiguration,
	schema::Schema,
};

/// Boxed future returned by handler operations.
pub type HandlerFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

/// Create request carrying the user configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct CreateRequest {
	/// Resource configuration.
	pub config: Value,
}

/// Read request carrying the prior state.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadRequest {
	/// Current state.
	pub state: Value,
}

/// Update request carrying the planned and prior state.
#[derive(Clone, Debug, PartialEq)]
pub struct UpdateRequest {
	/// Planned state.
	pub plan: Value,
	/// Prior state.
	pub state: Value,
}

/// Delete request carrying the prior state.
#[derive(Clone, Debug, PartialEq)]
pub struct DeleteRequest {
	/// Current state.
	pub state: Value,
}

/// Import request carrying the user-supplied identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportRequest {
	/// Identifier passed to `terraform import`.
	pub id: String,
}

/// Data source read request carrying the configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadDataSourceRequest {
	/// Data source configuration.
	pub config: Value,
}

/// New state plus diagnostics returned by every operation.
///
/// `state == None` tells the host to drop the object from state. Failed Read, Update, and
/// Delete operations must therefore carry the prior state back (see
/// [`HandlerResponse::failed_with_state`]); only a failed Create returns no state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HandlerResponse {
	/// New state, or `None` to remove the object.
	pub state: Option<Value>,
	/// Diagnostics gathered while handling the request.
	pub diagnostics: Diagnostics,
}
impl HandlerResponse {
	/// Successful response holding `state`.
	pub fn with_state(state: Value) -> Self {
		Self { state: Some(state), diagnostics: Diagnostics::new() }
	}

	/// Successful response that removes the object from state.
	pub fn removed() -> Self {
		Self::default()
	}

	/// Failed response carrying `diagnostics` and no state; for failed creates.
	pub fn failed(diagnostics: impl Into<Diagnostics>) -> Self {
		Self { state: None, diagnostics: diagnostics.into() }
	}

	/// Failed response that keeps `prior` so the host does not forget the object.
	pub fn failed_with_state(prior: Value, diagnostics: impl Into<Diagnostics>) -> Self {
		Self { state: Some(prior), diagnostics: diagnostics.into() }
	}

	/// Attaches an extra diagnostic.
	pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
		self.diagnostics.push(diagnostic);

		self
	}
}

/// Managed resource handler.
pub trait Resource
where
	Self: Send + Sync,
{
	/// Type name without the provider prefix (e.g. `app_client`).
	fn type_name(&self) -> &'static str;

	/// Resource schema.
	fn schema(&self) -> Schema;

	/// Creates the remote object described by `request.config`.
	fn create<'a>(
		&'a self,
		provider: &'a ProviderConfiguration,
		request: CreateRequest,
	) -> HandlerFuture<'a, HandlerResponse>;

	/// Refreshes `request.state` from the remote object.
	fn read<'a>(
		&'a self,
		provider: &'a ProviderConfiguration,
		request: ReadRequest,
	) -> HandlerFuture<'a, HandlerResponse>;

	/// Applies `request.plan` to the remote object.
	fn update<'a>(
		&'a self,
		provider: &'a ProviderConfiguration,
		request: UpdateRequest,
	) -> HandlerFuture<'a, HandlerResponse>;

	/// Deletes the remote object.
	fn delete<'a>(
		&'a self,
		provider: &'a ProviderConfiguration,
		request: DeleteRequest,
	) -> HandlerFuture<'a, HandlerResponse>;

	/// Seeds state for `terraform import`; the host follows up with a read.
	///
	/// The default passes the identifier through as `id`.
	fn import_state(&self, request: ImportRequest) -> HandlerResponse {
		HandlerResponse::with_state(json!({ "id": request.id }))
	}
}

/// Data source handler.
pub trait DataSource
where
	Self: Send + Sync,
{
	/// Type name without the provider prefix (e.g. `cognito_info`).
	fn type_name(&self) -> &'static str;

	/// Data source schema.
	fn schema(&self) -> Schema;

	/// Reads the data source.
	fn read<'a>(
		&'a self,
		provider: &'a ProviderConfiguration,
		request: ReadDataSourceRequest,
	) -> HandlerFuture<'a, HandlerResponse>;
}

/// Decodes a host value into a model, reporting the failing attribute path on error.
pub fn decode_model<T>(value: Value, what: &str) -> Result<T, Diagnostic>
where
	T: DeserializeOwned,
{
	serde_path_to_error::deserialize(value).map_err(|err| {
		let path = err.path().to_string();
		let diagnostic = Diagnostic::error(
			format!("Unable to read {what}"),
			format!("The {what} could not be decoded: {}", err.inner()),
		);

		if path == "." { diagnostic } else { diagnostic.at(path) }
	})
}

/// Encodes a model into a host value.
pub fn encode_model<T>(model: &T, what: &str) -> Result<Value, Diagnostic>
where
	T: Serialize,
{
	serde_json::to_value(model).map_err(|err| {
		Diagnostic::error(
			format!("Unable to write {what}"),
			format!("The {what} could not be encoded: {err}"),
		)
	})
}

/// Wraps a service error in an error diagnostic.
pub fn error_diagnostic(
	summary: impl Into<String>,
	context: impl Display,
	err: &Error,
) -> Diagnostic {
	Diagnostic::error(summary, format!("{context}: {err}"))
}
