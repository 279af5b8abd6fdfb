//! `vy_artifact_version`: latest uploaded artifact of an application.

// crates.io
use time::format_description::well_known::Rfc3339;
// self
use crate::{
	_prelude::*,
	diag::{Diagnostic, Diagnostics},
	plugin::{
		DataSource, HandlerFuture, HandlerResponse, ReadDataSourceRequest, decode_model,
		error_diagnostic,
	},
	provider::ProviderConfiguration,
	resources::state_response,
	schema::{Attribute, Schema},
	service::version_handler::ArtifactVersion,
};

#[derive(Debug, Deserialize)]
struct ArtifactVersionConfig {
	application: String,
}

/// Terraform state of `vy_artifact_version`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactVersionDataSourceData {
	/// Mirrors `application`.
	pub id: String,
	/// Application whose artifact was looked up.
	pub application: String,
	/// Bucket holding the artifact.
	pub store: String,
	/// Object path within the store.
	pub path: String,
	/// Version label.
	pub version: String,
	/// `s3://{store}/{path}`.
	pub uri: String,
	/// Upload time as RFC 3339.
	pub last_updated: String,
}
impl ArtifactVersionDataSourceData {
	/// Builds the state for `application` from the service model.
	pub fn from_domain(
		application: String,
		domain: ArtifactVersion,
	) -> Result<Self, time::error::Format> {
		let uri = domain.uri();
		let last_updated = domain.last_updated.format(&Rfc3339)?;

		Ok(Self {
			id: application.clone(),
			application,
			store: domain.store,
			path: domain.path,
			version: domain.version,
			uri,
			last_updated,
		})
	}
}

/// Handler for `vy_artifact_version`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArtifactVersionDataSource;
impl DataSource for ArtifactVersionDataSource {
	fn type_name(&self) -> &'static str {
		"artifact_version"
	}

	fn schema(&self) -> Schema {
		Schema::new("The latest artifact uploaded for an application.")
			.with_attribute("id", Attribute::computed_string())
			.with_attribute(
				"application",
				Attribute::required_string()
					.with_description("The application to look up the artifact for"),
			)
			.with_attribute(
				"store",
				Attribute::computed_string().with_description("The bucket the artifact lives in"),
			)
			.with_attribute(
				"path",
				Attribute::computed_string().with_description("The path to the artifact"),
			)
			.with_attribute(
				"version",
				Attribute::computed_string().with_description("The version of the artifact"),
			)
			.with_attribute(
				"uri",
				Attribute::computed_string().with_description("The full S3 URI of the artifact"),
			)
			.with_attribute(
				"last_updated",
				Attribute::computed_string()
					.with_description("When the artifact was uploaded, in RFC 3339 format"),
			)
	}

	fn read<'a>(
		&'a self,
		provider: &'a ProviderConfiguration,
		request: ReadDataSourceRequest,
	) -> HandlerFuture<'a, HandlerResponse> {
		Box::pin(async move {
			read(provider, request).await.unwrap_or_else(HandlerResponse::failed)
		})
	}
}

async fn read(
	provider: &ProviderConfiguration,
	request: ReadDataSourceRequest,
) -> Result<HandlerResponse, Diagnostics> {
	let config: ArtifactVersionConfig =
		decode_model(request.config, "artifact version configuration")?;
	let version =
		provider.version_handler_client.read_version(&config.application).await.map_err(|err| {
			error_diagnostic(
				"Unable to read artifact version",
				format_args!("Can't read the latest artifact of {}", config.application),
				&err,
			)
		})?;
	let data =
		ArtifactVersionDataSourceData::from_domain(config.application, version).map_err(|err| {
			Diagnostic::error(
				"Unable to read artifact version",
				format!("The upload time could not be formatted: {err}"),
			)
		})?;

	Ok(state_response(&data)?)
}
