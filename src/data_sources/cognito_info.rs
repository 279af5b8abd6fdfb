//! `vy_cognito_info`: endpoints of the central Cognito user pool.

// self
use crate::{
	_prelude::*,
	diag::Diagnostics,
	plugin::{
		DataSource, HandlerFuture, HandlerResponse, ReadDataSourceRequest, error_diagnostic,
	},
	provider::ProviderConfiguration,
	resources::state_response,
	schema::{Attribute, Schema},
	service::central_cognito::CognitoInfo,
};

/// Terraform state of `vy_cognito_info`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognitoInfoDataSourceData {
	/// Mirrors `user_pool_id`.
	pub id: String,
	/// Cognito user pool identifier.
	pub user_pool_id: String,
	/// Hosted UI authorization endpoint.
	pub auth_url: String,
	/// JSON Web Key Set endpoint.
	pub jwks_url: String,
	/// Token issuer.
	pub issuer: String,
	/// OpenID Connect discovery document.
	pub open_id_url: String,
}
impl From<CognitoInfo> for CognitoInfoDataSourceData {
	fn from(info: CognitoInfo) -> Self {
		Self {
			id: info.user_pool_id.clone(),
			user_pool_id: info.user_pool_id,
			auth_url: info.auth_url,
			jwks_url: info.jwks_url,
			issuer: info.issuer,
			open_id_url: info.open_id_url,
		}
	}
}

/// Handler for `vy_cognito_info`.
#[derive(Clone, Copy, Debug, Default)]
pub struct CognitoInfoDataSource;
impl DataSource for CognitoInfoDataSource {
	fn type_name(&self) -> &'static str {
		"cognito_info"
	}

	fn schema(&self) -> Schema {
		Schema::new("Connection details for the central Cognito user pool.")
			.with_attribute("id", Attribute::computed_string())
			.with_attribute(
				"user_pool_id",
				Attribute::computed_string().with_description("The ID of the user pool"),
			)
			.with_attribute(
				"auth_url",
				Attribute::computed_string().with_description("The URL used for authentication"),
			)
			.with_attribute(
				"jwks_url",
				Attribute::computed_string().with_description("The URL of the JSON Web Key Set"),
			)
			.with_attribute(
				"issuer",
				Attribute::computed_string().with_description("The issuer of tokens"),
			)
			.with_attribute(
				"open_id_url",
				Attribute::computed_string()
					.with_description("The OpenID Connect discovery document"),
			)
	}

	fn read<'a>(
		&'a self,
		provider: &'a ProviderConfiguration,
		_: ReadDataSourceRequest,
	) -> HandlerFuture<'a, HandlerResponse> {
		Box::pin(async move { read(provider).await.unwrap_or_else(HandlerResponse::failed) })
	}
}

async fn read(provider: &ProviderConfiguration) -> Result<HandlerResponse, Diagnostics> {
	let info = provider.cognito_client.read_info().await.map_err(|err| {
		error_diagnostic(
			"Unable to read Cognito info",
			"Can't read the central Cognito configuration from remote",
			&err,
		)
	})?;

	Ok(state_response(&CognitoInfoDataSourceData::from(info))?)
}
