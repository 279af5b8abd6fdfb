//! `vy_app_client`: an app client used to access resource servers.

// self
use crate::{
	_prelude::*,
	diag::Diagnostics,
	plugin::{
		CreateRequest, DeleteRequest, HandlerFuture, HandlerResponse, ImportRequest, ReadRequest,
		Resource, UpdateRequest, decode_model, error_diagnostic,
	},
	provider::ProviderConfiguration,
	resources::{list_from_remote, removed_from_remote, state_response},
	schema::{Attribute, Schema},
	service::central_cognito::{AppClient, AppClientType, AppClientUpdateRequest},
};

/// Terraform state of an app client.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppClientResourceData {
	/// Resource identifier; mirrors `name`.
	#[serde(default)]
	pub id: Option<String>,
	/// App client name.
	#[serde(default)]
	pub name: String,
	/// Scopes the client has access to.
	#[serde(default)]
	pub scopes: Option<Vec<String>>,
	/// `frontend` or `backend`.
	#[serde(rename = "type", default)]
	pub client_type: Option<String>,
	/// Allowed callback URLs.
	#[serde(default)]
	pub callback_urls: Option<Vec<String>>,
	/// Allowed logout URLs.
	#[serde(default)]
	pub logout_urls: Option<Vec<String>>,
	/// Whether a client secret is generated.
	#[serde(default)]
	pub generate_secret: Option<bool>,
	/// Cognito client id.
	#[serde(default)]
	pub client_id: Option<String>,
	/// Cognito client secret.
	#[serde(default)]
	pub client_secret: Option<String>,
}
impl AppClientResourceData {
	/// Converts the state into the service model, validating enum and URL values.
	pub fn to_domain(&self) -> Result<AppClient, Diagnostics> {
		let mut diagnostics = Diagnostics::new();
		let client_type = match self.client_type.as_deref() {
			None => AppClientType::default(),
			Some(raw) => raw.parse().unwrap_or_else(|err: String| {
				diagnostics.add_attribute_error(
					"type",
					"Invalid app client type",
					format!("{err} Expected `frontend` or `backend`."),
				);

				AppClientType::default()
			}),
		};

		for (attribute, urls) in
			[("callback_urls", &self.callback_urls), ("logout_urls", &self.logout_urls)]
		{
			for (index, raw) in urls.iter().flatten().enumerate() {
				if let Err(err) = Url::parse(raw) {
					diagnostics.add_attribute_error(
						format!("{attribute}[{index}]"),
						"Invalid URL",
						format!("`{raw}` is not a valid URL: {err}."),
					);
				}
			}
		}

		if diagnostics.has_error() {
			return Err(diagnostics);
		}

		Ok(AppClient {
			name: self.name.clone(),
			scopes: self.scopes.clone().unwrap_or_default(),
			client_type,
			callback_urls: self.callback_urls.clone().unwrap_or_default(),
			logout_urls: self.logout_urls.clone().unwrap_or_default(),
			generate_secret: self.generate_secret.unwrap_or_default(),
			client_id: None,
			client_secret: None,
		})
	}

	/// Refreshes the state from the service model, keeping unset optionals unset.
	pub fn from_domain(domain: AppClient, prior: &Self) -> Self {
		let client_type = match (&prior.client_type, domain.client_type) {
			(None, AppClientType::Backend) => None,
			(_, client_type) => Some(client_type.to_string()),
		};
		let generate_secret = match (prior.generate_secret, domain.generate_secret) {
			(None, false) => None,
			(_, generate_secret) => Some(generate_secret),
		};

		Self {
			id: Some(domain.name.clone()),
			scopes: list_from_remote(domain.scopes, &prior.scopes),
			client_type,
			callback_urls: list_from_remote(domain.callback_urls, &prior.callback_urls),
			logout_urls: list_from_remote(domain.logout_urls, &prior.logout_urls),
			generate_secret,
			client_id: domain.client_id.or_else(|| prior.client_id.clone()),
			client_secret: domain
				.client_secret
				.map(|secret| secret.expose().to_owned())
				.or_else(|| prior.client_secret.clone()),
			name: domain.name,
		}
	}

	/// Falls back to `id` when `name` is missing, as in states seeded by import.
	pub fn resolve_name(&mut self) {
		if self.name.is_empty() {
			self.name = self.id.clone().unwrap_or_default();
		}
	}

	fn adopt_credentials(&mut self, domain: &AppClient) {
		self.client_id = domain.client_id.clone();
		self.client_secret =
			domain.client_secret.as_ref().map(|secret| secret.expose().to_owned());
	}
}

/// Handler for `vy_app_client`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AppClientResource;
impl Resource for AppClientResource {
	fn type_name(&self) -> &'static str {
		"app_client"
	}

	fn schema(&self) -> Schema {
		Schema::new("An app client, used to access resource servers.")
			.with_attribute("id", Attribute::computed_string().use_state_for_unknown())
			.with_attribute(
				"name",
				Attribute::required_string()
					.requires_replace()
					.with_description("The name of this app client"),
			)
			.with_attribute(
				"scopes",
				Attribute::optional_string_list()
					.with_description("Scopes that this client has access to"),
			)
			.with_attribute(
				"type",
				Attribute::optional_string()
					.requires_replace()
					.with_description("The type of client: `frontend` or `backend` (default)"),
			)
			.with_attribute(
				"callback_urls",
				Attribute::optional_string_list()
					.with_description("Callback URLs for frontend clients"),
			)
			.with_attribute(
				"logout_urls",
				Attribute::optional_string_list()
					.with_description("Logout URLs for frontend clients"),
			)
			.with_attribute(
				"generate_secret",
				Attribute::optional_bool()
					.requires_replace()
					.with_description("Whether Cognito should generate a client secret"),
			)
			.with_attribute(
				"client_id",
				Attribute::computed_string()
					.use_state_for_unknown()
					.with_description("The Cognito client id"),
			)
			.with_attribute(
				"client_secret",
				Attribute::computed_string()
					.sensitive()
					.use_state_for_unknown()
					.with_description("The Cognito client secret, if one was generated"),
			)
	}

	fn create<'a>(
		&'a self,
		provider: &'a ProviderConfiguration,
		request: CreateRequest,
	) -> HandlerFuture<'a, HandlerResponse> {
		Box::pin(async move {
			create(provider, request).await.unwrap_or_else(HandlerResponse::failed)
		})
	}

	fn read<'a>(
		&'a self,
		provider: &'a ProviderConfiguration,
		request: ReadRequest,
	) -> HandlerFuture<'a, HandlerResponse> {
		let prior = request.state.clone();

		Box::pin(async move {
			read(provider, request)
				.await
				.unwrap_or_else(|diags| HandlerResponse::failed_with_state(prior, diags))
		})
	}

	fn update<'a>(
		&'a self,
		provider: &'a ProviderConfiguration,
		request: UpdateRequest,
	) -> HandlerFuture<'a, HandlerResponse> {
		let prior = request.state.clone();

		Box::pin(async move {
			update(provider, request)
				.await
				.unwrap_or_else(|diags| HandlerResponse::failed_with_state(prior, diags))
		})
	}

	fn delete<'a>(
		&'a self,
		provider: &'a ProviderConfiguration,
		request: DeleteRequest,
	) -> HandlerFuture<'a, HandlerResponse> {
		let prior = request.state.clone();

		Box::pin(async move {
			delete(provider, request)
				.await
				.unwrap_or_else(|diags| HandlerResponse::failed_with_state(prior, diags))
		})
	}

	fn import_state(&self, request: ImportRequest) -> HandlerResponse {
		HandlerResponse::with_state(json!({ "id": request.id, "name": request.id }))
	}
}

async fn create(
	provider: &ProviderConfiguration,
	request: CreateRequest,
) -> Result<HandlerResponse, Diagnostics> {
	let mut data: AppClientResourceData =
		decode_model(request.config, "app client configuration")?;
	let app_client = data.to_domain()?;

	data.id = Some(data.name.clone());

	if let Err(err) = provider.cognito_client.create_app_client(&app_client).await {
		return Err(error_diagnostic(
			"Could not create app client",
			format_args!("App client with name {} could not be created", app_client.name),
			&err,
		)
		.into());
	}

	let mut diagnostics = Diagnostics::new();

	match provider.cognito_client.read_app_client(&app_client.name).await {
		Ok(remote) => data.adopt_credentials(&remote),
		Err(err) => diagnostics.push(error_diagnostic(
			"Unable to read app client",
			format_args!("App client {} was created but could not be read back", app_client.name),
			&err,
		)),
	}

	let mut response = state_response(&data)?;

	response.diagnostics.append(diagnostics);

	Ok(response)
}

async fn read(
	provider: &ProviderConfiguration,
	request: ReadRequest,
) -> Result<HandlerResponse, Diagnostics> {
	let mut data: AppClientResourceData = decode_model(request.state, "app client state")?;

	data.resolve_name();

	match provider.cognito_client.read_app_client(&data.name).await {
		Ok(remote) => Ok(state_response(&AppClientResourceData::from_domain(remote, &data))?),
		Err(err) if err.is_not_found() => Ok(removed_from_remote("app client", &data.name)),
		Err(err) => Err(error_diagnostic(
			"Unable to read app client",
			format_args!("Can't read app client {} from remote", data.name),
			&err,
		)
		.into()),
	}
}

async fn update(
	provider: &ProviderConfiguration,
	request: UpdateRequest,
) -> Result<HandlerResponse, Diagnostics> {
	let mut data: AppClientResourceData = decode_model(request.plan, "app client plan")?;
	let prior: AppClientResourceData = decode_model(request.state, "app client state")?;

	data.resolve_name();

	let app_client = data.to_domain()?;

	data.id = Some(data.name.clone());
	data.client_id = data.client_id.or(prior.client_id);
	data.client_secret = data.client_secret.or(prior.client_secret);

	provider
		.cognito_client
		.update_app_client(&AppClientUpdateRequest::from(&app_client))
		.await
		.map_err(|err| {
			error_diagnostic(
				"Unable to update app client",
				format_args!("Can't update app client {} in remote", data.name),
				&err,
			)
		})?;

	Ok(state_response(&data)?)
}

async fn delete(
	provider: &ProviderConfiguration,
	request: DeleteRequest,
) -> Result<HandlerResponse, Diagnostics> {
	let mut data: AppClientResourceData = decode_model(request.state, "app client state")?;

	data.resolve_name();

	match provider.cognito_client.delete_app_client(&data.name).await {
		Ok(()) => Ok(HandlerResponse::removed()),
		Err(err) if err.is_not_found() => Ok(HandlerResponse::removed()),
		Err(err) => Err(error_diagnostic(
			"Unable to delete app client",
			format_args!("Can't delete app client {} in remote", data.name),
			&err,
		)
		.into()),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::service::central_cognito::ClientSecret;

	fn state(value: Value) -> AppClientResourceData {
		serde_json::from_value(value).expect("State fixture should decode.")
	}

	#[test]
	fn to_domain_applies_defaults() {
		let domain = state(json!({ "name": "backend.acceptancetest.io" }))
			.to_domain()
			.expect("Minimal state should convert.");

		assert_eq!(domain.client_type, AppClientType::Backend);
		assert!(domain.scopes.is_empty());
		assert!(!domain.generate_secret);
	}

	#[test]
	fn to_domain_reports_every_invalid_value() {
		let diagnostics = state(json!({
			"name": "web",
			"type": "mobile",
			"callback_urls": ["https://example.com/callback", "not a url"],
			"logout_urls": ["::"],
		}))
		.to_domain()
		.expect_err("Invalid values should be rejected.");
		let attributes =
			diagnostics.errors().filter_map(|d| d.attribute.as_deref()).collect::<Vec<_>>();

		assert_eq!(attributes, ["type", "callback_urls[1]", "logout_urls[0]"]);
	}

	#[test]
	fn from_domain_keeps_unset_optionals_unset() {
		let prior = state(json!({ "id": "api", "name": "api" }));
		let remote = AppClient {
			name: "api".into(),
			client_id: Some("abc".into()),
			..AppClient::default()
		};
		let refreshed = AppClientResourceData::from_domain(remote, &prior);

		assert_eq!(refreshed.id.as_deref(), Some("api"));
		assert_eq!(refreshed.scopes, None);
		assert_eq!(refreshed.client_type, None);
		assert_eq!(refreshed.generate_secret, None);
		assert_eq!(refreshed.client_id.as_deref(), Some("abc"));
	}

	#[test]
	fn from_domain_reports_remote_drift() {
		let prior = state(json!({ "name": "web", "type": "frontend", "scopes": ["openid"] }));
		let remote = AppClient {
			name: "web".into(),
			scopes: vec!["openid".into(), "email".into()],
			client_type: AppClientType::Frontend,
			client_secret: Some(ClientSecret::new("s3cr3t")),
			..AppClient::default()
		};
		let refreshed = AppClientResourceData::from_domain(remote, &prior);

		assert_eq!(refreshed.scopes, Some(vec!["openid".into(), "email".into()]));
		assert_eq!(refreshed.client_type.as_deref(), Some("frontend"));
		assert_eq!(refreshed.client_secret.as_deref(), Some("s3cr3t"));
	}

	#[test]
	fn import_seeds_name_from_id() {
		let response = AppClientResource.import_state(ImportRequest { id: "web".into() });

		assert_eq!(response.state, Some(json!({ "id": "web", "name": "web" })));
	}

	#[test]
	fn schema_marks_secret_sensitive() {
		let schema = AppClientResource.schema();
		let secret = schema.attribute("client_secret").expect("client_secret should exist.");

		assert!(secret.sensitive);
		assert!(secret.is_computed_only());
		assert!(schema.attribute("name").is_some_and(|name| name.required));
	}

	#[test]
	fn resolve_name_falls_back_to_id_only_when_unnamed() {
		let mut imported = state(json!({ "id": "web" }));
		let mut named = state(json!({ "id": "old", "name": "web" }));

		imported.resolve_name();
		named.resolve_name();

		assert_eq!(imported.name, "web");
		assert_eq!(named.name, "web");
	}
}
