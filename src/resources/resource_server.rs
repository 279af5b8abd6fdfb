//! `vy_resource_server`: a resource server publishing scopes for app clients.

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
	service::central_cognito::{ResourceServer, ResourceServerScope},
};

/// Terraform state of a resource server scope.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceServerScopeData {
	/// Scope name.
	pub name: String,
	/// Scope description.
	pub description: String,
}

/// Terraform state of a resource server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceServerResourceData {
	/// Resource identifier; mirrors `identifier`.
	#[serde(default)]
	pub id: Option<String>,
	/// Resource server identifier.
	#[serde(default)]
	pub identifier: String,
	/// Display name.
	#[serde(default)]
	pub name: String,
	/// Published scopes.
	#[serde(default)]
	pub scopes: Option<Vec<ResourceServerScopeData>>,
}
impl ResourceServerResourceData {
	/// Converts the state into the service model.
	pub fn to_domain(&self) -> ResourceServer {
		ResourceServer {
			identifier: self.identifier.clone(),
			name: self.name.clone(),
			scopes: self
				.scopes
				.iter()
				.flatten()
				.map(|scope| ResourceServerScope {
					name: scope.name.clone(),
					description: scope.description.clone(),
				})
				.collect(),
		}
	}

	/// Falls back to `id` when `identifier` is missing, as in states seeded by import.
	pub fn resolve_identifier(&mut self) {
		if self.identifier.is_empty() {
			self.identifier = self.id.clone().unwrap_or_default();
		}
	}

	/// Refreshes the state from the service model.
	pub fn from_domain(domain: ResourceServer, prior: &Self) -> Self {
		let scopes = domain
			.scopes
			.into_iter()
			.map(|scope| ResourceServerScopeData {
				name: scope.name,
				description: scope.description,
			})
			.collect();

		Self {
			id: Some(domain.identifier.clone()),
			identifier: domain.identifier,
			name: domain.name,
			scopes: list_from_remote(scopes, &prior.scopes),
		}
	}
}

/// Handler for `vy_resource_server`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ResourceServerResource;
impl Resource for ResourceServerResource {
	fn type_name(&self) -> &'static str {
		"resource_server"
	}

	fn schema(&self) -> Schema {
		Schema::new("A resource server, exposing scopes that app clients can be granted.")
			.with_attribute("id", Attribute::computed_string().use_state_for_unknown())
			.with_attribute(
				"identifier",
				Attribute::required_string()
					.requires_replace()
					.with_description("A unique identifier for the resource server, like a domain"),
			)
			.with_attribute(
				"name",
				Attribute::required_string().with_description("A friendly name for the server"),
			)
			.with_attribute(
				"scopes",
				Attribute::optional_object_list(["name", "description"])
					.with_description("Scopes that this resource server exposes"),
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
		HandlerResponse::with_state(json!({ "id": request.id, "identifier": request.id }))
	}
}

async fn create(
	provider: &ProviderConfiguration,
	request: CreateRequest,
) -> Result<HandlerResponse, Diagnostics> {
	let mut data: ResourceServerResourceData =
		decode_model(request.config, "resource server configuration")?;
	let server = data.to_domain();

	data.id = Some(data.identifier.clone());

	provider.cognito_client.create_resource_server(&server).await.map_err(|err| {
		error_diagnostic(
			"Could not create resource server",
			format_args!("Resource server {} could not be created", server.identifier),
			&err,
		)
	})?;

	Ok(state_response(&data)?)
}

async fn read(
	provider: &ProviderConfiguration,
	request: ReadRequest,
) -> Result<HandlerResponse, Diagnostics> {
	let mut data: ResourceServerResourceData =
		decode_model(request.state, "resource server state")?;

	data.resolve_identifier();

	match provider.cognito_client.read_resource_server(&data.identifier).await {
		Ok(remote) => Ok(state_response(&ResourceServerResourceData::from_domain(remote, &data))?),
		Err(err) if err.is_not_found() =>
			Ok(removed_from_remote("resource server", &data.identifier)),
		Err(err) => Err(error_diagnostic(
			"Unable to read resource server",
			format_args!("Can't read resource server {} from remote", data.identifier),
			&err,
		)
		.into()),
	}
}

async fn update(
	provider: &ProviderConfiguration,
	request: UpdateRequest,
) -> Result<HandlerResponse, Diagnostics> {
	let mut data: ResourceServerResourceData =
		decode_model(request.plan, "resource server plan")?;

	data.resolve_identifier();

	let server = data.to_domain();

	data.id = Some(data.identifier.clone());

	provider.cognito_client.update_resource_server(&server).await.map_err(|err| {
		error_diagnostic(
			"Unable to update resource server",
			format_args!("Can't update resource server {} in remote", data.identifier),
			&err,
		)
	})?;

	Ok(state_response(&data)?)
}

async fn delete(
	provider: &ProviderConfiguration,
	request: DeleteRequest,
) -> Result<HandlerResponse, Diagnostics> {
	let mut data: ResourceServerResourceData =
		decode_model(request.state, "resource server state")?;

	data.resolve_identifier();

	match provider.cognito_client.delete_resource_server(&data.identifier).await {
		Ok(()) => Ok(HandlerResponse::removed()),
		Err(err) if err.is_not_found() => Ok(HandlerResponse::removed()),
		Err(err) => Err(error_diagnostic(
			"Unable to delete resource server",
			format_args!("Can't delete resource server {} in remote", data.identifier),
			&err,
		)
		.into()),
	}
}
