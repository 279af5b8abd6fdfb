//! `vy_deployment`: enrolls an AWS account in the deployment pipeline.

// self
use crate::{
	_prelude::*,
	diag::{Diagnostic, Diagnostics},
	plugin::{
		CreateRequest, DeleteRequest, HandlerFuture, HandlerResponse, ReadRequest, Resource,
		UpdateRequest, decode_model, error_diagnostic,
	},
	provider::ProviderConfiguration,
	resources::{removed_from_remote, state_response},
	schema::{Attribute, Schema},
	service::enroll_account::{Account, AccountRequest},
};

/// Terraform state of a deployment enrollment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResourceData {
	/// Resource identifier; mirrors `owner_account_id`.
	#[serde(default)]
	pub id: Option<String>,
	/// Slack channel receiving deployment notifications.
	#[serde(default)]
	pub slack_channel: String,
	/// Account that owns the deployment, assigned by the service.
	#[serde(default)]
	pub owner_account_id: Option<String>,
}
impl DeploymentResourceData {
	/// Builds the state reported for a remote account.
	pub fn from_domain(domain: Account) -> Self {
		Self {
			id: Some(domain.owner_account_id.clone()),
			slack_channel: domain.slack_channel,
			owner_account_id: Some(domain.owner_account_id),
		}
	}

	/// Identifier of the remote account, if known.
	pub fn account_id(&self) -> Option<&str> {
		fn known(id: &Option<String>) -> Option<&str> {
			id.as_deref().filter(|id| !id.is_empty())
		}

		known(&self.owner_account_id).or_else(|| known(&self.id))
	}

	fn request(&self) -> AccountRequest {
		AccountRequest { slack_channel: self.slack_channel.clone() }
	}
}

/// Handler for `vy_deployment`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DeploymentResource;
impl Resource for DeploymentResource {
	fn type_name(&self) -> &'static str {
		"deployment"
	}

	fn schema(&self) -> Schema {
		Schema::new("Enrolls the calling AWS account in the deployment pipeline.")
			.with_attribute("id", Attribute::computed_string().use_state_for_unknown())
			.with_attribute(
				"slack_channel",
				Attribute::required_string()
					.with_description("The Slack channel that deployment notifications go to"),
			)
			.with_attribute(
				"owner_account_id",
				Attribute::computed_string()
					.use_state_for_unknown()
					.with_description("The AWS account that owns the deployment"),
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
}

fn missing_account_id(summary: &str) -> Diagnostics {
	Diagnostic::error(summary, "The deployment state has no owner account id.").into()
}

async fn create(
	provider: &ProviderConfiguration,
	request: CreateRequest,
) -> Result<HandlerResponse, Diagnostics> {
	let data: DeploymentResourceData = decode_model(request.config, "deployment configuration")?;
	let account =
		provider.enroll_account_client.create_account(&data.request()).await.map_err(|err| {
			error_diagnostic(
				"Could not create deployment",
				"The account could not be enrolled in the deployment pipeline",
				&err,
			)
		})?;

	Ok(state_response(&DeploymentResourceData::from_domain(account))?)
}

async fn read(
	provider: &ProviderConfiguration,
	request: ReadRequest,
) -> Result<HandlerResponse, Diagnostics> {
	let data: DeploymentResourceData = decode_model(request.state, "deployment state")?;
	let Some(id) = data.account_id() else {
		return Err(missing_account_id("Unable to read deployment"));
	};

	match provider.enroll_account_client.read_account(id).await {
		Ok(remote) => Ok(state_response(&DeploymentResourceData::from_domain(remote))?),
		Err(err) if err.is_not_found() => Ok(removed_from_remote("deployment", id)),
		Err(err) => Err(error_diagnostic(
			"Unable to read deployment",
			format_args!("Can't read deployment {id} from remote"),
			&err,
		)
		.into()),
	}
}

async fn update(
	provider: &ProviderConfiguration,
	request: UpdateRequest,
) -> Result<HandlerResponse, Diagnostics> {
	let mut data: DeploymentResourceData = decode_model(request.plan, "deployment plan")?;
	let prior: DeploymentResourceData = decode_model(request.state, "deployment state")?;
	let Some(id) = prior.account_id().or(data.account_id()).map(str::to_owned) else {
		return Err(missing_account_id("Unable to update deployment"));
	};

	provider.enroll_account_client.update_account(&id, &data.request()).await.map_err(|err| {
		error_diagnostic(
			"Unable to update deployment",
			format_args!("Can't update deployment {id} in remote"),
			&err,
		)
	})?;

	data.id = Some(id.clone());
	data.owner_account_id = Some(id);

	Ok(state_response(&data)?)
}

async fn delete(
	provider: &ProviderConfiguration,
	request: DeleteRequest,
) -> Result<HandlerResponse, Diagnostics> {
	let data: DeploymentResourceData = decode_model(request.state, "deployment state")?;
	let Some(id) = data.account_id() else {
		return Ok(HandlerResponse::removed());
	};

	match provider.enroll_account_client.delete_account(id).await {
		Ok(()) => Ok(HandlerResponse::removed()),
		Err(err) if err.is_not_found() => Ok(HandlerResponse::removed()),
		Err(err) => Err(error_diagnostic(
			"Unable to delete deployment",
			format_args!("Can't delete deployment {id} in remote"),
			&err,
		)
		.into()),
	}
}
