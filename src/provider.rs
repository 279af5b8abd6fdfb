//! The `vy` provider: configuration, handler registry, and operation dispatch.
//!
//! [`VyProvider::configure`] turns the provider block into a [`ProviderConfiguration`] holding
//! one client per backing service. Every dispatched operation looks up the handler by its full
//! type name, validates the incoming value against the handler schema, and runs the handler
//! inside an [`OperationSpan`] while recording the outcome.

// self
use crate::{
	_prelude::*,
	data_sources::{ArtifactVersionDataSource, CognitoInfoDataSource},
	diag::{Diagnostic, Diagnostics},
	error::ConfigError,
	http::ReqwestHttpClient,
	obs::{OperationKind, OperationSpan},
	plugin::{
		CreateRequest, DataSource, DeleteRequest, HandlerResponse, ImportRequest,
		ReadDataSourceRequest, ReadRequest, Resource, UpdateRequest, decode_model,
	},
	resources::{AppClientResource, DeploymentResource, ResourceServerResource},
	schema::{Attribute, Schema},
	service::{central_cognito, enroll_account, version_handler},
};

/// Provider type name; every resource and data source is prefixed with `vy_`.
pub const PROVIDER_TYPE_NAME: &str = "vy";
/// Default domain of the central Cognito service.
pub const DEFAULT_CENTRAL_COGNITO_BASE_URL: &str = "cognito.vydev.io";
/// Default domain of the deployment services.
pub const DEFAULT_ENROLL_ACCOUNT_BASE_URL: &str = "vydeployment.vydev.io";
/// Environment of the deployment services unless overridden.
pub const DEFAULT_DEPLOYMENT_SERVICE_ENVIRONMENT: &str = "prod";

/// Builds a service host from its base domain, service prefix, and environment.
///
/// Production hosts omit the environment label: `delegated.cognito.vydev.io` versus
/// `delegated.test.cognito.vydev.io`.
pub fn url_from_environment(base_url: &str, url_prefix: &str, environment: &str) -> String {
	if environment == "prod" {
		format!("{url_prefix}.{base_url}")
	} else {
		format!("{url_prefix}.{environment}.{base_url}")
	}
}

/// Decoded provider block.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ProviderModel {
	/// Override for the Cognito service domain.
	#[serde(default)]
	pub central_cognito_base_url: Option<String>,
	/// Override for the deployment services domain.
	#[serde(default)]
	pub enroll_account_base_url: Option<String>,
	/// Environment to provision in.
	pub environment: String,
	/// Environment of the deployment services (testing only).
	#[serde(default)]
	pub deployment_service_environment: Option<String>,
}

/// Configured clients shared with every resource and data source.
#[derive(Clone, Debug)]
pub struct ProviderConfiguration {
	/// Environment to provision in.
	pub environment: String,
	/// Central Cognito client.
	pub cognito_client: central_cognito::Client,
	/// Deployment enrollment client.
	pub enroll_account_client: enroll_account::Client,
	/// Artifact version handler client.
	pub version_handler_client: version_handler::Client,
}
impl ProviderConfiguration {
	/// Builds the three service clients described by `model`, sharing `http`.
	pub fn from_model(model: &ProviderModel, http: ReqwestHttpClient) -> Result<Self> {
		let cognito_domain =
			model.central_cognito_base_url.as_deref().unwrap_or(DEFAULT_CENTRAL_COGNITO_BASE_URL);
		let enroll_domain =
			model.enroll_account_base_url.as_deref().unwrap_or(DEFAULT_ENROLL_ACCOUNT_BASE_URL);
		let deployment_environment = model
			.deployment_service_environment
			.as_deref()
			.unwrap_or(DEFAULT_DEPLOYMENT_SERVICE_ENVIRONMENT);
		let cognito_url =
			https_url(&url_from_environment(cognito_domain, "delegated", &model.environment))?;
		let enroll_url =
			https_url(&url_from_environment(enroll_domain, "enroll", deployment_environment))?;
		let version_url = https_url(&url_from_environment(
			enroll_domain,
			"version-handler",
			deployment_environment,
		))?;

		Ok(Self {
			environment: model.environment.clone(),
			cognito_client: central_cognito::Client::with_http_client(cognito_url, http.clone()),
			enroll_account_client: enroll_account::Client::with_http_client(
				enroll_url,
				http.clone(),
			),
			version_handler_client: version_handler::Client::with_http_client(version_url, http),
		})
	}
}

fn https_url(host: &str) -> Result<Url> {
	let raw = format!("https://{host}/");

	Url::parse(&raw).map_err(|source| ConfigError::InvalidBaseUrl { url: raw, source }.into())
}

/// Provider identity reported to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderMetadata {
	/// Provider type name.
	pub type_name: &'static str,
	/// Provider version (`dev` locally, `test` in tests).
	pub version: String,
}

/// The `vy` provider.
pub struct VyProvider {
	version: String,
	configuration: RwLock<Option<Arc<ProviderConfiguration>>>,
	resources: Vec<Arc<dyn Resource>>,
	data_sources: Vec<Arc<dyn DataSource>>,
}
impl VyProvider {
	/// Creates an unconfigured provider reporting `version`.
	pub fn new(version: impl Into<String>) -> Self {
		Self {
			version: version.into(),
			configuration: RwLock::new(None),
			resources: vec![
				Arc::new(ResourceServerResource),
				Arc::new(AppClientResource),
				Arc::new(DeploymentResource),
			],
			data_sources: vec![
				Arc::new(CognitoInfoDataSource),
				Arc::new(ArtifactVersionDataSource),
			],
		}
	}

	/// Installs a pre-built configuration, skipping [`VyProvider::configure`].
	pub fn with_configuration(self, configuration: ProviderConfiguration) -> Self {
		*self.configuration.write() = Some(Arc::new(configuration));

		self
	}

	/// Provider identity.
	pub fn metadata(&self) -> ProviderMetadata {
		ProviderMetadata { type_name: PROVIDER_TYPE_NAME, version: self.version.clone() }
	}

	/// Schema of the provider block.
	pub fn schema(&self) -> Schema {
		Schema::new("A provider for interacting with Vy's internal services.")
			.with_attribute(
				"central_cognito_base_url",
				Attribute::optional_string()
					.with_description("The base url for the central-cognito service"),
			)
			.with_attribute(
				"enroll_account_base_url",
				Attribute::optional_string()
					.with_description("The base url for the deployment enrollment service"),
			)
			.with_attribute(
				"environment",
				Attribute::required_string().with_description("The environment to provision in"),
			)
			.with_attribute(
				"deployment_service_environment",
				Attribute::optional_string().with_description(
					"The environment of the deployment service (this should be left blank unless \
					 you're testing the deployment service)",
				),
			)
	}

	/// Configures the service clients from the provider block.
	pub fn configure(&self, config: Value) -> Diagnostics {
		let span = OperationSpan::start(OperationKind::Configure, PROVIDER_TYPE_NAME);
		let _guard = span.enter();
		let diagnostics = self.configure_inner(config);

		span.finish(&diagnostics);

		diagnostics
	}

	fn configure_inner(&self, config: Value) -> Diagnostics {
		let mut diagnostics = self.schema().validate_config(&config);

		if diagnostics.has_error() {
			return diagnostics;
		}

		let model = match decode_model::<ProviderModel>(config, "provider configuration") {
			Ok(model) => model,
			Err(diagnostic) => {
				diagnostics.push(diagnostic);

				return diagnostics;
			},
		};

		if model.deployment_service_environment.is_some() {
			diagnostics.add_warning(
				"Non-prod deployment service environment",
				"You have selected a non-prod deployment service environment. This should only be \
				 done while testing the deployment service.",
			);
		}

		let configuration = ReqwestHttpClient::with_user_agent(&self.version)
			.map_err(Error::from)
			.and_then(|http| ProviderConfiguration::from_model(&model, http));

		match configuration {
			Ok(configuration) => {
				#[cfg(feature = "tracing")]
				tracing::info!(
					environment = %configuration.environment,
					cognito = %configuration.cognito_client.base_url(),
					"Provider configured."
				);

				*self.configuration.write() = Some(Arc::new(configuration));
			},
			Err(err) => diagnostics.add_error(
				"Unable to configure provider",
				format!("The service clients could not be created: {err}"),
			),
		}

		diagnostics
	}

	/// Returns the active configuration, if any.
	pub fn configuration(&self) -> Option<Arc<ProviderConfiguration>> {
		self.configuration.read().clone()
	}

	/// Returns true once [`VyProvider::configure`] succeeded.
	pub fn is_configured(&self) -> bool {
		self.configuration.read().is_some()
	}

	/// Registered resource handlers.
	pub fn resources(&self) -> &[Arc<dyn Resource>] {
		&self.resources
	}

	/// Registered data source handlers.
	pub fn data_sources(&self) -> &[Arc<dyn DataSource>] {
		&self.data_sources
	}

	/// Resource schemas keyed by full type name.
	pub fn resource_schemas(&self) -> BTreeMap<String, Schema> {
		self.resources.iter().map(|r| (full_type_name(r.type_name()), r.schema())).collect()
	}

	/// Data source schemas keyed by full type name.
	pub fn data_source_schemas(&self) -> BTreeMap<String, Schema> {
		self.data_sources.iter().map(|d| (full_type_name(d.type_name()), d.schema())).collect()
	}

	/// Creates a resource.
	pub async fn create(&self, type_name: &str, request: CreateRequest) -> HandlerResponse {
		record(OperationSpan::start(OperationKind::Create, type_name), async {
			let (resource, configuration) = match self.prepare_resource(type_name) {
				Ok(prepared) => prepared,
				Err(response) => return response,
			};
			let diagnostics = resource.schema().validate_config(&request.config);

			if diagnostics.has_error() {
				return HandlerResponse::failed(diagnostics);
			}

			resource.create(&configuration, request).await
		})
		.await
	}

	/// Refreshes a resource from its remote object.
	///
	/// Failures keep the prior state; only a successful read may drop the object.
	pub async fn read(&self, type_name: &str, request: ReadRequest) -> HandlerResponse {
		record(OperationSpan::start(OperationKind::Read, type_name), async {
			let (resource, configuration) = match self.prepare_resource(type_name) {
				Ok(prepared) => prepared,
				Err(response) =>
					return HandlerResponse::failed_with_state(request.state, response.diagnostics),
			};

			resource.read(&configuration, request).await
		})
		.await
	}

	/// Updates a resource.
	///
	/// Failures keep the prior state.
	pub async fn update(&self, type_name: &str, request: UpdateRequest) -> HandlerResponse {
		record(OperationSpan::start(OperationKind::Update, type_name), async {
			let (resource, configuration) = match self.prepare_resource(type_name) {
				Ok(prepared) => prepared,
				Err(response) =>
					return HandlerResponse::failed_with_state(request.state, response.diagnostics),
			};
			let diagnostics = resource.schema().validate_plan(&request.plan);

			if diagnostics.has_error() {
				return HandlerResponse::failed_with_state(request.state, diagnostics);
			}

			resource.update(&configuration, request).await
		})
		.await
	}

	/// Deletes a resource.
	///
	/// Failures keep the prior state so the object stays tracked for the next attempt.
	pub async fn delete(&self, type_name: &str, request: DeleteRequest) -> HandlerResponse {
		record(OperationSpan::start(OperationKind::Delete, type_name), async {
			let (resource, configuration) = match self.prepare_resource(type_name) {
				Ok(prepared) => prepared,
				Err(response) =>
					return HandlerResponse::failed_with_state(request.state, response.diagnostics),
			};

			resource.delete(&configuration, request).await
		})
		.await
	}

	/// Seeds state for `terraform import`.
	pub fn import_resource_state(
		&self,
		type_name: &str,
		request: ImportRequest,
	) -> HandlerResponse {
		let span = OperationSpan::start(OperationKind::Import, type_name);
		let _guard = span.enter();
		let response = match self.find_resource(type_name) {
			None => unknown_type("resource", type_name),
			Some(_) if request.id.trim().is_empty() => HandlerResponse::failed(Diagnostic::error(
				"Invalid import identifier",
				"The import identifier must not be empty.",
			)),
			Some(resource) => resource.import_state(request),
		};

		span.finish(&response.diagnostics);

		response
	}

	/// Reads a data source.
	pub async fn read_data_source(
		&self,
		type_name: &str,
		request: ReadDataSourceRequest,
	) -> HandlerResponse {
		record(OperationSpan::start(OperationKind::ReadDataSource, type_name), async {
			let Some(data_source) = self.find_data_source(type_name) else {
				return unknown_type("data source", type_name);
			};
			let Some(configuration) = self.configuration() else {
				return unconfigured();
			};
			let diagnostics = data_source.schema().validate_config(&request.config);

			if diagnostics.has_error() {
				return HandlerResponse::failed(diagnostics);
			}

			data_source.read(&configuration, request).await
		})
		.await
	}

	fn find_resource(&self, type_name: &str) -> Option<Arc<dyn Resource>> {
		let suffix = strip_provider_prefix(type_name)?;

		self.resources.iter().find(|resource| resource.type_name() == suffix).cloned()
	}

	fn find_data_source(&self, type_name: &str) -> Option<Arc<dyn DataSource>> {
		let suffix = strip_provider_prefix(type_name)?;

		self.data_sources.iter().find(|data_source| data_source.type_name() == suffix).cloned()
	}

	fn prepare_resource(
		&self,
		type_name: &str,
	) -> Result<(Arc<dyn Resource>, Arc<ProviderConfiguration>), HandlerResponse> {
		let resource =
			self.find_resource(type_name).ok_or_else(|| unknown_type("resource", type_name))?;
		let configuration = self.configuration().ok_or_else(unconfigured)?;

		Ok((resource, configuration))
	}
}
impl Debug for VyProvider {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("VyProvider")
			.field("version", &self.version)
			.field("configured", &self.is_configured())
			.finish()
	}
}

async fn record<Fut>(span: OperationSpan, fut: Fut) -> HandlerResponse
where
	Fut: Future<Output = HandlerResponse>,
{
	let response = span.instrument(fut).await;

	span.finish(&response.diagnostics);

	response
}

fn full_type_name(suffix: &str) -> String {
	format!("{PROVIDER_TYPE_NAME}_{suffix}")
}

fn strip_provider_prefix(type_name: &str) -> Option<&str> {
	type_name.strip_prefix(PROVIDER_TYPE_NAME)?.strip_prefix('_')
}

fn unknown_type(kind: &str, type_name: &str) -> HandlerResponse {
	let mut diagnostics = Diagnostics::new();

	diagnostics.add_error(
		format!("Unknown {kind} type"),
		format!("The provider does not implement the {kind} type `{type_name}`."),
	);

	HandlerResponse::failed(diagnostics)
}

fn unconfigured() -> HandlerResponse {
	let mut diagnostics = Diagnostics::new();

	diagnostics.add_error(
		"Unconfigured provider",
		"The provider has not been configured yet. This is always a bug in the host and should \
		 be reported to the provider developers.",
	);

	HandlerResponse::failed(diagnostics)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn url_from_environment_omits_prod_label() {
		assert_eq!(
			url_from_environment("cognito.vydev.io", "delegated", "prod"),
			"delegated.cognito.vydev.io"
		);
		assert_eq!(
			url_from_environment("cognito.vydev.io", "delegated", "test"),
			"delegated.test.cognito.vydev.io"
		);
	}

	#[test]
	fn type_names_are_prefixed() {
		assert_eq!(full_type_name("app_client"), "vy_app_client");
		assert_eq!(strip_provider_prefix("vy_app_client"), Some("app_client"));
		assert_eq!(strip_provider_prefix("vyapp_client"), None);
		assert_eq!(strip_provider_prefix("aws_app_client"), None);
	}

	#[test]
	fn configuration_uses_defaults() {
		let model = ProviderModel {
			central_cognito_base_url: None,
			enroll_account_base_url: None,
			environment: "stage".into(),
			deployment_service_environment: None,
		};
		let configuration = ProviderConfiguration::from_model(&model, ReqwestHttpClient::default())
			.expect("Default configuration should build.");

		assert_eq!(
			configuration.cognito_client.base_url().as_str(),
			"https://delegated.stage.cognito.vydev.io/"
		);
		assert_eq!(
			configuration.enroll_account_client.base_url().as_str(),
			"https://enroll.vydeployment.vydev.io/"
		);
		assert_eq!(
			configuration.version_handler_client.base_url().as_str(),
			"https://version-handler.vydeployment.vydev.io/"
		);
	}

	#[test]
	fn configuration_rejects_unparsable_hosts() {
		let model = ProviderModel {
			central_cognito_base_url: Some("bad host".into()),
			enroll_account_base_url: None,
			environment: "prod".into(),
			deployment_service_environment: None,
		};
		let err = ProviderConfiguration::from_model(&model, ReqwestHttpClient::default())
			.expect_err("Hosts with spaces should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidBaseUrl { .. })));
	}
}
