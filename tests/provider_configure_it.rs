// self
use terraform_provider_vy::{
	_preludet::*,
	plugin::{CreateRequest, ImportRequest},
	provider::VyProvider,
};

#[test]
fn configure_builds_environment_specific_clients() {
	let provider = VyProvider::new("1.2.3");
	let diagnostics = provider.configure(json!({ "environment": "test" }));

	assert!(diagnostics.is_empty(), "Unexpected diagnostics: {diagnostics:?}");

	let configuration = provider.configuration().expect("Provider should be configured.");

	assert_eq!(configuration.environment, "test");
	assert_eq!(
		configuration.cognito_client.base_url().as_str(),
		"https://delegated.test.cognito.vydev.io/"
	);
	assert_eq!(
		configuration.enroll_account_client.base_url().as_str(),
		"https://enroll.vydeployment.vydev.io/"
	);
}

#[test]
fn configure_honors_overrides_and_warns_on_non_prod_deployment_service() {
	let provider = VyProvider::new("1.2.3");
	let diagnostics = provider.configure(json!({
		"environment": "prod",
		"central_cognito_base_url": "cognito.example.com",
		"enroll_account_base_url": "deploy.example.com",
		"deployment_service_environment": "dev",
	}));

	assert!(!diagnostics.has_error());
	assert_eq!(
		diagnostics.warnings().next().map(|d| d.summary.as_str()),
		Some("Non-prod deployment service environment")
	);

	let configuration = provider.configuration().expect("Provider should be configured.");

	assert_eq!(
		configuration.cognito_client.base_url().as_str(),
		"https://delegated.cognito.example.com/"
	);
	assert_eq!(
		configuration.version_handler_client.base_url().as_str(),
		"https://version-handler.dev.deploy.example.com/"
	);
}

#[test]
fn configure_requires_environment() {
	let provider = VyProvider::new("1.2.3");
	let diagnostics = provider.configure(json!({ "central_cognito_base_url": "cognito.vydev.io" }));
	let error = diagnostics.errors().next().expect("Missing environment should be reported.");

	assert_eq!(error.summary, "Missing required argument");
	assert_eq!(error.attribute.as_deref(), Some("environment"));
	assert!(!provider.is_configured());
}

#[tokio::test]
async fn operations_before_configure_are_rejected() {
	let provider = VyProvider::new("1.2.3");
	let response = provider
		.create("vy_app_client", CreateRequest { config: json!({ "name": "web" }) })
		.await;

	assert_eq!(
		response.diagnostics.errors().next().map(|d| d.summary.as_str()),
		Some("Unconfigured provider")
	);
}

#[tokio::test]
async fn unknown_resource_types_are_rejected() {
	let provider = build_test_provider("http://127.0.0.1:1");
	let response = provider
		.create("vy_lambda", CreateRequest { config: json!({ "name": "web" }) })
		.await;

	assert_eq!(
		response.diagnostics.errors().next().map(|d| d.summary.as_str()),
		Some("Unknown resource type")
	);
}

#[test]
fn import_rejects_blank_identifiers() {
	let provider = build_test_provider("http://127.0.0.1:1");
	let response =
		provider.import_resource_state("vy_app_client", ImportRequest { id: "  ".into() });

	assert_eq!(
		response.diagnostics.errors().next().map(|d| d.summary.as_str()),
		Some("Invalid import identifier")
	);
}

#[test]
fn schemas_are_keyed_by_full_type_name() {
	let provider = VyProvider::new("1.2.3");

	assert_eq!(
		provider.resource_schemas().keys().map(String::as_str).collect::<Vec<_>>(),
		["vy_app_client", "vy_deployment", "vy_resource_server"]
	);
	assert_eq!(
		provider.data_source_schemas().keys().map(String::as_str).collect::<Vec<_>>(),
		["vy_artifact_version", "vy_cognito_info"]
	);
	assert_eq!(provider.metadata().type_name, "vy");
}
