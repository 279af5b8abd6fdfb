//! Drives a `vy_app_client` through create, read, and delete against a mock Cognito service,
//! the same sequence the host runs for `terraform apply` followed by `terraform destroy`.

// crates.io
use color_eyre::{Result, eyre::eyre};
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use terraform_provider_vy::{
	http::ReqwestHttpClient,
	plugin::{CreateRequest, DeleteRequest, ReadRequest},
	provider::{ProviderConfiguration, VyProvider},
	service::{central_cognito, enroll_account, version_handler},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let create_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/app-clients");
			then.status(201);
		})
		.await;
	let read_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/app-clients/demo-client");
			then.status(200).json_body(json!({
				"name": "demo-client",
				"scopes": ["trafficinfo.vydev.io/read"],
				"type": "backend",
				"generate_secret": true,
				"client_id": "4c1ient1d",
				"client_secret": "demo-secret",
			}));
		})
		.await;
	let delete_mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/app-clients/demo-client");
			then.status(204);
		})
		.await;
	let base_url = Url::parse(&server.base_url())?;
	let http = ReqwestHttpClient::default();
	let provider = VyProvider::new(env!("CARGO_PKG_VERSION")).with_configuration(
		ProviderConfiguration {
			environment: "demo".into(),
			cognito_client: central_cognito::Client::with_http_client(
				base_url.clone(),
				http.clone(),
			),
			enroll_account_client: enroll_account::Client::with_http_client(
				base_url.clone(),
				http.clone(),
			),
			version_handler_client: version_handler::Client::with_http_client(base_url, http),
		},
	);
	let created = provider
		.create(
			"vy_app_client",
			CreateRequest {
				config: json!({
					"name": "demo-client",
					"scopes": ["trafficinfo.vydev.io/read"],
					"generate_secret": true,
				}),
			},
		)
		.await;
	let state = created.state.ok_or_else(|| eyre!("Create failed: {:?}", created.diagnostics))?;

	println!("Created app client with id {}.", state["client_id"]);

	let refreshed = provider.read("vy_app_client", ReadRequest { state }).await;
	let state =
		refreshed.state.ok_or_else(|| eyre!("Read failed: {:?}", refreshed.diagnostics))?;

	println!("Refreshed scopes: {}.", state["scopes"]);

	let deleted = provider.delete("vy_app_client", DeleteRequest { state }).await;

	if deleted.diagnostics.has_error() {
		return Err(eyre!("Delete failed: {:?}", deleted.diagnostics));
	}

	create_mock.assert_async().await;
	read_mock.assert_calls_async(2).await;
	delete_mock.assert_async().await;

	println!("App client lifecycle completed.");

	Ok(())
}
