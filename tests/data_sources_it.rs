// crates.io
use httpmock::prelude::*;
// self
use terraform_provider_vy::{_preludet::*, plugin::ReadDataSourceRequest};

#[tokio::test]
async fn cognito_info_reads_pool_coordinates() {
	let server = MockServer::start_async().await;
	let provider = build_test_provider(&server.base_url());
	let info = server
		.mock_async(|when, then| {
			when.method(GET).path("/info");
			then.status(200).json_body(json!({
				"user_pool_id": "eu-west-1_abc",
				"auth_url": "https://auth.cognito.vydev.io",
				"jwks_url": "https://cognito.vydev.io/.well-known/jwks.json",
				"issuer": "https://cognito.vydev.io",
				"open_id_url": "https://cognito.vydev.io/.well-known/openid-configuration",
			}));
		})
		.await;
	let response = provider
		.read_data_source("vy_cognito_info", ReadDataSourceRequest { config: json!({}) })
		.await;
	let state = response.state.expect("Cognito info should be returned.");

	assert!(response.diagnostics.is_empty());
	assert_eq!(state["id"], json!("eu-west-1_abc"));
	assert_eq!(state["issuer"], json!("https://cognito.vydev.io"));

	info.assert_async().await;
}

#[tokio::test]
async fn cognito_info_reports_malformed_payloads() {
	let server = MockServer::start_async().await;
	let provider = build_test_provider(&server.base_url());
	let info = server
		.mock_async(|when, then| {
			when.method(GET).path("/info");
			then.status(200).json_body(json!({ "user_pool_id": "eu-west-1_abc" }));
		})
		.await;
	let response = provider
		.read_data_source("vy_cognito_info", ReadDataSourceRequest { config: json!({}) })
		.await;
	let error = response.diagnostics.errors().next().expect("Malformed info should fail.");

	assert!(response.state.is_none());
	assert_eq!(error.summary, "Unable to read Cognito info");

	info.assert_async().await;
}

#[tokio::test]
async fn artifact_version_reads_latest_upload() {
	let server = MockServer::start_async().await;
	let provider = build_test_provider(&server.base_url());
	let version = server
		.mock_async(|when, then| {
			when.method(GET).path("/versions/trafficinfo");
			then.status(200).json_body(json!({
				"store": "vy-artifacts",
				"path": "trafficinfo/lambda.zip",
				"version": "abc123",
				"last_updated": "2024-05-01T12:30:00Z",
			}));
		})
		.await;
	let response = provider
		.read_data_source(
			"vy_artifact_version",
			ReadDataSourceRequest { config: json!({ "application": "trafficinfo" }) },
		)
		.await;

	assert!(response.diagnostics.is_empty(), "Unexpected diagnostics: {:?}", response.diagnostics);
	assert_eq!(
		response.state,
		Some(json!({
			"id": "trafficinfo",
			"application": "trafficinfo",
			"store": "vy-artifacts",
			"path": "trafficinfo/lambda.zip",
			"version": "abc123",
			"uri": "s3://vy-artifacts/trafficinfo/lambda.zip",
			"last_updated": "2024-05-01T12:30:00Z",
		}))
	);

	version.assert_async().await;
}

#[tokio::test]
async fn artifact_version_reports_unknown_application() {
	let server = MockServer::start_async().await;
	let provider = build_test_provider(&server.base_url());
	let version = server
		.mock_async(|when, then| {
			when.method(GET).path("/versions/ghost");
			then.status(404);
		})
		.await;
	let response = provider
		.read_data_source(
			"vy_artifact_version",
			ReadDataSourceRequest { config: json!({ "application": "ghost" }) },
		)
		.await;
	let error = response.diagnostics.errors().next().expect("Unknown application should fail.");

	assert_eq!(error.summary, "Unable to read artifact version");
	assert!(error.detail.contains("ghost"));

	version.assert_async().await;
}

#[tokio::test]
async fn unknown_data_source_is_rejected() {
	let provider = build_test_provider("http://127.0.0.1:1");
	let response = provider
		.read_data_source("vy_unknown", ReadDataSourceRequest { config: json!({}) })
		.await;

	assert_eq!(
		response.diagnostics.errors().next().map(|d| d.summary.as_str()),
		Some("Unknown data source type")
	);
}
