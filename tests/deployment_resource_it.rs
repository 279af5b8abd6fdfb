// crates.io
use httpmock::prelude::*;
// self
use terraform_provider_vy::{
	_preludet::*,
	plugin::{CreateRequest, DeleteRequest, ImportRequest, ReadRequest, UpdateRequest},
};

const TYPE_NAME: &str = "vy_deployment";
const ACCOUNT_ID: &str = "123456789012";

fn state(slack_channel: &str) -> Value {
	json!({
		"id": ACCOUNT_ID,
		"slack_channel": slack_channel,
		"owner_account_id": ACCOUNT_ID,
	})
}

#[tokio::test]
async fn create_enrolls_account_and_stores_owner() {
	let server = MockServer::start_async().await;
	let provider = build_test_provider(&server.base_url());
	let create = server
		.mock_async(|when, then| {
			when.method(POST).path("/accounts").json_body(json!({ "slack_channel": "#deploys" }));
			then.status(201)
				.json_body(json!({ "owner_account_id": ACCOUNT_ID, "slack_channel": "#deploys" }));
		})
		.await;
	let response = provider
		.create(TYPE_NAME, CreateRequest { config: json!({ "slack_channel": "#deploys" }) })
		.await;

	assert!(response.diagnostics.is_empty(), "Unexpected diagnostics: {:?}", response.diagnostics);
	assert_eq!(response.state, Some(state("#deploys")));

	create.assert_async().await;
}

#[tokio::test]
async fn create_rejects_computed_owner_in_config() {
	let server = MockServer::start_async().await;
	let provider = build_test_provider(&server.base_url());
	let response = provider
		.create(
			TYPE_NAME,
			CreateRequest {
				config: json!({ "slack_channel": "#deploys", "owner_account_id": ACCOUNT_ID }),
			},
		)
		.await;
	let error = response.diagnostics.errors().next().expect("Computed input should be rejected.");

	assert_eq!(error.attribute.as_deref(), Some("owner_account_id"));
}

#[tokio::test]
async fn read_refreshes_slack_channel() {
	let server = MockServer::start_async().await;
	let provider = build_test_provider(&server.base_url());
	let read = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/accounts/{ACCOUNT_ID}"));
			then.status(200)
				.json_body(json!({ "owner_account_id": ACCOUNT_ID, "slack_channel": "#ops" }));
		})
		.await;
	let response = provider.read(TYPE_NAME, ReadRequest { state: state("#deploys") }).await;

	assert_eq!(response.state, Some(state("#ops")));

	read.assert_async().await;
}

#[tokio::test]
async fn read_after_import_uses_id() {
	let server = MockServer::start_async().await;
	let provider = build_test_provider(&server.base_url());
	let read = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/accounts/{ACCOUNT_ID}"));
			then.status(200)
				.json_body(json!({ "owner_account_id": ACCOUNT_ID, "slack_channel": "#deploys" }));
		})
		.await;
	let imported = provider
		.import_resource_state(TYPE_NAME, ImportRequest { id: ACCOUNT_ID.into() })
		.state
		.expect("Import should seed state.");
	let response = provider.read(TYPE_NAME, ReadRequest { state: imported }).await;

	assert_eq!(response.state, Some(state("#deploys")));

	read.assert_async().await;
}

#[tokio::test]
async fn update_puts_new_channel() {
	let server = MockServer::start_async().await;
	let provider = build_test_provider(&server.base_url());
	let update = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path(format!("/accounts/{ACCOUNT_ID}"))
				.json_body(json!({ "slack_channel": "#ops" }));
			then.status(200);
		})
		.await;
	let response = provider
		.update(TYPE_NAME, UpdateRequest { plan: state("#ops"), state: state("#deploys") })
		.await;

	assert!(response.diagnostics.is_empty());
	assert_eq!(response.state, Some(state("#ops")));

	update.assert_async().await;
}

#[tokio::test]
async fn delete_unenrolls_account() {
	let server = MockServer::start_async().await;
	let provider = build_test_provider(&server.base_url());
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path(format!("/accounts/{ACCOUNT_ID}"));
			then.status(204);
		})
		.await;
	let response = provider.delete(TYPE_NAME, DeleteRequest { state: state("#deploys") }).await;

	assert!(response.state.is_none());
	assert!(response.diagnostics.is_empty());

	delete.assert_async().await;
}

#[tokio::test]
async fn delete_treats_missing_remote_as_deleted() {
	let server = MockServer::start_async().await;
	let provider = build_test_provider(&server.base_url());
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path(format!("/accounts/{ACCOUNT_ID}"));
			then.status(404);
		})
		.await;
	let response = provider.delete(TYPE_NAME, DeleteRequest { state: state("#deploys") }).await;

	assert!(response.state.is_none());
	assert!(response.diagnostics.is_empty());

	delete.assert_async().await;
}

#[tokio::test]
async fn read_removes_state_when_remote_is_gone() {
	let server = MockServer::start_async().await;
	let provider = build_test_provider(&server.base_url());
	let read = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/accounts/{ACCOUNT_ID}"));
			then.status(404);
		})
		.await;
	let response = provider.read(TYPE_NAME, ReadRequest { state: state("#deploys") }).await;
	let warning =
		response.diagnostics.warnings().next().expect("A missing account should be reported.");

	assert!(response.state.is_none());
	assert!(!response.diagnostics.has_error());
	assert_eq!(warning.summary, "Deployment not found");

	read.assert_async().await;
}

#[tokio::test]
async fn read_failure_keeps_prior_state() {
	let server = MockServer::start_async().await;
	let provider = build_test_provider(&server.base_url());
	let read = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/accounts/{ACCOUNT_ID}"));
			then.status(500);
		})
		.await;
	let response = provider.read(TYPE_NAME, ReadRequest { state: state("#deploys") }).await;
	let error = response.diagnostics.errors().next().expect("Read should report an error.");

	assert_eq!(response.state, Some(state("#deploys")));
	assert_eq!(error.summary, "Unable to read deployment");

	read.assert_async().await;
}

#[tokio::test]
async fn read_with_blank_owner_uses_id() {
	let server = MockServer::start_async().await;
	let provider = build_test_provider(&server.base_url());
	let read = server
		.mock_async(|when, then| {
			when.method(GET).path(format!("/accounts/{ACCOUNT_ID}"));
			then.status(200)
				.json_body(json!({ "owner_account_id": ACCOUNT_ID, "slack_channel": "#deploys" }));
		})
		.await;
	let mut prior = state("#deploys");

	prior["owner_account_id"] = json!("");

	let response = provider.read(TYPE_NAME, ReadRequest { state: prior }).await;

	assert_eq!(response.state, Some(state("#deploys")));

	read.assert_async().await;
}
