//! Client for the deployment enrollment service.

// self
use crate::{
	_prelude::*,
	http::ReqwestHttpClient,
	service::{ServiceClient, Subject},
};

const ACCOUNTS: &str = "accounts";

/// Account enrolled in the deployment pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
	/// AWS account that owns the deployment.
	pub owner_account_id: String,
	/// Slack channel receiving deployment notifications.
	pub slack_channel: String,
}

/// Payload sent when enrolling or updating an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRequest {
	/// Slack channel receiving deployment notifications.
	pub slack_channel: String,
}

/// Typed client for the enrollment service.
#[derive(Clone, Debug)]
pub struct Client {
	inner: ServiceClient,
}
impl Client {
	/// Creates a client rooted at `base_url` with a fresh transport.
	pub fn new(base_url: Url) -> Self {
		Self::with_http_client(base_url, ReqwestHttpClient::default())
	}

	/// Creates a client rooted at `base_url` that reuses `http`.
	pub fn with_http_client(base_url: Url, http: ReqwestHttpClient) -> Self {
		Self { inner: ServiceClient::new(base_url, http) }
	}

	/// Root URL of the service.
	pub fn base_url(&self) -> &Url {
		&self.inner.base_url
	}

	/// Enrolls the calling account; the service answers with the stored record.
	pub async fn create_account(&self, request: &AccountRequest) -> Result<Account> {
		self.inner.post_json(&[ACCOUNTS], request).await
	}

	/// Fetches an enrolled account.
	pub async fn read_account(&self, id: &str) -> Result<Account> {
		self.inner.get_json(&[ACCOUNTS, id], Some(Subject::new("deployment", id))).await
	}

	/// Updates an enrolled account.
	pub async fn update_account(&self, id: &str, request: &AccountRequest) -> Result<()> {
		self.inner.put(&[ACCOUNTS, id], request, Some(Subject::new("deployment", id))).await
	}

	/// Removes an account from the deployment pipeline.
	pub async fn delete_account(&self, id: &str) -> Result<()> {
		self.inner.delete(&[ACCOUNTS, id], Some(Subject::new("deployment", id))).await
	}
}
