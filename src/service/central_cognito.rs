//! Client for the central Cognito delegation service.
//!
//! The service manages app clients and resource servers inside the shared user pool and
//! publishes the pool's public coordinates under `/info`.

// self
use crate::{
	_prelude::*,
	http::ReqwestHttpClient,
	service::{ServiceClient, Subject},
};

const APP_CLIENTS: &str = "app-clients";
const RESOURCE_SERVERS: &str = "resource-servers";

/// Kind of app client; decides which OAuth flows Cognito enables for it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppClientType {
	/// Browser-facing client using the authorization code flow with callbacks.
	Frontend,
	#[default]
	/// Machine-to-machine client using client credentials.
	Backend,
}
impl AppClientType {
	/// Returns the wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Frontend => "frontend",
			Self::Backend => "backend",
		}
	}
}
impl Display for AppClientType {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl FromStr for AppClientType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"frontend" => Ok(Self::Frontend),
			"backend" => Ok(Self::Backend),
			other => Err(format!("Unknown app client type `{other}`.")),
		}
	}
}

/// Redacted client secret keeping Cognito credentials out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientSecret(String);
impl ClientSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner secret. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl Debug for ClientSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ClientSecret").field(&"<redacted>").finish()
	}
}

/// App client as stored by the service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppClient {
	/// Unique app client name.
	pub name: String,
	/// Fully qualified scopes (`<resource server>/<scope>` or OIDC scopes).
	#[serde(default)]
	pub scopes: Vec<String>,
	/// Client kind.
	#[serde(rename = "type", default)]
	pub client_type: AppClientType,
	/// Allowed OAuth callback URLs.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub callback_urls: Vec<String>,
	/// Allowed logout URLs.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub logout_urls: Vec<String>,
	/// Whether Cognito should issue a client secret.
	#[serde(default)]
	pub generate_secret: bool,
	/// Cognito-assigned client identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_id: Option<String>,
	/// Cognito-assigned client secret, if one was generated.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_secret: Option<ClientSecret>,
}

/// Mutable subset of an [`AppClient`] sent on update.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AppClientUpdateRequest {
	/// Name of the app client being updated.
	pub name: String,
	/// Replacement scope list.
	pub scopes: Vec<String>,
	/// Replacement callback URLs.
	pub callback_urls: Vec<String>,
	/// Replacement logout URLs.
	pub logout_urls: Vec<String>,
}
impl From<&AppClient> for AppClientUpdateRequest {
	fn from(client: &AppClient) -> Self {
		Self {
			name: client.name.clone(),
			scopes: client.scopes.clone(),
			callback_urls: client.callback_urls.clone(),
			logout_urls: client.logout_urls.clone(),
		}
	}
}

/// Scope published by a resource server.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceServerScope {
	/// Scope name, unique within the server.
	pub name: String,
	/// Human-readable description.
	pub description: String,
}

/// Resource server as stored by the service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceServer {
	/// Unique identifier, usually a domain such as `service.vydev.io`.
	pub identifier: String,
	/// Display name.
	pub name: String,
	/// Scopes the server exposes.
	#[serde(default)]
	pub scopes: Vec<ResourceServerScope>,
}

/// Public coordinates of the shared user pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CognitoInfo {
	/// Cognito user pool identifier.
	pub user_pool_id: String,
	/// Hosted UI / token endpoint base.
	pub auth_url: String,
	/// JWKS document URL.
	pub jwks_url: String,
	/// Token issuer.
	pub issuer: String,
	/// OpenID discovery document URL.
	pub open_id_url: String,
}

/// Typed client for the central Cognito service.
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

	/// Registers a new app client.
	pub async fn create_app_client(&self, client: &AppClient) -> Result<()> {
		self.inner.post(&[APP_CLIENTS], client).await
	}

	/// Fetches an app client by name.
	pub async fn read_app_client(&self, name: &str) -> Result<AppClient> {
		self.inner.get_json(&[APP_CLIENTS, name], Some(Subject::new("app client", name))).await
	}

	/// Replaces the mutable settings of an existing app client.
	pub async fn update_app_client(&self, request: &AppClientUpdateRequest) -> Result<()> {
		let name = request.name.as_str();

		self.inner.put(&[APP_CLIENTS, name], request, Some(Subject::new("app client", name))).await
	}

	/// Removes an app client.
	pub async fn delete_app_client(&self, name: &str) -> Result<()> {
		self.inner.delete(&[APP_CLIENTS, name], Some(Subject::new("app client", name))).await
	}

	/// Registers a new resource server.
	pub async fn create_resource_server(&self, server: &ResourceServer) -> Result<()> {
		self.inner.post(&[RESOURCE_SERVERS], server).await
	}

	/// Fetches a resource server by identifier.
	pub async fn read_resource_server(&self, identifier: &str) -> Result<ResourceServer> {
		self.inner
			.get_json(
				&[RESOURCE_SERVERS, identifier],
				Some(Subject::new("resource server", identifier)),
			)
			.await
	}

	/// Replaces an existing resource server.
	pub async fn update_resource_server(&self, server: &ResourceServer) -> Result<()> {
		let identifier = server.identifier.as_str();

		self.inner
			.put(
				&[RESOURCE_SERVERS, identifier],
				server,
				Some(Subject::new("resource server", identifier)),
			)
			.await
	}

	/// Removes a resource server.
	pub async fn delete_resource_server(&self, identifier: &str) -> Result<()> {
		self.inner
			.delete(
				&[RESOURCE_SERVERS, identifier],
				Some(Subject::new("resource server", identifier)),
			)
			.await
	}

	/// Reads the shared user pool coordinates.
	pub async fn read_info(&self) -> Result<CognitoInfo> {
		self.inner.get_json(&["info"], None).await
	}
}
