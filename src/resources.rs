//! Managed resources exposed by the provider.
//!
//! Every resource follows the same shape: decode the host value into a state model, convert it
//! into the service's domain type, make one REST call, and map the answer back into state.

pub mod app_client;
pub mod deployment;
pub mod resource_server;

pub use app_client::AppClientResource;
pub use deployment::DeploymentResource;
pub use resource_server::ResourceServerResource;

// self
use crate::{
	_prelude::*,
	diag::Diagnostic,
	plugin::{HandlerResponse, encode_model},
};

/// Builds the response for a read whose remote object disappeared.
///
/// The object is dropped from state so the next plan recreates it.
pub(crate) fn removed_from_remote(kind: &str, id: &str) -> HandlerResponse {
	HandlerResponse::removed().with_diagnostic(Diagnostic::warning(
		format!("{} not found", capitalize(kind)),
		format!("The {kind} {id} no longer exists in remote and will be removed from state."),
	))
}

/// Encodes `model` as the response state.
pub(crate) fn state_response<T>(model: &T) -> Result<HandlerResponse, Diagnostic>
where
	T: Serialize,
{
	encode_model(model, "state").map(HandlerResponse::with_state)
}

/// Keeps `None` when the user left a list unset and the remote reports it empty, so refreshes
/// do not produce a spurious `null` -> `[]` diff.
pub(crate) fn list_from_remote<T>(remote: Vec<T>, prior: &Option<Vec<T>>) -> Option<Vec<T>> {
	if remote.is_empty() && prior.is_none() { None } else { Some(remote) }
}

fn capitalize(kind: &str) -> String {
	let mut chars = kind.chars();

	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}
