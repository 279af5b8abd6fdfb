//! Terraform provider for Vy's internal services: Cognito app clients, resource servers,
//! deployment enrollment, and the data sources that read them back.
//!
//! The host runtime owns planning, diffing, and the plugin protocol. This crate exposes the
//! provider surface that protocol layer calls into: schemas, diagnostics, and per-resource CRUD
//! handlers that translate between Terraform state and REST calls.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod data_sources;
pub mod diag;
pub mod error;
pub mod http;
pub mod obs;
pub mod plugin;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod service;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		http::ReqwestHttpClient,
		provider::{ProviderConfiguration, VyProvider},
		service::{central_cognito, enroll_account, version_handler},
	};

	/// Environment name used by test configurations.
	pub const TEST_ENVIRONMENT: &str = "test";

	/// Builds a configuration whose three service clients all target `base_url`.
	///
	/// Mock servers listen on plain HTTP, so the URL is taken verbatim instead of going
	/// through the environment-prefixed host construction used by `configure`.
	pub fn test_configuration(base_url: &str) -> ProviderConfiguration {
		let base_url = Url::parse(base_url).expect("Mock server URL should parse.");
		let http = ReqwestHttpClient::default();

		ProviderConfiguration {
			environment: TEST_ENVIRONMENT.into(),
			cognito_client: central_cognito::Client::with_http_client(
				base_url.clone(),
				http.clone(),
			),
			enroll_account_client: enroll_account::Client::with_http_client(
				base_url.clone(),
				http.clone(),
			),
			version_handler_client: version_handler::Client::with_http_client(base_url, http),
		}
	}

	/// Constructs a [`VyProvider`] that is already configured against `base_url`.
	pub fn build_test_provider(base_url: &str) -> VyProvider {
		VyProvider::new("test").with_configuration(test_configuration(base_url))
	}
}

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError, StatusCode};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map, Value, json};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use serde_json;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, tokio as _};
