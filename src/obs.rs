//! Optional observability helpers for provider operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `terraform_provider_vy.operation` with the
//!   `operation` and `type_name` fields. Finished spans carry `outcome` plus `errors` and
//!   `warnings` counts, error diagnostics are logged at `warn`, and every service call emits
//!   `debug` events.
//! - Enable `metrics` to increment the `terraform_provider_vy_operation_total` counter for every
//!   attempt/success/failure, labeled by `operation`, `type_name`, and `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations the host can invoke on the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Provider configuration.
	Configure,
	/// Resource creation.
	Create,
	/// Resource refresh.
	Read,
	/// Resource update.
	Update,
	/// Resource deletion.
	Delete,
	/// Resource import.
	Import,
	/// Data source read.
	ReadDataSource,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Configure => "configure",
			OperationKind::Create => "create",
			OperationKind::Read => "read",
			OperationKind::Update => "update",
			OperationKind::Delete => "delete",
			OperationKind::Import => "import",
			OperationKind::ReadDataSource => "read_data_source",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to a provider operation.
	Attempt,
	/// Completed without error diagnostics.
	Success,
	/// Completed with at least one error diagnostic.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}

	/// Classifies a finished operation by whether it produced errors.
	pub const fn from_has_error(has_error: bool) -> Self {
		if has_error { OperationOutcome::Failure } else { OperationOutcome::Success }
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
