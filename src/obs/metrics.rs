// self
use crate::obs::{OperationKind, OperationOutcome};

/// Name of the operation counter.
pub const OPERATION_COUNTER: &str = "terraform_provider_vy_operation_total";

/// Records an operation outcome via the global metrics recorder (when enabled).
///
/// Labels are `operation`, the full `type_name` (the provider's own block for configure),
/// and `outcome`.
pub fn record_operation_outcome(kind: OperationKind, type_name: &str, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			OPERATION_COUNTER,
			"operation" => kind.as_str(),
			"type_name" => type_name.to_owned(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, type_name, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_operation_outcome_noop_without_metrics() {
		record_operation_outcome(OperationKind::Create, "vy_app_client", OperationOutcome::Failure);
	}

	#[test]
	fn outcome_follows_error_flag() {
		assert_eq!(OperationOutcome::from_has_error(true), OperationOutcome::Failure);
		assert_eq!(OperationOutcome::from_has_error(false).as_str(), "success");
	}
}
