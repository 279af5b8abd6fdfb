// std
#[cfg(not(feature = "tracing"))] use std::marker::PhantomData;
// self
use crate::{
	_prelude::*,
	diag::Diagnostics,
	obs::{self, OperationKind, OperationOutcome},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOperation<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOperation<F> = F;

/// Span covering one provider operation on one type.
///
/// The span is opened with empty `outcome`, `errors`, and `warnings` fields which
/// [`OperationSpan::finish`] fills from the diagnostics the operation produced; the same call
/// feeds the operation counter so spans and metrics never disagree.
#[derive(Clone, Debug)]
pub struct OperationSpan {
	kind: OperationKind,
	type_name: String,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OperationSpan {
	/// Opens a span for `kind` on the full type name and counts the attempt.
	pub fn start(kind: OperationKind, type_name: &str) -> Self {
		#[cfg(feature = "tracing")]
		let span = tracing::info_span!(
			"terraform_provider_vy.operation",
			operation = kind.as_str(),
			type_name,
			outcome = tracing::field::Empty,
			errors = tracing::field::Empty,
			warnings = tracing::field::Empty,
		);

		obs::record_operation_outcome(kind, type_name, OperationOutcome::Attempt);

		Self {
			kind,
			type_name: type_name.to_owned(),
			#[cfg(feature = "tracing")]
			span,
		}
	}

	/// Operation this span covers.
	pub fn kind(&self) -> OperationKind {
		self.kind
	}

	/// Type name this span covers.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// Enters the span for synchronous sections.
	pub fn enter(&self) -> OperationSpanGuard<'_> {
		#[cfg(feature = "tracing")]
		{
			OperationSpanGuard { _guard: self.span.enter() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			OperationSpanGuard { _span: PhantomData }
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOperation<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}

	/// Classifies the finished operation, records it on the span, and counts it.
	pub fn finish(&self, diagnostics: &Diagnostics) -> OperationOutcome {
		let outcome = OperationOutcome::from_has_error(diagnostics.has_error());

		#[cfg(feature = "tracing")]
		{
			self.span.record("outcome", outcome.as_str());
			self.span.record("errors", diagnostics.errors().count() as u64);
			self.span.record("warnings", diagnostics.warnings().count() as u64);

			for diagnostic in diagnostics.errors() {
				tracing::warn!(
					parent: &self.span,
					attribute = diagnostic.attribute.as_deref(),
					"{}: {}",
					diagnostic.summary,
					diagnostic.detail
				);
			}
		}

		obs::record_operation_outcome(self.kind, &self.type_name, outcome);

		outcome
	}
}

/// RAII guard returned by [`OperationSpan::enter`].
pub struct OperationSpanGuard<'a> {
	#[cfg(feature = "tracing")]
	_guard: tracing::span::Entered<'a>,
	#[cfg(not(feature = "tracing"))]
	_span: PhantomData<&'a OperationSpan>,
}
impl Debug for OperationSpanGuard<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("OperationSpanGuard(..)")
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn finish_classifies_by_error_diagnostics() {
		let span = OperationSpan::start(OperationKind::Delete, "vy_app_client");
		let _guard = span.enter();
		let mut diagnostics = Diagnostics::new();

		diagnostics.add_warning("App client not found", "Removed from state.");

		assert_eq!(span.finish(&diagnostics), OperationOutcome::Success);

		diagnostics.add_error("Unable to delete app client", "HTTP 500.");

		assert_eq!(span.finish(&diagnostics), OperationOutcome::Failure);
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OperationSpan::start(OperationKind::Read, "vy_cognito_info");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
		assert_eq!(span.kind(), OperationKind::Read);
		assert_eq!(span.type_name(), "vy_cognito_info");
	}
}
