//! Diagnostics returned to the host alongside every operation result.

// std
use std::slice::Iter;
// self
use crate::_prelude::*;

/// Diagnostic severity understood by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
	/// The operation failed.
	Error,
	/// The operation succeeded but the user should be told something.
	Warning,
}

/// A single user-facing message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
	/// Severity level.
	pub severity: Severity,
	/// Short summary line.
	pub summary: String,
	/// Longer explanation.
	pub detail: String,
	/// Attribute path the message refers to, if any.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub attribute: Option<String>,
}
impl Diagnostic {
	/// Builds an error diagnostic.
	pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
		Self {
			severity: Severity::Error,
			summary: summary.into(),
			detail: detail.into(),
			attribute: None,
		}
	}

	/// Builds a warning diagnostic.
	pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
		Self {
			severity: Severity::Warning,
			summary: summary.into(),
			detail: detail.into(),
			attribute: None,
		}
	}

	/// Scopes the diagnostic to an attribute path.
	pub fn at(mut self, attribute: impl Into<String>) -> Self {
		self.attribute = Some(attribute.into());

		self
	}
}
impl Display for Diagnostic {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let level = match self.severity {
			Severity::Error => "Error",
			Severity::Warning => "Warning",
		};

		match &self.attribute {
			Some(attribute) =>
				write!(f, "{level}: {} ({attribute}): {}", self.summary, self.detail),
			None => write!(f, "{level}: {}: {}", self.summary, self.detail),
		}
	}
}

/// Ordered collection of diagnostics produced by one operation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics(Vec<Diagnostic>);
impl Diagnostics {
	/// Creates an empty collection.
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a diagnostic.
	pub fn push(&mut self, diagnostic: Diagnostic) {
		self.0.push(diagnostic);
	}

	/// Appends an error diagnostic.
	pub fn add_error(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
		self.push(Diagnostic::error(summary, detail));
	}

	/// Appends a warning diagnostic.
	pub fn add_warning(&mut self, summary: impl Into<String>, detail: impl Into<String>) {
		self.push(Diagnostic::warning(summary, detail));
	}

	/// Appends an error diagnostic scoped to `attribute`.
	pub fn add_attribute_error(
		&mut self,
		attribute: impl Into<String>,
		summary: impl Into<String>,
		detail: impl Into<String>,
	) {
		self.push(Diagnostic::error(summary, detail).at(attribute));
	}

	/// Moves every diagnostic from `other` into `self`.
	pub fn append(&mut self, other: Diagnostics) {
		self.0.extend(other.0);
	}

	/// Returns true if any diagnostic is an error.
	pub fn has_error(&self) -> bool {
		self.0.iter().any(|diagnostic| diagnostic.severity == Severity::Error)
	}

	/// Iterator over error diagnostics.
	pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
		self.0.iter().filter(|diagnostic| diagnostic.severity == Severity::Error)
	}

	/// Iterator over warning diagnostics.
	pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
		self.0.iter().filter(|diagnostic| diagnostic.severity == Severity::Warning)
	}

	/// Number of diagnostics.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns true when no diagnostics were recorded.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterator over all diagnostics in insertion order.
	pub fn iter(&self) -> Iter<'_, Diagnostic> {
		self.0.iter()
	}
}
impl From<Diagnostic> for Diagnostics {
	fn from(diagnostic: Diagnostic) -> Self {
		Self(vec![diagnostic])
	}
}
impl<'a> IntoIterator for &'a Diagnostics {
	type IntoIter = Iter<'a, Diagnostic>;
	type Item = &'a Diagnostic;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
impl IntoIterator for Diagnostics {
	type IntoIter = std::vec::IntoIter<Diagnostic>;
	type Item = Diagnostic;

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}
impl Extend<Diagnostic> for Diagnostics {
	fn extend<I>(&mut self, iter: I)
	where
		I: IntoIterator<Item = Diagnostic>,
	{
		self.0.extend(iter);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn warnings_do_not_count_as_errors() {
		let mut diags = Diagnostics::new();

		diags.add_warning("Careful", "Non-prod environment selected.");

		assert!(!diags.has_error());
		assert_eq!(diags.warnings().count(), 1);

		diags.add_attribute_error("name", "Missing attribute", "The name must be set.");

		assert!(diags.has_error());
		assert_eq!(diags.errors().next().and_then(|d| d.attribute.as_deref()), Some("name"));
	}

	#[test]
	fn append_preserves_order() {
		let mut first = Diagnostics::from(Diagnostic::warning("one", "first"));
		let mut second = Diagnostics::new();

		second.add_error("two", "second");
		first.append(second);

		let summaries = first.iter().map(|d| d.summary.as_str()).collect::<Vec<_>>();

		assert_eq!(summaries, ["one", "two"]);
	}

	#[test]
	fn display_includes_attribute_path() {
		let diagnostic = Diagnostic::error("Invalid value", "Expected a string.").at("scopes[0]");

		assert_eq!(diagnostic.to_string(), "Error: Invalid value (scopes[0]): Expected a string.");
	}
}
