//! Declarative schemas for the provider block, resources, and data sources.
//!
//! Schemas are handed to the host verbatim and double as the first line of validation: the
//! provider checks every config and plan against the owning schema before a handler runs, so
//! handlers can decode into their models without re-checking presence or JSON types.

// self
use crate::{_prelude::*, diag::Diagnostics};

/// Value type of an attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
	/// UTF-8 string.
	String,
	/// Boolean.
	Bool,
	/// Ordered list of elements sharing one type.
	List(Box<AttributeType>),
	/// Object with a fixed set of typed fields, all of them required.
	Object(BTreeMap<String, AttributeType>),
}
impl AttributeType {
	/// List of strings.
	pub fn string_list() -> Self {
		Self::List(Box::new(Self::String))
	}

	/// List of objects with the given string-typed fields.
	pub fn object_list<I>(fields: I) -> Self
	where
		I: IntoIterator<Item = &'static str>,
	{
		let fields = fields.into_iter().map(|name| (name.to_owned(), Self::String)).collect();

		Self::List(Box::new(Self::Object(fields)))
	}

	/// Label used in type mismatch messages.
	pub fn describe(&self) -> &'static str {
		match self {
			Self::String => "string",
			Self::Bool => "bool",
			Self::List(_) => "list",
			Self::Object(_) => "object",
		}
	}
}

/// Plan-time behaviors attached to an attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanModifier {
	/// Keep the prior state value instead of marking a computed value unknown.
	UseStateForUnknown,
	/// Changing the value destroys and recreates the object.
	RequiresReplace,
}

/// Single schema attribute.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
	/// Value type.
	#[serde(rename = "type")]
	pub kind: AttributeType,
	/// Must be set in configuration.
	pub required: bool,
	/// May be set in configuration.
	pub optional: bool,
	/// Value may be filled in by the provider.
	pub computed: bool,
	/// Value must be masked in host output.
	pub sensitive: bool,
	/// Markdown documentation.
	pub markdown_description: String,
	/// Plan-time behaviors.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub plan_modifiers: Vec<PlanModifier>,
}
impl Attribute {
	fn new(kind: AttributeType, required: bool, optional: bool, computed: bool) -> Self {
		Self {
			kind,
			required,
			optional,
			computed,
			sensitive: false,
			markdown_description: String::new(),
			plan_modifiers: Vec::new(),
		}
	}

	/// Required string attribute.
	pub fn required_string() -> Self {
		Self::new(AttributeType::String, true, false, false)
	}

	/// Optional string attribute.
	pub fn optional_string() -> Self {
		Self::new(AttributeType::String, false, true, false)
	}

	/// Provider-filled string attribute.
	pub fn computed_string() -> Self {
		Self::new(AttributeType::String, false, false, true)
	}

	/// Optional boolean attribute.
	pub fn optional_bool() -> Self {
		Self::new(AttributeType::Bool, false, true, false)
	}

	/// Optional list of strings.
	pub fn optional_string_list() -> Self {
		Self::new(AttributeType::string_list(), false, true, false)
	}

	/// Required list of objects with string fields.
	pub fn required_object_list<I>(fields: I) -> Self
	where
		I: IntoIterator<Item = &'static str>,
	{
		Self::new(AttributeType::object_list(fields), true, false, false)
	}

	/// Optional list of objects with string fields.
	pub fn optional_object_list<I>(fields: I) -> Self
	where
		I: IntoIterator<Item = &'static str>,
	{
		Self::new(AttributeType::object_list(fields), false, true, false)
	}

	/// Sets the markdown description.
	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.markdown_description = description.into();

		self
	}

	/// Marks the attribute as sensitive.
	pub fn sensitive(mut self) -> Self {
		self.sensitive = true;

		self
	}

	/// Keeps prior state for computed values across plans.
	pub fn use_state_for_unknown(mut self) -> Self {
		self.plan_modifiers.push(PlanModifier::UseStateForUnknown);

		self
	}

	/// Forces replacement when the value changes.
	pub fn requires_replace(mut self) -> Self {
		self.plan_modifiers.push(PlanModifier::RequiresReplace);

		self
	}

	/// Returns true if only the provider may set this attribute.
	pub fn is_computed_only(&self) -> bool {
		self.computed && !self.required && !self.optional
	}
}

/// Schema for a provider, resource, or data source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
	/// State schema version.
	pub version: i64,
	/// Markdown documentation.
	pub markdown_description: String,
	/// Attributes keyed by name.
	pub attributes: BTreeMap<String, Attribute>,
}
impl Schema {
	/// Creates an empty version-0 schema.
	pub fn new(description: impl Into<String>) -> Self {
		Self { version: 0, markdown_description: description.into(), attributes: BTreeMap::new() }
	}

	/// Adds or replaces an attribute.
	pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
		self.attributes.insert(name.into(), attribute);

		self
	}

	/// Looks up an attribute by name.
	pub fn attribute(&self, name: &str) -> Option<&Attribute> {
		self.attributes.get(name)
	}

	/// Validates user configuration: computed-only attributes must be absent.
	pub fn validate_config(&self, config: &Value) -> Diagnostics {
		self.validate(config, false)
	}

	/// Validates a planned value: computed attributes may carry provider values.
	pub fn validate_plan(&self, plan: &Value) -> Diagnostics {
		self.validate(plan, true)
	}

	fn validate(&self, value: &Value, allow_computed: bool) -> Diagnostics {
		let mut diags = Diagnostics::new();
		let Some(object) = value.as_object() else {
			diags.add_error(
				"Invalid configuration",
				format!("Expected an object, found {}.", json_kind(value)),
			);

			return diags;
		};

		for (name, attribute) in &self.attributes {
			match object.get(name) {
				None | Some(Value::Null) =>
					if attribute.required {
						diags.add_attribute_error(
							name,
							"Missing required argument",
							format!(
								"The argument `{name}` is required, but no definition was found."
							),
						);
					},
				Some(_) if attribute.is_computed_only() && !allow_computed => {
					diags.add_attribute_error(
						name,
						"Invalid configuration",
						format!("The attribute `{name}` is computed and cannot be set."),
					);
				},
				Some(value) => check_type(name, &attribute.kind, value, &mut diags),
			}
		}
		for name in object.keys().filter(|name| !self.attributes.contains_key(name.as_str())) {
			diags.add_attribute_error(
				name,
				"Unsupported argument",
				format!("An argument named `{name}` is not expected here."),
			);
		}

		diags
	}
}

fn check_type(path: &str, kind: &AttributeType, value: &Value, diags: &mut Diagnostics) {
	match (kind, value) {
		(_, Value::Null) | (AttributeType::String, Value::String(_)) |
		(AttributeType::Bool, Value::Bool(_)) => {},
		(AttributeType::List(element), Value::Array(items)) =>
			for (index, item) in items.iter().enumerate() {
				check_type(&format!("{path}[{index}]"), element, item, diags);
			},
		(AttributeType::Object(fields), Value::Object(object)) => {
			for (field, field_kind) in fields {
				let field_path = format!("{path}.{field}");

				match object.get(field) {
					None | Some(Value::Null) => diags.add_attribute_error(
						&field_path,
						"Missing required argument",
						format!("The argument `{field_path}` is required."),
					),
					Some(field_value) => check_type(&field_path, field_kind, field_value, diags),
				}
			}
			for field in object.keys().filter(|field| !fields.contains_key(field.as_str())) {
				diags.add_attribute_error(
					format!("{path}.{field}"),
					"Unsupported argument",
					format!("An argument named `{field}` is not expected here."),
				);
			}
		},
		(expected, found) => diags.add_attribute_error(
			path,
			"Incorrect attribute value type",
			format!("Expected a {}, found {}.", expected.describe(), json_kind(found)),
		),
	}
}

fn json_kind(value: &Value) -> &'static str {
	match value {
		Value::Null => "null",
		Value::Bool(_) => "bool",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "list",
		Value::Object(_) => "object",
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn schema() -> Schema {
		Schema::new("Test schema.")
			.with_attribute("id", Attribute::computed_string().use_state_for_unknown())
			.with_attribute("name", Attribute::required_string())
			.with_attribute("scopes", Attribute::optional_string_list())
			.with_attribute("enabled", Attribute::optional_bool())
			.with_attribute("rules", Attribute::optional_object_list(["name", "description"]))
	}

	fn attributes_of(diags: &Diagnostics) -> Vec<&str> {
		diags.errors().filter_map(|d| d.attribute.as_deref()).collect()
	}

	#[test]
	fn accepts_valid_config() {
		let diags = schema().validate_config(&json!({
			"name": "web",
			"scopes": ["openid", "email"],
			"enabled": null,
			"rules": [{ "name": "read", "description": "Read access" }],
		}));

		assert!(diags.is_empty(), "Unexpected diagnostics: {diags:?}");
	}

	#[test]
	fn reports_missing_and_unknown_attributes() {
		let diags = schema().validate_config(&json!({ "nmae": "typo" }));

		assert_eq!(attributes_of(&diags), ["name", "nmae"]);
	}

	#[test]
	fn rejects_computed_attributes_in_config_but_not_in_plan() {
		let value = json!({ "id": "web", "name": "web" });

		assert_eq!(attributes_of(&schema().validate_config(&value)), ["id"]);
		assert!(schema().validate_plan(&value).is_empty());
	}

	#[test]
	fn reports_nested_type_mismatches_with_paths() {
		let diags = schema().validate_config(&json!({
			"name": "web",
			"scopes": ["openid", 7],
			"enabled": "yes",
			"rules": [{ "name": "read", "extra": "x" }],
		}));

		assert_eq!(
			attributes_of(&diags),
			["enabled", "rules[0].description", "rules[0].extra", "scopes[1]"]
		);
	}

	#[test]
	fn rejects_non_object_values() {
		let diags = schema().validate_config(&json!(["web"]));

		assert!(diags.has_error());
		assert_eq!(diags.len(), 1);
	}

	#[test]
	fn required_object_lists_check_presence_and_fields() {
		let schema = Schema::new("Grants.")
			.with_attribute("grants", Attribute::required_object_list(["scope"]));
		let grants = schema.attribute("grants").expect("Grants should be declared.");

		assert!(grants.required);
		assert!(!grants.optional);
		assert_eq!(attributes_of(&schema.validate_config(&json!({}))), ["grants"]);
		assert_eq!(
			attributes_of(&schema.validate_config(&json!({ "grants": [{}] }))),
			["grants[0].scope"]
		);
		assert!(schema.validate_config(&json!({ "grants": [{ "scope": "read" }] })).is_empty());
	}

	#[test]
	fn computed_only_detection() {
		assert!(Attribute::computed_string().is_computed_only());
		assert!(!Attribute::optional_string().is_computed_only());
		assert!(Attribute::computed_string().sensitive().sensitive);
		assert_eq!(
			Attribute::required_string().requires_replace().plan_modifiers,
			[PlanModifier::RequiresReplace]
		);
	}
}
