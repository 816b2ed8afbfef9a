//! Node kinds: host primitives and component definitions.

use std::sync::Arc;

use compact_str::CompactString;
use indexmap::IndexMap;

use crate::value::Value;

/// Fallback name shown in diagnostics for unnamed components.
const UNKNOWN_NAME: &str = "Unknown";

/// Default-value table declared by a component definition.
///
/// Fields left unset by a configuration are filled from this table during
/// construction; the table's mere presence also changes how explicit
/// undefined overrides resolve during cloning.
pub type DefaultProps = IndexMap<CompactString, Value>;

/// A component definition: the kind behind non-host nodes.
///
/// Definitions compare by identity, never structurally, so they are always
/// handled behind an [`Arc`]. Two definitions built from the same inputs are
/// still distinct kinds.
#[derive(Debug, Clone, Default)]
pub struct ComponentDef {
	name: CompactString,
	display_name: Option<CompactString>,
	default_props: Option<DefaultProps>,
}

impl ComponentDef {
	/// Starts a definition with the given name.
	pub fn new(name: impl Into<CompactString>) -> Self {
		Self {
			name: name.into(),
			display_name: None,
			default_props: None,
		}
	}

	/// Overrides the name shown in diagnostics.
	pub fn display_name(mut self, name: impl Into<CompactString>) -> Self {
		self.display_name = Some(name.into());
		self
	}

	/// Declares a default value for one prop field, creating the table on
	/// first use.
	pub fn default_prop(mut self, name: impl Into<CompactString>, value: impl Into<Value>) -> Self {
		self.default_props
			.get_or_insert_with(DefaultProps::new)
			.insert(name.into(), value.into());
		self
	}

	/// Declares the whole default table at once.
	pub fn default_props(mut self, table: DefaultProps) -> Self {
		self.default_props = Some(table);
		self
	}

	/// The definition's name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// The declared default table, if any.
	pub fn defaults(&self) -> Option<&DefaultProps> {
		self.default_props.as_ref()
	}

	/// Finishes the builder as a shareable definition.
	pub fn build(self) -> Arc<Self> {
		Arc::new(self)
	}
}

/// The kind of node an element describes.
#[derive(Debug, Clone)]
pub enum NodeKind {
	/// A host-primitive tag name (e.g. `"text"`, `"stack"`).
	Host(CompactString),
	/// A reference to a component definition.
	Component(Arc<ComponentDef>),
}

impl NodeKind {
	/// A host-primitive kind.
	pub fn host(name: impl Into<CompactString>) -> Self {
		Self::Host(name.into())
	}

	/// A component kind.
	pub fn component(definition: Arc<ComponentDef>) -> Self {
		Self::Component(definition)
	}

	/// Default-value table for this kind. Hosts never declare one.
	pub fn defaults(&self) -> Option<&DefaultProps> {
		match self {
			Self::Host(_) => None,
			Self::Component(definition) => definition.defaults(),
		}
	}

	/// Name used in diagnostics: the host tag, or the component's display
	/// name falling back to its name and then to `"Unknown"`.
	pub fn display_name(&self) -> &str {
		match self {
			Self::Host(name) => name.as_str(),
			Self::Component(definition) => {
				let name = definition
					.display_name
					.as_deref()
					.unwrap_or(definition.name.as_str());
				if name.is_empty() { UNKNOWN_NAME } else { name }
			}
		}
	}
}

impl PartialEq for NodeKind {
	/// Hosts compare by tag name; components compare by definition identity.
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::Host(a), Self::Host(b)) => a == b,
			(Self::Component(a), Self::Component(b)) => Arc::ptr_eq(a, b),
			_ => false,
		}
	}
}

impl From<&str> for NodeKind {
	fn from(name: &str) -> Self {
		Self::host(name)
	}
}

impl From<String> for NodeKind {
	fn from(name: String) -> Self {
		Self::host(name)
	}
}

impl From<Arc<ComponentDef>> for NodeKind {
	fn from(definition: Arc<ComponentDef>) -> Self {
		Self::Component(definition)
	}
}

impl From<ComponentDef> for NodeKind {
	fn from(definition: ComponentDef) -> Self {
		Self::Component(Arc::new(definition))
	}
}
