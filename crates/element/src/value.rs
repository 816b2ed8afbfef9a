//! Dynamic values carried by element props.

use std::fmt;
use std::sync::Arc;

use compact_str::{CompactString, ToCompactString};

use crate::authoring::AuthoringRef;
use crate::element::Element;
use crate::origin::SourceOrigin;
use crate::tag::NodeTag;

/// A function value carried in props: event handlers and ref callbacks.
///
/// Callbacks compare by identity, like the closures they stand in for; two
/// structurally identical callbacks are still distinct values.
#[derive(Clone)]
pub struct Callback(Arc<dyn Fn(&Value) + Send + Sync>);

impl Callback {
	/// Wraps a function as a prop value.
	pub fn new(f: impl Fn(&Value) + Send + Sync + 'static) -> Self {
		Self(Arc::new(f))
	}

	/// Invokes the callback with the given argument.
	pub fn call(&self, argument: &Value) {
		(self.0)(argument);
	}
}

impl PartialEq for Callback {
	fn eq(&self, other: &Self) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for Callback {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Callback(..)")
	}
}

/// A dynamically shaped prop value.
///
/// [`Value::Undefined`] is an explicitly supplied "no value" and is distinct
/// from a field being absent altogether; the distinction drives default
/// resolution during cloning.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Explicitly supplied "no value"; distinct from an absent field.
	Undefined,
	/// An empty value.
	Null,
	/// A boolean.
	Bool(bool),
	/// A signed integer.
	Int(i64),
	/// A floating-point number.
	Float(f64),
	/// A string.
	Str(CompactString),
	/// An ordered sequence, e.g. a normalized multi-child list.
	List(Vec<Value>),
	/// A nested element descriptor.
	Node(Element),
	/// A function value: an event handler or a ref callback.
	Callback(Callback),
	/// A descriptor marker, present when a descriptor was spread into a map.
	Tag(NodeTag),
	/// Authoring-context annotation carried by tooling-injected fields.
	Context(AuthoringRef),
	/// Source-origin annotation carried by tooling-injected fields.
	Origin(SourceOrigin),
}

impl Value {
	/// Returns true for the explicit "no value".
	pub fn is_undefined(&self) -> bool {
		matches!(self, Self::Undefined)
	}

	/// Canonical string form used for key normalization.
	///
	/// Applied unconditionally by the key resolver, so `Int(0)` becomes the
	/// (non-empty) string `"0"` rather than disappearing as a falsy value.
	pub(crate) fn key_string(&self) -> CompactString {
		self.to_compact_string()
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Undefined => f.write_str("undefined"),
			Self::Null => f.write_str("null"),
			Self::Bool(value) => write!(f, "{value}"),
			Self::Int(value) => write!(f, "{value}"),
			Self::Float(value) => write!(f, "{value}"),
			Self::Str(value) => f.write_str(value),
			Self::List(values) => {
				for (index, value) in values.iter().enumerate() {
					if index > 0 {
						f.write_str(",")?;
					}
					write!(f, "{value}")?;
				}
				Ok(())
			}
			Self::Node(node) => write!(f, "<{}>", node.kind().display_name()),
			Self::Callback(_) => f.write_str("callback"),
			Self::Tag(_) => f.write_str("tag"),
			Self::Context(context) => f.write_str(context.name()),
			Self::Origin(origin) => write!(f, "{origin}"),
		}
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::Str(value.into())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::Str(value.into())
	}
}

impl From<CompactString> for Value {
	fn from(value: CompactString) -> Self {
		Self::Str(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<Element> for Value {
	fn from(value: Element) -> Self {
		Self::Node(value)
	}
}

impl From<Vec<Value>> for Value {
	fn from(value: Vec<Value>) -> Self {
		Self::List(value)
	}
}

impl From<Callback> for Value {
	fn from(value: Callback) -> Self {
		Self::Callback(value)
	}
}

impl From<AuthoringRef> for Value {
	fn from(value: AuthoringRef) -> Self {
		Self::Context(value)
	}
}

impl From<SourceOrigin> for Value {
	fn from(value: SourceOrigin) -> Self {
		Self::Origin(value)
	}
}
