//! Ordered prop maps with development-mode reserved-field traps.

use compact_str::CompactString;
use indexmap::IndexMap;
use thiserror::Error;

use arbor_diagnostics::Diagnostics;

use crate::tag::{NODE_TAG, TAG_FIELD};
use crate::value::Value;

/// Name of the reserved key field.
pub const KEY_FIELD: &str = "key";
/// Name of the reserved ref field.
pub const REF_FIELD: &str = "ref";
/// Name of the reserved development-only self-context annotation field.
pub const SELF_FIELD: &str = "__self";
/// Name of the reserved development-only source-origin annotation field.
pub const ORIGIN_FIELD: &str = "__origin";

/// The reserved configuration field names, always extracted before props are
/// assembled.
pub const RESERVED_FIELDS: [&str; 4] = [KEY_FIELD, REF_FIELD, SELF_FIELD, ORIGIN_FIELD];

/// Returns true for reserved configuration field names.
pub fn is_reserved(name: &str) -> bool {
	RESERVED_FIELDS.contains(&name)
}

/// Which reserved field a deprecated-access trap covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TrapField {
	/// The `key` field.
	Key,
	/// The `ref` field.
	Ref,
}

impl TrapField {
	fn name(self) -> &'static str {
		match self {
			Self::Key => KEY_FIELD,
			Self::Ref => REF_FIELD,
		}
	}
}

/// Deprecated-access marker installed on `key`/`ref` in development mode.
///
/// Reading the field through [`Props::get`] warns once per node-kind name and
/// yields nothing; enumeration never sees the slot.
#[derive(Debug, Clone)]
struct Trap {
	field: TrapField,
	kind_name: CompactString,
	diagnostics: Diagnostics,
}

impl Trap {
	fn warn(&self) {
		let field = self.field.name();
		let kind = self.kind_name.clone();
		self.diagnostics.warn_once(
			false,
			&format!("reserved-prop:{field}:{kind}"),
			move || {
				format!(
					"`{field}` is not a prop on `{kind}`; reading it always yields nothing. \
					 Pass the value under a different prop name if the child needs it."
				)
			},
		);
	}
}

/// One slot in a props map: an ordinary value, or a dev-only trap.
#[derive(Debug, Clone)]
enum Slot {
	Value(Value),
	Trap(Trap),
}

/// Error from mutating a props map.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropsError {
	/// The map was frozen after construction and rejects writes.
	#[error("props map is frozen")]
	Frozen,
}

/// Insertion-ordered field map attached to an element.
///
/// Enumeration order is insertion order, matching the order fields were
/// copied out of the configuration. Trap slots are invisible to enumeration,
/// length, equality, and shallow copies.
///
/// Once [`Props::freeze`] has run (the factory's last construction step when
/// immutability is on), every write fails with [`PropsError::Frozen`] and the
/// map's contents never change again.
#[derive(Debug, Clone, Default)]
pub struct Props {
	slots: IndexMap<CompactString, Slot>,
	frozen: bool,
}

impl Props {
	/// Creates an empty map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder-style insert for literal construction.
	///
	/// A frozen map is returned unchanged.
	pub fn with(mut self, name: impl Into<CompactString>, value: impl Into<Value>) -> Self {
		if !self.frozen {
			self.slots.insert(name.into(), Slot::Value(value.into()));
		}
		self
	}

	/// Inserts or replaces a field.
	pub fn insert(
		&mut self,
		name: impl Into<CompactString>,
		value: impl Into<Value>,
	) -> Result<(), PropsError> {
		if self.frozen {
			return Err(PropsError::Frozen);
		}
		self.slots.insert(name.into(), Slot::Value(value.into()));
		Ok(())
	}

	/// Infallible insert for factory internals, which only run before the map
	/// is frozen.
	pub(crate) fn put(&mut self, name: CompactString, value: Value) {
		debug_assert!(!self.frozen);
		self.slots.insert(name, Slot::Value(value));
	}

	/// Looks up a field.
	///
	/// Reading a reserved-access trap emits its one-time warning and yields
	/// `None`, as if the field did not exist.
	pub fn get(&self, name: &str) -> Option<&Value> {
		match self.slots.get(name) {
			Some(Slot::Value(value)) => Some(value),
			Some(Slot::Trap(trap)) => {
				trap.warn();
				None
			}
			None => None,
		}
	}

	/// Looks up a field without triggering trap warnings.
	///
	/// Used by the reserved-field resolver, which inspects slots rather than
	/// reading them as props. Traps still yield `None`.
	pub(crate) fn peek(&self, name: &str) -> Option<&Value> {
		match self.slots.get(name) {
			Some(Slot::Value(value)) => Some(value),
			_ => None,
		}
	}

	/// Returns true if the map defines `name` as an ordinary value.
	pub fn contains(&self, name: &str) -> bool {
		matches!(self.slots.get(name), Some(Slot::Value(_)))
	}

	/// Iterates ordinary value fields in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.slots.iter().filter_map(|(name, slot)| match slot {
			Slot::Value(value) => Some((name.as_str(), value)),
			Slot::Trap(_) => None,
		})
	}

	/// Number of ordinary value fields.
	pub fn len(&self) -> usize {
		self.iter().count()
	}

	/// Returns true when the map holds no ordinary value fields.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Flips the map read-only. Idempotent; freezing a frozen map is a no-op.
	pub fn freeze(&mut self) {
		self.frozen = true;
	}

	/// Returns true once the map has been frozen.
	pub fn is_frozen(&self) -> bool {
		self.frozen
	}

	/// Returns an unfrozen shallow copy containing only ordinary value fields.
	pub fn shallow_copy(&self) -> Self {
		let mut copy = Self::new();
		for (name, value) in self.iter() {
			copy.put(name.into(), value.clone());
		}
		copy
	}

	/// True when the map carries a descriptor marker, i.e. a descriptor was
	/// spread into the configuration this map was copied from.
	pub(crate) fn resembles_element(&self) -> bool {
		matches!(self.peek(TAG_FIELD), Some(Value::Tag(tag)) if *tag == NODE_TAG)
	}

	/// Installs a deprecated-access trap over a reserved field name.
	pub(crate) fn install_trap(
		&mut self,
		field: TrapField,
		kind_name: CompactString,
		diagnostics: Diagnostics,
	) {
		debug_assert!(!self.frozen);
		self.slots.insert(
			field.name().into(),
			Slot::Trap(Trap {
				field,
				kind_name,
				diagnostics,
			}),
		);
	}
}

impl PartialEq for Props {
	/// Compares ordinary value fields only; traps and the frozen flag are
	/// capability state, not data.
	fn eq(&self, other: &Self) -> bool {
		self.len() == other.len()
			&& self
				.iter()
				.all(|(name, value)| other.peek(name) == Some(value))
	}
}
