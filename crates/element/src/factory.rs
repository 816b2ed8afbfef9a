//! The element factory: create, clone, and typed construction.
//!
//! Every public operation funnels through the private constructor primitive
//! on [`Element`]. The factory resolves reserved configuration fields,
//! normalizes variadic children, applies component default tables, and reads
//! (never writes) the injected authoring slot.

use compact_str::CompactString;

use arbor_diagnostics::Diagnostics;

use crate::authoring::{AuthoringRef, AuthoringSlot};
use crate::element::{Element, RefBinding, ResolvedFields};
use crate::kind::NodeKind;
use crate::origin::SourceOrigin;
use crate::props::{
	self, KEY_FIELD, ORIGIN_FIELD, Props, REF_FIELD, SELF_FIELD, TrapField,
};
use crate::value::Value;

/// Field name under which normalized children are stored in props.
pub const CHILDREN_FIELD: &str = "children";

/// Construction-time behavior switches.
///
/// `dev_checks` turns on development metadata, diagnostics, and the
/// validation side record. `immutability` is the structural-freeze
/// capability: with it off the factory degrades to plain assignment — the
/// same logical fields, but no freezing and no reserved-access traps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryOptions {
	/// Attach development metadata and emit diagnostics.
	pub dev_checks: bool,
	/// Freeze props after construction and install reserved-access traps.
	pub immutability: bool,
}

impl FactoryOptions {
	/// Full development hardening.
	pub const fn development() -> Self {
		Self {
			dev_checks: true,
			immutability: true,
		}
	}

	/// No diagnostics, no dev metadata, no freezing.
	pub const fn production() -> Self {
		Self {
			dev_checks: false,
			immutability: false,
		}
	}
}

impl Default for FactoryOptions {
	/// Development behavior under debug builds, production otherwise.
	fn default() -> Self {
		if cfg!(debug_assertions) {
			Self::development()
		} else {
			Self::production()
		}
	}
}

/// Reserved fields split out of a raw configuration map.
struct ReservedFields {
	key: Option<CompactString>,
	ref_binding: Option<RefBinding>,
	self_context: Option<AuthoringRef>,
	origin: Option<SourceOrigin>,
	remaining: Props,
}

impl ReservedFields {
	/// Splits the reserved names out of `config`; every other own field is
	/// shallow-copied, in order, into `remaining`.
	///
	/// Absent configuration yields empty outputs.
	fn extract(config: Option<&Props>) -> Self {
		let Some(config) = config else {
			return Self {
				key: None,
				ref_binding: None,
				self_context: None,
				origin: None,
				remaining: Props::new(),
			};
		};
		let key = valid_field(config, KEY_FIELD).map(Value::key_string);
		let ref_binding = valid_field(config, REF_FIELD).and_then(RefBinding::from_value);
		let self_context = valid_field(config, SELF_FIELD).and_then(context_annotation);
		let origin = valid_field(config, ORIGIN_FIELD).and_then(origin_annotation);
		let mut remaining = Props::new();
		for (name, value) in config.iter() {
			if !props::is_reserved(name) {
				remaining.put(name.into(), value.clone());
			}
		}
		Self {
			key,
			ref_binding,
			self_context,
			origin,
			remaining,
		}
	}
}

/// A reserved field is valid when the configuration defines it directly as
/// an ordinary value (deprecated-access traps do not count) and the value is
/// not the explicit undefined.
fn valid_field<'a>(config: &'a Props, name: &str) -> Option<&'a Value> {
	config.peek(name).filter(|value| !value.is_undefined())
}

fn context_annotation(value: &Value) -> Option<AuthoringRef> {
	match value {
		Value::Context(context) => Some(context.clone()),
		_ => None,
	}
}

fn origin_annotation(value: &Value) -> Option<SourceOrigin> {
	match value {
		Value::Origin(origin) => Some(*origin),
		_ => None,
	}
}

/// Normalizes the variadic children of a construction call onto props.
///
/// No children leaves the field unset, a single child is stored unwrapped,
/// and two or more become an ordered list. A lone child never needs sequence
/// indexing by the consumer, while multiple children cannot be mistaken for
/// a single list-shaped child.
fn attach_children(target: &mut Props, mut children: Vec<Value>) {
	let value = match children.len() {
		0 => return,
		1 => children.remove(0),
		_ => Value::List(children),
	};
	target.put(CHILDREN_FIELD.into(), value);
}

/// Fills fields declared in the kind's default table that are fully absent
/// from props. Fields defined as explicit undefined are left alone on this
/// path; only cloning resolves undefined overrides against the table.
fn resolve_creation_defaults(kind: &NodeKind, target: &mut Props) {
	let Some(table) = kind.defaults() else { return };
	for (name, value) in table {
		if !target.contains(name) {
			target.put(name.clone(), value.clone());
		}
	}
}

/// Constructs element descriptors.
///
/// The factory holds the behavior switches, a diagnostics handle, and the
/// authoring slot; all three are injected so the construction core owns no
/// ambient global state. Factories are cheap to clone and clones share the
/// same slot and diagnostics.
#[derive(Debug, Clone)]
pub struct ElementFactory {
	options: FactoryOptions,
	diagnostics: Diagnostics,
	authoring: AuthoringSlot,
}

impl ElementFactory {
	/// Creates a factory from explicit parts.
	pub fn new(options: FactoryOptions, diagnostics: Diagnostics, authoring: AuthoringSlot) -> Self {
		Self {
			options,
			diagnostics,
			authoring,
		}
	}

	/// Development factory: tracing diagnostics, fresh authoring slot.
	pub fn development() -> Self {
		Self::new(FactoryOptions::development(), Diagnostics::tracing(), AuthoringSlot::new())
	}

	/// Production factory: diagnostics disabled, no freezing, fresh slot.
	pub fn production() -> Self {
		Self::new(FactoryOptions::production(), Diagnostics::disabled(), AuthoringSlot::new())
	}

	/// The behavior switches this factory was built with.
	pub fn options(&self) -> FactoryOptions {
		self.options
	}

	/// The authoring slot this factory reads.
	pub fn authoring(&self) -> &AuthoringSlot {
		&self.authoring
	}

	/// The diagnostics handle this factory warns through.
	pub fn diagnostics(&self) -> &Diagnostics {
		&self.diagnostics
	}

	/// Creates a new element of `kind`.
	///
	/// Reserved fields (`key`, `ref`, and the two development annotations)
	/// are extracted from `config`, the remaining fields become props,
	/// children are normalized, absent fields are filled from the kind's
	/// default table, and the current authoring context is recorded for
	/// attribution.
	pub fn create(
		&self,
		kind: impl Into<NodeKind>,
		config: Option<&Props>,
		children: Vec<Value>,
	) -> Element {
		let kind = kind.into();
		let ReservedFields {
			key,
			ref_binding,
			self_context,
			origin,
			remaining: mut props,
		} = ReservedFields::extract(config);
		attach_children(&mut props, children);
		resolve_creation_defaults(&kind, &mut props);
		self.install_traps(&kind, key.is_some(), ref_binding.is_some(), &mut props);
		Element::assemble(
			ResolvedFields {
				kind,
				key,
				ref_binding,
				self_context,
				origin,
				authoring: self.authoring.current(),
				props,
			},
			&self.options,
		)
	}

	/// Returns a reusable factory with `kind` fixed, equivalent to partially
	/// applying [`ElementFactory::create`].
	pub fn factory_for(&self, kind: impl Into<NodeKind>) -> TypedFactory {
		TypedFactory {
			factory: self.clone(),
			kind: kind.into(),
		}
	}

	/// Clones `source` into a new element, applying configuration overrides.
	///
	/// Props start as a shallow copy of the source's props. Key, ref, the
	/// development annotations, and the authoring context all default to the
	/// source's values and are only replaced when the configuration validly
	/// supplies them. A valid ref override also reassigns attribution to the
	/// current authoring context: a new ref binding implies new ownership.
	///
	/// Overrides are undefined-sensitive: when the source kind declares a
	/// default table, an explicit undefined override resolves to the table's
	/// value for that field (or stays undefined when the table lacks one).
	pub fn clone_element(
		&self,
		source: &Element,
		config: Option<&Props>,
		children: Vec<Value>,
	) -> Element {
		let kind = source.kind.clone();
		let mut props = source.props.shallow_copy();
		let mut key = source.key.clone();
		let mut ref_binding = source.ref_binding.clone();
		let (mut self_context, mut origin) = match &source.dev {
			Some(dev) => (dev.self_context.clone(), dev.origin),
			None => (None, None),
		};
		let mut authoring = source.authoring.clone();

		if let Some(config) = config {
			if let Some(binding) = valid_field(config, REF_FIELD).and_then(RefBinding::from_value)
			{
				// A new ref binding steals attribution.
				ref_binding = Some(binding);
				authoring = self.authoring.current();
			}
			if let Some(value) = valid_field(config, KEY_FIELD) {
				key = Some(value.key_string());
			}
			if let Some(context) = valid_field(config, SELF_FIELD).and_then(context_annotation) {
				self_context = Some(context);
			}
			if let Some(annotation) = valid_field(config, ORIGIN_FIELD).and_then(origin_annotation)
			{
				origin = Some(annotation);
			}
			let defaults = kind.defaults();
			for (name, value) in config.iter() {
				if props::is_reserved(name) {
					continue;
				}
				if value.is_undefined() && defaults.is_some() {
					let resolved = defaults
						.and_then(|table| table.get(name))
						.cloned()
						.unwrap_or(Value::Undefined);
					props.put(name.into(), resolved);
				} else {
					props.put(name.into(), value.clone());
				}
			}
		}
		attach_children(&mut props, children);
		Element::assemble(
			ResolvedFields {
				kind,
				key,
				ref_binding,
				self_context,
				origin,
				authoring,
				props,
			},
			&self.options,
		)
	}

	/// Clones `source` changing only the key.
	///
	/// Everything else — ref, props (including any traps), development
	/// annotations, and the authoring context — carries over unmodified. No
	/// configuration is involved.
	pub fn clone_with_key(&self, source: &Element, key: impl Into<CompactString>) -> Element {
		let (self_context, origin) = match &source.dev {
			Some(dev) => (dev.self_context.clone(), dev.origin),
			None => (None, None),
		};
		Element::assemble(
			ResolvedFields {
				kind: source.kind.clone(),
				key: Some(key.into()),
				ref_binding: source.ref_binding.clone(),
				self_context,
				origin,
				authoring: source.authoring.clone(),
				props: source.props.clone(),
			},
			&self.options,
		)
	}

	/// Installs deprecated-access traps over `key`/`ref` when a value was
	/// supplied for them, unless the props map already looks like a spread
	/// descriptor (its own marker field would make the traps misfire).
	fn install_traps(&self, kind: &NodeKind, has_key: bool, has_ref: bool, target: &mut Props) {
		if !self.options.dev_checks || !self.options.immutability {
			return;
		}
		if !has_key && !has_ref {
			return;
		}
		if target.resembles_element() {
			return;
		}
		let kind_name = CompactString::from(kind.display_name());
		if has_key {
			target.install_trap(TrapField::Key, kind_name.clone(), self.diagnostics.clone());
		}
		if has_ref {
			target.install_trap(TrapField::Ref, kind_name, self.diagnostics.clone());
		}
	}
}

/// A factory with the node kind fixed.
///
/// Equivalent to partially applying [`ElementFactory::create`]; the fixed
/// kind stays inspectable on the factory itself.
#[derive(Debug, Clone)]
pub struct TypedFactory {
	factory: ElementFactory,
	kind: NodeKind,
}

impl TypedFactory {
	/// The kind every element from this factory will have.
	pub fn kind(&self) -> &NodeKind {
		&self.kind
	}

	/// Creates an element of the fixed kind.
	pub fn create(&self, config: Option<&Props>, children: Vec<Value>) -> Element {
		self.factory.create(self.kind.clone(), config, children)
	}
}

#[cfg(test)]
mod tests;
