//! The immutable element descriptor.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use compact_str::CompactString;

use crate::authoring::AuthoringRef;
use crate::factory::FactoryOptions;
use crate::kind::NodeKind;
use crate::origin::SourceOrigin;
use crate::props::Props;
use crate::tag::{NODE_TAG, NodeTag};
use crate::value::{Callback, Value};

/// How an element asks for a handle to its instantiated node.
#[derive(Debug, Clone, PartialEq)]
pub enum RefBinding {
	/// Name-based handle lookup (legacy form).
	Legacy(CompactString),
	/// Callback invoked with the instantiated node.
	Callback(Callback),
}

impl RefBinding {
	/// Converts a configuration value into a binding.
	///
	/// A ref has exactly three shapes: absent, a string, or a callback.
	/// Values of any other shape are not representable and yield `None`.
	pub(crate) fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::Str(name) => Some(Self::Legacy(name.clone())),
			Value::Callback(callback) => Some(Self::Callback(callback.clone())),
			_ => None,
		}
	}
}

/// Mutable validation record kept off the element itself.
///
/// The reconciler flips the flag when it validates an element's children;
/// keeping the flag in a shared side record lets the element stay immutable
/// while every holder observes the update.
#[derive(Debug, Clone, Default)]
pub struct ValidationStore(Arc<AtomicBool>);

impl ValidationStore {
	/// Returns true once the element has passed child validation.
	pub fn validated(&self) -> bool {
		self.0.load(Ordering::Relaxed)
	}

	/// Marks the element as validated.
	pub fn mark_validated(&self) {
		self.0.store(true, Ordering::Relaxed);
	}
}

/// Development-only metadata. Excluded from equality so structurally equal
/// elements built in different places still compare equal.
#[derive(Debug, Clone)]
pub(crate) struct DevMeta {
	pub(crate) self_context: Option<AuthoringRef>,
	pub(crate) origin: Option<SourceOrigin>,
	pub(crate) store: ValidationStore,
}

/// Fully-resolved constructor inputs, produced by the factory operations.
pub(crate) struct ResolvedFields {
	pub(crate) kind: NodeKind,
	pub(crate) key: Option<CompactString>,
	pub(crate) ref_binding: Option<RefBinding>,
	pub(crate) self_context: Option<AuthoringRef>,
	pub(crate) origin: Option<SourceOrigin>,
	pub(crate) authoring: Option<AuthoringRef>,
	pub(crate) props: Props,
}

/// One node of a declarative UI tree, before reconciliation.
///
/// An element is an immutable value: kind, key, ref, props, and attribution
/// are fixed at construction, and every cloning operation builds a new
/// element rather than mutating the original. Elements are cheap to clone
/// and carry no lifecycle of their own; whichever structure holds one owns
/// it until it is dropped.
#[derive(Clone)]
pub struct Element {
	tag: NodeTag,
	pub(crate) kind: NodeKind,
	pub(crate) key: Option<CompactString>,
	pub(crate) ref_binding: Option<RefBinding>,
	pub(crate) props: Props,
	pub(crate) authoring: Option<AuthoringRef>,
	pub(crate) dev: Option<DevMeta>,
}

impl Element {
	/// Constructor primitive: assembles a descriptor from fully-resolved
	/// fields.
	///
	/// Trusts its caller; all validation and normalization happens upstream
	/// in the factory operations. Stamps the process-wide tag, attaches
	/// development metadata when enabled, and freezes props as the final
	/// step so every field is in place first.
	pub(crate) fn assemble(fields: ResolvedFields, options: &FactoryOptions) -> Self {
		let ResolvedFields {
			kind,
			key,
			ref_binding,
			self_context,
			origin,
			authoring,
			mut props,
		} = fields;
		let dev = options.dev_checks.then(|| DevMeta {
			self_context,
			origin,
			store: ValidationStore::default(),
		});
		if options.dev_checks && options.immutability {
			props.freeze();
		}
		Self {
			tag: NODE_TAG,
			kind,
			key,
			ref_binding,
			props,
			authoring,
			dev,
		}
	}

	/// The process-wide descriptor marker.
	pub fn tag(&self) -> NodeTag {
		self.tag
	}

	/// The kind of node this element describes.
	pub fn kind(&self) -> &NodeKind {
		&self.kind
	}

	/// Stable identity hint for list reconciliation, if any.
	pub fn key(&self) -> Option<&str> {
		self.key.as_deref()
	}

	/// The requested handle binding, if any.
	pub fn ref_binding(&self) -> Option<&RefBinding> {
		self.ref_binding.as_ref()
	}

	/// User-supplied data, with normalized children injected.
	pub fn props(&self) -> &Props {
		&self.props
	}

	/// The authoring context active when this element was constructed.
	///
	/// Attribution only; never part of identity or equality.
	pub fn authoring_context(&self) -> Option<&AuthoringRef> {
		self.authoring.as_ref()
	}

	/// Development-only: the lexical context at the construction site, for
	/// detecting authoring-context drift.
	pub fn self_context(&self) -> Option<&AuthoringRef> {
		self.dev.as_ref().and_then(|dev| dev.self_context.as_ref())
	}

	/// Development-only: source origin of the construction call.
	pub fn origin(&self) -> Option<SourceOrigin> {
		self.dev.as_ref().and_then(|dev| dev.origin)
	}

	/// Development-only: the mutable validation side record.
	pub fn validation(&self) -> Option<&ValidationStore> {
		self.dev.as_ref().map(|dev| &dev.store)
	}
}

impl PartialEq for Element {
	/// Structural equality over kind, key, ref, and props.
	///
	/// Attribution and development metadata never participate, so elements
	/// built by different authors or in different places compare equal when
	/// they describe the same node.
	fn eq(&self, other: &Self) -> bool {
		self.tag == other.tag
			&& self.kind == other.kind
			&& self.key == other.key
			&& self.ref_binding == other.ref_binding
			&& self.props == other.props
	}
}

impl fmt::Debug for Element {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut s = f.debug_struct("Element");
		s.field("kind", &self.kind.display_name());
		s.field("key", &self.key);
		s.field("ref", &self.ref_binding);
		s.field("props", &self.props);
		if let Some(authoring) = &self.authoring {
			s.field("authoring", &authoring.name());
		}
		s.finish()
	}
}

/// True iff `value` is an element descriptor carrying the process-wide
/// marker. Distinguishes descriptors from arbitrary prop data.
pub fn is_element(value: &Value) -> bool {
	matches!(value, Value::Node(node) if node.tag == NODE_TAG)
}
