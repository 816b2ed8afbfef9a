//! The authoring-context slot: who is constructing nodes right now.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use compact_str::CompactString;

/// The logical entity responsible for constructing descriptors.
///
/// Elements store a non-owning reference for attribution and debugging;
/// the reference never participates in element identity or equality.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthoringContext {
	name: CompactString,
}

impl AuthoringContext {
	/// Creates a context with the given debug name.
	pub fn new(name: impl Into<CompactString>) -> Self {
		Self { name: name.into() }
	}

	/// The debug name of this context.
	pub fn name(&self) -> &str {
		&self.name
	}
}

/// Shared handle to an authoring context.
pub type AuthoringRef = Arc<AuthoringContext>;

/// The mutable "currently constructing" slot.
///
/// The element factory only reads the slot; the instantiation system owns
/// writes and serializes them through its own construction discipline (one
/// node under construction at a time per logical call stack). Handles are
/// cheap to clone and all observe the same slot.
#[derive(Clone, Default)]
pub struct AuthoringSlot {
	current: Arc<ArcSwapOption<AuthoringContext>>,
}

impl AuthoringSlot {
	/// Creates an empty slot.
	pub fn new() -> Self {
		Self::default()
	}

	/// The context active right now, if any.
	pub fn current(&self) -> Option<AuthoringRef> {
		self.current.load_full()
	}

	/// Replaces the active context.
	pub fn set(&self, context: Option<AuthoringRef>) {
		self.current.store(context);
	}

	/// Activates `context` until the returned guard drops, then restores
	/// whatever was active before.
	pub fn enter(&self, context: AuthoringRef) -> AuthoringGuard {
		let previous = self.current.swap(Some(context));
		AuthoringGuard {
			slot: self.clone(),
			previous,
		}
	}
}

impl fmt::Debug for AuthoringSlot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let current = self.current();
		f.debug_struct("AuthoringSlot")
			.field("current", &current.as_ref().map(|context| context.name()))
			.finish()
	}
}

/// Restores the previously active context on drop.
#[must_use = "dropping the guard immediately restores the previous context"]
pub struct AuthoringGuard {
	slot: AuthoringSlot,
	previous: Option<AuthoringRef>,
}

impl Drop for AuthoringGuard {
	fn drop(&mut self) {
		self.slot.current.store(self.previous.take());
	}
}
