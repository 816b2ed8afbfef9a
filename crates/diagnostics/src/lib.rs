//! Development-mode diagnostics with once-per-key deduplication.
//!
//! Construction code never fails because of a diagnostic: a contract
//! violation is reported through [`Diagnostics::warn_once`], which emits each
//! distinct message key at most once and is a no-op on disabled handles.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use rustc_hash::FxHashSet;

/// Destination for warning messages.
pub trait WarnSink: Send + Sync {
	/// Emits a single, already-formatted warning message.
	fn emit(&self, message: &str);
}

/// Sink that forwards warnings to [`tracing::warn!`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarnSink for TracingSink {
	fn emit(&self, message: &str) {
		tracing::warn!(target: "arbor", "{message}");
	}
}

/// Sink that records warnings in memory, for tests.
#[derive(Debug, Default)]
pub struct MemorySink {
	messages: Mutex<Vec<String>>,
}

impl MemorySink {
	/// Creates an empty shared sink.
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	/// Returns the messages recorded so far, in emission order.
	pub fn messages(&self) -> Vec<String> {
		self.messages.lock().clone()
	}
}

impl WarnSink for MemorySink {
	fn emit(&self, message: &str) {
		self.messages.lock().push(message.to_string());
	}
}

struct Inner {
	sink: Arc<dyn WarnSink>,
	seen: Mutex<FxHashSet<String>>,
}

/// Cheap-to-clone handle for emitting deduplicated warnings.
///
/// Clones share the same dedup set, so a key warned through one handle stays
/// silenced on every clone. A disabled handle ignores all calls.
#[derive(Clone)]
pub struct Diagnostics {
	inner: Option<Arc<Inner>>,
}

impl Diagnostics {
	/// Creates an enabled handle emitting through `sink`.
	pub fn new(sink: Arc<dyn WarnSink>) -> Self {
		Self {
			inner: Some(Arc::new(Inner {
				sink,
				seen: Mutex::new(FxHashSet::default()),
			})),
		}
	}

	/// Creates an enabled handle emitting through [`tracing::warn!`].
	pub fn tracing() -> Self {
		Self::new(Arc::new(TracingSink))
	}

	/// Creates a handle that ignores every call.
	pub fn disabled() -> Self {
		Self { inner: None }
	}

	/// Returns true if warnings from this handle can be emitted at all.
	pub fn is_enabled(&self) -> bool {
		self.inner.is_some()
	}

	/// Warns once per distinct `key` when `ok` does not hold.
	///
	/// `message` is only rendered for the first emission of a key. Never
	/// panics; a violated contract degrades to a warning, not a failure.
	pub fn warn_once(&self, ok: bool, key: &str, message: impl FnOnce() -> String) {
		if ok {
			return;
		}
		let Some(inner) = &self.inner else { return };
		if inner.seen.lock().insert(key.to_string()) {
			inner.sink.emit(&message());
		}
	}
}

impl fmt::Debug for Diagnostics {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Diagnostics")
			.field("enabled", &self.is_enabled())
			.finish()
	}
}
