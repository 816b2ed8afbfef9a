//! Immutable element descriptors for declarative UI trees.
//!
//! An [`Element`] describes one node of a UI tree before it is reconciled
//! against a live render target: its kind, optional key and ref, props, and
//! the authoring context that built it. Elements are plain immutable values;
//! all construction funnels through [`ElementFactory`], which resolves
//! reserved configuration fields, normalizes variadic children, applies
//! component default tables, and applies development-mode hardening without
//! affecting production behavior.
//!
//! - [`Element`], [`RefBinding`], [`ValidationStore`]: the descriptor itself
//! - [`ElementFactory`], [`TypedFactory`], [`FactoryOptions`]: construction
//! - [`Props`], [`Value`], [`props!`]: dynamic prop data
//! - [`NodeKind`], [`ComponentDef`]: host tags and component definitions
//! - [`AuthoringSlot`]: the injected "currently constructing" slot

/// The authoring-context slot read during construction.
pub mod authoring;
/// The element descriptor and its development metadata.
pub mod element;
/// Factory operations: create, clone, and typed construction.
pub mod factory;
/// Host tags and component definitions with default tables.
pub mod kind;
mod macros;
/// Source-origin annotations.
pub mod origin;
/// Ordered prop maps with reserved-field handling.
pub mod props;
/// The process-wide descriptor marker.
pub mod tag;
/// Dynamic prop values.
pub mod value;

pub use authoring::{AuthoringContext, AuthoringGuard, AuthoringRef, AuthoringSlot};
pub use element::{Element, RefBinding, ValidationStore, is_element};
pub use factory::{CHILDREN_FIELD, ElementFactory, FactoryOptions, TypedFactory};
pub use kind::{ComponentDef, DefaultProps, NodeKind};
pub use origin::SourceOrigin;
pub use props::{
	KEY_FIELD, ORIGIN_FIELD, Props, PropsError, REF_FIELD, RESERVED_FIELDS, SELF_FIELD,
	is_reserved,
};
pub use tag::{NODE_TAG, NodeTag, TAG_FIELD};
pub use value::{Callback, Value};
