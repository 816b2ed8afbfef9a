use std::sync::Arc;

use arbor_diagnostics::{Diagnostics, MemorySink};
use pretty_assertions::assert_eq;
use rstest::rstest;

use super::*;
use crate::authoring::AuthoringContext;
use crate::element::is_element;
use crate::kind::ComponentDef;
use crate::origin::SourceOrigin;
use crate::tag::{NODE_TAG, TAG_FIELD};

fn dev_factory() -> (Arc<MemorySink>, ElementFactory) {
	let sink = MemorySink::new();
	let factory = ElementFactory::new(
		FactoryOptions::development(),
		Diagnostics::new(sink.clone()),
		AuthoringSlot::new(),
	);
	(sink, factory)
}

fn color_component() -> Arc<ComponentDef> {
	ComponentDef::new("swatch").default_prop("color", "red").build()
}

#[rstest]
#[case(Value::Str("a".into()), "a")]
#[case(Value::Int(0), "0")]
#[case(Value::Int(42), "42")]
#[case(Value::Bool(true), "true")]
#[case(Value::Float(1.5), "1.5")]
fn keys_are_normalized_to_strings(#[case] raw: Value, #[case] expected: &str) {
	let (_sink, factory) = dev_factory();
	let config = Props::new().with(KEY_FIELD, raw);
	let element = factory.create("text", Some(&config), vec![]);
	assert_eq!(element.key(), Some(expected));
}

#[test]
fn undefined_key_is_not_a_key() {
	let (_sink, factory) = dev_factory();
	let config = Props::new().with(KEY_FIELD, Value::Undefined);
	let element = factory.create("text", Some(&config), vec![]);
	assert_eq!(element.key(), None);
}

#[test]
fn trapped_key_in_config_is_not_a_key() {
	let (sink, factory) = dev_factory();
	let keyed = factory.create("text", Some(&Props::new().with(KEY_FIELD, "k")), vec![]);
	// A previous element's props carry a key trap; reusing them as config
	// must not resurrect the key, and inspecting the slot must stay silent.
	let reused = factory.create("text", Some(&keyed.props().clone()), vec![]);
	assert_eq!(reused.key(), None);
	assert!(sink.messages().is_empty());
}

#[test]
fn missing_config_produces_empty_props() {
	let (_sink, factory) = dev_factory();
	let element = factory.create("text", None, vec![]);
	assert_eq!(element.key(), None);
	assert!(element.ref_binding().is_none());
	assert!(element.props().is_empty());
}

#[test]
fn a_single_child_is_stored_unwrapped() {
	let (_sink, factory) = dev_factory();
	let child = factory.create("text", None, vec![]);
	let parent = factory.create("stack", None, vec![Value::Node(child.clone())]);
	assert_eq!(parent.props().get(CHILDREN_FIELD), Some(&Value::Node(child)));
}

#[test]
fn multiple_children_become_an_ordered_list() {
	let (_sink, factory) = dev_factory();
	let parent = factory.create(
		"stack",
		None,
		vec![Value::Str("first".into()), Value::Str("second".into()), Value::Int(3)],
	);
	assert_eq!(
		parent.props().get(CHILDREN_FIELD),
		Some(&Value::List(vec![
			Value::Str("first".into()),
			Value::Str("second".into()),
			Value::Int(3),
		]))
	);
}

#[test]
fn no_children_leaves_the_field_unset() {
	let (_sink, factory) = dev_factory();
	let element = factory.create("stack", None, vec![]);
	assert!(!element.props().contains(CHILDREN_FIELD));
}

#[test]
fn defaults_fill_absent_fields() {
	let (_sink, factory) = dev_factory();
	let element = factory.create(color_component(), Some(&Props::new()), vec![]);
	assert_eq!(element.props().get("color"), Some(&Value::Str("red".into())));
}

#[test]
fn supplied_fields_beat_defaults() {
	let (_sink, factory) = dev_factory();
	let config = Props::new().with("color", "blue");
	let element = factory.create(color_component(), Some(&config), vec![]);
	assert_eq!(element.props().get("color"), Some(&Value::Str("blue".into())));
}

#[test]
fn creation_keeps_explicit_undefined_fields() {
	// The creation path is presence-based: only fully absent fields are
	// filled from the default table. Cloning is the undefined-sensitive path.
	let (_sink, factory) = dev_factory();
	let config = Props::new().with("color", Value::Undefined);
	let element = factory.create(color_component(), Some(&config), vec![]);
	assert_eq!(element.props().get("color"), Some(&Value::Undefined));
}

#[test]
fn clone_resolves_undefined_overrides_to_defaults() {
	let (_sink, factory) = dev_factory();
	let source = factory.create(
		color_component(),
		Some(&Props::new().with("color", "blue")),
		vec![],
	);
	let config = Props::new().with("color", Value::Undefined);
	let cloned = factory.clone_element(&source, Some(&config), vec![]);
	assert_eq!(cloned.props().get("color"), Some(&Value::Str("red".into())));
}

#[test]
fn clone_undefined_override_without_a_table_entry_stays_undefined() {
	let (_sink, factory) = dev_factory();
	let source = factory.create(color_component(), None, vec![]);
	let config = Props::new().with("padding", Value::Undefined);
	let cloned = factory.clone_element(&source, Some(&config), vec![]);
	assert_eq!(cloned.props().get("padding"), Some(&Value::Undefined));
}

#[test]
fn clone_undefined_override_without_any_table_writes_through() {
	let (_sink, factory) = dev_factory();
	let source = factory.create("text", Some(&Props::new().with("color", "blue")), vec![]);
	let config = Props::new().with("color", Value::Undefined);
	let cloned = factory.clone_element(&source, Some(&config), vec![]);
	assert_eq!(cloned.props().get("color"), Some(&Value::Undefined));
}

#[test]
fn clone_without_config_preserves_identity_fields() {
	let (_sink, factory) = dev_factory();
	let config = Props::new()
		.with(KEY_FIELD, "k")
		.with(REF_FIELD, "handle")
		.with("color", "blue");
	let source = factory.create("text", Some(&config), vec![]);
	let cloned = factory.clone_element(&source, None, vec![]);
	assert_eq!(cloned.key(), source.key());
	assert_eq!(cloned.ref_binding(), source.ref_binding());
	assert_eq!(cloned.props().get("color"), Some(&Value::Str("blue".into())));
}

#[test]
fn clone_builds_a_new_element() {
	let (_sink, factory) = dev_factory();
	let source = factory.create("text", Some(&Props::new().with("color", "blue")), vec![]);
	let cloned = factory.clone_element(&source, Some(&Props::new().with("color", "green")), vec![]);
	assert_eq!(source.props().get("color"), Some(&Value::Str("blue".into())));
	assert_eq!(cloned.props().get("color"), Some(&Value::Str("green".into())));
}

#[test]
fn clone_key_override_is_string_normalized() {
	let (_sink, factory) = dev_factory();
	let source = factory.create("text", Some(&Props::new().with(KEY_FIELD, "old")), vec![]);
	let config = Props::new().with(KEY_FIELD, 0);
	let cloned = factory.clone_element(&source, Some(&config), vec![]);
	assert_eq!(cloned.key(), Some("0"));
}

#[test]
fn clone_ref_override_steals_attribution() {
	let (_sink, factory) = dev_factory();
	let original_owner = Arc::new(AuthoringContext::new("original"));
	let source = {
		let _guard = factory.authoring().enter(original_owner.clone());
		factory.create("text", Some(&Props::new().with(REF_FIELD, "old")), vec![])
	};
	let new_owner = Arc::new(AuthoringContext::new("cloner"));
	let _guard = factory.authoring().enter(new_owner.clone());
	let rebound = factory.clone_element(
		&source,
		Some(&Props::new().with(REF_FIELD, "new")),
		vec![],
	);
	assert!(Arc::ptr_eq(rebound.authoring_context().unwrap(), &new_owner));
	assert_eq!(rebound.ref_binding(), Some(&RefBinding::Legacy("new".into())));
}

#[test]
fn clone_without_ref_override_preserves_attribution() {
	let (_sink, factory) = dev_factory();
	let original_owner = Arc::new(AuthoringContext::new("original"));
	let source = {
		let _guard = factory.authoring().enter(original_owner.clone());
		factory.create("text", Some(&Props::new().with(REF_FIELD, "old")), vec![])
	};
	let _guard = factory
		.authoring()
		.enter(Arc::new(AuthoringContext::new("cloner")));
	let cloned = factory.clone_element(
		&source,
		Some(&Props::new().with("color", "blue")),
		vec![],
	);
	assert!(Arc::ptr_eq(cloned.authoring_context().unwrap(), &original_owner));
}

#[test]
fn clone_children_override_replaces_the_source_children() {
	let (_sink, factory) = dev_factory();
	let source = factory.create("stack", None, vec![Value::Str("old".into())]);
	let cloned = factory.clone_element(&source, None, vec![Value::Str("new".into())]);
	assert_eq!(cloned.props().get(CHILDREN_FIELD), Some(&Value::Str("new".into())));
}

#[test]
fn clone_with_key_changes_only_the_key() {
	let (_sink, factory) = dev_factory();
	let owner = Arc::new(AuthoringContext::new("owner"));
	let source = {
		let _guard = factory.authoring().enter(owner.clone());
		factory.create(
			color_component(),
			Some(&Props::new().with(REF_FIELD, "handle").with(KEY_FIELD, "old")),
			vec![],
		)
	};
	let rekeyed = factory.clone_with_key(&source, "new");
	assert_eq!(rekeyed.key(), Some("new"));
	assert_eq!(rekeyed.ref_binding(), source.ref_binding());
	assert_eq!(rekeyed.props(), source.props());
	assert_eq!(rekeyed.origin(), source.origin());
	assert!(Arc::ptr_eq(rekeyed.authoring_context().unwrap(), &owner));
}

#[test]
fn reserved_fields_never_reach_props() {
	let (_sink, factory) = dev_factory();
	let config = Props::new()
		.with(KEY_FIELD, "k")
		.with(REF_FIELD, "handle")
		.with(SELF_FIELD, Value::Context(Arc::new(AuthoringContext::new("lex"))))
		.with(ORIGIN_FIELD, SourceOrigin::here())
		.with("color", "red");
	let element = factory.create("text", Some(&config), vec![]);
	assert_eq!(element.props().len(), 1);
	assert!(element.props().contains("color"));
	assert!(!element.props().contains(SELF_FIELD));
	assert!(!element.props().contains(ORIGIN_FIELD));
}

#[test]
fn annotations_resolve_from_config() {
	let (_sink, factory) = dev_factory();
	let lexical = Arc::new(AuthoringContext::new("lex"));
	let origin = SourceOrigin::here();
	let config = Props::new()
		.with(SELF_FIELD, Value::Context(lexical.clone()))
		.with(ORIGIN_FIELD, origin);
	let element = factory.create("text", Some(&config), vec![]);
	assert!(Arc::ptr_eq(element.self_context().unwrap(), &lexical));
	assert_eq!(element.origin(), Some(origin));
}

#[test]
fn reading_a_trapped_key_warns_once_per_kind_name() {
	let (sink, factory) = dev_factory();
	let config = Props::new().with(KEY_FIELD, "k");
	let panel = factory.create(
		ComponentDef::new("panel").display_name("Panel"),
		Some(&config),
		vec![],
	);
	assert_eq!(panel.props().get(KEY_FIELD), None);
	assert_eq!(panel.props().get(KEY_FIELD), None);
	assert_eq!(sink.messages().len(), 1);
	assert!(sink.messages()[0].contains("Panel"));

	let other = factory.create("text", Some(&config), vec![]);
	assert_eq!(other.props().get(KEY_FIELD), None);
	assert_eq!(sink.messages().len(), 2);
	assert!(sink.messages()[1].contains("text"));
}

#[test]
fn ref_trap_warns_separately_from_key() {
	let (sink, factory) = dev_factory();
	let config = Props::new().with(KEY_FIELD, "k").with(REF_FIELD, "handle");
	let element = factory.create("text", Some(&config), vec![]);
	assert_eq!(element.props().get(KEY_FIELD), None);
	assert_eq!(element.props().get(REF_FIELD), None);
	assert_eq!(sink.messages().len(), 2);
}

#[test]
fn spread_descriptor_config_suppresses_traps() {
	let (sink, factory) = dev_factory();
	let config = Props::new()
		.with(KEY_FIELD, "k")
		.with(TAG_FIELD, Value::Tag(NODE_TAG));
	let element = factory.create("text", Some(&config), vec![]);
	assert_eq!(element.key(), Some("k"));
	// The marker flowed into props and no trap was installed over it.
	assert!(!element.props().contains(KEY_FIELD));
	assert_eq!(element.props().get(KEY_FIELD), None);
	assert!(sink.messages().is_empty());
}

#[test]
fn development_props_are_frozen_after_construction() {
	let (_sink, factory) = dev_factory();
	let element = factory.create("text", Some(&Props::new().with("color", "red")), vec![]);
	assert!(element.props().is_frozen());
	let mut copy = element.props().clone();
	assert_eq!(copy.insert("color", "blue"), Err(crate::props::PropsError::Frozen));
	assert_eq!(copy.get("color"), Some(&Value::Str("red".into())));
}

#[test]
fn production_factory_attaches_no_dev_state() {
	let factory = ElementFactory::production();
	let config = Props::new().with(KEY_FIELD, "k").with("color", "red");
	let element = factory.create("text", Some(&config), vec![]);
	assert_eq!(element.key(), Some("k"));
	assert!(element.validation().is_none());
	assert!(element.self_context().is_none());
	assert!(element.origin().is_none());
	assert!(!element.props().is_frozen());
	// No traps either: the key slot is simply absent from props.
	assert_eq!(element.props().get(KEY_FIELD), None);
	assert!(element.props().contains("color"));
}

#[test]
fn dev_without_immutability_skips_freezing_and_traps() {
	let options = FactoryOptions {
		dev_checks: true,
		immutability: false,
	};
	let sink = MemorySink::new();
	let factory = ElementFactory::new(options, Diagnostics::new(sink.clone()), AuthoringSlot::new());
	let element = factory.create("text", Some(&Props::new().with(KEY_FIELD, "k")), vec![]);
	assert_eq!(element.key(), Some("k"));
	assert!(element.validation().is_some());
	assert!(!element.props().is_frozen());
	assert_eq!(element.props().get(KEY_FIELD), None);
	assert!(sink.messages().is_empty());
}

#[test]
fn create_records_the_current_authoring_context() {
	let (_sink, factory) = dev_factory();
	let owner = Arc::new(AuthoringContext::new("owner"));
	let attributed = {
		let _guard = factory.authoring().enter(owner.clone());
		factory.create("text", None, vec![])
	};
	let bare = factory.create("text", None, vec![]);
	assert!(Arc::ptr_eq(attributed.authoring_context().unwrap(), &owner));
	assert!(bare.authoring_context().is_none());
}

#[test]
fn typed_factory_matches_direct_creation() {
	let (_sink, factory) = dev_factory();
	let swatch = color_component();
	let typed = factory.factory_for(swatch.clone());
	assert_eq!(typed.kind(), &NodeKind::component(swatch.clone()));
	let config = Props::new().with("color", "blue");
	let from_typed = typed.create(Some(&config), vec![Value::Str("child".into())]);
	let direct = factory.create(swatch, Some(&config), vec![Value::Str("child".into())]);
	assert_eq!(from_typed, direct);
}

#[test]
fn created_elements_are_valid_descriptor_values() {
	let (_sink, factory) = dev_factory();
	let element = factory.create("text", None, vec![]);
	assert!(is_element(&Value::Node(element)));
}
