//! Process-wide marker identifying element descriptors.

/// Opaque marker stamped on every element the factory constructs.
///
/// Comparable by equality and consistent across the whole process. The inner
/// value is private, so the only [`NodeTag`] that can ever exist is
/// [`NODE_TAG`]; arbitrary data cannot forge a descriptor marker with a
/// different value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeTag(u32);

/// The single process-wide [`NodeTag`] value.
pub const NODE_TAG: NodeTag = NodeTag(0x4e4f_4445);

/// Field name under which a spread descriptor carries its marker inside a
/// configuration map.
///
/// Deliberately not a reserved name: when a descriptor is spread into a
/// configuration, the marker must survive the props copy so trap installation
/// can recognize a descriptor-shaped map and stay out of its way.
pub const TAG_FIELD: &str = "__tag";
