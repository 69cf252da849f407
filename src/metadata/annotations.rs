//! Annotation metadata attached to units and members.
//!
//! The annotation model itself (how markers are authored and compiled) is external to this
//! crate; what lives here is the in-memory view the selector consumes: a descriptor plus a
//! flat list of named payload values. Units and members carry two annotation lists, one for
//! the durable visibility class and one for the transient class, mirroring the two retention
//! classes of the source format.
//!
//! # Marker surface
//!
//! The four markers the selector recognizes are identified by descriptor via the
//! [`markers`] constants:
//!
//! - strip marker - requests removal of the annotated declaration; optional
//!   [`markers::ALT_TARGET_PATH`] payload naming an override target unit
//! - strippable marker - required on a class for any strip marker on it or its members to
//!   be honored
//! - alias marker - declares a member mirrors a member of the owning class's stand-in
//!   target(s)
//! - stand-in marker - declares a class patches one or more real target units, listed in
//!   the [`markers::TARGETS`] payload

/// A single payload value inside an annotation.
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    /// String payload
    Text(String),
    /// Integral payload
    Number(i64),
    /// Boolean payload
    Flag(bool),
    /// Qualified type name payload
    TypeName(String),
    /// Ordered list payload
    List(Vec<AnnotationValue>),
}

impl AnnotationValue {
    /// Returns the string content for [`AnnotationValue::Text`] values.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AnnotationValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the qualified name for [`AnnotationValue::TypeName`] values.
    #[must_use]
    pub fn as_type_name(&self) -> Option<&str> {
        match self {
            AnnotationValue::TypeName(s) => Some(s),
            _ => None,
        }
    }
}

/// An annotation instance: a descriptor plus named payload values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Annotation {
    /// Descriptor identifying the annotation type
    pub descriptor: String,
    /// Named payload values, in declaration order
    pub values: Vec<(String, AnnotationValue)>,
}

impl Annotation {
    /// Creates a payload-less annotation with the given descriptor.
    pub fn new(descriptor: &str) -> Self {
        Annotation {
            descriptor: descriptor.to_string(),
            values: Vec::new(),
        }
    }

    /// Adds a named payload value, returning the annotation for chaining.
    #[must_use]
    pub fn with_value(mut self, key: &str, value: AnnotationValue) -> Self {
        self.values.push((key.to_string(), value));
        self
    }

    /// Looks up a payload value by key.
    #[must_use]
    pub fn value(&self, key: &str) -> Option<&AnnotationValue> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Looks up a string payload value by key.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.value(key).and_then(AnnotationValue::as_text)
    }
}

/// Descriptors and payload keys of the markers the selector consumes.
pub mod markers {
    /// Strip marker: the annotated declaration is to be removed.
    pub const STRIP: &str = "Lstripscope/annotation/Strip;";
    /// Strippable marker: the class honors strip markers on itself and its members.
    pub const STRIPPABLE: &str = "Lstripscope/annotation/Strippable;";
    /// Alias marker: the member mirrors a member of the owning class's stand-in target(s).
    pub const ALIAS: &str = "Lstripscope/annotation/Alias;";
    /// Stand-in marker: the class patches one or more real target units.
    pub const STAND_IN: &str = "Lstripscope/annotation/StandIn;";

    /// Strip marker payload: qualified name of an override target unit.
    pub const ALT_TARGET_PATH: &str = "altTargetPath";
    /// Stand-in marker payload: list of target qualified names.
    pub const TARGETS: &str = "value";
}
