//! Method and field declarations.
//!
//! Members carry their name, type descriptor, access flags, and annotation metadata. A
//! method additionally owns its instruction stream. Members hold a back-reference to the
//! qualified name of their owning unit; the reference is a handle, never ownership - the
//! unit owns the member, not the other way around.

use bitflags::bitflags;

use crate::{
    assembly::InsnStream,
    metadata::annotations::Annotation,
};

/// Name of the method that runs once at class-load time to assign static field initial
/// values.
pub const STATIC_INITIALIZER: &str = "<clinit>";

bitflags! {
    /// Access and property flags of a member declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct MemberFlags: u16 {
        /// Accessible from anywhere
        const PUBLIC = 0x0001;
        /// Accessible only from the declaring unit
        const PRIVATE = 0x0002;
        /// Not bound to an instance
        const STATIC = 0x0008;
        /// Not overridable / not reassignable
        const FINAL = 0x0010;
        /// Generated by a compiler, absent from source
        const SYNTHETIC = 0x1000;
    }
}

/// A method declaration together with its executable body.
#[derive(Debug, Clone, Default)]
pub struct Method {
    /// Name of the method
    pub name: String,
    /// Method type descriptor
    pub descriptor: String,
    /// Access and property flags
    pub flags: MemberFlags,
    /// Qualified name of the owning unit; stamped when the method is added to a unit
    pub owner: String,
    /// Annotations with durable visibility
    pub durable_annotations: Vec<Annotation>,
    /// Annotations with transient visibility
    pub transient_annotations: Vec<Annotation>,
    /// The method's instruction stream
    pub body: InsnStream,
}

impl Method {
    /// Creates a method with an empty body and no annotations.
    pub fn new(name: &str, descriptor: &str, flags: MemberFlags) -> Self {
        Method {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            flags,
            ..Method::default()
        }
    }

    /// Replaces the method body, returning the method for chaining.
    #[must_use]
    pub fn with_body(mut self, body: InsnStream) -> Self {
        self.body = body;
        self
    }

    /// Adds a durable annotation, returning the method for chaining.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.durable_annotations.push(annotation);
        self
    }

    /// Returns true if this is the owning unit's static initializer.
    #[must_use]
    pub fn is_static_initializer(&self) -> bool {
        self.name == STATIC_INITIALIZER
    }
}

/// A field declaration.
#[derive(Debug, Clone, Default)]
pub struct Field {
    /// Name of the field
    pub name: String,
    /// Field type descriptor
    pub descriptor: String,
    /// Access and property flags
    pub flags: MemberFlags,
    /// Qualified name of the owning unit; stamped when the field is added to a unit
    pub owner: String,
    /// Annotations with durable visibility
    pub durable_annotations: Vec<Annotation>,
    /// Annotations with transient visibility
    pub transient_annotations: Vec<Annotation>,
}

impl Field {
    /// Creates a field with no annotations.
    pub fn new(name: &str, descriptor: &str, flags: MemberFlags) -> Self {
        Field {
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            flags,
            ..Field::default()
        }
    }

    /// Adds a durable annotation, returning the field for chaining.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.durable_annotations.push(annotation);
        self
    }
}
