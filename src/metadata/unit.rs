//! Compiled unit model.
//!
//! A [`CompiledUnit`] is a named declaration container: an ordered list of method
//! declarations, an ordered list of field declarations, and annotation metadata in two
//! visibility classes. Its qualified name is its identity across the working set. Units are
//! loaded once per artifact scan and mutated in place by member removal; they are never
//! recreated mid-pass.

use crate::metadata::{
    annotations::Annotation,
    member::{Field, Method},
};

/// A loaded class-like declaration container.
#[derive(Debug, Clone, Default)]
pub struct CompiledUnit {
    /// Qualified name; the unit's identity
    pub name: String,
    /// Ordered method declarations
    pub methods: Vec<Method>,
    /// Ordered field declarations
    pub fields: Vec<Field>,
    /// Annotations with durable visibility
    pub durable_annotations: Vec<Annotation>,
    /// Annotations with transient visibility
    pub transient_annotations: Vec<Annotation>,
}

impl CompiledUnit {
    /// Creates an empty unit with the given qualified name.
    pub fn new(name: &str) -> Self {
        CompiledUnit {
            name: name.to_string(),
            ..CompiledUnit::default()
        }
    }

    /// Adds a durable annotation, returning the unit for chaining.
    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.durable_annotations.push(annotation);
        self
    }

    /// Adds a method, stamping its owner back-reference.
    pub fn add_method(&mut self, mut method: Method) {
        method.owner = self.name.clone();
        self.methods.push(method);
    }

    /// Adds a field, stamping its owner back-reference.
    pub fn add_field(&mut self, mut field: Field) {
        field.owner = self.name.clone();
        self.fields.push(field);
    }

    /// Adds a method, returning the unit for chaining.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.add_method(method);
        self
    }

    /// Adds a field, returning the unit for chaining.
    #[must_use]
    pub fn with_field(mut self, field: Field) -> Self {
        self.add_field(field);
        self
    }

    /// Looks up a method by name and descriptor.
    #[must_use]
    pub fn method(&self, name: &str, descriptor: &str) -> Option<&Method> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.descriptor == descriptor)
    }

    /// Looks up a field by name and descriptor.
    #[must_use]
    pub fn field(&self, name: &str, descriptor: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|f| f.name == name && f.descriptor == descriptor)
    }

    /// Returns the static initializer method, if the unit has one.
    #[must_use]
    pub fn static_initializer(&self) -> Option<&Method> {
        self.methods.iter().find(|m| m.is_static_initializer())
    }

    /// Returns the static initializer method mutably, if the unit has one.
    pub fn static_initializer_mut(&mut self) -> Option<&mut Method> {
        self.methods.iter_mut().find(|m| m.is_static_initializer())
    }

    /// Looks up an annotation by descriptor across both visibility classes.
    ///
    /// The durable list is searched first, matching the order annotation metadata is
    /// emitted in.
    #[must_use]
    pub fn annotation(&self, descriptor: &str) -> Option<&Annotation> {
        self.durable_annotations
            .iter()
            .chain(self.transient_annotations.iter())
            .find(|a| a.descriptor == descriptor)
    }
}
