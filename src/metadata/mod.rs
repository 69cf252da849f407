//! Declaration model: compiled units, members, annotations, and descriptors.
//!
//! This module holds the declaration half of the data model the strippers operate over.
//! A [`CompiledUnit`] owns its [`Method`] and [`Field`] declarations; members carry a
//! non-owning back-reference to their unit's qualified name. Annotation metadata is the
//! payload surface the selector reads to decide what to strip.
//!
//! # Key Types
//! - [`CompiledUnit`] - Named declaration container, identity is its qualified name
//! - [`Method`] / [`Field`] - Member declarations; a method owns its instruction stream
//! - [`Annotation`] - Descriptor plus named payload values
//! - [`descriptor`] - Method/field descriptor parsing helpers

pub mod annotations;
pub mod descriptor;
mod member;
mod unit;

pub use annotations::{markers, Annotation, AnnotationValue};
pub use member::{Field, MemberFlags, Method, STATIC_INITIALIZER};
pub use unit::CompiledUnit;
