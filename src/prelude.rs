//! # stripscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the stripscope library. Import this module to get quick access to the essentials
//! for editing compiled units.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all stripscope operations
pub use crate::Error;

/// The result type used throughout stripscope
pub use crate::Result;

// ================================================================================================
// Declaration Model
// ================================================================================================

/// Compiled units and member declarations
pub use crate::metadata::{CompiledUnit, Field, MemberFlags, Method, STATIC_INITIALIZER};

/// Annotation metadata and the marker descriptors the selector consumes
pub use crate::metadata::{markers, Annotation, AnnotationValue};

// ================================================================================================
// Instruction Model
// ================================================================================================

/// Instructions and the mutable instruction stream
pub use crate::assembly::{
    CallKind, Constant, FieldAccess, InsnId, InsnStream, Instruction, LocalAccess, MemberRef,
    PlainOp,
};

// ================================================================================================
// Stripping
// ================================================================================================

/// The three removal algorithms
pub use crate::stripper::{strip_class, strip_field, strip_method};

/// Selector, pass driver, and unit resolution
pub use crate::stripper::{
    BytecodeProvider, DeclarationNode, MemoryProvider, StripKind, StripProcessor, StripperPlugin,
    UnitSet,
};
