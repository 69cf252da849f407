//! Instruction representation for compiled method bodies.
//!
//! This module defines the type system for the low-level operations that make up a method's
//! executable body. Instructions are a closed tagged variant; each variant corresponds to one
//! of the operation families the stripping heuristics must distinguish.
//!
//! # Key Components
//!
//! - [`crate::assembly::Instruction`] - The tagged instruction variant
//! - [`crate::assembly::MemberRef`] - (owner, name, descriptor) reference triple
//! - [`crate::assembly::PlainOp`] - Operand-less operations
//! - [`crate::assembly::Constant`] - Values loadable by a constant-load instruction
//!
//! # Design
//!
//! Instructions carry no inherent stack-depth information. The stripping algorithms in
//! [`crate::stripper`] infer depth with a bounded counting walk instead of a full abstract
//! interpreter, so the model only needs to expose which family an instruction belongs to.
//!
//! # Usage Examples
//!
//! ```rust
//! use stripscope::assembly::{CallKind, Instruction, MemberRef};
//!
//! let call = Instruction::MethodRef {
//!     method: MemberRef::new("demo/Helper", "floorDiv", "(II)I"),
//!     call: CallKind::Static,
//! };
//! assert!(call.references_unit("demo/Helper"));
//! ```

use std::fmt;

/// A reference to a member declared by some compiled unit.
///
/// The triple of owner qualified name, member name, and type descriptor uniquely identifies
/// a method or field across the unit set. Field-reference and method-reference instructions
/// embed one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRef {
    /// Qualified name of the unit that declares the member
    pub owner: String,
    /// Name of the member
    pub name: String,
    /// Type descriptor of the member
    pub descriptor: String,
}

impl MemberRef {
    /// Creates a new member reference from its parts.
    pub fn new(owner: &str, name: &str, descriptor: &str) -> Self {
        MemberRef {
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}{}", self.owner, self.name, self.descriptor)
    }
}

/// Operations that take no operand.
///
/// The stripping heuristics only need two distinguished members of this family: the return
/// instruction (stream termination repair after initializer edits) and the array-store group
/// (early stop for the residual read lookahead). The remaining variants are the common stack
/// and arithmetic operations found in real instruction streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PlainOp {
    /// No operation
    Nop,
    /// Duplicate the top stack value
    Dup,
    /// Discard the top stack value
    Pop,
    /// Swap the two top stack values
    Swap,
    /// Add the two top stack values
    Add,
    /// Subtract the two top stack values
    Sub,
    /// Multiply the two top stack values
    Mul,
    /// Divide the two top stack values
    Div,
    /// Remainder of the two top stack values
    Rem,
    /// Negate the top stack value
    Neg,
    /// Load an element from an array
    ArrayLoad,
    /// Store an element into an array
    ArrayStore,
    /// Push the length of an array
    ArrayLength,
    /// Return from the current method
    Return,
}

impl PlainOp {
    /// Returns true if this operation terminates the enclosing method.
    #[must_use]
    pub const fn is_return(&self) -> bool {
        matches!(self, PlainOp::Return)
    }

    /// Returns true if this operation belongs to the array-store family.
    #[must_use]
    pub const fn is_array_store(&self) -> bool {
        matches!(self, PlainOp::ArrayStore)
    }
}

/// A value loadable by a constant-load instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    /// 32-bit integer constant
    Integer(i32),
    /// 64-bit integer constant
    Long(i64),
    /// 32-bit floating point constant
    Float(f32),
    /// 64-bit floating point constant
    Double(f64),
    /// String constant
    Text(String),
    /// Type literal constant (qualified name)
    TypeName(String),
}

/// Direction of a local-variable access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalAccess {
    /// Push the local's value onto the stack
    Load,
    /// Pop the top of the stack into the local
    Store,
}

/// Direction of a field access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAccess {
    /// Read the field's value onto the stack
    Read,
    /// Write the top of the stack into the field
    Write,
}

/// Dispatch kind of a method invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// Static call - consumes the declared arguments only
    Static,
    /// Instance call - consumes the declared arguments plus the implicit receiver
    Virtual,
}

/// A single low-level operation in a method's instruction stream.
///
/// This is the complete variant set the stripping algorithms operate over. Streams are held
/// by [`crate::assembly::InsnStream`], which provides the positional mutation contract the
/// strippers rely on.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// An operation without operands
    Plain(PlainOp),
    /// Load of a pooled constant
    LoadConst(Constant),
    /// Push of a small integer immediate
    IntImmediate(i32),
    /// Access to a local variable slot
    LocalVar {
        /// Load or store
        access: LocalAccess,
        /// Zero-based local slot
        slot: u16,
    },
    /// A type operation (instantiation, cast, or type check) naming a unit
    TypeRef {
        /// Qualified name of the referenced type
        type_name: String,
    },
    /// Read or write of a field
    FieldRef {
        /// The referenced field
        field: MemberRef,
        /// Read or write
        access: FieldAccess,
    },
    /// Invocation of a method
    MethodRef {
        /// The invoked method
        method: MemberRef,
        /// Static or instance dispatch
        call: CallKind,
    },
}

impl Instruction {
    /// Returns true if this instruction is a return.
    #[must_use]
    pub const fn is_return(&self) -> bool {
        matches!(self, Instruction::Plain(op) if op.is_return())
    }

    /// Returns true if this instruction names `unit` as a type, a method owner, or a
    /// field owner.
    ///
    /// This is the match predicate of whole-class removal: after a class is stripped, no
    /// surviving stream may contain an instruction for which this returns true.
    #[must_use]
    pub fn references_unit(&self, unit: &str) -> bool {
        match self {
            Instruction::TypeRef { type_name } => type_name == unit,
            Instruction::FieldRef { field, .. } => field.owner == unit,
            Instruction::MethodRef { method, .. } => method.owner == unit,
            _ => false,
        }
    }

    /// Returns the field reference and access direction if this is a field instruction.
    #[must_use]
    pub fn as_field_ref(&self) -> Option<(&MemberRef, FieldAccess)> {
        match self {
            Instruction::FieldRef { field, access } => Some((field, *access)),
            _ => None,
        }
    }

    /// Returns the method reference and call kind if this is an invocation.
    #[must_use]
    pub fn as_method_ref(&self) -> Option<(&MemberRef, CallKind)> {
        match self {
            Instruction::MethodRef { method, call } => Some((method, *call)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_references_unit_by_family() {
        let type_ref = Instruction::TypeRef {
            type_name: "demo/Unused".to_string(),
        };
        let field_ref = Instruction::FieldRef {
            field: MemberRef::new("demo/Unused", "count", "I"),
            access: FieldAccess::Read,
        };
        let call = Instruction::MethodRef {
            method: MemberRef::new("demo/Unused", "run", "()V"),
            call: CallKind::Virtual,
        };

        for insn in [&type_ref, &field_ref, &call] {
            assert!(insn.references_unit("demo/Unused"));
            assert!(!insn.references_unit("demo/Other"));
        }

        // Non-referencing families never match
        assert!(!Instruction::Plain(PlainOp::Nop).references_unit("demo/Unused"));
        assert!(!Instruction::IntImmediate(3).references_unit("demo/Unused"));
    }

    #[test]
    fn test_return_detection() {
        assert!(Instruction::Plain(PlainOp::Return).is_return());
        assert!(!Instruction::Plain(PlainOp::Nop).is_return());
        assert!(!Instruction::IntImmediate(0).is_return());
    }

    #[test]
    fn test_member_ref_display() {
        let m = MemberRef::new("demo/Helper", "floorDiv", "(II)I");
        assert_eq!(m.to_string(), "demo/Helper::floorDiv(II)I");
    }
}
