//! Instruction model and mutable instruction streams.
//!
//! This module provides the executable-body half of the data model: the tagged
//! [`Instruction`] variant describing a single low-level operation, and [`InsnStream`],
//! the ordered, doubly-traversable sequence that every method body owns.
//!
//! # Key Types
//! - [`Instruction`] - A single low-level operation
//! - [`InsnStream`] - Mutable instruction sequence with O(1) positional mutation
//! - [`InsnId`] - Opaque, stable position inside a stream
//! - [`MemberRef`] - (owner, name, descriptor) reference triple
//!
//! # Example
//! ```rust
//! use stripscope::assembly::{Constant, InsnStream, Instruction, PlainOp};
//!
//! let stream: InsnStream = [
//!     Instruction::LoadConst(Constant::Double(1e-9)),
//!     Instruction::Plain(PlainOp::Return),
//! ]
//! .into_iter()
//! .collect();
//! assert_eq!(stream.len(), 2);
//! ```

mod instruction;
mod stream;

pub use instruction::{
    CallKind, Constant, FieldAccess, Instruction, LocalAccess, MemberRef, PlainOp,
};
pub use stream::{InsnId, InsnStream, Iter};
