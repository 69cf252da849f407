//! Reference-stripping engine, declaration selector, and pass orchestration.
//!
//! This module is the core of the crate: three coordinated removal algorithms (one per
//! declaration kind), the heuristic they share for reconstructing which instructions
//! produced a consumed value, the [`DeclarationNode`] selector that decides what to strip
//! and where, and the [`StripProcessor`] that drives a single pass over the working set.
//!
//! # Key Types
//! - [`strip_class`] / [`strip_field`] / [`strip_method`] - The three removal algorithms
//! - [`DeclarationNode`] - Uniform view over class/method/field declarations
//! - [`StripProcessor`] / [`StripperPlugin`] - Pass driver and lifecycle hooks
//! - [`BytecodeProvider`] / [`MemoryProvider`] - On-demand unit resolution
//! - [`UnitSet`] - The working set of units being edited
//!
//! # The stack balance heuristic
//!
//! The engine must answer "which instructions contributed the value consumed by a doomed
//! instruction" using only a bounded backward walk over an untyped instruction list. The
//! walk keeps a synthetic balance counter, decrementing it for every instruction believed
//! to push a value, and stops when the counter reaches zero, at the window bound, or at the
//! stream start (the conservative fallback - never over-delete past what was seen). This is
//! a heuristic approximation, not a data-flow analysis: instruction windows containing
//! branches or non-local stack effects can under- or over-delete. That trade-off is a
//! documented limitation of the approach; the window bounds are exposed as constants so a
//! stricter analysis can be substituted without changing any calling contract.
//!
//! # Example
//!
//! ```rust
//! use stripscope::{
//!     metadata::{CompiledUnit, Field, MemberFlags, Method, STATIC_INITIALIZER},
//!     assembly::{Constant, FieldAccess, Instruction, MemberRef, PlainOp},
//!     stripper::strip_field,
//! };
//!
//! let mut unit = CompiledUnit::new("demo/Helper");
//! unit.add_field(Field::new("EPSILON", "D", MemberFlags::STATIC));
//! unit.add_method(
//!     Method::new(STATIC_INITIALIZER, "()V", MemberFlags::STATIC).with_body(
//!         [
//!             Instruction::LoadConst(Constant::Double(1e-9)),
//!             Instruction::FieldRef {
//!                 field: MemberRef::new("demo/Helper", "EPSILON", "D"),
//!                 access: FieldAccess::Write,
//!             },
//!             Instruction::Plain(PlainOp::Return),
//!         ]
//!         .into_iter()
//!         .collect(),
//!     ),
//! );
//!
//! strip_field("D", &mut unit)?;
//! let body = &unit.static_initializer().unwrap().body;
//! assert_eq!(body.len(), 1); // only the return survives
//! # Ok::<(), stripscope::Error>(())
//! ```

mod class;
mod field;
mod method;
mod node;
mod processor;
mod provider;

pub use class::strip_class;
pub use field::strip_field;
pub use method::strip_method;
pub use node::DeclarationNode;
pub use processor::{StripProcessor, StripperPlugin, UnitSet};
pub use provider::{BytecodeProvider, MemoryProvider};

use crate::assembly::{InsnId, InsnStream, Instruction};

/// The kind of declaration a strip applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum StripKind {
    /// A whole compiled unit
    Class,
    /// A method declaration
    Method,
    /// A field declaration
    Field,
}

/// Window bound of the backward producer walk, in instructions.
///
/// Tunable; the value is inherited from the reference behavior, with no semantic
/// derivation claimed.
pub const BACKWARD_SCAN_LIMIT: usize = 32;

/// Forward window for removing the consumers of a residual field read, in instructions.
pub const READ_SCAN_LIMIT: usize = 6;

/// Backward window for removing the producers of a residual field write, in instructions.
pub const WRITE_SCAN_LIMIT: usize = 3;

/// Heuristic: does this instruction push a value onto the operand stack?
///
/// Constant loads, integer immediates, local-variable accesses, type operations, plain
/// ops, and method invocations are counted as producers; field accesses are not. This
/// deliberately over-approximates (stores and void calls push nothing) - the walk prefers
/// stopping early over running past the expression it is reconstructing.
pub(crate) fn pushes_value(insn: &Instruction) -> bool {
    match insn {
        Instruction::Plain(_)
        | Instruction::LoadConst(_)
        | Instruction::IntImmediate(_)
        | Instruction::LocalVar { .. }
        | Instruction::TypeRef { .. }
        | Instruction::MethodRef { .. } => true,
        Instruction::FieldRef { .. } => false,
    }
}

/// Walks backward from `from`, returning the start of the span believed to have produced
/// the `consumed` values on top of the stack.
///
/// The returned position is the first instruction of the span; the span always ends at
/// `from` (the consuming instruction), so `remove_range(start, from)` deletes the whole
/// expression inclusive. The walk stops when the balance reaches zero, after
/// [`BACKWARD_SCAN_LIMIT`] instructions, or at the stream start.
pub(crate) fn producer_span_start(stream: &InsnStream, from: InsnId, consumed: usize) -> InsnId {
    let mut balance = consumed;
    let mut budget = BACKWARD_SCAN_LIMIT;
    let mut start = from;
    let mut cursor = stream.prev(from);
    while let Some(id) = cursor {
        if balance == 0 || budget == 0 {
            break;
        }
        budget -= 1;
        if pushes_value(stream.get(id)) {
            balance -= 1;
        }
        start = id;
        cursor = stream.prev(id);
    }
    start
}
