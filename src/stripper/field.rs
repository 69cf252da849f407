//! Static field removal.
//!
//! Field removal edits the owning unit's static initializer in two passes. The first pass
//! locates the write that assigns the field's initial value and deletes the whole producing
//! expression, reconstructed with the bounded stack balance walk. The second pass sweeps
//! residual reads and writes of the field with short fixed windows. After editing, the
//! initializer is repaired to end in a return so the stream still terminates validly.
//!
//! Matching is by (owner, descriptor): that is how field-reference instructions identify
//! their target here, and what the reference behavior keys on. The field's name plays no
//! role in instruction matching.

use crate::{
    assembly::{FieldAccess, InsnStream, Instruction, PlainOp},
    stripper::{producer_span_start, READ_SCAN_LIMIT, WRITE_SCAN_LIMIT},
    Error, Result,
};

use crate::metadata::CompiledUnit;

/// Removes the initializer expression and every residual usage of a static field from
/// `unit`'s static initializer.
///
/// Invoked after (or alongside) deleting the field's declaration; the two operations are
/// independent. Afterwards the initializer stream contains no field reference whose
/// (owner, descriptor) matches the stripped field, and still ends in a return instruction.
/// Invoking this again for an already-stripped field finds no matches and changes nothing.
///
/// # Errors
///
/// Returns [`Error::MissingInitializer`] if the unit has no static initializer - the
/// structural fixture this algorithm requires. The artifact is assumed malformed and the
/// pass aborts.
pub fn strip_field(field_descriptor: &str, unit: &mut CompiledUnit) -> Result<()> {
    let owner = unit.name.clone();
    let initializer = unit
        .static_initializer_mut()
        .ok_or(Error::MissingInitializer { unit: owner.clone() })?;
    let body = &mut initializer.body;

    remove_initializer_span(body, &owner, field_descriptor);
    ensure_terminating_return(body);

    // One residual occurrence is handled per sweep; re-invoke until none remain.
    while remove_residual_usage(body, &owner, field_descriptor) {}
    ensure_terminating_return(body);
    Ok(())
}

/// Finds the write assigning the field's initial value and deletes the producing
/// expression through the write, inclusive.
fn remove_initializer_span(stream: &mut InsnStream, owner: &str, descriptor: &str) {
    let write = stream.iter().find_map(|(id, insn)| match insn {
        Instruction::FieldRef {
            field,
            access: FieldAccess::Write,
        } if field.owner == owner && field.descriptor == descriptor => Some(id),
        _ => None,
    });

    if let Some(write) = write {
        // The write consumes exactly one value: the computed initial.
        let start = producer_span_start(stream, write, 1);
        stream.remove_range(start, write);
    }
}

/// Removes the first remaining read or write of the field, together with its short
/// consuming or producing context. Returns false once no usage remains.
fn remove_residual_usage(stream: &mut InsnStream, owner: &str, descriptor: &str) -> bool {
    let usage = stream.iter().find_map(|(id, insn)| {
        insn.as_field_ref().and_then(|(field, access)| {
            (field.owner == owner && field.descriptor == descriptor).then_some((id, access))
        })
    });
    let Some((usage, access)) = usage else {
        return false;
    };

    match access {
        FieldAccess::Read => {
            // Read then use: take the following consumers, stopping once the value has
            // been sunk into an array slot.
            let mut doomed = vec![usage];
            let mut cursor = Some(usage);
            for _ in 0..READ_SCAN_LIMIT {
                cursor = cursor.and_then(|id| stream.next(id));
                let Some(id) = cursor else { break };
                doomed.push(id);
                if matches!(stream.get(id), Instruction::Plain(op) if op.is_array_store()) {
                    break;
                }
            }
            for id in doomed {
                stream.remove(id);
            }
        }
        FieldAccess::Write => {
            // Assignment: take the short value-construction prefix along with the write.
            let mut start = usage;
            for _ in 0..WRITE_SCAN_LIMIT {
                match stream.prev(start) {
                    Some(prev) => start = prev,
                    None => break,
                }
            }
            stream.remove_range(start, usage);
        }
    }
    true
}

/// Appends a return if the stream does not already end in one.
fn ensure_terminating_return(stream: &mut InsnStream) {
    let terminated = stream
        .last()
        .is_some_and(|id| stream.get(id).is_return());
    if !terminated {
        stream.push_back(Instruction::Plain(PlainOp::Return));
    }
}
