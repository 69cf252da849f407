//! Whole-class removal.
//!
//! Removing a class purges every reference to it from the units in scope: field
//! declarations of the doomed type are deleted wholesale, and every type-reference,
//! method-reference, and field-reference instruction naming the doomed unit is removed
//! from every method body. No backward context is scanned - this is the lowest-risk case,
//! as the matching instructions are assumed dead on their own once orphaned.

use crate::{
    assembly::InsnId,
    metadata::{descriptor, CompiledUnit},
};

/// Removes every reference to `target_name` from the units in `scope`.
///
/// The doomed unit's own declaration is not touched here; the orchestrator removes it
/// from the working set. Callers choose the scope: the selector passes a single unit for
/// direct strips and the {stand-in, target} pair for indirected ones, while hosts running
/// a global purge can pass every unit.
pub fn strip_class<'a, I>(target_name: &str, scope: I)
where
    I: IntoIterator<Item = &'a mut CompiledUnit>,
{
    for unit in scope {
        purge_unit_references(unit, target_name);
    }
}

/// Deletes `unit`'s field declarations of the target type and every instruction in its
/// method bodies that references the target.
fn purge_unit_references(unit: &mut CompiledUnit, target: &str) {
    unit.fields
        .retain(|field| !descriptor::references_type(&field.descriptor, target));

    for method in &mut unit.methods {
        let doomed: Vec<InsnId> = method
            .body
            .iter()
            .filter(|(_, insn)| insn.references_unit(target))
            .map(|(id, _)| id)
            .collect();
        for id in doomed {
            method.body.remove(id);
        }
    }
}
