//! Method removal.
//!
//! Removing a method purges its call sites from every method of the owning unit. Each call
//! site consumes one stack slot per declared argument, plus the implicit receiver for
//! instance calls; the bounded backward walk reconstructs the span that produced those
//! values and the whole span is deleted through the call, inclusive.

use crate::{
    assembly::{CallKind, InsnStream},
    metadata::{descriptor, CompiledUnit},
    stripper::producer_span_start,
    Result,
};

/// Removes every call to `owner::name descriptor` from the methods of `unit`, where the
/// owner is `unit` itself.
///
/// Invoked after (or alongside) deleting the method's declaration; the two operations are
/// independent. Invoking this again for an already-stripped method finds no matching call
/// sites and changes nothing.
///
/// # Errors
///
/// Returns [`crate::Error::Malformed`] if `descriptor` is not a well-formed method
/// descriptor.
pub fn strip_method(name: &str, descriptor: &str, unit: &mut CompiledUnit) -> Result<()> {
    let owner = unit.name.clone();
    let argument_count = descriptor::argument_count(descriptor)?;
    for method in &mut unit.methods {
        remove_call_sites(&mut method.body, &owner, name, descriptor, argument_count);
    }
    Ok(())
}

/// Deletes every matching call site in `stream` together with its producing span.
///
/// Call sites are consumed one at a time, re-scanning after each removal, so a span that
/// swallows a later call site never leaves a stale position behind.
fn remove_call_sites(
    stream: &mut InsnStream,
    owner: &str,
    name: &str,
    descriptor: &str,
    argument_count: usize,
) {
    loop {
        let site = stream.iter().find_map(|(id, insn)| {
            insn.as_method_ref().and_then(|(method, call)| {
                (method.owner == owner && method.name == name && method.descriptor == descriptor)
                    .then_some((id, call))
            })
        });
        let Some((site, call)) = site else {
            return;
        };

        let consumed = argument_count + usize::from(call == CallKind::Virtual);
        let start = producer_span_start(stream, site, consumed);
        stream.remove_range(start, site);
    }
}
