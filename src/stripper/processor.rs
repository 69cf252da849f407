//! Pass orchestration.
//!
//! A strip pass is a single synchronous sweep over the working set: the plugin enumerates
//! the units, every unit is scanned at class level, surviving units are scanned member by
//! member, and the plugin's finish hook fires exactly once at the end. Class-level strips
//! remove the unit from the working set and skip its member scan entirely; member-level
//! strips remove the declaration from its owning list in place, with a cursor that
//! tolerates the removal without skipping successors. No state is revisited and there is
//! no partial-success mode - the first failing strip aborts the pass.

use std::collections::HashSet;

use crate::{
    metadata::CompiledUnit,
    stripper::{BytecodeProvider, DeclarationNode, StripKind},
    Error, Result,
};

/// The working set of units being edited during a pass.
///
/// Units are held in enumeration order; the qualified name is the lookup key. Units
/// pulled in through a [`BytecodeProvider`] join the set and are edited like any other,
/// but only units present at pass start are scanned for markers.
#[derive(Debug, Default)]
pub struct UnitSet {
    units: Vec<CompiledUnit>,
}

impl UnitSet {
    /// Wraps an enumerated list of units as the working set.
    #[must_use]
    pub fn new(units: Vec<CompiledUnit>) -> Self {
        UnitSet { units }
    }

    /// Qualified names of the units currently in the set, in order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.units.iter().map(|u| u.name.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.units.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.units.iter().any(|u| u.name == name)
    }

    /// Looks up a unit by qualified name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CompiledUnit> {
        self.units.iter().find(|u| u.name == name)
    }

    /// Looks up a unit by qualified name, mutably.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut CompiledUnit> {
        self.units.iter_mut().find(|u| u.name == name)
    }

    /// Removes a unit from the set, returning it if it was present.
    pub fn remove(&mut self, name: &str) -> Option<CompiledUnit> {
        let index = self.units.iter().position(|u| u.name == name)?;
        Some(self.units.remove(index))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CompiledUnit> {
        self.units.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, CompiledUnit> {
        self.units.iter_mut()
    }

    /// Mutable iteration restricted to the named units.
    pub fn scoped_mut<'a>(
        &'a mut self,
        names: &'a [&str],
    ) -> impl Iterator<Item = &'a mut CompiledUnit> + 'a {
        self.units
            .iter_mut()
            .filter(move |u| names.contains(&u.name.as_str()))
    }

    /// Returns the named unit, pulling it in through `provider` if it is not in the set
    /// yet. A loaded unit joins the set permanently.
    ///
    /// # Errors
    ///
    /// Propagates the provider's failure when the unit is absent from both the set and
    /// the provider.
    pub fn resolve(
        &mut self,
        provider: &mut dyn BytecodeProvider,
        name: &str,
    ) -> Result<&mut CompiledUnit> {
        let index = match self.units.iter().position(|u| u.name == name) {
            Some(index) => index,
            None => {
                self.units.push(provider.load(name)?);
                self.units.len() - 1
            }
        };
        Ok(&mut self.units[index])
    }

    /// Consumes the set, returning the edited units in order.
    #[must_use]
    pub fn into_units(self) -> Vec<CompiledUnit> {
        self.units
    }
}

impl IntoIterator for UnitSet {
    type Item = CompiledUnit;
    type IntoIter = std::vec::IntoIter<CompiledUnit>;

    fn into_iter(self) -> Self::IntoIter {
        self.units.into_iter()
    }
}

/// Lifecycle hooks and selection policy supplied by the host of a pass.
///
/// Only `init` is mandatory; every hook has a no-op default, and the selection policy
/// defaults to the declaration's own strip marker.
pub trait StripperPlugin {
    /// Enumerates all units of the current artifact. Called once, first.
    ///
    /// # Errors
    ///
    /// Any failure aborts the pass before scanning begins.
    fn init(&mut self) -> Result<Vec<CompiledUnit>>;

    /// Called once after enumeration, before any unit is scanned.
    fn pre_load(&mut self) {}

    /// Selection policy: whether an eligible declaration should actually be stripped.
    fn should_strip(&mut self, node: &DeclarationNode) -> bool {
        node.should_strip()
    }

    /// Called immediately before each strip is applied.
    fn pre_strip(&mut self, _node: &DeclarationNode, _kind: StripKind) {}

    /// Called immediately after each strip is applied.
    fn post_strip(&mut self, _node: &DeclarationNode, _kind: StripKind) {}

    /// Called exactly once after all units have been scanned.
    fn on_finish(&mut self) {}
}

/// Drives one strip pass over the working set.
///
/// The processor owns the per-pass visited set, keyed by (qualified name, kind), which
/// prevents a declaration from being stripped twice within a pass and is torn down when
/// the pass finishes, so a processor can be reused for subsequent passes.
pub struct StripProcessor<'a> {
    provider: &'a mut dyn BytecodeProvider,
    visited: HashSet<(String, StripKind)>,
}

impl<'a> StripProcessor<'a> {
    pub fn new(provider: &'a mut dyn BytecodeProvider) -> Self {
        StripProcessor {
            provider,
            visited: HashSet::new(),
        }
    }

    /// Runs a full pass: enumerate, scan classes, scan members of surviving classes,
    /// finish. Returns the edited working set.
    ///
    /// Only units enumerated by the plugin's `init` are scanned; units resolved through
    /// the provider mid-pass join the set as edit targets only.
    ///
    /// # Errors
    ///
    /// The first failing strip aborts the pass with [`Error::StripFailed`] naming the
    /// offending declaration's qualified name and kind.
    pub fn process(&mut self, plugin: &mut dyn StripperPlugin) -> Result<UnitSet> {
        let mut units = UnitSet::new(plugin.init()?);
        plugin.pre_load();

        for name in units.names() {
            // A unit resolved into the set mid-pass can later be the subject of its own
            // snapshot entry only if it was enumerated; a unit already stripped away is
            // simply gone.
            let Some(unit) = units.get(&name) else {
                continue;
            };

            let class_node = DeclarationNode::from_unit(unit);
            if self.eligible(plugin, &class_node) {
                self.apply(plugin, &class_node, &mut units)?;
                units.remove(&name);
                // Mutual exclusivity: a stripped class is never member-scanned.
                continue;
            }

            self.scan_members(plugin, &mut units, &name)?;
        }

        plugin.on_finish();
        self.visited.clear();
        Ok(units)
    }

    /// Container marker, selection policy, and first visit - all three gates must pass.
    fn eligible(&mut self, plugin: &mut dyn StripperPlugin, node: &DeclarationNode) -> bool {
        node.is_container_strippable()
            && plugin.should_strip(node)
            && self.visited.insert((node.qualified_name(), node.kind()))
    }

    fn apply(
        &mut self,
        plugin: &mut dyn StripperPlugin,
        node: &DeclarationNode,
        units: &mut UnitSet,
    ) -> Result<()> {
        let kind = node.kind();
        plugin.pre_strip(node, kind);
        node.strip(units, self.provider)
            .map_err(|source| Error::StripFailed {
                declaration: node.qualified_name(),
                kind,
                source: Box::new(source),
            })?;
        plugin.post_strip(node, kind);
        Ok(())
    }

    /// Scans a surviving unit's methods, then its fields. The cursor does not advance
    /// after a removal, so successors of a stripped declaration are never skipped.
    fn scan_members(
        &mut self,
        plugin: &mut dyn StripperPlugin,
        units: &mut UnitSet,
        name: &str,
    ) -> Result<()> {
        let mut index = 0;
        loop {
            let node = match units.get(name) {
                Some(unit) => match unit.methods.get(index) {
                    Some(method) => DeclarationNode::from_method(unit, method),
                    None => break,
                },
                None => return Ok(()),
            };
            if self.eligible(plugin, &node) {
                self.apply(plugin, &node, units)?;
                if let Some(unit) = units.get_mut(name) {
                    unit.methods.remove(index);
                }
            } else {
                index += 1;
            }
        }

        let mut index = 0;
        loop {
            let node = match units.get(name) {
                Some(unit) => match unit.fields.get(index) {
                    Some(field) => DeclarationNode::from_field(unit, field),
                    None => break,
                },
                None => return Ok(()),
            };
            if self.eligible(plugin, &node) {
                self.apply(plugin, &node, units)?;
                if let Some(unit) = units.get_mut(name) {
                    unit.fields.remove(index);
                }
            } else {
                index += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assembly::{Constant, FieldAccess, Instruction, MemberRef, PlainOp},
        metadata::{
            annotations::{markers, Annotation, AnnotationValue},
            Field, MemberFlags, Method, STATIC_INITIALIZER,
        },
        stripper::MemoryProvider,
    };

    /// Plugin that records every hook invocation in order.
    #[derive(Default)]
    struct RecordingPlugin {
        units: Vec<CompiledUnit>,
        events: Vec<String>,
    }

    impl RecordingPlugin {
        fn with_units(units: Vec<CompiledUnit>) -> Self {
            RecordingPlugin {
                units,
                events: Vec::new(),
            }
        }
    }

    impl StripperPlugin for RecordingPlugin {
        fn init(&mut self) -> Result<Vec<CompiledUnit>> {
            self.events.push("init".to_string());
            Ok(std::mem::take(&mut self.units))
        }

        fn pre_load(&mut self) {
            self.events.push("pre_load".to_string());
        }

        fn pre_strip(&mut self, node: &DeclarationNode, kind: StripKind) {
            self.events.push(format!("pre:{kind}:{}", node.qualified_name()));
        }

        fn post_strip(&mut self, node: &DeclarationNode, kind: StripKind) {
            self.events.push(format!("post:{kind}:{}", node.qualified_name()));
        }

        fn on_finish(&mut self) {
            self.events.push("finish".to_string());
        }
    }

    fn strippable_unit(name: &str) -> CompiledUnit {
        CompiledUnit::new(name).with_annotation(Annotation::new(markers::STRIPPABLE))
    }

    fn marked(annotation: &str) -> Annotation {
        Annotation::new(annotation)
    }

    #[test]
    fn test_hook_order_and_member_strip() {
        let unit = strippable_unit("demo/Helper")
            .with_method(
                Method::new(STATIC_INITIALIZER, "()V", MemberFlags::STATIC).with_body(
                    [
                        Instruction::LoadConst(Constant::Double(1e-9)),
                        Instruction::FieldRef {
                            field: MemberRef::new("demo/Helper", "EPSILON", "D"),
                            access: FieldAccess::Write,
                        },
                        Instruction::Plain(PlainOp::Return),
                    ]
                    .into_iter()
                    .collect(),
                ),
            )
            .with_field(
                Field::new("EPSILON", "D", MemberFlags::STATIC)
                    .with_annotation(marked(markers::STRIP)),
            );

        let mut provider = MemoryProvider::new();
        let mut plugin = RecordingPlugin::with_units(vec![unit]);
        let units = StripProcessor::new(&mut provider)
            .process(&mut plugin)
            .unwrap();

        assert_eq!(
            plugin.events,
            vec![
                "init",
                "pre_load",
                "pre:Field:demo/Helper::EPSILOND",
                "post:Field:demo/Helper::EPSILOND",
                "finish",
            ]
        );

        // The declaration is gone and the initializer is reference-free.
        let helper = units.get("demo/Helper").unwrap();
        assert!(helper.field("EPSILON", "D").is_none());
        let body = &helper.static_initializer().unwrap().body;
        assert_eq!(body.len(), 1);
    }

    #[test]
    fn test_class_strip_is_mutually_exclusive_with_member_scan() {
        // The class itself and one of its methods both carry strip markers; once the
        // class-level strip fires, the member is never visited.
        let unit = strippable_unit("demo/Unused")
            .with_annotation(marked(markers::STRIP))
            .with_method(
                Method::new("run", "()V", MemberFlags::PUBLIC)
                    .with_annotation(marked(markers::STRIP)),
            );

        let mut provider = MemoryProvider::new();
        let mut plugin = RecordingPlugin::with_units(vec![unit]);
        let units = StripProcessor::new(&mut provider)
            .process(&mut plugin)
            .unwrap();

        assert!(!units.contains("demo/Unused"));
        assert_eq!(
            plugin.events,
            vec![
                "init",
                "pre_load",
                "pre:Class:demo/Unused",
                "post:Class:demo/Unused",
                "finish",
            ]
        );
    }

    #[test]
    fn test_consecutive_marked_members_are_all_removed() {
        // Removal must not skip the successor of a removed element.
        let unit = strippable_unit("demo/Helper")
            .with_field(Field::new("a", "I", MemberFlags::STATIC).with_annotation(marked(markers::STRIP)))
            .with_field(Field::new("b", "J", MemberFlags::STATIC).with_annotation(marked(markers::STRIP)))
            .with_field(Field::new("keep", "Z", MemberFlags::STATIC))
            .with_method(
                Method::new(STATIC_INITIALIZER, "()V", MemberFlags::STATIC).with_body(
                    [Instruction::Plain(PlainOp::Return)].into_iter().collect(),
                ),
            );

        let mut provider = MemoryProvider::new();
        let mut plugin = RecordingPlugin::with_units(vec![unit]);
        let units = StripProcessor::new(&mut provider)
            .process(&mut plugin)
            .unwrap();

        let helper = units.get("demo/Helper").unwrap();
        assert_eq!(helper.fields.len(), 1);
        assert!(helper.field("keep", "Z").is_some());
    }

    #[test]
    fn test_unmarked_container_is_never_scanned() {
        // Strip markers on members of a class without the strippable marker are ignored.
        let unit = CompiledUnit::new("demo/Plain").with_field(
            Field::new("tag", "I", MemberFlags::PRIVATE).with_annotation(marked(markers::STRIP)),
        );

        let mut provider = MemoryProvider::new();
        let mut plugin = RecordingPlugin::with_units(vec![unit]);
        let units = StripProcessor::new(&mut provider)
            .process(&mut plugin)
            .unwrap();

        assert!(units.get("demo/Plain").unwrap().field("tag", "I").is_some());
        assert_eq!(plugin.events, vec!["init", "pre_load", "finish"]);
    }

    #[test]
    fn test_failed_strip_aborts_the_pass() {
        // The stand-in names a target no provider can resolve: the pass must surface the
        // offending declaration and stop before the second unit is scanned.
        let broken = strippable_unit("demo/Broken")
            .with_annotation(marked(markers::STRIP))
            .with_annotation(
                Annotation::new(markers::STAND_IN).with_value(
                    markers::TARGETS,
                    AnnotationValue::List(vec![AnnotationValue::TypeName("demo/Missing".into())]),
                ),
            );
        let follower = strippable_unit("demo/Follower").with_annotation(marked(markers::STRIP));

        let mut provider = MemoryProvider::new();
        let mut plugin = RecordingPlugin::with_units(vec![broken, follower]);
        let result = StripProcessor::new(&mut provider).process(&mut plugin);

        match result {
            Err(Error::StripFailed {
                declaration,
                kind,
                source,
            }) => {
                assert_eq!(declaration, "demo/Broken");
                assert_eq!(kind, StripKind::Class);
                assert!(matches!(*source, Error::UnitNotFound(ref n) if n == "demo/Missing"));
            }
            other => panic!("expected StripFailed, got {other:?}"),
        }
        // Aborted before the follower and before the finish hook.
        assert!(!plugin.events.iter().any(|e| e.contains("Follower")));
        assert!(!plugin.events.contains(&"finish".to_string()));
    }

    #[test]
    fn test_processor_is_reusable_across_passes() {
        let make_unit = || {
            strippable_unit("demo/Helper").with_field(
                Field::new("a", "I", MemberFlags::STATIC).with_annotation(marked(markers::STRIP)),
            )
        };

        let mut provider = MemoryProvider::new();
        let mut processor = StripProcessor::new(&mut provider);

        for _ in 0..2 {
            let mut plugin = RecordingPlugin::with_units(vec![make_unit()]);
            let units = processor.process(&mut plugin).unwrap();
            // The visited set is torn down at finish, so the second pass strips again.
            assert!(units.get("demo/Helper").unwrap().fields.is_empty());
        }
    }

    #[test]
    fn test_provider_loaded_units_are_not_scanned() {
        // A stand-in pulls demo/Real into the set; demo/Real carries its own markers but
        // was not enumerated, so it joins as an edit target only.
        let real = strippable_unit("demo/Real").with_annotation(marked(markers::STRIP));
        let patch = strippable_unit("demo/Patch")
            .with_annotation(marked(markers::STRIP))
            .with_annotation(
                Annotation::new(markers::STAND_IN).with_value(
                    markers::TARGETS,
                    AnnotationValue::List(vec![AnnotationValue::TypeName("demo/Real".into())]),
                ),
            );

        let mut provider = MemoryProvider::new();
        provider.insert(real).unwrap();
        let mut plugin = RecordingPlugin::with_units(vec![patch]);
        let units = StripProcessor::new(&mut provider)
            .process(&mut plugin)
            .unwrap();

        // The stand-in was removed; the loaded target survives in the set, unscanned.
        assert!(!units.contains("demo/Patch"));
        assert!(units.contains("demo/Real"));
        assert!(!plugin.events.iter().any(|e| e.ends_with(":demo/Real")));
    }

    #[test]
    fn test_field_strip_without_initializer_is_wrapped() {
        let unit = strippable_unit("demo/NoInit").with_field(
            Field::new("EPSILON", "D", MemberFlags::STATIC).with_annotation(marked(markers::STRIP)),
        );

        let mut provider = MemoryProvider::new();
        let mut plugin = RecordingPlugin::with_units(vec![unit]);
        let result = StripProcessor::new(&mut provider).process(&mut plugin);

        match result {
            Err(Error::StripFailed { declaration, kind, source }) => {
                assert_eq!(declaration, "demo/NoInit::EPSILOND");
                assert_eq!(kind, StripKind::Field);
                assert!(matches!(*source, Error::MissingInitializer { ref unit } if unit == "demo/NoInit"));
            }
            other => panic!("expected StripFailed, got {other:?}"),
        }
    }
}
