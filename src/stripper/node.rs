//! Uniform view over strippable declarations.
//!
//! A [`DeclarationNode`] wraps a class, method, or field declaration behind one surface
//! the orchestrator can interrogate: which markers it carries, whether its container
//! honors them, where the strip actually lands once indirection and path overrides are
//! applied. The node copies the annotation metadata it needs at construction; the parent
//! link is a qualified name, never an owning handle, so the wrapped unit can be dropped
//! from the working set while node views built from it are still live.

use crate::{
    metadata::{
        annotations::{markers, Annotation, AnnotationValue},
        CompiledUnit, Field, Method,
    },
    stripper::{
        strip_class, strip_field, strip_method, BytecodeProvider, StripKind, UnitSet,
    },
    Result,
};

/// Kind-specific identity of a wrapped declaration.
#[derive(Debug, Clone)]
enum NodeDetail {
    Class {
        name: String,
    },
    Method {
        name: String,
        descriptor: String,
        parent: String,
    },
    Field {
        name: String,
        descriptor: String,
        parent: String,
    },
}

/// A class, method, or field declaration wrapped for strip processing.
///
/// Carries copies of the declaration's own annotations and its container's annotations
/// (for a class node the two coincide), so marker checks never re-enter the working set.
#[derive(Debug, Clone)]
pub struct DeclarationNode {
    detail: NodeDetail,
    /// The declaration's own annotations, durable first.
    annotations: Vec<Annotation>,
    /// The owning class's annotations; same as `annotations` for class nodes.
    container_annotations: Vec<Annotation>,
}

fn collect_annotations(durable: &[Annotation], transient: &[Annotation]) -> Vec<Annotation> {
    durable.iter().chain(transient.iter()).cloned().collect()
}

impl DeclarationNode {
    /// Wraps a compiled unit as a class node.
    #[must_use]
    pub fn from_unit(unit: &CompiledUnit) -> Self {
        let annotations =
            collect_annotations(&unit.durable_annotations, &unit.transient_annotations);
        DeclarationNode {
            detail: NodeDetail::Class {
                name: unit.name.clone(),
            },
            container_annotations: annotations.clone(),
            annotations,
        }
    }

    /// Wraps a method declaration of `unit` as a method node.
    #[must_use]
    pub fn from_method(unit: &CompiledUnit, method: &Method) -> Self {
        DeclarationNode {
            detail: NodeDetail::Method {
                name: method.name.clone(),
                descriptor: method.descriptor.clone(),
                parent: unit.name.clone(),
            },
            annotations: collect_annotations(
                &method.durable_annotations,
                &method.transient_annotations,
            ),
            container_annotations: collect_annotations(
                &unit.durable_annotations,
                &unit.transient_annotations,
            ),
        }
    }

    /// Wraps a field declaration of `unit` as a field node.
    #[must_use]
    pub fn from_field(unit: &CompiledUnit, field: &Field) -> Self {
        DeclarationNode {
            detail: NodeDetail::Field {
                name: field.name.clone(),
                descriptor: field.descriptor.clone(),
                parent: unit.name.clone(),
            },
            annotations: collect_annotations(
                &field.durable_annotations,
                &field.transient_annotations,
            ),
            container_annotations: collect_annotations(
                &unit.durable_annotations,
                &unit.transient_annotations,
            ),
        }
    }

    /// The kind of declaration this node wraps.
    #[must_use]
    pub fn kind(&self) -> StripKind {
        match self.detail {
            NodeDetail::Class { .. } => StripKind::Class,
            NodeDetail::Method { .. } => StripKind::Method,
            NodeDetail::Field { .. } => StripKind::Field,
        }
    }

    /// The declaration's simple name (qualified name for class nodes).
    #[must_use]
    pub fn name(&self) -> &str {
        match &self.detail {
            NodeDetail::Class { name }
            | NodeDetail::Method { name, .. }
            | NodeDetail::Field { name, .. } => name,
        }
    }

    /// The member's type descriptor; `None` for class nodes.
    #[must_use]
    pub fn descriptor(&self) -> Option<&str> {
        match &self.detail {
            NodeDetail::Class { .. } => None,
            NodeDetail::Method { descriptor, .. } | NodeDetail::Field { descriptor, .. } => {
                Some(descriptor)
            }
        }
    }

    /// Qualified name of the owning unit; `None` for class nodes.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        match &self.detail {
            NodeDetail::Class { .. } => None,
            NodeDetail::Method { parent, .. } | NodeDetail::Field { parent, .. } => Some(parent),
        }
    }

    /// Stable identity of the declaration across a pass.
    ///
    /// Class nodes use the unit's qualified name; member nodes use
    /// `parent::name descriptor`, matching the member-reference display form.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.detail {
            NodeDetail::Class { name } => name.clone(),
            NodeDetail::Method {
                name,
                descriptor,
                parent,
            }
            | NodeDetail::Field {
                name,
                descriptor,
                parent,
            } => format!("{parent}::{name}{descriptor}"),
        }
    }

    /// Looks up one of the declaration's own annotations by descriptor.
    #[must_use]
    pub fn annotation(&self, descriptor: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.descriptor == descriptor)
    }

    /// Looks up a string payload value on one of the declaration's own annotations.
    #[must_use]
    pub fn annotation_text(&self, descriptor: &str, key: &str) -> Option<&str> {
        self.annotation(descriptor).and_then(|a| a.text(key))
    }

    fn container_annotation(&self, descriptor: &str) -> Option<&Annotation> {
        self.container_annotations
            .iter()
            .find(|a| a.descriptor == descriptor)
    }

    /// True iff the owning class (the class itself, for class nodes) carries the
    /// strippable marker. Strip markers on declarations whose container is not marked are
    /// ignored entirely.
    #[must_use]
    pub fn is_container_strippable(&self) -> bool {
        self.container_annotation(markers::STRIPPABLE).is_some()
    }

    /// True iff the declaration itself carries the strip marker.
    #[must_use]
    pub fn should_strip(&self) -> bool {
        self.annotation(markers::STRIP).is_some()
    }

    /// True iff the strip lands on a different, real unit: a class node carrying the
    /// stand-in marker, or a member node carrying the alias marker.
    #[must_use]
    pub fn is_indirected(&self) -> bool {
        match self.detail {
            NodeDetail::Class { .. } => self.annotation(markers::STAND_IN).is_some(),
            NodeDetail::Method { .. } | NodeDetail::Field { .. } => {
                self.annotation(markers::ALIAS).is_some()
            }
        }
    }

    /// Qualified names of the real units this declaration stands in for.
    ///
    /// Read from the stand-in marker's target list: the node's own marker for class
    /// nodes, the container's for aliased members (an alias inherits its class's
    /// targets). `None` if the node is not indirected or the marker carries no decodable
    /// target list.
    #[must_use]
    pub fn resolve_indirection_targets(&self) -> Option<Vec<String>> {
        if !self.is_indirected() {
            return None;
        }
        let stand_in = self.container_annotation(markers::STAND_IN)?;
        let AnnotationValue::List(items) = stand_in.value(markers::TARGETS)? else {
            return None;
        };
        let targets: Vec<String> = items
            .iter()
            .filter_map(|v| v.as_type_name().or_else(|| v.as_text()))
            .map(str::to_string)
            .collect();
        (!targets.is_empty()).then_some(targets)
    }

    /// Applies the kind-specific removal algorithm to the resolved target unit(s).
    ///
    /// The `altTargetPath` override in the strip marker is resolved first, so a dangling
    /// override is fatal even when unused; indirection targets, when present, always take
    /// precedence over it. An indirected member strip also deletes the mirrored
    /// declaration from each resolved target, so a later lookup of the member on the
    /// target fails; removing the wrapped declaration itself from its owning list is the
    /// orchestrator's job.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnitNotFound`] if an override or indirection target cannot
    /// be resolved, and [`crate::Error::Malformed`] if the node claims indirection but no
    /// target list can be decoded.
    pub fn strip(
        &self,
        units: &mut UnitSet,
        provider: &mut dyn BytecodeProvider,
    ) -> Result<()> {
        let override_target = self
            .annotation_text(markers::STRIP, markers::ALT_TARGET_PATH)
            .map(str::to_string);
        if let Some(name) = &override_target {
            units.resolve(provider, name)?;
        }

        let targets = if self.is_indirected() {
            Some(self.resolve_indirection_targets().ok_or_else(|| {
                malformed_error!(
                    "indirected declaration '{}' has no resolvable stand-in targets",
                    self.qualified_name()
                )
            })?)
        } else {
            None
        };

        match &self.detail {
            NodeDetail::Class { name } => match targets {
                Some(targets) => {
                    for target in targets {
                        units.resolve(provider, &target)?;
                        let scope = [name.as_str(), target.as_str()];
                        strip_class(&target, units.scoped_mut(&scope));
                    }
                }
                None => {
                    let target = override_target.as_deref().unwrap_or(name);
                    let scope = [target];
                    strip_class(target, units.scoped_mut(&scope));
                }
            },
            NodeDetail::Method {
                name,
                descriptor,
                parent,
            } => match targets {
                Some(targets) => {
                    for target in targets {
                        let unit = units.resolve(provider, &target)?;
                        strip_method(name, descriptor, unit)?;
                        unit.methods
                            .retain(|m| !(m.name == *name && m.descriptor == *descriptor));
                    }
                    strip_method(name, descriptor, units.resolve(provider, parent)?)?;
                }
                None => {
                    let target = override_target.as_deref().unwrap_or(parent);
                    strip_method(name, descriptor, units.resolve(provider, target)?)?;
                }
            },
            NodeDetail::Field {
                name,
                descriptor,
                parent,
            } => match targets {
                Some(targets) => {
                    for target in targets {
                        let unit = units.resolve(provider, &target)?;
                        strip_field(descriptor, unit)?;
                        unit.fields
                            .retain(|f| !(f.name == *name && f.descriptor == *descriptor));
                    }
                    strip_field(descriptor, units.resolve(provider, parent)?)?;
                }
                None => {
                    let target = override_target.as_deref().unwrap_or(parent);
                    strip_field(descriptor, units.resolve(provider, target)?)?;
                }
            },
        }
        Ok(())
    }
}
