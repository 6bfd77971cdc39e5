//! Declared properties of one element kind
//!
//! A [`PropertySet`] lists, in declaration order, the simple props a kind
//! accepts, the property groups whose members are coalesced into one update,
//! and the props resolved through the [`super::RefWrapper`] before either
//! pipeline sees them.

use super::group::{GroupValues, PropertyGroupCoordinator};
use super::{PropValue, Props};
use crate::error::{HostError, HostResult};
use crate::host::Diagnostics;
use crate::kind::NodeKind;
use crate::native::{ObjectClass, ObjectGraph, ObjectId};
use std::collections::HashSet;
use std::fmt;

/// Applies one simple prop to an instance. `None` means the prop was removed
/// and has no default.
pub type Setter = Box<dyn Fn(&mut PropContext<'_>, ObjectId, Option<&PropValue>) -> HostResult<()>>;

/// Applies the changed members of one property group to an instance
pub type GroupUpdater = Box<dyn Fn(&mut PropContext<'_>, ObjectId, &GroupValues) -> HostResult<()>>;

/// Custom equality for one prop
pub type Comparator = fn(&PropValue, &PropValue) -> bool;

/// When a simple prop reaches the native object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutability {
    /// Applied after construction and on every change
    Mutable,
    /// Passed to the constructor, applied through the setter on change only
    ConstructorSupplied,
    /// Passed to the constructor; a change requires a new instance
    ConstructorOnly,
}

/// What setters and group updaters get to work with
pub struct PropContext<'a> {
    /// Native object graph
    pub graph: &'a mut ObjectGraph,
    /// Advisory and error sink
    pub diagnostics: &'a mut Diagnostics,
    /// Kind of the instance being updated
    pub kind: NodeKind,
}

impl PropContext<'_> {
    /// Emit a development advisory
    pub fn advise(&mut self, message: impl Into<String>) {
        self.diagnostics.advise(message);
    }
}

/// A directly applied prop
pub struct SimpleProperty {
    /// Prop name
    pub name: &'static str,
    /// Value applied when the prop is removed
    pub default: Option<PropValue>,
    /// When the prop is applied
    pub mutability: Mutability,
    comparator: Option<Comparator>,
    setter: Setter,
}

impl SimpleProperty {
    /// Whether `old` and `new` differ for this prop
    pub fn differs(&self, old: Option<&PropValue>, new: Option<&PropValue>) -> bool {
        match (old, new) {
            (None, None) => false,
            (Some(old), Some(new)) => match self.comparator {
                Some(equal) => !equal(old, new),
                None => !values_equal(old, new),
            },
            _ => true,
        }
    }
}

impl fmt::Debug for SimpleProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimpleProperty")
            .field("name", &self.name)
            .field("default", &self.default)
            .field("mutability", &self.mutability)
            .finish_non_exhaustive()
    }
}

/// A set of props coalesced into one update per commit
pub struct PropertyGroup {
    /// Member prop names
    pub keys: Vec<&'static str>,
    updater: GroupUpdater,
}

impl PropertyGroup {
    /// Run the group's update with the collected members
    pub fn apply(&self, ctx: &mut PropContext<'_>, instance: ObjectId, values: &GroupValues) -> HostResult<()> {
        (self.updater)(ctx, instance, values)
    }

    /// Whether `name` is a member
    pub fn contains(&self, name: &str) -> bool {
        self.keys.iter().any(|key| *key == name)
    }
}

impl fmt::Debug for PropertyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyGroup")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

/// A prop whose value may be a literal, an element or a pre-built object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrappedProperty {
    /// Prop name
    pub name: &'static str,
    /// Class of native object the prop accepts
    pub accepts: ObjectClass,
}

/// All props declared by one element kind
#[derive(Debug)]
pub struct PropertySet {
    kind: NodeKind,
    simple: Vec<SimpleProperty>,
    groups: Vec<PropertyGroup>,
    wrapped: Vec<WrappedProperty>,
}

impl PropertySet {
    /// Empty set for `kind`
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            simple: Vec::new(),
            groups: Vec::new(),
            wrapped: Vec::new(),
        }
    }

    /// Kind the set belongs to
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Declare a mutable prop with no default
    pub fn has_simple_prop<F>(&mut self, name: &'static str, setter: F) -> &mut Self
    where
        F: Fn(&mut PropContext<'_>, ObjectId, Option<&PropValue>) -> HostResult<()> + 'static,
    {
        self.push_simple(name, None, Mutability::Mutable, Box::new(setter))
    }

    /// Declare a mutable prop that falls back to `default` when removed
    pub fn has_prop_with_default<F>(
        &mut self,
        name: &'static str,
        default: impl Into<PropValue>,
        setter: F,
    ) -> &mut Self
    where
        F: Fn(&mut PropContext<'_>, ObjectId, Option<&PropValue>) -> HostResult<()> + 'static,
    {
        self.push_simple(name, Some(default.into()), Mutability::Mutable, Box::new(setter))
    }

    /// Declare a prop passed to the constructor and updated through `setter`
    pub fn has_constructor_prop<F>(
        &mut self,
        name: &'static str,
        default: impl Into<PropValue>,
        setter: F,
    ) -> &mut Self
    where
        F: Fn(&mut PropContext<'_>, ObjectId, Option<&PropValue>) -> HostResult<()> + 'static,
    {
        self.push_simple(
            name,
            Some(default.into()),
            Mutability::ConstructorSupplied,
            Box::new(setter),
        )
    }

    /// Declare a prop only the constructor reads
    pub fn has_constructor_only_prop(&mut self, name: &'static str) -> &mut Self {
        self.push_simple(name, None, Mutability::ConstructorOnly, Box::new(ignore_value))
    }

    fn push_simple(
        &mut self,
        name: &'static str,
        default: Option<PropValue>,
        mutability: Mutability,
        setter: Setter,
    ) -> &mut Self {
        self.simple.push(SimpleProperty {
            name,
            default,
            mutability,
            comparator: None,
            setter,
        });
        self
    }

    /// Replace how an already declared simple prop compares values
    pub fn compare_with(&mut self, name: &str, comparator: Comparator) -> &mut Self {
        if let Some(prop) = self.simple.iter_mut().find(|prop| prop.name == name) {
            prop.comparator = Some(comparator);
        }
        self
    }

    /// Drop a previously declared simple prop
    pub fn remove_prop(&mut self, name: &str) -> &mut Self {
        self.simple.retain(|prop| prop.name != name);
        self
    }

    /// Declare a property group
    pub fn has_prop_group<F>(&mut self, keys: &[&'static str], updater: F) -> &mut Self
    where
        F: Fn(&mut PropContext<'_>, ObjectId, &GroupValues) -> HostResult<()> + 'static,
    {
        self.groups.push(PropertyGroup {
            keys: keys.to_vec(),
            updater: Box::new(updater),
        });
        self
    }

    /// Resolve a declared prop through the ref wrapper
    pub fn wraps(&mut self, name: &'static str, accepts: ObjectClass) -> &mut Self {
        self.wrapped.push(WrappedProperty { name, accepts });
        self
    }

    /// Check that every name is declared once and every wrapped prop has a pipeline
    pub fn validate(&self) -> HostResult<()> {
        let conflict = |prop| HostError::DescriptorConflict {
            kind: self.kind.name(),
            prop,
        };

        let mut seen = HashSet::new();
        let names = self
            .simple
            .iter()
            .map(|prop| prop.name)
            .chain(self.groups.iter().flat_map(|group| group.keys.iter().copied()));
        for name in names {
            if !seen.insert(name) {
                return Err(conflict(name));
            }
        }

        let mut wrapped = HashSet::new();
        for prop in &self.wrapped {
            if !seen.contains(prop.name) || !wrapped.insert(prop.name) {
                return Err(conflict(prop.name));
            }
        }
        Ok(())
    }

    /// Whether `name` is accepted by this kind
    pub fn declares(&self, name: &str) -> bool {
        self.simple.iter().any(|prop| prop.name == name)
            || self.groups.iter().any(|group| group.contains(name))
    }

    /// Simple props in declaration order
    pub fn simple_props(&self) -> &[SimpleProperty] {
        &self.simple
    }

    /// Group at `index`
    pub fn group(&self, index: usize) -> Option<&PropertyGroup> {
        self.groups.get(index)
    }

    /// Props resolved through the ref wrapper
    pub fn wrapped(&self) -> &[WrappedProperty] {
        &self.wrapped
    }

    /// Wrapped declaration for `name`, if any
    pub fn wrapped_prop(&self, name: &str) -> Option<&WrappedProperty> {
        self.wrapped.iter().find(|prop| prop.name == name)
    }

    /// The props a constructor receives
    pub fn constructor_subset(&self, props: &Props) -> Props {
        self.simple
            .iter()
            .filter(|prop| prop.mutability != Mutability::Mutable)
            .filter_map(|prop| props.get(prop.name).map(|value| (prop.name, value.clone())))
            .collect()
    }

    /// Whether moving from `old` to `new` changes a constructor-only prop
    pub fn requires_remount(&self, old: &Props, new: &Props) -> bool {
        self.simple
            .iter()
            .filter(|prop| prop.mutability == Mutability::ConstructorOnly)
            .any(|prop| prop.differs(old.get(prop.name), new.get(prop.name)))
    }

    /// Whether any declared prop differs between `old` and `new`
    pub fn differs(&self, old: &Props, new: &Props) -> bool {
        self.simple
            .iter()
            .any(|prop| prop.differs(old.get(prop.name), new.get(prop.name)))
            || self
                .groups
                .iter()
                .flat_map(|group| group.keys.iter())
                .any(|key| group_member_differs(old.get(key), new.get(key)))
    }

    /// Apply the props of a freshly created instance.
    ///
    /// Mutable simple props are applied when present, in declaration order;
    /// every group then runs once with whichever of its members are present.
    pub fn apply_initial(&self, ctx: &mut PropContext<'_>, instance: ObjectId, props: &Props) -> HostResult<()> {
        for prop in self.simple.iter().filter(|prop| prop.mutability == Mutability::Mutable) {
            if let Some(value) = props.get(prop.name) {
                (prop.setter)(ctx, instance, Some(value))?;
            }
        }

        for group in &self.groups {
            let mut values = GroupValues::default();
            for &key in &group.keys {
                if let Some(value) = props.get(key) {
                    values.insert(key, Some(value.clone()));
                }
            }
            group.apply(ctx, instance, &values)?;
        }
        Ok(())
    }

    /// Apply the simple props that changed between `old` and `new` and collect
    /// changed group members into `groups`.
    ///
    /// Returns the number of simple setters invoked.
    pub fn apply_update(
        &self,
        ctx: &mut PropContext<'_>,
        instance: ObjectId,
        old: &Props,
        new: &Props,
        groups: &mut PropertyGroupCoordinator,
    ) -> HostResult<usize> {
        let mut applied = 0;
        for prop in self.simple.iter().filter(|prop| prop.mutability != Mutability::ConstructorOnly) {
            let value = new.get(prop.name);
            if !prop.differs(old.get(prop.name), value) {
                continue;
            }
            (prop.setter)(ctx, instance, value.or(prop.default.as_ref()))?;
            applied += 1;
        }

        for (index, group) in self.groups.iter().enumerate() {
            for &key in &group.keys {
                let value = new.get(key);
                if group_member_differs(old.get(key), value) {
                    groups.collect(instance, index, key, value.cloned());
                }
            }
        }
        Ok(applied)
    }
}

fn ignore_value(_: &mut PropContext<'_>, _: ObjectId, _: Option<&PropValue>) -> HostResult<()> {
    Ok(())
}

fn group_member_differs(old: Option<&PropValue>, new: Option<&PropValue>) -> bool {
    match (old, new) {
        (None, None) => false,
        (Some(old), Some(new)) => !values_equal(old, new),
        _ => true,
    }
}

/// Default prop equality: vectors approximately, everything else exactly
pub fn values_equal(old: &PropValue, new: &PropValue) -> bool {
    match (old, new) {
        (PropValue::Vector(a), PropValue::Vector(b)) => approx::relative_eq!(*a, *b),
        _ => old == new,
    }
}
