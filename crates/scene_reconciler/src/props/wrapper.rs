//! Ref/resource wrapper
//!
//! A wrapped prop may hold a literal value, a nested element the core has to
//! construct, or a native object the caller built and still owns. The wrapper
//! keeps the active [`Binding`] and decides, without touching the graph, what
//! has to happen when the prop changes. The host carries the plan out.

use super::PropValue;
use super::WrappedProperty;
use crate::element::Element;
use crate::native::{ObjectClass, ObjectId};
use crate::reconciler::Fiber;

/// How a raw prop value classifies
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PropForm<'a> {
    /// Prop not given
    Absent,
    /// Plain value, including explicit null
    Literal(&'a PropValue),
    /// Element describing a sub-object to construct
    Element(&'a Element),
    /// Caller-owned native object
    Prebuilt(ObjectId),
}

impl<'a> PropForm<'a> {
    /// Classify a raw prop value
    pub fn classify(value: Option<&'a PropValue>) -> Self {
        match value {
            None => Self::Absent,
            Some(PropValue::Element(element)) => Self::Element(element),
            Some(PropValue::Object(id)) => Self::Prebuilt(*id),
            Some(value) => Self::Literal(value),
        }
    }
}

/// Active binding of a wrapped prop
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// Plain value passed straight through
    Literal(PropValue),
    /// Caller-owned object; never disposed by the wrapper
    Prebuilt(ObjectId),
    /// Element waiting to be constructed
    Pending(Element),
    /// Sub-tree constructed and owned by the wrapper
    Owned(Fiber<ObjectId>),
}

impl Binding {
    /// Value handed to the prop pipeline
    pub fn resolved(&self) -> PropValue {
        match self {
            Self::Literal(value) => value.clone(),
            Self::Prebuilt(id) => PropValue::Object(*id),
            Self::Pending(_) => PropValue::Null,
            Self::Owned(fiber) => PropValue::Object(fiber.instance),
        }
    }

    /// Root of the owned sub-tree, if the wrapper constructed one
    pub fn owned_instance(&self) -> Option<ObjectId> {
        match self {
            Self::Owned(fiber) => Some(fiber.instance),
            _ => None,
        }
    }
}

/// What the host must do to move a wrapper to a new prop value
#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// Nothing changes
    Keep,
    /// The owned sub-tree stays and is reconciled against this element
    UpdateOwned(Element),
    /// Adopt `next`, tearing the owned sub-tree down first when `release` is set
    Replace {
        /// Whether an owned sub-tree must be unmounted first
        release: bool,
        /// New binding; `Pending` still has to be constructed
        next: Binding,
    },
}

/// Wrapper state for one wrapped prop of one instance
#[derive(Debug, Clone)]
pub struct RefWrapper {
    prop: WrappedProperty,
    binding: Binding,
}

impl RefWrapper {
    /// Wrapper with nothing bound
    pub fn new(prop: WrappedProperty) -> Self {
        Self {
            prop,
            binding: Binding::Literal(PropValue::Null),
        }
    }

    /// Prop name
    pub fn name(&self) -> &'static str {
        self.prop.name
    }

    /// Class of native object the prop accepts
    pub fn accepts(&self) -> ObjectClass {
        self.prop.accepts
    }

    /// Active binding
    pub fn binding(&self) -> &Binding {
        &self.binding
    }

    /// Value handed to the prop pipeline
    pub fn resolved(&self) -> PropValue {
        self.binding.resolved()
    }

    /// Decide how to move to `value`
    pub fn plan(&self, value: Option<&PropValue>) -> Transition {
        let release = matches!(self.binding, Binding::Owned(_));
        match (PropForm::classify(value), &self.binding) {
            (PropForm::Element(element), Binding::Owned(fiber)) if fiber.element.same_identity(element) => {
                Transition::UpdateOwned(element.clone())
            }
            (PropForm::Element(element), _) => Transition::Replace {
                release,
                next: Binding::Pending(element.clone()),
            },
            (PropForm::Prebuilt(id), Binding::Prebuilt(current)) if *current == id => Transition::Keep,
            (PropForm::Prebuilt(id), _) => Transition::Replace {
                release,
                next: Binding::Prebuilt(id),
            },
            (PropForm::Literal(value), Binding::Literal(current)) if current == value => Transition::Keep,
            (PropForm::Absent, Binding::Literal(PropValue::Null)) => Transition::Keep,
            (PropForm::Literal(value), _) => Transition::Replace {
                release,
                next: Binding::Literal(value.clone()),
            },
            (PropForm::Absent, _) => Transition::Replace {
                release,
                next: Binding::Literal(PropValue::Null),
            },
        }
    }

    /// Replace the binding, returning the previous one
    pub fn bind(&mut self, binding: Binding) -> Binding {
        std::mem::replace(&mut self.binding, binding)
    }

    /// Take the owned sub-tree out, leaving nothing bound
    pub fn take_owned(&mut self) -> Option<Fiber<ObjectId>> {
        match self.bind(Binding::Literal(PropValue::Null)) {
            Binding::Owned(fiber) => Some(fiber),
            other => {
                self.binding = other;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn wrapper() -> RefWrapper {
        RefWrapper::new(WrappedProperty {
            name: "shadow",
            accepts: ObjectClass::Shadow,
        })
    }

    fn some_id() -> ObjectId {
        let mut map: SlotMap<ObjectId, ()> = SlotMap::with_key();
        map.insert(())
    }

    fn owned(element: &Element) -> Binding {
        Binding::Owned(Fiber::new(element, some_id()))
    }

    #[test]
    fn test_element_replaces_literal_without_release() {
        let wrapper = wrapper();
        let element = PropValue::from(Element::new("pointLightShadow"));
        assert!(matches!(
            wrapper.plan(Some(&element)),
            Transition::Replace { release: false, next: Binding::Pending(_) }
        ));
    }

    #[test]
    fn test_same_element_identity_updates_owned_tree() {
        let mut wrapper = wrapper();
        let element = Element::new("pointLightShadow").prop("bias", 0.1);
        wrapper.bind(owned(&element));

        let changed = PropValue::from(Element::new("pointLightShadow").prop("bias", 0.2));
        assert!(matches!(wrapper.plan(Some(&changed)), Transition::UpdateOwned(_)));

        let rekeyed = PropValue::from(Element::new("pointLightShadow").key("b"));
        assert!(matches!(
            wrapper.plan(Some(&rekeyed)),
            Transition::Replace { release: true, next: Binding::Pending(_) }
        ));
    }

    #[test]
    fn test_switching_owned_to_prebuilt_releases_owned_tree() {
        let mut wrapper = wrapper();
        wrapper.bind(owned(&Element::new("pointLightShadow")));
        let prebuilt = some_id();

        let plan = wrapper.plan(Some(&PropValue::Object(prebuilt)));
        assert_eq!(
            plan,
            Transition::Replace {
                release: true,
                next: Binding::Prebuilt(prebuilt),
            }
        );
    }

    #[test]
    fn test_prebuilt_is_never_released() {
        let mut wrapper = wrapper();
        let prebuilt = some_id();
        wrapper.bind(Binding::Prebuilt(prebuilt));

        assert_eq!(wrapper.plan(Some(&PropValue::Object(prebuilt))), Transition::Keep);
        assert!(matches!(
            wrapper.plan(None),
            Transition::Replace { release: false, .. }
        ));
        assert!(wrapper.take_owned().is_none());
        assert_eq!(wrapper.binding(), &Binding::Prebuilt(prebuilt));
    }
}
