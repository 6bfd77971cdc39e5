//! Declarative element descriptions
//!
//! An [`Element`] names a kind, carries props, children, an optional key and
//! ref callback, and an optional resource id. Trees of elements are what the
//! reconciler diffs against the live instance graph.

use crate::native::ObjectId;
use crate::props::{PropValue, Props};
use std::fmt;
use std::rc::Rc;

/// Callback invoked with the native instance after attach and with `None`
/// after full detach
#[derive(Clone)]
pub struct RefCallback(Rc<dyn Fn(Option<ObjectId>)>);

impl RefCallback {
    /// Wrap a closure
    pub fn new(callback: impl Fn(Option<ObjectId>) + 'static) -> Self {
        Self(Rc::new(callback))
    }

    /// Invoke the callback
    pub fn call(&self, instance: Option<ObjectId>) {
        (self.0)(instance);
    }

    /// Whether both handles point at the same closure
    pub fn same_as(&self, other: &Self) -> bool {
        std::ptr::eq(
            Rc::as_ptr(&self.0).cast::<u8>(),
            Rc::as_ptr(&other.0).cast::<u8>(),
        )
    }
}

impl fmt::Debug for RefCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RefCallback({:p})", Rc::as_ptr(&self.0).cast::<u8>())
    }
}

impl PartialEq for RefCallback {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other)
    }
}

/// One node of a declarative tree
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Element kind name, e.g. `"mesh"`
    pub kind: String,
    /// Identity among siblings
    pub key: Option<String>,
    /// Declared props
    pub props: Props,
    /// Child elements in order
    pub children: Vec<Element>,
    /// Ref callback
    pub ref_callback: Option<RefCallback>,
    /// Id under which an enclosing resource container registers the instance
    pub resource_id: Option<String>,
}

impl Element {
    /// Create an element with no props or children
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            key: None,
            props: Props::new(),
            children: Vec::new(),
            ref_callback: None,
            resource_id: None,
        }
    }

    /// Set the key (builder pattern)
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set a prop (builder pattern)
    pub fn prop(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(name, value);
        self
    }

    /// Append a child (builder pattern)
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children (builder pattern)
    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children.extend(children);
        self
    }

    /// Attach a ref callback (builder pattern)
    pub fn with_ref(mut self, callback: RefCallback) -> Self {
        self.ref_callback = Some(callback);
        self
    }

    /// Set the resource id (builder pattern)
    pub fn resource_id(mut self, id: impl Into<String>) -> Self {
        self.resource_id = Some(id.into());
        self
    }

    /// Copy of this element without its children, as retained by a fiber
    pub fn shell(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            key: self.key.clone(),
            props: self.props.clone(),
            children: Vec::new(),
            ref_callback: self.ref_callback.clone(),
            resource_id: self.resource_id.clone(),
        }
    }

    /// Whether `other` describes the same logical element (same kind and key)
    pub fn same_identity(&self, other: &Self) -> bool {
        self.kind == other.kind && self.key == other.key
    }
}
