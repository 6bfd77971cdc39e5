use crate::element::RefCallback;
use crate::kind::NodeKind;
use crate::native::ObjectId;
use crate::props::{Props, RefWrapper};

/// Bookkeeping the core keeps for every mounted instance
#[derive(Debug, Clone)]
pub struct LiveInstanceRecord {
    /// Kind the instance was created from; selects its descriptor
    pub kind: NodeKind,
    /// Parent in the instance tree, whether or not the native graph links them
    pub parent: Option<ObjectId>,
    /// Children in the instance tree, in order
    pub children: Vec<ObjectId>,
    /// Ref callback of the element the instance was last rendered from
    pub ref_callback: Option<RefCallback>,
    /// Resource id the instance is registered under
    pub resource_id: Option<String>,
    /// Container the resource id was registered with
    pub resource_owner: Option<ObjectId>,
    /// Whether the instance was attached once and its ref fired
    pub mounted: bool,
    /// Wrapped props, one wrapper per wrapped declaration
    pub bindings: Vec<RefWrapper>,
    /// Props as applied to the native object, wrapped props resolved
    pub resolved: Props,
}

impl LiveInstanceRecord {
    /// Record for a freshly created, detached instance
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
            ref_callback: None,
            resource_id: None,
            resource_owner: None,
            mounted: false,
            bindings: Vec::new(),
            resolved: Props::new(),
        }
    }

    /// Wrapper for prop `name`
    pub fn binding_mut(&mut self, name: &str) -> Option<&mut RefWrapper> {
        self.bindings.iter_mut().find(|binding| binding.name() == name)
    }
}
