//! Render-root facade
//!
//! [`SceneRenderer`] keeps one reconciler root per render target. A target is
//! either a drawing surface, which takes `webGLRenderer` elements, or a
//! renderer built outside the tree, which takes `render` actions directly.

use crate::config::ReconcilerConfig;
use crate::descriptors::DescriptorRegistry;
use crate::element::Element;
use crate::error::{HostError, HostResult};
use crate::host::SceneHost;
use crate::native::{NativeObject, ObjectBody, ObjectClass, ObjectId, RendererData, SurfaceData};
use crate::reconciler::Root;
use std::collections::HashMap;
use std::rc::Rc;

/// Entry point for rendering element trees into targets
#[derive(Debug)]
pub struct SceneRenderer {
    host: SceneHost,
    roots: HashMap<ObjectId, Root<ObjectId>>,
}

impl SceneRenderer {
    /// Renderer with every built-in kind registered
    pub fn new(config: ReconcilerConfig) -> HostResult<Self> {
        Ok(Self {
            host: SceneHost::new(config)?,
            roots: HashMap::new(),
        })
    }

    /// Renderer over a custom descriptor registry
    pub fn with_registry(registry: Rc<DescriptorRegistry>, config: ReconcilerConfig) -> Self {
        Self {
            host: SceneHost::with_registry(registry, config),
            roots: HashMap::new(),
        }
    }

    /// Create a drawing surface to render `webGLRenderer` elements into
    pub fn create_canvas(&mut self, width: u32, height: u32) -> ObjectId {
        self.host
            .insert_external(NativeObject::new(ObjectBody::Surface(SurfaceData { width, height })))
    }

    /// Create a renderer outside the tree to render `render` elements into
    pub fn create_renderer(&mut self, width: u32, height: u32) -> ObjectId {
        self.host
            .insert_external(NativeObject::new(ObjectBody::Renderer(RendererData::new(width, height))))
    }

    /// Render `element` into `target` as one commit.
    ///
    /// The first call for a target mounts; later calls reconcile against what
    /// is mounted. Returns the public instance of the tree's root.
    pub fn render(&mut self, element: &Element, target: ObjectId) -> HostResult<ObjectId> {
        match self.host.graph().class(target)? {
            ObjectClass::Surface | ObjectClass::Renderer => {}
            _ => return Err(HostError::NotAContainer(target)),
        }

        let root = self.roots.entry(target).or_insert_with(|| {
            log::debug!("New render root at {:?}", target);
            Root::new(target)
        });
        let result = root.render(&mut self.host, element);
        if let Err(error) = &result {
            log::error!("Render into {:?} failed: {}", target, error);
        }
        result
    }

    /// Tear down whatever is rendered into `target`, then run `callback`.
    ///
    /// Returns `false` when nothing was rendered there.
    pub fn unmount_component_at_node(
        &mut self,
        target: ObjectId,
        callback: Option<impl FnOnce()>,
    ) -> HostResult<bool> {
        let Some(root) = self.roots.get_mut(&target) else {
            return Ok(false);
        };
        let unmounted = root.unmount(&mut self.host)?;
        self.roots.remove(&target);
        if unmounted && self.host.config().purge_disposed_on_unmount {
            let purged = self.host.graph_mut().purge_disposed();
            log::debug!("Purged {} disposed objects", purged);
        }
        if let Some(callback) = callback {
            callback();
        }
        Ok(unmounted)
    }

    /// Instance currently rendered at the root of `target`
    pub fn root_instance(&self, target: ObjectId) -> Option<ObjectId> {
        self.roots.get(&target)?.current().map(|fiber| fiber.instance)
    }

    /// Host-config core
    pub fn host(&self) -> &SceneHost {
        &self.host
    }

    /// Mutable host-config core
    pub fn host_mut(&mut self) -> &mut SceneHost {
        &mut self.host
    }
}
