use super::{Diagnostics, HostConfig, LiveInstanceRecord, UpdatePayload};
use crate::config::ReconcilerConfig;
use crate::descriptors::{DescriptorRegistry, TypeDescriptor};
use crate::element::{Element, RefCallback};
use crate::error::{HostError, HostResult};
use crate::kind::NodeKind;
use crate::native::{NativeObject, ObjectClass, ObjectGraph, ObjectId};
use crate::props::{Binding, PropContext, PropertyGroupCoordinator, Props, RefWrapper, Transition};
use crate::reconciler::{self, Fiber};
use crate::resources::ResourceStore;
use bitflags::bitflags;
use slotmap::SecondaryMap;
use std::rc::Rc;

bitflags! {
    /// What the current commit changed in the native graph
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SceneChanges: u8 {
        /// Objects were attached, detached or reordered
        const STRUCTURE = 1 << 0;
        /// Props were written to native objects
        const PROPERTIES = 1 << 1;
        /// A resource container gained or lost a binding
        const RESOURCES = 1 << 2;
    }
}

/// Host-config core over the native object graph.
///
/// Owns the graph, one [`LiveInstanceRecord`] per mounted instance, and the
/// group coordinator for the commit in flight. Everything kind-specific is
/// delegated to the [`DescriptorRegistry`].
pub struct SceneHost {
    registry: Rc<DescriptorRegistry>,
    graph: ObjectGraph,
    records: SecondaryMap<ObjectId, LiveInstanceRecord>,
    groups: PropertyGroupCoordinator,
    diagnostics: Diagnostics,
    changes: SceneChanges,
    config: ReconcilerConfig,
}

impl SceneHost {
    /// Host with a descriptor for every built-in kind
    pub fn new(config: ReconcilerConfig) -> HostResult<Self> {
        let registry = DescriptorRegistry::with_defaults()?;
        Ok(Self::with_registry(Rc::new(registry), config))
    }

    /// Host using a caller-assembled registry
    pub fn with_registry(registry: Rc<DescriptorRegistry>, config: ReconcilerConfig) -> Self {
        log::debug!("Scene host created with {} descriptors", registry.len());
        Self {
            registry,
            graph: ObjectGraph::new(),
            records: SecondaryMap::new(),
            groups: PropertyGroupCoordinator::new(),
            diagnostics: Diagnostics::new(config.development),
            changes: SceneChanges::empty(),
            config,
        }
    }

    /// Native object graph
    pub fn graph(&self) -> &ObjectGraph {
        &self.graph
    }

    /// Mutable native object graph, for objects the caller builds itself
    pub fn graph_mut(&mut self) -> &mut ObjectGraph {
        &mut self.graph
    }

    /// Advisories and reported errors
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Mutable diagnostics, for draining what the latest commit reported
    pub fn diagnostics_mut(&mut self) -> &mut Diagnostics {
        &mut self.diagnostics
    }

    /// Active configuration
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Descriptor registry
    pub fn registry(&self) -> &DescriptorRegistry {
        &self.registry
    }

    /// What the last (or current) commit changed
    pub fn changes(&self) -> SceneChanges {
        self.changes
    }

    /// Record of a mounted instance
    pub fn record(&self, instance: ObjectId) -> Option<&LiveInstanceRecord> {
        self.records.get(instance)
    }

    /// Active binding of wrapped prop `prop` on a mounted instance
    pub fn binding(&self, instance: ObjectId, prop: &str) -> Option<&Binding> {
        self.records
            .get(instance)?
            .bindings
            .iter()
            .find(|wrapper| wrapper.name() == prop)
            .map(RefWrapper::binding)
    }

    /// Number of mounted instances
    pub fn live_instances(&self) -> usize {
        self.records.len()
    }

    /// Insert an object built outside the tree, such as a canvas or a
    /// pre-built renderer. It gets no record and is never disposed by the host.
    pub fn insert_external(&mut self, object: NativeObject) -> ObjectId {
        self.graph.insert(object)
    }

    /// Instance bound to `id` in the resource container `container`
    pub fn resource(&self, container: ObjectId, id: &str) -> HostResult<Option<ObjectId>> {
        Ok(self.graph.resources(container)?.get(id))
    }

    fn kind_of(&self, instance: ObjectId) -> HostResult<NodeKind> {
        self.records
            .get(instance)
            .map(|record| record.kind)
            .ok_or(HostError::MissingRecord(instance))
    }

    fn record_mut(&mut self, instance: ObjectId) -> HostResult<&mut LiveInstanceRecord> {
        self.records.get_mut(instance).ok_or(HostError::MissingRecord(instance))
    }

    /// Move every wrapper of `instance` to the values in `props` and return
    /// `props` with wrapped values resolved to what the setters see
    fn resolve_wrapped(&mut self, instance: ObjectId, props: &Props) -> HostResult<Props> {
        let mut resolved = props.clone();
        let count = self.record_mut(instance)?.bindings.len();

        for index in 0..count {
            let (name, accepts, plan) = {
                let wrapper = &self.record_mut(instance)?.bindings[index];
                (wrapper.name(), wrapper.accepts(), wrapper.plan(props.get(wrapper.name())))
            };

            match plan {
                Transition::Keep => {}
                Transition::UpdateOwned(element) => {
                    let Some(mut fiber) = self.record_mut(instance)?.bindings[index].take_owned() else {
                        return Err(HostError::MissingRecord(instance));
                    };
                    if reconciler::can_update(self, &fiber, &element) {
                        reconciler::update(self, &mut fiber, &element)?;
                    } else {
                        self.remove_child(instance, fiber.instance)?;
                        fiber = self.mount_owned(instance, name, accepts, &element)?;
                    }
                    self.record_mut(instance)?.bindings[index].bind(Binding::Owned(fiber));
                }
                Transition::Replace { release, next } => {
                    if release {
                        if let Some(fiber) = self.record_mut(instance)?.bindings[index].take_owned() {
                            self.remove_child(instance, fiber.instance)?;
                        }
                    }
                    let next = match next {
                        Binding::Pending(element) => {
                            Binding::Owned(self.mount_owned(instance, name, accepts, &element)?)
                        }
                        Binding::Prebuilt(object) => {
                            let class = self.graph.class(object)?;
                            if class != accepts {
                                return Err(HostError::WrongClass {
                                    id: object,
                                    expected: accepts.label(),
                                    found: class.label(),
                                });
                            }
                            Binding::Prebuilt(object)
                        }
                        literal => literal,
                    };
                    self.record_mut(instance)?.bindings[index].bind(next);
                }
            }

            let value = self.record_mut(instance)?.bindings[index].resolved();
            if value.is_null() && !props.contains(name) {
                resolved.remove(name);
            } else {
                resolved.insert(name, value);
            }
        }
        Ok(resolved)
    }

    /// Construct the sub-tree of a wrapped prop and attach it to its owner
    fn mount_owned(
        &mut self,
        owner: ObjectId,
        prop: &'static str,
        accepts: ObjectClass,
        element: &Element,
    ) -> HostResult<Fiber<ObjectId>> {
        let kind = NodeKind::from_name(&element.kind).ok_or_else(|| HostError::UnknownKind(element.kind.clone()))?;
        if kind.class() != accepts {
            return Err(HostError::InvalidPropValue {
                kind: self.kind_of(owner)?.name(),
                prop: prop.to_string(),
                expected: accepts.label(),
            });
        }
        let fiber = reconciler::mount(self, element)?;
        self.append_child(owner, fiber.instance)?;
        Ok(fiber)
    }

    fn attach(&mut self, parent: ObjectId, child: ObjectId, before: Option<ObjectId>) -> HostResult<()> {
        let kind = self.kind_of(child)?;
        if let Some(previous) = self.record_mut(child)?.parent {
            self.detach(previous, child)?;
        }

        let registry = Rc::clone(&self.registry);
        let descriptor: &dyn TypeDescriptor = registry.get(kind)?;
        if self.graph.class(parent)? == ObjectClass::Resources {
            self.register_resource(parent, child)?;
        } else {
            descriptor.will_be_added_to_parent(&mut self.graph, child, parent, before)?;
        }

        self.record_mut(child)?.parent = Some(parent);
        if let Some(record) = self.records.get_mut(parent) {
            let siblings = &mut record.children;
            let index = before
                .and_then(|before| siblings.iter().position(|&sibling| sibling == before))
                .unwrap_or(siblings.len());
            siblings.insert(index, child);
        }
        descriptor.did_add_to_parent(&mut self.graph, child, parent)?;
        self.changes |= SceneChanges::STRUCTURE;

        let record = self.record_mut(child)?;
        if !record.mounted {
            record.mounted = true;
            if let Some(callback) = record.ref_callback.clone() {
                callback.call(Some(child));
            }
        }
        Ok(())
    }

    /// Unlink `child` from `parent` in both trees without disposing anything
    fn detach(&mut self, parent: ObjectId, child: ObjectId) -> HostResult<()> {
        if self.graph.class(parent)? == ObjectClass::Resources {
            self.release_resource(child)?;
        } else {
            let registry = Rc::clone(&self.registry);
            let descriptor = registry.get(self.kind_of(child)?)?;
            descriptor.will_be_removed_from_parent(&mut self.graph, child, parent)?;
        }

        self.record_mut(child)?.parent = None;
        if let Some(record) = self.records.get_mut(parent) {
            record.children.retain(|&sibling| sibling != child);
        }
        self.changes |= SceneChanges::STRUCTURE;
        Ok(())
    }

    fn register_resource(&mut self, container: ObjectId, instance: ObjectId) -> HostResult<()> {
        let Some(id) = self.record_mut(instance)?.resource_id.clone() else {
            return Ok(());
        };
        let class = self.graph.class(instance)?;
        match self.graph.resources_mut(container)?.set(&id, instance, class) {
            Ok(()) => {
                self.record_mut(instance)?.resource_owner = Some(container);
                self.changes |= SceneChanges::RESOURCES;
                log::debug!("Registered resource `{}` as {:?}", id, instance);
            }
            Err(duplicate) => self.diagnostics.report_error(duplicate.to_string()),
        }
        Ok(())
    }

    fn release_resource(&mut self, instance: ObjectId) -> HostResult<()> {
        let record = self.record_mut(instance)?;
        let (Some(id), Some(container)) = (record.resource_id.clone(), record.resource_owner.take()) else {
            return Ok(());
        };
        if self.graph.resources_mut(container)?.release(&id, instance) {
            self.changes |= SceneChanges::RESOURCES;
            log::debug!("Released resource `{}`", id);
        }
        Ok(())
    }

    /// Instance sub-tree below `root`, children before their parent
    fn subtree_post_order(&self, root: ObjectId) -> Vec<ObjectId> {
        let mut order = Vec::new();
        let mut stack = vec![(root, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                order.push(id);
                continue;
            }
            stack.push((id, true));
            if let Some(record) = self.records.get(id) {
                stack.extend(record.children.iter().rev().map(|&child| (child, false)));
            }
        }
        order
    }

    fn swap_ref(&mut self, instance: ObjectId, next: Option<RefCallback>) -> HostResult<()> {
        let record = self.record_mut(instance)?;
        let previous = std::mem::replace(&mut record.ref_callback, next.clone());
        if !record.mounted {
            return Ok(());
        }
        if let Some(previous) = previous {
            previous.call(None);
        }
        if let Some(next) = next {
            next.call(Some(instance));
        }
        Ok(())
    }

    fn swap_resource_id(&mut self, instance: ObjectId, next: Option<String>) -> HostResult<()> {
        self.release_resource(instance)?;
        let record = self.record_mut(instance)?;
        record.resource_id = next;
        if let Some(parent) = record.parent {
            if self.graph.class(parent)? == ObjectClass::Resources {
                self.register_resource(parent, instance)?;
            }
        }
        Ok(())
    }

    /// Hand a frame to every renderer for each of its complete render actions
    fn submit_frames(&mut self) -> HostResult<usize> {
        let mut submitted = 0;
        for renderer in self.graph.renderers() {
            let actions: Vec<ObjectId> = self.graph.children(renderer).to_vec();
            for action in actions {
                let Ok(data) = self.graph.render_action(action) else {
                    continue;
                };
                let (Some(scene), Some(camera)) = (data.scene, data.camera) else {
                    continue;
                };
                if self.graph.is_disposed(scene) || self.graph.is_disposed(camera) {
                    continue;
                }
                self.graph.submit_frame(renderer, scene, camera)?;
                submitted += 1;
            }
        }
        Ok(submitted)
    }
}

impl std::fmt::Debug for SceneHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneHost")
            .field("objects", &self.graph.len())
            .field("instances", &self.records.len())
            .field("changes", &self.changes)
            .finish()
    }
}

impl HostConfig for SceneHost {
    type Instance = ObjectId;
    type Error = HostError;

    fn create_instance(&mut self, element: &Element) -> HostResult<ObjectId> {
        let kind = NodeKind::from_name(&element.kind).ok_or_else(|| HostError::UnknownKind(element.kind.clone()))?;
        let registry = Rc::clone(&self.registry);
        let descriptor = registry.get(kind)?;
        let properties = descriptor.properties();

        for (name, _) in element.props.iter() {
            if !properties.declares(name) && properties.wrapped_prop(name).is_none() {
                self.diagnostics.advise(format!("`{}` does not accept a `{}` prop; it is ignored", kind, name));
            }
        }

        let instance = descriptor.create_instance(&mut self.graph, &properties.constructor_subset(&element.props))?;
        let mut record = LiveInstanceRecord::new(kind);
        record.ref_callback = element.ref_callback.clone();
        record.resource_id = element.resource_id.clone();
        record.bindings = properties.wrapped().iter().copied().map(RefWrapper::new).collect();
        self.records.insert(instance, record);

        let resolved = self.resolve_wrapped(instance, &element.props)?;
        let mut ctx = PropContext {
            graph: &mut self.graph,
            diagnostics: &mut self.diagnostics,
            kind,
        };
        descriptor.apply_initial_props(&mut ctx, instance, &resolved)?;
        self.record_mut(instance)?.resolved = resolved;

        self.changes |= SceneChanges::STRUCTURE;
        log::trace!("Created {} {:?}", kind, instance);
        Ok(instance)
    }

    fn append_child(&mut self, parent: ObjectId, child: ObjectId) -> HostResult<()> {
        self.attach(parent, child, None)
    }

    fn insert_before(&mut self, parent: ObjectId, child: ObjectId, before: ObjectId) -> HostResult<()> {
        self.attach(parent, child, Some(before))
    }

    /// Detach the whole sub-tree, clear its refs, then dispose it
    fn remove_child(&mut self, parent: ObjectId, child: ObjectId) -> HostResult<()> {
        if self.record_mut(child)?.parent != Some(parent) {
            return Err(HostError::NotAChild { parent, child });
        }

        let subtree = self.subtree_post_order(child);
        for &id in &subtree {
            if let Some(owner) = self.record_mut(id)?.parent {
                self.detach(owner, id)?;
            }
        }

        for &id in &subtree {
            let record = self.record_mut(id)?;
            if record.mounted {
                if let Some(callback) = record.ref_callback.clone() {
                    callback.call(None);
                }
            }
        }

        let registry = Rc::clone(&self.registry);
        for &id in &subtree {
            let kind = self.kind_of(id)?;
            self.groups.discard(id);
            registry.get(kind)?.dispose(&mut self.graph, id)?;
            self.records.remove(id);
        }
        log::trace!("Removed {} instances below {:?}", subtree.len(), parent);
        Ok(())
    }

    /// Warn about meshes that mounted without something to draw
    fn finalize_initial_children(&mut self, instance: ObjectId, _element: &Element) -> HostResult<()> {
        if self.kind_of(instance)? != NodeKind::Mesh {
            return Ok(());
        }
        let mesh = self.graph.mesh(instance)?;
        let missing = match (mesh.geometry, mesh.material) {
            (None, None) => Some("geometry and material"),
            (None, Some(_)) => Some("geometry"),
            (Some(_), None) => Some("material"),
            (Some(_), Some(_)) => None,
        };
        if let Some(missing) = missing {
            self.diagnostics.advise(format!("A mesh was mounted without {}; it will not be drawn", missing));
        }
        Ok(())
    }

    fn prepare_update(&self, instance: ObjectId, old: &Element, new: &Element) -> UpdatePayload {
        let Some(record) = self.records.get(instance) else {
            // commit_update reports the missing record
            return UpdatePayload::Changed;
        };
        let Ok(descriptor) = self.registry.get(record.kind) else {
            return UpdatePayload::Changed;
        };
        let properties = descriptor.properties();
        if properties.requires_remount(&old.props, &new.props) {
            return UpdatePayload::Remount;
        }

        let wrapped_changed = properties
            .wrapped()
            .iter()
            .any(|wrapped| old.props.get(wrapped.name) != new.props.get(wrapped.name));
        if properties.differs(&old.props, &new.props)
            || wrapped_changed
            || record.ref_callback != new.ref_callback
            || record.resource_id != new.resource_id
        {
            UpdatePayload::Changed
        } else {
            UpdatePayload::Unchanged
        }
    }

    fn commit_update(&mut self, instance: ObjectId, old: &Element, new: &Element) -> HostResult<()> {
        let kind = self.kind_of(instance)?;
        log::trace!(
            "Updating {} {:?} ({} -> {} props)",
            kind,
            instance,
            old.props.len(),
            new.props.len()
        );

        let previous = self.record_mut(instance)?.resolved.clone();
        let resolved = self.resolve_wrapped(instance, &new.props)?;

        let registry = Rc::clone(&self.registry);
        let descriptor = registry.get(kind)?;
        let mut ctx = PropContext {
            graph: &mut self.graph,
            diagnostics: &mut self.diagnostics,
            kind,
        };
        let applied = descriptor.update_props(&mut ctx, instance, &previous, &resolved, &mut self.groups)?;
        if applied > 0 {
            self.changes |= SceneChanges::PROPERTIES;
        }
        self.record_mut(instance)?.resolved = resolved;

        if self.record_mut(instance)?.ref_callback != new.ref_callback {
            self.swap_ref(instance, new.ref_callback.clone())?;
        }
        if self.record_mut(instance)?.resource_id != new.resource_id {
            self.swap_resource_id(instance, new.resource_id.clone())?;
        }
        Ok(())
    }

    fn prepare_for_commit(&mut self) {
        self.groups.begin_commit();
        self.changes = SceneChanges::empty();
        self.diagnostics.clear();
    }

    /// Flush batched groups, then submit frames if the graph changed
    fn reset_after_commit(&mut self) -> HostResult<()> {
        let registry = Rc::clone(&self.registry);
        for (instance, group, values) in self.groups.take_ready() {
            let Some(record) = self.records.get(instance) else {
                continue;
            };
            let kind = record.kind;
            let Some(group) = registry.get(kind)?.properties().group(group) else {
                continue;
            };
            let mut ctx = PropContext {
                graph: &mut self.graph,
                diagnostics: &mut self.diagnostics,
                kind,
            };
            group.apply(&mut ctx, instance, &values)?;
            self.changes |= SceneChanges::PROPERTIES;
        }
        self.groups.end_commit();

        if !self.changes.is_empty() && self.config.submit_frames_on_commit {
            let frames = self.submit_frames()?;
            log::trace!("Commit changed {:?}; submitted {} frames", self.changes, frames);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::native::{ObjectBody, SurfaceData};
    use crate::reconciler::Root;

    fn host() -> SceneHost {
        let config = ReconcilerConfig {
            development: true,
            ..ReconcilerConfig::default()
        };
        SceneHost::new(config).unwrap()
    }

    #[test]
    fn test_unknown_kind_is_fatal() {
        let mut host = host();
        let error = host.create_instance(&Element::new("teapot")).unwrap_err();
        assert!(matches!(error, HostError::UnknownKind(ref kind) if kind == "teapot"));
        assert!(error.is_fatal());
    }

    #[test]
    fn test_unknown_prop_is_advised_and_ignored() {
        let mut host = host();
        host.create_instance(&Element::new("group").prop("colour", 3)).unwrap();
        assert_eq!(host.diagnostics().advisories().len(), 1);
    }

    #[test]
    fn test_mesh_without_material_is_advised() {
        let mut host = host();
        let element = Element::new("mesh").child(Element::new("boxGeometry"));
        reconciler::mount(&mut host, &element).unwrap();
        let advisories = host.diagnostics().advisories();
        assert_eq!(advisories.len(), 1);
        assert!(advisories[0].contains("material"));
    }

    #[test]
    fn test_remove_child_rejects_wrong_parent() {
        let mut host = host();
        let a = host.create_instance(&Element::new("group")).unwrap();
        let b = host.create_instance(&Element::new("group")).unwrap();
        let c = host.create_instance(&Element::new("group")).unwrap();
        host.append_child(a, c).unwrap();
        assert!(matches!(host.remove_child(b, c), Err(HostError::NotAChild { .. })));
    }

    #[test]
    fn test_owned_wrapped_prop_resolves_to_constructed_object() {
        let mut host = host();
        let element = Element::new("pointLight").prop("shadow", Element::new("pointLightShadow").prop("bias", 0.5));
        let light = host.create_instance(&element).unwrap();

        let shadow = host.binding(light, "shadow").and_then(Binding::owned_instance).unwrap();
        assert_eq!(host.graph().light(light).unwrap().shadow, Some(shadow));
        assert_eq!(host.graph().shadow(shadow).unwrap().bias, 0.5);
        assert_eq!(host.record(shadow).unwrap().parent, Some(light));
    }

    #[test]
    fn test_prebuilt_wrapped_prop_of_wrong_class_is_rejected() {
        let mut host = host();
        let group = host.create_instance(&Element::new("group")).unwrap();
        let error = host.create_instance(&Element::new("render").prop("camera", group)).unwrap_err();
        assert!(matches!(error, HostError::WrongClass { .. }));
    }

    #[test]
    fn test_commit_reports_structure_changes() {
        let mut host = host();
        let canvas = host.insert_external(NativeObject::new(ObjectBody::Surface(SurfaceData { width: 640, height: 480 })));
        let mut root = Root::new(canvas);
        root.render(&mut host, &Element::new("group")).unwrap();
        assert!(host.changes().contains(SceneChanges::STRUCTURE));

        root.render(&mut host, &Element::new("group")).unwrap();
        assert!(host.changes().is_empty());
    }
}
