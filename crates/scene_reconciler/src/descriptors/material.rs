use super::TypeDescriptor;
use crate::error::{HostError, HostResult};
use crate::foundation::math::Color;
use crate::kind::NodeKind;
use crate::native::{MaterialData, MaterialModel, NativeObject, ObjectBody, ObjectClass, ObjectGraph, ObjectId};
use crate::props::{PropertySet, Props};

fn emissive_slot(model: &mut MaterialModel) -> Option<&mut Color> {
    match model {
        MaterialModel::Basic => None,
        MaterialModel::Lambert { emissive } | MaterialModel::Phong { emissive, .. } => Some(emissive),
    }
}

/// Descriptor for `meshBasicMaterial`, `meshLambertMaterial` and `meshPhongMaterial`
pub struct MaterialDescriptor {
    kind: NodeKind,
    props: PropertySet,
}

impl MaterialDescriptor {
    /// Descriptor for one material kind
    pub fn new(kind: NodeKind) -> Self {
        let mut props = PropertySet::new(kind);
        props
            .has_prop_with_default("color", Color::WHITE, |ctx, id, value| {
                let color = value.map_or(Ok(Color::WHITE), |value| value.expect_color(ctx.kind.name(), "color"))?;
                ctx.graph.material_mut(id)?.color = color;
                Ok(())
            })
            .has_prop_with_default("opacity", 1.0_f32, |ctx, id, value| {
                let opacity = value.map_or(Ok(1.0), |value| value.expect_f32(ctx.kind.name(), "opacity"))?;
                ctx.graph.material_mut(id)?.opacity = opacity.clamp(0.0, 1.0);
                Ok(())
            })
            .has_prop_with_default("transparent", false, |ctx, id, value| {
                let transparent = value.map_or(Ok(false), |value| value.expect_bool(ctx.kind.name(), "transparent"))?;
                let material = ctx.graph.material_mut(id)?;
                if material.transparent != transparent {
                    material.transparent = transparent;
                    material.mark_needs_update();
                }
                Ok(())
            })
            .has_prop_with_default("wireframe", false, |ctx, id, value| {
                let wireframe = value.map_or(Ok(false), |value| value.expect_bool(ctx.kind.name(), "wireframe"))?;
                ctx.graph.material_mut(id)?.wireframe = wireframe;
                Ok(())
            });

        if kind != NodeKind::MeshBasicMaterial {
            props.has_prop_with_default("emissive", Color::BLACK, |ctx, id, value| {
                let color = value.map_or(Ok(Color::BLACK), |value| value.expect_color(ctx.kind.name(), "emissive"))?;
                if let Some(emissive) = emissive_slot(&mut ctx.graph.material_mut(id)?.model) {
                    *emissive = color;
                }
                Ok(())
            });
        }

        if kind == NodeKind::MeshPhongMaterial {
            props
                .has_prop_with_default("specular", Color::from_hex(0x111111), |ctx, id, value| {
                    let color = match value {
                        Some(value) => value.expect_color("meshPhongMaterial", "specular")?,
                        None => Color::from_hex(0x111111),
                    };
                    if let MaterialModel::Phong { specular, .. } = &mut ctx.graph.material_mut(id)?.model {
                        *specular = color;
                    }
                    Ok(())
                })
                .has_prop_with_default("shininess", 30.0_f32, |ctx, id, value| {
                    let value = value.map_or(Ok(30.0), |value| value.expect_f32("meshPhongMaterial", "shininess"))?;
                    if let MaterialModel::Phong { shininess, .. } = &mut ctx.graph.material_mut(id)?.model {
                        *shininess = value;
                    }
                    Ok(())
                });
        }

        Self { kind, props }
    }
}

impl TypeDescriptor for MaterialDescriptor {
    fn kind(&self) -> NodeKind {
        self.kind
    }

    fn properties(&self) -> &PropertySet {
        &self.props
    }

    fn create_instance(&self, graph: &mut ObjectGraph, _props: &Props) -> HostResult<ObjectId> {
        let model = match self.kind {
            NodeKind::MeshBasicMaterial => MaterialModel::Basic,
            NodeKind::MeshLambertMaterial => MaterialModel::Lambert { emissive: Color::BLACK },
            _ => MaterialModel::Phong {
                emissive: Color::BLACK,
                specular: Color::from_hex(0x111111),
                shininess: 30.0,
            },
        };
        Ok(graph.insert(NativeObject::new(ObjectBody::Material(MaterialData::new(model)))))
    }

    fn will_be_added_to_parent(
        &self,
        graph: &mut ObjectGraph,
        instance: ObjectId,
        parent: ObjectId,
        _before: Option<ObjectId>,
    ) -> HostResult<()> {
        match graph.class(parent)? {
            ObjectClass::Mesh => {
                graph.mesh_mut(parent)?.material = Some(instance);
                Ok(())
            }
            other => Err(HostError::InvalidParent {
                child: self.kind.name(),
                parent: other.label(),
            }),
        }
    }

    /// A mesh picking up a material has to compile a program for it
    fn did_add_to_parent(&self, graph: &mut ObjectGraph, instance: ObjectId, _parent: ObjectId) -> HostResult<()> {
        graph.material_mut(instance)?.mark_needs_update();
        Ok(())
    }

    fn will_be_removed_from_parent(
        &self,
        graph: &mut ObjectGraph,
        instance: ObjectId,
        parent: ObjectId,
    ) -> HostResult<()> {
        let mesh = graph.mesh_mut(parent)?;
        if mesh.material == Some(instance) {
            mesh.material = None;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Diagnostics;
    use crate::props::{PropContext, PropertyGroupCoordinator};

    #[test]
    fn test_transparent_change_flags_program_rebuild() {
        let descriptor = MaterialDescriptor::new(NodeKind::MeshLambertMaterial);
        let mut graph = ObjectGraph::new();
        let mut diagnostics = Diagnostics::new(true);
        let mut groups = PropertyGroupCoordinator::new();
        let id = descriptor.create_instance(&mut graph, &Props::new()).unwrap();

        let old = Props::new();
        let new: Props = [("transparent", true)].into_iter().collect();
        let mut ctx = PropContext { graph: &mut graph, diagnostics: &mut diagnostics, kind: NodeKind::MeshLambertMaterial };
        descriptor.update_props(&mut ctx, id, &old, &new, &mut groups).unwrap();

        let material = graph.material(id).unwrap();
        assert!(material.transparent);
        assert!(material.needs_update);
        assert_eq!(material.version, 1);
    }

    #[test]
    fn test_basic_material_has_no_emissive() {
        let descriptor = MaterialDescriptor::new(NodeKind::MeshBasicMaterial);
        assert!(!descriptor.properties().declares("emissive"));
        assert!(MaterialDescriptor::new(NodeKind::MeshPhongMaterial).properties().declares("shininess"));
    }
}
