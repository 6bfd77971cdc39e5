use super::RefLog;
use crate::config::ReconcilerConfig;
use crate::element::Element;
use crate::error::HostError;
use crate::foundation::math::{Color, Fog, Vec3};
use crate::native::{ObjectClass, ObjectId};
use crate::SceneRenderer;
use approx::assert_relative_eq;

fn renderer() -> SceneRenderer {
    SceneRenderer::new(ReconcilerConfig::default()).unwrap()
}

fn names(renderer: &SceneRenderer, parent: ObjectId) -> Vec<String> {
    let graph = renderer.host().graph();
    graph
        .children(parent)
        .iter()
        .map(|&child| graph.object(child).unwrap().name.clone())
        .collect()
}

#[test]
fn test_nested_transforms_compose_into_world_matrix() {
    let mut renderer = renderer();
    let canvas = renderer.create_canvas(800, 600);
    let mesh_ref = RefLog::new();
    let tree = Element::new("scene").child(
        Element::new("group").prop("position", Vec3::new(1.0, 0.0, 0.0)).child(
            Element::new("mesh")
                .prop("position", Vec3::new(0.0, 2.0, 0.0))
                .with_ref(mesh_ref.callback()),
        ),
    );
    renderer.render(&tree, canvas).unwrap();

    let matrix = renderer.host().graph().world_matrix(mesh_ref.current().unwrap()).unwrap();
    assert_relative_eq!(matrix[(0, 3)], 1.0);
    assert_relative_eq!(matrix[(1, 3)], 2.0);
    assert_relative_eq!(matrix[(2, 3)], 0.0);
}

#[test]
fn test_keyed_insert_lands_in_native_order() {
    let mut renderer = renderer();
    let canvas = renderer.create_canvas(800, 600);
    let tree = |keys: &[&str]| {
        Element::new("scene").children(
            keys.iter()
                .map(|&key| Element::new("group").key(key).prop("name", key)),
        )
    };
    let scene = renderer.render(&tree(&["a", "c"]), canvas).unwrap();
    renderer.render(&tree(&["a", "b", "c"]), canvas).unwrap();
    assert_eq!(names(&renderer, scene), ["a", "b", "c"]);

    renderer.render(&tree(&["c", "b"]), canvas).unwrap();
    assert_eq!(names(&renderer, scene), ["c", "b"]);
}

#[test]
fn test_geometry_dimension_change_rebuilds_and_rebinds_mesh() {
    let mut renderer = renderer();
    let canvas = renderer.create_canvas(800, 600);
    let mesh_ref = RefLog::new();
    let geometry_ref = RefLog::new();
    let tree = |width: f64| {
        Element::new("mesh")
            .with_ref(mesh_ref.callback())
            .child(Element::new("boxGeometry").prop("width", width).with_ref(geometry_ref.callback()))
            .child(Element::new("meshBasicMaterial"))
    };

    renderer.render(&tree(1.0), canvas).unwrap();
    let first = geometry_ref.current().unwrap();
    renderer.render(&tree(2.0), canvas).unwrap();
    let second = geometry_ref.current().unwrap();

    assert_ne!(first, second);
    assert_eq!(geometry_ref.count(), 3);
    assert_eq!(mesh_ref.count(), 1);

    let graph = renderer.host().graph();
    assert!(graph.is_disposed(first));
    assert_eq!(graph.mesh(mesh_ref.current().unwrap()).unwrap().geometry, Some(second));
}

#[test]
fn test_material_kind_swap_flags_new_program() {
    let mut renderer = renderer();
    let canvas = renderer.create_canvas(800, 600);
    let material_ref = RefLog::new();
    let tree = |kind: &str| {
        Element::new("mesh")
            .child(Element::new("planeGeometry"))
            .child(Element::new(kind).with_ref(material_ref.callback()))
    };

    let mesh = renderer.render(&tree("meshLambertMaterial"), canvas).unwrap();
    renderer.render(&tree("meshPhongMaterial"), canvas).unwrap();

    let graph = renderer.host().graph();
    let material = material_ref.current().unwrap();
    assert_eq!(graph.mesh(mesh).unwrap().material, Some(material));
    assert!(graph.material(material).unwrap().needs_update);
    assert_eq!(graph.class(material).unwrap(), ObjectClass::Material);
}

#[test]
fn test_geometry_outside_mesh_is_rejected() {
    let mut renderer = renderer();
    let canvas = renderer.create_canvas(800, 600);
    let tree = Element::new("group").child(Element::new("boxGeometry"));

    let error = renderer.render(&tree, canvas).unwrap_err();
    assert!(matches!(
        error,
        HostError::InvalidParent { child: "boxGeometry", parent: "object" }
    ));
    // Fatal errors go back to the caller only
    assert!(renderer.host().diagnostics().errors().is_empty());
}

#[test]
fn test_scene_under_renderer_stays_unlinked() {
    let mut renderer = renderer();
    let canvas = renderer.create_canvas(800, 600);
    let scene_ref = RefLog::new();
    let webgl = renderer
        .render(
            &Element::new("webGLRenderer").child(Element::new("scene").with_ref(scene_ref.callback())),
            canvas,
        )
        .unwrap();

    let scene = scene_ref.current().unwrap();
    let graph = renderer.host().graph();
    assert_eq!(graph.parent(scene), None);
    assert!(graph.children(webgl).is_empty());
    assert_eq!(renderer.host().record(scene).unwrap().parent, Some(webgl));
}

#[test]
fn test_scene_background_and_fog_clear_when_removed() {
    let mut renderer = renderer();
    let canvas = renderer.create_canvas(800, 600);
    let with_settings = Element::new("scene")
        .prop("background", 0x202020)
        .prop(
            "fog",
            Fog::Linear {
                color: Color::WHITE,
                near: 1.0,
                far: 100.0,
            },
        );
    let scene = renderer.render(&with_settings, canvas).unwrap();
    assert!(renderer.host().graph().scene(scene).unwrap().background.is_some());

    renderer.render(&Element::new("scene"), canvas).unwrap();
    let data = renderer.host().graph().scene(scene).unwrap();
    assert!(data.background.is_none());
    assert!(data.fog.is_none());
}
