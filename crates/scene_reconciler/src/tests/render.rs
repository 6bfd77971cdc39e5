use super::RefLog;
use crate::config::ReconcilerConfig;
use crate::element::Element;
use crate::native::{GeometryShape, MaterialModel, ObjectClass};
use crate::SceneRenderer;

fn renderer() -> SceneRenderer {
    SceneRenderer::new(ReconcilerConfig::default()).unwrap()
}

fn box_mesh() -> Element {
    Element::new("mesh")
        .child(Element::new("boxGeometry").prop("width", 2).prop("height", 2).prop("depth", 2))
        .child(Element::new("meshLambertMaterial").prop("color", 0x00ff00))
}

fn render_action(camera: Element, scene: Element) -> Element {
    Element::new("render").prop("camera", camera).prop("scene", scene)
}

#[test]
fn test_render_into_prebuilt_renderer_draws_one_frame() {
    let mut renderer = renderer();
    let target = renderer.create_renderer(800, 600);
    let tree = render_action(
        Element::new("perspectiveCamera").prop("fov", 75).prop("aspect", 800.0 / 600.0),
        Element::new("scene").child(box_mesh()),
    );
    renderer.render(&tree, target).unwrap();

    let graph = renderer.host().graph();
    let frames = &graph.renderer(target).unwrap().frames;
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].draw_count, 1);

    let children = graph.children(frames[0].scene);
    assert_eq!(children.len(), 1);
    let mesh = graph.mesh(children[0]).unwrap();
    let geometry = graph.geometry(mesh.geometry.unwrap()).unwrap();
    assert!(matches!(geometry.shape, GeometryShape::Box { width, .. } if width == 2.0));
    let material = graph.material(mesh.material.unwrap()).unwrap();
    assert!(matches!(material.model, MaterialModel::Lambert { .. }));
}

#[test]
fn test_renderer_without_render_action_submits_nothing() {
    let mut renderer = renderer();
    let canvas = renderer.create_canvas(800, 600);
    let refs = RefLog::new();

    let tree = Element::new("webGLRenderer")
        .prop("width", 800)
        .prop("height", 600)
        .with_ref(refs.callback());
    let webgl = renderer.render(&tree, canvas).unwrap();
    assert_eq!(refs.current(), Some(webgl));
    {
        let data = renderer.host().graph().renderer(webgl).unwrap();
        assert!(data.frames.is_empty());
        assert_eq!((data.width, data.height), (800, 600));
    }

    let tree = tree.child(render_action(
        Element::new("perspectiveCamera"),
        Element::new("scene").child(box_mesh()),
    ));
    renderer.render(&tree, canvas).unwrap();
    assert_eq!(renderer.host().graph().renderer(webgl).unwrap().frames.len(), 1);
    assert_eq!(refs.count(), 1);
}

#[test]
fn test_wrapped_camera_and_scene_are_children_of_render_action() {
    let mut renderer = renderer();
    let target = renderer.create_renderer(800, 600);
    let action = renderer
        .render(&render_action(Element::new("perspectiveCamera"), Element::new("scene")), target)
        .unwrap();

    let graph = renderer.host().graph();
    let data = graph.render_action(action).unwrap();
    let (camera, scene) = (data.camera.unwrap(), data.scene.unwrap());
    assert_eq!(graph.parent(camera), Some(action));
    assert_eq!(graph.parent(scene), Some(action));
    assert_eq!(graph.parent(action), Some(target));
}

#[test]
fn test_wrapped_refs_follow_identity_changes() {
    let mut renderer = renderer();
    let target = renderer.create_renderer(800, 600);
    let camera_ref = RefLog::new();
    let scene_ref = RefLog::new();

    let action = renderer
        .render(
            &render_action(
                Element::new("perspectiveCamera").prop("name", "first").with_ref(camera_ref.callback()),
                Element::new("scene").prop("name", "first").with_ref(scene_ref.callback()),
            ),
            target,
        )
        .unwrap();
    assert_eq!(camera_ref.count(), 1);
    assert_eq!(scene_ref.count(), 1);
    let first_camera = camera_ref.current().unwrap();
    let first_scene = scene_ref.current().unwrap();

    // Prop-only change keeps both objects and leaves the refs alone
    renderer
        .render(
            &render_action(
                Element::new("perspectiveCamera").prop("name", "second").with_ref(camera_ref.callback()),
                Element::new("scene").prop("name", "second").with_ref(scene_ref.callback()),
            ),
            target,
        )
        .unwrap();
    assert_eq!(camera_ref.count(), 1);
    assert_eq!(scene_ref.count(), 1);
    assert_eq!(renderer.host().graph().object(first_camera).unwrap().name, "second");
    assert_eq!(renderer.host().graph().object(first_scene).unwrap().name, "second");

    // A key change rebuilds: null for the old object, then the new one
    renderer
        .render(
            &render_action(
                Element::new("perspectiveCamera")
                    .key("3")
                    .prop("name", "third")
                    .with_ref(camera_ref.callback()),
                Element::new("scene").key("3").prop("name", "third").with_ref(scene_ref.callback()),
            ),
            target,
        )
        .unwrap();
    assert_eq!(camera_ref.count(), 3);
    assert_eq!(scene_ref.count(), 3);
    let third_camera = camera_ref.current().unwrap();
    let third_scene = scene_ref.current().unwrap();
    assert_ne!(third_camera, first_camera);
    {
        let graph = renderer.host().graph();
        assert_eq!(graph.parent(first_camera), None);
        assert_eq!(graph.parent(first_scene), None);
        assert_eq!(graph.object(first_camera).unwrap().name, "second");
        assert!(graph.is_disposed(first_camera));
        assert_eq!(graph.parent(third_camera), Some(action));
        assert_eq!(graph.parent(third_scene), Some(action));
    }

    // Dropping the ref on the same element clears it once
    renderer
        .render(
            &render_action(
                Element::new("perspectiveCamera").key("3").prop("name", "fourth"),
                Element::new("scene").key("3").prop("name", "fourth"),
            ),
            target,
        )
        .unwrap();
    assert_eq!(camera_ref.count(), 4);
    assert_eq!(camera_ref.last(), Some(None));
    assert_eq!(scene_ref.count(), 4);
    assert_eq!(renderer.host().graph().object(third_camera).unwrap().name, "fourth");

    // Rebuilding without a ref leaves the old callback untouched
    renderer
        .render(
            &render_action(
                Element::new("perspectiveCamera").key("5").prop("name", "fifth"),
                Element::new("scene").key("5").prop("name", "fifth"),
            ),
            target,
        )
        .unwrap();
    assert_eq!(camera_ref.count(), 4);
    assert_eq!(scene_ref.count(), 4);

    let graph = renderer.host().graph();
    assert_eq!(graph.parent(third_camera), None);
    let fifth_camera = graph
        .children(action)
        .iter()
        .copied()
        .find(|&child| graph.class(child).ok() == Some(ObjectClass::Camera))
        .unwrap();
    assert_eq!(graph.object(fifth_camera).unwrap().name, "fifth");
    assert_eq!(graph.render_action(action).unwrap().camera, Some(fifth_camera));
}

#[test]
fn test_prebuilt_camera_is_not_disposed_when_replaced() {
    let mut renderer = renderer();
    let target = renderer.create_renderer(800, 600);
    let camera_ref = RefLog::new();
    let canvas = renderer.create_canvas(800, 600);
    renderer
        .render(
            &Element::new("webGLRenderer").child(
                Element::new("render")
                    .prop("camera", Element::new("perspectiveCamera").with_ref(camera_ref.callback()))
                    .prop("scene", Element::new("scene")),
            ),
            canvas,
        )
        .unwrap();
    let prebuilt = camera_ref.current().unwrap();

    let action = renderer
        .render(
            &Element::new("render").prop("camera", prebuilt).prop("scene", Element::new("scene")),
            target,
        )
        .unwrap();
    renderer
        .render(
            &Element::new("render")
                .prop("camera", Element::new("orthographicCamera"))
                .prop("scene", Element::new("scene")),
            target,
        )
        .unwrap();

    let graph = renderer.host().graph();
    assert!(!graph.is_disposed(prebuilt));
    assert_ne!(graph.render_action(action).unwrap().camera, Some(prebuilt));
}
