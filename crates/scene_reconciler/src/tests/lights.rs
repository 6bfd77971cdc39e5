use super::RefLog;
use crate::config::ReconcilerConfig;
use crate::descriptors::INTENSITY_AND_POWER_WARNING;
use crate::element::Element;
use crate::native::LightVariant;
use crate::SceneRenderer;
use approx::assert_relative_eq;

fn renderer(development: bool) -> SceneRenderer {
    SceneRenderer::new(ReconcilerConfig {
        development,
        ..ReconcilerConfig::default()
    })
    .unwrap()
}

fn scene_with(light: Element) -> Element {
    Element::new("scene").child(light)
}

#[test]
fn test_power_wins_over_intensity_with_one_advisory() {
    let mut renderer = renderer(true);
    let canvas = renderer.create_canvas(800, 600);
    let light_ref = RefLog::new();
    let light = Element::new("pointLight")
        .prop("intensity", 3)
        .prop("power", 40)
        .with_ref(light_ref.callback());
    renderer.render(&scene_with(light), canvas).unwrap();

    let data = renderer.host().graph().light(light_ref.current().unwrap()).unwrap();
    assert_relative_eq!(data.power().unwrap(), 40.0, epsilon = 1e-4);
    let advisories = renderer.host().diagnostics().advisories();
    assert_eq!(advisories.iter().filter(|message| *message == INTENSITY_AND_POWER_WARNING).count(), 1);
}

#[test]
fn test_conflict_is_silent_outside_development() {
    let mut renderer = renderer(false);
    let canvas = renderer.create_canvas(800, 600);
    let light = Element::new("pointLight").prop("intensity", 3).prop("power", 40);
    renderer.render(&scene_with(light), canvas).unwrap();
    assert!(renderer.host().diagnostics().advisories().is_empty());
}

#[test]
fn test_group_members_apply_once_per_commit() {
    let mut renderer = renderer(true);
    let canvas = renderer.create_canvas(800, 600);
    let light_ref = RefLog::new();
    let light = |intensity: f64| {
        Element::new("pointLight")
            .prop("intensity", intensity)
            .prop("distance", 10)
            .with_ref(light_ref.callback())
    };

    renderer.render(&scene_with(light(2.0)), canvas).unwrap();
    let id = light_ref.current().unwrap();
    assert_relative_eq!(renderer.host().graph().light(id).unwrap().intensity, 2.0);

    renderer.render(&scene_with(light(5.0)), canvas).unwrap();
    let data = renderer.host().graph().light(id).unwrap();
    assert_relative_eq!(data.intensity, 5.0);
    assert!(matches!(data.variant, LightVariant::Point { distance, .. } if distance == 10.0));

    // Dropping the only member falls back to unit intensity
    renderer
        .render(&scene_with(Element::new("pointLight").prop("distance", 10).with_ref(light_ref.callback())), canvas)
        .unwrap();
    assert_relative_eq!(renderer.host().graph().light(id).unwrap().intensity, 1.0);
    assert!(renderer.host().diagnostics().advisories().is_empty());
}

#[test]
fn test_distance_change_updates_in_place() {
    let mut renderer = renderer(true);
    let canvas = renderer.create_canvas(800, 600);
    let light_ref = RefLog::new();
    let light = |distance: i32| Element::new("pointLight").prop("distance", distance).with_ref(light_ref.callback());

    renderer.render(&scene_with(light(10)), canvas).unwrap();
    let id = light_ref.current().unwrap();
    renderer.render(&scene_with(light(20)), canvas).unwrap();

    assert_eq!(light_ref.count(), 1);
    let data = renderer.host().graph().light(id).unwrap();
    assert!(matches!(data.variant, LightVariant::Point { distance, .. } if distance == 20.0));
}

#[test]
fn test_shadow_prop_builds_and_replaces_owned_shadow() {
    let mut renderer = renderer(true);
    let canvas = renderer.create_canvas(800, 600);
    let light_ref = RefLog::new();
    let light = |shadow: Element| {
        Element::new("pointLight")
            .prop("shadow", shadow)
            .with_ref(light_ref.callback())
    };

    renderer
        .render(&scene_with(light(Element::new("pointLightShadow").prop("bias", 0.25))), canvas)
        .unwrap();
    let id = light_ref.current().unwrap();
    let first = renderer.host().graph().light(id).unwrap().shadow.unwrap();
    assert_relative_eq!(renderer.host().graph().shadow(first).unwrap().bias, 0.25);

    // Same identity: updated in place
    renderer
        .render(&scene_with(light(Element::new("pointLightShadow").prop("bias", 0.5))), canvas)
        .unwrap();
    assert_eq!(renderer.host().graph().light(id).unwrap().shadow, Some(first));
    assert_relative_eq!(renderer.host().graph().shadow(first).unwrap().bias, 0.5);

    // New key: the old shadow is torn down and a new one bound
    renderer
        .render(
            &scene_with(light(Element::new("pointLightShadow").key("hq").prop("mapWidth", 2048))),
            canvas,
        )
        .unwrap();
    let graph = renderer.host().graph();
    let second = graph.light(id).unwrap().shadow.unwrap();
    assert_ne!(first, second);
    assert!(graph.is_disposed(first));
    assert_eq!(graph.shadow(second).unwrap().map_size, [2048, 512]);

    // Removing the prop releases the owned shadow
    renderer
        .render(&scene_with(Element::new("pointLight").with_ref(light_ref.callback())), canvas)
        .unwrap();
    let graph = renderer.host().graph();
    assert_eq!(graph.light(id).unwrap().shadow, None);
    assert!(graph.is_disposed(second));
}

#[test]
fn test_advisories_cover_only_the_latest_commit() {
    let mut renderer = renderer(true);
    let canvas = renderer.create_canvas(800, 600);
    for round in 0..8 {
        let light = Element::new("pointLight")
            .key(format!("light-{round}"))
            .prop("intensity", 3)
            .prop("power", 40);
        renderer.render(&scene_with(light), canvas).unwrap();
        assert_eq!(renderer.host().diagnostics().advisories().len(), 1);
    }

    let drained = renderer.host_mut().diagnostics_mut().take_advisories();
    assert_eq!(drained, vec![INTENSITY_AND_POWER_WARNING.to_string()]);
    assert!(renderer.host().diagnostics().advisories().is_empty());
}
