//! Scene reconciler demo
//!
//! Renders a small lit scene into a renderer created outside the tree, then
//! re-renders it a few times with changing props and keys, and finally
//! unmounts it. Pass a `.toml` or `.ron` config path as the first argument to
//! override the defaults.

use scene_reconciler::foundation::logging;
use scene_reconciler::prelude::*;

fn spinning_cube(frame: u32) -> Element {
    let angle = scene_reconciler::foundation::math::utils::deg_to_rad(frame as f32 * 15.0);
    Element::new("mesh")
        .key("cube")
        .prop("name", "cube")
        .prop("rotation", Vec3::new(0.0, angle, 0.0))
        .child(Element::new("boxGeometry").prop("width", 1.5).prop("height", 1.5).prop("depth", 1.5))
        .child(Element::new("meshPhongMaterial").prop("color", 0xcc8844).prop("shininess", 60))
}

fn frame_tree(frame: u32, light_power: f64) -> Element {
    let camera_key = if frame < 2 { "wide" } else { "narrow" };
    let fov = if frame < 2 { 75 } else { 45 };

    Element::new("render")
        .prop(
            "camera",
            Element::new("perspectiveCamera")
                .key(camera_key)
                .prop("fov", fov)
                .prop("aspect", 800.0 / 600.0)
                .prop("position", Vec3::new(0.0, 2.0, 8.0)),
        )
        .prop(
            "scene",
            Element::new("scene")
                .prop("background", 0x101018)
                .child(Element::new("ambientLight").prop("intensity", 0.2))
                .child(
                    Element::new("pointLight")
                        .prop("power", light_power)
                        .prop("position", Vec3::new(3.0, 4.0, 2.0))
                        .prop("shadow", Element::new("pointLightShadow").prop("mapWidth", 1024)),
                )
                .child(spinning_cube(frame)),
        )
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => ReconcilerConfig::load_from_file(&path)?,
        None => ReconcilerConfig::default(),
    };

    let filter = config.log_filter.clone().unwrap_or_else(|| "info".to_string());
    logging::init_with_filter(&filter);

    log::info!("Starting scene reconciler demo");

    let mut renderer = SceneRenderer::new(config)?;
    let target = renderer.create_renderer(800, 600);

    for frame in 0..4 {
        let action = renderer.render(&frame_tree(frame, 40.0 + f64::from(frame) * 10.0), target)?;
        let graph = renderer.host().graph();
        let camera = graph.render_action(action)?.camera;
        log::info!(
            "Frame {}: {} objects, {} live instances, camera {:?}, changes {:?}",
            frame,
            graph.len(),
            renderer.host().live_instances(),
            camera,
            renderer.host().changes()
        );
        for advisory in renderer.host_mut().diagnostics_mut().take_advisories() {
            log::info!("Advisory: {}", advisory);
        }
    }

    let frames = &renderer.host().graph().renderer(target)?.frames;
    log::info!("Renderer received {} frames", frames.len());
    if let Some(last) = frames.last() {
        log::info!("Last frame drew {} meshes", last.draw_count);
    }

    let unmounted = renderer.unmount_component_at_node(target, Some(|| log::info!("Scene torn down")))?;
    log::info!(
        "Unmounted: {}, live instances left: {}",
        unmounted,
        renderer.host().live_instances()
    );
    Ok(())
}
