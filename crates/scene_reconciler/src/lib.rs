//! # Scene Reconciler
//!
//! A host-config core that lets a declarative element tree drive a
//! retained-mode 3D object graph.
//!
//! ## Features
//!
//! - **Type Descriptors**: one table per element kind declaring its props,
//!   constructor arguments and parent rules
//! - **Property Groups**: co-dependent props applied together once per commit
//! - **Wrapped Props**: props that take a literal, a nested element or a
//!   pre-built native object
//! - **Resource Containers**: instances registered by id for lookup elsewhere
//! - **Render Roots**: one reconciler root per surface or renderer
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_reconciler::prelude::*;
//!
//! fn main() -> Result<(), HostError> {
//!     let mut renderer = SceneRenderer::new(ReconcilerConfig::default())?;
//!     let target = renderer.create_renderer(800, 600);
//!
//!     let tree = Element::new("render")
//!         .prop("camera", Element::new("perspectiveCamera").prop("fov", 75))
//!         .prop(
//!             "scene",
//!             Element::new("scene").child(
//!                 Element::new("mesh")
//!                     .child(Element::new("boxGeometry"))
//!                     .child(Element::new("meshLambertMaterial")),
//!             ),
//!         );
//!     renderer.render(&tree, target)?;
//!
//!     let frames = &renderer.host().graph().renderer(target)?.frames;
//!     assert_eq!(frames.len(), 1);
//!     assert_eq!(frames[0].draw_count, 1);
//!     Ok(())
//! }
//! ```

pub mod foundation;
pub mod config;
pub mod error;
pub mod kind;
pub mod native;
pub mod element;
pub mod props;
pub mod resources;
pub mod descriptors;
pub mod host;
pub mod reconciler;
pub mod renderer;

pub use renderer::SceneRenderer;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        config::{Config, ReconcilerConfig},
        descriptors::{DescriptorRegistry, TypeDescriptor},
        element::{Element, RefCallback},
        error::{HostError, HostResult},
        foundation::math::{Color, Fog, Vec3},
        host::{HostConfig, SceneChanges, SceneHost},
        kind::NodeKind,
        native::{ObjectClass, ObjectGraph, ObjectId},
        props::{PropValue, Props},
        resources::{ResourceContainer, ResourceStore},
        SceneRenderer,
    };
}

#[cfg(test)]
mod tests;
