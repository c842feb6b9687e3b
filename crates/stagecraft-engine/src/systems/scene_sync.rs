//! Scene sync: copies entity transforms onto their scene objects.

use stagecraft_core::components::{SceneHandle, Transform};

use crate::context::Services;

pub fn run(services: &mut Services) {
    let Some(renderer) = services.renderer.as_mut() else {
        return;
    };
    for (_entity, (handle, transform)) in services
        .world
        .query_mut::<(&SceneHandle, &Transform)>()
    {
        renderer.set_transform(handle.object, *transform);
    }
}
