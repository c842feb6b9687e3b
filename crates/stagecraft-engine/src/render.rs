//! Renderer boundary.
//!
//! The scene graph belongs to the renderer. This crate only adds and
//! removes objects through `RenderBackend`. `HeadlessRenderer` keeps the
//! scene in memory and counts frames, which is all the glue needs to run
//! without a GPU.

use std::any::Any;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stagecraft_core::components::{Camera, MeshDesc, PanelDesc, Transform};
use stagecraft_core::enums::LightKind;
use stagecraft_core::types::{Color, ObjectId};

/// What a scene object draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    Mesh(MeshDesc),
    Text {
        content: String,
        font_size: f32,
        color: Color,
    },
    Widget {
        label: String,
        width: f32,
        height: f32,
        font_size: f32,
        panel: PanelDesc,
    },
    Light {
        kind: LightKind,
        color: Color,
        intensity: f32,
    },
    /// Screen-space node owned by a level (HUD text, hints).
    Overlay { text: String },
}

/// A drawable in the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    /// Debug name, e.g. the prefab it came from.
    pub name: String,
    pub kind: ObjectKind,
    pub transform: Transform,
}

/// Operations the glue needs from a renderer.
pub trait RenderBackend {
    /// Whether the renderer finished initializing.
    fn is_ready(&self) -> bool;

    /// Reserve an id for a new object.
    fn allocate_id(&mut self) -> ObjectId;

    fn add_to_scene(&mut self, object: SceneObject);

    /// Returns the removed object, if it was in the scene.
    fn remove_from_scene(&mut self, id: ObjectId) -> Option<SceneObject>;

    /// Returns false if the object is not in the scene.
    fn set_transform(&mut self, id: ObjectId, transform: Transform) -> bool;

    fn contains(&self, id: ObjectId) -> bool;

    fn object_count(&self) -> usize;

    fn render(&mut self, camera: &Camera);

    /// Recreate GPU resources after the context was lost.
    fn reinitialize_context(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// In-memory renderer.
#[derive(Debug)]
pub struct HeadlessRenderer {
    ready: bool,
    next_id: u64,
    scene: BTreeMap<ObjectId, SceneObject>,
    frames_rendered: u64,
    context_generation: u32,
}

impl Default for HeadlessRenderer {
    fn default() -> Self {
        Self {
            ready: true,
            next_id: 1,
            scene: BTreeMap::new(),
            frames_rendered: 0,
            context_generation: 0,
        }
    }
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A renderer that never becomes ready.
    pub fn not_ready() -> Self {
        Self {
            ready: false,
            ..Self::default()
        }
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn context_generation(&self) -> u32 {
        self.context_generation
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.scene.get(&id)
    }

    pub fn objects(&self) -> impl Iterator<Item = &SceneObject> {
        self.scene.values()
    }
}

impl RenderBackend for HeadlessRenderer {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    fn add_to_scene(&mut self, object: SceneObject) {
        self.scene.insert(object.id, object);
    }

    fn remove_from_scene(&mut self, id: ObjectId) -> Option<SceneObject> {
        self.scene.remove(&id)
    }

    fn set_transform(&mut self, id: ObjectId, transform: Transform) -> bool {
        match self.scene.get_mut(&id) {
            Some(object) => {
                object.transform = transform;
                true
            }
            None => false,
        }
    }

    fn contains(&self, id: ObjectId) -> bool {
        self.scene.contains_key(&id)
    }

    fn object_count(&self) -> usize {
        self.scene.len()
    }

    fn render(&mut self, _camera: &Camera) {
        self.frames_rendered += 1;
    }

    fn reinitialize_context(&mut self) {
        self.context_generation += 1;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
