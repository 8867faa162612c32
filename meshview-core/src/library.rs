/// Fixed-capacity collection of loaded models
use std::path::Path;

use crate::geometry::Mesh;
use crate::obj;
use crate::texture::TextureLoader;

pub const DEFAULT_SLOT_COUNT: usize = 5;

/// Model slots plus the index of the one on screen.
///
/// Slot 0 is always populated, so there is always something to draw.
#[derive(Debug, Clone)]
pub struct ModelSlots {
    slots: Vec<Option<Mesh>>,
    active: usize,
}

impl ModelSlots {
    /// `capacity` slots with the default cube in the first one
    pub fn new(capacity: usize) -> Self {
        let mut slots = vec![None; capacity.max(1)];
        slots[0] = Some(Mesh::default_cube());
        Self { slots, active: 0 }
    }

    /// Load one model per path into consecutive slots.
    ///
    /// A path that fails to load still fills its slot, with the default cube.
    /// Paths beyond the capacity are dropped.
    pub fn load<P: AsRef<Path>>(
        capacity: usize,
        paths: &[P],
        textures: &dyn TextureLoader,
    ) -> Self {
        let mut library = Self::new(capacity);
        if paths.len() > library.capacity() {
            log::warn!(
                "{} model paths given but only {} slots; ignoring the rest",
                paths.len(),
                library.capacity()
            );
        }
        for (index, path) in paths.iter().take(library.capacity()).enumerate() {
            library.slots[index] = Some(load_or_cube(path.as_ref(), index, textures));
        }
        for (index, mesh) in library.populated() {
            log::info!("Model {} '{}': {} edges", index + 1, mesh.name, mesh.edges.len());
        }
        library
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, index: usize) -> Option<&Mesh> {
        self.slots.get(index)?.as_ref()
    }

    pub fn is_populated(&self, index: usize) -> bool {
        self.get(index).is_some()
    }

    pub fn set(&mut self, index: usize, mesh: Mesh) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(mesh);
                true
            }
            None => false,
        }
    }

    pub fn populated(&self) -> impl Iterator<Item = (usize, &Mesh)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|mesh| (i, mesh)))
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Mesh {
        match self.get(self.active) {
            Some(mesh) => mesh,
            None => unreachable!("active slot {} is always populated", self.active),
        }
    }

    /// Make `index` the active slot if it holds a model
    pub fn select(&mut self, index: usize) -> bool {
        if self.is_populated(index) {
            self.active = index;
            true
        } else {
            false
        }
    }
}

impl Default for ModelSlots {
    fn default() -> Self {
        Self::new(DEFAULT_SLOT_COUNT)
    }
}

/// Load a model, falling back to the default cube with a warning
pub fn load_or_cube(path: &Path, slot: usize, textures: &dyn TextureLoader) -> Mesh {
    if path.as_os_str().is_empty() {
        log::warn!("No path provided for model {}, using default cube", slot + 1);
        return Mesh::default_cube();
    }
    match obj::load_obj(path, textures) {
        Ok(mesh) => mesh,
        Err(e) => {
            log::warn!("Loading failed for model {} ({}), using default cube", slot + 1, e);
            Mesh::default_cube()
        }
    }
}
