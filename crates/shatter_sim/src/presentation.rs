//! Presentation layer seam
//!
//! The simulation pushes visual state out through [`Presentation`] and never
//! reads it back.

use glam::{Quat, Vec3};
use shatter_physics::ShapeDesc;
use std::collections::HashMap;

/// Visual counterpart of an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VisualHandle(pub u64);

/// What a new visual looks like
#[derive(Debug, Clone, PartialEq)]
pub struct VisualDesc {
    pub shape: ShapeDesc,
    pub color: u32,
}

/// Scene the simulation renders into
pub trait Presentation {
    fn add_to_scene(&mut self, handle: VisualHandle, desc: &VisualDesc);

    fn update_transform(&mut self, handle: VisualHandle, position: Vec3, orientation: Quat);

    fn remove_from_scene(&mut self, handle: VisualHandle);

    /// Called once at the end of every step
    fn render_frame(&mut self);
}

/// Visual as tracked by [`HeadlessPresentation`]
#[derive(Debug, Clone, PartialEq)]
pub struct VisualState {
    pub desc: VisualDesc,
    pub position: Vec3,
    pub orientation: Quat,
}

/// Presentation that only records state
#[derive(Debug, Default)]
pub struct HeadlessPresentation {
    visuals: HashMap<VisualHandle, VisualState>,
    frames: u64,
    transform_updates: u64,
}

impl HeadlessPresentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visual(&self, handle: VisualHandle) -> Option<&VisualState> {
        self.visuals.get(&handle)
    }

    pub fn contains(&self, handle: VisualHandle) -> bool {
        self.visuals.contains_key(&handle)
    }

    pub fn visual_count(&self) -> usize {
        self.visuals.len()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn transform_updates(&self) -> u64 {
        self.transform_updates
    }
}

impl Presentation for HeadlessPresentation {
    fn add_to_scene(&mut self, handle: VisualHandle, desc: &VisualDesc) {
        self.visuals.insert(
            handle,
            VisualState {
                desc: desc.clone(),
                position: Vec3::ZERO,
                orientation: Quat::IDENTITY,
            },
        );
    }

    fn update_transform(&mut self, handle: VisualHandle, position: Vec3, orientation: Quat) {
        if let Some(visual) = self.visuals.get_mut(&handle) {
            visual.position = position;
            visual.orientation = orientation;
            self.transform_updates += 1;
        }
    }

    fn remove_from_scene(&mut self, handle: VisualHandle) {
        self.visuals.remove(&handle);
    }

    fn render_frame(&mut self) {
        self.frames += 1;
    }
}
