//! Data-only shape blueprints handed to the rendering collaborator.
//!
//! A blueprint describes a reference form as a composition of solid
//! primitives with figure-local transforms. The session core never interprets
//! this data; it only forwards it across the renderer boundary.

use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};

/// Inline part capacity covering the largest built-in figure (the mannequin).
pub type PartList = SmallVec<[Part; 9]>;

/// Opaque geometry factory attached to each catalog entry.
///
/// The RNG feeds joint jitter in posed figures; fixed forms ignore it.
pub type BuildFn = fn(&mut dyn RngCore) -> ShapeBlueprint;

/// Solid primitive kinds understood by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Primitive {
    Box { width: f32, height: f32, depth: f32 },
    Sphere { radius: f32 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32 },
    Cone { radius: f32, height: f32 },
    Capsule { radius: f32, length: f32 },
    Torus { radius: f32, tube: f32 },
}

/// One solid within a blueprint, positioned in figure-local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    pub primitive: Primitive,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default)]
    pub rotation_deg: [f32; 3],
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

fn default_opacity() -> f32 {
    1.0
}

impl Part {
    /// A fully opaque part at the figure origin.
    #[must_use]
    pub fn solid(primitive: Primitive) -> Self {
        Self {
            primitive,
            position: [0.0; 3],
            rotation_deg: [0.0; 3],
            opacity: 1.0,
        }
    }

    #[must_use]
    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = [x, y, z];
        self
    }

    #[must_use]
    pub fn rotated_deg(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation_deg = [x, y, z];
        self
    }

    #[must_use]
    pub fn faded(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// A renderable form: an ordered list of parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ShapeBlueprint {
    pub parts: PartList,
}

fn single(primitive: Primitive) -> ShapeBlueprint {
    ShapeBlueprint {
        parts: smallvec![Part::solid(primitive)],
    }
}

pub(crate) fn cube(_: &mut dyn RngCore) -> ShapeBlueprint {
    single(Primitive::Box {
        width: 1.6,
        height: 1.6,
        depth: 1.6,
    })
}

pub(crate) fn rectangular_box(_: &mut dyn RngCore) -> ShapeBlueprint {
    single(Primitive::Box {
        width: 2.2,
        height: 1.2,
        depth: 1.4,
    })
}

pub(crate) fn sphere(_: &mut dyn RngCore) -> ShapeBlueprint {
    single(Primitive::Sphere { radius: 1.1 })
}

pub(crate) fn cylinder(_: &mut dyn RngCore) -> ShapeBlueprint {
    single(Primitive::Cylinder {
        radius_top: 0.75,
        radius_bottom: 0.75,
        height: 2.4,
    })
}

pub(crate) fn cone(_: &mut dyn RngCore) -> ShapeBlueprint {
    single(Primitive::Cone {
        radius: 0.9,
        height: 2.6,
    })
}

pub(crate) fn capsule(_: &mut dyn RngCore) -> ShapeBlueprint {
    single(Primitive::Capsule {
        radius: 0.7,
        length: 1.6,
    })
}

pub(crate) fn torus(_: &mut dyn RngCore) -> ShapeBlueprint {
    single(Primitive::Torus {
        radius: 1.0,
        tube: 0.35,
    })
}

/// Box with a translucent cutting box leaning over it; the renderer draws the
/// cut ghosted so the slice plane stays readable.
pub(crate) fn wedge(_: &mut dyn RngCore) -> ShapeBlueprint {
    ShapeBlueprint {
        parts: smallvec![
            Part::solid(Primitive::Box {
                width: 2.2,
                height: 1.6,
                depth: 1.6,
            }),
            Part::solid(Primitive::Box {
                width: 2.4,
                height: 1.2,
                depth: 1.8,
            })
            .at(0.0, 0.6, 0.0)
            .rotated_deg(0.0, 0.0, 32.0)
            .faded(0.18),
        ],
    }
}

// Part order: torso, pelvis, head, upper arms (L/R), forearms (L/R),
// thighs (L/R). The posed variant indexes into this list.
fn mannequin_figure() -> PartList {
    smallvec![
        Part::solid(Primitive::Box {
            width: 1.2,
            height: 1.6,
            depth: 0.7,
        })
        .at(0.0, 1.85, 0.0),
        Part::solid(Primitive::Box {
            width: 1.25,
            height: 0.7,
            depth: 0.75,
        })
        .at(0.0, 0.95, 0.0),
        Part::solid(Primitive::Sphere { radius: 0.45 }).at(0.0, 2.95, 0.0),
        Part::solid(Primitive::Capsule {
            radius: 0.18,
            length: 0.8,
        })
        .at(-0.95, 2.2, 0.0)
        .rotated_deg(0.0, 0.0, 15.0),
        Part::solid(Primitive::Capsule {
            radius: 0.18,
            length: 0.8,
        })
        .at(0.95, 2.2, 0.0)
        .rotated_deg(0.0, 0.0, -15.0),
        Part::solid(Primitive::Capsule {
            radius: 0.16,
            length: 0.8,
        })
        .at(-1.25, 1.55, 0.0)
        .rotated_deg(0.0, 0.0, 35.0),
        Part::solid(Primitive::Capsule {
            radius: 0.16,
            length: 0.8,
        })
        .at(1.25, 1.55, 0.0)
        .rotated_deg(0.0, 0.0, -35.0),
        Part::solid(Primitive::Capsule {
            radius: 0.22,
            length: 1.0,
        })
        .at(-0.45, 0.25, 0.0),
        Part::solid(Primitive::Capsule {
            radius: 0.22,
            length: 1.0,
        })
        .at(0.45, 0.25, 0.0),
    ]
}

pub(crate) fn mannequin(_: &mut dyn RngCore) -> ShapeBlueprint {
    ShapeBlueprint {
        parts: mannequin_figure(),
    }
}

/// Mannequin with randomized joint angles: torso and pelvis twist around the
/// spine, arms and forearms swing forward and back.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn mannequin_posed(rng: &mut dyn RngCore) -> ShapeBlueprint {
    let mut parts = mannequin_figure();
    let mut jitter = |lo: i32, hi: i32| rng.gen_range(lo..=hi) as f32;
    parts[0].rotation_deg = [jitter(-10, 10), jitter(-35, 35), 0.0];
    parts[1].rotation_deg = [jitter(-12, 12), jitter(-20, 20), 0.0];
    for limb in 3..=6 {
        parts[limb].rotation_deg[0] = jitter(-40, 40);
    }
    ShapeBlueprint { parts }
}
