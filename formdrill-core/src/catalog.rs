//! Static registry of reference shapes.

use crate::blueprint::{self, BuildFn};

/// A reference shape the trainer can present.
///
/// `build` is an opaque geometry factory forwarded to the rendering
/// collaborator; the session core only reads `id`, `name`, and `tier`.
#[derive(Debug, Clone, Copy)]
pub struct ShapeDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub tier: u8,
    pub build: BuildFn,
}

/// Built-in shape library, ordered easiest-first.
///
/// Tier 1: single primitives. Tier 2: compound forms. Tier 3: posed figures.
pub const BUILTIN_SHAPES: &[ShapeDescriptor] = &[
    ShapeDescriptor {
        id: "cube",
        name: "Cube",
        tier: 1,
        build: blueprint::cube,
    },
    ShapeDescriptor {
        id: "box",
        name: "Rectangular Box",
        tier: 1,
        build: blueprint::rectangular_box,
    },
    ShapeDescriptor {
        id: "sphere",
        name: "Sphere",
        tier: 1,
        build: blueprint::sphere,
    },
    ShapeDescriptor {
        id: "cylinder",
        name: "Cylinder",
        tier: 1,
        build: blueprint::cylinder,
    },
    ShapeDescriptor {
        id: "cone",
        name: "Cone",
        tier: 1,
        build: blueprint::cone,
    },
    ShapeDescriptor {
        id: "capsule",
        name: "Capsule",
        tier: 1,
        build: blueprint::capsule,
    },
    ShapeDescriptor {
        id: "torus",
        name: "Torus",
        tier: 1,
        build: blueprint::torus,
    },
    ShapeDescriptor {
        id: "wedge",
        name: "Wedge (Box Cut)",
        tier: 2,
        build: blueprint::wedge,
    },
    ShapeDescriptor {
        id: "mannequin",
        name: "Mannequin (Simple)",
        tier: 2,
        build: blueprint::mannequin,
    },
    ShapeDescriptor {
        id: "mannequin-posed",
        name: "Mannequin (Posed)",
        tier: 3,
        build: blueprint::mannequin_posed,
    },
];

/// Read-only lookup surface over a shape registry.
///
/// Registries are fixed reference tables: non-empty, with unique ids and at
/// least one shape per tier up to [`max_tier`](Self::max_tier).
#[derive(Debug, Clone, Copy)]
pub struct ShapeCatalog {
    shapes: &'static [ShapeDescriptor],
}

impl Default for ShapeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ShapeCatalog {
    /// The built-in shape library.
    #[must_use]
    pub const fn builtin() -> Self {
        Self {
            shapes: BUILTIN_SHAPES,
        }
    }

    /// A custom registry; callers must uphold the registry invariants.
    #[must_use]
    pub const fn new(shapes: &'static [ShapeDescriptor]) -> Self {
        Self { shapes }
    }

    /// Every shape, in registry order.
    #[must_use]
    pub const fn all(&self) -> &'static [ShapeDescriptor] {
        self.shapes
    }

    /// Shapes of one difficulty tier, in registry order.
    #[must_use]
    pub fn by_tier(&self, tier: u8) -> Vec<&'static ShapeDescriptor> {
        self.shapes.iter().filter(|s| s.tier == tier).collect()
    }

    /// The full registry as a selection pool.
    #[must_use]
    pub fn mixed(&self) -> Vec<&'static ShapeDescriptor> {
        self.shapes.iter().collect()
    }

    /// Find a shape by id.
    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&'static ShapeDescriptor> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Deterministic default shape, used when a replayed id is unknown.
    #[must_use]
    pub fn fallback(&self) -> &'static ShapeDescriptor {
        self.shapes.first().expect("shape registry is empty")
    }

    /// Highest tier present in the registry.
    #[must_use]
    pub fn max_tier(&self) -> u8 {
        self.shapes.iter().map(|s| s.tier).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::collections::HashSet;

    #[test]
    fn builtin_ids_are_unique() {
        let catalog = ShapeCatalog::builtin();
        let ids: HashSet<_> = catalog.all().iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), catalog.all().len());
    }

    #[test]
    fn every_tier_is_populated() {
        let catalog = ShapeCatalog::builtin();
        assert_eq!(catalog.max_tier(), 3);
        for tier in 1..=catalog.max_tier() {
            assert!(!catalog.by_tier(tier).is_empty(), "tier {tier} is empty");
        }
        assert_eq!(catalog.mixed().len(), catalog.all().len());
    }

    #[test]
    fn lookup_by_id_and_fallback() {
        let catalog = ShapeCatalog::builtin();
        assert_eq!(catalog.by_id("torus").unwrap().name, "Torus");
        assert!(catalog.by_id("dodecahedron").is_none());
        assert_eq!(catalog.fallback().id, "cube");
    }

    #[test]
    fn every_build_yields_parts() {
        let mut rng = SmallRng::seed_from_u64(11);
        for shape in ShapeCatalog::builtin().all() {
            let blueprint = (shape.build)(&mut rng);
            assert!(!blueprint.parts.is_empty(), "{} built nothing", shape.id);
        }
    }
}
