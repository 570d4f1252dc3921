//! Terrain height seam
//!
//! Height data is owned by the host. Queries must be pure and cheap; when no
//! data is loaded yet the source answers [`HEIGHT_UNAVAILABLE`] and agents sit
//! at that height until real data arrives.

/// Sentinel height returned while terrain data is not loaded
pub const HEIGHT_UNAVAILABLE: f32 = 0.0;

/// Read-only elevation query `(x, z) -> y`
pub trait TerrainHeight {
    fn height_at(&self, x: f32, z: f32) -> f32;
}

/// Constant-height ground
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatTerrain(pub f32);

impl TerrainHeight for FlatTerrain {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        self.0
    }
}

/// Terrain that has not been loaded
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTerrain;

impl TerrainHeight for NoTerrain {
    fn height_at(&self, _x: f32, _z: f32) -> f32 {
        HEIGHT_UNAVAILABLE
    }
}

impl<F> TerrainHeight for F
where
    F: Fn(f32, f32) -> f32,
{
    fn height_at(&self, x: f32, z: f32) -> f32 {
        self(x, z)
    }
}
