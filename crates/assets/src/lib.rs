//! Geometry cache: opaque handles to precomputed colored batches.
//!
//! Expensive procedural geometry (starfield, terrain mesh) is generated once at
//! startup and replayed by handle every frame. The renderer consumes cached
//! geometry by handle, never by regenerating it.
//!
//! # Invariants
//! - Handles are never invalidated or rebuilt during a run.
//! - Cached batches are never mutated after `build`.

use cubescape_common::ColoredBatch;
use cubescape_geometry::{
    generate_height_grid_with, generate_starfield, generate_wireframe_mesh, GeometryError,
    TerrainShape,
};
use cubescape_render::{DrawBackend, DrawStyle, RenderError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Opaque reference to cached geometry. Only the issuing cache can resolve it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryHandle(u32);

/// The kinds of geometry worth caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GeometryKind {
    Starfield,
    Terrain,
}

/// Build recipe for one cached geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GeometrySpec {
    Starfield {
        count: usize,
        radius: f32,
        /// `None` seeds from OS entropy.
        seed: Option<u64>,
    },
    Terrain {
        resolution: usize,
        extent: f32,
        shape: TerrainShape,
    },
}

impl GeometrySpec {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Starfield { .. } => GeometryKind::Starfield,
            Self::Terrain { .. } => GeometryKind::Terrain,
        }
    }

    fn generate(&self) -> Result<Vec<ColoredBatch>, GeometryError> {
        match self {
            Self::Starfield {
                count,
                radius,
                seed,
            } => Ok(vec![generate_starfield(*count, *radius, *seed)?]),
            Self::Terrain {
                resolution,
                extent,
                shape,
            } => {
                let grid = generate_height_grid_with(*resolution, *extent, shape)?;
                generate_wireframe_mesh(&grid)
            }
        }
    }
}

/// Errors from cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("unknown geometry handle: {0:?}")]
    UnknownHandle(GeometryHandle),
    #[error("geometry generation failed: {0}")]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Registry of cached geometry, indexed by handle and by kind.
#[derive(Debug, Default)]
pub struct GeometryCache {
    entries: Vec<Vec<ColoredBatch>>,
    by_kind: BTreeMap<GeometryKind, GeometryHandle>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate `spec` once and return its handle.
    ///
    /// A kind that is already cached returns the existing handle without
    /// regenerating.
    pub fn build(&mut self, spec: &GeometrySpec) -> Result<GeometryHandle, CacheError> {
        let kind = spec.kind();
        if let Some(&handle) = self.by_kind.get(&kind) {
            tracing::debug!(?kind, ?handle, "geometry already cached");
            return Ok(handle);
        }

        let _span = tracing::info_span!("geometry_build", ?kind).entered();
        let batches = spec.generate()?;
        let handle = GeometryHandle(self.entries.len() as u32);
        let vertices: usize = batches.iter().map(ColoredBatch::len).sum();
        tracing::info!(?kind, batches = batches.len(), vertices, "geometry cached");

        self.entries.push(batches);
        self.by_kind.insert(kind, handle);
        Ok(handle)
    }

    /// Cached batches behind `handle`.
    pub fn get(&self, handle: GeometryHandle) -> Option<&[ColoredBatch]> {
        self.entries.get(handle.0 as usize).map(Vec::as_slice)
    }

    /// Handle for an already built kind.
    pub fn handle_for(&self, kind: GeometryKind) -> Option<GeometryHandle> {
        self.by_kind.get(&kind).copied()
    }

    /// Re-submit cached batches to `backend` without recomputation.
    pub fn replay(
        &self,
        handle: GeometryHandle,
        backend: &mut dyn DrawBackend,
        style: DrawStyle,
    ) -> Result<(), CacheError> {
        let batches = self.get(handle).ok_or(CacheError::UnknownHandle(handle))?;
        for batch in batches {
            backend.draw(batch, style)?;
        }
        Ok(())
    }

    /// Number of cached geometries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total vertices across every cached batch.
    pub fn vertex_count(&self) -> usize {
        self.entries.iter().flatten().map(ColoredBatch::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cubescape_common::{PrimitiveKind, Rgb};
    use cubescape_render::RecordingBackend;

    fn starfield() -> GeometrySpec {
        GeometrySpec::Starfield {
            count: 300,
            radius: 60.0,
            seed: Some(7),
        }
    }

    fn terrain() -> GeometrySpec {
        GeometrySpec::Terrain {
            resolution: 16,
            extent: 40.0,
            shape: TerrainShape::default(),
        }
    }

    #[test]
    fn build_starfield() {
        let mut cache = GeometryCache::new();
        let handle = cache.build(&starfield()).unwrap();
        let batches = cache.get(handle).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].kind(), PrimitiveKind::Points);
        assert_eq!(cache.vertex_count(), 300);
    }

    #[test]
    fn build_terrain() {
        let mut cache = GeometryCache::new();
        let handle = cache.build(&terrain()).unwrap();
        assert_eq!(cache.get(handle).unwrap().len(), 34);
        assert_eq!(cache.handle_for(GeometryKind::Terrain), Some(handle));
        assert_eq!(cache.handle_for(GeometryKind::Starfield), None);
    }

    #[test]
    fn same_kind_builds_once() {
        let mut cache = GeometryCache::new();
        let a = cache.build(&starfield()).unwrap();
        let b = cache
            .build(&GeometrySpec::Starfield {
                count: 10,
                radius: 1.0,
                seed: None,
            })
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.vertex_count(), 300);
    }

    #[test]
    fn distinct_kinds_get_distinct_handles() {
        let mut cache = GeometryCache::new();
        let s = cache.build(&starfield()).unwrap();
        let t = cache.build(&terrain()).unwrap();
        assert_ne!(s, t);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn replay_submits_cached_batches_unchanged() {
        let mut cache = GeometryCache::new();
        let handle = cache.build(&terrain()).unwrap();
        let mut backend = RecordingBackend::new();

        for _ in 0..2 {
            backend.begin_frame(Rgb::BLACK).unwrap();
            cache.replay(handle, &mut backend, DrawStyle::default()).unwrap();
            backend.end_frame().unwrap();
        }

        let frame = backend.last_frame().unwrap();
        let cached = cache.get(handle).unwrap();
        assert_eq!(frame.draws.len(), cached.len());
        for (draw, batch) in frame.draws.iter().zip(cached) {
            assert_eq!(draw.vertex_count, batch.len());
            assert_eq!(draw.first_vertex, batch.vertices().first().copied());
        }
        assert_eq!(backend.total_draws(), 2 * cached.len() as u64);
    }

    #[test]
    fn unknown_handle() {
        let cache = GeometryCache::new();
        let mut backend = RecordingBackend::new();
        let err = cache
            .replay(GeometryHandle(3), &mut backend, DrawStyle::default())
            .unwrap_err();
        assert!(matches!(err, CacheError::UnknownHandle(GeometryHandle(3))));
    }

    #[test]
    fn invalid_spec_is_reported() {
        let mut cache = GeometryCache::new();
        let err = cache
            .build(&GeometrySpec::Terrain {
                resolution: 0,
                extent: 1.0,
                shape: TerrainShape::default(),
            })
            .unwrap_err();
        assert!(matches!(err, CacheError::Geometry(GeometryError::EmptyGrid)));
        assert!(cache.is_empty());
    }
}
