//! Indexed triangle mesh with windowed vertex welding.

use std::ops::Range;

use machtool_geom::BoundingBox;
use machtool_math::{Point3, Tolerance, Vec3};

use crate::options::Rgba;
use crate::patch::{Patch, ShadingMode};

/// Index into a mesh's vertex buffer.
pub type VertexIndex = u32;

/// How a submitted vertex takes part in welding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexKind {
    /// Ordinary vertex, welded to a matching vertex inside the window.
    Ring,
    /// Tip of a cone. Never welded, so each fan triangle keeps its own
    /// normal at the point.
    ///
    /// An apex carries its triangle's face normal, not the cone axis.
    Apex,
}

/// The range of existing vertices a new vertex may weld with.
///
/// The window runs from `floor` to the current end of the vertex buffer.
/// A patch's own window starts at the patch's first vertex; a blended
/// window also reaches back into the previous patch, which is how
/// tangent segments end up sharing boundary vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeldWindow {
    floor: VertexIndex,
}

impl WeldWindow {
    /// Weld only within the patch starting at `start`.
    pub fn patch(start: VertexIndex) -> Self {
        Self { floor: start }
    }

    /// Weld within the current patch and the one before it.
    pub fn blended(previous_start: VertexIndex, start: VertexIndex) -> Self {
        Self {
            floor: previous_start.min(start),
        }
    }

    /// Lowest index the window reaches.
    pub fn floor(&self) -> VertexIndex {
        self.floor
    }

    /// The window as an index range, given the current vertex count.
    pub fn range(&self, vertex_count: VertexIndex) -> Range<VertexIndex> {
        self.floor.min(vertex_count)..vertex_count
    }
}

/// Flat render buffers, `[x0, y0, z0, x1, ...]` in f32.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderBuffers {
    /// Vertex positions.
    pub vertices: Vec<f32>,
    /// Vertex normals, same length as `vertices`.
    pub normals: Vec<f32>,
    /// Triangle indices.
    pub indices: Vec<u32>,
}

/// Triangle mesh made of patches.
///
/// Vertices and normals live in parallel buffers shared by all patches;
/// each patch owns the triangle indices of one profile segment. A second,
/// globally deduplicated vertex list feeds the bounding box.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    vertices: Vec<Point3>,
    normals: Vec<Vec3>,
    shared_vertices: Vec<Point3>,
    patches: Vec<Patch>,
    bounding_box: Option<BoundingBox>,
}

impl Mesh {
    /// Create an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex, welding it if possible, and return its index.
    ///
    /// Ring vertices are compared against the window newest first. On a
    /// match the stored normal becomes the normalized sum of both normals
    /// and the existing index is returned. Apex vertices always append.
    /// Either way the position is recorded in the deduplicated list used
    /// for the bounding box.
    pub fn add_vertex(
        &mut self,
        position: Point3,
        normal: Vec3,
        kind: VertexKind,
        window: WeldWindow,
    ) -> VertexIndex {
        let tol = Tolerance::DEFAULT;
        if !self
            .shared_vertices
            .iter()
            .rev()
            .any(|v| tol.points_equal(v, &position))
        {
            self.shared_vertices.push(position);
        }

        if kind == VertexKind::Ring {
            let range = window.range(self.vertex_count());
            for index in range.rev() {
                let i = index as usize;
                if tol.points_equal(&self.vertices[i], &position) {
                    let stored = self.normals[i];
                    self.normals[i] = (stored + normal)
                        .try_normalize(f64::EPSILON)
                        .unwrap_or(stored);
                    return index;
                }
            }
        }

        self.vertices.push(position);
        self.normals.push(normal);
        self.vertex_count() - 1
    }

    /// Number of vertices in the render buffer.
    pub fn vertex_count(&self) -> VertexIndex {
        self.vertices.len() as VertexIndex
    }

    /// Number of triangles over all patches.
    pub fn triangle_count(&self) -> usize {
        self.patches.iter().map(Patch::triangle_count).sum()
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    /// Vertex normals, parallel to [`Mesh::vertices`].
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Positions deduplicated across all patches.
    pub fn shared_vertices(&self) -> &[Point3] {
        &self.shared_vertices
    }

    /// Patches in build order.
    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    /// Start an empty patch at the current end of the vertex buffer.
    pub fn begin_patch(&self, color: Rgba, shading: ShadingMode) -> Patch {
        Patch::new(self.vertex_count(), color, shading)
    }

    /// Append a finished patch.
    pub fn push_patch(&mut self, patch: Patch) {
        self.patches.push(patch);
    }

    /// Bounding box of the deduplicated vertices, once computed.
    pub fn bounding_box(&self) -> Option<&BoundingBox> {
        self.bounding_box.as_ref()
    }

    /// Compute and store the bounding box of the deduplicated vertices.
    pub fn compute_bounding_box(&mut self) -> machtool_geom::Result<&BoundingBox> {
        let bbox = BoundingBox::from_vertices(&self.shared_vertices)?;
        Ok(self.bounding_box.insert(bbox))
    }

    /// Set the color of every patch.
    pub fn set_color(&mut self, color: Rgba) {
        for patch in &mut self.patches {
            patch.set_color(color);
        }
    }

    /// Set the shading mode of every patch.
    pub fn set_shading(&mut self, shading: ShadingMode) {
        for patch in &mut self.patches {
            patch.set_shading(shading);
        }
    }

    /// All triangle indices, patch by patch.
    pub fn indices(&self) -> Vec<VertexIndex> {
        self.patches
            .iter()
            .flat_map(|p| p.indices().iter().copied())
            .collect()
    }

    /// Iterate over triangles as corner positions.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        self.patches.iter().flat_map(move |p| {
            p.indices().chunks_exact(3).map(move |t| {
                [
                    self.vertices[t[0] as usize],
                    self.vertices[t[1] as usize],
                    self.vertices[t[2] as usize],
                ]
            })
        })
    }

    /// Signed volume enclosed by the mesh. Positive when normals face outward.
    pub fn volume(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| a.coords.dot(&b.coords.cross(&c.coords)))
            .sum::<f64>()
            / 6.0
    }

    /// Total triangle area.
    pub fn surface_area(&self) -> f64 {
        self.triangles()
            .map(|[a, b, c]| (b - a).cross(&(c - a)).norm() * 0.5)
            .sum()
    }

    /// Flatten into f32 buffers for rendering.
    pub fn render_buffers(&self) -> RenderBuffers {
        let flatten = |v: &Vec3| [v.x as f32, v.y as f32, v.z as f32];
        RenderBuffers {
            vertices: self.vertices.iter().flat_map(|p| flatten(&p.coords)).collect(),
            normals: self.normals.iter().flat_map(flatten).collect(),
            indices: self.indices(),
        }
    }
}
