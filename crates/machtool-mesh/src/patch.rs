//! Patches: the triangles generated for one profile segment.

use machtool_geom::Arc as CircularArc;
use machtool_math::{Point2, Point3, Tolerance};
use serde::{Deserialize, Serialize};

use crate::mesh::{Mesh, VertexIndex, VertexKind, WeldWindow};
use crate::options::Rgba;
use crate::profile::ArcDirection;
use crate::sincos::{RingSample, SinCosCache};
use crate::Result;

/// Fewest straight sub-segments used to approximate an arc.
pub const MIN_ARC_SEGMENTS: usize = 3;

/// How a patch is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingMode {
    /// Edges only.
    Wire,
    /// One normal per face.
    Flat,
    /// Interpolated vertex normals.
    #[default]
    Smooth,
}

/// A group of triangles from one profile segment.
///
/// A patch records the vertex count at the moment it was started; every
/// vertex it creates has an index at or above that start.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    start_index: VertexIndex,
    indices: Vec<VertexIndex>,
    color: Rgba,
    shading: ShadingMode,
}

fn swept(x: f64, y: f64, s: RingSample) -> Point3 {
    Point3::new(x * s.sin, y, x * s.cos)
}

impl Patch {
    /// Create an empty patch whose vertices start at `start_index`.
    pub fn new(start_index: VertexIndex, color: Rgba, shading: ShadingMode) -> Self {
        Self {
            start_index,
            indices: Vec::new(),
            color,
            shading,
        }
    }

    /// First vertex index owned by this patch.
    pub fn start_index(&self) -> VertexIndex {
        self.start_index
    }

    /// Weld window covering only this patch.
    pub fn own_window(&self) -> WeldWindow {
        WeldWindow::patch(self.start_index)
    }

    /// Triangle indices, three per triangle.
    pub fn indices(&self) -> &[VertexIndex] {
        &self.indices
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Fill color.
    pub fn color(&self) -> Rgba {
        self.color
    }

    /// Set the fill color.
    pub fn set_color(&mut self, color: Rgba) {
        self.color = color;
    }

    /// Shading mode.
    pub fn shading(&self) -> ShadingMode {
        self.shading
    }

    /// Set the shading mode.
    pub fn set_shading(&mut self, shading: ShadingMode) {
        self.shading = shading;
    }

    /// Add triangle `a, b, c` with its face normal on every corner.
    ///
    /// Degenerate triangles have no normal and are dropped.
    pub fn add_triangle(
        &mut self,
        mesh: &mut Mesh,
        corners: [Point3; 3],
        kinds: [VertexKind; 3],
        window: WeldWindow,
    ) -> bool {
        let [a, b, c] = corners;
        let Some(normal) = (b - a).cross(&(c - a)).try_normalize(0.0) else {
            log::trace!("skipping degenerate triangle {a} {b} {c}");
            return false;
        };
        for (corner, kind) in corners.into_iter().zip(kinds) {
            let index = mesh.add_vertex(corner, normal, kind, window);
            self.indices.push(index);
        }
        true
    }

    /// Add quad `a, b, c, d` as triangles `(a, b, c)` and `(d, a, c)`.
    pub fn add_quad(&mut self, mesh: &mut Mesh, corners: [Point3; 4], window: WeldWindow) {
        let [a, b, c, d] = corners;
        let ring = [VertexKind::Ring; 3];
        self.add_triangle(mesh, [a, b, c], ring, window);
        self.add_triangle(mesh, [d, a, c], ring, window);
    }

    /// Sweep the segment `p1 -> p2` a full turn around the Y axis.
    ///
    /// An end on the axis produces a triangle fan. The fan's center is a
    /// cone tip (an unwelded apex) unless both ends have the same height,
    /// in which case the patch is a flat disk and the center welds. A
    /// segment lying entirely on the axis sweeps no area.
    pub fn add_revolved_line(
        &mut self,
        mesh: &mut Mesh,
        ring: &SinCosCache,
        p1: Point2,
        p2: Point2,
        window: WeldWindow,
    ) {
        let tol = Tolerance::DEFAULT;
        let (x1, y1, x2, y2) = (p1.x, p1.y, p2.x, p2.y);
        let first_on_axis = tol.is_on_axis(x1);
        let second_on_axis = tol.is_on_axis(x2);
        if first_on_axis && second_on_axis {
            log::debug!("segment {p1} -> {p2} lies on the axis, nothing to sweep");
            return;
        }

        let apex_kind = if tol.heights_equal(y1, y2) {
            VertexKind::Ring
        } else {
            VertexKind::Apex
        };
        let fan_kinds = [apex_kind, VertexKind::Ring, VertexKind::Ring];

        for (s1, s2) in ring.pairs() {
            if first_on_axis {
                let a = Point3::new(0.0, y1, 0.0);
                let b = swept(x2, y2, s2);
                let c = swept(x2, y2, s1);
                self.add_triangle(mesh, [a, b, c], fan_kinds, window);
            } else if second_on_axis {
                let a = Point3::new(0.0, y2, 0.0);
                let b = swept(x1, y1, s1);
                let c = swept(x1, y1, s2);
                self.add_triangle(mesh, [a, b, c], fan_kinds, window);
            } else {
                let a = swept(x1, y1, s1);
                let b = swept(x1, y1, s2);
                let c = swept(x2, y2, s2);
                let d = swept(x2, y2, s1);
                self.add_quad(mesh, [a, b, c, d], window);
            }
        }
    }

    /// Sweep the arc from `start` to `end` around `center` a full turn.
    ///
    /// The arc radius is the distance from `center` to `start`. The arc is
    /// cut into one sub-segment per ring step (at least
    /// [`MIN_ARC_SEGMENTS`]) and each sub-segment is swept as a line. Only
    /// the first sub-segment uses `window`; the rest weld inside this patch.
    #[allow(clippy::too_many_arguments)]
    pub fn add_revolved_arc(
        &mut self,
        mesh: &mut Mesh,
        ring: &SinCosCache,
        start: Point2,
        end: Point2,
        center: Point2,
        direction: ArcDirection,
        window: WeldWindow,
    ) -> Result<()> {
        let tol = Tolerance::DEFAULT;
        let radius = (start - center).norm();
        let arc =
            CircularArc::from_vectors(start - center, end - center, radius, direction.is_ccw())?
                .with_center(center);

        let steps = (arc.span().abs() / ring.angle_step()).round() as usize;
        let segments = steps.max(MIN_ARC_SEGMENTS);

        let on_circle = arc.end_point();
        let last = if tol.points2_equal(&on_circle, &end) {
            end
        } else {
            log::warn!("arc end {end} is off its circle around {center}, using {on_circle}");
            on_circle
        };

        let points: Vec<Point2> = (0..=segments)
            .map(|i| match i {
                0 => start,
                i if i == segments => last,
                i => arc.point_at_angle(arc.angle_at(i as f64 / segments as f64)),
            })
            .collect();
        log::trace!(
            "arc {start} -> {end}: span {:.3} deg in {segments} segments",
            arc.span()
        );

        for (i, pair) in points.windows(2).enumerate() {
            let w = if i == 0 { window } else { self.own_window() };
            self.add_revolved_line(mesh, ring, pair[0], pair[1], w);
        }
        Ok(())
    }
}
