//! Turning a profile into a revolved mesh.

use std::sync::Arc;

use machtool_math::{Point2, Tolerance, Vec2};

use crate::mesh::{Mesh, WeldWindow};
use crate::options::MeshOptions;
use crate::profile::{Profile, ProfileElement};
use crate::sincos::SinCosCache;
use crate::{MeshError, Result};

fn unit(v: Vec2) -> Option<Vec2> {
    v.try_normalize(f64::EPSILON)
}

/// True if the line through `line_start` and `shared` is tangent to an arc
/// centered on `center` at `shared`, i.e. the line is perpendicular to the
/// arc's radius there.
pub fn is_line_tangent_to_arc(line_start: Point2, shared: Point2, center: Point2) -> bool {
    match (unit(shared - line_start), unit(shared - center)) {
        (Some(along), Some(radial)) => along.dot(&radial).abs() <= Tolerance::DEFAULT.tangent,
        _ => false,
    }
}

/// Best-effort check that two arcs meeting at `shared` are tangent there.
///
/// Two circles touch tangentially when both centers lie on one line
/// through the shared point, so the test is whether the two radii are
/// parallel. It does not check that the arcs actually continue in the same
/// direction.
pub fn is_arc_tangent_to_arc(shared: Point2, c1: Point2, c2: Point2) -> bool {
    match (unit(shared - c1), unit(shared - c2)) {
        (Some(r1), Some(r2)) => (1.0 - r1.dot(&r2).abs()).abs() <= Tolerance::DEFAULT.tangent,
        _ => false,
    }
}

/// Builds revolved meshes with a shared sin/cos ring.
///
/// ```
/// use std::sync::Arc;
/// use machtool_mesh::{MeshOptions, Profile, RevolvedMeshBuilder, SinCosCache};
///
/// let builder = RevolvedMeshBuilder::new(Arc::new(SinCosCache::new(16).unwrap()));
/// let opts = MeshOptions { resolution: 16, ..MeshOptions::default() };
/// let pin = Profile::start(0.0, 0.0).line_to(0.1, 0.0).line_to(0.1, 1.0).line_to(0.0, 1.0);
/// let mesh = builder.build(&pin, &opts).unwrap();
/// assert_eq!(mesh.patches().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct RevolvedMeshBuilder {
    ring: Arc<SinCosCache>,
}

impl RevolvedMeshBuilder {
    /// Create a builder sweeping with `ring`.
    pub fn new(ring: Arc<SinCosCache>) -> Self {
        Self { ring }
    }

    /// The ring used for every build.
    pub fn ring(&self) -> &Arc<SinCosCache> {
        &self.ring
    }

    /// Build a mesh from `profile`.
    ///
    /// The profile is validated before anything is generated. Each pair of
    /// consecutive elements becomes one patch. A patch welds with the
    /// previous one only where the two segments meet tangentially; a
    /// straight segment following another straight segment never blends.
    ///
    /// # Errors
    ///
    /// - `Profile` for structural profile problems
    /// - `ResolutionMismatch` if `options.resolution` differs from the ring
    /// - `Geom` if an arc cannot be built or the mesh has no volume
    pub fn build(&self, profile: &Profile, options: &MeshOptions) -> Result<Mesh> {
        options.validate()?;
        if options.resolution != self.ring.resolution() {
            return Err(MeshError::ResolutionMismatch {
                ring: self.ring.resolution(),
                requested: options.resolution,
            });
        }
        profile.validate()?;
        let closed;
        let profile = if options.close_ends {
            closed = profile.closed();
            &closed
        } else {
            profile
        };

        let ring = self.ring.as_ref();
        let mut mesh = Mesh::new();
        let mut line_start: Option<Point2> = None;

        for pair in profile.elements().windows(2) {
            let mut patch = mesh.begin_patch(options.color, options.shading);
            let own = patch.own_window();
            let blended = mesh
                .patches()
                .last()
                .map_or(own, |prev| WeldWindow::blended(prev.start_index(), patch.start_index()));
            let window = |tangent: bool| if tangent { blended } else { own };

            match (pair[0], pair[1]) {
                (ProfileElement::Point(p1), ProfileElement::Point(p2)) => {
                    patch.add_revolved_line(&mut mesh, ring, p1, p2, own);
                    line_start = Some(p1);
                }
                (
                    ProfileElement::Point(shared),
                    ProfileElement::ArcTo {
                        end,
                        center,
                        direction,
                    },
                ) => {
                    let tangent =
                        line_start.is_some_and(|s| is_line_tangent_to_arc(s, shared, center));
                    log::trace!("line -> arc at {shared}, tangent: {tangent}");
                    patch.add_revolved_arc(
                        &mut mesh,
                        ring,
                        shared,
                        end,
                        center,
                        direction,
                        window(tangent),
                    )?;
                }
                (ProfileElement::ArcTo { end: shared, center, .. }, ProfileElement::Point(p)) => {
                    let tangent = is_line_tangent_to_arc(p, shared, center);
                    log::trace!("arc -> line at {shared}, tangent: {tangent}");
                    patch.add_revolved_line(&mut mesh, ring, shared, p, window(tangent));
                    line_start = Some(shared);
                }
                (
                    ProfileElement::ArcTo {
                        end: shared,
                        center: c1,
                        ..
                    },
                    ProfileElement::ArcTo {
                        end,
                        center: c2,
                        direction,
                    },
                ) => {
                    let tangent = is_arc_tangent_to_arc(shared, c1, c2);
                    log::trace!("arc -> arc at {shared}, tangent: {tangent}");
                    patch.add_revolved_arc(
                        &mut mesh,
                        ring,
                        shared,
                        end,
                        c2,
                        direction,
                        window(tangent),
                    )?;
                }
            }
            mesh.push_patch(patch);
        }

        let bbox = *mesh.compute_bounding_box()?;
        log::debug!(
            "revolved {} elements into {} patches, {} vertices, {} triangles, bounds {bbox}",
            profile.len(),
            mesh.patches().len(),
            mesh.vertex_count(),
            mesh.triangle_count(),
        );
        Ok(mesh)
    }
}

/// Build a revolved mesh with a fresh ring at `options.resolution`.
pub fn build_revolved_mesh(profile: &Profile, options: &MeshOptions) -> Result<Mesh> {
    options.validate()?;
    let ring = SinCosCache::new(options.resolution)?;
    RevolvedMeshBuilder::new(Arc::new(ring)).build(profile, options)
}
