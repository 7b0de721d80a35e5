//! Tool definitions and their silhouettes.

use machtool_mesh::{build_revolved_mesh, ArcDirection, Mesh, MeshOptions, Profile};
use serde::{Deserialize, Serialize};

use crate::{Result, ToolDefError};

/// Millimeters per inch. Profiles are always produced in inches.
pub const MM_PER_INCH: f64 = 25.4;

/// Diameters closer than this are treated as equal when deciding whether a
/// tool needs a shank step.
const STEP_EPS: f64 = 1e-9;

/// Tool archetype and its dimensions.
///
/// Lengths are in the tool's units, see [`ToolDef::metric`]. Angles are
/// in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ToolKind {
    /// Twist drill. `flute_length` and the tool's `oal` are measured from
    /// the top of the point.
    Drill {
        /// Shank diameter.
        shank_dia: f64,
        /// Drill diameter.
        dia: f64,
        /// Flute length above the point.
        flute_length: f64,
        /// Included point angle.
        angle: f64,
    },
    /// Spot drill. `oal` includes the point.
    SpotDrill {
        /// Body diameter.
        dia: f64,
        /// Included point angle.
        angle: f64,
    },
    /// Flat end mill.
    EndMill {
        /// Shank diameter.
        shank_dia: f64,
        /// Cutter diameter.
        dia: f64,
        /// Flute length.
        flute_length: f64,
    },
    /// Ball end mill.
    BallMill {
        /// Shank diameter.
        shank_dia: f64,
        /// Cutter diameter.
        dia: f64,
        /// Flute length.
        flute_length: f64,
    },
    /// Bull (corner radius) end mill.
    BullMill {
        /// Shank diameter.
        shank_dia: f64,
        /// Cutter diameter.
        dia: f64,
        /// Flute length.
        flute_length: f64,
        /// Corner radius.
        radius: f64,
    },
    /// Tapered flat end mill.
    TaperEndMill {
        /// Shank diameter.
        shank_dia: f64,
        /// Tip diameter.
        dia: f64,
        /// Flute length.
        flute_length: f64,
        /// Half angle from vertical.
        angle: f64,
    },
}

impl ToolKind {
    /// Archetype name as stored in the library.
    pub fn type_name(&self) -> &'static str {
        match self {
            ToolKind::Drill { .. } => "Drill",
            ToolKind::SpotDrill { .. } => "SpotDrill",
            ToolKind::EndMill { .. } => "EndMill",
            ToolKind::BallMill { .. } => "BallMill",
            ToolKind::BullMill { .. } => "BullMill",
            ToolKind::TaperEndMill { .. } => "TaperEndMill",
        }
    }

    /// Cutting diameter.
    pub fn dia(&self) -> f64 {
        match *self {
            ToolKind::Drill { dia, .. }
            | ToolKind::SpotDrill { dia, .. }
            | ToolKind::EndMill { dia, .. }
            | ToolKind::BallMill { dia, .. }
            | ToolKind::BullMill { dia, .. }
            | ToolKind::TaperEndMill { dia, .. } => dia,
        }
    }
}

/// A named tool.
///
/// Serialized flat, with the archetype in a `"type"` field:
///
/// ```json
/// {"name": "1/2 X 1/8R BULL MILL", "metric": false, "oal": 3.0,
///  "type": "BullMill", "shankDia": 0.5, "dia": 0.5,
///  "fluteLength": 1.0, "radius": 0.125}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDef {
    /// Tool comment as used in a machine program.
    pub name: String,
    /// Dimensions are in millimeters when true, inches otherwise.
    #[serde(default)]
    pub metric: bool,
    /// Overall length.
    pub oal: f64,
    /// Archetype and dimensions.
    #[serde(flatten)]
    pub kind: ToolKind,
}

fn positive(field: &'static str, value: f64) -> Result<()> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ToolDefError::NotPositive { field, value })
    }
}

fn in_range(
    field: &'static str,
    value: f64,
    ok: bool,
    range: &'static str,
) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(ToolDefError::OutOfRange {
            field,
            value,
            range,
        })
    }
}

/// Length of a point of `included_angle` degrees on a tool of diameter `dia`.
fn tip_length(included_angle: f64, dia: f64) -> f64 {
    dia * 0.5 / (included_angle * 0.5).to_radians().tan()
}

fn differs(a: f64, b: f64) -> bool {
    (a - b).abs() > STEP_EPS
}

impl ToolDef {
    /// Create an inch tool.
    pub fn new(name: impl Into<String>, oal: f64, kind: ToolKind) -> Self {
        Self {
            name: name.into(),
            metric: false,
            oal,
            kind,
        }
    }

    /// The same tool with dimensions in millimeters.
    pub fn in_millimeters(mut self) -> Self {
        self.metric = true;
        self
    }

    /// Check that every dimension has an acceptable value on its own.
    pub fn check_specs(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ToolDefError::EmptyName);
        }
        positive("oal", self.oal)?;
        match self.kind {
            ToolKind::Drill {
                shank_dia,
                dia,
                flute_length,
                angle,
            } => {
                positive("shankDia", shank_dia)?;
                positive("dia", dia)?;
                positive("fluteLength", flute_length)?;
                in_range("angle", angle, angle > 30.0 && angle <= 180.0, "(30, 180]")?;
            }
            ToolKind::SpotDrill { dia, angle } => {
                positive("dia", dia)?;
                in_range("angle", angle, angle > 0.0 && angle <= 180.0, "(0, 180]")?;
            }
            ToolKind::EndMill {
                shank_dia,
                dia,
                flute_length,
            }
            | ToolKind::BallMill {
                shank_dia,
                dia,
                flute_length,
            } => {
                positive("shankDia", shank_dia)?;
                positive("dia", dia)?;
                positive("fluteLength", flute_length)?;
            }
            ToolKind::BullMill {
                shank_dia,
                dia,
                flute_length,
                radius,
            } => {
                positive("shankDia", shank_dia)?;
                positive("dia", dia)?;
                positive("fluteLength", flute_length)?;
                positive("radius", radius)?;
            }
            ToolKind::TaperEndMill {
                shank_dia,
                dia,
                flute_length,
                angle,
            } => {
                positive("shankDia", shank_dia)?;
                positive("dia", dia)?;
                positive("fluteLength", flute_length)?;
                in_range("angle", angle, angle >= 0.0, "[0, inf)")?;
            }
        }
        Ok(())
    }

    /// Check that the dimensions fit together into a buildable tool.
    pub fn check_geometry(&self) -> Result<()> {
        let fail = |reason| {
            Err(ToolDefError::Geometry {
                name: self.name.clone(),
                reason,
            })
        };
        match self.kind {
            ToolKind::Drill {
                flute_length,
                angle,
                ..
            } => {
                if !(30.0..=180.0).contains(&angle) {
                    return fail("point angle must be between 30 and 180 degrees");
                }
                if flute_length >= self.oal {
                    return fail("flute length must be less than overall length");
                }
            }
            ToolKind::SpotDrill { dia, angle } => {
                if !(30.0..=180.0).contains(&angle) {
                    return fail("point angle must be between 30 and 180 degrees");
                }
                if tip_length(angle, dia) >= self.oal {
                    return fail("point length must be less than overall length");
                }
            }
            ToolKind::EndMill { flute_length, .. } | ToolKind::BallMill { flute_length, .. } => {
                if flute_length >= self.oal {
                    return fail("flute length must be less than overall length");
                }
            }
            ToolKind::BullMill {
                dia,
                flute_length,
                radius,
                ..
            } => {
                if flute_length >= self.oal {
                    return fail("flute length must be less than overall length");
                }
                if radius * 2.0 >= dia {
                    return fail("corner radius must be less than half the diameter");
                }
                if radius >= flute_length {
                    return fail("corner radius must be less than flute length");
                }
            }
            ToolKind::TaperEndMill {
                flute_length,
                angle,
                ..
            } => {
                if flute_length >= self.oal {
                    return fail("flute length must be less than overall length");
                }
                if !(0.01..=60.0).contains(&angle) {
                    return fail("taper angle must be between 0.01 and 60 degrees");
                }
            }
        }
        Ok(())
    }

    /// Right half of the tool's silhouette, in inches.
    ///
    /// The profile starts at the tip on the axis and ends on the axis at
    /// the top of the shank. Extra points for a shank step are only added
    /// when the shank diameter differs from the cutter.
    pub fn profile(&self) -> Profile {
        let oal = self.oal;
        let profile = match self.kind {
            ToolKind::Drill {
                shank_dia,
                dia,
                flute_length,
                angle,
            } => {
                let (srad, frad) = (shank_dia * 0.5, dia * 0.5);
                let tip = tip_length(angle, dia);
                let mut p = Profile::start(0.0, 0.0).line_to(frad, tip);
                if differs(dia, shank_dia) {
                    p = p
                        .line_to(frad, tip + flute_length)
                        .line_to(srad, tip + flute_length);
                }
                p.line_to(srad, tip + oal).line_to(0.0, tip + oal)
            }
            ToolKind::SpotDrill { dia, angle } => {
                let r = dia * 0.5;
                Profile::start(0.0, 0.0)
                    .line_to(r, tip_length(angle, dia))
                    .line_to(r, oal)
                    .line_to(0.0, oal)
            }
            ToolKind::EndMill {
                shank_dia,
                dia,
                flute_length,
            } => {
                let (srad, frad) = (shank_dia * 0.5, dia * 0.5);
                let mut p = Profile::start(0.0, 0.0).line_to(frad, 0.0);
                if differs(dia, shank_dia) {
                    p = p.line_to(frad, flute_length).line_to(srad, flute_length);
                }
                p.line_to(srad, oal).line_to(0.0, oal)
            }
            ToolKind::BallMill {
                shank_dia,
                dia,
                flute_length,
            } => {
                let (srad, frad) = (shank_dia * 0.5, dia * 0.5);
                let mut p =
                    Profile::start(0.0, 0.0).arc_to(frad, frad, 0.0, frad, ArcDirection::Ccw);
                if differs(dia, shank_dia) {
                    p = p.line_to(frad, flute_length).line_to(srad, flute_length);
                }
                p.line_to(srad, oal).line_to(0.0, oal)
            }
            ToolKind::BullMill {
                shank_dia,
                dia,
                flute_length,
                radius,
            } => {
                let (srad, frad) = (shank_dia * 0.5, dia * 0.5);
                let mut p = Profile::start(0.0, 0.0).line_to(frad - radius, 0.0).arc_to(
                    frad,
                    radius,
                    frad - radius,
                    radius,
                    ArcDirection::Ccw,
                );
                if differs(dia, shank_dia) {
                    p = p.line_to(frad, flute_length).line_to(srad, flute_length);
                }
                p.line_to(srad, oal).line_to(0.0, oal)
            }
            ToolKind::TaperEndMill {
                shank_dia,
                dia,
                flute_length,
                angle,
            } => {
                let (srad, frad) = (shank_dia * 0.5, dia * 0.5);
                let top = frad + angle.to_radians().tan() * flute_length;
                let mut p = Profile::start(0.0, 0.0)
                    .line_to(frad, 0.0)
                    .line_to(top, flute_length);
                if differs(top, srad) {
                    p = p.line_to(srad, flute_length);
                }
                p.line_to(srad, oal).line_to(0.0, oal)
            }
        };
        if self.metric {
            profile.scaled(1.0 / MM_PER_INCH)
        } else {
            profile
        }
    }

    /// Cutting diameter in inches, used to order tools of one archetype.
    pub fn sort_key(&self) -> f64 {
        let dia = self.kind.dia();
        if self.metric {
            dia / MM_PER_INCH
        } else {
            dia
        }
    }

    /// Check the tool and revolve its profile into a mesh.
    pub fn mesh(&self, options: &MeshOptions) -> Result<Mesh> {
        self.check_specs()?;
        self.check_geometry()?;
        let mesh = build_revolved_mesh(&self.profile(), options)?;
        log::debug!(
            "meshed {} ({}): {} triangles",
            self.name,
            self.kind.type_name(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use machtool_mesh::ProfileElement;

    fn end_mill(shank_dia: f64) -> ToolDef {
        ToolDef::new(
            "1/2 END MILL",
            3.0,
            ToolKind::EndMill {
                shank_dia,
                dia: 0.5,
                flute_length: 1.0,
            },
        )
    }

    fn points(profile: &Profile) -> Vec<(f64, f64)> {
        profile
            .elements()
            .iter()
            .map(|e| {
                let p = e.end_point();
                (p.x, p.y)
            })
            .collect()
    }

    #[test]
    fn test_drill_tip_length() {
        let drill = ToolDef::new(
            "#7 DRILL",
            2.5,
            ToolKind::Drill {
                shank_dia: 0.201,
                dia: 0.201,
                flute_length: 1.5,
                angle: 90.0,
            },
        );
        let pts = points(&drill.profile());
        assert_eq!(pts.len(), 4);
        // 90 degree point: tip length is the radius
        assert_abs_diff_eq!(pts[1].1, 0.1005, epsilon = 1e-12);
        assert_abs_diff_eq!(pts[3].1, 2.5 + 0.1005, epsilon = 1e-12);
        drill.check_specs().unwrap();
        drill.check_geometry().unwrap();
    }

    #[test]
    fn test_end_mill_step() {
        assert_eq!(end_mill(0.5).profile().len(), 4);
        let stepped = end_mill(0.375).profile();
        assert_eq!(
            points(&stepped),
            vec![
                (0.0, 0.0),
                (0.25, 0.0),
                (0.25, 1.0),
                (0.1875, 1.0),
                (0.1875, 3.0),
                (0.0, 3.0)
            ]
        );
    }

    #[test]
    fn test_ball_mill_starts_with_arc() {
        let ball = ToolDef::new(
            "1/4 BALL",
            2.0,
            ToolKind::BallMill {
                shank_dia: 0.25,
                dia: 0.25,
                flute_length: 0.75,
            },
        );
        let profile = ball.profile();
        match profile.elements()[1] {
            ProfileElement::ArcTo {
                end,
                center,
                direction,
            } => {
                assert_eq!((end.x, end.y), (0.125, 0.125));
                assert_eq!((center.x, center.y), (0.0, 0.125));
                assert_eq!(direction, ArcDirection::Ccw);
            }
            other => panic!("expected arc, got {other:?}"),
        }
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_bull_mill_geometry_rules() {
        let mut bull = ToolDef::new(
            "BULL",
            3.0,
            ToolKind::BullMill {
                shank_dia: 0.5,
                dia: 0.5,
                flute_length: 1.0,
                radius: 0.25,
            },
        );
        assert!(matches!(
            bull.check_geometry(),
            Err(ToolDefError::Geometry { .. })
        ));
        bull.kind = ToolKind::BullMill {
            shank_dia: 0.5,
            dia: 0.5,
            flute_length: 1.0,
            radius: 0.125,
        };
        bull.check_geometry().unwrap();
    }

    #[test]
    fn test_taper_keeps_taper_without_step() {
        // taper reaches the shank diameter exactly at the top of the flutes
        let angle = (0.125_f64 / 1.0).atan().to_degrees();
        let taper = ToolDef::new(
            "TAPER",
            3.0,
            ToolKind::TaperEndMill {
                shank_dia: 0.5,
                dia: 0.25,
                flute_length: 1.0,
                angle,
            },
        );
        let pts = points(&taper.profile());
        assert_eq!(pts.len(), 5);
        assert_abs_diff_eq!(pts[2].0, 0.25, epsilon = 1e-9);
        assert_abs_diff_eq!(pts[2].1, 1.0);
    }

    #[test]
    fn test_spec_checks() {
        let mut tool = end_mill(0.5);
        tool.name = "  ".into();
        assert!(matches!(tool.check_specs(), Err(ToolDefError::EmptyName)));

        let drill = ToolDef::new(
            "DRILL",
            2.0,
            ToolKind::Drill {
                shank_dia: 0.25,
                dia: 0.25,
                flute_length: 1.0,
                angle: 30.0,
            },
        );
        assert!(matches!(
            drill.check_specs(),
            Err(ToolDefError::OutOfRange { field: "angle", .. })
        ));

        let bad = end_mill(-1.0);
        assert!(matches!(
            bad.check_specs(),
            Err(ToolDefError::NotPositive {
                field: "shankDia",
                ..
            })
        ));
    }

    #[test]
    fn test_flute_longer_than_tool() {
        let mut tool = end_mill(0.5);
        tool.oal = 0.5;
        assert!(tool.check_geometry().is_err());
    }

    #[test]
    fn test_metric_profile_in_inches() {
        let tool = ToolDef::new(
            "10MM END MILL",
            76.2,
            ToolKind::EndMill {
                shank_dia: 10.0,
                dia: 10.0,
                flute_length: 25.4,
            },
        )
        .in_millimeters();
        let pts = points(&tool.profile());
        assert_abs_diff_eq!(pts[1].0, 5.0 / 25.4, epsilon = 1e-12);
        assert_abs_diff_eq!(pts[2].1, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(tool.sort_key(), 10.0 / 25.4, epsilon = 1e-12);
    }

    #[test]
    fn test_json_layout() {
        let json = r#"{"name": "1/2 X 1/8R BULL MILL", "metric": false, "oal": 3.0,
            "type": "BullMill", "shankDia": 0.5, "dia": 0.5,
            "fluteLength": 1.0, "radius": 0.125}"#;
        let tool: ToolDef = serde_json::from_str(json).unwrap();
        assert_eq!(tool.kind.type_name(), "BullMill");
        assert_abs_diff_eq!(tool.kind.dia(), 0.5);
        let back = serde_json::to_string(&tool).unwrap();
        assert!(back.contains("\"fluteLength\":1.0"));
        assert!(back.contains("\"type\":\"BullMill\""));
    }

    #[test]
    fn test_every_kind_meshes() {
        let tools = [
            ToolDef::new(
                "DRILL",
                2.0,
                ToolKind::Drill {
                    shank_dia: 0.25,
                    dia: 0.3,
                    flute_length: 1.0,
                    angle: 118.0,
                },
            ),
            ToolDef::new("SPOT", 2.0, ToolKind::SpotDrill { dia: 0.5, angle: 90.0 }),
            end_mill(0.375),
            ToolDef::new(
                "BALL",
                2.0,
                ToolKind::BallMill {
                    shank_dia: 0.25,
                    dia: 0.25,
                    flute_length: 0.75,
                },
            ),
            ToolDef::new(
                "BULL",
                3.0,
                ToolKind::BullMill {
                    shank_dia: 0.5,
                    dia: 0.5,
                    flute_length: 1.0,
                    radius: 0.125,
                },
            ),
            ToolDef::new(
                "TAPER",
                3.0,
                ToolKind::TaperEndMill {
                    shank_dia: 0.5,
                    dia: 0.125,
                    flute_length: 1.0,
                    angle: 5.0,
                },
            ),
        ];
        for tool in &tools {
            let mesh = tool.mesh(&MeshOptions::default()).unwrap();
            assert!(mesh.volume() > 0.0, "{} has no volume", tool.name);
            let (_, top) = tool.profile().end_points().unwrap();
            let bbox = mesh.bounding_box().unwrap();
            assert_abs_diff_eq!(bbox.min().y, 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(bbox.max().y, top.y, epsilon = 1e-12);
        }
    }
}
