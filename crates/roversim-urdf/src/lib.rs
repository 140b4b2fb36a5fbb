#![warn(missing_docs)]

//! Minimal URDF robot description reader.
//!
//! Reads the subset of URDF a locomotion driver needs: the robot name,
//! links with their inertial mass and collision geometry, and the joint
//! graph (used only to find the base link). Transmission, sensor, and
//! visual-material elements are ignored.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while reading a robot description.
#[derive(Error, Debug)]
pub enum UrdfError {
    /// I/O error reading a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The XML did not deserialize as a URDF robot element.
    #[error("URDF error: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// A numeric attribute did not parse.
    #[error("URDF error in `{element}`: {message}")]
    Malformed {
        /// Element the bad attribute belongs to.
        element: String,
        /// Error message.
        message: String,
    },

    /// The description contained no links.
    #[error("robot description has no links")]
    NoLinks,
}

/// A collision geometry primitive or mesh reference.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Axis-aligned box with full extents in meters.
    Box {
        /// Full extents `[x, y, z]`.
        size: [f32; 3],
    },
    /// Cylinder along the local Z axis.
    Cylinder {
        /// Radius in meters.
        radius: f32,
        /// Length in meters.
        length: f32,
    },
    /// Sphere.
    Sphere {
        /// Radius in meters.
        radius: f32,
    },
    /// External mesh file reference.
    Mesh {
        /// Mesh file name as written in the description.
        filename: String,
        /// Per-axis scale factors.
        scale: [f32; 3],
    },
}

/// A link's collision shape with its local offset.
#[derive(Debug, Clone)]
pub struct Collision {
    /// Offset of the shape from the link frame, meters.
    pub origin: [f32; 3],
    /// The collision shape.
    pub geometry: Geometry,
}

/// One rigid link of the robot.
#[derive(Debug, Clone)]
pub struct Link {
    /// Link name.
    pub name: String,
    /// Inertial mass in kilograms (0 when the link has no inertial element).
    pub mass: f32,
    /// Collision shape, if the link declares one.
    pub collision: Option<Collision>,
}

/// A joint connecting two links. Only the graph structure is retained.
#[derive(Debug, Clone)]
pub struct Joint {
    /// Joint name.
    pub name: String,
    /// Joint type as written (`fixed`, `continuous`, `revolute`, ...).
    pub kind: String,
    /// Parent link name.
    pub parent: String,
    /// Child link name.
    pub child: String,
}

/// A parsed robot description.
#[derive(Debug, Clone)]
pub struct RobotModel {
    /// Robot name.
    pub name: String,
    /// Links in file order.
    pub links: Vec<Link>,
    /// Joints in file order.
    pub joints: Vec<Joint>,
}

impl RobotModel {
    /// The base link: the first link that is not the child of any joint.
    pub fn base_link(&self) -> &Link {
        self.links
            .iter()
            .find(|link| !self.joints.iter().any(|j| j.child == link.name))
            .unwrap_or(&self.links[0])
    }

    /// Total mass over all links, kilograms.
    pub fn total_mass(&self) -> f32 {
        self.links.iter().map(|l| l.mass).sum()
    }

    /// Apply a uniform scale factor to all collision geometry and offsets.
    ///
    /// Masses are left unchanged, matching how physics backends treat a
    /// load-time global scaling factor.
    pub fn apply_scale(&mut self, factor: f32) {
        for link in &mut self.links {
            if let Some(collision) = &mut link.collision {
                for c in &mut collision.origin {
                    *c *= factor;
                }
                match &mut collision.geometry {
                    Geometry::Box { size } => {
                        for s in size.iter_mut() {
                            *s *= factor;
                        }
                    }
                    Geometry::Cylinder { radius, length } => {
                        *radius *= factor;
                        *length *= factor;
                    }
                    Geometry::Sphere { radius } => *radius *= factor,
                    Geometry::Mesh { scale, .. } => {
                        for s in scale.iter_mut() {
                            *s *= factor;
                        }
                    }
                }
            }
        }
    }
}

/// Load a URDF file from disk.
pub fn load_urdf(path: impl AsRef<Path>) -> Result<RobotModel, UrdfError> {
    let text = fs::read_to_string(path)?;
    parse_urdf(&text)
}

/// Parse URDF text into a [`RobotModel`].
pub fn parse_urdf(text: &str) -> Result<RobotModel, UrdfError> {
    let robot: RobotXml = quick_xml::de::from_str(text)?;
    if robot.links.is_empty() {
        return Err(UrdfError::NoLinks);
    }

    let links = robot
        .links
        .into_iter()
        .map(|link| {
            let collision = link
                .collision
                .into_iter()
                .next()
                .map(|c| convert_collision(&link.name, c))
                .transpose()?;
            Ok(Link {
                mass: link.inertial.map(|i| i.mass.value).unwrap_or(0.0),
                collision,
                name: link.name,
            })
        })
        .collect::<Result<Vec<_>, UrdfError>>()?;

    let joints = robot
        .joints
        .into_iter()
        .map(|j| Joint {
            name: j.name,
            kind: j.kind,
            parent: j.parent.link,
            child: j.child.link,
        })
        .collect();

    Ok(RobotModel {
        name: robot.name,
        links,
        joints,
    })
}

fn convert_collision(link: &str, xml: CollisionXml) -> Result<Collision, UrdfError> {
    let origin = match xml.origin.and_then(|o| o.xyz) {
        Some(xyz) => parse_triple(&xyz, link)?,
        None => [0.0; 3],
    };

    let g = xml.geometry;
    let geometry = if let Some(b) = g.box_ {
        Geometry::Box {
            size: parse_triple(&b.size, link)?,
        }
    } else if let Some(c) = g.cylinder {
        Geometry::Cylinder {
            radius: c.radius,
            length: c.length,
        }
    } else if let Some(s) = g.sphere {
        Geometry::Sphere { radius: s.radius }
    } else if let Some(m) = g.mesh {
        let scale = match m.scale {
            Some(s) => parse_triple(&s, link)?,
            None => [1.0; 3],
        };
        Geometry::Mesh {
            filename: m.filename,
            scale,
        }
    } else {
        return Err(UrdfError::Malformed {
            element: link.to_string(),
            message: "geometry element has no recognized shape".to_string(),
        });
    };

    Ok(Collision { origin, geometry })
}

/// Parse a space-separated `"x y z"` attribute.
fn parse_triple(text: &str, element: &str) -> Result<[f32; 3], UrdfError> {
    let mut out = [0.0f32; 3];
    let mut fields = text.split_whitespace();
    for value in &mut out {
        let field = fields.next().ok_or_else(|| UrdfError::Malformed {
            element: element.to_string(),
            message: format!("expected 3 values in `{}`", text),
        })?;
        *value = field.parse().map_err(|_| UrdfError::Malformed {
            element: element.to_string(),
            message: format!("bad number `{}`", field),
        })?;
    }
    Ok(out)
}

// Raw XML shapes. Attribute fields use quick-xml's `@` naming.

#[derive(Debug, Deserialize)]
struct RobotXml {
    #[serde(rename = "@name")]
    name: String,
    #[serde(default, rename = "link")]
    links: Vec<LinkXml>,
    #[serde(default, rename = "joint")]
    joints: Vec<JointXml>,
}

#[derive(Debug, Deserialize)]
struct LinkXml {
    #[serde(rename = "@name")]
    name: String,
    inertial: Option<InertialXml>,
    #[serde(default)]
    collision: Vec<CollisionXml>,
}

#[derive(Debug, Deserialize)]
struct InertialXml {
    mass: MassXml,
}

#[derive(Debug, Deserialize)]
struct MassXml {
    #[serde(rename = "@value")]
    value: f32,
}

#[derive(Debug, Deserialize)]
struct CollisionXml {
    origin: Option<OriginXml>,
    geometry: GeometryXml,
}

#[derive(Debug, Deserialize)]
struct OriginXml {
    #[serde(rename = "@xyz")]
    xyz: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeometryXml {
    #[serde(rename = "box")]
    box_: Option<BoxXml>,
    cylinder: Option<CylinderXml>,
    sphere: Option<SphereXml>,
    mesh: Option<MeshXml>,
}

#[derive(Debug, Deserialize)]
struct BoxXml {
    #[serde(rename = "@size")]
    size: String,
}

#[derive(Debug, Deserialize)]
struct CylinderXml {
    #[serde(rename = "@radius")]
    radius: f32,
    #[serde(rename = "@length")]
    length: f32,
}

#[derive(Debug, Deserialize)]
struct SphereXml {
    #[serde(rename = "@radius")]
    radius: f32,
}

#[derive(Debug, Deserialize)]
struct MeshXml {
    #[serde(rename = "@filename")]
    filename: String,
    #[serde(rename = "@scale")]
    scale: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JointXml {
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@type")]
    kind: String,
    parent: JointLinkRefXml,
    child: JointLinkRefXml,
}

#[derive(Debug, Deserialize)]
struct JointLinkRefXml {
    #[serde(rename = "@link")]
    link: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROVER: &str = r#"
<robot name="husky">
  <link name="base_link">
    <inertial>
      <origin xyz="0 0 0"/>
      <mass value="33.455"/>
    </inertial>
    <collision>
      <origin xyz="0 0 0.061875"/>
      <geometry>
        <box size="0.9874 0.5709 0.05"/>
      </geometry>
    </collision>
  </link>
  <link name="front_left_wheel">
    <inertial>
      <mass value="2.637"/>
    </inertial>
    <collision>
      <geometry>
        <cylinder radius="0.165" length="0.125"/>
      </geometry>
    </collision>
  </link>
  <joint name="front_left_wheel_joint" type="continuous">
    <parent link="base_link"/>
    <child link="front_left_wheel"/>
  </joint>
</robot>
"#;

    #[test]
    fn test_parse_rover() {
        let model = parse_urdf(ROVER).unwrap();
        assert_eq!(model.name, "husky");
        assert_eq!(model.links.len(), 2);
        assert_eq!(model.joints.len(), 1);
        assert_eq!(model.joints[0].kind, "continuous");
    }

    #[test]
    fn test_base_link_and_mass() {
        let model = parse_urdf(ROVER).unwrap();
        assert_eq!(model.base_link().name, "base_link");
        assert!((model.total_mass() - 36.092).abs() < 1e-4);

        let base = model.base_link();
        let collision = base.collision.as_ref().unwrap();
        assert_eq!(
            collision.geometry,
            Geometry::Box {
                size: [0.9874, 0.5709, 0.05]
            }
        );
        assert!((collision.origin[2] - 0.061875).abs() < 1e-6);
    }

    #[test]
    fn test_apply_scale() {
        let mut model = parse_urdf(ROVER).unwrap();
        let mass_before = model.total_mass();
        model.apply_scale(0.8);
        assert_eq!(model.total_mass(), mass_before);

        match &model.base_link().collision.as_ref().unwrap().geometry {
            Geometry::Box { size } => assert!((size[0] - 0.9874 * 0.8).abs() < 1e-5),
            other => panic!("expected box, got {:?}", other),
        }
        match &model.links[1].collision.as_ref().unwrap().geometry {
            Geometry::Cylinder { radius, length } => {
                assert!((radius - 0.165 * 0.8).abs() < 1e-6);
                assert!((length - 0.125 * 0.8).abs() < 1e-6);
            }
            other => panic!("expected cylinder, got {:?}", other),
        }
    }

    #[test]
    fn test_mesh_geometry() {
        let urdf = r#"
<robot name="probe">
  <link name="body">
    <collision>
      <geometry>
        <mesh filename="body.obj" scale="0.5 0.5 0.5"/>
      </geometry>
    </collision>
  </link>
</robot>
"#;
        let model = parse_urdf(urdf).unwrap();
        match &model.links[0].collision.as_ref().unwrap().geometry {
            Geometry::Mesh { filename, scale } => {
                assert_eq!(filename, "body.obj");
                assert_eq!(*scale, [0.5, 0.5, 0.5]);
            }
            other => panic!("expected mesh, got {:?}", other),
        }
    }

    #[test]
    fn test_no_links() {
        assert!(matches!(
            parse_urdf(r#"<robot name="empty"></robot>"#),
            Err(UrdfError::NoLinks)
        ));
    }

    #[test]
    fn test_bad_triple() {
        let urdf = r#"
<robot name="bad">
  <link name="body">
    <collision>
      <geometry>
        <box size="1 2"/>
      </geometry>
    </collision>
  </link>
</robot>
"#;
        assert!(matches!(
            parse_urdf(urdf),
            Err(UrdfError::Malformed { .. })
        ));
    }
}
