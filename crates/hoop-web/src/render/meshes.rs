//! Procedural proxy geometry drawn in place of the validated GLB models.

use glam::Vec3;
use hoop_core::MeshKind;
use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Clone, Debug, Default)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u16>,
}

impl MeshData {
    fn push(&mut self, position: Vec3, normal: Vec3) -> u16 {
        self.vertices.push(Vertex {
            position: position.to_array(),
            normal: normal.normalize_or_zero().to_array(),
        });
        (self.vertices.len() - 1) as u16
    }

    /// Append `other`, offsetting its indices.
    fn append(&mut self, other: MeshData, offset: Vec3) {
        let base = self.vertices.len() as u16;
        self.vertices.extend(other.vertices.into_iter().map(|mut v| {
            v.position = (Vec3::from_array(v.position) + offset).to_array();
            v
        }));
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// UV sphere of the given radius.
pub fn sphere(radius: f32, rings: u16, segments: u16) -> MeshData {
    let mut m = MeshData::default();
    for r in 0..=rings {
        let theta = PI * r as f32 / rings as f32;
        for s in 0..=segments {
            let phi = TAU * s as f32 / segments as f32;
            let n = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
            m.push(n * radius, n);
        }
    }
    let stride = segments + 1;
    for r in 0..rings {
        for s in 0..segments {
            let a = r * stride + s;
            let b = a + stride;
            m.indices.extend_from_slice(&[a, a + 1, b, b, a + 1, b + 1]);
        }
    }
    m
}

/// Torus lying in the XZ plane.
pub fn torus(major: f32, minor: f32, rings: u16, sides: u16) -> MeshData {
    let mut m = MeshData::default();
    for r in 0..=rings {
        let u = TAU * r as f32 / rings as f32;
        let center = Vec3::new(u.cos(), 0.0, u.sin()) * major;
        for s in 0..=sides {
            let v = TAU * s as f32 / sides as f32;
            let n = Vec3::new(u.cos() * v.cos(), v.sin(), u.sin() * v.cos());
            m.push(center + n * minor, n);
        }
    }
    let stride = sides + 1;
    for r in 0..rings {
        for s in 0..sides {
            let a = r * stride + s;
            let b = a + stride;
            m.indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }
    m
}

/// Axis-aligned box centred on the origin, flat-shaded.
pub fn cuboid(half: Vec3) -> MeshData {
    let mut m = MeshData::default();
    let faces = [
        (Vec3::X, Vec3::Y),
        (Vec3::NEG_X, Vec3::Y),
        (Vec3::Y, Vec3::Z),
        (Vec3::NEG_Y, Vec3::Z),
        (Vec3::Z, Vec3::Y),
        (Vec3::NEG_Z, Vec3::Y),
    ];
    for (n, up) in faces {
        // side x up = n keeps every face counter-clockwise from outside
        let side = up.cross(n);
        let c = n * half;
        let u = up * half;
        let s = side * half;
        let a = m.push(c - s - u, n);
        let b = m.push(c + s - u, n);
        let d = m.push(c + s + u, n);
        let e = m.push(c - s + u, n);
        m.indices.extend_from_slice(&[a, b, d, a, d, e]);
    }
    m
}

/// Unit square in the XZ plane facing +Y.
pub fn plane() -> MeshData {
    let mut m = MeshData::default();
    for (x, z) in [(-0.5, -0.5), (0.5, -0.5), (0.5, 0.5), (-0.5, 0.5)] {
        m.push(Vec3::new(x, 0.0, z), Vec3::Y);
    }
    m.indices.extend_from_slice(&[0, 2, 1, 0, 3, 2]);
    m
}

/// Rim, backboard and pole of a street hoop.
fn hoop() -> MeshData {
    let mut m = torus(0.45, 0.04, 32, 8);
    m.append(cuboid(Vec3::new(0.9, 0.6, 0.04)), Vec3::new(0.0, 0.45, -0.55));
    m.append(cuboid(Vec3::new(0.06, 1.6, 0.06)), Vec3::new(0.0, -0.8, -0.75));
    m
}

/// Court floor with stands on both sides and a ring of lamps above.
fn arena() -> MeshData {
    let mut m = cuboid(Vec3::new(6.0, 0.1, 3.5));
    for side in [-1.0f32, 1.0] {
        m.append(cuboid(Vec3::new(6.0, 0.8, 0.6)), Vec3::new(0.0, 0.7, side * 4.2));
    }
    for i in 0..8 {
        let a = TAU * i as f32 / 8.0;
        m.append(sphere(0.25, 6, 8), Vec3::new(a.cos() * 5.0, 3.0, a.sin() * 3.0));
    }
    m
}

pub fn for_kind(kind: MeshKind) -> MeshData {
    match kind {
        MeshKind::Ball => sphere(0.5, 24, 32),
        MeshKind::Hoop => hoop(),
        MeshKind::Arena => arena(),
        MeshKind::Floor => plane(),
        MeshKind::Particle => sphere(1.0, 4, 6),
    }
}
