//! Mesh data: triangle geometry ready for projection and picking

use engine_core::systems::Ray;
use glam::Vec3;

/// Vertex data for rendering. A zero normal means "not supplied".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub normal: Vec3,
}

impl Vertex {
    pub fn new(position: Vec3, normal: Vec3) -> Self {
        Self { position, normal }
    }
}

/// Bounding sphere in mesh space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub center: Vec3,
    pub radius: f32,
}

impl Bounds {
    /// Distance along `ray` to the sphere, or None if the ray misses it.
    /// A ray starting inside returns zero.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        if a <= f32::EPSILON {
            return None;
        }
        let b = oc.dot(ray.direction);
        let c = oc.length_squared() - self.radius * self.radius;
        if c <= 0.0 {
            return Some(0.0);
        }
        let disc = b * b - a * c;
        if disc < 0.0 || b > 0.0 {
            return None;
        }
        Some((-b - disc.sqrt()) / a)
    }
}

/// Mesh data - raw triangle geometry
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    bounds: Option<Bounds>,
}

impl MeshData {
    pub fn new(name: &str, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        let mut mesh = Self {
            name: name.to_string(),
            vertices,
            indices,
            bounds: None,
        };
        mesh.indices.truncate(mesh.indices.len() / 3 * 3);
        mesh.ensure_normals();
        mesh.bounds = Some(mesh.compute_bounds());
        mesh
    }

    /// Fills in the normals that are missing; supplied ones keep their direction.
    ///
    /// A missing normal becomes the area-weighted sum of the faces around the
    /// vertex, or +Y for a vertex that touches no face.
    fn ensure_normals(&mut self) {
        let missing: Vec<bool> = self
            .vertices
            .iter()
            .map(|v| v.normal.length_squared() < 1e-6)
            .collect();
        if !missing.contains(&true) {
            return;
        }

        let mut accumulated = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let (Some(a), Some(b), Some(c)) =
                (self.vertices.get(i0), self.vertices.get(i1), self.vertices.get(i2))
            else {
                continue;
            };
            // Unnormalised: magnitude weights by triangle area
            let face_normal = (b.position - a.position).cross(c.position - a.position);
            for i in [i0, i1, i2] {
                accumulated[i] += face_normal;
            }
        }

        for ((v, sum), missing) in self.vertices.iter_mut().zip(accumulated).zip(missing) {
            v.normal = if missing {
                sum.try_normalize().unwrap_or(Vec3::Y)
            } else {
                v.normal.normalize_or(Vec3::Y)
            };
        }
    }

    fn compute_bounds(&self) -> Bounds {
        if self.vertices.is_empty() {
            return Bounds {
                center: Vec3::ZERO,
                radius: 0.0,
            };
        }
        let (min, max) = self.vertices.iter().fold(
            (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)),
            |(min, max), v| (min.min(v.position), max.max(v.position)),
        );
        let center = (min + max) * 0.5;
        let radius = self
            .vertices
            .iter()
            .map(|v| v.position.distance(center))
            .fold(0.0, f32::max);
        Bounds { center, radius }
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds.unwrap_or_else(|| self.compute_bounds())
    }

    /// Triangles as vertex triples; out-of-range indices are skipped.
    pub fn triangles(&self) -> impl Iterator<Item = [&Vertex; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            Some([
                self.vertices.get(tri[0] as usize)?,
                self.vertices.get(tri[1] as usize)?,
                self.vertices.get(tri[2] as usize)?,
            ])
        })
    }

    /// Nearest ray parameter at which `ray` hits a triangle (both faces).
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        self.bounds().intersect_ray(ray)?;
        self.triangles()
            .filter_map(|[a, b, c]| ray_triangle(ray, a.position, b.position, c.position))
            .min_by(f32::total_cmp)
    }

    /// Unit cube centred on the origin
    pub fn cube() -> Self {
        let corners = [
            Vec3::new(-0.5, -0.5, -0.5),
            Vec3::new(0.5, -0.5, -0.5),
            Vec3::new(0.5, 0.5, -0.5),
            Vec3::new(-0.5, 0.5, -0.5),
            Vec3::new(-0.5, -0.5, 0.5),
            Vec3::new(0.5, -0.5, 0.5),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::new(-0.5, 0.5, 0.5),
        ];
        let indices = vec![
            4, 5, 6, 4, 6, 7, // front
            1, 0, 3, 1, 3, 2, // back
            3, 7, 6, 3, 6, 2, // top
            0, 1, 5, 0, 5, 4, // bottom
            1, 2, 6, 1, 6, 5, // right
            0, 4, 7, 0, 7, 3, // left
        ];
        let vertices = corners
            .iter()
            .map(|p| Vertex::new(*p, Vec3::ZERO))
            .collect();
        Self::new("Cube", vertices, indices)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty() && !self.indices.is_empty()
    }
}

/// Möller–Trumbore ray/triangle intersection, double sided.
pub fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    let edge1 = b - a;
    let edge2 = c - a;
    let p = ray.direction.cross(edge2);
    let det = edge1.dot(p);
    if det.abs() < 1e-9 {
        return None;
    }
    let inv_det = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(edge1);
    let v = ray.direction.dot(q) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(q) * inv_det;
    (t > 1e-6).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_gets_outward_normals() {
        let cube = MeshData::cube();
        assert_eq!(cube.triangle_count(), 12);
        for v in &cube.vertices {
            assert!(v.normal.dot(v.position) > 0.0);
            assert!((v.normal.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn supplied_normals_survive_a_missing_one() {
        let supplied = Vec3::new(0.0, 0.6, 0.8);
        let vertices = vec![
            Vertex::new(Vec3::ZERO, supplied),
            Vertex::new(Vec3::X, supplied),
            Vertex::new(Vec3::Y, Vec3::ZERO),
        ];
        let mesh = MeshData::new("partial", vertices, vec![0, 1, 2]);
        assert!(mesh.vertices[0].normal.abs_diff_eq(supplied, 1e-6));
        assert!(mesh.vertices[1].normal.abs_diff_eq(supplied, 1e-6));
        assert!(mesh.vertices[2].normal.abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn ray_hits_cube_front_face() {
        let cube = MeshData::cube();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        let t = cube.intersect_ray(&ray).unwrap();
        assert!((t - 4.5).abs() < 1e-5);
    }

    #[test]
    fn ray_beside_cube_misses() {
        let cube = MeshData::cube();
        let ray = Ray::new(Vec3::new(2.0, 0.0, 5.0), -Vec3::Z);
        assert_eq!(cube.intersect_ray(&ray), None);
        let behind = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::Z);
        assert_eq!(cube.intersect_ray(&behind), None);
    }

    #[test]
    fn bounds_enclose_all_vertices() {
        let cube = MeshData::cube();
        let b = cube.bounds();
        assert!(b.center.abs_diff_eq(Vec3::ZERO, 1e-6));
        assert!((b.radius - Vec3::splat(0.5).length()).abs() < 1e-5);
    }

    #[test]
    fn dangling_indices_are_skipped() {
        let mesh = MeshData::new(
            "bad",
            vec![Vertex::default(); 3],
            vec![0, 1, 2, 0, 1, 9, 4],
        );
        assert_eq!(mesh.indices.len(), 6);
        assert_eq!(mesh.triangles().count(), 1);
    }
}
