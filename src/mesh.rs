//! Triangle mesh primitives.

/// A 3D point or direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn sub(self, other: Vec3) -> Vec3 {
        Vec3::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    pub fn cross(self, other: Vec3) -> Vec3 {
        Vec3::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Unit vector in this direction; the zero vector stays zero so that
    /// degenerate triangles never produce NaN normals in output files.
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len > 0.0 {
            Vec3::new(self.x / len, self.y / len, self.z / len)
        } else {
            Vec3::new(0.0, 0.0, 0.0)
        }
    }
}

/// One triangle. The outward normal is implied by the vertex winding
/// (counter-clockwise seen from outside the solid) and derived on demand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Outward unit normal from the winding.
    pub fn normal(&self) -> Vec3 {
        let e1 = self.b.sub(self.a);
        let e2 = self.c.sub(self.a);
        e1.cross(e2).normalized()
    }
}

/// An ordered collection of triangles; insertion order is emission order.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Triangle> {
        self.triangles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_from_winding() {
        // Counter-clockwise in the xy plane seen from +z.
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let n = tri.normal();
        assert!((n.x).abs() < 1e-12);
        assert!((n.y).abs() < 1e-12);
        assert!((n.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_triangle_has_zero_normal() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let tri = Triangle::new(p, p, p);
        let n = tri.normal();
        assert_eq!(n, Vec3::new(0.0, 0.0, 0.0));
    }
}
