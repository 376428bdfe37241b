//! Axis-aligned bounding boxes.
//!
//! Used both as scene-space bounds and as the partition volume of every
//! octree node.

use glam::Vec3A;
use crate::ray::Ray;
use crate::sphere::Sphere;

/// Box spanned by two corners, `min <= max` on every axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Corner with the smallest coordinates.
    pub min: Vec3A,
    /// Corner with the largest coordinates.
    pub max: Vec3A,
}

impl Aabb {
    /// Create a box from its two corners.
    pub fn new(min: Vec3A, max: Vec3A) -> Self {
        Self { min, max }
    }

    /// Cube of half-size `half_extent` around `center`.
    pub fn from_center(center: Vec3A, half_extent: f32) -> Self {
        let h = Vec3A::splat(half_extent);
        Self::new(center - h, center + h)
    }

    /// Smallest box enclosing every sphere, or `None` for an empty slice.
    pub fn enclosing<'a>(spheres: impl IntoIterator<Item = &'a Sphere>) -> Option<Self> {
        spheres.into_iter().fold(None, |acc: Option<Aabb>, s| {
            let r = Vec3A::splat(s.radius.abs());
            let b = Aabb::new(s.center - r, s.center + r);
            Some(match acc {
                None => b,
                Some(a) => Aabb::new(a.min.min(b.min), a.max.max(b.max)),
            })
        })
    }

    /// The same box grown by `margin` on every side.
    pub fn padded(&self, margin: f32) -> Self {
        let m = Vec3A::splat(margin);
        Self::new(self.min - m, self.max + m)
    }

    /// Midpoint of the two corners.
    pub fn center(&self) -> Vec3A {
        (self.min + self.max) * 0.5
    }

    /// Half of the box size along each axis.
    pub fn half_extent(&self) -> Vec3A {
        self.max - self.center()
    }

    /// Volume of the box.
    pub fn volume(&self) -> f32 {
        let size = self.max - self.min;
        size.x * size.y * size.z
    }

    /// One of the eight octants obtained by cutting the box at its center.
    ///
    /// Bit 0 of `index` selects the upper x half, bit 1 the upper y half and
    /// bit 2 the upper z half. The eight octants tile the box exactly.
    pub fn octant(&self, index: usize) -> Self {
        debug_assert!(index < 8);
        let c = self.center();
        let pick = |bit: usize, lo: f32, mid: f32, hi: f32| {
            if index & bit != 0 { (mid, hi) } else { (lo, mid) }
        };
        let (x0, x1) = pick(1, self.min.x, c.x, self.max.x);
        let (y0, y1) = pick(2, self.min.y, c.y, self.max.y);
        let (z0, z1) = pick(4, self.min.z, c.z, self.max.z);
        Self::new(Vec3A::new(x0, y0, z0), Vec3A::new(x1, y1, z1))
    }

    /// True if `p` lies inside or on the boundary.
    pub fn contains_point(&self, p: Vec3A) -> bool {
        self.min.cmple(p).all() && p.cmple(self.max).all()
    }

    /// True if the whole sphere fits inside the box (boundary contact allowed).
    pub fn contains_sphere(&self, sphere: &Sphere) -> bool {
        let r = Vec3A::splat(sphere.radius);
        self.contains_point(sphere.center - r) && self.contains_point(sphere.center + r)
    }

    /// True if `other` fits inside this box (boundary contact allowed).
    pub fn contains_aabb(&self, other: &Aabb) -> bool {
        self.contains_point(other.min) && self.contains_point(other.max)
    }

    /// True if the two boxes share any point.
    pub fn overlaps_aabb(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    /// True if the sphere touches the box, using the closest point of the box
    /// to the sphere center.
    pub fn overlaps_sphere(&self, sphere: &Sphere) -> bool {
        let closest = sphere.center.clamp(self.min, self.max);
        (closest - sphere.center).length_squared() <= sphere.radius * sphere.radius
    }

    /// Slab test.
    ///
    /// A zero direction component yields an infinite reciprocal, which flows
    /// through the min/max reduction unguarded. Hits entirely behind the
    /// origin are rejected.
    pub fn intersects(&self, ray: &Ray) -> bool {
        let inv = ray.unit_direction.recip();
        let t1 = (self.min - ray.origin) * inv;
        let t2 = (self.max - ray.origin) * inv;

        let near = t1.min(t2);
        let far = t1.max(t2);
        let tmin = near.x.max(near.y).max(near.z);
        let tmax = far.x.min(far.y).min(far.z);

        // Whole box behind the ray origin
        if tmax < 0.0 {
            return false;
        }
        tmin <= tmax
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use approx::assert_relative_eq;

    fn unit_cube() -> Aabb {
        Aabb::new(Vec3A::splat(-1.0), Vec3A::splat(1.0))
    }

    #[test]
    fn test_center_and_half_extent() {
        let b = Aabb::new(Vec3A::new(0.0, 2.0, -4.0), Vec3A::new(2.0, 6.0, 0.0));
        assert_eq!(b.center(), Vec3A::new(1.0, 4.0, -2.0));
        assert_eq!(b.half_extent(), Vec3A::new(1.0, 2.0, 2.0));
    }

    #[test]
    fn test_octants_tile_the_parent() {
        let parent = Aabb::new(Vec3A::new(-3.0, 0.0, 2.0), Vec3A::new(5.0, 4.0, 10.0));
        let total: f32 = (0..8).map(|i| parent.octant(i).volume()).sum();
        assert_relative_eq!(total, parent.volume(), epsilon = 1e-3);

        for i in 0..8 {
            let a = parent.octant(i);
            assert_relative_eq!(a.volume(), parent.volume() / 8.0, epsilon = 1e-3);
            assert!(parent.contains_aabb(&a));
            // Distinct octants share at most a face: their interiors are disjoint
            for j in (i + 1)..8 {
                let b = parent.octant(j);
                let lo = a.min.max(b.min);
                let hi = a.max.min(b.max);
                let overlap = (hi - lo).max(Vec3A::ZERO);
                assert_eq!(overlap.x * overlap.y * overlap.z, 0.0);
            }
        }
    }

    #[test]
    fn test_octant_bits() {
        let b = unit_cube();
        assert_eq!(b.octant(0), Aabb::new(Vec3A::splat(-1.0), Vec3A::ZERO));
        assert_eq!(b.octant(7), Aabb::new(Vec3A::ZERO, Vec3A::splat(1.0)));
        assert_eq!(
            b.octant(1),
            Aabb::new(Vec3A::new(0.0, -1.0, -1.0), Vec3A::new(1.0, 0.0, 0.0))
        );
    }

    #[test]
    fn test_contains_sphere() {
        let b = unit_cube();
        let inside = Sphere::new(Vec3A::new(0.5, 0.5, 0.5), 0.4, Material::default());
        let straddling = Sphere::new(Vec3A::ZERO, 0.1, Material::default());
        assert!(b.octant(7).contains_sphere(&inside));
        assert!(!b.octant(7).contains_sphere(&straddling));
        assert!(b.contains_sphere(&straddling));
    }

    #[test]
    fn test_overlaps() {
        let b = unit_cube();
        let touching = Sphere::new(Vec3A::new(1.5, 0.0, 0.0), 0.6, Material::default());
        let far = Sphere::new(Vec3A::new(3.0, 0.0, 0.0), 0.6, Material::default());
        assert!(b.overlaps_sphere(&touching));
        assert!(!b.overlaps_sphere(&far));
        assert!(b.overlaps_aabb(&b.octant(3)));
        assert!(!b.overlaps_aabb(&Aabb::from_center(Vec3A::splat(5.0), 1.0)));
    }

    #[test]
    fn test_slab_hit_and_miss() {
        let b = unit_cube();
        let toward = Ray::new(Vec3A::new(0.0, 0.0, 5.0), Vec3A::new(0.0, 0.0, -1.0));
        let away = Ray::new(Vec3A::new(0.0, 0.0, 5.0), Vec3A::new(0.0, 0.0, 1.0));
        let beside = Ray::new(Vec3A::new(3.0, 0.0, 5.0), Vec3A::new(0.0, 0.0, -1.0));
        assert!(b.intersects(&toward));
        assert!(!b.intersects(&away));
        assert!(!b.intersects(&beside));
    }

    #[test]
    fn test_slab_from_inside() {
        let b = unit_cube();
        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(1.0, 2.0, 3.0));
        assert!(b.intersects(&ray));
    }

    #[test]
    fn test_slab_axis_aligned_uses_infinities() {
        let b = unit_cube();
        // Zero x and y components produce infinite reciprocals
        let ray = Ray::new(Vec3A::new(0.5, 0.5, -5.0), Vec3A::new(0.0, 0.0, 1.0));
        assert!(b.intersects(&ray));
        let outside = Ray::new(Vec3A::new(1.5, 0.5, -5.0), Vec3A::new(0.0, 0.0, 1.0));
        assert!(!b.intersects(&outside));
    }

    #[test]
    fn test_enclosing() {
        let spheres = [
            Sphere::new(Vec3A::new(-2.0, 0.0, 0.0), 1.0, Material::default()),
            Sphere::new(Vec3A::new(3.0, 1.0, 0.0), 0.5, Material::default()),
        ];
        let b = Aabb::enclosing(&spheres).unwrap();
        assert_eq!(b.min, Vec3A::new(-3.0, -1.0, -1.0));
        assert_eq!(b.max, Vec3A::new(3.5, 1.5, 1.0));
        assert!(Aabb::enclosing(&[] as &[Sphere]).is_none());
    }
}
