//! Octree over spheres.
//!
//! Every node owns a box, the spheres resident at that node, and once split,
//! exactly eight children covering its octants. A sphere lives at the deepest
//! node on its insertion path whose volume fully contains it, so spheres
//! straddling an octant boundary stay with the parent.
//!
//! Queries walk the tree depth-first and skip every subtree whose box the ray
//! misses, returning a conservative candidate set for exact intersection.

use log::debug;
use serde::Deserialize;

use crate::aabb::Aabb;
use crate::ray::Ray;
use crate::sphere::Sphere;

/// Deepest `max_depth` accepted from configuration. Halving an f32 box
/// further than this yields no usable partition.
pub const MAX_OCTREE_DEPTH: u32 = 32;

/// Split thresholds shared by every node of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OctreeConfig {
    /// Resident population at which a leaf splits on the next insertion.
    pub max_spheres_per_node: usize,
    /// Depth below which nodes may split. The root has depth 0, so a tree
    /// never has more than `max_depth + 1` levels.
    pub max_depth: u32,
}

impl Default for OctreeConfig {
    fn default() -> Self {
        Self {
            max_spheres_per_node: 3,
            max_depth: 8,
        }
    }
}

impl OctreeConfig {
    /// The same thresholds with splitting disabled: the root holds every
    /// sphere and each query returns the whole scene.
    pub fn linear(self) -> Self {
        Self { max_depth: 0, ..self }
    }
}

/// One node of the octree; the root node is the whole tree.
#[derive(Debug, Clone)]
pub struct Octree {
    bounds: Aabb,
    depth: u32,
    config: OctreeConfig,
    spheres: Vec<Sphere>,
    /// Octant `i` of `bounds` lives at index `i` (see [`Aabb::octant`]).
    children: Option<Box<[Octree; 8]>>,
}

impl Octree {
    /// Create an empty root node covering `bounds`.
    pub fn new(bounds: Aabb, config: OctreeConfig) -> Self {
        Self::with_depth(bounds, config, 0)
    }

    fn with_depth(bounds: Aabb, config: OctreeConfig, depth: u32) -> Self {
        Self {
            bounds,
            depth,
            config,
            spheres: Vec::new(),
            children: None,
        }
    }

    /// Build a tree by inserting every sphere in order.
    pub fn build(bounds: Aabb, config: OctreeConfig, spheres: impl IntoIterator<Item = Sphere>) -> Self {
        let mut tree = Self::new(bounds, config);
        for sphere in spheres {
            tree.insert(sphere);
        }
        debug!(
            "Octree built: {} spheres, {} nodes, depth {} (max {} per node, max depth {})",
            tree.len(),
            tree.node_count(),
            tree.max_reached_depth(),
            config.max_spheres_per_node,
            config.max_depth
        );
        tree
    }

    /// Insert a sphere below this node.
    ///
    /// A full leaf above the depth limit splits first. The sphere then moves
    /// into the first child that fully contains it, or stays resident here.
    /// Spheres outside the root box are accepted and kept at the root.
    pub fn insert(&mut self, sphere: Sphere) {
        if self.children.is_none()
            && self.spheres.len() >= self.config.max_spheres_per_node
            && self.depth < self.config.max_depth
        {
            self.split();
        }

        if let Some(children) = self.children.as_deref_mut() {
            if let Some(child) = children.iter_mut().find(|c| c.bounds.contains_sphere(&sphere)) {
                child.insert(sphere);
                return;
            }
        }

        self.spheres.push(sphere);
    }

    /// Create the eight children and push every resident sphere that fits
    /// into one of them down a level. Splitting is permanent; calling this on
    /// a node that has already split does nothing.
    pub fn split(&mut self) {
        if self.children.is_some() {
            return;
        }

        let (bounds, config, depth) = (self.bounds, self.config, self.depth + 1);
        let children: [Octree; 8] =
            std::array::from_fn(|i| Octree::with_depth(bounds.octant(i), config, depth));
        self.children = Some(Box::new(children));

        // Children exist now, so re-inserting only routes, it never splits here again
        for sphere in std::mem::take(&mut self.spheres) {
            self.insert(sphere);
        }
    }

    /// Append every sphere the ray may hit to `out`.
    ///
    /// The result is a superset of the spheres the ray actually hits; callers
    /// still run the exact intersection test on each candidate.
    pub fn query<'a>(&'a self, ray: &Ray, out: &mut Vec<&'a Sphere>) {
        if !self.bounds.intersects(ray) {
            return;
        }

        out.extend(self.spheres.iter());

        if let Some(children) = &self.children {
            for child in children.iter() {
                child.query(ray, out);
            }
        }
    }

    /// Allocating form of [`Octree::query`].
    pub fn query_vec(&self, ray: &Ray) -> Vec<&Sphere> {
        let mut out = Vec::new();
        self.query(ray, &mut out);
        out
    }

    /// Partition volume of this node.
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Depth of this node, 0 at the root.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Thresholds this node was created with.
    pub fn config(&self) -> OctreeConfig {
        self.config
    }

    /// True once the node has children.
    pub fn has_split(&self) -> bool {
        self.children.is_some()
    }

    /// Spheres stored directly at this node.
    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    /// The eight children, once the node has split.
    pub fn children(&self) -> Option<&[Octree; 8]> {
        self.children.as_deref()
    }

    /// Total number of spheres resident in this subtree.
    pub fn len(&self) -> usize {
        self.spheres.len() + self.child_iter().map(Octree::len).sum::<usize>()
    }

    /// True if no sphere is resident anywhere in this subtree.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of nodes in this subtree, this node included.
    pub fn node_count(&self) -> usize {
        1 + self.child_iter().map(Octree::node_count).sum::<usize>()
    }

    /// Deepest node depth present in this subtree.
    pub fn max_reached_depth(&self) -> u32 {
        self.child_iter()
            .map(Octree::max_reached_depth)
            .max()
            .unwrap_or(self.depth)
    }

    fn child_iter(&self) -> impl Iterator<Item = &Octree> {
        self.children.iter().flat_map(|c| c.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::{HitRecord, Hittable};
    use crate::interval::Interval;
    use crate::material::{Color, Material};
    use glam::Vec3A;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn sphere(x: f32, y: f32, z: f32, r: f32) -> Sphere {
        Sphere::new(Vec3A::new(x, y, z), r, Material::default())
    }

    fn cube(half: f32) -> Aabb {
        Aabb::from_center(Vec3A::ZERO, half)
    }

    fn random_spheres(rng: &mut ChaCha8Rng, count: usize) -> Vec<Sphere> {
        (0..count)
            .map(|i| {
                let center = Vec3A::new(
                    rng.random_range(-45.0..45.0),
                    rng.random_range(-45.0..45.0),
                    rng.random_range(-45.0..45.0),
                );
                let color = Color::splat(i as f32);
                Sphere::new(center, rng.random_range(0.2..4.0), Material::new(color, 0.0))
            })
            .collect()
    }

    fn random_ray(rng: &mut ChaCha8Rng) -> Ray {
        let origin = Vec3A::new(
            rng.random_range(-60.0..60.0),
            rng.random_range(-60.0..60.0),
            rng.random_range(-60.0..60.0),
        );
        // Aim roughly at the populated region so most rays cross the tree
        let target = Vec3A::new(
            rng.random_range(-40.0..40.0),
            rng.random_range(-40.0..40.0),
            rng.random_range(-40.0..40.0),
        );
        Ray::new(origin, target - origin)
    }

    #[test]
    fn test_leaf_below_threshold_keeps_spheres() {
        let mut tree = Octree::new(cube(10.0), OctreeConfig::default());
        tree.insert(sphere(5.0, 5.0, 5.0, 1.0));
        tree.insert(sphere(-5.0, 5.0, 5.0, 1.0));
        tree.insert(sphere(5.0, -5.0, 5.0, 1.0));

        assert!(!tree.has_split());
        assert_eq!(tree.spheres().len(), 3);
    }

    #[test]
    fn test_threshold_one_moves_spheres_into_children() {
        let config = OctreeConfig {
            max_spheres_per_node: 1,
            max_depth: 1,
        };
        let mut tree = Octree::new(cube(10.0), config);
        tree.insert(sphere(5.0, 5.0, 5.0, 1.0));
        assert!(!tree.has_split());

        tree.insert(sphere(-5.0, -5.0, -5.0, 1.0));
        assert!(tree.has_split());
        assert!(tree.spheres().is_empty());

        let children = tree.children().unwrap();
        assert_eq!(children[7].spheres().len(), 1);
        assert_eq!(children[0].spheres().len(), 1);
        let holders = children.iter().filter(|c| !c.spheres().is_empty()).count();
        assert_eq!(holders, 2);
        assert!(children.iter().all(|c| c.depth() == 1));
    }

    #[test]
    fn test_threshold_zero_routes_first_sphere_to_child() {
        let config = OctreeConfig {
            max_spheres_per_node: 0,
            max_depth: 1,
        };
        let mut tree = Octree::new(cube(10.0), config);
        tree.insert(sphere(-5.0, 5.0, -5.0, 1.0));

        assert!(tree.spheres().is_empty());
        let children = tree.children().unwrap();
        // lower x, upper y, lower z
        assert_eq!(children[2].spheres().len(), 1);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_straddling_sphere_stays_at_parent() {
        let config = OctreeConfig {
            max_spheres_per_node: 0,
            max_depth: 3,
        };
        let mut tree = Octree::new(cube(10.0), config);
        tree.insert(sphere(0.0, 5.0, 5.0, 1.0));

        assert!(tree.has_split());
        assert_eq!(tree.spheres().len(), 1);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_max_depth_stops_splitting() {
        let config = OctreeConfig {
            max_spheres_per_node: 1,
            max_depth: 2,
        };
        let mut tree = Octree::new(cube(16.0), config);
        for i in 0..20 {
            tree.insert(sphere(3.0 + i as f32 * 0.01, 3.0, 3.0, 0.1));
        }

        assert_eq!(tree.max_reached_depth(), 2);
        assert_eq!(tree.len(), 20);
        let deepest = &tree.children().unwrap()[7].children().unwrap()[0];
        assert_eq!(deepest.depth(), 2);
        assert!(!deepest.has_split());
        assert_eq!(deepest.spheres().len(), 20);
    }

    #[test]
    fn test_split_is_permanent_and_idempotent() {
        let mut tree = Octree::new(cube(10.0), OctreeConfig::default());
        tree.insert(sphere(5.0, 5.0, 5.0, 1.0));
        tree.split();
        assert!(tree.has_split());
        assert_eq!(tree.node_count(), 9);

        tree.split();
        assert_eq!(tree.node_count(), 9);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_sphere_outside_root_is_kept() {
        let config = OctreeConfig {
            max_spheres_per_node: 0,
            max_depth: 4,
        };
        let mut tree = Octree::new(cube(10.0), config);
        tree.insert(sphere(50.0, 0.0, 0.0, 1.0));
        assert_eq!(tree.spheres().len(), 1);
    }

    #[test]
    fn test_every_sphere_resident_exactly_once() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let spheres = random_spheres(&mut rng, 500);
        let tree = Octree::build(cube(50.0), OctreeConfig::default(), spheres.clone());

        assert_eq!(tree.len(), spheres.len());

        fn collect<'a>(node: &'a Octree, out: &mut Vec<&'a Sphere>) {
            out.extend(node.spheres().iter());
            if let Some(children) = node.children() {
                for c in children.iter() {
                    collect(c, out);
                }
            }
        }
        let mut resident = Vec::new();
        collect(&tree, &mut resident);
        for s in &spheres {
            assert_eq!(resident.iter().filter(|r| ***r == *s).count(), 1);
        }
    }

    #[test]
    fn test_children_contain_their_residents() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let tree = Octree::build(cube(50.0), OctreeConfig::default(), random_spheres(&mut rng, 300));

        fn check(node: &Octree) {
            if node.depth() > 0 {
                for s in node.spheres() {
                    assert!(node.bounds().contains_sphere(s));
                }
            }
            if let Some(children) = node.children() {
                for c in children.iter() {
                    assert_eq!(c.depth(), node.depth() + 1);
                    check(c);
                }
            }
        }
        check(&tree);
    }

    #[test]
    fn test_query_has_no_false_negatives() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let spheres = random_spheres(&mut rng, 400);
        let tree = Octree::build(cube(50.0), OctreeConfig::default(), spheres.clone());

        for _ in 0..500 {
            let ray = random_ray(&mut rng);
            let candidates = tree.query_vec(&ray);
            for s in &spheres {
                let mut rec = HitRecord::default();
                if s.hit(&ray, Interval::FORWARD, &mut rec) {
                    assert!(
                        candidates.iter().any(|c| **c == *s),
                        "sphere {:?} hit but not returned by the query",
                        s
                    );
                }
            }
        }
    }

    #[test]
    fn test_query_prunes_missed_subtrees() {
        let config = OctreeConfig {
            max_spheres_per_node: 1,
            max_depth: 2,
        };
        let tree = Octree::build(
            cube(10.0),
            config,
            [sphere(5.0, 5.0, -5.0, 1.0), sphere(-5.0, -5.0, -5.0, 1.0)],
        );

        // Travels through the upper x, upper y octants only
        let ray = Ray::new(Vec3A::new(5.0, 5.0, 20.0), Vec3A::new(0.0, 0.0, -1.0));
        let candidates = tree.query_vec(&ray);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].center, Vec3A::new(5.0, 5.0, -5.0));
    }

    #[test]
    fn test_query_is_repeatable() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let tree = Octree::build(cube(50.0), OctreeConfig::default(), random_spheres(&mut rng, 200));
        let ray = random_ray(&mut rng);

        let first: Vec<*const Sphere> = tree.query_vec(&ray).into_iter().map(|s| s as *const _).collect();
        let second: Vec<*const Sphere> = tree.query_vec(&ray).into_iter().map(|s| s as *const _).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_tree_and_missed_root() {
        let tree = Octree::new(cube(10.0), OctreeConfig::default());
        let ray = Ray::new(Vec3A::ZERO, Vec3A::new(0.0, 0.0, -1.0));
        assert!(tree.query_vec(&ray).is_empty());
        assert!(tree.is_empty());

        let tree = Octree::build(cube(10.0), OctreeConfig::default(), [sphere(0.0, 0.0, 0.0, 1.0)]);
        let away = Ray::new(Vec3A::new(0.0, 0.0, 20.0), Vec3A::new(0.0, 0.0, 1.0));
        assert!(tree.query_vec(&away).is_empty());
    }

    #[test]
    fn test_linear_config_keeps_everything_at_root() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let spheres = random_spheres(&mut rng, 64);
        let config = OctreeConfig::default().linear();
        assert_eq!(config.max_depth, 0);
        assert_eq!(config.max_spheres_per_node, OctreeConfig::default().max_spheres_per_node);

        let tree = Octree::build(cube(50.0), config, spheres.iter().copied());
        assert!(!tree.has_split());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.spheres(), spheres.as_slice());

        // Any ray crossing the root gets every sphere back
        let ray = Ray::new(Vec3A::new(0.0, 0.0, 100.0), Vec3A::new(0.0, 0.0, -1.0));
        assert_eq!(tree.query_vec(&ray).len(), spheres.len());
    }
}
