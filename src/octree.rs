//! Static octree for broad-phase overlap queries.
//!
//! Items are inserted first and the tree is built once; queries then walk
//! only the octants the query bounds reach. An item whose bounds straddle a
//! node's centre stays in that node, so every payload is stored exactly
//! once and a query never reports duplicates.

use crate::error::{check_index, Result};
use crate::{Aabb, Obb, Scalar, Sphere, Triangle, Vec3};
use alloc::boxed::Box;
use alloc::vec::Vec;

pub const OCTANT_COUNT: usize = 8;
pub const X_BIT: usize = 1;
pub const Y_BIT: usize = 2;
pub const Z_BIT: usize = 4;

/// A primitive with an axis-aligned bound.
pub trait Bounded {
    type Scalar: Scalar;

    fn bounds(&self) -> Aabb<Vec3<Self::Scalar>>;
}

/// Exact overlap between a stored primitive and a query shape. Overlap must
/// imply that the two bounds intersect.
pub trait Overlaps<Q: ?Sized> {
    fn overlaps(&self, query: &Q) -> bool;
}

impl<S: Scalar> Bounded for Aabb<Vec3<S>> {
    type Scalar = S;

    #[inline]
    fn bounds(&self) -> Aabb<Vec3<S>> {
        *self
    }
}

impl<S: Scalar> Bounded for Sphere<Vec3<S>> {
    type Scalar = S;

    #[inline]
    fn bounds(&self) -> Aabb<Vec3<S>> {
        self.aabb()
    }
}

impl<S: Scalar> Bounded for Triangle<S> {
    type Scalar = S;

    #[inline]
    fn bounds(&self) -> Aabb<Vec3<S>> {
        self.aabb()
    }
}

fn box_meets_sphere<S: Scalar>(b: &Aabb<Vec3<S>>, s: &Sphere<Vec3<S>>) -> bool {
    let nearest = s.centre.component_max(b.min).component_min(b.max);
    nearest.distance_sq(s.centre) <= s.radius * s.radius
}

impl<S: Scalar> Overlaps<Aabb<Vec3<S>>> for Aabb<Vec3<S>> {
    fn overlaps(&self, query: &Aabb<Vec3<S>>) -> bool {
        self.test_intersection(query)
    }
}

impl<S: Scalar> Overlaps<Sphere<Vec3<S>>> for Aabb<Vec3<S>> {
    fn overlaps(&self, query: &Sphere<Vec3<S>>) -> bool {
        box_meets_sphere(self, query)
    }
}

impl<S: Scalar> Overlaps<Sphere<Vec3<S>>> for Sphere<Vec3<S>> {
    fn overlaps(&self, query: &Sphere<Vec3<S>>) -> bool {
        self.test_intersection(query)
    }
}

impl<S: Scalar> Overlaps<Aabb<Vec3<S>>> for Sphere<Vec3<S>> {
    fn overlaps(&self, query: &Aabb<Vec3<S>>) -> bool {
        box_meets_sphere(query, self)
    }
}

impl<S: Scalar> Overlaps<Triangle<S>> for Triangle<S> {
    fn overlaps(&self, query: &Triangle<S>) -> bool {
        self.test_intersection(query)
    }
}

impl<S: Scalar> Overlaps<Aabb<Vec3<S>>> for Triangle<S> {
    fn overlaps(&self, query: &Aabb<Vec3<S>>) -> bool {
        Obb::from_aabb(query).test_intersection_triangle(self)
    }
}

impl<S: Scalar> Overlaps<Sphere<Vec3<S>>> for Triangle<S> {
    fn overlaps(&self, query: &Sphere<Vec3<S>>) -> bool {
        let r = query.radius;
        self.closest_point(query.centre).distance_sq(query.centre) <= r * r
    }
}

/// Octant `index` of `b`: bit 0, 1 and 2 select the upper half along x, y
/// and z.
pub fn octant_bounds<S: Scalar>(b: &Aabb<Vec3<S>>, index: usize) -> Aabb<Vec3<S>> {
    let half = b.diagonal() * S::HALF;
    let pick = |bit: usize, v: S| if index & bit != 0 { v } else { S::ZERO };
    let origin = b.min + Vec3::new(pick(X_BIT, half.x), pick(Y_BIT, half.y), pick(Z_BIT, half.z));
    Aabb::new(origin, origin + half)
}

/// Octant around `centre` holding `p`; points on a dividing plane go up.
pub fn octant_of<S: Scalar>(centre: Vec3<S>, p: Vec3<S>) -> usize {
    let mut index = 0;
    if p.x >= centre.x {
        index |= X_BIT;
    }
    if p.y >= centre.y {
        index |= Y_BIT;
    }
    if p.z >= centre.z {
        index |= Z_BIT;
    }
    index
}

/// Bit `i` is set when octant `i` around `centre` meets `b`.
pub fn octant_mask<S: Scalar>(centre: Vec3<S>, b: &Aabb<Vec3<S>>) -> u8 {
    let lo = octant_of(centre, b.min);
    let hi = octant_of(centre, b.max);
    // octants that agree with `lo` wherever `lo` and `hi` agree
    let fixed = !(lo ^ hi) & (OCTANT_COUNT - 1);
    (0..OCTANT_COUNT)
        .filter(|&i| (i ^ lo) & fixed == 0)
        .fold(0, |mask, i| mask | 1 << i)
}

struct Node<S> {
    bounds: Aabb<Vec3<S>>,
    centre: Vec3<S>,
    items: Vec<usize>,
    children: [Option<Box<Node<S>>>; OCTANT_COUNT],
}

impl<S: Scalar> Node<S> {
    fn new(bounds: Aabb<Vec3<S>>) -> Self {
        Self { bounds, centre: bounds.centre(), items: Vec::new(), children: Default::default() }
    }

    fn is_leaf(&self) -> bool {
        self.children.iter().all(Option::is_none)
    }
}

/// Static octree over primitives `P` carrying payloads `T`.
pub struct Octree<P: Bounded, T> {
    bounds: Aabb<Vec3<P::Scalar>>,
    leaf_threshold: usize,
    min_diagonal_sq: P::Scalar,
    items: Vec<(P, T)>,
    root: Option<Node<P::Scalar>>,
}

impl<P: Bounded, T> Octree<P, T> {
    pub const DEFAULT_LEAF_THRESHOLD: usize = 8;

    /// Tree over `bounds` that splits nodes holding at least
    /// [`Self::DEFAULT_LEAF_THRESHOLD`] items down to a squared diagonal of 1.
    pub fn new(bounds: Aabb<Vec3<P::Scalar>>) -> Self {
        Self::with_limits(bounds, Self::DEFAULT_LEAF_THRESHOLD, <P::Scalar as Scalar>::ONE)
    }

    /// Nodes with fewer than `leaf_threshold` items, or a squared diagonal of
    /// at most `min_diagonal_sq`, are not split.
    pub fn with_limits(
        bounds: Aabb<Vec3<P::Scalar>>,
        leaf_threshold: usize,
        min_diagonal_sq: P::Scalar,
    ) -> Self {
        Self { bounds, leaf_threshold, min_diagonal_sq, items: Vec::new(), root: None }
    }

    #[inline]
    pub fn bounds(&self) -> &Aabb<Vec3<P::Scalar>> {
        &self.bounds
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.items.reserve(additional);
    }

    /// Adds an item. The tree must be rebuilt before the next query.
    pub fn insert(&mut self, primitive: P, payload: T) {
        self.items.push((primitive, payload));
        self.root = None;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.root = None;
    }

    #[inline]
    pub fn is_built(&self) -> bool {
        self.root.is_some()
    }

    /// Whether the root has no children, including before the first build.
    pub fn is_leaf(&self) -> bool {
        self.root.as_ref().map_or(true, Node::is_leaf)
    }

    pub fn subcluster_bounds(&self, index: usize) -> Result<Aabb<Vec3<P::Scalar>>> {
        check_index(index, OCTANT_COUNT)?;
        Ok(octant_bounds(&self.bounds, index))
    }

    #[inline]
    pub fn subcluster_by_point(&self, p: Vec3<P::Scalar>) -> usize {
        octant_of(self.bounds.centre(), p)
    }

    #[inline]
    pub fn subcluster_mask(&self, b: &Aabb<Vec3<P::Scalar>>) -> u8 {
        octant_mask(self.bounds.centre(), b)
    }

    pub fn build(&mut self) {
        let mut root = Node::new(self.bounds);
        self.build_node(&mut root, (0..self.items.len()).collect());
        self.root = Some(root);
        #[cfg(feature = "tracing")]
        tracing::debug!(items = self.items.len(), "octree built");
    }

    fn build_node(&self, node: &mut Node<P::Scalar>, indices: Vec<usize>) {
        if indices.len() < self.leaf_threshold
            || node.bounds.diagonal().length_sq() <= self.min_diagonal_sq
        {
            node.items = indices;
            return;
        }

        let mut split: [Vec<usize>; OCTANT_COUNT] = Default::default();
        for i in indices {
            let mask = octant_mask(node.centre, &self.items[i].0.bounds());
            if mask.count_ones() == 1 {
                split[mask.trailing_zeros() as usize].push(i);
            } else {
                node.items.push(i);
            }
        }

        for (octant, indices) in split.into_iter().enumerate() {
            if indices.is_empty() {
                continue;
            }
            let mut child = Node::new(octant_bounds(&node.bounds, octant));
            self.build_node(&mut child, indices);
            node.children[octant] = Some(Box::new(child));
        }
    }

    /// Payloads of every item overlapping `query`. Empty until [`Self::build`]
    /// has run since the last change.
    pub fn query<Q>(&self, query: &Q) -> Vec<T>
    where
        Q: Bounded<Scalar = P::Scalar>,
        P: Overlaps<Q>,
        T: Clone,
    {
        let mut out = Vec::new();
        self.query_into(query, &mut out);
        out
    }

    pub fn query_into<Q>(&self, query: &Q, out: &mut Vec<T>)
    where
        Q: Bounded<Scalar = P::Scalar>,
        P: Overlaps<Q>,
        T: Clone,
    {
        match &self.root {
            Some(root) => self.query_node(root, query, &query.bounds(), out),
            None => {
                #[cfg(feature = "tracing")]
                tracing::debug!(items = self.items.len(), "octree queried before build");
            }
        }
    }

    fn query_node<Q>(&self, node: &Node<P::Scalar>, query: &Q, bounds: &Aabb<Vec3<P::Scalar>>, out: &mut Vec<T>)
    where
        P: Overlaps<Q>,
        T: Clone,
    {
        for &i in &node.items {
            let (primitive, payload) = &self.items[i];
            if primitive.overlaps(query) {
                out.push(payload.clone());
            }
        }
        if node.is_leaf() {
            return;
        }
        let mask = octant_mask(node.centre, bounds);
        for (octant, child) in node.children.iter().enumerate() {
            if let Some(child) = child {
                if mask & (1 << octant) != 0 {
                    self.query_node(child, query, bounds, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeomError;
    use alloc::vec;

    fn cube(lo: f64, hi: f64) -> Aabb<Vec3<f64>> {
        Aabb::new(Vec3::splat(lo), Vec3::splat(hi))
    }

    fn aabb(lo: [f64; 3], hi: [f64; 3]) -> Aabb<Vec3<f64>> {
        Aabb::new(Vec3::new(lo[0], lo[1], lo[2]), Vec3::new(hi[0], hi[1], hi[2]))
    }

    fn sorted(mut v: Vec<usize>) -> Vec<usize> {
        v.sort_unstable();
        v
    }

    #[test]
    fn subcluster_bounds() {
        let tree = Octree::<Aabb<Vec3<f64>>, usize>::new(cube(-1.0, 1.0));
        let expected = [
            ([-1.0, -1.0, -1.0], [0.0, 0.0, 0.0]),
            ([0.0, -1.0, -1.0], [1.0, 0.0, 0.0]),
            ([-1.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [1.0, 1.0, 0.0]),
            ([-1.0, -1.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 1.0]),
            ([-1.0, 0.0, 0.0], [0.0, 1.0, 1.0]),
            ([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]),
        ];
        for (i, (lo, hi)) in expected.into_iter().enumerate() {
            assert_eq!(tree.subcluster_bounds(i), Ok(aabb(lo, hi)));
        }
        assert!(matches!(tree.subcluster_bounds(8), Err(GeomError::OutOfBounds { index: 8, dim: 8 })));
    }

    #[test]
    fn subcluster_by_point() {
        let tree = Octree::<Aabb<Vec3<f64>>, usize>::new(aabb([-10.0, -100.0, -1000.0], [10.0, 100.0, 1000.0]));
        for i in 0..=10 {
            for j in 0..=10 {
                for k in 0..=10 {
                    let p = Vec3::new(
                        -10.0 + 2.0 * i as f64,
                        -100.0 + 20.0 * j as f64,
                        -1000.0 + 200.0 * k as f64,
                    );
                    let octant = tree.subcluster_by_point(p);
                    assert!(tree.subcluster_bounds(octant).unwrap().contains(p));
                }
            }
        }
    }

    #[test]
    fn subcluster_mask() {
        let tree = Octree::<Aabb<Vec3<f64>>, usize>::new(cube(-5.0, 5.0));
        let mask = |lo, hi| tree.subcluster_mask(&aabb(lo, hi));
        assert_eq!(mask([-2.0, -2.0, -2.0], [-1.0, -1.0, -1.0]), 1);
        assert_eq!(mask([1.0, -2.0, -2.0], [2.0, -1.0, -1.0]), 2);
        assert_eq!(mask([-2.0, 1.0, -2.0], [-1.0, 2.0, -1.0]), 4);
        assert_eq!(mask([1.0, 1.0, -2.0], [2.0, 2.0, -1.0]), 8);
        assert_eq!(mask([-2.0, -2.0, 1.0], [-1.0, -1.0, 2.0]), 16);
        assert_eq!(mask([1.0, -2.0, 1.0], [2.0, -1.0, 2.0]), 32);
        assert_eq!(mask([-2.0, 1.0, 1.0], [-1.0, 2.0, 2.0]), 64);
        assert_eq!(mask([1.0, 1.0, 1.0], [2.0, 2.0, 2.0]), 128);

        assert_eq!(mask([-2.0, -2.0, -2.0], [2.0, -1.0, -1.0]), 1 | 2);
        assert_eq!(mask([-2.0, -2.0, -2.0], [-1.0, 2.0, -1.0]), 1 | 4);
        assert_eq!(mask([1.0, -2.0, -2.0], [2.0, 2.0, -1.0]), 2 | 8);
        assert_eq!(mask([-2.0, 1.0, -2.0], [2.0, 2.0, -1.0]), 4 | 8);
        assert_eq!(mask([-2.0, -2.0, 1.0], [2.0, -1.0, 2.0]), 16 | 32);
        assert_eq!(mask([-2.0, -2.0, 1.0], [-1.0, 2.0, 2.0]), 16 | 64);
        assert_eq!(mask([1.0, -2.0, 1.0], [2.0, 2.0, 2.0]), 32 | 128);
        assert_eq!(mask([-2.0, 1.0, 1.0], [2.0, 2.0, 2.0]), 64 | 128);

        assert_eq!(mask([-2.0, -2.0, -2.0], [2.0, 2.0, -1.0]), 0x0f);
        assert_eq!(mask([-2.0, -2.0, 1.0], [2.0, 2.0, 2.0]), 0xf0);
        assert_eq!(mask([-2.0, -2.0, -2.0], [2.0, 2.0, 2.0]), 0xff);
    }

    #[test]
    fn spheres_in_every_octant() {
        let mut tree = Octree::with_limits(cube(-1.0, 1.0), 2, 1.0);
        let mut spheres = Vec::new();
        for i in 0..OCTANT_COUNT {
            let coord = |bit: usize| if i & bit != 0 { 0.5 } else { -0.5 };
            let s = Sphere::new(Vec3::new(coord(X_BIT), coord(Y_BIT), coord(Z_BIT)), 0.1);
            spheres.push(s);
            tree.insert(s, i);
        }
        assert!(tree.is_leaf());
        tree.build();
        assert!(!tree.is_leaf());
        assert_eq!(tree.len(), 8);

        for x in [-0.6, -0.1, 0.0, 0.3, 0.55] {
            for y in [-0.5, 0.0, 0.45] {
                for r in [0.05, 0.2, 0.7] {
                    let query = Sphere::new(Vec3::new(x, y, 0.5 - r), r);
                    let expected: Vec<usize> = (0..spheres.len())
                        .filter(|&i| spheres[i].overlaps(&query))
                        .collect();
                    assert_eq!(sorted(tree.query(&query)), expected);
                }
            }
        }
        assert_eq!(sorted(tree.query(&Sphere::new(Vec3::zero(), 2.0))), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn straddling_items_stay_at_the_root() {
        let mut tree = Octree::with_limits(cube(-4.0, 4.0), 1, 0.1);
        tree.insert(cube(-1.0, 1.0), "centre");
        tree.insert(cube(1.0, 2.0), "corner");
        tree.build();
        assert_eq!(tree.query(&cube(0.5, 0.6)), vec!["centre"]);
        assert_eq!(tree.query(&cube(1.5, 3.0)), vec!["corner"]);
        assert_eq!(sorted_strs(tree.query(&cube(-3.0, 3.0))), vec!["centre", "corner"]);
        assert!(tree.query(&cube(-3.0, -2.0)).is_empty());
    }

    fn sorted_strs(mut v: Vec<&'static str>) -> Vec<&'static str> {
        v.sort_unstable();
        v
    }

    #[test]
    fn triangles_by_box_and_sphere() {
        let mut tree = Octree::with_limits(cube(-1.0, 1.0), 1, 0.01);
        let low = Triangle::new(
            Vec3::new(-0.9, -0.9, -0.5),
            Vec3::new(-0.6, -0.9, -0.5),
            Vec3::new(-0.9, -0.6, -0.5),
        );
        let high = Triangle::new(
            Vec3::new(0.6, 0.6, 0.5),
            Vec3::new(0.9, 0.6, 0.5),
            Vec3::new(0.6, 0.9, 0.5),
        );
        tree.insert(low, 0);
        tree.insert(high, 1);
        tree.build();
        assert_eq!(tree.query(&aabb([-1.0, -1.0, -1.0], [-0.7, -0.7, -0.4])), vec![0]);
        assert_eq!(tree.query(&Sphere::new(Vec3::new(0.7, 0.7, 0.6), 0.2)), vec![1]);
        // inside the bounds of `high` but beyond its hypotenuse
        assert!(tree.query(&Sphere::new(Vec3::new(0.85, 0.85, 0.5), 0.05)).is_empty());
        assert_eq!(tree.query(&high), vec![1]);
    }

    #[test]
    fn queries_need_a_fresh_build() {
        let mut tree = Octree::new(cube(-1.0, 1.0));
        tree.insert(cube(0.0, 0.5), 7u32);
        assert!(!tree.is_built());
        assert!(tree.query(&cube(-1.0, 1.0)).is_empty());
        tree.build();
        assert_eq!(tree.query(&cube(-1.0, 1.0)), vec![7]);

        tree.insert(cube(-0.5, 0.0), 8);
        assert!(tree.query(&cube(-1.0, 1.0)).is_empty());
        tree.build();
        assert_eq!(tree.query(&cube(-1.0, 1.0)).len(), 2);

        tree.clear();
        assert!(tree.is_empty());
        assert!(!tree.is_built());
    }
}
