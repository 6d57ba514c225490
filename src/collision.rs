//! Swept collision between moving spheres and static geometry.

use crate::{Line, Obb2, Scalar, Sphere, Vec2, Vector};

/// Outcome of a swept collision query.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContactInfo<V: Vector> {
    pub happened: bool,
    /// The shapes already overlapped at `time == 0`.
    pub penetrated: bool,
    pub position: V,
    /// Unit contact normal, pointing towards the moving shape.
    pub normal: V,
    /// Multiple of the velocity at first contact.
    pub time: V::Scalar,
    pub penetration_depth: V::Scalar,
}

impl<V: Vector> ContactInfo<V> {
    /// No contact.
    pub fn none() -> Self {
        let zero = <V::Scalar as Scalar>::ZERO;
        Self {
            happened: false,
            penetrated: false,
            position: V::default(),
            normal: V::default(),
            time: zero,
            penetration_depth: zero,
        }
    }

    pub fn touching(position: V, normal: V, time: V::Scalar) -> Self {
        Self { happened: true, position, normal, time, ..Self::none() }
    }

    pub fn penetrating(position: V, normal: V, depth: V::Scalar) -> Self {
        Self {
            happened: true,
            penetrated: true,
            position,
            normal,
            penetration_depth: depth,
            ..Self::none()
        }
    }

    /// Ranking used to keep the most relevant of several contacts.
    ///
    /// A contact that did not happen is worse than any that did, a
    /// non-penetrating contact is worse than a penetrating one, a deeper
    /// penetration is worse than a shallower one and otherwise the later
    /// contact is worse.
    pub fn worse_than(&self, other: &ContactInfo<V>) -> bool {
        if !other.happened {
            return false;
        }
        if !self.happened {
            return true;
        }
        match (self.penetrated, other.penetrated) {
            (false, true) => true,
            (true, true) => self.penetration_depth > other.penetration_depth,
            _ => self.time > other.time,
        }
    }
}

impl<V: Vector> Default for ContactInfo<V> {
    fn default() -> Self {
        Self::none()
    }
}

/// Unit vector along `v`, or zero when `v` is zero.
fn direction<V: Vector>(v: V) -> V {
    let len = v.length();
    if len > <V::Scalar as Scalar>::ZERO {
        v.scaled(len.recip())
    } else {
        V::default()
    }
}

/// Earliest `t >= 0` with `|m + v t|^2 = r^2`, given `a = v.v`,
/// `b = 2 m.v` and `c = m.m - r^2 >= 0`.
fn first_root<S: Scalar>(a: S, b: S, c: S) -> Option<S> {
    if a <= S::ZERO {
        return None;
    }
    let disc = b * b - S::TWO * S::TWO * a * c;
    if disc < S::ZERO {
        return None;
    }
    let t = (-b - disc.sqrt()) / (S::TWO * a);
    (t >= S::ZERO).then_some(t)
}

/// Sweep `moving` along `velocity` against the static `still` sphere.
///
/// On contact, `position` is the centre of the moving sphere at that time
/// and `normal` points from the still centre towards it.
pub fn collide_sphere_sphere<V: Vector>(
    still: &Sphere<V>,
    moving: &Sphere<V>,
    velocity: V,
) -> ContactInfo<V> {
    let reach = still.radius + moving.radius;
    let d = moving.centre - still.centre;
    let dist_sq = d.length_sq();
    if dist_sq < reach * reach {
        let dist = dist_sq.sqrt();
        return ContactInfo::penetrating(moving.centre, direction(d), reach - dist);
    }

    let two = <V::Scalar as Scalar>::TWO;
    match first_root(velocity.dot(velocity), two * d.dot(velocity), dist_sq - reach * reach) {
        Some(t) => {
            let position = moving.centre + velocity.scaled(t);
            ContactInfo::touching(position, direction(position - still.centre), t)
        }
        None => ContactInfo::none(),
    }
}

/// Sweep `sphere` along `velocity` against the static segment `line`.
///
/// On contact, `position` is the touched point of the segment and `normal`
/// points from it towards the sphere centre.
pub fn collide_line_sphere<V: Vector>(
    line: &Line<V>,
    sphere: &Sphere<V>,
    velocity: V,
) -> ContactInfo<V> {
    let zero = <V::Scalar as Scalar>::ZERO;
    let one = <V::Scalar as Scalar>::ONE;
    let two = <V::Scalar as Scalar>::TWO;
    let r_sq = sphere.radius * sphere.radius;

    let start = line.closest_point(sphere.centre);
    let dist_sq = start.distance_sq(sphere.centre);
    if dist_sq < r_sq {
        let normal = direction(sphere.centre - start);
        return ContactInfo::penetrating(start, normal, sphere.radius - dist_sq.sqrt());
    }

    let mut best: Option<V::Scalar> = None;
    let mut consider = |t: Option<V::Scalar>| {
        if let Some(t) = t {
            if best.map_or(true, |b| t < b) {
                best = Some(t);
            }
        }
    };

    // side of the segment: distance to the supporting line only
    let e = line.direction();
    let len_sq = e.length_sq();
    if len_sq > zero {
        let perp = |w: V| w - e.scaled(w.dot(e) / len_sq);
        let m = perp(sphere.centre - line.a);
        let v = perp(velocity);
        let c = m.length_sq() - r_sq;
        if c >= zero {
            let t = first_root(v.length_sq(), two * m.dot(v), c).filter(|&t| {
                let centre = sphere.centre + velocity.scaled(t);
                let s = (centre - line.a).dot(e) / len_sq;
                s >= zero && s <= one
            });
            consider(t);
        }
    }

    // end caps
    for q in [line.a, line.b] {
        let m = sphere.centre - q;
        consider(first_root(
            velocity.length_sq(),
            two * m.dot(velocity),
            m.length_sq() - r_sq,
        ));
    }

    match best {
        Some(t) => {
            let centre = sphere.centre + velocity.scaled(t);
            let position = line.closest_point(centre);
            ContactInfo::touching(position, direction(centre - position), t)
        }
        None => ContactInfo::none(),
    }
}

/// Sweep `sphere` along `velocity` against the static planar box `obb`.
///
/// Every side is swept as a segment and the most relevant contact is kept.
/// A centre already inside the box penetrates through the nearest side,
/// with the outward normal of that side.
pub fn collide_obb_sphere<S: Scalar>(
    obb: &Obb2<S>,
    sphere: &Sphere<Vec2<S>>,
    velocity: Vec2<S>,
) -> ContactInfo<Vec2<S>> {
    let inside = obb.contains(sphere.centre);
    let mut best = ContactInfo::none();
    for i in 0..Obb2::<S>::SIDE_COUNT {
        let side = Line::new(obb.vertex(i), obb.vertex(i + 1));
        let contact = if inside {
            let position = side.closest_point(sphere.centre);
            let depth = sphere.radius + position.distance(sphere.centre);
            ContactInfo::penetrating(position, obb.outward_normal(&side), depth)
        } else {
            collide_line_sphere(&side, sphere, velocity)
        };
        if best.worse_than(&contact) {
            best = contact;
        }
    }
    best
}
