use crate::primitive::{
    add_scaled, close, cross, dot, normalize, sub, Image, Inversion, Mapping, SIGN_EPS,
};
use crate::triplet;

/// Normalizes a direction and makes it unique: the first component with a
/// magnitude larger than `SIGN_EPS` is positive.
fn canonical_direction(v: &[f64; 3]) -> [f64; 3] {
    let n = normalize(v);
    match n.iter().find(|c| c.abs() > SIGN_EPS) {
        Some(c) if *c < 0.0 => n.map(|x| -x),
        _ => n,
    }
}

/// A sphere, the mapping primitive in 3D.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub(crate) center: [f64; 3],
    pub(crate) radius: f64,
    pub(crate) radius2: f64,
}

impl Sphere {
    /// The radius is kept as given, mapping sets reject non-positive radii.
    pub fn new(center: [f64; 3], radius: f64) -> Sphere {
        Sphere {
            center,
            radius,
            radius2: radius * radius,
        }
    }

    pub fn center(&self) -> [f64; 3] {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn equals(&self, other: &Sphere, eps: f64) -> bool {
        close(&self.center, &other.center, eps) && (self.radius - other.radius).abs() <= eps
    }

    /// True if the spheres touch, either outside of each other or one inside the other.
    pub fn touches(&self, other: &Sphere, eps: f64) -> bool {
        let v = sub(&self.center, &other.center);
        let d2 = dot(&v, &v);
        let outer = self.radius + other.radius;
        if (d2 - outer * outer).abs() < eps {
            return true;
        }
        let inner = self.radius - other.radius;
        (d2 - inner * inner).abs() < eps
    }

    /// Image of a point, `None` for the center itself.
    #[cfg(test)]
    pub(crate) fn invert_point(&self, point: &[f64; 3]) -> Option<[f64; 3]> {
        let v = sub(point, &self.center);
        let d2 = dot(&v, &v);
        if d2 == 0.0 {
            return None;
        }
        Some(add_scaled(&self.center, self.radius2 / d2, &v))
    }

    /// Image of another sphere, `None` if it passes through the center (the image is a plane).
    pub fn invert_sphere(&self, sphere: &Sphere, eps: f64) -> Option<Sphere> {
        let v = sub(&sphere.center, &self.center);
        let power = dot(&v, &v) - sphere.radius2;
        if power.abs() < eps {
            return None;
        }
        let factor = self.radius2 / power;
        Some(Sphere::new(
            add_scaled(&self.center, factor, &v),
            factor.abs() * sphere.radius,
        ))
    }

    /// Invert a circle at this sphere.
    ///
    /// The circle is the intersection of its plane and of the sphere with the same
    /// center and radius. Both are inverted separately and the image circle is the
    /// intersection of their images.
    pub fn invert_circle(&self, circle: &Circle3D, eps: f64) -> Inversion<Image3D> {
        let v = sub(&circle.center, &self.center);
        let d2 = dot(&v, &v);
        let power = d2 - circle.radius2;
        let to_plane = dot(&circle.normal, &v);

        if to_plane.abs() < eps {
            // plane through the center: it maps to itself and we have a planar inversion
            if power.abs() < eps {
                // circle through the center, the image of its far point lies on the line
                let point = add_scaled(&self.center, 0.5 * self.radius2 / circle.radius2, &v);
                let direction = cross(&v, &circle.normal);
                return Inversion::Image(Image3D::Line(Line3D::new(point, direction)));
            }
            let factor = self.radius2 / power;
            if (factor - 1.0).abs() < eps {
                return Inversion::Unchanged;
            }
            return Inversion::Image(Image3D::Circle(Circle3D::new(
                add_scaled(&self.center, factor, &v),
                factor.abs() * circle.radius,
                circle.normal,
            )));
        }

        // the plane maps to a sphere through the center, from the image of its closest point
        let plane_offset = 0.5 * self.radius2 / to_plane;
        let plane_center = add_scaled(&self.center, plane_offset, &circle.normal);
        let plane_radius = plane_offset.abs();

        let image = if power.abs() < eps {
            // the sphere of the circle passes through the center and maps to a plane
            let dist = d2.sqrt();
            let normal = v.map(|c| c / dist);
            let anchor = add_scaled(&self.center, 0.5 * self.radius2 / circle.radius, &normal);
            let offset = dot(&normal, &sub(&anchor, &plane_center));
            let radius = (plane_radius * plane_radius - offset * offset).max(0.0).sqrt();
            Circle3D::new(add_scaled(&plane_center, offset, &normal), radius, normal)
        } else {
            let factor = self.radius2 / power;
            let sphere_center = add_scaled(&self.center, factor, &v);
            let sphere_radius = factor.abs() * circle.radius;
            let w = sub(&plane_center, &sphere_center);
            let dist2 = dot(&w, &w);
            let dist = dist2.sqrt();
            if dist < eps {
                // concentric image spheres only meet if they coincide
                Circle3D::new(sphere_center, sphere_radius, circle.normal)
            } else {
                let axis = w.map(|c| c / dist);
                let cos_alpha = (0.5
                    * (sphere_radius * sphere_radius + dist2 - plane_radius * plane_radius)
                    / (sphere_radius * dist))
                    .clamp(-1.0, 1.0);
                let radius = sphere_radius * (1.0 - cos_alpha * cos_alpha).sqrt();
                let center = add_scaled(&sphere_center, cos_alpha * sphere_radius, &axis);
                Circle3D::new(center, radius, axis)
            }
        };

        if image.equals(circle, eps) {
            Inversion::Unchanged
        } else {
            Inversion::Image(Image3D::Circle(image))
        }
    }

    /// Invert a line at this sphere. The image is a circle through the center,
    /// lying in the plane spanned by the line and the center.
    /// A line through the center is `Unchanged`.
    pub fn invert_line(&self, line: &Line3D, eps: f64) -> Inversion<Image3D> {
        let w = sub(&line.anchor, &self.center);
        let normal = cross(&line.direction, &w);
        if dot(&normal, &normal) < eps {
            return Inversion::Unchanged;
        }
        let along = dot(&line.direction, &w);
        let perp = add_scaled(&w, -along, &line.direction);
        let dist = dot(&perp, &perp).sqrt();
        let radius = 0.5 * self.radius2 / dist;
        let center = add_scaled(&self.center, radius / dist, &perp);
        Inversion::Image(Image3D::Circle(Circle3D::new(center, radius, normal)))
    }

    pub fn invert(&self, image: &Image3D, eps: f64) -> Inversion<Image3D> {
        match image {
            Image3D::Circle(circle) => self.invert_circle(circle, eps),
            Image3D::Line(line) => self.invert_line(line, eps),
        }
    }
}

/// A circle in space: center, radius and the unit normal of its plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle3D {
    pub(crate) center: [f64; 3],
    pub(crate) radius: f64,
    pub(crate) radius2: f64,
    pub(crate) normal: [f64; 3],
}

impl Circle3D {
    pub fn new(center: [f64; 3], radius: f64, normal: [f64; 3]) -> Circle3D {
        let radius = radius.abs();
        Circle3D {
            center,
            radius,
            radius2: radius * radius,
            normal: canonical_direction(&normal),
        }
    }

    pub fn center(&self) -> [f64; 3] {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn normal(&self) -> [f64; 3] {
        self.normal
    }

    pub fn canonical(&self) -> Circle3D {
        Circle3D::new(self.center, self.radius, self.normal)
    }

    pub fn equals(&self, other: &Circle3D, eps: f64) -> bool {
        close(&self.center, &other.center, eps)
            && (self.radius - other.radius).abs() <= eps
            && close(&self.normal, &other.normal, eps)
    }
}

/// A line in space, given by its unit direction and the point closest to the origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line3D {
    pub(crate) direction: [f64; 3],
    pub(crate) anchor: [f64; 3],
}

impl Line3D {
    /// Line through `point` along `direction`.
    pub fn new(point: [f64; 3], direction: [f64; 3]) -> Line3D {
        let direction = canonical_direction(&direction);
        let along = dot(&direction, &point);
        Line3D {
            direction,
            anchor: add_scaled(&point, -along, &direction),
        }
    }

    pub fn direction(&self) -> [f64; 3] {
        self.direction
    }

    pub fn anchor(&self) -> [f64; 3] {
        self.anchor
    }

    pub fn canonical(&self) -> Line3D {
        Line3D::new(self.anchor, self.direction)
    }

    pub fn equals(&self, other: &Line3D, eps: f64) -> bool {
        close(&self.direction, &other.direction, eps) && close(&self.anchor, &other.anchor, eps)
    }

    /// Two far apart points `anchor +/- extent * direction`.
    pub fn endpoints(&self, extent: f64) -> ([f64; 3], [f64; 3]) {
        (
            add_scaled(&self.anchor, extent, &self.direction),
            add_scaled(&self.anchor, -extent, &self.direction),
        )
    }
}

/// An image in space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Image3D {
    Circle(Circle3D),
    Line(Line3D),
}

impl Image3D {
    pub fn as_circle(&self) -> Option<&Circle3D> {
        match self {
            Image3D::Circle(circle) => Some(circle),
            Image3D::Line(_) => None,
        }
    }

    pub fn as_line(&self) -> Option<&Line3D> {
        match self {
            Image3D::Line(line) => Some(line),
            Image3D::Circle(_) => None,
        }
    }
}

impl Image for Image3D {
    fn equals(&self, other: &Image3D, eps: f64) -> bool {
        match (self, other) {
            (Image3D::Circle(a), Image3D::Circle(b)) => a.equals(b, eps),
            (Image3D::Line(a), Image3D::Line(b)) => a.equals(b, eps),
            _ => false,
        }
    }

    fn radius(&self) -> f64 {
        match self {
            Image3D::Circle(circle) => circle.radius,
            Image3D::Line(_) => f64::INFINITY,
        }
    }
}

impl Mapping<3> for Sphere {
    type Image = Image3D;

    fn new(center: [f64; 3], radius: f64) -> Self {
        Sphere::new(center, radius)
    }

    fn center(&self) -> [f64; 3] {
        self.center
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn touches(&self, other: &Self, eps: f64) -> bool {
        Sphere::touches(self, other, eps)
    }

    fn invert(&self, image: &Image3D, eps: f64) -> Inversion<Image3D> {
        Sphere::invert(self, image, eps)
    }

    fn resolve_triplet(i: &Self, j: &Self, k: &Self, eps: f64) -> Image3D {
        triplet::d3::resolve(i, j, k, eps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::EPS;

    fn points_on(circle: &Circle3D, count: usize) -> Vec<[f64; 3]> {
        let helper = if circle.normal[0].abs() < 0.9 { [1.0, 0.0, 0.0] } else { [0.0, 1.0, 0.0] };
        let e1 = normalize(&cross(&circle.normal, &helper));
        let e2 = cross(&circle.normal, &e1);
        (0..count)
            .map(|k| {
                let t = k as f64 * std::f64::consts::TAU / count as f64;
                let p = add_scaled(&circle.center, circle.radius * t.cos(), &e1);
                add_scaled(&p, circle.radius * t.sin(), &e2)
            })
            .collect()
    }

    fn assert_on_circle(point: &[f64; 3], circle: &Circle3D) {
        let v = sub(point, &circle.center);
        assert!(dot(&v, &circle.normal).abs() < 1e-9, "point {:?} off the plane of {:?}", point, circle);
        assert!((dot(&v, &v).sqrt() - circle.radius).abs() < 1e-9, "point {:?} off {:?}", point, circle);
    }

    fn check_pointwise(inverter: &Sphere, circle: &Circle3D) -> Circle3D {
        let image = *inverter
            .invert_circle(circle, EPS)
            .image()
            .expect("image")
            .as_circle()
            .expect("circle");
        for p in points_on(circle, 12) {
            assert_on_circle(&inverter.invert_point(&p).unwrap(), &image);
        }
        image
    }

    #[test]
    fn test_canonical_direction() {
        let l = Line3D::new([1.0, 2.0, 3.0], [-2.0, 0.0, 0.0]);
        assert_eq!(l.direction(), [1.0, 0.0, 0.0]);
        assert!((l.anchor()[0]).abs() < 1e-12);
        assert!(l.canonical().equals(&l, 1e-12));

        let small_x = Line3D::new([0.0, 0.0, 0.0], [0.05, -1.0, 0.0]);
        assert!(small_x.direction()[1] > 0.0);

        let c = Circle3D::new([0.0, 0.0, 0.0], 1.0, [0.0, 0.0, -3.0]);
        assert_eq!(c.normal(), [0.0, 0.0, 1.0]);
        assert!(c.canonical().equals(&c, 1e-12));
    }

    #[test]
    fn test_image_equality() {
        let c = Image3D::Circle(Circle3D::new([1.0, 0.0, 0.0], 1.0, [0.0, 0.0, 1.0]));
        let l = Image3D::Line(Line3D::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]));
        assert!(c.equals(&c, EPS) && l.equals(&l, EPS));
        assert!(!c.equals(&l, EPS) && !l.equals(&c, EPS));
    }

    #[test]
    fn test_sphere_touches() {
        let a = Sphere::new([0.0, 0.0, 0.0], 1.0);
        let b = Sphere::new([0.0, 0.0, 3.0], 2.0);
        let c = Sphere::new([0.0, 0.5, 0.0], 0.5);
        assert!(a.touches(&b, EPS) && b.touches(&a, EPS));
        assert!(a.touches(&c, EPS) && c.touches(&a, EPS));
        assert!(!b.touches(&c, EPS) && !c.touches(&b, EPS));
    }

    #[test]
    fn test_circle_in_plane_through_center() {
        let inverter = Sphere::new([0.0, 0.0, 0.0], 2.0);
        let circle = Circle3D::new([3.0, 1.0, 0.0], 1.0, [0.0, 0.0, 1.0]);
        let image = check_pointwise(&inverter, &circle);
        assert_eq!(image.normal(), [0.0, 0.0, 1.0]);
        let back = inverter.invert_circle(&image, EPS).image().unwrap();
        assert!(back.equals(&Image3D::Circle(circle), 1e-9));
    }

    #[test]
    fn test_circle_through_center_becomes_line() {
        let inverter = Sphere::new([0.0, 0.0, 0.0], 2.0);
        let circle = Circle3D::new([0.0, 1.0, 0.0], 1.0, [1.0, 0.0, 0.0]);
        let image = inverter.invert_circle(&circle, EPS).image().unwrap();
        let line = image.as_line().expect("line");
        // the far point (0, 2, 0) is fixed
        assert!(line.equals(&Line3D::new([0.0, 2.0, 0.0], [0.0, 0.0, 1.0]), 1e-9));

        let back = inverter.invert_line(line, EPS).image().unwrap();
        assert!(back.equals(&Image3D::Circle(circle), 1e-9));
    }

    #[test]
    fn test_general_circle() {
        let inverter = Sphere::new([0.5, -0.5, 0.0], 2.0);
        let circle = Circle3D::new([3.0, 1.0, 2.0], 1.0, [1.0, 2.0, 2.0]);
        let image = check_pointwise(&inverter, &circle);
        let back = inverter.invert_circle(&image, EPS).image().unwrap();
        assert!(back.equals(&Image3D::Circle(circle), 1e-9));
    }

    #[test]
    fn test_circle_on_sphere_through_center() {
        // the sphere of the circle passes through the center, its plane does not
        let inverter = Sphere::new([0.0, 0.0, 0.0], 1.0);
        let circle = Circle3D::new([1.0, 0.0, 0.0], 1.0, [1.0, 1.0, 0.0]);
        check_pointwise(&inverter, &circle);
    }

    #[test]
    fn test_orthogonal_circle_is_unchanged() {
        let inverter = Sphere::new([0.0, 0.0, 0.0], 1.0);
        let circle = Circle3D::new([2.0, 0.0, 0.0], 3.0f64.sqrt(), [0.0, 1.0, 0.0]);
        assert!(inverter.invert_circle(&circle, EPS).is_unchanged());
    }

    #[test]
    fn test_invert_line() {
        let inverter = Sphere::new([0.0, 0.0, 0.0], 1.0);
        let line = Line3D::new([0.0, 0.0, 1.0], [1.0, 0.0, 0.0]);
        let image = inverter.invert_line(&line, EPS).image().unwrap();
        let expected = Circle3D::new([0.0, 0.0, 0.5], 0.5, [0.0, 1.0, 0.0]);
        assert!(image.equals(&Image3D::Circle(expected), 1e-12));

        let through = Line3D::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        assert!(inverter.invert_line(&through, EPS).is_unchanged());
    }

    #[test]
    fn test_invert_sphere() {
        let inverter = Sphere::new([0.0, 0.0, 1.0], 2.0f64.sqrt());
        let unit = Sphere::new([0.0, 0.0, 0.0], 1.0);
        // the unit sphere passes through the center of the inverter
        assert!(inverter.invert_sphere(&unit, EPS).is_none());

        let s = Sphere::new([0.0, 0.0, -1.0], 0.5);
        let image = inverter.invert_sphere(&s, EPS).unwrap();
        let back = inverter.invert_sphere(&image, EPS).unwrap();
        assert!(back.equals(&s, 1e-9));
    }
}
