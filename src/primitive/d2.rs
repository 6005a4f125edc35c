use crate::primitive::{add_scaled, close, dot, normalize, sub, Image, Inversion, Mapping, EPS};
use crate::triplet;

/// A circle in the plane, used both as mapping primitive and as image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle2D {
    pub(crate) center: [f64; 2],
    pub(crate) radius: f64,
    pub(crate) radius2: f64,
}

impl Circle2D {
    /// The radius is kept as given, mapping sets reject non-positive radii.
    pub fn new(center: [f64; 2], radius: f64) -> Circle2D {
        Circle2D {
            center,
            radius,
            radius2: radius * radius,
        }
    }

    pub fn center(&self) -> [f64; 2] {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn radius2(&self) -> f64 {
        self.radius2
    }

    pub fn equals(&self, other: &Circle2D, eps: f64) -> bool {
        close(&self.center, &other.center, eps) && (self.radius - other.radius).abs() <= eps
    }

    /// True if the circles touch, either outside of each other or one inside the other.
    pub fn touches(&self, other: &Circle2D, eps: f64) -> bool {
        let dx = self.center[0] - other.center[0];
        let dy = self.center[1] - other.center[1];
        let d2 = dx * dx + dy * dy;
        let outer = self.radius + other.radius;
        if (d2 - outer * outer).abs() < eps {
            return true;
        }
        let inner = self.radius - other.radius;
        (d2 - inner * inner).abs() < eps
    }

    /// Image of a point, `None` for the center itself.
    #[cfg(test)]
    pub(crate) fn invert_point(&self, point: &[f64; 2]) -> Option<[f64; 2]> {
        let v = sub(point, &self.center);
        let d2 = dot(&v, &v);
        if d2 == 0.0 {
            return None;
        }
        Some(add_scaled(&self.center, self.radius2 / d2, &v))
    }

    /// Invert a circle at this circle.
    ///
    /// A circle outside gets contracted, a circle inside gets expanded. A circle
    /// passing through the center becomes a line, a circle orthogonal to this one
    /// is `Unchanged`.
    pub fn invert_circle(&self, circle: &Circle2D, eps: f64) -> Inversion<Image2D> {
        let v = sub(&circle.center, &self.center);
        let d2 = dot(&v, &v);
        let power = d2 - circle.radius2;
        if power.abs() < eps {
            // the far point of the circle, at distance 2R, maps to the closest point of the line
            let normal = normalize(&v);
            let d = dot(&normal, &self.center) + 0.5 * self.radius2 / circle.radius;
            return Inversion::Image(Image2D::Line(Line2D::new(normal, d)));
        }
        let factor = self.radius2 / power;
        if (factor - 1.0).abs() < eps {
            return Inversion::Unchanged;
        }
        Inversion::Image(Image2D::Circle(Circle2D::new(
            add_scaled(&self.center, factor, &v),
            factor.abs() * circle.radius,
        )))
    }

    /// Invert a line at this circle. The image is a circle through the center,
    /// a line through the center is `Unchanged`.
    pub fn invert_line(&self, line: &Line2D, eps: f64) -> Inversion<Image2D> {
        let delta = dot(&self.center, &line.normal) - line.d;
        if delta.abs() < eps {
            return Inversion::Unchanged;
        }
        let offset = 0.5 * self.radius2 / delta;
        Inversion::Image(Image2D::Circle(Circle2D::new(
            add_scaled(&self.center, -offset, &line.normal),
            offset.abs(),
        )))
    }

    pub fn invert(&self, image: &Image2D, eps: f64) -> Inversion<Image2D> {
        match image {
            Image2D::Circle(circle) => self.invert_circle(circle, eps),
            Image2D::Line(line) => self.invert_line(line, eps),
        }
    }
}

/// A straight line `normal . p = d` in the plane.
///
/// The normal has unit length and `d >= 0`. Lines through the origin get a normal
/// with positive x component (or positive y component if x vanishes), which makes
/// the representation unique.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line2D {
    pub(crate) normal: [f64; 2],
    pub(crate) d: f64,
}

impl Line2D {
    pub fn new(normal: [f64; 2], d: f64) -> Line2D {
        let len = (normal[0] * normal[0] + normal[1] * normal[1]).sqrt();
        let (mut nx, mut ny, mut d) = if len == 0.0 {
            (1.0, 0.0, d)
        } else {
            (normal[0] / len, normal[1] / len, d / len)
        };
        if d < 0.0 {
            nx = -nx;
            ny = -ny;
            d = -d;
        }
        if d < EPS {
            let flip = if nx.abs() > EPS { nx < 0.0 } else { ny < 0.0 };
            if flip {
                nx = -nx;
                ny = -ny;
            }
        }
        Line2D { normal: [nx, ny], d }
    }

    /// Line through `point` running along `direction`.
    pub fn through(point: [f64; 2], direction: [f64; 2]) -> Line2D {
        let normal = normalize(&[direction[1], -direction[0]]);
        Line2D::new(normal, dot(&normal, &point))
    }

    pub fn normal(&self) -> [f64; 2] {
        self.normal
    }

    /// Distance from the origin.
    pub fn distance(&self) -> f64 {
        self.d
    }

    /// Point of the line closest to the origin.
    pub fn anchor(&self) -> [f64; 2] {
        [self.d * self.normal[0], self.d * self.normal[1]]
    }

    pub fn direction(&self) -> [f64; 2] {
        [-self.normal[1], self.normal[0]]
    }

    pub fn canonical(&self) -> Line2D {
        Line2D::new(self.normal, self.d)
    }

    pub fn equals(&self, other: &Line2D, eps: f64) -> bool {
        close(&self.normal, &other.normal, eps) && (self.d - other.d).abs() <= eps
    }

    /// Two far apart points `anchor -/+ extent * direction`.
    pub fn endpoints(&self, extent: f64) -> ([f64; 2], [f64; 2]) {
        let anchor = self.anchor();
        let direction = self.direction();
        (
            add_scaled(&anchor, -extent, &direction),
            add_scaled(&anchor, extent, &direction),
        )
    }
}

/// An image in the plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Image2D {
    Circle(Circle2D),
    Line(Line2D),
}

impl Image2D {
    pub fn as_circle(&self) -> Option<&Circle2D> {
        match self {
            Image2D::Circle(circle) => Some(circle),
            Image2D::Line(_) => None,
        }
    }

    pub fn as_line(&self) -> Option<&Line2D> {
        match self {
            Image2D::Line(line) => Some(line),
            Image2D::Circle(_) => None,
        }
    }
}

impl Image for Image2D {
    fn equals(&self, other: &Image2D, eps: f64) -> bool {
        match (self, other) {
            (Image2D::Circle(a), Image2D::Circle(b)) => a.equals(b, eps),
            (Image2D::Line(a), Image2D::Line(b)) => a.equals(b, eps),
            _ => false,
        }
    }

    fn radius(&self) -> f64 {
        match self {
            Image2D::Circle(circle) => circle.radius,
            Image2D::Line(_) => f64::INFINITY,
        }
    }
}

impl Mapping<2> for Circle2D {
    type Image = Image2D;

    fn new(center: [f64; 2], radius: f64) -> Self {
        Circle2D::new(center, radius)
    }

    fn center(&self) -> [f64; 2] {
        self.center
    }

    fn radius(&self) -> f64 {
        self.radius
    }

    fn touches(&self, other: &Self, eps: f64) -> bool {
        Circle2D::touches(self, other, eps)
    }

    fn invert(&self, image: &Image2D, eps: f64) -> Inversion<Image2D> {
        Circle2D::invert(self, image, eps)
    }

    fn resolve_triplet(i: &Self, j: &Self, k: &Self, eps: f64) -> Image2D {
        triplet::d2::resolve(i, j, k, eps)
    }
}
