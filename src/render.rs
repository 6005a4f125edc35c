//! Adapter between limit sets and drawing backends.
//!
//! Every mapping primitive and image is reduced to a planar [`Stroke`], which a
//! [`Renderer`] draws. Spatial data is either projected orthographically onto the
//! xy-plane or mapped by the stereographic projection that takes the unit sphere to it.

use crate::limit_set::LimitSet;
use crate::presets::stereographic_projector;
use crate::primitive::d2::{Circle2D, Image2D};
use crate::primitive::d3::{Circle3D, Image3D, Line3D, Sphere};
use crate::primitive::{Inversion, Mapping};

/// Half length of the segments standing in for infinite lines.
pub const LINE_EXTENT: f64 = 1000.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Mapping,
    Image,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Projection {
    /// Drop the z coordinate.
    #[default]
    Orthographic,
    /// Invert at the sphere around `(0, 0, 1)` of radius √2 before dropping z.
    Stereographic,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stroke {
    Circle { center: [f64; 2], radius: f64 },
    Segment { from: [f64; 2], to: [f64; 2] },
    /// `angle` is the direction of the first semi axis, counterclockwise from the x-axis.
    Ellipse { center: [f64; 2], semi_axes: [f64; 2], angle: f64 },
}

/// A drawing backend.
pub trait Renderer {
    fn circle(&mut self, center: [f64; 2], radius: f64, layer: Layer);

    fn segment(&mut self, from: [f64; 2], to: [f64; 2], layer: Layer);

    fn ellipse(&mut self, center: [f64; 2], semi_axes: [f64; 2], angle: f64, layer: Layer);

    fn stroke(&mut self, stroke: &Stroke, layer: Layer) {
        match *stroke {
            Stroke::Circle { center, radius } => self.circle(center, radius, layer),
            Stroke::Segment { from, to } => self.segment(from, to, layer),
            Stroke::Ellipse { center, semi_axes, angle } => self.ellipse(center, semi_axes, angle, layer),
        }
    }
}

/// Things that can be reduced to a planar stroke.
pub trait Drawable {
    /// `None` if nothing visible remains, like a line seen end on.
    fn stroke(&self, projection: Projection, eps: f64) -> Option<Stroke>;
}

impl Drawable for Circle2D {
    fn stroke(&self, _: Projection, _: f64) -> Option<Stroke> {
        Some(Stroke::Circle {
            center: self.center(),
            radius: self.radius(),
        })
    }
}

impl Drawable for Image2D {
    fn stroke(&self, projection: Projection, eps: f64) -> Option<Stroke> {
        match self {
            Image2D::Circle(circle) => circle.stroke(projection, eps),
            Image2D::Line(line) => {
                let (from, to) = line.endpoints(LINE_EXTENT);
                Some(Stroke::Segment { from, to })
            }
        }
    }
}

fn flatten(p: [f64; 3]) -> [f64; 2] {
    [p[0], p[1]]
}

fn orthographic_circle(circle: &Circle3D, eps: f64) -> Stroke {
    let center = flatten(circle.center());
    let [nx, ny, nz] = circle.normal();
    let tilt = (nx * nx + ny * ny).sqrt();
    if tilt < eps {
        return Stroke::Circle {
            center,
            radius: circle.radius(),
        };
    }
    // the major axis is the horizontal diameter, perpendicular to the projected normal
    let axis = [ny / tilt, -nx / tilt];
    let minor = circle.radius() * nz.abs();
    if minor < eps {
        let r = circle.radius();
        return Stroke::Segment {
            from: [center[0] - r * axis[0], center[1] - r * axis[1]],
            to: [center[0] + r * axis[0], center[1] + r * axis[1]],
        };
    }
    Stroke::Ellipse {
        center,
        semi_axes: [circle.radius(), minor],
        angle: axis[1].atan2(axis[0]),
    }
}

fn orthographic_line(line: &Line3D, eps: f64) -> Option<Stroke> {
    let d = line.direction();
    if d[0] * d[0] + d[1] * d[1] < eps * eps {
        return None;
    }
    let (from, to) = line.endpoints(LINE_EXTENT);
    Some(Stroke::Segment {
        from: flatten(from),
        to: flatten(to),
    })
}

fn orthographic(image: &Image3D, eps: f64) -> Option<Stroke> {
    match image {
        Image3D::Circle(circle) => Some(orthographic_circle(circle, eps)),
        Image3D::Line(line) => orthographic_line(line, eps),
    }
}

impl Drawable for Image3D {
    fn stroke(&self, projection: Projection, eps: f64) -> Option<Stroke> {
        match projection {
            Projection::Orthographic => orthographic(self, eps),
            Projection::Stereographic => match stereographic_projector().invert(self, eps) {
                Inversion::Image(image) => orthographic(&image, eps),
                Inversion::Unchanged => orthographic(self, eps),
            },
        }
    }
}

impl Drawable for Sphere {
    fn stroke(&self, projection: Projection, eps: f64) -> Option<Stroke> {
        let sphere = match projection {
            Projection::Orthographic => *self,
            // a sphere through the projection center becomes a plane, not drawn
            Projection::Stereographic => stereographic_projector().invert_sphere(self, eps)?,
        };
        Some(Stroke::Circle {
            center: flatten(sphere.center()),
            radius: sphere.radius(),
        })
    }
}

impl<const D: usize, M> LimitSet<D, M>
where
    M: Mapping<D> + Drawable,
    M::Image: Drawable,
{
    /// Draw the mapping primitives, then the images of all completed generations.
    /// Planar limit sets ignore the projection.
    pub fn draw<R: Renderer>(&self, renderer: &mut R, projection: Projection, eps: f64) {
        for mapping in self.mappings() {
            if let Some(stroke) = mapping.stroke(projection, eps) {
                renderer.stroke(&stroke, Layer::Mapping);
            }
        }
        for g in 0..self.completed_generations() {
            for image in self.generation(g) {
                if let Some(stroke) = image.stroke(projection, eps) {
                    renderer.stroke(&stroke, Layer::Image);
                }
            }
        }
    }
}
