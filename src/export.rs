//! Text export of limit sets as OpenSCAD data.
//!
//! The output defines two vectors. `imageCircles` holds the images as
//! `[[x,y,z],r,[nx,ny,nz]]` for circles and `[[x1,y1,z1],-1,[x2,y2,z2]]` for lines,
//! given by two distant points. `mappingSpheres` holds the mapping primitives as
//! `[[x,y,z],r]`. Planar data is written with `z = 0` and normal `[0,0,1]`.

use crate::limit_set::LimitSet;
use crate::primitive::d2::{Circle2D, Image2D};
use crate::primitive::d3::{Image3D, Sphere};
use crate::primitive::Mapping;

/// Half length of exported line segments.
pub const LINE_HALF_LENGTH: f64 = 10.0;

/// A value that can be written as an entry of the exported vectors.
pub trait ScadEntry {
    /// The entry with positions and radii multiplied by `size`.
    fn scad(&self, size: f64) -> String;
}

/// Formats with four significant digits, switching to exponent notation for very small
/// and large magnitudes.
pub fn prec(x: f64) -> String {
    if x == 0.0 {
        return "0.000".to_string();
    }
    if !x.is_finite() {
        return x.to_string();
    }
    let mut exponent = x.abs().log10().floor() as i32;
    let factor = 10f64.powi(3 - exponent);
    if (x.abs() * factor).round() / factor >= 10f64.powi(exponent + 1) {
        exponent += 1;
    }
    if !(-6..4).contains(&exponent) {
        format!("{:.3e}", x)
    } else {
        format!("{:.*}", (3 - exponent) as usize, x)
    }
}

fn point(p: [f64; 3], size: f64) -> String {
    format!("[{},{},{}]", prec(size * p[0]), prec(size * p[1]), prec(size * p[2]))
}

fn direction(n: [f64; 3]) -> String {
    point(n, 1.0)
}

impl ScadEntry for Circle2D {
    fn scad(&self, size: f64) -> String {
        let [x, y] = self.center();
        format!("[{},{}]", point([x, y, 0.0], size), prec(size * self.radius()))
    }
}

impl ScadEntry for Sphere {
    fn scad(&self, size: f64) -> String {
        format!("[{},{}]", point(self.center(), size), prec(size * self.radius()))
    }
}

impl ScadEntry for Image2D {
    fn scad(&self, size: f64) -> String {
        match self {
            Image2D::Circle(circle) => {
                let [x, y] = circle.center();
                format!(
                    "[{},{},{}]",
                    point([x, y, 0.0], size),
                    prec(size * circle.radius()),
                    direction([0.0, 0.0, 1.0])
                )
            }
            Image2D::Line(line) => {
                let (a, b) = line.endpoints(LINE_HALF_LENGTH);
                format!("[{},-1,{}]", point([a[0], a[1], 0.0], size), point([b[0], b[1], 0.0], size))
            }
        }
    }
}

impl ScadEntry for Image3D {
    fn scad(&self, size: f64) -> String {
        match self {
            Image3D::Circle(circle) => format!(
                "[{},{},{}]",
                point(circle.center(), size),
                prec(size * circle.radius()),
                direction(circle.normal())
            ),
            Image3D::Line(line) => {
                let (a, b) = line.endpoints(LINE_HALF_LENGTH);
                format!("[{},-1,{}]", point(a, size), point(b, size))
            }
        }
    }
}

fn write_vector<'a, T: ScadEntry + 'a>(name: &str, entries: impl Iterator<Item = &'a T>, size: f64, out: &mut String) {
    out.push_str(name);
    out.push_str("=[");
    for (index, entry) in entries.enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push('\n');
        out.push_str(&entry.scad(size));
    }
    out.push_str("\n];");
}

/// Export all completed generations and the mapping primitives.
pub fn to_scad<const D: usize, M>(set: &LimitSet<D, M>, size: f64) -> String
where
    M: Mapping<D> + ScadEntry,
    M::Image: ScadEntry,
{
    let mut out = String::new();
    let images = (0..set.completed_generations()).flat_map(|g| set.generation(g));
    write_vector("imageCircles", images, size, &mut out);
    out.push('\n');
    write_vector("mappingSpheres", set.mappings().iter(), size, &mut out);
    out
}
