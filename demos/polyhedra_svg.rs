use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use limitset::render::{Layer, Projection, Renderer, Stroke};
use limitset::{Geometry, LimitSet3D, Settings};

const SEGMENTS: usize = 72;

/// Turns a stroke into a closed or open polyline.
fn polyline(stroke: &Stroke) -> Vec<(f64, f64)> {
    match *stroke {
        Stroke::Segment { from, to } => vec![(from[0], from[1]), (to[0], to[1])],
        Stroke::Circle { center, radius } => ellipse(center, [radius, radius], 0.0),
        Stroke::Ellipse { center, semi_axes, angle } => ellipse(center, semi_axes, angle),
    }
}

fn ellipse(center: [f64; 2], semi_axes: [f64; 2], angle: f64) -> Vec<(f64, f64)> {
    let (sin, cos) = angle.sin_cos();
    (0..=SEGMENTS)
        .map(|i| {
            let t = i as f64 * std::f64::consts::TAU / SEGMENTS as f64;
            let (x, y) = (semi_axes[0] * t.cos(), semi_axes[1] * t.sin());
            (center[0] + cos * x - sin * y, center[1] + sin * x + cos * y)
        })
        .collect()
}

/// Draws straight into a plotters chart, drawing errors are counted.
struct ChartRenderer<'c, 'a, DB: DrawingBackend> {
    chart: &'c mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    failures: usize,
}

impl<DB: DrawingBackend> ChartRenderer<'_, '_, DB> {
    fn path(&mut self, points: Vec<(f64, f64)>, layer: Layer) {
        let style = match layer {
            Layer::Mapping => RED.mix(0.6).stroke_width(2),
            Layer::Image => BLACK.stroke_width(1),
        };
        if self.chart.draw_series(std::iter::once(PathElement::new(points, style))).is_err() {
            self.failures += 1;
        }
    }
}

impl<DB: DrawingBackend> Renderer for ChartRenderer<'_, '_, DB> {
    fn circle(&mut self, center: [f64; 2], radius: f64, layer: Layer) {
        self.path(polyline(&Stroke::Circle { center, radius }), layer);
    }

    fn segment(&mut self, from: [f64; 2], to: [f64; 2], layer: Layer) {
        self.path(polyline(&Stroke::Segment { from, to }), layer);
    }

    fn ellipse(&mut self, center: [f64; 2], semi_axes: [f64; 2], angle: f64, layer: Layer) {
        self.path(polyline(&Stroke::Ellipse { center, semi_axes, angle }), layer);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    for geometry in [Geometry::Tetrahedron, Geometry::Octahedron, Geometry::Cube, Geometry::Icosahedron, Geometry::Dodecahedron] {
        for (projection, suffix, extent) in [(Projection::Orthographic, "ortho", 2.5), (Projection::Stereographic, "stereo", 4.0)] {
            let filename = format!("{}_{}.svg", geometry, suffix);
            run_example(&filename, geometry, projection, extent)?;
        }
    }
    Ok(())
}

fn run_example(filename: &str, geometry: Geometry, projection: Projection, extent: f64) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(filename, (1024, 1024)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root).build_cartesian_2d(-extent..extent, -extent..extent)?;

    let settings = Settings {
        geometry,
        generations: 4,
        max_elements: 20_000,
        ..Settings::default()
    };
    let mut set = LimitSet3D::from_settings(&settings)?;
    set.calculate();

    let mut renderer = ChartRenderer { chart: &mut chart, failures: 0 };
    set.draw(&mut renderer, projection, settings.eps);
    if renderer.failures > 0 {
        println!("{} strokes could not be drawn", renderer.failures);
    }

    root.present()?;
    println!("Saved {} with {} images", filename, set.count());
    Ok(())
}
