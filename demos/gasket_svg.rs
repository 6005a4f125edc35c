use plotters::prelude::*;
use limitset::render::{Layer, Projection, Renderer};
use limitset::{Geometry, LimitSet2D, Settings};

/// Collects every stroke as a polyline in data coordinates.
#[derive(Default)]
pub struct Polylines {
    pub paths: Vec<(Vec<(f64, f64)>, Layer)>,
}

const SEGMENTS: usize = 96;

impl Renderer for Polylines {
    fn circle(&mut self, center: [f64; 2], radius: f64, layer: Layer) {
        self.ellipse(center, [radius, radius], 0.0, layer);
    }

    fn segment(&mut self, from: [f64; 2], to: [f64; 2], layer: Layer) {
        self.paths.push((vec![(from[0], from[1]), (to[0], to[1])], layer));
    }

    fn ellipse(&mut self, center: [f64; 2], semi_axes: [f64; 2], angle: f64, layer: Layer) {
        let (sin, cos) = angle.sin_cos();
        let path = (0..=SEGMENTS)
            .map(|i| {
                let t = i as f64 * std::f64::consts::TAU / SEGMENTS as f64;
                let (x, y) = (semi_axes[0] * t.cos(), semi_axes[1] * t.sin());
                (center[0] + cos * x - sin * y, center[1] + sin * x + cos * y)
            })
            .collect();
        self.paths.push((path, layer));
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    run_example("gasket.svg", Geometry::ApollonianGasket, 2.2)?;
    run_example("planar_octahedron.svg", Geometry::PlanarOctahedron, 2.6)?;
    Ok(())
}

fn run_example(filename: &str, geometry: Geometry, extent: f64) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(filename, (1024, 1024)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root).build_cartesian_2d(-extent..extent, -extent..extent)?;

    let settings = Settings {
        geometry,
        generations: 7,
        min_radius: 0.005,
        max_elements: 50_000,
        ..Settings::default()
    };
    let mut set = LimitSet2D::from_settings(&settings)?;
    let state = set.calculate();
    println!("{}: {} images, {:?}", geometry, set.count(), state);

    let mut polylines = Polylines::default();
    set.draw(&mut polylines, Projection::Orthographic, settings.eps);

    for (path, layer) in polylines.paths {
        let style = match layer {
            Layer::Mapping => RED.stroke_width(2),
            Layer::Image => BLUE.stroke_width(1),
        };
        chart.draw_series(std::iter::once(PathElement::new(path, style)))?;
    }

    root.present()?;
    println!("Saved {}", filename);
    Ok(())
}
