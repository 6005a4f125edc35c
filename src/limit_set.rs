use crate::error::Result;
use crate::presets;
use crate::primitive::d2::Circle2D;
use crate::primitive::d3::Sphere;
use crate::primitive::{Image, Inversion, Mapping};
use crate::settings::Settings;
use crate::triplet::tangent_triplets;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Progress of a limit set computation.
///
/// The non terminal states name the last generation that has been completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GenerationState {
    /// Nothing computed yet.
    Seed,
    /// Generation 0 holds the circles orthogonal to tangent triplets.
    Gen0,
    /// Generation 1 holds the seeds inverted at the other mapping primitives.
    Gen1,
    /// Generation `n >= 2` is complete.
    GenN(usize),
    /// Generation `generation` pushed the image count above the budget.
    Truncated { generation: usize, count: usize },
    /// All configured generations are complete.
    Complete,
}

impl GenerationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationState::Truncated { .. } | GenerationState::Complete)
    }
}

/// Bookkeeping threaded through the generation steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GenerationContext {
    /// Images produced so far, seeds included.
    pub count: usize,
    /// Maximum number of images, exceeding it stops the computation.
    pub budget: usize,
    /// Number of completed generations.
    pub completed: usize,
}

/// Summary of a finished or interrupted computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub generations: usize,
    pub count: usize,
    pub truncated: bool,
}

/// A generation 0 image. It is stored once and shared by all members of its triplet.
#[derive(Clone, Debug)]
pub struct SeedImage<I> {
    pub image: I,
    /// The middle primitive of the triplet that produced the image.
    pub owner: usize,
    pub triplet: [usize; 3],
}

/// Generator of the images approximating the limit set of a group of inversions.
///
/// Generation 0 is seeded with the circles orthogonal to tangent triplets of mapping
/// primitives. Generation 1 inverts every seed at the mapping primitives other than
/// its owner, without a radius floor. Every later generation inverts the images of the
/// previous generation at all mapping primitives other than the one that produced them,
/// and drops circles smaller than the minimum radius.
pub struct LimitSet<const D: usize, M: Mapping<D>> {
    mappings: Vec<M>,
    generations: usize,
    min_radius: f64,
    eps: f64,
    seeds: Vec<SeedImage<M::Image>>,
    /// Arena indices of the seeds referenced by each mapping primitive.
    seed_refs: Vec<Vec<usize>>,
    /// `derived[g - 1][m]` are the images of generation `g` produced at mapping `m`.
    derived: Vec<Vec<Vec<M::Image>>>,
    state: GenerationState,
    context: GenerationContext,
}

pub type LimitSet2D = LimitSet<2, Circle2D>;
pub type LimitSet3D = LimitSet<3, Sphere>;

impl<const D: usize, M: Mapping<D>> LimitSet<D, M> {
    /// Limit set of user supplied mapping primitives, using the generation parameters of
    /// `settings`. The geometry and scale of `settings` are ignored.
    pub fn new(mappings: Vec<M>, settings: &Settings) -> Result<Self> {
        settings.validate()?;
        presets::validate("custom", &mappings, settings.eps)?;
        Ok(Self::assemble(mappings, settings))
    }

    pub(crate) fn assemble(mappings: Vec<M>, settings: &Settings) -> Self {
        let n = mappings.len();
        Self {
            mappings,
            generations: settings.generations,
            min_radius: settings.min_radius,
            eps: settings.eps,
            seeds: Vec::new(),
            seed_refs: vec![Vec::new(); n],
            derived: Vec::new(),
            state: GenerationState::Seed,
            context: GenerationContext {
                count: 0,
                budget: settings.max_elements,
                completed: 0,
            },
        }
    }

    pub fn mappings(&self) -> &[M] {
        &self.mappings
    }

    pub fn seeds(&self) -> &[SeedImage<M::Image>] {
        &self.seeds
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn context(&self) -> GenerationContext {
        self.context
    }

    /// Total number of images, seeds included.
    pub fn count(&self) -> usize {
        self.context.count
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self.state, GenerationState::Truncated { .. })
    }

    /// Number of configured generations.
    pub fn generations(&self) -> usize {
        self.generations
    }

    pub fn completed_generations(&self) -> usize {
        self.context.completed
    }

    pub fn outcome(&self) -> Outcome {
        Outcome {
            generations: self.context.completed,
            count: self.context.count,
            truncated: self.is_truncated(),
        }
    }

    /// Images of generation `g`, each seed listed once.
    pub fn generation(&self, g: usize) -> Vec<&M::Image> {
        if g == 0 {
            return self.seeds.iter().map(|seed| &seed.image).collect();
        }
        match self.derived.get(g - 1) {
            Some(per_mapping) => per_mapping.iter().flatten().collect(),
            None => Vec::new(),
        }
    }

    /// Images of generation `g` belonging to mapping primitive `m`.
    /// For generation 0 these are the seeds of all triplets containing `m`.
    pub fn images_of(&self, m: usize, g: usize) -> Vec<&M::Image> {
        if g == 0 {
            return match self.seed_refs.get(m) {
                Some(refs) => refs.iter().map(|&index| &self.seeds[index].image).collect(),
                None => Vec::new(),
            };
        }
        self.derived
            .get(g - 1)
            .and_then(|per_mapping| per_mapping.get(m))
            .map(|images| images.iter().collect())
            .unwrap_or_default()
    }

    /// Drop all images and start over from the seeds.
    pub fn reset(&mut self) {
        self.seeds.clear();
        self.seed_refs.iter_mut().for_each(Vec::clear);
        self.derived.clear();
        self.state = GenerationState::Seed;
        self.context.count = 0;
        self.context.completed = 0;
    }

    /// Run all remaining generations.
    pub fn calculate(&mut self) -> GenerationState {
        while !self.state.is_terminal() {
            self.step();
        }
        self.state
    }

    /// Compute the next generation. Does nothing in a terminal state.
    pub fn step(&mut self) -> GenerationState {
        if self.state.is_terminal() {
            return self.state;
        }
        if self.generations == 0 {
            self.state = GenerationState::Complete;
            return self.state;
        }
        let generation = self.context.completed;
        let before = self.context.count;
        let context = match generation {
            0 => self.seed_generation(self.context),
            1 => self.bootstrap_generation(self.context),
            g => self.inversion_generation(g, self.context),
        };
        log::debug!(
            "generation {} produced {} images, {} in total",
            generation,
            context.count - before,
            context.count
        );

        self.context = context;
        self.state = if context.count > context.budget {
            log::info!(
                "stopped after generation {} with {} images, budget is {}",
                generation,
                context.count,
                context.budget
            );
            GenerationState::Truncated {
                generation,
                count: context.count,
            }
        } else if context.completed >= self.generations {
            GenerationState::Complete
        } else {
            match generation {
                0 => GenerationState::Gen0,
                1 => GenerationState::Gen1,
                g => GenerationState::GenN(g),
            }
        };
        self.state
    }

    fn seed_generation(&mut self, mut context: GenerationContext) -> GenerationContext {
        let triplets = tangent_triplets(&self.mappings, self.eps);
        log::debug!("{} tangent triplets", triplets.len());
        for [i, j, k] in triplets {
            let image = M::resolve_triplet(&self.mappings[i], &self.mappings[j], &self.mappings[k], self.eps);
            let index = match self.seeds.iter().position(|seed| seed.image.equals(&image, self.eps)) {
                Some(index) => index,
                None => {
                    self.seeds.push(SeedImage {
                        image,
                        owner: j,
                        triplet: [i, j, k],
                    });
                    context.count += 1;
                    self.seeds.len() - 1
                }
            };
            for m in [i, j, k] {
                if !self.seed_refs[m].contains(&index) {
                    self.seed_refs[m].push(index);
                }
            }
        }
        context.completed += 1;
        context
    }

    fn bootstrap_generation(&mut self, context: GenerationContext) -> GenerationContext {
        let images = self.per_mapping(|m, mapping| {
            let sources = self.seeds.iter().filter(|seed| seed.owner != m).map(|seed| &seed.image);
            invert_all::<D, M, _>(mapping, sources, None, self.eps)
        });
        self.push_generation(images, context)
    }

    fn inversion_generation(&mut self, g: usize, context: GenerationContext) -> GenerationContext {
        let previous = &self.derived[g - 2];
        let images = self.per_mapping(|m, mapping| {
            let sources = previous
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != m)
                .flat_map(|(_, images)| images.iter());
            invert_all::<D, M, _>(mapping, sources, Some(self.min_radius), self.eps)
        });
        self.push_generation(images, context)
    }

    fn push_generation(&mut self, images: Vec<Vec<M::Image>>, mut context: GenerationContext) -> GenerationContext {
        context.count += images.iter().map(Vec::len).sum::<usize>();
        context.completed += 1;
        self.derived.push(images);
        context
    }

    #[cfg(not(feature = "parallel"))]
    fn per_mapping<F>(&self, work: F) -> Vec<Vec<M::Image>>
    where
        F: Fn(usize, &M) -> Vec<M::Image> + Sync,
    {
        self.mappings.iter().enumerate().map(|(m, mapping)| work(m, mapping)).collect()
    }

    #[cfg(feature = "parallel")]
    fn per_mapping<F>(&self, work: F) -> Vec<Vec<M::Image>>
    where
        F: Fn(usize, &M) -> Vec<M::Image> + Sync,
    {
        self.mappings.par_iter().enumerate().map(|(m, mapping)| work(m, mapping)).collect()
    }
}

/// Invert `sources` at `mapping`, keeping images that change and, given a floor,
/// are larger than it. Lines always pass the floor.
fn invert_all<'a, const D: usize, M, S>(mapping: &M, sources: S, floor: Option<f64>, eps: f64) -> Vec<M::Image>
where
    M: Mapping<D>,
    M::Image: 'a,
    S: Iterator<Item = &'a M::Image>,
{
    sources
        .filter_map(|image| match mapping.invert(image, eps) {
            Inversion::Image(inverted) => Some(inverted),
            Inversion::Unchanged => None,
        })
        .filter(|inverted| floor.is_none_or(|min| inverted.radius() > min))
        .collect()
}

impl LimitSet2D {
    /// Limit set of the preset geometry in `settings`, projected to the plane when it is a polyhedron.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let mappings = presets::circles(settings)?;
        Ok(Self::assemble(mappings, settings))
    }
}

impl LimitSet3D {
    /// Limit set of the preset geometry in `settings`, planar geometries are embedded in z = 0.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let mappings = presets::spheres(settings)?;
        Ok(Self::assemble(mappings, settings))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LimitSetError;
    use crate::presets::Geometry;
    use crate::primitive::d2::Image2D;

    fn settings(generations: usize, max_elements: usize) -> Settings {
        Settings {
            generations,
            max_elements,
            ..Settings::default()
        }
    }

    fn assert_distinct<I: Image>(images: &[&I], eps: f64) {
        for (a, first) in images.iter().enumerate() {
            for second in &images[a + 1..] {
                assert!(!first.equals(second, eps), "duplicate image {:?}", first);
            }
        }
    }

    #[test]
    fn test_state_machine() {
        let mut set = LimitSet2D::from_settings(&settings(4, 100_000)).unwrap();
        assert_eq!(set.state(), GenerationState::Seed);
        assert_eq!(set.step(), GenerationState::Gen0);
        assert_eq!(set.step(), GenerationState::Gen1);
        assert_eq!(set.step(), GenerationState::GenN(2));
        assert_eq!(set.step(), GenerationState::Complete);
        assert_eq!(set.step(), GenerationState::Complete);
        assert_eq!(set.completed_generations(), 4);
        assert!(!set.is_truncated());
    }

    #[test]
    fn test_apollonian_first_generations() {
        let mut set = LimitSet2D::from_settings(&settings(2, 1000)).unwrap();
        assert_eq!(set.calculate(), GenerationState::Complete);
        assert_eq!(set.generation(0).len(), 4);
        assert_eq!(set.generation(1).len(), 4);
        assert_eq!(set.count(), 8);
        assert_distinct(&set.generation(0), 1e-3);
        assert_distinct(&set.generation(1), 1e-3);
        // all four circles touch each other, every one belongs to three triplets
        for m in 0..4 {
            assert_eq!(set.images_of(m, 0).len(), 3);
        }
        assert!(set.generation(2).is_empty());
    }

    #[test]
    fn test_count_matches_stored_images() {
        let mut set = LimitSet2D::from_settings(&settings(6, 100_000)).unwrap();
        set.calculate();
        let stored: usize = (0..6).map(|g| set.generation(g).len()).sum();
        assert_eq!(stored, set.count());
        let per_mapping: usize = (0..set.mappings().len()).map(|m| set.images_of(m, 3).len()).sum();
        assert_eq!(per_mapping, set.generation(3).len());
    }

    #[test]
    fn test_budget_truncates() {
        let mut settings = settings(20, 50);
        settings.min_radius = 0.0;
        let mut set = LimitSet2D::from_settings(&settings).unwrap();
        let mut last = 0;
        while !set.state().is_terminal() {
            set.step();
            assert!(set.count() >= last);
            last = set.count();
        }
        match set.state() {
            GenerationState::Truncated { generation, count } => {
                assert_eq!(count, set.count());
                assert!(count > 50);
                assert_eq!(generation + 1, set.completed_generations());
                // the generation before stayed inside the budget
                let before: usize = (0..generation).map(|g| set.generation(g).len()).sum();
                assert!(before <= 50);
            }
            state => panic!("expected truncation, got {:?}", state),
        }
        assert!(set.outcome().truncated);
    }

    #[test]
    fn test_min_radius_floor() {
        let mut settings = settings(6, 100_000);
        settings.min_radius = 0.05;
        let mut set = LimitSet2D::from_settings(&settings).unwrap();
        set.calculate();
        for g in 2..6 {
            for image in set.generation(g) {
                assert!(image.radius() > 0.05);
            }
        }
    }

    #[test]
    fn test_reset_reproduces() {
        let mut set = LimitSet2D::from_settings(&settings(5, 100_000)).unwrap();
        set.calculate();
        let count = set.count();
        set.reset();
        assert_eq!(set.state(), GenerationState::Seed);
        assert_eq!(set.count(), 0);
        assert!(set.generation(0).is_empty());
        set.calculate();
        assert_eq!(set.count(), count);
    }

    #[test]
    fn test_custom_mappings() {
        let h = 3.0f64.sqrt();
        let circles = vec![
            Circle2D::new([-1.0, 0.0], 1.0),
            Circle2D::new([1.0, 0.0], 1.0),
            Circle2D::new([0.0, h], 1.0),
        ];
        let mut set = LimitSet2D::new(circles, &settings(3, 1000)).unwrap();
        set.calculate();
        assert_eq!(set.generation(0).len(), 1);
        // the only seed is orthogonal to all three circles
        assert!(set.generation(1).is_empty());
        assert!(matches!(set.generation(0)[0], Image2D::Circle(_)));
    }

    #[test]
    fn test_rejects_untouching_mappings() {
        let circles = vec![Circle2D::new([0.0, 0.0], 1.0), Circle2D::new([5.0, 0.0], 1.0)];
        let result = LimitSet2D::new(circles, &Settings::default());
        assert!(matches!(result, Err(LimitSetError::InsufficientTangency { .. })));
    }

    #[test]
    fn test_rejects_negative_radius() {
        let h = 3.0f64.sqrt();
        let circles = vec![
            Circle2D::new([-1.0, 0.0], -1.0),
            Circle2D::new([1.0, 0.0], 1.0),
            Circle2D::new([0.0, h], 1.0),
        ];
        match LimitSet2D::new(circles, &Settings::default()) {
            Err(LimitSetError::NonPositiveRadius { index, radius }) => {
                assert_eq!(index, 0);
                assert_eq!(radius, -1.0);
            }
            other => panic!("negative radius should be rejected, got {:?}", other.err()),
        }

        let spheres = vec![Sphere::new([0.0, 0.0, 0.0], 1.0), Sphere::new([2.0, 0.0, 0.0], -1.0)];
        let result = LimitSet3D::new(spheres, &Settings::default());
        assert!(matches!(result, Err(LimitSetError::NonPositiveRadius { index: 1, .. })));
    }

    #[test]
    fn test_zero_generations() {
        let mut set = LimitSet2D::from_settings(&settings(0, 1000)).unwrap();
        assert_eq!(set.step(), GenerationState::Complete);
        assert_eq!(set.count(), 0);
        assert_eq!(set.completed_generations(), 0);
        assert!(set.generation(0).is_empty());
        assert!(set.seeds().is_empty());
        assert_eq!(set.calculate(), GenerationState::Complete);
    }

    #[test]
    fn test_tetrahedron_seeds() {
        let settings = Settings {
            geometry: Geometry::Tetrahedron,
            generations: 3,
            ..Settings::default()
        };
        let mut set = LimitSet3D::from_settings(&settings).unwrap();
        set.calculate();
        assert_eq!(set.generation(0).len(), 4);
        assert_distinct(&set.generation(0), 1e-3);
        assert_distinct(&set.generation(1), 1e-3);
    }
}
