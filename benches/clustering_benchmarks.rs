use criterion::{Criterion, black_box, criterion_group, criterion_main};
use mapgrid::{Annotation, ClusterManager, MapRect, Point, QuadTree, Region, WORLD_SIZE};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone)]
struct Poi {
    id: u32,
    coordinate: Point,
}

impl Annotation for Poi {
    type Id = u32;

    fn id(&self) -> u32 {
        self.id
    }

    fn coordinate(&self) -> Point {
        self.coordinate
    }

    fn set_coordinate(&mut self, coordinate: Point) {
        self.coordinate = coordinate;
    }
}

const CENTER: f64 = WORLD_SIZE / 2.0;
const SPAN: f64 = 200_000.0;

fn uniform_pois(count: u32, seed: u64) -> Vec<Poi> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|id| Poi {
            id,
            coordinate: Point::new(
                CENTER - SPAN / 2.0 + rng.random_range(0.0..SPAN),
                CENTER - SPAN / 2.0 + rng.random_range(0.0..SPAN),
            ),
        })
        .collect()
}

fn benchmark_quadtree(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadtree");

    let pois = uniform_pois(10_000, 42);

    group.bench_function("bulk_insert_10k", |b| {
        b.iter(|| {
            let mut tree: QuadTree<Poi> = QuadTree::default();
            tree.add_all(black_box(pois.clone()))
        })
    });

    let mut tree: QuadTree<Poi> = QuadTree::default();
    tree.add_all(pois.clone());
    let query = MapRect::new(
        CENTER - SPAN / 8.0,
        CENTER - SPAN / 8.0,
        CENTER + SPAN / 8.0,
        CENTER + SPAN / 8.0,
    );

    group.bench_function("range_query_10k", |b| {
        b.iter(|| tree.annotations_in(black_box(&query)))
    });

    group.finish();
}

fn benchmark_reload(c: &mut Criterion) {
    let mut group = c.benchmark_group("clustering");

    let mut manager: ClusterManager<Poi> = ClusterManager::new();
    manager.add_all(uniform_pois(10_000, 7));

    let full = Region::new(Point::new(CENTER, CENTER), SPAN, SPAN);
    group.bench_function("reload_10k", |b| {
        b.iter(|| manager.reload(black_box(1024.0), black_box(full)))
    });

    // Alternate between two viewports so every reload produces a diff.
    let west = Region::new(Point::new(CENTER - SPAN / 4.0, CENTER), SPAN / 2.0, SPAN / 2.0);
    let east = Region::new(Point::new(CENTER + SPAN / 4.0, CENTER), SPAN / 2.0, SPAN / 2.0);
    group.bench_function("reload_pan_10k", |b| {
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let region = if flip { west } else { east };
            manager.reload(black_box(1024.0), black_box(region))
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_quadtree, benchmark_reload);
criterion_main!(benches);
