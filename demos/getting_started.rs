//! Minimal walkthrough: index annotations, reload, apply the difference.
//!
//! Run with `cargo run --example getting_started`.

use mapgrid::prelude::*;
use mapgrid::WORLD_SIZE;

#[derive(Debug, Clone)]
struct Cafe {
    id: u32,
    coordinate: Point,
}

impl Annotation for Cafe {
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

fn main() -> Result<()> {
    env_logger::init();

    let config = ClusterConfig::default().with_min_count_for_clustering(3);
    let mut manager = ClusterManagerBuilder::new().config(config).build::<Cafe>()?;

    // A handful of cafes near the center of the map, three of them close
    // enough to share a grid cell when zoomed out.
    let center = WORLD_SIZE / 2.0;
    let cafes = vec![
        Cafe { id: 1, coordinate: Point::new(center + 1_000.0, center + 1_000.0) },
        Cafe { id: 2, coordinate: Point::new(center + 1_040.0, center + 1_020.0) },
        Cafe { id: 3, coordinate: Point::new(center + 970.0, center + 1_010.0) },
        Cafe { id: 4, coordinate: Point::new(center + 90_000.0, center + 1_000.0) },
    ];
    let indexed = manager.add_all(cafes);
    println!("indexed {} cafes", indexed.len());

    // First viewport: zoomed out over all of them.
    let region = Region::new(Point::new(center, center), 250_000.0, 250_000.0);
    let difference = manager.reload(1024.0, region);
    report("zoomed out", &difference);

    // Second viewport: zoomed in tight; the cluster breaks apart.
    let region = Region::new(Point::new(center + 1_000.0, center + 1_000.0), 2_000.0, 2_000.0);
    let difference = manager.reload(1024.0, region);
    report("zoomed in", &difference);

    Ok(())
}

fn report(label: &str, difference: &Difference<Cafe>) {
    println!("{label}:");
    for item in &difference.insertions {
        match item {
            ClusterOrAnnotation::Cluster(cluster) => {
                println!("  + cluster of {} at {:?}", cluster.count(), cluster.coordinate());
            }
            ClusterOrAnnotation::Annotation(cafe) => {
                println!("  + cafe {} at {:?}", cafe.id, cafe.coordinate());
            }
        }
    }
    for item in &difference.removals {
        println!("  - {} annotation(s)", item.count());
    }
}
