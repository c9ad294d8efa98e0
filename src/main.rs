//! Renders a procedural voxel scene as ASCII art through the BVH, the S64 tree, or both.

use std::time::Instant;

use clap::{Parser, ValueEnum};
use log::info;

use voxely::{
    trace_rows, Aabb, BoundingHierarchy, Bvh, HitRecord, Point3, Ray, Real, S64Tree, Vector3,
    VoxelGrid,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Structure {
    Bvh,
    S64,
    Both,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Pattern {
    /// A ball centered in the grid
    Sphere,
    /// Porous value noise
    Sponge,
    /// Every cell occupied
    Solid,
}

#[derive(Parser)]
#[command(name = "voxely-trace", about = "Trace a voxel scene and print it as ASCII art")]
struct Cli {
    /// Edge length of the voxel grid, a power of four
    #[arg(long, default_value_t = 64)]
    grid: usize,
    /// Image width in characters
    #[arg(long, default_value_t = 80)]
    width: usize,
    /// Image height in characters
    #[arg(long, default_value_t = 40)]
    height: usize,
    /// Acceleration structure to trace
    #[arg(long, value_enum, default_value_t = Structure::Both)]
    structure: Structure,
    /// Scene to fill the grid with
    #[arg(long, value_enum, default_value_t = Pattern::Sponge)]
    pattern: Pattern,
}

/// Characters for increasing distance.
const SHADES: &[u8] = b"@%#*+=-:.";

fn build_grid(size: usize, pattern: Pattern) -> voxely::Result<VoxelGrid> {
    let mut grid = VoxelGrid::new(size)?;
    match pattern {
        Pattern::Sphere => grid.fill_sphere(size as Real * 0.4, 1),
        Pattern::Sponge => grid.fill_sponge(10.0, 0.45, 1),
        Pattern::Solid => grid.fill_cube([size / 2; 3], size / 2, 1),
    }
    Ok(grid)
}

/// Pinhole camera looking at the center of the unit cube from the front and above.
fn camera(width: usize, height: usize) -> impl Fn(usize, usize) -> Ray + Sync {
    let eye = Point3::new(0.5, 1.4, -1.6);
    let forward = (Point3::new(0.5, 0.5, 0.5) - eye).normalize();
    let right = Vector3::y().cross(&forward).normalize();
    let up = forward.cross(&right);
    // Terminal cells are about twice as high as wide.
    let aspect = width as Real / (2.0 * height.max(1) as Real);
    move |x, y| {
        let u = ((x as Real + 0.5) / width as Real * 2.0 - 1.0) * aspect * 0.6;
        let v = (1.0 - (y as Real + 0.5) / height as Real * 2.0) * 0.6;
        Ray::new(eye, forward + right * u + up * v)
    }
}

fn render<P>(hits: &[HitRecord<P>], width: usize) -> String {
    let (near, far) = hits
        .iter()
        .filter(|hit| hit.hit)
        .fold((Real::MAX, Real::MIN), |(lo, hi), hit| (lo.min(hit.t), hi.max(hit.t)));
    let range = (far - near).max(Real::EPSILON);

    let mut out = String::with_capacity(hits.len() + hits.len() / width.max(1));
    for row in hits.chunks(width.max(1)) {
        for hit in row {
            let c = if hit.hit {
                let shade = ((hit.t - near) / range * (SHADES.len() - 1) as Real) as usize;
                SHADES[shade.min(SHADES.len() - 1)] as char
            } else {
                ' '
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}

fn trace<H: BoundingHierarchy>(
    name: &str,
    hierarchy: &H,
    cli: &Cli,
) -> Vec<HitRecord<H::Payload>> {
    let start = Instant::now();
    let hits = trace_rows(hierarchy, cli.width, cli.height, camera(cli.width, cli.height));
    let hit_count = hits.iter().filter(|hit| hit.hit).count();
    info!(
        "{name}: traced {} rays in {:?}, {hit_count} hits",
        hits.len(),
        start.elapsed()
    );
    print!("{}", render(&hits, cli.width));
    hits
}

fn main() -> voxely::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let grid = build_grid(cli.grid, cli.pattern)?;
    info!(
        "grid {0}x{0}x{0} with {1} occupied voxels",
        cli.grid,
        grid.occupied_count()
    );
    let bounds = Aabb::with_bounds(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0));

    let bvh_hits = if cli.structure != Structure::S64 {
        let start = Instant::now();
        let bvh = Bvh::build(grid.to_triangles(&bounds, |id| id));
        info!(
            "bvh: {} triangles, {} nodes, depth {} built in {:?}",
            bvh.len(),
            bvh.nodes().len(),
            bvh.depth(),
            start.elapsed()
        );
        Some(trace("bvh", &bvh, &cli))
    } else {
        None
    };

    let s64_hits = if cli.structure != Structure::Bvh {
        let start = Instant::now();
        let tree = S64Tree::build(&grid, bounds)?;
        info!(
            "s64: {} nodes, {} leaf voxels built in {:?}",
            tree.nodes().len(),
            tree.leaf_data().len(),
            start.elapsed()
        );
        Some(trace("s64", &tree, &cli))
    } else {
        None
    };

    if let (Some(a), Some(b)) = (bvh_hits, s64_hits) {
        let differing = a.iter().zip(b.iter()).filter(|(a, b)| a.hit != b.hit).count();
        info!("structures disagree on {differing} of {} pixels", a.len());
    }

    Ok(())
}
