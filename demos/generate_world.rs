//! Complete workflow demonstration for voronoi_world
//!
//! Set `RUST_LOG=voronoi_world=debug` to see per-stage timings.

use tracing_subscriber::EnvFilter;
use voronoi_world::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("voronoi_world=info")),
        )
        .init();

    println!("=== voronoi_world Demo ===\n");

    // Step 1: Configure world
    let config = WorldConfigBuilder::new()
        .seed(12345)
        .size(WorldSize::Small)
        .relaxation_iterations(2)?
        .river_count(150)
        .build()?;

    println!("Step 1: Configuration");
    println!("  Seed: {}", config.seed);
    println!("  Size: {} ({} tiles)", config.size.name(), config.node_count());
    println!("  Relaxation passes: {}", config.relaxation_iterations);

    // Step 2: Generate world
    println!("\nStep 2: Generating world...");
    let world = World::generate(config)?;
    let graph = world.graph();
    println!(
        "  {} tiles, {} corners, {} edges",
        graph.node_count(),
        graph.corner_count(),
        graph.edge_count()
    );

    // Step 3: Terrain
    let levels = world.levels();
    println!("\nStep 3: Terrain");
    println!(
        "  Levels: water {:.3}, mountain {:.3}, mountaintop {:.3}",
        levels.water, levels.mountain, levels.mountaintop
    );
    for (category, count) in world.category_counts() {
        let pct = count as f32 / world.node_count() as f32 * 100.0;
        println!("  {:<12} {:>6} ({:.1}%)", category.name(), count, pct);
    }

    // Step 4: Rivers
    let report = world.river_report();
    println!("\nStep 4: Rivers");
    println!(
        "  {} of {} grown in {} draws ({} abandoned)",
        report.generated, report.requested, report.attempts, report.abandoned
    );
    let river_edges = graph.edges().iter().filter(|e| e.is_river()).count();
    println!("  River edges: {}", river_edges);

    // Step 5: Spatial query
    #[cfg(feature = "spatial-index")]
    {
        println!("\nStep 5: Spatial query");
        let probe = Vec3::new(1.0, 0.3, -0.2);
        if let Some(id) = world.find_tile_at(probe) {
            let node = world.node(id)?;
            println!("  {:?} -> tile {} ({})", probe, id.index(), node.category.name());
            println!("  Tiles within 2 hops: {}", world.tiles_within(id, 2)?.len());
        }
    }

    // Step 6: Mesh
    println!("\nStep 6: Mesh");
    let mesh = build_world_mesh(&world, &CategoryColorMapper);
    println!("  Vertices: {}", mesh.vertex_count());
    println!("  Triangles: {}", mesh.triangle_count());
    let mem = (mesh.positions.len() * 12
        + mesh.normals.len() * 12
        + mesh.colors.len() * 16
        + mesh.indices.len() * 4) as f32
        / 1024.0
        / 1024.0;
    println!("  Memory: {:.2} MB", mem);

    println!("\n=== Demo Complete ===");
    Ok(())
}
