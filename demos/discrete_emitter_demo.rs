//! Discrete SOLPS emitter demonstration.
//!
//! Run with: cargo run --example discrete_emitter_demo [run.json]
//!
//! Without an argument a synthetic radiating layer is used instead of a
//! SOLPS run.

use std::f64::consts::PI;
use std::sync::Arc;

use plasma_scene::*;

/// A Gaussian radiating shell around (R, Z) = (1.0, 0.0) on a 40 x 40 mesh.
fn synthetic_field() -> Result<(Arc<SolpsMesh>, SolpsFunction2D)> {
    let r_edges: Vec<f64> = (0..=40).map(|i| 0.5 + f64::from(i) * 0.025).collect();
    let z_edges: Vec<f64> = (0..=40).map(|i| -0.5 + f64::from(i) * 0.025).collect();
    let mesh = Arc::new(SolpsMesh::rectilinear(&r_edges, &z_edges)?);
    let values = (0..mesh.num_cells())
        .map(|i| {
            let c = mesh.cell_centre(i).unwrap_or_default();
            let d = ((c.x - 1.0).powi(2) + c.y.powi(2)).sqrt() - 0.3;
            1.0e5 * (-(d / 0.03).powi(2)).exp()
        })
        .collect();
    let field = SolpsFunction2D::new(Arc::clone(&mesh), values)?;
    Ok((mesh, field))
}

fn main() -> Result<()> {
    env_logger::init();

    let mut scene = Scene::new();
    let world = scene.root();

    let emitter = if let Some(path) = std::env::args().nth(1) {
        let config = RunConfig::from_file(path)?;
        load_discrete_sol_radiation(&config, &mut scene, Some(world))?.emitter
    } else {
        let (mesh, field) = synthetic_field()?;
        // leave every other sector dark to show per-sector materials
        let alternate = |i: usize, _: &SectorGeometry| {
            if i % 2 == 0 {
                SectorEmission::Shared
            } else {
                SectorEmission::Dark
            }
        };
        make_solps_discrete_emitter_with(
            &mut scene,
            &mesh,
            &field,
            Some(world),
            0.005,
            &EmitterConfig::default(),
            &alternate,
        )?
    };

    let geometry = emitter.geometry();
    println!(
        "{} sectors of {} deg (limiter {} deg), cutting boxes {:.2} x {:.2} m",
        geometry.num_sectors,
        geometry.sector_width_deg,
        geometry.limiter_width_deg,
        geometry.box_width,
        geometry.box_height
    );
    for sector in emitter.sectors() {
        println!(
            "  sector {:>2} at {:>5.1} deg, node {:>2}, {}",
            sector.index,
            sector.angle_deg,
            sector.node.index(),
            if sector.material.is_some() { "emitting" } else { "dark" }
        );
    }

    // emission around the torus at the middle of the shell
    for step in 0..16 {
        let angle = f64::from(step) * PI / 8.0 + 0.1;
        let p = DVec3::new(1.3 * angle.cos(), 1.3 * angle.sin(), 0.0);
        println!(
            "  phi {:>6.1} deg: {:.3e} W m^-3 sr^-1",
            angle.to_degrees(),
            scene.emission_at(p)
        );
    }

    Ok(())
}
