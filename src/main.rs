// src/main.rs
//
// Skyrmion-lattice relaxation scenario on a small cuboid disk sample:
// random initial orientations inside an in-plane disk, exchange + DMI +
// uniaxial anisotropy + dipolar fields, short relax, then dump each term's
// field and energy at the final state to a text table.
//
// Runs with no arguments. Outputs under out/relax_skx/:
//   ├── config.json
//   ├── test_fields_atomistic.txt
//   ├── m_final.ovf
//   ├── mz_final.png
//   └── snapshots/m_*.ovf

use std::fs::create_dir_all;
use std::path::Path;

use anyhow::Result;

use atomistic_sim::config::{
    GeometryConfig, MaterialConfig, NumericsConfig, RunConfig, RunInfo,
};
use atomistic_sim::constants;
use atomistic_sim::effective_field::{Demag, Dmi, UniaxialAnisotropy, UniformExchange};
use atomistic_sim::export::write_fields_table;
use atomistic_sim::geometry::disk_mu_s;
use atomistic_sim::initial_states::seeded_random_orientation;
use atomistic_sim::mesh::CuboidMesh;
use atomistic_sim::ovf::{write_ovf_text, OvfMeta};
use atomistic_sim::relax::RelaxSettings;
use atomistic_sim::sim::Sim;
use atomistic_sim::visualisation::save_mz_layer_plot;

const SEED: u64 = 10_000;

fn main() -> Result<()> {
    // --- scenario parameters ---
    let (nx, ny, nz) = (39usize, 11usize, 3usize);
    let (dx, dy, dz) = (0.5, 0.5, 0.5);
    let unit_length = 1e-9;

    let j = 50.0 * constants::K_B;
    let d = 0.09 * j;
    let ku = 5e-3 * j;
    let easy_axis = [0.0, 0.0, 1.0];

    let disk_center = (20.0, 20.0);
    let disk_radius = 25.0;

    let dt0 = 1e-12;
    let stopping_dmdt = 0.1; // deg/ns
    let max_steps = 10;
    let save_m_every = 100;
    // ---------------------------

    let out_dir = Path::new("out").join("relax_skx");
    create_dir_all(&out_dir)?;

    let mesh = CuboidMesh::new(nx, ny, nz, dx, dy, dz, unit_length)?;
    let mut sim = Sim::new(mesh, "relax_skx");
    sim.driver.gamma = constants::GAMMA;
    sim.driver.alpha = 1.0;

    sim.set_mu_s(disk_mu_s(disk_center, disk_radius, constants::MU_S_1));
    sim.set_m(seeded_random_orientation(SEED));

    sim.add(Box::new(UniformExchange::new(j)));
    sim.add(Box::new(Dmi::new(d)));
    sim.add(Box::new(UniaxialAnisotropy::new(ku, easy_axis)));
    sim.add(Box::new(Demag::new()));

    println!("--- atomistic-sim run config ---");
    println!("run_dir: {}", out_dir.to_string_lossy());
    println!(
        "mesh:   nx={} ny={} nz={} dx={} dy={} dz={} unit_length={:.1e} m",
        nx, ny, nz, dx, dy, dz, unit_length
    );
    println!(
        "sites:  {} total, {} magnetic (disk r={} about ({}, {}))",
        mesh.n_sites(),
        sim.n_magnetic(),
        disk_radius,
        disk_center.0,
        disk_center.1
    );
    println!(
        "LLG:    gamma={:.6e} alpha={:.2}",
        sim.driver.gamma, sim.driver.alpha
    );
    println!(
        "mat:    mu_s={:.6e} J={:.6e} D={:.6e} Ku={:.6e} u=[{:.0},{:.0},{:.0}]",
        constants::MU_S_1,
        j,
        d,
        ku,
        easy_axis[0],
        easy_axis[1],
        easy_axis[2]
    );
    println!(
        "relax:  dt0={:.1e} stopping_dmdt={} deg/ns max_steps={} save_m_every={}",
        dt0, stopping_dmdt, max_steps, save_m_every
    );
    println!("seed:   {}", SEED);
    println!("--------------------------------");

    let run_config = RunConfig {
        geometry: GeometryConfig {
            nx,
            ny,
            nz,
            dx,
            dy,
            dz,
            unit_length,
        },
        material: MaterialConfig {
            mu_s: constants::MU_S_1,
            j,
            d,
            ku,
            easy_axis,
            demag: true,
        },
        numerics: NumericsConfig {
            driver: "llg_relax_backtracking".to_string(),
            gamma: sim.driver.gamma,
            alpha: sim.driver.alpha,
            dt: dt0,
            stopping_dmdt,
            max_steps,
            save_m_every: Some(save_m_every),
        },
        run: RunInfo {
            binary: "atomistic-sim".to_string(),
            run_id: "relax_skx".to_string(),
            seed: SEED,
        },
    };
    run_config.write_to_dir(&out_dir)?;

    let settings = RelaxSettings {
        dt: dt0,
        stopping_dmdt,
        max_steps,
        save_m_every: Some(save_m_every),
        snapshot_dir: Some(out_dir.join("snapshots")),
        ..RelaxSettings::default()
    };
    let report = sim.relax(&settings)?;

    println!(
        "relax:  {:?} after {} accepted / {} rejected steps",
        report.outcome, report.accepted_steps, report.rejected_steps
    );
    if let Some(dmdt) = report.final_dmdt {
        println!("        final dmdt = {:.3e} deg/ns, dt = {:.3e} s", dmdt, report.final_dt);
    }
    println!("        E_total = {:.6e} J", report.final_energy);
    for (name, e) in sim.energies() {
        println!("        E_{:<5} = {:+.6e} J", name, e);
    }
    let m_avg = sim.spin.avg_magnetic(&sim.mu_s);
    println!(
        "        <m> = [{:+.4}, {:+.4}, {:+.4}] over magnetic sites",
        m_avg[0], m_avg[1], m_avg[2]
    );

    let header = format!(
        "Generated by atomistic-sim. nx={} ny={} nz={} dx={} dy={} dz={} unit_length={:e} \
         mu_s=mu_s_1 J=50*k_B D/J=0.09 Ku/J=5e-3 axis=(0,0,1). \
         columns: mu_s m0 demag exch dmi anis",
        nx, ny, nz, dx, dy, dz, unit_length
    );
    let table_path = out_dir.join("test_fields_atomistic.txt");
    write_fields_table(&table_path, &sim, &["demag", "exch", "dmi", "anis"], &header)?;
    println!("Wrote fields table to {}", table_path.to_string_lossy());

    write_ovf_text(
        &out_dir.join("m_final.ovf"),
        &sim.spin,
        &OvfMeta::magnetization().with_desc_line("relax_skx final state"),
    )?;

    let plot_path = out_dir.join("mz_final.png");
    if let Err(e) = save_mz_layer_plot(&sim.spin, nz / 2, plot_path.to_str().unwrap()) {
        eprintln!("Could not save m_z plot: {e}");
    }

    println!("Done. Outputs in {}", out_dir.to_string_lossy());
    Ok(())
}
