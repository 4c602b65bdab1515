// src/config.rs

use serde::Serialize;
use std::fs::File;
use std::path::Path;

#[derive(Serialize)]
pub struct RunConfig {
    pub geometry: GeometryConfig,
    pub material: MaterialConfig,
    pub numerics: NumericsConfig,
    pub run: RunInfo,
}

#[derive(Serialize)]
pub struct GeometryConfig {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
    pub unit_length: f64,
}

#[derive(Serialize)]
pub struct MaterialConfig {
    /// Per-site moment inside the magnetic region (J/T).
    pub mu_s: f64,
    /// Exchange coupling per bond (J).
    pub j: f64,
    /// DMI coupling per bond (J).
    pub d: f64,
    /// Uniaxial anisotropy per site (J).
    pub ku: f64,
    pub easy_axis: [f64; 3],
    pub demag: bool,
}

#[derive(Serialize)]
pub struct NumericsConfig {
    pub driver: String,
    pub gamma: f64,
    pub alpha: f64,
    /// Initial timestep (s); the relax driver adapts dt during the run.
    pub dt: f64,
    pub stopping_dmdt: f64,
    pub max_steps: usize,
    pub save_m_every: Option<usize>,
}

#[derive(Serialize)]
pub struct RunInfo {
    pub binary: String,
    pub run_id: String,
    pub seed: u64,
}

impl RunConfig {
    pub fn write_to_dir(&self, out_dir: &Path) -> std::io::Result<()> {
        let path = out_dir.join("config.json");
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
