// src/sim.rs
//
// Simulation context: owns the per-site spin and moment-magnitude arrays,
// the driver parameters and the attached interaction terms.
//
// Conventions:
// - mu_s = 0 marks a non-magnetic site; its stored orientation is (0,0,0)
//   and it is skipped by every term and by the relaxation metric, but it
//   keeps its array slot so site indexing is fixed.
// - Only the relaxation/dynamics steppers mutate the spin array; terms only
//   read it.

use crate::effective_field::{build_effective_field, FieldTerm};
use crate::llg::LLGParams;
use crate::mesh::CuboidMesh;
use crate::relax::{self, RelaxReport, RelaxSettings};
use crate::spin_field::SpinField;
use crate::vec3::normalize;

pub struct Sim {
    pub mesh: CuboidMesh,
    pub name: String,
    pub spin: SpinField,
    pub mu_s: Vec<f64>,
    pub driver: LLGParams,
    pub terms: Vec<Box<dyn FieldTerm>>,
}

impl Sim {
    pub fn new(mesh: CuboidMesh, name: &str) -> Self {
        let n = mesh.n_sites();
        Self {
            mesh,
            name: name.to_string(),
            spin: SpinField::new(mesh),
            mu_s: vec![0.0; n],
            driver: LLGParams::default(),
            terms: Vec::new(),
        }
    }

    /// Assign the per-site moment magnitude from a position function
    /// (mesh-unit cell-center positions, site enumeration order).
    /// Orientations at sites that end up non-magnetic are zeroed.
    pub fn set_mu_s<F>(&mut self, f: F)
    where
        F: Fn([f64; 3]) -> f64,
    {
        for idx in 0..self.mesh.n_sites() {
            self.mu_s[idx] = f(self.mesh.pos_of(idx));
            if self.mu_s[idx] == 0.0 {
                self.spin.data[idx] = [0.0; 3];
            }
        }
    }

    /// Assign the initial orientation from a position function. The function
    /// is evaluated once per site in enumeration order (so a stateful source,
    /// e.g. a seeded RNG closure, draws in a fixed sequence); results are
    /// normalised, and non-magnetic sites are zeroed afterwards. Assign
    /// `mu_s` first: sites still at the mu_s = 0 default count as vacuum.
    pub fn set_m<F>(&mut self, mut f: F)
    where
        F: FnMut([f64; 3]) -> [f64; 3],
    {
        for idx in 0..self.mesh.n_sites() {
            let v = f(self.mesh.pos_of(idx));
            self.spin.data[idx] = if self.mu_s[idx] > 0.0 {
                normalize(v)
            } else {
                [0.0; 3]
            };
        }
    }

    /// Attach an interaction term. Terms are order-independent and combined
    /// additively when the driver builds the effective field.
    pub fn add(&mut self, term: Box<dyn FieldTerm>) {
        self.terms.push(term);
    }

    /// Number of magnetic (mu_s > 0) sites.
    pub fn n_magnetic(&self) -> usize {
        self.mu_s.iter().filter(|&&mu| mu > 0.0).count()
    }

    /// Sum of all term fields at the current state (overwrites `b_eff`).
    pub fn effective_field(&self, b_eff: &mut SpinField, scratch: &mut SpinField) {
        build_effective_field(&self.terms, &self.spin, &self.mu_s, b_eff, scratch);
    }

    /// Total energy over all attached terms at the current state (Joule).
    pub fn total_energy(&self) -> f64 {
        self.terms
            .iter()
            .map(|t| t.compute_energy(&self.spin, &self.mu_s))
            .sum()
    }

    /// Per-term (name, energy) pairs at the current state.
    pub fn energies(&self) -> Vec<(&'static str, f64)> {
        self.terms
            .iter()
            .map(|t| (t.name(), t.compute_energy(&self.spin, &self.mu_s)))
            .collect()
    }

    fn term(&self, name: &str) -> Option<&dyn FieldTerm> {
        self.terms
            .iter()
            .find(|t| t.name() == name)
            .map(|t| t.as_ref())
    }

    /// Field of the named term at the current state.
    pub fn term_field(&self, name: &str) -> Option<SpinField> {
        let term = self.term(name)?;
        let mut field = SpinField::new(self.mesh);
        term.compute_field(&self.spin, &self.mu_s, &mut field);
        Some(field)
    }

    /// Energy of the named term at the current state (Joule).
    pub fn term_energy(&self, name: &str) -> Option<f64> {
        self.term(name)
            .map(|t| t.compute_energy(&self.spin, &self.mu_s))
    }

    /// Relax the spin configuration toward a local energy minimum.
    pub fn relax(&mut self, settings: &RelaxSettings) -> std::io::Result<RelaxReport> {
        relax::relax(self, settings)
    }
}
