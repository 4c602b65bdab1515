// src/effective_field/exchange.rs
//
// Nearest-neighbour Heisenberg exchange on the cubic lattice.
//
// Energy:
//   E = -(J/2) sum_i sum_{j in N(i)} S_i . S_j
// Effective field:
//   B_i = (J / mu_s_i) sum_{j in N(i)} S_j

use crate::effective_field::FieldTerm;
use crate::spin_field::SpinField;
use crate::vec3::dot;

pub struct UniformExchange {
    /// Exchange coupling J per bond (Joule).
    pub j: f64,
}

impl UniformExchange {
    pub fn new(j: f64) -> Self {
        Self { j }
    }
}

impl FieldTerm for UniformExchange {
    fn name(&self) -> &'static str {
        "exch"
    }

    fn compute_field(&self, spin: &SpinField, mu_s: &[f64], field: &mut SpinField) {
        let mesh = &spin.mesh;
        for idx in 0..mesh.n_sites() {
            if mu_s[idx] == 0.0 {
                field.data[idx] = [0.0; 3];
                continue;
            }
            let mut sum = [0.0; 3];
            for nb in mesh.neighbors(idx).into_iter().flatten() {
                if mu_s[nb] == 0.0 {
                    continue;
                }
                let s = spin.data[nb];
                sum[0] += s[0];
                sum[1] += s[1];
                sum[2] += s[2];
            }
            let c = self.j / mu_s[idx];
            field.data[idx] = [c * sum[0], c * sum[1], c * sum[2]];
        }
    }

    fn compute_energy(&self, spin: &SpinField, mu_s: &[f64]) -> f64 {
        let mesh = &spin.mesh;
        let mut e = 0.0;
        for idx in 0..mesh.n_sites() {
            if mu_s[idx] == 0.0 {
                continue;
            }
            let si = spin.data[idx];
            for nb in mesh.neighbors(idx).into_iter().flatten() {
                if mu_s[nb] == 0.0 {
                    continue;
                }
                e += dot(si, spin.data[nb]);
            }
        }
        // each bond visited from both ends
        -0.5 * self.j * e
    }
}
