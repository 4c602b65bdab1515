// src/effective_field/demag.rs
//
// Dipolar (demagnetising) field by direct summation over all magnetic site
// pairs. With moments mu_j = mu_s_j S_j and physical separations
// r = (pos_j - pos_i) * unit_length:
//
//   B_i = (mu_0 / 4 pi) sum_{j != i} mu_s_j [3 (S_j . r_hat) r_hat - S_j] / r^3
//   E   = -(1/2) sum_i mu_s_i S_i . B_i
//
// The target-site loop is parallelised; each site's source sum stays
// sequential so results are bit-identical at any thread count.

use rayon::prelude::*;

use crate::constants::MU_0_OVER_4PI;
use crate::effective_field::FieldTerm;
use crate::spin_field::SpinField;
use crate::vec3::dot;

#[derive(Default)]
pub struct Demag;

impl Demag {
    pub fn new() -> Self {
        Self
    }
}

impl FieldTerm for Demag {
    fn name(&self) -> &'static str {
        "demag"
    }

    fn compute_field(&self, spin: &SpinField, mu_s: &[f64], field: &mut SpinField) {
        let mesh = spin.mesh;
        let scale = mesh.unit_length;
        let positions: Vec<[f64; 3]> = (0..mesh.n_sites()).map(|idx| mesh.pos_of(idx)).collect();

        field
            .data
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, out)| {
                if mu_s[i] == 0.0 {
                    *out = [0.0; 3];
                    return;
                }
                let pi = positions[i];
                let mut b = [0.0; 3];
                for (j, pj) in positions.iter().enumerate() {
                    if j == i || mu_s[j] == 0.0 {
                        continue;
                    }
                    let r = [
                        (pj[0] - pi[0]) * scale,
                        (pj[1] - pi[1]) * scale,
                        (pj[2] - pi[2]) * scale,
                    ];
                    let r2 = dot(r, r);
                    let inv_r = 1.0 / r2.sqrt();
                    let rhat = [r[0] * inv_r, r[1] * inv_r, r[2] * inv_r];
                    let sj = spin.data[j];
                    let proj = 3.0 * dot(sj, rhat);
                    let c = mu_s[j] * inv_r * inv_r * inv_r;
                    b[0] += c * (proj * rhat[0] - sj[0]);
                    b[1] += c * (proj * rhat[1] - sj[1]);
                    b[2] += c * (proj * rhat[2] - sj[2]);
                }
                *out = [
                    MU_0_OVER_4PI * b[0],
                    MU_0_OVER_4PI * b[1],
                    MU_0_OVER_4PI * b[2],
                ];
            });
    }

    fn compute_energy(&self, spin: &SpinField, mu_s: &[f64]) -> f64 {
        let mut field = SpinField::new(spin.mesh);
        self.compute_field(spin, mu_s, &mut field);

        let mut e = 0.0;
        for ((s, b), &mu) in spin.data.iter().zip(field.data.iter()).zip(mu_s.iter()) {
            if mu == 0.0 {
                continue;
            }
            e += mu * dot(*s, *b);
        }
        // each pair appears in both site sums
        -0.5 * e
    }
}
