// src/effective_field/anisotropy.rs
//
// Uniaxial on-site anisotropy.
//
// Energy:
//   E = -K sum_i (S_i . u)^2
// Effective field:
//   B_i = (2K / mu_s_i) (S_i . u) u

use crate::effective_field::FieldTerm;
use crate::spin_field::SpinField;
use crate::vec3::{dot, normalize};

pub struct UniaxialAnisotropy {
    /// Anisotropy constant K per site (Joule).
    pub k: f64,
    /// Unit easy axis.
    pub axis: [f64; 3],
}

impl UniaxialAnisotropy {
    pub fn new(k: f64, axis: [f64; 3]) -> Self {
        Self {
            k,
            axis: normalize(axis),
        }
    }
}

impl FieldTerm for UniaxialAnisotropy {
    fn name(&self) -> &'static str {
        "anis"
    }

    fn compute_field(&self, spin: &SpinField, mu_s: &[f64], field: &mut SpinField) {
        let u = self.axis;
        for ((s, f), &mu) in spin.data.iter().zip(field.data.iter_mut()).zip(mu_s.iter()) {
            if mu == 0.0 {
                *f = [0.0; 3];
                continue;
            }
            let c = 2.0 * self.k / mu * dot(*s, u);
            *f = [c * u[0], c * u[1], c * u[2]];
        }
    }

    fn compute_energy(&self, spin: &SpinField, mu_s: &[f64]) -> f64 {
        let u = self.axis;
        let mut e = 0.0;
        for (s, &mu) in spin.data.iter().zip(mu_s.iter()) {
            if mu == 0.0 {
                continue;
            }
            let sdotu = dot(*s, u);
            e += sdotu * sdotu;
        }
        -self.k * e
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::CuboidMesh;

    #[test]
    fn aligned_site_sees_full_anisotropy_field() {
        let mesh = CuboidMesh::new(1, 1, 1, 1.0, 1.0, 1.0, 1e-9).unwrap();
        let mut spin = SpinField::new(mesh);
        spin.set_uniform(0.0, 0.0, 1.0);
        let mu_s = vec![1.0e-23];

        let k = 5.0e-24;
        let anis = UniaxialAnisotropy::new(k, [0.0, 0.0, 1.0]);

        let mut field = SpinField::new(mesh);
        anis.compute_field(&spin, &mu_s, &mut field);
        let expected = 2.0 * k / 1.0e-23;
        assert!((field.data[0][2] - expected).abs() < 1e-12 * expected);

        let e = anis.compute_energy(&spin, &mu_s);
        assert!((e + k).abs() < 1e-12 * k);
    }

    #[test]
    fn axis_is_normalized_on_construction() {
        let anis = UniaxialAnisotropy::new(1.0, [0.0, 0.0, 2.0]);
        assert_eq!(anis.axis, [0.0, 0.0, 1.0]);
    }
}
