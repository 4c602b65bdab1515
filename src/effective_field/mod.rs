// src/effective_field/mod.rs
//
// Interaction terms. Each term computes its effective induction B (Tesla)
// and total energy (Joule) from a spin configuration, with the convention
//   B_i = -(1/mu_s_i) dE/dS_i
// so field and energy are mutually consistent term by term.
//
// Sites with mu_s = 0 are non-magnetic: terms neither read them as sources
// nor write a field at them, but they keep their array slots.

pub mod anisotropy;
pub mod demag;
pub mod dmi;
pub mod exchange;

pub use anisotropy::UniaxialAnisotropy;
pub use demag::Demag;
pub use dmi::Dmi;
pub use exchange::UniformExchange;

use crate::spin_field::SpinField;

/// A single interaction term attached to a simulation context.
///
/// `compute_field` and `compute_energy` are pure in the passed state and the
/// term's fixed coefficients; terms are order-independent and never read
/// each other's output.
pub trait FieldTerm {
    fn name(&self) -> &'static str;

    /// Overwrite `field` with this term's per-site induction (Tesla).
    fn compute_field(&self, spin: &SpinField, mu_s: &[f64], field: &mut SpinField);

    /// Total energy (Joule) of this term for the given state.
    fn compute_energy(&self, spin: &SpinField, mu_s: &[f64]) -> f64;
}

/// Accumulate the sum of all term fields into `b_eff` (overwrites `b_eff`).
/// `scratch` is a caller-provided buffer of the same size.
pub fn build_effective_field(
    terms: &[Box<dyn FieldTerm>],
    spin: &SpinField,
    mu_s: &[f64],
    b_eff: &mut SpinField,
    scratch: &mut SpinField,
) {
    debug_assert_eq!(spin.data.len(), b_eff.data.len());
    debug_assert_eq!(spin.data.len(), scratch.data.len());

    b_eff.set_uniform(0.0, 0.0, 0.0);
    for term in terms {
        term.compute_field(spin, mu_s, scratch);
        for (b, s) in b_eff.data.iter_mut().zip(scratch.data.iter()) {
            b[0] += s[0];
            b[1] += s[1];
            b[2] += s[2];
        }
    }
}
