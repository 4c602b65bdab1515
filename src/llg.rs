// src/llg.rs
//
// Landau–Lifshitz–Gilbert right-hand sides and a fixed-step RK4 stepper.
// The effective field is recomputed from the attached terms at every RK4
// substage (required whenever B depends on the spin configuration).

use crate::effective_field::{build_effective_field, FieldTerm};
use crate::mesh::CuboidMesh;
use crate::spin_field::SpinField;
use crate::vec3::{cross, dot, normalize};

/// Driver parameters for the LLG equation.
pub struct LLGParams {
    pub gamma: f64, // gyromagnetic ratio (rad / (s*T))
    pub alpha: f64, // damping constant
    pub dt: f64,    // time step (s)
}

impl Default for LLGParams {
    fn default() -> Self {
        Self {
            gamma: crate::constants::GAMMA,
            alpha: 0.1,
            dt: 1e-13,
        }
    }
}

/// Full LLG RHS:
///   dS/dt = -gamma/(1+alpha^2) [ S x B + alpha S x (S x B) ]
#[inline]
fn llg_rhs(gamma: f64, alpha: f64, s: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    let sxb = cross(s, b);
    let sxsxb = cross(s, sxb);
    let c = -gamma / (1.0 + alpha * alpha);
    [
        c * (sxb[0] + alpha * sxsxb[0]),
        c * (sxb[1] + alpha * sxsxb[1]),
        c * (sxb[2] + alpha * sxsxb[2]),
    ]
}

/// Damping-only RHS (precession suppressed), the descent direction used by
/// the relaxation driver:
///   dS/dt = -gamma*alpha/(1+alpha^2) S x (S x B)
#[inline]
fn damping_rhs(gamma: f64, alpha: f64, s: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    let sxsxb = cross(s, cross(s, b));
    let c = -gamma * alpha / (1.0 + alpha * alpha);
    [c * sxsxb[0], c * sxsxb[1], c * sxsxb[2]]
}

type Rhs = fn(f64, f64, [f64; 3], [f64; 3]) -> [f64; 3];

/// Scratch buffers for one RK4 step (avoids per-step allocation).
pub struct RK4Scratch {
    k1: Vec<[f64; 3]>,
    k2: Vec<[f64; 3]>,
    k3: Vec<[f64; 3]>,
    k4: Vec<[f64; 3]>,
    s_tmp: SpinField,
    b_eff: SpinField,
    term_scratch: SpinField,
}

impl RK4Scratch {
    pub fn new(mesh: CuboidMesh) -> Self {
        let n = mesh.n_sites();
        Self {
            k1: vec![[0.0; 3]; n],
            k2: vec![[0.0; 3]; n],
            k3: vec![[0.0; 3]; n],
            k4: vec![[0.0; 3]; n],
            s_tmp: SpinField::new(mesh),
            b_eff: SpinField::new(mesh),
            term_scratch: SpinField::new(mesh),
        }
    }
}

/// Evaluate the RHS at `state` into `k`, rebuilding the effective field.
fn eval_stage(
    terms: &[Box<dyn FieldTerm>],
    state: &SpinField,
    mu_s: &[f64],
    params: &LLGParams,
    rhs: Rhs,
    b_eff: &mut SpinField,
    term_scratch: &mut SpinField,
    k: &mut [[f64; 3]],
) {
    build_effective_field(terms, state, mu_s, b_eff, term_scratch);
    for i in 0..state.data.len() {
        k[i] = if mu_s[i] == 0.0 {
            [0.0; 3]
        } else {
            rhs(params.gamma, params.alpha, state.data[i], b_eff.data[i])
        };
    }
}

/// Trial state S + c*dt*k into `out`.
fn advance_trial(spin: &SpinField, k: &[[f64; 3]], cdt: f64, out: &mut SpinField) {
    for i in 0..spin.data.len() {
        let s = spin.data[i];
        out.data[i] = [
            s[0] + cdt * k[i][0],
            s[1] + cdt * k[i][1],
            s[2] + cdt * k[i][2],
        ];
    }
}

fn rk4_step(
    terms: &[Box<dyn FieldTerm>],
    spin: &mut SpinField,
    mu_s: &[f64],
    params: &LLGParams,
    scratch: &mut RK4Scratch,
    rhs: Rhs,
) {
    let n = spin.data.len();
    debug_assert_eq!(mu_s.len(), n);
    let dt = params.dt;

    eval_stage(
        terms,
        spin,
        mu_s,
        params,
        rhs,
        &mut scratch.b_eff,
        &mut scratch.term_scratch,
        &mut scratch.k1,
    );

    advance_trial(spin, &scratch.k1, 0.5 * dt, &mut scratch.s_tmp);
    eval_stage(
        terms,
        &scratch.s_tmp,
        mu_s,
        params,
        rhs,
        &mut scratch.b_eff,
        &mut scratch.term_scratch,
        &mut scratch.k2,
    );

    advance_trial(spin, &scratch.k2, 0.5 * dt, &mut scratch.s_tmp);
    eval_stage(
        terms,
        &scratch.s_tmp,
        mu_s,
        params,
        rhs,
        &mut scratch.b_eff,
        &mut scratch.term_scratch,
        &mut scratch.k3,
    );

    advance_trial(spin, &scratch.k3, dt, &mut scratch.s_tmp);
    eval_stage(
        terms,
        &scratch.s_tmp,
        mu_s,
        params,
        rhs,
        &mut scratch.b_eff,
        &mut scratch.term_scratch,
        &mut scratch.k4,
    );

    // combine and renormalise (magnetic sites only)
    let w = dt / 6.0;
    for i in 0..n {
        if mu_s[i] == 0.0 {
            continue;
        }
        let s = spin.data[i];
        let (k1, k2, k3, k4) = (scratch.k1[i], scratch.k2[i], scratch.k3[i], scratch.k4[i]);
        let s_new = [
            s[0] + w * (k1[0] + 2.0 * k2[0] + 2.0 * k3[0] + k4[0]),
            s[1] + w * (k1[1] + 2.0 * k2[1] + 2.0 * k3[1] + k4[1]),
            s[2] + w * (k1[2] + 2.0 * k2[2] + 2.0 * k3[2] + k4[2]),
        ];
        // normalize() maps a zero vector to +z; keep the old orientation instead
        spin.data[i] = if dot(s_new, s_new) > 0.0 { normalize(s_new) } else { s };
    }
}

/// Advance the spin configuration by one RK4 step of the full LLG equation
/// (precession + damping).
pub fn step_llg_rk4_recompute_field(
    terms: &[Box<dyn FieldTerm>],
    spin: &mut SpinField,
    mu_s: &[f64],
    params: &LLGParams,
    scratch: &mut RK4Scratch,
) {
    rk4_step(terms, spin, mu_s, params, scratch, llg_rhs);
}

/// Advance by one RK4 step of the damping-only LLG equation.
pub fn step_llg_rk4_recompute_field_relax(
    terms: &[Box<dyn FieldTerm>],
    spin: &mut SpinField,
    mu_s: &[f64],
    params: &LLGParams,
    scratch: &mut RK4Scratch,
) {
    rk4_step(terms, spin, mu_s, params, scratch, damping_rhs);
}
