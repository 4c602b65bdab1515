// src/constants.rs
//
// Shared physical constants (SI). All modules source these from here;
// nothing redefines them locally.

/// Boltzmann constant (J/K).
pub const K_B: f64 = 1.380_649e-23;

/// Bohr magneton (J/T).
pub const MU_B: f64 = 9.274_010_078_3e-24;

/// Default per-site magnetic moment: one Bohr magneton (J/T).
pub const MU_S_1: f64 = MU_B;

/// Gyromagnetic ratio (rad / (s*T)).
pub const GAMMA: f64 = 1.76e11;

/// Vacuum permeability (T*m/A).
pub const MU_0: f64 = 4.0e-7 * std::f64::consts::PI;

/// mu_0 / (4 pi), the dipolar prefactor (T*m/A).
pub const MU_0_OVER_4PI: f64 = 1.0e-7;
