// src/export.rs
//
// Final fields/energies table.
//
// Whitespace-delimited text: a `#` header line, then one row per
// (site, component) scalar in site enumeration order — 3*n rows — plus one
// trailing row carrying each term's total energy. Columns:
//
//   mu_s   m   <term 1 field>   <term 2 field>   ...
//
// The mu_s column is the per-site magnitude array tiled three times (its
// trailing entry is a 0.0 placeholder); the m and field columns are the
// per-site vectors flattened component-interleaved, with the term's energy
// as the trailing entry.

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::sim::Sim;

pub fn write_fields_table(
    path: &Path,
    sim: &Sim,
    term_order: &[&str],
    header: &str,
) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let n = sim.mesh.n_sites();

    let mut columns: Vec<(Vec<[f64; 3]>, f64)> = Vec::with_capacity(term_order.len());
    for &name in term_order {
        // field and energy of the term, both sampled at the current state
        let (field, energy) = match (sim.term_field(name), sim.term_energy(name)) {
            (Some(f), Some(e)) => (f, e),
            _ => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("no interaction term named '{}' attached", name),
                ))
            }
        };
        columns.push((field.data, energy));
    }

    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    for line in header.lines() {
        writeln!(w, "# {}", line)?;
    }

    for row in 0..3 * n {
        let (site, comp) = (row / 3, row % 3);
        write!(w, "{:.18e} {:.18e}", sim.mu_s[row % n], sim.spin.data[site][comp])?;
        for (field, _) in &columns {
            write!(w, " {:.18e}", field[site][comp])?;
        }
        writeln!(w)?;
    }

    // trailing energy-bearing row
    write!(w, "{:.18e} {:.18e}", 0.0, 0.0)?;
    for (_, energy) in &columns {
        write!(w, " {:.18e}", energy)?;
    }
    writeln!(w)?;

    Ok(())
}
