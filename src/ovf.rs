// src/ovf.rs
//
// OVF 2.0 text writer for per-site vector data on a cuboid lattice
// (OOMMF/MuMax-compatible rectangular mesh, one segment).
//
// Node spacings are written in meters (mesh spacings scaled by unit_length).

use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::spin_field::SpinField;

#[derive(Clone, Debug, Default)]
pub struct OvfMeta {
    pub title: String,
    pub desc_lines: Vec<String>,
    pub valuelabels: [String; 3],
    pub valueunits: [String; 3],
}

impl OvfMeta {
    pub fn magnetization() -> Self {
        Self {
            title: "m".to_string(),
            desc_lines: vec![],
            valuelabels: ["m_x".into(), "m_y".into(), "m_z".into()],
            valueunits: ["1".into(), "1".into(), "1".into()],
        }
    }

    pub fn with_desc_line<S: Into<String>>(mut self, s: S) -> Self {
        self.desc_lines.push(s.into());
        self
    }
}

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    Ok(())
}

pub fn write_ovf_text(path: &Path, field: &SpinField, meta: &OvfMeta) -> std::io::Result<()> {
    ensure_parent_dir(path)?;

    let mesh = field.mesh;
    let (nx, ny, nz) = (mesh.nx, mesh.ny, mesh.nz);

    if field.data.len() != mesh.n_sites() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!(
                "SpinField length mismatch: got {}, expected {} (nx*ny*nz)",
                field.data.len(),
                mesh.n_sites()
            ),
        ));
    }

    let dx = mesh.dx * mesh.unit_length;
    let dy = mesh.dy * mesh.unit_length;
    let dz = mesh.dz * mesh.unit_length;

    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(w, "# OOMMF OVF 2.0")?;
    writeln!(w, "# Segment count: 1")?;
    writeln!(w, "# Begin: Segment")?;
    writeln!(w, "# Begin: Header")?;
    writeln!(w, "# Title: {}", meta.title)?;
    writeln!(w, "# meshtype: rectangular")?;
    writeln!(w, "# meshunit: m")?;

    writeln!(w, "# xmin: 0")?;
    writeln!(w, "# ymin: 0")?;
    writeln!(w, "# zmin: 0")?;
    writeln!(w, "# xmax: {:.16e}", (nx as f64) * dx)?;
    writeln!(w, "# ymax: {:.16e}", (ny as f64) * dy)?;
    writeln!(w, "# zmax: {:.16e}", (nz as f64) * dz)?;

    writeln!(w, "# valuedim: 3")?;
    writeln!(
        w,
        "# valuelabels: {} {} {}",
        meta.valuelabels[0], meta.valuelabels[1], meta.valuelabels[2]
    )?;
    writeln!(
        w,
        "# valueunits: {} {} {}",
        meta.valueunits[0], meta.valueunits[1], meta.valueunits[2]
    )?;

    for d in &meta.desc_lines {
        writeln!(w, "# Desc: {}", d)?;
    }

    writeln!(w, "# xbase: {:.16e}", 0.5 * dx)?;
    writeln!(w, "# ybase: {:.16e}", 0.5 * dy)?;
    writeln!(w, "# zbase: {:.16e}", 0.5 * dz)?;
    writeln!(w, "# xnodes: {}", nx)?;
    writeln!(w, "# ynodes: {}", ny)?;
    writeln!(w, "# znodes: {}", nz)?;
    writeln!(w, "# xstepsize: {:.16e}", dx)?;
    writeln!(w, "# ystepsize: {:.16e}", dy)?;
    writeln!(w, "# zstepsize: {:.16e}", dz)?;

    writeln!(w, "# End: Header")?;
    writeln!(w, "# Begin: Data Text")?;

    // x fastest, then y, then z — the site enumeration order
    for v in &field.data {
        writeln!(w, "{:.10e} {:.10e} {:.10e}", v[0], v[1], v[2])?;
    }

    writeln!(w, "# End: Data Text")?;
    writeln!(w, "# End: Segment")?;
    Ok(())
}
