// src/visualisation.rs

use crate::spin_field::SpinField;
use plotters::prelude::*;

/// Map m_z to a blue–white–red colour using a *local* min/max,
/// so small variations are still visible.
///
/// min_mz maps to blue, max_mz maps to red, midpoint to white.
fn mz_to_color(mz: f64, min_mz: f64, max_mz: f64) -> RGBColor {
    // Protect against min ≈ max (e.g. perfectly uniform state)
    let mut lo = min_mz;
    let mut hi = max_mz;
    if !lo.is_finite() || !hi.is_finite() || (hi - lo).abs() < 1e-9 {
        lo = -1.0;
        hi = 1.0;
    }

    let x = ((mz - lo) / (hi - lo)).clamp(0.0, 1.0);

    // blue–white–red: x=0 -> blue, x=0.5 -> white, x=1 -> red
    let r = (255.0 * x) as u8;
    let b = (255.0 * (1.0 - x)) as u8;
    let g = (255.0 * (1.0 - (2.0 * (x - 0.5).abs()))).clamp(0.0, 255.0) as u8;

    RGBColor(r, g, b)
}

/// Save the z-component of the spin field over one z-layer as a PNG plot.
/// - x/y axes are site indices within the layer
/// - colour encodes m_z (blue ≈ min, white ≈ mid, red ≈ max)
pub fn save_mz_layer_plot(
    field: &SpinField,
    layer: usize,
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh = field.mesh;
    assert!(layer < mesh.nz, "layer {} out of range (nz={})", layer, mesh.nz);

    let nx = mesh.nx as i32;
    let ny = mesh.ny as i32;

    // First pass: find min/max m_z over this layer
    let mut min_mz = f64::INFINITY;
    let mut max_mz = f64::NEG_INFINITY;
    for j in 0..mesh.ny {
        for i in 0..mesh.nx {
            let mz = field.data[mesh.idx(i, j, layer)][2];
            if mz.is_finite() {
                if mz < min_mz {
                    min_mz = mz;
                }
                if mz > max_mz {
                    max_mz = mz;
                }
            }
        }
    }
    if !min_mz.is_finite() || !max_mz.is_finite() {
        min_mz = -1.0;
        max_mz = 1.0;
    }

    let root = BitMapBackend::new(filename, (800, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(40)
        .caption(
            format!("m_z, layer k={} (blue = min, white = mid, red = max)", layer),
            ("sans-serif", 20),
        )
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0..nx, 0..ny)?;

    chart
        .configure_mesh()
        .x_desc("x (site index)")
        .y_desc("y (site index)")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    // Draw one coloured rectangle per site
    chart.draw_series((0..nx).flat_map(|i| {
        (0..ny).map(move |j| {
            let mz = field.data[mesh.idx(i as usize, j as usize, layer)][2];
            let color = mz_to_color(mz, min_mz, max_mz);
            Rectangle::new([(i, j), (i + 1, j + 1)], color.filled())
        })
    }))?;

    root.present()?;
    Ok(())
}
