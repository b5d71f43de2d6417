//! Convergence plot of the outer sizing loop.

use std::fs;
use std::path::Path;

use plotters::prelude::*;

use evtol_sizing::SizingSnapshot;

use crate::ExportError;

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

fn plot_err<E: std::fmt::Display>(err: E) -> ExportError {
    ExportError::Plot(err.to_string())
}

/// Render total mass per outer iteration as a PNG.
pub fn plot_convergence(
    path: &Path,
    title: &str,
    history: &[SizingSnapshot],
    size: (u32, u32),
) -> Result<(), ExportError> {
    if history.is_empty() {
        return Err(ExportError::Plot("no sizing history to plot".into()));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let (lo, hi) = history
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.total_mass), hi.max(s.total_mass))
        });
    let pad = ((hi - lo) * 0.1).max(1.0);
    let last = history.len() as f64;

    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let font = select_font_family();
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .caption(
            format!("{title}: total mass convergence"),
            FontDesc::new(font, 22.0, FontStyle::Bold),
        )
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(0.5..last + 0.5, (lo - pad)..(hi + pad))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Outer iteration")
        .y_desc("Total mass [kg]")
        .label_style(FontDesc::new(font, 16.0, FontStyle::Normal))
        .draw()
        .map_err(plot_err)?;

    let points: Vec<(f64, f64)> = history
        .iter()
        .map(|s| (s.iteration as f64, s.total_mass))
        .collect();
    chart
        .draw_series(LineSeries::new(points.iter().copied(), BLUE.stroke_width(2)))
        .map_err(plot_err)?;
    chart
        .draw_series(
            points
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 4, BLUE.filled())),
        )
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    log::info!("wrote convergence plot {}", path.display());
    Ok(())
}
