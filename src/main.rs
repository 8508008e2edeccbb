use std::path::PathBuf;
use std::process::ExitCode;

use pipegrid::config::Params;
use pipegrid::section::default_sections;
use pipegrid::{Viewport, render};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    let is_mobile = args.iter().any(|a| a == "--mobile");
    let positional: Vec<&String> = args.iter().skip(1).filter(|a| !a.starts_with("--")).collect();

    let seed: u64 = positional.first().and_then(|s| s.parse().ok()).unwrap_or(42);
    let width: f64 = positional.get(1).and_then(|s| s.parse().ok()).unwrap_or(1280.0);
    let height: f64 = positional.get(2).and_then(|s| s.parse().ok()).unwrap_or(720.0);
    let out_dir: PathBuf = positional
        .get(3)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("artifacts"));

    let params = Params::default();
    let sections = default_sections();
    let viewport = Viewport {
        width,
        height,
        is_mobile,
    };

    eprintln!(
        "Laying out {} sections in {}x{} px (mobile={}) with seed={}",
        sections.len(),
        width,
        height,
        is_mobile,
        seed
    );

    let (layout, timings) = match pipegrid::generate(seed, viewport, &sections, &params) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!("\nTimings:");
    for t in &timings {
        eprintln!("  {:20} {:8.3} ms", t.name, t.ms);
    }

    eprintln!(
        "\n{}x{} grid, attempt {}:\n{}",
        layout.dims.cols,
        layout.dims.rows,
        layout.attempt,
        render::render_text(&layout)
    );

    if let Err(e) = std::fs::create_dir_all(&out_dir) {
        eprintln!("error: cannot create {}: {e}", out_dir.display());
        return ExitCode::FAILURE;
    }

    let cell_px = layout.dims.cell_width.min(layout.dims.cell_height).max(8) as usize;
    let rgba = render::render_rgba(&layout, cell_px);
    let (w, h) = render::raster_size(&layout, cell_px);
    let png_path = out_dir.join("layout.png");
    match image::save_buffer(&png_path, &rgba, w as u32, h as u32, image::ColorType::Rgba8) {
        Ok(()) => eprintln!("Saved {}", png_path.display()),
        Err(e) => {
            eprintln!("error: cannot save {}: {e}", png_path.display());
            return ExitCode::FAILURE;
        }
    }

    let json_path = out_dir.join("layout.json");
    let written = serde_json::to_vec_pretty(&layout)
        .map_err(std::io::Error::from)
        .and_then(|bytes| std::fs::write(&json_path, bytes));
    match written {
        Ok(()) => eprintln!("Saved {}", json_path.display()),
        Err(e) => {
            eprintln!("error: cannot save {}: {e}", json_path.display());
            return ExitCode::FAILURE;
        }
    }

    eprintln!("\nDone.");
    ExitCode::SUCCESS
}
