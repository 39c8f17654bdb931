use anyhow::Context;
use clap::Parser;
use kiss3d::window::{CanvasSetup, NumSamples, Window};
use log::info;

use solar_orrery::config::{Args, Config, Mode};
use solar_orrery::gui::{Simulation, WINDOW_TITLE};
use solar_orrery::headless;
use solar_orrery::run_loop::{CancellationToken, RunLoop};

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .parse_default_env()
        .init();

    let config = Config::from_args(Args::parse()).context("Invalid command line")?;
    let run_loop = RunLoop::new(CancellationToken::new());

    match config.mode {
        Mode::Headless { frames } => {
            let mut run_loop = run_loop.with_frame_budget(Some(frames));
            let system = headless::run(&mut run_loop);
            info!("Stepped {} frames", system.steps());
            for body in headless::report(&system) {
                let p = body.position;
                match body.orbiting {
                    None => info!("{:>8}: ({:8.3}, {:8.3}, {:8.3})", body.name, p.x, p.y, p.z),
                    Some(parent) => info!(
                        "{:>8}: ({:8.3}, {:8.3}, {:8.3}) around {}",
                        body.name, p.x, p.y, p.z, parent
                    ),
                }
            }
        }
        Mode::Windowed { frame_budget } => {
            let mut window = Window::new_with_setup(
                WINDOW_TITLE,
                config.width,
                config.height,
                CanvasSetup {
                    vsync: true,
                    samples: NumSamples::Four,
                },
            );
            let simulation = Simulation::new(
                &mut window,
                &config,
                run_loop.with_frame_budget(frame_budget),
            );
            window.render_loop(simulation);
        }
    }

    Ok(())
}
