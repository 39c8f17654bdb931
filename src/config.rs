use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

/// Frames simulated by `--headless` when no `--frames` budget is given.
pub const DEFAULT_HEADLESS_FRAMES: u64 = 600;

#[derive(Debug, Parser)]
#[command(name = "solar-orrery", about = "An animated toy solar system")]
pub struct Args {
    /// Directory holding the body textures and the `cubeMap/` faces
    #[arg(long, default_value = "textures")]
    pub assets: PathBuf,

    /// Initial window width
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Initial window height
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Stop after this many frames instead of running until the window closes
    #[arg(long)]
    pub frames: Option<u64>,

    /// Step the animation without opening a window, then print where everything ended up
    #[arg(long)]
    pub headless: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("window size must be non-zero, got {width}x{height}")]
    EmptyViewport { width: u32, height: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Windowed { frame_budget: Option<u64> },
    Headless { frames: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub asset_dir: PathBuf,
    pub width: u32,
    pub height: u32,
    pub mode: Mode,
}

impl Config {
    pub fn from_args(args: Args) -> Result<Self, ConfigError> {
        if args.width == 0 || args.height == 0 {
            return Err(ConfigError::EmptyViewport {
                width: args.width,
                height: args.height,
            });
        }

        let mode = if args.headless {
            Mode::Headless {
                frames: args.frames.unwrap_or(DEFAULT_HEADLESS_FRAMES),
            }
        } else {
            Mode::Windowed {
                frame_budget: args.frames,
            }
        };

        Ok(Config {
            asset_dir: args.assets,
            width: args.width,
            height: args.height,
            mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Result<Config, ConfigError> {
        let args = Args::try_parse_from(std::iter::once("solar-orrery").chain(argv.iter().copied()))
            .expect("arguments should parse");
        Config::from_args(args)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();
        assert_eq!(config.asset_dir, PathBuf::from("textures"));
        assert_eq!((config.width, config.height), (1280, 720));
        assert_eq!(config.mode, Mode::Windowed { frame_budget: None });
    }

    #[test]
    fn test_headless_frames() {
        let config = parse(&["--headless"]).unwrap();
        assert_eq!(
            config.mode,
            Mode::Headless {
                frames: DEFAULT_HEADLESS_FRAMES
            }
        );

        let config = parse(&["--headless", "--frames", "10", "--assets", "/tmp/tex"]).unwrap();
        assert_eq!(config.mode, Mode::Headless { frames: 10 });
        assert_eq!(config.asset_dir, PathBuf::from("/tmp/tex"));
    }

    #[test]
    fn test_windowed_budget() {
        let config = parse(&["--frames", "300", "--width", "800", "--height", "600"]).unwrap();
        assert_eq!(
            config.mode,
            Mode::Windowed {
                frame_budget: Some(300)
            }
        );
        assert_eq!((config.width, config.height), (800, 600));
    }

    #[test]
    fn test_rejects_empty_viewport() {
        assert_eq!(
            parse(&["--width", "0"]),
            Err(ConfigError::EmptyViewport {
                width: 0,
                height: 720
            })
        );
    }
}
