use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use marduk_batch::batch::BatchMode;

/// Headless batching benchmark: renders a random scene in each batch mode and
/// compares against drawing every drawable on its own.
#[derive(Debug, Parser)]
#[command(name = "marduk-batch-bench", version)]
pub struct BenchConfig {
    /// Number of drawables in the scene.
    #[arg(long, default_value_t = 1000)]
    pub count: usize,

    /// Frames rendered per mode; drawables rotate between frames.
    #[arg(long, default_value_t = 60)]
    pub frames: usize,

    #[arg(long, value_enum, default_value_t = ModeArg::All)]
    pub mode: ModeArg,

    #[arg(long, value_enum, default_value_t = DrawableArg::Sprite)]
    pub drawable: DrawableArg,

    /// Directory for one PNG per mode (last frame).
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Also render through the headless wgpu target.
    #[arg(long)]
    pub gpu: bool,

    #[arg(long, default_value_t = 1600)]
    pub width: u32,

    #[arg(long, default_value_t = 900)]
    pub height: u32,

    /// Number of generated textures.
    #[arg(long, default_value_t = 8)]
    pub textures: usize,

    /// Percent chance a drawable reuses the previous drawable's texture.
    #[arg(long, default_value_t = 85, value_parser = clap::value_parser!(u8).range(0..=100))]
    pub same_texture_chance: u8,

    /// RNG seed; random when omitted.
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum ModeArg {
    Deferred,
    Texture,
    Depth,
    All,
}

impl ModeArg {
    pub fn modes(self) -> Vec<BatchMode> {
        match self {
            ModeArg::Deferred => vec![BatchMode::Deferred],
            ModeArg::Texture => vec![BatchMode::TextureSort],
            ModeArg::Depth => vec![BatchMode::DepthSort],
            ModeArg::All => BatchMode::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum DrawableArg {
    Sprite,
    Shape,
    ShapeUntextured,
}
