mod config;
mod scene;

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;

use marduk_batch::batch::{BatchMode, SpriteBatch};
use marduk_batch::logging::{LoggingConfig, init_logging};
use marduk_batch::paint::Color;
use marduk_batch::render::{
    Canvas, GpuBatchRenderer, GpuContext, GpuInit, GpuTarget, GpuTextures, RenderStates, draw_immediate,
};

use config::BenchConfig;
use scene::Scene;

/// Entries per depth layer in the batched passes.
const DRAWABLES_PER_LAYER: usize = 250;
const BACKGROUND: Color = Color::from_premul(0.2, 0.2, 0.2, 1.0);

#[derive(Debug, Default)]
struct Timings {
    total: Duration,
    frames: u32,
    draw_calls: usize,
}

impl Timings {
    fn record(&mut self, elapsed: Duration, draw_calls: usize) {
        self.total += elapsed;
        self.frames += 1;
        self.draw_calls = draw_calls;
    }

    fn mean_ms(&self) -> f64 {
        if self.frames == 0 {
            return 0.0;
        }
        self.total.as_secs_f64() * 1000.0 / self.frames as f64
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = BenchConfig::parse();
    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!(
        "bench: {} {:?} drawables, {} frames, {}x{}, seed {}",
        config.count,
        config.drawable,
        config.frames,
        config.width,
        config.height,
        seed
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = Scene::generate(&config, &mut rng);

    if let Some(dir) = &config.out {
        std::fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    }

    let unbatched = run_unbatched(&config, &mut scene)?;
    log::info!(
        "unbatched    : {:8.3} ms/frame, {:6} draw calls",
        unbatched.mean_ms(),
        unbatched.draw_calls
    );

    let mut batch = SpriteBatch::new();
    for mode in config.mode.modes() {
        let t = run_batched(&config, &mut scene, &mut batch, mode)?;
        log::info!(
            "{:<13}: {:8.3} ms/frame, {:6} draw calls ({:.1}x vs unbatched)",
            mode,
            t.mean_ms(),
            t.draw_calls,
            unbatched.mean_ms() / t.mean_ms().max(f64::EPSILON)
        );
    }

    if config.gpu {
        run_gpu(&config, &mut scene, &mut batch)?;
    }

    Ok(())
}

/// Fills `batch` with the scene, moving to a nearer layer every
/// `DRAWABLES_PER_LAYER` entries.
fn fill_batch(batch: &mut SpriteBatch, scene: &Scene, mode: BatchMode) {
    batch.clear();
    batch.set_mode(mode);

    let mut depth = 1.0;
    for (i, d) in scene.drawables.iter().enumerate() {
        batch.batch_at(d, depth);
        if (i + 1) % DRAWABLES_PER_LAYER == 0 {
            depth -= 0.01;
        }
    }
}

fn run_unbatched(config: &BenchConfig, scene: &mut Scene) -> Result<Timings> {
    let mut timings = Timings::default();
    let states = RenderStates::default();

    for frame in 0..config.frames {
        scene.step();
        let mut canvas = Canvas::new(config.width, config.height, &scene.store);
        canvas.clear(BACKGROUND);

        let start = Instant::now();
        for d in &scene.drawables {
            draw_immediate(&mut canvas, d, &states)?;
        }
        timings.record(start.elapsed(), canvas.draw_calls());

        if frame + 1 == config.frames {
            save_frame(config, &canvas, "unbatched")?;
        }
    }

    Ok(timings)
}

fn run_batched(
    config: &BenchConfig,
    scene: &mut Scene,
    batch: &mut SpriteBatch,
    mode: BatchMode,
) -> Result<Timings> {
    let mut timings = Timings::default();
    let states = RenderStates::default();

    for frame in 0..config.frames {
        scene.step();
        let mut canvas = Canvas::new(config.width, config.height, &scene.store);
        canvas.clear(BACKGROUND);

        let start = Instant::now();
        fill_batch(batch, scene, mode);
        let stats = batch.flush(&mut canvas, &states)?;
        timings.record(start.elapsed(), stats.draw_calls);

        if frame + 1 == config.frames {
            save_frame(config, &canvas, &mode.name().to_lowercase())?;
        }
    }

    Ok(timings)
}

/// Writes `canvas` to `<out>/<name>.png` when an output directory is set.
fn save_frame(config: &BenchConfig, canvas: &Canvas<'_>, name: &str) -> Result<()> {
    let Some(dir) = &config.out else {
        return Ok(());
    };
    let path = dir.join(format!("{name}.png"));
    canvas.save_png(&path)?;
    log::info!("wrote {}", path.display());
    Ok(())
}

fn run_gpu(config: &BenchConfig, scene: &mut Scene, batch: &mut SpriteBatch) -> Result<()> {
    let ctx = GpuContext::headless_blocking(GpuInit::default())?;
    let textures = GpuTextures::from_store(&ctx, &scene.store);
    let mut renderer = GpuBatchRenderer::new();
    let (_texture, view) = ctx.create_render_texture(config.width, config.height)?;
    let states = RenderStates::default();

    for mode in config.mode.modes() {
        let mut timings = Timings::default();
        for _ in 0..config.frames {
            scene.step();

            let start = Instant::now();
            fill_batch(batch, scene, mode);
            let mut target = GpuTarget::new(&ctx, &mut renderer, &textures, &view, (config.width, config.height))
                .with_clear(BACKGROUND);
            batch.flush(&mut target, &states)?;
            let draws = target.finish()?;
            timings.record(start.elapsed(), draws);
        }

        log::info!(
            "gpu {:<9}: {:8.3} ms/frame (cpu side), {:6} draw calls",
            mode,
            timings.mean_ms(),
            timings.draw_calls
        );
    }

    Ok(())
}
