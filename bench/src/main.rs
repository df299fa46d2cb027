use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use layerstack::{
    BlendingMode, Color, Drawable, FillMode, Offscreen, Raster, Rect, SolidColor, StackOpts,
    StreamableStack, Surface,
};
use serde_json::json;
use sha2::Digest as _;

#[derive(Clone, Debug)]
struct BenchArgs {
    width: u32,
    height: u32,
    layers: u32,
    warmup: u32,
    repeats: u32,
    fill_mode: FillMode,
    eliminate_dead_layers: bool,
    report: Option<PathBuf>,
}

#[derive(Clone, Debug, Default)]
struct RunMetrics {
    compile: Duration,
    draw: Duration,
    wall_total: Duration,
}

fn main() {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> anyhow::Result<()> {
    let args = parse_args()?;

    if args.width == 0 || args.height == 0 {
        anyhow::bail!("--width/--height must be > 0");
    }
    if args.width > i16::MAX as u32 || args.height > i16::MAX as u32 {
        anyhow::bail!("--width/--height must fit in i16 coordinates");
    }
    if args.layers == 0 || args.layers as usize > layerstack::MAX_INPUTS {
        anyhow::bail!("--layers must be in 1..={}", layerstack::MAX_INPUTS);
    }

    let bounds = Rect::new(0, 0, args.width as i16 - 1, args.height as i16 - 1);
    let scene = Scene::build(bounds, args.layers);
    let mut stack = StreamableStack::new(bounds).with_opts(StackOpts {
        eliminate_dead_layers: args.eliminate_dead_layers,
    });
    for (i, layer) in scene.layers.iter().enumerate() {
        let input = match layer {
            SceneLayer::Solid(s) => stack.add_input(s)?,
            SceneLayer::Raster(r) => stack.add_input(r)?,
        };
        input.with_mode(scene.modes[i]);
    }

    let mut screen = Offscreen::with_size(args.width, args.height, Color::BLACK)?;

    if args.warmup > 0 {
        eprintln!("warmup: {} run(s)", args.warmup);
        for _ in 0..args.warmup {
            let _ = run_once(&args, &stack, &mut screen);
        }
    }

    eprintln!(
        "bench: {repeats} run(s) ({profile} build), {w}x{h}, layers={layers}, fill={fill:?}, elimination={elim}",
        repeats = args.repeats,
        profile = if cfg!(debug_assertions) {
            "debug"
        } else {
            "release"
        },
        w = args.width,
        h = args.height,
        layers = args.layers,
        fill = args.fill_mode,
        elim = if args.eliminate_dead_layers { "on" } else { "off" },
    );

    let mut runs = Vec::<RunMetrics>::with_capacity(args.repeats as usize);
    for _ in 0..args.repeats {
        runs.push(run_once(&args, &stack, &mut screen));
    }

    let program_words = stack.compile_for(bounds).len();
    let growth: Vec<serde_json::Value> = [1u32, 2, 4, 8]
        .iter()
        .map(|&scale| {
            let w = (args.width * scale).min(i16::MAX as u32);
            let h = (args.height * scale).min(i16::MAX as u32);
            let words = stack
                .compile_for(Rect::new(0, 0, w as i16 - 1, h as i16 - 1))
                .len();
            eprintln!("program at {w}x{h}: {words} words");
            json!({ "width": w, "height": h, "program_words": words })
        })
        .collect();
    let digest = pixels_sha256_hex(screen.pixels());
    eprintln!("program: {program_words} words");
    eprintln!("frame sha256: {digest}");
    report_percentiles(&runs);

    if let Some(path) = &args.report {
        let report = json!({
            "width": args.width,
            "height": args.height,
            "layers": args.layers,
            "fill_mode": args.fill_mode,
            "eliminate_dead_layers": args.eliminate_dead_layers,
            "repeats": args.repeats,
            "program_words": program_words,
            "program_growth": growth,
            "frame_sha256": digest,
            "compile_ms": summary(&runs, |m| m.compile),
            "draw_ms": summary(&runs, |m| m.draw),
            "wall_ms": summary(&runs, |m| m.wall_total),
        });
        let text = serde_json::to_string_pretty(&report).context("serialize bench report")?;
        std::fs::write(path, text)
            .with_context(|| format!("write bench report '{}'", path.display()))?;
        eprintln!("report: {}", path.display());
    }
    Ok(())
}

enum SceneLayer {
    Solid(SolidColor),
    Raster(Raster),
}

struct Scene {
    layers: Vec<SceneLayer>,
    modes: Vec<BlendingMode>,
}

impl Scene {
    /// Opaque backdrop plus overlapping translucent panels and gradients,
    /// staggered across the frame.
    fn build(bounds: Rect, count: u32) -> Self {
        let w = i32::from(bounds.x_max()) + 1;
        let h = i32::from(bounds.y_max()) + 1;
        let mut layers = Vec::with_capacity(count as usize);
        let mut modes = Vec::with_capacity(count as usize);

        layers.push(SceneLayer::Solid(SolidColor::new(bounds, Color(0xFF20_2830))));
        modes.push(BlendingMode::SourceOver);

        for i in 1..count as i32 {
            let x0 = (w * (i % 4)) / 6;
            let y0 = (h * (i % 3)) / 5;
            let x1 = (x0 + w / 2).min(w - 1);
            let y1 = (y0 + h / 2).min(h - 1);
            let rect = Rect::new(x0 as i16, y0 as i16, x1 as i16, y1 as i16);
            if i % 2 == 0 {
                let tint = (i as u32 * 0x1F) & 0xFF;
                layers.push(SceneLayer::Raster(Raster::from_fn(rect, |x, y| {
                    let a = ((x as u32 + y as u32) & 0xFF) as u8;
                    Color::argb(a, tint as u8, (x as u32 & 0xFF) as u8, (y as u32 & 0xFF) as u8)
                })));
            } else {
                layers.push(SceneLayer::Solid(SolidColor::new(
                    rect,
                    Color(0x8000_0000 | (i as u32).wrapping_mul(0x0035_71A9) & 0xFF_FFFF),
                )));
            }
            modes.push(if i % 5 == 0 {
                BlendingMode::Source
            } else {
                BlendingMode::SourceOver
            });
        }
        Self { layers, modes }
    }
}

fn run_once(args: &BenchArgs, stack: &StreamableStack<'_>, screen: &mut Offscreen) -> RunMetrics {
    let wall = Instant::now();

    let t = Instant::now();
    let program = stack.compile_for(stack.extents());
    let compile = t.elapsed();
    std::hint::black_box(program);

    let clip = screen.extents();
    let t = Instant::now();
    {
        let mut surface = Surface::new(screen, clip).with_fill_mode(args.fill_mode);
        stack.draw_to(&mut surface);
    }
    let draw = t.elapsed();

    RunMetrics {
        compile,
        draw,
        wall_total: wall.elapsed(),
    }
}

fn pixels_sha256_hex(pixels: &[Color]) -> String {
    let mut hasher = sha2::Sha256::new();
    for c in pixels {
        hasher.update(c.0.to_le_bytes());
    }
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}

fn parse_args() -> anyhow::Result<BenchArgs> {
    let mut args = std::env::args().skip(1);

    let mut out = BenchArgs {
        width: 320,
        height: 240,
        layers: 8,
        warmup: 3,
        repeats: 100,
        fill_mode: FillMode::Rectangle,
        eliminate_dead_layers: true,
        report: None,
    };

    while let Some(a) = args.next() {
        match a.as_str() {
            "--width" => out.width = parse_u32(args.next(), "--width")?,
            "--height" => out.height = parse_u32(args.next(), "--height")?,
            "--layers" => out.layers = parse_u32(args.next(), "--layers")?,
            "--warmup" => out.warmup = parse_u32(args.next(), "--warmup")?,
            "--repeats" => out.repeats = parse_u32(args.next(), "--repeats")?,
            "--fill" => {
                let v = args.next().ok_or_else(|| {
                    anyhow::anyhow!("missing value for --fill (visible|rectangle)")
                })?;
                out.fill_mode = match v.as_str() {
                    "visible" => FillMode::Visible,
                    "rectangle" => FillMode::Rectangle,
                    _ => anyhow::bail!("unknown --fill '{v}' (expected visible|rectangle)"),
                };
            }
            "--no-elimination" => out.eliminate_dead_layers = false,
            "--report" => {
                out.report = Some(PathBuf::from(args.next().ok_or_else(|| {
                    anyhow::anyhow!("missing value for --report (expected a path)")
                })?))
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => anyhow::bail!("unknown arg '{a}' (try --help)"),
        }
    }

    Ok(out)
}

fn print_help() {
    eprintln!(
        r#"layerstack-bench

Composites a layered scene repeatedly and reports p50/p90/p99 per stage.

Usage:
  cargo run -q --release
  cargo run -q --release -- --width 800 --height 480 --layers 16
  cargo run -q --release -- --fill visible --report bench.json

Args:
  --width N          (default 320)
  --height N         (default 240)
  --layers N         (default 8; at most 16)
  --warmup N         (default 3)
  --repeats N        (default 100)
  --fill MODE        visible|rectangle (default rectangle)
  --no-elimination   keep layers hidden under opaque ones in the program
  --report PATH      write a JSON summary
"#
    );
}

fn parse_u32(v: Option<String>, flag: &str) -> anyhow::Result<u32> {
    let v = v.ok_or_else(|| anyhow::anyhow!("missing value for {flag}"))?;
    v.parse::<u32>()
        .with_context(|| format!("parse {flag} value '{v}'"))
}

type Getter = fn(&RunMetrics) -> Duration;

fn sorted(runs: &[RunMetrics], f: Getter) -> Vec<Duration> {
    let mut v = runs.iter().map(f).collect::<Vec<_>>();
    v.sort_by_key(|d| d.as_nanos());
    v
}

fn percentile(v: &[Duration], p: f64) -> Duration {
    if v.is_empty() {
        return Duration::ZERO;
    }
    let n = v.len();
    let rank = (p * (n as f64)).ceil().clamp(1.0, n as f64) as usize;
    v[rank - 1]
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

fn summary(runs: &[RunMetrics], f: Getter) -> serde_json::Value {
    let v = sorted(runs, f);
    json!({
        "p50": ms(percentile(&v, 0.50)),
        "p90": ms(percentile(&v, 0.90)),
        "p99": ms(percentile(&v, 0.99)),
    })
}

fn report_percentiles(runs: &[RunMetrics]) {
    let fields: &[(&str, Getter)] = &[
        ("compile", |m| m.compile),
        ("draw", |m| m.draw),
        ("wall_total", |m| m.wall_total),
    ];

    eprintln!("\npercentiles across runs (p50/p90/p99):");
    for (name, getter) in fields {
        let v = sorted(runs, *getter);
        eprintln!(
            "  {name:12} p50={p50:>10}  p90={p90:>10}  p99={p99:>10}",
            name = *name,
            p50 = format!("{:.3}ms", ms(percentile(&v, 0.50))),
            p90 = format!("{:.3}ms", ms(percentile(&v, 0.90))),
            p99 = format!("{:.3}ms", ms(percentile(&v, 0.99))),
        );
    }
}
