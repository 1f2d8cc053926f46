//! Chain Reaction entry point
//!
//! Runs the reactor without a window, logging population summaries. A
//! graphical host would drive `tick` the same way and implement
//! `FrameRenderer` for its drawing layer.
//!
//! Usage:
//!   chain-reaction [--config FILE] [--profile fuel|moderated] [--seed N]
//!                  [--frames N] [--realtime] [--log-every N]
//!                  [--rods-in-at N] [--rods-out-at N]

use std::time::{Duration, Instant};

use chain_reaction::renderer::{Frame, FrameRenderer, HeadlessRenderer};
use chain_reaction::sim::{FixedStep, ReactorState, RodAdjust, TickInput, tick};
use chain_reaction::{ConfigError, ReactorConfig, ReactorProfile};

#[derive(Debug)]
struct Args {
    config: Option<String>,
    profile: Option<ReactorProfile>,
    seed: Option<u64>,
    frames: u64,
    realtime: bool,
    log_every: u64,
    /// Frame at which the rods start driving in (fast)
    rods_in_at: Option<u64>,
    /// Frame at which the rods start pulling out
    rods_out_at: Option<u64>,
}

impl Args {
    fn parse() -> Result<Self, String> {
        let mut args = Args {
            config: None,
            profile: None,
            seed: None,
            frames: 600,
            realtime: false,
            log_every: 60,
            rods_in_at: None,
            rods_out_at: None,
        };

        let mut it = std::env::args().skip(1);
        while let Some(arg) = it.next() {
            let mut value = |name: &str| it.next().ok_or_else(|| format!("{name} needs a value"));
            match arg.as_str() {
                "--config" => args.config = Some(value("--config")?),
                "--profile" => {
                    let name = value("--profile")?;
                    let profile = ReactorProfile::from_str(&name)
                        .ok_or_else(|| ConfigError::UnknownProfile(name).to_string())?;
                    args.profile = Some(profile);
                }
                "--seed" => args.seed = Some(parse_num(&value("--seed")?)?),
                "--frames" => args.frames = parse_num(&value("--frames")?)?,
                "--log-every" => args.log_every = parse_num(&value("--log-every")?)?,
                "--rods-in-at" => args.rods_in_at = Some(parse_num(&value("--rods-in-at")?)?),
                "--rods-out-at" => args.rods_out_at = Some(parse_num(&value("--rods-out-at")?)?),
                "--realtime" => args.realtime = true,
                other => return Err(format!("unknown argument: {other}")),
            }
        }
        Ok(args)
    }
}

fn parse_num(s: &str) -> Result<u64, String> {
    s.parse().map_err(|_| format!("not a number: {s}"))
}

/// Scripted host input: hold the rod key from the scheduled frame onward
fn scripted_input(args: &Args, frame: u64, fast_multiplier: u32) -> TickInput {
    let rods_in = args.rods_in_at.is_some_and(|at| frame >= at);
    let rods_out = args.rods_out_at.is_some_and(|at| frame >= at);
    let rods = match (rods_in, rods_out) {
        // The later schedule wins
        (true, true) if args.rods_in_at > args.rods_out_at => Some(RodAdjust::insert(fast_multiplier)),
        (true, true) => Some(RodAdjust::withdraw(1)),
        (true, false) => Some(RodAdjust::insert(fast_multiplier)),
        (false, true) => Some(RodAdjust::withdraw(1)),
        (false, false) => None,
    };
    TickInput {
        rods,
        ..Default::default()
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match (&args.config, args.profile) {
        (Some(path), _) => ReactorConfig::load(path)?,
        (None, Some(profile)) => ReactorConfig::from_profile(profile),
        (None, None) => ReactorConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    let fast_multiplier = config.layout.rod_fast_multiplier;
    let mut clock = FixedStep::new(config.fps);
    let frame_time = Duration::from_secs_f32(clock.step());
    let mut state = ReactorState::new(config)?;
    let mut renderer = HeadlessRenderer::new(args.log_every);

    log::info!(
        "Running {} frames ({})",
        args.frames,
        if args.realtime { "realtime" } else { "headless" }
    );

    let mut last = Instant::now();
    for frame in 0..args.frames {
        let elapsed = if args.realtime {
            let now = Instant::now();
            let dt = now.duration_since(last).as_secs_f32();
            last = now;
            dt
        } else {
            clock.step()
        };

        let input = scripted_input(&args, frame, fast_multiplier);
        for _ in 0..clock.advance(elapsed) {
            tick(&mut state, &input);
        }
        renderer.draw(&Frame::extract(&state));

        if args.realtime {
            let spent = last.elapsed();
            if spent < frame_time {
                std::thread::sleep(frame_time - spent);
            }
        }
    }

    if let Some(summary) = renderer.last_summary() {
        println!("{}", serde_json::to_string_pretty(summary)?);
    }
    log::info!(
        "Done after {} ticks, peak neutrons {}",
        state.time_ticks,
        renderer.peak_neutrons()
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Chain Reaction (native) starting...");

    let result = Args::parse()
        .map_err(Box::<dyn std::error::Error>::from)
        .and_then(run);
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}
