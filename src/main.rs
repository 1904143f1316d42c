//! MMOpy replay tool
//!
//! Rebuilds a bird's flight from a seed and its jump frames, the same way the
//! server re-derives a player's run, and prints what every peer would see.
//!
//! Usage: `mmopy <seed> [jump frame ...]`
//! Set `MMOPY_CONFIG` to a JSON file to override the default constants and
//! `MMOPY_NOISE` (`sine` or `pcg`) to pick the wall noise.

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `mmopy::wasm::wasm_start`
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    if let Err(message) = native::run() {
        log::error!("{}", message);
        eprintln!("error: {}", message);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::env;

    use mmopy::{SimConfig, Simulation};

    /// How far behind/ahead of the bird walls are listed
    const VIEW_BEHIND: f64 = 1000.0;
    const VIEW_AHEAD: f64 = 4000.0;

    fn load_config() -> Result<SimConfig, String> {
        let mut config = match env::var("MMOPY_CONFIG") {
            Ok(path) => {
                let json = std::fs::read_to_string(&path)
                    .map_err(|e| format!("cannot read {}: {}", path, e))?;
                let config = SimConfig::from_json(&json).map_err(|e| e.to_string())?;
                log::info!("Loaded config from {}", path);
                config
            }
            Err(_) => SimConfig::default(),
        };
        if let Ok(name) = env::var("MMOPY_NOISE") {
            config = config.with_noise_name(&name).map_err(|e| e.to_string())?;
        }
        log::info!("Wall noise: {}", config.wall_noise.as_str());
        Ok(config)
    }

    pub fn run() -> Result<(), String> {
        let mut args = env::args().skip(1);
        let seed = match args.next() {
            Some(s) => s
                .parse::<i64>()
                .map_err(|e| format!("invalid seed {:?}: {}", s, e))?,
            None => 0,
        };
        let jumps = args
            .map(|a| a.parse::<f64>().map_err(|e| format!("invalid jump frame {:?}: {}", a, e)))
            .collect::<Result<Vec<f64>, String>>()?;

        let config = load_config()?;
        log::info!("MMOpy replay: seed {} with {} jumps", seed, jumps.len());
        let sim = Simulation::replay(config, seed, &jumps).map_err(|e| e.to_string())?;

        println!("Anchors:");
        for anchor in sim.anchors() {
            println!(
                "  t={:>6} x={:>9.2} y={:>8.2} v={:>6.2} valid={}",
                anchor.time, anchor.x, anchor.y, anchor.vspeed, anchor.valid
            );
        }

        let last = sim.last_state().map_err(|e| e.to_string())?;
        let crash_time = sim.next_bird_collision(&last);
        let crash = sim.position_at(crash_time).map_err(|e| e.to_string())?;
        let at = crash.position();
        println!("Crash at t={:.3} (x={:.2}, y={:.2})", crash_time, at.x, at.y);

        println!("Walls in view:");
        for wall in sim.walls_between(last.x - VIEW_BEHIND, last.x + VIEW_AHEAD) {
            println!(
                "  #{:<4} x={:>8.1} gap {:>7.2}..{:>7.2}",
                wall.index,
                wall.x(sim.config()),
                wall.gap_bottom(sim.config()),
                wall.gap_top(sim.config())
            );
        }
        Ok(())
    }
}
