//! Neural Rink entry point
//!
//! Evaluates the built-in puck-tracking goalie and prints the JSON report.
//!
//! Usage: `neural-rink [rink-settings.json] [eval-settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("Evaluation failed: {err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Headless native tool only
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> neural_rink::Result<()> {
    use neural_rink::eval::TrackPuckPolicy;
    use neural_rink::{EvalSettings, RinkEnv, RinkSettings, evaluate};

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => RinkSettings::load(path)?,
        None => RinkSettings::default(),
    };
    let eval: EvalSettings = match args.next() {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => EvalSettings::default(),
    };

    log::info!(
        "Neural Rink evaluation: {} episodes, seed {}",
        eval.episode_count,
        eval.seed
    );
    let mut env = RinkEnv::new(settings, eval.seed)?;
    let report = evaluate(&mut env, &mut TrackPuckPolicy::default(), &eval)?;
    println!("{}", report.to_json_pretty()?);
    Ok(())
}
