use getopts::{Matches, Options};
use log::*;
use schwarzschild::black_hole::BlackHole;
use schwarzschild::config::Config;
use schwarzschild::error::{Error, Result};
use schwarzschild::presets::{self, View};
use schwarzschild::renderer::Renderer;
use schwarzschild::*;
use std::str::FromStr;

struct Job {
    config: Config,
    mass: f64,
    views: Vec<View>,
    correct_aspect: bool,
    print_config: bool,
    export_config: Option<String>,
}

fn options() -> Options {
    let mut opts = Options::new();
    opts.optopt("", "width", "image width in pixels", "PX");
    opts.optopt("", "height", "image height in pixels", "PX");
    opts.optopt("", "fov", "vertical field of view in degrees", "DEG");
    opts.optopt("m", "mass", "black hole mass", "M");
    opts.optmulti("v", "view", "camera view (front, side, top, close, wide or 1-5)", "VIEW");
    opts.optflag("a", "all-views", "render every camera preset");
    opts.optopt("s", "ssaa", "supersampling level per pixel edge", "N");
    opts.optflag("", "no-aa", "disable supersampling");
    opts.optflag("", "no-flare", "disable lens flare");
    opts.optflag("", "no-doppler", "disable doppler brightening");
    opts.optflag("", "no-turbulence", "disable disk turbulence");
    opts.optflag("", "no-post", "disable contrast post-processing");
    opts.optopt("g", "gamma", "apply gamma correction", "GAMMA");
    opts.optflag("", "correct-aspect", "scale rays by the image aspect ratio");
    opts.optopt("t", "threads", "render threads (0 = all cores)", "N");
    opts.optopt("o", "output", "output file prefix", "PREFIX");
    opts.optflag("q", "quiet", "do not report progress");
    opts.optflag("", "print-config", "log the effective configuration");
    opts.optopt("", "export-config", "write the effective configuration", "FILE");
    opts.optflag("h", "help", "print this help");
    opts
}

fn parse<T: FromStr>(matches: &Matches, name: &str) -> Result<Option<T>> {
    match matches.opt_str(name) {
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| Error::InvalidConfig(format!("bad value for --{}: {}", name, s))),
        None => Ok(None),
    }
}

fn job(matches: &Matches) -> Result<Job> {
    let mut config = Config::default();

    if let Some(w) = parse(matches, "width")? {
        config.rendering.width = w;
    }
    if let Some(h) = parse(matches, "height")? {
        config.rendering.height = h;
    }
    if let Some(fov) = parse::<f64>(matches, "fov")? {
        config.rendering.fov = fov.to_radians();
    }
    if let Some(n) = parse(matches, "ssaa")? {
        config.rendering.super_sampling_level = n;
    }
    config.rendering.antialiasing &= !matches.opt_present("no-aa");
    config.rendering.post_processing &= !matches.opt_present("no-post");
    config.effects.lens_flare &= !matches.opt_present("no-flare");
    config.effects.doppler_shift &= !matches.opt_present("no-doppler");
    config.effects.turbulence &= !matches.opt_present("no-turbulence");
    if let Some(gamma) = parse(matches, "gamma")? {
        config.post.gamma = gamma;
        config.post.apply_gamma = true;
    }
    if let Some(threads) = parse::<usize>(matches, "threads")? {
        config.system.multithreading = threads != 1;
        if threads > 0 {
            config.system.max_threads = threads;
        } else {
            config.system.max_threads = num_cpus::get();
        }
    }
    if let Some(prefix) = matches.opt_str("output") {
        config.output.prefix = prefix;
    }
    config.output.show_progress &= !matches.opt_present("quiet");
    config.validate()?;

    let views = if matches.opt_present("all-views") {
        presets::views()
    } else {
        let keys = matches.opt_strs("view");
        if keys.is_empty() {
            presets::DEFAULT_VIEWS
                .iter()
                .map(|k| presets::find(k))
                .collect::<Result<Vec<_>>>()?
        } else {
            keys.iter()
                .map(|k| presets::find(k))
                .collect::<Result<Vec<_>>>()?
        }
    };

    Ok(Job {
        config,
        mass: parse(matches, "mass")?.unwrap_or(1.0),
        views,
        correct_aspect: matches.opt_present("correct-aspect"),
        print_config: matches.opt_present("print-config"),
        export_config: matches.opt_str("export-config"),
    })
}

fn run(job: Job) -> Result<()> {
    let config = &job.config;
    if job.print_config {
        config.log();
    }
    if let Some(path) = &job.export_config {
        config.export(path)?;
        info!("configuration written to {}", path);
    }

    let black_hole = BlackHole::with_physics(P3::origin(), job.mass, config.physics)?;
    let aspect = config.rendering.width as f64 / config.rendering.height as f64;
    let renderer = Renderer;
    let total = job.views.len();
    for (i, view) in job.views.iter().enumerate() {
        info!("rendering view {}/{}: {}", i + 1, total, view.name);
        let camera = view.camera(config.rendering.fov);
        let camera = if job.correct_aspect {
            camera.with_aspect_ratio(aspect)
        } else {
            camera
        };
        debug!("{} camera looks along {:?}", view.slug(), camera.forward());
        let image = renderer.render(&black_hole, &camera, config)?;
        let filename = format!("{}{}.ppm", config.output.prefix, i + 1);
        image.write_ppm(&filename)?;
        info!("saved {}", filename);
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().collect();
    let opts = options();
    let matches = match opts.parse(&args[1..]) {
        Ok(m) => m,
        Err(e) => {
            error!("{}", e);
            std::process::exit(2);
        }
    };
    if matches.opt_present("help") {
        let brief = format!("Usage: {} [options]", args[0]);
        print!("{}", opts.usage(&brief));
        return;
    }

    if let Err(e) = job(&matches).and_then(run) {
        error!("{}", e);
        std::process::exit(1);
    }
}
