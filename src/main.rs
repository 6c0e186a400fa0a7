use std::path::Path;

use cellflow::config::{Config, DemoKind};
use cellflow::viewer::Viewer;

fn usage() -> ! {
    log::error!("Usage: cellflow [cube|life] [config.toml]");
    std::process::exit(1);
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);

    let demo = match args.next() {
        Some(arg) => match arg.parse::<DemoKind>() {
            Ok(demo) => demo,
            Err(e) => {
                log::error!("{e}");
                usage();
            }
        },
        None => DemoKind::Life,
    };

    let config = match args.next() {
        Some(path) => match Config::load(Path::new(&path)) {
            Ok(config) => config,
            Err(e) => {
                log::error!("failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    let viewer = Viewer::builder()
        .with_demo(demo)
        .with_config(config)
        .build();

    if let Err(e) = viewer.run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
