mod args;
mod output;

use feedpaper_infra::wallpaper::GnomeBackend;
use feedpaper_infra::{config_file, pipeline};

fn main() {
    if let Err(err) = real_main() {
        output::print_error(&err);
        std::process::exit(1);
    }
}

fn real_main() -> anyhow::Result<()> {
    use clap::Parser as _;

    let cli = args::Cli::parse();

    let mut cfg = config_file::load(cli.config.as_deref())?;
    cli.apply(&mut cfg);
    output::init_logging(cfg.quiet, cli.verbose);

    let setter = GnomeBackend::new(&cfg.gsettings, &cfg.session);
    let outcome = pipeline::run(&cfg, &setter)?;
    tracing::debug!(uri = %outcome.image_uri, path = %outcome.artifact.display(), "done");

    Ok(())
}
