use dlv_cli::{command, config_from_matches, logging, App};

fn main() -> anyhow::Result<()> {
    let matches = command().get_matches();
    let config = config_from_matches(&matches)?;
    logging::init(&config.log, matches.get_flag("log-json"))?;

    let mut app = App::open(config)?;
    let output = app.run(&matches);
    app.flush()?;
    print!("{}", output?);
    Ok(())
}
