//! a compact system statistics monitor.

use {
    std::{
        io::{self, BufWriter},
        process::ExitCode,
    },
    sysstats::{App, Args, Config},
};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::from(Args::from_env());
    let out = BufWriter::new(io::stdout().lock());

    match App::new(config).run(out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("sysstats: {error}");
            ExitCode::FAILURE
        }
    }
}
