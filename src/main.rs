use std::process;

use log::error;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(why) = openbc_rs_lib::run_simulation("Config") {
        error!("{}", why);
        process::exit(1);
    }
}
