mod cli;
mod config;
mod event;
mod input;
mod interpreter;
mod logging;
mod pipeline;
mod scene;
mod slots;
mod trace;

fn main() -> anyhow::Result<()> {
    logging::init();
    cli::run()
}
