// ghstats entry point.
// Parses flags, sets up logging, and hands off to the application loop.

use clap::Parser;

mod app;
mod cache;
mod error;
mod github;
mod report;
mod state;

use app::App;

/// Track star, watcher, fork, and open-issue counts across a GitHub user's
/// repositories, with deltas since the previous run.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Fetch stats for this user and exit instead of opening the menu
    #[arg(short, long)]
    user: Option<String>,
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(err) = run(args).await {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> error::Result<()> {
    let mut app = App::new()?;

    match args.user {
        Some(username) => app.run_once(&username).await,
        None => app.run().await,
    }
}
