//! Command-line leaderboard client: submits a finished run (optionally), flushes any queued
//! scores and prints the ranked board.
//!
//! ```text
//! webverse-sync [--name NAME --department DEPT --time SECONDS] [--offline]
//! ```

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use webverse_back::{
    config::AppConfig,
    game::{CompletedRun, PlayerProfile, scoring},
    sync::{FileEnvironment, HttpTransport, LeaderboardSync, LeaderboardView},
};

#[derive(Debug, Parser)]
#[command(about = "Submit a finished WebVerse run and print the leaderboard")]
struct Cli {
    /// Player name of the finished run.
    #[arg(long, requires = "time_taken")]
    name: Option<String>,
    /// Player department of the finished run.
    #[arg(long, requires = "time_taken")]
    department: Option<String>,
    /// Seconds the run took.
    #[arg(
        long = "time",
        value_name = "SECONDS",
        requires_all = ["name", "department"],
        value_parser = clap::value_parser!(u32).range(..=i64::from(scoring::SESSION_SECONDS)),
    )]
    time_taken: Option<u32>,
    /// Queue the run without touching the network.
    #[arg(long)]
    offline: bool,
}

impl Cli {
    fn completed_run(&self) -> anyhow::Result<Option<CompletedRun>> {
        let (Some(name), Some(department), Some(time_taken)) =
            (&self.name, &self.department, self.time_taken)
        else {
            return Ok(None);
        };
        let profile = PlayerProfile::new(name, department)?;
        Ok(Some(CompletedRun {
            profile,
            time_taken,
            score: scoring::score(time_taken),
        }))
    }
}

fn print_board(view: &LeaderboardView) {
    if let Some(own) = &view.own_result {
        println!(
            "Your result: {} ({}) in {} for {} points",
            own.name,
            own.department,
            own.clock(),
            own.score
        );
    }
    if let Some(notice) = &view.notice {
        println!("{}: {}", notice.message, notice.details);
    }
    if view.entries.is_empty() {
        println!("No leaderboard entries.");
    }
    for entry in &view.entries {
        let marker = if entry.is_current_player { "  <= you" } else { "" };
        println!(
            "{:>3}. {:<24} {:<16} {:>5} {:>4}{marker}",
            entry.rank,
            entry.name,
            entry.department,
            entry.clock(),
            entry.score
        );
    }
    if let Some(rank) = view.player_rank {
        println!("You placed #{rank}.");
    }
    if view.pending > 0 {
        println!("{} score(s) waiting to be uploaded.", view.pending);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load();
    let client = config.client();

    let transport = HttpTransport::new(client)?;
    let environment = FileEnvironment::new(&client.queue_path);
    environment.set_online(!cli.offline);

    let mut sync = LeaderboardSync::new(Arc::new(transport), Arc::new(environment));
    if let Some(run) = cli.completed_run()? {
        sync.set_completed_run(&run);
    }

    let (cycle, _handle) = sync.start_cycle();
    let view = cycle.await?;
    print_board(&view);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_run_arguments_build_a_completed_run() {
        let cli = Cli::try_parse_from([
            "webverse-sync",
            "--name",
            "Ada",
            "--department",
            "CS",
            "--time",
            "90",
        ])
        .unwrap();
        let run = cli.completed_run().unwrap().unwrap();
        assert_eq!(run.profile.name, "Ada");
        assert_eq!(run.score, scoring::score(90));
        assert!(!cli.offline);
    }

    #[test]
    fn board_only_invocation_has_no_run() {
        let cli = Cli::try_parse_from(["webverse-sync", "--offline"]).unwrap();
        assert!(cli.offline);
        assert!(cli.completed_run().unwrap().is_none());
    }

    #[test]
    fn partial_or_out_of_range_runs_are_refused() {
        assert!(Cli::try_parse_from(["webverse-sync", "--time", "90"]).is_err());
        assert!(Cli::try_parse_from(["webverse-sync", "--name", "Ada"]).is_err());
        assert!(
            Cli::try_parse_from([
                "webverse-sync",
                "--name",
                "Ada",
                "--department",
                "CS",
                "--time",
                "601",
            ])
            .is_err()
        );
    }
}
