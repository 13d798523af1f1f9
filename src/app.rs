// Application loop and fetch orchestration.
// Menu-driven user selection, read-through cached fetching, delta reporting,
// and history persistence.

use std::io::{self, Write};
use std::path::PathBuf;

use chrono::Utc;
use crossterm::{
    cursor::MoveTo,
    execute,
    terminal::{Clear, ClearType},
};
use log::warn;

use crate::cache::{paths, store};
use crate::error::{GhStatsError, Result};
use crate::github::{GitHubClient, RepoSnapshot};
use crate::report;
use crate::state::HistoryStore;

/// Outcome of the user-selection menu.
enum Selection {
    User(String),
    Quit,
}

/// Application state: API client, persisted history, and cache location.
pub struct App {
    client: GitHubClient,
    history: HistoryStore,
    cache_dir: PathBuf,
}

impl App {
    /// Wire the app against the public GitHub API and platform directories.
    pub fn new() -> Result<Self> {
        let no_home = || GhStatsError::Other("could not determine a home directory".to_string());
        let history_path = paths::history_path().ok_or_else(no_home)?;
        let cache_dir = paths::cache_dir().ok_or_else(no_home)?;

        Ok(Self {
            client: GitHubClient::new()?,
            history: HistoryStore::load(history_path)?,
            cache_dir,
        })
    }

    /// Assemble an app from explicit parts.
    pub fn with_parts(client: GitHubClient, history: HistoryStore, cache_dir: PathBuf) -> Self {
        Self {
            client,
            history,
            cache_dir,
        }
    }

    /// Interactive loop: menu, fetch, report, back to the menu.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            clear_screen();
            banner();

            match self.select_username()? {
                Selection::Quit => return Ok(()),
                Selection::User(username) => {
                    eprintln!("Fetching repositories...");
                    self.run_once(&username).await?;
                    prompt("Press Enter to return to the menu")?;
                }
            }
        }
    }

    /// One fetch-report-persist cycle for a username.
    ///
    /// History is written once, at the end, only when the fetch succeeded;
    /// a failed run leaves the document untouched.
    pub async fn run_once(&mut self, username: &str) -> Result<()> {
        let snapshots = self.repositories_for(username).await?;

        println!();
        print!("{}", report::render(&snapshots, self.history.history()));
        println!();

        self.history.add_username(username);
        for snapshot in snapshots {
            self.history.upsert(snapshot);
        }
        self.history.save()
    }

    /// Read-through cache around the paginated fetch and watcher enrichment.
    ///
    /// Cache reads and writes are best-effort; only the network fetch itself
    /// can fail the call.
    async fn repositories_for(&self, username: &str) -> Result<Vec<RepoSnapshot>> {
        let cache_path = paths::user_repos_path_in(&self.cache_dir, username);

        match store::read_if_valid::<Vec<RepoSnapshot>>(&cache_path, store::DEFAULT_TTL) {
            Ok(Some(snapshots)) => return Ok(snapshots),
            Ok(None) => {}
            Err(err) => warn!(
                "ignoring unreadable cache entry {}: {}",
                cache_path.display(),
                err
            ),
        }

        let repos = self.client.all_user_repos(username).await?;
        let fetched_at = Utc::now();

        let mut snapshots = Vec::with_capacity(repos.len());
        for repo in &repos {
            let watchers = self.client.subscriber_count(&repo.subscribers_url).await;
            snapshots.push(RepoSnapshot::from_repository(repo, watchers, fetched_at));
        }

        if let Err(err) = store::write_cached(&cache_path, &snapshots) {
            warn!(
                "could not write cache entry {}: {}",
                cache_path.display(),
                err
            );
        }

        Ok(snapshots)
    }

    /// Show the user menu and read a choice from stdin.
    fn select_username(&mut self) -> Result<Selection> {
        if self.history.usernames().is_empty() {
            return Ok(Selection::User(prompt("Enter a GitHub username: ")?));
        }

        loop {
            eprintln!();
            eprintln!("Please Select User:");
            for (i, user) in self.history.usernames().iter().enumerate() {
                eprintln!("{}. {}", i + 1, user);
            }
            eprintln!("N. New User");
            eprintln!("R. Remove User");
            eprintln!("Q. Quit");

            let input = prompt("Enter your choice: ")?;
            match input.as_str() {
                "n" | "N" => return Ok(Selection::User(prompt("Enter a GitHub username: ")?)),
                "r" | "R" => self.remove_user_menu()?,
                "q" | "Q" => return Ok(Selection::Quit),
                other => match other.parse::<usize>() {
                    Ok(choice) if (1..=self.history.usernames().len()).contains(&choice) => {
                        return Ok(Selection::User(
                            self.history.usernames()[choice - 1].clone(),
                        ));
                    }
                    _ => eprintln!("Invalid choice, please try again."),
                },
            }
        }
    }

    /// Submenu for removing a tracked user and its history entries.
    fn remove_user_menu(&mut self) -> Result<()> {
        loop {
            let count = self.history.usernames().len();
            if count == 0 {
                return Ok(());
            }

            eprintln!();
            eprintln!("Select User to Remove:");
            for (i, user) in self.history.usernames().iter().enumerate() {
                eprintln!("{}. {}", i + 1, user);
            }
            eprintln!("{}. Go Back", count + 1);

            let input = prompt("Enter your choice: ")?;
            match input.parse::<usize>() {
                Ok(choice) if choice == count + 1 => return Ok(()),
                Ok(choice) if (1..=count).contains(&choice) => {
                    let username = self.history.usernames()[choice - 1].clone();
                    return self.history.remove_user(&username);
                }
                _ => eprintln!("Invalid choice, please try again."),
            }
        }
    }
}

/// Prompt on stderr and read one trimmed line from stdin.
fn prompt(message: &str) -> Result<String> {
    eprint!("{}", message);
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn banner() {
    eprintln!(" ------------------- ");
    eprintln!("| GitHub Repo Stats |");
    eprintln!(" ------------------- ");
    eprintln!();
}

fn clear_screen() {
    let _ = execute!(io::stderr(), Clear(ClearType::All), MoveTo(0, 0));
}
