//! Schema migrations for the Domus database.
//!
//! Usage:
//!   migrator [up]     - Apply pending migrations
//!   migrator down [N] - Roll back the last N migrations (default 1)
//!   migrator status   - List applied and pending migrations
//!   migrator fresh    - Drop every table and re-apply all migrations
//!   migrator reset    - Roll back every migration
//!
//! The database is `DATABASE_URL` when set, otherwise `database.url` from the
//! same layered configuration the server reads (`config/`, `DOMUS__DATABASE__URL`).

use anyhow::{Context, bail};
use domus_db::migration::{Migrator, MigratorTrait};
use domus_shared::AppConfig;

enum Command {
    Up,
    Down(u32),
    Status,
    Fresh,
    Reset,
}

impl Command {
    fn parse(mut args: impl Iterator<Item = String>) -> anyhow::Result<Self> {
        let command = match args.next().as_deref() {
            None | Some("up") => Self::Up,
            Some("down") => {
                let steps = match args.next() {
                    Some(raw) => raw
                        .parse::<u32>()
                        .with_context(|| format!("invalid step count: {raw}"))?,
                    None => 1,
                };
                Self::Down(steps)
            }
            Some("status") => Self::Status,
            Some("fresh") => Self::Fresh,
            Some("reset") => Self::Reset,
            Some(other) => {
                bail!("unknown command: {other} (expected up, down, status, fresh or reset)")
            }
        };
        Ok(command)
    }
}

fn database_url() -> anyhow::Result<String> {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return Ok(url);
    }
    let config =
        AppConfig::load().context("DATABASE_URL is unset and configuration failed to load")?;
    Ok(config.database.url)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let command = Command::parse(std::env::args().skip(1))?;
    let db = domus_db::connect_url(&database_url()?)
        .await
        .context("Failed to connect to database")?;

    match command {
        Command::Up => {
            Migrator::up(&db, None).await?;
            println!("Migrations applied");
        }
        Command::Down(steps) => {
            Migrator::down(&db, Some(steps)).await?;
            println!("Rolled back {steps} migration(s)");
        }
        Command::Status => Migrator::status(&db).await?,
        Command::Fresh => {
            Migrator::fresh(&db).await?;
            println!("Schema rebuilt");
        }
        Command::Reset => {
            Migrator::reset(&db).await?;
            println!("All migrations rolled back");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> anyhow::Result<Command> {
        Command::parse(args.iter().map(ToString::to_string))
    }

    #[test]
    fn test_no_command_applies_migrations() {
        assert!(matches!(parse(&[]).unwrap(), Command::Up));
    }

    #[test]
    fn test_down_defaults_to_one_step() {
        assert!(matches!(parse(&["down"]).unwrap(), Command::Down(1)));
        assert!(matches!(parse(&["down", "2"]).unwrap(), Command::Down(2)));
        assert!(parse(&["down", "all"]).is_err());
    }

    #[test]
    fn test_unknown_command_is_refused() {
        assert!(parse(&["seed"]).is_err());
    }
}
