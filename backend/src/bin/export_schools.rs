//! Export the school roster as CSV.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io::{self, Write as _};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use looma_backend::domain::ports::SchoolsQuery;
use looma_backend::domain::{SchoolFilter, SchoolService, SchoolStatus, schools_to_csv};
use looma_backend::outbound::persistence::{DbPool, DieselSchoolRepository, PoolConfig};
use mockable::DefaultClock;
use tokio::runtime::Builder;

const DATABASE_URL_ENV: &str = "LOOMA_DATABASE_URL";

/// `export-schools` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "export-schools",
    about = "Write the school roster as CSV, ordered by name",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `LOOMA_DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    /// Only export schools with this status.
    #[arg(long, value_name = "online|offline|maintenance", value_parser = parse_status)]
    status: Option<SchoolStatus>,
    /// Only export schools in this province.
    #[arg(long, value_name = "name")]
    province: Option<String>,
    /// Write to this file instead of stdout.
    #[arg(long, short, value_name = "path")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    let csv = runtime.block_on(export(&args))?;

    match &args.output {
        Some(path) => std::fs::write(path, csv)
            .wrap_err_with(|| format!("write export to '{}'", path.display()))?,
        None => io::stdout()
            .lock()
            .write_all(csv.as_bytes())
            .wrap_err("write export to stdout")?,
    }
    Ok(())
}

async fn export(args: &CliArgs) -> Result<String> {
    let database_url =
        resolve_database_url(args.database_url.clone(), env::var(DATABASE_URL_ENV).ok())?;
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(1))
        .await
        .map_err(|err| eyre!("create database pool: {err}"))?;
    let schools = SchoolService::new(
        Arc::new(DieselSchoolRepository::new(pool)),
        Arc::new(DefaultClock),
    );
    let filter = SchoolFilter::new(None, args.status, args.province.clone());
    let roster = schools
        .list(filter, None)
        .await
        .map_err(|err| eyre!("list schools: {err}"))?;
    Ok(schools_to_csv(&roster))
}

fn parse_status(raw: &str) -> Result<SchoolStatus, String> {
    raw.trim()
        .to_ascii_lowercase()
        .parse()
        .map_err(|err: looma_backend::domain::SchoolValidationError| err.to_string())
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(eyre!("--database-url must not be empty when provided"));
        }
        return Ok(value);
    }
    from_env
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| eyre!("database URL missing: set --database-url or {DATABASE_URL_ENV}"))
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI parsing helpers.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("online", SchoolStatus::Online)]
    #[case(" Maintenance ", SchoolStatus::Maintenance)]
    fn status_parser_is_lenient_about_case(#[case] raw: &str, #[case] expected: SchoolStatus) {
        assert_eq!(parse_status(raw), Ok(expected));
    }

    #[rstest]
    fn status_parser_rejects_unknown_values() {
        assert!(parse_status("retired").is_err());
    }

    #[rstest]
    #[case(
        Some("postgres://cli/looma"),
        Some("postgres://env/looma"),
        Some("postgres://cli/looma")
    )]
    #[case(None, Some("postgres://env/looma"), Some("postgres://env/looma"))]
    #[case(Some(" "), Some("postgres://env/looma"), None)]
    #[case(None, Some(""), None)]
    #[case(None, None, None)]
    fn database_url_prefers_the_flag(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        let resolved =
            resolve_database_url(explicit.map(str::to_owned), from_env.map(str::to_owned));
        assert_eq!(resolved.ok().as_deref(), expected);
    }

    #[rstest]
    fn cli_accepts_filters_and_output() {
        let args = CliArgs::try_parse_from([
            "export-schools",
            "--status",
            "offline",
            "--province",
            "Gandaki",
            "-o",
            "roster.csv",
        ])
        .expect("arguments should parse");
        assert_eq!(args.status, Some(SchoolStatus::Offline));
        assert_eq!(args.province.as_deref(), Some("Gandaki"));
        assert_eq!(args.output, Some(PathBuf::from("roster.csv")));
    }
}
