//! CLI smoke entry point.
//!
//! # Responsibility
//! - Wire config, logging and the employee store together end to end.
//! - Keep output deterministic for quick local sanity checks.
//!
//! Usage: `staffdb_cli [field=value ...]`. Each argument adds an exact-match
//! condition (`firstName=Ada department=R&D`); matching employees are
//! printed one JSON object per line.

use log::info;
use staffdb_core::{
    init_logging_from_config, open_store, EmployeeFilter, EmployeeRepository,
    SqliteEmployeeRepository, StoreConfig,
};
use std::error::Error;
use std::process::ExitCode;

fn main() -> ExitCode {
    match run(std::env::args().skip(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("staffdb_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: impl Iterator<Item = String>) -> Result<(), Box<dyn Error>> {
    let filter = parse_filter_args(args)?;
    let config = StoreConfig::from_env()?;
    let logging_enabled = init_logging_from_config(&config)?;

    let conn = open_store(&config)?;
    let repo = SqliteEmployeeRepository::try_new(&conn)?;
    let employees = repo.find_all(&filter)?;
    info!(
        "event=cli_run module=cli status=ok conditions={} matched={}",
        filter.conditions().count(),
        employees.len()
    );

    println!("staffdb_core ping={}", staffdb_core::ping());
    println!("staffdb_core version={}", staffdb_core::core_version());
    println!(
        "store={}",
        config
            .db_path
            .as_deref()
            .map_or_else(|| "memory".to_string(), |path| path.display().to_string())
    );
    println!("logging={}", if logging_enabled { "on" } else { "off" });
    println!("employees={}", employees.len());
    for employee in &employees {
        println!("{}", serde_json::to_string(employee)?);
    }
    Ok(())
}

fn parse_filter_args(
    args: impl Iterator<Item = String>,
) -> Result<EmployeeFilter, Box<dyn Error>> {
    let mut pairs = Vec::new();
    for arg in args {
        let (name, value) = arg
            .split_once('=')
            .ok_or_else(|| format!("expected `field=value`, got `{arg}`"))?;
        pairs.push((name.to_string(), value.to_string()));
    }
    Ok(EmployeeFilter::from_pairs(pairs)?)
}

#[cfg(test)]
mod tests {
    use super::parse_filter_args;
    use staffdb_core::EmployeeFilter;

    fn args(values: &[&str]) -> impl Iterator<Item = String> {
        values
            .iter()
            .map(|value| value.to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn no_arguments_select_everything() {
        let filter = parse_filter_args(args(&[])).unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn arguments_become_exact_match_conditions() {
        let filter = parse_filter_args(args(&["firstName=Ada", "department=R&D=1"])).unwrap();
        assert_eq!(
            filter,
            EmployeeFilter::all().first_name("Ada").department("R&D=1")
        );
    }

    #[test]
    fn malformed_or_unknown_arguments_are_rejected() {
        let err = parse_filter_args(args(&["firstName"])).unwrap_err();
        assert!(err.to_string().contains("field=value"));

        let err = parse_filter_args(args(&["salary=10"])).unwrap_err();
        assert!(err.to_string().contains("unknown employee field `salary`"));
    }
}
