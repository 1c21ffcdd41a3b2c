//! CLI smoke entry point.
//!
//! # Responsibility
//! - Resolve the runtime environment and open the configured directory store.
//! - Print deterministic record counts for quick local sanity checks.

use company_core::{
    core_version, default_log_level, init_logging, DbConfig, DepartmentFilter, DepartmentService,
    EmployeeFilter, EmployeeService, SqliteDepartmentRepository, SqliteEmployeeRepository,
};
use log::info;
use std::error::Error;
use std::process::ExitCode;

/// Absolute directory for rolling log files; logging stays off when unset.
const LOG_DIR_VAR: &str = "COMPANY_LOG_DIR";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("company_cli error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    if let Ok(log_dir) = std::env::var(LOG_DIR_VAR) {
        init_logging(default_log_level(), &log_dir)?;
    }

    let config = DbConfig::from_env();
    println!("company_core version={}", core_version());
    println!("env={} db={}", config.environment, config.uri);

    let conn = company_core::db::open_db_with_config(&config)?;
    let departments = DepartmentService::new(SqliteDepartmentRepository::try_new(&conn)?);
    let employees = EmployeeService::new(
        SqliteEmployeeRepository::try_new(&conn)?,
        SqliteDepartmentRepository::try_new(&conn)?,
    );

    let department_count = departments.count(&DepartmentFilter::all())?;
    let employee_count = employees.count(&EmployeeFilter::all())?;
    info!(
        "event=cli_probe module=cli status=ok departments={department_count} employees={employee_count}"
    );
    println!("departments={department_count} employees={employee_count}");
    Ok(())
}
