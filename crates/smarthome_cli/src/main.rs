//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `smarthome_core` linkage and schema bootstrap without a Flutter
//!   runtime.
//! - Keep output deterministic for quick local sanity checks.

use smarthome_core::db::migrations::current_version;
use smarthome_core::db::open_db_in_memory;
use smarthome_core::repo::routine_repo::count_routines;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("smarthome_core ping={}", smarthome_core::ping());
    println!("smarthome_core version={}", smarthome_core::core_version());

    let schema_check = open_db_in_memory()
        .map_err(|err| err.to_string())
        .and_then(|conn| {
            let version = current_version(&conn).map_err(|err| err.to_string())?;
            let routines = count_routines(&conn).map_err(|err| err.to_string())?;
            Ok((version, routines))
        });

    match schema_check {
        Ok((version, routines)) => {
            println!("smarthome_core schema_version={version} routines={routines}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("smarthome_core schema check failed: {err}");
            ExitCode::FAILURE
        }
    }
}
