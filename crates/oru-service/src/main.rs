//! Lab results intake binary.
//!
//! Seeds an in-memory repository with placed orders from a JSON file,
//! then feeds every message file in the intake directory through the
//! receiver, logging per-file outcome and a batch summary. Files are
//! processed one at a time; a failed message aborts that file only.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oru_receiver::{receive_oru_message, InMemoryRepository, ReceiverConfig};
use oru_types::{EncounterId, OrderId, PatientId, ProcedureOrder};

const DEFAULT_ORDERS_PATH: &str = "orders.json";
const DEFAULT_INTAKE_DIR: &str = "intake";

/// One placed order as listed in the orders seed file.
#[derive(Debug, Deserialize)]
struct OrderSeed {
    id: OrderId,
    patient_id: PatientId,
    #[serde(default)]
    encounter_id: Option<EncounterId>,
    #[serde(default)]
    procedures: Vec<ProcedureSeed>,
}

/// One ordered procedure line in the seed file, in order of placement.
#[derive(Debug, Deserialize)]
struct ProcedureSeed {
    code: String,
    name: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let orders_path =
        std::env::var("ORU_ORDERS_PATH").unwrap_or_else(|_| DEFAULT_ORDERS_PATH.to_string());
    let intake_dir =
        std::env::var("ORU_INTAKE_DIR").unwrap_or_else(|_| DEFAULT_INTAKE_DIR.to_string());
    let config = ReceiverConfig::default();

    tracing::info!("Loading placed orders from: {}", orders_path);
    let mut repository = InMemoryRepository::new();
    repository.add_category(&config.category_name);
    let order_count = seed_orders(&mut repository, Path::new(&orders_path))?;
    tracing::info!("Seeded {} order(s)", order_count);

    tracing::info!("Processing result messages from: {}", intake_dir);
    let mut file_count = 0;
    let mut bad_count = 0;

    for path in message_files(Path::new(&intake_dir))? {
        file_count += 1;
        let name = path.display();
        let message = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!("File '{}' cannot be read, ignored: {}", name, e);
                bad_count += 1;
                continue;
            }
        };
        match receive_oru_message(&message, &mut repository, &config) {
            Ok(stats) => {
                tracing::info!(
                    "New file '{}' processed successfully: message '{}' for {}, {} \
                     ({} report(s), {} result(s), {} document(s))",
                    name,
                    stats.message_id,
                    stats.patient.last_name,
                    stats.patient.first_name,
                    stats.reports,
                    stats.results,
                    stats.documents,
                );
            }
            Err(e) => {
                tracing::error!("Error processing file '{}': {}", name, e);
                bad_count += 1;
            }
        }
    }

    tracing::info!(
        "Done: {} file(s) processed, {} error(s); {} report(s), {} result(s), {} document(s) stored",
        file_count,
        bad_count,
        repository.reports().len(),
        repository.results().len(),
        repository.documents().len(),
    );

    if bad_count > 0 {
        return Err(format!("{} error(s) encountered from new results", bad_count).into());
    }
    Ok(())
}

/// Loads the orders seed file into the repository.
fn seed_orders(
    repository: &mut InMemoryRepository,
    path: &Path,
) -> Result<usize, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    let seeds: Vec<OrderSeed> = serde_json::from_str(&text)?;
    let count = seeds.len();
    for seed in seeds {
        repository.add_order(ProcedureOrder {
            id: seed.id,
            patient_id: seed.patient_id,
            encounter_id: seed.encounter_id,
        });
        for procedure in &seed.procedures {
            repository.add_line_item(seed.id, &procedure.code, &procedure.name);
        }
    }
    Ok(count)
}

/// Message files in the intake directory, sorted by name so results
/// apply in a stable order. Dotfiles are skipped.
fn message_files(dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        paths.push(entry.path());
    }
    paths.sort();
    Ok(paths)
}
