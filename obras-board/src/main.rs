// obras-board - headless host for the work-site pending-task board
// Opens the board of one work site and prints it as JSON

use anyhow::Context;
use obras_board::app::AppState;
use obras_board::logging;
use obras_board::services::LogToasts;
use std::path::PathBuf;
use std::sync::Arc;

const DATA_DIR_VAR: &str = "OBRAS_BOARD_DATA_DIR";
const WORK_SITE_VAR: &str = "OBRAS_BOARD_WORK_SITE";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();

    tracing::info!("Starting obras-board");

    let data_dir = std::env::var(DATA_DIR_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("./data"));

    let work_site_id: i64 = match std::env::var(WORK_SITE_VAR) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{} must be an integer, got {:?}", WORK_SITE_VAR, value))?,
        Err(_) => 1,
    };

    let state = AppState::initialize(data_dir, Arc::new(LogToasts))
        .await
        .context("Failed to initialize application")?;

    let board = state
        .board_service
        .open_board(work_site_id)
        .await
        .with_context(|| format!("Failed to open board for work site {}", work_site_id))?;

    tracing::info!(
        "Board '{}' loaded: {} lists, {} cards",
        board.name,
        board.lists.len(),
        board.card_count()
    );

    println!("{}", serde_json::to_string_pretty(&*board)?);

    Ok(())
}
