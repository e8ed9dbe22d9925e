mod commands;
mod config;
mod models;
mod protocol;
mod session;
mod stats;
mod utils;

use log::error;
use tokio::io::{AsyncBufReadExt, BufReader};

use commands::Command;
use config::EmitterConfig;
use session::{SessionController, SessionError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match EmitterConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let mut controller = SessionController::new(config.host, config.port);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!("{}", commands::MENU);

        // End of input is treated like an exit request
        let Some(line) = lines.next_line().await? else {
            controller.exit().await;
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match Command::parse(line) {
            Command::Start => {
                if let Err(SessionError::AlreadyRunning) = controller.start() {
                    println!(
                        "\n'start' was already issued; use 'stop' to end the current session first"
                    );
                }
            }
            Command::Stop => controller.stop().await,
            Command::Info => {
                println!();
                for (kind, average) in controller.info() {
                    println!("Average {} value = {:.2}", kind.display_name(), average);
                }
            }
            Command::Statistics => {
                let (connected, message_count) = controller.statistics();
                println!(
                    "\nConnection state = {}, messages received = {}",
                    connected, message_count
                );
            }
            Command::Exit => {
                controller.exit().await;
                break;
            }
            Command::Unknown(input) => {
                println!("\nCommand '{}' not found", input);
            }
        }
    }

    Ok(())
}
