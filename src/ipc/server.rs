/// Command server handling the stdin/stdout protocol
///
/// Reads one JSON request per line, dispatches to the tracker, and writes
/// one JSON response per line. Malformed input and command failures are
/// answered with error envelopes; nothing here is fatal to the process.

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use crate::ipc::protocol::{commands, Request, Response};
use crate::{HabitTracker, TrackerError};

/// Serves the UI collaborator until stdin closes
pub struct CommandServer {
    tracker: HabitTracker,
}

impl CommandServer {
    pub fn new(tracker: HabitTracker) -> Self {
        Self { tracker }
    }

    /// Run the serve loop over stdin/stdout
    pub async fn run(&self) -> Result<(), TrackerError> {
        info!("Command server started, waiting for requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("Command server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.process_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single request line
    async fn process_line(&self, line: &str) -> Option<Response> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: Request = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse request: {}", e);
                return Some(Response::error(format!("Invalid JSON: {}", e)));
            }
        };

        Some(self.handle_request(request).await)
    }

    /// Dispatch a request to the matching command
    async fn handle_request(&self, request: Request) -> Response {
        let result = match request.command.as_str() {
            commands::ADD_HABIT => self.run_add_habit(request.params).await,
            commands::GET_HABITS => self.run_get_habits().await,
            commands::UPDATE_HABIT_COMPLETION => self.run_update_completion(request.params).await,
            other => Err(TrackerError::UnknownCommand(other.to_string())),
        };

        match result {
            Ok(data) => Response::ok(data),
            Err(e) => Response::error(e.to_string()),
        }
    }

    async fn run_add_habit(&self, params: Value) -> Result<Value, TrackerError> {
        let params = serde_json::from_value(params)?;
        let response = self.tracker.add_habit(params).await?;
        Ok(serde_json::to_value(response)?)
    }

    async fn run_get_habits(&self) -> Result<Value, TrackerError> {
        let response = self.tracker.list_habits().await?;
        Ok(serde_json::to_value(response)?)
    }

    async fn run_update_completion(&self, params: Value) -> Result<Value, TrackerError> {
        let params = serde_json::from_value(params)?;
        let response = self.tracker.toggle_completion(params).await?;
        Ok(serde_json::to_value(response)?)
    }
}
