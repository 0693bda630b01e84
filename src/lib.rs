pub mod cli;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod history;
pub mod lifecycle;
pub mod models;
pub mod render;
pub mod session;
pub mod widget;

use cli::Args;
use config::initialize_chat_config;
use endpoint::HttpChatEndpoint;
use history::initialize_conversation_store;
use lifecycle::RequestLifecycle;
use log::info;
use session::ChatSession;
use std::error::Error;
use std::sync::Arc;
use tokio::io::BufReader;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let chat_config = initialize_chat_config(&args).await?;

    info!("--- Core Configuration ---");
    info!("Origin: {}", args.origin);
    info!("API Base URL: {}", chat_config.base_url);
    info!("Chat Path: {}", chat_config.chat_path);
    info!("API Key Set: {}", chat_config.api_key.is_some());
    info!("Request Timeout: {}s", args.request_timeout_secs);
    info!("History Enabled: {}", !args.no_history);
    if !args.no_history {
        info!("Storage Path: {}", args.storage_path);
        info!("History Key: {}", args.history_key);
    }
    info!("-------------------------");

    let endpoint = Arc::new(HttpChatEndpoint::new(&chat_config)?);
    let lifecycle = RequestLifecycle::new(endpoint);
    let store = initialize_conversation_store(&args);
    let mut session = ChatSession::new(lifecycle, store, args.greeting.clone());

    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    widget::run_widget(&mut session, stdin, &mut stdout).await
}
