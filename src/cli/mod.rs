use clap::Parser;

pub const DEFAULT_GREETING: &str =
    "Hello! I'm your AI Assistant. Ask me anything about the syllabus!";

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    // --- Endpoint Args ---
    /// Origin the widget is served from. Used for config discovery and as the fallback base URL.
    #[arg(long, env = "CHAT_ORIGIN", default_value = "http://127.0.0.1:8000")]
    pub origin: String,

    /// Base URL of the chat backend. When unset it is discovered from the config endpoint.
    #[arg(long, env = "API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Path of the config endpoint, relative to the origin.
    #[arg(long, env = "CONFIG_PATH", default_value = "/api/config")]
    pub config_path: String,

    /// Path of the chat endpoint (/chat, or /ask on older backends)
    #[arg(long, env = "CHAT_PATH", default_value = "/chat")]
    pub chat_path: String,

    /// Bearer token sent with every chat request
    #[arg(long, env = "CHAT_API_KEY")]
    pub api_key: Option<String>,

    /// Request timeout in seconds. An expired request is reported as a transport failure.
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value = "30")]
    pub request_timeout_secs: u64,

    // --- History Args ---
    /// File backing the client-local storage
    #[arg(long, env = "STORAGE_PATH", default_value = ".chat-widget/storage.json")]
    pub storage_path: String,

    /// Storage key holding the conversation log
    #[arg(long, env = "HISTORY_KEY", default_value = "uoft-chat-history")]
    pub history_key: String,

    /// Keep the conversation in memory only
    #[arg(long, env = "DISABLE_HISTORY", default_value = "false")]
    pub no_history: bool,

    // --- General App Args ---
    /// Message shown when the log is empty or has just been cleared
    #[arg(long, env = "CHAT_GREETING", default_value = DEFAULT_GREETING)]
    pub greeting: String,

    /// Enable debug logging/output
    #[arg(long, env = "DEBUG", default_value = "false")]
    pub debug: bool,
}
