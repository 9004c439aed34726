use std::path::PathBuf;

/// Arguments shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub session_file: PathBuf,
}
