use acceso::cli::start;
use anyhow::Result;

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Start the program
    let (action, globals) = start()?;

    // Handle the action
    action.execute(&globals).await
}
