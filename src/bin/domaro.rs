use anyhow::Result;
use domaro::cli::{actions::Action, start};

// Main function
#[tokio::main]
async fn main() -> Result<()> {
    // Start the program
    let action = start()?;

    // Handle the action
    match action {
        Action::Server(args) => domaro::cli::actions::server::execute(args).await?,
    }

    Ok(())
}
