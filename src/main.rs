//! xcroute registry builder
//!
//! Batch entry point: loads configuration and feeds, builds the registry,
//! writes the artifact.

use xcroute::RegistryRunner;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	RegistryRunner::new().run_build().await
}
