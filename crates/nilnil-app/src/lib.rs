// Library root: the collaborators around the standings core (config,
// download, CSV parsing, export, orchestration), shared by the `nilnil`
// binary and the integration tests.

pub mod config;
pub mod export;
pub mod fetch;
pub mod loader;
pub mod pipeline;
