pub mod lighthouse_cli;

pub use lighthouse_cli::{LighthouseCli, LighthouseOutput};
