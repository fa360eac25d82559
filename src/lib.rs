pub mod bounds;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod extract;
pub mod ir;
pub mod payload;
pub mod render;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, RenderConfig, load_config};
pub use extract::{PayloadError, payload_from_str};
pub use payload::Payload;
pub use render::{BoardView, render_board, write_output_svg};
pub use theme::Theme;
