pub mod arrange;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod controller;
pub mod edit;
pub mod geometry;
pub mod layout;
pub mod layout_dump;
pub mod noderef;
pub mod snap;
pub mod spec;
pub mod store;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig};
pub use controller::{DiagramController, DragFrame, PanelState};
pub use layout::{Layout, ViewMode, auto_layout, compute_layout};
pub use spec::AgentSpec;
pub use theme::Theme;
