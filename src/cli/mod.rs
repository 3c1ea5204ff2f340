//! CLI commands for Lexis.
//!
//! This module provides CLI commands for Lexis, organized into:
//! - **Vocabulary commands**: add, remove, show, list
//! - **Review commands**: due, session, review
//! - **Reporting commands**: stats, export
//! - **Utility commands**: init

// Vocabulary commands
pub mod add;
pub mod list;
pub mod remove;
pub mod show;

// Review commands
pub mod due;
pub mod review;
pub mod session;

// Reporting commands
pub mod export;
pub mod stats;

// Utility commands
pub mod init;

pub use add::AddCommand;
pub use due::DueCommand;
pub use export::ExportCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use remove::RemoveCommand;
pub use review::ReviewCommand;
pub use session::SessionCommand;
pub use show::{ItemInfo, ShowCommand};
pub use stats::StatsCommand;
