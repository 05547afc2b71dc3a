//! **cookline** -- a suspendable cooked (line-buffered) console input engine.
//!
//! This is the umbrella crate that re-exports everything a host needs from a
//! single dependency:
//!
//! ```toml
//! [dependencies]
//! cookline = "0.1"
//! ```
//!
//! # Re-exports
//!
//! * All public items from [`cookline_core`] are available at the crate root
//!   ([`ReadData`], [`ReadIo`], [`BufferStore`], [`WaitQueue`], [`drive`],
//!   etc.).
//! * The engine types from [`cookline_edit`] ([`CookedRead`], [`LineBuffer`],
//!   [`ReadState`]) are re-exported at the root as well; the full crate is
//!   available as [`edit`].
//! * [`crossterm`] and [`tokio`] are re-exported so hosts do not need to
//!   depend on them directly.
//!
//! # Quick start
//!
//! ```ignore
//! use cookline::{drive, BufferStore, ClientId, CookedRead, CrosstermScreen, Destination, Encoding};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut screen = CrosstermScreen::new(std::io::stdout())?;
//!     let mut buffers = BufferStore::new();
//!     let handle = buffers.allocate(256);
//!     let mut read = CookedRead::new(ClientId(1), Destination::new(handle, 256), Encoding::Narrow);
//!     let (outcome, _) = drive(&mut read, &mut screen, &mut buffers, events).await;
//!     Ok(())
//! }
//! ```

pub use cookline_core::*;
pub use cookline_edit::{CookedRead, LineBuffer, ReadState};

pub mod edit {
    pub use cookline_edit::*;
}

// Re-export dependencies for use in demos and downstream crates
pub use crossterm;
pub use tokio;
