//! Native toolchain descriptions for the Anvil build orchestrator.
//!
//! A platform variant is described by a [`Toolchain`] capability record: the
//! compiler and tool names it invokes, which extensions it compiles as C++,
//! and the suffixes of its outputs. Use [`load_toolchain`] to obtain one of
//! the built-in records by name.
//!
//! ```
//! use anvil_toolchain::load_toolchain;
//!
//! let tcc = load_toolchain("tcc").unwrap();
//! assert!(!tcc.supports_cxx());
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod search;
pub mod toolchain;

pub use error::ToolchainError;
pub use search::{is_executable, which, which_in};
pub use toolchain::{host_binary_suffix, load_toolchain, Toolchain, ToolchainKind};
