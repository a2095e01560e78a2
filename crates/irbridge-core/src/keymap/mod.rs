//! Key bindings and the button → binding lookup table.
//!
//! Key codes use Windows Virtual Key numbering because that is what keymap
//! files are written in.  Injectors on other platforms translate through
//! [`vk`] at the emulation boundary.

pub mod binding;
pub mod table;
pub mod vk;

pub use binding::{KeyBinding, KeyCode};
pub use table::KeyMappingTable;
