//! Console interaction: prompts, menus, and styled output.

pub mod address;
pub mod interface_select;
pub mod menu;
pub mod prompt;
pub mod theme;
