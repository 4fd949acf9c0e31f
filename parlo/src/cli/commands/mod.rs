// Module for command implementations

pub mod generate;
pub mod profile;
pub mod reset;
pub mod status;
