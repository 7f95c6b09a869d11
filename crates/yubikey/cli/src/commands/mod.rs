mod info;

pub use info::info_command;
