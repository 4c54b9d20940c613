pub mod completions;
pub mod config;
pub mod host;
pub mod playlist;
pub mod sound;
pub mod tally;
pub mod timer;
pub mod todo;
