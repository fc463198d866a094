/// Generic embed builders shared across commands.
pub mod embed;
/// Guild member listing and profile helpers.
pub mod members;
/// Pure parser helpers.
pub mod parse;
/// Background tasks on daily and fixed schedules.
pub mod schedule;
/// Shared time helpers.
pub mod time;

/// Single source of truth for the message-command prefix.
pub const COMMAND_PREFIX: char = '!';
