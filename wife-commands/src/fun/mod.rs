/// Discord-backed member directory.
pub mod directory;
/// Localized reply text and rendering.
pub mod messages;
pub mod wife;
