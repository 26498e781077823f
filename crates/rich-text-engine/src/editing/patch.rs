/// Result of applying a command through an [`Editor`](crate::editing::Editor)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Patch {
    /// Editor version after the command
    pub version: u64,
    /// False when the command left the value as it was
    pub changed: bool,
}
