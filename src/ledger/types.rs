//! Types used throughout the ledger.

/// Holder ID type, identifying the actor that owns a set of coin stacks.
pub type HolderId = u32;

/// Stack ID type, an opaque identifier for a persisted coin stack.
pub type StackId = u64;

/// Amount expressed in the base unit (copper).
pub type BaseValue = u64;
