//! Reversible overwrites for one install transaction.
//!
//! Before the engine overwrites a file it asks the [`BackupStore`] to move the
//! existing content aside. If the transaction succeeds the backups are
//! [discarded](BackupStore::discard); if it fails they are
//! [restored](BackupStore::restore) in reverse order.
//!
//! A backup is first attempted as a rename to `<name>.rbak` in the same
//! directory. When that name is taken, or the rename fails, the file is moved
//! into a lazily created external directory that mirrors its absolute path.

mod report;
mod store;
mod transfer;

pub use report::RestoreFailure;
pub use report::RestoreReport;
pub use store::BackupRecord;
pub use store::BackupStore;
pub use store::IN_PLACE_SUFFIX;
