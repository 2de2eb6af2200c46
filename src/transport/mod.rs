/// Filesystem scan of split subfolders.
pub mod fs;
/// Bucket providers and the blocking object-store client.
pub mod store;
