pub mod listing;
pub mod sandbox;
pub mod transfer;

pub use listing::{format_listing, ListEntry};
pub use sandbox::PathSandbox;
pub use transfer::{FileChunks, TransferType};
