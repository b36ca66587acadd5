pub mod database_blob_store;
pub mod factory;
pub mod filesystem_blob_store;

pub use database_blob_store::DatabaseBlobStore;
pub use factory::BlobStoreFactory;
pub use filesystem_blob_store::FileSystemBlobStore;
