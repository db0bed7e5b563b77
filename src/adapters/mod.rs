// Adapters layer: concrete implementations at the edges (HTTP in, storage out).

pub mod http;
pub mod storage;
