pub mod mounts;
pub mod storage;
