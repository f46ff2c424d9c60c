pub mod cms;
pub mod memory;

pub use cms::{CmsConfig, CmsStore};
pub use memory::MemoryStore;
