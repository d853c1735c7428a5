//! # powerhub-adapter-storage-memory
//!
//! In-memory persistence adapter.
//!
//! ## Responsibilities
//! - Implement the repository port traits defined in `powerhub-app::ports::storage`
//! - Keep devices in registration order
//! - Hold the settings singleton
//!
//! State is lost when the process exits.
//!
//! ## Dependency rule
//! Depends on `powerhub-app` (for port traits) and `powerhub-domain` (for domain types).
//! The `app` and `domain` crates must never reference this adapter.

mod device_repo;
mod settings_repo;

pub use device_repo::MemoryDeviceRepository;
pub use settings_repo::MemorySettingsRepository;
