//! # vk_facade
//!
//! Intention-revealing factory functions over Vulkan's create-info
//! boilerplate.
//!
//! ## Layers
//!
//! - **Config Builders** ([`create_info`]): pure functions returning
//!   fully-populated create-info records with documented defaults
//! - **Creation Protocol** ([`creation`]): one native call per factory,
//!   a single `[FATAL]` diagnostic and a typed error on failure, two-phase
//!   enumeration for variable-length queries
//! - **Negotiation** ([`negotiation`]): image count, present mode, sharing
//!   mode and device ranking derived from queried capabilities
//! - **Factories** ([`factory`]): the three layers put together, one call
//!   per native object type
//!
//! Handles are returned as non-owning [`Handle`]s. The facade keeps no
//! state and destroys nothing; callers destroy objects through the native
//! API in reverse creation order.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use vk_facade::prelude::*;
//!
//! fn main() -> Result<(), FacadeError> {
//!     let entry = factory::load_entry()?;
//!     let name = std::ffi::CString::new("demo").unwrap();
//!     let instance = factory::create_instance(&entry, &name, 1, &[], &[], CreateOptions::new())?;
//!     let physical_device = factory::pick_physical_device(&instance, true)?;
//!     let device = factory::create_device(&instance, physical_device, &[0], &[], None, CreateOptions::new())?;
//!     let fence = factory::create_fence(&device, CreateOptions::new())?;
//!
//!     unsafe {
//!         device.destroy_fence(fence.raw(), None);
//!         device.destroy_device(None);
//!         instance.destroy_instance(None);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod create_info;
pub mod creation;
pub mod error;
pub mod factory;
pub mod foundation;
pub mod handle;
pub mod negotiation;

pub use creation::{CreateOptions, ExtensionChain};
pub use error::{FacadeError, FacadeResult, ObjectKind, Operation, QueryKind};
pub use handle::Handle;

/// Common imports for facade users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, FacadeConfig},
        create_info::{self, Chainable, FixedFunctionState, SubpassAttachments},
        factory,
        negotiation::{negotiate, CapabilitySnapshot, QueueFamilySnapshot, SwapchainParameters},
        CreateOptions, ExtensionChain, FacadeError, FacadeResult, Handle,
    };
    pub use ash::vk;
}
