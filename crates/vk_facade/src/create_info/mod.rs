//! Create-info builders
//!
//! Pure functions that turn the handful of parameters that matter into a
//! fully populated native record. Fields the caller does not pass are filled
//! from the `pub const` defaults declared next to each builder.
//!
//! Records that carry an `s_type` header come back as `ash` builders so the
//! caller's slices stay borrowed for as long as the record lives, and so an
//! extension chain can be attached through [`Chainable::with_next`]. Plain
//! value records (viewports, attachment descriptions, copy regions) come
//! back fully built.
//!
//! Array-length fields are never accepted separately: they are always the
//! length of the slice passed in.

pub mod command;
pub mod descriptor;
pub mod device;
pub mod instance;
pub mod pipeline;
pub mod render_pass;
pub mod resources;
pub mod shader;
pub mod swapchain;
pub mod sync;

pub use command::*;
pub use descriptor::*;
pub use device::*;
pub use instance::*;
pub use pipeline::*;
pub use render_pass::*;
pub use resources::*;
pub use shader::*;
pub use swapchain::*;
pub use sync::*;

use ash::vk;

use crate::creation::ExtensionChain;

/// Create-info builders that accept an opaque extension chain
pub trait Chainable<'a>: Sized {
    /// Point the record's `p_next` at `next`, replacing any previous chain
    ///
    /// The chain is copied verbatim; the facade never walks it.
    #[must_use]
    fn with_next(self, next: ExtensionChain<'a>) -> Self;
}

macro_rules! impl_chainable {
    ($($builder:ident),* $(,)?) => {
        $(
            impl<'a> Chainable<'a> for vk::$builder<'a> {
                fn with_next(mut self, next: ExtensionChain<'a>) -> Self {
                    self.p_next = next.as_ptr();
                    self
                }
            }
        )*
    };
}

impl_chainable!(
    ApplicationInfoBuilder,
    InstanceCreateInfoBuilder,
    DeviceQueueCreateInfoBuilder,
    DeviceCreateInfoBuilder,
    PipelineVertexInputStateCreateInfoBuilder,
    PipelineInputAssemblyStateCreateInfoBuilder,
    PipelineShaderStageCreateInfoBuilder,
    PipelineViewportStateCreateInfoBuilder,
    PipelineRasterizationStateCreateInfoBuilder,
    PipelineMultisampleStateCreateInfoBuilder,
    PipelineColorBlendStateCreateInfoBuilder,
    PipelineDynamicStateCreateInfoBuilder,
    GraphicsPipelineCreateInfoBuilder,
    PipelineLayoutCreateInfoBuilder,
    RenderPassCreateInfoBuilder,
    FramebufferCreateInfoBuilder,
    RenderPassBeginInfoBuilder,
    CommandBufferBeginInfoBuilder,
    SubmitInfoBuilder,
    PresentInfoKHRBuilder,
    MemoryAllocateInfoBuilder,
    BufferCreateInfoBuilder,
    BufferViewCreateInfoBuilder,
    ImageCreateInfoBuilder,
    ImageViewCreateInfoBuilder,
    ImageMemoryBarrierBuilder,
    SamplerCreateInfoBuilder,
    DescriptorSetLayoutCreateInfoBuilder,
    DescriptorPoolCreateInfoBuilder,
    DescriptorSetAllocateInfoBuilder,
    WriteDescriptorSetBuilder,
    CommandPoolCreateInfoBuilder,
    CommandBufferAllocateInfoBuilder,
    FenceCreateInfoBuilder,
    SemaphoreCreateInfoBuilder,
    ShaderModuleCreateInfoBuilder,
    SwapchainCreateInfoKHRBuilder,
);

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::c_void;

    #[test]
    fn test_with_next_threads_pointer_unmodified() {
        let timeline = vk::SemaphoreTypeCreateInfo::builder()
            .semaphore_type(vk::SemaphoreType::TIMELINE)
            .initial_value(0)
            .build();
        let head = (&timeline as *const vk::SemaphoreTypeCreateInfo).cast::<c_void>();
        // SAFETY: `timeline` outlives the record built below.
        let chain = unsafe { ExtensionChain::from_raw(head) };

        let info = semaphore_create_info().with_next(chain);
        assert_eq!(info.p_next, head);
        assert_eq!(info.s_type, vk::StructureType::SEMAPHORE_CREATE_INFO);
    }

    #[test]
    fn test_empty_chain_leaves_null() {
        let info = fence_create_info().with_next(ExtensionChain::none());
        assert!(info.p_next.is_null());
    }
}
