//! Command pools, command buffers, submission and presentation

use ash::vk;

/// Command buffers from facade pools can be reset individually
pub const COMMAND_POOL_FLAGS: vk::CommandPoolCreateFlags = vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER;
/// Level of allocated command buffers
pub const COMMAND_BUFFER_LEVEL: vk::CommandBufferLevel = vk::CommandBufferLevel::PRIMARY;
/// Command buffers allocated per call
pub const COMMAND_BUFFER_COUNT: u32 = 1;

/// Pool for command buffers submitted to `queue_family`
pub fn command_pool_create_info<'a>(queue_family: u32) -> vk::CommandPoolCreateInfoBuilder<'a> {
    vk::CommandPoolCreateInfo::builder()
        .flags(COMMAND_POOL_FLAGS)
        .queue_family_index(queue_family)
}

/// Allocation of one primary command buffer from `pool`
pub fn command_buffer_allocate_info<'a>(pool: vk::CommandPool) -> vk::CommandBufferAllocateInfoBuilder<'a> {
    vk::CommandBufferAllocateInfo::builder()
        .command_pool(pool)
        .level(COMMAND_BUFFER_LEVEL)
        .command_buffer_count(COMMAND_BUFFER_COUNT)
}

/// Begin info with the given usage flags and no inheritance
pub fn command_buffer_begin_info<'a>(flags: vk::CommandBufferUsageFlags) -> vk::CommandBufferBeginInfoBuilder<'a> {
    vk::CommandBufferBeginInfo::builder().flags(flags)
}

/// Semaphores a submission waits on, with the stage each wait blocks
///
/// Kept as one type so the two lists can never disagree in length.
#[derive(Debug, Clone, Default)]
pub struct WaitSemaphores {
    semaphores: Vec<vk::Semaphore>,
    stages: Vec<vk::PipelineStageFlags>,
}

impl WaitSemaphores {
    /// No waits
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait on `semaphore` before `stage`
    #[must_use]
    pub fn wait(mut self, semaphore: vk::Semaphore, stage: vk::PipelineStageFlags) -> Self {
        self.semaphores.push(semaphore);
        self.stages.push(stage);
        self
    }

    /// Number of waits
    pub fn len(&self) -> usize {
        self.semaphores.len()
    }

    /// Whether there are no waits
    pub fn is_empty(&self) -> bool {
        self.semaphores.is_empty()
    }
}

/// Submission of command buffers between wait and signal semaphores
pub fn submit_info<'a>(
    waits: &'a WaitSemaphores,
    command_buffers: &'a [vk::CommandBuffer],
    signal_semaphores: &'a [vk::Semaphore],
) -> vk::SubmitInfoBuilder<'a> {
    vk::SubmitInfo::builder()
        .wait_semaphores(&waits.semaphores)
        .wait_dst_stage_mask(&waits.stages)
        .command_buffers(command_buffers)
        .signal_semaphores(signal_semaphores)
}

/// Presentation of one image index per swapchain
///
/// `image_indices` pairs with `swapchains`; the count comes from `swapchains`.
pub fn present_info<'a>(
    wait_semaphores: &'a [vk::Semaphore],
    swapchains: &'a [vk::SwapchainKHR],
    image_indices: &'a [u32],
) -> vk::PresentInfoKHRBuilder<'a> {
    vk::PresentInfoKHR::builder()
        .wait_semaphores(wait_semaphores)
        .image_indices(image_indices)
        .swapchains(swapchains)
}
