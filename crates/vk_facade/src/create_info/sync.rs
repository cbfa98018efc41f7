//! Fences and semaphores

use ash::vk;

/// Fences start signaled so the first frame's wait returns immediately
pub const FENCE_FLAGS: vk::FenceCreateFlags = vk::FenceCreateFlags::SIGNALED;

/// Signaled fence
pub fn fence_create_info<'a>() -> vk::FenceCreateInfoBuilder<'a> {
    vk::FenceCreateInfo::builder().flags(FENCE_FLAGS)
}

/// Binary semaphore
pub fn semaphore_create_info<'a>() -> vk::SemaphoreCreateInfoBuilder<'a> {
    vk::SemaphoreCreateInfo::builder()
}
