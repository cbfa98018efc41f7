//! Negotiation logic
//!
//! The only places where the facade picks a value instead of relaying the
//! caller's: queue-family deduplication for device creation, and swapchain
//! parameter selection from queried surface capabilities. Memory type and
//! physical device ranking live here too since they inspect capabilities
//! the same way.

pub mod memory;
pub mod queue;
pub mod swapchain;

pub use memory::find_memory_type;
pub use queue::{
    queue_create_infos, unique_queue_families, QueueFamilyInfo, QueueFamilySnapshot, QUEUES_PER_FAMILY,
    QUEUE_PRIORITY,
};
pub use swapchain::{
    negotiate, select_extent, select_image_count, select_present_mode, select_sharing_mode,
    select_surface_format, CapabilitySnapshot, SwapchainParameters, FALLBACK_PRESENT_MODE,
    PREFERRED_PRESENT_MODE, UNBOUNDED_IMAGE_COUNT,
};

use ash::vk;

/// Selection rank of a physical device type, lower is better
pub const fn rank_device_type(device_type: vk::PhysicalDeviceType) -> u8 {
    match device_type {
        vk::PhysicalDeviceType::DISCRETE_GPU => 0,
        vk::PhysicalDeviceType::INTEGRATED_GPU => 1,
        vk::PhysicalDeviceType::VIRTUAL_GPU => 2,
        vk::PhysicalDeviceType::CPU => 3,
        _ => 4,
    }
}

/// Selection rank of a physical device, lower is better
pub const fn rank_physical_device(properties: &vk::PhysicalDeviceProperties) -> u8 {
    rank_device_type(properties.device_type)
}

/// Pick a physical device from `(device, properties)` candidates
///
/// With `prefer_discrete` the best-ranked type wins, ties going to the
/// earliest reported device. Without it the first reported device is taken.
pub fn select_physical_device<T: Copy>(
    candidates: &[(T, vk::PhysicalDeviceProperties)],
    prefer_discrete: bool,
) -> Option<T> {
    if prefer_discrete {
        candidates
            .iter()
            .enumerate()
            .min_by_key(|(position, (_, properties))| (rank_physical_device(properties), *position))
            .map(|(_, (device, _))| *device)
    } else {
        candidates.first().map(|(device, _)| *device)
    }
}
