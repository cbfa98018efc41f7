//! Logical device and queue records

use ash::vk;
use std::ffi::c_char;

/// One queue-creation record for `family`, one queue per priority
///
/// Device creation goes through [`crate::negotiation::queue_create_infos`],
/// which deduplicates families before calling this.
pub fn device_queue_create_info(family: u32, priorities: &[f32]) -> vk::DeviceQueueCreateInfoBuilder<'_> {
    vk::DeviceQueueCreateInfo::builder()
        .queue_family_index(family)
        .queue_priorities(priorities)
}

/// Device create info from prepared queue records, extension names and
/// core features
///
/// Device layers are deprecated and never set. `None` leaves every core
/// feature disabled (null feature pointer).
pub fn device_create_info<'a>(
    queue_create_infos: &'a [vk::DeviceQueueCreateInfo],
    extension_names: &'a [*const c_char],
    features: Option<&'a vk::PhysicalDeviceFeatures>,
) -> vk::DeviceCreateInfoBuilder<'a> {
    let info = vk::DeviceCreateInfo::builder()
        .queue_create_infos(queue_create_infos)
        .enabled_extension_names(extension_names);

    match features {
        Some(features) => info.enabled_features(features),
        None => info,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::negotiation::queue_create_infos;

    #[test]
    fn test_queue_info_counts_priorities() {
        let priorities = [1.0, 0.5];
        let info = device_queue_create_info(3, &priorities);
        assert_eq!(info.queue_family_index, 3);
        assert_eq!(info.queue_count, 2);
        assert_eq!(info.p_queue_priorities, priorities.as_ptr());
    }

    #[test]
    fn test_device_info_from_deduplicated_queues() {
        let queues = queue_create_infos(&[1, 1, 0]);
        let extensions = [ash::extensions::khr::Swapchain::name().as_ptr()];
        let info = device_create_info(&queues, &extensions, None);

        assert_eq!(info.queue_create_info_count, 2);
        assert_eq!(info.enabled_extension_count, 1);
        assert_eq!(info.enabled_layer_count, 0);
        assert!(info.p_enabled_features.is_null());
    }

    #[test]
    fn test_device_info_records_enabled_features() {
        let queues = queue_create_infos(&[0]);
        let features = vk::PhysicalDeviceFeatures {
            sampler_anisotropy: vk::TRUE,
            ..Default::default()
        };
        let info = device_create_info(&queues, &[], Some(&features));

        assert_eq!(info.p_enabled_features, &features as *const vk::PhysicalDeviceFeatures);
        // SAFETY: points at `features`, alive for the whole test.
        assert_eq!(unsafe { (*info.p_enabled_features).sampler_anisotropy }, vk::TRUE);
    }
}
