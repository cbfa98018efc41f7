//! Swapchain record built from negotiated parameters

use ash::vk;

use crate::negotiation::SwapchainParameters;

/// Layers per swapchain image
pub const SWAPCHAIN_ARRAY_LAYERS: u32 = 1;
/// Swapchain images are rendered to as color attachments
pub const SWAPCHAIN_IMAGE_USAGE: vk::ImageUsageFlags = vk::ImageUsageFlags::COLOR_ATTACHMENT;
/// Alpha is ignored when compositing
pub const SWAPCHAIN_COMPOSITE_ALPHA: vk::CompositeAlphaFlagsKHR = vk::CompositeAlphaFlagsKHR::OPAQUE;
/// Obscured pixels may be discarded
pub const SWAPCHAIN_CLIPPED: bool = true;

/// Swapchain for `surface` using negotiated parameters
///
/// Queue-family indices are only recorded for concurrent sharing; an
/// exclusive swapchain carries an empty list. `old_swapchain` is null
/// unless given.
pub fn swapchain_create_info<'a>(
    surface: vk::SurfaceKHR,
    format: vk::SurfaceFormatKHR,
    extent: vk::Extent2D,
    parameters: &'a SwapchainParameters,
    old_swapchain: Option<vk::SwapchainKHR>,
) -> vk::SwapchainCreateInfoKHRBuilder<'a> {
    vk::SwapchainCreateInfoKHR::builder()
        .surface(surface)
        .min_image_count(parameters.image_count)
        .image_format(format.format)
        .image_color_space(format.color_space)
        .image_extent(extent)
        .image_array_layers(SWAPCHAIN_ARRAY_LAYERS)
        .image_usage(SWAPCHAIN_IMAGE_USAGE)
        .image_sharing_mode(parameters.sharing_mode)
        .queue_family_indices(parameters.sharing_indices())
        .pre_transform(parameters.pre_transform)
        .composite_alpha(SWAPCHAIN_COMPOSITE_ALPHA)
        .present_mode(parameters.present_mode)
        .clipped(SWAPCHAIN_CLIPPED)
        .old_swapchain(old_swapchain.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::negotiation::{negotiate, CapabilitySnapshot};
    use ash::vk::Handle;

    fn snapshot() -> CapabilitySnapshot {
        CapabilitySnapshot {
            capabilities: vk::SurfaceCapabilitiesKHR {
                min_image_count: 2,
                max_image_count: 3,
                current_transform: vk::SurfaceTransformFlagsKHR::IDENTITY,
                ..Default::default()
            },
            formats: vec![vk::SurfaceFormatKHR {
                format: vk::Format::B8G8R8A8_SRGB,
                color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
            }],
            present_modes: vec![vk::PresentModeKHR::FIFO, vk::PresentModeKHR::MAILBOX],
        }
    }

    #[test]
    fn test_swapchain_from_negotiated_parameters() {
        let snapshot = snapshot();
        let parameters = negotiate(&snapshot, &[0, 0]);
        let extent = vk::Extent2D {
            width: 800,
            height: 600,
        };
        let info = swapchain_create_info(
            vk::SurfaceKHR::from_raw(1),
            snapshot.formats[0],
            extent,
            &parameters,
            None,
        );

        assert_eq!(info.min_image_count, 3);
        assert_eq!(info.present_mode, vk::PresentModeKHR::MAILBOX);
        assert_eq!(info.image_sharing_mode, vk::SharingMode::EXCLUSIVE);
        assert_eq!(info.queue_family_index_count, 0);
        assert_eq!(info.image_array_layers, 1);
        assert_eq!(info.image_usage, vk::ImageUsageFlags::COLOR_ATTACHMENT);
        assert_eq!(info.composite_alpha, vk::CompositeAlphaFlagsKHR::OPAQUE);
        assert_eq!(info.clipped, vk::TRUE);
        assert_eq!(info.pre_transform, vk::SurfaceTransformFlagsKHR::IDENTITY);
        assert_eq!(info.old_swapchain, vk::SwapchainKHR::null());
        assert_eq!(info.image_extent, extent);
    }

    #[test]
    fn test_concurrent_swapchain_lists_distinct_families() {
        let snapshot = snapshot();
        let parameters = negotiate(&snapshot, &[1, 0, 1]);
        let old = vk::SwapchainKHR::from_raw(77);
        let info = swapchain_create_info(
            vk::SurfaceKHR::from_raw(1),
            snapshot.formats[0],
            vk::Extent2D::default(),
            &parameters,
            Some(old),
        );

        assert_eq!(info.image_sharing_mode, vk::SharingMode::CONCURRENT);
        assert_eq!(info.queue_family_index_count, 2);
        // SAFETY: points into `parameters`, alive for the whole test.
        let indices = unsafe { std::slice::from_raw_parts(info.p_queue_family_indices, 2) };
        assert_eq!(indices, &[0, 1]);
        assert_eq!(info.old_swapchain, old);
    }
}
