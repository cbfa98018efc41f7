//! Swapchain parameter negotiation
//!
//! Turns a capability snapshot of a physical device/surface pair plus the
//! caller's queue families into the policy-chosen values of a swapchain
//! create-info: image count, present mode and sharing mode.

use ash::extensions::khr::Surface as SurfaceLoader;
use ash::vk;

use crate::error::FacadeResult;
use crate::factory::query;
use crate::handle::Handle;
use crate::negotiation::queue::unique_queue_families;

/// `max_image_count` value meaning "no upper limit"
pub const UNBOUNDED_IMAGE_COUNT: u32 = 0;

/// Present mode chosen whenever the surface supports it
pub const PREFERRED_PRESENT_MODE: vk::PresentModeKHR = vk::PresentModeKHR::MAILBOX;

/// Present mode every surface is required to support
pub const FALLBACK_PRESENT_MODE: vk::PresentModeKHR = vk::PresentModeKHR::FIFO;

/// `current_extent` width meaning "the swapchain decides the extent"
pub const SURFACE_DEFINED_EXTENT: u32 = u32::MAX;

/// Request one image more than the minimum, capped by the maximum
///
/// The extra image lets the presentation engine hold one image while the
/// application renders into another without blocking on acquisition. A
/// maximum of [`UNBOUNDED_IMAGE_COUNT`] skips the cap.
pub fn select_image_count(min_image_count: u32, max_image_count: u32) -> u32 {
    let desired = min_image_count.saturating_add(1);
    if max_image_count == UNBOUNDED_IMAGE_COUNT {
        desired
    } else {
        desired.min(max_image_count)
    }
}

/// First [`PREFERRED_PRESENT_MODE`] in reported order, else [`FALLBACK_PRESENT_MODE`]
pub fn select_present_mode(supported: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    supported
        .iter()
        .copied()
        .find(|&mode| mode == PREFERRED_PRESENT_MODE)
        .unwrap_or(FALLBACK_PRESENT_MODE)
}

/// Exclusive ownership for a single family, concurrent sharing otherwise
pub fn select_sharing_mode(queue_families: &[u32]) -> vk::SharingMode {
    if unique_queue_families(queue_families).len() > 1 {
        vk::SharingMode::CONCURRENT
    } else {
        vk::SharingMode::EXCLUSIVE
    }
}

/// Exact preferred format and colour space if offered, else the first reported format
pub fn select_surface_format(
    formats: &[vk::SurfaceFormatKHR],
    preferred: vk::SurfaceFormatKHR,
) -> Option<vk::SurfaceFormatKHR> {
    formats
        .iter()
        .copied()
        .find(|format| format.format == preferred.format && format.color_space == preferred.color_space)
        .or_else(|| formats.first().copied())
}

/// The surface's current extent, or the fallback clamped to the supported range
pub fn select_extent(capabilities: &vk::SurfaceCapabilitiesKHR, fallback: vk::Extent2D) -> vk::Extent2D {
    if capabilities.current_extent.width != SURFACE_DEFINED_EXTENT {
        return capabilities.current_extent;
    }
    vk::Extent2D {
        width: fallback.width.clamp(
            capabilities.min_image_extent.width,
            capabilities.max_image_extent.width,
        ),
        height: fallback.height.clamp(
            capabilities.min_image_extent.height,
            capabilities.max_image_extent.height,
        ),
    }
}

/// Surface capabilities queried once for a physical device/surface pair
#[derive(Debug, Clone)]
pub struct CapabilitySnapshot {
    /// Image count limits, extents and transforms
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    /// Supported surface formats
    pub formats: Vec<vk::SurfaceFormatKHR>,
    /// Supported present modes, in the order the system reported them
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl CapabilitySnapshot {
    /// Query capabilities, formats and present modes of a surface
    ///
    /// Any failed query is fatal; negotiation never runs on a partial snapshot.
    pub fn query(
        surface_loader: &SurfaceLoader,
        physical_device: Handle<vk::PhysicalDevice>,
        surface: vk::SurfaceKHR,
    ) -> FacadeResult<Self> {
        let capabilities = query::surface_capabilities(surface_loader, physical_device, surface)?;
        let formats = query::surface_formats(surface_loader, physical_device, surface)?;
        let present_modes = query::surface_present_modes(surface_loader, physical_device, surface)?;

        log::debug!(
            "Surface capabilities: images {}..{}, {} formats, present modes {:?}",
            capabilities.min_image_count,
            capabilities.max_image_count,
            formats.len(),
            present_modes
        );

        Ok(Self {
            capabilities,
            formats,
            present_modes,
        })
    }
}

/// Policy-chosen swapchain values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapchainParameters {
    /// Minimum number of presentable images to request
    pub image_count: u32,
    /// Chosen present mode
    pub present_mode: vk::PresentModeKHR,
    /// Image sharing mode derived from the distinct queue families
    pub sharing_mode: vk::SharingMode,
    /// Distinct queue families in ascending order
    pub queue_family_indices: Vec<u32>,
    /// Surface transform to apply
    pub pre_transform: vk::SurfaceTransformFlagsKHR,
}

impl SwapchainParameters {
    /// Queue families to put in the create-info
    ///
    /// Exclusive swapchains ignore the list, so it is only passed along
    /// for concurrent sharing.
    pub fn sharing_indices(&self) -> &[u32] {
        if self.sharing_mode == vk::SharingMode::CONCURRENT {
            &self.queue_family_indices
        } else {
            &[]
        }
    }
}

/// Derive swapchain parameters from a capability snapshot
///
/// Deterministic: the same snapshot and families always yield the same
/// parameters.
pub fn negotiate(snapshot: &CapabilitySnapshot, queue_families: &[u32]) -> SwapchainParameters {
    let capabilities = &snapshot.capabilities;
    let queue_family_indices = unique_queue_families(queue_families);

    SwapchainParameters {
        image_count: select_image_count(capabilities.min_image_count, capabilities.max_image_count),
        present_mode: select_present_mode(&snapshot.present_modes),
        sharing_mode: select_sharing_mode(&queue_family_indices),
        queue_family_indices,
        pre_transform: capabilities.current_transform,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(min: u32, max: u32, present_modes: &[vk::PresentModeKHR]) -> CapabilitySnapshot {
        CapabilitySnapshot {
            capabilities: vk::SurfaceCapabilitiesKHR {
                min_image_count: min,
                max_image_count: max,
                current_transform: vk::SurfaceTransformFlagsKHR::IDENTITY,
                ..Default::default()
            },
            formats: vec![vk::SurfaceFormatKHR {
                format: vk::Format::B8G8R8A8_SRGB,
                color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
            }],
            present_modes: present_modes.to_vec(),
        }
    }

    #[test]
    fn test_image_count_capped_by_maximum() {
        assert_eq!(select_image_count(2, 3), 3);
        assert_eq!(select_image_count(2, 2), 2);
        assert_eq!(select_image_count(1, 8), 2);
    }

    #[test]
    fn test_image_count_unbounded_maximum() {
        assert_eq!(select_image_count(3, UNBOUNDED_IMAGE_COUNT), 4);
        assert_eq!(select_image_count(u32::MAX, UNBOUNDED_IMAGE_COUNT), u32::MAX);
    }

    #[test]
    fn test_present_mode_selection() {
        use vk::PresentModeKHR as Mode;

        assert_eq!(select_present_mode(&[Mode::FIFO, Mode::MAILBOX]), Mode::MAILBOX);
        assert_eq!(select_present_mode(&[Mode::MAILBOX, Mode::IMMEDIATE]), Mode::MAILBOX);
        assert_eq!(select_present_mode(&[Mode::FIFO]), Mode::FIFO);
        assert_eq!(select_present_mode(&[Mode::FIFO, Mode::IMMEDIATE]), Mode::FIFO);
        assert_eq!(select_present_mode(&[Mode::IMMEDIATE, Mode::FIFO_RELAXED]), Mode::FIFO);
    }

    #[test]
    fn test_sharing_mode_follows_distinct_families() {
        assert_eq!(select_sharing_mode(&[0]), vk::SharingMode::EXCLUSIVE);
        assert_eq!(select_sharing_mode(&[1, 1]), vk::SharingMode::EXCLUSIVE);
        assert_eq!(select_sharing_mode(&[]), vk::SharingMode::EXCLUSIVE);
        assert_eq!(select_sharing_mode(&[0, 1]), vk::SharingMode::CONCURRENT);
    }

    #[test]
    fn test_negotiate_dedups_families() {
        let parameters = negotiate(&snapshot(2, 3, &[vk::PresentModeKHR::FIFO]), &[1, 0, 1]);

        assert_eq!(parameters.image_count, 3);
        assert_eq!(parameters.present_mode, vk::PresentModeKHR::FIFO);
        assert_eq!(parameters.sharing_mode, vk::SharingMode::CONCURRENT);
        assert_eq!(parameters.queue_family_indices, vec![0, 1]);
        assert_eq!(parameters.sharing_indices(), &[0, 1]);
        assert_eq!(parameters.pre_transform, vk::SurfaceTransformFlagsKHR::IDENTITY);
    }

    #[test]
    fn test_negotiate_single_family_is_exclusive() {
        let parameters = negotiate(&snapshot(3, 0, &[vk::PresentModeKHR::MAILBOX]), &[2, 2]);

        assert_eq!(parameters.image_count, 4);
        assert_eq!(parameters.present_mode, vk::PresentModeKHR::MAILBOX);
        assert_eq!(parameters.sharing_mode, vk::SharingMode::EXCLUSIVE);
        assert!(parameters.sharing_indices().is_empty());
    }

    #[test]
    fn test_negotiate_is_repeatable() {
        let snapshot = snapshot(2, 0, &[vk::PresentModeKHR::IMMEDIATE, vk::PresentModeKHR::MAILBOX]);
        let first = negotiate(&snapshot, &[0, 1]);
        for _ in 0..4 {
            assert_eq!(negotiate(&snapshot, &[0, 1]), first);
        }
    }

    #[test]
    fn test_surface_format_preference() {
        let unorm = vk::SurfaceFormatKHR {
            format: vk::Format::R8G8B8A8_UNORM,
            color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
        };
        let srgb = vk::SurfaceFormatKHR {
            format: vk::Format::B8G8R8A8_SRGB,
            color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
        };

        let chosen = |formats: &[vk::SurfaceFormatKHR]| {
            select_surface_format(formats, unorm).map(|format| (format.format, format.color_space))
        };

        assert_eq!(chosen(&[srgb, unorm]), Some((unorm.format, unorm.color_space)));
        assert_eq!(chosen(&[srgb]), Some((srgb.format, srgb.color_space)));
        assert_eq!(chosen(&[]), None);
    }

    #[test]
    fn test_extent_uses_current_or_clamps() {
        let mut capabilities = vk::SurfaceCapabilitiesKHR {
            current_extent: vk::Extent2D { width: 800, height: 600 },
            min_image_extent: vk::Extent2D { width: 1, height: 1 },
            max_image_extent: vk::Extent2D { width: 1024, height: 1024 },
            ..Default::default()
        };
        let fallback = vk::Extent2D { width: 4096, height: 0 };

        assert_eq!(select_extent(&capabilities, fallback), vk::Extent2D { width: 800, height: 600 });

        capabilities.current_extent = vk::Extent2D {
            width: SURFACE_DEFINED_EXTENT,
            height: SURFACE_DEFINED_EXTENT,
        };
        assert_eq!(select_extent(&capabilities, fallback), vk::Extent2D { width: 1024, height: 1 });
    }
}
