//! Synchronization, command and presentation objects

use ash::extensions::khr::Swapchain as SwapchainLoader;
use ash::vk;

use crate::create_info::{self, Chainable};
use crate::creation::{self, CreateOptions, EmptyPolicy};
use crate::error::{FacadeResult, ObjectKind, QueryKind};
use crate::handle::Handle;
use crate::negotiation::{negotiate, CapabilitySnapshot};

/// Create a fence in the signaled state
pub fn create_fence(device: &ash::Device, options: CreateOptions<'_>) -> FacadeResult<Handle<vk::Fence>> {
    let info = create_info::fence_create_info().with_next(options.next);
    creation::create(ObjectKind::Fence, || unsafe { device.create_fence(&info, options.allocator) }).map(Handle::new)
}

/// Create a binary semaphore
pub fn create_semaphore(device: &ash::Device, options: CreateOptions<'_>) -> FacadeResult<Handle<vk::Semaphore>> {
    let info = create_info::semaphore_create_info().with_next(options.next);
    creation::create(ObjectKind::Semaphore, || unsafe { device.create_semaphore(&info, options.allocator) })
        .map(Handle::new)
}

/// Create a resettable command pool for `queue_family`
pub fn create_command_pool(
    device: &ash::Device,
    queue_family: u32,
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::CommandPool>> {
    let info = create_info::command_pool_create_info(queue_family).with_next(options.next);
    creation::create(ObjectKind::CommandPool, || unsafe {
        device.create_command_pool(&info, options.allocator)
    })
    .map(Handle::new)
}

/// Allocate one primary command buffer from `pool`
///
/// Allocation takes no host allocator; only the extension chain from
/// `options` is used.
pub fn allocate_command_buffer(
    device: &ash::Device,
    pool: Handle<vk::CommandPool>,
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::CommandBuffer>> {
    let info = create_info::command_buffer_allocate_info(pool.raw()).with_next(options.next);
    creation::create(ObjectKind::CommandBuffer, || {
        let buffers = unsafe { device.allocate_command_buffers(&info) }?;
        buffers.into_iter().next().ok_or(vk::Result::ERROR_UNKNOWN)
    })
    .map(Handle::new)
}

/// Negotiate parameters from `snapshot` and create a swapchain
///
/// `queue_families` are the families that will touch the images (usually
/// graphics and present); repeats are collapsed. Pass the previous
/// swapchain as `old_swapchain` when recreating.
pub fn create_swapchain(
    swapchain_loader: &SwapchainLoader,
    surface: vk::SurfaceKHR,
    format: vk::SurfaceFormatKHR,
    extent: vk::Extent2D,
    snapshot: &CapabilitySnapshot,
    queue_families: &[u32],
    old_swapchain: Option<Handle<vk::SwapchainKHR>>,
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::SwapchainKHR>> {
    let parameters = negotiate(snapshot, queue_families);
    log::info!(
        "Creating swapchain: {}x{} {:?}, {} images, {:?}, {:?}",
        extent.width,
        extent.height,
        format.format,
        parameters.image_count,
        parameters.present_mode,
        parameters.sharing_mode
    );

    let info = create_info::swapchain_create_info(
        surface,
        format,
        extent,
        &parameters,
        old_swapchain.map(Handle::raw),
    )
    .with_next(options.next);
    creation::create(ObjectKind::Swapchain, || unsafe {
        swapchain_loader.create_swapchain(&info, options.allocator)
    })
    .map(Handle::new)
}

/// Presentable images owned by `swapchain`; there is always at least one
pub fn swapchain_images(
    device: &ash::Device,
    swapchain_loader: &SwapchainLoader,
    swapchain: Handle<vk::SwapchainKHR>,
) -> FacadeResult<Vec<Handle<vk::Image>>> {
    let get_images = swapchain_loader.fp().get_swapchain_images_khr;
    let images = creation::enumerate(QueryKind::SwapchainImages, EmptyPolicy::RequireNonEmpty, |count, data| unsafe {
        get_images(device.handle(), swapchain.raw(), count, data)
    })?;
    Ok(images.into_iter().map(Handle::new).collect())
}
