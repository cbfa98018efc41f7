//! Buffers, images, samplers, memory and descriptors

use ash::vk;

use crate::create_info::{self, Chainable};
use crate::creation::{self, CreateOptions};
use crate::error::{FacadeResult, ObjectKind};
use crate::handle::{raw_handles, Handle};
use crate::negotiation::unique_queue_families;

/// Create an exclusive buffer of `size` bytes
pub fn create_buffer(
    device: &ash::Device,
    size: vk::DeviceSize,
    usage: vk::BufferUsageFlags,
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::Buffer>> {
    let info = create_info::buffer_create_info(size, usage).with_next(options.next);
    creation::create(ObjectKind::Buffer, || unsafe { device.create_buffer(&info, options.allocator) }).map(Handle::new)
}

/// Create a texel view over part of a buffer
pub fn create_buffer_view(
    device: &ash::Device,
    buffer: Handle<vk::Buffer>,
    format: vk::Format,
    offset: vk::DeviceSize,
    range: vk::DeviceSize,
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::BufferView>> {
    let info = create_info::buffer_view_create_info(buffer.raw(), format, offset, range).with_next(options.next);
    creation::create(ObjectKind::BufferView, || unsafe { device.create_buffer_view(&info, options.allocator) })
        .map(Handle::new)
}

/// Create a single-mip, single-layer image
///
/// Repeated queue families are collapsed; the sharing mode follows from how
/// many distinct families remain.
pub fn create_image(
    device: &ash::Device,
    image_type: vk::ImageType,
    format: vk::Format,
    extent: vk::Extent3D,
    usage: vk::ImageUsageFlags,
    queue_families: &[u32],
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::Image>> {
    let families = unique_queue_families(queue_families);
    let info = create_info::image_create_info(image_type, format, extent, usage, &families).with_next(options.next);
    creation::create(ObjectKind::Image, || unsafe { device.create_image(&info, options.allocator) }).map(Handle::new)
}

/// Create a 2D color view of an image
pub fn create_image_view(
    device: &ash::Device,
    image: Handle<vk::Image>,
    format: vk::Format,
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::ImageView>> {
    let info = create_info::image_view_create_info(image.raw(), format).with_next(options.next);
    creation::create(ObjectKind::ImageView, || unsafe { device.create_image_view(&info, options.allocator) })
        .map(Handle::new)
}

/// Create a sampler; see [`create_info::sampler_create_info`] for the optional features
pub fn create_sampler(
    device: &ash::Device,
    filter: vk::Filter,
    address_mode: vk::SamplerAddressMode,
    max_anisotropy: Option<f32>,
    compare_op: Option<vk::CompareOp>,
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::Sampler>> {
    let info =
        create_info::sampler_create_info(filter, address_mode, max_anisotropy, compare_op).with_next(options.next);
    creation::create(ObjectKind::Sampler, || unsafe { device.create_sampler(&info, options.allocator) })
        .map(Handle::new)
}

/// Allocate `size` bytes from memory type `memory_type_index`
pub fn allocate_memory(
    device: &ash::Device,
    size: vk::DeviceSize,
    memory_type_index: u32,
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::DeviceMemory>> {
    let info = create_info::memory_allocate_info(size, memory_type_index).with_next(options.next);
    creation::create(ObjectKind::DeviceMemory, || unsafe { device.allocate_memory(&info, options.allocator) })
        .map(Handle::new)
}

/// Create a descriptor set layout over the given bindings
pub fn create_descriptor_set_layout(
    device: &ash::Device,
    bindings: &[vk::DescriptorSetLayoutBinding],
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::DescriptorSetLayout>> {
    let info = create_info::descriptor_set_layout_create_info(bindings).with_next(options.next);
    creation::create(ObjectKind::DescriptorSetLayout, || unsafe {
        device.create_descriptor_set_layout(&info, options.allocator)
    })
    .map(Handle::new)
}

/// Create a pool able to hold `max_sets` sets
pub fn create_descriptor_pool(
    device: &ash::Device,
    max_sets: u32,
    pool_sizes: &[vk::DescriptorPoolSize],
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::DescriptorPool>> {
    let info = create_info::descriptor_pool_create_info(max_sets, pool_sizes).with_next(options.next);
    creation::create(ObjectKind::DescriptorPool, || unsafe {
        device.create_descriptor_pool(&info, options.allocator)
    })
    .map(Handle::new)
}

/// Allocate one descriptor set per layout from `pool`
///
/// Sets are returned in layout order. Allocation takes no host allocator;
/// only the extension chain from `options` is used.
pub fn allocate_descriptor_sets(
    device: &ash::Device,
    pool: Handle<vk::DescriptorPool>,
    layouts: &[Handle<vk::DescriptorSetLayout>],
    options: CreateOptions<'_>,
) -> FacadeResult<Vec<Handle<vk::DescriptorSet>>> {
    let layouts = raw_handles(layouts);
    let info = create_info::descriptor_set_allocate_info(pool.raw(), &layouts).with_next(options.next);
    let sets = creation::create(ObjectKind::DescriptorSets, || unsafe { device.allocate_descriptor_sets(&info) })?;
    Ok(sets.into_iter().map(Handle::new).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creation::tests::{captured_errors, start_capture};
    use crate::factory::tests::{entry, fake_device};
    use ash::vk::Handle as _;

    unsafe extern "system" fn create_buffer_ok(
        _device: vk::Device,
        info: *const vk::BufferCreateInfo,
        _allocator: *const vk::AllocationCallbacks,
        out: *mut vk::Buffer,
    ) -> vk::Result {
        *out = vk::Buffer::from_raw((*info).size);
        vk::Result::SUCCESS
    }

    unsafe extern "system" fn create_image_out_of_memory(
        _device: vk::Device,
        _info: *const vk::ImageCreateInfo,
        _allocator: *const vk::AllocationCallbacks,
        _out: *mut vk::Image,
    ) -> vk::Result {
        vk::Result::ERROR_OUT_OF_DEVICE_MEMORY
    }

    unsafe extern "system" fn allocate_sets(
        _device: vk::Device,
        info: *const vk::DescriptorSetAllocateInfo,
        out: *mut vk::DescriptorSet,
    ) -> vk::Result {
        let info = &*info;
        for index in 0..info.descriptor_set_count as usize {
            let layout = *info.p_set_layouts.add(index);
            *out.add(index) = vk::DescriptorSet::from_raw(layout.as_raw() + 100);
        }
        vk::Result::SUCCESS
    }

    #[test]
    fn test_buffer_factory_passes_create_info() {
        start_capture();
        let device = fake_device(vec![entry!("vkCreateBuffer", create_buffer_ok)]);

        let buffer = create_buffer(&device, 256, vk::BufferUsageFlags::UNIFORM_BUFFER, CreateOptions::new()).unwrap();
        assert_eq!(buffer.as_raw(), 256);
        assert!(captured_errors().is_empty());
    }

    #[test]
    fn test_image_factory_failure_is_fatal_and_logged_once() {
        start_capture();
        let device = fake_device(vec![entry!("vkCreateImage", create_image_out_of_memory)]);

        let error = create_image(
            &device,
            vk::ImageType::TYPE_2D,
            vk::Format::R8G8B8A8_UNORM,
            vk::Extent3D {
                width: 1,
                height: 1,
                depth: 1,
            },
            vk::ImageUsageFlags::SAMPLED,
            &[0, 0],
            CreateOptions::new(),
        )
        .unwrap_err();

        assert_eq!(error.status(), Some(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY));
        let errors = captured_errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("image"));
    }

    #[test]
    fn test_descriptor_sets_follow_layout_order() {
        let device = fake_device(vec![entry!("vkAllocateDescriptorSets", allocate_sets)]);
        let layouts = [
            Handle::new(vk::DescriptorSetLayout::from_raw(2)),
            Handle::new(vk::DescriptorSetLayout::from_raw(1)),
        ];

        let sets = allocate_descriptor_sets(
            &device,
            Handle::new(vk::DescriptorPool::from_raw(9)),
            &layouts,
            CreateOptions::new(),
        )
        .unwrap();

        let raw: Vec<u64> = sets.iter().map(|set| set.as_raw()).collect();
        assert_eq!(raw, vec![102, 101]);
    }
}
