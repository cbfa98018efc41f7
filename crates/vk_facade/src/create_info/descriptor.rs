//! Descriptor layouts, pools, sets and writes

use ash::vk;

/// Layout binding of `count` descriptors visible to `stages`
pub fn descriptor_set_layout_binding(
    binding: u32,
    descriptor_type: vk::DescriptorType,
    count: u32,
    stages: vk::ShaderStageFlags,
) -> vk::DescriptorSetLayoutBinding {
    vk::DescriptorSetLayoutBinding::builder()
        .binding(binding)
        .descriptor_type(descriptor_type)
        .descriptor_count(count)
        .stage_flags(stages)
        .build()
}

/// Set layout over the given bindings
pub fn descriptor_set_layout_create_info(
    bindings: &[vk::DescriptorSetLayoutBinding],
) -> vk::DescriptorSetLayoutCreateInfoBuilder<'_> {
    vk::DescriptorSetLayoutCreateInfo::builder().bindings(bindings)
}

/// Pool capacity for one descriptor type
pub const fn descriptor_pool_size(ty: vk::DescriptorType, descriptor_count: u32) -> vk::DescriptorPoolSize {
    vk::DescriptorPoolSize { ty, descriptor_count }
}

/// Pool able to allocate `max_sets` sets from the given capacities
pub fn descriptor_pool_create_info(
    max_sets: u32,
    pool_sizes: &[vk::DescriptorPoolSize],
) -> vk::DescriptorPoolCreateInfoBuilder<'_> {
    vk::DescriptorPoolCreateInfo::builder()
        .max_sets(max_sets)
        .pool_sizes(pool_sizes)
}

/// Allocation of one set per layout from `pool`
pub fn descriptor_set_allocate_info(
    pool: vk::DescriptorPool,
    set_layouts: &[vk::DescriptorSetLayout],
) -> vk::DescriptorSetAllocateInfoBuilder<'_> {
    vk::DescriptorSetAllocateInfo::builder()
        .descriptor_pool(pool)
        .set_layouts(set_layouts)
}

/// Buffer range bound to a descriptor
pub const fn descriptor_buffer_info(
    buffer: vk::Buffer,
    offset: vk::DeviceSize,
    range: vk::DeviceSize,
) -> vk::DescriptorBufferInfo {
    vk::DescriptorBufferInfo { buffer, offset, range }
}

/// Image view (and sampler) bound to a descriptor
pub const fn descriptor_image_info(
    sampler: vk::Sampler,
    image_view: vk::ImageView,
    image_layout: vk::ImageLayout,
) -> vk::DescriptorImageInfo {
    vk::DescriptorImageInfo {
        sampler,
        image_view,
        image_layout,
    }
}

/// Write of buffer descriptors, one per entry of `buffers`
pub fn write_buffer_descriptors<'a>(
    dst_set: vk::DescriptorSet,
    dst_binding: u32,
    descriptor_type: vk::DescriptorType,
    buffers: &'a [vk::DescriptorBufferInfo],
) -> vk::WriteDescriptorSetBuilder<'a> {
    vk::WriteDescriptorSet::builder()
        .dst_set(dst_set)
        .dst_binding(dst_binding)
        .dst_array_element(0)
        .descriptor_type(descriptor_type)
        .buffer_info(buffers)
}

/// Write of image descriptors, one per entry of `images`
pub fn write_image_descriptors<'a>(
    dst_set: vk::DescriptorSet,
    dst_binding: u32,
    descriptor_type: vk::DescriptorType,
    images: &'a [vk::DescriptorImageInfo],
) -> vk::WriteDescriptorSetBuilder<'a> {
    vk::WriteDescriptorSet::builder()
        .dst_set(dst_set)
        .dst_binding(dst_binding)
        .dst_array_element(0)
        .descriptor_type(descriptor_type)
        .image_info(images)
}
