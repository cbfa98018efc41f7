//! Buffer, image, sampler and memory records

use ash::vk;

use crate::negotiation::{select_sharing_mode, unique_queue_families};

/// Buffers are owned by one queue family at a time
pub const BUFFER_SHARING_MODE: vk::SharingMode = vk::SharingMode::EXCLUSIVE;

/// Mip levels of a facade-created image
pub const IMAGE_MIP_LEVELS: u32 = 1;
/// Array layers of a facade-created image
pub const IMAGE_ARRAY_LAYERS: u32 = 1;
/// Samples per texel of a facade-created image
pub const IMAGE_SAMPLES: vk::SampleCountFlags = vk::SampleCountFlags::TYPE_1;
/// Tiling of a facade-created image
pub const IMAGE_TILING: vk::ImageTiling = vk::ImageTiling::OPTIMAL;
/// Layout of a freshly created image
pub const IMAGE_INITIAL_LAYOUT: vk::ImageLayout = vk::ImageLayout::UNDEFINED;

/// View type of a facade-created image view
pub const IMAGE_VIEW_TYPE: vk::ImageViewType = vk::ImageViewType::TYPE_2D;
/// Identity swizzle on every channel
pub const IDENTITY_COMPONENTS: vk::ComponentMapping = vk::ComponentMapping {
    r: vk::ComponentSwizzle::IDENTITY,
    g: vk::ComponentSwizzle::IDENTITY,
    b: vk::ComponentSwizzle::IDENTITY,
    a: vk::ComponentSwizzle::IDENTITY,
};
/// First mip level and layer of a color image
pub const COLOR_SUBRESOURCE_RANGE: vk::ImageSubresourceRange = vk::ImageSubresourceRange {
    aspect_mask: vk::ImageAspectFlags::COLOR,
    base_mip_level: 0,
    level_count: 1,
    base_array_layer: 0,
    layer_count: 1,
};

/// Sampler mipmap mode
pub const SAMPLER_MIPMAP_MODE: vk::SamplerMipmapMode = vk::SamplerMipmapMode::LINEAR;
/// Border color for clamp-to-border addressing
pub const SAMPLER_BORDER_COLOR: vk::BorderColor = vk::BorderColor::INT_OPAQUE_BLACK;

/// Two-dimensional extent
pub const fn extent_2d(width: u32, height: u32) -> vk::Extent2D {
    vk::Extent2D { width, height }
}

/// Three-dimensional extent
pub const fn extent_3d(width: u32, height: u32, depth: u32) -> vk::Extent3D {
    vk::Extent3D { width, height, depth }
}

/// Two-dimensional offset
pub const fn offset_2d(x: i32, y: i32) -> vk::Offset2D {
    vk::Offset2D { x, y }
}

/// Three-dimensional offset
pub const fn offset_3d(x: i32, y: i32, z: i32) -> vk::Offset3D {
    vk::Offset3D { x, y, z }
}

/// Memory allocation of `size` bytes from memory type `memory_type_index`
pub fn memory_allocate_info<'a>(size: vk::DeviceSize, memory_type_index: u32) -> vk::MemoryAllocateInfoBuilder<'a> {
    vk::MemoryAllocateInfo::builder()
        .allocation_size(size)
        .memory_type_index(memory_type_index)
}

/// Exclusive buffer of `size` bytes
pub fn buffer_create_info<'a>(size: vk::DeviceSize, usage: vk::BufferUsageFlags) -> vk::BufferCreateInfoBuilder<'a> {
    vk::BufferCreateInfo::builder()
        .size(size)
        .usage(usage)
        .sharing_mode(BUFFER_SHARING_MODE)
}

/// Copy of `size` bytes between the starts of two buffers
pub fn buffer_copy(size: vk::DeviceSize) -> vk::BufferCopy {
    vk::BufferCopy {
        src_offset: 0,
        dst_offset: 0,
        size,
    }
}

/// Texel view of `range` bytes of `buffer` starting at `offset`
pub fn buffer_view_create_info<'a>(
    buffer: vk::Buffer,
    format: vk::Format,
    offset: vk::DeviceSize,
    range: vk::DeviceSize,
) -> vk::BufferViewCreateInfoBuilder<'a> {
    vk::BufferViewCreateInfo::builder()
        .buffer(buffer)
        .format(format)
        .offset(offset)
        .range(range)
}

/// Single-mip, single-layer, optimally tiled image
///
/// `queue_families` must already be distinct (see
/// [`crate::negotiation::unique_queue_families`]). One family or none gives
/// exclusive sharing and no index list; more give concurrent sharing over
/// exactly those families. A list that repeats a family is never recorded:
/// the image falls back to exclusive sharing with no index list.
pub fn image_create_info<'a>(
    image_type: vk::ImageType,
    format: vk::Format,
    extent: vk::Extent3D,
    usage: vk::ImageUsageFlags,
    queue_families: &'a [u32],
) -> vk::ImageCreateInfoBuilder<'a> {
    let distinct = unique_queue_families(queue_families).len() == queue_families.len();
    let sharing_mode = if distinct {
        select_sharing_mode(queue_families)
    } else {
        log::warn!("Image queue families {queue_families:?} repeat a family, using exclusive sharing");
        vk::SharingMode::EXCLUSIVE
    };
    let info = vk::ImageCreateInfo::builder()
        .image_type(image_type)
        .format(format)
        .extent(extent)
        .mip_levels(IMAGE_MIP_LEVELS)
        .array_layers(IMAGE_ARRAY_LAYERS)
        .samples(IMAGE_SAMPLES)
        .tiling(IMAGE_TILING)
        .usage(usage)
        .sharing_mode(sharing_mode)
        .initial_layout(IMAGE_INITIAL_LAYOUT);

    if sharing_mode == vk::SharingMode::CONCURRENT {
        info.queue_family_indices(queue_families)
    } else {
        info
    }
}

/// 2D view of the first mip level and layer of a color image
pub fn image_view_create_info<'a>(image: vk::Image, format: vk::Format) -> vk::ImageViewCreateInfoBuilder<'a> {
    vk::ImageViewCreateInfo::builder()
        .image(image)
        .view_type(IMAGE_VIEW_TYPE)
        .format(format)
        .components(IDENTITY_COMPONENTS)
        .subresource_range(COLOR_SUBRESOURCE_RANGE)
}

/// Per-channel swizzle
pub const fn component_mapping(
    r: vk::ComponentSwizzle,
    g: vk::ComponentSwizzle,
    b: vk::ComponentSwizzle,
    a: vk::ComponentSwizzle,
) -> vk::ComponentMapping {
    vk::ComponentMapping { r, g, b, a }
}

/// Range of mip levels and array layers within an image
pub const fn image_subresource_range(
    aspect_mask: vk::ImageAspectFlags,
    base_mip_level: u32,
    level_count: u32,
    base_array_layer: u32,
    layer_count: u32,
) -> vk::ImageSubresourceRange {
    vk::ImageSubresourceRange {
        aspect_mask,
        base_mip_level,
        level_count,
        base_array_layer,
        layer_count,
    }
}

/// Layers of one mip level, as used by copy commands
pub const fn image_subresource_layers(
    aspect_mask: vk::ImageAspectFlags,
    mip_level: u32,
    base_array_layer: u32,
    layer_count: u32,
) -> vk::ImageSubresourceLayers {
    vk::ImageSubresourceLayers {
        aspect_mask,
        mip_level,
        base_array_layer,
        layer_count,
    }
}

/// Copy from a tightly described buffer region into the first color layer
pub fn buffer_image_copy(
    buffer_offset: vk::DeviceSize,
    buffer_row_length: u32,
    buffer_image_height: u32,
    image_extent: vk::Extent3D,
) -> vk::BufferImageCopy {
    vk::BufferImageCopy {
        buffer_offset,
        buffer_row_length,
        buffer_image_height,
        image_subresource: image_subresource_layers(vk::ImageAspectFlags::COLOR, 0, 0, 1),
        image_offset: offset_3d(0, 0, 0),
        image_extent,
    }
}

/// Layout transition of the first color subresource of `image`
///
/// Pass [`vk::QUEUE_FAMILY_IGNORED`] for both families when ownership does
/// not change.
pub fn image_memory_barrier<'a>(
    access: (vk::AccessFlags, vk::AccessFlags),
    layouts: (vk::ImageLayout, vk::ImageLayout),
    queue_families: (u32, u32),
    image: vk::Image,
) -> vk::ImageMemoryBarrierBuilder<'a> {
    vk::ImageMemoryBarrier::builder()
        .src_access_mask(access.0)
        .dst_access_mask(access.1)
        .old_layout(layouts.0)
        .new_layout(layouts.1)
        .src_queue_family_index(queue_families.0)
        .dst_queue_family_index(queue_families.1)
        .image(image)
        .subresource_range(COLOR_SUBRESOURCE_RANGE)
}

/// Sampler with one filter and address mode for every axis
///
/// `max_anisotropy` enables anisotropic filtering, `compare_op` enables
/// depth comparison.
pub fn sampler_create_info<'a>(
    filter: vk::Filter,
    address_mode: vk::SamplerAddressMode,
    max_anisotropy: Option<f32>,
    compare_op: Option<vk::CompareOp>,
) -> vk::SamplerCreateInfoBuilder<'a> {
    vk::SamplerCreateInfo::builder()
        .mag_filter(filter)
        .min_filter(filter)
        .mipmap_mode(SAMPLER_MIPMAP_MODE)
        .address_mode_u(address_mode)
        .address_mode_v(address_mode)
        .address_mode_w(address_mode)
        .mip_lod_bias(0.0)
        .anisotropy_enable(max_anisotropy.is_some())
        .max_anisotropy(max_anisotropy.unwrap_or(1.0))
        .compare_enable(compare_op.is_some())
        .compare_op(compare_op.unwrap_or(vk::CompareOp::ALWAYS))
        .min_lod(0.0)
        .max_lod(0.0)
        .border_color(SAMPLER_BORDER_COLOR)
        .unnormalized_coordinates(false)
}
