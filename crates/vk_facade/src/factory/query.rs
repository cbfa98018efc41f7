//! Capability queries
//!
//! Variable-length queries run the two-phase enumeration in
//! [`creation::enumerate`]; lists the platform guarantees to be non-empty
//! treat an empty answer as fatal.

use ash::extensions::khr::Surface as SurfaceLoader;
use ash::vk;
use std::ffi::CStr;
use std::ptr;

use crate::creation::{self, EmptyPolicy};
use crate::error::{FacadeResult, QueryKind};
use crate::handle::Handle;
use crate::negotiation::{find_memory_type, QueueFamilySnapshot};

/// Device name, type, limits and API version
pub fn physical_device_properties(
    instance: &ash::Instance,
    physical_device: Handle<vk::PhysicalDevice>,
) -> vk::PhysicalDeviceProperties {
    unsafe { instance.get_physical_device_properties(physical_device.raw()) }
}

/// Memory heaps and memory types
pub fn physical_device_memory_properties(
    instance: &ash::Instance,
    physical_device: Handle<vk::PhysicalDevice>,
) -> vk::PhysicalDeviceMemoryProperties {
    unsafe { instance.get_physical_device_memory_properties(physical_device.raw()) }
}

/// Memory type index for a resource's `type_bits` with every `required` property
///
/// `None` when the device has no such memory type.
pub fn memory_type_index(
    instance: &ash::Instance,
    physical_device: Handle<vk::PhysicalDevice>,
    type_bits: u32,
    required: vk::MemoryPropertyFlags,
) -> Option<u32> {
    let properties = physical_device_memory_properties(instance, physical_device);
    find_memory_type(&properties, type_bits, required)
}

/// Queue family properties; every device has at least one family
pub fn queue_family_properties(
    instance: &ash::Instance,
    physical_device: Handle<vk::PhysicalDevice>,
) -> FacadeResult<Vec<vk::QueueFamilyProperties>> {
    let get_properties = instance.fp_v1_0().get_physical_device_queue_family_properties;
    creation::enumerate(QueryKind::QueueFamilyProperties, EmptyPolicy::RequireNonEmpty, |count, data| {
        // The native call has no status; it always writes what fits.
        unsafe { get_properties(physical_device.raw(), count, data) };
        vk::Result::SUCCESS
    })
}

/// Device extensions; an empty list is a valid answer
pub fn device_extension_properties(
    instance: &ash::Instance,
    physical_device: Handle<vk::PhysicalDevice>,
) -> FacadeResult<Vec<vk::ExtensionProperties>> {
    let enumerate = instance.fp_v1_0().enumerate_device_extension_properties;
    creation::enumerate(QueryKind::DeviceExtensions, EmptyPolicy::AllowEmpty, |count, data| unsafe {
        enumerate(physical_device.raw(), ptr::null(), count, data)
    })
}

/// Names from `required` missing from `available`
pub fn missing_extensions<'a>(available: &[vk::ExtensionProperties], required: &[&'a CStr]) -> Vec<&'a CStr> {
    required
        .iter()
        .copied()
        .filter(|required| {
            !available.iter().any(|extension| {
                // SAFETY: the driver NUL-terminates `extension_name`.
                let name = unsafe { CStr::from_ptr(extension.extension_name.as_ptr()) };
                name == *required
            })
        })
        .collect()
}

/// Whether queue family `family` can present to `surface`
pub fn surface_support(
    surface_loader: &SurfaceLoader,
    physical_device: Handle<vk::PhysicalDevice>,
    family: u32,
    surface: vk::SurfaceKHR,
) -> FacadeResult<bool> {
    creation::query(QueryKind::SurfaceSupport, || unsafe {
        surface_loader.get_physical_device_surface_support(physical_device.raw(), family, surface)
    })
}

/// Image count limits, extents and transforms of a surface
pub fn surface_capabilities(
    surface_loader: &SurfaceLoader,
    physical_device: Handle<vk::PhysicalDevice>,
    surface: vk::SurfaceKHR,
) -> FacadeResult<vk::SurfaceCapabilitiesKHR> {
    creation::query(QueryKind::SurfaceCapabilities, || unsafe {
        surface_loader.get_physical_device_surface_capabilities(physical_device.raw(), surface)
    })
}

/// Supported surface formats; a presentable surface always has one
pub fn surface_formats(
    surface_loader: &SurfaceLoader,
    physical_device: Handle<vk::PhysicalDevice>,
    surface: vk::SurfaceKHR,
) -> FacadeResult<Vec<vk::SurfaceFormatKHR>> {
    let get_formats = surface_loader.fp().get_physical_device_surface_formats_khr;
    creation::enumerate(QueryKind::SurfaceFormats, EmptyPolicy::RequireNonEmpty, |count, data| unsafe {
        get_formats(physical_device.raw(), surface, count, data)
    })
}

/// Supported present modes in reported order; FIFO is always among them
pub fn surface_present_modes(
    surface_loader: &SurfaceLoader,
    physical_device: Handle<vk::PhysicalDevice>,
    surface: vk::SurfaceKHR,
) -> FacadeResult<Vec<vk::PresentModeKHR>> {
    let get_present_modes = surface_loader.fp().get_physical_device_surface_present_modes_khr;
    creation::enumerate(QueryKind::PresentModes, EmptyPolicy::RequireNonEmpty, |count, data| unsafe {
        get_present_modes(physical_device.raw(), surface, count, data)
    })
}

/// Queue families of a device together with their present support for `surface`
pub fn queue_family_snapshot(
    instance: &ash::Instance,
    surface_loader: &SurfaceLoader,
    physical_device: Handle<vk::PhysicalDevice>,
    surface: vk::SurfaceKHR,
) -> FacadeResult<QueueFamilySnapshot> {
    let properties = queue_family_properties(instance, physical_device)?;
    let present_support = (0..properties.len() as u32)
        .map(|family| surface_support(surface_loader, physical_device, family, surface))
        .collect::<FacadeResult<Vec<_>>>()?;
    Ok(QueueFamilySnapshot::new(&properties, &present_support))
}
