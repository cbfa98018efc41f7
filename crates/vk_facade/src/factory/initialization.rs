//! Entry, instance, physical device, logical device and queues

use ash::vk;
use std::ffi::{c_char, CStr};

use crate::create_info::{self, Chainable};
use crate::creation::{self, CreateOptions, EmptyPolicy, LOG_TARGET};
use crate::error::{FacadeError, FacadeResult, ObjectKind, QueryKind};
use crate::handle::Handle;
use crate::negotiation::{queue_create_infos, select_physical_device};

/// Load the Vulkan loader library
pub fn load_entry() -> FacadeResult<ash::Entry> {
    // SAFETY: the loader is a well-formed system library; nothing else is run.
    unsafe { ash::Entry::load() }.map_err(|error| {
        log::error!(target: LOG_TARGET, "[FATAL] Could not load Vulkan: {error}");
        FacadeError::Loading(error.to_string())
    })
}

/// Highest instance-level API version the loader supports
///
/// Loaders that predate `vkEnumerateInstanceVersion` only support 1.0.
pub fn instance_version(entry: &ash::Entry) -> FacadeResult<u32> {
    creation::query(QueryKind::InstanceVersion, || entry.try_enumerate_instance_version())
        .map(|version| version.unwrap_or(vk::API_VERSION_1_0))
}

/// Create an instance at the loader's own API version
///
/// The application info reports the facade's engine name and version.
pub fn create_instance(
    entry: &ash::Entry,
    application_name: &CStr,
    application_version: u32,
    layer_names: &[*const c_char],
    extension_names: &[*const c_char],
    options: CreateOptions<'_>,
) -> FacadeResult<ash::Instance> {
    let api_version = instance_version(entry)?;
    log::info!(
        "Creating instance: API {}.{}.{}, {} layers, {} extensions",
        vk::api_version_major(api_version),
        vk::api_version_minor(api_version),
        vk::api_version_patch(api_version),
        layer_names.len(),
        extension_names.len()
    );

    let application_info = create_info::application_info(application_name, application_version, api_version);
    let info = create_info::instance_create_info(&application_info, layer_names, extension_names).with_next(options.next);

    creation::create(ObjectKind::Instance, || unsafe { entry.create_instance(&info, options.allocator) })
}

/// Every physical device the instance exposes; there is always at least one
pub fn enumerate_physical_devices(instance: &ash::Instance) -> FacadeResult<Vec<Handle<vk::PhysicalDevice>>> {
    let enumerate = instance.fp_v1_0().enumerate_physical_devices;
    let devices = creation::enumerate(QueryKind::PhysicalDevices, EmptyPolicy::RequireNonEmpty, |count, data| unsafe {
        enumerate(instance.handle(), count, data)
    })?;
    Ok(devices.into_iter().map(Handle::new).collect())
}

/// Enumerate physical devices and pick one
///
/// With `prefer_discrete` a discrete GPU beats an integrated one, which
/// beats everything else; otherwise the first reported device is used.
pub fn pick_physical_device(
    instance: &ash::Instance,
    prefer_discrete: bool,
) -> FacadeResult<Handle<vk::PhysicalDevice>> {
    let candidates: Vec<_> = enumerate_physical_devices(instance)?
        .into_iter()
        .map(|device| {
            let properties = unsafe { instance.get_physical_device_properties(device.raw()) };
            (device, properties)
        })
        .collect();

    let chosen = select_physical_device(&candidates, prefer_discrete)
        .ok_or(FacadeError::EmptyEnumeration(QueryKind::PhysicalDevices))?;

    if let Some((_, properties)) = candidates.iter().find(|(device, _)| *device == chosen) {
        let name = unsafe { CStr::from_ptr(properties.device_name.as_ptr()) };
        log::info!(
            "Selected GPU: {} ({:?})",
            name.to_string_lossy(),
            properties.device_type
        );
    }
    Ok(chosen)
}

/// Create a logical device with one queue per distinct requested family
///
/// `queue_families` may repeat an index (graphics and present are often the
/// same family); repeats are collapsed before the create-info is built.
/// `features` enables core features such as `sampler_anisotropy`; `None`
/// enables none.
pub fn create_device(
    instance: &ash::Instance,
    physical_device: Handle<vk::PhysicalDevice>,
    queue_families: &[u32],
    extension_names: &[*const c_char],
    features: Option<&vk::PhysicalDeviceFeatures>,
    options: CreateOptions<'_>,
) -> FacadeResult<ash::Device> {
    let queue_infos = queue_create_infos(queue_families);
    log::debug!(
        "Creating device with queue families {:?} (requested {:?})",
        queue_infos.iter().map(|info| info.queue_family_index).collect::<Vec<_>>(),
        queue_families
    );

    let info = create_info::device_create_info(&queue_infos, extension_names, features).with_next(options.next);

    creation::create(ObjectKind::Device, || unsafe {
        instance.create_device(physical_device.raw(), &info, options.allocator)
    })
}

/// Queue `index` of `family`; retrieval cannot fail
pub fn get_device_queue(device: &ash::Device, family: u32, index: u32) -> Handle<vk::Queue> {
    Handle::new(unsafe { device.get_device_queue(family, index) })
}
