//! Application and instance records

use ash::vk;
use std::ffi::{c_char, CStr, CString};

/// Engine name reported in every application info
pub const ENGINE_NAME: &CStr = unsafe { CStr::from_bytes_with_nul_unchecked(b"vk_facade\0") };

/// Engine version reported in every application info
pub const ENGINE_VERSION: u32 = vk::make_api_version(0, 0, 1, 0);

/// API version requested when the caller has no preference
pub const DEFAULT_API_VERSION: u32 = vk::API_VERSION_1_0;

/// Application info with the facade's engine name and version
pub fn application_info(
    application_name: &CStr,
    application_version: u32,
    api_version: u32,
) -> vk::ApplicationInfoBuilder<'_> {
    vk::ApplicationInfo::builder()
        .application_name(application_name)
        .application_version(application_version)
        .engine_name(ENGINE_NAME)
        .engine_version(ENGINE_VERSION)
        .api_version(api_version)
}

/// Instance create info enabling the given layers and extensions
pub fn instance_create_info<'a>(
    application_info: &'a vk::ApplicationInfo,
    layer_names: &'a [*const c_char],
    extension_names: &'a [*const c_char],
) -> vk::InstanceCreateInfoBuilder<'a> {
    vk::InstanceCreateInfo::builder()
        .application_info(application_info)
        .enabled_layer_names(layer_names)
        .enabled_extension_names(extension_names)
}

/// Raw pointers for a list of owned names, valid while `names` lives
pub fn name_pointers(names: &[CString]) -> Vec<*const c_char> {
    names.iter().map(|name| name.as_ptr()).collect()
}
