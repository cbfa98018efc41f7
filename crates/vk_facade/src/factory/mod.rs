//! Factories: one call per native object type
//!
//! Each factory builds its create-info through [`crate::create_info`],
//! threads the caller's [`CreateOptions`](crate::creation::CreateOptions)
//! into it, and hands the native entry point to
//! [`creation::create`](crate::creation::create). Handles come back wrapped
//! in [`Handle`](crate::handle::Handle) and are never retained: destroying
//! them through the native API is the caller's job.
//!
//! Instances and devices come back as `ash::Instance` / `ash::Device`,
//! since their function tables are needed for every later call.

pub mod initialization;
pub mod query;
pub mod rendering;
pub mod resources;
pub mod state;

pub use initialization::*;
pub use query::*;
pub use rendering::*;
pub use resources::*;
pub use state::*;

#[cfg(test)]
pub(crate) mod tests {
    //! Device and instance stand-ins whose entry points are plain functions
    //!
    //! Only the entry points a test installs are callable; anything else
    //! panics inside `ash`'s unloaded stub.

    use ash::vk;
    use std::ffi::{c_char, c_void, CStr};

    /// Fake entry point: (Vulkan name, function pointer)
    pub(crate) type FakeEntry = (&'static CStr, vk::PFN_vkVoidFunction);

    thread_local! {
        static ENTRIES: std::cell::RefCell<Vec<FakeEntry>> = std::cell::RefCell::new(Vec::new());
    }

    unsafe extern "system" fn get_device_proc_addr(_device: vk::Device, name: *const c_char) -> vk::PFN_vkVoidFunction {
        let name = CStr::from_ptr(name);
        ENTRIES.with(|entries| {
            entries
                .borrow()
                .iter()
                .find(|(entry, _)| *entry == name)
                .and_then(|(_, function)| *function)
        })
    }

    unsafe extern "system" fn get_instance_proc_addr(
        _instance: vk::Instance,
        name: *const c_char,
    ) -> vk::PFN_vkVoidFunction {
        if CStr::from_ptr(name).to_bytes() == b"vkGetDeviceProcAddr" {
            // SAFETY: the loader casts back to `PFN_vkGetDeviceProcAddr`.
            return Some(std::mem::transmute::<*const (), unsafe extern "system" fn()>(
                get_device_proc_addr as *const (),
            ));
        }
        get_device_proc_addr(vk::Device::null(), name)
    }

    /// Erase a concrete entry point signature
    macro_rules! entry {
        ($name:literal, $function:expr) => {
            (
                // SAFETY: literal is NUL-terminated below.
                unsafe { std::ffi::CStr::from_bytes_with_nul_unchecked(concat!($name, "\0").as_bytes()) },
                // SAFETY: the loader casts back to the exact signature named by `$name`.
                Some(unsafe { std::mem::transmute::<*const (), unsafe extern "system" fn()>($function as *const ()) }),
            )
        };
    }
    pub(crate) use entry;

    /// Build an `ash::Device` whose calls land in `entries`
    pub(crate) fn fake_device(entries: Vec<FakeEntry>) -> ash::Device {
        ENTRIES.with(|slot| *slot.borrow_mut() = entries);

        let instance_fn = vk::InstanceFnV1_0::load(|name| {
            if name.to_bytes() == b"vkGetDeviceProcAddr" {
                get_device_proc_addr as *const c_void
            } else {
                std::ptr::null()
            }
        });
        // SAFETY: the handle is never dereferenced; every call goes to a fake.
        unsafe { ash::Device::load(&instance_fn, <vk::Device as vk::Handle>::from_raw(0xD0)) }
    }

    /// Build an `ash::Instance` whose calls land in `entries`
    ///
    /// Devices created or loaded through it resolve their entry points from
    /// the same list.
    pub(crate) fn fake_instance(entries: Vec<FakeEntry>) -> ash::Instance {
        ENTRIES.with(|slot| *slot.borrow_mut() = entries);

        let static_fn = vk::StaticFn {
            get_instance_proc_addr,
        };
        // SAFETY: the handle is never dereferenced; every call goes to a fake.
        unsafe { ash::Instance::load(&static_fn, <vk::Instance as vk::Handle>::from_raw(0x1A)) }
    }
}
