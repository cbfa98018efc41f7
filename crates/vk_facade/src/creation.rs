//! Creation protocol shared by every factory
//!
//! Each factory builds a create-info record, hands it to [`create`] together
//! with the native entry point, and gets back either the handle or a
//! [`FacadeError::Native`]. Variable-length queries go through [`enumerate`],
//! which runs the native "query count, then query data" dance.

use ash::prelude::VkResult;
use ash::vk;
use std::ffi::c_void;
use std::marker::PhantomData;
use std::ptr;

use crate::error::{FacadeError, FacadeResult, ObjectKind, Operation, QueryKind};

/// Log target used for every facade diagnostic
pub const LOG_TARGET: &str = "vk_facade";

/// Times [`enumerate`] restarts after the list changed mid-query before it gives up
pub const MAX_ENUMERATION_RESTARTS: u32 = 3;

/// Opaque extension chain threaded into a create-info record's `p_next`
///
/// The facade never inspects or modifies the chain; it only copies the
/// pointer. The lifetime keeps the chained structures borrowed for as long
/// as the record that points at them.
#[derive(Clone, Copy, Debug)]
pub struct ExtensionChain<'a> {
    head: *const c_void,
    _marker: PhantomData<&'a c_void>,
}

impl<'a> ExtensionChain<'a> {
    /// Empty chain (`p_next = NULL`)
    pub const fn none() -> Self {
        Self {
            head: ptr::null(),
            _marker: PhantomData,
        }
    }

    /// Chain starting at an arbitrary extension structure
    ///
    /// # Safety
    ///
    /// `head` must be null or point to a valid, properly `s_type`-tagged
    /// Vulkan structure chain that stays alive for `'a`.
    pub const unsafe fn from_raw(head: *const c_void) -> Self {
        Self {
            head,
            _marker: PhantomData,
        }
    }

    /// Raw pointer to write into `p_next`
    pub const fn as_ptr(&self) -> *const c_void {
        self.head
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.head.is_null()
    }
}

impl Default for ExtensionChain<'_> {
    fn default() -> Self {
        Self::none()
    }
}

/// Optional parameters accepted by every factory
#[derive(Clone, Copy, Debug, Default)]
pub struct CreateOptions<'a> {
    /// Custom host allocator, `None` for the driver's default
    pub allocator: Option<&'a vk::AllocationCallbacks>,
    /// Extension chain for the top-level create-info record
    pub next: ExtensionChain<'a>,
}

impl<'a> CreateOptions<'a> {
    /// Options with no allocator and no extension chain
    pub const fn new() -> Self {
        Self {
            allocator: None,
            next: ExtensionChain::none(),
        }
    }

    /// Use a custom host allocator
    pub const fn with_allocator(mut self, allocator: &'a vk::AllocationCallbacks) -> Self {
        self.allocator = Some(allocator);
        self
    }

    /// Attach an extension chain to the create-info record
    pub const fn with_next(mut self, next: ExtensionChain<'a>) -> Self {
        self.next = next;
        self
    }
}

/// How an enumeration treats a zero-length result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyPolicy {
    /// Zero elements is a valid answer (e.g. device extensions)
    AllowEmpty,
    /// The platform guarantees at least one element (e.g. queue families)
    RequireNonEmpty,
}

/// Report a native failure: one tagged diagnostic, then the typed error
pub(crate) fn fail(operation: Operation, result: vk::Result) -> FacadeError {
    log::error!(target: LOG_TARGET, "[FATAL] Could not {operation}: {result:?}");
    FacadeError::Native { operation, result }
}

/// Invoke a native creation entry point and classify its status
///
/// `native` performs exactly one native call. On success the created value
/// is returned unchanged; on any other status a single `[FATAL]` diagnostic
/// naming `object` is logged and [`FacadeError::Native`] is returned. There
/// is no retry.
pub fn create<T>(object: ObjectKind, native: impl FnOnce() -> VkResult<T>) -> FacadeResult<T> {
    match native() {
        Ok(value) => {
            log::trace!(target: LOG_TARGET, "Created {object}");
            Ok(value)
        }
        Err(result) => Err(fail(Operation::Create(object), result)),
    }
}

/// Classify the status of a native query that returns a single value
pub fn query<T>(kind: QueryKind, native: impl FnOnce() -> VkResult<T>) -> FacadeResult<T> {
    native().map_err(|result| fail(Operation::Query(kind), result))
}

/// Run a two-phase enumeration and materialize the whole result
///
/// `fetch(count, data)` is the native call: with a null `data` it writes the
/// element count, otherwise it fills up to `*count` elements and writes back
/// how many it wrote. `INCOMPLETE` on the count call is accepted; on the
/// data call it means the list grew in between and the sequence restarts,
/// at most [`MAX_ENUMERATION_RESTARTS`] times before failing with
/// `INCOMPLETE`.
pub fn enumerate<T: Clone + Default>(
    kind: QueryKind,
    policy: EmptyPolicy,
    mut fetch: impl FnMut(&mut u32, *mut T) -> vk::Result,
) -> FacadeResult<Vec<T>> {
    let operation = Operation::Query(kind);
    let mut restarts = 0_u32;

    let data = loop {
        let mut count = 0_u32;
        match fetch(&mut count, ptr::null_mut()) {
            vk::Result::SUCCESS | vk::Result::INCOMPLETE => {}
            result => return Err(fail(operation, result)),
        }

        if count == 0 {
            break Vec::new();
        }

        let mut data = vec![T::default(); count as usize];
        match fetch(&mut count, data.as_mut_ptr()) {
            vk::Result::SUCCESS => {
                data.truncate(count as usize);
                break data;
            }
            vk::Result::INCOMPLETE if restarts < MAX_ENUMERATION_RESTARTS => {
                restarts += 1;
                log::debug!(target: LOG_TARGET, "{kind} changed between calls, querying again ({restarts})");
            }
            result => return Err(fail(operation, result)),
        }
    };

    if data.is_empty() && policy == EmptyPolicy::RequireNonEmpty {
        log::error!(target: LOG_TARGET, "[FATAL] Could not {operation}: no elements reported");
        return Err(FacadeError::EmptyEnumeration(kind));
    }

    Ok(data)
}
