//! Queue-family deduplication and queue selection
//!
//! Vulkan forbids naming the same queue family twice in one device creation
//! call, and concurrent-sharing swapchains forbid duplicate indices as well.
//! Graphics and present families frequently turn out to be the same index,
//! so every index list is collapsed here before it reaches a create-info.

use ash::vk;
use std::collections::BTreeSet;

/// Priority given to every queue the facade requests
pub const QUEUE_PRIORITY: f32 = 1.0;

/// Number of queues requested per distinct family
pub const QUEUES_PER_FAMILY: u32 = 1;

static QUEUE_PRIORITIES: [f32; QUEUES_PER_FAMILY as usize] = [QUEUE_PRIORITY];

/// Collapse requested queue-family indices to distinct values in ascending order
///
/// Caller submission order is discarded: `[2, 0, 2, 1]` becomes `[0, 1, 2]`.
pub fn unique_queue_families(indices: &[u32]) -> Vec<u32> {
    indices.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

/// One queue-creation record per distinct family, one queue each at full priority
pub fn queue_create_infos(indices: &[u32]) -> Vec<vk::DeviceQueueCreateInfo> {
    unique_queue_families(indices)
        .into_iter()
        .map(|family| crate::create_info::device_queue_create_info(family, &QUEUE_PRIORITIES).build())
        .collect()
}

/// Capabilities of one queue family as reported for a physical device/surface pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueFamilyInfo {
    /// Family index
    pub index: u32,
    /// Native capability flags
    pub flags: vk::QueueFlags,
    /// Number of queues the family exposes
    pub queue_count: u32,
    /// Whether the family can present to the surface it was queried against
    pub present: bool,
}

impl QueueFamilyInfo {
    /// Family supports graphics work
    pub fn graphics(&self) -> bool {
        self.flags.contains(vk::QueueFlags::GRAPHICS)
    }

    /// Family supports compute work
    pub fn compute(&self) -> bool {
        self.flags.contains(vk::QueueFlags::COMPUTE)
    }

    /// Family supports transfer work (graphics and compute imply transfer)
    pub fn transfer(&self) -> bool {
        self.flags
            .intersects(vk::QueueFlags::TRANSFER | vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE)
    }
}

/// Read-only snapshot of every queue family of a physical device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueFamilySnapshot {
    families: Vec<QueueFamilyInfo>,
}

impl QueueFamilySnapshot {
    /// Build a snapshot from native properties and per-family present support
    ///
    /// `present_support[i]` belongs to family `i`; missing entries count as
    /// "cannot present".
    pub fn new(properties: &[vk::QueueFamilyProperties], present_support: &[bool]) -> Self {
        let families = properties
            .iter()
            .enumerate()
            .map(|(index, family)| QueueFamilyInfo {
                index: index as u32,
                flags: family.queue_flags,
                queue_count: family.queue_count,
                present: present_support.get(index).copied().unwrap_or(false),
            })
            .collect();
        Self { families }
    }

    /// All families in index order
    pub fn families(&self) -> &[QueueFamilyInfo] {
        &self.families
    }

    /// Number of queue families
    pub fn len(&self) -> usize {
        self.families.len()
    }

    /// Whether the device reported no families at all
    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    /// First family with graphics support
    pub fn graphics_family(&self) -> Option<u32> {
        self.first(QueueFamilyInfo::graphics)
    }

    /// Present family, preferring one that also does graphics
    pub fn present_family(&self) -> Option<u32> {
        self.families
            .iter()
            .find(|family| family.present && family.graphics())
            .or_else(|| self.families.iter().find(|family| family.present))
            .map(|family| family.index)
    }

    /// Compute family, preferring one without graphics
    pub fn compute_family(&self) -> Option<u32> {
        self.families
            .iter()
            .find(|family| family.compute() && !family.graphics())
            .map(|family| family.index)
            .or_else(|| self.first(QueueFamilyInfo::compute))
    }

    /// Transfer family, preferring a dedicated one
    pub fn transfer_family(&self) -> Option<u32> {
        self.families
            .iter()
            .find(|family| {
                family.flags.contains(vk::QueueFlags::TRANSFER)
                    && !family.flags.intersects(vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE)
            })
            .map(|family| family.index)
            .or_else(|| self.first(QueueFamilyInfo::transfer))
    }

    fn first(&self, supports: impl Fn(&QueueFamilyInfo) -> bool) -> Option<u32> {
        self.families
            .iter()
            .find(|family| supports(family))
            .map(|family| family.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn family(flags: vk::QueueFlags) -> vk::QueueFamilyProperties {
        vk::QueueFamilyProperties {
            queue_flags: flags,
            queue_count: 1,
            ..Default::default()
        }
    }

    #[test]
    fn test_unique_families_sorted_and_distinct() {
        assert_eq!(unique_queue_families(&[2, 0, 2, 1]), vec![0, 1, 2]);
        assert_eq!(unique_queue_families(&[0, 0]), vec![0]);
        assert_eq!(unique_queue_families(&[]), Vec::<u32>::new());
    }

    #[test]
    fn test_unique_families_ignores_input_order() {
        let inputs: [&[u32]; 4] = [&[3, 1, 2], &[1, 2, 3], &[2, 3, 1, 1, 3], &[3, 3, 3, 2, 1]];
        for input in inputs {
            assert_eq!(unique_queue_families(input), vec![1, 2, 3], "{input:?}");
        }
    }

    #[test]
    fn test_queue_create_infos_one_per_family() {
        let infos = queue_create_infos(&[4, 0, 4]);

        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].queue_family_index, 0);
        assert_eq!(infos[1].queue_family_index, 4);
        for info in &infos {
            assert_eq!(info.queue_count, QUEUES_PER_FAMILY);
            // SAFETY: the priorities point at a static array of `queue_count` floats.
            let priorities =
                unsafe { std::slice::from_raw_parts(info.p_queue_priorities, info.queue_count as usize) };
            assert_eq!(priorities, &[QUEUE_PRIORITY]);
        }
    }

    #[test]
    fn test_snapshot_family_selection() {
        let properties = [
            family(vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE | vk::QueueFlags::TRANSFER),
            family(vk::QueueFlags::COMPUTE | vk::QueueFlags::TRANSFER),
            family(vk::QueueFlags::TRANSFER),
        ];
        let snapshot = QueueFamilySnapshot::new(&properties, &[true, false, false]);

        assert_eq!(snapshot.len(), 3);
        assert_eq!(snapshot.graphics_family(), Some(0));
        assert_eq!(snapshot.present_family(), Some(0));
        assert_eq!(snapshot.compute_family(), Some(1));
        assert_eq!(snapshot.transfer_family(), Some(2));
    }

    #[test]
    fn test_snapshot_falls_back_to_shared_families() {
        let properties = [family(vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE)];
        let snapshot = QueueFamilySnapshot::new(&properties, &[]);

        assert_eq!(snapshot.compute_family(), Some(0));
        assert_eq!(snapshot.transfer_family(), Some(0));
        assert_eq!(snapshot.present_family(), None);
    }

    #[test]
    fn test_present_prefers_graphics_family() {
        let properties = [
            family(vk::QueueFlags::COMPUTE),
            family(vk::QueueFlags::GRAPHICS),
        ];
        let snapshot = QueueFamilySnapshot::new(&properties, &[true, true]);
        assert_eq!(snapshot.present_family(), Some(1));
    }
}
