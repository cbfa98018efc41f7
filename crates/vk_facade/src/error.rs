//! Facade error types
//!
//! Every failure the facade can report is a native creation or query that did
//! not succeed. Nothing is retried and nothing is downgraded to a warning.

use ash::vk;
use std::fmt;
use thiserror::Error;

/// Native object types created through the facade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// `VkInstance`
    Instance,
    /// `VkDevice`
    Device,
    /// `VkBuffer`
    Buffer,
    /// `VkBufferView`
    BufferView,
    /// `VkImage`
    Image,
    /// `VkImageView`
    ImageView,
    /// `VkSampler`
    Sampler,
    /// `VkDeviceMemory`
    DeviceMemory,
    /// `VkShaderModule`
    ShaderModule,
    /// `VkPipelineLayout`
    PipelineLayout,
    /// `VkPipeline` (graphics)
    GraphicsPipeline,
    /// `VkRenderPass`
    RenderPass,
    /// `VkFramebuffer`
    Framebuffer,
    /// `VkDescriptorSetLayout`
    DescriptorSetLayout,
    /// `VkDescriptorPool`
    DescriptorPool,
    /// `VkDescriptorSet` (batch allocation)
    DescriptorSets,
    /// `VkCommandPool`
    CommandPool,
    /// `VkCommandBuffer`
    CommandBuffer,
    /// `VkFence`
    Fence,
    /// `VkSemaphore`
    Semaphore,
    /// `VkSwapchainKHR`
    Swapchain,
}

impl ObjectKind {
    /// Human-readable object name used in diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            Self::Instance => "instance",
            Self::Device => "logical device",
            Self::Buffer => "buffer",
            Self::BufferView => "buffer view",
            Self::Image => "image",
            Self::ImageView => "image view",
            Self::Sampler => "sampler",
            Self::DeviceMemory => "device memory",
            Self::ShaderModule => "shader module",
            Self::PipelineLayout => "pipeline layout",
            Self::GraphicsPipeline => "graphics pipeline",
            Self::RenderPass => "render pass",
            Self::Framebuffer => "framebuffer",
            Self::DescriptorSetLayout => "descriptor set layout",
            Self::DescriptorPool => "descriptor pool",
            Self::DescriptorSets => "descriptor sets",
            Self::CommandPool => "command pool",
            Self::CommandBuffer => "command buffer",
            Self::Fence => "fence",
            Self::Semaphore => "semaphore",
            Self::Swapchain => "swapchain",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability and enumeration queries issued by the facade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    /// `vkEnumerateInstanceVersion`
    InstanceVersion,
    /// `vkEnumeratePhysicalDevices`
    PhysicalDevices,
    /// `vkGetPhysicalDeviceQueueFamilyProperties`
    QueueFamilyProperties,
    /// `vkEnumerateDeviceExtensionProperties`
    DeviceExtensions,
    /// `vkGetPhysicalDeviceSurfaceSupportKHR`
    SurfaceSupport,
    /// `vkGetPhysicalDeviceSurfaceCapabilitiesKHR`
    SurfaceCapabilities,
    /// `vkGetPhysicalDeviceSurfaceFormatsKHR`
    SurfaceFormats,
    /// `vkGetPhysicalDeviceSurfacePresentModesKHR`
    PresentModes,
    /// `vkGetSwapchainImagesKHR`
    SwapchainImages,
}

impl QueryKind {
    /// Human-readable query name used in diagnostics
    pub const fn name(self) -> &'static str {
        match self {
            Self::InstanceVersion => "instance version",
            Self::PhysicalDevices => "physical devices",
            Self::QueueFamilyProperties => "queue family properties",
            Self::DeviceExtensions => "device extensions",
            Self::SurfaceSupport => "surface support",
            Self::SurfaceCapabilities => "surface capabilities",
            Self::SurfaceFormats => "surface formats",
            Self::PresentModes => "present modes",
            Self::SwapchainImages => "swapchain images",
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The native operation a failure belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Creation or allocation of a native object
    Create(ObjectKind),
    /// Capability query or enumeration
    Query(QueryKind),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create(kind) => write!(f, "create {kind}"),
            Self::Query(kind) => write!(f, "query {kind}"),
        }
    }
}

/// Facade error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FacadeError {
    /// A native entry point returned a non-success status code
    #[error("Could not {operation}: {result:?}")]
    Native {
        /// Which creation or query failed
        operation: Operation,
        /// Status code reported by the native API
        result: vk::Result,
    },

    /// An enumeration the platform guarantees to be non-empty came back empty
    #[error("Could not query {0}: no elements reported")]
    EmptyEnumeration(QueryKind),

    /// The Vulkan loader library could not be loaded
    #[error("Failed to load Vulkan: {0}")]
    Loading(String),

    /// Input the native API would reject regardless of device state
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl FacadeError {
    /// Operation that failed, when the failure came from a native call
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::Native { operation, .. } => Some(*operation),
            Self::EmptyEnumeration(query) => Some(Operation::Query(*query)),
            Self::Loading(_) | Self::InvalidInput(_) => None,
        }
    }

    /// Native status code carried by the failure, if any
    pub const fn status(&self) -> Option<vk::Result> {
        match self {
            Self::Native { result, .. } => Some(*result),
            _ => None,
        }
    }

    /// Every facade failure halts the calling code path
    pub const fn is_fatal(&self) -> bool {
        true
    }
}

/// Result type for facade operations
pub type FacadeResult<T> = Result<T, FacadeError>;
