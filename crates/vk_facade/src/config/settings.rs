//! Facade settings
//!
//! Every group has serde defaults, so a settings file only needs the
//! fields it changes.

use ash::vk;
use serde::{Deserialize, Serialize};
use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::{Config, ConfigError};
use crate::error::{FacadeError, FacadeResult};

/// Surface formats accepted by name
const FORMAT_NAMES: &[(&str, vk::Format)] = &[
    ("R8G8B8A8_UNORM", vk::Format::R8G8B8A8_UNORM),
    ("R8G8B8A8_SRGB", vk::Format::R8G8B8A8_SRGB),
    ("B8G8R8A8_UNORM", vk::Format::B8G8R8A8_UNORM),
    ("B8G8R8A8_SRGB", vk::Format::B8G8R8A8_SRGB),
    ("A2B10G10R10_UNORM_PACK32", vk::Format::A2B10G10R10_UNORM_PACK32),
    ("A2R10G10B10_UNORM_PACK32", vk::Format::A2R10G10B10_UNORM_PACK32),
    ("R16G16B16A16_SFLOAT", vk::Format::R16G16B16A16_SFLOAT),
];

/// Colour spaces accepted by name
const COLOR_SPACE_NAMES: &[(&str, vk::ColorSpaceKHR)] = &[
    ("SRGB_NONLINEAR", vk::ColorSpaceKHR::SRGB_NONLINEAR),
    ("EXTENDED_SRGB_LINEAR_EXT", vk::ColorSpaceKHR::EXTENDED_SRGB_LINEAR_EXT),
    ("DISPLAY_P3_NONLINEAR_EXT", vk::ColorSpaceKHR::DISPLAY_P3_NONLINEAR_EXT),
    ("HDR10_ST2084_EXT", vk::ColorSpaceKHR::HDR10_ST2084_EXT),
];

fn lookup<T: Copy>(table: &[(&str, T)], name: &str) -> Option<T> {
    table
        .iter()
        .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
        .map(|(_, value)| *value)
}

/// Convert names to NUL-terminated strings for the native API
pub fn to_c_strings(names: &[String]) -> FacadeResult<Vec<CString>> {
    names
        .iter()
        .map(|name| {
            CString::new(name.as_str())
                .map_err(|_| FacadeError::InvalidInput(format!("name `{}` contains a NUL byte", name.escape_debug())))
        })
        .collect()
}

fn validate_names(field: &'static str, names: &[String]) -> Result<(), ConfigError> {
    for (index, name) in names.iter().enumerate() {
        if name.is_empty() || name.contains('\0') {
            return Err(ConfigError::Invalid {
                field,
                reason: format!("entry {index} ({name:?}) is empty or contains a NUL byte"),
            });
        }
        if names[..index].contains(name) {
            return Err(ConfigError::Invalid {
                field,
                reason: format!("`{name}` is listed more than once"),
            });
        }
    }
    Ok(())
}

/// Instance-level settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstanceSettings {
    /// Application name reported to the driver
    pub application_name: String,
    /// Application version as (major, minor, patch)
    pub application_version: (u32, u32, u32),
    /// Instance layers to enable
    pub validation_layers: Vec<String>,
    /// Instance extensions to enable in addition to the window system's
    pub extensions: Vec<String>,
}

impl Default for InstanceSettings {
    fn default() -> Self {
        Self {
            application_name: "vk_facade".to_string(),
            application_version: (0, 1, 0),
            validation_layers: Vec::new(),
            extensions: Vec::new(),
        }
    }
}

impl InstanceSettings {
    /// Application version packed the way the native API expects
    pub fn packed_application_version(&self) -> u32 {
        let (major, minor, patch) = self.application_version;
        vk::make_api_version(0, major, minor, patch)
    }

    /// Application name as a C string
    pub fn application_name_c(&self) -> FacadeResult<CString> {
        CString::new(self.application_name.as_str())
            .map_err(|_| FacadeError::InvalidInput("application name contains a NUL byte".to_string()))
    }

    /// Check names and version ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_name.is_empty() || self.application_name.contains('\0') {
            return Err(ConfigError::Invalid {
                field: "instance.application_name",
                reason: "must be non-empty and free of NUL bytes".to_string(),
            });
        }
        let (major, minor, patch) = self.application_version;
        if major > 0x7F || minor > 0x3FF || patch > 0xFFF {
            return Err(ConfigError::Invalid {
                field: "instance.application_version",
                reason: format!("{major}.{minor}.{patch} does not fit the packed version layout"),
            });
        }
        validate_names("instance.validation_layers", &self.validation_layers)?;
        validate_names("instance.extensions", &self.extensions)
    }
}

/// Physical and logical device settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Device extensions to enable
    pub extensions: Vec<String>,
    /// Rank discrete GPUs first instead of taking the first device reported
    pub prefer_discrete_gpu: bool,
}

impl Default for DeviceSettings {
    fn default() -> Self {
        Self {
            extensions: vec!["VK_KHR_swapchain".to_string()],
            prefer_discrete_gpu: true,
        }
    }
}

impl DeviceSettings {
    /// Check extension names
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_names("device.extensions", &self.extensions)
    }
}

/// Swapchain preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwapchainSettings {
    /// Preferred surface format, e.g. `R8G8B8A8_UNORM`
    pub preferred_format: String,
    /// Preferred colour space, e.g. `SRGB_NONLINEAR`
    pub preferred_color_space: String,
    /// Width used when the surface leaves the extent to the application
    pub fallback_width: u32,
    /// Height used when the surface leaves the extent to the application
    pub fallback_height: u32,
}

impl Default for SwapchainSettings {
    fn default() -> Self {
        Self {
            preferred_format: "R8G8B8A8_UNORM".to_string(),
            preferred_color_space: "SRGB_NONLINEAR".to_string(),
            fallback_width: 800,
            fallback_height: 600,
        }
    }
}

impl SwapchainSettings {
    /// Preferred format and colour space as native values
    pub fn preferred_surface_format(&self) -> Result<vk::SurfaceFormatKHR, ConfigError> {
        let format = lookup(FORMAT_NAMES, &self.preferred_format).ok_or_else(|| ConfigError::Invalid {
            field: "swapchain.preferred_format",
            reason: format!("unknown surface format `{}`", self.preferred_format),
        })?;
        let color_space = lookup(COLOR_SPACE_NAMES, &self.preferred_color_space).ok_or_else(|| {
            ConfigError::Invalid {
                field: "swapchain.preferred_color_space",
                reason: format!("unknown colour space `{}`", self.preferred_color_space),
            }
        })?;
        Ok(vk::SurfaceFormatKHR { format, color_space })
    }

    /// Extent used when the surface does not dictate one
    pub const fn fallback_extent(&self) -> vk::Extent2D {
        vk::Extent2D {
            width: self.fallback_width,
            height: self.fallback_height,
        }
    }

    /// Check format names and the fallback extent
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.preferred_surface_format()?;
        if self.fallback_width == 0 || self.fallback_height == 0 {
            return Err(ConfigError::Invalid {
                field: "swapchain.fallback_width",
                reason: format!(
                    "fallback extent {}x{} has a zero dimension",
                    self.fallback_width, self.fallback_height
                ),
            });
        }
        Ok(())
    }
}

/// Compiled SPIR-V used to build a graphics pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderSettings {
    /// Vertex stage bytecode
    pub vertex: Option<PathBuf>,
    /// Fragment stage bytecode
    pub fragment: Option<PathBuf>,
}

impl ShaderSettings {
    /// Vertex and fragment paths, when both are configured
    pub fn stages(&self) -> Option<(&Path, &Path)> {
        Some((self.vertex.as_deref()?, self.fragment.as_deref()?))
    }

    /// A pipeline needs both stages or neither
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vertex.is_some() != self.fragment.is_some() {
            return Err(ConfigError::Invalid {
                field: "shaders",
                reason: "vertex and fragment shaders must be configured together".to_string(),
            });
        }
        Ok(())
    }
}

/// Everything the facade needs to bring up a device and a swapchain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacadeConfig {
    /// Default log filter (`error`, `warn`, `info`, `debug`, `trace` or `off`)
    pub log_level: String,
    /// Instance settings
    pub instance: InstanceSettings,
    /// Device settings
    pub device: DeviceSettings,
    /// Swapchain settings
    pub swapchain: SwapchainSettings,
    /// Shader settings
    pub shaders: ShaderSettings,
}

impl Default for FacadeConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            instance: InstanceSettings::default(),
            device: DeviceSettings::default(),
            swapchain: SwapchainSettings::default(),
            shaders: ShaderSettings::default(),
        }
    }
}

impl FacadeConfig {
    /// Parsed log level
    pub fn level_filter(&self) -> Result<log::LevelFilter, ConfigError> {
        log::LevelFilter::from_str(&self.log_level).map_err(|_| ConfigError::Invalid {
            field: "log_level",
            reason: format!("unknown level `{}`", self.log_level),
        })
    }

    /// Validate every group
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.instance.validate()?;
        self.device.validate()?;
        self.swapchain.validate()?;
        self.shaders.validate()?;
        self.level_filter()?;
        Ok(())
    }
}

impl Config for FacadeConfig {}
