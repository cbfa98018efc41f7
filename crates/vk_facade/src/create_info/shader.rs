//! Shader module record

use ash::vk;
use std::borrow::Cow;

use crate::error::{FacadeError, FacadeResult};

/// Size of one SPIR-V word in bytes
pub const SPIRV_WORD_SIZE: usize = 4;

/// View compiled SPIR-V bytes as words
///
/// The bytes are passed through untouched. Aligned input is borrowed;
/// misaligned input (e.g. a sub-slice of a larger file) is copied into an
/// aligned buffer. Empty input and lengths that are not a whole number of
/// words are rejected, since the native API would reject them anyway.
pub fn spirv_words(bytes: &[u8]) -> FacadeResult<Cow<'_, [u32]>> {
    if bytes.is_empty() {
        return Err(FacadeError::InvalidInput("shader bytecode is empty".to_string()));
    }
    if bytes.len() % SPIRV_WORD_SIZE != 0 {
        return Err(FacadeError::InvalidInput(format!(
            "shader bytecode length {} is not a multiple of {SPIRV_WORD_SIZE}",
            bytes.len()
        )));
    }

    match bytemuck::try_cast_slice::<u8, u32>(bytes) {
        Ok(words) => Ok(Cow::Borrowed(words)),
        Err(_) => Ok(Cow::Owned(
            bytes
                .chunks_exact(SPIRV_WORD_SIZE)
                .map(|chunk| u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
                .collect(),
        )),
    }
}

/// Shader module over SPIR-V words
pub fn shader_module_create_info(code: &[u32]) -> vk::ShaderModuleCreateInfoBuilder<'_> {
    vk::ShaderModuleCreateInfo::builder().code(code)
}
