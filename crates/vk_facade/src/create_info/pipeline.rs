//! Graphics pipeline state records
//!
//! Every fixed-function stage has a builder returning the documented
//! defaults. [`FixedFunctionState`] bundles one of each so a complete
//! pipeline only needs vertex input, shader stages, a layout and a render
//! pass from the caller.

use ash::vk;
use std::ffi::CStr;

/// Entry point name used by every shader stage
pub const SHADER_ENTRY_POINT: &CStr = unsafe { CStr::from_bytes_with_nul_unchecked(b"main\0") };

/// Default primitive topology
pub const INPUT_TOPOLOGY: vk::PrimitiveTopology = vk::PrimitiveTopology::TRIANGLE_LIST;
/// Primitive restart is off by default
pub const PRIMITIVE_RESTART: bool = false;

/// Depth clamping is off by default
pub const DEPTH_CLAMP: bool = false;
/// Rasterizer discard is off by default
pub const RASTERIZER_DISCARD: bool = false;
/// Default polygon fill mode
pub const POLYGON_MODE: vk::PolygonMode = vk::PolygonMode::FILL;
/// Default face culling
pub const CULL_MODE: vk::CullModeFlags = vk::CullModeFlags::BACK;
/// Default front-face winding
pub const FRONT_FACE: vk::FrontFace = vk::FrontFace::COUNTER_CLOCKWISE;
/// Depth bias is off by default
pub const DEPTH_BIAS: bool = false;
/// Default rasterized line width
pub const LINE_WIDTH: f32 = 1.0;

/// Default rasterization sample count
pub const SAMPLE_COUNT: vk::SampleCountFlags = vk::SampleCountFlags::TYPE_1;
/// Per-sample shading is off by default
pub const SAMPLE_SHADING: bool = false;

/// Color blend attachment used when the caller supplies none
pub const COLOR_BLEND_ATTACHMENT: vk::PipelineColorBlendAttachmentState = vk::PipelineColorBlendAttachmentState {
    blend_enable: vk::FALSE,
    src_color_blend_factor: vk::BlendFactor::ZERO,
    dst_color_blend_factor: vk::BlendFactor::ZERO,
    color_blend_op: vk::BlendOp::ADD,
    src_alpha_blend_factor: vk::BlendFactor::ZERO,
    dst_alpha_blend_factor: vk::BlendFactor::ZERO,
    alpha_blend_op: vk::BlendOp::ADD,
    color_write_mask: vk::ColorComponentFlags::RGBA,
};
/// Logic ops are off by default
pub const LOGIC_OP_ENABLE: bool = false;
/// Logic op recorded when logic ops are off
pub const LOGIC_OP: vk::LogicOp = vk::LogicOp::COPY;
/// Default blend constants
pub const BLEND_CONSTANTS: [f32; 4] = [0.0; 4];

/// Viewports declared by the dynamic viewport state
pub const DYNAMIC_VIEWPORT_COUNT: u32 = 1;
/// Scissors declared by the dynamic viewport state
pub const DYNAMIC_SCISSOR_COUNT: u32 = 1;
/// States supplied at record time by default
pub const DYNAMIC_STATES: [vk::DynamicState; 2] = [vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR];

static DEFAULT_BLEND_ATTACHMENTS: [vk::PipelineColorBlendAttachmentState; 1] = [COLOR_BLEND_ATTACHMENT];
static DEFAULT_DYNAMIC_STATES: [vk::DynamicState; 2] = DYNAMIC_STATES;

/// Binding description for one vertex buffer
pub fn vertex_binding_description(
    binding: u32,
    stride: u32,
    input_rate: vk::VertexInputRate,
) -> vk::VertexInputBindingDescription {
    vk::VertexInputBindingDescription {
        binding,
        stride,
        input_rate,
    }
}

/// Attribute description for one shader input location
pub fn vertex_attribute_description(
    location: u32,
    binding: u32,
    format: vk::Format,
    offset: u32,
) -> vk::VertexInputAttributeDescription {
    vk::VertexInputAttributeDescription {
        location,
        binding,
        format,
        offset,
    }
}

/// Vertex input state over the given bindings and attributes
pub fn vertex_input_state<'a>(
    bindings: &'a [vk::VertexInputBindingDescription],
    attributes: &'a [vk::VertexInputAttributeDescription],
) -> vk::PipelineVertexInputStateCreateInfoBuilder<'a> {
    vk::PipelineVertexInputStateCreateInfo::builder()
        .vertex_binding_descriptions(bindings)
        .vertex_attribute_descriptions(attributes)
}

/// Input assembly: triangle list, no primitive restart
pub fn input_assembly_state<'a>() -> vk::PipelineInputAssemblyStateCreateInfoBuilder<'a> {
    vk::PipelineInputAssemblyStateCreateInfo::builder()
        .topology(INPUT_TOPOLOGY)
        .primitive_restart_enable(PRIMITIVE_RESTART)
}

/// Shader stage running `module` from its `main` entry point
pub fn shader_stage<'a>(
    stage: vk::ShaderStageFlags,
    module: vk::ShaderModule,
) -> vk::PipelineShaderStageCreateInfoBuilder<'a> {
    vk::PipelineShaderStageCreateInfo::builder()
        .stage(stage)
        .module(module)
        .name(SHADER_ENTRY_POINT)
}

/// Viewport covering `extent` with the full depth range
pub fn viewport(extent: vk::Extent2D) -> vk::Viewport {
    vk::Viewport {
        x: 0.0,
        y: 0.0,
        width: extent.width as f32,
        height: extent.height as f32,
        min_depth: 0.0,
        max_depth: 1.0,
    }
}

/// Rectangle at the origin covering `extent`
pub fn rect(extent: vk::Extent2D) -> vk::Rect2D {
    vk::Rect2D {
        offset: vk::Offset2D { x: 0, y: 0 },
        extent,
    }
}

/// Viewport state with viewports and scissors fixed at pipeline creation
pub fn static_viewport_state<'a>(
    viewports: &'a [vk::Viewport],
    scissors: &'a [vk::Rect2D],
) -> vk::PipelineViewportStateCreateInfoBuilder<'a> {
    vk::PipelineViewportStateCreateInfo::builder()
        .viewports(viewports)
        .scissors(scissors)
}

/// Viewport state declaring one viewport and one scissor, both set dynamically
pub fn dynamic_viewport_state<'a>() -> vk::PipelineViewportStateCreateInfoBuilder<'a> {
    vk::PipelineViewportStateCreateInfo::builder()
        .viewport_count(DYNAMIC_VIEWPORT_COUNT)
        .scissor_count(DYNAMIC_SCISSOR_COUNT)
}

/// Dynamic state record for the given states
pub fn dynamic_state(states: &[vk::DynamicState]) -> vk::PipelineDynamicStateCreateInfoBuilder<'_> {
    vk::PipelineDynamicStateCreateInfo::builder().dynamic_states(states)
}

/// Dynamic state record for viewport and scissor
pub fn default_dynamic_state<'a>() -> vk::PipelineDynamicStateCreateInfoBuilder<'a> {
    dynamic_state(&DEFAULT_DYNAMIC_STATES)
}

/// Rasterization with solid fill, back-face culling and counter-clockwise front faces
pub fn rasterization_state<'a>() -> vk::PipelineRasterizationStateCreateInfoBuilder<'a> {
    vk::PipelineRasterizationStateCreateInfo::builder()
        .depth_clamp_enable(DEPTH_CLAMP)
        .rasterizer_discard_enable(RASTERIZER_DISCARD)
        .polygon_mode(POLYGON_MODE)
        .cull_mode(CULL_MODE)
        .front_face(FRONT_FACE)
        .depth_bias_enable(DEPTH_BIAS)
        .depth_bias_constant_factor(0.0)
        .depth_bias_clamp(0.0)
        .depth_bias_slope_factor(0.0)
        .line_width(LINE_WIDTH)
}

/// Multisampling with a single sample
pub fn multisample_state<'a>() -> vk::PipelineMultisampleStateCreateInfoBuilder<'a> {
    vk::PipelineMultisampleStateCreateInfo::builder()
        .rasterization_samples(SAMPLE_COUNT)
        .sample_shading_enable(SAMPLE_SHADING)
        .min_sample_shading(0.0)
        .alpha_to_coverage_enable(false)
        .alpha_to_one_enable(false)
}

/// Blend attachment with blending disabled and every channel writable
pub const fn color_blend_attachment() -> vk::PipelineColorBlendAttachmentState {
    COLOR_BLEND_ATTACHMENT
}

/// Color blend state over caller-supplied attachments
pub fn color_blend_state(
    attachments: &[vk::PipelineColorBlendAttachmentState],
) -> vk::PipelineColorBlendStateCreateInfoBuilder<'_> {
    vk::PipelineColorBlendStateCreateInfo::builder()
        .logic_op_enable(LOGIC_OP_ENABLE)
        .logic_op(LOGIC_OP)
        .attachments(attachments)
        .blend_constants(BLEND_CONSTANTS)
}

/// Color blend state with the single default attachment
pub fn default_color_blend_state<'a>() -> vk::PipelineColorBlendStateCreateInfoBuilder<'a> {
    color_blend_state(&DEFAULT_BLEND_ATTACHMENTS)
}

/// Push constant range visible to `stage_flags`
pub fn push_constant_range(stage_flags: vk::ShaderStageFlags, offset: u32, size: u32) -> vk::PushConstantRange {
    vk::PushConstantRange {
        stage_flags,
        offset,
        size,
    }
}

/// Pipeline layout over descriptor set layouts and push constant ranges
pub fn pipeline_layout_create_info<'a>(
    set_layouts: &'a [vk::DescriptorSetLayout],
    push_constant_ranges: &'a [vk::PushConstantRange],
) -> vk::PipelineLayoutCreateInfoBuilder<'a> {
    vk::PipelineLayoutCreateInfo::builder()
        .set_layouts(set_layouts)
        .push_constant_ranges(push_constant_ranges)
}

/// Every fixed-function stage of a graphics pipeline
pub struct FixedFunctionState<'a> {
    /// Vertex buffer bindings and attributes
    pub vertex_input: vk::PipelineVertexInputStateCreateInfoBuilder<'a>,
    /// Primitive assembly
    pub input_assembly: vk::PipelineInputAssemblyStateCreateInfoBuilder<'a>,
    /// Viewports and scissors
    pub viewport: vk::PipelineViewportStateCreateInfoBuilder<'a>,
    /// Rasterizer settings
    pub rasterization: vk::PipelineRasterizationStateCreateInfoBuilder<'a>,
    /// Multisampling
    pub multisample: vk::PipelineMultisampleStateCreateInfoBuilder<'a>,
    /// Color blending
    pub color_blend: vk::PipelineColorBlendStateCreateInfoBuilder<'a>,
    /// States supplied at record time
    pub dynamic: vk::PipelineDynamicStateCreateInfoBuilder<'a>,
}

impl<'a> FixedFunctionState<'a> {
    /// Defaults for every stage, with the given vertex input
    pub fn new(vertex_input: vk::PipelineVertexInputStateCreateInfoBuilder<'a>) -> Self {
        Self {
            vertex_input,
            input_assembly: input_assembly_state(),
            viewport: dynamic_viewport_state(),
            rasterization: rasterization_state(),
            multisample: multisample_state(),
            color_blend: default_color_blend_state(),
            dynamic: default_dynamic_state(),
        }
    }
}

impl Default for FixedFunctionState<'_> {
    fn default() -> Self {
        Self::new(vk::PipelineVertexInputStateCreateInfo::builder())
    }
}

/// Graphics pipeline for subpass 0 of `render_pass`, no base pipeline
///
/// Tessellation and depth/stencil state are left unset.
pub fn graphics_pipeline_create_info<'a>(
    fixed: &'a FixedFunctionState<'_>,
    stages: &'a [vk::PipelineShaderStageCreateInfo],
    layout: vk::PipelineLayout,
    render_pass: vk::RenderPass,
) -> vk::GraphicsPipelineCreateInfoBuilder<'a> {
    vk::GraphicsPipelineCreateInfo::builder()
        .stages(stages)
        .vertex_input_state(&fixed.vertex_input)
        .input_assembly_state(&fixed.input_assembly)
        .viewport_state(&fixed.viewport)
        .rasterization_state(&fixed.rasterization)
        .multisample_state(&fixed.multisample)
        .color_blend_state(&fixed.color_blend)
        .dynamic_state(&fixed.dynamic)
        .layout(layout)
        .render_pass(render_pass)
        .subpass(0)
        .base_pipeline_handle(vk::Pipeline::null())
        .base_pipeline_index(-1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ash::vk::Handle;

    #[test]
    fn test_rasterization_defaults() {
        let state = rasterization_state();

        assert_eq!(state.depth_clamp_enable, vk::FALSE);
        assert_eq!(state.rasterizer_discard_enable, vk::FALSE);
        assert_eq!(state.polygon_mode, vk::PolygonMode::FILL);
        assert_eq!(state.cull_mode, vk::CullModeFlags::BACK);
        assert_eq!(state.front_face, vk::FrontFace::COUNTER_CLOCKWISE);
        assert_eq!(state.depth_bias_enable, vk::FALSE);
        assert_relative_eq!(state.line_width, LINE_WIDTH);
        assert_relative_eq!(state.line_width, 1.0);
    }

    #[test]
    fn test_color_blend_defaults() {
        let state = default_color_blend_state();
        assert_eq!(state.attachment_count, 1);
        assert_eq!(state.logic_op_enable, vk::FALSE);
        assert_eq!(state.logic_op, vk::LogicOp::COPY);

        // SAFETY: the default state points at a static one-element array.
        let attachment = unsafe { &*state.p_attachments };
        assert_eq!(attachment.blend_enable, vk::FALSE);
        assert_eq!(attachment.color_write_mask, vk::ColorComponentFlags::RGBA);
    }

    #[test]
    fn test_dynamic_viewport_declares_one_of_each() {
        let viewport = dynamic_viewport_state();
        assert_eq!(viewport.viewport_count, 1);
        assert_eq!(viewport.scissor_count, 1);
        assert!(viewport.p_viewports.is_null());
        assert!(viewport.p_scissors.is_null());

        let dynamic = default_dynamic_state();
        assert_eq!(dynamic.dynamic_state_count, 2);
        // SAFETY: points at the static default list.
        let states = unsafe { std::slice::from_raw_parts(dynamic.p_dynamic_states, 2) };
        assert_eq!(states, &[vk::DynamicState::VIEWPORT, vk::DynamicState::SCISSOR]);
    }

    #[test]
    fn test_static_viewport_counts_follow_slices() {
        let extent = vk::Extent2D {
            width: 800,
            height: 600,
        };
        let viewports = [viewport(extent)];
        let scissors = [rect(extent), rect(extent)];
        let state = static_viewport_state(&viewports, &scissors);

        assert_eq!(state.viewport_count, 1);
        assert_eq!(state.scissor_count, 2);
        assert_relative_eq!(viewports[0].width, 800.0);
        assert_relative_eq!(viewports[0].max_depth, 1.0);
        assert_eq!(scissors[0].extent, extent);
    }

    #[test]
    fn test_input_assembly_and_multisample_defaults() {
        let assembly = input_assembly_state();
        assert_eq!(assembly.topology, vk::PrimitiveTopology::TRIANGLE_LIST);
        assert_eq!(assembly.primitive_restart_enable, vk::FALSE);

        let multisample = multisample_state();
        assert_eq!(multisample.rasterization_samples, vk::SampleCountFlags::TYPE_1);
        assert_eq!(multisample.sample_shading_enable, vk::FALSE);
    }

    #[test]
    fn test_shader_stage_uses_main() {
        let module = vk::ShaderModule::from_raw(0x42);
        let stage = shader_stage(vk::ShaderStageFlags::FRAGMENT, module);

        assert_eq!(stage.stage, vk::ShaderStageFlags::FRAGMENT);
        assert_eq!(stage.module, module);
        // SAFETY: `p_name` points at the static entry point string.
        assert_eq!(unsafe { CStr::from_ptr(stage.p_name) }, SHADER_ENTRY_POINT);
    }

    #[test]
    fn test_identical_inputs_give_identical_records() {
        let bindings = [vertex_binding_description(0, 32, vk::VertexInputRate::VERTEX)];
        let attributes = [
            vertex_attribute_description(0, 0, vk::Format::R32G32B32_SFLOAT, 0),
            vertex_attribute_description(1, 0, vk::Format::R32G32_SFLOAT, 12),
        ];

        let first = format!("{:?}", *vertex_input_state(&bindings, &attributes));
        let second = format!("{:?}", *vertex_input_state(&bindings, &attributes));
        assert_eq!(first, second);

        let first = format!("{:?}", *rasterization_state());
        let second = format!("{:?}", *rasterization_state());
        assert_eq!(first, second);
    }

    #[test]
    fn test_graphics_pipeline_wires_every_state() {
        let fixed = FixedFunctionState::default();
        let module = vk::ShaderModule::from_raw(7);
        let stages = [
            shader_stage(vk::ShaderStageFlags::VERTEX, module).build(),
            shader_stage(vk::ShaderStageFlags::FRAGMENT, module).build(),
        ];
        let layout = vk::PipelineLayout::from_raw(1);
        let render_pass = vk::RenderPass::from_raw(2);

        let info = graphics_pipeline_create_info(&fixed, &stages, layout, render_pass);

        assert_eq!(info.stage_count, 2);
        assert_eq!(info.layout, layout);
        assert_eq!(info.render_pass, render_pass);
        assert_eq!(info.subpass, 0);
        assert_eq!(info.base_pipeline_index, -1);
        assert!(info.p_tessellation_state.is_null());
        assert!(info.p_depth_stencil_state.is_null());
        assert!(!info.p_dynamic_state.is_null());
        // SAFETY: points into `fixed`, alive for the whole test.
        let rasterization = unsafe { &*info.p_rasterization_state };
        assert_eq!(rasterization.cull_mode, CULL_MODE);
    }

    #[test]
    fn test_push_constant_range_fields() {
        let range = push_constant_range(vk::ShaderStageFlags::VERTEX, 0, 64);
        assert_eq!(range.size, 64);
        let layouts = [vk::DescriptorSetLayout::from_raw(3)];
        let ranges = [range];
        let info = pipeline_layout_create_info(&layouts, &ranges);
        assert_eq!(info.set_layout_count, 1);
        assert_eq!(info.push_constant_range_count, 1);
    }
}
