//! Shader modules, pipeline layouts, render passes, framebuffers and graphics pipelines

use ash::vk;

use crate::create_info::{self, Chainable, FixedFunctionState, SubpassAttachments};
use crate::creation::{self, CreateOptions, LOG_TARGET};
use crate::error::{FacadeResult, ObjectKind};
use crate::handle::{raw_handles, Handle};

/// Create a shader module from compiled SPIR-V bytes
///
/// Bytes that are not a whole number of SPIR-V words are rejected before
/// any native call is made.
pub fn create_shader_module(
    device: &ash::Device,
    bytes: &[u8],
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::ShaderModule>> {
    let words = create_info::spirv_words(bytes).map_err(|error| {
        log::error!(target: LOG_TARGET, "[FATAL] Could not create {}: {error}", ObjectKind::ShaderModule);
        error
    })?;
    let info = create_info::shader_module_create_info(&words).with_next(options.next);
    creation::create(ObjectKind::ShaderModule, || unsafe {
        device.create_shader_module(&info, options.allocator)
    })
    .map(Handle::new)
}

/// Create a pipeline layout over set layouts and push constant ranges
pub fn create_pipeline_layout(
    device: &ash::Device,
    set_layouts: &[Handle<vk::DescriptorSetLayout>],
    push_constant_ranges: &[vk::PushConstantRange],
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::PipelineLayout>> {
    let set_layouts = raw_handles(set_layouts);
    let info = create_info::pipeline_layout_create_info(&set_layouts, push_constant_ranges).with_next(options.next);
    creation::create(ObjectKind::PipelineLayout, || unsafe {
        device.create_pipeline_layout(&info, options.allocator)
    })
    .map(Handle::new)
}

/// Create a render pass from its parts
pub fn create_render_pass(
    device: &ash::Device,
    attachments: &[vk::AttachmentDescription],
    subpasses: &[vk::SubpassDescription],
    dependencies: &[vk::SubpassDependency],
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::RenderPass>> {
    let info = create_info::render_pass_create_info(attachments, subpasses, dependencies).with_next(options.next);
    creation::create(ObjectKind::RenderPass, || unsafe {
        device.create_render_pass(&info, options.allocator)
    })
    .map(Handle::new)
}

/// Create a render pass with one presentable color attachment
///
/// A single subpass writes attachment 0 and waits on the previous frame's
/// color output.
pub fn create_color_render_pass(
    device: &ash::Device,
    format: vk::Format,
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::RenderPass>> {
    let attachments = [create_info::attachment_description(format)];
    let color = [create_info::attachment_reference(
        0,
        vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
    )];
    let subpass = create_info::subpass_description(&SubpassAttachments {
        color: &color,
        ..Default::default()
    });
    let dependencies = [create_info::color_output_dependency()];

    create_render_pass(device, &attachments, &[*subpass], &dependencies, options)
}

/// Create a single-layer framebuffer over the given views
pub fn create_framebuffer(
    device: &ash::Device,
    render_pass: Handle<vk::RenderPass>,
    attachments: &[Handle<vk::ImageView>],
    extent: vk::Extent2D,
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::Framebuffer>> {
    let attachments = raw_handles(attachments);
    let info = create_info::framebuffer_create_info(render_pass.raw(), &attachments, extent).with_next(options.next);
    creation::create(ObjectKind::Framebuffer, || unsafe {
        device.create_framebuffer(&info, options.allocator)
    })
    .map(Handle::new)
}

/// Create one graphics pipeline for subpass 0 of `render_pass`
///
/// No pipeline cache is used.
pub fn create_graphics_pipeline(
    device: &ash::Device,
    fixed: &FixedFunctionState<'_>,
    stages: &[vk::PipelineShaderStageCreateInfo],
    layout: Handle<vk::PipelineLayout>,
    render_pass: Handle<vk::RenderPass>,
    options: CreateOptions<'_>,
) -> FacadeResult<Handle<vk::Pipeline>> {
    let info = create_info::graphics_pipeline_create_info(fixed, stages, layout.raw(), render_pass.raw())
        .with_next(options.next);
    creation::create(ObjectKind::GraphicsPipeline, || {
        let pipelines = unsafe {
            device.create_graphics_pipelines(vk::PipelineCache::null(), &[*info], options.allocator)
        }
        .map_err(|(_, result)| result)?;
        pipelines.into_iter().next().ok_or(vk::Result::ERROR_UNKNOWN)
    })
    .map(Handle::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creation::tests::{captured_errors, start_capture};
    use crate::factory::tests::{entry, fake_device};
    use crate::FacadeError;
    use ash::vk::Handle as _;

    unsafe extern "system" fn create_render_pass_checked(
        _device: vk::Device,
        info: *const vk::RenderPassCreateInfo,
        _allocator: *const vk::AllocationCallbacks,
        out: *mut vk::RenderPass,
    ) -> vk::Result {
        let info = &*info;
        let subpass = &*info.p_subpasses;
        let attachment = &*info.p_attachments;
        if info.attachment_count != 1
            || info.subpass_count != 1
            || info.dependency_count != 1
            || subpass.color_attachment_count != 1
            || attachment.final_layout != vk::ImageLayout::PRESENT_SRC_KHR
        {
            return vk::Result::ERROR_INITIALIZATION_FAILED;
        }
        *out = vk::RenderPass::from_raw(attachment.format.as_raw() as u64);
        vk::Result::SUCCESS
    }

    unsafe extern "system" fn create_pipelines_failing(
        _device: vk::Device,
        _cache: vk::PipelineCache,
        count: u32,
        _infos: *const vk::GraphicsPipelineCreateInfo,
        _allocator: *const vk::AllocationCallbacks,
        out: *mut vk::Pipeline,
    ) -> vk::Result {
        for index in 0..count as usize {
            *out.add(index) = vk::Pipeline::null();
        }
        vk::Result::ERROR_OUT_OF_HOST_MEMORY
    }

    unsafe extern "system" fn create_shader_module_unreachable(
        _device: vk::Device,
        _info: *const vk::ShaderModuleCreateInfo,
        _allocator: *const vk::AllocationCallbacks,
        _out: *mut vk::ShaderModule,
    ) -> vk::Result {
        panic!("shader module creation should not reach the driver");
    }

    #[test]
    fn test_color_render_pass_has_one_presentable_attachment() {
        start_capture();
        let device = fake_device(vec![entry!("vkCreateRenderPass", create_render_pass_checked)]);

        let render_pass = create_color_render_pass(&device, vk::Format::B8G8R8A8_SRGB, CreateOptions::new()).unwrap();
        assert_eq!(render_pass.as_raw(), vk::Format::B8G8R8A8_SRGB.as_raw() as u64);
        assert!(captured_errors().is_empty());
    }

    #[test]
    fn test_pipeline_failure_reports_driver_status() {
        start_capture();
        let device = fake_device(vec![entry!("vkCreateGraphicsPipelines", create_pipelines_failing)]);

        let error = create_graphics_pipeline(
            &device,
            &FixedFunctionState::default(),
            &[],
            Handle::new(vk::PipelineLayout::from_raw(1)),
            Handle::new(vk::RenderPass::from_raw(2)),
            CreateOptions::new(),
        )
        .unwrap_err();

        assert_eq!(error.status(), Some(vk::Result::ERROR_OUT_OF_HOST_MEMORY));
        let errors = captured_errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("[FATAL]"));
        assert!(errors[0].contains("graphics pipeline"));
    }

    #[test]
    fn test_bad_bytecode_never_reaches_driver() {
        start_capture();
        let device = fake_device(vec![entry!("vkCreateShaderModule", create_shader_module_unreachable)]);

        let error = create_shader_module(&device, &[0x03, 0x02, 0x23], CreateOptions::new()).unwrap_err();
        assert!(matches!(error, FacadeError::InvalidInput(_)));
        assert_eq!(captured_errors().len(), 1);
    }
}
