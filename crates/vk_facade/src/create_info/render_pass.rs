//! Render pass, subpass and framebuffer records

use ash::vk;

/// Color attachments are cleared on load
pub const COLOR_LOAD_OP: vk::AttachmentLoadOp = vk::AttachmentLoadOp::CLEAR;
/// Color attachments are stored at the end of the pass
pub const COLOR_STORE_OP: vk::AttachmentStoreOp = vk::AttachmentStoreOp::STORE;
/// Layout the attachment is expected in when the pass begins
pub const COLOR_INITIAL_LAYOUT: vk::ImageLayout = vk::ImageLayout::UNDEFINED;
/// Layout the attachment is left in, ready for presentation
pub const COLOR_FINAL_LAYOUT: vk::ImageLayout = vk::ImageLayout::PRESENT_SRC_KHR;
/// Framebuffers always have one layer
pub const FRAMEBUFFER_LAYERS: u32 = 1;

/// Presentable color attachment: clear, store, single sample
pub fn attachment_description(format: vk::Format) -> vk::AttachmentDescription {
    vk::AttachmentDescription::builder()
        .format(format)
        .samples(vk::SampleCountFlags::TYPE_1)
        .load_op(COLOR_LOAD_OP)
        .store_op(COLOR_STORE_OP)
        .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
        .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
        .initial_layout(COLOR_INITIAL_LAYOUT)
        .final_layout(COLOR_FINAL_LAYOUT)
        .build()
}

/// Reference to attachment `attachment` in `layout` during a subpass
pub fn attachment_reference(attachment: u32, layout: vk::ImageLayout) -> vk::AttachmentReference {
    vk::AttachmentReference { attachment, layout }
}

/// Attachment references used by one graphics subpass
#[derive(Debug, Clone, Copy, Default)]
pub struct SubpassAttachments<'a> {
    /// Input attachments read by the subpass
    pub input: &'a [vk::AttachmentReference],
    /// Color attachments written by the subpass
    pub color: &'a [vk::AttachmentReference],
    /// Multisample resolve targets, empty or one per color attachment
    pub resolve: &'a [vk::AttachmentReference],
    /// Depth/stencil attachment
    pub depth_stencil: Option<&'a vk::AttachmentReference>,
    /// Attachments whose contents must survive the subpass
    pub preserve: &'a [u32],
}

/// Graphics subpass over the given attachment references
pub fn subpass_description<'a>(attachments: &SubpassAttachments<'a>) -> vk::SubpassDescriptionBuilder<'a> {
    let mut subpass = vk::SubpassDescription::builder()
        .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
        .input_attachments(attachments.input)
        .color_attachments(attachments.color)
        .preserve_attachments(attachments.preserve);
    // Resolve shares the color count, so it is only set when present.
    if !attachments.resolve.is_empty() {
        subpass = subpass.resolve_attachments(attachments.resolve);
    }
    if let Some(depth_stencil) = attachments.depth_stencil {
        subpass = subpass.depth_stencil_attachment(depth_stencil);
    }
    subpass
}

/// Dependency making subpass 0 wait for the previous frame's color output
pub fn color_output_dependency() -> vk::SubpassDependency {
    vk::SubpassDependency::builder()
        .src_subpass(vk::SUBPASS_EXTERNAL)
        .dst_subpass(0)
        .src_stage_mask(vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT)
        .src_access_mask(vk::AccessFlags::empty())
        .dst_stage_mask(vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT)
        .dst_access_mask(vk::AccessFlags::COLOR_ATTACHMENT_WRITE)
        .build()
}

/// Render pass over attachments, subpasses and dependencies
pub fn render_pass_create_info<'a>(
    attachments: &'a [vk::AttachmentDescription],
    subpasses: &'a [vk::SubpassDescription],
    dependencies: &'a [vk::SubpassDependency],
) -> vk::RenderPassCreateInfoBuilder<'a> {
    vk::RenderPassCreateInfo::builder()
        .attachments(attachments)
        .subpasses(subpasses)
        .dependencies(dependencies)
}

/// Single-layer framebuffer of `extent` over the given views
pub fn framebuffer_create_info(
    render_pass: vk::RenderPass,
    attachments: &[vk::ImageView],
    extent: vk::Extent2D,
) -> vk::FramebufferCreateInfoBuilder<'_> {
    vk::FramebufferCreateInfo::builder()
        .render_pass(render_pass)
        .attachments(attachments)
        .width(extent.width)
        .height(extent.height)
        .layers(FRAMEBUFFER_LAYERS)
}

/// Begin info rendering to the whole framebuffer
pub fn render_pass_begin_info(
    render_pass: vk::RenderPass,
    framebuffer: vk::Framebuffer,
    extent: vk::Extent2D,
    clear_values: &[vk::ClearValue],
) -> vk::RenderPassBeginInfoBuilder<'_> {
    vk::RenderPassBeginInfo::builder()
        .render_pass(render_pass)
        .framebuffer(framebuffer)
        .render_area(vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent,
        })
        .clear_values(clear_values)
}
