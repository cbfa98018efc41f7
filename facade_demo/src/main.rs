//! Facade demo
//!
//! Brings up a window, device and swapchain through the facade factories,
//! clears the screen (and draws a triangle when SPIR-V shaders are
//! configured) until the window closes, then destroys everything in
//! reverse creation order.
//!
//! Usage: `facade_demo [config.toml|config.ron]`

mod window;

use ash::extensions::khr::{Surface as SurfaceLoader, Swapchain as SwapchainLoader};
use ash::vk;
use std::ffi::CStr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use vk_facade::config::{to_c_strings, Config, ConfigError, FacadeConfig};
use vk_facade::create_info::{self, FixedFunctionState, WaitSemaphores};
use vk_facade::foundation::logging;
use vk_facade::negotiation::{select_extent, select_surface_format, CapabilitySnapshot};
use vk_facade::{factory, CreateOptions, FacadeError, Handle};

use window::{Window, WindowError};

const CLEAR_COLOR: [f32; 4] = [0.02, 0.02, 0.05, 1.0];

#[derive(Error, Debug)]
enum DemoError {
    #[error(transparent)]
    Window(#[from] WindowError),

    #[error(transparent)]
    Facade(#[from] FacadeError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to read shader {path}: {source}")]
    Shader {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("No queue family supports {0}")]
    MissingQueue(&'static str),

    #[error("Device is missing extensions: {0:?}")]
    MissingExtensions(Vec<String>),

    #[error("Surface reports no formats")]
    NoSurfaceFormat,

    #[error("Frame failed: {0:?}")]
    Frame(vk::Result),
}

impl From<vk::Result> for DemoError {
    fn from(result: vk::Result) -> Self {
        Self::Frame(result)
    }
}

/// Instance, surface and device
struct Core {
    _entry: ash::Entry,
    instance: ash::Instance,
    surface_loader: SurfaceLoader,
    surface: vk::SurfaceKHR,
    device: ash::Device,
    graphics_queue: Handle<vk::Queue>,
    present_queue: Handle<vk::Queue>,
    queue_families: Vec<u32>,
    physical_device: Handle<vk::PhysicalDevice>,
}

impl Core {
    fn new(config: &FacadeConfig, window: &mut Window) -> Result<Self, DemoError> {
        let entry = factory::load_entry()?;

        let mut extensions = window.required_instance_extensions()?;
        for extension in &config.instance.extensions {
            if !extensions.contains(extension) {
                extensions.push(extension.clone());
            }
        }
        let extensions = to_c_strings(&extensions)?;
        let layers = to_c_strings(&config.instance.validation_layers)?;
        let application_name = config.instance.application_name_c()?;

        let instance = factory::create_instance(
            &entry,
            &application_name,
            config.instance.packed_application_version(),
            &create_info::name_pointers(&layers),
            &create_info::name_pointers(&extensions),
            CreateOptions::new(),
        )?;

        let surface_loader = SurfaceLoader::new(&entry, &instance);
        let surface = window.create_surface(instance.handle())?;

        let physical_device = factory::pick_physical_device(&instance, config.device.prefer_discrete_gpu)?;

        let device_extensions = to_c_strings(&config.device.extensions)?;
        let required: Vec<&CStr> = device_extensions.iter().map(|name| name.as_c_str()).collect();
        let available = factory::device_extension_properties(&instance, physical_device)?;
        let missing = factory::missing_extensions(&available, &required);
        if !missing.is_empty() {
            return Err(DemoError::MissingExtensions(
                missing.iter().map(|name| name.to_string_lossy().into_owned()).collect(),
            ));
        }

        let families = factory::queue_family_snapshot(&instance, &surface_loader, physical_device, surface)?;
        let graphics_family = families.graphics_family().ok_or(DemoError::MissingQueue("graphics"))?;
        let present_family = families.present_family().ok_or(DemoError::MissingQueue("presentation"))?;
        log::info!("Queue families: graphics {graphics_family}, present {present_family}");

        let queue_families = vec![graphics_family, present_family];
        let device = factory::create_device(
            &instance,
            physical_device,
            &queue_families,
            &create_info::name_pointers(&device_extensions),
            None,
            CreateOptions::new(),
        )?;

        Ok(Self {
            _entry: entry,
            graphics_queue: factory::get_device_queue(&device, graphics_family, 0),
            present_queue: factory::get_device_queue(&device, present_family, 0),
            instance,
            surface_loader,
            surface,
            device,
            queue_families,
            physical_device,
        })
    }

    unsafe fn destroy(&self) {
        self.device.destroy_device(None);
        self.surface_loader.destroy_surface(self.surface, None);
        self.instance.destroy_instance(None);
    }
}

/// Swapchain and everything sized to it
struct Presentation {
    loader: SwapchainLoader,
    swapchain: Handle<vk::SwapchainKHR>,
    extent: vk::Extent2D,
    views: Vec<Handle<vk::ImageView>>,
    render_pass: Handle<vk::RenderPass>,
    framebuffers: Vec<Handle<vk::Framebuffer>>,
}

impl Presentation {
    fn new(core: &Core, config: &FacadeConfig, window: &Window) -> Result<Self, DemoError> {
        let snapshot = CapabilitySnapshot::query(&core.surface_loader, core.physical_device, core.surface)?;

        let preferred = config.swapchain.preferred_surface_format()?;
        let format = select_surface_format(&snapshot.formats, preferred).ok_or(DemoError::NoSurfaceFormat)?;

        let window_extent = window.framebuffer_extent();
        let fallback = if window_extent.width == 0 || window_extent.height == 0 {
            config.swapchain.fallback_extent()
        } else {
            window_extent
        };
        let extent = select_extent(&snapshot.capabilities, fallback);

        let loader = SwapchainLoader::new(&core.instance, &core.device);
        let swapchain = factory::create_swapchain(
            &loader,
            core.surface,
            format,
            extent,
            &snapshot,
            &core.queue_families,
            None,
            CreateOptions::new(),
        )?;

        let images = factory::swapchain_images(&core.device, &loader, swapchain)?;
        let views = images
            .iter()
            .map(|image| factory::create_image_view(&core.device, *image, format.format, CreateOptions::new()))
            .collect::<Result<Vec<_>, _>>()?;

        let render_pass = factory::create_color_render_pass(&core.device, format.format, CreateOptions::new())?;
        let framebuffers = views
            .iter()
            .map(|view| factory::create_framebuffer(&core.device, render_pass, &[*view], extent, CreateOptions::new()))
            .collect::<Result<Vec<_>, _>>()?;

        log::info!("Swapchain ready: {} images at {}x{}", images.len(), extent.width, extent.height);

        Ok(Self {
            loader,
            swapchain,
            extent,
            views,
            render_pass,
            framebuffers,
        })
    }

    unsafe fn destroy(&self, device: &ash::Device) {
        for framebuffer in &self.framebuffers {
            device.destroy_framebuffer(framebuffer.raw(), None);
        }
        device.destroy_render_pass(self.render_pass.raw(), None);
        for view in &self.views {
            device.destroy_image_view(view.raw(), None);
        }
        self.loader.destroy_swapchain(self.swapchain.raw(), None);
    }
}

/// Triangle pipeline built from configured SPIR-V
struct TrianglePipeline {
    layout: Handle<vk::PipelineLayout>,
    pipeline: Handle<vk::Pipeline>,
}

impl TrianglePipeline {
    fn new(
        device: &ash::Device,
        render_pass: Handle<vk::RenderPass>,
        vertex_path: &Path,
        fragment_path: &Path,
    ) -> Result<Self, DemoError> {
        let vertex = factory::create_shader_module(device, &read_shader(vertex_path)?, CreateOptions::new())?;
        let fragment = factory::create_shader_module(device, &read_shader(fragment_path)?, CreateOptions::new())?;

        let stages = [
            *create_info::shader_stage(vk::ShaderStageFlags::VERTEX, vertex.raw()),
            *create_info::shader_stage(vk::ShaderStageFlags::FRAGMENT, fragment.raw()),
        ];
        let layout = factory::create_pipeline_layout(device, &[], &[], CreateOptions::new())?;
        let pipeline = factory::create_graphics_pipeline(
            device,
            &FixedFunctionState::default(),
            &stages,
            layout,
            render_pass,
            CreateOptions::new(),
        )?;

        // Modules are only needed while the pipeline is built
        unsafe {
            device.destroy_shader_module(fragment.raw(), None);
            device.destroy_shader_module(vertex.raw(), None);
        }

        Ok(Self { layout, pipeline })
    }

    unsafe fn destroy(&self, device: &ash::Device) {
        device.destroy_pipeline(self.pipeline.raw(), None);
        device.destroy_pipeline_layout(self.layout.raw(), None);
    }
}

fn read_shader(path: &Path) -> Result<Vec<u8>, DemoError> {
    std::fs::read(path).map_err(|source| DemoError::Shader {
        path: path.to_path_buf(),
        source,
    })
}

/// Per-frame command buffer and synchronization
struct FrameSync {
    command_pool: Handle<vk::CommandPool>,
    command_buffer: Handle<vk::CommandBuffer>,
    in_flight: Handle<vk::Fence>,
    image_available: Handle<vk::Semaphore>,
    render_finished: Handle<vk::Semaphore>,
}

impl FrameSync {
    fn new(device: &ash::Device, queue_family: u32) -> Result<Self, DemoError> {
        let command_pool = factory::create_command_pool(device, queue_family, CreateOptions::new())?;
        Ok(Self {
            command_pool,
            command_buffer: factory::allocate_command_buffer(device, command_pool, CreateOptions::new())?,
            in_flight: factory::create_fence(device, CreateOptions::new())?,
            image_available: factory::create_semaphore(device, CreateOptions::new())?,
            render_finished: factory::create_semaphore(device, CreateOptions::new())?,
        })
    }

    unsafe fn destroy(&self, device: &ash::Device) {
        device.destroy_semaphore(self.render_finished.raw(), None);
        device.destroy_semaphore(self.image_available.raw(), None);
        device.destroy_fence(self.in_flight.raw(), None);
        device.destroy_command_pool(self.command_pool.raw(), None);
    }
}

/// Record, submit and present one frame
///
/// Returns `false` once the swapchain no longer matches the surface.
fn draw_frame(
    core: &Core,
    presentation: &Presentation,
    pipeline: Option<&TrianglePipeline>,
    frame: &FrameSync,
) -> Result<bool, DemoError> {
    let device = &core.device;
    let command_buffer = frame.command_buffer.raw();

    unsafe {
        device.wait_for_fences(&[frame.in_flight.raw()], true, u64::MAX)?;

        let image_index = match presentation.loader.acquire_next_image(
            presentation.swapchain.raw(),
            u64::MAX,
            frame.image_available.raw(),
            vk::Fence::null(),
        ) {
            Ok((index, _suboptimal)) => index,
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => return Ok(false),
            Err(result) => return Err(result.into()),
        };

        device.reset_fences(&[frame.in_flight.raw()])?;
        device.reset_command_buffer(command_buffer, vk::CommandBufferResetFlags::empty())?;
        device.begin_command_buffer(
            command_buffer,
            &create_info::command_buffer_begin_info(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT),
        )?;

        let clear_values = [vk::ClearValue {
            color: vk::ClearColorValue { float32: CLEAR_COLOR },
        }];
        let framebuffer = presentation.framebuffers[image_index as usize].raw();
        let begin = create_info::render_pass_begin_info(
            presentation.render_pass.raw(),
            framebuffer,
            presentation.extent,
            &clear_values,
        );
        device.cmd_begin_render_pass(command_buffer, &begin, vk::SubpassContents::INLINE);
        if let Some(triangle) = pipeline {
            device.cmd_bind_pipeline(command_buffer, vk::PipelineBindPoint::GRAPHICS, triangle.pipeline.raw());
            device.cmd_set_viewport(command_buffer, 0, &[create_info::viewport(presentation.extent)]);
            device.cmd_set_scissor(command_buffer, 0, &[create_info::rect(presentation.extent)]);
            device.cmd_draw(command_buffer, 3, 1, 0, 0);
        }
        device.cmd_end_render_pass(command_buffer);
        device.end_command_buffer(command_buffer)?;

        let waits = WaitSemaphores::new().wait(
            frame.image_available.raw(),
            vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
        );
        let command_buffers = [command_buffer];
        let signals = [frame.render_finished.raw()];
        let submit = create_info::submit_info(&waits, &command_buffers, &signals);
        device.queue_submit(core.graphics_queue.raw(), &[*submit], frame.in_flight.raw())?;

        let swapchains = [presentation.swapchain.raw()];
        let image_indices = [image_index];
        let present = create_info::present_info(&signals, &swapchains, &image_indices);
        match presentation.loader.queue_present(core.present_queue.raw(), &present) {
            Ok(_) => Ok(true),
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => Ok(false),
            Err(result) => Err(result.into()),
        }
    }
}

fn load_config() -> Result<FacadeConfig, DemoError> {
    let config = match std::env::args_os().nth(1) {
        Some(path) => FacadeConfig::load_from_file(PathBuf::from(path))?,
        None => FacadeConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run(config: &FacadeConfig) -> Result<(), DemoError> {
    let fallback = config.swapchain.fallback_extent();
    let mut window = Window::new(&config.instance.application_name, fallback.width, fallback.height)?;

    let core = Core::new(config, &mut window)?;
    let presentation = Presentation::new(&core, config, &window)?;
    let pipeline = match config.shaders.stages() {
        Some((vertex, fragment)) => Some(TrianglePipeline::new(
            &core.device,
            presentation.render_pass,
            vertex,
            fragment,
        )?),
        None => {
            log::info!("No shaders configured, clearing only");
            None
        }
    };
    let frame = FrameSync::new(&core.device, core.queue_families[0])?;

    let mut frames = 0_u64;
    while !window.should_close() {
        window.poll_events();
        if !draw_frame(&core, &presentation, pipeline.as_ref(), &frame)? {
            log::warn!("Swapchain out of date, stopping");
            break;
        }
        frames += 1;
    }
    log::info!("Rendered {frames} frames");

    unsafe {
        core.device.device_wait_idle()?;
        frame.destroy(&core.device);
        if let Some(pipeline) = &pipeline {
            pipeline.destroy(&core.device);
        }
        presentation.destroy(&core.device);
        core.destroy();
    }
    Ok(())
}

fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(error) => {
            logging::init();
            log::error!("Invalid configuration: {error}");
            std::process::exit(2);
        }
    };
    // Validated above
    logging::init_with_level(config.level_filter().unwrap_or(log::LevelFilter::Info));

    if let Err(error) = run(&config) {
        log::error!("{error}");
        std::process::exit(1);
    }
}
