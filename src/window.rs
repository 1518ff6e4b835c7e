// window.rs - window, GL 3.3 core context and surface

use glutin::{
    config::ConfigTemplateBuilder,
    context::{ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version},
    display::GetGlDisplay,
    prelude::*,
    surface::{Surface, SwapInterval, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow};
use raw_window_handle::HasRawWindowHandle;
use std::ffi::CString;
use std::num::NonZeroU32;
use thiserror::Error;
use winit::{
    dpi::{LogicalSize, PhysicalSize},
    error::EventLoopError,
    event_loop::{EventLoop, EventLoopBuilder},
    window::{Window, WindowBuilder},
};

use crate::config::WindowConfig;
use crate::render::backend::{GlBackend, NativeGl};

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Failed to create window: {0}")]
    WindowCreationFailed(String),
    #[error("Failed to create OpenGL context: {0}")]
    ContextCreationFailed(#[from] glutin::error::Error),
    #[error("Event loop error: {0}")]
    EventLoop(#[from] EventLoopError),
    #[error("Failed to load OpenGL function pointers")]
    LoaderInitFailed,
}

pub struct RenderWindow {
    window: Window,
    gl_context: PossiblyCurrentContext,
    gl_surface: Surface<WindowSurface>,
}

impl RenderWindow {
    /// Opens the window, makes a 3.3 core context current on it and loads
    /// the GL function pointers.
    pub fn create(config: &WindowConfig) -> Result<(Self, EventLoop<()>, NativeGl), ContextError> {
        let event_loop = EventLoopBuilder::new().build()?;
        let window_builder = WindowBuilder::new()
            .with_title(config.title.as_str())
            .with_inner_size(LogicalSize::new(config.width, config.height));

        let template = ConfigTemplateBuilder::new().with_alpha_size(8);
        let display_builder = DisplayBuilder::new().with_window_builder(Some(window_builder));

        let (window, gl_config) = display_builder
            .build(&event_loop, template, |configs| {
                configs
                    .reduce(|accum, config| {
                        if config.num_samples() > accum.num_samples() {
                            config
                        } else {
                            accum
                        }
                    })
                    .expect("display offered no GL configs")
            })
            .map_err(|e| ContextError::WindowCreationFailed(e.to_string()))?;

        let window = window
            .ok_or_else(|| ContextError::WindowCreationFailed("no window was built".to_string()))?;
        let raw_window_handle = window.raw_window_handle();

        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(3, 3))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes)? };

        let attrs = window.build_surface_attributes(<_>::default());
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &attrs)? };
        let gl_context = not_current.make_current(&gl_surface)?;

        let interval = if config.vsync {
            SwapInterval::Wait(NonZeroU32::MIN)
        } else {
            SwapInterval::DontWait
        };
        if let Err(e) = gl_surface.set_swap_interval(&gl_context, interval) {
            log::warn!("Could not set swap interval: {}", e);
        }

        let gl = NativeGl::load_with(|symbol| match CString::new(symbol) {
            Ok(symbol) => gl_display.get_proc_address(symbol.as_c_str()),
            Err(_) => std::ptr::null(),
        })?;

        let size = window.inner_size();
        gl.viewport(0, 0, size.width as i32, size.height as i32);
        log::info!("Created {}x{} window \"{}\"", size.width, size.height, config.title);

        Ok((
            Self {
                window,
                gl_context,
                gl_surface,
            },
            event_loop,
            gl,
        ))
    }

    /// Keeps the surface and viewport in step with the window size.
    pub fn resize<B: GlBackend>(&self, gl: &B, size: PhysicalSize<u32>) {
        if let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height)) {
            self.gl_surface.resize(&self.gl_context, width, height);
            gl.viewport(0, 0, size.width as i32, size.height as i32);
        }
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    pub fn swap_buffers(&self) -> Result<(), ContextError> {
        self.gl_surface.swap_buffers(&self.gl_context)?;
        Ok(())
    }
}
