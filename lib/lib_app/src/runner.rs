use std::{sync::Arc, time::Instant};

use lib_gpu::{
    Device, DeviceDescriptor, Instance, PollType, Queue, RequestAdapterOptions, Surface,
    SurfaceConfiguration, TextureViewDescriptor,
};
use log::{debug, info};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{AppContext, AppEvent, AppFlow, AppHandler, init_logging};

pub fn run_app<T: AppHandler>() {
    init_logging();

    let event_loop = EventLoop::new().expect("Failed to create event loop");

    let mut application = AppRunner::<T>::Uninitialized;

    event_loop
        .run_app(&mut application)
        .expect("Failed to run app");
}

enum AppRunner<T: AppHandler> {
    Uninitialized,
    Initialized(InitializedAppRunner<T>),
}

struct InitializedAppRunner<T: AppHandler> {
    window: Arc<Window>,
    device: Device,
    queue: Queue,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    app: T,
    last_instant: Instant,
}

impl<T: AppHandler> ApplicationHandler for AppRunner<T> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let AppRunner::Uninitialized = self else {
            return;
        };

        *self = AppRunner::Initialized(InitializedAppRunner::new(event_loop));
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let AppRunner::Initialized(init_self) = self else {
            return;
        };

        let now = Instant::now();
        let delta_time = now.duration_since(init_self.last_instant);
        init_self.last_instant = now;

        handle_appflow!(
            event_loop,
            init_self.app.update(
                delta_time,
                AppContext {
                    window: &init_self.window,
                    device: &init_self.device,
                    queue: &init_self.queue,
                    surface_format: init_self.surface_config.format,
                },
            )
        );

        init_self.window.request_redraw();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Self::Initialized(init_self) = self else {
            return;
        };

        let app_event = match &event {
            WindowEvent::CloseRequested => AppEvent::CloseRequested,
            WindowEvent::Resized(size) => AppEvent::Resized {
                width: size.width,
                height: size.height,
            },
            _ => AppEvent::UnhandledWindowEvent(&event),
        };

        handle_appflow!(
            event_loop,
            init_self.app.event(
                app_event,
                AppContext {
                    window: &init_self.window,
                    device: &init_self.device,
                    queue: &init_self.queue,
                    surface_format: init_self.surface_config.format,
                },
            )
        );

        match &event {
            WindowEvent::RedrawRequested => 'redraw: {
                let Ok(texture) = init_self.surface.get_current_texture() else {
                    break 'redraw;
                };

                init_self.app.draw(
                    &texture
                        .texture
                        .create_view(&TextureViewDescriptor::default()),
                    AppContext {
                        window: &init_self.window,
                        device: &init_self.device,
                        queue: &init_self.queue,
                        surface_format: init_self.surface_config.format,
                    },
                );

                init_self.window.pre_present_notify();
                texture.present();

                init_self
                    .device
                    .poll(PollType::Poll)
                    .expect("Failed to poll");
            }
            WindowEvent::Resized(size) => {
                init_self.surface_config.width = size.width;
                init_self.surface_config.height = size.height;

                init_self
                    .surface
                    .configure(&init_self.device, &init_self.surface_config);

                debug!("surface reconfigured to {}x{}", size.width, size.height);
            }
            _ => {}
        }
    }
}

impl<T: AppHandler> InitializedAppRunner<T> {
    fn new(event_loop: &ActiveEventLoop) -> Self {
        let window = Arc::new(
            event_loop
                .create_window(T::window_attributes())
                .expect("Failed to create main window"),
        );

        let instance = Instance::default();

        let adapter =
            pollster::block_on(instance.request_adapter(&RequestAdapterOptions::default()))
                .expect("Failed to get adapter");

        info!("using adapter: {}", adapter.get_info().name);

        let (device, queue) =
            pollster::block_on(adapter.request_device(&DeviceDescriptor::default()))
                .expect("Failed to get device");

        let surface = instance
            .create_surface(window.clone())
            .expect("Failed to create surface");

        let surface_config = surface
            .get_default_config(
                &adapter,
                window.inner_size().width,
                window.inner_size().height,
            )
            .expect("Failed to get default surface configuration");

        surface.configure(&device, &surface_config);

        let app = T::new(AppContext {
            window: &window,
            device: &device,
            queue: &queue,
            surface_format: surface_config.format,
        });

        let last_instant = Instant::now();

        Self {
            window,
            device,
            queue,
            surface,
            surface_config,
            app,
            last_instant,
        }
    }
}

macro_rules! handle_appflow {
    ($event_loop:expr, $flow:expr) => {
        match $flow {
            AppFlow::Continue => {}
            AppFlow::Exit => {
                $event_loop.exit();
                return;
            }
        }
    };
}

use handle_appflow;
