use anyhow::Result;
use log::{error, info};
use simple_logger::SimpleLogger;
use winit::event::{Event, WindowEvent};

use learngl::{config::load_or_create_config, RenderWindow, Scene};

fn main() -> Result<()> {
    let config = load_or_create_config()?;
    SimpleLogger::new().with_level(config.level_filter()).init()?;
    info!("Starting lesson {:?}", config.lesson);

    let (window, event_loop, gl) = match RenderWindow::create(&config.window) {
        Ok(created) => created,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    let scene = match Scene::build(&gl, &config) {
        Ok(scene) => scene,
        Err(e) => {
            error!("{}", e);
            return Err(e.into());
        }
    };

    event_loop.run(|event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::Resized(size) => window.resize(&gl, size),
            WindowEvent::RedrawRequested => {
                scene.render_frame(config.clear_color);
                if let Err(e) = window.swap_buffers() {
                    error!("{}", e);
                    elwt.exit();
                }
            }
            _ => (),
        },
        Event::AboutToWait => window.request_redraw(),
        _ => (),
    })?;

    info!("Shutting down");
    Ok(())
}
