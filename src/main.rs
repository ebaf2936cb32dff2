// src/main.rs
use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result, anyhow};
use eframe::{NativeOptions, egui};

use showroom::app::{FatalError, ShowroomApp};
use showroom::config::{CONFIG_FILE, ViewerConfig};
use showroom::logging;

fn main() -> Result<()> {
    let config = ViewerConfig::load(Path::new(CONFIG_FILE))?;
    logging::init(&config)?;
    logging::log_config(&config);

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Showroom")
            .with_inner_size(config.window_size),
        ..Default::default()
    };

    let fatal: FatalError = Rc::new(RefCell::new(None));
    let app_fatal = fatal.clone();
    eframe::run_native(
        "Showroom",
        options,
        Box::new(move |cc| Ok(Box::new(ShowroomApp::new(&cc.egui_ctx, &config, app_fatal)))),
    )
    .map_err(|err| anyhow!("{err}"))
    .context("running viewer window")?;

    let fatal_error = fatal.borrow_mut().take();
    match fatal_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
