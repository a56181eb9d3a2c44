#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release
use std::path::PathBuf;

use reeldeck::{Args, ConfigHandler, DataPath};
use reeldeck_chrome::{
    setup::{generate_native_options, setup_logging},
    ReelApp,
};
use tracing::{error, info, warn};

// Desktop
#[tokio::main]
async fn main() {
    let raw_args: Vec<String> = std::env::args().collect();
    let (args, unrecognized) = Args::parse(&raw_args);

    let base_path = args
        .datapath
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(DataPath::default_base_or_cwd);
    let path = DataPath::new(&base_path);

    // need guard to live for lifetime of program
    let _log_guard = setup_logging(&path, args.debug);

    for arg in &unrecognized {
        warn!("ignoring unrecognized argument '{arg}'");
    }

    let mut config = ConfigHandler::new(&path).load().config();
    args.apply(&mut config);
    info!(
        "loading feed from {}{} with {} videos per page",
        config.api_base, config.list_path, config.page_size
    );

    let is_mobile = args.mobile;
    let res = eframe::run_native(
        "reeldeck",
        generate_native_options(is_mobile),
        Box::new(move |cc| Ok(Box::new(ReelApp::new(&cc.egui_ctx, config, is_mobile)))),
    );

    if let Err(err) = res {
        error!("reeldeck exited with an error: {err}");
    }
}
