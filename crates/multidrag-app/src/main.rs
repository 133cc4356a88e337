//! Native preview: renders the initial canvas as SVG to stdout.
//!
//! Usage: `multidrag [config.json]`

#[cfg(feature = "native")]
fn main() {
    env_logger::init();
    log::info!("Starting MultiDrag preview");

    let config = match std::env::args().nth(1) {
        Some(path) => multidrag_app::AppConfig::load(path),
        None => Ok(multidrag_app::AppConfig::default()),
    };
    let svg = config
        .and_then(multidrag_app::App::with_config)
        .and_then(|mut app| app.render());

    match svg {
        Ok(svg) => println!("{svg}"),
        Err(e) => {
            log::error!("{e}");
            eprintln!("multidrag: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(not(feature = "native"))]
fn main() {
    panic!("Native feature not enabled. Use `cargo run --features native`");
}
