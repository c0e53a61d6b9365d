#[cfg(target_arch = "wasm32")]
fn main() {
    use chess_core::worker::GameWorker;
    use gloo_worker::Registrable;

    console_error_panic_hook::set_once();
    // Fails only when a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Debug);
    GameWorker::registrar().register();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("the search worker only runs in the browser; build it for wasm32");
}
