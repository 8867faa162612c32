/// meshview - interactive OBJ viewer for the terminal
///
/// Each model path fills one numbered slot; slot 1 shows the default cube
/// when no paths are given. Set RUST_LOG=info (and redirect stderr) to follow
/// loading and screenshot messages.
use clap::Parser;
use meshview_core::{library::DEFAULT_SLOT_COUNT, ImageTextureLoader, ModelSlots};
use meshview_terminal::{AppConfig, TerminalApp, CONTROLS};
use std::io;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "meshview", version, about = "Interactive OBJ mesh viewer for the terminal")]
struct Cli {
    /// OBJ files, loaded into slots 1, 2, ... in order
    models: Vec<PathBuf>,

    /// Number of model slots
    #[arg(long, default_value_t = DEFAULT_SLOT_COUNT)]
    slots: usize,

    /// Framebuffer width in pixels
    #[arg(long, default_value_t = 800)]
    width: usize,

    /// Framebuffer height in pixels
    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Target frames per second
    #[arg(long, default_value_t = 60)]
    fps: u32,
}

fn main() -> io::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    println!("meshview - Loading...");
    let models = ModelSlots::load(cli.slots, &cli.models, &ImageTextureLoader);
    for (index, mesh) in models.populated() {
        println!(
            "  [{}] {} ({} vertices, {} faces)",
            index + 1,
            mesh.name,
            mesh.vertices.len(),
            mesh.faces.len()
        );
    }

    println!("Controls:");
    for (keys, action) in CONTROLS {
        println!("  {:<12} {}", keys, action);
    }
    std::thread::sleep(std::time::Duration::from_secs(1));

    let config = AppConfig {
        width: cli.width,
        height: cli.height,
        fps: cli.fps,
    };
    let mut app = TerminalApp::new(models, config)?;
    app.run()?;

    println!("Thank you for using meshview!");
    Ok(())
}
