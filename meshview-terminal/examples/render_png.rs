/// Example: render one frame of an OBJ file to a PNG without a terminal
///
/// Usage: cargo run --example render_png -- path/to/model.obj [out.png]
use meshview_core::{library, FrameRenderer, ImageTextureLoader, ViewState};
use meshview_terminal::Framebuffer;
use std::env;
use std::io;
use std::path::{Path, PathBuf};

fn main() -> io::Result<()> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <obj-file> [out.png]", args[0]);
        eprintln!("\nNo OBJ file provided, using default cube...");
    }
    let model = args.get(1).map(String::as_str).unwrap_or("");
    let output = args.get(2).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("frame.png"));

    let mesh = library::load_or_cube(Path::new(model), 0, &ImageTextureLoader);
    println!(
        "Loaded '{}': {} vertices, {} faces, {} edges",
        mesh.name,
        mesh.vertices.len(),
        mesh.faces.len(),
        mesh.edges.len()
    );

    let mut view = ViewState::new();
    view.wireframe = false;
    view.lighting = true;
    view.camera.rotation.rotate(0.4, 0.6);

    let mut framebuffer = Framebuffer::new(800, 600);
    let stats = FrameRenderer::new().render(&mut framebuffer, &mesh, &view);
    println!("Drew {} faces, skipped {}", stats.faces, stats.skipped);

    framebuffer
        .save_png(&output)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    println!("Wrote {}", output.display());
    Ok(())
}
