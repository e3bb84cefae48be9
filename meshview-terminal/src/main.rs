//! Terminal mesh viewer
//!
//! Usage: `meshview-terminal [mesh-file]`
//!
//! With no argument a demo tetrahedron is shown. Drag with the mouse to
//! rotate, `v`/`f` toggle the wireframe and faces, `1`/`2` switch the
//! face-ordering strategy, `q` or Esc quits.
use std::env;
use std::io;

use meshview_core::{load_mesh, Mesh, Scene};
use meshview_terminal::ViewerApp;

fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let mesh = match env::args().nth(1) {
        Some(path) => load_mesh(&path).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("failed to load {path}: {e}"))
        })?,
        None => {
            tracing::info!("no mesh file given, showing the demo tetrahedron");
            Mesh::tetrahedron(20.0)
        }
    };
    tracing::info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "mesh loaded"
    );

    ViewerApp::new(Scene::new(mesh))?.run()
}
