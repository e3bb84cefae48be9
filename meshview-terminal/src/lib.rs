//! Interactive terminal frontend for meshview
//!
//! Wraps a [`Scene`] in a crossterm event loop: mouse drags rotate the mesh,
//! keys toggle the display flags and the face-ordering strategy.
use std::io::{self, stdout, Write};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal,
};
use meshview_core::{OrderingStrategy, Scene, Viewport};

pub mod renderer;

pub use renderer::CellRenderer;

pub struct ViewerApp {
    scene: Scene,
    renderer: CellRenderer,
    /// Cell position of the last left-button press, while a drag is live
    drag_start: Option<(u16, u16)>,
    needs_rescale: bool,
    running: bool,
}

impl ViewerApp {
    pub fn new(scene: Scene) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self {
            scene,
            renderer: CellRenderer::new(width as usize, height as usize),
            drag_start: None,
            needs_rescale: true,
            running: true,
        })
    }

    /// Run until the user quits. Raw mode, the alternate screen and mouse
    /// capture are restored on the way out even when the loop errors.
    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide
        )?;

        let result = self.main_loop();

        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;
        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        while self.running {
            self.render()?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        match event::read()? {
            Event::Key(KeyEvent { code, .. }) => self.handle_key(code),
            Event::Mouse(MouseEvent {
                kind, column, row, ..
            }) => self.handle_mouse(kind, column, row),
            Event::Resize(width, height) => {
                self.renderer.resize(width as usize, height as usize);
                self.needs_rescale = true;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.running = false,
            KeyCode::Char('v') => {
                let on = self.scene.show_vertices_and_edges();
                self.scene.set_show_vertices_and_edges(!on);
            }
            KeyCode::Char('f') => {
                let on = self.scene.show_faces();
                self.scene.set_show_faces(!on);
            }
            KeyCode::Char('1') => self.scene.set_strategy(OrderingStrategy::AverageDepth),
            KeyCode::Char('2') => self.scene.set_strategy(OrderingStrategy::Topological),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, kind: MouseEventKind, column: u16, row: u16) {
        match kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.drag_start = Some((column, row));
                self.scene.begin_drag();
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((start_col, start_row)) = self.drag_start {
                    let dx = column as f64 - start_col as f64;
                    // Terminal rows grow downward, the scene wants y up
                    let dy = start_row as f64 - row as f64;
                    self.scene.drag_to(dx, dy);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.scene.end_drag();
                self.drag_start = None;
            }
            _ => {}
        }
    }

    fn render(&mut self) -> io::Result<()> {
        let viewport = Viewport::new(
            self.renderer.width() as f64,
            self.renderer.height() as f64,
        );
        self.renderer.clear();
        self.scene.draw(viewport, self.needs_rescale, &mut self.renderer);
        self.needs_rescale = false;

        let mut out = stdout();
        self.renderer.present(&mut out)?;

        let order = match self.scene.strategy() {
            OrderingStrategy::AverageDepth => "avg-depth",
            OrderingStrategy::Topological => "topological",
        };
        queue!(
            out,
            cursor::MoveTo(0, 0),
            SetForegroundColor(TermColor::Yellow),
            Print(format!(
                "meshview | order: {order} | Drag=Rotate V=Wireframe F=Faces 1/2=Order Q=Quit"
            )),
            ResetColor
        )?;
        out.flush()
    }
}
