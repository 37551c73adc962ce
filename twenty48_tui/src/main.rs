use std::io::stdout;
use std::path::PathBuf;

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::{
    crossterm::{
        event::{self, Event, KeyCode},
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
        ExecutableCommand,
    },
    prelude::*,
    widgets::*,
};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use twenty48::{
    describe_status, visualize_grid, Config, Engine, Grid, Input, JsonFileStorage, MemoryStorage,
    Renderer, Status, Storage,
};

#[derive(Parser)]
struct Args {
    /// Width of a new grid
    #[arg(long, default_value_t = 4)]
    width: usize,

    /// Height of a new grid
    #[arg(long, default_value_t = 4)]
    height: usize,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Save the game and the best score into this directory, and resume
    /// the game saved there
    #[arg(short, long)]
    save_dir: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace".
    /// Logs go to stderr, so redirect it when turning this on.
    #[arg(short, long, default_value = "off")]
    log_level: LevelFilter,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    initialize_logging(args.log_level);

    let mut config = Config::default();
    config.size.width = args.width;
    config.size.height = args.height;
    config.validate()?;

    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed);
    let rng = StdRng::seed_from_u64(seed);

    match args.save_dir {
        Some(dir_path) => run(config, JsonFileStorage::new(dir_path)?, rng),
        None => run(config, MemoryStorage::new(), rng),
    }
}

fn run<S: Storage>(config: Config, storage: S, rng: StdRng) -> anyhow::Result<()> {
    let mut engine = Engine::new(config, storage, TuiRenderer::default(), rng)?;

    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let result = event_loop(&mut engine);
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    result
}

fn event_loop<S: Storage>(engine: &mut Engine<S, TuiRenderer>) -> anyhow::Result<()> {
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    loop {
        terminal.draw(|frame| engine.renderer().ui(frame))?;
        match handle_events()? {
            Some(Command::Quit) => break,
            Some(Command::Play(input)) => engine.handle(input)?,
            None => {}
        }
    }
    Ok(())
}

/// Keeps the latest frame around until the terminal is redrawn.
#[derive(Default)]
struct TuiRenderer {
    grid: Option<Grid>,
    status: Status,
    /// The win/loss message is up.
    show_message: bool,
}

impl Renderer for TuiRenderer {
    fn render(&mut self, grid: &Grid, status: &Status) {
        self.grid = Some(grid.clone());
        self.status = *status;
        self.show_message = status.terminated;
    }

    fn continue_game(&mut self) {
        self.show_message = false;
    }
}

impl TuiRenderer {
    fn ui(&self, frame: &mut Frame) {
        let main_layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ],
        )
        .split(frame.size());

        let header = Paragraph::new(describe_status(&self.status))
            .alignment(Alignment::Center)
            .block(
                Block::new()
                    .border_type(BorderType::Rounded)
                    .borders(Borders::all())
                    .title(" 2048 "),
            );
        frame.render_widget(header, main_layout[0]);

        if let Some(grid) = &self.grid {
            frame.render_widget(GridWidget { grid }, main_layout[1]);
        }

        let footer = if self.show_message && self.status.over {
            Paragraph::new("Game over! r: new game  q: quit").bold()
        } else if self.show_message {
            Paragraph::new("You win! c: keep playing  r: new game  q: quit").bold()
        } else {
            Paragraph::new("arrows/wasd/hjkl: move  r: new game  q: quit")
        };
        frame.render_widget(footer.alignment(Alignment::Center), main_layout[2]);
    }
}

struct GridWidget<'a> {
    grid: &'a Grid,
}

impl Widget for GridWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let text = visualize_grid(self.grid);
        let width = text.lines().map(|line| line.chars().count()).max().unwrap_or(0) as u16;
        let height = text.lines().count() as u16;
        let area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(width),
                Constraint::Min(0),
            ])
            .split(area)[1];
        let area = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(height),
                Constraint::Min(0),
            ])
            .split(area)[1];
        Paragraph::new(text).render(area, buf);
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Play(Input),
    Quit,
}

fn command_for_key(code: KeyCode) -> Option<Command> {
    let direction = match code {
        KeyCode::Up => twenty48::Direction::Up,
        KeyCode::Right => twenty48::Direction::Right,
        KeyCode::Down => twenty48::Direction::Down,
        KeyCode::Left => twenty48::Direction::Left,
        KeyCode::Esc | KeyCode::Char('q') => return Some(Command::Quit),
        KeyCode::Char(c) => return c.to_string().parse().ok().map(Command::Play),
        _ => return None,
    };
    Some(Command::Play(Input::Move { direction }))
}

fn handle_events() -> std::io::Result<Option<Command>> {
    if event::poll(std::time::Duration::from_millis(16))? {
        if let Event::Key(key) = event::read()? {
            if key.kind == event::KeyEventKind::Press {
                return Ok(command_for_key(key.code));
            }
        }
    }
    Ok(None)
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
