use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;
use stockbot_core::{update, AppState, Msg};
use stockbot_engine::PrefilledSource;
use stockbot_logging::{bot_info, bot_warn};

use super::cli::Args;
use super::config::AppConfig;
use super::effects::EffectRunner;
use super::ui::commands::{parse_command, Command, HELP};
use super::ui::render::Renderer;

/// Everything the main loop reacts to.
pub enum AppEvent {
    Line(String),
    InputClosed,
    Msg(Msg),
}

pub fn run_app() -> anyhow::Result<()> {
    let args = Args::parse();
    stockbot_logging::initialize(args.log.into(), LevelFilter::Info);

    let config = AppConfig::load_or_default(&args.config);
    let mut engine_config = config.engine_config();
    if let Some(raw) = args.prefilled.as_deref() {
        engine_config.prefilled = PrefilledSource::parse(raw);
    }
    bot_info!("Prefilled source: {:?}", engine_config.prefilled);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let effects = EffectRunner::new(engine_config, event_tx.clone());
    spawn_stdin_reader(event_tx.clone());

    // Background tick to coalesce rendering of bursts of log entries.
    thread::spawn(move || {
        let interval = Duration::from_millis(75);
        while event_tx.send(AppEvent::Msg(Msg::Tick)).is_ok() {
            thread::sleep(interval);
        }
    });

    let mut shell = Shell::new(effects, io::stdout());
    shell.write_lines([HELP])?;
    shell.dispatch_msg(Msg::AppStarted);
    shell.flush_render()?;

    while let Ok(event) = event_rx.recv() {
        let keep_going = match event {
            AppEvent::Line(line) => shell.handle_line(&line)?,
            AppEvent::InputClosed => false,
            AppEvent::Msg(Msg::Tick) => {
                shell.flush_render()?;
                true
            }
            AppEvent::Msg(msg) => {
                shell.dispatch_msg(msg);
                true
            }
        };
        if !keep_going {
            break;
        }
    }

    shell.flush_render()?;
    bot_info!("Shutting down");
    Ok(())
}

fn spawn_stdin_reader(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if event_tx.send(AppEvent::Line(line)).is_err() {
                return;
            }
        }
        let _ = event_tx.send(AppEvent::InputClosed);
    });
}

struct Shell<W: Write> {
    state: AppState,
    effects: EffectRunner,
    renderer: Renderer,
    pending_render: bool,
    out: W,
}

impl<W: Write> Shell<W> {
    fn new(effects: EffectRunner, out: W) -> Self {
        Self {
            state: AppState::new(),
            effects,
            renderer: Renderer::new(),
            pending_render: true,
            out,
        }
    }

    /// Returns false when the user asked to quit.
    fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        match parse_command(line, &self.state.view()) {
            Ok(Some(Command::Dispatch(msg))) => {
                self.dispatch_msg(msg);
                // Show the effect of a user command right away.
                self.flush_render()?;
            }
            Ok(Some(Command::Show)) => {
                self.renderer.force_form();
                self.pending_render = true;
                self.flush_render()?;
            }
            Ok(Some(Command::Help)) => self.write_lines([HELP])?,
            Ok(Some(Command::Quit)) => return Ok(false),
            Ok(None) => {}
            Err(err) => {
                bot_warn!("Rejected input {:?}: {}", line, err);
                self.write_lines([err.to_string()])?;
            }
        }
        Ok(true)
    }

    fn dispatch_msg(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.pending_render = true;
        }
        self.state = state;
        self.effects.enqueue(effects);
    }

    fn flush_render(&mut self) -> io::Result<()> {
        if !std::mem::take(&mut self.pending_render) {
            return Ok(());
        }
        let lines = self.renderer.render(&self.state.view());
        if lines.is_empty() {
            return Ok(());
        }
        self.write_lines(lines)
    }

    fn write_lines<S: AsRef<str>>(&mut self, lines: impl IntoIterator<Item = S>) -> io::Result<()> {
        for line in lines {
            writeln!(self.out, "{}", line.as_ref())?;
        }
        self.out.flush()
    }
}
