//! Runtime: event loop and input routing for the TUI.
//!
//! - Owns the terminal lifecycle (alternate screen, raw mode, mouse capture).
//! - A dedicated input task forwards `crossterm` events over a channel.
//! - Ticks fast only while requests are outstanding; idle ticks are slow.
//! - Effects returned by components are handed to [`cmd::run_from_effects`];
//!   spawned work is polled through a `FuturesUnordered` and fed back as
//!   [`Msg::ExecCompleted`].
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use hllrcon_types::{Effect, ExecOutcome, Msg};
use ratatui::{Terminal, prelude::*};
use tokio::{
    signal,
    sync::mpsc,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};

use crate::app::App;
use crate::cmd;
use crate::ui::components::Component;
use crate::ui::main_component::MainView;

type TerminalBackend = CrosstermBackend<std::io::Stdout>;

/// Forward terminal input over a channel from a blocking task.
///
/// Mouse moves are throttled to one per 16 ms.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);

    tokio::task::spawn_blocking(move || {
        let sixteen_ms = Duration::from_millis(16);
        let mut last_mouse_move = Instant::now();
        loop {
            match event::poll(sixteen_ms) {
                Ok(false) => continue,
                Ok(true) => {}
                Err(error) => {
                    tracing::warn!(%error, "failed to poll terminal input");
                    break;
                }
            }
            match event::read() {
                Ok(event) => {
                    let is_mouse_move = event.as_mouse_event().is_some_and(|mouse| mouse.kind == MouseEventKind::Moved);
                    if is_mouse_move {
                        if last_mouse_move.elapsed() < sixteen_ms {
                            continue;
                        }
                        last_mouse_move = Instant::now();
                    }
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    tracing::warn!(%error, "failed to read terminal input");
                    break;
                }
            }
        }
    });
    receiver
}

fn setup_terminal() -> Result<Terminal<TerminalBackend>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn cleanup_terminal(terminal: &mut Terminal<TerminalBackend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<TerminalBackend>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

fn is_quit_key(event: &Event) -> bool {
    let Event::Key(key) = event else {
        return false;
    };
    key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
}

/// Set up the terminal, run the event loop until the operator quits, and
/// restore the terminal.
pub async fn run_app(mut app: App) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut main_view = MainView::new();
    let mut terminal = setup_terminal()?;

    let mut pending_execs: FuturesUnordered<JoinHandle<ExecOutcome>> = FuturesUnordered::new();
    // Startup mirrors a page load: learn the session state and fetch the map list.
    let mut effects: Vec<Effect> = vec![Effect::RefreshStatus, Effect::LoadMaps];

    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let loop_result = async {
        render(&mut terminal, &mut app, &mut main_view)?;
        loop {
            let needs_animation = app.executing || !effects.is_empty();
            let target_interval = if needs_animation { fast_interval } else { idle_interval };
            if target_interval != current_interval {
                current_interval = target_interval;
                ticker = time::interval(current_interval);
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            }
            let mut needs_render = false;
            tokio::select! {
                maybe_event = input_receiver.recv() => {
                    let Some(event) = maybe_event else {
                        break;
                    };
                    if is_quit_key(&event) {
                        break;
                    }
                    effects.extend(handle_input_event(&mut app, &mut main_view, event));
                    needs_render = true;
                }

                _ = ticker.tick() => {
                    effects.extend(main_view.handle_message(&mut app, Msg::Tick));
                    needs_render = needs_animation;
                    if !effects.is_empty() {
                        let effects_to_process = std::mem::take(&mut effects);
                        process_effects(&mut app, &mut main_view, effects_to_process, &mut pending_execs, &mut effects);
                        needs_render = true;
                    }
                }

                Some(joined) = pending_execs.next(), if !pending_execs.is_empty() => {
                    let outcome = joined.unwrap_or_else(|error| ExecOutcome::Log(format!("Execution task failed: {error}")));
                    effects.extend(main_view.handle_message(&mut app, Msg::ExecCompleted(Box::new(outcome))));
                    app.executing = !pending_execs.is_empty();
                    if !app.executing {
                        app.throbber_idx = 0;
                    }
                    needs_render = true;
                }

                _ = signal::ctrl_c() => { break; }
            }

            if needs_render {
                render(&mut terminal, &mut app, &mut main_view)?;
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    cleanup_terminal(&mut terminal)?;
    loop_result
}

fn process_effects(
    app: &mut App,
    main_view: &mut MainView,
    effects: Vec<Effect>,
    pending_execs: &mut FuturesUnordered<JoinHandle<ExecOutcome>>,
    effects_out: &mut Vec<Effect>,
) {
    let command_batch = cmd::run_from_effects(app, effects);
    if !command_batch.pending.is_empty() {
        if !app.executing {
            app.throbber_idx = 0;
        }
        pending_execs.extend(command_batch.pending);
        app.executing = true;
    }

    for outcome in command_batch.immediate {
        effects_out.extend(main_view.handle_message(app, Msg::ExecCompleted(Box::new(outcome))));
    }
}
