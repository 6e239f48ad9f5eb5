use std::{
    rc::Rc,
    sync::{Arc, Mutex, mpsc},
    time::{Duration, Instant},
};

use anyhow::Result;
use ratatui::DefaultTerminal;

use scrubline::{
    app::state::App,
    config,
    events::types::AppEvent,
    input,
    player::{self, PlayerCommand, PlayerHandle, PlayerSnapshot},
    ui::{self, theme::Theme},
};

fn main() -> Result<()> {
    let config = config::load_or_create_config()?;
    let log_path = config::logging::init(config.log_level()?)?;
    tracing::info!("logging to {}", log_path.display());

    let theme = Theme::from_name(config.theme);

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>();
    let (player_cmd_tx, player_cmd_rx) = mpsc::channel::<PlayerCommand>();
    let snapshot = Arc::new(Mutex::new(PlayerSnapshot::default()));

    let _player_handle = player::thread::spawn(
        config.clock_settings(),
        player_cmd_rx,
        event_tx.clone(),
        snapshot.clone(),
    );

    let player = Rc::new(PlayerHandle::new(player_cmd_tx, snapshot));
    let mut app = App::new(&config, theme, player, event_tx.clone())?;
    app.load_clip(0);

    let mut terminal = ratatui::init();
    let _input_handle = input::thread::spawn(event_tx);

    let result = run(&mut terminal, &mut app, &event_rx);
    ratatui::restore();
    result
}

fn run(terminal: &mut DefaultTerminal, app: &mut App, event_rx: &mpsc::Receiver<AppEvent>) -> Result<()> {
    loop {
        app.tick(Instant::now());
        terminal.draw(|f| ui::render::render(f, app))?;

        match event_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(event) => {
                handle_event(app, event);
                while let Ok(event) = event_rx.try_recv() {
                    handle_event(app, event);
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {}
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("event channel disconnected");
                break;
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Input(key_event) => app.handle_input(key_event),
        AppEvent::Mouse(mouse_event) => app.handle_mouse(mouse_event),
        AppEvent::Resize(_width, _height) => {}
        AppEvent::FocusLost => app.on_focus_lost(),
        AppEvent::FocusGained => app.on_focus_gained(),
        AppEvent::Player(player_event) => app.on_player_event(player_event),
        AppEvent::Host(host_event) => app.on_host_event(host_event),
    }
}
