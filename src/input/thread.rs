use crate::events::types::AppEvent;
use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyEventKind,
};
use crossterm::execute;
use std::io::stdout;
use std::{sync::mpsc, thread::JoinHandle};

pub fn spawn(event_tx: mpsc::Sender<AppEvent>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        let _ = execute!(stdout(), EnableMouseCapture, EnableFocusChange);

        loop {
            let event = match event::read() {
                Ok(Event::Key(key_event)) if key_event.kind == KeyEventKind::Press => {
                    AppEvent::Input(key_event)
                }
                Ok(Event::Mouse(mouse_event)) => AppEvent::Mouse(mouse_event),
                Ok(Event::Resize(width, height)) => AppEvent::Resize(width, height),
                Ok(Event::FocusLost) => AppEvent::FocusLost,
                Ok(Event::FocusGained) => AppEvent::FocusGained,
                Ok(_) => continue,
                Err(e) => {
                    tracing::error!("terminal input failed: {}", e);
                    break;
                }
            };

            if event_tx.send(event).is_err() {
                break;
            }
        }

        let _ = execute!(stdout(), DisableMouseCapture, DisableFocusChange);
    })
}
