use crossterm::event::{KeyEvent, MouseEvent};

use crate::player::{PlayerError, PlayerEvent};

#[derive(Debug, Clone)]
pub enum AppEvent {
    // From input thread
    Input(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    FocusLost,
    FocusGained,

    // From player thread
    Player(PlayerEvent),

    // From overlay callbacks
    Host(HostEvent),
}

/// Requests the controls overlay makes of the host application.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    NextPressed,
    PreviousPressed,
    NewVideo,
    Finished,
    PlayerError(PlayerError),
}
