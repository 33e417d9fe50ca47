//! Main-loop glue between the panel inputs and the player.
//!
//! One [`Frontend::poll`] per loop iteration: feed the lid sensor, turn a
//! power button press into [`UserCommand::Power`], tick the player and
//! re-render the panel row if it changed.

use cd_player::CdPlayer;
use dsa::Transport;
use embassy_time::Instant;
use platform::{RelayDriver, Tracked};

use crate::command::UserCommand;
use crate::panel::{panel_line, PanelLine};

/// Player plus the front-panel state around it.
pub struct Frontend<T: Transport, R: RelayDriver> {
    player: CdPlayer<T, R>,
    power_button: Tracked<bool>,
    panel: PanelLine,
}

impl<T: Transport, R: RelayDriver> Frontend<T, R> {
    /// Wrap an initialised player.
    pub fn new(player: CdPlayer<T, R>) -> Self {
        Self {
            player,
            power_button: Tracked::new(false),
            panel: PanelLine::new(),
        }
    }

    /// The player.
    pub fn player(&self) -> &CdPlayer<T, R> {
        &self.player
    }

    /// The player, mutably (console and IR dispatch).
    pub fn player_mut(&mut self) -> &mut CdPlayer<T, R> {
        &mut self.player
    }

    /// Last rendered panel row.
    pub fn panel(&self) -> &str {
        &self.panel
    }

    /// Dispatch a user command.
    pub fn handle(&mut self, command: UserCommand) {
        if let Some(_status) = command.apply(&mut self.player) {
            #[cfg(feature = "defmt")]
            defmt::info!("raw TX {}", _status.as_str());
        }
    }

    /// Run one loop iteration.
    ///
    /// `power_pressed` is the debounced button level; the command fires on
    /// the press edge only. Returns `true` when the panel row changed.
    pub fn poll(&mut self, now: Instant, lid_open: bool, power_pressed: bool) -> bool {
        self.power_button.set(power_pressed);
        if self.power_button.dirty() {
            self.power_button.clear();
            if power_pressed {
                self.handle(UserCommand::Power);
            }
        }

        self.player.set_lid_open(lid_open);
        self.player.tick(now);

        let line = panel_line(&self.player.status());
        if line == self.panel {
            return false;
        }
        self.panel = line;
        #[cfg(feature = "defmt")]
        defmt::debug!("panel [{=str}]", self.panel.as_str());
        true
    }
}
