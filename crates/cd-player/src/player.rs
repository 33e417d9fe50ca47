//! CD player controller.
//!
//! Ties the power sequencer, the DSA transport and the disc state together
//! and is driven entirely from [`CdPlayer::tick`]. User requests that need
//! the mechanism go through the action queue and are dispatched only while
//! no command is in flight, so at most one instruction is ever awaiting its
//! response. [`CdPlayer::stop`] is the exception: it bypasses the queue.

use core::fmt::{self, Write};

use dsa::{DsaError, DsaStatus, ErrorCode, FoundKind, Message, Opcode, Response, Transport};
use embassy_time::Instant;
use heapless::String;
use platform::config::ERROR_DISPLAY_TIMEOUT_MS;
use platform::{RelayDriver, TimerSlot, TimerSlots, Tracked};

use crate::action_queue::{ActionQueue, ActionType, QueuedAction};
use crate::command::{AsyncCommand, ResponseHandler};
use crate::config::{BUSY_GLYPHS, BUSY_GLYPH_SHIFT, NOTICE_LEN, STATUS_LEN};
use crate::disc::{Actual, DiscState, Motion, Toc, TocField};
use crate::power::{PowerSequencer, PowerState};

/// Rendered front-panel status line.
pub type StatusLine = String<STATUS_LEN>;

/// Controller for one CDPro2 mechanism.
pub struct CdPlayer<T: Transport, R: RelayDriver> {
    transport: T,
    power: PowerSequencer<R>,
    timers: TimerSlots,
    disc_state: DiscState,
    toc: Toc,
    actual: Actual,
    queued_actions: ActionQueue,
    async_command: Option<AsyncCommand>,
    lid_open: Tracked<bool>,
    notice: String<NOTICE_LEN>,
    animation: u8,
}

impl<T: Transport, R: RelayDriver> CdPlayer<T, R> {
    /// Controller with the mechanism powered off.
    pub fn new(transport: T, relays: R) -> Self {
        Self {
            transport,
            power: PowerSequencer::new(relays),
            timers: TimerSlots::new(),
            disc_state: DiscState::EMPTY,
            toc: Toc::new(),
            actual: Actual::default(),
            queued_actions: ActionQueue::new(),
            async_command: None,
            lid_open: Tracked::new(false),
            notice: String::new(),
            animation: 0,
        }
    }

    /// Release the relays and put the DSA lines into their idle state.
    pub fn init(&mut self) -> Result<(), DsaError> {
        self.power.init();
        self.transport.init()
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    /// `true` when the mechanism is fully powered.
    pub fn powered(&self) -> bool {
        self.power.is_on()
    }

    /// Supply state.
    pub fn power_state(&self) -> PowerState {
        self.power.state()
    }

    /// Loaded flag and motion.
    pub fn disc_state(&self) -> DiscState {
        self.disc_state
    }

    /// Table of contents as read so far.
    pub fn toc(&self) -> &Toc {
        &self.toc
    }

    /// Latest now-playing position.
    pub fn actual(&self) -> &Actual {
        &self.actual
    }

    /// The command awaiting a response, if any.
    pub fn async_command(&self) -> Option<&AsyncCommand> {
        self.async_command.as_ref()
    }

    /// Number of user actions waiting for dispatch.
    pub fn queued_actions(&self) -> usize {
        self.queued_actions.len()
    }

    /// Last reported lid position.
    pub fn lid_open(&self) -> bool {
        self.lid_open.get()
    }

    /// The transport (test inspection).
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable transport (test scripting).
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// The relay driver.
    pub fn relays(&self) -> &R {
        self.power.relays()
    }

    // ── User controls ───────────────────────────────────────────────────────

    /// Start powering up when off, or down when on.
    ///
    /// Ignored while a sequence is running, and power-up is refused while
    /// the lid is open.
    pub fn toggle_power(&mut self) {
        match self.power.state() {
            PowerState::On => {
                #[cfg(feature = "defmt")]
                defmt::info!("CD: power off");
                self.stop_immediate();
                self.queued_actions.clear();
                self.end_async_command();
                self.reset_disc();
                let step = self.power.begin_power_down();
                self.timers.arm(TimerSlot::CdPower, step.timeout_ms);
            }
            PowerState::Off if self.lid_open.get() => {
                #[cfg(feature = "defmt")]
                defmt::warn!("CD: lid open, power on refused");
            }
            PowerState::Off => {
                #[cfg(feature = "defmt")]
                defmt::info!("CD: power on");
                let step = self.power.begin_power_up();
                self.timers.arm(TimerSlot::CdPower, step.timeout_ms);
            }
            PowerState::PoweringUp | PowerState::PoweringDown => {
                #[cfg(feature = "defmt")]
                defmt::debug!("CD: power sequence in progress");
            }
        }
    }

    /// Queue a play request.
    pub fn play(&mut self) {
        self.queue_action(QueuedAction::new(ActionType::Play));
    }

    /// Queue a pause/resume request.
    pub fn pause(&mut self) {
        self.queue_action(QueuedAction::new(ActionType::Pause));
    }

    /// Queue a skip forward.
    pub fn next_title(&mut self) {
        self.queue_action(QueuedAction::new(ActionType::NextTitle));
    }

    /// Queue a skip back.
    pub fn prev_title(&mut self) {
        self.queue_action(QueuedAction::new(ActionType::PrevTitle));
    }

    /// Stop now, dropping any queued actions.
    ///
    /// The disc state is set to stopped before the instruction is sent and
    /// does not depend on the transfer succeeding.
    pub fn stop(&mut self) {
        if !self.powered() {
            return;
        }
        self.queued_actions.clear();
        self.stop_immediate();
    }

    /// Forget the current disc and read the TOC again.
    ///
    /// Ignored while another command is awaiting its response.
    pub fn read_toc(&mut self) {
        if let Some(_busy) = self.async_command {
            #[cfg(feature = "defmt")]
            defmt::debug!("CD: {} in flight, TOC request ignored", _busy.opcode);
            return;
        }
        self.restart_toc();
    }

    /// Send an arbitrary message, bypassing the queue. `None` while unpowered.
    pub fn transmit_raw(&mut self, message: Message) -> Option<DsaStatus> {
        if !self.powered() {
            return None;
        }
        Some(self.send(message))
    }

    /// Record the lid sensor. Changes are acted on by the next tick.
    pub fn set_lid_open(&mut self, open: bool) {
        self.lid_open.set(open);
    }

    // ── Main loop ───────────────────────────────────────────────────────────

    /// Run one main-loop iteration.
    pub fn tick(&mut self, now: Instant) {
        self.timers.tick(now);
        if self.timers.elapsed(TimerSlot::CdError) {
            self.timers.reset(TimerSlot::CdError);
            self.notice.clear();
        }

        self.poll_lid();

        if self.powered() {
            self.poll_transport();
            self.dispatch_queued_actions();
        } else if self.power.in_progress() && self.timers.elapsed(TimerSlot::CdPower) {
            self.timers.reset(TimerSlot::CdPower);
            let step = self.power.step();
            self.timers.arm(TimerSlot::CdPower, step.timeout_ms);
            if step.state == PowerState::On {
                self.animation = 0;
                self.restart_toc();
            }
        }

        self.animation = self.animation.wrapping_add(1);
    }

    /// Render the front-panel status line.
    ///
    /// Layout: busy glyph, four flags (`L`/`?` loaded, `S`/`_` stopped,
    /// `P`/`_` playing, `Z`/`_` paused), a space, then free text.
    pub fn status(&self) -> StatusLine {
        let mut line = StatusLine::new();
        // Overlong text is truncated.
        let _ = self.write_status(&mut line);
        line
    }

    fn write_status<W: Write>(&self, out: &mut W) -> fmt::Result {
        if !self.powered() {
            return out.write_str("OFF");
        }

        let glyph = if self.async_command.is_some() {
            usize::from(self.animation.wrapping_shr(BUSY_GLYPH_SHIFT))
                .checked_rem(BUSY_GLYPHS.len())
                .and_then(|i| BUSY_GLYPHS.get(i).copied())
                .unwrap_or(' ')
        } else {
            ' '
        };
        let flag = |set: bool, c: char, unset: char| if set { c } else { unset };
        let d = &self.disc_state;
        write!(
            out,
            "{}{}{}{}{} ",
            glyph,
            flag(d.loaded(), 'L', '?'),
            flag(d.stopped(), 'S', '_'),
            flag(d.playing(), 'P', '_'),
            flag(d.paused(), 'Z', '_'),
        )?;

        if self.lid_open.get() {
            out.write_str("OPEN")
        } else if !self.notice.is_empty() {
            out.write_str(&self.notice)
        } else if d.playing() || d.paused() {
            let a = &self.actual;
            write!(out, "{}({}) {:3}:{:02}", a.title, a.index, a.minutes, a.seconds)
        } else if self.toc.valid() {
            write!(
                out,
                "{:2} {}:{:02}",
                self.toc.num_tracks(),
                self.toc.minutes(),
                self.toc.seconds()
            )
        } else if matches!(self.async_command, Some(c) if c.opcode == Opcode::ReadToc) {
            out.write_str("READ TOC...")
        } else {
            out.write_str("NO DISC")
        }
    }

    // ── Internals ───────────────────────────────────────────────────────────

    fn queue_action(&mut self, action: QueuedAction) {
        if !self.powered() || self.lid_open.get() {
            return;
        }
        if self.queued_actions.push(action).is_err() {
            #[cfg(feature = "defmt")]
            defmt::warn!("CD: action queue full, dropped {}", action);
        }
    }

    fn poll_lid(&mut self) {
        if !self.lid_open.dirty() {
            return;
        }
        self.lid_open.clear();
        let open = self.lid_open.get();
        #[cfg(feature = "defmt")]
        defmt::info!("CD: lid {}", if open { "open" } else { "closed" });

        if !self.powered() {
            return;
        }
        if open {
            self.stop();
            self.reset_disc();
        } else {
            self.restart_toc();
        }
    }

    fn poll_transport(&mut self) {
        if !self.transport.transmit_requested() {
            return;
        }
        match self.transport.receive() {
            Ok(message) => self.handle_response(message),
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("CD: RX {}", DsaStatus::from(_err).as_str());
            }
        }
    }

    fn dispatch_queued_actions(&mut self) {
        while self.async_command.is_none() {
            let Some(action) = self.queued_actions.pop() else {
                break;
            };
            self.dispatch_action(action);
        }
    }

    fn dispatch_action(&mut self, action: QueuedAction) {
        #[cfg(feature = "defmt")]
        defmt::debug!("CD: dispatch {}", action);

        let d = self.disc_state;
        match action.action_type {
            ActionType::Play => {
                if !d.loaded() {
                    self.restart_toc();
                } else if d.paused() {
                    self.start_async_command(Opcode::PauseRelease, 0, ResponseHandler::Play);
                } else if d.stopped() {
                    let title = match action.param {
                        0 => self.toc.min_track(),
                        title => title,
                    };
                    self.start_async_command(Opcode::PlayTitle, title, ResponseHandler::Play);
                }
            }
            ActionType::Pause => {
                if d.playing() {
                    self.start_async_command(Opcode::Pause, 0, ResponseHandler::Pause);
                } else if d.paused() {
                    self.start_async_command(Opcode::PauseRelease, 0, ResponseHandler::Play);
                }
            }
            ActionType::NextTitle | ActionType::PrevTitle => {
                let forward = action.action_type == ActionType::NextTitle;
                if let Some(title) = self.adjacent_title(forward) {
                    self.start_async_command(Opcode::PlayTitle, title, ResponseHandler::Play);
                }
            }
        }
    }

    /// Title to skip to. Skipping back from the first title restarts it;
    /// skipping forward from the last does nothing.
    fn adjacent_title(&self, forward: bool) -> Option<u8> {
        if !self.disc_state.loaded() {
            return None;
        }
        let (min, max) = (self.toc.min_track(), self.toc.max_track());
        let current = if (min..=max).contains(&self.actual.title) {
            self.actual.title
        } else {
            min
        };
        if forward {
            (current < max).then(|| current.saturating_add(1))
        } else {
            Some(current.saturating_sub(1).max(min))
        }
    }

    /// Reset the disc and start READ_TOC, replacing any command in flight.
    /// Used where the disc may have changed under the mechanism.
    fn restart_toc(&mut self) {
        if !self.powered() || self.lid_open.get() {
            return;
        }
        self.reset_disc();
        self.start_async_command(Opcode::ReadToc, 0, ResponseHandler::ReadToc);
    }

    fn reset_disc(&mut self) {
        self.disc_state.reset();
        self.toc.reset();
        self.actual.reset();
    }

    fn stop_immediate(&mut self) {
        self.disc_state.set_motion(Motion::Stopped);
        self.actual.reset();
        self.send(Opcode::Stop.message(0));
    }

    /// Transmit one message; failures are shown on the status line for a
    /// while. No retry.
    fn send(&mut self, message: Message) -> DsaStatus {
        let status = DsaStatus::from(&self.transport.transmit(message));
        #[cfg(feature = "defmt")]
        defmt::debug!("TX {=u16:04X} {}", message.raw(), status.as_str());
        if !status.is_ok() {
            self.set_notice(format_args!("TX {message:04X} {status}"), true);
        }
        status
    }

    fn start_async_command(&mut self, opcode: Opcode, param: u8, handler: ResponseHandler) {
        if let Some(_previous) = self.async_command {
            #[cfg(feature = "defmt")]
            defmt::debug!("CD: {} replaces {}", opcode, _previous.opcode);
        }
        self.notice.clear();
        let dsa_status = self.send(opcode.message(param));
        self.async_command = Some(AsyncCommand {
            opcode,
            param,
            handler,
            dsa_status,
        });
    }

    fn end_async_command(&mut self) {
        if let Some(_command) = self.async_command.take() {
            #[cfg(feature = "defmt")]
            defmt::debug!("CD: {} done", _command.opcode);
        }
    }

    fn set_notice(&mut self, text: fmt::Arguments<'_>, transient: bool) {
        self.notice.clear();
        // Overlong text is truncated.
        let _ = self.notice.write_fmt(text);
        if transient {
            self.timers.arm(TimerSlot::CdError, ERROR_DISPLAY_TIMEOUT_MS);
        } else {
            self.timers.reset(TimerSlot::CdError);
        }
    }

    // ── Response routing ────────────────────────────────────────────────────

    fn handle_response(&mut self, message: Message) {
        let param = message.data();
        let response = match Response::of(message) {
            Ok(response) => response,
            Err(_code) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("RX DSA {=u8:02x}:{=u8:02x}", _code, param);
                return;
            }
        };

        match response {
            Response::Found => {
                self.set_found(param);
                self.forward_response(response, param);
            }
            Response::Stopped => {
                self.disc_state.set_motion(Motion::Stopped);
                self.end_async_command();
            }
            Response::ErrorValues => self.handle_error(param),
            Response::ActualTitle
            | Response::ActualIndex
            | Response::ActualMinutes
            | Response::ActualSeconds => {
                self.actual.update(response, param);
            }
            _ => self.forward_response(response, param),
        }
    }

    fn set_found(&mut self, param: u8) {
        match FoundKind::try_from(param) {
            Ok(FoundKind::Pause) => self.disc_state.set_motion(Motion::Paused),
            Ok(FoundKind::PauseRelease) => {
                if self.disc_state.paused() {
                    self.disc_state.set_motion(Motion::Playing);
                }
            }
            Ok(_kind) => {
                #[cfg(feature = "defmt")]
                defmt::trace!("CD: found {}", _kind);
            }
            Err(_raw) => {
                #[cfg(feature = "defmt")]
                defmt::debug!("CD: found {=u8:02x}", _raw);
            }
        }
    }

    fn handle_error(&mut self, param: u8) {
        match ErrorCode::try_from(param) {
            Ok(ErrorCode::NoDisc) => {
                #[cfg(feature = "defmt")]
                defmt::info!("CD: no disc");
                self.reset_disc();
                self.set_notice(format_args!("NO DISC"), false);
                self.end_async_command();
            }
            _ => {
                #[cfg(feature = "defmt")]
                defmt::warn!("CD: error {=u8:02x}", param);
                self.set_notice(format_args!("ERR {param:02X}"), false);
                self.forward_response(Response::ErrorValues, param);
                self.end_async_command();
            }
        }
    }

    fn forward_response(&mut self, response: Response, param: u8) {
        let Some(command) = self.async_command else {
            #[cfg(feature = "defmt")]
            defmt::trace!("CD: unsolicited {}", response);
            return;
        };
        match command.handler {
            ResponseHandler::Play => self.handle_response_play(response),
            ResponseHandler::Pause => self.handle_response_pause(response),
            ResponseHandler::ReadToc => self.handle_response_read_toc(response, param),
        }
    }

    fn handle_response_play(&mut self, response: Response) {
        if response == Response::Found {
            self.disc_state.set_motion(Motion::Playing);
            self.end_async_command();
        }
    }

    fn handle_response_pause(&mut self, response: Response) {
        if response == Response::Found {
            self.end_async_command();
        }
    }

    fn handle_response_read_toc(&mut self, response: Response, param: u8) {
        let Some(field) = TocField::from_response(response) else {
            return;
        };
        self.toc.set(field, param);
        if self.toc.valid() {
            #[cfg(feature = "defmt")]
            defmt::info!("CD: TOC {} tracks", self.toc.num_tracks());
            self.disc_state.set_loaded(true);
            self.end_async_command();
            // The mechanism parks paused at the first track after a TOC read.
            self.start_async_command(Opcode::PlayTitle, self.toc.min_track(), ResponseHandler::Play);
        }
    }
}
