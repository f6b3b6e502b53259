//! Main chat loop orchestration.
//!
//! Input and replies are multiplexed with `tokio::select!`: each accepted
//! message is gated and numbered on this task, then its round trip runs on
//! a spawned task and reports back over a channel. Replies are released
//! through a `ReplySequencer` in the configured order. Whenever the gate
//! asks for a login, the next lines are read as a cédula (or `/guest`) and
//! the refused message is sent once the login succeeds.

use std::fmt::Display;
use std::io::Write;
use std::sync::Arc;

use console::style;
use tokio::sync::mpsc;
use tracing::{debug, info};

use urna_core::chat::sequencer::ReplySequencer;
use urna_types::chat::ChatReply;
use urna_types::error::{RepositoryError, SendError};
use urna_types::identity::SessionIdentity;
use urna_types::session::{SessionCheck, SessionState};

use crate::cli::messages;
use crate::cli::status::format_remaining;
use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};
use super::renderer::ChatRenderer;

type TurnOutcome = Result<ChatReply, SendError>;

/// What the next input line means.
#[derive(Debug, PartialEq)]
enum Mode {
    Chatting,
    /// Reading a cédula. `deferred` is sent once the login succeeds.
    AwaitingLogin { deferred: Option<String> },
}

#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    ClearScreen,
    Exit,
}

fn prompt_for(mode: &Mode, pending: usize) -> String {
    let label = match mode {
        Mode::Chatting => "Tú >",
        Mode::AwaitingLogin { .. } => "Cédula >",
    };
    let label = style(label).green().bold();

    match pending {
        0 => format!("  {label} "),
        1 => format!("  {} {label} ", style("(1 pendiente)").dim()),
        n => format!("  {} {label} ", style(format!("({n} pendientes)")).dim()),
    }
}

const LOGIN_HINT: &str = "Ingrese su cédula, o /guest para continuar como invitado.";

struct ChatLoop<'a, W: Write> {
    state: &'a AppState,
    renderer: ChatRenderer,
    out: W,
    tx: mpsc::UnboundedSender<(u64, TurnOutcome)>,
    sequencer: ReplySequencer<TurnOutcome>,
    pending: usize,
    mode: Mode,
}

impl<W: Write> ChatLoop<'_, W> {
    fn prompt(&self) -> String {
        prompt_for(&self.mode, self.pending)
    }

    fn say(&mut self, text: impl Display) -> std::io::Result<()> {
        writeln!(self.out, "  {text}")
    }

    fn warn(&mut self, text: impl Display) -> std::io::Result<()> {
        writeln!(self.out, "  {} {text}", style("!").yellow().bold())
    }

    /// Every failure past start-up is reported inline; only terminal I/O
    /// errors end the loop.
    async fn handle_line(&mut self, text: String) -> anyhow::Result<Flow> {
        let state = self.state;
        if let Some(cmd) = commands::parse(&text) {
            match cmd {
                ChatCommand::Help => {
                    let help = commands::help_text();
                    write!(self.out, "{help}")?;
                }
                ChatCommand::Clear => return Ok(Flow::ClearScreen),
                ChatCommand::Exit => return Ok(Flow::Exit),
                ChatCommand::WhoAmI => self.whoami().await?,
                ChatCommand::Logout => match state.controller().logout().await {
                    Ok(()) => {
                        self.mode = Mode::AwaitingLogin { deferred: None };
                        self.say(style("Sesión cerrada.").dim())?;
                        self.say(LOGIN_HINT)?;
                    }
                    Err(e) => self.warn(messages::storage_error(&e))?,
                },
                ChatCommand::Guest => match state.controller().login_as_guest().await {
                    Ok(()) => {
                        self.say(format!(
                            "{} Sesión iniciada como invitado.",
                            style("✓").green().bold()
                        ))?;
                        self.enter_chat().await?;
                    }
                    Err(e) => self.warn(messages::storage_error(&e))?,
                },
                ChatCommand::Unknown(name) => {
                    self.warn(format!(
                        "Comando desconocido: {}. Escriba /help para ver los comandos.",
                        style(name).dim()
                    ))?;
                }
            }
            return Ok(Flow::Continue);
        }

        match self.mode {
            Mode::Chatting if text.is_empty() => {}
            Mode::Chatting => self.submit(text).await?,
            Mode::AwaitingLogin { .. } => self.attempt_login(&text).await?,
        }
        Ok(Flow::Continue)
    }

    /// Gate and number the turn here, then hand the round trip to a task.
    async fn submit(&mut self, text: String) -> anyhow::Result<()> {
        let state = self.state;
        match state.conversation.prepare_turn(&text).await {
            Ok(turn) => {
                let conversation = Arc::clone(&state.conversation);
                let tx = self.tx.clone();
                debug!(seq = turn.seq, "Turn dispatched");
                tokio::spawn(async move {
                    let outcome = conversation.send_turn(&turn).await;
                    let _ = tx.send((turn.seq, outcome));
                });
                self.pending += 1;
            }
            Err(SendError::ReauthRequired(reason)) => {
                info!(%reason, "Login required before sending");
                self.warn(messages::reauth(reason))?;
                self.say(LOGIN_HINT)?;
                self.mode = Mode::AwaitingLogin {
                    deferred: Some(text),
                };
            }
            Err(SendError::EmptyUtterance) => {}
            Err(e) => self.warn(messages::send_error(&e))?,
        }
        Ok(())
    }

    async fn attempt_login(&mut self, candidate: &str) -> anyhow::Result<()> {
        self.say(style(messages::VERIFYING).dim())?;

        let state = self.state;
        match state.controller().login_with_id(candidate).await {
            Ok(identity) => {
                let summary = identity.summary();
                self.say(format!(
                    "{} Bienvenido, {}",
                    style("✓").green().bold(),
                    style(&summary.nombre).cyan().bold()
                ))?;
                for line in summary.to_string().lines() {
                    self.say(style(line).dim())?;
                }
                self.enter_chat().await?;
            }
            Err(e) => self.warn(messages::login_error(&e))?,
        }
        Ok(())
    }

    /// Switch to chatting and send the message the gate refused, if any.
    async fn enter_chat(&mut self) -> anyhow::Result<()> {
        let previous = std::mem::replace(&mut self.mode, Mode::Chatting);
        if let Mode::AwaitingLogin {
            deferred: Some(text),
        } = previous
        {
            self.submit(text).await?;
        }
        Ok(())
    }

    async fn whoami(&mut self) -> std::io::Result<()> {
        let state = self.state;
        let controller = state.controller();
        let snapshot = async {
            Ok::<_, RepositoryError>((
                controller.state().await?,
                controller.session().await?,
                controller.ttl_remaining().await?,
            ))
        }
        .await;
        let (current, session, remaining) = match snapshot {
            Ok(snapshot) => snapshot,
            Err(e) => return self.warn(messages::storage_error(&e)),
        };

        match (current, session.identity()) {
            (SessionState::Expired, _) => self.say("Su sesión expiró.")?,
            (_, Some(SessionIdentity::Identified(identity))) => {
                for line in identity.summary().to_string().lines() {
                    self.say(line)?;
                }
            }
            (_, Some(SessionIdentity::Guest)) => self.say("Invitado")?,
            (_, None) => self.say("Sin sesión activa.")?,
        }
        if let Some(remaining) = remaining {
            self.say(style(format!("Tiempo restante: {}", format_remaining(remaining))).dim())?;
        }
        Ok(())
    }

    fn deliver(&mut self, seq: u64, outcome: TurnOutcome) -> std::io::Result<()> {
        self.pending = self.pending.saturating_sub(1);

        for outcome in self.sequencer.push(seq, outcome) {
            match outcome {
                Ok(reply) => {
                    let rendered = self.renderer.render(&reply.answer);
                    writeln!(
                        self.out,
                        "\n  {} {}\n",
                        style("Urna >").cyan().bold(),
                        rendered.trim()
                    )?;
                }
                Err(e) => {
                    writeln!(
                        self.out,
                        "\n  {} {}\n",
                        style("!").red().bold(),
                        messages::send_error(&e)
                    )?;
                }
            }
        }
        Ok(())
    }
}

/// Run the interactive chat.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let controller = state.controller();
    controller.open().await?;
    let check = controller.check_session().await?;
    let session = controller.session().await?;

    print_welcome_banner(&state.config.service.base_url, &session.session_id);

    let mode = match &check {
        SessionCheck::Active { summary, .. } => {
            let who = summary
                .as_ref()
                .map(|s| s.nombre.clone())
                .unwrap_or_else(|| "invitado".to_string());
            println!("  Hola, {}. ¿En qué le puedo ayudar?", style(who).cyan());
            println!();
            Mode::Chatting
        }
        SessionCheck::ReauthRequired(reason) => {
            println!("  {} {}", style("!").yellow().bold(), messages::reauth(*reason));
            println!("  {LOGIN_HINT}");
            println!();
            Mode::AwaitingLogin { deferred: None }
        }
    };

    let (tx, mut rx) = mpsc::unbounded_channel::<(u64, TurnOutcome)>();
    let (mut input, out) = ChatInput::new(prompt_for(&mode, 0))
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;

    let mut chat = ChatLoop {
        state,
        renderer: ChatRenderer::new(),
        out,
        tx,
        sequencer: ReplySequencer::new(state.config.chat.reply_order),
        pending: 0,
        mode,
    };

    loop {
        tokio::select! {
            event = input.read_line() => match event {
                InputEvent::Eof => break,
                InputEvent::Interrupted => {
                    chat.say(style("Ctrl+D para salir.").dim())?;
                }
                InputEvent::Message(text) => match chat.handle_line(text).await? {
                    Flow::Exit => break,
                    Flow::ClearScreen => input.clear(),
                    Flow::Continue => {}
                },
            },
            Some((seq, outcome)) = rx.recv() => chat.deliver(seq, outcome)?,
        }
        input.update_prompt(&chat.prompt());
    }

    if chat.pending > 0 {
        info!(pending = chat.pending, "Exiting with turns in flight");
    }
    chat.say(style("Chat terminado.").dim())?;
    input.flush();
    Ok(())
}
