//! Save/reset workflow behind the server settings screen.
//!
//! The screen never renders anything itself. A front end feeds it user
//! actions, runs the probe it asks for, and draws whatever [`ScreenState`]
//! says.

use log::{debug, info, warn};

use crate::happy::{
    ErrorKind, KeyValueStore, Prober, ServerConfig, ServerUrlError, StoreError, validate_syntax,
};

/// Action waiting for the user's yes/no.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    Save(String),
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScreenState {
    Idle { error: Option<ErrorKind> },
    Probing { url: String },
    ConfirmPending(Confirmation),
}

/// Ticket for one probe. Results carrying an outdated ticket are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    url: String,
    generation: u64,
}

impl ProbeRequest {
    pub fn url(&self) -> &str {
        &self.url
    }
}

pub struct SettingsScreen<S> {
    config: ServerConfig<S>,
    input: String,
    state: ScreenState,
    generation: u64,
}

impl<S: KeyValueStore> SettingsScreen<S> {
    /// Opens the screen, pre-filling the field only when a custom server is in use.
    pub fn new(config: ServerConfig<S>) -> Self {
        let input = if config.is_using_custom_server() {
            config.effective_url()
        } else {
            String::new()
        };

        Self {
            config,
            input,
            state: ScreenState::Idle { error: None },
            generation: 0,
        }
    }

    pub fn config(&self) -> &ServerConfig<S> {
        &self.config
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Edits the URL field. Any error on display is cleared. The field is
    /// read-only while a probe is outstanding.
    pub fn set_input(&mut self, text: impl Into<String>) {
        if self.is_busy() {
            debug!("Ignoring edit while probing");
            return;
        }

        self.input = text.into();
        if let ScreenState::Idle { error } = &mut self.state {
            *error = None;
        }
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    pub fn error(&self) -> Option<ErrorKind> {
        match self.state {
            ScreenState::Idle { error } => error,
            _ => None,
        }
    }

    /// True while a probe is outstanding; the save action must be disabled.
    pub fn is_busy(&self) -> bool {
        matches!(self.state, ScreenState::Probing { .. })
    }

    pub fn is_using_custom_server(&self) -> bool {
        self.config.is_using_custom_server()
    }

    /// Starts saving `candidate`.
    ///
    /// Returns the probe to run when the URL is syntactically valid. Returns
    /// `None` when validation failed (the error is now on display) or when the
    /// screen is not idle.
    pub fn submit(&mut self, candidate: impl Into<String>) -> Option<ProbeRequest> {
        if !matches!(self.state, ScreenState::Idle { .. }) {
            warn!("Ignoring submit while screen is {:?}", self.state);
            return None;
        }

        self.input = candidate.into();
        debug!("Submitting server URL {:?}", self.input);

        if let Err(e) = validate_syntax(&self.input) {
            info!("Server URL rejected: {}", e);
            self.state = ScreenState::Idle {
                error: Some(e.kind()),
            };
            return None;
        }

        self.generation += 1;
        let url = self.input.trim().to_string();
        self.state = ScreenState::Probing { url: url.clone() };

        Some(ProbeRequest {
            url,
            generation: self.generation,
        })
    }

    /// Applies a probe result. Returns false when the result was stale and ignored.
    pub fn probe_finished(
        &mut self,
        request: ProbeRequest,
        outcome: Result<(), ServerUrlError>,
    ) -> bool {
        let current = matches!(
            &self.state,
            ScreenState::Probing { url } if *url == request.url
        );
        if request.generation != self.generation || !current {
            debug!("Dropping stale probe result for {}", request.url);
            return false;
        }

        self.state = match outcome {
            Ok(()) => ScreenState::ConfirmPending(Confirmation::Save(request.url)),
            Err(e) => {
                warn!("Server check for {} failed: {}", request.url, e);
                ScreenState::Idle {
                    error: Some(e.kind()),
                }
            }
        };
        true
    }

    /// Validates, probes and, on success, leaves the screen waiting for confirmation.
    ///
    /// Returns true when a confirmation is now pending.
    pub async fn save(&mut self, candidate: impl Into<String>, prober: &Prober) -> bool {
        let Some(request) = self.submit(candidate) else {
            return false;
        };

        let outcome = prober.probe(request.url()).await;
        self.probe_finished(request, outcome);
        matches!(self.state, ScreenState::ConfirmPending(_))
    }

    /// Asks to clear the override. Only possible from idle.
    pub fn request_reset(&mut self) -> bool {
        if !matches!(self.state, ScreenState::Idle { .. }) {
            warn!("Ignoring reset request while screen is {:?}", self.state);
            return false;
        }

        self.state = ScreenState::ConfirmPending(Confirmation::Reset);
        true
    }

    /// Carries out the pending action, then returns to idle.
    ///
    /// A failed write still returns the screen to idle and is handed back to
    /// the caller.
    pub fn confirm(&mut self) -> Result<(), StoreError> {
        let confirmation = match std::mem::replace(&mut self.state, ScreenState::Idle { error: None }) {
            ScreenState::ConfirmPending(confirmation) => confirmation,
            other => {
                debug!("Nothing to confirm");
                self.state = other;
                return Ok(());
            }
        };

        match confirmation {
            Confirmation::Save(url) => self.config.set_custom_url(Some(&url)),
            Confirmation::Reset => {
                self.config.set_custom_url(None)?;
                self.input.clear();
                Ok(())
            }
        }
    }

    pub fn decline(&mut self) {
        if let ScreenState::ConfirmPending(confirmation) = &self.state {
            info!("User declined {:?}", confirmation);
            self.state = ScreenState::Idle { error: None };
        }
    }

    /// The user navigated away. A probe still in flight will be ignored.
    pub fn leave(&mut self) {
        self.generation += 1;
        self.state = ScreenState::Idle { error: None };
    }
}
