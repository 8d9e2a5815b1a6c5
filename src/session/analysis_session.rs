use tracing::debug;

use crate::error::{PredictError, SessionError};
use crate::predict::Verdict;
use crate::session::{Phase, SelectedImage};

/// Everything a caller needs to issue the predictor call minted by
/// [`AnalysisSession::begin_analysis`]. The token ties the eventual outcome
/// back to this attempt.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub token: u64,
    pub image: SelectedImage,
}

/// What [`AnalysisSession::apply_outcome`] did with a finished call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Completed,
    Failed,
    /// The session was cleared or given a new image while the call was in
    /// flight; the outcome was discarded.
    Stale,
}

/// Lifecycle of one image analysis attempt.
///
/// Holds no I/O: the owner issues the predictor call for a minted
/// [`AnalysisRequest`] and feeds the outcome back in. Outcomes whose token
/// no longer matches the in-flight one are dropped, so a response racing a
/// clear or a reselect can never land on the wrong image.
pub struct AnalysisSession {
    image: Option<SelectedImage>,
    phase: Phase,
    result: Option<Verdict>,
    error: Option<String>,
    next_token: u64,
    inflight: Option<u64>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self {
            image: None,
            phase: Phase::Idle,
            result: None,
            error: None,
            next_token: 0,
            inflight: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn image(&self) -> Option<&SelectedImage> {
        self.image.as_ref()
    }

    pub fn result(&self) -> Option<&Verdict> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Replaces the selection and rewinds the session to `Idle`, dropping
    /// any previous result or error. Returns the replaced image so the
    /// rendering layer can release its preview resource.
    pub fn select_image(&mut self, image: SelectedImage) -> Option<SelectedImage> {
        debug!(image = %image.id(), filename = %image.filename(), "image selected");
        self.phase = Phase::Idle;
        self.result = None;
        self.error = None;
        self.inflight = None;
        self.image.replace(image)
    }

    /// Resets every field. Rejected while a call is in flight; the in-flight
    /// guard is the phase, not a queue. Returns the released image, if any,
    /// for preview cleanup.
    pub fn clear(&mut self) -> Result<Option<SelectedImage>, SessionError> {
        if self.phase == Phase::Analyzing {
            return Err(SessionError::AnalysisInFlight);
        }
        self.phase = Phase::Idle;
        self.result = None;
        self.error = None;
        self.inflight = None;
        Ok(self.image.take())
    }

    /// Moves `Idle` (with an image) to `Analyzing` and mints the request the
    /// caller must run. Exactly one call may be in flight per session.
    pub fn begin_analysis(&mut self) -> Result<AnalysisRequest, SessionError> {
        match self.phase {
            Phase::Analyzing => return Err(SessionError::AnalysisInFlight),
            Phase::Completed | Phase::Failed => return Err(SessionError::NotIdle),
            Phase::Idle => {}
        }
        let image = self.image.clone().ok_or(SessionError::NoImage)?;
        self.next_token += 1;
        let token = self.next_token;
        self.inflight = Some(token);
        self.phase = Phase::Analyzing;
        debug!(token, image = %image.id(), "analysis started");
        Ok(AnalysisRequest { token, image })
    }

    /// Applies a finished predictor call. Stale tokens leave the session
    /// untouched.
    pub fn apply_outcome(
        &mut self,
        token: u64,
        outcome: Result<Verdict, PredictError>,
    ) -> Applied {
        if self.inflight != Some(token) {
            debug!(token, "discarding stale analysis outcome");
            return Applied::Stale;
        }
        self.inflight = None;
        match outcome {
            Ok(verdict) => {
                self.result = Some(verdict);
                self.error = None;
                self.phase = Phase::Completed;
                Applied::Completed
            }
            Err(error) => {
                self.result = None;
                self.error = Some(error.user_message());
                self.phase = Phase::Failed;
                Applied::Failed
            }
        }
    }
}

impl Default for AnalysisSession {
    fn default() -> Self {
        Self::new()
    }
}
