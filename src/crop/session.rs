// SPDX-License-Identifier: MPL-2.0
//! Crop session state machine.
//!
//! [`CropEngine`] owns the committed crop rectangle of one session and is the
//! only place it changes. Pointer events come in through [`GestureSink`],
//! every proposal goes through the solver, and only solved rectangles are
//! stored. Image decode and bitmap encode may complete asynchronously; both
//! carry a [`SessionTicket`] and are dropped if the session they belong to is
//! gone by the time they finish.

use super::gesture::GestureState;
use super::mapper;
use super::pointer::{GestureSink, PointerEvent, PointerKind};
use super::rasterize;
use super::solver::{self, Constraints};
use crate::config::{EngineSettings, DEGENERATE_EPSILON};
use crate::domain::{Bitmap, CropRect, ImageDisplayMetrics, OutputSpec, Point, SourceRect};
use crate::error::Result;
use crate::media::{self, ImageSource};
use image_rs::RgbaImage;
use std::sync::Arc;

/// Lifecycle of a crop session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No session.
    Idle,
    /// Waiting for the source image to decode.
    Loading,
    /// Image decoded, metrics computed and the initial rectangle set.
    Loaded,
    /// At least one gesture has been accepted.
    Editing,
    /// A bitmap was produced. The session keeps its image for `recrop`.
    Confirmed,
    Cancelled,
    /// The source image failed to load.
    Failed,
}

/// Identifies one session. Async completions holding an old ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionTicket(u64);

/// Size of the host surface the image is shown in, plus the zoom factor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Container {
    pub width: f32,
    pub height: f32,
    pub zoom: f32,
}

impl Container {
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            zoom: 1.0,
        }
    }

    #[must_use]
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    fn metrics_for(&self, image: &RgbaImage) -> ImageDisplayMetrics {
        ImageDisplayMetrics::contain(image.width(), image.height(), self.width, self.height, self.zoom)
    }
}

/// Image decode to run outside the engine; feed the outcome back through
/// [`CropEngine::on_image_loaded`].
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub ticket: SessionTicket,
    pub source: ImageSource,
}

impl LoadRequest {
    /// Decodes on the blocking pool.
    pub async fn run(self) -> LoadOutcome {
        LoadOutcome {
            ticket: self.ticket,
            result: media::load(self.source).await,
        }
    }

    /// Decodes on the calling thread.
    #[must_use]
    pub fn run_blocking(self) -> LoadOutcome {
        LoadOutcome {
            ticket: self.ticket,
            result: media::load_image(&self.source),
        }
    }
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub ticket: SessionTicket,
    pub result: Result<RgbaImage>,
}

/// What the caller learns when a session becomes editable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionHandle {
    pub ticket: SessionTicket,
    pub metrics: ImageDisplayMetrics,
    /// `None` when the image has no usable area; the session is then inert.
    pub crop_rect: Option<CropRect>,
}

/// Raster encode detached from the engine, for running off the event loop.
#[derive(Debug, Clone)]
pub struct EncodeJob {
    pub ticket: SessionTicket,
    pub crop_rect: CropRect,
    pub source_rect: SourceRect,
    spec: OutputSpec,
    image: Arc<RgbaImage>,
}

impl EncodeJob {
    #[must_use]
    pub fn run(self) -> EncodeOutcome {
        let result = rasterize::rasterize(&self.source_rect, &self.spec, &self.image)
            .and_then(|raster| rasterize::encode(&raster, self.spec.encoding, self.spec.background));
        EncodeOutcome {
            ticket: self.ticket,
            crop_rect: self.crop_rect,
            source_rect: self.source_rect,
            result,
        }
    }

    /// Encodes on the blocking pool.
    pub async fn run_async(self) -> EncodeOutcome {
        let ticket = self.ticket;
        let crop_rect = self.crop_rect;
        let source_rect = self.source_rect;
        match tokio::task::spawn_blocking(move || self.run()).await {
            Ok(outcome) => outcome,
            Err(err) => EncodeOutcome {
                ticket,
                crop_rect,
                source_rect,
                result: Err(crate::error::Error::Encode(format!("encoder task failed: {err}"))),
            },
        }
    }
}

#[derive(Debug)]
pub struct EncodeOutcome {
    pub ticket: SessionTicket,
    pub crop_rect: CropRect,
    pub source_rect: SourceRect,
    pub result: Result<Bitmap>,
}

/// Result of a confirmed session.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub bitmap: Bitmap,
    /// Pass back as `previous` on the next `start` to restore this selection.
    pub crop_rect: CropRect,
    pub source_rect: SourceRect,
}

#[derive(Debug, Clone)]
struct PendingStart {
    container: Container,
    spec: OutputSpec,
    previous: Option<CropRect>,
}

#[derive(Debug, Clone)]
struct Session {
    image: Arc<RgbaImage>,
    metrics: ImageDisplayMetrics,
    spec: OutputSpec,
    rect: Option<CropRect>,
    gesture: Option<GestureState>,
    /// Kept in source space so it survives display changes.
    confirmed: Option<SourceRect>,
}

/// Drives one crop session at a time.
#[derive(Debug)]
pub struct CropEngine {
    settings: EngineSettings,
    generation: u64,
    phase: SessionPhase,
    pending: Option<PendingStart>,
    session: Option<Session>,
}

impl Default for CropEngine {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl CropEngine {
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            generation: 0,
            phase: SessionPhase::Idle,
            pending: None,
            session: None,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn ticket(&self) -> SessionTicket {
        SessionTicket(self.generation)
    }

    /// The committed rectangle, if a session with a usable image is open.
    #[must_use]
    pub fn crop_rect(&self) -> Option<CropRect> {
        self.session.as_ref().and_then(|s| s.rect)
    }

    #[must_use]
    pub fn metrics(&self) -> Option<ImageDisplayMetrics> {
        self.session.as_ref().map(|s| s.metrics)
    }

    #[must_use]
    pub fn output_spec(&self) -> Option<OutputSpec> {
        self.session
            .as_ref()
            .map(|s| s.spec)
            .or_else(|| self.pending.as_ref().map(|p| p.spec))
    }

    #[must_use]
    pub fn gesture(&self) -> Option<&GestureState> {
        self.session.as_ref().and_then(|s| s.gesture.as_ref())
    }

    /// Begins a session whose image still has to be decoded.
    ///
    /// Any previous session is discarded and its in-flight work becomes
    /// stale. `previous` seeds the rectangle instead of centering it.
    pub fn start(
        &mut self,
        source: ImageSource,
        container: Container,
        spec: OutputSpec,
        previous: Option<CropRect>,
    ) -> LoadRequest {
        self.reset();
        self.phase = SessionPhase::Loading;
        self.pending = Some(PendingStart {
            container,
            spec,
            previous,
        });
        tracing::info!(source = %source.describe(), ticket = self.generation, "crop session loading");
        LoadRequest {
            ticket: self.ticket(),
            source,
        }
    }

    /// Completes a [`start`](Self::start).
    ///
    /// Returns `Ok(None)` for an outcome that belongs to a session which has
    /// since been cancelled or replaced. A decode failure is returned as
    /// [`Error::ImageLoad`](crate::error::Error::ImageLoad) and leaves the
    /// engine in [`SessionPhase::Failed`].
    pub fn on_image_loaded(&mut self, outcome: LoadOutcome) -> Result<Option<SessionHandle>> {
        if outcome.ticket != self.ticket() || self.phase != SessionPhase::Loading {
            tracing::debug!(ticket = outcome.ticket.0, "discarding stale image load");
            return Ok(None);
        }
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };

        match outcome.result {
            Ok(image) => {
                let metrics = pending.container.metrics_for(&image);
                Ok(Some(self.open(image, metrics, pending.spec, pending.previous)))
            }
            Err(err) => {
                tracing::warn!(error = %err, "crop source failed to load");
                self.phase = SessionPhase::Failed;
                Err(err)
            }
        }
    }

    /// Begins a session on an already decoded image, contain-fitted into
    /// `container`.
    pub fn start_with_image(
        &mut self,
        image: RgbaImage,
        container: Container,
        spec: OutputSpec,
        previous: Option<CropRect>,
    ) -> SessionHandle {
        self.reset();
        let metrics = container.metrics_for(&image);
        self.open(image, metrics, spec, previous)
    }

    /// Begins a session using display metrics measured by the host.
    ///
    /// The natural size is always taken from `image`.
    pub fn start_with_metrics(
        &mut self,
        image: RgbaImage,
        metrics: ImageDisplayMetrics,
        spec: OutputSpec,
        previous: Option<CropRect>,
    ) -> SessionHandle {
        self.reset();
        let metrics = ImageDisplayMetrics {
            natural_width: image.width(),
            natural_height: image.height(),
            ..metrics
        };
        self.open(image, metrics, spec, previous)
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.pending = None;
        self.session = None;
        self.phase = SessionPhase::Idle;
    }

    fn open(
        &mut self,
        image: RgbaImage,
        metrics: ImageDisplayMetrics,
        spec: OutputSpec,
        previous: Option<CropRect>,
    ) -> SessionHandle {
        let rect = self.solve_seed(&metrics, &spec, previous);
        if rect.is_none() {
            tracing::warn!(
                natural_width = metrics.natural_width,
                natural_height = metrics.natural_height,
                "image has no usable display area; session is inert"
            );
        }
        tracing::info!(ticket = self.generation, ?rect, "crop session loaded");

        self.session = Some(Session {
            image: Arc::new(image),
            metrics,
            spec,
            rect,
            gesture: None,
            confirmed: None,
        });
        self.phase = SessionPhase::Loaded;

        SessionHandle {
            ticket: self.ticket(),
            metrics,
            crop_rect: rect,
        }
    }

    fn solve_seed(
        &self,
        metrics: &ImageDisplayMetrics,
        spec: &OutputSpec,
        seed: Option<CropRect>,
    ) -> Option<CropRect> {
        if metrics.is_degenerate(DEGENERATE_EPSILON) {
            return None;
        }
        let constraints = Constraints::new(metrics, spec, &self.settings);
        Some(match seed {
            Some(seed) => solver::fit(&seed, &constraints),
            None => solver::initial_rect(&constraints, self.settings.initial_fraction),
        })
    }

    fn accepts_gestures(&self) -> bool {
        matches!(self.phase, SessionPhase::Loaded | SessionPhase::Editing)
    }

    /// Applies one normalized pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        event.dispatch(self);
    }

    /// Recomputes the metrics after a container resize or zoom change.
    ///
    /// The selection keeps covering the same source region, re-solved
    /// against the new bounds. Any active gesture is dropped.
    ///
    /// While the image is still loading the new container is remembered and
    /// used once the decode completes; `None` is returned in that case.
    pub fn update_display(&mut self, container: Container) -> Option<SessionHandle> {
        if let Some(pending) = self.pending.as_mut() {
            pending.container = container;
            tracing::debug!(zoom = container.zoom, "display updated while loading");
            return None;
        }
        let settings = self.settings;
        let ticket = self.ticket();
        let session = self.session.as_mut()?;
        let metrics = container.metrics_for(&session.image);

        let rescaled = match session.rect {
            Some(rect) if !session.metrics.is_degenerate(DEGENERATE_EPSILON) => {
                let source = mapper::to_source_rect(&rect, &session.metrics);
                Some(mapper::to_display_rect(&source, &metrics))
            }
            _ => None,
        };

        session.gesture = None;
        session.metrics = metrics;
        session.rect = if metrics.is_degenerate(DEGENERATE_EPSILON) {
            None
        } else {
            let constraints = Constraints::new(&metrics, &session.spec, &settings);
            Some(match rescaled {
                Some(rect) => solver::fit(&rect, &constraints),
                None => solver::initial_rect(&constraints, settings.initial_fraction),
            })
        };
        tracing::debug!(zoom = container.zoom, rect = ?session.rect, "display metrics updated");

        Some(SessionHandle {
            ticket,
            metrics,
            crop_rect: session.rect,
        })
    }

    /// Detaches the raster encode of the committed rectangle.
    ///
    /// `None` when there is nothing to rasterize (no session, inert session,
    /// or an empty source region).
    #[must_use]
    pub fn prepare_encode(&self) -> Option<EncodeJob> {
        if !matches!(
            self.phase,
            SessionPhase::Loaded | SessionPhase::Editing | SessionPhase::Confirmed
        ) {
            return None;
        }
        let session = self.session.as_ref()?;
        let crop_rect = session.rect?;
        let source_rect = mapper::to_source_rect(&crop_rect, &session.metrics);
        if source_rect.is_empty() {
            return None;
        }
        Some(EncodeJob {
            ticket: self.ticket(),
            crop_rect,
            source_rect,
            spec: session.spec,
            image: Arc::clone(&session.image),
        })
    }

    /// Completes an [`EncodeJob`]. Stale outcomes are dropped as `Ok(None)`.
    pub fn on_encoded(&mut self, outcome: EncodeOutcome) -> Result<Option<Confirmation>> {
        if outcome.ticket != self.ticket() || self.session.is_none() {
            tracing::debug!(ticket = outcome.ticket.0, "discarding stale encode");
            return Ok(None);
        }
        let bitmap = outcome.result?;
        if let Some(session) = self.session.as_mut() {
            session.confirmed = Some(outcome.source_rect);
            session.gesture = None;
        }
        self.phase = SessionPhase::Confirmed;
        tracing::info!(
            width = bitmap.width,
            height = bitmap.height,
            bytes = bitmap.bytes.len(),
            "crop confirmed"
        );
        Ok(Some(Confirmation {
            bitmap,
            crop_rect: outcome.crop_rect,
            source_rect: outcome.source_rect,
        }))
    }

    /// Rasterizes and encodes the committed rectangle synchronously.
    ///
    /// A no-op returning `Ok(None)` when no valid rectangle exists.
    pub fn confirm(&mut self) -> Result<Option<Confirmation>> {
        match self.prepare_encode() {
            Some(job) => self.on_encoded(job.run()),
            None => {
                tracing::debug!(phase = ?self.phase, "confirm ignored: nothing to rasterize");
                Ok(None)
            }
        }
    }

    /// Ends the session without output. In-flight work becomes stale.
    pub fn cancel(&mut self) {
        if self.phase == SessionPhase::Idle {
            return;
        }
        self.generation += 1;
        self.pending = None;
        self.session = None;
        self.phase = SessionPhase::Cancelled;
        tracing::info!("crop session cancelled");
    }

    /// Re-opens a confirmed session on the confirmed selection, mapped into
    /// the current display metrics.
    pub fn recrop(&mut self) -> Option<SessionHandle> {
        if self.phase != SessionPhase::Confirmed {
            return None;
        }
        let settings = self.settings;
        let ticket = self.ticket();
        let session = self.session.as_mut()?;
        let confirmed = session.confirmed?;
        let rect = if session.metrics.is_degenerate(DEGENERATE_EPSILON) {
            None
        } else {
            let constraints = Constraints::new(&session.metrics, &session.spec, &settings);
            Some(solver::fit(
                &mapper::to_display_rect(&confirmed, &session.metrics),
                &constraints,
            ))
        };
        session.rect = rect;
        session.gesture = None;
        self.phase = SessionPhase::Loaded;
        Some(SessionHandle {
            ticket,
            metrics: session.metrics,
            crop_rect: rect,
        })
    }
}

impl GestureSink for CropEngine {
    fn gesture_start(&mut self, position: Point, kind: PointerKind) {
        if !self.accepts_gestures() {
            return;
        }
        let settings = self.settings;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(rect) = session.rect else {
            return;
        };
        let gesture = GestureState::begin(position, kind, rect, &settings);
        tracing::trace!(mode = ?gesture.mode, "gesture started");
        session.gesture = Some(gesture);
        self.phase = SessionPhase::Editing;
    }

    fn gesture_move(&mut self, position: Point) {
        let settings = self.settings;
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(gesture) = session.gesture else {
            return;
        };
        let constraints = Constraints::new(&session.metrics, &session.spec, &settings);
        if let Some(rect) = gesture.propose(position, &constraints, &settings) {
            session.rect = Some(rect);
        }
    }

    fn gesture_end(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.gesture = None;
        }
    }
}
