use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use eframe::egui::{Pos2, Stroke, Vec2};

use crate::color::ColorScheme;
use crate::config::ViewConfig;
use crate::data::filter::threshold_selection;
use crate::data::model::{Dataset, RecordKey};
use crate::view::brush::brush_partition;
use crate::view::interaction::{InputEvent, InteractionMachine, Redraw};
use crate::view::layout::Layout;
use crate::view::reconcile::{KeyedMarks, ReconcileStats};
use crate::view::scale::Scales;
use crate::view::selection::{DerivedSelection, ViewState, derive};

// ---------------------------------------------------------------------------
// Parallel-coordinates polyline mark
// ---------------------------------------------------------------------------

/// One record's line in the parallel view, in parallel-local coordinates
/// before the zoom transform.
#[derive(Debug, Clone, PartialEq)]
pub struct PolylineMark {
    pub points: Vec<Pos2>,
    pub stroke: Stroke,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: ViewConfig,
    pub colors: ColorScheme,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<Dataset>,

    /// Threshold, brush and zoom.
    pub view: ViewState,
    pub interaction: InteractionMachine,

    /// Current layout and the scales built for it.
    pub layout: Option<Layout>,
    pub scales: Option<Scales>,

    /// Indices of records passing the threshold (cached).
    pub visible_indices: Vec<usize>,

    /// Per-record brush flags (cached).
    pub highlighted: Vec<bool>,

    /// Parallel polylines keyed by record identity.
    pub lines: KeyedMarks<RecordKey, PolylineMark>,

    /// Counts from the most recent threshold-driven reconcile.
    pub last_reconcile: ReconcileStats,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// File the current (or pending) dataset comes from.
    pub source: Option<PathBuf>,

    pending_load: Option<Receiver<anyhow::Result<Dataset>>>,
}

impl AppState {
    pub fn new(config: ViewConfig, colors: ColorScheme) -> Self {
        let interaction = InteractionMachine::new(config.zoom_extent);
        Self {
            config,
            colors,
            dataset: None,
            view: ViewState::default(),
            interaction,
            layout: None,
            scales: None,
            visible_indices: Vec::new(),
            highlighted: Vec::new(),
            lines: KeyedMarks::new(),
            last_reconcile: ReconcileStats::default(),
            status_message: None,
            source: None,
            pending_load: None,
        }
    }

    /// Whether a file loading operation is in progress.
    pub fn loading(&self) -> bool {
        self.pending_load.is_some()
    }

    /// Parse `path` on a background thread; [`poll_load`](Self::poll_load)
    /// picks up the result.
    pub fn start_load(&mut self, path: &Path) {
        log::info!("Loading {}", path.display());
        let (tx, rx) = mpsc::channel();
        let path_buf = path.to_path_buf();
        std::thread::spawn(move || {
            let result = crate::data::loader::load_file(&path_buf);
            // the receiver is gone only if a newer load replaced this one
            let _ = tx.send(result);
        });
        self.source = Some(path.to_path_buf());
        self.status_message = None;
        self.pending_load = Some(rx);
    }

    /// Install the finished load, if any. Returns true once it resolved.
    pub fn poll_load(&mut self) -> bool {
        let Some(rx) = &self.pending_load else {
            return false;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(anyhow::anyhow!("loader thread exited without a result")),
        };
        self.pending_load = None;
        match result {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => self.set_load_error(&e),
        }
        true
    }

    /// Ingest a newly loaded dataset and reset the view state.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.view = ViewState::for_dataset(&dataset);
        self.interaction = InteractionMachine::new(self.config.zoom_extent);
        self.lines.clear();
        self.last_reconcile = ReconcileStats::default();
        self.scales = self
            .layout
            .as_ref()
            .map(|layout| Scales::build(&dataset, &self.config, layout));
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refresh_all();
    }

    /// A failed load drops any chart: nothing is rendered until a load
    /// succeeds.
    pub fn set_load_error(&mut self, error: &anyhow::Error) {
        log::error!("Failed to load dataset: {error:#}");
        self.dataset = None;
        self.scales = None;
        self.lines.clear();
        self.last_reconcile = ReconcileStats::default();
        self.visible_indices.clear();
        self.highlighted.clear();
        self.status_message = Some(format!("Error: {error:#}"));
    }

    /// Recompute the layout for the available size; scales are rebuilt only
    /// when the geometry changed.
    pub fn update_layout(&mut self, available: Vec2) -> Layout {
        let layout = Layout::compute(&self.config, available);
        let unchanged = self
            .layout
            .as_ref()
            .is_some_and(|old| old.same_geometry(&layout));
        self.layout = Some(layout);

        if !unchanged || self.scales.is_none() {
            if let Some(ds) = &self.dataset {
                self.scales = Some(Scales::build(ds, &self.config, &layout));
                self.refresh_all();
            }
        }
        layout
    }

    /// Feed one input event through the interaction machine and apply the
    /// resulting redraws.
    pub fn handle(&mut self, event: InputEvent) -> Redraw {
        if self.dataset.is_none() {
            return Redraw::NONE;
        }
        // before the first frame only the slider can fire; any layout will do
        let layout = self
            .layout
            .unwrap_or_else(|| Layout::compute(&self.config, Vec2::ZERO));
        let redraw = self.interaction.handle(event, &layout, &mut self.view);
        self.apply(redraw);
        redraw
    }

    pub fn apply(&mut self, redraw: Redraw) {
        if redraw.scatter {
            self.rehighlight();
        }
        if redraw.parallel {
            let stats = self.redraw_parallel();
            log::debug!(
                "threshold {}: {} entered, {} updated, {} exited",
                self.view.threshold(),
                stats.entered,
                stats.updated,
                stats.exited
            );
            self.last_reconcile = stats;
        }
        if redraw.transform {
            log::trace!(
                "parallel transform: scale {:.2}, translate {:?}",
                self.view.zoom.scale,
                self.view.zoom.translate
            );
        }
    }

    fn refresh_all(&mut self) {
        self.rehighlight();
        self.redraw_parallel();
    }

    /// Recompute per-record brush flags from scratch.
    pub fn rehighlight(&mut self) {
        self.highlighted = match (&self.dataset, &self.scales) {
            (Some(ds), Some(scales)) => brush_partition(ds, &scales.scatter, self.view.brush.as_ref()),
            _ => Vec::new(),
        };
    }

    /// Recompute the threshold selection and reconcile the polylines by key.
    pub fn redraw_parallel(&mut self) -> ReconcileStats {
        let (Some(ds), Some(scales)) = (&self.dataset, &self.scales) else {
            return ReconcileStats::default();
        };
        self.visible_indices = threshold_selection(ds, self.view.threshold());

        let stroke = Stroke::new(self.config.parallel.line_width, self.colors.line);
        let desired = self.visible_indices.iter().filter_map(|&i| {
            let record = &ds.records()[i];
            // records with a missing axis value get no line
            scales
                .parallel
                .polyline(record)
                .map(|points| (record.key().clone(), points))
        });

        self.lines.reconcile(
            desired,
            |_, points| PolylineMark { points, stroke },
            |_, points, mark| mark.points = points,
        )
    }

    /// The derived selection recomputed from (dataset, view state).
    pub fn derived_selection(&self) -> Option<DerivedSelection> {
        let ds = self.dataset.as_ref()?;
        let scales = self.scales.as_ref()?;
        Some(derive(ds, &self.view, &scales.scatter))
    }
}
