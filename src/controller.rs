use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::arrange::{self, AlignDirection};
use crate::config::LayoutConfig;
use crate::edit::{EditError, FieldPatch, build_spec_patch};
use crate::geometry::{Position, Rect};
use crate::layout::{Axis, DiagramEdge, DiagramNode, Layout, SnapLine, ViewMode, compute_layout};
use crate::noderef::NodeRef;
use crate::snap::compute_snap_guides;
use crate::spec::{AgentSpec, SpecId, SpecPatch};
use crate::store::{SpecEvent, SpecStore, StoreError};

/// One node's proposed position for the current drag frame, before snap.
#[derive(Debug, Clone)]
pub struct DragFrame {
    pub id: String,
    pub x: f32,
    pub y: f32,
}

/// Side panel state after a double-click. An id that maps to no
/// specification path is a non-fatal `NotFound`; the diagram keeps running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelState {
    Open { node_id: String, node_ref: NodeRef },
    NotFound { node_id: String },
}

#[derive(Debug)]
struct PendingFlush {
    due_at_ms: u64,
    /// Position map as last accepted by the store, for rollback.
    baseline: BTreeMap<String, Position>,
}

/// Stateful orchestrator for one diagram session.
///
/// Owns the rendered node/edge arrays, folds snap deltas into drag frames
/// before they reach rendered state, debounces position persistence, and
/// re-layouts on specification change. All state lives on the instance and
/// dies with it; handlers read through the controller rather than capturing
/// snapshots, so no callback can observe a stale node set.
pub struct DiagramController<S: SpecStore> {
    store: S,
    spec_id: SpecId,
    spec: AgentSpec,
    config: LayoutConfig,
    view_mode: ViewMode,
    layout: Layout,
    /// In-memory position map; the one incrementally-mutated resource.
    positions: BTreeMap<String, Position>,
    selection: BTreeSet<String>,
    guides: Vec<SnapLine>,
    moved_since_stop: BTreeSet<String>,
    drag_active: bool,
    pending_flush: Option<PendingFlush>,
    saving: bool,
    panel: Option<PanelState>,
}

impl<S: SpecStore> DiagramController<S> {
    pub fn new(
        mut store: S,
        spec_id: SpecId,
        view_mode: ViewMode,
        config: LayoutConfig,
    ) -> Result<Self, StoreError> {
        let mut spec = store.fetch(&spec_id)?;
        spec.prune_positions();
        let positions = spec.node_positions.clone();
        let layout = compute_layout(&spec, view_mode, Some(&positions), &config);
        debug!(spec = %spec_id, nodes = layout.nodes.len(), "diagram session started");
        Ok(Self {
            store,
            spec_id,
            spec,
            config,
            view_mode,
            layout,
            positions,
            selection: BTreeSet::new(),
            guides: Vec::new(),
            moved_since_stop: BTreeSet::new(),
            drag_active: false,
            pending_flush: None,
            saving: false,
            panel: None,
        })
    }

    pub fn nodes(&self) -> &[DiagramNode] {
        &self.layout.nodes
    }

    pub fn edges(&self) -> &[DiagramEdge] {
        &self.layout.edges
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn guides(&self) -> &[SnapLine] {
        &self.guides
    }

    pub fn spec(&self) -> &AgentSpec {
        &self.spec
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn panel(&self) -> Option<&PanelState> {
        self.panel.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Save-in-flight indicator surfaced by the embedding UI.
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn has_pending_flush(&self) -> bool {
        self.pending_flush.is_some()
    }

    // ── drag lifecycle ───────────────────────────────────────────────────

    /// Applies one drag frame. The snap delta is folded into the proposed
    /// positions before they become rendered state, so the snapped position
    /// is the state and nothing jumps after release.
    pub fn drag_moved(&mut self, frames: &[DragFrame]) -> &[SnapLine] {
        let dragging_ids: BTreeSet<&str> = frames.iter().map(|frame| frame.id.as_str()).collect();

        let mut dragging_rects = Vec::with_capacity(frames.len());
        for frame in frames {
            let Some(node) = self.layout.node(&frame.id) else {
                continue;
            };
            dragging_rects.push(Rect::new(frame.x, frame.y, node.width, node.height));
        }
        let targets: Vec<Rect> = self
            .layout
            .nodes
            .iter()
            .filter(|node| !dragging_ids.contains(node.id.as_str()))
            .map(|node| node.rect())
            .collect();

        let snap = compute_snap_guides(&dragging_rects, &targets, self.config.snap_threshold);

        for frame in frames {
            if let Some(node) = self.layout.node_mut(&frame.id) {
                node.x = frame.x + snap.dx;
                node.y = frame.y + snap.dy;
                self.moved_since_stop.insert(frame.id.clone());
            }
        }

        self.drag_active = true;
        self.guides = snap.lines;
        &self.guides
    }

    /// Ends the drag: final positions of all moved nodes land in the
    /// in-memory position map and a flush is scheduled after the debounce
    /// window. A drag-stop inside the window resets the timer, so a burst of
    /// drags coalesces into one write.
    pub fn drag_stopped(&mut self, now_ms: u64) {
        self.drag_active = false;
        self.guides.clear();
        let moved = std::mem::take(&mut self.moved_since_stop);
        if moved.is_empty() {
            return;
        }
        for id in moved {
            if let Some(node) = self.layout.node(&id) {
                self.positions.insert(id, Position::new(node.x, node.y));
            }
        }
        self.schedule_flush(now_ms);
    }

    /// Drives the debounce clock. Callers feed the same monotonic
    /// millisecond timestamps they pass to `drag_stopped`.
    pub fn tick(&mut self, now_ms: u64) {
        let due = self
            .pending_flush
            .as_ref()
            .is_some_and(|pending| now_ms >= pending.due_at_ms);
        if due && !self.saving && !self.drag_active {
            self.flush_positions();
        }
    }

    fn schedule_flush(&mut self, now_ms: u64) {
        let baseline = self
            .pending_flush
            .take()
            .map(|pending| pending.baseline)
            .unwrap_or_else(|| self.spec.node_positions.clone());
        self.pending_flush = Some(PendingFlush {
            due_at_ms: now_ms + self.config.flush_debounce_ms,
            baseline,
        });
    }

    fn flush_positions(&mut self) {
        let Some(pending) = self.pending_flush.take() else {
            return;
        };
        self.saving = true;

        // Optimistic: the local document already reflects the new map when
        // the request goes out.
        self.spec.node_positions = self.positions.clone();
        let patch = SpecPatch {
            node_positions: Some(self.positions.clone()),
            ..SpecPatch::default()
        };
        match self.store.update(&self.spec_id, &patch) {
            Ok(authoritative) => {
                debug!(spec = %self.spec_id, "position map saved");
                self.adopt_authoritative(authoritative);
            }
            Err(error) => {
                warn!(spec = %self.spec_id, %error, "position save failed, rolling back");
                self.positions = pending.baseline.clone();
                self.spec.node_positions = pending.baseline;
                self.rebuild();
            }
        }
        self.saving = false;
    }

    // ── re-layout ────────────────────────────────────────────────────────

    /// Accepts a pushed or re-fetched specification. Always layered under
    /// the in-memory position overrides, so a drag that completed just
    /// before the refresh is not lost.
    pub fn handle_event(&mut self, event: SpecEvent) {
        match event {
            SpecEvent::Changed(spec) => self.observe_spec(spec),
            SpecEvent::Invalidated(id) => {
                if id != self.spec_id {
                    return;
                }
                match self.store.fetch(&self.spec_id) {
                    Ok(spec) => self.observe_spec(spec),
                    Err(error) => {
                        warn!(spec = %self.spec_id, %error, "re-fetch after invalidation failed")
                    }
                }
            }
        }
    }

    pub fn observe_spec(&mut self, spec: AgentSpec) {
        if spec.revision == self.spec.revision {
            return;
        }
        debug!(
            spec = %self.spec_id,
            from = self.spec.revision,
            to = spec.revision,
            "specification changed, re-layout"
        );
        self.adopt_authoritative(spec);
    }

    fn adopt_authoritative(&mut self, spec: AgentSpec) {
        // Session-local positions win over the stored map; stale ids are
        // dropped so a freed index cannot resurrect an old position.
        let mut merged = spec.node_positions.clone();
        merged.extend(std::mem::take(&mut self.positions));
        self.spec = spec;
        self.positions = merged;
        self.prune_positions();
        self.rebuild();
    }

    fn prune_positions(&mut self) {
        let live: BTreeSet<String> = NodeRef::enumerate(&self.spec)
            .into_iter()
            .map(|node_ref| node_ref.id())
            .collect();
        self.positions.retain(|id, _| live.contains(id));
    }

    fn rebuild(&mut self) {
        self.layout = compute_layout(&self.spec, self.view_mode, Some(&self.positions), &self.config);
        self.guides.clear();
        self.selection
            .retain(|id| self.layout.node(id).is_some());
        for node in &mut self.layout.nodes {
            node.selected = self.selection.contains(&node.id);
        }
    }

    pub fn set_view_mode(&mut self, view_mode: ViewMode) {
        if view_mode != self.view_mode {
            self.view_mode = view_mode;
            self.rebuild();
        }
    }

    /// Discards every position override and recomputes canonical defaults,
    /// then persists the fresh map through the usual debounced path.
    pub fn auto_layout(&mut self, now_ms: u64) {
        self.positions = crate::layout::auto_layout(&self.spec, &self.config);
        self.schedule_flush(now_ms);
        self.rebuild();
    }

    // ── selection & arrange ──────────────────────────────────────────────

    pub fn set_selected(&mut self, id: &str, selected: bool) {
        if self.layout.node(id).is_none() {
            return;
        }
        if selected {
            self.selection.insert(id.to_string());
        } else {
            self.selection.remove(id);
        }
        if let Some(node) = self.layout.node_mut(id) {
            node.selected = selected;
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        for node in &mut self.layout.nodes {
            node.selected = false;
        }
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    pub fn can_align(&self) -> bool {
        self.selection.len() >= 2
    }

    pub fn can_distribute(&self) -> bool {
        self.selection.len() >= 3
    }

    /// Aligns the current selection. Below two selected nodes this is
    /// silently a no-op, mirroring the disabled affordance.
    pub fn align(&mut self, direction: AlignDirection, now_ms: u64) {
        let moved = arrange::align(&self.selected_rects(), direction);
        self.apply_moves(moved, now_ms);
    }

    /// Evenly spaces the current selection along `axis`. No-op below three.
    pub fn distribute(&mut self, axis: Axis, now_ms: u64) {
        let moved = arrange::distribute(&self.selected_rects(), axis);
        self.apply_moves(moved, now_ms);
    }

    fn selected_rects(&self) -> Vec<(String, Rect)> {
        self.layout
            .nodes
            .iter()
            .filter(|node| node.selected)
            .map(|node| (node.id.clone(), node.rect()))
            .collect()
    }

    fn apply_moves(&mut self, moved: Vec<(String, Position)>, now_ms: u64) {
        if moved.is_empty() {
            return;
        }
        for (id, position) in moved {
            if let Some(node) = self.layout.node_mut(&id) {
                node.x = position.x;
                node.y = position.y;
            }
            self.positions.insert(id, position);
        }
        self.schedule_flush(now_ms);
    }

    // ── field editing ────────────────────────────────────────────────────

    /// Routes a double-click to the side panel. Returns the resulting panel
    /// state; an unknown id opens the panel in its `NotFound` state.
    pub fn open_panel(&mut self, node_id: &str) -> &PanelState {
        let state = match self.layout.node(node_id) {
            Some(node) if node.node_ref.resolves(&self.spec) => PanelState::Open {
                node_id: node_id.to_string(),
                node_ref: node.node_ref,
            },
            _ => PanelState::NotFound {
                node_id: node_id.to_string(),
            },
        };
        self.panel = Some(state);
        self.panel.as_ref().expect("panel just set")
    }

    pub fn close_panel(&mut self) {
        self.panel = None;
    }

    /// Commits one edit from the open panel: optimistic local apply, then
    /// submit; on failure the pre-edit snapshot is restored wholesale. A
    /// patch either fully lands or is fully rolled back.
    pub fn apply_edit(&mut self, patch: &FieldPatch) -> Result<(), EditError> {
        let node_ref = match &self.panel {
            Some(PanelState::Open { node_ref, .. }) => *node_ref,
            Some(PanelState::NotFound { node_id }) => {
                return Err(EditError::UnknownNode(node_id.clone()));
            }
            None => return Err(EditError::PanelClosed),
        };

        let snapshot = self.spec.clone();
        let spec_patch = build_spec_patch(&self.spec, node_ref, patch)?;

        self.spec.apply_patch(&spec_patch);
        self.rebuild();
        self.saving = true;
        let result = self.store.update(&self.spec_id, &spec_patch);
        self.saving = false;
        match result {
            Ok(authoritative) => {
                self.adopt_authoritative(authoritative);
                Ok(())
            }
            Err(error) => {
                warn!(spec = %self.spec_id, %error, "field patch rejected, rolling back");
                self.spec = snapshot;
                self.rebuild();
                Err(EditError::Store(error))
            }
        }
    }
}
