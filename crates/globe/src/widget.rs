//! Per-instance widget state and lifecycle.
//!
//! A render call (`render_value`) resets the instance and hands out a
//! [`LoadTicket`]; the host fetches the geometry and reports back through
//! `complete_load`. Only the ticket of the latest render call is honoured.
//! Pointer input is accepted at any time; until geometry is loaded it only
//! moves the rotation and the first render uses wherever it settled.

use formats::{FeatureCollection, RenderOptions, ValueMap, load_feature_collection};
use foundation::math::{SphereRotation, Vec2};
use layers::{Color, ColorScale, GeoPath, PathRenderer, PathSurface};
use runtime::{EventBus, RedrawDecision, RedrawScheduler, RenderEvent, RenderTrigger};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::{ConfigError, WidgetConfig};
use crate::drag::DragController;
use crate::error::{LoadError, WidgetError};
use crate::fitter::{ProjectionFit, fit};
use crate::rotation::RotationState;

/// Identifies one render call's geometry load.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// No render call yet, or disposed.
    Idle,
    Pending { generation: u64 },
    Loaded,
    Failed(WidgetError),
}

/// Decode a fetched geometry document into features.
pub fn decode_geometry(
    payload: &str,
    object_name: Option<&str>,
) -> Result<FeatureCollection, LoadError> {
    load_feature_collection(payload, object_name).map_err(|e| LoadError::Decode(e.to_string()))
}

pub struct GlobeWidget<S: PathSurface> {
    config: WidgetConfig,
    width: f64,
    height: f64,
    surface: S,
    renderer: PathRenderer<S::Handle>,
    features: Option<FeatureCollection>,
    values: ValueMap,
    scale: Option<ColorScale>,
    fit: Option<ProjectionFit>,
    rotation: RotationState,
    drag: DragController,
    load: LoadState,
    generation: u64,
    events: EventBus,
    redraw: RedrawScheduler,
    disposed: bool,
}

impl<S: PathSurface> GlobeWidget<S> {
    pub fn new(width: f64, height: f64, mut surface: S, config: WidgetConfig) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        surface.set_size(width, height);
        Self {
            width,
            height,
            surface,
            renderer: PathRenderer::new(),
            features: None,
            values: ValueMap::default(),
            scale: None,
            fit: None,
            rotation: RotationState::from_array(config.initial_rotation),
            drag: DragController::new(config.sensitivity, config.latitude),
            load: LoadState::Idle,
            generation: 0,
            events: EventBus::new(),
            redraw: RedrawScheduler::new(config.redraw),
            disposed: false,
            config,
        }
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// Update one setting. Interaction settings apply at once; fitting and
    /// color settings apply from the next render call or resize.
    pub fn set_config(&mut self, key: &str, value: &Value) -> Result<(), ConfigError> {
        self.config.set(key, value)?;
        self.drag.set_sensitivity(self.config.sensitivity);
        self.drag.set_latitude_policy(self.config.latitude);
        self.redraw.set_policy(self.config.redraw);
        Ok(())
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn rotation(&self) -> RotationState {
        self.rotation
    }

    pub fn projection_fit(&self) -> Option<ProjectionFit> {
        self.fit
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn error(&self) -> Option<&WidgetError> {
        match &self.load {
            LoadState::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.load == LoadState::Loaded
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn features(&self) -> Option<&FeatureCollection> {
        self.features.as_ref()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn element_count(&self) -> usize {
        self.renderer.len()
    }

    pub fn element(&self, key: &str) -> Option<&S::Handle> {
        self.renderer.handle(key)
    }

    pub fn events(&self) -> &[RenderEvent] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<RenderEvent> {
        self.events.drain()
    }

    /// Start over with new data and colors.
    ///
    /// Clears every element, resets the rotation and returns the ticket the
    /// geometry load must be completed with.
    pub fn render_value(&mut self, options: &RenderOptions) -> Result<LoadTicket, WidgetError> {
        self.ensure_live()?;
        self.reset();

        let values = options.data.to_value_map(self.config.duplicate_ids);
        let scale = match self.build_scale(options) {
            Ok(scale) => scale,
            Err(e) => return Err(self.fail(e)),
        };
        debug!(
            generation = self.generation,
            records = options.data.len(),
            ids = values.len(),
            "render call"
        );
        self.values = values;
        self.scale = Some(scale);
        self.load = LoadState::Pending {
            generation: self.generation,
        };
        Ok(LoadTicket(self.generation))
    }

    /// [`render_value`](Self::render_value) for a raw `{data, settings}` value.
    pub fn render_value_json(&mut self, options: &Value) -> Result<LoadTicket, WidgetError> {
        self.ensure_live()?;
        match RenderOptions::from_json_value(options) {
            Ok(options) => self.render_value(&options),
            Err(e) => {
                self.reset();
                Err(self.fail(WidgetError::InvalidOptions(e)))
            }
        }
    }

    /// The domain spans every record, duplicates included, not the aggregated lookup.
    fn build_scale(&self, options: &RenderOptions) -> Result<ColorScale, WidgetError> {
        let settings = &options.settings;
        let low = Color::parse(&settings.color_ramp1)?;
        let high = Color::parse(&settings.color_ramp2)?;
        let fallback = Color::parse(
            settings
                .na_color
                .as_deref()
                .unwrap_or(&self.config.no_data_color),
        )?;
        let scale = ColorScale::build(
            options.data.values(),
            low,
            high,
            self.config.color_space,
            fallback,
        );
        match scale.domain() {
            None => warn!("no finite values; every feature gets the ramp midpoint or the no-data color"),
            Some(d) if d.is_degenerate() => warn!(value = d.min, "all values are equal"),
            Some(_) => {}
        }
        Ok(scale)
    }

    /// Finish the load for `ticket`. Loads for superseded tickets are ignored.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<FeatureCollection, LoadError>,
    ) -> Result<(), WidgetError> {
        let current = matches!(
            self.load,
            LoadState::Pending { generation } if generation == ticket.0
        );
        if self.disposed || !current {
            debug!(ticket = ticket.0, "ignoring stale geometry load");
            return Ok(());
        }

        let features = match result {
            Ok(features) => features,
            Err(e) => return Err(self.fail(WidgetError::Load(e))),
        };
        if features.is_empty() {
            warn!("geometry has no features");
        }
        self.features = Some(features);
        self.load = LoadState::Loaded;
        self.refit();
        self.surface.clear_error();
        self.request_render(RenderTrigger::InitialLoad)?;
        Ok(())
    }

    /// Refit to the new viewport keeping the rotation. Before the geometry
    /// arrives this only records the size.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), WidgetError> {
        self.ensure_live()?;
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.surface.set_size(self.width, self.height);
        if !self.is_loaded() {
            return Ok(());
        }
        self.refit();
        self.request_render(RenderTrigger::Resize)?;
        Ok(())
    }

    /// Returns whether a drag started.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> bool {
        if self.disposed {
            return false;
        }
        self.drag.begin(Vec2::new(x, y), self.rotation);
        true
    }

    /// Rotate for a pointer move. Returns `true` when the host should
    /// schedule an animation frame and call [`animation_frame`](Self::animation_frame).
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<bool, WidgetError> {
        let Some(rotation) = self.drag.update(Vec2::new(x, y)) else {
            return Ok(false);
        };
        self.rotation = rotation;
        if !self.is_loaded() {
            return Ok(false);
        }
        self.request_render(RenderTrigger::Drag)
    }

    /// Returns whether a drag ended. The rotation stays where the last move put it.
    pub fn pointer_up(&mut self) -> bool {
        self.drag.end()
    }

    /// The browser aborted the gesture. Ends the drag like a release.
    pub fn pointer_cancel(&mut self) -> bool {
        self.drag.end()
    }

    /// Run a deferred drag pass, if any.
    pub fn animation_frame(&mut self) -> Result<(), WidgetError> {
        if self.redraw.take_pending() && self.is_loaded() {
            self.render(RenderTrigger::AnimationFrame)?;
        }
        Ok(())
    }

    /// Tear down: clears the surface and drops features and drag state.
    /// Every later call is rejected with [`WidgetError::Disposed`].
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.reset();
        self.load = LoadState::Idle;
        self.disposed = true;
        debug!("widget disposed");
    }

    fn ensure_live(&self) -> Result<(), WidgetError> {
        if self.disposed {
            return Err(WidgetError::Disposed);
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.generation += 1;
        self.renderer.clear(&mut self.surface);
        self.features = None;
        self.values = ValueMap::default();
        self.scale = None;
        self.fit = None;
        self.drag.end();
        self.redraw.cancel();
        self.rotation = RotationState::from_array(self.config.initial_rotation);
        self.load = LoadState::Idle;
    }

    fn fail(&mut self, e: WidgetError) -> WidgetError {
        error!("{e}");
        self.surface.show_error(&e.to_string());
        self.load = LoadState::Failed(e.clone());
        e
    }

    fn refit(&mut self) {
        let Some(features) = &self.features else {
            return;
        };
        let [lambda, phi, gamma] = self.config.initial_rotation;
        let fitted = fit(
            features,
            self.width,
            self.height,
            self.config.margin_ratio,
            SphereRotation::new(lambda, phi, gamma),
        )
        .unwrap_or_else(|| {
            warn!("nothing visible to fit; framing the whole globe");
            ProjectionFit::whole_globe(self.width, self.height, self.config.margin_ratio)
        });
        debug!(
            scale = fitted.scale,
            tx = fitted.translate.x,
            ty = fitted.translate.y,
            width = self.width,
            height = self.height,
            "projection fit"
        );
        self.fit = Some(fitted);
    }

    /// Render now or defer to the next animation frame, per the redraw policy.
    /// Load and resize passes always render and absorb a pending drag pass.
    /// Returns `true` when a frame should be scheduled.
    fn request_render(&mut self, trigger: RenderTrigger) -> Result<bool, WidgetError> {
        match self.redraw.request(trigger) {
            RedrawDecision::RenderNow => {
                self.render(trigger)?;
                Ok(false)
            }
            RedrawDecision::RequestFrame => Ok(true),
            RedrawDecision::Coalesced => Ok(false),
        }
    }

    fn render(&mut self, trigger: RenderTrigger) -> Result<(), WidgetError> {
        let (Some(features), Some(fitted), Some(scale)) =
            (self.features.as_ref(), self.fit, self.scale.as_ref())
        else {
            return Ok(());
        };
        let path = GeoPath::new(
            fitted.projection(self.rotation.to_sphere_rotation()),
            self.config.path_digits,
        );
        let values = &self.values;
        let stats = self
            .renderer
            .render(&mut self.surface, features, &path, |id| {
                scale.resolve(id.and_then(|id| values.get(id)))
            })?;
        let sequence = self.events.emit(trigger, stats.paths());
        debug!(sequence, trigger = trigger.as_str(), paths = stats.paths(), "render pass");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{GlobeWidget, LoadState, decode_geometry};
    use crate::config::WidgetConfig;
    use crate::error::{LoadError, WidgetError};
    use crate::fitter::fit;
    use formats::{Feature, FeatureCollection, Geometry, RenderOptions};
    use foundation::math::{LonLat, SphereRotation};
    use layers::{SvgDocument, SvgHandle};
    use pretty_assertions::assert_eq;
    use runtime::{RedrawPolicy, RenderTrigger};
    use serde_json::json;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {a} ~= {b}");
    }

    fn square(lon: f64, lat: f64) -> Option<Geometry> {
        Some(Geometry::Polygon(vec![vec![
            LonLat::new(lon, lat),
            LonLat::new(lon, lat + 10.0),
            LonLat::new(lon + 10.0, lat + 10.0),
            LonLat::new(lon + 10.0, lat),
            LonLat::new(lon, lat),
        ]]))
    }

    fn countries() -> FeatureCollection {
        FeatureCollection::new(vec![
            Feature::new(Some("A".into()), square(-100.0, 0.0)),
            Feature::new(Some("B".into()), square(-85.0, -10.0)),
            Feature::new(Some("C".into()), square(-95.0, 15.0)),
        ])
    }

    fn options() -> RenderOptions {
        RenderOptions::from_json_str(
            r##"{"data": [{"id": "A", "val": 0}, {"id": "B", "val": 10}],
                "settings": {"colorRamp1": "#000000", "colorRamp2": "#ffffff"}}"##,
        )
        .expect("options")
    }

    fn widget(config: WidgetConfig) -> GlobeWidget<SvgDocument> {
        GlobeWidget::new(800.0, 600.0, SvgDocument::new(800.0, 600.0), config)
    }

    fn loaded(config: WidgetConfig) -> GlobeWidget<SvgDocument> {
        let mut w = widget(config);
        let ticket = w.render_value(&options()).expect("render");
        w.complete_load(ticket, Ok(countries())).expect("load");
        w
    }

    fn fill(w: &GlobeWidget<SvgDocument>, key: &str) -> String {
        w.surface().element(key).expect("element").fill.clone()
    }

    fn d(w: &GlobeWidget<SvgDocument>, key: &str) -> String {
        w.surface().element(key).expect("element").d.clone()
    }

    #[test]
    fn ramp_ends_and_missing_values() {
        let w = loaded(WidgetConfig::default());
        assert_eq!(fill(&w, "A"), "#000000");
        assert_eq!(fill(&w, "B"), "#ffffff");
        assert_eq!(fill(&w, "C"), "#cccccc");
        assert_eq!(w.events().len(), 1);
        assert_eq!(w.events()[0].trigger, RenderTrigger::InitialLoad);
        assert_eq!(w.events()[0].paths, 3);
    }

    #[test]
    fn na_color_overrides_no_data_color() {
        let mut w = widget(WidgetConfig::default());
        let opts = RenderOptions::from_json_str(
            r#"{"data": {"id": ["A"], "val": [1]},
                "settings": {"colorRamp1": "white", "colorRamp2": "black", "naColor": "red"}}"#,
        )
        .expect("options");
        let ticket = w.render_value(&opts).expect("render");
        w.complete_load(ticket, Ok(countries())).expect("load");
        assert_eq!(fill(&w, "C"), "#ff0000");
        // Single value: degenerate domain maps to the ramp midpoint.
        assert_eq!(fill(&w, "A"), "#808080");
    }

    #[test]
    fn resize_halves_scale_and_recenters() {
        let mut w = loaded(WidgetConfig::default());
        let before = w.projection_fit().expect("fit");
        let rotation = w.rotation();
        w.resize(400.0, 300.0).expect("resize");
        let after = w.projection_fit().expect("fit");
        assert_close(after.scale, before.scale / 2.0);
        assert_close(after.translate.x, before.translate.x / 2.0);
        assert_close(after.translate.y, before.translate.y / 2.0);
        assert_eq!(w.rotation(), rotation);
        assert_eq!(w.surface().size(), (400.0, 300.0));
        assert_eq!(w.events().last().map(|e| e.trigger), Some(RenderTrigger::Resize));
    }

    #[test]
    fn drag_updates_paths_but_keeps_elements() {
        let mut w = loaded(WidgetConfig::default());
        let handle: SvgHandle = *w.element("A").expect("A");
        let before = d(&w, "A");

        assert!(w.pointer_down(10.0, 10.0));
        for x in [20.0, 30.0, 50.0] {
            assert!(!w.pointer_move(x, 10.0).expect("move"));
        }
        assert!(w.pointer_up());

        assert_close(w.rotation().longitude, 100.0);
        assert_eq!(w.element_count(), 3);
        assert_eq!(w.surface().len(), 3);
        assert_eq!(*w.element("A").expect("A"), handle);
        assert_ne!(d(&w, "A"), before);
        assert_eq!(fill(&w, "A"), "#000000");
        // One pass per move.
        assert_eq!(w.events().len(), 4);
        assert!(w.events()[1..].iter().all(|e| e.trigger == RenderTrigger::Drag));
        // Scale and translate do not change while dragging.
        let fitted = fit(&countries(), 800.0, 600.0, 0.9, SphereRotation::new(90.0, 0.0, 0.0));
        assert_eq!(w.projection_fit(), fitted);
    }

    #[test]
    fn full_pointer_turn_returns_longitude() {
        let mut w = loaded(WidgetConfig::default());
        w.pointer_down(0.0, 0.0);
        w.pointer_move(360.0 / 0.25, 0.0).expect("move");
        assert_close(w.rotation().longitude, 90.0);
        assert_close(w.rotation().latitude, 0.0);
    }

    #[test]
    fn drag_before_load_defers_rendering() {
        let mut w = widget(WidgetConfig::default());
        let ticket = w.render_value(&options()).expect("render");
        w.pointer_down(0.0, 0.0);
        assert!(!w.pointer_move(40.0, 0.0).expect("move"));
        w.pointer_up();
        assert!(w.events().is_empty());
        assert_close(w.rotation().longitude, 100.0);

        w.complete_load(ticket, Ok(countries())).expect("load");
        assert_close(w.rotation().longitude, 100.0);
        assert_eq!(w.events().len(), 1);

        // Same picture as dragging after the load.
        let mut reference = loaded(WidgetConfig::default());
        reference.pointer_down(0.0, 0.0);
        reference.pointer_move(40.0, 0.0).expect("move");
        assert_eq!(d(&w, "A"), d(&reference, "A"));
    }

    #[test]
    fn stale_loads_are_ignored() {
        let mut w = widget(WidgetConfig::default());
        let first = w.render_value(&options()).expect("render");
        let second = w.render_value(&options()).expect("render");
        w.complete_load(first, Ok(countries())).expect("stale");
        assert_eq!(w.element_count(), 0);
        assert_eq!(
            *w.load_state(),
            LoadState::Pending {
                generation: second.generation()
            }
        );
        w.complete_load(second, Ok(countries())).expect("load");
        assert!(w.is_loaded());
        assert_eq!(w.element_count(), 3);
    }

    #[test]
    fn load_failure_is_visible() {
        let mut w = widget(WidgetConfig::default());
        let ticket = w.render_value(&options()).expect("render");
        let err = w
            .complete_load(ticket, Err(LoadError::Fetch("HTTP 404".into())))
            .unwrap_err();
        assert_eq!(err, WidgetError::Load(LoadError::Fetch("HTTP 404".into())));
        assert!(w.surface().error().expect("shown").contains("HTTP 404"));
        assert_eq!(w.error(), Some(&err));

        w.pointer_down(0.0, 0.0);
        assert!(!w.pointer_move(10.0, 0.0).expect("move"));
        assert!(w.events().is_empty());
        // A late duplicate completion does nothing.
        w.complete_load(ticket, Ok(countries())).expect("ignored");
        assert_eq!(w.element_count(), 0);
    }

    #[test]
    fn invalid_colors_leave_the_widget_inert() {
        let mut w = widget(WidgetConfig::default());
        let err = w
            .render_value_json(&json!({
                "data": [{"id": "A", "val": 1}],
                "settings": {"colorRamp1": "not-a-color", "colorRamp2": "#fff"}
            }))
            .unwrap_err();
        assert!(matches!(err, WidgetError::InvalidColor(_)));
        assert!(w.surface().error().is_some());

        let err = w.render_value_json(&json!({"data": []})).unwrap_err();
        assert!(matches!(err, WidgetError::InvalidOptions(_)));
    }

    #[test]
    fn rendering_again_starts_over() {
        let mut w = loaded(WidgetConfig::default());
        w.pointer_down(0.0, 0.0);
        w.pointer_move(80.0, 0.0).expect("move");

        let opts = RenderOptions::from_json_str(
            r#"{"data": [{"id": "A", "val": 10}, {"id": "B", "val": 0}],
                "settings": {"colorRamp1": "black", "colorRamp2": "white"}}"#,
        )
        .expect("options");
        let ticket = w.render_value(&opts).expect("render");
        assert_eq!(w.element_count(), 0);
        assert!(!w.is_dragging());
        assert_eq!(w.rotation().to_array(), [90.0, 0.0, 0.0]);
        w.complete_load(ticket, Ok(countries())).expect("load");
        assert_eq!(fill(&w, "A"), "#ffffff");
        assert_eq!(fill(&w, "B"), "#000000");
    }

    #[test]
    fn resize_before_load_is_used_by_the_load() {
        let mut w = widget(WidgetConfig::default());
        let ticket = w.render_value(&options()).expect("render");
        w.resize(400.0, 300.0).expect("resize");
        assert!(w.events().is_empty());
        w.complete_load(ticket, Ok(countries())).expect("load");
        let expected = fit(&countries(), 400.0, 300.0, 0.9, SphereRotation::new(90.0, 0.0, 0.0));
        assert_eq!(w.projection_fit(), expected);
    }

    #[test]
    fn coalesced_redraw_runs_once_per_frame() {
        let config = WidgetConfig {
            redraw: RedrawPolicy::Coalesced,
            ..WidgetConfig::default()
        };
        let mut w = loaded(config);
        w.pointer_down(0.0, 0.0);
        assert!(w.pointer_move(4.0, 0.0).expect("move"));
        assert!(!w.pointer_move(8.0, 0.0).expect("move"));
        assert!(!w.pointer_move(12.0, 0.0).expect("move"));
        assert_eq!(w.events().len(), 1);

        w.animation_frame().expect("frame");
        assert_eq!(w.events().len(), 2);
        assert_eq!(w.events()[1].trigger, RenderTrigger::AnimationFrame);
        assert_close(w.rotation().longitude, 93.0);

        w.animation_frame().expect("idle frame");
        assert_eq!(w.events().len(), 2);
    }

    #[test]
    fn color_domain_spans_duplicate_records() {
        let mut w = widget(WidgetConfig::default());
        let opts = RenderOptions::from_json_str(
            r##"{"data": [{"id": "A", "val": 0}, {"id": "A", "val": 100}, {"id": "B", "val": 10}],
                "settings": {"colorRamp1": "#000000", "colorRamp2": "#ffffff"}}"##,
        )
        .expect("options");
        let ticket = w.render_value(&opts).expect("render");
        w.complete_load(ticket, Ok(countries())).expect("load");
        // Domain [0, 100]: A keeps its last value, B sits at t = 0.1.
        assert_eq!(fill(&w, "A"), "#ffffff");
        assert_eq!(fill(&w, "B"), "#1a1a1a");
    }

    #[test]
    fn resize_absorbs_a_pending_drag_frame() {
        let config = WidgetConfig {
            redraw: RedrawPolicy::Coalesced,
            ..WidgetConfig::default()
        };
        let mut w = loaded(config);
        w.pointer_down(0.0, 0.0);
        assert!(w.pointer_move(40.0, 0.0).expect("move"));
        w.resize(400.0, 300.0).expect("resize");
        w.animation_frame().expect("frame");

        let triggers: Vec<RenderTrigger> = w.events().iter().map(|e| e.trigger).collect();
        assert_eq!(triggers, vec![RenderTrigger::InitialLoad, RenderTrigger::Resize]);
        // The resize pass already drew the dragged rotation.
        assert_close(w.rotation().longitude, 100.0);
        let mut reference = loaded(WidgetConfig::default());
        reference.pointer_down(0.0, 0.0);
        reference.pointer_move(40.0, 0.0).expect("move");
        reference.resize(400.0, 300.0).expect("resize");
        assert_eq!(d(&w, "A"), d(&reference, "A"));
    }

    #[test]
    fn cancelled_gesture_ends_the_drag() {
        let mut w = loaded(WidgetConfig::default());
        assert!(!w.pointer_cancel());
        w.pointer_down(0.0, 0.0);
        w.pointer_move(20.0, 0.0).expect("move");
        assert!(w.pointer_cancel());
        assert!(!w.is_dragging());
        assert_close(w.rotation().longitude, 95.0);

        assert!(!w.pointer_move(80.0, 0.0).expect("move after cancel"));
        assert_close(w.rotation().longitude, 95.0);
        assert_eq!(w.events().len(), 2);
    }

    #[test]
    fn set_config_reaches_the_drag_controller() {
        let mut w = loaded(WidgetConfig::default());
        w.set_config("sensitivity", &json!(1.0)).expect("set");
        w.pointer_down(0.0, 0.0);
        w.pointer_move(10.0, 0.0).expect("move");
        assert_close(w.rotation().longitude, 100.0);
        assert!(w.set_config("nope", &json!(1)).is_err());
    }

    #[test]
    fn dispose_tears_down() {
        let mut w = loaded(WidgetConfig::default());
        w.dispose();
        assert!(w.is_disposed());
        assert!(w.surface().is_empty());
        assert_eq!(w.element_count(), 0);
        assert!(!w.pointer_down(0.0, 0.0));
        assert_eq!(w.render_value(&options()).unwrap_err(), WidgetError::Disposed);
        assert_eq!(w.resize(10.0, 10.0).unwrap_err(), WidgetError::Disposed);
    }

    #[test]
    fn decodes_topology_documents() {
        let topo = r#"{"type": "Topology",
            "transform": {"scale": [1, 1], "translate": [-100, 0]},
            "arcs": [[[0, 0], [0, 10], [10, 0], [0, -10], [-10, 0]]],
            "objects": {"countries": {"type": "GeometryCollection",
                "geometries": [{"type": "Polygon", "id": "A", "arcs": [[0]]}]}}}"#;
        let fc = decode_geometry(topo, None).expect("decode");
        assert_eq!(fc.len(), 1);

        let mut w = widget(WidgetConfig::default());
        let ticket = w.render_value(&options()).expect("render");
        w.complete_load(ticket, Ok(fc)).expect("load");
        assert_eq!(fill(&w, "A"), "#000000");

        let err = decode_geometry("{}", None).unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }
}
