//! The render-update driver: one cooperative loop owning all periodic work.
//!
//! The loop polls the surface for input, debounces resize bursts, and asks
//! the scheduler which cadences are due: per-second clock ticks, per-minute
//! marker label refreshes, and the slow terminator recompute. All state
//! mutation happens here, single-threaded; collaborators (`MapView`, the
//! settings store, the surface) never run concurrently.

use std::time::Instant;

use anyhow::{Result, anyhow};

use crate::cities;
use crate::clock::ClockWidget;
use crate::constants::{
    CLOCK_TICK_INTERVAL, LOOP_POLL_INTERVAL, MARKER_REFRESH_INTERVAL,
    TERMINATOR_REFRESH_INTERVAL, VIEWPORT_RETRY_DELAY, VIEWPORT_RETRY_LIMIT,
};
use crate::map::MapView;
use crate::map::geometry::WorldGeometry;
use crate::map::markers::CityMarker;
use crate::map::projection::ProjectionKind;
use crate::scheduler::{Debouncer, Scheduler, TaskId};
use crate::settings::store::SettingsStore;
use crate::settings::{ResolvedTheme, Settings, Theme, TimeFormat};
use crate::surface::{DisplaySurface, SurfaceEvent};
use crate::time_source;

/// Everything the core needs to run.
pub struct CoreParams {
    pub surface: Box<dyn DisplaySurface>,
    pub store: Box<dyn SettingsStore>,
    pub geometry: WorldGeometry,
    pub projection: ProjectionKind,
}

/// What a key press means depends on the active mode.
#[derive(Debug, Clone, PartialEq, Eq)]
enum InputMode {
    Normal,
    /// Typing a city search query.
    Search(String),
    /// Picking a clock to remove by number.
    Remove,
}

/// One city on screen: its clock plus the per-second tick driving it.
struct CityEntry {
    clock: ClockWidget,
    tick: TaskId,
}

pub struct Core {
    surface: Box<dyn DisplaySurface>,
    store: Box<dyn SettingsStore>,
    view: MapView,
    entries: Vec<CityEntry>,
    scheduler: Scheduler,
    resize_debouncer: Debouncer,
    marker_task: TaskId,
    terminator_task: TaskId,
    settings: Settings,
    theme: ResolvedTheme,
    mode: InputMode,
    pending_viewport: Option<(u16, u16)>,
    running: bool,
    dirty: bool,
}

impl Core {
    /// Build the core: wait for a usable viewport, restore persisted cities,
    /// and register the periodic cadences.
    pub fn new(params: CoreParams) -> Result<Self> {
        let CoreParams {
            surface,
            store,
            geometry,
            projection,
        } = params;

        let (width, height) = await_viewport(surface.as_ref())?;
        log_block_start!("Starting render loop ({width}x{height} cells)");

        let settings = store.load();
        let theme = settings.theme.resolve();
        log_indented!("Settings from {}", store.describe());

        let mut view = MapView::new(projection, geometry, width as f64, height as f64);
        view.refresh_terminator(time_source::now());

        let start = Instant::now();
        let mut scheduler = Scheduler::new();
        let marker_task = scheduler.register(MARKER_REFRESH_INTERVAL, start);
        let terminator_task = scheduler.register(TERMINATOR_REFRESH_INTERVAL, start);

        let mut core = Self {
            surface,
            store,
            view,
            entries: Vec::new(),
            scheduler,
            resize_debouncer: Debouncer::for_resize(),
            marker_task,
            terminator_task,
            settings,
            theme,
            mode: InputMode::Normal,
            pending_viewport: None,
            running: true,
            dirty: true,
        };

        core.restore_cities(start);
        Ok(core)
    }

    /// Re-add every persisted city. Names the database no longer knows are
    /// dropped with a warning rather than failing startup.
    fn restore_cities(&mut self, now: Instant) {
        let names = self.settings.cities.clone();
        for name in names {
            match cities::find_by_name(&name) {
                Some(city) => self.attach_city(city, now),
                None => {
                    log_pipe!();
                    log_warning!("Stored city \"{name}\" is not in the database, skipping");
                }
            }
        }
    }

    /// Add a city's marker, clock, and tick. Idempotent per city name.
    fn attach_city(&mut self, city: &cities::City, now: Instant) {
        let marker = CityMarker::from_city(city);
        if !self.view.markers.add(marker.clone()) {
            return;
        }
        let tick = self.scheduler.register(CLOCK_TICK_INTERVAL, now);
        self.entries.push(CityEntry {
            clock: ClockWidget::new(marker.name.clone(), marker.timezone()),
            tick,
        });
        self.dirty = true;
    }

    /// Remove a city and cancel its tick so nothing fires for it afterwards.
    fn detach_city(&mut self, name: &str) {
        if !self.view.markers.remove(name) {
            return;
        }
        if let Some(index) = self.entries.iter().position(|e| e.clock.city == name) {
            let entry = self.entries.remove(index);
            self.scheduler.cancel(entry.tick);
        }
        self.dirty = true;
    }

    fn persist(&mut self) {
        self.settings.cities = self.view.markers.names();
        if let Err(e) = self.store.save(&self.settings) {
            log_pipe!();
            log_warning!("Could not save settings: {e:#}");
        }
    }

    /// Drive the loop until quit.
    pub fn run(mut self) -> Result<()> {
        while self.running {
            if let Some(event) = self.surface.poll_event(LOOP_POLL_INTERVAL)? {
                self.handle_event(event, Instant::now());
            }
            self.tick(Instant::now());
            if self.dirty {
                self.render()?;
                self.dirty = false;
            }
        }
        self.persist();
        Ok(())
    }

    /// Advance time-driven work: debounced resize first, then due cadences.
    fn tick(&mut self, now: Instant) {
        if self.resize_debouncer.fire(now) {
            if let Some((width, height)) = self.pending_viewport.take() {
                if width > 0 && height > 0 {
                    self.view.reconfigure(width as f64, height as f64);
                    log_debug!("Reprojected to {width}x{height}");
                    self.dirty = true;
                }
            }
        }

        for id in self.scheduler.due(now) {
            if id == self.terminator_task {
                self.view.refresh_terminator(time_source::now());
            } else if id == self.marker_task {
                log_debug!("Refreshing marker labels");
            }
            // Clock ticks need no recompute, just a redraw
            self.dirty = true;
        }
    }

    fn handle_event(&mut self, event: SurfaceEvent, now: Instant) {
        match event {
            SurfaceEvent::Quit => self.running = false,
            SurfaceEvent::Resized(width, height) => {
                self.pending_viewport = Some((width, height));
                self.resize_debouncer.trigger(now);
            }
            other => {
                let mode = self.mode.clone();
                match mode {
                    InputMode::Normal => self.handle_normal_key(other),
                    InputMode::Search(query) => self.handle_search_key(other, query, now),
                    InputMode::Remove => self.handle_remove_key(other),
                }
            }
        }
    }

    fn handle_normal_key(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Char('q') => self.running = false,
            SurfaceEvent::Char('/') => {
                self.mode = InputMode::Search(String::new());
                self.dirty = true;
            }
            SurfaceEvent::Char('r') => {
                self.mode = InputMode::Remove;
                self.dirty = true;
            }
            SurfaceEvent::Char('f') => {
                self.settings.time_format = match self.settings.time_format {
                    TimeFormat::H12 => TimeFormat::H24,
                    TimeFormat::H24 => TimeFormat::H12,
                };
                self.persist();
                self.dirty = true;
            }
            SurfaceEvent::Char('t') => {
                self.settings.theme = match self.settings.theme {
                    Theme::Light => Theme::Dark,
                    Theme::Dark => Theme::Auto,
                    Theme::Auto => Theme::Light,
                };
                self.theme = self.settings.theme.resolve();
                self.persist();
                self.dirty = true;
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, event: SurfaceEvent, mut query: String, now: Instant) {
        match event {
            SurfaceEvent::Escape => {
                self.mode = InputMode::Normal;
                self.dirty = true;
            }
            SurfaceEvent::Backspace => {
                query.pop();
                self.mode = InputMode::Search(query);
                self.dirty = true;
            }
            SurfaceEvent::Enter => {
                if let Some(city) = cities::search(&query).first().copied() {
                    self.attach_city(city, now);
                    self.persist();
                }
                self.mode = InputMode::Normal;
                self.dirty = true;
            }
            SurfaceEvent::Char(c) if c.is_ascii_digit() && c != '0' => {
                let index = c as usize - '1' as usize;
                if let Some(city) = cities::search(&query).get(index).copied() {
                    self.attach_city(city, now);
                    self.persist();
                    self.mode = InputMode::Normal;
                } else {
                    self.mode = InputMode::Search(query);
                }
                self.dirty = true;
            }
            SurfaceEvent::Char(c) => {
                query.push(c);
                self.mode = InputMode::Search(query);
                self.dirty = true;
            }
            _ => {}
        }
    }

    fn handle_remove_key(&mut self, event: SurfaceEvent) {
        match event {
            SurfaceEvent::Char(c) if c.is_ascii_digit() && c != '0' => {
                let index = c as usize - '1' as usize;
                if let Some(name) = self.entries.get(index).map(|e| e.clock.city.clone()) {
                    self.detach_city(&name);
                    self.persist();
                }
                self.mode = InputMode::Normal;
                self.dirty = true;
            }
            SurfaceEvent::Escape | SurfaceEvent::Enter => {
                self.mode = InputMode::Normal;
                self.dirty = true;
            }
            _ => {}
        }
    }

    /// Draw one complete frame: map, pins with time labels, clock panel,
    /// and the status line for the active mode.
    fn render(&mut self) -> Result<()> {
        let now = time_source::now();
        let frame = self.view.compose();
        self.surface.draw_frame(&frame, self.theme)?;

        for placement in self.view.placements() {
            let time = self
                .entries
                .iter()
                .find(|e| e.clock.city == placement.name)
                .map(|e| e.clock.short_time(now, self.settings.time_format))
                .unwrap_or_default();
            self.surface.draw_text(
                placement.x.round() as u16,
                placement.y.round() as u16,
                "●",
                self.theme,
            )?;
            self.surface.draw_text(
                placement.label_x.round() as u16,
                placement.label_y.round().max(0.0) as u16,
                &format!("{} {}", placement.name, time),
                self.theme,
            )?;
        }

        for (row, entry) in self.entries.iter().enumerate() {
            let line = format!(
                "{}. {:<14} {}  {}",
                row + 1,
                entry.clock.city,
                entry.clock.digital(now, self.settings.time_format),
                entry.clock.date_line(now)
            );
            self.surface.draw_text(0, row as u16, &line, self.theme)?;
        }

        let status = match &self.mode {
            InputMode::Normal => format!(
                "q quit  / search  r remove  f 12/24h ({})  t theme ({})",
                self.settings.time_format, self.settings.theme
            ),
            InputMode::Search(query) => {
                let results = cities::search(query);
                let names: Vec<&str> = results.iter().map(|c| c.name).collect();
                format!("search: {query}_  [{}]", names.join(", "))
            }
            InputMode::Remove => "remove which clock? (1-9, Esc cancels)".to_string(),
        };
        let (_, height) = self.surface.dimensions()?;
        self.surface
            .draw_text(0, height.saturating_sub(1), &status, self.theme)?;

        self.surface.present()
    }

    #[cfg(any(test, feature = "testing-support"))]
    pub fn city_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.clock.city.clone()).collect()
    }

    #[cfg(any(test, feature = "testing-support"))]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[cfg(any(test, feature = "testing-support"))]
    pub fn step(&mut self, event: SurfaceEvent, now: Instant) {
        self.handle_event(event, now);
        self.tick(now);
    }
}

/// Wait for the surface to report non-zero dimensions.
///
/// Terminal multiplexers can report 0x0 briefly during startup; retry on a
/// short delay, bounded so a truly headless environment fails with a clear
/// error instead of hanging.
fn await_viewport(surface: &dyn DisplaySurface) -> Result<(u16, u16)> {
    for attempt in 0..VIEWPORT_RETRY_LIMIT {
        let (width, height) = surface.dimensions()?;
        if width > 0 && height > 0 {
            if attempt > 0 {
                log_debug!("Viewport became available after {attempt} retries");
            }
            return Ok((width, height));
        }
        time_source::sleep(VIEWPORT_RETRY_DELAY);
    }
    Err(anyhow!(
        "display reported zero dimensions for {} attempts; cannot lay out the map",
        VIEWPORT_RETRY_LIMIT
    ))
}
