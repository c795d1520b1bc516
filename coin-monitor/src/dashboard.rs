//! The refresh loop: clear, fetch, compare, lay out, draw, sleep, until cancelled.

use crate::{
    baseline::BaselineStore,
    client::{HttpRateClient, RateClient, RateClientConfig},
    color::color_for,
    config::{DisplayColor, Settings},
    error::{MonitorError, SurfaceError},
    format::{
        clamp_identifier, clamp_percentage, pad_rate, percent_column_offset, percent_field_len,
    },
    history::RateHistory,
    layout::{INFO_LINES, INFO_ORIGIN, Layout, Placement, place_rows},
    snapshot::{RateEntry, SnapshotBuilder},
};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tracing::{debug, info};

/// Terminal drawing primitives the dashboard renders through.
pub trait Surface {
    /// Blank the whole screen.
    fn clear(&mut self);

    /// Write `text` at (`row`, `col`) in `color`.
    fn put(&mut self, row: u16, col: u16, text: &str, color: DisplayColor)
    -> Result<(), SurfaceError>;

    /// Current (height, width).
    fn size(&self) -> (u16, u16);

    /// Show everything written since the last clear.
    fn refresh(&mut self) -> Result<(), SurfaceError>;
}

/// One-way stop flag shared between the key listener and the dashboard loop.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal(Arc<AtomicBool>);

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardState {
    Running,
    Stopped,
}

/// What happened in one refresh cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CycleReport {
    /// Rows drawn
    pub drawn: usize,
    /// Rows that did not fit the terminal
    pub dropped: usize,
    /// Trend color of every row, in coin order
    pub colors: Vec<DisplayColor>,
    /// Draw calls rejected by the surface
    pub skipped_draws: usize,
    /// A zero baseline was hit and the baseline will be recomputed
    pub baseline_reset: bool,
}

/// Live exchange-rate dashboard.
pub struct Dashboard<C, B> {
    settings: Settings,
    builder: SnapshotBuilder<C>,
    history: RateHistory,
    store: B,
    cancel: CancelSignal,
    state: DashboardState,
}

impl<B> Dashboard<HttpRateClient, B>
where
    B: BaselineStore,
{
    /// Dashboard polling the API configured in `settings` over HTTP.
    pub fn from_settings(settings: Settings, store: B, cancel: CancelSignal) -> Self {
        let client = HttpRateClient::new(
            RateClientConfig::new(settings.api.clone()).with_timeout(settings.display.timeout()),
        );
        Self::new(settings, client, store, cancel)
    }
}

impl<C, B> Dashboard<C, B>
where
    C: RateClient,
    B: BaselineStore,
{
    pub fn new(settings: Settings, client: C, store: B, cancel: CancelSignal) -> Self {
        Self {
            builder: SnapshotBuilder::new(client, settings.display.clone()),
            history: RateHistory::new(settings.display.percent_precision),
            settings,
            store,
            cancel,
            state: DashboardState::Running,
        }
    }

    pub fn state(&self) -> DashboardState {
        self.state
    }

    pub fn history(&self) -> &RateHistory {
        &self.history
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &B {
        &self.store
    }

    pub fn client(&self) -> &C {
        self.builder.client()
    }

    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    /// Run refresh cycles until cancelled or a fatal error occurs.
    ///
    /// Cancellation is checked before every cycle, so an in-flight cycle always completes.
    /// The screen is cleared once on the way out.
    pub async fn run<S>(&mut self, surface: &mut S) -> Result<(), MonitorError>
    where
        S: Surface + ?Sized,
    {
        info!(
            coins = self.settings.coins.len(),
            interval_ms = self.settings.display.refresh_ms,
            "Dashboard running"
        );

        let result = loop {
            if self.cancel.is_cancelled() {
                break Ok(());
            }
            if let Err(error) = self.cycle(surface).await {
                break Err(error);
            }
            tokio::time::sleep(self.settings.display.refresh_interval()).await;
        };

        self.state = DashboardState::Stopped;
        surface.clear();
        if let Err(error) = surface.refresh() {
            debug!(%error, "Final terminal refresh failed");
        }

        match &result {
            Ok(()) => info!("Dashboard stopped"),
            Err(error) => info!(%error, "Dashboard stopped on error"),
        }
        result
    }

    /// One refresh cycle.
    pub async fn cycle<S>(&mut self, surface: &mut S) -> Result<CycleReport, MonitorError>
    where
        S: Surface + ?Sized,
    {
        surface.clear();
        let (height, width) = surface.size();

        let snapshot = self.builder.build(&self.settings.coins).await?;
        self.history.ensure_baseline(&snapshot, &mut self.store)?;
        self.history.ensure_previous_len(snapshot.len());

        let layout = place_rows(snapshot.len(), height, width, self.settings.info);
        let mut report = CycleReport {
            colors: Vec::with_capacity(snapshot.len()),
            ..Default::default()
        };

        match &layout {
            Layout::Rates { dropped, .. } => report.dropped = *dropped,
            Layout::Info => draw_info(surface, &self.settings, &mut report),
            Layout::Blank => {}
        }

        for (index, entry) in snapshot.iter().enumerate() {
            let current = entry.value();
            let color = color_for(
                current,
                self.history.previous(index),
                self.history.baseline(index),
            );
            report.colors.push(color);

            if let Some(placement) = layout.placement(index) {
                draw_row(
                    surface,
                    &self.settings,
                    &mut self.history,
                    placement,
                    entry,
                    color,
                    &mut report,
                );
                report.drawn += 1;
            }

            self.history.record_previous(index, current);
        }

        if let Err(error) = surface.refresh() {
            debug!(%error, "Terminal refresh failed");
        }

        Ok(report)
    }
}

fn put_or_skip<S>(
    surface: &mut S,
    report: &mut CycleReport,
    row: u16,
    col: u16,
    text: &str,
    color: DisplayColor,
) where
    S: Surface + ?Sized,
{
    if let Err(error) = surface.put(row, col, text, color) {
        debug!(%error, "Skipped draw");
        report.skipped_draws += 1;
    }
}

fn draw_info<S>(surface: &mut S, settings: &Settings, report: &mut CycleReport)
where
    S: Surface + ?Sized,
{
    let (row, col) = INFO_ORIGIN;
    for (offset, line) in INFO_LINES.iter().enumerate() {
        put_or_skip(
            surface,
            report,
            row + offset as u16,
            col,
            line,
            settings.info_color,
        );
    }
}

/// Draw "COIN/CUR: rate pct" for one row.
fn draw_row<S>(
    surface: &mut S,
    settings: &Settings,
    history: &mut RateHistory,
    placement: Placement,
    entry: &RateEntry,
    color: DisplayColor,
    report: &mut CycleReport,
) where
    S: Surface + ?Sized,
{
    let display = &settings.display;
    let (y, x) = (placement.row(), placement.x());

    let coin = clamp_identifier(&entry.symbol, display.coin_len);
    let currency = clamp_identifier(&entry.currency, display.currency_len);
    let label = format!("{}/{}:", coin, currency);
    let coin_len = coin.chars().count() as u16;
    let currency_len = currency.chars().count() as u16;

    put_or_skip(surface, report, y, x, &coin, entry.coin_color);
    put_or_skip(surface, report, y, x + coin_len, "/", settings.marks_color);
    put_or_skip(
        surface,
        report,
        y,
        x + coin_len + 1,
        &currency,
        entry.currency_color,
    );
    put_or_skip(
        surface,
        report,
        y,
        x + coin_len + 1 + currency_len,
        ":",
        settings.marks_color,
    );
    put_or_skip(
        surface,
        report,
        y,
        x + coin_len + currency_len + 3,
        &pad_rate(&label, &entry.rate, display.coin_width, display.rate_width),
        color,
    );

    if !entry.is_available() {
        return;
    }

    match history.percent_change(placement.index, entry.value()) {
        Ok(pct) => {
            let base_x = x.saturating_add(
                (display.coin_width + display.rate_width + display.percent_gap) as u16,
            );
            put_or_skip(
                surface,
                report,
                y,
                percent_column_offset(base_x, &pct),
                &clamp_percentage(&pct, percent_field_len(&pct, display.percent_width)),
                color,
            );
        }
        Err(error) => {
            debug!(%error, symbol = %entry.symbol, "Skipping percentage");
            history.invalidate_baseline();
            report.baseline_reset = true;
        }
    }
}
