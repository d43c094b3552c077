//! `FleetOutputObserver<W>` — bridges `FleetObserver` to an `OutputWriter`.

use ft_arbiter::TrafficEvent;
use ft_core::{FleetClock, FleetConfig, Tick};
use ft_fleet::FleetObserver;
use ft_registry::FleetRegistry;

use crate::row::{AgentSnapshotRow, TickSummaryRow, TrafficEventRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`FleetObserver`] that writes traffic events, agent snapshots and tick
/// summaries to any [`OutputWriter`] backend.
///
/// Events are buffered for the tick and written as one batch at tick end.
/// Errors from the writer are stored internally because `FleetObserver`
/// methods have no return value.  After `sim.run()` returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct FleetOutputObserver<W: OutputWriter> {
    writer:           W,
    clock:            FleetClock,
    pending:          Vec<TrafficEventRow>,
    last_error:       Option<OutputError>,
}

impl<W: OutputWriter> FleetOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` for elapsed-time
    /// conversion.
    pub fn new(writer: W, config: &FleetConfig) -> Self {
        Self {
            writer,
            clock:            config.make_clock(),
            pending:          Vec::new(),
            last_error:       None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                tracing::error!(error = %e, "output write failed");
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> FleetObserver for FleetOutputObserver<W> {
    fn on_traffic_event(&mut self, tick: Tick, event: &TrafficEvent) {
        self.pending.push(TrafficEventRow::from_event(tick, event));
    }

    fn on_tick_end(&mut self, tick: Tick, moved: usize) {
        let events = std::mem::take(&mut self.pending);
        if !events.is_empty() {
            let result = self.writer.write_events(&events);
            self.store_err(result);
        }

        let row = TickSummaryRow {
            tick:         tick.0,
            elapsed_ms:   self.clock.ms_at(tick),
            moved_agents: moved as u64,
            events:       events.len() as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, registry: &FleetRegistry) {
        let rows: Vec<AgentSnapshotRow> = registry
            .ids()
            .map(|agent| {
                let i = agent.index();
                AgentSnapshotRow {
                    agent_id:  agent.0,
                    tick:      tick.0,
                    status:    registry.status[i].as_str(),
                    location:  registry.location[i].0,
                    next_node: registry.next_node[i].0,
                    battery:   registry.battery[i],
                }
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
