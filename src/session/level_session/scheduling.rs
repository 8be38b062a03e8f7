/// NPC timer management for LevelSession.
/// Each NPC owns one pending `run_later` timer. A timer is re-armed only once the move it
/// triggered has been applied, so the interval is measured from the end of the previous move.

use actix::prelude::*;
use log::{debug, error};
use std::time::Duration;

use crate::error::GameError;
use crate::game::level::MoveOutcome;
use crate::game::types::UnitId;
use crate::session::level_session::server::LevelSession;
use crate::session::reporter::LevelEvent;

/// Arm a timer for every NPC. The first move of each NPC happens after half its interval.
pub fn start_npcs(this: &mut LevelSession, ctx: &mut Context<LevelSession>) {
    // Stale handles from a previous run would double the rate.
    stop_npcs(this, ctx);

    let npcs: Vec<UnitId> = this.level.npc_units().collect();
    for npc in npcs {
        let delay = this.level.npc_interval(npc) / 2;
        schedule_npc(this, ctx, npc, delay);
    }
    debug!("[Scheduling] {} NPC timers armed", this.schedules.len());
}

/// Cancel every pending NPC timer.
pub fn stop_npcs(this: &mut LevelSession, ctx: &mut Context<LevelSession>) {
    if this.schedules.is_empty() {
        return;
    }
    debug!("[Scheduling] Cancelling {} NPC timers", this.schedules.len());
    for (_, handle) in this.schedules.drain() {
        ctx.cancel_future(handle);
    }
}

pub fn schedule_npc(this: &mut LevelSession, ctx: &mut Context<LevelSession>, npc: UnitId, delay: Duration) {
    let handle = ctx.run_later(delay, move |act, ctx| {
        npc_tick(act, ctx, npc);
    });
    if let Some(previous) = this.schedules.insert(npc, handle) {
        ctx.cancel_future(previous);
    }
}

/// One firing of an NPC timer: move the NPC, then re-arm it.
fn npc_tick(this: &mut LevelSession, ctx: &mut Context<LevelSession>, npc: UnitId) {
    this.schedules.remove(&npc);
    if !this.level.is_in_progress() {
        return;
    }

    match move_npc(this, npc) {
        Ok(_) => {
            let interval = this.level.npc_interval(npc);
            schedule_npc(this, ctx, npc, interval);
        }
        Err(e) => {
            error!("[Scheduling] {} stopped moving: {}", npc, e);
            this.report(LevelEvent::NpcFailed { npc, reason: e.to_string() });
        }
    }
}

/// Ask the NPC for a direction and apply it. Returns `None` when the NPC did not move: it is
/// not on the board or chose to stay put.
pub fn move_npc(this: &mut LevelSession, npc: UnitId) -> Result<Option<MoveOutcome>, GameError> {
    if !this.level.board().unit(npc).has_square() {
        return Ok(None);
    }
    match this.level.next_npc_move(npc)? {
        Some(direction) => this.apply_move(npc, direction).map(Some),
        None => Ok(None),
    }
}
