use actix::prelude::*;
use std::collections::HashMap;
use actix::MessageResult;
use uuid::Uuid;
use log::{debug, info};

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::demo::render_ascii;
use crate::game::level::{Level, LevelStatus, MoveOutcome};
use crate::game::types::{Direction, UnitId};
use crate::game::unit::UnitClass;
use crate::session::level_session::messages::{
    ActiveSchedules, AddObserver, CheckConsistency, GetSnapshot, IsInProgress, MoveUnit, RegisterPlayer,
    RemoveObserver, RenderBoard, Start, Stop,
};
use crate::session::level_session::scheduling;
use crate::session::reporter::{LevelEvent, Report, Reporter};

/// Owns one level and serializes everything that touches it: player moves arrive as messages,
/// NPC moves fire from timers on the same context.
pub struct LevelSession {
    pub session_id: Uuid,
    pub(crate) level: Level,
    pub(crate) config: GameConfig,
    pub(crate) schedules: HashMap<UnitId, SpawnHandle>,
    reporter: Option<Addr<Reporter>>,
}

impl Actor for LevelSession {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(
            "[LevelSession] Created session={} board={}x{} npcs={}",
            self.session_id,
            self.level.board().width(),
            self.level.board().height(),
            self.level.npc_units().count()
        );
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        info!("[LevelSession] Session {} closed", self.session_id);
    }
}

impl LevelSession {
    pub fn new(level: Level, config: GameConfig, reporter: Option<Addr<Reporter>>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            level,
            config,
            schedules: HashMap::new(),
            reporter,
        }
    }

    pub(crate) fn report(&self, event: LevelEvent) {
        if let Some(reporter) = &self.reporter {
            reporter.do_send(Report { session_id: self.session_id, event });
        }
    }

    fn report_status(&self, status: LevelStatus) {
        let score = self.level.first_player_score();
        if status.lost {
            self.report(LevelEvent::LevelLost { score });
        }
        if status.won {
            self.report(LevelEvent::LevelWon { score });
        }
    }

    fn start_level(&mut self, ctx: &mut Context<Self>) -> bool {
        let status = match self.level.start() {
            Some(status) => status,
            None => return false,
        };
        if self.config.disable_npcs {
            debug!("[LevelSession] NPCs disabled for session={}", self.session_id);
        } else {
            scheduling::start_npcs(self, ctx);
        }
        self.report(LevelEvent::GameStarted);
        self.report_status(status);
        true
    }

    fn stop_level(&mut self, ctx: &mut Context<Self>) -> bool {
        if !self.level.stop() {
            return false;
        }
        scheduling::stop_npcs(self, ctx);
        true
    }

    /// Apply a move to the level and report it.
    pub(crate) fn apply_move(&mut self, unit: UnitId, direction: Direction) -> Result<MoveOutcome, GameError> {
        let outcome = self.level.move_unit(unit, direction)?;
        if outcome.has_moved() {
            let (dx, dy) = direction.delta();
            if self.level.board().unit(unit).class() == UnitClass::Player {
                self.report(LevelEvent::PlayerMoved { unit, dx, dy });
            } else {
                self.report(LevelEvent::NpcMoved { npc: unit, dx, dy });
            }
        }
        if let Some(status) = outcome.status() {
            self.report_status(status);
        }
        Ok(outcome)
    }
}

impl Handler<Start> for LevelSession {
    type Result = bool;

    fn handle(&mut self, _: Start, ctx: &mut Context<Self>) -> Self::Result {
        self.start_level(ctx)
    }
}

impl Handler<Stop> for LevelSession {
    type Result = bool;

    fn handle(&mut self, _: Stop, ctx: &mut Context<Self>) -> Self::Result {
        self.stop_level(ctx)
    }
}

impl Handler<MoveUnit> for LevelSession {
    type Result = Result<MoveOutcome, GameError>;

    fn handle(&mut self, msg: MoveUnit, _: &mut Context<Self>) -> Self::Result {
        self.apply_move(msg.unit, msg.direction)
    }
}

impl Handler<RegisterPlayer> for LevelSession {
    type Result = ();

    fn handle(&mut self, msg: RegisterPlayer, _: &mut Context<Self>) -> Self::Result {
        self.level.register_player(msg.unit);
    }
}

impl Handler<AddObserver> for LevelSession {
    type Result = ();

    fn handle(&mut self, msg: AddObserver, _: &mut Context<Self>) -> Self::Result {
        self.level.add_observer(&msg.0);
    }
}

impl Handler<RemoveObserver> for LevelSession {
    type Result = ();

    fn handle(&mut self, msg: RemoveObserver, _: &mut Context<Self>) -> Self::Result {
        self.level.remove_observer(&msg.0);
    }
}

impl Handler<GetSnapshot> for LevelSession {
    type Result = MessageResult<GetSnapshot>;

    fn handle(&mut self, _: GetSnapshot, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.level.snapshot())
    }
}

impl Handler<IsInProgress> for LevelSession {
    type Result = bool;

    fn handle(&mut self, _: IsInProgress, _: &mut Context<Self>) -> Self::Result {
        self.level.is_in_progress()
    }
}

impl Handler<ActiveSchedules> for LevelSession {
    type Result = MessageResult<ActiveSchedules>;

    fn handle(&mut self, _: ActiveSchedules, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.schedules.len())
    }
}

impl Handler<CheckConsistency> for LevelSession {
    type Result = bool;

    fn handle(&mut self, _: CheckConsistency, _: &mut Context<Self>) -> Self::Result {
        self.level.is_consistent()
    }
}

impl Handler<RenderBoard> for LevelSession {
    type Result = String;

    fn handle(&mut self, _: RenderBoard, _: &mut Context<Self>) -> Self::Result {
        render_ascii(self.level.board())
    }
}
