//! Fire-and-forget reporting of game events.
//!
//! The level session hands events to the [`Reporter`] with `do_send` once a move has been
//! processed, so reporting never stalls other moves. The reporter serializes each event, logs it
//! and buffers it until drained with [`TakeReports`]. Nothing is sent over the network.

use std::collections::VecDeque;

use actix::prelude::*;
use log::{debug, info, warn};
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::config::ReportingConfig;
use crate::config::reporting::{APPLICATION_NAME, APPLICATION_VERSION, REPORT_BUFFER_CAPACITY, SCORE_ENDPOINT};
use crate::error::GameError;
use crate::game::types::UnitId;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "action", content = "data")]
pub enum LevelEvent {
    GameStarted,
    PlayerMoved { unit: UnitId, dx: i32, dy: i32 },
    NpcMoved { npc: UnitId, dx: i32, dy: i32 },
    LevelWon { score: i64 },
    LevelLost { score: i64 },
    /// An NPC's decision capability failed; the NPC is no longer scheduled.
    NpcFailed { npc: UnitId, reason: String },
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct Report {
    pub session_id: Uuid,
    pub event: LevelEvent,
}

/// Drain the buffered records.
#[derive(Message)]
#[rtype(result = "Vec<ReportRecord>")]
pub struct TakeReports;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ReportRecord {
    pub session_id: Uuid,
    pub application_id: String,
    pub device_id: u64,
    /// Where the payload is addressed to.
    pub target: String,
    /// JSON body.
    pub payload: String,
}

#[derive(Serialize)]
struct ScorePayload<'a> {
    score: ScoreEntry<'a>,
}

#[derive(Serialize)]
struct ScoreEntry<'a> {
    name: &'a str,
    value: i64,
}

/// End-of-level score body: `{"score":{"name":"player","value":<score>}}`.
pub fn score_payload(score: i64) -> Result<String, GameError> {
    let payload = ScorePayload { score: ScoreEntry { name: "player", value: score } };
    Ok(serde_json::to_string(&payload)?)
}

pub struct Reporter {
    config: ReportingConfig,
    records: VecDeque<ReportRecord>,
}

impl Reporter {
    pub fn new(config: ReportingConfig) -> Self {
        Self { config, records: VecDeque::new() }
    }

    fn push(&mut self, session_id: Uuid, target: &str, payload: String) {
        if self.records.len() >= REPORT_BUFFER_CAPACITY {
            self.records.pop_front();
        }
        self.records.push_back(ReportRecord {
            session_id,
            application_id: self.config.application_id.clone(),
            device_id: self.config.device_id,
            target: target.to_string(),
            payload,
        });
    }
}

impl Actor for Reporter {
    type Context = Context<Self>;

    fn started(&mut self, _ctx: &mut Self::Context) {
        info!(
            "[Reporter] {} {} reporting to {} as application={} device={}",
            APPLICATION_NAME, APPLICATION_VERSION, self.config.beacon_url, self.config.application_id, self.config.device_id
        );
    }
}

impl Handler<Report> for Reporter {
    type Result = ();

    fn handle(&mut self, msg: Report, _: &mut Context<Self>) -> Self::Result {
        let payload = match serde_json::to_string(&msg.event) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("[Reporter] Dropped event for session={}: {}", msg.session_id, e);
                return;
            }
        };
        debug!("[Reporter] session={} {}", msg.session_id, payload);
        let beacon_url = self.config.beacon_url.clone();
        self.push(msg.session_id, &beacon_url, payload);

        let score = match msg.event {
            LevelEvent::LevelWon { score } | LevelEvent::LevelLost { score } => score,
            _ => return,
        };
        match score_payload(score) {
            Ok(body) => {
                info!("[Reporter] Score for session={} to {}: {}", msg.session_id, SCORE_ENDPOINT, body);
                self.push(msg.session_id, SCORE_ENDPOINT, body);
            }
            Err(e) => warn!("[Reporter] Could not build score payload: {}", e),
        }
    }
}

impl Handler<TakeReports> for Reporter {
    type Result = MessageResult<TakeReports>;

    fn handle(&mut self, _: TakeReports, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.records.drain(..).collect())
    }
}
