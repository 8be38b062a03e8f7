//! Observers of a level's outcome.
//!
//! The level keeps weak handles only: whoever registers an observer owns it, and an observer that
//! has been dropped is skipped. Notifications are not latched, so an observer hears about a won
//! or lost level again on every move processed while the condition holds.

use std::sync::{Arc, Weak};

use serde::{Serialize, Deserialize};
use tokio::sync::mpsc::UnboundedSender;

pub trait LevelObserver: Send + Sync {
    /// The level has been won. Typically the level should be stopped when this is received.
    fn level_won(&self);

    /// The level has been lost. Typically the level should be stopped when this is received.
    fn level_lost(&self);
}

#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Weak<dyn LevelObserver>>,
}

impl ObserverSet {
    /// Adding an observer that is already registered has no effect.
    pub fn add(&mut self, observer: &Arc<dyn LevelObserver>) {
        let handle = Arc::downgrade(observer);
        if !self.observers.iter().any(|known| Weak::ptr_eq(known, &handle)) {
            self.observers.push(handle);
        }
    }

    pub fn remove(&mut self, observer: &Arc<dyn LevelObserver>) {
        let handle = Arc::downgrade(observer);
        self.observers.retain(|known| !Weak::ptr_eq(known, &handle));
    }

    /// Number of registered observers that are still alive.
    pub fn len(&self) -> usize {
        self.observers.iter().filter(|o| o.strong_count() > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn notify_won(&mut self) {
        self.observers.retain(|o| o.strong_count() > 0);
        for observer in self.observers.iter().filter_map(Weak::upgrade) {
            observer.level_won();
        }
    }

    pub fn notify_lost(&mut self) {
        self.observers.retain(|o| o.strong_count() > 0);
        for observer in self.observers.iter().filter_map(Weak::upgrade) {
            observer.level_lost();
        }
    }
}

/// Outcome forwarded by [`ChannelObserver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEnd {
    Won,
    Lost,
}

/// Forwards every notification to a channel, for consumers outside the level session.
pub struct ChannelObserver {
    tx: UnboundedSender<GameEnd>,
}

impl ChannelObserver {
    pub fn new(tx: UnboundedSender<GameEnd>) -> Self {
        Self { tx }
    }
}

impl LevelObserver for ChannelObserver {
    fn level_won(&self) {
        // The receiver may already be gone when the game is shutting down.
        let _ = self.tx.send(GameEnd::Won);
    }

    fn level_lost(&self) {
        let _ = self.tx.send(GameEnd::Lost);
    }
}
