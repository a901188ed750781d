use dodgecoin_common::Aabb;
use dodgecoin_input::{Action, InputScript};
use dodgecoin_kernel::SceneEvent;
use dodgecoin_stream::{
    BodyKind, ConfigurationError, GridCoord, LevelScene, PlayerEntered, RoomEntryListener,
    RoomGridStreamer, StreamError, rooms,
};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bootstrap::LevelBootstrap;
use crate::coin::Coin;
use crate::config::{ConfigError, LevelConfig};
use crate::detector::TriggerDetector;
use crate::menu::{ButtonAction, GameState, SurvivalTimer, Transition};
use crate::player::Player;

/// Frame length used when none is given.
pub const DEFAULT_FRAME_SECS: f32 = 1.0 / 60.0;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("level error: {0}")]
    Level(#[from] ConfigurationError),
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),
}

/// Something that happened during a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    StateChanged { from: GameState, to: GameState },
    LevelStarted { rooms: usize },
    RoomEntered { room: GridCoord },
    Regenerated { center: GridCoord, rooms: usize },
    CoinsSpawned { count: usize },
    GameOver { survived_secs: f32 },
}

/// An event tagged with the frame it happened in.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameEvent {
    pub frame: u64,
    pub event: SessionEvent,
}

/// Running totals of structural scene changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SceneCounters {
    pub added: u64,
    pub freed: u64,
}

impl SceneCounters {
    fn record(&mut self, event: &SceneEvent) {
        match event {
            SceneEvent::Added { .. } => self.added += 1,
            SceneEvent::Freed { .. } => self.freed += 1,
            SceneEvent::Stepped { .. } => {}
        }
    }

    /// Nodes added and not yet freed.
    pub fn live(&self) -> u64 {
        self.added.saturating_sub(self.freed)
    }
}

/// A headless game: the level scene, its streamer and the bodies in it,
/// advanced one frame per action.
pub struct Session {
    config: LevelConfig,
    scene: LevelScene,
    streamer: RoomGridStreamer,
    detector: TriggerDetector,
    player: Player,
    coins: Vec<Coin>,
    state: GameState,
    timer: SurvivalTimer,
    rng: StdRng,
    counters: SceneCounters,
}

impl Session {
    pub fn new(config: LevelConfig, seed: u64) -> Result<Self, SessionError> {
        config.validate()?;
        let streamer = RoomGridStreamer::new(config.stream.clone(), config.archetypes.clone())?;
        let spawn = streamer.cell_size() * 0.5;
        let player = Player::spawn(spawn, &config.player);
        Ok(Self {
            config,
            scene: LevelScene::new(),
            streamer,
            detector: TriggerDetector::new(),
            player,
            coins: Vec::new(),
            state: GameState::Menu,
            timer: SurvivalTimer::default(),
            rng: StdRng::seed_from_u64(seed),
            counters: SceneCounters::default(),
        })
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn scene(&self) -> &LevelScene {
        &self.scene
    }

    pub fn streamer(&self) -> &RoomGridStreamer {
        &self.streamer
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn coins(&self) -> &[Coin] {
        &self.coins
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn survived_secs(&self) -> f32 {
        self.timer.elapsed_secs()
    }

    pub fn frame(&self) -> u64 {
        self.scene.frame()
    }

    /// Structural scene changes since the session was created.
    pub fn scene_counters(&self) -> SceneCounters {
        self.counters
    }

    /// Run one frame.
    ///
    /// Order: buttons, player movement, trigger detection and dispatch,
    /// deferred flush, coins, coin/player contact, then the frame counter.
    pub fn step(&mut self, action: Action, dt: f32) -> Result<Vec<SessionEvent>, SessionError> {
        let _span = tracing::debug_span!("frame", frame = self.scene.frame()).entered();
        let mut events = Vec::new();

        if let Some(button) = ButtonAction::from_action(&action) {
            match self.state.press(button) {
                Transition::StartRun => self.start_run(&mut events)?,
                Transition::Exit => self.set_state(GameState::Quit, &mut events),
                Transition::Ignored => {}
            }
        }

        if self.state == GameState::Playing {
            self.play_frame(action.movement(), dt, &mut events)?;
        }

        self.scene.step();
        for event in self.scene.drain_events() {
            self.counters.record(&event);
        }
        Ok(events)
    }

    /// Feed a script frame by frame until it ends or the game quits.
    pub fn run_script(&mut self, script: &InputScript, dt: f32) -> Result<Vec<FrameEvent>, SessionError> {
        let mut log = Vec::new();
        for action in script.actions() {
            if !self.state.is_running() {
                break;
            }
            let frame = self.frame();
            log.extend(
                self.step(action, dt)?
                    .into_iter()
                    .map(|event| FrameEvent { frame, event }),
            );
        }
        Ok(log)
    }

    fn start_run(&mut self, events: &mut Vec<SessionEvent>) -> Result<(), SessionError> {
        let start = LevelBootstrap.start(&mut self.scene, &mut self.streamer, &mut self.rng)?;
        self.player = Player::spawn(start.spawn_point, &self.config.player);
        self.coins.clear();
        self.detector.reset();
        self.detector.prime(&self.scene, self.player.position());
        self.timer.reset();
        events.push(SessionEvent::LevelStarted {
            rooms: start.rooms.len(),
        });
        self.set_state(GameState::Playing, events);
        Ok(())
    }

    fn set_state(&mut self, to: GameState, events: &mut Vec<SessionEvent>) {
        if self.state == to {
            return;
        }
        let from = self.state;
        self.state = to;
        tracing::info!(?from, ?to, "game state changed");
        events.push(SessionEvent::StateChanged { from, to });
    }

    fn play_frame(&mut self, direction: Vec2, dt: f32, events: &mut Vec<SessionEvent>) -> Result<(), SessionError> {
        let walls = self.walls();
        self.player.step(direction, dt, &walls);

        let entered = self
            .detector
            .detect(&self.scene, BodyKind::Player, self.player.position());
        for event in entered {
            events.push(SessionEvent::RoomEntered { room: event.room });
            self.dispatch(event);
        }

        let generations = self.streamer.stats().generations;
        self.streamer.flush(&mut self.scene, &mut self.rng)?;
        if self.streamer.stats().generations > generations {
            events.push(SessionEvent::Regenerated {
                center: self.streamer.center(),
                rooms: self.streamer.neighborhood_nodes().len(),
            });
        }
        self.detector.prime(&self.scene, self.player.position());

        self.update_coins(dt, events);

        self.timer.tick(dt);
        let body = self.player.bounds();
        if self.coins.iter().any(|c| c.is_moving() && c.touches(&body)) {
            let survived_secs = self.timer.elapsed_secs();
            tracing::info!(survived_secs, "player hit by coin");
            events.push(SessionEvent::GameOver { survived_secs });
            self.set_state(GameState::GameOver, events);
        }
        Ok(())
    }

    fn dispatch(&mut self, event: PlayerEntered) {
        if event.listener == self.streamer.listener_id() {
            RoomEntryListener::on_player_entered(&mut self.streamer, &mut self.scene, event);
        } else {
            tracing::warn!(room = %event.room, listener = ?event.listener, "room entry for unknown listener");
        }
    }

    fn update_coins(&mut self, dt: f32, events: &mut Vec<SessionEvent>) {
        let live: Vec<Aabb> = self
            .streamer
            .neighborhood(&self.scene)
            .iter()
            .map(|room| room.bounds())
            .collect();
        let coins = &self.config.coins;

        if coins.spawn_chance > 0.0 && self.rng.gen_bool(coins.spawn_chance) {
            for bounds in &live {
                self.coins.push(Coin::spawn_in(*bounds, coins, &mut self.rng));
            }
            tracing::debug!(count = live.len(), "coins spawned");
            events.push(SessionEvent::CoinsSpawned { count: live.len() });
        }

        let walls = self.walls();
        for coin in &mut self.coins {
            coin.update(dt, coins.speed, &walls, &mut self.rng);
        }
        self.coins
            .retain(|coin| live.iter().any(|bounds| bounds.contains(coin.position())));
    }

    fn walls(&self) -> Vec<Aabb> {
        rooms(&self.scene)
            .iter()
            .flat_map(|(_, room)| room.wall_segments())
            .collect()
    }
}
