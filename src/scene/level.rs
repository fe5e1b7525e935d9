//! The gameplay scene.
//!
//! One frame of [`LevelScene::update`] runs in a fixed order:
//!
//! 1. Entities that died last frame are removed.
//! 2. A transition requested by input (pausing) is returned before anything moves.
//! 3. Buffered presses are handed to the player; bow shots spawn arrows.
//! 4. Every entity moves, enemies decide what to do.
//! 5. Collision detection queues [`GameEvent`]s, which are then drained in FIFO order and the game rules applied.
//! 6. The spawner, particles, score, background and camera advance.

use glam::{IVec2, Vec2};
use rand::Rng;
use smallvec::SmallVec;
use tracing::{debug, info, trace, warn};

use crate::asset::load_level;
use crate::background::Background;
use crate::camera::Camera;
use crate::constants::{self, palette};
use crate::emotion::Trigger;
use crate::entity::ability::{Attack, Unlocks};
use crate::entity::collision;
use crate::entity::companion::Companion;
use crate::entity::enemy::{Enemy, EnemySpawner};
use crate::entity::item::{Item, ItemKind};
use crate::entity::player::{Player, PlayerCommand};
use crate::entity::projectile::Projectile;
use crate::entity::{Entities, Entity, EntityId, EntityKind, Facing};
use crate::error::{GameError, GameResult};
use crate::events::{Action, EventQueue, GameEvent, InputEvent};
use crate::hud::{self, HudView};
use crate::input::InputState;
use crate::map::{Level, SpawnKind, Tile};
use crate::particles::ParticleSystem;
use crate::render::{Color, DrawSurface, Sprite};
use crate::scene::game_over::GameOverSummary;
use crate::scene::{RenderContext, SceneContext, SceneId, Transition};
use crate::score::Score;

pub struct LevelScene {
    name: String,
    level: Option<Level>,
    entities: Entities,
    events: EventQueue,
    input: InputState,
    /// Actions pressed since the last update, in order.
    pressed: SmallVec<[Action; 8]>,
    camera: Camera,
    particles: ParticleSystem,
    background: Option<Background>,
    score: Score,
    spawner: EnemySpawner,
    unlocks: Unlocks,
    gravity: f32,
    decay_per_second: f32,
    burst_speed: f32,
    burst_lifetime: f32,
    /// Counts down from the player's death to the game over screen.
    death_timer: Option<f32>,
    death_unlock: Option<Unlocks>,
    pending: Transition,
}

impl LevelScene {
    /// A level that will load `name` on enter, continuing `score` if given.
    pub fn new(name: impl Into<String>, score: Option<Score>) -> Self {
        Self {
            name: name.into(),
            level: None,
            entities: Entities::default(),
            events: EventQueue::default(),
            input: InputState::default(),
            pressed: SmallVec::new(),
            camera: Camera::new(Vec2::ZERO, None),
            particles: ParticleSystem::new(constants::particles::MAX_PARTICLES),
            background: None,
            score: score.unwrap_or_default(),
            spawner: EnemySpawner::default(),
            unlocks: Unlocks::default(),
            gravity: constants::physics::GRAVITY,
            decay_per_second: constants::emotion::DECAY_PER_SECOND,
            burst_speed: constants::particles::BURST_SPEED,
            burst_lifetime: constants::particles::BURST_LIFETIME,
            death_timer: None,
            death_unlock: None,
            pending: Transition::None,
        }
    }

    /// Builds a running scene from an already parsed level.
    pub fn from_level(level: Level, ctx: &mut SceneContext<'_>) -> Self {
        let mut scene = Self::new(level.name.clone(), None);
        scene.populate(level, ctx);
        scene
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut Entities {
        &mut self.entities
    }

    pub fn player(&self) -> Option<&Player> {
        self.entities.player()
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn spawner_mut(&mut self) -> &mut EnemySpawner {
        &mut self.spawner
    }

    pub fn is_player_dead(&self) -> bool {
        self.death_timer.is_some()
    }

    /// Loads the level data.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::LevelLoad`] if the level is unknown or invalid.
    pub fn enter(&mut self, ctx: &mut SceneContext<'_>) -> GameResult<()> {
        let level = load_level(&self.name)?;
        self.populate(level, ctx);
        Ok(())
    }

    fn populate(&mut self, level: Level, ctx: &mut SceneContext<'_>) {
        let config = ctx.config;
        self.unlocks = ctx.progress.unlocks;
        self.gravity = config.gravity;
        self.decay_per_second = config.emotion.decay_per_second;
        self.burst_speed = config.particles.burst_speed;
        self.burst_lifetime = config.particles.burst_lifetime;
        self.camera = Camera::new(config.viewport(), config.camera_lerp);
        self.particles = ParticleSystem::new(config.particles.max_particles);
        self.background = Some(Background::new(level.theme, level.weather, config.viewport()));
        self.entities = Entities::default();
        self.events.clear();
        self.death_timer = None;
        self.death_unlock = None;

        let spawn = level.spawn_position(level.player_spawn(), constants::player::SIZE);
        let decay = self.decay_per_second;
        let unlocks = self.unlocks;
        let mut inventory = ctx.progress.inventory.clone();
        inventory.normalize();
        self.entities.spawn(|id| {
            let mut player = Player::new(id, spawn, decay);
            player.inventory = inventory;
            player.abilities.sanitize(unlocks);
            Entity::Player(Box::new(player))
        });

        let level_width = level.size().x;
        for point in level.spawns() {
            let tile = point.tile;
            match point.kind {
                SpawnKind::Slime => {
                    let position = level.spawn_position(tile, constants::enemy::SLIME_SIZE);
                    self.entities
                        .spawn(|id| Entity::Enemy(Enemy::slime(id, position, level_width)));
                }
                SpawnKind::Coin => {
                    let position = level.spawn_position(tile, constants::item::SIZE);
                    self.entities
                        .spawn(|id| Entity::Item(Item::new(id, ItemKind::Coin, position)));
                }
                SpawnKind::Heart if unlocks.contains(Unlocks::HEARTS) => {
                    let position = level.spawn_position(tile, constants::item::SIZE);
                    self.entities
                        .spawn(|id| Entity::Item(Item::new(id, ItemKind::Heart, position)));
                }
                SpawnKind::Companion => {
                    let position = level.spawn_position(tile, constants::companion::SIZE);
                    self.entities
                        .spawn(|id| Entity::Companion(Companion::new(id, position, decay)));
                }
                SpawnKind::Heart | SpawnKind::Player => {}
            }
        }

        if let Some(player) = self.entities.player() {
            self.camera.snap_to(player.actor.center(), level.size());
        }
        info!(
            level = %level.name,
            entities = self.entities.len(),
            unlocks = ?self.unlocks,
            "Level started"
        );
        self.name = level.name.clone();
        self.level = Some(level);
    }

    /// Called when an overlay above this level closes. Keys held before pausing are forgotten.
    pub fn resume(&mut self) {
        self.input.clear();
        self.pressed.clear();
    }

    /// Keeps the inventory in the saved progress.
    pub fn exit(&mut self, ctx: &mut SceneContext<'_>) {
        if let Some(player) = self.entities.player() {
            ctx.progress.inventory = player.inventory.clone();
        }
    }

    /// Consumes every input except quitting, which the game handles.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::Pressed(Action::Pause) => {
                self.pending = Transition::Push(SceneId::Pause);
            }
            InputEvent::Pressed(action) => {
                self.input.apply(event);
                self.pressed.push(action);
            }
            InputEvent::Released(_) => self.input.apply(event),
            InputEvent::Quit => return false,
        }
        true
    }

    /// Runs one frame.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidState`] if the level was never entered.
    pub fn update(&mut self, dt: f32, ctx: &mut SceneContext<'_>) -> GameResult<Transition> {
        let level = self
            .level
            .take()
            .ok_or_else(|| GameError::InvalidState(format!("level '{}' updated before enter", self.name)))?;
        let transition = self.step(&level, dt, ctx);
        self.level = Some(level);
        Ok(transition)
    }

    fn step(&mut self, level: &Level, dt: f32, ctx: &mut SceneContext<'_>) -> Transition {
        let removed = self.entities.remove_dead();
        if !removed.is_empty() {
            trace!(count = removed.len(), ?removed, "Removed dead entities");
        }

        if !self.pending.is_none() {
            return std::mem::take(&mut self.pending);
        }

        if let Some(timer) = self.death_timer.as_mut() {
            *timer -= dt;
            if *timer <= 0.0 {
                return self.finish(false, level, ctx);
            }
        }

        self.handle_presses(ctx);
        self.move_entities(level, dt);

        collision::detect(&self.entities, &mut self.events);
        if let Some(player) = self.entities.player().filter(|player| player.actor.is_alive()) {
            collision::detect_tiles(level, &player.actor.rect(), &mut self.events);
        }

        let mut transition = Transition::None;
        while let Some(event) = self.events.pop() {
            let next = self.apply_event(event, level, ctx);
            if transition.is_none() {
                transition = next;
            }
        }
        if !transition.is_none() {
            return transition;
        }

        self.spawn_enemies(level, dt, ctx);

        self.particles.update(dt);
        if self.death_timer.is_none() {
            self.score.update(dt);
        }
        if let Some(background) = self.background.as_mut() {
            background.update(dt);
        }
        if let Some(player) = self.entities.player() {
            self.camera.update(player.actor.center(), level.size());
        }
        Transition::None
    }

    fn handle_presses(&mut self, ctx: &mut SceneContext<'_>) {
        let unlocks = self.unlocks;
        let mut arrows: SmallVec<[(Vec2, Facing); 2]> = SmallVec::new();
        let mut healed = None;

        if let Some(player) = self.entities.player_mut() {
            for action in self.pressed.drain(..) {
                match player.press(action, unlocks) {
                    Some(PlayerCommand::Attack(Attack::Shot)) => {
                        arrows.push((player.actor.center(), player.actor.facing));
                    }
                    Some(PlayerCommand::Attack(Attack::Swing)) => trace!("Sword swing"),
                    Some(PlayerCommand::Dashed) => trace!("Dash"),
                    Some(PlayerCommand::Healed(amount)) => {
                        debug!(amount, health = player.actor.health.current(), "Used a heart");
                        healed = Some(player.actor.center());
                    }
                    None => {}
                }
            }
        } else {
            self.pressed.clear();
        }

        for (origin, facing) in arrows {
            let id = self
                .entities
                .spawn(|id| Entity::Projectile(Projectile::arrow(id, origin, facing)));
            trace!(%id, "Arrow fired");
        }
        if let Some(center) = healed {
            self.burst(ctx, center, constants::particles::PICKUP_BURST, palette::HEART);
            self.companion_react(Trigger::Healed);
        }
    }

    fn move_entities(&mut self, level: &Level, dt: f32) {
        let gravity = self.gravity;
        if let Some(player) = self.entities.player_mut() {
            if let Err(error) = player.update(dt, &self.input, Some(level), gravity) {
                warn!(%error, "Player state was not finite, restored its last position");
                player.actor.thaw();
            }
        }

        let anchor = self
            .entities
            .player()
            .map(|player| (player.actor.center(), player.actor.facing));
        let target = self
            .entities
            .player()
            .filter(|player| player.actor.is_alive())
            .map(|player| player.actor.center());

        for entity in self.entities.iter_mut() {
            let result = match entity {
                Entity::Player(_) => Ok(()),
                Entity::Enemy(enemy) => {
                    if let Some(attack) = enemy.think(target, dt) {
                        self.events.push(attack);
                    }
                    enemy.update(dt, Some(level), gravity).map(|_| ())
                }
                Entity::Item(item) => {
                    item.update(dt);
                    Ok(())
                }
                Entity::Projectile(projectile) => projectile.update(dt, Some(level)),
                Entity::Companion(companion) => match anchor {
                    Some((center, facing)) => companion.update(dt, center, facing),
                    None => Ok(()),
                },
            };
            if let Err(error) = result {
                debug!(%error, "Entity frozen");
            }
        }
    }

    /// Applies the rule for one event. Returns the transition it causes, if any.
    fn apply_event(&mut self, event: GameEvent, level: &Level, ctx: &mut SceneContext<'_>) -> Transition {
        trace!(?event, "Applying event");
        match event {
            GameEvent::PlayerTouchesEnemy { enemy } | GameEvent::EnemyAttacksPlayer { enemy } => {
                let damage = match self.entities.get(enemy) {
                    Some(Entity::Enemy(enemy)) if enemy.actor.is_alive() => enemy.damage,
                    _ => return Transition::None,
                };
                self.hurt_player(damage, ctx);
            }
            GameEvent::PlayerTouchesHazard => self.hurt_player(constants::player::HAZARD_DAMAGE, ctx),
            GameEvent::PlayerCollectsItem { item } => self.collect(item, ctx),
            GameEvent::SwordHitsEnemy { enemy } => {
                if let Some(player) = self.entities.player_mut() {
                    player.abilities.mark_swing_landed();
                }
                self.damage_enemy(enemy, constants::ability::SWORD_DAMAGE, ctx);
            }
            GameEvent::ArrowHitsEnemy { arrow, enemy } => {
                let target_alive = self
                    .entities
                    .get(enemy)
                    .is_some_and(|entity| entity.actor().is_alive());
                if !target_alive {
                    return Transition::None;
                }
                let damage = match self.entities.get_mut(arrow) {
                    Some(Entity::Projectile(projectile)) if projectile.actor.is_alive() => {
                        projectile.hit();
                        projectile.damage
                    }
                    _ => return Transition::None,
                };
                self.damage_enemy(enemy, damage, ctx);
            }
            GameEvent::EntityDied { id } => return self.on_death(id, ctx),
            GameEvent::PlayerReachesExit => {
                let alive = self.entities.player().is_some_and(|player| player.actor.is_alive());
                if alive && self.death_timer.is_none() {
                    return self.leave(level, ctx);
                }
            }
        }
        Transition::None
    }

    fn hurt_player(&mut self, amount: u32, ctx: &mut SceneContext<'_>) {
        let Some(player) = self.entities.player_mut() else {
            return;
        };
        let id = player.actor.id;
        let center = player.actor.center();
        match player.hurt(amount) {
            Some(true) => self.events.push(GameEvent::EntityDied { id }),
            Some(false) => {
                debug!(amount, health = player.actor.health.current(), "Player hurt");
                self.burst(ctx, center, constants::particles::HIT_BURST, palette::HAZARD);
                self.companion_react(Trigger::DamageTaken);
            }
            None => {}
        }
    }

    fn damage_enemy(&mut self, id: EntityId, amount: u32, ctx: &mut SceneContext<'_>) {
        let Some(Entity::Enemy(enemy)) = self.entities.get_mut(id) else {
            return;
        };
        if !enemy.actor.is_alive() {
            return;
        }
        let center = enemy.actor.center();
        if enemy.actor.take_damage(amount) {
            self.events.push(GameEvent::EntityDied { id });
        } else {
            self.burst(ctx, center, constants::particles::HIT_BURST, palette::SLIME);
        }
    }

    fn collect(&mut self, id: EntityId, ctx: &mut SceneContext<'_>) {
        let Some(Entity::Item(item)) = self.entities.get_mut(id) else {
            return;
        };
        if !item.consume() {
            return;
        }
        let kind = item.kind;
        let center = item.actor.center();

        match kind {
            ItemKind::Coin => {
                let points = self.score.record_coin(center);
                trace!(points, "Coin collected");
            }
            ItemKind::Heart => {
                if let Some(player) = self.entities.player_mut() {
                    if !player.inventory.add(ItemKind::Heart) {
                        let healed = player.actor.health.heal(constants::player::HEART_HEAL);
                        debug!(healed, "Inventory full, heart used on pickup");
                    }
                }
            }
        }

        if let Some(player) = self.entities.player_mut() {
            player.emotion.trigger(Trigger::ItemCollected);
        }
        self.companion_react(Trigger::ItemCollected);
        self.burst(ctx, center, constants::particles::PICKUP_BURST, kind.sprite().placeholder_color());
    }

    fn on_death(&mut self, id: EntityId, ctx: &mut SceneContext<'_>) -> Transition {
        let Some(entity) = self.entities.get(id) else {
            return Transition::None;
        };
        let center = entity.actor().center();

        match entity.kind() {
            EntityKind::Enemy => {
                let points = self.score.record_kill(center);
                debug!(%id, points, combo = self.score.combo(), "Enemy defeated");
                if let Some(player) = self.entities.player_mut() {
                    player.emotion.trigger(Trigger::EnemyDefeated);
                }
                self.companion_react(Trigger::EnemyDefeated);
                self.burst(ctx, center, constants::particles::DEATH_BURST, palette::SLIME);
            }
            EntityKind::Player => {
                if self.death_timer.is_some() {
                    return Transition::None;
                }
                self.death_timer = Some(constants::player::DEATH_DELAY);
                self.death_unlock = ctx.progress.record_death();
                self.sync_inventory(ctx);
                ctx.save_progress();
                info!(deaths = ctx.progress.deaths, unlocked = ?self.death_unlock, "Luna fell");
                self.companion_react(Trigger::PlayerDied);
                self.burst(ctx, center, constants::particles::DEATH_BURST, palette::PLAYER);
            }
            _ => {}
        }
        Transition::None
    }

    /// The exit leads to the next level, carrying the score, or wins the game on the last one.
    fn leave(&mut self, level: &Level, ctx: &mut SceneContext<'_>) -> Transition {
        if let Some(player) = self.entities.player_mut() {
            player.emotion.trigger(Trigger::LevelCleared);
        }
        self.companion_react(Trigger::LevelCleared);

        match &level.next {
            Some(next) => {
                info!(from = %level.name, to = %next, score = self.score.points(), "Level cleared");
                self.sync_inventory(ctx);
                ctx.save_progress();
                Transition::Replace(SceneId::Level {
                    name: next.clone(),
                    score: Some(Box::new(self.score.clone())),
                })
            }
            None => {
                info!(level = %level.name, score = self.score.points(), "Final level cleared");
                self.finish(true, level, ctx)
            }
        }
    }

    fn finish(&mut self, victory: bool, level: &Level, ctx: &mut SceneContext<'_>) -> Transition {
        let breakdown = self.score.breakdown();
        let new_best = ctx.progress.record_score(breakdown.score);
        self.sync_inventory(ctx);
        ctx.save_progress();

        Transition::Switch(SceneId::GameOver(Box::new(GameOverSummary {
            victory,
            level: level.name.clone(),
            breakdown,
            new_best,
            unlocked: self.death_unlock,
        })))
    }

    fn spawn_enemies(&mut self, level: &Level, dt: f32, ctx: &mut SceneContext<'_>) {
        let alive = self.entities.count_alive(EntityKind::Enemy);
        let count = self.spawner.update(dt, alive);
        if count == 0 {
            return;
        }

        let points: SmallVec<[IVec2; 8]> = level.spawns_of(SpawnKind::Slime).map(|point| point.tile).collect();
        if points.is_empty() {
            trace!(level = %level.name, "No enemy spawn points");
            return;
        }

        let level_width = level.size().x;
        for _ in 0..count {
            let tile = points[ctx.rng.random_range(0..points.len())];
            let position = level.spawn_position(tile, constants::enemy::SLIME_SIZE);
            let id = self
                .entities
                .spawn(|id| Entity::Enemy(Enemy::slime(id, position, level_width)));
            debug!(%id, ?tile, alive, "Spawned enemy");
        }
    }

    fn sync_inventory(&self, ctx: &mut SceneContext<'_>) {
        if let Some(player) = self.entities.player() {
            ctx.progress.inventory = player.inventory.clone();
        }
    }

    fn companion_react(&mut self, trigger: Trigger) {
        for entity in self.entities.iter_mut() {
            if let Entity::Companion(companion) = entity {
                companion.react(trigger);
            }
        }
    }

    fn burst(&mut self, ctx: &mut SceneContext<'_>, origin: Vec2, count: usize, color: Color) {
        self.particles
            .burst(ctx.rng, origin, count, self.burst_speed, self.burst_lifetime, color);
    }

    pub fn render(&self, surface: &mut dyn DrawSurface, ctx: &RenderContext<'_>) -> GameResult<()> {
        let Some(level) = self.level.as_ref() else {
            return surface.clear(palette::NIGHT_SKY);
        };
        let offset = self.camera.offset();

        match &self.background {
            Some(background) => background.render(surface, offset)?,
            None => surface.clear(palette::DAY_SKY)?,
        }

        self.render_tiles(surface, level, offset)?;

        for entity in self.entities.iter() {
            let actor = entity.actor();
            if !actor.is_alive() {
                continue;
            }
            let sprite = match entity {
                Entity::Player(player) if player.is_invulnerable() => Sprite::PlayerHurt,
                Entity::Player(_) => Sprite::Player,
                Entity::Enemy(_) => Sprite::Slime,
                Entity::Item(item) => item.kind.sprite(),
                Entity::Companion(_) => Sprite::Companion,
                Entity::Projectile(_) => Sprite::Arrow,
            };
            let rect = actor.rect();
            surface.draw_sprite(sprite, self.camera.to_screen(rect.position), rect.size, actor.facing == Facing::Left)?;
        }

        self.particles.render(surface, offset)?;

        if let Some(player) = self.entities.player() {
            let companion = self.entities.iter().find_map(|entity| match entity {
                Entity::Companion(companion) => Some(&companion.emotion),
                _ => None,
            });
            hud::render(
                surface,
                &HudView {
                    player,
                    companion,
                    score: &self.score,
                    unlocks: self.unlocks,
                    level_name: &level.name,
                    camera: &self.camera,
                    timings: ctx.timings.filter(|_| ctx.config.show_frame_timings),
                },
            )?;
        }
        Ok(())
    }

    /// Draws only the tiles inside the viewport.
    fn render_tiles(&self, surface: &mut dyn DrawSurface, level: &Level, offset: Vec2) -> GameResult<()> {
        let tile_size = level.tile_size();
        let screen = surface.size();
        let first = (offset / tile_size).floor().as_ivec2();
        let last = ((offset + screen) / tile_size).ceil().as_ivec2();

        for y in first.y..last.y {
            for x in first.x..last.x {
                let sprite = match level.grid().get(x, y) {
                    Some(Tile::Solid) => Sprite::SolidTile,
                    Some(Tile::Hazard) => Sprite::HazardTile,
                    Some(Tile::Exit) => Sprite::ExitTile,
                    Some(Tile::Empty) | None => continue,
                };
                let rect = level.tile_rect(IVec2::new(x, y));
                surface.draw_sprite(sprite, self.camera.to_screen(rect.position), rect.size, false)?;
            }
        }
        Ok(())
    }
}
