use std::time::Duration;

use blocksmith_edit::{EditOutcome, Pick, Rejection, ToolState, apply_pick};
use blocksmith_geom::Vec3;
use blocksmith_runtime::{ChallengeSource, JobOut, Runtime, StaleGuard, StructureGenerator};
use blocksmith_world::{Insert, Palette, World};

use crate::commands::{BlockRef, Command, HELP};
use crate::config::{ConfigError, SessionConfig};
use crate::event::{Event, EventQueue};

/// Height of the ground plane under the y = 0 layer of cells.
const GROUND_PLANE_Y: f32 = -0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// One editing session: the world, the user's tool state, and the
/// collaborator runtime, all driven from a single event loop.
pub struct App {
    pub world: World,
    pub tool: ToolState,
    pub palette: Palette,
    pub last_challenge: Option<String>,
    queue: EventQueue,
    runtime: Runtime,
    imports: StaleGuard,
    wait_timeout: Duration,
    messages: Vec<String>,
}

impl App {
    pub fn new<G, C>(cfg: &SessionConfig, generator: G, challenges: C) -> Result<Self, ConfigError>
    where
        G: StructureGenerator,
        C: ChallengeSource,
    {
        let palette = cfg.palette();
        let tool = ToolState::new(cfg.active_color(&palette)?);
        let mut world = World::new();
        if cfg.starter_scene {
            for b in &cfg.starter {
                match world.add(b.pos, b.color.clone()) {
                    Insert::Added(_) => {}
                    Insert::Occupied(existing) => {
                        log::warn!("starter block at {} skipped: taken by {}", b.pos, existing);
                    }
                    Insert::BelowGround => {
                        log::warn!("starter block at {} skipped: below ground", b.pos);
                    }
                }
            }
        }
        log::info!(
            "session ready: {} block(s), tool={}, color={}",
            world.len(),
            tool.mode,
            tool.color
        );
        Ok(Self {
            world,
            tool,
            palette,
            last_challenge: None,
            queue: EventQueue::new(),
            runtime: Runtime::new(generator, challenges, cfg.structure_workers),
            imports: StaleGuard::default(),
            wait_timeout: cfg.wait_timeout(),
            messages: Vec::new(),
        })
    }

    fn say(&mut self, msg: impl Into<String>) {
        self.messages.push(msg.into());
    }

    /// Lines produced since the last call, for display.
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    pub fn is_busy(&self) -> bool {
        self.runtime.is_busy()
    }

    pub fn execute(&mut self, cmd: Command) -> Flow {
        match cmd {
            Command::Mode(mode) => self.emit(Event::ToolModeSelected { mode }),
            Command::Color(color) => self.emit(Event::ColorSelected { color }),
            Command::PickBlock { target, face } => {
                let found = match target {
                    BlockRef::Id(id) => self.world.get(id),
                    BlockRef::At(pos) => self.world.block_at(pos),
                };
                match found {
                    Some(b) => {
                        let pick = Pick::Face {
                            block: b.id,
                            position: b.pos,
                            normal: face.normal(),
                        };
                        self.emit(Event::PickRequested { pick });
                    }
                    None => self.say("no block there"),
                }
            }
            Command::PickGround { x, z } => {
                let point = Vec3::new(x, GROUND_PLANE_Y, z);
                self.emit(Event::PickRequested {
                    pick: Pick::Ground { point },
                });
            }
            Command::Generate(prompt) => self.emit(Event::StructureRequested { prompt }),
            Command::Challenge => self.emit(Event::ChallengeRequested),
            Command::Clear => self.emit(Event::ClearRequested),
            Command::Wait => self.wait_all(),
            Command::List => self.list(),
            Command::Stats => self.stats(),
            Command::Palette => self.show_palette(),
            Command::Help => self.say(HELP),
            Command::Quit => return Flow::Quit,
        }
        self.step();
        Flow::Continue
    }

    fn emit(&mut self, ev: Event) {
        self.queue.emit_now(ev);
    }

    /// Run everything queued for this tick, then pick up finished requests.
    pub fn step(&mut self) {
        for out in self.runtime.drain_results() {
            self.emit(Self::arrival(out));
        }
        while let Some(env) = self.queue.pop_ready() {
            Self::log_event(env.tick, env.id, &env.kind);
            self.handle_event(env.kind);
        }
        self.queue.advance_tick();
    }

    /// Block until every outstanding request has landed or timed out.
    pub fn wait_all(&mut self) {
        while self.runtime.is_busy() {
            match self.runtime.wait_result(self.wait_timeout) {
                Some(out) => {
                    let ev = Self::arrival(out);
                    self.emit(ev);
                }
                None => {
                    log::warn!(
                        "gave up waiting after {:?}; {} request(s) still out",
                        self.wait_timeout,
                        self.runtime.pending()
                    );
                    self.say("still waiting on the generator; try again later");
                    break;
                }
            }
        }
    }

    fn arrival(out: JobOut) -> Event {
        match out {
            JobOut::Structure {
                ticket,
                prompt,
                result,
                t_total_ms,
            } => Event::StructureArrived {
                ticket,
                prompt,
                result,
                t_total_ms,
            },
            JobOut::Challenge { ticket, text } => Event::ChallengeArrived { ticket, text },
        }
    }

    fn handle_event(&mut self, ev: Event) {
        match ev {
            Event::ToolModeSelected { mode } => {
                self.tool.mode = mode;
                self.say(format!("tool: {}", mode));
            }
            Event::ColorSelected { color } => {
                self.say(format!("color: {}", color));
                self.tool.color = color;
            }
            Event::PickRequested { pick } => {
                let outcome = apply_pick(&mut self.world, self.tool.mode, &self.tool.color, &pick);
                let msg = match outcome {
                    EditOutcome::Added { id, pos } => format!("added {} at {}", id, pos),
                    EditOutcome::Occupied { pos, existing } => {
                        format!("{} is taken by {}", pos, existing)
                    }
                    EditOutcome::Rejected(Rejection::BelowGround) => {
                        "cannot build below ground".to_string()
                    }
                    EditOutcome::Rejected(Rejection::OffLattice) => {
                        "pick is off the grid".to_string()
                    }
                    EditOutcome::Removed(id) => format!("removed {}", id),
                    EditOutcome::Repainted(id) => format!("painted {} {}", id, self.tool.color),
                    EditOutcome::Missing(id) => format!("{} no longer exists", id),
                    EditOutcome::Ignored => "nothing to do".to_string(),
                };
                self.say(msg);
            }
            Event::ClearRequested => {
                let n = self.world.len();
                self.world.clear();
                self.say(format!("cleared {} block(s)", n));
            }
            Event::StructureRequested { prompt } => {
                let ticket = self.runtime.submit_structure(prompt.clone());
                log::info!("structure request {} for `{}` submitted", ticket, prompt);
                self.say(format!("generating `{}`...", prompt));
            }
            Event::StructureArrived {
                ticket,
                prompt,
                result,
                t_total_ms,
            } => match result {
                Ok(structure) => {
                    if !self.imports.admit(ticket) {
                        log::warn!(
                            "dropping structure {} for `{}`: {} already applied",
                            ticket,
                            prompt,
                            self.imports.last_applied()
                        );
                        return;
                    }
                    let name = structure.name.clone();
                    let report = structure.report;
                    let n = structure.install(&mut self.world);
                    log::info!(
                        "imported `{}` ({} ms): {} descriptor(s) -> {} block(s), rounded={} lifted={} recolored={} collapsed={}",
                        name,
                        t_total_ms,
                        report.descriptors,
                        n,
                        report.rounded,
                        report.lifted,
                        report.recolored,
                        report.collapsed
                    );
                    self.say(format!("built `{}`: {} block(s)", name, n));
                }
                Err(e) => {
                    log::warn!("structure {} for `{}` failed: {}", ticket, prompt, e);
                    self.say(format!(
                        "could not generate `{}`; try a simpler description ({})",
                        prompt, e
                    ));
                }
            },
            Event::ChallengeRequested => {
                self.runtime.submit_challenge();
            }
            Event::ChallengeArrived { text, .. } => {
                self.say(format!("challenge: {}", text));
                self.last_challenge = Some(text);
            }
        }
    }

    fn list(&mut self) {
        let lines: Vec<String> = self
            .world
            .snapshot()
            .iter()
            .map(|b| format!("{:>6} {} {}", b.id.to_string(), b.pos, b.color))
            .collect();
        if lines.is_empty() {
            self.say("(empty)");
        }
        self.messages.extend(lines);
    }

    fn stats(&mut self) {
        let s = self.world.stats();
        let busy = if self.runtime.is_busy() {
            format!(", {} request(s) pending", self.runtime.pending())
        } else {
            String::new()
        };
        self.say(format!(
            "{} block(s), rev {}, tool {}, color {}{}",
            s.blocks, s.rev, self.tool.mode, self.tool.color, busy
        ));
    }

    fn show_palette(&mut self) {
        let lines: Vec<String> = self
            .palette
            .swatches()
            .iter()
            .map(|s| {
                let mark = if s.color == self.tool.color { "*" } else { " " };
                format!("{} {:<8} {}", mark, s.name, s.color)
            })
            .collect();
        self.messages.extend(lines);
    }

    fn log_event(tick: u64, id: u64, ev: &Event) {
        match ev {
            Event::ToolModeSelected { mode } => {
                log::debug!(target: "events", "[tick {} #{}] ToolModeSelected {}", tick, id, mode);
            }
            Event::ColorSelected { color } => {
                log::debug!(target: "events", "[tick {} #{}] ColorSelected {}", tick, id, color);
            }
            Event::PickRequested { pick } => {
                log::info!(target: "events", "[tick {} #{}] PickRequested {:?}", tick, id, pick);
            }
            Event::ClearRequested => {
                log::info!(target: "events", "[tick {} #{}] ClearRequested", tick, id);
            }
            Event::StructureRequested { prompt } => {
                log::info!(target: "events", "[tick {} #{}] StructureRequested `{}`", tick, id, prompt);
            }
            Event::StructureArrived {
                ticket, result, t_total_ms, ..
            } => {
                log::info!(target: "events", "[tick {} #{}] StructureArrived ticket={} ok={} t={}ms",
                    tick, id, ticket, result.is_ok(), t_total_ms);
            }
            Event::ChallengeRequested => {
                log::debug!(target: "events", "[tick {} #{}] ChallengeRequested", tick, id);
            }
            Event::ChallengeArrived { ticket, .. } => {
                log::debug!(target: "events", "[tick {} #{}] ChallengeArrived ticket={}", tick, id, ticket);
            }
        }
    }
}
